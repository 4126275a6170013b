use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::Colorize;
use roster_lib::{
    Error, Repository, Result,
    form::{Action, FormController, FormValues},
    repository::{
        FieldDefinition, FieldName, Record, RecordId,
        entities::{fields::CUSTOM_FIELDS, fields::base_fields, start_of_day},
    },
    table::{Filters, Selection, columns, filter_options},
};
use strum::IntoEnumIterator;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List members
    List {
        /// Only show members matching COLUMN=VALUE. Repeat to combine.
        #[arg(short, long, value_parser = parse_filter)]
        filter: Vec<(FieldName, String)>,
        /// Mark a member as selected
        #[arg(long)]
        select: Vec<String>,
    },
    /// Add a new member
    Add {
        #[command(flatten)]
        values: Values,
    },
    /// Edit an existing member
    Edit {
        id: String,
        #[command(flatten)]
        values: Values,
    },
    /// Delete a member
    Delete { id: String },
    /// Show the filter options of a column
    Filters {
        #[arg(value_parser = parse_field)]
        column: FieldName,
    },
    /// Describe the form fields
    Fields {
        /// Also show the optional custom fields
        #[arg(long)]
        custom: bool,
    },
}

/// Form values given on the command line. Unset values keep what the form already holds.
#[derive(Args, Debug, Clone)]
pub struct Values {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    memo: Option<String>,
    /// Join date as YYYY-MM-DD
    #[arg(long, value_parser = parse_day)]
    join_date: Option<NaiveDate>,
    #[arg(long)]
    job: Option<String>,
    #[arg(long)]
    email_consent: Option<bool>,
}

impl Values {
    fn fill(&self, form: &mut FormValues) {
        if let Some(name) = &self.name {
            form.name = name.clone();
        }
        if let Some(address) = &self.address {
            form.address = address.clone();
        }
        if let Some(memo) = &self.memo {
            form.memo = memo.clone();
        }
        if let Some(day) = self.join_date {
            form.join_date = Some(start_of_day(day));
        }
        if let Some(job) = &self.job {
            form.job = job.clone();
        }
        if let Some(email_consent) = self.email_consent {
            form.email_consent = email_consent;
        }
    }
}

pub fn handle(repo: &Repository, cmd: &Command) -> Result<()> {
    match cmd {
        Command::List { filter, select } => {
            let mut filters = Filters::new();
            for (field, value) in filter {
                filters.select(*field, value.clone());
            }

            let records = repo.list();
            let mut selection = Selection::new();
            selection.set(select.iter().map(|id| RecordId::from(id.as_str())));
            selection.retain_existing(&records);

            print_header();
            for record in filters.apply(&records) {
                print_row(record, selection.contains(record.id()));
            }
        }
        Command::Add { values } => {
            let mut controller = FormController::new(repo.clone());
            if let Action::Show(mut form) = controller.open_add() {
                values.fill(&mut form);
                controller.submit(&form)?;
            }
            if let Some(record) = repo.list().last() {
                println!("{} {}", "Added".green(), record.id());
            }
        }
        Command::Edit { id, values } => {
            let id = RecordId::from(id.as_str());
            let record = repo.get(&id).ok_or_else(|| Error::NotFound(id.clone()))?;

            let mut controller = FormController::new(repo.clone());
            if let Action::Show(mut form) = controller.open_edit(&record) {
                values.fill(&mut form);
                controller.submit(&form)?;
            }
            println!("{} {id}", "Updated".green());
        }
        Command::Delete { id } => {
            if repo.delete(&RecordId::from(id.as_str())) {
                println!("{} {id}", "Deleted".green());
            } else {
                eprintln!("No member with id {id}");
            }
        }
        Command::Filters { column } => {
            for option in filter_options(*column, &repo.list()) {
                println!("{}\t{}", option.text, option.value.dimmed());
            }
        }
        Command::Fields { custom } => {
            for field in base_fields() {
                print_field(&field);
            }
            if *custom {
                for field in &CUSTOM_FIELDS {
                    print_field(field);
                }
            }
        }
    }

    Ok(())
}

fn print_header() {
    let titles: Vec<&str> = columns(&[]).iter().map(|c| c.title).collect();
    println!("  {}\t{}", "id".bold(), titles.join("\t").bold());
}

fn print_row(record: &Record, selected: bool) {
    let marker = if selected { "*" } else { " " };
    let cells: Vec<String> = FieldName::iter()
        .map(|field| record.cell(field).into_owned())
        .collect();

    println!("{marker} {}\t{}", record.id().to_string().dimmed(), cells.join("\t"));
}

fn print_field(field: &FieldDefinition) {
    let field_type = field.field_type();
    let mut details = vec![field_type.kind().to_string()];

    if field.required() {
        details.push("required".into());
    }
    if let Some(max) = field_type.max_length() {
        details.push(format!("max {max}"));
    }
    if let Some(options) = field_type.select_options() {
        details.push(options.join(" | "));
    }

    println!("{}\t{}\t{}", field.id().bold(), field.label(), details.join(", "));
}

fn parse_field(s: &str) -> std::result::Result<FieldName, String> {
    s.parse().map_err(|_| {
        let names: Vec<&str> = FieldName::iter().map(FieldName::id).collect();
        format!("unknown column '{s}', expected one of {}", names.join(", "))
    })
}

fn parse_filter(s: &str) -> std::result::Result<(FieldName, String), String> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{s}'"))?;

    Ok((parse_field(column)?, value.to_string()))
}

fn parse_day(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("invalid date '{s}': {err}"))
}

#[cfg(test)]
mod test {
    use roster_lib::{Error, Repository, repository::storage::InMemory};

    use super::{Command, Values, handle};

    fn values() -> Values {
        Values {
            name: Some("Nobody".into()),
            address: None,
            memo: None,
            join_date: None,
            job: None,
            email_consent: None,
        }
    }

    #[test]
    fn test_edit_missing_member_fails() {
        let repo = Repository::with_storage(InMemory);
        let before = repo.list();

        let result = handle(
            &repo,
            &Command::Edit {
                id: "404".into(),
                values: values(),
            },
        );

        assert!(matches!(result, Err(Error::NotFound(id)) if id.as_str() == "404"));
        assert_eq!(repo.list(), before);
    }

    #[test]
    fn test_delete_missing_member_is_ok() {
        let repo = Repository::with_storage(InMemory);

        let result = handle(&repo, &Command::Delete { id: "404".into() });

        assert!(result.is_ok());
        assert_eq!(repo.list().len(), 2);
    }
}
