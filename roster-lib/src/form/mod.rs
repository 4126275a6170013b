//! The member form: its values, their validation against the field constraint table, and the
//! [`FormController`] that decides whether a submission adds or updates a record.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::repository::{
    CustomFields, FieldName, FieldType, Record, RecordFields,
    entities::fields::{DEFAULT_JOB, rule},
};

mod controller;

pub use controller::{Action, FormController, Mode, State};

/// Values as entered in the form, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub name: String,
    pub address: String,
    pub memo: String,
    pub join_date: Option<DateTime<Utc>>,
    pub job: String,
    pub email_consent: bool,
    pub custom_fields: CustomFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    Required {
        field: FieldName,
        message: &'static str,
    },
    #[error("{field}: 글자수 {max}을 초과할 수 없습니다.")]
    TooLong { field: FieldName, max: usize },
    #[error("{field}: '{value}' is not one of the allowed options")]
    NotAnOption { field: FieldName, value: String },
}

impl ValidationError {
    pub fn field(&self) -> FieldName {
        match self {
            ValidationError::Required { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::NotAnOption { field, .. } => *field,
        }
    }
}

/// Every problem found in one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Whether `field` has at least one problem.
    pub fn has(&self, field: FieldName) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl FormValues {
    fn text(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::Address => &self.address,
            FieldName::Memo => &self.memo,
            FieldName::Job => &self.job,
            FieldName::JoinDate | FieldName::EmailConsent => "",
        }
    }

    fn check(&self, field: FieldName, errors: &mut Vec<ValidationError>) {
        let rule = rule(field);

        let missing = match rule.field_type {
            FieldType::Date => self.join_date.is_none(),
            FieldType::Checkbox => false,
            _ => self.text(field).trim().is_empty(),
        };

        if missing {
            if rule.required {
                errors.push(ValidationError::Required {
                    field,
                    message: rule.message,
                });
            }
            return;
        }

        let value = self.text(field);

        if let Some(max) = rule.field_type.max_length()
            && value.chars().count() > max
        {
            errors.push(ValidationError::TooLong { field, max });
        }

        if let Some(options) = rule.field_type.select_options()
            && !options.iter().any(|option| *option == value)
        {
            errors.push(ValidationError::NotAnOption {
                field,
                value: value.to_string(),
            });
        }
    }

    /// Check every field against its rule. On success, returns the values to store.
    pub fn validate(&self) -> Result<RecordFields, ValidationErrors> {
        let mut errors = Vec::new();
        for field in FieldName::iter() {
            self.check(field, &mut errors);
        }

        match self.join_date {
            Some(join_date) if errors.is_empty() => Ok(RecordFields {
                name: self.name.clone(),
                address: self.address.clone(),
                memo: self.memo.clone(),
                join_date,
                job: self.job.clone(),
                email_consent: self.email_consent,
                custom_fields: (!self.custom_fields.is_empty())
                    .then(|| self.custom_fields.clone()),
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

impl Default for FormValues {
    /// An empty form, with the default job preselected.
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            memo: String::new(),
            join_date: None,
            job: DEFAULT_JOB.into(),
            email_consent: false,
            custom_fields: CustomFields::new(),
        }
    }
}

impl From<&Record> for FormValues {
    /// A form prefilled with `record`.
    fn from(record: &Record) -> Self {
        Self {
            name: record.name().clone(),
            address: record.address().clone(),
            memo: record.memo().clone(),
            join_date: Some(record.join_date()),
            job: record.job().clone(),
            email_consent: record.email_consent(),
            custom_fields: record.custom_fields().clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};

    use super::{FormValues, ValidationError};
    use crate::repository::{FieldName, Record};

    fn filled() -> FormValues {
        FormValues {
            name: "홍길동".into(),
            join_date: Some(Utc.with_ymd_and_hms(2024, 10, 5, 0, 0, 0).unwrap()),
            ..FormValues::default()
        }
    }

    #[test]
    fn test_empty_form_requires_name_and_date() {
        let errors = FormValues::default().validate().unwrap_err();

        assert_eq!(errors.errors().len(), 2);
        assert!(errors.has(FieldName::Name));
        assert!(errors.has(FieldName::JoinDate));
        assert_eq!(
            errors.errors()[0],
            ValidationError::Required {
                field: FieldName::Name,
                message: "이름은 필수값입니다.",
            }
        );
    }

    #[test]
    fn test_valid_form() {
        let fields = filled().validate().unwrap();

        assert_eq!(fields.name, "홍길동");
        assert_eq!(fields.job, "개발자");
        assert_eq!(fields.address, "");
        assert!(!fields.email_consent);
        assert!(fields.custom_fields.is_none());
    }

    #[test]
    fn test_whitespace_name_is_missing() {
        let values = FormValues {
            name: "   ".into(),
            ..filled()
        };

        assert!(values.validate().unwrap_err().has(FieldName::Name));
    }

    #[test]
    fn test_lengths_count_characters() {
        let values = FormValues {
            address: "가".repeat(20),
            memo: "a".repeat(50),
            ..filled()
        };
        assert!(values.validate().is_ok());

        let values = FormValues {
            address: "가".repeat(21),
            memo: "a".repeat(51),
            ..filled()
        };
        let errors = values.validate().unwrap_err();

        assert_eq!(
            errors.errors(),
            &[
                ValidationError::TooLong {
                    field: FieldName::Address,
                    max: 20
                },
                ValidationError::TooLong {
                    field: FieldName::Memo,
                    max: 50
                },
            ]
        );
        assert_eq!(
            errors.errors()[0].to_string(),
            "address: 글자수 20을 초과할 수 없습니다."
        );
    }

    #[test]
    fn test_job_must_be_an_option() {
        let values = FormValues {
            job: "CEO".into(),
            ..filled()
        };
        assert!(values.validate().unwrap_err().has(FieldName::Job));

        let values = FormValues {
            job: "".into(),
            ..filled()
        };
        assert_eq!(values.validate().unwrap().job, "");
    }

    #[test]
    fn test_prefill_round_trip() {
        let seed = Record::seed();
        let values = FormValues::from(&seed[1]);

        assert_eq!(values.name, "Foo Bar");
        assert_eq!(values.custom_fields["department"], "디자인팀");

        let fields = values.validate().unwrap();
        assert_eq!(Record::new(seed[1].id().clone(), fields), seed[1]);
    }
}
