use derive_more::Display;
use tracing::debug;

use crate::{
    Result,
    form::FormValues,
    repository::{Record, RecordId, RecordPatch, Repository},
};

/// Which record, if any, the form is currently editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Creating,
    Editing(RecordId),
}

/// What the form is titled and how it submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Mode {
    #[display("회원 추가")]
    Add,
    #[display("회원 정보 수정")]
    Edit,
}

/// What the form view should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Open the form with these values
    Show(FormValues),
    /// Close the form
    Close,
}

/// Keeps the form and the table in step.
///
/// Holds the single edit context. Submitting while editing updates the targeted record,
/// otherwise a new record is added.
#[derive(Debug, Clone)]
pub struct FormController {
    repo: Repository,
    state: State,
}

impl FormController {
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            state: State::Creating,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            State::Creating => Mode::Add,
            State::Editing(_) => Mode::Edit,
        }
    }

    /// Start adding a new record, dropping any edit in progress.
    pub fn open_add(&mut self) -> Action {
        self.reset();
        Action::Show(FormValues::default())
    }

    /// Start editing `record`. Replaces any edit in progress.
    pub fn open_edit(&mut self, record: &Record) -> Action {
        debug!("Editing record: {}", record.id());
        self.state = State::Editing(record.id().clone());
        Action::Show(FormValues::from(record))
    }

    /// Validate `values` and apply them. Invalid values leave both the store and the edit
    /// context untouched.
    pub fn submit(&mut self, values: &FormValues) -> Result<Action> {
        let fields = values.validate()?;

        match std::mem::take(&mut self.state) {
            State::Editing(id) => {
                // An empty map has to reach the record so cleared values are dropped.
                let mut patch = RecordPatch::from(fields);
                patch.custom_fields = Some(values.custom_fields.clone());
                self.repo.update(&id, patch);
            }
            State::Creating => {
                let record = Record::new(self.repo.next_id(), fields);
                self.repo.add(record)?;
            }
        }

        Ok(Action::Close)
    }

    /// Close the form without submitting.
    pub fn close(&mut self) -> Action {
        self.reset();
        Action::Close
    }

    fn reset(&mut self) {
        if let State::Editing(id) = &self.state {
            debug!("Discarding edit context for {id}");
        }
        self.state = State::Creating;
    }
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};

    use super::{Action, FormController, Mode, State};
    use crate::{
        Error,
        form::FormValues,
        repository::{RecordId, Repository},
    };

    fn controller() -> (Repository, FormController) {
        let repo = Repository::mock();
        (repo.clone(), FormController::new(repo))
    }

    fn values(name: &str) -> FormValues {
        FormValues {
            name: name.into(),
            join_date: Some(Utc.with_ymd_and_hms(2024, 11, 1, 9, 0, 0).unwrap()),
            ..FormValues::default()
        }
    }

    #[test]
    fn test_starts_creating() {
        let (_, controller) = controller();

        assert_eq!(controller.state(), &State::Creating);
        assert_eq!(controller.mode(), Mode::Add);
    }

    #[test]
    fn test_submit_while_creating_adds() {
        let (repo, mut controller) = controller();

        assert_eq!(controller.open_add(), Action::Show(FormValues::default()));
        assert_eq!(controller.submit(&values("New Member")).unwrap(), Action::Close);

        let records = repo.list();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].name(), "New Member");
        assert_eq!(controller.state(), &State::Creating);
    }

    #[test]
    fn test_submit_while_editing_updates() {
        let (repo, mut controller) = controller();
        let john = repo.get(&"1".into()).unwrap();

        let Action::Show(mut form) = controller.open_edit(&john) else {
            panic!("editing should show the form");
        };
        assert_eq!(form.name, "John Doe");
        assert_eq!(controller.mode(), Mode::Edit);

        form.name = "John Smith".into();
        controller.submit(&form).unwrap();

        let records = repo.list();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), john.id());
        assert_eq!(records[0].name(), "John Smith");
        assert_eq!(controller.state(), &State::Creating);
    }

    #[test]
    fn test_edit_can_clear_custom_fields() {
        let (repo, mut controller) = controller();
        let foo = repo.get(&"2".into()).unwrap();
        assert!(foo.custom_fields().is_some());

        let Action::Show(mut form) = controller.open_edit(&foo) else {
            panic!("editing should show the form");
        };
        assert_eq!(form.custom_fields["department"], "디자인팀");

        form.custom_fields.remove("department");
        controller.submit(&form).unwrap();

        let foo = repo.get(&"2".into()).unwrap();
        assert_eq!(foo.custom_fields(), &None);
        assert_eq!(foo.name(), "Foo Bar");
    }

    #[test]
    fn test_edit_keeps_custom_fields_left_in_form() {
        let (repo, mut controller) = controller();
        let foo = repo.get(&"2".into()).unwrap();

        let Action::Show(mut form) = controller.open_edit(&foo) else {
            panic!("editing should show the form");
        };
        form.memo = "팀장".into();
        controller.submit(&form).unwrap();

        let foo = repo.get(&"2".into()).unwrap();
        assert_eq!(foo.memo(), "팀장");
        assert_eq!(foo.custom_fields().as_ref().unwrap()["department"], "디자인팀");
    }

    #[test]
    fn test_single_edit_context() {
        let (repo, mut controller) = controller();
        let a = repo.get(&"1".into()).unwrap();
        let b = repo.get(&"2".into()).unwrap();

        controller.open_edit(&a);
        controller.open_edit(&b);

        assert_eq!(controller.state(), &State::Editing(RecordId::from("2")));

        controller.submit(&values("Only B")).unwrap();
        assert_eq!(repo.get(&"1".into()).unwrap().name(), "John Doe");
        assert_eq!(repo.get(&"2".into()).unwrap().name(), "Only B");
    }

    #[test]
    fn test_close_discards_edit() {
        let (repo, mut controller) = controller();
        let before = repo.list();

        controller.open_edit(&before[0]);
        assert_eq!(controller.close(), Action::Close);

        assert_eq!(controller.state(), &State::Creating);
        assert_eq!(repo.list(), before);
    }

    #[test]
    fn test_open_add_clears_edit() {
        let (repo, mut controller) = controller();
        let john = repo.get(&"1".into()).unwrap();

        controller.open_edit(&john);
        controller.open_add();
        controller.submit(&values("Fresh")).unwrap();

        assert_eq!(repo.list().len(), 3);
        assert_eq!(repo.get(&"1".into()).unwrap().name(), "John Doe");
    }

    #[test]
    fn test_invalid_submit_changes_nothing() {
        let (repo, mut controller) = controller();
        let john = repo.get(&"1".into()).unwrap();
        let before = repo.list();

        controller.open_edit(&john);
        let result = controller.submit(&values(""));

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(controller.state(), &State::Editing(john.id().clone()));
        assert_eq!(repo.list(), before);
    }

    #[test]
    fn test_edit_of_deleted_record_is_noop() {
        let (repo, mut controller) = controller();
        let john = repo.get(&"1".into()).unwrap();

        controller.open_edit(&john);
        repo.delete(john.id());
        controller.submit(&values("Ghost")).unwrap();

        assert_eq!(repo.list().len(), 1);
        assert_eq!(controller.state(), &State::Creating);
    }
}
