//! Goal session state
//!
//! The session is a plain value. [`Session::apply`] folds one [`Event`] into
//! it and returns the [`Effect`]s the caller must run; nothing here touches
//! the network. Effect outcomes come back as completion events.
//!
//! Writes are two-phase: a mutation is dispatched with its outcome unknown,
//! then the goal list is reconciled by an authoritative read.

use crate::state_machine::validate_transition;
use goalboard_model::{Dashboard, Field, Goal, GoalDraft, GoalEdit, ValidationError};
use goalboard_store::{Mutation, MutationKind, StoreError};
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, warn};

/// Request/reconcile phase of the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing in flight
    #[default]
    Idle,
    /// A mutation is dispatched and unacknowledged
    Submitting,
    /// A mutation completed; waiting for the reconciling read
    RefetchPending,
}

/// Edit dialog visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialog {
    /// Hidden
    #[default]
    Closed,
    /// Showing the edit form
    Open,
}

/// User-facing message raised by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A required form field is empty
    MissingFields,
    /// A form field is filled but does not parse
    Invalid(ValidationError),
    /// Create was not delivered
    SaveFailed,
    /// Update was not delivered
    UpdateFailed,
    /// Delete was not delivered
    DeleteFailed,
    /// Delete requested for a goal without a row
    CannotDelete,
    /// Goal list could not be read; the previous list is still shown
    FetchFailed,
}

impl Notice {
    /// Text shown to the user
    #[must_use]
    pub fn message(&self) -> Cow<'static, str> {
        let text = match self {
            Notice::Invalid(err) => return Cow::Owned(err.to_string()),
            Notice::MissingFields => "Please fill out all required fields.",
            Notice::SaveFailed => "Something went wrong while saving.",
            Notice::UpdateFailed => "Something went wrong while updating.",
            Notice::DeleteFailed => "Something went wrong while deleting.",
            Notice::CannotDelete => "Cannot delete this entry.",
            Notice::FetchFailed => "Something went wrong while loading goals.",
        };
        Cow::Borrowed(text)
    }

    /// Notice for a form rejected before dispatch
    ///
    /// Empty fields and a missing row map to `on_missing`; anything that is
    /// present but unparsable keeps its detail.
    fn rejected(err: ValidationError, on_missing: Notice) -> Self {
        match err {
            ValidationError::MissingField(_) | ValidationError::NotPersisted => on_missing,
            other => Notice::Invalid(other),
        }
    }

    const fn delivery_failed(kind: MutationKind) -> Self {
        match kind {
            MutationKind::Create => Notice::SaveFailed,
            MutationKind::Update => Notice::UpdateFailed,
            MutationKind::Delete => Notice::DeleteFailed,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Input to the session: a user action or an effect completion
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Read the goal list
    Load,
    /// Type into the add form
    SetAddField(Field, String),
    /// Type into the edit form
    SetEditField(Field, String),
    /// Submit the add form
    SubmitAdd,
    /// Open the edit dialog on a goal
    OpenEdit(Goal),
    /// Submit the edit form
    SubmitEdit,
    /// Delete the goal in the edit form
    Delete,
    /// Close the edit dialog without writing
    CloseDialog,
    /// Acknowledge the current notice
    DismissNotice,
    /// A dispatched mutation finished
    MutationCompleted {
        /// What was dispatched
        kind: MutationKind,
        /// Transport outcome; `Ok` only means the request went out
        result: Result<(), StoreError>,
    },
    /// A read finished
    FetchCompleted(Result<Vec<Goal>, StoreError>),
}

/// Work the session asks its driver to perform
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read the full goal list
    Fetch,
    /// Submit a validated write
    Dispatch(Mutation),
}

/// Goal session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    goals: Vec<Goal>,
    add_form: GoalDraft,
    edit_form: GoalEdit,
    phase: Phase,
    dialog: Dialog,
    notice: Option<Notice>,
}

impl Session {
    /// Create new empty session
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Goals from the latest successful read
    #[inline]
    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Goals laid out for rendering
    #[must_use]
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(&self.goals)
    }

    /// Add-form contents
    #[inline]
    #[must_use]
    pub fn add_form(&self) -> &GoalDraft {
        &self.add_form
    }

    /// Edit-form contents
    #[inline]
    #[must_use]
    pub fn edit_form(&self) -> &GoalEdit {
        &self.edit_form
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Edit dialog visibility
    #[inline]
    #[must_use]
    pub fn dialog(&self) -> Dialog {
        self.dialog
    }

    /// Pending user-facing message
    #[inline]
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        self.notice.clone()
    }

    /// A mutation is in flight; further submits are ignored
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Apply one event and return the effects it requests
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Load => vec![Effect::Fetch],
            Event::SetAddField(field, value) => {
                self.add_form.set(field, value);
                Vec::new()
            }
            Event::SetEditField(field, value) => {
                self.edit_form.draft.set(field, value);
                Vec::new()
            }
            Event::SubmitAdd => {
                let mutation = Mutation::create(&self.add_form);
                self.submit(mutation, Notice::MissingFields)
            }
            Event::OpenEdit(goal) => {
                self.edit_form = GoalEdit::from_goal(&goal);
                self.dialog = Dialog::Open;
                Vec::new()
            }
            Event::SubmitEdit => {
                let mutation = Mutation::update(&self.edit_form);
                self.submit(mutation, Notice::MissingFields)
            }
            Event::Delete => {
                let mutation = Mutation::delete(self.edit_form.row_index.as_ref());
                self.submit(mutation, Notice::CannotDelete)
            }
            Event::CloseDialog => {
                self.dialog = Dialog::Closed;
                Vec::new()
            }
            Event::DismissNotice => {
                self.notice = None;
                Vec::new()
            }
            Event::MutationCompleted { kind, result } => self.complete_mutation(kind, result),
            Event::FetchCompleted(result) => {
                self.complete_fetch(result);
                Vec::new()
            }
        }
    }

    fn submit(
        &mut self,
        mutation: Result<Mutation, ValidationError>,
        on_missing: Notice,
    ) -> Vec<Effect> {
        if self.is_busy() {
            debug!(phase = ?self.phase, "submit ignored while busy");
            return Vec::new();
        }

        match mutation {
            Err(err) => {
                debug!(error = %err, "submit rejected locally");
                self.notice = Some(Notice::rejected(err, on_missing));
                Vec::new()
            }
            Ok(mutation) => {
                self.enter(Phase::Submitting);
                self.notice = None;
                vec![Effect::Dispatch(mutation)]
            }
        }
    }

    fn complete_mutation(
        &mut self,
        kind: MutationKind,
        result: Result<(), StoreError>,
    ) -> Vec<Effect> {
        if self.phase != Phase::Submitting {
            warn!(%kind, phase = ?self.phase, "completion with no mutation in flight");
            return Vec::new();
        }

        if let Err(err) = &result {
            warn!(%kind, error = %err, "mutation failed");
            self.notice = Some(Notice::delivery_failed(kind));
        }

        match (kind, result.is_ok()) {
            // a failed create keeps the form and skips the refetch
            (MutationKind::Create, false) => {
                self.enter(Phase::Idle);
                Vec::new()
            }
            (MutationKind::Create, true) => {
                self.add_form = GoalDraft::default();
                self.enter(Phase::RefetchPending);
                vec![Effect::Fetch]
            }
            (MutationKind::Update | MutationKind::Delete, _) => {
                self.dialog = Dialog::Closed;
                self.enter(Phase::RefetchPending);
                vec![Effect::Fetch]
            }
        }
    }

    fn complete_fetch(&mut self, result: Result<Vec<Goal>, StoreError>) {
        match result {
            Ok(goals) => {
                debug!(goals = goals.len(), "goal list replaced");
                self.goals = goals;
                if self.notice == Some(Notice::FetchFailed) {
                    self.notice = None;
                }
            }
            Err(err) => {
                warn!(error = %err, "keeping previous goal list");
                // a failed write already explains itself
                if self.notice.is_none() {
                    self.notice = Some(Notice::FetchFailed);
                }
            }
        }
        if self.phase == Phase::RefetchPending {
            self.enter(Phase::Idle);
        }
    }

    fn enter(&mut self, to: Phase) {
        match validate_transition(self.phase, to) {
            Ok(()) => {
                debug!(from = ?self.phase, ?to, "phase change");
                self.phase = to;
            }
            Err(err) => warn!(error = %err, "phase change refused"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalboard_model::RowIndex;
    use goalboard_store::TransportError;
    use goalboard_test_utils::{sample_draft, sample_goal};
    use pretty_assertions::assert_eq;

    fn offline() -> StoreError {
        StoreError::Transport(TransportError::Network("offline".to_string()))
    }

    fn with_draft(draft: &GoalDraft) -> Session {
        let mut session = Session::new();
        for field in Field::ALL {
            session.apply(Event::SetAddField(field, draft.get(field).to_string()));
        }
        session
    }

    #[test]
    fn load_requests_fetch() {
        assert_eq!(Session::new().apply(Event::Load), vec![Effect::Fetch]);
    }

    #[test]
    fn valid_add_dispatches_create() {
        let mut session = with_draft(&sample_draft());
        let effects = session.apply(Event::SubmitAdd);

        let expected = Mutation::create(&sample_draft()).unwrap();
        assert_eq!(effects, vec![Effect::Dispatch(expected)]);
        assert_eq!(session.phase(), Phase::Submitting);
        assert!(session.is_busy());
    }

    #[test]
    fn missing_category_raises_notice_only() {
        let mut session = with_draft(&sample_draft().with(Field::Category, ""));
        let effects = session.apply(Event::SubmitAdd);

        assert!(effects.is_empty());
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.notice(), Some(Notice::MissingFields));
    }

    #[test]
    fn create_success_clears_form_and_refetches() {
        let mut session = with_draft(&sample_draft());
        session.apply(Event::SubmitAdd);

        let effects = session.apply(Event::MutationCompleted {
            kind: MutationKind::Create,
            result: Ok(()),
        });
        assert_eq!(effects, vec![Effect::Fetch]);
        assert_eq!(session.add_form(), &GoalDraft::default());
        assert_eq!(session.phase(), Phase::RefetchPending);

        session.apply(Event::FetchCompleted(Ok(vec![sample_goal(2)])));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.goals(), &[sample_goal(2)]);
    }

    #[test]
    fn create_failure_keeps_form_and_skips_refetch() {
        let mut session = with_draft(&sample_draft());
        session.apply(Event::SubmitAdd);

        let effects = session.apply(Event::MutationCompleted {
            kind: MutationKind::Create,
            result: Err(offline()),
        });
        assert!(effects.is_empty());
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.add_form(), &sample_draft());
        assert_eq!(session.notice(), Some(Notice::SaveFailed));
    }

    #[test]
    fn submits_ignored_while_busy() {
        let mut session = with_draft(&sample_draft());
        session.apply(Event::OpenEdit(sample_goal(4)));
        session.apply(Event::SubmitAdd);

        assert!(session.apply(Event::SubmitAdd).is_empty());
        assert!(session.apply(Event::SubmitEdit).is_empty());
        assert!(session.apply(Event::Delete).is_empty());
        assert_eq!(session.phase(), Phase::Submitting);
    }

    #[test]
    fn edit_activation_copies_goal_and_row() {
        let mut session = Session::new();
        session.apply(Event::OpenEdit(sample_goal(5)));

        assert_eq!(session.dialog(), Dialog::Open);
        assert_eq!(session.edit_form().row_index, RowIndex::number(5));
        assert_eq!(session.edit_form().draft.get(Field::EndValue), "100");
    }

    #[test]
    fn update_closes_dialog_and_refetches_even_on_failure() {
        let mut session = Session::new();
        session.apply(Event::OpenEdit(sample_goal(3)));
        session.apply(Event::SetEditField(Field::CurrentValue, "50".to_string()));
        let effects = session.apply(Event::SubmitEdit);
        assert!(matches!(effects.as_slice(), [Effect::Dispatch(Mutation::Update { .. })]));

        let effects = session.apply(Event::MutationCompleted {
            kind: MutationKind::Update,
            result: Err(offline()),
        });
        assert_eq!(effects, vec![Effect::Fetch]);
        assert_eq!(session.dialog(), Dialog::Closed);
        assert_eq!(session.notice(), Some(Notice::UpdateFailed));
    }

    #[test]
    fn update_without_row_is_invalid() {
        let mut session = Session::new();
        session.apply(Event::OpenEdit(sample_goal(0)));

        assert!(session.apply(Event::SubmitEdit).is_empty());
        assert_eq!(session.notice(), Some(Notice::MissingFields));
        assert_eq!(session.dialog(), Dialog::Open);
    }

    #[test]
    fn delete_without_row_is_refused() {
        let mut session = Session::new();
        session.apply(Event::OpenEdit(sample_goal(0)));

        assert!(session.apply(Event::Delete).is_empty());
        assert_eq!(session.notice(), Some(Notice::CannotDelete));
    }

    #[test]
    fn delete_dispatches_row() {
        let mut session = Session::new();
        session.apply(Event::OpenEdit(sample_goal(7)));
        let effects = session.apply(Event::Delete);

        let expected = Mutation::delete(RowIndex::number(7).as_ref()).unwrap();
        assert_eq!(effects, vec![Effect::Dispatch(expected)]);
    }

    #[test]
    fn close_dialog_keeps_edit_form() {
        let mut session = Session::new();
        session.apply(Event::OpenEdit(sample_goal(3)));
        session.apply(Event::SetEditField(Field::Description, "Walk".to_string()));

        assert!(session.apply(Event::CloseDialog).is_empty());
        assert_eq!(session.dialog(), Dialog::Closed);
        assert_eq!(session.edit_form().draft.get(Field::Description), "Walk");
    }

    #[test]
    fn failed_fetch_keeps_goals() {
        let mut session = Session::new();
        session.apply(Event::FetchCompleted(Ok(vec![sample_goal(2)])));
        session.apply(Event::FetchCompleted(Err(StoreError::MalformedResponse(
            "not an array".to_string(),
        ))));

        assert_eq!(session.goals(), &[sample_goal(2)]);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.notice(), Some(Notice::FetchFailed));

        session.apply(Event::FetchCompleted(Ok(vec![sample_goal(3)])));
        assert_eq!(session.notice(), None);
    }

    #[test]
    fn refetch_failure_after_create_raises_notice() {
        let mut session = with_draft(&sample_draft());
        session.apply(Event::SubmitAdd);
        session.apply(Event::MutationCompleted {
            kind: MutationKind::Create,
            result: Ok(()),
        });
        session.apply(Event::FetchCompleted(Err(offline())));

        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.goals().is_empty());
        assert_eq!(session.notice(), Some(Notice::FetchFailed));
    }

    #[test]
    fn refetch_failure_keeps_write_notice() {
        let mut session = Session::new();
        session.apply(Event::OpenEdit(sample_goal(3)));
        session.apply(Event::SubmitEdit);
        session.apply(Event::MutationCompleted {
            kind: MutationKind::Update,
            result: Err(offline()),
        });
        session.apply(Event::FetchCompleted(Err(offline())));

        assert_eq!(session.notice(), Some(Notice::UpdateFailed));
    }

    #[test]
    fn unparsable_field_keeps_its_detail() {
        let mut session = with_draft(&sample_draft().with(Field::Units, "km"));
        assert!(session.apply(Event::SubmitAdd).is_empty());
        assert_eq!(
            session.notice(),
            Some(Notice::Invalid(ValidationError::InvalidUnits("km".to_string())))
        );

        session.apply(Event::SetAddField(Field::Units, "mi".to_string()));
        session.apply(Event::SetAddField(Field::EndValue, "ten".to_string()));
        session.apply(Event::SubmitAdd);
        let notice = session.notice().unwrap();
        assert_eq!(notice.to_string(), "endValue is not a number: \"ten\"");
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn stray_completion_is_ignored() {
        let mut session = Session::new();
        let effects = session.apply(Event::MutationCompleted {
            kind: MutationKind::Delete,
            result: Ok(()),
        });
        assert!(effects.is_empty());
        assert_eq!(session, Session::new());
    }

    #[test]
    fn notice_messages() {
        assert_eq!(Notice::MissingFields.to_string(), "Please fill out all required fields.");
        assert_eq!(Notice::delivery_failed(MutationKind::Delete), Notice::DeleteFailed);
        assert_eq!(Notice::CannotDelete.message(), "Cannot delete this entry.");
        assert_eq!(Notice::FetchFailed.to_string(), "Something went wrong while loading goals.");
    }
}
