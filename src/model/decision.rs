//! Approve/reject decision flow
//!
//! A decision moves `Idle → AwaitingAction → Submitting → Idle`. A failed
//! submission returns to `AwaitingAction` with the entered comments intact so
//! the user can retry or cancel.

use super::item::ApprovalItem;
use thiserror::Error;

/// Which decision the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    Approve,
    Reject,
}

impl DecisionKind {
    /// Parse a row or bulk action name (`approve`, `approveAll`, `reject`, `rejectAll`)
    pub fn parse(action: &str) -> Option<DecisionKind> {
        match action {
            "approve" | "approveAll" => Some(DecisionKind::Approve),
            "reject" | "rejectAll" => Some(DecisionKind::Reject),
            _ => None,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            DecisionKind::Approve => "Approve",
            DecisionKind::Reject => "Reject",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            DecisionKind::Approve => "approved",
            DecisionKind::Reject => "rejected",
        }
    }

    pub fn is_approve(&self) -> bool {
        matches!(self, DecisionKind::Approve)
    }
}

/// The parts of an item a decision needs after the list has moved on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionTarget {
    pub work_item_id: String,
    pub sobject_type: String,
    pub is_delegated: bool,
}

impl From<&ApprovalItem> for DecisionTarget {
    fn from(item: &ApprovalItem) -> Self {
        Self {
            work_item_id: item.work_item_id.clone(),
            sobject_type: item.sobject_type.clone(),
            is_delegated: item.is_delegated,
        }
    }
}

/// A decision being composed in the dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDecision {
    pub kind: DecisionKind,
    pub targets: Vec<DecisionTarget>,
    pub comments: String,
    /// Validation message shown under the comments field
    pub comments_error: Option<String>,
    /// Opened from a row action rather than the bulk buttons
    pub single_row: bool,
}

impl PendingDecision {
    /// "Approve Account" for a row action, "Approve Items" for a bulk one
    pub fn title(&self) -> String {
        match (self.single_row, self.targets.first()) {
            (true, Some(target)) if !target.sobject_type.is_empty() => {
                format!("{} {}", self.kind.verb(), target.sobject_type)
            }
            _ => format!("{} Items", self.kind.verb()),
        }
    }

    /// Delegated targets that must be shared with the user before deciding
    pub fn delegated_ids(&self) -> Vec<String> {
        self.targets
            .iter()
            .filter(|t| t.is_delegated)
            .map(|t| t.work_item_id.clone())
            .collect()
    }
}

/// What to send to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub work_item_ids: Vec<String>,
    pub approve: bool,
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DecisionState {
    #[default]
    Idle,
    AwaitingAction(PendingDecision),
    Submitting(PendingDecision),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("a decision is already open")]
    AlreadyOpen,
    #[error("a decision is already being submitted")]
    InFlight,
    #[error("no decision is open")]
    NotOpen,
    #[error("nothing to decide on")]
    NoTargets,
    #[error("Comments are required")]
    CommentsRequired,
}

impl DecisionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DecisionState::Idle)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, DecisionState::Submitting(_))
    }

    pub fn pending(&self) -> Option<&PendingDecision> {
        match self {
            DecisionState::Idle => None,
            DecisionState::AwaitingAction(p) | DecisionState::Submitting(p) => Some(p),
        }
    }

    /// Open the dialog for `targets`
    pub fn open(
        &mut self,
        kind: DecisionKind,
        targets: Vec<DecisionTarget>,
        single_row: bool,
    ) -> Result<&PendingDecision, DecisionError> {
        match self {
            DecisionState::Idle => {}
            DecisionState::AwaitingAction(_) => return Err(DecisionError::AlreadyOpen),
            DecisionState::Submitting(_) => return Err(DecisionError::InFlight),
        }
        if targets.is_empty() {
            return Err(DecisionError::NoTargets);
        }

        *self = DecisionState::AwaitingAction(PendingDecision {
            kind,
            targets,
            comments: String::new(),
            comments_error: None,
            single_row,
        });
        self.pending().ok_or(DecisionError::NotOpen)
    }

    /// Close the dialog without submitting. Ignored while in flight.
    pub fn cancel(&mut self) -> Result<(), DecisionError> {
        match self {
            DecisionState::AwaitingAction(_) => {
                *self = DecisionState::Idle;
                Ok(())
            }
            DecisionState::Submitting(_) => Err(DecisionError::InFlight),
            DecisionState::Idle => Err(DecisionError::NotOpen),
        }
    }

    pub fn push_comment_char(&mut self, c: char) {
        if let DecisionState::AwaitingAction(pending) = self {
            pending.comments.push(c);
            pending.comments_error = None;
        }
    }

    pub fn pop_comment_char(&mut self) {
        if let DecisionState::AwaitingAction(pending) = self {
            pending.comments.pop();
        }
    }

    /// Validate the comments and move to `Submitting`.
    ///
    /// Blank comments are rejected when `require_comments` is set; the
    /// dialog stays open with a validation message.
    pub fn submit(&mut self, require_comments: bool) -> Result<Submission, DecisionError> {
        let pending = match self {
            DecisionState::AwaitingAction(pending) => pending,
            DecisionState::Submitting(_) => return Err(DecisionError::InFlight),
            DecisionState::Idle => return Err(DecisionError::NotOpen),
        };

        let comments = pending.comments.trim().to_string();
        if require_comments && comments.is_empty() {
            pending.comments_error = Some(DecisionError::CommentsRequired.to_string());
            return Err(DecisionError::CommentsRequired);
        }
        pending.comments_error = None;

        let submission = Submission {
            work_item_ids: pending.targets.iter().map(|t| t.work_item_id.clone()).collect(),
            approve: pending.kind.is_approve(),
            comments,
        };

        let pending = pending.clone();
        *self = DecisionState::Submitting(pending);
        Ok(submission)
    }

    /// Finish an in-flight submission.
    ///
    /// Success closes the dialog and hands back the decided request; failure
    /// reopens it for another attempt.
    pub fn complete(&mut self, succeeded: bool) -> Option<PendingDecision> {
        if !self.is_submitting() {
            return None;
        }
        let DecisionState::Submitting(pending) = std::mem::take(self) else {
            return None;
        };
        if succeeded {
            Some(pending)
        } else {
            *self = DecisionState::AwaitingAction(pending.clone());
            Some(pending)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: &str, sobject_type: &str, delegated: bool) -> DecisionTarget {
        DecisionTarget {
            work_item_id: id.to_string(),
            sobject_type: sobject_type.to_string(),
            is_delegated: delegated,
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(DecisionKind::parse("approve"), Some(DecisionKind::Approve));
        assert_eq!(DecisionKind::parse("approveAll"), Some(DecisionKind::Approve));
        assert_eq!(DecisionKind::parse("rejectAll"), Some(DecisionKind::Reject));
        assert_eq!(DecisionKind::parse("reassign"), None);
    }

    #[test]
    fn test_titles() {
        let mut state = DecisionState::default();
        let pending = state
            .open(DecisionKind::Approve, vec![target("a", "Account", false)], true)
            .unwrap();
        assert_eq!(pending.title(), "Approve Account");

        state.cancel().unwrap();
        let pending = state
            .open(
                DecisionKind::Reject,
                vec![target("a", "Account", false), target("b", "Case", false)],
                false,
            )
            .unwrap();
        assert_eq!(pending.title(), "Reject Items");
    }

    #[test]
    fn test_open_twice_is_rejected() {
        let mut state = DecisionState::default();
        state
            .open(DecisionKind::Approve, vec![target("a", "Account", false)], true)
            .unwrap();
        assert_eq!(
            state.open(DecisionKind::Reject, vec![target("b", "Case", false)], true),
            Err(DecisionError::AlreadyOpen)
        );
    }

    #[test]
    fn test_open_without_targets() {
        let mut state = DecisionState::default();
        assert_eq!(
            state.open(DecisionKind::Approve, Vec::new(), false),
            Err(DecisionError::NoTargets)
        );
        assert!(state.is_idle());
    }

    #[test]
    fn test_required_comments_block_submission() {
        let mut state = DecisionState::default();
        state
            .open(DecisionKind::Approve, vec![target("a", "Account", false)], true)
            .unwrap();
        state.push_comment_char(' ');

        assert_eq!(state.submit(true), Err(DecisionError::CommentsRequired));
        let pending = state.pending().unwrap();
        assert_eq!(pending.comments_error.as_deref(), Some("Comments are required"));
        assert!(!state.is_submitting());

        state.push_comment_char('o');
        state.push_comment_char('k');
        assert!(state.pending().unwrap().comments_error.is_none());
        let submission = state.submit(true).unwrap();
        assert_eq!(submission.comments, "ok");
        assert!(submission.approve);
        assert!(state.is_submitting());
    }

    #[test]
    fn test_blank_comments_allowed_when_not_required() {
        let mut state = DecisionState::default();
        state
            .open(
                DecisionKind::Reject,
                vec![target("a", "Account", false), target("b", "Case", false)],
                false,
            )
            .unwrap();

        let submission = state.submit(false).unwrap();
        assert_eq!(submission.work_item_ids, vec!["a", "b"]);
        assert!(!submission.approve);
        assert_eq!(submission.comments, "");
    }

    #[test]
    fn test_in_flight_guard() {
        let mut state = DecisionState::default();
        state
            .open(DecisionKind::Approve, vec![target("a", "Account", false)], true)
            .unwrap();
        state.submit(false).unwrap();

        assert_eq!(state.submit(false), Err(DecisionError::InFlight));
        assert_eq!(state.cancel(), Err(DecisionError::InFlight));
        state.push_comment_char('x');
        assert_eq!(state.pending().unwrap().comments, "");
    }

    #[test]
    fn test_failed_submission_reopens_dialog() {
        let mut state = DecisionState::default();
        state
            .open(DecisionKind::Approve, vec![target("a", "Account", false)], true)
            .unwrap();
        state.push_comment_char('y');
        state.submit(false).unwrap();

        let pending = state.complete(false).unwrap();
        assert_eq!(pending.comments, "y");
        assert!(matches!(state, DecisionState::AwaitingAction(_)));

        state.submit(false).unwrap();
        assert!(state.complete(true).is_some());
        assert!(state.is_idle());
        assert!(state.complete(true).is_none());
    }

    #[test]
    fn test_delegated_ids() {
        let mut state = DecisionState::default();
        let pending = state
            .open(
                DecisionKind::Approve,
                vec![target("a", "Account", true), target("b", "Case", false)],
                false,
            )
            .unwrap();
        assert_eq!(pending.delegated_ids(), vec!["a"]);
    }
}
