//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::decision::DecisionKind;
use crate::model::filter::ViewOption;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for polling jobs and expiring notifications
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    NextItem,
    PrevItem,
    FirstItem,
    LastItem,
    /// Focus the next column (sort target)
    NextColumn,
    PrevColumn,

    // ─────────────────────────────────────────────────────────────────────────
    // Sorting
    // ─────────────────────────────────────────────────────────────────────────
    /// Sort by the focused column, toggling direction if already sorted by it
    SortByFocusedColumn,

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────
    /// Toggle selection of the focused row
    ToggleSelection,
    /// Select every row of the derived view
    SelectAllVisible,
    ClearSelection,

    // ─────────────────────────────────────────────────────────────────────────
    // Side Panels
    // ─────────────────────────────────────────────────────────────────────────
    ToggleFilterPanel,
    ToggleColumnPanel,
    ClosePanel,
    SetViewOption(ViewOption),
    SetSobjectType(String),
    /// Show or hide a column by label
    SetColumnIncluded(String, bool),
    /// Move a column from one position to another
    MoveColumn { from: usize, to: usize },

    // ─────────────────────────────────────────────────────────────────────────
    // Decisions
    // ─────────────────────────────────────────────────────────────────────────
    /// Approve/reject the focused row
    OpenRowDecision(DecisionKind),
    /// Approve/reject every selected row
    OpenBulkDecision(DecisionKind),
    CommentInput(char),
    CommentBackspace,
    SubmitDecision,
    CancelDecision,

    // ─────────────────────────────────────────────────────────────────────────
    // Links
    // ─────────────────────────────────────────────────────────────────────────
    /// Open the focused row's record in the browser
    OpenRecord,
    /// Open the platform's standard work item list view
    OpenListView,

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────
    Refresh,
    DismissNotification,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    CloseModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::NextColumn => write!(f, "NextColumn"),
            Action::PrevColumn => write!(f, "PrevColumn"),
            Action::SortByFocusedColumn => write!(f, "SortByFocusedColumn"),
            Action::EnterSearchMode => write!(f, "EnterSearchMode"),
            Action::ExitSearchMode => write!(f, "ExitSearchMode"),
            Action::SearchInput(c) => write!(f, "SearchInput('{}')", c),
            Action::SearchBackspace => write!(f, "SearchBackspace"),
            Action::ToggleSelection => write!(f, "ToggleSelection"),
            Action::SelectAllVisible => write!(f, "SelectAllVisible"),
            Action::ClearSelection => write!(f, "ClearSelection"),
            Action::ToggleFilterPanel => write!(f, "ToggleFilterPanel"),
            Action::ToggleColumnPanel => write!(f, "ToggleColumnPanel"),
            Action::ClosePanel => write!(f, "ClosePanel"),
            Action::SetViewOption(option) => write!(f, "SetViewOption({})", option.value()),
            Action::SetSobjectType(t) => write!(f, "SetSobjectType({})", t),
            Action::SetColumnIncluded(label, included) => {
                write!(f, "SetColumnIncluded({}, {})", label, included)
            }
            Action::MoveColumn { from, to } => write!(f, "MoveColumn({} -> {})", from, to),
            Action::OpenRowDecision(kind) => write!(f, "OpenRowDecision({})", kind.verb()),
            Action::OpenBulkDecision(kind) => write!(f, "OpenBulkDecision({})", kind.verb()),
            Action::CommentInput(c) => write!(f, "CommentInput('{}')", c),
            Action::CommentBackspace => write!(f, "CommentBackspace"),
            Action::SubmitDecision => write!(f, "SubmitDecision"),
            Action::CancelDecision => write!(f, "CancelDecision"),
            Action::OpenRecord => write!(f, "OpenRecord"),
            Action::OpenListView => write!(f, "OpenListView"),
            Action::Refresh => write!(f, "Refresh"),
            Action::DismissNotification => write!(f, "DismissNotification"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
        }
    }
}
