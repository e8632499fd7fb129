//! UI state - presentation state separate from domain data

/// Number of ticks a success notification stays on screen
pub const SUCCESS_NOTIFICATION_TICKS: u16 = 30;

/// Side panels next to the item list. At most one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidePanel {
    Filters,
    Columns,
}

impl SidePanel {
    pub fn title(&self) -> &'static str {
        match self {
            SidePanel::Filters => "Filters",
            SidePanel::Columns => "Columns",
        }
    }

    /// Panel state after asking to toggle `self` while `current` is open
    pub fn toggle(self, current: Option<SidePanel>) -> Option<SidePanel> {
        if current == Some(self) {
            None
        } else {
            Some(self)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Message shown in the status bar after a backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Remaining ticks before auto-dismiss; errors are sticky
    ticks_left: Option<u16>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            ticks_left: Some(SUCCESS_NOTIFICATION_TICKS),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
            ticks_left: None,
        }
    }

    /// Advance one tick; returns false once the notification has expired
    pub fn tick(&mut self) -> bool {
        match self.ticks_left.as_mut() {
            Some(0) => false,
            Some(left) => {
                *left -= 1;
                *left > 0
            }
            None => true,
        }
    }
}
