//! Filter and sort parameters for the item list

/// Wire value of the "all types" sentinel
pub const VIEW_ALL: &str = "View All";

/// Which items to show, by how they reached the current user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewOption {
    #[default]
    ShowAll,
    ShowDelegatedToMe,
    ShowAssignedToMe,
}

impl ViewOption {
    pub fn all() -> [ViewOption; 3] {
        [
            ViewOption::ShowAll,
            ViewOption::ShowDelegatedToMe,
            ViewOption::ShowAssignedToMe,
        ]
    }

    /// Parse a wire value; anything unrecognized shows everything
    pub fn from_value(value: &str) -> ViewOption {
        match value {
            "showDelegatedToMe" => ViewOption::ShowDelegatedToMe,
            "showAssignedToMe" => ViewOption::ShowAssignedToMe,
            _ => ViewOption::ShowAll,
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            ViewOption::ShowAll => "showAll",
            ViewOption::ShowDelegatedToMe => "showDelegatedToMe",
            ViewOption::ShowAssignedToMe => "showAssignedToMe",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewOption::ShowAll => "Show All Items To Approve",
            ViewOption::ShowDelegatedToMe => "Show Items Delegated To Me",
            ViewOption::ShowAssignedToMe => "Show Items Assigned To Me",
        }
    }

    pub fn keeps(&self, is_delegated: bool) -> bool {
        match self {
            ViewOption::ShowAll => true,
            ViewOption::ShowDelegatedToMe => is_delegated,
            ViewOption::ShowAssignedToMe => !is_delegated,
        }
    }

    /// Cycle to the next option (wraps)
    pub fn next(&self) -> ViewOption {
        let all = Self::all();
        let idx = all.iter().position(|v| v == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Cycle to the previous option (wraps)
    pub fn previous(&self) -> ViewOption {
        let all = Self::all();
        let idx = all.iter().position(|v| v == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

/// Restriction on `sobjectType`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SobjectTypeFilter {
    #[default]
    All,
    Only(String),
}

impl SobjectTypeFilter {
    pub fn from_value(value: &str) -> SobjectTypeFilter {
        if value == VIEW_ALL {
            SobjectTypeFilter::All
        } else {
            SobjectTypeFilter::Only(value.to_string())
        }
    }

    pub fn value(&self) -> &str {
        match self {
            SobjectTypeFilter::All => VIEW_ALL,
            SobjectTypeFilter::Only(t) => t,
        }
    }

    pub fn keeps(&self, sobject_type: &str) -> bool {
        match self {
            SobjectTypeFilter::All => true,
            SobjectTypeFilter::Only(t) => t == sobject_type,
        }
    }
}

/// A label/value pair for a picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `"asc"` is ascending; every other value is descending
    pub fn parse(value: &str) -> SortDirection {
        if value == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn toggled(&self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// The sort most recently applied to the derived view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    /// Field name as requested (before href → name redirection)
    pub field_name: String,
    pub direction: SortDirection,
    /// Column label for the sort indicator
    pub label: String,
}

/// Transient filter parameters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub view_option: ViewOption,
    pub text_query: String,
    pub sobject_type_filter: SobjectTypeFilter,
}
