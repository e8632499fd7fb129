//! Column catalog and the user's persisted column layout

use super::item::{ApprovalItem, ItemField};
use crate::services::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Storage key of the persisted layout
pub const COLUMN_STORAGE_KEY: &str = "COLUMN_STORAGE_NAME";

/// How a column's cells are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Href field shown by its display name
    Link,
    Text,
    Date,
    Boolean,
}

/// A column the table knows how to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub field: ItemField,
    pub kind: ColumnKind,
    pub width: u16,
    pub default_include: bool,
}

impl ColumnSpec {
    pub fn cell_text<'a>(&self, item: &'a ApprovalItem) -> Cow<'a, str> {
        match self.kind {
            ColumnKind::Link => item.text(self.field.sort_field()),
            ColumnKind::Text | ColumnKind::Date => item.text(self.field),
            ColumnKind::Boolean => {
                if item.text(self.field) == "true" {
                    Cow::Borrowed("✓")
                } else {
                    Cow::Borrowed("")
                }
            }
        }
    }
}

/// Every column that can be shown, in default order
pub static CATALOG: [ColumnSpec; 7] = [
    ColumnSpec {
        label: "Related To",
        field: ItemField::RelatedToHref,
        kind: ColumnKind::Link,
        width: 28,
        default_include: true,
    },
    ColumnSpec {
        label: "Type",
        field: ItemField::SobjectType,
        kind: ColumnKind::Text,
        width: 18,
        default_include: true,
    },
    ColumnSpec {
        label: "Most Recent Approver",
        field: ItemField::MostRecentApproverHref,
        kind: ColumnKind::Link,
        width: 22,
        default_include: true,
    },
    ColumnSpec {
        label: "Date Submitted",
        field: ItemField::DateSubmitted,
        kind: ColumnKind::Date,
        width: 14,
        default_include: true,
    },
    ColumnSpec {
        label: "Submitted By",
        field: ItemField::SubmittedByHref,
        kind: ColumnKind::Link,
        width: 20,
        default_include: false,
    },
    ColumnSpec {
        label: "Assigned By",
        field: ItemField::AssignedHref,
        kind: ColumnKind::Link,
        width: 20,
        default_include: false,
    },
    ColumnSpec {
        label: "Is Delegated",
        field: ItemField::IsDelegated,
        kind: ColumnKind::Boolean,
        width: 12,
        default_include: true,
    },
];

/// Look up a catalog column by label
pub fn catalog_column(label: &str) -> Option<&'static ColumnSpec> {
    CATALOG.iter().find(|c| c.label == label)
}

/// Row-level decision offered by the actions column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Approve,
    Reject,
}

impl RowAction {
    pub fn all() -> [RowAction; 2] {
        [RowAction::Approve, RowAction::Reject]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Approve => "Approve",
            RowAction::Reject => "Reject",
        }
    }
}

/// A column of the rendered table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedColumn {
    Data(&'static ColumnSpec),
    /// Trailing row-actions column
    Actions,
}

impl RenderedColumn {
    pub fn label(&self) -> &'static str {
        match self {
            RenderedColumn::Data(spec) => spec.label,
            RenderedColumn::Actions => "Actions",
        }
    }

    pub fn spec(&self) -> Option<&'static ColumnSpec> {
        match self {
            RenderedColumn::Data(spec) => Some(spec),
            RenderedColumn::Actions => None,
        }
    }
}

/// One entry of the user's ordered layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPreference {
    pub label: String,
    pub include: bool,
}

/// The user's ordered, persisted projection over [`CATALOG`]
pub struct ColumnLayout {
    columns: Vec<ColumnPreference>,
    storage: Box<dyn KeyValueStore>,
}

impl ColumnLayout {
    /// Create a layout backed by `storage` and load any saved preferences
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        let mut layout = Self {
            columns: Self::default_preferences(),
            storage,
        };
        layout.load();
        layout
    }

    pub fn default_preferences() -> Vec<ColumnPreference> {
        CATALOG
            .iter()
            .map(|c| ColumnPreference {
                label: c.label.to_string(),
                include: c.default_include,
            })
            .collect()
    }

    /// Reload the saved layout, falling back to the defaults when there is
    /// none or it cannot be read
    pub fn load(&mut self) {
        self.columns = self.read_saved().unwrap_or_else(Self::default_preferences);
    }

    fn read_saved(&self) -> Option<Vec<ColumnPreference>> {
        if !self.storage.is_available() {
            return None;
        }
        let value = self.storage.get(COLUMN_STORAGE_KEY)?;
        match serde_json::from_value(value) {
            Ok(columns) => Some(columns),
            Err(e) => {
                tracing::debug!(error = %e, "saved column layout is malformed, using defaults");
                None
            }
        }
    }

    pub fn preferences(&self) -> &[ColumnPreference] {
        &self.columns
    }

    /// Include or exclude the column with `label`. Returns false when no
    /// entry matches.
    pub fn set_include(&mut self, label: &str, included: bool) -> bool {
        let Some(column) = self.columns.iter_mut().find(|c| c.label == label) else {
            return false;
        };
        column.include = included;
        self.persist();
        true
    }

    /// Move the entry at `from_index` to `to_index`. Returns false when
    /// `from_index` is out of range.
    pub fn reorder(&mut self, from_index: usize, to_index: usize) -> bool {
        if from_index >= self.columns.len() {
            tracing::debug!(from_index, len = self.columns.len(), "ignoring out of range column move");
            return false;
        }
        let column = self.columns.remove(from_index);
        let to_index = to_index.min(self.columns.len());
        self.columns.insert(to_index, column);
        self.persist();
        true
    }

    /// Included catalog columns in layout order, then the actions column
    pub fn rendered_columns(&self) -> Vec<RenderedColumn> {
        let mut rendered: Vec<RenderedColumn> = self
            .columns
            .iter()
            .filter(|c| c.include)
            .filter_map(|c| catalog_column(&c.label))
            .map(RenderedColumn::Data)
            .collect();
        rendered.push(RenderedColumn::Actions);
        rendered
    }

    /// Give the backing store back, e.g. to reopen the layout from it
    #[cfg(test)]
    pub fn into_storage(self) -> Box<dyn KeyValueStore> {
        self.storage
    }

    fn persist(&mut self) {
        let value = match serde_json::to_value(&self.columns) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize column layout");
                return;
            }
        };
        if let Err(e) = self.storage.set(COLUMN_STORAGE_KEY, &value) {
            tracing::warn!(error = %e, "could not save column layout");
        }
    }
}
