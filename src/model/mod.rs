//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `ApprovalItem` - One pending approval request
//! - `ItemListStore` - Raw items, filter, sort and selection
//! - `ColumnLayout` - Persisted column order and visibility
//! - `DecisionState` - Approve/reject dialog state machine
//! - `ModalStack` - Modal overlay management

pub mod columns;
pub mod decision;
pub mod filter;
pub mod item;
pub mod modal;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use columns::{ColumnLayout, RenderedColumn, RowAction};
pub use decision::{DecisionKind, DecisionState, DecisionTarget};
pub use filter::{SobjectTypeFilter, SortDirection, ViewOption};
pub use item::ApprovalItem;
pub use store::ItemListStore;
pub use ui::{Notification, NotificationKind, SidePanel};
