//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod column_panel;
pub mod decision_dialog;
pub mod filter_panel;
pub mod help_dialog;
pub mod home;
pub mod layout;
pub mod quit_dialog;

pub use column_panel::ColumnPanel;
pub use decision_dialog::DecisionDialog;
pub use filter_panel::FilterPanel;
pub use help_dialog::HelpDialog;
pub use home::{draw_home_screen, HomeComponent, HomeRenderContext};
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
