//! Help dialog component
//!
//! Displays all keyboard shortcuts available in the application.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
    /// Whether the bulk approve/reject shortcuts apply
    pub bulk_enabled: bool,
}

impl HelpDialog {
    /// Reset scrolling when the dialog is reopened
    pub fn open(&mut self, bulk_enabled: bool) {
        self.scroll_offset = 0;
        self.bulk_enabled = bulk_enabled;
    }
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = centered_popup(area, 64, area.height.saturating_sub(4));
        frame.render_widget(Clear, dialog_area);

        let content = build_help_content(self.bulk_enabled);
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        // Render scrollbar if content exceeds visible area
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Build the help content; bulk shortcuts are listed only when enabled
fn build_help_content(bulk_enabled: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Helper to add a section header
    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    // Helper to add a shortcut line
    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:12}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Navigation");
    add_shortcut(&mut lines, "j / ↓", "Move to next item");
    add_shortcut(&mut lines, "k / ↑", "Move to previous item");
    add_shortcut(&mut lines, "g / G", "Jump to first / last item");
    add_shortcut(&mut lines, "l / Tab", "Focus next column");
    add_shortcut(&mut lines, "h / S-Tab", "Focus previous column");
    add_shortcut(&mut lines, "s", "Sort by focused column (again to reverse)");

    add_section(&mut lines, "Decisions");
    add_shortcut(&mut lines, "a", "Approve focused item");
    add_shortcut(&mut lines, "x", "Reject focused item");
    if bulk_enabled {
        add_shortcut(&mut lines, "A", "Approve selected items");
        add_shortcut(&mut lines, "X", "Reject selected items");
    }
    add_shortcut(&mut lines, "Enter", "Submit (in dialog)");
    add_shortcut(&mut lines, "Esc", "Cancel (in dialog)");

    if bulk_enabled {
        add_section(&mut lines, "Multi-Select");
        add_shortcut(&mut lines, "Space", "Toggle item selection");
        add_shortcut(&mut lines, "Ctrl+a", "Select all visible items");
        add_shortcut(&mut lines, "Esc", "Clear selection");
    }

    add_section(&mut lines, "Search & Filters");
    add_shortcut(&mut lines, "/", "Search name, type, approver, date");
    add_shortcut(&mut lines, "Esc / Enter", "Leave search mode");
    add_shortcut(&mut lines, "f", "Toggle filter panel");
    add_shortcut(&mut lines, "c", "Toggle column panel");
    add_shortcut(&mut lines, "J / K", "Move column (in column panel)");

    add_section(&mut lines, "Links");
    add_shortcut(&mut lines, "Enter", "Open record in browser");
    add_shortcut(&mut lines, "o", "Open all work items");

    add_section(&mut lines, "General");
    add_shortcut(&mut lines, "r", "Refresh items");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit / Close dialog");

    // Footer
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_bulk_shortcuts_follow_setting() {
        let with_bulk = text(&build_help_content(true));
        assert!(with_bulk.contains("Approve selected items"));
        assert!(with_bulk.contains("Multi-Select"));

        let without_bulk = text(&build_help_content(false));
        assert!(!without_bulk.contains("Approve selected items"));
        assert!(!without_bulk.contains("Multi-Select"));
    }

    #[test]
    fn test_open_resets_scroll() {
        let mut dialog = HelpDialog::default();
        dialog
            .handle_key_event(KeyEvent::new(KeyCode::PageDown, crossterm::event::KeyModifiers::NONE))
            .unwrap();
        assert_eq!(dialog.scroll_offset, 10);
        dialog.open(true);
        assert_eq!(dialog.scroll_offset, 0);
    }
}
