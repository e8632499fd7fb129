//! Column chooser side panel

use crate::action::Action;
use crate::component::Component;
use crate::model::columns::{ColumnLayout, ColumnPreference};
use crate::model::ui::SidePanel;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

/// Column panel state
///
/// Keeps a copy of the layout's preferences so key handling can name the
/// focused label; the App re-syncs it after every change.
pub struct ColumnPanel {
    preferences: Vec<ColumnPreference>,
    selected_index: usize,
    list_state: ListState,
}

impl Default for ColumnPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnPanel {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            preferences: Vec::new(),
            selected_index: 0,
            list_state,
        }
    }

    pub fn sync(&mut self, layout: &ColumnLayout) {
        self.preferences = layout.preferences().to_vec();
        if self.selected_index >= self.preferences.len() {
            self.selected_index = self.preferences.len().saturating_sub(1);
        }
        self.list_state.select(Some(self.selected_index));
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    fn select(&mut self, index: usize) {
        self.selected_index = index;
        self.list_state.select(Some(index));
    }

    /// Move the focused column by one slot; the cursor follows it
    fn move_focused(&mut self, down: bool) -> Option<Action> {
        let from = self.selected_index;
        let to = if down {
            (from + 1 < self.preferences.len()).then_some(from + 1)?
        } else {
            from.checked_sub(1)?
        };
        self.select(to);
        Some(Action::MoveColumn { from, to })
    }

    pub fn draw_with_layout(&mut self, frame: &mut Frame, area: Rect, layout: &ColumnLayout) -> Result<()> {
        frame.render_widget(Clear, area);

        let items: Vec<ListItem> = layout
            .preferences()
            .iter()
            .map(|column| {
                let (check, color) = if column.include {
                    ("[x] ", Color::Green)
                } else {
                    ("[ ] ", Color::DarkGray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(check, Style::default().fg(color)),
                    Span::raw(column.label.clone()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", SidePanel::Columns.title()))
                    .title_bottom(Line::from(" Space toggle  J/K move ").centered())
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )
                    .border_style(Style::default().fg(Color::Magenta)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
        Ok(())
    }
}

impl Component for ColumnPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('c') => Some(Action::ClosePanel),
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected_index > 0 {
                    self.select(self.selected_index - 1);
                }
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_index + 1 < self.preferences.len() {
                    self.select(self.selected_index + 1);
                }
                None
            }
            KeyCode::Char('K') => self.move_focused(false),
            KeyCode::Char('J') => self.move_focused(true),
            KeyCode::Enter | KeyCode::Char(' ') => self
                .preferences
                .get(self.selected_index)
                .map(|c| Action::SetColumnIncluded(c.label.clone(), !c.include)),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawn through draw_with_layout
        Ok(())
    }
}
