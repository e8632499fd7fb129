//! Filter side panel
//!
//! Lists the view options followed by the sobject types currently present,
//! so both filters are reachable from one cursor.

use crate::action::Action;
use crate::component::Component;
use crate::model::filter::{FilterState, SelectOption, ViewOption};
use crate::model::store::ItemListStore;
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

/// An entry the cursor can land on
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterEntry {
    View(ViewOption),
    Type(SelectOption),
}

/// Filter panel state
pub struct FilterPanel {
    /// Type options last offered by the store ("View All" first)
    types: Vec<SelectOption>,
    selected_index: usize,
    list_state: ListState,
}

impl Default for FilterPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterPanel {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            types: Vec::new(),
            selected_index: 0,
            list_state,
        }
    }

    /// Refresh the type options after the item set changes
    pub fn set_types(&mut self, types: Vec<SelectOption>) {
        self.types = types;
        if self.selected_index >= self.entry_count() {
            self.selected_index = self.entry_count().saturating_sub(1);
        }
        self.list_state.select(Some(self.selected_index));
    }

    fn entry_count(&self) -> usize {
        ViewOption::all().len() + self.types.len()
    }

    fn entry(&self, index: usize) -> Option<FilterEntry> {
        let views = ViewOption::all();
        if index < views.len() {
            return Some(FilterEntry::View(views[index]));
        }
        self.types
            .get(index - views.len())
            .cloned()
            .map(FilterEntry::Type)
    }

    fn select_next(&mut self) {
        if self.selected_index + 1 < self.entry_count() {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    /// Draw against the store's current filter
    pub fn draw_with_store(&mut self, frame: &mut Frame, area: Rect, store: &ItemListStore) -> Result<()> {
        self.draw_with_filter(frame, area, store.filter())
    }

    fn draw_with_filter(&mut self, frame: &mut Frame, area: Rect, filter: &FilterState) -> Result<()> {
        frame.render_widget(Clear, area);

        let marker = |active: bool| {
            Span::styled(if active { "● " } else { "  " }, Style::default().fg(Color::Green))
        };
        let heading = |text: &'static str| {
            ListItem::new(Line::from(Span::styled(
                text,
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )))
        };

        // Headings are not selectable, so list rows are offset from entries
        let mut items = vec![heading("View")];
        for option in ViewOption::all() {
            items.push(ListItem::new(Line::from(vec![
                marker(filter.view_option == option),
                Span::raw(option.label()),
            ])));
        }
        items.push(heading("Type"));
        for option in &self.types {
            items.push(ListItem::new(Line::from(vec![
                marker(filter.sobject_type_filter.value() == option.value),
                Span::raw(option.label.clone()),
            ])));
        }

        let views = ViewOption::all().len();
        let row = if self.selected_index < views {
            self.selected_index + 1
        } else {
            self.selected_index + 2
        };
        let mut state = self.list_state.clone();
        state.select(Some(row));

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", SidePanel::Filters.title()))
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

        frame.render_stateful_widget(list, area, &mut state);
        Ok(())
    }
}

impl Component for FilterPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('f') => Some(Action::ClosePanel),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.entry(self.selected_index) {
                Some(FilterEntry::View(option)) => Some(Action::SetViewOption(option)),
                Some(FilterEntry::Type(option)) => Some(Action::SetSobjectType(option.value)),
                None => None,
            },
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_with_filter(frame, area, &FilterState::default())
    }
}
