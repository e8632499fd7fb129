//! Home component - Main application screen
//!
//! Displays the item table with its header, status and help bars.
//! Owns cursor, column focus and search-input state; the items themselves
//! live in the `ItemListStore` owned by the App.

use crate::action::Action;
use crate::component::Component;
use crate::components::{calculate_main_layout, ColumnPanel, FilterPanel};
use crate::model::columns::{RenderedColumn, RowAction};
use crate::model::decision::DecisionKind;
use crate::model::filter::SobjectTypeFilter;
use crate::model::store::ItemListStore;
use crate::model::ui::{Notification, NotificationKind, SidePanel};
use crate::model::ColumnLayout;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shown when the backend returned no work items at all
pub const EMPTY_STATE_TEXT: &str = "No approval requests need your attention right now.";

/// Shown when items exist but none pass the filters
pub const NO_MATCHES_TEXT: &str = "No items match the current filters.";

const SELECTION_COLUMN_WIDTH: u16 = 3;
const ACTIONS_COLUMN_WIDTH: u16 = 16;

// ═══════════════════════════════════════════════════════════════════════════════
// Home Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Home component for the main application view
pub struct HomeComponent {
    /// Row cursor into the derived view
    pub table_state: TableState,

    /// Index of the focused data column (sort target)
    pub focused_column: usize,

    /// Whether search mode is active
    pub search_mode: bool,
}

impl Default for HomeComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeComponent {
    pub fn new() -> Self {
        Self {
            table_state: TableState::default(),
            focused_column: 0,
            search_mode: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn cursor(&self) -> Option<usize> {
        self.table_state.selected()
    }

    /// Move to the next row, wrapping to the first
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let next = match self.cursor() {
            Some(idx) if idx + 1 < len => idx + 1,
            _ => 0,
        };
        self.table_state.select(Some(next));
    }

    /// Move to the previous row, wrapping to the last
    pub fn previous(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let prev = match self.cursor() {
            Some(idx) if idx > 0 && idx < len => idx - 1,
            _ => len - 1,
        };
        self.table_state.select(Some(prev));
    }

    pub fn select_first(&mut self, len: usize) {
        self.table_state.select(if len == 0 { None } else { Some(0) });
    }

    pub fn select_last(&mut self, len: usize) {
        self.table_state.select(len.checked_sub(1));
    }

    /// Keep the cursor inside a view of `len` rows
    pub fn clamp(&mut self, len: usize) {
        match self.cursor() {
            _ if len == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(idx) if idx >= len => self.table_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    pub fn next_column(&mut self, data_columns: usize) {
        if data_columns > 0 {
            self.focused_column = (self.focused_column + 1) % data_columns;
        }
    }

    pub fn previous_column(&mut self, data_columns: usize) {
        if data_columns > 0 {
            self.focused_column = (self.focused_column + data_columns - 1) % data_columns;
        }
    }

    pub fn clamp_column(&mut self, data_columns: usize) {
        if self.focused_column >= data_columns {
            self.focused_column = data_columns.saturating_sub(1);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
    }

    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
    }

    /// Keys while typing a search query
    pub fn handle_search_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::ExitSearchMode),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search_mode {
            return Ok(self.handle_search_key_event(key));
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            // Navigation
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstItem),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastItem),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(Action::NextColumn),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => Some(Action::PrevColumn),

            // Sorting
            KeyCode::Char('s') => Some(Action::SortByFocusedColumn),

            // Selection
            KeyCode::Char('a') if ctrl => Some(Action::SelectAllVisible),
            KeyCode::Char(' ') => Some(Action::ToggleSelection),
            KeyCode::Esc => Some(Action::ClearSelection),

            // Decisions
            KeyCode::Char('a') => Some(Action::OpenRowDecision(DecisionKind::Approve)),
            KeyCode::Char('x') => Some(Action::OpenRowDecision(DecisionKind::Reject)),
            KeyCode::Char('A') => Some(Action::OpenBulkDecision(DecisionKind::Approve)),
            KeyCode::Char('X') => Some(Action::OpenBulkDecision(DecisionKind::Reject)),

            // Links
            KeyCode::Enter => Some(Action::OpenRecord),
            KeyCode::Char('o') => Some(Action::OpenListView),

            // Search and panels
            KeyCode::Char('/') => Some(Action::EnterSearchMode),
            KeyCode::Char('f') => Some(Action::ToggleFilterPanel),
            KeyCode::Char('c') => Some(Action::ToggleColumnPanel),

            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),

            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_home_screen which takes full context
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the home screen
pub struct HomeRenderContext<'a> {
    pub store: &'a ItemListStore,
    pub layout: &'a ColumnLayout,
    pub columns: &'a [RenderedColumn],
    pub side_panel: Option<SidePanel>,
    pub notification: Option<&'a Notification>,
    pub bulk_enabled: bool,
    pub loading: bool,
    pub compact: bool,
}

/// Draw the home screen
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    filter_panel: &mut FilterPanel,
    column_panel: &mut ColumnPanel,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area, true, ctx.side_panel.is_some());

    render_header(frame, layout.header, ctx);
    render_item_table(frame, layout.table, home, ctx);

    if let Some(panel_area) = layout.side_panel {
        match ctx.side_panel {
            Some(SidePanel::Filters) => {
                filter_panel.draw_with_store(frame, panel_area, ctx.store)?;
            }
            Some(SidePanel::Columns) => {
                column_panel.draw_with_layout(frame, panel_area, ctx.layout)?;
            }
            None => {}
        }
    }

    if let Some(status_area) = layout.status {
        render_status_bar(frame, status_area, home, ctx);
    }
    render_help_bar(frame, layout.help, home, ctx);

    Ok(())
}

fn render_header(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    let filter = ctx.store.filter();
    let mut spans = vec![Span::styled(
        " Items To Approve ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(sort) = ctx.store.sort_state() {
        spans.push(Span::styled(
            format!(" Sorted by {} {} ", sort.label, sort.direction.arrow()),
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
        filter.view_option.label(),
        Style::default().fg(Color::White),
    ));

    if let SobjectTypeFilter::Only(t) = &filter.sobject_type_filter {
        spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(format!("Type: {}", t), Style::default().fg(Color::Cyan)));
    }

    if !filter.text_query.is_empty() {
        spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("Search: {}", filter.text_query),
            Style::default().fg(Color::Cyan),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_item_table(frame: &mut Frame, area: Rect, home: &mut HomeComponent, ctx: &HomeRenderContext) {
    let store = ctx.store;

    let mut title = format!(" Items ({}) ", store.view_len());
    if store.has_selection() {
        title = format!(" Items ({}) [{}✓] ", store.view_len(), store.selection_count());
    }
    if store.has_more {
        title = format!("{} [more available] ", title.trim_end());
    }
    if ctx.loading {
        title = format!("{} Loading… ", title.trim_end());
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::DarkGray));

    if store.view_len() == 0 {
        let text = if ctx.loading {
            "Loading…"
        } else if store.items().is_empty() {
            EMPTY_STATE_TEXT
        } else {
            NO_MATCHES_TEXT
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )))
        .block(block)
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let sort = store.sort_state();
    let mut widths = Vec::new();
    let mut header_cells = Vec::new();

    if ctx.bulk_enabled {
        widths.push(Constraint::Length(SELECTION_COLUMN_WIDTH));
        header_cells.push(Cell::from(""));
    }

    let mut data_index = 0;
    for column in ctx.columns {
        match column {
            RenderedColumn::Data(spec) => {
                let mut label = spec.label.to_string();
                if let Some(sort) = sort.filter(|s| s.field_name == spec.field.name()) {
                    label = format!("{} {}", label, sort.direction.arrow());
                }
                let mut style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
                if data_index == home.focused_column {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                widths.push(Constraint::Length(spec.width));
                header_cells.push(Cell::from(Span::styled(label, style)));
                data_index += 1;
            }
            RenderedColumn::Actions => {
                widths.push(Constraint::Length(ACTIONS_COLUMN_WIDTH));
                header_cells.push(Cell::from(Span::styled(
                    column.label(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
            }
        }
    }

    let rows: Vec<Row> = store
        .view()
        .map(|item| {
            let selected = store.is_selected(&item.work_item_id);
            let mut cells = Vec::new();

            if ctx.bulk_enabled {
                let marker = if selected { "●" } else { "○" };
                cells.push(Cell::from(Span::styled(
                    marker,
                    Style::default().fg(if selected { Color::Green } else { Color::DarkGray }),
                )));
            }

            for column in ctx.columns {
                match column {
                    RenderedColumn::Data(spec) => {
                        let text = truncate_to_width(&spec.cell_text(item), spec.width as usize);
                        cells.push(Cell::from(text));
                    }
                    RenderedColumn::Actions => {
                        let labels: Vec<&str> = RowAction::all().iter().map(|a| a.label()).collect();
                        cells.push(Cell::from(Span::styled(
                            labels.join(" | "),
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                }
            }

            let style = if selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(cells).style(style)
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(Row::new(header_cells).bottom_margin(0))
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(table, area, &mut home.table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, home: &HomeComponent, ctx: &HomeRenderContext) {
    let mut spans = vec![];

    if ctx.compact {
        spans.push(Span::styled(
            " compact ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    // Focused item info
    if let Some(item) = home.cursor().and_then(|idx| ctx.store.view_item(idx)) {
        spans.push(Span::styled(
            item.related_to_name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" ({})", item.sobject_type),
            Style::default().fg(Color::DarkGray),
        ));
        if item.is_delegated {
            spans.push(Span::styled(" delegated", Style::default().fg(Color::Yellow)));
        }
    }

    if let Some(note) = ctx.notification {
        spans.clear();
        let (prefix, color) = match note.kind {
            NotificationKind::Success => ("✓", Color::Green),
            NotificationKind::Error => ("Error:", Color::Red),
        };
        spans.push(Span::styled(
            format!(" {} {} ", prefix, note.message),
            Style::default().fg(color),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans));
    frame.render_widget(paragraph, area);
}

fn key_span(key: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", key),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_help_bar(frame: &mut Frame, area: Rect, home: &HomeComponent, ctx: &HomeRenderContext) {
    let help_spans = if home.search_mode {
        vec![
            key_span("Esc/Enter", Color::Yellow),
            Span::raw("Done  "),
            Span::styled(
                format!("Search: {}_", ctx.store.filter().text_query),
                Style::default().fg(Color::Cyan),
            ),
        ]
    } else if ctx.store.has_selection() {
        vec![
            key_span("Space", Color::Green),
            Span::raw("Toggle  "),
            key_span("Esc", Color::Yellow),
            Span::raw("Clear  "),
            key_span("A", Color::Green),
            Span::raw("Approve Selected  "),
            key_span("X", Color::Red),
            Span::raw("Reject Selected  "),
            Span::styled(
                format!("{} selected", ctx.store.selection_count()),
                Style::default().fg(Color::Cyan),
            ),
        ]
    } else {
        vec![
            key_span("q", Color::Yellow),
            Span::raw("Quit "),
            key_span("a", Color::Green),
            Span::raw("Approve "),
            key_span("x", Color::Red),
            Span::raw("Reject "),
            key_span("Enter", Color::Cyan),
            Span::raw("Open "),
            key_span("s", Color::Cyan),
            Span::raw("Sort "),
            key_span("/", Color::Cyan),
            Span::raw("Search "),
            key_span("f", Color::Magenta),
            Span::raw("Filters "),
            key_span("c", Color::Magenta),
            Span::raw("Columns "),
            key_span("r", Color::Blue),
            Span::raw("Refresh "),
            key_span("?", Color::White),
            Span::raw("Help"),
        ]
    };

    let paragraph = Paragraph::new(Line::from(help_spans))
        .alignment(ratatui::layout::Alignment::Left);
    frame.render_widget(paragraph, area);
}

/// Cut `text` to at most `width` display columns, marking cuts with "…"
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
