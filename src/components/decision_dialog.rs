//! Approve/reject dialog
//!
//! Shows the pending decision with a comments field. Comment text lives in
//! `DecisionState`; this component only maps keys and renders.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::decision::{DecisionKind, DecisionState, PendingDecision};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const DIALOG_WIDTH: u16 = 60;
const DIALOG_HEIGHT: u16 = 14;

#[derive(Default)]
pub struct DecisionDialog;

impl DecisionDialog {
    pub fn draw_with_state(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &DecisionState,
        require_comments: bool,
    ) -> Result<()> {
        let Some(pending) = state.pending() else {
            return Ok(());
        };

        let popup_area = centered_popup(area, DIALOG_WIDTH, DIALOG_HEIGHT);
        frame.render_widget(Clear, popup_area);

        let accent = match pending.kind {
            DecisionKind::Approve => Color::Green,
            DecisionKind::Reject => Color::Red,
        };

        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(format!(" {} ", pending.title()))
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
        let inner = outer.inner(popup_area);
        frame.render_widget(outer, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Summary
                Constraint::Min(3),    // Comments
                Constraint::Length(1), // Validation
                Constraint::Length(1), // Help
            ])
            .split(inner);

        frame.render_widget(Paragraph::new(summary_lines(pending)), chunks[0]);

        let comments_title = if require_comments {
            " Comments (required) "
        } else {
            " Comments "
        };
        let cursor = if state.is_submitting() { "" } else { "_" };
        let comments = Paragraph::new(format!("{}{}", pending.comments, cursor))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(comments_title)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(comments, chunks[1]);

        if let Some(error) = &pending.comments_error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.clone(), Style::default().fg(Color::Red))),
                chunks[2],
            );
        }

        let help = if state.is_submitting() {
            Line::from(Span::styled(
                format!("{}…", submitting_label(pending.kind)),
                Style::default().fg(Color::Yellow),
            ))
        } else {
            Line::from(vec![
                Span::styled(
                    " Enter ",
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{}  ", pending.kind.verb())),
                Span::styled(
                    " Esc ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("Cancel"),
            ])
        };
        frame.render_widget(Paragraph::new(help), chunks[3]);

        Ok(())
    }
}

fn submitting_label(kind: DecisionKind) -> &'static str {
    match kind {
        DecisionKind::Approve => "Approving",
        DecisionKind::Reject => "Rejecting",
    }
}

fn summary_lines(pending: &PendingDecision) -> Vec<Line<'static>> {
    let count = pending.targets.len();
    let mut lines = vec![Line::from(Span::styled(
        if count == 1 {
            format!("{} 1 item", pending.kind.verb())
        } else {
            format!("{} {} items", pending.kind.verb(), count)
        },
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))];

    let delegated = pending.delegated_ids().len();
    if delegated > 0 {
        lines.push(Line::from(Span::styled(
            format!("{} delegated to you", delegated),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines
}

impl Component for DecisionDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CancelDecision),
            KeyCode::Enter => Some(Action::SubmitDecision),
            KeyCode::Backspace => Some(Action::CommentBackspace),
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => None,
            KeyCode::Char(c) => Some(Action::CommentInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawn through draw_with_state
        Ok(())
    }
}
