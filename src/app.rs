//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! It owns the item store, the column layout and the decision state, and
//! turns finished background jobs into state changes.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_home_screen, ColumnPanel, DecisionDialog, FilterPanel, HelpDialog, HomeComponent,
    HomeRenderContext, QuitDialog,
};
use crate::config::Config;
use crate::model::decision::{DecisionError, DecisionKind, DecisionState, DecisionTarget};
use crate::model::filter::SobjectTypeFilter;
use crate::model::item::ApprovalItem;
use crate::model::modal::{Modal, ModalStack};
use crate::model::ui::{Notification, SidePanel};
use crate::model::{ColumnLayout, ItemListStore};
use crate::services::navigation::{Navigator, WORK_ITEM_OBJECT};
use crate::services::{
    build_error_message, ApprovalBackend, ApprovalSettings, JobMessage, JobRunner, KeyValueStore,
    RemoteFault,
};
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    pub config: Config,

    /// Fetched items and the derived view
    pub store: ItemListStore,

    /// Persisted column order and visibility
    pub columns: ColumnLayout,

    /// Approve/reject dialog state
    pub decision: DecisionState,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Open side panel, if any
    pub side_panel: Option<SidePanel>,

    /// Background job runner
    pub job_runner: JobRunner,

    /// Org settings, defaults until the lookup returns
    pub settings: ApprovalSettings,

    /// Status bar message
    pub notification: Option<Notification>,

    /// A fetch is in flight
    pub loading: bool,

    /// Fetch again once the in-flight fetch lands
    pub refresh_queued: bool,

    pub navigator: Navigator,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// URL to open in the browser (handled by the main loop)
    pub pending_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub home: HomeComponent,
    pub filter_panel: FilterPanel,
    pub column_panel: ColumnPanel,
    pub decision_dialog: DecisionDialog,
    pub help_dialog: HelpDialog,
    pub quit_dialog: QuitDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Construction & Backend Calls
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    pub fn new(
        config: Config,
        backend: Arc<dyn ApprovalBackend>,
        storage: Box<dyn KeyValueStore>,
    ) -> App {
        let navigator = Navigator::new(&config.instance_url);
        App {
            config,
            store: ItemListStore::new(),
            columns: ColumnLayout::new(storage),
            decision: DecisionState::default(),
            modals: ModalStack::new(),
            side_panel: None,
            job_runner: JobRunner::new(backend),
            settings: ApprovalSettings::default(),
            notification: None,
            loading: false,
            refresh_queued: false,
            navigator,
            should_quit: false,
            pending_url: None,
            home: HomeComponent::new(),
            filter_panel: FilterPanel::new(),
            column_panel: ColumnPanel::new(),
            decision_dialog: DecisionDialog,
            help_dialog: HelpDialog::default(),
            quit_dialog: QuitDialog::default(),
        }
    }

    /// Fetch the configured page. Ignored while a fetch is in flight.
    pub fn refresh(&mut self) {
        if self.loading {
            tracing::debug!("refresh ignored, fetch already in flight");
            return;
        }
        self.loading = true;
        self.job_runner
            .spawn_fetch(self.config.effective_fetch_limit(), self.config.fetch_offset);
    }

    /// Fetch now, or right after the in-flight fetch if there is one.
    /// That fetch may predate a change the backend has since applied.
    fn refresh_after_change(&mut self) {
        if self.loading {
            tracing::debug!("fetch in flight, refresh queued");
            self.refresh_queued = true;
        } else {
            self.refresh();
        }
    }

    fn bulk_enabled(&self) -> bool {
        !self.settings.disable_bulk_approve_and_reject
    }

    fn notify_error(&mut self, faults: &[RemoteFault]) {
        let message = build_error_message(faults);
        tracing::warn!(%message, "backend call failed");
        self.notification = Some(Notification::error(message));
    }

    /// Apply one finished background job
    pub(crate) fn handle_job_message(&mut self, message: JobMessage) {
        match message {
            JobMessage::Fetched { limit, result } => {
                self.loading = false;
                match result {
                    Ok(page) => {
                        let focused = self.focused_id();
                        self.store.has_more = page.records.len() >= limit;
                        tracing::info!(count = page.records.len(), has_more = self.store.has_more, "items loaded");
                        self.store.replace(page.records, &self.columns.rendered_columns());
                        self.filter_panel.set_types(self.store.available_sobject_types());
                        self.restore_cursor(focused);
                    }
                    Err(fault) => self.notify_error(&[fault]),
                }
                if std::mem::take(&mut self.refresh_queued) {
                    self.refresh();
                }
            }
            JobMessage::Settings(result) => match result {
                Ok(settings) => {
                    tracing::debug!(?settings, "settings loaded");
                    self.settings = settings;
                    if settings.disable_bulk_approve_and_reject {
                        self.store.clear_selection();
                    }
                }
                Err(fault) => self.notify_error(&[fault]),
            },
            JobMessage::Shared {
                work_item_id,
                navigate_to,
                result,
            } => match result {
                Ok(()) => {
                    tracing::debug!(%work_item_id, "target shared");
                    if navigate_to.is_some() {
                        self.pending_url = navigate_to;
                    }
                }
                Err(fault) => self.notify_error(&[fault]),
            },
            JobMessage::Decided {
                work_item_ids,
                approve,
                result,
            } => match result {
                Ok(()) => {
                    tracing::info!(count = work_item_ids.len(), approve, "decision submitted");
                    let kind = self
                        .decision
                        .complete(true)
                        .map(|p| p.kind)
                        .unwrap_or(if approve { DecisionKind::Approve } else { DecisionKind::Reject });
                    self.modals.remove(&Modal::Decision);
                    self.store.clear_selection();
                    self.notification =
                        Some(Notification::success(format!("Record(s) {}", kind.past_tense())));
                    self.refresh_after_change();
                }
                Err(fault) => {
                    // Back to the dialog with the comments intact
                    self.decision.complete(false);
                    self.notify_error(&[fault]);
                }
            },
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn focused_item(&self) -> Option<&ApprovalItem> {
        self.home.cursor().and_then(|pos| self.store.view_item(pos))
    }

    fn focused_id(&self) -> Option<String> {
        self.focused_item().map(|item| item.work_item_id.clone())
    }

    /// Put the cursor back on `id` if it is still in view
    fn restore_cursor(&mut self, id: Option<String>) {
        match id.and_then(|id| self.store.position_in_view(&id)) {
            Some(pos) => self.home.table_state.select(Some(pos)),
            None => self.home.clamp(self.store.view_len()),
        }
    }

    fn data_column_count(&self) -> usize {
        self.columns
            .rendered_columns()
            .iter()
            .filter(|c| c.spec().is_some())
            .count()
    }

    /// Re-sort after the filter changed and keep the cursor on its item
    fn after_filter_change(&mut self, focused: Option<String>) {
        self.store.reapply_sort(&self.columns.rendered_columns());
        self.restore_cursor(focused);
    }

    fn after_layout_change(&mut self) {
        self.column_panel.sync(&self.columns);
        self.home.clamp_column(self.data_column_count());
        // The sort label follows the column's current presence
        let focused = self.focused_id();
        self.store.reapply_sort(&self.columns.rendered_columns());
        self.restore_cursor(focused);
    }

    fn sort_by_focused_column(&mut self) {
        let columns = self.columns.rendered_columns();
        let Some(spec) = columns
            .iter()
            .filter_map(|c| c.spec())
            .nth(self.home.focused_column)
        else {
            return;
        };

        let field_name = spec.field.name();
        let direction = match self.store.sort_state() {
            Some(sort) if sort.field_name == field_name => sort.direction.toggled(),
            _ => Default::default(),
        };

        let focused = self.focused_id();
        self.store.sort(field_name, direction, &columns);
        self.restore_cursor(focused);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Decisions & links
    // ─────────────────────────────────────────────────────────────────────────

    fn open_decision(&mut self, kind: DecisionKind, targets: Vec<DecisionTarget>, single_row: bool) {
        let delegated = match self.decision.open(kind, targets, single_row) {
            Ok(pending) => pending.delegated_ids(),
            Err(e) => {
                tracing::debug!(error = %e, "decision dialog not opened");
                return;
            }
        };

        for id in delegated {
            self.job_runner.spawn_share(id, None);
        }
        self.modals.push(Modal::Decision);
    }

    fn submit_decision(&mut self) {
        match self.decision.submit(self.settings.require_comments) {
            Ok(submission) => self.job_runner.spawn_decision(
                submission.work_item_ids,
                submission.approve,
                submission.comments,
            ),
            // Shown inside the dialog
            Err(DecisionError::CommentsRequired) => {}
            Err(e) => tracing::debug!(error = %e, "submit ignored"),
        }
    }

    fn record_url(&self, item: &ApprovalItem) -> String {
        if item.related_to_href.is_empty() {
            self.navigator.record_url(&item.work_item_id)
        } else {
            self.navigator.resolve_href(&item.related_to_href)
        }
    }

    /// Delegated records are shared with the user before navigating
    fn open_record(&mut self) {
        let Some(item) = self.focused_item() else {
            return;
        };
        let url = self.record_url(item);
        if item.is_delegated {
            let id = item.work_item_id.clone();
            self.job_runner.spawn_share(id, Some(url));
        } else {
            self.pending_url = Some(url);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.column_panel.sync(&self.columns);
        self.job_runner.spawn_settings_lookup();
        self.refresh();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }
        if self.home.search_mode {
            return self.home.handle_key_event(key);
        }
        match self.side_panel {
            Some(SidePanel::Filters) => self.filter_panel.handle_key_event(key),
            Some(SidePanel::Columns) => self.column_panel.handle_key_event(key),
            None => self.home.handle_key_event(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                for message in self.job_runner.poll() {
                    self.handle_job_message(message);
                }
                if let Some(notification) = self.notification.as_mut() {
                    if !notification.tick() {
                        self.notification = None;
                    }
                }
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation (delegate to HomeComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem => self.home.next(self.store.view_len()),
            Action::PrevItem => self.home.previous(self.store.view_len()),
            Action::FirstItem => self.home.select_first(self.store.view_len()),
            Action::LastItem => self.home.select_last(self.store.view_len()),
            Action::NextColumn => self.home.next_column(self.data_column_count()),
            Action::PrevColumn => self.home.previous_column(self.data_column_count()),

            // ─────────────────────────────────────────────────────────────────
            // Sorting
            // ─────────────────────────────────────────────────────────────────
            Action::SortByFocusedColumn => self.sort_by_focused_column(),

            // ─────────────────────────────────────────────────────────────────
            // Search
            // ─────────────────────────────────────────────────────────────────
            Action::EnterSearchMode => self.home.enter_search_mode(),
            Action::ExitSearchMode => self.home.exit_search_mode(),
            Action::SearchInput(c) => {
                let focused = self.focused_id();
                let mut query = self.store.filter().text_query.clone();
                query.push(c);
                self.store.set_text_query(&query);
                self.after_filter_change(focused);
            }
            Action::SearchBackspace => {
                let focused = self.focused_id();
                let mut query = self.store.filter().text_query.clone();
                query.pop();
                self.store.set_text_query(&query);
                self.after_filter_change(focused);
            }

            // ─────────────────────────────────────────────────────────────────
            // Selection
            // ─────────────────────────────────────────────────────────────────
            Action::ToggleSelection => {
                if self.bulk_enabled() {
                    if let Some(id) = self.focused_id() {
                        self.store.toggle_selected(&id);
                    }
                }
            }
            Action::SelectAllVisible => {
                if self.bulk_enabled() {
                    self.store.select_all_visible();
                }
            }
            Action::ClearSelection => {
                if self.store.has_selection() {
                    self.store.clear_selection();
                } else {
                    return Ok(Some(Action::DismissNotification));
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Side Panels
            // ─────────────────────────────────────────────────────────────────
            Action::ToggleFilterPanel => {
                self.side_panel = SidePanel::Filters.toggle(self.side_panel);
                self.filter_panel.set_types(self.store.available_sobject_types());
            }
            Action::ToggleColumnPanel => {
                self.side_panel = SidePanel::Columns.toggle(self.side_panel);
                self.column_panel.sync(&self.columns);
            }
            Action::ClosePanel => {
                self.side_panel = None;
            }
            Action::SetViewOption(option) => {
                let focused = self.focused_id();
                self.store.set_view_option(option);
                self.after_filter_change(focused);
            }
            Action::SetSobjectType(value) => {
                let focused = self.focused_id();
                self.store
                    .set_sobject_type_filter(SobjectTypeFilter::from_value(&value));
                self.after_filter_change(focused);
            }
            Action::SetColumnIncluded(label, included) => {
                if self.columns.set_include(&label, included) {
                    self.after_layout_change();
                }
            }
            Action::MoveColumn { from, to } => {
                if self.columns.reorder(from, to) {
                    self.after_layout_change();
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Decisions
            // ─────────────────────────────────────────────────────────────────
            Action::OpenRowDecision(kind) => {
                if let Some(item) = self.focused_item() {
                    let target = DecisionTarget::from(item);
                    self.open_decision(kind, vec![target], true);
                }
            }
            Action::OpenBulkDecision(kind) => {
                if !self.bulk_enabled() {
                    tracing::debug!("bulk decisions are disabled");
                } else if !self.store.has_selection() {
                    self.notification = Some(Notification::error("Select at least one item"));
                } else {
                    let targets = self
                        .store
                        .selected_items()
                        .into_iter()
                        .map(DecisionTarget::from)
                        .collect();
                    self.open_decision(kind, targets, false);
                }
            }
            Action::CommentInput(c) => self.decision.push_comment_char(c),
            Action::CommentBackspace => self.decision.pop_comment_char(),
            Action::SubmitDecision => self.submit_decision(),
            Action::CancelDecision => {
                if self.decision.cancel().is_ok() {
                    self.modals.remove(&Modal::Decision);
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Links
            // ─────────────────────────────────────────────────────────────────
            Action::OpenRecord => self.open_record(),
            Action::OpenListView => {
                self.pending_url = Some(self.navigator.list_view_url(WORK_ITEM_OBJECT));
            }

            // ─────────────────────────────────────────────────────────────────
            // Data
            // ─────────────────────────────────────────────────────────────────
            Action::Refresh => self.refresh(),
            Action::DismissNotification => {
                self.notification = None;
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.jobs_in_flight = self.job_runner.in_flight();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.open(self.bulk_enabled());
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let columns = self.columns.rendered_columns();
        let ctx = HomeRenderContext {
            store: &self.store,
            layout: &self.columns,
            columns: &columns,
            side_panel: self.side_panel,
            notification: self.notification.as_ref(),
            bulk_enabled: self.bulk_enabled(),
            loading: self.loading,
            compact: self.config.compact,
        };

        draw_home_screen(
            frame,
            area,
            &mut self.home,
            &mut self.filter_panel,
            &mut self.column_panel,
            &ctx,
        )?;

        // Draw modal overlay if active
        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
            Modal::Decision => {
                // Keys are swallowed while the request is in flight
                if self.decision.is_submitting() {
                    return Ok(None);
                }
                self.decision_dialog.handle_key_event(key)
            }
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
            Modal::Decision => self.decision_dialog.draw_with_state(
                frame,
                area,
                &self.decision,
                self.settings.require_comments,
            )?,
        }
        Ok(())
    }
}
