//! approvals-tui - A terminal UI for pending approval requests
//!
//! This is the main entry point for the approvals-tui application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::services::{navigation, FileStore, JsonFileBackend};
use crate::tui::Tui;
use anyhow::Result;
use crossterm::event::Event;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    let config = Config::load_or_init();

    if let Some(log_path) = Config::log_path() {
        if let Err(e) = logging::init_logging(&log_path, &config.log_level) {
            eprintln!("Logging disabled: {:#}", e);
        }
    }
    tracing::info!(data_file = %config.data_file, compact = config.compact, "starting");

    let backend = Arc::new(JsonFileBackend::new(&config.data_file));
    let storage = FileStore::open_or_memory(Config::storage_path());

    // Setup terminal
    tui::install_panic_hook();
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Create app state
    let mut app = App::new(config, backend, storage);
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!(error = ?err, "application error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("exiting");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        // Check for a pending browser launch
        if let Some(url) = app.pending_url.take() {
            launch_browser(tui, app, &url)?;
            continue; // Redraw after the launcher returns
        }

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Process the action
            if let Some(action) = action {
                tracing::trace!(%action, "dispatch");
                // Action might produce a follow-up action
                let mut current_action = Some(action);
                while let Some(a) = current_action {
                    current_action = app.update(a)?;
                }
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}

/// Open `url` in the browser with the terminal handed back meanwhile
fn launch_browser(tui: &mut Tui, app: &mut App, url: &str) -> Result<()> {
    tui.suspend()?;
    let status = navigation::open_url(url);
    tui.resume()?;

    match status {
        Ok(exit_status) if exit_status.success() => {}
        Ok(exit_status) => {
            app.notification = Some(model::ui::Notification::error(format!(
                "Browser exited with status: {}",
                exit_status
            )));
        }
        Err(e) => {
            app.notification = Some(model::ui::Notification::error(format!(
                "Failed to launch browser '{}': {}",
                navigation::browser_command(),
                e
            )));
        }
    }

    Ok(())
}
