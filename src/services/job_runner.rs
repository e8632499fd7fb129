//! Background job runner service
//!
//! Backend calls run on short-lived worker threads and report back through
//! an mpsc channel. The UI thread drains the channel on every tick.

use super::backend::{ApprovalBackend, ApprovalSettings, FetchPage};
use super::error::RemoteFault;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Result of a background backend call
#[derive(Debug)]
pub enum JobMessage {
    Fetched {
        limit: usize,
        result: Result<FetchPage, RemoteFault>,
    },
    Settings(Result<ApprovalSettings, RemoteFault>),
    Shared {
        work_item_id: String,
        /// URL to open once sharing finished
        navigate_to: Option<String>,
        result: Result<(), RemoteFault>,
    },
    Decided {
        work_item_ids: Vec<String>,
        approve: bool,
        result: Result<(), RemoteFault>,
    },
}

/// Job runner service for backend calls
pub struct JobRunner {
    backend: Arc<dyn ApprovalBackend>,
    sender: Sender<JobMessage>,
    receiver: Receiver<JobMessage>,
    /// Jobs spawned but not yet reported
    in_flight: usize,
}

impl JobRunner {
    pub fn new(backend: Arc<dyn ApprovalBackend>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            backend,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce(&dyn ApprovalBackend) -> JobMessage + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.sender.clone();
        self.in_flight += 1;

        thread::spawn(move || {
            let message = job(backend.as_ref());
            // The receiver is gone after teardown
            let _ = tx.send(message);
        });
    }

    pub fn spawn_fetch(&mut self, limit: usize, offset: usize) {
        tracing::debug!(limit, offset, "fetching work items");
        self.spawn(move |backend| JobMessage::Fetched {
            limit,
            result: backend.fetch_items(limit, offset),
        });
    }

    pub fn spawn_settings_lookup(&mut self) {
        self.spawn(|backend| JobMessage::Settings(backend.lookup_settings()));
    }

    pub fn spawn_share(&mut self, work_item_id: String, navigate_to: Option<String>) {
        tracing::debug!(%work_item_id, "sharing delegated target");
        self.spawn(move |backend| {
            let result = backend.share_target_with_me(&work_item_id);
            JobMessage::Shared {
                work_item_id,
                navigate_to,
                result,
            }
        });
    }

    pub fn spawn_decision(&mut self, work_item_ids: Vec<String>, approve: bool, comments: String) {
        tracing::debug!(count = work_item_ids.len(), approve, "submitting decision");
        self.spawn(move |backend| {
            let result = backend.submit_decision(&work_item_ids, approve, &comments);
            JobMessage::Decided {
                work_item_ids,
                approve,
                result,
            }
        });
    }

    /// Drain every finished job without blocking
    pub fn poll(&mut self) -> Vec<JobMessage> {
        let mut messages = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    messages.push(message);
                }
                // The runner holds a sender itself, so the channel never disconnects
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        messages
    }
}
