//! Structured browser events.
//!
//! Fetch and selection activity is reported to an injected [`BrowserObserver`]
//! instead of being printed from inside the control flow.

use std::sync::Mutex;

use crate::models::{FetchKind, PaperId};

/// Something that happened in the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// A request was issued with sequence number `seq`
    FetchStarted { seq: u64, kind: FetchKind },
    /// A request completed with `count` papers
    FetchSucceeded { seq: u64, count: usize },
    /// A request failed
    FetchFailed { seq: u64, reason: String },
    /// A response arrived after a newer request had been issued
    StaleResponseDiscarded { seq: u64, latest: u64 },
    /// The selected paper changed (`None` when cleared)
    SelectionChanged { id: Option<PaperId> },
}

/// Receives browser events
pub trait BrowserObserver: Send + Sync + std::fmt::Debug {
    fn notify(&self, event: &BrowserEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BrowserObserver for NoopObserver {
    fn notify(&self, _event: &BrowserEvent) {}
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl BrowserObserver for TracingObserver {
    fn notify(&self, event: &BrowserEvent) {
        match event {
            BrowserEvent::FetchStarted { seq, kind } => {
                tracing::info!(seq, kind = %kind.label(), "fetch started");
            }
            BrowserEvent::FetchSucceeded { seq, count } => {
                tracing::info!(seq, count, "fetch succeeded");
            }
            BrowserEvent::FetchFailed { seq, reason } => {
                tracing::warn!(seq, %reason, "fetch failed");
            }
            BrowserEvent::StaleResponseDiscarded { seq, latest } => {
                tracing::debug!(seq, latest, "stale response discarded");
            }
            BrowserEvent::SelectionChanged { id } => match id {
                Some(id) => tracing::debug!(id = %id, "selection changed"),
                None => tracing::debug!("selection cleared"),
            },
        }
    }
}

/// Keeps every event in memory, mostly for tests and diagnostics
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<BrowserEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far
    pub fn events(&self) -> Vec<BrowserEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Forget recorded events
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl BrowserObserver for RecordingObserver {
    fn notify(&self, event: &BrowserEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
