//! Lookup pipeline state: the per-lookup phase machine, the view state it
//! leaves behind, and the generation tokens used to retire stale lookups.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Phase of a single lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Rendered,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    Start,
    Succeeded,
    Failed,
    Finish,
}

impl Phase {
    /// Next phase for `event`, or `None` if the event is not valid here.
    pub fn on(self, event: PipelineEvent) -> Option<Phase> {
        match (self, event) {
            (Phase::Idle, PipelineEvent::Start) => Some(Phase::Loading),
            (Phase::Loading, PipelineEvent::Succeeded) => Some(Phase::Rendered),
            (Phase::Loading, PipelineEvent::Failed) => Some(Phase::Failed),
            (Phase::Rendered | Phase::Failed, PipelineEvent::Finish) => Some(Phase::Idle),
            _ => None,
        }
    }
}

/// What the card is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Loaded { name: String, id: u32 },
    Error(String),
}

/// Result of one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Empty identifier; nothing happened.
    Rejected,
    Rendered { name: String, id: u32 },
    Failed { message: String },
    /// A newer lookup started before this one finished.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PipelineToken(pub u64);

/// Hands out increasing tokens; only the newest one may touch the view.
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> PipelineToken {
        PipelineToken(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> PipelineToken {
        PipelineToken(self.0.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, token: PipelineToken) -> bool {
        self.latest() == token
    }
}
