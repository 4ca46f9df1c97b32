//! Warning lifecycle
//!
//! The timed advisory shown when the interlock rejects a command. The state
//! machine lives here; the client crate schedules the actual expiry sleep.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Observable warning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WarningState {
    /// No advisory is shown.
    Hidden,
    /// The advisory is shown; it was (re)armed at `armed_at`.
    Visible { armed_at: DateTime<Utc> },
}

impl WarningState {
    pub fn is_visible(&self) -> bool {
        matches!(self, WarningState::Visible { .. })
    }
}

/// Warning state machine.
///
/// Transitions:
/// - `arm` → `Visible`, handing out a new expiry token. Re-arming while
///   visible refreshes the deadline rather than stacking a second one.
/// - `dismiss` → `Hidden` immediately (operator acknowledgment).
/// - `expire(token)` → `Hidden` only if `token` is still current; a stale
///   expiry is ignored.
///
/// Each `arm` and `dismiss` bumps the generation counter, which invalidates
/// every previously handed-out expiry token. The scheduler must cancel the
/// old sleep on re-arm, but even an uncancelled one cannot dismiss a newer
/// arming.
#[derive(Debug, Default)]
pub struct WarningLifecycle {
    state: Option<DateTime<Utc>>,
    generation: u64,
}

impl WarningLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WarningState {
        match self.state {
            Some(armed_at) => WarningState::Visible { armed_at },
            None => WarningState::Hidden,
        }
    }

    /// Show the warning (or refresh its deadline) and return the expiry
    /// token for this arming.
    #[must_use]
    pub fn arm(&mut self, now: DateTime<Utc>) -> u64 {
        self.generation += 1;
        self.state = Some(now);
        self.generation
    }

    /// Explicit dismissal; any pending expiry token becomes stale.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.state = None;
    }

    /// Deadline expiry for the arming identified by `token`. Returns whether
    /// the warning transitioned to hidden.
    pub fn expire(&mut self, token: u64) -> bool {
        if token == self.generation && self.state.is_some() {
            self.state = None;
            true
        } else {
            false
        }
    }
}
