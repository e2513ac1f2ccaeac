//! Deferred action queue
//!
//! The adapter's two short delays (orientation settle, tap/swipe key
//! release) are explicit entries in this queue rather than ad hoc host
//! timers. Each entry occupies a logical slot; scheduling into an occupied
//! slot cancels the predecessor, so a superseding event can never leave two
//! overlapping timers for the same action. The host's event loop drives the
//! clock through [`TimerQueue::due`].

use std::collections::HashMap;

/// What fires when a timer comes due.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredAction {
    /// Release a synthesized key held by a tap or swipe control.
    ReleaseKey { control_id: String, key: String },

    /// Re-read the screen box and recompute the viewport after an
    /// orientation change settles.
    OrientationSettle,
}

/// Logical slot a pending timer belongs to. One pending action per slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerSlot {
    OrientationSettle,
    ControlRelease(String),
}

#[derive(Debug)]
struct PendingTimer {
    fire_at_ms: f64,
    action: DeferredAction,
}

/// Slot-keyed queue of pending deferred actions.
#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: HashMap<TimerSlot, PendingTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an action, superseding any pending action in the same
    /// slot. Returns the superseded action so the caller can settle it
    /// (e.g. release a key whose delayed release was cancelled).
    pub fn schedule(
        &mut self,
        slot: TimerSlot,
        now_ms: f64,
        delay_ms: f64,
        action: DeferredAction,
    ) -> Option<DeferredAction> {
        let superseded = self.pending.insert(
            slot,
            PendingTimer {
                fire_at_ms: now_ms + delay_ms,
                action,
            },
        );
        superseded.map(|t| t.action)
    }

    /// Cancel the pending action in a slot, returning it if there was one.
    pub fn cancel(&mut self, slot: &TimerSlot) -> Option<DeferredAction> {
        self.pending.remove(slot).map(|t| t.action)
    }

    /// Drain every action due at `now_ms`, ordered by fire time.
    pub fn due(&mut self, now_ms: f64) -> Vec<DeferredAction> {
        let mut fired: Vec<(f64, TimerSlot)> = self
            .pending
            .iter()
            .filter(|(_, t)| t.fire_at_ms <= now_ms)
            .map(|(slot, t)| (t.fire_at_ms, slot.clone()))
            .collect();
        fired.sort_by(|a, b| a.0.total_cmp(&b.0));

        fired
            .into_iter()
            .filter_map(|(_, slot)| self.pending.remove(&slot).map(|t| t.action))
            .collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
