// Copyright 2026 Hypermesh Foundation. All rights reserved.
// EMF Meter Simulation - Logical Clock Scheduler

//! Single-threaded stand-in for the page's two intervals and one timeout.
//!
//! The host only reports elapsed time; the scheduler decides which tasks
//! are due and hands them out one at a time in clock order. Tasks never
//! overlap, so the meter state needs no locking.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Task {
    // Declaration order is the tie-break when several tasks share a deadline.
    GhostFade,
    GhostCheck,
    MeterUpdate,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    now_ms: u64,
    update_period_ms: u64,
    next_update_ms: u64,
    check_period_ms: u64,
    next_check_ms: u64,
    fade_at_ms: Option<u64>,
}

impl Scheduler {
    /// Periods must be non-zero (enforced by `MeterConfig::validate`).
    /// Like `setInterval`, the first run is one full period after start.
    pub fn new(update_period_ms: u64, check_period_ms: u64) -> Self {
        let update_period_ms = update_period_ms.max(1);
        let check_period_ms = check_period_ms.max(1);
        Self {
            now_ms: 0,
            update_period_ms,
            next_update_ms: update_period_ms,
            check_period_ms,
            next_check_ms: check_period_ms,
            fade_at_ms: None,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn fade_at_ms(&self) -> Option<u64> {
        self.fade_at_ms
    }

    /// Arm the one-shot fade `delay_ms` from now, replacing any pending one.
    pub fn schedule_fade(&mut self, delay_ms: u64) -> u64 {
        let at = self.now_ms.saturating_add(delay_ms);
        self.fade_at_ms = Some(at);
        at
    }

    /// Returns whether a fade was pending.
    pub fn cancel_fade(&mut self) -> bool {
        self.fade_at_ms.take().is_some()
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock
    /// to its deadline. Recurring tasks re-arm themselves.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(u64, Task)> {
        let mut candidates = vec![
            (self.next_update_ms, Task::MeterUpdate),
            (self.next_check_ms, Task::GhostCheck),
        ];
        if let Some(at) = self.fade_at_ms {
            candidates.push((at, Task::GhostFade));
        }
        let (at, task) = candidates.into_iter().filter(|(at, _)| *at <= until_ms).min()?;

        self.now_ms = self.now_ms.max(at);
        match task {
            Task::MeterUpdate => self.next_update_ms += self.update_period_ms,
            Task::GhostCheck => self.next_check_ms += self.check_period_ms,
            Task::GhostFade => self.fade_at_ms = None,
        }
        Some((at, task))
    }

    /// Move the clock forward once nothing else is due.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
