// Copyright 2026 Hypermesh Foundation. All rights reserved.
// EMF Meter Simulation - Ghost Event Trigger

use crate::config::MeterConfig;
use crate::random::RandomSource;
use crate::types::{MeterEvent, SimulationState};

/// Decides when a ghost shows up and for how long. Only ever flips
/// `ghost_active`; the simulator owns everything else.
#[derive(Debug, Clone)]
pub struct GhostTrigger {
    probability: f64,
    min_duration_ms: u64,
    max_duration_ms: u64,
}

impl GhostTrigger {
    pub fn new(config: &MeterConfig) -> Self {
        Self {
            probability: config.ghost_probability,
            min_duration_ms: config.ghost_min_duration_ms,
            max_duration_ms: config.ghost_max_duration_ms,
        }
    }

    /// Periodic check. While a ghost is already present this is a no-op and
    /// draws nothing, so activation windows never stack.
    ///
    /// Returns the activation event; the caller schedules the fade
    /// `duration_ms` later.
    pub fn check(
        &self,
        state: &mut SimulationState,
        rng: &mut dyn RandomSource,
        now_ms: u64,
    ) -> Option<MeterEvent> {
        if state.ghost_active {
            return None;
        }
        if rng.next_unit() >= self.probability {
            return None;
        }
        let duration_ms = self.sample_duration(rng);
        Some(self.activate(state, now_ms, duration_ms))
    }

    /// Turn the ghost on for a caller-chosen duration.
    pub fn activate(
        &self,
        state: &mut SimulationState,
        now_ms: u64,
        duration_ms: u64,
    ) -> MeterEvent {
        state.ghost_active = true;
        MeterEvent::GhostActivated { at_ms: now_ms, duration_ms }
    }

    /// Deferred end of an activation window. Fading an absent ghost emits
    /// nothing.
    pub fn fade(&self, state: &mut SimulationState, now_ms: u64) -> Option<MeterEvent> {
        if !state.ghost_active {
            return None;
        }
        state.ghost_active = false;
        Some(MeterEvent::GhostFaded { at_ms: now_ms })
    }

    fn sample_duration(&self, rng: &mut dyn RandomSource) -> u64 {
        let span = self.max_duration_ms.saturating_sub(self.min_duration_ms) as f64;
        self.min_duration_ms + (rng.next_unit() * span) as u64
    }
}
