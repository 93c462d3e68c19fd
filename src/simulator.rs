// Copyright 2026 Hypermesh Foundation. All rights reserved.
// EMF Meter Simulation - Reading Simulator

use crate::config::MeterConfig;
use crate::random::RandomSource;
use crate::types::SimulationState;

/// Background drift plus the ghost signal riding on top of it.
#[derive(Debug, Clone)]
pub struct Simulator {
    state: SimulationState,
    floor: f64,
    fluctuation: f64,
    damping: f64,
    ghost_max: f64,
    ghost_rise: f64,
    ghost_decay: f64,
}

impl Simulator {
    pub fn new(config: &MeterConfig) -> Self {
        Self {
            state: SimulationState {
                base_reading: config.initial_reading.max(config.reading_floor),
                ghost_intensity: 0.0,
                ghost_active: false,
            },
            floor: config.reading_floor,
            fluctuation: config.fluctuation,
            damping: config.damping,
            ghost_max: config.ghost_max,
            ghost_rise: config.ghost_rise,
            ghost_decay: config.ghost_decay,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn ghost_max(&self) -> f64 {
        self.ghost_max
    }

    /// One update: drift the base reading, ramp the ghost, return the sum.
    /// Draws exactly two samples, noise first.
    pub fn step(&mut self, rng: &mut dyn RandomSource) -> f64 {
        let noise = rng.next_unit() * self.fluctuation - self.fluctuation / 2.0;
        self.state.base_reading = (self.state.base_reading + noise * self.damping).max(self.floor);

        let r = rng.next_unit();
        self.state.ghost_intensity = if self.state.ghost_active {
            (self.state.ghost_intensity + r * self.ghost_rise).min(self.ghost_max)
        } else {
            (self.state.ghost_intensity - r * self.ghost_decay).max(0.0)
        };

        self.state.combined_reading()
    }
}
