// Copyright 2026 Hypermesh Foundation. All rights reserved.
// EMF Meter Simulation - Meter Core

use wasm_bindgen::prelude::*;

use crate::config::MeterConfig;
use crate::presenter::Presenter;
use crate::random::{self, RandomSource};
use crate::scheduler::{Scheduler, Task};
use crate::simulator::Simulator;
use crate::trigger::GhostTrigger;
use crate::types::*;

/// Frames kept per advance; older ones are counted in `dropped_frames`.
pub const MAX_REPORTED_FRAMES: usize = 600;

// ─── EmfMeter struct ─────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct EmfMeter {
    pub(crate) config: MeterConfig,
    pub(crate) simulator: Simulator,
    pub(crate) trigger: GhostTrigger,
    pub(crate) presenter: Presenter,
    pub(crate) scheduler: Scheduler,
    pub(crate) rng: Box<dyn RandomSource>,

    pub(crate) stats: MeterStats,
    pub(crate) last_frame: RenderFrame,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl EmfMeter {
    /// Build a meter around an explicit random source. The config is
    /// assumed valid; the wasm constructors validate before calling this.
    pub fn new_with(config: MeterConfig, rng: Box<dyn RandomSource>) -> Self {
        let simulator = Simulator::new(&config);
        let presenter = Presenter::new(&config);
        let mut meter = Self {
            trigger: GhostTrigger::new(&config),
            scheduler: Scheduler::new(config.update_period_ms, config.ghost_check_period_ms),
            last_frame: RenderFrame {
                reading: 0.0,
                text: String::new(),
                tier: DisplayTier::Normal,
                color: COLOR_GREEN.to_string(),
                active: Indicator::Green,
                glow: None,
            },
            stats: MeterStats::default(),
            config,
            simulator,
            presenter,
            rng,
        };
        meter.last_frame = meter.initial_frame();
        meter.stats.last_reading = meter.last_frame.reading;
        meter.stats.peak_reading = meter.last_frame.reading;
        meter
    }

    pub fn seeded(config: MeterConfig, seed: u64) -> Self {
        Self::new_with(config, Box::new(random::seeded(seed)))
    }

    /// Frame for the page before the first update.
    pub fn initial_frame(&mut self) -> RenderFrame {
        let reading = self.simulator.state().combined_reading();
        self.presenter.present(reading, self.rng.as_mut())
    }

    /// One meter update: advance the simulation and build the frame.
    pub fn tick_core(&mut self) -> TickResult {
        let reading = self.simulator.step(self.rng.as_mut());
        let frame = self.presenter.present(reading, self.rng.as_mut());

        self.stats.ticks += 1;
        self.stats.tier_counts[frame.tier.index()] += 1;
        self.stats.last_reading = reading;
        self.stats.peak_reading = self.stats.peak_reading.max(reading);
        self.last_frame = frame.clone();

        TickResult {
            tick: self.stats.ticks,
            now_ms: self.scheduler.now_ms(),
            state: self.simulator.state().clone(),
            frame,
        }
    }

    /// One ghost check at the current clock. Arms the fade on activation.
    pub fn check_ghost_core(&mut self) -> Option<MeterEvent> {
        let now = self.scheduler.now_ms();
        let event = self
            .trigger
            .check(self.simulator.state_mut(), self.rng.as_mut(), now)?;
        if let MeterEvent::GhostActivated { duration_ms, .. } = event {
            self.scheduler.schedule_fade(duration_ms);
        }
        self.record_event(&event);
        Some(event)
    }

    /// Force a ghost for `duration_ms`. Ignored while one is already present.
    pub fn trigger_ghost_core(&mut self, duration_ms: u64) -> Option<MeterEvent> {
        if self.simulator.state().ghost_active {
            return None;
        }
        let now = self.scheduler.now_ms();
        let event = self.trigger.activate(self.simulator.state_mut(), now, duration_ms);
        self.scheduler.schedule_fade(duration_ms);
        self.record_event(&event);
        Some(event)
    }

    /// The deferred end of an activation window.
    pub fn fade_ghost_core(&mut self) -> Option<MeterEvent> {
        let now = self.scheduler.now_ms();
        let event = self.trigger.fade(self.simulator.state_mut(), now)?;
        self.record_event(&event);
        Some(event)
    }

    /// Let `elapsed_ms` of host time pass, running every task that falls
    /// due in clock order. Only the newest `MAX_REPORTED_FRAMES` frames are
    /// returned; every event is.
    pub fn advance_core(&mut self, elapsed_ms: u64) -> AdvanceReport {
        let until = self.scheduler.now_ms().saturating_add(elapsed_ms);
        let mut report = AdvanceReport::default();

        while let Some((_, task)) = self.scheduler.pop_due(until) {
            match task {
                Task::MeterUpdate => {
                    report.frames.push(self.tick_core());
                    if report.frames.len() >= 2 * MAX_REPORTED_FRAMES {
                        report.trim_frames(MAX_REPORTED_FRAMES);
                    }
                }
                Task::GhostCheck => report.events.extend(self.check_ghost_core()),
                Task::GhostFade => report.events.extend(self.fade_ghost_core()),
            }
        }
        report.trim_frames(MAX_REPORTED_FRAMES);
        self.scheduler.settle(until);
        self.stats.now_ms = self.scheduler.now_ms();
        report
    }

    pub fn state(&self) -> &SimulationState {
        self.simulator.state()
    }

    pub fn stats(&self) -> &MeterStats {
        &self.stats
    }

    pub fn frame(&self) -> &RenderFrame {
        &self.last_frame
    }

    pub fn config(&self) -> &MeterConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn pending_fade_ms(&self) -> Option<u64> {
        self.scheduler.fade_at_ms()
    }

    /// Back to the configured starting point. Any pending fade is dropped;
    /// the random source carries on where it was.
    pub fn reset_core(&mut self) {
        self.simulator = Simulator::new(&self.config);
        self.scheduler = Scheduler::new(
            self.config.update_period_ms,
            self.config.ghost_check_period_ms,
        );
        self.stats = MeterStats::default();
        self.last_frame = self.initial_frame();
        self.stats.last_reading = self.last_frame.reading;
        self.stats.peak_reading = self.last_frame.reading;
    }

    fn record_event(&mut self, event: &MeterEvent) {
        match event {
            MeterEvent::GhostActivated { .. } => self.stats.ghost_activations += 1,
            MeterEvent::GhostFaded { .. } => self.stats.ghost_fades += 1,
        }
        crate::console_log(&event.message());
    }
}
