// Copyright 2026 Hypermesh Foundation. All rights reserved.
// EMF Meter Simulation - Shared Types

use serde::{Deserialize, Serialize};

pub const COLOR_GREEN: &str = "#00ff00";
pub const COLOR_YELLOW: &str = "#ffff00";
pub const COLOR_RED: &str = "#ff0000";

// ─── DisplayTier ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayTier {
    #[default]
    Normal,
    Elevated,
    High,
}

impl DisplayTier {
    pub const ALL: [DisplayTier; 3] = [Self::Normal, Self::Elevated, Self::High];

    /// Memoryless classification: lower bound of each band is inclusive.
    pub fn classify(reading: f64, elevated_threshold: f64, high_threshold: f64) -> Self {
        if reading < elevated_threshold {
            Self::Normal
        } else if reading < high_threshold {
            Self::Elevated
        } else {
            Self::High
        }
    }

    pub fn indicator(&self) -> Indicator {
        match self {
            Self::Normal => Indicator::Green,
            Self::Elevated => Indicator::Yellow,
            Self::High => Indicator::Red,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Normal => COLOR_GREEN,
            Self::Elevated => COLOR_YELLOW,
            Self::High => COLOR_RED,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Elevated => "ELEVATED",
            Self::High => "HIGH",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Elevated => 1,
            Self::High => 2,
        }
    }
}

// ─── Indicator ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    Green,
    Yellow,
    Red,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Self::Green, Self::Yellow, Self::Red];
}

// ─── SimulationState ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub base_reading: f64,
    pub ghost_intensity: f64,
    pub ghost_active: bool,
}

impl SimulationState {
    pub fn combined_reading(&self) -> f64 {
        self.base_reading + self.ghost_intensity
    }
}

// ─── RenderFrame ─────────────────────────────────────────────────────────────

/// Glow applied to the reading text at the High tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub blur_px: f64,
    pub color: String,
}

impl Glow {
    /// CSS `text-shadow` value.
    pub fn css(&self) -> String {
        format!("0 0 {}px {}", self.blur_px, self.color)
    }
}

/// Everything the page needs to draw one tick. Derived entirely from the
/// reading; nothing carries over from the previous frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub reading: f64,
    pub text: String,
    pub tier: DisplayTier,
    pub color: String,
    pub active: Indicator,
    pub glow: Option<Glow>,
}

impl RenderFrame {
    pub fn is_active(&self, indicator: Indicator) -> bool {
        self.active == indicator
    }
}

// ─── MeterEvent ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum MeterEvent {
    GhostActivated { at_ms: u64, duration_ms: u64 },
    GhostFaded { at_ms: u64 },
}

impl MeterEvent {
    pub fn message(&self) -> String {
        match self {
            Self::GhostActivated { duration_ms, .. } => format!(
                "Ghost activity started for {} seconds!",
                *duration_ms as f64 / 1000.0
            ),
            Self::GhostFaded { .. } => "Ghost activity fading...".to_string(),
        }
    }

    pub fn at_ms(&self) -> u64 {
        match self {
            Self::GhostActivated { at_ms, .. } | Self::GhostFaded { at_ms } => *at_ms,
        }
    }
}

// ─── TickResult ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct TickResult {
    pub tick: u64,
    pub now_ms: u64,
    pub state: SimulationState,
    pub frame: RenderFrame,
}

// ─── AdvanceReport ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdvanceReport {
    pub frames: Vec<TickResult>,
    pub events: Vec<MeterEvent>,
    /// Frames produced but not kept in `frames`.
    pub dropped_frames: u64,
}

impl AdvanceReport {
    /// Keep only the newest `keep` frames.
    pub fn trim_frames(&mut self, keep: usize) {
        if self.frames.len() > keep {
            let excess = self.frames.len() - keep;
            self.frames.drain(..excess);
            self.dropped_frames += excess as u64;
        }
    }

    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.frames.last().map(|t| &t.frame)
    }
}

// ─── MeterStats ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterStats {
    pub ticks: u64,
    pub now_ms: u64,
    /// Updates spent in each tier: [Normal, Elevated, High].
    pub tier_counts: [u64; 3],
    pub ghost_activations: u32,
    pub ghost_fades: u32,
    pub peak_reading: f64,
    pub last_reading: f64,
}

impl MeterStats {
    pub fn tier_share(&self, tier: DisplayTier) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.tier_counts[tier.index()] as f64 / self.ticks as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        let classify = |r| DisplayTier::classify(r, 2.0, 5.0);
        assert_eq!(classify(0.0), DisplayTier::Normal);
        assert_eq!(classify(1.9), DisplayTier::Normal);
        assert_eq!(classify(2.0), DisplayTier::Elevated);
        assert_eq!(classify(4.99), DisplayTier::Elevated);
        assert_eq!(classify(5.0), DisplayTier::High);
        assert_eq!(classify(11.5), DisplayTier::High);
    }

    #[test]
    fn test_tier_styling() {
        assert_eq!(DisplayTier::Normal.indicator(), Indicator::Green);
        assert_eq!(DisplayTier::Elevated.color(), COLOR_YELLOW);
        assert_eq!(DisplayTier::High.color(), COLOR_RED);
        assert_eq!(DisplayTier::High.index(), 2);
    }

    #[test]
    fn test_event_messages() {
        let started = MeterEvent::GhostActivated { at_ms: 3000, duration_ms: 7500 };
        assert_eq!(started.message(), "Ghost activity started for 7.5 seconds!");
        assert_eq!(started.at_ms(), 3000);
        let faded = MeterEvent::GhostFaded { at_ms: 10500 };
        assert_eq!(faded.message(), "Ghost activity fading...");
    }

    #[test]
    fn test_event_serializes_with_kind_tag() {
        let json = serde_json::to_value(MeterEvent::GhostFaded { at_ms: 42 }).unwrap();
        assert_eq!(json["kind"], "GhostFaded");
        assert_eq!(json["at_ms"], 42);
    }

    #[test]
    fn test_glow_css() {
        let glow = Glow { blur_px: 7.25, color: COLOR_RED.to_string() };
        assert_eq!(glow.css(), "0 0 7.25px #ff0000");
    }

    #[test]
    fn test_tier_share_empty() {
        let stats = MeterStats::default();
        assert_eq!(stats.tier_share(DisplayTier::High), 0.0);
    }
}
