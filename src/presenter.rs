// Copyright 2026 Hypermesh Foundation. All rights reserved.
// EMF Meter Simulation - Presenter

//! Maps a reading to what the page shows: the number, its color, which one
//! of the three lights is on and, at the High tier, a flickering glow.

use std::collections::HashMap;

use crate::config::MeterConfig;
use crate::random::RandomSource;
use crate::types::{DisplayTier, Glow, Indicator, RenderFrame, COLOR_GREEN};

#[derive(Debug, Clone)]
pub struct Presenter {
    elevated_threshold: f64,
    high_threshold: f64,
    glow_min_px: f64,
    glow_max_px: f64,
}

impl Presenter {
    pub fn new(config: &MeterConfig) -> Self {
        Self {
            elevated_threshold: config.elevated_threshold,
            high_threshold: config.high_threshold,
            glow_min_px: config.glow_min_px,
            glow_max_px: config.glow_max_px,
        }
    }

    pub fn classify(&self, reading: f64) -> DisplayTier {
        DisplayTier::classify(reading, self.elevated_threshold, self.high_threshold)
    }

    /// Build the frame for `reading`. Draws one sample, and only at the
    /// High tier, so the glow changes every tick.
    pub fn present(&self, reading: f64, rng: &mut dyn RandomSource) -> RenderFrame {
        let tier = self.classify(reading);
        let glow = match tier {
            DisplayTier::High => Some(Glow {
                blur_px: rng.next_in(self.glow_min_px, self.glow_max_px),
                color: tier.color().to_string(),
            }),
            _ => None,
        };
        RenderFrame {
            reading,
            text: format_reading(reading),
            tier,
            color: tier.color().to_string(),
            active: tier.indicator(),
            glow,
        }
    }
}

/// One decimal place, as the display shows it. A value sitting exactly
/// halfway between two tenths rounds up.
pub fn format_reading(reading: f64) -> String {
    // Exact ties are the odd multiples of 0.25; scaling by 4 is exact.
    let quarters = reading * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return format!("{:.1}", (reading * 10.0).ceil() / 10.0);
    }
    format!("{:.1}", reading)
}

// ─── Render targets ──────────────────────────────────────────────────────────

/// The page-side widgets a frame is drawn onto.
pub trait RenderTarget {
    fn set_text(&mut self, text: &str);
    fn set_color(&mut self, color: &str);
    fn set_indicator(&mut self, indicator: Indicator, active: bool);
    /// `None` clears the glow.
    fn set_glow(&mut self, glow: Option<&Glow>);
}

/// Draw `frame` onto `target`. Everything is reset first, so no state from
/// the previous frame survives.
pub fn render(frame: &RenderFrame, target: &mut dyn RenderTarget) {
    for indicator in Indicator::ALL {
        target.set_indicator(indicator, false);
    }
    target.set_glow(None);
    target.set_color(COLOR_GREEN);

    target.set_text(&frame.text);
    target.set_indicator(frame.active, true);
    target.set_color(&frame.color);
    if let Some(glow) = &frame.glow {
        target.set_glow(Some(glow));
    }
}

/// Keeps the widget state in memory. Used by the native runner and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryTarget {
    pub text: String,
    pub color: String,
    pub glow: Option<String>,
    indicators: HashMap<Indicator, bool>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, indicator: Indicator) -> bool {
        self.indicators.get(&indicator).copied().unwrap_or(false)
    }

    pub fn active_indicators(&self) -> Vec<Indicator> {
        Indicator::ALL
            .into_iter()
            .filter(|i| self.is_active(*i))
            .collect()
    }
}

impl RenderTarget for MemoryTarget {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_color(&mut self, color: &str) {
        self.color = color.to_string();
    }

    fn set_indicator(&mut self, indicator: Indicator, active: bool) {
        self.indicators.insert(indicator, active);
    }

    fn set_glow(&mut self, glow: Option<&Glow>) {
        self.glow = glow.map(Glow::css);
    }
}
