// Copyright 2026 Hypermesh Foundation. All rights reserved.
// EMF Meter Simulation ("The Haunt")

pub mod config;
pub mod dom;
pub mod meter;
pub mod presenter;
pub mod random;
pub mod scheduler;
pub mod simulator;
pub mod trigger;
pub mod types;

pub use config::{ConfigError, MeterConfig, Preset};
pub use meter::{EmfMeter, MAX_REPORTED_FRAMES};
pub use presenter::{render, MemoryTarget, RenderTarget};
pub use random::{FixedSource, RandomSource, ScriptedSource};
pub use types::*;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);

    #[wasm_bindgen(js_namespace = Math, js_name = random)]
    fn math_random() -> f64;
}

/// Informational log line: the browser console on wasm, stderr natively.
#[cfg(target_arch = "wasm32")]
pub(crate) fn console_log(msg: &str) {
    log(msg);
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn console_log(msg: &str) {
    eprintln!("[emf] {}", msg);
}

/// Seed for unseeded meters, taken from the host.
#[cfg(target_arch = "wasm32")]
pub(crate) fn host_seed() -> u64 {
    (math_random() * u32::MAX as f64) as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn host_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn resolve_preset(preset: Option<String>) -> Result<MeterConfig, JsValue> {
    let preset = match preset {
        Some(name) => Preset::from_name(&name).map_err(to_js_error)?,
        None => Preset::default(),
    };
    Ok(preset.config())
}

pub(crate) fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl EmfMeter {
    /// `preset` is `"high-base"` (default) or `"low-base"`. Without a seed
    /// the host supplies one.
    #[wasm_bindgen(constructor)]
    pub fn new(preset: Option<String>, seed: Option<u32>) -> Result<EmfMeter, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config = resolve_preset(preset)?;
        let seed = seed.map(u64::from).unwrap_or_else(host_seed);
        Ok(EmfMeter::seeded(config, seed))
    }

    /// Build from a (possibly partial) config object.
    pub fn from_config(config: JsValue, seed: Option<u32>) -> Result<EmfMeter, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config: MeterConfig = if config.is_undefined() || config.is_null() {
            MeterConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
        };
        config.validate().map_err(to_js_error)?;
        let seed = seed.map(u64::from).unwrap_or_else(host_seed);
        Ok(EmfMeter::seeded(config, seed))
    }

    /// One meter update, outside the clock.
    pub fn tick(&mut self) -> JsValue {
        let result = self.tick_core();
        to_js(&result)
    }

    /// Let `elapsed_ms` pass on the meter's clock.
    pub fn advance(&mut self, elapsed_ms: u32) -> JsValue {
        let report = self.advance_core(u64::from(elapsed_ms));
        to_js(&report)
    }

    pub fn check_ghost(&mut self) -> JsValue {
        match self.check_ghost_core() {
            Some(event) => to_js(&event),
            None => JsValue::NULL,
        }
    }

    pub fn trigger_ghost(&mut self, duration_ms: u32) -> bool {
        self.trigger_ghost_core(u64::from(duration_ms)).is_some()
    }

    pub fn get_state(&self) -> JsValue {
        to_js(self.state())
    }

    pub fn get_stats(&self) -> JsValue {
        to_js(self.stats())
    }

    pub fn get_frame(&self) -> JsValue {
        to_js(self.frame())
    }

    pub fn get_config(&self) -> JsValue {
        to_js(self.config())
    }

    pub fn get_reading(&self) -> f64 {
        self.state().combined_reading()
    }

    /// Run N updates without returning results.
    pub fn run_batch(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick_core();
        }
    }

    pub fn reset(&mut self) {
        self.reset_core();
    }
}
