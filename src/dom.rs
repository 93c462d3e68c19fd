// Copyright 2026 Hypermesh Foundation. All rights reserved.
// EMF Meter Simulation - Browser Render Target

//! Binds the meter to the page: looks the widgets up once, draws frames onto
//! them, and drives the meter's clock from a single browser interval.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::meter::EmfMeter;
use crate::presenter::{render, RenderTarget};
use crate::types::{Glow, Indicator};

const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MountError {
    #[error("no global window (not running in a browser?)")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("meter element #{0} not found in the page")]
    MissingElement(String),

    #[error("element #{0} is not an HTML element")]
    NotHtml(String),

    #[error("could not start the update interval: {0}")]
    Interval(String),
}

/// Ids of the page widgets the meter draws onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub reading: String,
    pub green: String,
    pub yellow: String,
    pub red: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            reading: "reading".to_string(),
            green: "led-green".to_string(),
            yellow: "led-yellow".to_string(),
            red: "led-red".to_string(),
        }
    }
}

impl ElementIds {
    pub fn indicator(&self, indicator: Indicator) -> &str {
        match indicator {
            Indicator::Green => &self.green,
            Indicator::Yellow => &self.yellow,
            Indicator::Red => &self.red,
        }
    }
}

// ─── DomTarget ───────────────────────────────────────────────────────────────

pub struct DomTarget {
    reading: HtmlElement,
    green: Element,
    yellow: Element,
    red: Element,
}

impl DomTarget {
    /// Every element is resolved up front; the first missing one aborts.
    pub fn mount(ids: &ElementIds) -> Result<Self, MountError> {
        let document = web_sys::window()
            .ok_or(MountError::NoWindow)?
            .document()
            .ok_or(MountError::NoDocument)?;
        let lookup = |id: &str| {
            document
                .get_element_by_id(id)
                .ok_or_else(|| MountError::MissingElement(id.to_string()))
        };

        let reading = lookup(&ids.reading)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| MountError::NotHtml(ids.reading.clone()))?;
        Ok(Self {
            reading,
            green: lookup(ids.indicator(Indicator::Green))?,
            yellow: lookup(ids.indicator(Indicator::Yellow))?,
            red: lookup(ids.indicator(Indicator::Red))?,
        })
    }

    fn led(&self, indicator: Indicator) -> &Element {
        match indicator {
            Indicator::Green => &self.green,
            Indicator::Yellow => &self.yellow,
            Indicator::Red => &self.red,
        }
    }
}

impl RenderTarget for DomTarget {
    fn set_text(&mut self, text: &str) {
        self.reading.set_text_content(Some(text));
    }

    fn set_color(&mut self, color: &str) {
        let _ = self.reading.style().set_property("color", color);
    }

    fn set_indicator(&mut self, indicator: Indicator, active: bool) {
        let classes = self.led(indicator).class_list();
        let _ = if active {
            classes.add_1(ACTIVE_CLASS)
        } else {
            classes.remove_1(ACTIVE_CLASS)
        };
    }

    fn set_glow(&mut self, glow: Option<&Glow>) {
        let value = glow.map(Glow::css).unwrap_or_else(|| "none".to_string());
        let _ = self.reading.style().set_property("text-shadow", &value);
    }
}

// ─── Host loop ───────────────────────────────────────────────────────────────

/// A running meter on the page. Dropping the handle stops it.
#[wasm_bindgen]
pub struct MeterHandle {
    meter: Rc<RefCell<EmfMeter>>,
    interval_id: Option<i32>,
    _tick: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl MeterHandle {
    pub fn stop(&mut self) {
        if let (Some(id), Some(window)) = (self.interval_id.take(), web_sys::window()) {
            window.clear_interval_with_handle(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.interval_id.is_some()
    }

    pub fn get_stats(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.meter.borrow().stats()).unwrap_or(JsValue::NULL)
    }

    pub fn trigger_ghost(&self, duration_ms: u32) -> bool {
        self.meter
            .borrow_mut()
            .trigger_ghost_core(u64::from(duration_ms))
            .is_some()
    }
}

impl Drop for MeterHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Mount onto the page and start updating. `ids` may be omitted or partial.
#[wasm_bindgen]
pub fn start_meter(
    preset: Option<String>,
    seed: Option<u32>,
    ids: JsValue,
) -> Result<MeterHandle, JsValue> {
    let ids: ElementIds = if ids.is_undefined() || ids.is_null() {
        ElementIds::default()
    } else {
        serde_wasm_bindgen::from_value(ids).map_err(crate::to_js_error)?
    };
    let meter = EmfMeter::new(preset, seed)?;
    mount_meter(meter, &ids).map_err(crate::to_js_error)
}

pub fn mount_meter(meter: EmfMeter, ids: &ElementIds) -> Result<MeterHandle, MountError> {
    let window = web_sys::window().ok_or(MountError::NoWindow)?;
    let mut target = DomTarget::mount(ids)?;
    render(meter.frame(), &mut target);

    let period_ms = meter.config().update_period_ms;
    let meter = Rc::new(RefCell::new(meter));
    let shared = Rc::clone(&meter);
    let tick = Closure::wrap(Box::new(move || {
        let report = shared.borrow_mut().advance_core(period_ms);
        for result in &report.frames {
            render(&result.frame, &mut target);
        }
    }) as Box<dyn FnMut()>);

    let interval_id = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            i32::try_from(period_ms).unwrap_or(i32::MAX),
        )
        .map_err(|e| MountError::Interval(format!("{:?}", e)))?;

    Ok(MeterHandle {
        meter,
        interval_id: Some(interval_id),
        _tick: tick,
    })
}
