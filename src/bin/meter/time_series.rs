// Per-Tick JSONL Time Series Recorder
// Outputs one JSON line per meter update for offline analysis

use emf_engine::{DisplayTier, Indicator, TickResult};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub now_ms: u64,
    pub base_reading: f64,
    pub ghost_intensity: f64,
    pub ghost_active: bool,
    pub reading: f64,
    pub text: String,
    pub tier: DisplayTier,
    pub active: Indicator,
    pub glow_px: Option<f64>,
}

impl TickSnapshot {
    pub fn from_result(result: &TickResult) -> Self {
        Self {
            tick: result.tick,
            now_ms: result.now_ms,
            base_reading: result.state.base_reading,
            ghost_intensity: result.state.ghost_intensity,
            ghost_active: result.state.ghost_active,
            reading: result.frame.reading,
            text: result.frame.text.clone(),
            tier: result.frame.tier,
            active: result.frame.active,
            glow_px: result.frame.glow.as_ref().map(|g| g.blur_px),
        }
    }
}

/// Time series recorder that accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record(&mut self, result: &TickResult) {
        self.snapshots.push(TickSnapshot::from_result(result));
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
