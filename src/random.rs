// Copyright 2026 Hypermesh Foundation. All rights reserved.
// EMF Meter Simulation - Random Sources

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Uniform samples in `[0, 1)`.
///
/// The engine never reaches for a global generator; every draw goes through
/// one of these so a seeded or scripted source makes a run reproducible.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform sample in `[lo, hi)`.
    fn next_in(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_unit() * (hi - lo)
    }
}

impl RandomSource for ChaCha8Rng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Always yields the same value (clamped into `[0, 1)`).
#[derive(Debug, Clone, Copy)]
pub struct FixedSource(f64);

impl FixedSource {
    pub fn new(value: f64) -> Self {
        Self(clamp_unit(value))
    }
}

impl RandomSource for FixedSource {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Replays a fixed list of samples, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    samples: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(samples: Vec<f64>) -> Self {
        let samples = if samples.is_empty() {
            vec![0.0]
        } else {
            samples.into_iter().map(clamp_unit).collect()
        };
        Self { samples, cursor: 0 }
    }

    /// Number of samples drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let value = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        value
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
