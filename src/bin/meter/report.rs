// Terminal Output — per-frame panel lines and the end-of-run summary

use emf_engine::{DisplayTier, Indicator, MemoryTarget, MeterEvent, MeterStats};

/// One line showing what the page would show right now.
pub fn panel_line(now_ms: u64, tier: DisplayTier, target: &MemoryTarget) -> String {
    let lights: String = Indicator::ALL
        .iter()
        .map(|i| if target.is_active(*i) { light_glyph(*i) } else { '.' })
        .collect();
    let glow = target.glow.as_deref().unwrap_or("-");
    format!(
        "  {:>8.1}s  [{}]  {:>5} mG  {:<8}  {:<8}  {}",
        now_ms as f64 / 1000.0,
        lights,
        target.text,
        tier.label(),
        target.color,
        glow,
    )
}

pub fn event_line(event: &MeterEvent) -> String {
    format!("  {:>8.1}s  ** {}", event.at_ms() as f64 / 1000.0, event.message())
}

fn light_glyph(indicator: Indicator) -> char {
    match indicator {
        Indicator::Green => 'G',
        Indicator::Yellow => 'Y',
        Indicator::Red => 'R',
    }
}

pub fn print_summary(stats: &MeterStats, preset: &str, seed: u64) {
    println!("  {}", "-".repeat(64));
    println!("  Preset: {}  Seed: {}  Simulated: {:.1}s  Updates: {}",
        preset, seed, stats.now_ms as f64 / 1000.0, stats.ticks);
    println!("  {:<10} {:>8} {:>8}", "Tier", "Updates", "Share");
    for tier in DisplayTier::ALL {
        println!("  {:<10} {:>8} {:>7.1}%",
            tier.label(),
            stats.tier_counts[tier.index()],
            stats.tier_share(tier) * 100.0,
        );
    }
    println!("  Ghost activations: {}  fades: {}", stats.ghost_activations, stats.ghost_fades);
    println!("  Peak reading: {:.1} mG  Last reading: {:.1} mG\n",
        stats.peak_reading, stats.last_reading);
}
