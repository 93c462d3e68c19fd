// EMF Meter Runner — drives the engine headless on its logical clock
//
// Usage:
//   cargo run --bin meter                              # 60s of the default preset
//   cargo run --bin meter -- --ticks 3000              # 3000 updates (5 minutes)
//   cargo run --bin meter -- --preset low-base         # Low-base variant
//   cargo run --bin meter -- --seed 42                 # Reproducible run
//   cargo run --bin meter -- --config meter.json       # Override constants
//   cargo run --bin meter -- --time-series out.jsonl   # Per-tick JSONL
//   cargo run --bin meter -- --quiet                   # Summary only

mod report;
mod time_series;

use emf_engine::{render, EmfMeter, MemoryTarget, MeterConfig, Preset};
use report::*;
use std::path::PathBuf;
use time_series::TimeSeriesRecorder;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    ticks: u64,
    seed: Option<u64>,
    preset: Preset,
    config: Option<PathBuf>,
    time_series: Option<PathBuf>,
    quiet: bool,
}

fn parse_args() -> Result<CliArgs, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        ticks: 600,
        seed: None,
        preset: Preset::default(),
        config: None,
        time_series: None,
        quiet: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--ticks" => {
                i += 1;
                cli.ticks = value(&args, i, "--ticks")?
                    .parse()
                    .map_err(|e| format!("--ticks: {}", e))?;
            }
            "--seed" => {
                i += 1;
                cli.seed = Some(
                    value(&args, i, "--seed")?
                        .parse()
                        .map_err(|e| format!("--seed: {}", e))?,
                );
            }
            "--preset" => {
                i += 1;
                cli.preset = Preset::from_name(value(&args, i, "--preset")?)
                    .map_err(|e| e.to_string())?;
            }
            "--config" => {
                i += 1;
                cli.config = Some(PathBuf::from(value(&args, i, "--config")?));
            }
            "--time-series" => {
                i += 1;
                cli.time_series = Some(PathBuf::from(value(&args, i, "--time-series")?));
            }
            "--quiet" => {
                cli.quiet = true;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(cli)
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", flag))
}

fn load_config(cli: &CliArgs) -> Result<MeterConfig, String> {
    match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("{}: {}", path.display(), e))?;
            MeterConfig::from_json(&json).map_err(|e| format!("{}: {}", path.display(), e))
        }
        None => Ok(cli.preset.config()),
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };

    let seed = cli.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    let label = if cli.config.is_some() { "custom" } else { cli.preset.name() };
    let period_ms = config.update_period_ms;
    let mut meter = EmfMeter::seeded(config, seed);
    let mut target = MemoryTarget::new();
    let mut recorder = cli.time_series.as_ref().map(|_| TimeSeriesRecorder::new());

    println!("\n  EMF Meter Runner");
    println!("  PRNG: ChaCha8Rng | Preset: {} | Seed: {} | Updates: {}\n",
        label, seed, cli.ticks);

    render(meter.frame(), &mut target);
    if !cli.quiet {
        println!("{}", panel_line(0, meter.frame().tier, &target));
    }

    while meter.stats().ticks < cli.ticks {
        let report = meter.advance_core(period_ms);
        for event in &report.events {
            if !cli.quiet {
                println!("{}", event_line(event));
            }
        }
        for result in &report.frames {
            render(&result.frame, &mut target);
            if let Some(recorder) = recorder.as_mut() {
                recorder.record(result);
            }
            if !cli.quiet {
                println!("{}", panel_line(result.now_ms, result.frame.tier, &target));
            }
        }
    }

    print_summary(meter.stats(), label, seed);

    if let (Some(recorder), Some(path)) = (recorder, cli.time_series.as_ref()) {
        match recorder.write_jsonl(path) {
            Ok(()) => println!("  {} snapshots saved to: {}\n", recorder.len(), path.display()),
            Err(e) => {
                eprintln!("Failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }
}
