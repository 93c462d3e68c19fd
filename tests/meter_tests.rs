#[cfg(test)]
mod tests {
    use emf_engine::*;

    fn meter_with(config: MeterConfig, source: impl RandomSource + 'static) -> EmfMeter {
        EmfMeter::new_with(config, Box::new(source))
    }

    // ========== End-to-End: Quiet Meter ==========

    #[test]
    fn test_zero_noise_holds_initial_reading() {
        // 0.5 is the centre of the noise band and never clears the 20% ghost roll
        let mut meter = meter_with(MeterConfig::default(), FixedSource::new(0.5));
        let mut target = MemoryTarget::new();

        let report = meter.advance_core(60_000);
        assert_eq!(report.frames.len(), 600);
        assert!(report.events.is_empty());

        for result in &report.frames {
            render(&result.frame, &mut target);
            assert_eq!(result.state.base_reading, 1.5);
            assert_eq!(result.frame.text, "1.5");
            assert_eq!(target.active_indicators(), vec![Indicator::Green]);
        }
    }

    #[test]
    fn test_low_base_preset_quiet_run() {
        let mut meter = meter_with(Preset::LowBase.config(), FixedSource::new(0.5));
        let report = meter.advance_core(10_000);
        assert!(report.frames.iter().all(|r| r.frame.text == "0.5"));
        assert_eq!(meter.stats().tier_counts, [100, 0, 0]);
    }

    // ========== Determinism ==========

    #[test]
    fn test_same_seed_same_run() {
        let mut a = EmfMeter::seeded(MeterConfig::default(), 1234);
        let mut b = EmfMeter::seeded(MeterConfig::default(), 1234);

        let ra = a.advance_core(120_000);
        let rb = b.advance_core(120_000);

        let texts = |r: &AdvanceReport| -> Vec<(String, DisplayTier)> {
            r.frames.iter().map(|t| (t.frame.text.clone(), t.frame.tier)).collect()
        };
        assert_eq!(texts(&ra), texts(&rb));
        assert_eq!(ra.events, rb.events);
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_chunked_advance_matches_single_advance() {
        let mut whole = EmfMeter::seeded(MeterConfig::default(), 99);
        let mut chunked = EmfMeter::seeded(MeterConfig::default(), 99);

        let single = whole.advance_core(30_000);
        let mut frames = Vec::new();
        let mut events = Vec::new();
        for _ in 0..300 {
            let r = chunked.advance_core(100);
            frames.extend(r.frames.into_iter().map(|t| t.frame));
            events.extend(r.events);
        }

        let single_frames: Vec<RenderFrame> = single.frames.into_iter().map(|t| t.frame).collect();
        assert_eq!(single_frames, frames);
        assert_eq!(single.events, events);
    }

    // ========== Invariants ==========

    #[test]
    fn test_bounds_hold_across_seeds() {
        for preset in [Preset::HighBase, Preset::LowBase] {
            let config = preset.config();
            for seed in 0..10 {
                let mut meter = EmfMeter::seeded(config.clone(), seed);
                let mut target = MemoryTarget::new();
                let frames: Vec<TickResult> =
                    (0..5).flat_map(|_| meter.advance_core(60_000).frames).collect();
                assert_eq!(frames.len(), 3000);

                for result in &frames {
                    let s = &result.state;
                    assert!(s.base_reading >= config.reading_floor);
                    assert!(s.ghost_intensity >= 0.0 && s.ghost_intensity <= config.ghost_max);

                    render(&result.frame, &mut target);
                    assert_eq!(target.active_indicators().len(), 1);
                    assert_eq!(result.frame.glow.is_some(), result.frame.tier == DisplayTier::High);
                }
            }
        }
    }

    #[test]
    fn test_ghost_moves_toward_target_each_update() {
        let mut meter = EmfMeter::seeded(MeterConfig::default(), 7);
        let mut previous = meter.state().ghost_intensity;
        let frames: Vec<TickResult> =
            (0..10).flat_map(|_| meter.advance_core(60_000).frames).collect();
        for result in frames {
            let s = &result.state;
            if s.ghost_active {
                assert!(s.ghost_intensity >= previous);
            } else {
                assert!(s.ghost_intensity <= previous);
            }
            previous = s.ghost_intensity;
        }
    }

    #[test]
    fn test_tie_reading_rounds_up_on_first_frame() {
        let config = MeterConfig { initial_reading: 1.25, ..MeterConfig::default() };
        assert!(config.validate().is_ok());
        let meter = meter_with(config, FixedSource::new(0.5));
        assert_eq!(meter.frame().text, "1.3");
    }

    // ========== Ghost Windows ==========

    #[test]
    fn test_activation_windows_never_overlap() {
        let config = MeterConfig::default();
        for seed in 0..10 {
            let mut meter = EmfMeter::seeded(config.clone(), seed);
            let events = meter.advance_core(900_000).events;
            assert!(!events.is_empty(), "no ghost in 15 minutes (seed {})", seed);

            let mut open: Option<u64> = None;
            for event in &events {
                match *event {
                    MeterEvent::GhostActivated { at_ms, duration_ms } => {
                        assert!(open.is_none(), "stacked activation at {}ms", at_ms);
                        assert!(duration_ms >= config.ghost_min_duration_ms);
                        assert!(duration_ms < config.ghost_max_duration_ms);
                        assert_eq!(at_ms % config.ghost_check_period_ms, 0);
                        open = Some(at_ms + duration_ms);
                    }
                    MeterEvent::GhostFaded { at_ms } => {
                        assert_eq!(open.take(), Some(at_ms), "unexpected fade at {}ms", at_ms);
                    }
                }
            }

            let stats = meter.stats();
            let expected_fades = stats.ghost_activations - u32::from(open.is_some());
            assert_eq!(stats.ghost_fades, expected_fades);
        }
    }

    #[test]
    fn test_scripted_activation_and_fade() {
        // Checks read [roll, duration]; updates read [noise, ghost].
        // 0.5 keeps the base flat, so only the scripted roll matters.
        // 29 updates (58 samples) precede the first check
        let mut script = vec![0.5; 58];
        script.extend([0.0, 0.0]); // check at 3000ms: activate, 5000ms window
        let mut meter = meter_with(MeterConfig::default(), ScriptedSource::new(script));

        let report = meter.advance_core(3000);
        assert_eq!(
            report.events,
            vec![MeterEvent::GhostActivated { at_ms: 3000, duration_ms: 5000 }]
        );
        assert_eq!(meter.pending_fade_ms(), Some(8000));
        assert!(meter.state().ghost_active);
    }

    // ========== Tiers Under a Ghost ==========

    #[test]
    fn test_forced_ghost_drives_meter_red() {
        let mut meter = meter_with(MeterConfig::default(), FixedSource::new(0.99));
        assert!(meter.trigger_ghost_core(15_000).is_some());

        let report = meter.advance_core(2_000);
        let tiers: Vec<DisplayTier> = report.frames.iter().map(|r| r.frame.tier).collect();
        // 1.5 + 0.0245 drift + 0.495 ghost already clears 2.0 on the first update
        assert_eq!(tiers[0], DisplayTier::Elevated);
        assert!(tiers.windows(2).all(|w| w[0].index() <= w[1].index()));
        assert_eq!(*tiers.last().unwrap(), DisplayTier::High);

        let last = report.last_frame().unwrap();
        assert_eq!(last.color, COLOR_RED);
        let glow = last.glow.as_ref().unwrap();
        assert!((glow.blur_px - 14.9).abs() < 1e-9);
        assert!(meter.stats().peak_reading > 5.0);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut meter = EmfMeter::seeded(MeterConfig::default(), 5);
        meter.trigger_ghost_core(10_000);
        meter.advance_core(4_000);
        meter.reset_core();

        assert_eq!(meter.frame().text, "1.5");
        assert_eq!(meter.now_ms(), 0);
        assert_eq!(meter.pending_fade_ms(), None);
        let fresh = MeterStats {
            last_reading: 1.5,
            peak_reading: 1.5,
            ..MeterStats::default()
        };
        assert_eq!(*meter.stats(), fresh);
    }

    // ========== Construction ==========

    #[test]
    fn test_wasm_constructor_picks_preset() {
        let meter = EmfMeter::new(Some("low-base".to_string()), Some(3)).ok().unwrap();
        assert_eq!(meter.config().initial_reading, 0.5);
        assert_eq!(meter.get_reading(), 0.5);

        let meter = EmfMeter::new(None, None).ok().unwrap();
        assert_eq!(meter.config(), &MeterConfig::default());
    }
}
