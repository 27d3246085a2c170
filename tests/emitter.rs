mod tests {
    use myrtio_light_emitters::config::SeedSource;
    use myrtio_light_emitters::emitter::{SEED_RANGE, build_emitters};
    use myrtio_light_emitters::{
        BlendMode, ConfigError, Duration, Emitter, EmitterConfig, Instant, Rgb, Rgbf, WaveformMode,
        fm, scale_sine,
    };
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn emitter(config: &EmitterConfig, strip_length: usize, seed: f64) -> Emitter<16> {
        let settings = config.resolve().unwrap();
        Emitter::new(&settings, strip_length, seed).unwrap()
    }

    fn sample_strip(emitter: &mut Emitter<16>, len: usize) -> Vec<Rgb> {
        (0..len).map(|i| emitter.position_tick(i).to_rgb()).collect()
    }

    #[test]
    fn test_constant() {
        let config = EmitterConfig::new(WaveformMode::Constant, Rgb::new(10, 20, 30));
        let mut emitter = emitter(&config, 5, 0.0);

        emitter.time_tick(Instant::from_millis(0), Duration::from_millis(0));
        for position in 0..5 {
            assert_eq!(emitter.position_tick(position), Rgbf::new(10.0, 20.0, 30.0));
        }
        assert_eq!(emitter.mode(), WaveformMode::Constant);
        assert_eq!(emitter.blend_mode(), BlendMode::Sum);
    }

    #[test]
    fn test_test_pattern() {
        let config = EmitterConfig::new(WaveformMode::Test, Rgb::new(255, 0, 0));
        let mut emitter = emitter(&config, 4, 0.0);

        emitter.time_tick(Instant::from_millis(0), Duration::from_millis(0));
        assert_eq!(emitter.position_tick(0), Rgbf::gray(63.75));
        assert_eq!(emitter.position_tick(1), Rgbf::gray(127.5));
        assert_eq!(emitter.position_tick(2), Rgbf::gray(191.25));
        assert_eq!(emitter.position_tick(3), Rgbf::gray(0.0));

        // The pattern is static
        emitter.time_tick(Instant::from_millis(40), Duration::from_millis(40));
        assert_eq!(
            sample_strip(&mut emitter, 4),
            [
                Rgb::new(64, 64, 64),
                Rgb::new(128, 128, 128),
                Rgb::new(191, 191, 191),
                Rgb::new(0, 0, 0),
            ]
        );
    }

    #[test]
    fn test_test_pattern_before_first_tick() {
        let config = EmitterConfig::new(WaveformMode::Test, Rgb::new(0, 0, 0));
        let mut emitter = emitter(&config, 4, 0.0);

        assert_eq!(emitter.position_tick(0), Rgbf::gray(63.75));
        assert_eq!(emitter.position_tick(3), Rgbf::gray(0.0));
    }

    #[test]
    fn test_stripes() {
        let mut config = EmitterConfig::new(WaveformMode::Stripes, Rgb::new(0, 100, 0)).with_width(2.0);
        config.speed = Some(0.0);
        let mut emitter = emitter(&config, 6, 0.0);

        emitter.time_tick(Instant::from_secs(3), Duration::from_millis(20));
        let on = Rgb::new(0, 100, 0);
        let off = Rgb::new(0, 0, 0);
        assert_eq!(sample_strip(&mut emitter, 6), [off, on, on, off, off, on]);
    }

    #[test]
    fn test_stripes_move() {
        let mut config = EmitterConfig::new(WaveformMode::Stripes, Rgb::new(0, 100, 0)).with_width(2.0);
        config.speed = Some(1.0);
        let mut emitter = emitter(&config, 4, 0.0);

        // One pixel per second
        emitter.time_tick(Instant::from_secs(1), Duration::from_secs(1));
        let on = Rgb::new(0, 100, 0);
        let off = Rgb::new(0, 0, 0);
        assert_eq!(sample_strip(&mut emitter, 4), [off, off, on, on]);
    }

    #[test]
    fn test_classic_level_map() {
        let mut config = EmitterConfig::new(WaveformMode::Classic, Rgb::new(200, 100, 50));
        config.scale = Some(0.0);
        config.offset = Some(0.5);
        let mut emitter = emitter(&config, 8, 12.0);

        emitter.time_tick(Instant::from_millis(500), Duration::from_millis(16));
        for position in 0..8 {
            assert_eq!(emitter.position_tick(position), Rgbf::new(100.0, 50.0, 25.0));
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn test_classic_level() {
        let seed = 1.0;
        let mut config = EmitterConfig::new(WaveformMode::Classic, Rgb::new(200, 100, 0));
        config.power = Some(2.0);
        let mut emitter = emitter(&config, 4, seed);

        // t = 2.5 s, dt = 0.5 s, default speed 1, acceleration 0.1, morph 1, width 8
        emitter.time_tick(Instant::from_millis(2500), Duration::from_millis(500));
        let time = (0.1f64 * 2.5 + seed).sin() * 0.5;
        let delta = scale_sine(0.1 * time + seed, 0.5, 1.5) / 8.0;
        let mut position = seed + 0.3 * time;

        for pixel in 0..4 {
            position += delta;
            let level = scale_sine(0.2 * time + position, 0.0, 1.0)
                * scale_sine(time + 0.2 * position, 0.0, 1.0);
            let level = level * level;

            let color = emitter.position_tick(pixel);
            assert_close(color.r, 200.0 * level);
            assert_close(color.g, 100.0 * level);
            assert_eq!(color.b, 0.0);
        }
    }

    #[test]
    fn test_classic_sweep_order() {
        let config = EmitterConfig::new(WaveformMode::Classic, Rgb::new(255, 255, 255));
        let mut emitter = emitter(&config, 4, 1.0);
        let now = Instant::from_millis(1200);

        emitter.time_tick(now, Duration::from_millis(40));
        let first: Vec<f64> = (0..4).map(|p| emitter.position_tick(p).r).collect();
        // Resampling within the same frame keeps advancing the sweep
        let second: Vec<f64> = (0..4).map(|p| emitter.position_tick(p).r).collect();
        assert_ne!(first, second);

        // A new tick without elapsed time restarts the sweep at the same place
        emitter.time_tick(now, Duration::from_millis(0));
        assert_eq!(emitter.position_tick(0).r, first[0]);
    }

    #[test]
    fn test_fm_level() {
        const CARRIER: f64 = 1.0;
        const MODULATION: f64 = 0.25;
        let (seed, speed, morph, width, slide, power) = (4.0, 1.5, 2.0, 6.0, 0.3, 3.0);

        let mut config = EmitterConfig::new(WaveformMode::Fm, Rgb::new(0, 200, 100));
        config.speed = Some(speed);
        config.morph = Some(morph);
        config.slide = Some(slide);
        config.power = Some(power);
        let config = config.with_width(width);
        let mut emitter = emitter(&config, 8, seed);

        let t = 3.2;
        emitter.time_tick(Instant::from_millis(3200), Duration::from_millis(16));
        let depth = scale_sine(0.05 * morph * t + seed, 0.5, 4.0);
        let time = fm(0.2 * speed * t, CARRIER, depth, MODULATION) + speed * t;

        for pixel in 0..8 {
            let x = time + (core::f64::consts::TAU / width) * pixel as f64 + seed + slide;
            let level = scale_sine(fm(x, CARRIER, depth, MODULATION), 0.0, 1.0).powf(power);

            let color = emitter.position_tick(pixel);
            assert_eq!(color.r, 0.0);
            assert_close(color.g, 200.0 * level);
            assert_close(color.b, 100.0 * level);
        }
    }

    #[test]
    fn test_classic_is_deterministic() {
        let config = EmitterConfig::new(WaveformMode::Classic, Rgb::new(255, 255, 255));
        let mut first = emitter(&config, 8, 42.0);
        let mut second = emitter(&config, 8, 42.0);

        for step in 1..20u64 {
            let now = Instant::from_millis(step * 16);
            first.time_tick(now, Duration::from_millis(16));
            second.time_tick(now, Duration::from_millis(16));
            assert_eq!(sample_strip(&mut first, 8), sample_strip(&mut second, 8));
        }
    }

    #[test]
    fn test_classic_bounded() {
        let mut config = EmitterConfig::new(WaveformMode::Classic, Rgb::new(255, 128, 0));
        config.power = Some(2.0);
        let mut emitter = emitter(&config, 16, -300.0);

        for step in 0..50u64 {
            emitter.time_tick(Instant::from_millis(step * 100), Duration::from_millis(100));
            for position in 0..16 {
                let color = emitter.position_tick(position);
                assert!((0.0..=255.0).contains(&color.r));
                assert!((0.0..=128.0).contains(&color.g));
                assert_eq!(color.b, 0.0);
            }
        }
    }

    #[test]
    fn test_fm_bounded() {
        let mut config = EmitterConfig::new(WaveformMode::Fm, Rgb::new(0, 0, 200));
        config.slide = Some(1.5);
        config.speed = Some(3.0);
        let mut emitter = emitter(&config, 16, 7.5);

        let mut seen_dark = false;
        let mut seen_bright = false;
        for step in 0..100u64 {
            emitter.time_tick(Instant::from_millis(step * 33), Duration::from_millis(33));
            for position in 0..16 {
                let color = emitter.position_tick(position);
                assert!((0.0..=200.0).contains(&color.b));
                seen_dark |= color.b < 50.0;
                seen_bright |= color.b > 150.0;
            }
        }
        assert!(seen_dark && seen_bright);
    }

    #[test]
    fn test_strobe() {
        let config =
            EmitterConfig::new(WaveformMode::Constant, Rgb::new(90, 90, 90)).with_strobe(100);
        let mut emitter = emitter(&config, 2, 0.0);

        emitter.time_tick(Instant::from_millis(50), Duration::from_millis(50));
        assert!(!emitter.is_strobed_off());
        assert_eq!(emitter.position_tick(0), Rgbf::gray(90.0));

        emitter.time_tick(Instant::from_millis(100), Duration::from_millis(50));
        assert!(emitter.is_strobed_off());
        assert_eq!(emitter.position_tick(0), Rgbf::BLACK);

        // A long frame only flips once
        emitter.time_tick(Instant::from_millis(450), Duration::from_millis(350));
        assert!(!emitter.is_strobed_off());
        assert_eq!(emitter.position_tick(1), Rgbf::gray(90.0));
    }

    #[test]
    fn test_strobe_gates_classic() {
        let mut config =
            EmitterConfig::new(WaveformMode::Classic, Rgb::new(255, 255, 255)).with_strobe(10);
        config.offset = Some(1.0);
        let mut emitter = emitter(&config, 4, 3.0);

        emitter.time_tick(Instant::from_millis(10), Duration::from_millis(10));
        assert!(emitter.is_strobed_off());
        for position in 0..4 {
            assert_eq!(emitter.position_tick(position), Rgbf::BLACK);
        }
    }

    #[test]
    fn test_linked_seeds() {
        let configs = [
            EmitterConfig::new(WaveformMode::Classic, Rgb::new(255, 0, 0)),
            EmitterConfig::new(WaveformMode::Fm, Rgb::new(0, 255, 0)).linked(),
            EmitterConfig::new(WaveformMode::Classic, Rgb::new(0, 0, 255)),
        ];
        let mut rng = SmallRng::seed_from_u64(3);
        let emitters = build_emitters::<_, 16, 4>(&configs, 10, &mut rng).unwrap();

        assert_eq!(emitters.len(), 3);
        assert_eq!(emitters[0].seed(), emitters[1].seed());
        for emitter in &emitters {
            assert!((-SEED_RANGE..SEED_RANGE).contains(&emitter.seed()));
        }
        assert_eq!(emitters[1].mode(), WaveformMode::Fm);
    }

    #[test]
    fn test_explicit_seed_wins() {
        let configs = [
            EmitterConfig::new(WaveformMode::Classic, Rgb::new(255, 0, 0)).with_seed(5.0),
            EmitterConfig::new(WaveformMode::Classic, Rgb::new(255, 0, 0)).linked(),
            EmitterConfig::new(WaveformMode::Classic, Rgb::new(255, 0, 0))
                .linked()
                .with_seed(-2.0),
        ];
        assert_eq!(configs[2].resolve().unwrap().seed, SeedSource::Explicit(-2.0));

        let mut rng = SmallRng::seed_from_u64(11);
        let emitters = build_emitters::<_, 16, 4>(&configs, 10, &mut rng).unwrap();
        assert_eq!(emitters[0].seed(), 5.0);
        assert_eq!(emitters[1].seed(), 5.0);
        assert_eq!(emitters[2].seed(), -2.0);
    }

    #[test]
    fn test_config_errors() {
        let white = EmitterConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);

        assert_eq!(
            build_emitters::<_, 16, 2>(&[white.clone()], 0, &mut rng).unwrap_err(),
            ConfigError::MissingStripLength
        );
        assert_eq!(
            build_emitters::<_, 16, 2>(&[white.clone()], 17, &mut rng).unwrap_err(),
            ConfigError::StripTooLong { length: 17, max: 16 }
        );
        assert_eq!(
            build_emitters::<_, 16, 2>(&[], 8, &mut rng).unwrap_err(),
            ConfigError::NoEmitters
        );
        assert_eq!(
            build_emitters::<_, 16, 2>(&[white.clone(), white.clone(), white.clone()], 8, &mut rng)
                .unwrap_err(),
            ConfigError::TooManyEmitters { max: 2 }
        );

        let narrow = EmitterConfig::new(WaveformMode::Fm, Rgb::new(1, 2, 3)).with_width(0.0);
        assert_eq!(narrow.resolve().unwrap_err(), ConfigError::InvalidWidth);

        let strobe = EmitterConfig::default().with_strobe(0);
        assert_eq!(strobe.resolve().unwrap_err(), ConfigError::InvalidStrobePeriod);
    }

    #[test]
    fn test_defaults() {
        let settings = EmitterConfig::default().resolve().unwrap();
        assert_eq!(settings.color, Rgb::new(255, 255, 255));
        assert_eq!(settings.blend, BlendMode::Sum);
        assert_eq!(settings.strobe, None);
        assert_eq!(settings.seed, SeedSource::Random);

        let strobing = EmitterConfig {
            strobe: true,
            ..EmitterConfig::default()
        };
        assert_eq!(
            strobing.resolve().unwrap().strobe,
            Some(Duration::from_millis(100))
        );
        assert_eq!(WaveformMode::parse_from_str("fm"), Some(WaveformMode::Fm));
        assert_eq!(WaveformMode::Classic.as_str(), "classic");
    }
}
