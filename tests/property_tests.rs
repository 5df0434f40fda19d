//! Property tests over the public sampler API: whatever the echo line does,
//! a sampling round terminates, stays finite, and never reports a height
//! outside what the pulses encode.

use core::cell::Cell;
use std::collections::VecDeque;

use proptest::prelude::*;

use desklift::app::ports::PulseIo;
use desklift::config::DeskConfig;
use desklift::sensors::height::HeightSampler;

const CM_PER_PULSE_US: f32 = 0.017_15;

/// Scripted echo line: one entry per trigger pulse; `None` = silent echo.
struct ScriptedEcho {
    now: Cell<u64>,
    scripts: VecDeque<Option<u64>>,
    active: Option<(u64, u64)>,
    trigger_high: bool,
}

impl ScriptedEcho {
    fn new(widths: Vec<Option<u64>>) -> Self {
        Self {
            now: Cell::new(0),
            scripts: widths.into(),
            active: None,
            trigger_high: false,
        }
    }
}

impl PulseIo for ScriptedEcho {
    fn set_trigger(&mut self, high: bool) {
        if self.trigger_high && !high {
            let now = self.now.get();
            self.active = self
                .scripts
                .pop_front()
                .flatten()
                .map(|width| (now + 200, now + 200 + width));
        }
        self.trigger_high = high;
    }

    fn echo_is_high(&self) -> bool {
        let now = self.now.get() + 1;
        self.now.set(now);
        match self.active {
            Some((rise, fall)) => now >= rise && now < fall,
            None => false,
        }
    }

    fn now_us(&self) -> u64 {
        self.now.get()
    }

    fn delay_us(&mut self, us: u32) {
        self.now.set(self.now.get() + u64::from(us));
    }
}

proptest! {
    #[test]
    fn estimate_is_finite_and_bounded_by_the_pulses(
        widths in proptest::collection::vec(
            proptest::option::weighted(0.8, 0u64..15_000),
            1..10usize,
        ),
    ) {
        let config = DeskConfig {
            sample_count: widths.len(),
            ..DeskConfig::default()
        };
        let timeout_us = config.echo_timeout_us();
        let sampler = HeightSampler::from_config(&config);
        let mut io = ScriptedEcho::new(widths.clone());

        let estimate = sampler.measure(&mut io);

        prop_assert!(estimate.distance_cm.is_finite());
        prop_assert!(estimate.distance_cm >= 0.0);
        // No pulse can encode more than its scripted width (timeouts clamp
        // to the configured ceiling), so the filtered mean cannot either.
        let max_encoded = widths
            .iter()
            .flatten()
            .map(|&w| w.min(timeout_us + 10) as f32 * CM_PER_PULSE_US)
            .fold(0.0f32, f32::max);
        prop_assert!(
            estimate.distance_cm <= max_encoded + 1.0,
            "estimate {} exceeds pulse ceiling {}",
            estimate.distance_cm,
            max_encoded
        );
        prop_assert_eq!(estimate.sample_count, widths.len());
    }

    #[test]
    fn all_silent_rounds_always_report_no_signal(count in 1usize..8) {
        let config = DeskConfig {
            sample_count: count,
            ..DeskConfig::default()
        };
        let sampler = HeightSampler::from_config(&config);
        let mut io = ScriptedEcho::new(vec![None; count]);

        let estimate = sampler.measure(&mut io);
        prop_assert!(estimate.is_no_signal());
    }
}
