//! HC-SR04 ultrasonic height sampler.
//!
//! One measurement is a 10 µs trigger pulse followed by timing the
//! active-high echo pulse, whose width encodes the round-trip sound travel
//! time.  Both wait phases are bounded by a timeout derived from the
//! configured sensing ceiling, so a disconnected echo line degrades to a
//! zero reading instead of hanging the control loop.
//!
//! A full round takes [`DeskConfig::sample_count`](crate::config::DeskConfig)
//! pulses with a settle delay between them (consecutive pulses otherwise
//! hear each other's echoes), then reduces the set with mean/σ outlier
//! rejection.
//!
//! All I/O goes through the [`PulseIo`] port, so the busy-waits run against
//! a scripted clock in tests.

use log::{debug, warn};

use crate::app::ports::PulseIo;
use crate::config::DeskConfig;

/// Static bound for the per-round sample buffer; config validation keeps
/// `sample_count` at or below this.
pub const MAX_SAMPLE_COUNT: usize = 32;

/// Trigger pulse width.
const TRIGGER_PULSE_US: u32 = 10;

/// Centimetres of one-way distance per microsecond of echo pulse width:
/// 340 m/s, halved for the round trip.
const CM_PER_PULSE_US: f32 = 0.017_15;

// ---------------------------------------------------------------------------
// Sample types
// ---------------------------------------------------------------------------

/// One raw reading.  Ephemeral — lives only until the round is reduced.
#[derive(Debug, Clone, Copy)]
pub struct HeightSample {
    /// Measured echo pulse width; 0 when a wait phase timed out.
    pub pulse_us: u64,
    /// Distance derived from `pulse_us`.
    pub distance_cm: f32,
}

impl HeightSample {
    fn from_pulse(pulse_us: u64) -> Self {
        Self {
            pulse_us,
            distance_cm: pulse_us as f32 * CM_PER_PULSE_US,
        }
    }
}

/// The filtered scalar height for one sampling round.
///
/// A zero estimate means "no signal", not a valid floor height — callers
/// must check [`is_no_signal`](Self::is_no_signal) before trusting it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeightEstimate {
    pub distance_cm: f32,
    /// Samples that survived the outlier filter (equals `sample_count` when
    /// nothing was discarded or when the filter fell back to the full set).
    pub samples_kept: usize,
    pub sample_count: usize,
}

impl HeightEstimate {
    /// True when the round produced no usable echo.
    pub fn is_no_signal(&self) -> bool {
        self.distance_cm <= f32::EPSILON
    }

    /// Height rounded to whole centimetres — the only place integer height
    /// exists; the fractional estimate is kept internally.
    pub fn rounded_cm(&self) -> i32 {
        self.distance_cm.round() as i32
    }
}

// ---------------------------------------------------------------------------
// Sampler
// ---------------------------------------------------------------------------

/// Drives the trigger/echo pair and reduces pulse rounds to one estimate.
pub struct HeightSampler {
    echo_timeout_us: u64,
    sample_count: usize,
    settle_delay_us: u32,
    outlier_sigma: f32,
}

impl HeightSampler {
    pub fn from_config(config: &DeskConfig) -> Self {
        Self {
            echo_timeout_us: config.echo_timeout_us(),
            sample_count: config.sample_count.min(MAX_SAMPLE_COUNT),
            settle_delay_us: config.sample_settle_ms.saturating_mul(1_000),
            outlier_sigma: config.outlier_sigma,
        }
    }

    /// One full sampling round.  Fails soft: a round with no echo at all
    /// yields a zero estimate, never an error.
    pub fn measure(&self, io: &mut impl PulseIo) -> HeightEstimate {
        let mut samples: heapless::Vec<HeightSample, MAX_SAMPLE_COUNT> = heapless::Vec::new();

        for i in 0..self.sample_count {
            let pulse_us = self.pulse_width_us(io);
            if pulse_us == 0 {
                debug!("height: echo timeout on sample {}/{}", i + 1, self.sample_count);
            }
            // Capacity is MAX_SAMPLE_COUNT and sample_count is clamped to it.
            let _ = samples.push(HeightSample::from_pulse(pulse_us));

            if i + 1 < self.sample_count {
                io.delay_us(self.settle_delay_us);
            }
        }

        let estimate = reduce(&samples, self.outlier_sigma);
        if estimate.is_no_signal() {
            warn!(
                "height: no echo over {} samples, reporting no-signal",
                self.sample_count
            );
        }
        estimate
    }

    /// Time one echo pulse.  Returns 0 if the echo never rises, or rises
    /// but never falls, within the timeout — the sensor can be unplugged
    /// without blocking past `echo_timeout_us` per phase.
    fn pulse_width_us(&self, io: &mut impl PulseIo) -> u64 {
        io.set_trigger(true);
        io.delay_us(TRIGGER_PULSE_US);
        io.set_trigger(false);

        let armed_at = io.now_us();
        while !io.echo_is_high() {
            if io.now_us().saturating_sub(armed_at) > self.echo_timeout_us {
                return 0;
            }
        }

        let rose_at = io.now_us();
        while io.echo_is_high() {
            if io.now_us().saturating_sub(rose_at) > self.echo_timeout_us {
                return 0;
            }
        }
        io.now_us().saturating_sub(rose_at)
    }
}

// ---------------------------------------------------------------------------
// Reduction
// ---------------------------------------------------------------------------

/// Reduce a sample set to its filtered mean.
///
/// Samples further than `sigma_limit` standard deviations from the round
/// mean are discarded and the mean of the survivors is reported.  Two
/// degenerate cases are handled explicitly: zero variance keeps every
/// sample (a single sample trivially so), and a filter that discards the
/// whole set falls back to the unfiltered mean.
fn reduce(samples: &[HeightSample], sigma_limit: f32) -> HeightEstimate {
    let n = samples.len();
    if n == 0 {
        return HeightEstimate::default();
    }

    let mean = samples.iter().map(|s| s.distance_cm).sum::<f32>() / n as f32;
    let variance = samples
        .iter()
        .map(|s| {
            let d = s.distance_cm - mean;
            d * d
        })
        .sum::<f32>()
        / n as f32;
    let sigma = variance.sqrt();

    if sigma <= f32::EPSILON {
        // All-identical (or single-sample) round: keep everything.
        return HeightEstimate {
            distance_cm: mean,
            samples_kept: n,
            sample_count: n,
        };
    }

    let band = sigma_limit * sigma;
    let mut kept = 0usize;
    let mut kept_sum = 0.0f32;
    for s in samples {
        if (s.distance_cm - mean).abs() <= band {
            kept += 1;
            kept_sum += s.distance_cm;
        }
    }

    if kept == 0 {
        // Adversarial distribution emptied the filter: report the
        // unfiltered mean rather than nothing.
        return HeightEstimate {
            distance_cm: mean,
            samples_kept: n,
            sample_count: n,
        };
    }

    HeightEstimate {
        distance_cm: kept_sum / kept as f32,
        samples_kept: kept,
        sample_count: n,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
