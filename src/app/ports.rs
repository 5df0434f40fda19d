//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DeskService / MotionController (domain)
//! ```
//!
//! Driven adapters (the sensor, the relay pair, the clock, event sinks)
//! implement these traits.  The domain consumes them via generics, so the
//! core never touches hardware directly and every busy-wait can run against
//! a scripted clock in tests.

use crate::control::motion::Direction;
use crate::sensors::height::HeightEstimate;

// ───────────────────────────────────────────────────────────────
// Pulse I/O port (driven adapter: sampler → trigger/echo lines)
// ───────────────────────────────────────────────────────────────

/// The primitives the distance sampler needs: two GPIO lines, a microsecond
/// clock, and a delay.  Everything the sampler does — including its bounded
/// busy-waits — is expressed against this trait, which is what makes the
/// timing logic deterministic under test.
pub trait PulseIo {
    /// Drive the sensor trigger line.
    fn set_trigger(&mut self, high: bool);

    /// Sample the echo line.
    fn echo_is_high(&self) -> bool;

    /// Monotonic microseconds since boot.
    fn now_us(&self) -> u64;

    /// Block for the given number of microseconds.
    fn delay_us(&mut self, us: u32);
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one full sampling round reduced to a filtered estimate.
///
/// Implementations fail soft — a round in which no echo was observed yields
/// a zero estimate ([`HeightEstimate::is_no_signal`]), never an error.
pub trait HeightSensorPort {
    fn measure_height(&mut self) -> HeightEstimate;
}

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the two relays bridging the desk's up/down buttons.
///
/// Contract: at most one relay is energized at any time, and the
/// controller releases both on every exit path of a move.  The controller
/// is the sole writer.
pub trait RelayPort {
    /// Energize the relay for `direction`, releasing the opposite one first
    /// if it was somehow left on.
    fn press(&mut self, direction: Direction);

    /// Release both relays — safe resting state.
    fn release_all(&mut self);

    /// Query whether the relay for `direction` is currently energized.
    fn is_pressed(&self, direction: Direction) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source for the move deadline.
pub trait Clock {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, a future
/// MQTT topic, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
