//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the height sampler and both relay drivers, exposing them through
//! [`HeightSensorPort`] and [`RelayPort`].  This is the only module in the
//! system that wires pins to the domain.  On non-espidf targets the
//! underlying `hw_init` helpers are simulation stubs, so the adapter links
//! (and state-tracks) on the host.

use crate::app::ports::{HeightSensorPort, PulseIo, RelayPort};
use crate::config::DeskConfig;
use crate::control::motion::Direction;
use crate::drivers::hw_init;
use crate::drivers::relay::RelayDriver;
use crate::sensors::height::{HeightEstimate, HeightSampler};

// ── Pulse I/O over raw GPIO ───────────────────────────────────

/// [`PulseIo`] over the trigger/echo pair and the system timer.
pub struct GpioPulseIo {
    trigger_pin: i32,
    echo_pin: i32,
}

impl GpioPulseIo {
    pub fn new(trigger_pin: i32, echo_pin: i32) -> Self {
        Self {
            trigger_pin,
            echo_pin,
        }
    }
}

impl PulseIo for GpioPulseIo {
    fn set_trigger(&mut self, high: bool) {
        hw_init::gpio_write(self.trigger_pin, high);
    }

    fn echo_is_high(&self) -> bool {
        hw_init::gpio_read(self.echo_pin)
    }

    fn now_us(&self) -> u64 {
        hw_init::now_us()
    }

    fn delay_us(&mut self, us: u32) {
        hw_init::delay_us(us);
    }
}

// ── Adapter ───────────────────────────────────────────────────

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sampler: HeightSampler,
    pulse_io: GpioPulseIo,
    up: RelayDriver,
    down: RelayDriver,
}

impl HardwareAdapter {
    /// Build from a validated config.  `hw_init::init_peripherals` must
    /// have run first (pins configured, relays released).
    pub fn new(config: &DeskConfig) -> Self {
        Self {
            sampler: HeightSampler::from_config(config),
            pulse_io: GpioPulseIo::new(config.trigger_pin, config.echo_pin),
            up: RelayDriver::new(config.up_pin),
            down: RelayDriver::new(config.down_pin),
        }
    }

    fn relay(&mut self, direction: Direction) -> &mut RelayDriver {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        }
    }
}

// ── HeightSensorPort implementation ───────────────────────────

impl HeightSensorPort for HardwareAdapter {
    fn measure_height(&mut self) -> HeightEstimate {
        self.sampler.measure(&mut self.pulse_io)
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl RelayPort for HardwareAdapter {
    fn press(&mut self, direction: Direction) {
        // Single-asserted invariant: the opposite relay is forced off
        // before this one is energized.
        match direction {
            Direction::Up => self.down.release(),
            Direction::Down => self.up.release(),
        }
        self.relay(direction).press();
    }

    fn release_all(&mut self) {
        self.up.release();
        self.down.release();
    }

    fn is_pressed(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up.is_pressed(),
            Direction::Down => self.down.is_pressed(),
        }
    }
}
