//! Single-channel relay driver.
//!
//! Each relay bridges one membrane button on the desk's hand controller.
//! The board is **active-low**: the pin idles HIGH (released) and is driven
//! LOW to press the button.  `hw_init` leaves both pins HIGH before any
//! driver exists.
//!
//! This is a dumb actuator — the motion controller owns the invariant that
//! at most one relay is pressed at a time and that both rest after a move.

use crate::drivers::hw_init;

#[derive(Debug)]
pub struct RelayDriver {
    pin: i32,
    pressed: bool,
}

impl RelayDriver {
    /// Wrap an already-configured output pin (idle HIGH).
    pub fn new(pin: i32) -> Self {
        Self {
            pin,
            pressed: false,
        }
    }

    /// Energize the relay (drive the pin LOW).
    pub fn press(&mut self) {
        hw_init::gpio_write(self.pin, false);
        self.pressed = true;
    }

    /// Release the relay (drive the pin HIGH).  Idempotent.
    pub fn release(&mut self) {
        hw_init::gpio_write(self.pin, true);
        self.pressed = false;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn pin(&self) -> i32 {
        self.pin
    }
}
