//! Default GPIO assignments for the desk controller board.
//!
//! Single source of truth — [`DeskConfig::default()`](crate::config::DeskConfig)
//! picks these up, and every value can be overridden through the environment
//! at startup.  Change a pin here and it propagates everywhere.
//!
//! The relay board is wired to the desk hand-controller's membrane buttons;
//! both relay inputs are **active-low** (the pins idle HIGH).

// ---------------------------------------------------------------------------
// Relays (desk "up" / "down" buttons)
// ---------------------------------------------------------------------------

/// Digital output: energizes the relay bridging the "up" button. Active LOW.
pub const UP_RELAY_GPIO: i32 = 18;
/// Digital output: energizes the relay bridging the "down" button. Active LOW.
pub const DOWN_RELAY_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// Ultrasonic distance sensor (HC-SR04)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs HIGH pulse starts a measurement.
pub const TRIGGER_GPIO: i32 = 23;
/// Digital input: active-high pulse whose width encodes round-trip time.
/// 5 V sensors need a divider down to 3.3 V on this line.
pub const ECHO_GPIO: i32 = 24;

// ---------------------------------------------------------------------------
// Sensing geometry
// ---------------------------------------------------------------------------

/// Maximum distance (cm) the sensor is expected to report; bounds the echo
/// busy-wait so a disconnected sensor can never block the control loop.
pub const MAX_DISTANCE_CM: u32 = 220;
