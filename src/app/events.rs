//! Outbound application events.
//!
//! The service and controller emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial, publish over the network,
//! etc.

use crate::control::motion::{Direction, MoveOutcome};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started; carries the first measured height.
    Started { height_cm: f32 },

    /// A move left the selection phase and energized a relay.
    MoveStarted {
        direction: Direction,
        from_cm: f32,
        target_cm: u16,
    },

    /// A move reached a terminal state (relays released).
    MoveFinished(MoveSummary),

    /// A full sampling round observed no echo — the estimate degraded to 0.
    SensorDegraded { sample_count: usize },

    /// A preset id with no mapping was requested; nothing was actuated.
    PresetUnknown { id: u8 },
}

/// Summary of one completed move, whatever its terminal state.
#[derive(Debug, Clone, Copy)]
pub struct MoveSummary {
    pub target_cm: u16,
    pub final_cm: f32,
    pub outcome: MoveOutcome,
    /// Sampling rounds performed during the polling loop.
    pub polls: u32,
    pub elapsed_ms: u64,
}
