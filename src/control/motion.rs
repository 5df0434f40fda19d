//! Bounded relay-actuation toward a target height.
//!
//! A move runs the state machine
//!
//! ```text
//! Idle -> SelectingDirection -> Actuating -> (Converged | TimedOut) -> Idle
//! ```
//!
//! synchronously inside one [`MotionController::execute`] call: sample the
//! current height, pick a direction (or conclude immediately without
//! touching a relay), energize exactly one relay, then re-sample until the
//! rounded height is within tolerance of the target or the deadline
//! elapses.  The deadline is the safety bound that keeps a relay from
//! running indefinitely when the sensor fails or the column is mechanically
//! stuck.
//!
//! Both relays are released on **every** exit path, and the last measured
//! height is returned whatever the terminal state — a timeout is reported
//! in [`MoveOutcome`], never escalated as an error.

use log::{debug, info, warn};

use crate::app::events::{AppEvent, MoveSummary};
use crate::app::ports::{Clock, EventSink, HeightSensorPort, RelayPort};

// ---------------------------------------------------------------------------
// Move vocabulary
// ---------------------------------------------------------------------------

/// Which relay a move energizes.  "No movement needed" is `Option::None`
/// at the selection site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Everything one move needs to know.  Built by the service from the
/// validated config; lives for exactly one `execute` call.
#[derive(Debug, Clone, Copy)]
pub struct ActuationRequest {
    pub target_cm: u16,
    pub tolerance_cm: u16,
    pub timeout_ms: u64,
}

/// Terminal state of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Within tolerance at selection time; no relay was touched.
    AlreadyInPosition,
    /// The rounded height entered the tolerance band.
    Converged,
    /// The deadline elapsed first.  Non-fatal: logged and surfaced here.
    TimedOut,
}

impl MoveOutcome {
    /// Stable lowercase name for payloads and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyInPosition => "already_in_position",
            Self::Converged => "converged",
            Self::TimedOut => "timed_out",
        }
    }
}

/// What a move ended with, whatever the terminal state.
#[derive(Debug, Clone, Copy)]
pub struct MoveResult {
    /// Last measured height — best-known, even after a timeout.
    pub final_height_cm: f32,
    pub outcome: MoveOutcome,
    /// Direction actuated; `None` for a no-op move.
    pub direction: Option<Direction>,
    /// Sampling rounds performed in the polling loop.
    pub polls: u32,
    pub elapsed_ms: u64,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The sole writer of the relay pair.  Must not be invoked re-entrantly;
/// the delivery layer serializes moves (one outstanding move at a time).
#[derive(Debug, Default)]
pub struct MotionController;

impl MotionController {
    pub fn new() -> Self {
        Self
    }

    /// Convergence test.  Rounding to whole centimetres happens here, at
    /// the comparison boundary only — the fractional estimate is never
    /// rounded before this point, so sub-centimetre sensor noise cannot
    /// bias the internal estimate.
    pub fn within_tolerance(height_cm: f32, target_cm: u16, tolerance_cm: u16) -> bool {
        let rounded = height_cm.round() as i64;
        (rounded - i64::from(target_cm)).abs() <= i64::from(tolerance_cm)
    }

    /// Direction selection.  `None` means the desk is already within the
    /// tolerance band and nothing must be actuated.
    pub fn select_direction(
        current_cm: f32,
        target_cm: u16,
        tolerance_cm: u16,
    ) -> Option<Direction> {
        if Self::within_tolerance(current_cm, target_cm, tolerance_cm) {
            None
        } else if current_cm < f32::from(target_cm) {
            Some(Direction::Up)
        } else {
            Some(Direction::Down)
        }
    }

    /// Run one move to completion.
    ///
    /// Side effects: at most one relay is energized for the duration of the
    /// move, and both are released before this returns, on every exit path.
    pub fn execute(
        &mut self,
        request: ActuationRequest,
        hw: &mut (impl HeightSensorPort + RelayPort),
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> MoveResult {
        let started_ms = clock.now_ms();
        debug!("move: Idle -> SelectingDirection (target {} cm)", request.target_cm);

        let initial = hw.measure_height();
        if initial.is_no_signal() {
            // Degraded sensor: the move still runs, with the deadline as
            // the backstop.
            sink.emit(&AppEvent::SensorDegraded {
                sample_count: initial.sample_count,
            });
        }

        let Some(direction) = Self::select_direction(
            initial.distance_cm,
            request.target_cm,
            request.tolerance_cm,
        ) else {
            debug!(
                "move: {:.1} cm already within ±{} cm of {} cm, no actuation",
                initial.distance_cm, request.tolerance_cm, request.target_cm
            );
            return self.finish(
                request,
                MoveOutcome::AlreadyInPosition,
                None,
                initial.distance_cm,
                0,
                clock.now_ms().saturating_sub(started_ms),
                sink,
            );
        };

        info!(
            "move: SelectingDirection -> Actuating ({:?}, {:.1} -> {} cm)",
            direction, initial.distance_cm, request.target_cm
        );
        sink.emit(&AppEvent::MoveStarted {
            direction,
            from_cm: initial.distance_cm,
            target_cm: request.target_cm,
        });

        hw.press(direction);
        let deadline_ms = clock.now_ms().saturating_add(request.timeout_ms);

        let mut last_cm = initial.distance_cm;
        let mut polls = 0u32;
        let outcome = loop {
            let estimate = hw.measure_height();
            last_cm = estimate.distance_cm;
            polls += 1;

            if Self::within_tolerance(last_cm, request.target_cm, request.tolerance_cm) {
                break MoveOutcome::Converged;
            }
            if clock.now_ms() > deadline_ms {
                warn!(
                    "move: deadline of {} ms elapsed at {:.1} cm, releasing relay",
                    request.timeout_ms, last_cm
                );
                break MoveOutcome::TimedOut;
            }
        };

        // One relay was energized above; rest state on every exit path.
        hw.release_all();

        self.finish(
            request,
            outcome,
            Some(direction),
            last_cm,
            polls,
            clock.now_ms().saturating_sub(started_ms),
            sink,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &mut self,
        request: ActuationRequest,
        outcome: MoveOutcome,
        direction: Option<Direction>,
        final_height_cm: f32,
        polls: u32,
        elapsed_ms: u64,
        sink: &mut impl EventSink,
    ) -> MoveResult {
        info!(
            "move: -> {:?} at {:.1} cm after {} polls / {} ms",
            outcome, final_height_cm, polls, elapsed_ms
        );
        sink.emit(&AppEvent::MoveFinished(MoveSummary {
            target_cm: request.target_cm,
            final_cm: final_height_cm,
            outcome,
            polls,
            elapsed_ms,
        }));
        MoveResult {
            final_height_cm,
            outcome,
            direction,
            polls,
            elapsed_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
