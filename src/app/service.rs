//! Application service — the hexagonal core.
//!
//! [`DeskService`] owns the validated configuration and the motion
//! controller, and exposes the three operations the delivery layer needs:
//! read the current height, move to an explicit target, move to a preset.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  HeightSensorPort ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                       │      DeskService      │
//!       RelayPort ◀─────│  MotionController     │
//!                       └──────────────────────┘
//! ```
//!
//! One move at a time: the service is not re-entrant and relies on the
//! delivery layer to serialize commands (the HTTP adapter holds it behind a
//! mutex).

use log::{info, warn};

use crate::config::DeskConfig;
use crate::control::motion::{ActuationRequest, MotionController, MoveResult};
use crate::error::{Error, Result};
use crate::sensors::height::HeightEstimate;

use super::events::AppEvent;
use super::ports::{Clock, EventSink, HeightSensorPort, RelayPort};

/// The application service orchestrates all domain logic.
pub struct DeskService {
    config: DeskConfig,
    controller: MotionController,
}

impl DeskService {
    /// Construct the service from configuration.
    ///
    /// Validation failure is fatal here — an invalid config must never
    /// reach the controller.
    pub fn new(config: DeskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            controller: MotionController::new(),
        })
    }

    /// Live configuration (immutable for the process lifetime).
    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Take the first measurement and announce readiness.
    pub fn start(&mut self, hw: &mut impl HeightSensorPort, sink: &mut impl EventSink) {
        let estimate = hw.measure_height();
        sink.emit(&AppEvent::Started {
            height_cm: estimate.distance_cm,
        });
        info!("DeskService started at {:.1} cm", estimate.distance_cm);
    }

    // ── Queries ───────────────────────────────────────────────

    /// One sampling round, for `GET /desk/`.  A zero estimate means "no
    /// signal" (the sampler already logged it).
    pub fn current_height(&self, hw: &mut impl HeightSensorPort) -> HeightEstimate {
        hw.measure_height()
    }

    /// Target height a preset id maps to; `None` for unknown ids.
    pub fn preset_height(&self, id: u8) -> Option<u16> {
        match id {
            1 => Some(self.config.sit_height_cm),
            2 => Some(self.config.stand_height_cm),
            _ => None,
        }
    }

    // ── Commands ──────────────────────────────────────────────

    /// Move the desk to `target_cm`.
    ///
    /// A target outside the configured physical range is refused before any
    /// relay is touched.  A timed-out move is *not* an error — the outcome
    /// is carried in the result.
    pub fn move_to(
        &mut self,
        target_cm: u16,
        hw: &mut (impl HeightSensorPort + RelayPort),
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<MoveResult> {
        let (min_cm, max_cm) = (self.config.min_height_cm, self.config.max_height_cm);
        if target_cm < min_cm || target_cm > max_cm {
            warn!("refusing target {target_cm} cm outside {min_cm}..={max_cm} cm");
            return Err(Error::InvalidTarget {
                target_cm,
                min_cm,
                max_cm,
            });
        }

        let request = ActuationRequest {
            target_cm,
            tolerance_cm: self.config.tolerance_cm,
            timeout_ms: self.config.move_timeout_ms(),
        };
        Ok(self.controller.execute(request, hw, clock, sink))
    }

    /// Resolve a preset id and move to it.  An unknown id is a logged no-op
    /// (`Ok(None)`) — callers still report the current height.
    pub fn apply_preset(
        &mut self,
        id: u8,
        hw: &mut (impl HeightSensorPort + RelayPort),
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<Option<MoveResult>> {
        match self.preset_height(id) {
            Some(target_cm) => {
                info!("preset {id} -> {target_cm} cm");
                self.move_to(target_cm, hw, clock, sink).map(Some)
            }
            None => {
                info!("preset {id} does not exist, reporting current height only");
                sink.emit(&AppEvent::PresetUnknown { id });
                Ok(None)
            }
        }
    }
}
