//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! ESP-IDF logger (UART / USB-CDC in production).  A future MQTT or
//! home-automation adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { height_cm } => {
                info!("START | height={:.1}cm", height_cm);
            }
            AppEvent::MoveStarted {
                direction,
                from_cm,
                target_cm,
            } => {
                info!(
                    "MOVE  | {:?} | {:.1}cm -> {}cm",
                    direction, from_cm, target_cm
                );
            }
            AppEvent::MoveFinished(s) => {
                info!(
                    "MOVE  | {} | target={}cm final={:.1}cm | {} polls / {} ms",
                    s.outcome.as_str(),
                    s.target_cm,
                    s.final_cm,
                    s.polls,
                    s.elapsed_ms,
                );
            }
            AppEvent::SensorDegraded { sample_count } => {
                warn!("SENSE | no echo over {} samples", sample_count);
            }
            AppEvent::PresetUnknown { id } => {
                info!("PRESET| unknown id={}, nothing actuated", id);
            }
        }
    }
}
