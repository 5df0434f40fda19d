//! Mock port implementations shared by the integration tests.

use core::cell::Cell;
use std::collections::VecDeque;

use desklift::app::events::AppEvent;
use desklift::app::ports::{Clock, EventSink, HeightSensorPort, RelayPort};
use desklift::control::motion::Direction;
use desklift::sensors::height::HeightEstimate;

/// Scripted sensor + relay recorder.  Heights pop off the front; the last
/// one repeats forever (a desk that stopped moving keeps reporting the same
/// height).
pub struct MockHw {
    heights: VecDeque<f32>,
    last: f32,
    pub measure_calls: u32,
    pub presses: Vec<Direction>,
    pub releases: u32,
    pressed: Option<Direction>,
}

impl MockHw {
    pub fn with_heights(heights: &[f32]) -> Self {
        Self {
            heights: heights.iter().copied().collect(),
            last: *heights.last().unwrap_or(&0.0),
            measure_calls: 0,
            presses: Vec::new(),
            releases: 0,
            pressed: None,
        }
    }

    pub fn pressed(&self) -> Option<Direction> {
        self.pressed
    }
}

impl HeightSensorPort for MockHw {
    fn measure_height(&mut self) -> HeightEstimate {
        self.measure_calls += 1;
        let cm = self.heights.pop_front().unwrap_or(self.last);
        self.last = cm;
        HeightEstimate {
            distance_cm: cm,
            samples_kept: 10,
            sample_count: 10,
        }
    }
}

impl RelayPort for MockHw {
    fn press(&mut self, direction: Direction) {
        self.presses.push(direction);
        self.pressed = Some(direction);
    }

    fn release_all(&mut self) {
        self.releases += 1;
        self.pressed = None;
    }

    fn is_pressed(&self, direction: Direction) -> bool {
        self.pressed == Some(direction)
    }
}

/// Virtual clock: every read advances time, so polling loops terminate
/// deterministically without real delays.
pub struct MockClock {
    now: Cell<u64>,
    step_ms: u64,
}

impl MockClock {
    pub fn stepping(step_ms: u64) -> Self {
        Self {
            now: Cell::new(0),
            step_ms,
        }
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        let t = self.now.get();
        self.now.set(t + self.step_ms);
        t
    }
}

/// Captures every emitted event for assertions.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
