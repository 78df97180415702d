//! Per-source activity tracking.
//!
//! Each RuuviTag gets its own [`ActivityState`], created on the first
//! recognized measurement and kept for the lifetime of the tracker.

use crate::activity::{ActivityDetector, ActivityState, Transition};
use crate::measurement::Measurement;
use std::collections::HashMap;

/// A status flip attributed to the tag that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEvent {
    pub source_id: String,
    pub transition: Transition,
}

/// Routes measurements to the detector state of their source.
#[derive(Debug, Default)]
pub struct ActivityTracker {
    detector: ActivityDetector,
    states: HashMap<String, ActivityState>,
}

impl ActivityTracker {
    pub fn new(detector: ActivityDetector) -> Self {
        Self {
            detector,
            states: HashMap::new(),
        }
    }

    /// Feed a measurement to the state of its source.
    ///
    /// The first recognized measurement of a source becomes its stable
    /// temperature and never produces an event. Unrecognized measurements are
    /// ignored.
    pub fn observe(&mut self, measurement: &Measurement) -> Option<ActivityEvent> {
        if !measurement.is_recognized() {
            return None;
        }

        let state = self
            .states
            .entry(measurement.source_id.clone())
            .or_insert_with(|| ActivityState::new(measurement.temperature));

        self.detector
            .observe(state, measurement.temperature, measurement.captured_at)
            .map(|transition| ActivityEvent {
                source_id: measurement.source_id.clone(),
                transition,
            })
    }

    pub fn state(&self, source_id: &str) -> Option<&ActivityState> {
        self.states.get(source_id)
    }

    /// Current status of a source; unknown sources are inactive.
    pub fn is_active(&self, source_id: &str) -> bool {
        self.state(source_id).is_some_and(|s| s.is_active)
    }

    /// Number of sources seen so far.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
