//! Debounced "stove is heating" detection.
//!
//! A temperature change only counts once it has stayed at least
//! `change_threshold` away from the last stable temperature for
//! `confirm_duration`. A confirmed change above `activate_temperature` turns
//! the status on; a confirmed change below `deactivate_temperature` turns it
//! off again. Everything in between moves the baseline without flipping the
//! status.

use std::time::Duration;

/// What happens to a pending change when a reading falls back within
/// `change_threshold` of the stable temperature before it is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingPolicy {
    /// Leave the pending change untouched. The next large reading is measured
    /// against the original start time, so noisy sensors can confirm early.
    #[default]
    Linger,
    /// Drop the pending change. Stricter than the stove controller this
    /// detector replaces, and labelled as such in the CLI.
    ResetOnSettle,
}

/// Thresholds for [`ActivityDetector`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityConfig {
    /// Minimum absolute change from the stable temperature, in °C
    pub change_threshold: f64,
    /// How long a change must persist before it is accepted
    pub confirm_duration: Duration,
    /// Confirmed temperatures above this turn the status on
    pub activate_temperature: f64,
    /// Confirmed temperatures below this turn the status off
    pub deactivate_temperature: f64,
    pub pending_policy: PendingPolicy,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            change_threshold: 2.0,
            confirm_duration: Duration::from_secs(180),
            activate_temperature: 70.0,
            deactivate_temperature: 40.0,
            pending_policy: PendingPolicy::Linger,
        }
    }
}

impl ActivityConfig {
    fn confirm_secs(&self) -> i64 {
        i64::try_from(self.confirm_duration.as_secs()).unwrap_or(i64::MAX)
    }
}

/// Detector state for a single source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityState {
    /// Current debounced status
    pub is_active: bool,
    /// Temperature at the last confirmed change
    pub last_stable_temperature: f64,
    /// When the current candidate change started, in seconds since epoch
    pub pending_since: Option<i64>,
    /// Temperature when the current candidate change started
    pub pending_reference_temperature: f64,
}

impl ActivityState {
    /// Inactive state with `baseline` as the stable temperature.
    pub fn new(baseline: f64) -> Self {
        Self {
            last_stable_temperature: baseline,
            ..Self::default()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }
}

/// A flip of the debounced status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: bool,
    pub to: bool,
    /// Temperature that confirmed the change
    pub temperature: f64,
    /// Time of the confirming reading, in seconds since epoch
    pub at: i64,
}

impl Transition {
    pub fn is_activation(&self) -> bool {
        !self.from && self.to
    }
}

/// Hysteresis state machine turning a temperature series into on/off transitions.
///
/// The detector holds only configuration. State lives in a caller-owned
/// [`ActivityState`], so one detector can serve any number of sources.
#[derive(Debug, Clone, Default)]
pub struct ActivityDetector {
    config: ActivityConfig,
}

impl ActivityDetector {
    pub fn new(config: ActivityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ActivityConfig {
        &self.config
    }

    /// Fold one reading into `state`.
    ///
    /// # Arguments
    /// * `state` - State of the source the reading belongs to
    /// * `temperature` - Reading in °C
    /// * `now` - Time of the reading in seconds since epoch
    ///
    /// # Returns
    /// A [`Transition`] when the debounced status flips, `None` otherwise.
    /// Timestamps are not checked for monotonicity; a reading older than the
    /// pending start never confirms it.
    pub fn observe(
        &self,
        state: &mut ActivityState,
        temperature: f64,
        now: i64,
    ) -> Option<Transition> {
        let config = &self.config;
        let delta = (temperature - state.last_stable_temperature).abs();

        if delta < config.change_threshold {
            if config.pending_policy == PendingPolicy::ResetOnSettle {
                state.pending_since = None;
            }
            return None;
        }

        let Some(since) = state.pending_since else {
            state.pending_since = Some(now);
            state.pending_reference_temperature = temperature;
            return None;
        };

        if now.saturating_sub(since) < config.confirm_secs() {
            return None;
        }

        let was_active = state.is_active;
        if temperature > config.activate_temperature {
            state.is_active = true;
        }
        if temperature < config.deactivate_temperature && state.is_active {
            state.is_active = false;
        }
        state.last_stable_temperature = temperature;
        state.pending_since = None;

        (state.is_active != was_active).then_some(Transition {
            from: was_active,
            to: state.is_active,
            temperature,
            at: now,
        })
    }
}
