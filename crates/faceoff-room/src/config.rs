//! Room configuration.

use std::time::Duration;

use faceoff_timer::CountdownConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Variant;

/// Operator-facing settings for one room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Active game-rule variant. Can also be swapped between sessions
    /// through the room handle.
    pub variant: Variant,

    /// Minimum count of ready participants required to start a session.
    pub min_ready: usize,

    /// When `true`, a readiness action toggles the flag; when `false`,
    /// it only ever sets it.
    pub toggle_ready: bool,

    /// Ready countdown length, in time units.
    pub ready_timer_units: u32,

    /// Turn countdown length, in time units.
    pub turn_timer_units: u32,

    /// Wall-clock length of one timer unit. One second in production;
    /// tests compress this to milliseconds.
    pub timer_unit: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            variant: Variant::ThreeWay,
            min_ready: 2,
            toggle_ready: true,
            ready_timer_units: 30,
            turn_timer_units: 30,
            timer_unit: Duration::from_secs(1),
        }
    }
}

impl RoomConfig {
    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically when a room is spawned. A zero `min_ready`
    /// would let a session start with nobody in it; zero timer lengths
    /// would fire countdowns instantly.
    pub fn validated(mut self) -> Self {
        if self.min_ready == 0 {
            warn!("min_ready of 0 is not usable — clamping to 1");
            self.min_ready = 1;
        }
        if self.ready_timer_units == 0 {
            warn!("ready_timer_units of 0 — clamping to 1");
            self.ready_timer_units = 1;
        }
        if self.turn_timer_units == 0 {
            warn!("turn_timer_units of 0 — clamping to 1");
            self.turn_timer_units = 1;
        }
        self
    }

    pub(crate) fn ready_countdown(&self) -> CountdownConfig {
        CountdownConfig {
            units: self.ready_timer_units,
            unit: self.timer_unit,
        }
    }

    pub(crate) fn turn_countdown(&self) -> CountdownConfig {
        CountdownConfig {
            units: self.turn_timer_units,
            unit: self.timer_unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoomConfig::default();
        assert_eq!(config.variant, Variant::ThreeWay);
        assert_eq!(config.min_ready, 2);
        assert!(config.toggle_ready);
        assert_eq!(config.ready_timer_units, 30);
        assert_eq!(config.turn_timer_units, 30);
        assert_eq!(config.timer_unit, Duration::from_secs(1));
    }

    #[test]
    fn test_validated_clamps_zeroes() {
        let config = RoomConfig {
            min_ready: 0,
            ready_timer_units: 0,
            turn_timer_units: 0,
            ..RoomConfig::default()
        }
        .validated();
        assert_eq!(config.min_ready, 1);
        assert_eq!(config.ready_timer_units, 1);
        assert_eq!(config.turn_timer_units, 1);
    }
}
