use crate::consts;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// How the time between ticks shrinks as the level goes up
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "RawSpeedCurve")]
pub(crate) struct SpeedCurve {
    /// Interval at [`BASE_LEVEL`][consts::BASE_LEVEL], in milliseconds
    initial_ms: u32,
    /// Amount the interval shrinks per level, in milliseconds
    step_ms: u32,
    /// The interval never drops below this, in milliseconds
    floor_ms: u32,
}

impl SpeedCurve {
    pub(crate) fn new(
        initial_ms: u32,
        step_ms: u32,
        floor_ms: u32,
    ) -> Result<SpeedCurve, SpeedError> {
        if initial_ms == 0 || floor_ms == 0 {
            Err(SpeedError::ZeroInterval)
        } else if floor_ms > initial_ms {
            Err(SpeedError::FloorAboveInitial {
                floor_ms,
                initial_ms,
            })
        } else {
            Ok(SpeedCurve {
                initial_ms,
                step_ms,
                floor_ms,
            })
        }
    }

    /// Return the time between ticks for a game at `level`
    pub(crate) fn interval_for_level(&self, level: u32) -> Duration {
        let steps = level.saturating_sub(consts::BASE_LEVEL);
        let ms = self
            .initial_ms
            .saturating_sub(self.step_ms.saturating_mul(steps))
            .max(self.floor_ms);
        Duration::from_millis(u64::from(ms))
    }
}

impl Default for SpeedCurve {
    fn default() -> SpeedCurve {
        SpeedCurve {
            initial_ms: consts::INITIAL_INTERVAL_MS,
            step_ms: consts::INTERVAL_STEP_MS,
            floor_ms: consts::MIN_INTERVAL_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawSpeedCurve {
    initial_interval_ms: u32,
    step_ms: u32,
    min_interval_ms: u32,
}

impl Default for RawSpeedCurve {
    fn default() -> RawSpeedCurve {
        RawSpeedCurve {
            initial_interval_ms: consts::INITIAL_INTERVAL_MS,
            step_ms: consts::INTERVAL_STEP_MS,
            min_interval_ms: consts::MIN_INTERVAL_MS,
        }
    }
}

impl TryFrom<RawSpeedCurve> for SpeedCurve {
    type Error = SpeedError;

    fn try_from(value: RawSpeedCurve) -> Result<SpeedCurve, SpeedError> {
        SpeedCurve::new(
            value.initial_interval_ms,
            value.step_ms,
            value.min_interval_ms,
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum SpeedError {
    #[error("tick intervals must be greater than zero")]
    ZeroInterval,
    #[error("min-interval-ms ({floor_ms}) is greater than initial-interval-ms ({initial_ms})")]
    FloorAboveInitial { floor_ms: u32, initial_ms: u32 },
}
