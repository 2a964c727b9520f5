//! Temporal smoothing aim target (low-pass filter)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Как новая точка попадания смешивается с текущим target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum TargetSmoothing {
    /// `target = (1 − alpha)·target + alpha·hit` за tick, независимо от dt.
    /// Зависит от frame rate.
    FixedRatio { alpha: f32 },

    /// `alpha = 1 − exp(−rate·dt)`: одинаковая скорость сходимости при любом FPS
    FrameRateIndependent { rate: f32 },
}

impl Default for TargetSmoothing {
    fn default() -> Self {
        Self::FixedRatio { alpha: 0.1 }
    }
}

impl TargetSmoothing {
    /// Rate, совпадающий с `FixedRatio { alpha: 0.1 }` на 60 FPS
    pub fn frame_rate_independent_at_60hz() -> Self {
        Self::FrameRateIndependent {
            rate: -(0.9f32.ln()) * 60.0,
        }
    }

    /// Вес новой точки на этом tick
    pub fn alpha(&self, delta_secs: f32) -> f32 {
        match *self {
            Self::FixedRatio { alpha } => alpha,
            Self::FrameRateIndependent { rate } => 1.0 - (-rate * delta_secs.max(0.0)).exp(),
        }
    }

    pub fn blend(&self, current: Vec3, hit: Vec3, delta_secs: f32) -> Vec3 {
        current.lerp(hit, self.alpha(delta_secs))
    }

    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Self::FixedRatio { alpha } if !(alpha > 0.0 && alpha <= 1.0) => {
                Err(format!("alpha {} not in (0, 1]", alpha))
            }
            Self::FrameRateIndependent { rate } if !(rate.is_finite() && rate > 0.0) => {
                Err(format!("rate {} must be finite and > 0", rate))
            }
            _ => Ok(()),
        }
    }
}
