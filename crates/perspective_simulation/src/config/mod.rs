//! Game configuration (TOML)
//!
//! Все секции `#[serde(default)]`: файл может переопределять только часть
//! значений (например только `[camera]`). Defaults = значения
//! side-scroller setup, переведённые из сантиметров в метры.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::controller::TargetSmoothing;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level конфиг (Resource, вставляется до `PerspectivePlugin`)
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub camera: CameraConfig,
    pub eye: EyeConfig,
    pub controller: ControllerConfig,
    pub movement: MovementConfig,
    pub parameters: ParametersConfig,
}

/// Display camera + boom (spring arm без collision test)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera Offset Limit (градусы), soft clamp для yaw/pitch display камеры
    pub max_offset_degrees: f32,
    pub arm_length: f32,
    pub socket_offset: [f32; 3],
    /// Boom смотрит назад на персонажа
    pub boom_yaw_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            max_offset_degrees: 15.0,
            arm_length: 5.0,
            socket_offset: [0.0, 0.75, 0.0],
            boom_yaw_degrees: 180.0,
        }
    }
}

/// Eye capture camera (projection params для shader matrix)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EyeConfig {
    pub fov_y_degrees: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    /// Позиция eye относительно capsule root
    pub offset: [f32; 3],
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 90.0,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            offset: [0.0, 0.6, 0.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    pub smoothing: TargetSmoothing,
    /// Длина line trace от pointer (9999 units = 99.99m)
    pub trace_distance: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            smoothing: TargetSmoothing::default(),
            trace_distance: crate::controller::TRACE_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    pub max_walk_speed: f32,
    pub jump_velocity: f32,
    pub gravity_scale: f32,
    pub air_control: f32,
    pub ground_friction: f32,
    /// Скорость поворота sprite к направлению движения (deg/s)
    pub rotation_rate: f32,
    pub capsule_radius: f32,
    pub capsule_half_height: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_walk_speed: 6.0,
            jump_velocity: 10.0,
            gravity_scale: 2.0,
            air_control: 0.8,
            ground_friction: 3.0,
            rotation_rate: 720.0,
            capsule_radius: 0.42,
            capsule_half_height: 0.96,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParametersConfig {
    /// Имя parameter collection для line-of-sight shader
    pub collection: String,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            collection: crate::parameters::LOS_COLLECTION.to_string(),
        }
    }
}

impl GameConfig {
    /// Load + validate. Отсутствующие поля = defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("camera.max_offset_degrees", self.camera.max_offset_degrees)?;
        non_negative("camera.arm_length", self.camera.arm_length)?;

        let eye = &self.eye;
        if !(eye.fov_y_degrees > 0.0 && eye.fov_y_degrees < 180.0) {
            return Err(invalid("eye.fov_y_degrees", format!("{} not in (0, 180)", eye.fov_y_degrees)));
        }
        positive("eye.aspect_ratio", eye.aspect_ratio)?;
        positive("eye.near", eye.near)?;
        if !(eye.far > eye.near) || !eye.far.is_finite() {
            return Err(invalid("eye.far", format!("{} must be finite and > near ({})", eye.far, eye.near)));
        }

        self.controller
            .smoothing
            .validate()
            .map_err(|reason| invalid("controller.smoothing", reason))?;
        positive("controller.trace_distance", self.controller.trace_distance)?;

        let movement = &self.movement;
        non_negative("movement.max_walk_speed", movement.max_walk_speed)?;
        non_negative("movement.jump_velocity", movement.jump_velocity)?;
        non_negative("movement.gravity_scale", movement.gravity_scale)?;
        if !(0.0..=1.0).contains(&movement.air_control) {
            return Err(invalid("movement.air_control", format!("{} not in [0, 1]", movement.air_control)));
        }
        non_negative("movement.ground_friction", movement.ground_friction)?;
        non_negative("movement.rotation_rate", movement.rotation_rate)?;
        positive("movement.capsule_radius", movement.capsule_radius)?;
        positive("movement.capsule_half_height", movement.capsule_half_height)?;

        if self.parameters.collection.is_empty() {
            return Err(invalid("parameters.collection", "empty name".to_string()));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be finite and > 0", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be finite and >= 0", value)))
    }
}
