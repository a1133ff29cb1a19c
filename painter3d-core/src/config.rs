/// Scene and camera parameters for the pipeline
use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Tunable parameters of the reference scene.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "fov_degrees": 60.0, "light_direction": [0.0, -1.0, -1.0] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Fixed viewpoint used by back-face culling
    pub camera_position: Point3<f32>,
    /// Direction of the single directional light; normalised on use
    pub light_direction: Vector3<f32>,
    /// Offset added to every rotated vertex
    pub translation: Vector3<f32>,
    /// Animation speed in radians per second
    pub rotation_rate: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near: 0.1,
            far: 1000.0,
            camera_position: Point3::origin(),
            light_direction: Vector3::new(0.0, 0.0, -1.0),
            translation: Vector3::new(0.0, 0.0, 8.0),
            rotation_rate: 1.0,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PipelineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject parameters that would leave the projection or shading undefined.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let scalars = [
            ("fov_degrees", self.fov_degrees),
            ("near", self.near),
            ("far", self.far),
            ("rotation_rate", self.rotation_rate),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(PipelineError::InvalidConfig(format!("{name} must be finite")));
            }
        }

        let vectors = [
            ("camera_position", self.camera_position.coords),
            ("light_direction", self.light_direction),
            ("translation", self.translation),
        ];
        for (name, value) in vectors {
            if !value.iter().all(|c| c.is_finite()) {
                return Err(PipelineError::InvalidConfig(format!("{name} must be finite")));
            }
        }

        if self.fov_degrees <= 0.0 || self.fov_degrees >= 180.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }

        if self.far == self.near {
            return Err(PipelineError::DegenerateFrustum {
                near: self.near,
                far: self.far,
            });
        }

        if self.light_direction.norm() == 0.0 {
            return Err(PipelineError::InvalidConfig(
                "light_direction must not be the zero vector".to_string(),
            ));
        }

        Ok(())
    }

    /// Unit-length light direction.
    pub fn light(&self) -> Vector3<f32> {
        self.light_direction.normalize()
    }
}
