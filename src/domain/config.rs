use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Tunables of the rigid-body scene. Every field has a default so a host can
/// send a partial JSON object with only the knobs its debug panel exposes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gravity: [f32; 3],
    /// Global contact material, used for every collider including the ground.
    pub friction: f32,
    pub restitution: f32,
    /// Height of the static ground plane.
    pub ground_height: f32,
    pub allow_sleep: bool,

    pub fixed_dt: f32,
    pub max_sub_steps: u32,

    /// Minimum impact speed along the contact normal that plays a hit sound.
    pub impact_threshold: f32,
    /// Max audio cues handed to the host per frame.
    pub max_cues_per_frame: usize,
    pub audio_seed: u32,

    /// Mass of every spawned dynamic body.
    pub spawn_mass: f32,
    /// Spawn height used by `scatter_spheres`.
    pub spawn_height: f32,
    /// Half width of the square area `scatter_spheres` fills.
    pub scatter_extent: f32,
    pub scatter_max_radius: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.82, 0.0],
            friction: 0.1,
            restitution: 0.7,
            ground_height: -0.5,
            allow_sleep: true,
            fixed_dt: 1.0 / 60.0,
            max_sub_steps: 3,
            impact_threshold: 1.5,
            max_cues_per_frame: 8,
            audio_seed: 0x2545_F491,
            spawn_mass: 1.0,
            spawn_height: 3.0,
            scatter_extent: 5.0,
            scatter_max_radius: 0.5,
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn gravity_vec(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(ConfigError::Invalid {
                field: "fixed_dt",
                reason: "must be finite and > 0",
            });
        }
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "gravity",
                reason: "must be finite",
            });
        }
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "friction",
                reason: "must be finite and >= 0",
            });
        }
        if !(self.restitution.is_finite() && self.restitution >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "restitution",
                reason: "must be finite and >= 0",
            });
        }
        if !(self.spawn_mass.is_finite() && self.spawn_mass > 0.0) {
            return Err(ConfigError::Invalid {
                field: "spawn_mass",
                reason: "dynamic bodies need a positive mass",
            });
        }
        if !self.impact_threshold.is_finite() {
            return Err(ConfigError::Invalid {
                field: "impact_threshold",
                reason: "must be finite",
            });
        }
        Ok(())
    }
}
