//! Configuration types for world setup.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
        }
    }
}

/// Barrier layout selection and per-layout constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierConfig {
    /// Layout selector code (0..=6)
    pub barrier_type: u32,
    /// Number of floating islands (layout 5)
    pub island_count: usize,
    /// Radius of each floating island
    pub island_radius: f32,
    /// Number of spots (layout 6)
    pub spot_count: usize,
    /// Radius of each spot
    pub spot_radius: f32,
    /// Batches of island centers drawn before giving up
    pub max_placement_attempts: u32,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            barrier_type: 0,
            island_count: 12,
            island_radius: 3.0,
            spot_count: 5,
            spot_radius: 5.0,
            max_placement_attempts: 100_000,
        }
    }
}

impl BarrierConfig {
    /// Minimum spacing between island centers and the grid edge
    pub fn island_margin(&self) -> i32 {
        (self.island_radius * 4.0) as i32
    }
}

/// Top-level configuration for one world setup run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    pub world: WorldConfig,
    pub barrier: BarrierConfig,
}

impl SimConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SimConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let max = i16::MAX as i32;
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(Error::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.world.width > max || self.world.height > max {
            return Err(Error::InvalidConfig(format!(
                "grid dimensions must not exceed {max}, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.barrier.island_count == 0 || self.barrier.spot_count == 0 {
            return Err(Error::InvalidConfig(
                "island_count and spot_count must be at least 1".to_string(),
            ));
        }
        if self.barrier.island_radius < 0.0 || self.barrier.spot_radius < 0.0 {
            return Err(Error::InvalidConfig(
                "barrier radii must not be negative".to_string(),
            ));
        }
        if self.barrier.max_placement_attempts == 0 {
            return Err(Error::InvalidConfig(
                "max_placement_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
