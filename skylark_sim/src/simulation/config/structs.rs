// skylark_sim/src/simulation/config/structs.rs

use bevy::prelude::Resource;
use serde::Deserialize;
use std::path::PathBuf;

// =========================================================================
// == Top-Level Configuration Resource ==
// =========================================================================

/// # ScenarioConfig
/// The primary Bevy resource holding all configuration for a simulation
/// run. This struct is the root of the data parsed from a scenario TOML
/// file.
#[derive(Resource, Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use defaults if the [simulation] section is missing
    pub simulation: Simulation,

    #[serde(default)]
    pub world: World,

    #[serde(default)]
    pub assets: AssetPaths,
}

// =========================================================================
// == Configuration Sub-Structs ==
// These map directly to the sections in a scenario.toml file.
// =========================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Simulation {
    /// Wall-clock duration of the run in seconds. `None` runs until the
    /// window is closed.
    pub duration_seconds: Option<f32>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            duration_seconds: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct World {
    /// Path to the glTF file representing the static world map. A sibling
    /// `<stem>_collider.glb` provides the static collision mesh.
    pub map_file: PathBuf,
    /// Global gravity vector in m/s^2.
    pub gravity: [f32; 3],
}

impl Default for World {
    fn default() -> Self {
        Self {
            map_file: "maps/harbor.glb".into(),
            gravity: [0.0, -9.81, 0.0],
        }
    }
}

/// Where model assets live, and the one shared occupant model.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetPaths {
    /// Directory (relative to the asset root) holding vehicle models. A
    /// marker with type tag `car` loads `<models_dir>/car.glb`.
    pub models_dir: String,
    /// The single humanoid model shared by every spawned occupant. Not
    /// parameterized by vehicle type.
    pub occupant_model: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            models_dir: "models".to_string(),
            occupant_model: "models/boxman.glb".to_string(),
        }
    }
}

impl AssetPaths {
    /// Deterministic asset path for a vehicle type tag.
    pub fn vehicle_model_path(&self, entity_type: &str) -> String {
        format!("{}/{}.glb", self.models_dir, entity_type)
    }

    pub fn occupant_model_path(&self) -> String {
        self.occupant_model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_model_path_derives_from_type_tag() {
        let assets = AssetPaths::default();
        assert_eq!(assets.vehicle_model_path("car"), "models/car.glb");
        assert_eq!(assets.vehicle_model_path("heli"), "models/heli.glb");
    }

    #[test]
    fn occupant_model_is_a_single_fixed_path() {
        let assets = AssetPaths::default();
        assert_eq!(assets.occupant_model_path(), "models/boxman.glb");
    }
}
