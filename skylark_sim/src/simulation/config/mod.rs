// skylark_sim/src/simulation/config/mod.rs

//! This module handles loading and validating all simulation configuration
//! from disk: the scenario file and the vehicle prefab catalog.

pub mod catalog;
pub mod structs;

use figment::{
    providers::{Format, Toml},
    Figment,
};
use std::path::Path;

// Re-export public types
pub use catalog::{VehicleCatalog, VehiclePrefab};
pub use structs::{AssetPaths, ScenarioConfig};

/// Loads the scenario TOML into a `ScenarioConfig`.
///
/// A scenario that fails to parse is a startup-configuration error, so
/// this panics with the offending path in the message rather than limping
/// along with defaults.
pub fn load_scenario(path: &Path) -> ScenarioConfig {
    match Figment::new().merge(Toml::file(path)).extract() {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "Failed to load or parse scenario file at {}: {}",
                path.display(),
                e
            );
        }
    }
}
