// skylark_sim/src/simulation/config/catalog.rs

//! This module defines the `VehicleCatalog` resource and a system to load
//! all vehicle prefab definitions from disk at startup.

use bevy::prelude::*;
use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::{collections::HashMap, path::Path};
use walkdir::WalkDir;

/// One seat slot on a vehicle, in the vehicle's local frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeatSpec {
    pub name: String,
    /// Seat position relative to the vehicle origin, in meters.
    pub offset: [f32; 3],
}

impl Default for SeatSpec {
    fn default() -> Self {
        Self {
            name: "driver".to_string(),
            offset: [0.0, 0.5, 0.0],
        }
    }
}

/// Static data for one vehicle type tag: what to label it, how big its
/// chassis is, where its seats sit, and the drive tuning shared by the
/// actuation systems.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehiclePrefab {
    /// Human-visible label stamped onto the spawned entity.
    pub display_name: String,

    /// Full chassis extents for the collider, in meters (x, y, z).
    #[serde(default = "default_chassis_size")]
    pub chassis_size: [f32; 3],

    #[serde(default = "default_mass")]
    pub mass: f32,

    /// Seat 0 is the driver's seat; the occupant binder targets it.
    #[serde(default = "default_seats")]
    pub seats: Vec<SeatSpec>,

    // --- Actuator / Physics tuning ---
    #[serde(default = "default_max_force")]
    pub max_force: f32,
    #[serde(default = "default_max_torque")]
    pub max_torque: f32,
    #[serde(default = "default_top_speed")]
    pub top_speed: f32,
}

fn default_chassis_size() -> [f32; 3] {
    [1.8, 0.8, 4.0]
}
fn default_mass() -> f32 {
    1500.0
}
fn default_seats() -> Vec<SeatSpec> {
    vec![SeatSpec::default()]
}
fn default_max_force() -> f32 {
    5000.0
}
fn default_max_torque() -> f32 {
    2500.0
}
fn default_top_speed() -> f32 {
    20.0
}

impl VehiclePrefab {
    /// Fallback prefab for a registered tag with no catalog file: one
    /// driver seat, the tag reused as the display label.
    pub fn fallback(tag: &str) -> Self {
        Self {
            display_name: tag.to_string(),
            chassis_size: default_chassis_size(),
            mass: default_mass(),
            seats: default_seats(),
            max_force: default_max_force(),
            max_torque: default_max_torque(),
            top_speed: default_top_speed(),
        }
    }
}

/// A Bevy resource mapping vehicle type tag -> prefab. The file stem of
/// each catalog TOML is the tag (e.g. `vehicles/car.toml` -> `car`).
#[derive(Resource, Default, Debug)]
pub struct VehicleCatalog(pub HashMap<String, VehiclePrefab>);

impl VehicleCatalog {
    /// Prefab for a tag, falling back to defaults when no catalog file
    /// described it. Tags the factory does not know still fail dispatch;
    /// the fallback only covers missing tuning data.
    pub fn prefab_or_fallback(&self, tag: &str) -> VehiclePrefab {
        self.0
            .get(tag)
            .cloned()
            .unwrap_or_else(|| VehiclePrefab::fallback(tag))
    }
}

/// A startup system that walks the `assets/catalog/vehicles` directory,
/// parses every `.toml` file, and populates the `VehicleCatalog` resource.
pub fn load_catalog_from_disk(mut catalog: ResMut<VehicleCatalog>) {
    let catalog_path = Path::new("assets/catalog/vehicles");
    if !catalog_path.exists() {
        warn!(
            "Vehicle catalog directory not found at {:?}, prefab defaults will be used.",
            catalog_path
        );
        return;
    }

    info!("Loading vehicle catalog from: {:?}", catalog_path);

    for entry in WalkDir::new(catalog_path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            !e.file_type().is_dir() && e.path().extension().map_or(false, |ext| ext == "toml")
        })
    {
        let path = entry.path();
        // The file stem is the vehicle type tag, e.g. "car" for car.toml.
        let Some(tag) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        match Figment::new().merge(Toml::file(path)).extract::<VehiclePrefab>() {
            Ok(prefab) => {
                info!("Loaded vehicle prefab: '{}' ({})", tag, prefab.display_name);
                catalog.0.insert(tag.to_string(), prefab);
            }
            Err(e) => {
                error!("Failed to load vehicle prefab from {:?}: {}", path, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_prefab_has_a_driver_seat() {
        let prefab = VehiclePrefab::fallback("ufo");
        assert_eq!(prefab.display_name, "ufo");
        assert_eq!(prefab.seats.len(), 1);
        assert_eq!(prefab.seats[0].name, "driver");
    }

    #[test]
    fn catalog_lookup_prefers_loaded_prefab() {
        let mut catalog = VehicleCatalog::default();
        let mut prefab = VehiclePrefab::fallback("car");
        prefab.display_name = "Hatchback".to_string();
        catalog.0.insert("car".to_string(), prefab);

        assert_eq!(catalog.prefab_or_fallback("car").display_name, "Hatchback");
        // Unlisted tags fall back to defaults instead of failing here.
        assert_eq!(catalog.prefab_or_fallback("heli").display_name, "heli");
    }
}
