// skylark_sim/src/simulation/plugins/world/markers.rs

//! Harvesting of scene-authored markers.
//!
//! Spawn markers and path nodes are authored as glTF node extras (one JSON
//! object per node). This pass parses them exactly once into validated
//! spawn points and the world path registry. Nodes whose extras are not
//! ours are skipped silently; vehicle markers that fail validation are
//! logged and dropped without aborting world setup.

use bevy::gltf::GltfExtras;
use bevy::prelude::*;
use nalgebra::Point3;
use serde::Deserialize;
use skylark_core::prelude::*;

use crate::simulation::config::structs::ScenarioConfig;
use crate::simulation::plugins::spawn::loader;
use crate::simulation::plugins::spawn::spawn_point::{SpawnPhase, SpawnPoint};
use crate::simulation::plugins::world::paths::WorldPaths;

/// The marker payloads understood by the harvester. The `marker` field in
/// the extras JSON decides which variant applies.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "marker", rename_all = "snake_case")]
pub enum MarkerMeta {
    /// `{"marker":"vehicle_spawn","type":"car","driver":"ai",...}`
    VehicleSpawn {
        /// Vehicle type tag. Required; validation happens in
        /// `SpawnDescriptor::new`, not here.
        #[serde(rename = "type")]
        entity_type: Option<String>,
        /// "player" or "ai". Absent means an empty vehicle.
        driver: Option<String>,
        #[serde(rename = "playerId")]
        player_id: Option<String>,
        /// Name of the first path node an AI driver should follow.
        first_node: Option<String>,
    },
    /// `{"marker":"path_node","path":"P1","node":"N1"}`
    PathNode { path: String, node: String },
}

impl MarkerMeta {
    /// Parses one node's extras. `None` means "not a marker of ours".
    pub fn parse(extras: &str) -> Option<Self> {
        serde_json::from_str(extras).ok()
    }
}

/// Consumes marker extras as scene nodes appear, spawning spawn points and
/// filling the path registry. The `Added` filter makes the pass
/// incremental: each marker is harvested exactly once, however many frames
/// scene instancing takes.
///
/// Runs after transform propagation so harvested world poses are real.
pub fn harvest_markers(
    mut commands: Commands,
    server: Res<AssetServer>,
    config: Res<ScenarioConfig>,
    mut paths: ResMut<WorldPaths>,
    nodes: Query<(Entity, &GltfExtras, &GlobalTransform), Added<GltfExtras>>,
) {
    for (entity, extras, transform) in &nodes {
        let Some(meta) = MarkerMeta::parse(&extras.value) else {
            continue;
        };

        match meta {
            MarkerMeta::PathNode { path, node } => {
                let position = transform.translation();
                debug!("[MARKERS] Path node '{}' on path '{}'", node, path);
                paths.0.insert_node(
                    &path,
                    node.clone(),
                    PathNode {
                        display_name: node,
                        position: Point3::new(
                            position.x as f64,
                            position.y as f64,
                            position.z as f64,
                        ),
                        handle: SceneHandle::from_entity(entity),
                    },
                );
            }
            MarkerMeta::VehicleSpawn {
                entity_type,
                driver,
                player_id,
                first_node,
            } => {
                match SpawnDescriptor::new(entity_type, driver, first_node, player_id) {
                    Err(error) => {
                        error!("[MARKERS] Skipping spawn marker on {:?}: {}", entity, error);
                    }
                    Ok(descriptor) => {
                        // The vehicle model request is the sequence's first
                        // action; it goes out before the spawn point ever
                        // ticks.
                        let model = loader::request_vehicle_model(
                            &server,
                            &config.assets,
                            descriptor.entity_type(),
                        );
                        info!(
                            "[MARKERS] Spawn point: type '{}', driver {:?}",
                            descriptor.entity_type(),
                            descriptor.driver().map(DriverMode::as_str)
                        );
                        commands.spawn((
                            Name::new(format!("spawn_{}", descriptor.entity_type())),
                            SpawnPoint {
                                descriptor,
                                anchor: entity,
                            },
                            SpawnPhase::VehicleLoading { model },
                        ));
                    }
                }
            }
        }
    }
}
