// skylark_sim/src/simulation/plugins/spawn/loader.rs

//! A thin wrapper over the asset server giving the spawn pipeline a
//! uniform "request a model, poll for it later" contract.
//!
//! No caching, retry or dedup lives here; those are asset-server policies.
//! Ordering within one spawn point (vehicle model strictly before occupant
//! model) is enforced by the state machine, which only issues the second
//! request from the vehicle-placed transition. Requests from different
//! spawn points are free to overlap.

use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;

use crate::simulation::config::structs::AssetPaths;

/// Where an in-flight model request currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPoll {
    Pending,
    Ready,
    Failed,
}

/// Requests the model scene for a vehicle type tag. The path is derived
/// deterministically from the tag; whether a file actually exists there is
/// only known once the load resolves.
pub fn request_vehicle_model(
    server: &AssetServer,
    assets: &AssetPaths,
    entity_type: &str,
) -> Handle<Scene> {
    let path = assets.vehicle_model_path(entity_type);
    debug!("[SPAWN] Requesting vehicle model: {}", path);
    server.load(GltfAssetLabel::Scene(0).from_asset(path))
}

/// Requests the one shared occupant model.
pub fn request_occupant_model(server: &AssetServer, assets: &AssetPaths) -> Handle<Scene> {
    let path = assets.occupant_model_path();
    debug!("[SPAWN] Requesting occupant model: {}", path);
    server.load(GltfAssetLabel::Scene(0).from_asset(path))
}

/// Polls a previously requested model handle.
pub fn poll_model(server: &AssetServer, handle: &Handle<Scene>) -> ModelPoll {
    match server.get_load_state(handle) {
        Some(LoadState::Loaded) => ModelPoll::Ready,
        Some(LoadState::Failed(_)) => ModelPoll::Failed,
        // NotLoaded/Loading, or the server has not seen this handle yet.
        _ => ModelPoll::Pending,
    }
}
