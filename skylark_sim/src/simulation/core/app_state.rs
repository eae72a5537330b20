// skylark_sim/src/simulation/core/app_state.rs

use bevy::{ecs::schedule::SystemSet, prelude::States};

/// Defines the major phases of the application's lifecycle.
#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// The initial state. The world scene and its collider mesh are
    /// loading.
    #[default]
    AssetLoading,

    /// World assets are loaded. The scene is instancing; spawn markers and
    /// path nodes are being harvested out of it.
    SceneBuilding,

    /// The main simulation loop is running. Spawn sequences keep resolving
    /// here as their model loads complete; they never block the loop.
    Running,
}

/// System sets ordering the passes that run when the SceneBuilding state is
/// entered.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneBuildSet {
    /// Pass 1: spawn the visual world scene, lighting and the camera.
    SpawnScene,

    /// Pass 2: attach the static collision mesh.
    Physics,
}

/// The runtime data-flow graph for FixedUpdate.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Systems deciding what a vehicle should do next: the keyboard
    /// router and the follow-path steering.
    Behavior,

    /// Systems converting control input into forces and torques. Runs
    /// after Behavior so commands are at most one tick stale.
    Actuation,
}
