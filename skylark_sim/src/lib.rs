// skylark_sim/src/lib.rs

use avian3d::prelude::PhysicsPlugins;
use bevy::prelude::*;

// Import the plugins defined within the simulation crate.
use crate::simulation::core::simulation_setup::SimulationSetupPlugin;
use crate::simulation::plugins::characters::CharacterPlugin;
use crate::simulation::plugins::spawn::spawn_point::SpawnPlugin;
use crate::simulation::plugins::vehicles::VehiclePlugin;
use crate::simulation::plugins::world::scene::WorldScenePlugin;

// This prelude is for convenience for other files WITHIN the skylark_sim crate.
pub mod prelude;

pub mod cli;
pub mod simulation;

/// The main plugin that brings together all the simulation parts.
/// A binary only needs to add this one plugin to its Bevy App.
pub struct SkylarkSimulationPlugin;

impl Plugin for SkylarkSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            // Physics backend for vehicle bodies and the static world.
            PhysicsPlugins::default(),
            // States, system sets, the prefab catalog and path registry.
            SimulationSetupPlugin,
            // Loads the world scene, colliders, lighting, camera; harvests
            // the scene's markers.
            WorldScenePlugin,
            // The spawn-point state machine and the vehicle factory.
            SpawnPlugin,
            // Per-kind drive systems.
            VehiclePlugin,
            // Occupants: binding, player input, follow behavior.
            CharacterPlugin,
        ));
    }
}
