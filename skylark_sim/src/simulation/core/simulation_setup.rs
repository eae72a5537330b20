// skylark_sim/src/simulation/core/simulation_setup.rs

use bevy::prelude::*;

use crate::simulation::config::catalog::{load_catalog_from_disk, VehicleCatalog};
use crate::simulation::config::structs::ScenarioConfig;
use crate::simulation::core::app_state::{AppState, SceneBuildSet, SimulationSet};
use crate::simulation::plugins::world::paths::WorldPaths;

pub struct SimulationSetupPlugin;

impl Plugin for SimulationSetupPlugin {
    fn build(&self, app: &mut App) {
        // This plugin's job is to set up states, schedules and shared
        // resources; the feature plugins hang their systems off of these.
        app.init_state::<AppState>()
            .init_resource::<VehicleCatalog>()
            .init_resource::<WorldPaths>();

        // --- CONFIGURE THE SCENE-BUILDING PASSES ---
        // Visuals first, then the static collision mesh.
        app.configure_sets(
            OnEnter(AppState::SceneBuilding),
            (SceneBuildSet::SpawnScene, SceneBuildSet::Physics).chain(),
        );

        // --- CONFIGURE THE RUNTIME SCHEDULE GRAPH ---
        // Behavior decides, actuation applies. Both only matter while the
        // simulation is actually running.
        app.configure_sets(
            FixedUpdate,
            (SimulationSet::Behavior, SimulationSet::Actuation)
                .chain()
                .run_if(in_state(AppState::Running)),
        );

        app.add_systems(OnEnter(AppState::AssetLoading), load_catalog_from_disk)
            .add_systems(
                Update,
                stop_after_duration.run_if(in_state(AppState::Running)),
            );
    }
}

/// Ends the run once the configured duration has elapsed. Scenarios
/// without a duration run until the window closes.
fn stop_after_duration(
    time: Res<Time>,
    config: Res<ScenarioConfig>,
    mut exit: EventWriter<AppExit>,
    mut elapsed: Local<f32>,
) {
    let Some(limit) = config.simulation.duration_seconds else {
        return;
    };
    *elapsed += time.delta_secs();
    if *elapsed >= limit {
        info!("Configured duration of {}s reached. Exiting.", limit);
        exit.write(AppExit::Success);
    }
}
