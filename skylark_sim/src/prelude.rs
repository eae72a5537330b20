// skylark_sim/src/prelude.rs

// Re-export the entire Bevy prelude for convenience.
pub use bevy::prelude::*;

// Re-export the core prelude so the pure types (`SpawnDescriptor`,
// `PathRegistry`, `SpawnError`, ...) are easy to reach from any plugin.
pub use skylark_core::prelude::*;

// Re-export common simulation-specific types for easy access.
pub use crate::simulation::config::catalog::{VehicleCatalog, VehiclePrefab};
pub use crate::simulation::config::structs::{AssetPaths, ScenarioConfig};
pub use crate::simulation::core::app_state::{AppState, SceneBuildSet, SimulationSet};
pub use crate::simulation::core::events::{
    BehaviorAnchorMissed, SpawnOutcome, SpawnSequenceCompleted,
};
pub use crate::simulation::plugins::characters::{Character, PlayerControlled, SeatedIn};
pub use crate::simulation::plugins::spawn::factory::VehicleFactory;
pub use crate::simulation::plugins::spawn::spawn_point::{SpawnPhase, SpawnPoint};
pub use crate::simulation::plugins::vehicles::{
    ControlledBy, OwnedBy, Seat, Seats, VehicleBody, VehicleControls,
};
pub use crate::simulation::plugins::world::paths::WorldPaths;
