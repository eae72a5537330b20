// skylark_sim/src/simulation/core/events.rs

use bevy::prelude::{Component, Entity, Event};
// Import the pure error taxonomy from the core library
use skylark_core::prelude::SpawnError;

/// Terminal state of a spawn point, attached when its phase component is
/// removed. A spawn point carrying this component is inert: it is never
/// reused or retried.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum SpawnOutcome {
    /// Vehicle registered, no occupant requested. The common case.
    NoOccupant,
    /// Vehicle and character registered, character seated in seat 0.
    Bound,
    /// The sequence aborted. Other spawn points are unaffected.
    Failed(SpawnError),
}

/// Emitted exactly once per spawn point when its assembly sequence reaches
/// a terminal state, so world setup can observe results without polling.
#[derive(Event, Debug, Clone)]
pub struct SpawnSequenceCompleted {
    pub spawn_point: Entity,
    pub outcome: SpawnOutcome,
}

/// Emitted once when an AI occupant's behavior anchor resolved to no node
/// in any path. Non-fatal: the owning sequence still completes `Bound`.
#[derive(Event, Debug, Clone)]
pub struct BehaviorAnchorMissed {
    pub character: Entity,
    pub anchor: String,
}
