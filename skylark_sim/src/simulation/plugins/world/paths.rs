// skylark_sim/src/simulation/plugins/world/paths.rs

//! Bevy-side ownership of the pure path registry.

use bevy::prelude::*;
use skylark_core::prelude::PathRegistry;

/// The world's navigation registry, filled by the marker harvester and
/// read by the occupant binder at resolution time. Never cached by
/// consumers; resolution always goes through this resource.
#[derive(Resource, Default, Debug)]
pub struct WorldPaths(pub PathRegistry);
