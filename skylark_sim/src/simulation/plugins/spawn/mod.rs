// skylark_sim/src/simulation/plugins/spawn/mod.rs

pub mod factory;
pub mod loader;
pub mod spawn_point;
