// skylark_sim/src/simulation/plugins/world/mod.rs

pub mod markers;
pub mod paths;
pub mod scene;
