// skylark_sim/src/simulation/plugins/mod.rs

pub mod characters;
pub mod spawn;
pub mod vehicles;
pub mod world;
