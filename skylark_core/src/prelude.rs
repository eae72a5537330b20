// skylark_core/src/prelude.rs

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::descriptor::{DriverMode, SpawnDescriptor};
pub use crate::paths::{Path, PathNode, PathRegistry, FOLLOW_SPEED};
pub use crate::types::SceneHandle;

// --- Error Taxonomy ---
pub use crate::errors::SpawnError;
