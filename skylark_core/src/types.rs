// skylark_core/src/types.rs

use serde::{Deserialize, Serialize};

// --- Core Identifier ---
/// An engine-agnostic handle to a scene node (a spawn anchor, a path node
/// object, ...). The sim crate packs an ECS entity id into it so pure data
/// structures can refer back to scene entities without depending on Bevy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SceneHandle(pub u64);

impl SceneHandle {
    // A convenience method for use in the Bevy adapter crate.
    #[cfg(feature = "bevy")] // This will only compile if the "bevy" feature is enabled
    pub fn from_entity(entity: bevy_ecs::prelude::Entity) -> Self {
        Self(entity.to_bits())
    }

    #[cfg(feature = "bevy")]
    pub fn to_entity(self) -> bevy_ecs::prelude::Entity {
        bevy_ecs::prelude::Entity::from_bits(self.0)
    }
}
