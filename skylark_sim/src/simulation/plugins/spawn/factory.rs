// skylark_sim/src/simulation/plugins/spawn/factory.rs

//! Polymorphic dispatch from a marker's type tag to the concrete vehicle
//! constructor. The table is open: a plugin can register additional tags
//! without touching the dispatcher.

use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;
use skylark_core::prelude::SpawnError;
use std::collections::HashMap;

use crate::simulation::config::catalog::VehiclePrefab;
use crate::simulation::plugins::vehicles::{airplane, car, helicopter};

/// Attaches the kind-specific components for one vehicle type to an entity
/// that already carries the common vehicle bundle.
pub type VehicleConstructor = fn(&mut EntityCommands, &VehiclePrefab);

/// Registry resource mapping type tag -> constructor.
#[derive(Resource)]
pub struct VehicleFactory {
    constructors: HashMap<String, VehicleConstructor>,
}

impl Default for VehicleFactory {
    /// The built-in vehicle kinds.
    fn default() -> Self {
        let mut factory = Self {
            constructors: HashMap::new(),
        };
        factory.register("car", car::attach_car);
        factory.register("heli", helicopter::attach_helicopter);
        factory.register("airplane", airplane::attach_airplane);
        factory
    }
}

impl VehicleFactory {
    pub fn register(&mut self, tag: impl Into<String>, constructor: VehicleConstructor) {
        self.constructors.insert(tag.into(), constructor);
    }

    /// Looks up the constructor for a tag. An unknown tag is an explicit
    /// error, never a silent fall-through: the caller must not register
    /// any entity for it.
    pub fn constructor(&self, tag: &str) -> Result<VehicleConstructor, SpawnError> {
        self.constructors
            .get(tag)
            .copied()
            .ok_or_else(|| SpawnError::UnknownEntityType(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::plugins::vehicles::car::Car;
    use crate::simulation::plugins::vehicles::helicopter::Helicopter;

    #[test]
    fn known_tags_dispatch_to_their_kind() {
        let factory = VehicleFactory::default();
        let mut world = World::new();
        let prefab = VehiclePrefab::fallback("car");

        let mut commands = world.commands();
        let mut entity = commands.spawn_empty();
        let id = entity.id();
        factory.constructor("car").unwrap()(&mut entity, &prefab);
        world.flush();
        assert!(world.get::<Car>(id).is_some());
        assert!(world.get::<Helicopter>(id).is_none());
    }

    #[test]
    fn all_builtin_tags_are_registered() {
        let factory = VehicleFactory::default();
        for tag in ["car", "heli", "airplane"] {
            assert!(factory.constructor(tag).is_ok(), "missing builtin: {tag}");
        }
    }

    #[test]
    fn unknown_tag_is_an_explicit_error() {
        let factory = VehicleFactory::default();
        let err = factory.constructor("ufo").unwrap_err();
        assert_eq!(err, SpawnError::UnknownEntityType("ufo".to_string()));
    }

    #[test]
    fn new_tags_can_be_registered_without_touching_dispatch() {
        let mut factory = VehicleFactory::default();
        factory.register("hovercraft", car::attach_car);
        assert!(factory.constructor("hovercraft").is_ok());
    }
}
