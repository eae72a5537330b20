// skylark_sim/src/simulation/plugins/characters/mod.rs

//! Character entities and the occupant binder that seats them in
//! vehicles.

pub mod behavior;

use bevy::prelude::*;
use skylark_core::prelude::{DriverMode, PathRegistry, SpawnError, FOLLOW_SPEED};

use crate::simulation::core::app_state::SimulationSet;
use crate::simulation::core::transforms::seat_world_transform;
use crate::simulation::plugins::vehicles::{ControlledBy, VehicleControls};
use behavior::FollowPath;

/// Marker for every spawned character.
#[derive(Component, Debug, Default)]
pub struct Character;

/// The seat a character currently occupies. At most one at a time;
/// reassignment is out of scope for the spawn pipeline.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatedIn {
    pub vehicle: Entity,
    pub seat: Entity,
}

/// Marker for the character holding player input control.
#[derive(Component, Debug, Default)]
pub struct PlayerControlled;

/// Seats `character` in `seat` of `vehicle` and assigns its control mode.
///
/// Teleport semantics: the character's transform is set directly to the
/// seat's world transform, no physics interpolation. Control is set
/// exactly once:
/// - `Player` grants input control of the vehicle to this character. Any
///   previous holder is not revoked here; that invariant belongs to the
///   input subsystem.
/// - `Ai` with an anchor asks the path registry for the node; `Ai`
///   without one leaves the character idle in the seat, a valid terminal
///   outcome.
///
/// Returns the non-fatal anchor miss, if any, so the caller can report it
/// exactly once.
pub fn bind_occupant(
    commands: &mut Commands,
    character: Entity,
    vehicle: Entity,
    vehicle_transform: &Transform,
    seat: Entity,
    seat_local: &Transform,
    driver: DriverMode,
    behavior_anchor: Option<&str>,
    paths: &PathRegistry,
) -> Option<SpawnError> {
    let seat_pose = seat_world_transform(vehicle_transform, seat_local);
    commands
        .entity(character)
        .insert((seat_pose, SeatedIn { vehicle, seat }));

    match driver {
        DriverMode::Player => {
            commands.entity(character).insert(PlayerControlled);
            commands.entity(vehicle).insert(ControlledBy(character));
            None
        }
        DriverMode::Ai => {
            let Some(anchor) = behavior_anchor else {
                return None;
            };
            match paths.resolve_anchor(anchor) {
                Some(node) => {
                    debug!(
                        "[SPAWN] Assigning follow behavior toward node '{}'",
                        node.display_name
                    );
                    commands
                        .entity(character)
                        .insert(FollowPath::new(node, FOLLOW_SPEED));
                    None
                }
                None => Some(SpawnError::BehaviorAnchorNotFound(anchor.to_string())),
            }
        }
    }
}

/// Routes keyboard input to the vehicle the player character occupies.
pub fn keyboard_vehicle_control(
    keyboard: Res<ButtonInput<KeyCode>>,
    seated: Query<&SeatedIn, With<PlayerControlled>>,
    mut vehicles: Query<&mut VehicleControls>,
) {
    for seat in &seated {
        let Ok(mut controls) = vehicles.get_mut(seat.vehicle) else {
            continue;
        };

        let mut throttle = 0.0;
        let mut steering = 0.0;
        let mut lift = 0.0;

        if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
            throttle += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
            throttle -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
            steering += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
            steering -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyR) {
            lift += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyF) {
            lift -= 1.0;
        }

        controls.throttle = throttle;
        controls.steering = steering;
        controls.lift = lift;
    }
}

pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (keyboard_vehicle_control, behavior::follow_path_steering)
                .in_set(SimulationSet::Behavior),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Point3;
    use skylark_core::prelude::{PathNode, SceneHandle};
    use std::f32::consts::FRAC_PI_2;

    struct Bound {
        world: World,
        character: Entity,
        vehicle: Entity,
        miss: Option<SpawnError>,
    }

    fn bind(driver: DriverMode, anchor: Option<&str>, paths: &PathRegistry) -> Bound {
        let mut world = World::new();
        let vehicle_transform = Transform::from_xyz(10.0, 1.0, 0.0)
            .with_rotation(Quat::from_rotation_y(FRAC_PI_2));
        let vehicle = world.spawn(vehicle_transform).id();
        let seat_local = Transform::from_xyz(0.0, 0.5, -1.0);
        let seat = world.spawn(seat_local).id();
        let character = world.spawn(Character).id();

        let mut commands = world.commands();
        let miss = bind_occupant(
            &mut commands,
            character,
            vehicle,
            &vehicle_transform,
            seat,
            &seat_local,
            driver,
            anchor,
            paths,
        );
        world.flush();

        Bound {
            world,
            character,
            vehicle,
            miss,
        }
    }

    fn one_node_registry() -> PathRegistry {
        let mut registry = PathRegistry::default();
        registry.insert_node(
            "P1",
            "N3",
            PathNode {
                display_name: "N3".to_string(),
                position: Point3::new(7.0, 0.0, -2.0),
                handle: SceneHandle(42),
            },
        );
        registry
    }

    #[test]
    fn character_teleports_to_the_seat() {
        let bound = bind(DriverMode::Player, None, &PathRegistry::default());
        let transform = bound.world.get::<Transform>(bound.character).unwrap();
        // Seat one unit forward of a 90-degree-yawed vehicle at (10, 1, 0).
        assert_abs_diff_eq!(transform.translation.x, 9.0, epsilon = 1e-5);
        assert_abs_diff_eq!(transform.translation.y, 1.5, epsilon = 1e-5);
        assert_abs_diff_eq!(transform.translation.z, 0.0, epsilon = 1e-5);

        let seated = bound.world.get::<SeatedIn>(bound.character).unwrap();
        assert_eq!(seated.vehicle, bound.vehicle);
    }

    #[test]
    fn player_driver_gains_input_control() {
        let bound = bind(DriverMode::Player, None, &PathRegistry::default());
        assert!(bound.miss.is_none());
        assert!(bound
            .world
            .get::<PlayerControlled>(bound.character)
            .is_some());
        assert_eq!(
            bound.world.get::<ControlledBy>(bound.vehicle),
            Some(&ControlledBy(bound.character))
        );
    }

    #[test]
    fn ai_driver_with_resolved_anchor_gets_follow_behavior() {
        let bound = bind(DriverMode::Ai, Some("N3"), &one_node_registry());
        assert!(bound.miss.is_none());
        let follow = bound.world.get::<FollowPath>(bound.character).unwrap();
        assert_eq!(follow.node_name, "N3");
        assert_eq!(follow.target, Vec3::new(7.0, 0.0, -2.0));
        assert_eq!(follow.speed, FOLLOW_SPEED as f32);
        // AI control never grants player input.
        assert!(bound.world.get::<ControlledBy>(bound.vehicle).is_none());
    }

    #[test]
    fn ai_driver_without_anchor_idles_in_the_seat() {
        let bound = bind(DriverMode::Ai, None, &one_node_registry());
        assert!(bound.miss.is_none());
        assert!(bound.world.get::<FollowPath>(bound.character).is_none());
        assert!(bound.world.get::<SeatedIn>(bound.character).is_some());
    }

    #[test]
    fn missing_anchor_is_reported_once_and_leaves_character_idle() {
        let bound = bind(DriverMode::Ai, Some("N9"), &one_node_registry());
        assert_eq!(
            bound.miss,
            Some(SpawnError::BehaviorAnchorNotFound("N9".to_string()))
        );
        assert!(bound.world.get::<FollowPath>(bound.character).is_none());
        assert!(bound.world.get::<SeatedIn>(bound.character).is_some());
    }
}
