// skylark_sim/src/simulation/plugins/spawn/spawn_point.rs

//! The per-marker assembly state machine.
//!
//! One spawn point drives one vehicle (and optionally its occupant) from
//! model request to world registration. The nested-callback shape of the
//! classic loader pattern is flattened into an explicit phase component so
//! every suspension point is inspectable: a spawn point is always in
//! exactly one of `VehicleLoading`, `OccupantLoading`, or a terminal
//! `SpawnOutcome`. There are no backward transitions and no retries; a
//! failed sequence is terminal for that spawn point only.
//!
//! Many spawn points advance independently and concurrently; ordering is
//! only guaranteed within one spawn point (vehicle model strictly before
//! occupant model).

use avian3d::prelude::*;
use bevy::prelude::*;
use nalgebra::Isometry3;
use skylark_core::prelude::*;

use crate::simulation::config::catalog::VehicleCatalog;
use crate::simulation::config::structs::ScenarioConfig;
use crate::simulation::core::events::{
    BehaviorAnchorMissed, SpawnOutcome, SpawnSequenceCompleted,
};
use crate::simulation::core::transforms::{
    bevy_global_transform_to_nalgebra_isometry, vehicle_spawn_transform,
};
use crate::simulation::plugins::characters::{bind_occupant, Character};
use crate::simulation::plugins::spawn::factory::VehicleFactory;
use crate::simulation::plugins::spawn::loader::{self, ModelPoll};
use crate::simulation::plugins::vehicles::{
    OwnedBy, Seat, Seats, SpawnedFrom, VehicleBody, VehicleControls,
};
use crate::simulation::plugins::world::paths::WorldPaths;

/// One scene marker's spawn intent: the validated descriptor plus the
/// anchor node whose world pose the vehicle copies.
#[derive(Component, Debug)]
pub struct SpawnPoint {
    pub descriptor: SpawnDescriptor,
    pub anchor: Entity,
}

/// The in-flight phase of a spawn point's assembly sequence. Removed at
/// termination; a `SpawnOutcome` component takes its place.
#[derive(Component, Debug)]
pub enum SpawnPhase {
    /// Waiting on the vehicle model. The entry state.
    VehicleLoading { model: Handle<Scene> },
    /// Vehicle registered; waiting on the shared occupant model.
    OccupantLoading {
        vehicle: Entity,
        model: Handle<Scene>,
    },
}

pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VehicleFactory>()
            .add_event::<SpawnSequenceCompleted>()
            .add_event::<BehaviorAnchorMissed>()
            .add_systems(
                Update,
                (advance_vehicle_loading, advance_occupant_loading).chain(),
            );
    }
}

// =========================================================================
// == Assembly steps ==
// These are plain functions over `Commands` so the load-polling systems
// stay thin and the registration semantics stay testable.
// =========================================================================

/// Constructs, positions and registers one vehicle.
///
/// The entity is spawned with its complete bundle (body, pose, seats,
/// kind components) through a single command batch, so the world never
/// observes a half-built vehicle. Returns the vehicle entity.
pub fn place_vehicle(
    commands: &mut Commands,
    factory: &VehicleFactory,
    catalog: &VehicleCatalog,
    descriptor: &SpawnDescriptor,
    anchor: Entity,
    anchor_pose: &Isometry3<f64>,
    model: Handle<Scene>,
) -> Result<Entity, SpawnError> {
    let tag = descriptor.entity_type();
    // Resolve the constructor before anything is spawned: an unknown tag
    // must leave the world untouched.
    let constructor = factory.constructor(tag)?;
    let prefab = catalog.prefab_or_fallback(tag);

    let transform = vehicle_spawn_transform(anchor_pose);
    let [sx, sy, sz] = prefab.chassis_size;

    let mut vehicle = commands.spawn((
        VehicleBody,
        Name::new(prefab.display_name.clone()),
        SpawnedFrom(anchor),
        transform,
        SceneRoot(model),
        RigidBody::Dynamic,
        Collider::cuboid(sx, sy, sz),
        Mass(prefab.mass),
        Friction::new(0.7),
        // Driving forces must keep being applied even at rest.
        SleepingDisabled,
        LinearVelocity::default(),
        AngularVelocity::default(),
        VehicleControls::default(),
    ));
    let vehicle_entity = vehicle.id();

    if let Some(owner) = descriptor.owner_id() {
        vehicle.insert(OwnedBy(owner.to_string()));
    }

    // Kind-specific components (Car/Helicopter/Airplane parameters).
    constructor(&mut vehicle, &prefab);

    // Seats ride along as child entities.
    let mut seat_entities = Vec::with_capacity(prefab.seats.len());
    vehicle.with_children(|parent| {
        for (index, spec) in prefab.seats.iter().enumerate() {
            let seat = parent
                .spawn((
                    Seat {
                        vehicle: vehicle_entity,
                        index,
                    },
                    Name::new(format!("{}_{}", prefab.display_name, spec.name)),
                    Transform::from_translation(Vec3::from(spec.offset)),
                ))
                .id();
            seat_entities.push(seat);
        }
    });
    vehicle.insert(Seats(seat_entities));

    Ok(vehicle_entity)
}

/// Registers the occupant character and binds it into the given seat.
///
/// Returns the character entity and the non-fatal anchor miss, if the
/// binder reported one.
pub fn seat_occupant(
    commands: &mut Commands,
    vehicle: Entity,
    vehicle_transform: &Transform,
    seat: Entity,
    seat_local: &Transform,
    driver: DriverMode,
    behavior_anchor: Option<&str>,
    model: Handle<Scene>,
    paths: &PathRegistry,
) -> (Entity, Option<SpawnError>) {
    let character = commands
        .spawn((
            Character,
            Name::new("Occupant"),
            SceneRoot(model),
            Transform::default(),
        ))
        .id();

    let miss = bind_occupant(
        commands,
        character,
        vehicle,
        vehicle_transform,
        seat,
        seat_local,
        driver,
        behavior_anchor,
        paths,
    );

    (character, miss)
}

// =========================================================================
// == Phase-advancing systems ==
// =========================================================================

/// Advances every spawn point still waiting on its vehicle model.
#[allow(clippy::too_many_arguments)]
pub fn advance_vehicle_loading(
    mut commands: Commands,
    server: Res<AssetServer>,
    config: Res<ScenarioConfig>,
    factory: Res<VehicleFactory>,
    catalog: Res<VehicleCatalog>,
    anchors: Query<&GlobalTransform>,
    mut spawn_points: Query<(Entity, &SpawnPoint, &mut SpawnPhase)>,
    mut completed: EventWriter<SpawnSequenceCompleted>,
) {
    for (point, spawn_point, mut phase) in &mut spawn_points {
        let SpawnPhase::VehicleLoading { model } = &*phase else {
            continue;
        };
        let descriptor = &spawn_point.descriptor;

        match loader::poll_model(&server, model) {
            ModelPoll::Pending => {}
            ModelPoll::Failed => {
                let path = config.assets.vehicle_model_path(descriptor.entity_type());
                fail_spawn(
                    &mut commands,
                    point,
                    SpawnError::AssetLoadFailure(path),
                    &mut completed,
                );
            }
            ModelPoll::Ready => {
                let Ok(anchor_transform) = anchors.get(spawn_point.anchor) else {
                    fail_spawn(
                        &mut commands,
                        point,
                        SpawnError::MalformedDescriptor(
                            "spawn anchor no longer exists".to_string(),
                        ),
                        &mut completed,
                    );
                    continue;
                };
                let anchor_pose = bevy_global_transform_to_nalgebra_isometry(anchor_transform);

                match place_vehicle(
                    &mut commands,
                    &factory,
                    &catalog,
                    descriptor,
                    spawn_point.anchor,
                    &anchor_pose,
                    model.clone(),
                ) {
                    Err(error) => fail_spawn(&mut commands, point, error, &mut completed),
                    Ok(vehicle) => {
                        info!(
                            "[SPAWN] Registered vehicle '{}' for spawn point {:?}",
                            descriptor.entity_type(),
                            point
                        );
                        if descriptor.wants_occupant() {
                            // The occupant request is only issued now,
                            // preserving the two-stage ordering.
                            let model = loader::request_occupant_model(&server, &config.assets);
                            *phase = SpawnPhase::OccupantLoading { vehicle, model };
                        } else {
                            finish_spawn(
                                &mut commands,
                                point,
                                SpawnOutcome::NoOccupant,
                                &mut completed,
                            );
                        }
                    }
                }
            }
        }
    }
}

/// Advances every spawn point waiting on the occupant model.
#[allow(clippy::too_many_arguments)]
pub fn advance_occupant_loading(
    mut commands: Commands,
    server: Res<AssetServer>,
    config: Res<ScenarioConfig>,
    paths: Res<WorldPaths>,
    vehicles: Query<(&Transform, &Seats)>,
    seats: Query<&Transform, (With<Seat>, Without<Seats>)>,
    mut spawn_points: Query<(Entity, &SpawnPoint, &mut SpawnPhase)>,
    mut completed: EventWriter<SpawnSequenceCompleted>,
    mut missed: EventWriter<BehaviorAnchorMissed>,
) {
    for (point, spawn_point, mut phase) in &mut spawn_points {
        let SpawnPhase::OccupantLoading { vehicle, model } = &*phase else {
            continue;
        };
        let vehicle = *vehicle;
        let descriptor = &spawn_point.descriptor;

        match loader::poll_model(&server, model) {
            ModelPoll::Pending => {}
            ModelPoll::Failed => {
                fail_spawn(
                    &mut commands,
                    point,
                    SpawnError::AssetLoadFailure(config.assets.occupant_model_path()),
                    &mut completed,
                );
            }
            ModelPoll::Ready => {
                let Ok((vehicle_transform, seat_list)) = vehicles.get(vehicle) else {
                    fail_spawn(
                        &mut commands,
                        point,
                        SpawnError::MalformedDescriptor(
                            "vehicle vanished before its occupant arrived".to_string(),
                        ),
                        &mut completed,
                    );
                    continue;
                };
                let Some(&seat) = seat_list.0.first() else {
                    fail_spawn(
                        &mut commands,
                        point,
                        SpawnError::MalformedDescriptor("vehicle has no seats".to_string()),
                        &mut completed,
                    );
                    continue;
                };
                let Ok(seat_local) = seats.get(seat) else {
                    continue;
                };
                let Some(driver) = descriptor.driver() else {
                    // Unreachable in practice: this phase is only entered
                    // when the descriptor wants an occupant.
                    finish_spawn(&mut commands, point, SpawnOutcome::NoOccupant, &mut completed);
                    continue;
                };

                let (character, miss) = seat_occupant(
                    &mut commands,
                    vehicle,
                    vehicle_transform,
                    seat,
                    seat_local,
                    driver,
                    descriptor.behavior_anchor(),
                    model.clone(),
                    &paths.0,
                );
                info!(
                    "[SPAWN] Registered occupant ({}) for spawn point {:?}",
                    driver.as_str(),
                    point
                );

                if let Some(SpawnError::BehaviorAnchorNotFound(anchor)) = miss {
                    warn!("Path node '{}' not found in any path.", anchor);
                    missed.write(BehaviorAnchorMissed { character, anchor });
                }

                // The anchor miss is non-fatal: the sequence still ends
                // bound, with the character idle in its seat.
                finish_spawn(&mut commands, point, SpawnOutcome::Bound, &mut completed);
            }
        }
    }
}

fn finish_spawn(
    commands: &mut Commands,
    point: Entity,
    outcome: SpawnOutcome,
    completed: &mut EventWriter<SpawnSequenceCompleted>,
) {
    commands
        .entity(point)
        .remove::<SpawnPhase>()
        .insert(outcome.clone());
    completed.write(SpawnSequenceCompleted {
        spawn_point: point,
        outcome,
    });
}

fn fail_spawn(
    commands: &mut Commands,
    point: Entity,
    error: SpawnError,
    completed: &mut EventWriter<SpawnSequenceCompleted>,
) {
    error!("[SPAWN] Sequence for {:?} aborted: {}", point, error);
    finish_spawn(commands, point, SpawnOutcome::Failed(error), completed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::plugins::characters::behavior::FollowPath;
    use crate::simulation::plugins::characters::SeatedIn;
    use approx::assert_abs_diff_eq;
    use nalgebra::Point3;
    use std::f32::consts::FRAC_PI_2;

    fn descriptor(tag: &str, driver: Option<&str>, anchor: Option<&str>) -> SpawnDescriptor {
        SpawnDescriptor::new(
            Some(tag.to_string()),
            driver.map(str::to_string),
            anchor.map(str::to_string),
            Some("player-1".to_string()),
        )
        .unwrap()
    }

    fn anchor_pose(x: f32, y: f32, z: f32) -> Isometry3<f64> {
        crate::simulation::core::transforms::bevy_transform_to_nalgebra_isometry(
            &Transform::from_xyz(x, y, z).with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        )
    }

    fn registry_with_nodes(names: &[&str]) -> PathRegistry {
        let mut registry = PathRegistry::default();
        for (i, name) in names.iter().enumerate() {
            registry.insert_node(
                "P1",
                *name,
                PathNode {
                    display_name: name.to_string(),
                    position: Point3::new(i as f64 * 10.0, 0.0, -5.0),
                    handle: SceneHandle(i as u64),
                },
            );
        }
        registry
    }

    fn place(world: &mut World, descriptor: &SpawnDescriptor) -> Result<Entity, SpawnError> {
        let factory = VehicleFactory::default();
        let catalog = VehicleCatalog::default();
        let anchor = world
            .spawn(
                Transform::from_xyz(4.0, 0.5, -6.0)
                    .with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
            )
            .id();
        let pose = anchor_pose(4.0, 0.5, -6.0);
        let mut commands = world.commands();
        let result = place_vehicle(
            &mut commands,
            &factory,
            &catalog,
            descriptor,
            anchor,
            &pose,
            Handle::default(),
        );
        world.flush();
        result
    }

    #[test]
    fn vehicle_is_registered_fully_built_at_the_lifted_anchor() {
        let mut world = World::new();
        let vehicle = place(&mut world, &descriptor("car", None, None)).unwrap();

        let transform = world.get::<Transform>(vehicle).unwrap();
        assert_abs_diff_eq!(transform.translation.x, 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(transform.translation.y, 1.5, epsilon = 1e-5);
        assert_abs_diff_eq!(transform.translation.z, -6.0, epsilon = 1e-5);
        let expected = Quat::from_rotation_y(FRAC_PI_2);
        assert!(transform.rotation.dot(expected).abs() > 1.0 - 1e-5);

        // Registered complete: body, label, owner, controls and a seat.
        assert!(world.get::<VehicleBody>(vehicle).is_some());
        assert!(world.get::<RigidBody>(vehicle).is_some());
        assert!(world.get::<VehicleControls>(vehicle).is_some());
        assert_eq!(world.get::<Name>(vehicle).unwrap().as_str(), "car");
        assert_eq!(
            world.get::<OwnedBy>(vehicle),
            Some(&OwnedBy("player-1".to_string()))
        );
        let seats = world.get::<Seats>(vehicle).unwrap();
        assert_eq!(seats.0.len(), 1);
        assert!(world.get::<Seat>(seats.0[0]).is_some());
    }

    #[test]
    fn exactly_one_vehicle_and_no_characters_for_empty_markers() {
        let mut world = World::new();
        place(&mut world, &descriptor("heli", None, None)).unwrap();

        let mut vehicles = world.query::<&VehicleBody>();
        assert_eq!(vehicles.iter(&world).count(), 1);
        let mut characters = world.query::<&Character>();
        assert_eq!(characters.iter(&world).count(), 0);
    }

    #[test]
    fn unknown_type_tag_registers_nothing() {
        let mut world = World::new();
        let before = world.entities().len();
        // The anchor entity is spawned by the helper before placement runs.
        let err = place(&mut world, &descriptor("ufo", Some("ai"), Some("N3"))).unwrap_err();
        assert_eq!(err, SpawnError::UnknownEntityType("ufo".to_string()));
        assert_eq!(world.entities().len(), before + 1); // only the anchor
        let mut vehicles = world.query::<&VehicleBody>();
        assert_eq!(vehicles.iter(&world).count(), 0);
    }

    #[test]
    fn ai_occupant_with_present_anchor_ends_seated_and_following() {
        let mut world = World::new();
        let registry = registry_with_nodes(&["N1", "N2", "N3"]);
        let vehicle = place(&mut world, &descriptor("car", Some("ai"), Some("N3"))).unwrap();

        let vehicle_transform = *world.get::<Transform>(vehicle).unwrap();
        let seat = world.get::<Seats>(vehicle).unwrap().0[0];
        let seat_local = *world.get::<Transform>(seat).unwrap();

        let mut commands = world.commands();
        let (character, miss) = seat_occupant(
            &mut commands,
            vehicle,
            &vehicle_transform,
            seat,
            &seat_local,
            DriverMode::Ai,
            Some("N3"),
            Handle::default(),
            &registry,
        );
        world.flush();

        assert!(miss.is_none());
        let mut characters = world.query::<&Character>();
        assert_eq!(characters.iter(&world).count(), 1);
        let seated = world.get::<SeatedIn>(character).unwrap();
        assert_eq!(seated.vehicle, vehicle);
        assert_eq!(seated.seat, seat);
        let follow = world.get::<FollowPath>(character).unwrap();
        assert_eq!(follow.node_name, "N3");
    }

    #[test]
    fn ai_occupant_with_absent_anchor_ends_seated_without_behavior() {
        let mut world = World::new();
        let registry = registry_with_nodes(&["N1", "N2", "N3"]);
        let vehicle = place(&mut world, &descriptor("car", Some("ai"), Some("N9"))).unwrap();

        let vehicle_transform = *world.get::<Transform>(vehicle).unwrap();
        let seat = world.get::<Seats>(vehicle).unwrap().0[0];
        let seat_local = *world.get::<Transform>(seat).unwrap();

        let mut commands = world.commands();
        let (character, miss) = seat_occupant(
            &mut commands,
            vehicle,
            &vehicle_transform,
            seat,
            &seat_local,
            DriverMode::Ai,
            Some("N9"),
            Handle::default(),
            &registry,
        );
        world.flush();

        assert_eq!(
            miss,
            Some(SpawnError::BehaviorAnchorNotFound("N9".to_string()))
        );
        assert!(world.get::<FollowPath>(character).is_none());
        assert!(world.get::<SeatedIn>(character).is_some());
    }
}
