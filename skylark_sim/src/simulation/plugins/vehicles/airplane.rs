// skylark_sim/src/simulation/plugins/vehicles/airplane.rs

use avian3d::prelude::*;
use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;

use super::VehicleControls;
use crate::simulation::config::catalog::VehiclePrefab;

const MAX_YAW_RATE: f32 = 0.6;
const MAX_PITCH_RATE: f32 = 0.8;

/// Drive parameters for a fixed-wing airplane. Attached by the factory.
#[derive(Component, Clone, Debug)]
pub struct Airplane {
    pub max_force: f32,
    pub max_torque: f32,
    pub top_speed: f32,
}

/// Factory constructor for the `airplane` type tag.
pub fn attach_airplane(entity: &mut EntityCommands, prefab: &VehiclePrefab) {
    entity.insert(Airplane {
        max_force: prefab.max_force,
        max_torque: prefab.max_torque,
        // Airplanes cruise faster than the shared default.
        top_speed: prefab.top_speed.max(40.0),
    });
}

/// RUNTIME: thrust along the nose, pitch from the lift axis, yaw from
/// steering.
pub fn drive_airplanes(
    mut commands: Commands,
    query: Query<(
        Entity,
        &Transform,
        &LinearVelocity,
        &AngularVelocity,
        &Airplane,
        &VehicleControls,
    )>,
) {
    for (entity, transform, lin_vel, ang_vel, airplane, controls) in &query {
        let world_forward = transform.forward();
        let current_forward_speed = lin_vel.dot(*world_forward);
        let target_speed = controls.throttle * airplane.top_speed;
        let thrust = world_forward * (target_speed - current_forward_speed) * airplane.max_force;

        let yaw_error = controls.steering * MAX_YAW_RATE - ang_vel.y;
        let pitch_error = controls.lift * MAX_PITCH_RATE - ang_vel.x;
        let torque_vector =
            (Vec3::Y * yaw_error + Vec3::X * pitch_error) * airplane.max_torque;

        commands.entity(entity).insert((
            ExternalForce::new(thrust),
            ExternalTorque::new(torque_vector),
        ));
    }
}
