// skylark_sim/src/simulation/plugins/vehicles/helicopter.rs

use avian3d::prelude::*;
use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;

use super::VehicleControls;
use crate::simulation::config::catalog::VehiclePrefab;

const MAX_YAW_RATE: f32 = 1.0;

/// Drive parameters for a helicopter. Attached by the factory.
#[derive(Component, Clone, Debug)]
pub struct Helicopter {
    pub max_force: f32,
    pub max_torque: f32,
    pub top_speed: f32,
    /// Rotor force available above hover, as a fraction of weight.
    pub lift_margin: f32,
}

/// Factory constructor for the `heli` type tag.
pub fn attach_helicopter(entity: &mut EntityCommands, prefab: &VehiclePrefab) {
    entity.insert(Helicopter {
        max_force: prefab.max_force,
        max_torque: prefab.max_torque,
        top_speed: prefab.top_speed,
        lift_margin: 0.5,
    });
}

/// RUNTIME: collective lift, forward cyclic and yaw torque from the
/// control mailbox.
pub fn drive_helicopters(
    mut commands: Commands,
    gravity: Res<Gravity>,
    query: Query<(
        Entity,
        &Transform,
        &LinearVelocity,
        &AngularVelocity,
        &Mass,
        &Helicopter,
        &VehicleControls,
    )>,
) {
    for (entity, transform, lin_vel, ang_vel, mass, heli, controls) in &query {
        // --- Collective ---
        // At zero lift input the rotor exactly cancels gravity (hover);
        // the lift axis then scales the margin up or down.
        let weight = mass.0 * gravity.0.length();
        let rotor = weight * (1.0 + controls.lift * heli.lift_margin);
        let lift_vector = Vec3::Y * rotor;

        // --- Cyclic (forward drive) ---
        let world_forward = transform.forward();
        let current_forward_speed = lin_vel.dot(*world_forward);
        let target_speed = controls.throttle * heli.top_speed;
        let force_vector = world_forward * (target_speed - current_forward_speed) * heli.max_force;

        // --- Yaw ---
        let yaw_error = controls.steering * MAX_YAW_RATE - ang_vel.y;
        let torque_vector = Vec3::Y * yaw_error * heli.max_torque;

        commands.entity(entity).insert((
            ExternalForce::new(lift_vector + force_vector),
            ExternalTorque::new(torque_vector),
        ));
    }
}
