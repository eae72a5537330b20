// skylark_sim/src/simulation/plugins/vehicles/car.rs

use avian3d::prelude::*;
use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;

use super::VehicleControls;
use crate::simulation::config::catalog::VehiclePrefab;

/// How aggressively a car converts steering input into a desired yaw rate,
/// in rad/s at full lock.
const MAX_YAW_RATE: f32 = 1.5;

/// Drive parameters for a ground car. Attached by the factory.
#[derive(Component, Clone, Debug)]
pub struct Car {
    pub max_force: f32,
    pub max_torque: f32,
    pub top_speed: f32,
}

/// Factory constructor for the `car` type tag.
pub fn attach_car(entity: &mut EntityCommands, prefab: &VehiclePrefab) {
    entity.insert(Car {
        max_force: prefab.max_force,
        max_torque: prefab.max_torque,
        top_speed: prefab.top_speed,
    });
}

/// RUNTIME: reads the control mailbox and applies forces/torques to the
/// chassis.
pub fn drive_cars(
    mut commands: Commands,
    query: Query<(
        Entity,
        &Transform,
        &LinearVelocity,
        &AngularVelocity,
        &Car,
        &VehicleControls,
    )>,
) {
    for (entity, transform, lin_vel, ang_vel, car, controls) in &query {
        // --- Steering Torque ---
        let desired_yaw_rate = controls.steering * MAX_YAW_RATE;
        let yaw_error = desired_yaw_rate - ang_vel.y;
        let torque_vector = Vec3::Y * yaw_error * car.max_torque;

        // --- Driving Force ---
        let world_forward = transform.forward();
        let current_forward_speed = lin_vel.dot(*world_forward);
        let target_speed = controls.throttle * car.top_speed;
        let speed_error = target_speed - current_forward_speed;
        let force_vector = world_forward * speed_error * car.max_force;

        // Apply forces and torques via commands; this is how Avian wants
        // external actuation expressed.
        commands.entity(entity).insert((
            ExternalForce::new(force_vector),
            ExternalTorque::new(torque_vector),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn throttle_produces_forward_force() {
        let mut world = World::new();
        let vehicle = world
            .spawn((
                Transform::default(),
                LinearVelocity::default(),
                AngularVelocity::default(),
                Car {
                    max_force: 5000.0,
                    max_torque: 2500.0,
                    top_speed: 20.0,
                },
                VehicleControls {
                    throttle: 1.0,
                    ..Default::default()
                },
            ))
            .id();

        world.run_system_once(drive_cars).unwrap();

        let force = world.get::<ExternalForce>(vehicle).expect("force applied");
        // Default forward is -Z; full throttle from standstill pushes that way.
        assert!(force.force().z < 0.0);
        assert!(force.force().z.abs() > 1000.0);
    }
}
