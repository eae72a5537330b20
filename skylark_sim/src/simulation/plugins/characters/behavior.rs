// skylark_sim/src/simulation/plugins/characters/behavior.rs

//! The path-follow behavior handed to AI occupants at bind time, and the
//! steering system that turns it into vehicle control input.

use avian3d::prelude::LinearVelocity;
use bevy::prelude::*;
use skylark_core::prelude::PathNode;

use super::SeatedIn;
use crate::simulation::plugins::vehicles::VehicleControls;

/// Distance at which the target node counts as reached, in meters.
const ARRIVAL_RADIUS: f32 = 2.0;

/// An active path-following assignment on a character. Constructed from
/// the resolved path node and the fixed follow speed; this core hands the
/// assignment off and the steering below is deliberately simple.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct FollowPath {
    /// Display name of the node being followed.
    pub node_name: String,
    /// World-space target position of the node.
    pub target: Vec3,
    /// Commanded speed in m/s.
    pub speed: f32,
}

impl FollowPath {
    pub fn new(node: &PathNode, speed: f64) -> Self {
        Self {
            node_name: node.display_name.clone(),
            target: Vec3::new(
                node.position.x as f32,
                node.position.y as f32,
                node.position.z as f32,
            ),
            speed: speed as f32,
        }
    }
}

/// BEHAVIOR: steers the occupied vehicle toward the assigned node.
/// Pure-pursuit flavored: throttle from the speed error, steering from the
/// signed bearing to the target.
pub fn follow_path_steering(
    followers: Query<(&FollowPath, &SeatedIn)>,
    mut vehicles: Query<(&Transform, &LinearVelocity, &mut VehicleControls)>,
) {
    for (follow, seated) in &followers {
        let Ok((transform, lin_vel, mut controls)) = vehicles.get_mut(seated.vehicle) else {
            continue;
        };

        let to_target = follow.target - transform.translation;
        let planar = Vec3::new(to_target.x, 0.0, to_target.z);
        if planar.length_squared() < ARRIVAL_RADIUS * ARRIVAL_RADIUS {
            controls.throttle = 0.0;
            controls.steering = 0.0;
            continue;
        }

        let direction = planar.normalize();
        let forward = transform.forward();

        // Signed bearing around the vertical axis, positive to the left.
        let alpha = forward.cross(direction).y.atan2(forward.dot(direction));
        controls.steering = (alpha / std::f32::consts::FRAC_PI_2).clamp(-1.0, 1.0);

        let current_speed = lin_vel.dot(*forward);
        controls.throttle = ((follow.speed - current_speed) / follow.speed).clamp(-1.0, 1.0);

        // Flying kinds climb or descend toward the node's altitude.
        controls.lift = (to_target.y / 10.0).clamp(-1.0, 1.0);
    }
}
