// skylark_sim/src/simulation/core/transforms.rs

use bevy::prelude::{GlobalTransform, Quat as BevyQuat, Transform as BevyTransform};
use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion};

/// Vertical clearance added to every vehicle spawn so the chassis never
/// starts embedded in the ground mesh.
pub const SPAWN_LIFT: f32 = 1.0;

/// Converts a Bevy `Transform` into a `nalgebra::Isometry3<f64>`.
pub fn bevy_transform_to_nalgebra_isometry(transform: &BevyTransform) -> Isometry3<f64> {
    let t = transform.translation;
    let r = transform.rotation;
    Isometry3::from_parts(
        Translation3::new(t.x as f64, t.y as f64, t.z as f64),
        UnitQuaternion::from_quaternion(Quaternion::new(
            r.w as f64, r.x as f64, r.y as f64, r.z as f64,
        )),
    )
}

/// Converts a Bevy `GlobalTransform` into a `nalgebra::Isometry3<f64>`.
pub fn bevy_global_transform_to_nalgebra_isometry(transform: &GlobalTransform) -> Isometry3<f64> {
    bevy_transform_to_nalgebra_isometry(&transform.compute_transform())
}

/// Converts a `nalgebra::Isometry3<f64>` back into a Bevy `Transform`.
pub fn nalgebra_isometry_to_bevy_transform(iso: &Isometry3<f64>) -> BevyTransform {
    let t = iso.translation.vector;
    let r = iso.rotation.coords;
    BevyTransform::from_xyz(t.x as f32, t.y as f32, t.z as f32).with_rotation(
        BevyQuat::from_xyzw(r.x as f32, r.y as f32, r.z as f32, r.w as f32),
    )
}

/// Computes the physical starting transform for a vehicle from its anchor's
/// world pose: the anchor position lifted by `SPAWN_LIFT` on the vertical
/// axis, the anchor orientation copied unchanged.
pub fn vehicle_spawn_transform(anchor: &Isometry3<f64>) -> BevyTransform {
    let mut transform = nalgebra_isometry_to_bevy_transform(anchor);
    transform.translation.y += SPAWN_LIFT;
    transform
}

/// World transform of a seat given its vehicle's world transform and the
/// seat's local offset.
pub fn seat_world_transform(vehicle: &BevyTransform, seat_local: &BevyTransform) -> BevyTransform {
    vehicle.mul_transform(*seat_local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bevy::prelude::Vec3 as BevyVec3;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn assert_vec3_approx_eq(a: BevyVec3, b: BevyVec3) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = EPSILON);
        assert_abs_diff_eq!(a.y, b.y, epsilon = EPSILON);
        assert_abs_diff_eq!(a.z, b.z, epsilon = EPSILON);
    }

    fn assert_quat_approx_eq(a: BevyQuat, b: BevyQuat) {
        // q and -q are the same rotation, so compare via the dot product.
        assert!(
            a.dot(b).abs() > 1.0 - EPSILON,
            "quaternions not approx equal: {a:?} vs {b:?}"
        );
    }

    #[test]
    fn isometry_round_trip_preserves_pose() {
        let original = BevyTransform::from_xyz(3.0, -2.0, 7.5)
            .with_rotation(BevyQuat::from_rotation_y(FRAC_PI_2));
        let iso = bevy_transform_to_nalgebra_isometry(&original);
        let back = nalgebra_isometry_to_bevy_transform(&iso);
        assert_vec3_approx_eq(back.translation, original.translation);
        assert_quat_approx_eq(back.rotation, original.rotation);
    }

    #[test]
    fn spawn_transform_lifts_anchor_by_one_unit() {
        let anchor = bevy_transform_to_nalgebra_isometry(&BevyTransform::from_xyz(4.0, 0.5, -6.0));
        let spawn = vehicle_spawn_transform(&anchor);
        assert_vec3_approx_eq(spawn.translation, BevyVec3::new(4.0, 1.5, -6.0));
    }

    #[test]
    fn spawn_transform_copies_anchor_orientation() {
        let rotation = BevyQuat::from_rotation_y(1.25);
        let anchor = bevy_transform_to_nalgebra_isometry(
            &BevyTransform::from_xyz(0.0, 0.0, 0.0).with_rotation(rotation),
        );
        let spawn = vehicle_spawn_transform(&anchor);
        assert_quat_approx_eq(spawn.rotation, rotation);
    }

    #[test]
    fn seat_world_transform_composes_rotation_and_offset() {
        // Vehicle at (10, 1, 0), yawed 90 degrees: a seat offset one unit
        // forward (local -Z) ends up one unit along world -X.
        let vehicle = BevyTransform::from_xyz(10.0, 1.0, 0.0)
            .with_rotation(BevyQuat::from_rotation_y(FRAC_PI_2));
        let seat_local = BevyTransform::from_xyz(0.0, 0.5, -1.0);
        let seat_world = seat_world_transform(&vehicle, &seat_local);
        assert_vec3_approx_eq(seat_world.translation, BevyVec3::new(9.0, 1.5, 0.0));
    }
}
