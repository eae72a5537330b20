// skylark_sim/src/simulation/plugins/vehicles/mod.rs

//! Vehicle entities: the seat/control components every kind shares, plus
//! the per-kind modules the factory dispatches into.

pub mod airplane;
pub mod car;
pub mod helicopter;

use bevy::prelude::*;

use crate::simulation::core::app_state::SimulationSet;

/// Marker for every spawned vehicle, whatever its kind.
#[derive(Component, Debug, Default)]
pub struct VehicleBody;

/// Network/player identity attached at spawn time.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct OwnedBy(pub String);

/// The scene anchor this vehicle was spawned from.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedFrom(pub Entity);

/// One seat slot, spawned as a child of its vehicle.
#[derive(Component, Debug)]
pub struct Seat {
    pub vehicle: Entity,
    pub index: usize,
}

/// Ordered list of a vehicle's seat entities. Seat 0 is the driver's
/// seat.
#[derive(Component, Debug, Default)]
pub struct Seats(pub Vec<Entity>);

/// A "mailbox" component for control commands. The keyboard router or a
/// follow behavior writes to this; the per-kind drive systems read it.
#[derive(Component, Default, Debug)]
pub struct VehicleControls {
    /// Desired throttle, from -1.0 (full reverse) to 1.0 (full forward).
    pub throttle: f32,
    /// Desired steering/yaw input, from -1.0 (right) to 1.0 (left).
    pub steering: f32,
    /// Desired vertical input (collective or pitch), from -1.0 to 1.0.
    pub lift: f32,
}

/// The character currently holding input control of this vehicle. At most
/// one holder at a time; granting control does not revoke a previous
/// holder, that invariant lives in the input subsystem.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlledBy(pub Entity);

/// Wires the per-kind drive systems into the actuation stage.
pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                car::drive_cars,
                helicopter::drive_helicopters,
                airplane::drive_airplanes,
            )
                .in_set(SimulationSet::Actuation),
        );
    }
}
