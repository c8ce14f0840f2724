//! Object variants owned by the registry
//!
//! Every live object is either a plain box or a wheeled vehicle. The
//! variants differ in what they attach to the solver, so removal dispatches
//! over the closed enum: a box detaches one rigid body, a vehicle detaches
//! its raycast controller and its chassis body.

use rapier3d::control::{DynamicRayCastVehicleController, WheelTuning};
use rapier3d::prelude::*;

/// Chassis collision half-extents (x, y, z)
pub(crate) const CHASSIS_HALF_EXTENTS: [Real; 3] = [0.9, 0.4, 1.8];
/// Chassis mass in kilograms
pub(crate) const CHASSIS_MASS: Real = 400.0;
/// Wheel radius
pub(crate) const WHEEL_RADIUS: Real = 0.4;
/// Suspension rest length below each wheel anchor
pub(crate) const SUSPENSION_REST: Real = 0.6;
/// Force applied to the rear wheels while the engine is on
pub(crate) const ENGINE_FORCE: Real = 2500.0;

/// Number of wheels that steer (the front pair, anchors 0 and 1)
pub(crate) const STEERED_WHEELS: usize = 2;

/// Wheel anchor points in chassis space: front-left, front-right,
/// rear-left, rear-right. Front is +Z, the controller's forward axis.
pub(crate) fn wheel_anchors() -> [Point<Real>; 4] {
    let [hx, hy, hz] = CHASSIS_HALF_EXTENTS;
    [
        point![-hx, -hy, hz * 0.8],
        point![hx, -hy, hz * 0.8],
        point![-hx, -hy, -hz * 0.8],
        point![hx, -hy, -hz * 0.8],
    ]
}

/// Fixed suspension and friction tuning shared by all four wheels
pub(crate) fn wheel_tuning() -> WheelTuning {
    WheelTuning {
        suspension_stiffness: 30.0,
        suspension_damping: 4.0,
        ..WheelTuning::default()
    }
}

/// A live object's simulation state
pub(crate) enum PhysicsObject {
    /// A plain box; mass 0 makes it an immovable static
    Box { body: RigidBodyHandle },
    /// Chassis body plus a four-wheel raycast suspension controller
    Vehicle {
        chassis: RigidBodyHandle,
        controller: DynamicRayCastVehicleController,
    },
}

impl PhysicsObject {
    /// The rigid body reporting this object's pose
    pub fn body(&self) -> RigidBodyHandle {
        match self {
            PhysicsObject::Box { body } => *body,
            PhysicsObject::Vehicle { chassis, .. } => *chassis,
        }
    }

    /// Short label for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            PhysicsObject::Box { .. } => "box",
            PhysicsObject::Vehicle { .. } => "vehicle",
        }
    }

    /// Detach everything this object put into the solver
    pub fn detach(
        self,
        bodies: &mut RigidBodySet,
        islands: &mut IslandManager,
        colliders: &mut ColliderSet,
        impulse_joints: &mut ImpulseJointSet,
        multibody_joints: &mut MultibodyJointSet,
    ) {
        match self {
            PhysicsObject::Box { body } => {
                bodies.remove(body, islands, colliders, impulse_joints, multibody_joints, true);
            }
            PhysicsObject::Vehicle {
                chassis,
                controller,
            } => {
                // The controller holds no solver resources of its own;
                // dropping it detaches the wheels.
                drop(controller);
                bodies.remove(
                    chassis,
                    islands,
                    colliders,
                    impulse_joints,
                    multibody_joints,
                    true,
                );
            }
        }
    }
}
