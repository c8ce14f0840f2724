//! The solver arena and object registry
//!
//! One aggregate owns every solver resource, constructed with the world and
//! destroyed with it. All methods here run on whichever thread currently
//! holds the simulation lock - the tick thread while the world is running,
//! the caller's thread inside `single_step`.

use std::collections::HashMap;
use std::fmt::Write;

use rapier3d::control::DynamicRayCastVehicleController;
use rapier3d::prelude::*;

use crate::changes::ChangeBuffer;
use crate::object::{self, PhysicsObject};
use crate::transform::{matrix_from_pose, pose_from_matrix, Transform};
use crate::world::{WorldConfig, TICK_SECONDS};
use crate::ObjectId;

pub(crate) struct Simulation {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Live objects keyed by the game layer's id
    objects: HashMap<ObjectId, PhysicsObject>,
    /// Reverse index from pose-reporting body to object id
    ids_by_body: HashMap<RigidBodyHandle, ObjectId>,
}

impl Simulation {
    pub fn new(config: &WorldConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = TICK_SECONDS;

        Self {
            gravity: vector![0.0, config.gravity, 0.0],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            objects: HashMap::new(),
            ids_by_body: HashMap::new(),
        }
    }

    /// Insert a box under `id`; mass 0 builds an immovable static body
    pub fn add_box(&mut self, id: ObjectId, transform: &Transform, mass: Real, half_extents: [Real; 3]) {
        self.detach_existing(id);

        let pose = pose_from_matrix(transform);
        let builder = if mass == 0.0 {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        };
        let body = self.bodies.insert(builder.position(pose).build());
        let [hx, hy, hz] = half_extents;
        let collider = ColliderBuilder::cuboid(hx, hy, hz).mass(mass).build();
        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        self.objects.insert(id, PhysicsObject::Box { body });
        self.ids_by_body.insert(body, id);
    }

    /// Insert a vehicle under `id`: chassis box plus four raycast wheels
    pub fn add_vehicle(&mut self, id: ObjectId, transform: &Transform) {
        self.detach_existing(id);

        let pose = pose_from_matrix(transform);
        let chassis = self
            .bodies
            .insert(RigidBodyBuilder::dynamic().position(pose).build());
        let [hx, hy, hz] = object::CHASSIS_HALF_EXTENTS;
        let collider = ColliderBuilder::cuboid(hx, hy, hz)
            .mass(object::CHASSIS_MASS)
            .build();
        self.colliders
            .insert_with_parent(collider, chassis, &mut self.bodies);

        let mut controller = DynamicRayCastVehicleController::new(chassis);
        let tuning = object::wheel_tuning();
        for anchor in object::wheel_anchors() {
            controller.add_wheel(
                anchor,
                -Vector::y(),
                Vector::x(),
                object::SUSPENSION_REST,
                object::WHEEL_RADIUS,
                &tuning,
            );
        }

        self.objects
            .insert(id, PhysicsObject::Vehicle { chassis, controller });
        self.ids_by_body.insert(chassis, id);
    }

    /// Detach and drop the object under `id`; unknown ids are ignored
    pub fn remove(&mut self, id: ObjectId) {
        let Some(object) = self.objects.remove(&id) else {
            log::debug!("remove: no object {id}");
            return;
        };
        self.ids_by_body.remove(&object.body());
        object.detach(
            &mut self.bodies,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
        );
    }

    /// Switch the rear-wheel engine force on or off; ignored unless `id` is
    /// a vehicle
    pub fn set_engine_force(&mut self, id: ObjectId, active: bool) {
        let Some(PhysicsObject::Vehicle { controller, .. }) = self.objects.get_mut(&id) else {
            log::debug!("set_engine_force: no vehicle {id}");
            return;
        };
        let force = if active { object::ENGINE_FORCE } else { 0.0 };
        for wheel in controller.wheels_mut().iter_mut().skip(object::STEERED_WHEELS) {
            wheel.engine_force = force;
        }
    }

    /// Set the front-wheel steering angle; ignored unless `id` is a vehicle
    pub fn set_steering(&mut self, id: ObjectId, value: Real) {
        let Some(PhysicsObject::Vehicle { controller, .. }) = self.objects.get_mut(&id) else {
            log::debug!("set_steering: no vehicle {id}");
            return;
        };
        for wheel in controller.wheels_mut().iter_mut().take(object::STEERED_WHEELS) {
            wheel.steering = value;
        }
    }

    /// Advance the solver by exactly one fixed step and record the pose of
    /// every active dynamic body
    pub fn step(&mut self, changes: &ChangeBuffer) {
        let dt = self.integration_parameters.dt;
        for object in self.objects.values_mut() {
            if let PhysicsObject::Vehicle { chassis, controller } = object {
                controller.update_vehicle(
                    dt,
                    &mut self.bodies,
                    &self.colliders,
                    &self.query_pipeline,
                    QueryFilter::exclude_dynamic().exclude_rigid_body(*chassis),
                );
            }
        }

        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        // Statics never show up here; sleeping bodies stop reporting. No
        // delta thresholding - a barely-moving active body records too.
        for &body in self.islands.active_dynamic_bodies() {
            if let Some(&id) = self.ids_by_body.get(&body) {
                changes.record(id, matrix_from_pose(self.bodies[body].position()));
            }
        }
    }

    /// Human-readable listing of every live object, for manual inspection
    pub fn debug_dump(&self) -> String {
        let mut ids: Vec<ObjectId> = self.objects.keys().copied().collect();
        ids.sort_unstable();

        let mut out = format!("world: {} objects\n", ids.len());
        for id in ids {
            let object = &self.objects[&id];
            let body = &self.bodies[object.body()];
            let position = body.translation();
            let _ = write!(
                out,
                " #{id} {}{} loc: {:.3} {:.3} {:.3} mass: {:.3}",
                if body.is_fixed() { "static " } else { "" },
                object.kind(),
                position.x,
                position.y,
                position.z,
                body.mass(),
            );
            if !body.is_sleeping() {
                let _ = write!(out, " ACTIVE");
            }
            out.push('\n');
        }
        out
    }

    #[cfg(test)]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    #[cfg(test)]
    pub fn rear_engine_force(&self, id: ObjectId) -> Option<Real> {
        match self.objects.get(&id)? {
            PhysicsObject::Vehicle { controller, .. } => {
                controller.wheels().last().map(|wheel| wheel.engine_force)
            }
            PhysicsObject::Box { .. } => None,
        }
    }

    #[cfg(test)]
    pub fn front_steering(&self, id: ObjectId) -> Option<Real> {
        match self.objects.get(&id)? {
            PhysicsObject::Vehicle { controller, .. } => {
                controller.wheels().first().map(|wheel| wheel.steering)
            }
            PhysicsObject::Box { .. } => None,
        }
    }

    /// Replace-while-live is a documented caller error; keep the solver
    /// consistent anyway by detaching the previous bodies.
    fn detach_existing(&mut self, id: ObjectId) {
        if let Some(previous) = self.objects.remove(&id) {
            log::debug!("object {id} replaced while live; detaching previous bodies");
            self.ids_by_body.remove(&previous.body());
            previous.detach(
                &mut self.bodies,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
            );
        }
    }
}
