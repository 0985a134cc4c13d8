//! Simulation world container.
//!
//! The [`World`] owns bodies, joints and the candidate contact pairs handed
//! to the narrow phase. Broad-phase pruning is the caller's job: only the
//! registered pairs are ever tested.

use tracing::debug;
use xpbd_collision::{has_collider, CollisionError};
use xpbd_constraint::{Body, BodyId, Joint};
use xpbd_types::{SimError, SimulationConfig};

use crate::error::{PhysicsError, Result};
use crate::simulate::{validate_body_id, validate_joints, StepStats};
use crate::stepper::Stepper;

/// Bodies, joints and contact pairs advanced together.
#[derive(Debug, Clone, Default)]
pub struct World {
    stepper: Stepper,
    bodies: Vec<Body>,
    joints: Vec<Joint>,
    pairs: Vec<(BodyId, BodyId)>,
}

impl World {
    /// Create an empty world.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            stepper: Stepper::new(config),
            bodies: Vec::new(),
            joints: Vec::new(),
            pairs: Vec::new(),
        }
    }

    /// Simulation configuration.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        self.stepper.config()
    }

    /// Current simulation time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.stepper.time()
    }

    /// Number of steps taken.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.stepper.step_count()
    }

    /// Add a body and return its ID.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = BodyId::new(self.bodies.len());
        self.bodies.push(body);
        id
    }

    /// Add a joint. Returns its index in [`joints`](Self::joints).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidBodyId`] if the joint references a body
    /// that has not been added.
    pub fn add_joint(&mut self, joint: Joint) -> Result<usize> {
        validate_joints(self.bodies.len(), std::slice::from_ref(&joint))?;
        self.joints.push(joint);
        Ok(self.joints.len() - 1)
    }

    /// Register a pair of bodies whose shapes are tested every substep.
    ///
    /// # Errors
    ///
    /// Returns an error if either body does not exist, both IDs are the
    /// same, or both bodies carry shapes that no collider handles.
    pub fn add_contact_pair(&mut self, a: BodyId, b: BodyId) -> Result<()> {
        validate_body_id(self.bodies.len(), a)?;
        validate_body_id(self.bodies.len(), b)?;
        if a == b {
            return Err(PhysicsError::SelfContact(a.index()));
        }
        let shapes = (
            self.bodies[a.index()].shape(),
            self.bodies[b.index()].shape(),
        );
        if let (Some(shape_a), Some(shape_b)) = shapes {
            if !has_collider(shape_a, shape_b) {
                return Err(CollisionError::UnsupportedPair {
                    first: shape_a.kind(),
                    second: shape_b.kind(),
                }
                .into());
            }
        }
        self.pairs.push((a, b));
        Ok(())
    }

    /// Register every pair of bodies that both carry a shape, are not both
    /// static, and have a collider for their shapes. Returns the number of
    /// pairs added.
    pub fn add_all_contact_pairs(&mut self) -> usize {
        let before = self.pairs.len();
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                if a.is_static() && b.is_static() {
                    continue;
                }
                let (Some(shape_a), Some(shape_b)) = (a.shape(), b.shape()) else {
                    continue;
                };
                if has_collider(shape_a, shape_b) {
                    self.pairs.push((BodyId::new(i), BodyId::new(j)));
                } else {
                    debug!(first = i, second = j, "no collider for pair, not registered");
                }
            }
        }
        self.pairs.len() - before
    }

    /// Body by ID.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    /// Mutable body by ID.
    #[must_use]
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.index())
    }

    /// All bodies in ID order.
    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// All joints in solve order.
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Registered contact pairs.
    #[must_use]
    pub fn contact_pairs(&self) -> &[(BodyId, BodyId)] {
        &self.pairs
    }

    /// Check that every body still has a finite state.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Diverged`] naming the first non-finite body.
    pub fn validate(&self) -> Result<()> {
        self.config().validate()?;
        for (i, body) in self.bodies.iter().enumerate() {
            let finite = body.pose().is_finite()
                && body
                    .velocity()
                    .iter()
                    .chain(body.angular_velocity().iter())
                    .all(|v| v.is_finite());
            if !finite {
                return Err(SimError::diverged(format!(
                    "{} has non-finite state",
                    BodyId::new(i)
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Advance one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the world has diverged or the configuration is
    /// invalid. Nothing is stepped in that case.
    pub fn step(&mut self) -> Result<StepStats> {
        self.validate()?;
        let stats = self
            .stepper
            .step(&mut self.bodies, &mut self.joints, &self.pairs)?;
        debug!(
            time = self.time(),
            contacts = stats.contacts_solved,
            "world step"
        );
        Ok(stats)
    }
}
