//! The substep loop.
//!
//! One call advances the bodies by `config.timestep`, split into
//! `config.substeps` substeps of length `dt`. Each substep:
//!
//! 1. integrates every body under gravity
//! 2. solves every joint's position constraints once, in slice order
//! 3. (contacts only) runs the colliders on the current poses and corrects
//!    every penetrating contact once
//! 4. re-derives every body's velocity from its pose change
//! 5. applies every joint's velocity damping once, in slice order
//!
//! All inputs are validated before any state is touched, so a failed call
//! leaves bodies and joints as they were.

use nalgebra::Vector3;
use tracing::{debug, warn};
use xpbd_collision::collide;
use xpbd_constraint::{body_pair_mut, solve_contacts, Body, BodyId, Joint};
use xpbd_types::{SimError, SimulationConfig};

use crate::error::{PhysicsError, Result};

/// Summary of one simulated frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepStats {
    /// Substeps run.
    pub substeps: usize,
    /// Substep length (seconds).
    pub dt: f64,
    /// Contact corrections applied over all substeps.
    pub contacts_solved: usize,
}

/// Advance bodies and joints by one frame, without contacts.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a joint references
/// a body outside `bodies`.
pub fn simulate(
    bodies: &mut [Body],
    joints: &mut [Joint],
    config: &SimulationConfig,
) -> Result<StepStats> {
    config.validate()?;
    validate_joints(bodies.len(), joints)?;

    let dt = config.substep_dt();
    let gravity = config.gravity.acceleration;
    debug!(
        substeps = config.substeps,
        dt,
        bodies = bodies.len(),
        joints = joints.len(),
        "simulate"
    );

    for _ in 0..config.substeps {
        integrate_all(bodies, dt, &gravity);
        solve_joint_positions(bodies, joints, dt);
        update_all(bodies, dt);
        solve_joint_velocities(bodies, joints, dt);
    }

    Ok(StepStats {
        substeps: config.substeps,
        dt,
        contacts_solved: 0,
    })
}

/// Advance bodies and joints by one frame, resolving contacts between the
/// candidate `pairs`.
///
/// Pairs where either body has no shape, or both are static, are ignored.
/// A pair with no collider for its shapes is logged once and skipped for
/// the rest of the call; [`World`](crate::World) refuses such pairs when
/// they are registered, so it never reaches this path. With `config.enable_contacts` off this behaves
/// like [`simulate`].
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a joint or pair
/// references a body outside `bodies`, or a pair names one body twice.
pub fn simulate_with_contacts(
    bodies: &mut [Body],
    joints: &mut [Joint],
    pairs: &[(BodyId, BodyId)],
    config: &SimulationConfig,
) -> Result<StepStats> {
    config.validate()?;
    validate_joints(bodies.len(), joints)?;
    validate_pairs(bodies.len(), pairs)?;

    let dt = config.substep_dt();
    let gravity = config.gravity.acceleration;
    debug!(
        substeps = config.substeps,
        dt,
        bodies = bodies.len(),
        joints = joints.len(),
        pairs = pairs.len(),
        contacts = config.enable_contacts,
        "simulate with contacts"
    );

    let mut active = vec![config.enable_contacts; pairs.len()];
    let mut contacts_solved = 0;

    for _ in 0..config.substeps {
        integrate_all(bodies, dt, &gravity);
        solve_joint_positions(bodies, joints, dt);
        contacts_solved +=
            solve_pair_contacts(bodies, pairs, &mut active, config.contact_compliance, dt);
        update_all(bodies, dt);
        solve_joint_velocities(bodies, joints, dt);
    }

    Ok(StepStats {
        substeps: config.substeps,
        dt,
        contacts_solved,
    })
}

fn integrate_all(bodies: &mut [Body], dt: f64, gravity: &Vector3<f64>) {
    for body in bodies.iter_mut() {
        body.integrate(dt, gravity);
    }
}

fn update_all(bodies: &mut [Body], dt: f64) {
    for body in bodies.iter_mut() {
        body.update(dt);
    }
}

fn solve_joint_positions(bodies: &mut [Body], joints: &mut [Joint], dt: f64) {
    for joint in joints.iter_mut() {
        joint.solve_pos(bodies, dt);
    }
}

fn solve_joint_velocities(bodies: &mut [Body], joints: &mut [Joint], dt: f64) {
    for joint in joints.iter_mut() {
        joint.solve_vel(bodies, dt);
    }
}

fn solve_pair_contacts(
    bodies: &mut [Body],
    pairs: &[(BodyId, BodyId)],
    active: &mut [bool],
    compliance: f64,
    dt: f64,
) -> usize {
    let mut solved = 0;

    for (&(a, b), active) in pairs.iter().zip(active.iter_mut()) {
        if !*active {
            continue;
        }
        let (Some(body_a), Some(body_b)) = body_pair_mut(bodies, Some(a), Some(b)) else {
            continue;
        };
        if body_a.is_static() && body_b.is_static() {
            continue;
        }
        let (Some(shape_a), Some(shape_b)) = (body_a.shape(), body_b.shape()) else {
            continue;
        };

        match collide(shape_a, body_a.pose(), shape_b, body_b.pose()) {
            Ok(manifold) => {
                solved += solve_contacts(body_a, body_b, &manifold, compliance, dt);
            }
            Err(err) => {
                warn!(first = %a, second = %b, error = %err, "skipping contact pair");
                *active = false;
            }
        }
    }

    solved
}

pub(crate) fn validate_joints(body_count: usize, joints: &[Joint]) -> Result<()> {
    for joint in joints {
        let (b0, b1) = joint.bodies();
        for id in [b0, b1].into_iter().flatten() {
            validate_body_id(body_count, id)?;
        }
    }
    Ok(())
}

pub(crate) fn validate_pairs(body_count: usize, pairs: &[(BodyId, BodyId)]) -> Result<()> {
    for &(a, b) in pairs {
        validate_body_id(body_count, a)?;
        validate_body_id(body_count, b)?;
        if a == b {
            return Err(PhysicsError::SelfContact(a.index()));
        }
    }
    Ok(())
}

pub(crate) fn validate_body_id(body_count: usize, id: BodyId) -> Result<()> {
    if id.index() >= body_count {
        return Err(SimError::InvalidBodyId(id.index()).into());
    }
    Ok(())
}
