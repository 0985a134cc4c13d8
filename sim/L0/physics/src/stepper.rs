//! Frame stepping over caller-owned bodies and joints.
//!
//! # Example
//!
//! ```
//! use xpbd_physics::{Body, Pose, SimulationConfig, Stepper};
//! use nalgebra::Point3;
//!
//! let mut bodies = vec![Body::new(Pose::from_position(Point3::new(0.0, 10.0, 0.0)))];
//! let mut stepper = Stepper::new(SimulationConfig::default());
//!
//! for _ in 0..60 {
//!     stepper.step(&mut bodies, &mut [], &[]).unwrap();
//! }
//!
//! assert!(bodies[0].position().y < 6.0);
//! assert_eq!(stepper.step_count(), 60);
//! ```

use xpbd_constraint::{Body, BodyId, Joint};
use xpbd_types::SimulationConfig;

use crate::error::Result;
use crate::simulate::{simulate_with_contacts, StepStats};

/// Runs one frame at a time with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Stepper {
    config: SimulationConfig,
    time: f64,
    step_count: u64,
}

impl Stepper {
    /// Create a stepper.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            time: 0.0,
            step_count: 0,
        }
    }

    /// The configuration used for every step.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulated time (seconds) over all successful steps.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of successful steps.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Advance one frame of `config.timestep`, resolving contacts between
    /// `pairs` when contacts are enabled.
    ///
    /// # Errors
    ///
    /// Same as [`simulate_with_contacts`]. Time and step count only advance
    /// on success.
    pub fn step(
        &mut self,
        bodies: &mut [Body],
        joints: &mut [Joint],
        pairs: &[(BodyId, BodyId)],
    ) -> Result<StepStats> {
        let stats = simulate_with_contacts(bodies, joints, pairs, &self.config)?;
        self.time += self.config.timestep;
        self.step_count += 1;
        Ok(stats)
    }

    /// Step until at least `duration` seconds have been simulated by this
    /// call. Returns the number of steps taken.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step.
    pub fn run_for(
        &mut self,
        bodies: &mut [Body],
        joints: &mut [Joint],
        pairs: &[(BodyId, BodyId)],
        duration: f64,
    ) -> Result<u64> {
        let mut steps = 0;
        let mut elapsed = 0.0;
        while elapsed < duration {
            self.step(bodies, joints, pairs)?;
            elapsed += self.config.timestep;
            steps += 1;
        }
        Ok(steps)
    }
}
