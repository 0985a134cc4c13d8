//! Configuration types for simulation.
//!
//! This module provides the knobs that control how a frame is stepped:
//! timestep, substep count, gravity, and contact handling.

use nalgebra::Vector3;

use crate::error::SimError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gravity configuration.
///
/// The world is Y-up.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gravity {
    /// Acceleration due to gravity (m/s²).
    pub acceleration: Vector3<f64>,
}

impl Default for Gravity {
    fn default() -> Self {
        Self::standard()
    }
}

impl Gravity {
    /// Rounded gravity of 10 m/s² in -Y, used by the default configuration.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            acceleration: Vector3::new(0.0, -10.0, 0.0),
        }
    }

    /// Standard Earth gravity (9.81 m/s² in -Y direction).
    #[must_use]
    pub fn earth() -> Self {
        Self {
            acceleration: Vector3::new(0.0, -9.81, 0.0),
        }
    }

    /// Zero gravity.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            acceleration: Vector3::zeros(),
        }
    }

    /// Custom gravity vector.
    #[must_use]
    pub fn custom(acceleration: Vector3<f64>) -> Self {
        Self { acceleration }
    }
}

/// Main configuration for a simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Length of one frame (seconds). Split evenly across substeps.
    pub timestep: f64,
    /// Number of substeps per frame.
    pub substeps: usize,
    /// Gravity configuration.
    pub gravity: Gravity,
    /// Compliance used for contact corrections (0 = rigid).
    pub contact_compliance: f64,
    /// Whether colliders run during stepping.
    pub enable_contacts: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            substeps: 40,
            gravity: Gravity::standard(),
            contact_compliance: 0.0,
            enable_contacts: true,
        }
    }
}

impl SimulationConfig {
    /// Create a new simulation config with the given timestep.
    #[must_use]
    pub fn with_timestep(timestep: f64) -> Self {
        Self {
            timestep,
            ..Default::default()
        }
    }

    /// Set the number of substeps per frame.
    #[must_use]
    pub fn substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps;
        self
    }

    /// Set the gravity.
    #[must_use]
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Disable gravity.
    #[must_use]
    pub fn zero_gravity(mut self) -> Self {
        self.gravity = Gravity::zero();
        self
    }

    /// Set the contact compliance.
    #[must_use]
    pub fn contact_compliance(mut self, compliance: f64) -> Self {
        self.contact_compliance = compliance;
        self
    }

    /// Disable contact handling.
    #[must_use]
    pub fn without_contacts(mut self) -> Self {
        self.enable_contacts = false;
        self
    }

    /// Substep length `timestep / substeps`.
    #[must_use]
    pub fn substep_dt(&self) -> f64 {
        self.timestep / self.substeps as f64
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(SimError::InvalidTimestep(self.timestep));
        }
        if self.substeps == 0 {
            return Err(SimError::InvalidSubsteps(self.substeps));
        }
        if !self.contact_compliance.is_finite() || self.contact_compliance < 0.0 {
            return Err(SimError::invalid_config(format!(
                "contact compliance must be non-negative and finite, got {}",
                self.contact_compliance
            )));
        }
        if self.gravity.acceleration.iter().any(|g| !g.is_finite()) {
            return Err(SimError::invalid_config("gravity must be finite"));
        }
        Ok(())
    }
}
