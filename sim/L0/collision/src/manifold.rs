//! Contact manifolds.
//!
//! Every collider reports contacts with the same convention:
//!
//! - `local_point_a` lies on shape A, expressed in body A's local frame
//! - `local_point_b` lies on shape B, expressed in body B's local frame
//! - `normal` is a world-space unit vector pointing from A toward B
//! - `depth = normal · (world_a - world_b)`, positive while overlapping
//!
//! Separating the bodies means moving A along `-normal` and B along
//! `+normal` until the two points coincide.

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;
use xpbd_types::Pose;

use crate::error::CollisionError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single contact between two shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactPair {
    /// Contact point on A in A's local frame.
    pub local_point_a: Point3<f64>,
    /// Contact point on B in B's local frame.
    pub local_point_b: Point3<f64>,
    /// World-space unit normal from A toward B.
    pub normal: Vector3<f64>,
    /// Penetration depth (positive = overlapping).
    pub depth: f64,
}

impl ContactPair {
    /// Build a contact from world-space points, converting them into each
    /// body's local frame.
    #[must_use]
    pub fn from_world(
        pose_a: &Pose,
        pose_b: &Pose,
        world_a: &Point3<f64>,
        world_b: &Point3<f64>,
        normal: Vector3<f64>,
        depth: f64,
    ) -> Self {
        Self {
            local_point_a: pose_a.inv_transform_point(world_a),
            local_point_b: pose_b.inv_transform_point(world_b),
            normal,
            depth,
        }
    }

    /// Both contact points in world space.
    #[must_use]
    pub fn world_points(&self, pose_a: &Pose, pose_b: &Pose) -> (Point3<f64>, Point3<f64>) {
        (
            pose_a.transform_point(&self.local_point_a),
            pose_b.transform_point(&self.local_point_b),
        )
    }

    /// The same contact with the roles of A and B exchanged.
    #[must_use]
    pub fn flip(self) -> Self {
        Self {
            local_point_a: self.local_point_b,
            local_point_b: self.local_point_a,
            normal: -self.normal,
            depth: self.depth,
        }
    }
}

/// The contacts produced by one shape-pair test.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifold {
    contacts: SmallVec<[ContactPair; 4]>,
}

impl Manifold {
    /// An empty (non-colliding) manifold.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Manifold with a single contact.
    #[must_use]
    pub fn single(contact: ContactPair) -> Self {
        let mut contacts = SmallVec::new();
        contacts.push(contact);
        Self { contacts }
    }

    /// Append a contact.
    pub fn push(&mut self, contact: ContactPair) {
        self.contacts.push(contact);
    }

    /// Whether the shapes touch.
    #[must_use]
    pub fn is_colliding(&self) -> bool {
        !self.contacts.is_empty()
    }

    /// Number of contacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether there are no contacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// The contacts.
    ///
    /// # Errors
    ///
    /// [`CollisionError::NotColliding`] if the manifold is empty.
    pub fn contacts(&self) -> Result<&[ContactPair], CollisionError> {
        if self.contacts.is_empty() {
            return Err(CollisionError::NotColliding);
        }
        Ok(&self.contacts)
    }

    /// Contacts without the emptiness check.
    pub fn iter(&self) -> impl Iterator<Item = &ContactPair> {
        self.contacts.iter()
    }

    /// The contact with the largest depth.
    #[must_use]
    pub fn deepest(&self) -> Option<&ContactPair> {
        self.contacts
            .iter()
            .max_by(|a, b| a.depth.total_cmp(&b.depth))
    }

    /// Sort deepest first and keep at most `max` contacts.
    pub fn keep_deepest(&mut self, max: usize) {
        self.contacts.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        self.contacts.truncate(max);
    }

    /// The same manifold with the roles of A and B exchanged.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            contacts: self.contacts.into_iter().map(ContactPair::flip).collect(),
        }
    }
}

impl FromIterator<ContactPair> for Manifold {
    fn from_iter<I: IntoIterator<Item = ContactPair>>(iter: I) -> Self {
        Self {
            contacts: iter.into_iter().collect(),
        }
    }
}
