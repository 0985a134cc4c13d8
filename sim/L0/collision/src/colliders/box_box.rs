//! Box-box collider.
//!
//! Two phases:
//!
//! 1. Separating-axis test over the 15 candidate axes (3 face axes per box
//!    plus the 9 edge cross products). Any gap ends the test with no
//!    contact. Otherwise the axis of least overlap is kept.
//! 2. If that axis is a face axis, every vertex of one box that lies inside
//!    the other becomes a contact, pushed out through the nearest face.
//!    If it is an edge axis, the two supporting edges are intersected with
//!    a closest-point-between-lines solve and a single contact is returned.

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;
use tracing::trace;
use xpbd_types::Pose;

use super::GEOM_EPSILON;
use crate::aabb::Aabb;
use crate::manifold::{ContactPair, Manifold};

/// Cross products shorter than this (squared) come from near-parallel
/// edges and are skipped as SAT axes.
const MIN_AXIS_LENGTH_SQ: f64 = 1e-6;

/// Number of face axes among the SAT candidates (3 per box).
const FACE_AXES: usize = 6;

/// Reciprocal of the edge solve's determinant above which the edges are
/// considered parallel.
const MAX_EDGE_DETERMINANT: f64 = 1e4;

/// Collide two boxes given by their local extents.
#[must_use]
pub fn collide_box_box(box_a: &Aabb, pose_a: &Pose, box_b: &Aabb, pose_b: &Pose) -> Manifold {
    let verts_a = box_a.vertices().map(|v| pose_a.transform_point(&v));
    let verts_b = box_b.vertices().map(|v| pose_b.transform_point(&v));

    // (axis index, signed response) of the least-overlap axis so far.
    let mut best: Option<(usize, f64)> = None;
    let axes = sat_axes(pose_a, pose_b);

    for (i, axis) in axes.iter().enumerate() {
        let Some(axis) = axis else {
            continue;
        };
        let response = overlap_response(project(&verts_a, axis), project(&verts_b, axis));
        if response == 0.0 {
            return Manifold::empty();
        }
        if best.map_or(true, |(_, r)| response.abs() < r.abs()) {
            best = Some((i, response));
        }
    }

    if let Some((index, response)) = best {
        if index >= FACE_AXES {
            if let Some(axis) = axes[index] {
                let flip = response > 0.0;
                if let Some(contact) =
                    edge_contact(&verts_a, pose_a, &verts_b, pose_b, &axis, flip)
                {
                    return Manifold::single(contact);
                }
            }
        }
    }

    vertex_contacts(box_a, pose_a, box_b, pose_b)
}

/// Face axes of A, face axes of B, then `a_i x b_j` for i, j in 0..3.
fn sat_axes(pose_a: &Pose, pose_b: &Pose) -> [Option<Vector3<f64>>; 15] {
    let faces_a = [pose_a.axis0(), pose_a.axis1(), pose_a.axis2()];
    let faces_b = [pose_b.axis0(), pose_b.axis1(), pose_b.axis2()];

    let mut axes = [None; 15];
    for (i, axis) in faces_a.iter().chain(faces_b.iter()).enumerate() {
        axes[i] = Some(*axis);
    }
    for (i, a) in faces_a.iter().enumerate() {
        for (j, b) in faces_b.iter().enumerate() {
            let cross = a.cross(b);
            if cross.norm_squared() > MIN_AXIS_LENGTH_SQ {
                axes[FACE_AXES + i * 3 + j] = Some(cross.normalize());
            }
        }
    }
    axes
}

fn project(verts: &[Point3<f64>; 8], axis: &Vector3<f64>) -> (f64, f64) {
    verts
        .iter()
        .map(|v| axis.dot(&v.coords))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        })
}

/// Signed translation of A along the axis that resolves the overlap with
/// the smaller magnitude. Positive means A must move along `+axis`. Zero
/// means the ranges do not overlap.
fn overlap_response((min_a, max_a): (f64, f64), (min_b, max_b): (f64, f64)) -> f64 {
    if max_a < min_b || max_b < min_a {
        return 0.0;
    }
    let push_pos = max_b - min_a;
    let push_neg = min_b - max_a;
    if push_pos.abs() < push_neg.abs() {
        push_pos
    } else {
        push_neg
    }
}

/// Vertices of one box inside the other, both directions.
fn vertex_contacts(box_a: &Aabb, pose_a: &Pose, box_b: &Aabb, pose_b: &Pose) -> Manifold {
    let mut manifold = Manifold::empty();

    for v in box_a.vertices() {
        let in_b = pose_b.inv_transform_point(&pose_a.transform_point(&v));
        if let Some((depth, face)) = push_out(box_b, &in_b) {
            manifold.push(ContactPair {
                local_point_a: v,
                local_point_b: in_b + face * depth,
                normal: -pose_b.rotate(&face),
                depth,
            });
        }
    }

    for v in box_b.vertices() {
        let in_a = pose_a.inv_transform_point(&pose_b.transform_point(&v));
        if let Some((depth, face)) = push_out(box_a, &in_a) {
            manifold.push(ContactPair {
                local_point_a: in_a + face * depth,
                local_point_b: v,
                normal: pose_a.rotate(&face),
                depth,
            });
        }
    }

    manifold
}

/// Shortest way out of the box for a contained point: distance and the
/// outward face normal. Ties go to +X, -X, +Y, -Y, +Z, -Z in that order.
pub(crate) fn push_out(aabb: &Aabb, p: &Point3<f64>) -> Option<(f64, Vector3<f64>)> {
    if !aabb.contains_point(p) {
        return None;
    }
    let candidates = [
        (aabb.max.x - p.x, Vector3::x()),
        (p.x - aabb.min.x, -Vector3::x()),
        (aabb.max.y - p.y, Vector3::y()),
        (p.y - aabb.min.y, -Vector3::y()),
        (aabb.max.z - p.z, Vector3::z()),
        (p.z - aabb.min.z, -Vector3::z()),
    ];
    candidates
        .into_iter()
        .reduce(|best, c| if c.0 < best.0 { c } else { best })
}

/// Closest points between the supporting edges of both boxes.
fn edge_contact(
    verts_a: &[Point3<f64>; 8],
    pose_a: &Pose,
    verts_b: &[Point3<f64>; 8],
    pose_b: &Pose,
    axis: &Vector3<f64>,
    flip: bool,
) -> Option<ContactPair> {
    // A's support faces B: when A sits on the +axis side, that is its
    // lowest projection along +axis.
    let toward_b = if flip { *axis } else { -axis };
    let (a0, a1) = support_edge(verts_a, &toward_b)?;
    let (b0, b1) = support_edge(verts_b, &-toward_b)?;

    let len_a = (a1 - a0).norm();
    let len_b = (b1 - b0).norm();
    if len_a < GEOM_EPSILON || len_b < GEOM_EPSILON {
        return None;
    }
    let ua = (a1 - a0) / len_a;
    let ub = (b1 - b0) / len_b;

    let p = b0 - a0;
    let uaub = ua.dot(&ub);
    let q1 = ua.dot(&p);
    let q2 = -ub.dot(&p);
    let d = 1.0 / (1.0 - uaub * uaub);

    if !d.is_finite() || d.abs() > MAX_EDGE_DETERMINANT {
        trace!(uaub, "box-box edges near parallel, using vertex contacts");
        return None;
    }

    let alpha = ((q1 + uaub * q2) * d).clamp(0.0, len_a);
    let beta = ((uaub * q1 + q2) * d).clamp(0.0, len_b);

    let world_a = a0 + ua * alpha;
    let world_b = b0 + ub * beta;
    let normal = if flip { -axis } else { *axis };
    let depth = normal.dot(&(world_a - world_b));
    if depth <= 0.0 {
        return None;
    }

    Some(ContactPair::from_world(
        pose_a, pose_b, &world_a, &world_b, normal, depth,
    ))
}

/// The two vertices with the smallest projection onto `dir`, if exactly
/// two share it (an edge). Corners and faces yield `None`.
fn support_edge(
    verts: &[Point3<f64>; 8],
    dir: &Vector3<f64>,
) -> Option<(Point3<f64>, Point3<f64>)> {
    let smallest = verts
        .iter()
        .map(|v| dir.dot(&v.coords))
        .fold(f64::INFINITY, f64::min);

    let support: SmallVec<[Point3<f64>; 8]> = verts
        .iter()
        .filter(|v| (dir.dot(&v.coords) - smallest).abs() < GEOM_EPSILON)
        .copied()
        .collect();

    match support.as_slice() {
        [v0, v1] => Some((*v0, *v1)),
        _ => None,
    }
}
