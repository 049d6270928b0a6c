//! Member axial forces from nodal displacements.

use nalgebra::{Matrix4, Vector4};

use crate::elements::{Member, MemberKind};
use crate::geometry::NodalDisplacement;

/// Rotation from global `(u, v)` pairs to member axes.
#[must_use]
pub fn rotation(angle: f64) -> Matrix4<f64> {
    let (s, c) = angle.sin_cos();
    Matrix4::new(
        c, s, 0.0, 0.0, //
        -s, c, 0.0, 0.0, //
        0.0, 0.0, c, s, //
        0.0, 0.0, -s, c,
    )
}

/// End forces at both nodes of `member`, expressed in member axes.
#[must_use]
pub fn local_end_forces(
    member: &Member,
    start: NodalDisplacement,
    end: NodalDisplacement,
) -> Vector4<f64> {
    let d = Vector4::new(start.u, start.v, end.u, end.v);
    rotation(member.angle()) * (member.stiffness() * d)
}

/// Signed axial force of `member`, tension positive.
///
/// The magnitude is the norm of the start-node end force. Verticals are
/// oriented at a fixed right angle whatever their node order, so their axial
/// end force maps to tension with the opposite sign to chords and diagonals.
#[must_use]
pub fn axial_force(member: &Member, start: NodalDisplacement, end: NodalDisplacement) -> f64 {
    let forces = local_end_forces(member, start, end);
    let magnitude = forces[0].hypot(forces[1]);
    let pushes_start = forces[0] > 0.0;
    match (member.kind(), pushes_start) {
        (MemberKind::Vertical, true) | (MemberKind::Chord, false) => magnitude,
        (MemberKind::Vertical, false) | (MemberKind::Chord, true) => -magnitude,
    }
}
