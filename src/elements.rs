//! Nodes and members of the truss with their derived mechanical properties.

use std::f64::consts::FRAC_PI_2;

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::errors::{AnalysisError, SectionError};
use crate::geometry::{Point, Section};

/// A pin joint of the truss.
#[derive(Clone, Debug)]
pub struct Node {
    /// Identifier from the geometry data.
    id: usize,
    /// Fixed position of the joint.
    position: Point,
    /// Vertical displacement for each load position of the last sweep.
    displacements: Vec<f64>,
}

impl Node {
    /// Create a node at `position`.
    #[must_use]
    pub fn new(id: usize, position: Point) -> Self {
        Self {
            id,
            position,
            displacements: Vec::new(),
        }
    }

    /// Identifier of the node.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Position of the node.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Vertical displacement influence line recorded by the last sweep.
    #[must_use]
    pub fn displacements(&self) -> &[f64] {
        &self.displacements
    }

    /// Forget the displacements of a previous sweep.
    pub(crate) fn clear_displacements(&mut self) {
        self.displacements.clear();
    }

    /// Append the displacement for the next load position.
    pub(crate) fn record_displacement(&mut self, value: f64) {
        self.displacements.push(value);
    }
}

/// Sign rule applied when recovering the axial force of a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Vertical hanger or post; a positive local axial end force is tension.
    Vertical,
    /// Chord or diagonal; a positive local axial end force is compression.
    Chord,
}

/// A two-force truss member.
///
/// Geometry never changes after the bridge is built, so the orientation, length,
/// area and stiffness are evaluated once here.
#[derive(Clone, Debug)]
pub struct Member {
    /// Identifier from the geometry data.
    id: usize,
    /// Identifier of the start node.
    start: usize,
    /// Identifier of the end node.
    end: usize,
    /// Sign rule for force recovery.
    kind: MemberKind,
    /// Chord angle from the start node to the end node.
    angle: f64,
    /// Distance between the end nodes.
    length: f64,
    /// Cross-sectional area.
    area: f64,
    /// 4x4 element stiffness in global coordinates.
    stiffness: Matrix4<f64>,
    /// Signed axial force for each load position of the last sweep.
    axial_forces: Vec<f64>,
    /// Worst-case forces from the last envelope search.
    envelope: Option<Envelope>,
}

impl Member {
    /// Build a member between two nodes and evaluate its stiffness.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidSection`] when the section area is not positive
    /// and [`AnalysisError::ZeroLengthMember`] when both nodes coincide.
    pub fn new(
        id: usize,
        start: &Node,
        end: &Node,
        section: Section,
        kind: MemberKind,
        modulus: f64,
    ) -> Result<Self, AnalysisError> {
        let area = section.area();
        if area <= 0.0 || !area.is_finite() {
            return Err(AnalysisError::InvalidSection {
                member: id,
                source: SectionError::NonPositiveArea { area },
            });
        }
        let (a, b) = (start.position(), end.position());
        let length = (b.to_vector() - a.to_vector()).norm();
        if length == 0.0 {
            return Err(AnalysisError::ZeroLengthMember(id));
        }
        let angle = orientation(a, b);
        Ok(Self {
            id,
            start: start.id(),
            end: end.id(),
            kind,
            angle,
            length,
            area,
            stiffness: local_stiffness(angle, length, area, modulus),
            axial_forces: Vec::new(),
            envelope: None,
        })
    }

    /// Identifier of the member.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Identifiers of the start and end nodes.
    #[must_use]
    pub fn nodes(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Sign rule used for force recovery.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Orientation angle in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Member length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Cross-sectional area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Element stiffness matrix in global coordinates.
    #[must_use]
    pub fn stiffness(&self) -> &Matrix4<f64> {
        &self.stiffness
    }

    /// Axial force influence line recorded by the last sweep.
    #[must_use]
    pub fn axial_forces(&self) -> &[f64] {
        &self.axial_forces
    }

    /// Worst-case forces from the last envelope search.
    #[must_use]
    pub fn envelope(&self) -> Option<Envelope> {
        self.envelope
    }

    /// Forget the forces and envelope of a previous sweep.
    pub(crate) fn clear_axial_forces(&mut self) {
        self.axial_forces.clear();
        self.envelope = None;
    }

    /// Append the force for the next load position.
    pub(crate) fn record_axial_force(&mut self, value: f64) {
        self.axial_forces.push(value);
    }

    /// Store the result of an envelope search.
    pub(crate) fn set_envelope(&mut self, envelope: Envelope) {
        self.envelope = Some(envelope);
    }
}

/// Angle of the chord from `a` to `b` against the horizontal axis.
///
/// Vertical chords are always reported as a right angle, whichever node is on top.
#[must_use]
pub fn orientation(a: Point, b: Point) -> f64 {
    if a.x == b.x {
        FRAC_PI_2
    } else {
        ((b.y - a.y) / (b.x - a.x)).atan()
    }
}

/// Element stiffness `EA/L * [c² cs -c² -cs; ...]` of a pin-jointed bar.
#[must_use]
pub fn local_stiffness(angle: f64, length: f64, area: f64, modulus: f64) -> Matrix4<f64> {
    let (s, c) = angle.sin_cos();
    let (cc, cs, ss) = (c * c, c * s, s * s);
    let m = Matrix4::new(
        cc, cs, -cc, -cs, //
        cs, ss, -cs, -ss, //
        -cc, -cs, cc, cs, //
        -cs, -ss, cs, ss,
    );
    m * (modulus * area / length)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::{point, section};

    fn reference_section() -> Section {
        section(1.0, 0.02, 0.01, 0.3)
    }

    #[test]
    fn vertical_members_use_right_angle() {
        let top = Node::new(2, point(8.0, 11.0));
        let bottom = Node::new(3, point(8.0, 0.0));
        let member =
            Member::new(3, &top, &bottom, reference_section(), MemberKind::Vertical, 2.1e8)
                .expect("member builds");
        assert_relative_eq!(member.angle(), FRAC_PI_2);
        assert_relative_eq!(member.length(), 11.0);
    }

    #[test]
    fn diagonal_geometry() {
        let a = Node::new(1, point(0.0, 0.0));
        let b = Node::new(2, point(3.0, 4.0));
        let member = Member::new(1, &a, &b, reference_section(), MemberKind::Chord, 1.0)
            .expect("member builds");
        assert_relative_eq!(member.length(), 5.0);
        assert_relative_eq!(member.angle(), (4.0_f64 / 3.0).atan());
        assert_relative_eq!(member.area(), 0.016, epsilon = 1.0e-12);
    }

    #[test]
    fn stiffness_is_symmetric_positive_semi_definite() {
        let a = Node::new(1, point(0.0, 0.0));
        let b = Node::new(2, point(8.0, 11.0));
        let member = Member::new(1, &a, &b, reference_section(), MemberKind::Chord, 2.1e8)
            .expect("member builds");
        let k = member.stiffness();
        assert_relative_eq!(*k, k.transpose(), epsilon = 1.0e-6);
        let scale = k.amax();
        for eigenvalue in k.symmetric_eigenvalues().iter() {
            assert!(*eigenvalue >= -1.0e-9 * scale);
        }
    }

    #[test]
    fn horizontal_stiffness_matches_axial_bar() {
        let k = local_stiffness(0.0, 2.0, 0.5, 8.0);
        assert_relative_eq!(k[(0, 0)], 2.0);
        assert_relative_eq!(k[(0, 2)], -2.0);
        assert_relative_eq!(k[(1, 1)], 0.0);
    }

    #[test]
    fn non_positive_area_is_rejected() {
        let a = Node::new(1, point(0.0, 0.0));
        let b = Node::new(2, point(8.0, 0.0));
        let error = Member::new(7, &a, &b, section(0.1, 0.0, 0.01, 0.3), MemberKind::Chord, 1.0)
            .expect_err("degenerate section rejected");
        assert!(matches!(
            error,
            AnalysisError::InvalidSection { member: 7, source: SectionError::NonPositiveArea { .. } }
        ));
    }

    #[test]
    fn zero_length_member_is_rejected() {
        let a = Node::new(1, point(8.0, 0.0));
        let b = Node::new(2, point(8.0, 0.0));
        let error = Member::new(4, &a, &b, reference_section(), MemberKind::Chord, 1.0)
            .expect_err("zero length rejected");
        assert_eq!(error, AnalysisError::ZeroLengthMember(4));
    }
}
