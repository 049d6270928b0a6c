//! Discretisation of the moving unit load and the per-position solve.
//!
//! Load positions are counted in whole samples so that bottom-chord nodes,
//! including both ends of the chord, are recognised exactly.

use nalgebra::DVector;

use crate::geometry::NodalDisplacement;
use crate::profile::{DofLayout, SpanProfile};
use crate::stiffness::ReducedStiffness;

/// Distance between consecutive load positions.
pub const SAMPLE_SPACING: f64 = 0.1;

/// Load positions per panel of the bottom chord.
pub const SAMPLES_PER_PANEL: usize = 80;

/// Number of load positions on a chord of `panel_count` panels, both ends included.
#[must_use]
pub fn sample_count(panel_count: usize) -> usize {
    panel_count * SAMPLES_PER_PANEL + 1
}

/// Every load position along a chord of `panel_count` panels.
pub fn positions(panel_count: usize) -> impl Iterator<Item = LoadPosition> {
    (0..sample_count(panel_count)).map(LoadPosition)
}

/// Position of the unit load, as a sample index along the bottom chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadPosition(usize);

impl LoadPosition {
    /// Load position at sample `sample`.
    #[must_use]
    pub const fn new(sample: usize) -> Self {
        Self(sample)
    }

    /// Load position nearest to `distance` from the left end of the chord.
    #[must_use]
    pub fn from_distance(distance: f64) -> Self {
        Self((distance.max(0.0) / SAMPLE_SPACING).round() as usize)
    }

    /// Sample index.
    #[must_use]
    pub fn sample(self) -> usize {
        self.0
    }

    /// Distance from the left end of the chord.
    #[must_use]
    pub fn distance(self) -> f64 {
        self.0 as f64 * SAMPLE_SPACING
    }

    /// How the load is shared between bottom-chord nodes.
    ///
    /// # Examples
    /// ```
    /// use trussline::{LoadPosition, Placement};
    ///
    /// assert_eq!(LoadPosition::from_distance(8.0).placement(), Placement::OnNode(1));
    /// assert_eq!(
    ///     LoadPosition::from_distance(4.0).placement(),
    ///     Placement::BetweenNodes { prev: 0, next: 1, fraction: 0.5 }
    /// );
    /// ```
    #[must_use]
    pub fn placement(self) -> Placement {
        let prev = self.0 / SAMPLES_PER_PANEL;
        let offset = self.0 % SAMPLES_PER_PANEL;
        if offset == 0 {
            Placement::OnNode(prev)
        } else {
            Placement::BetweenNodes {
                prev,
                next: prev + 1,
                fraction: offset as f64 / SAMPLES_PER_PANEL as f64,
            }
        }
    }
}

/// Load transfer from the moving load to the bottom chord, by chord index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// The load sits directly on a bottom-chord node.
    OnNode(usize),
    /// The load sits inside a panel and is shared by the lever rule.
    BetweenNodes {
        /// Chord index of the node on the left.
        prev: usize,
        /// Chord index of the node on the right.
        next: usize,
        /// Share of the load carried by `next`.
        fraction: f64,
    },
}

/// Nodal response to a single load position.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionResponse {
    /// Displacement of every node, in node order.
    pub displacements: Vec<NodalDisplacement>,
    /// Signed axial force of every member, in member order.
    pub axial_forces: Vec<f64>,
}

/// Borrowed view of everything a load position needs to be solved.
#[derive(Clone, Copy, Debug)]
pub struct LoadCase<'a> {
    /// Support arrangement.
    pub profile: SpanProfile,
    /// Positional node index of each bottom-chord node.
    pub chord_nodes: &'a [usize],
    /// Degree-of-freedom layout.
    pub layout: &'a DofLayout,
    /// Factorised reduced stiffness.
    pub stiffness: &'a ReducedStiffness,
    /// Magnitude of the moving load.
    pub unit_load: f64,
}

impl LoadCase<'_> {
    /// Reduced force vector for `placement`, or `None` when a bearing takes the load directly.
    ///
    /// Downward load is negative. Shares that fall on a bearing are dropped.
    #[must_use]
    pub fn load_vector(&self, placement: Placement) -> Option<DVector<f64>> {
        let mut load = DVector::zeros(self.stiffness.len());
        match placement {
            Placement::OnNode(index) => {
                if self.profile.is_support(index) {
                    return None;
                }
                self.add_chord_load(&mut load, index, -self.unit_load);
            }
            Placement::BetweenNodes {
                prev,
                next,
                fraction,
            } => {
                self.add_chord_load(&mut load, prev, -self.unit_load * (1.0 - fraction));
                self.add_chord_load(&mut load, next, -self.unit_load * fraction);
            }
        }
        Some(load)
    }

    /// Add `value` to the vertical load of a chord node unless it is a bearing.
    fn add_chord_load(&self, load: &mut DVector<f64>, chord_index: usize, value: f64) {
        if self.profile.is_support(chord_index) {
            return;
        }
        let dof = self
            .chord_nodes
            .get(chord_index)
            .and_then(|&node| self.layout.vertical(node));
        if let Some(dof) = dof {
            load[dof] += value;
        }
    }

    /// Displacement of every node with the load at `position`.
    ///
    /// Fixed degrees of freedom are reported as zero.
    #[must_use]
    pub fn displacements(&self, position: LoadPosition, node_count: usize) -> Vec<NodalDisplacement> {
        let Some(load) = self.load_vector(position.placement()) else {
            return vec![NodalDisplacement::default(); node_count];
        };
        let solution = self.stiffness.solve(&load);
        (0..node_count)
            .map(|node| {
                let pick = |dof: Option<usize>| dof.map_or(0.0, |dof| solution[dof]);
                NodalDisplacement::new(
                    pick(self.layout.horizontal(node)),
                    pick(self.layout.vertical(node)),
                )
            })
            .collect()
    }
}
