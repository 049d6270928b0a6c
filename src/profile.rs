//! Structural profiles and the degree-of-freedom layout they imply.
//!
//! Both bridge variants run through the same pipeline. They only differ in
//! which bottom-chord nodes are supports, and therefore which degrees of
//! freedom are dropped from the reduced system.

use serde::{Deserialize, Serialize};

use crate::elements::MemberKind;

/// Distance between neighbouring bottom-chord nodes.
pub const PANEL_LENGTH: f64 = 8.0;

/// Support arrangement of a bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanProfile {
    /// 64 length-unit span on a pinned left bearing and a roller right bearing.
    SingleSpan,
    /// 160 length-unit continuous truss over two 80 unit spans with a center roller.
    TwoSpan,
}

impl SpanProfile {
    /// Total length of the bottom chord.
    #[must_use]
    pub fn span_length(self) -> f64 {
        match self {
            Self::SingleSpan => 64.0,
            Self::TwoSpan => 160.0,
        }
    }

    /// Number of panels along the bottom chord.
    #[must_use]
    pub fn panel_count(self) -> usize {
        match self {
            Self::SingleSpan => 8,
            Self::TwoSpan => 20,
        }
    }

    /// Positions along the bottom chord (as chord indices) that rest on bearings.
    #[must_use]
    pub fn support_chord_indices(self) -> Vec<usize> {
        let last = self.panel_count();
        match self {
            Self::SingleSpan => vec![0, last],
            Self::TwoSpan => vec![0, last / 2, last],
        }
    }

    /// Whether the chord index is a bearing.
    #[must_use]
    pub fn is_support(self, chord_index: usize) -> bool {
        self.support_chord_indices().contains(&chord_index)
    }

    /// Global degrees of freedom fixed by the bearings.
    ///
    /// `chord_nodes` holds the positional index of every bottom-chord node in
    /// the bridge's node order. The left bearing is pinned; every other bearing
    /// only restrains the vertical direction.
    #[must_use]
    pub fn fixed_dofs(self, chord_nodes: &[usize]) -> Vec<usize> {
        let mut fixed = Vec::new();
        for (n, chord_index) in self.support_chord_indices().into_iter().enumerate() {
            let Some(&node) = chord_nodes.get(chord_index) else {
                continue;
            };
            if n == 0 {
                fixed.push(2 * node);
            }
            fixed.push(2 * node + 1);
        }
        fixed.sort_unstable();
        fixed.dedup();
        fixed
    }
}

/// Sign rule for a member of the reference numbering, where every fourth
/// member starting at 3 is a vertical.
#[must_use]
pub fn member_kind(id: usize) -> MemberKind {
    if id % 4 == 3 {
        MemberKind::Vertical
    } else {
        MemberKind::Chord
    }
}

/// Mapping between the full `(u, v)`-per-node numbering and the reduced system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DofLayout {
    /// Reduced index of each full degree of freedom, `None` when fixed.
    reduced: Vec<Option<usize>>,
    /// Full index of each reduced degree of freedom.
    free: Vec<usize>,
}

impl DofLayout {
    /// Build a layout for `node_count` nodes with the given fixed degrees of freedom.
    #[must_use]
    pub fn new(node_count: usize, fixed: &[usize]) -> Self {
        let mut reduced = vec![None; 2 * node_count];
        let mut free = Vec::with_capacity(2 * node_count);
        for (dof, slot) in reduced.iter_mut().enumerate() {
            if !fixed.contains(&dof) {
                *slot = Some(free.len());
                free.push(dof);
            }
        }
        Self { reduced, free }
    }

    /// Layout implied by `profile` for a bridge with `node_count` nodes.
    #[must_use]
    pub fn for_profile(profile: SpanProfile, node_count: usize, chord_nodes: &[usize]) -> Self {
        Self::new(node_count, &profile.fixed_dofs(chord_nodes))
    }

    /// Size of the full system.
    #[must_use]
    pub fn full_len(&self) -> usize {
        self.reduced.len()
    }

    /// Size of the reduced system.
    #[must_use]
    pub fn reduced_len(&self) -> usize {
        self.free.len()
    }

    /// Full indices that survive the reduction, in ascending order.
    #[must_use]
    pub fn free_dofs(&self) -> &[usize] {
        &self.free
    }

    /// Reduced index of the horizontal degree of freedom of node `node`.
    #[must_use]
    pub fn horizontal(&self, node: usize) -> Option<usize> {
        self.reduced.get(2 * node).copied().flatten()
    }

    /// Reduced index of the vertical degree of freedom of node `node`.
    #[must_use]
    pub fn vertical(&self, node: usize) -> Option<usize> {
        self.reduced.get(2 * node + 1).copied().flatten()
    }
}
