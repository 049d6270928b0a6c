//! Built-in Pratt truss geometry for the reference bridges.
//!
//! Node numbering alternates along the bridge: bottom-chord nodes take the odd
//! ids `1, 3, 5, ...` and the last bottom node takes `2 * panels`, while the
//! top-chord nodes take the even ids in between. Members are numbered panel
//! by panel so that every fourth member starting at 3 is a vertical.
//!
//! ```text
//!        2 ---- 4 ---- 6      ...     12 --- 14
//!      / |  \   |   \  |              |  /   | \
//!     1 ---- 3 ---- 5 ---- 7  ...  13 --- 15 --- 16
//! ```

use crate::bridge::{BridgeDefinition, BridgeParameters, MemberDefinition};
use crate::geometry::{point, Section};
use crate::profile::{SpanProfile, PANEL_LENGTH};

/// Truss depth of the reference bridges.
pub const REFERENCE_HEIGHT: f64 = 11.0;

/// Elastic modulus of structural steel in kN/m².
pub const STEEL_MODULUS: f64 = 2.1e8;

/// Pratt truss with `panels` panels of [`PANEL_LENGTH`] and depth `height`.
///
/// Returns the geometry and the bottom-chord node ids from left to right.
/// Diagonals slope down towards midspan.
#[must_use]
pub fn pratt_truss(panels: usize, height: f64, section: Section) -> (BridgeDefinition, Vec<usize>) {
    let bottom = |k: usize| if k == panels { 2 * panels } else { 2 * k + 1 };
    let top = |k: usize| 2 * k;

    let mut definition = BridgeDefinition::default();
    for id in 1..=2 * panels {
        let position = if id == 2 * panels {
            point(panels as f64 * PANEL_LENGTH, 0.0)
        } else if id % 2 == 1 {
            point((id / 2) as f64 * PANEL_LENGTH, 0.0)
        } else {
            point((id / 2) as f64 * PANEL_LENGTH, height)
        };
        definition.add_node(id, position);
    }

    let mut add = |id: usize, start: usize, end: usize| {
        definition.add_member(MemberDefinition::new(id, start, end, section));
    };
    if panels >= 2 {
        add(1, bottom(0), bottom(1));
        add(2, bottom(0), top(1));
        add(3, top(1), bottom(1));
        for k in 1..panels - 1 {
            add(4 * k, top(k), top(k + 1));
            add(4 * k + 1, bottom(k), bottom(k + 1));
            if 2 * k < panels {
                add(4 * k + 2, top(k), bottom(k + 1));
            } else {
                add(4 * k + 2, bottom(k), top(k + 1));
            }
            add(4 * k + 3, top(k + 1), bottom(k + 1));
        }
        let last = panels - 1;
        add(4 * last, bottom(last), bottom(panels));
        add(4 * last + 1, top(last), bottom(panels));
    }

    let chord = (0..=panels).map(bottom).collect();
    (definition, chord)
}

/// Reference geometry and bottom chord for `profile`.
#[must_use]
pub fn reference_geometry(profile: SpanProfile, section: Section) -> (BridgeDefinition, Vec<usize>) {
    pratt_truss(profile.panel_count(), REFERENCE_HEIGHT, section)
}

/// Steel bridge parameters with a unit moving load and no self-weight.
#[must_use]
pub fn reference_parameters(bottom_chord: Vec<usize>) -> BridgeParameters {
    BridgeParameters {
        modulus: STEEL_MODULUS,
        unit_load: 1.0,
        self_weight: 0.0,
        bottom_chord,
    }
}
