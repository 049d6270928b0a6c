#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use trussline::presets::{reference_geometry, reference_parameters};
use trussline::{section, Bridge, LoadPattern, SpanProfile};

const TOLERANCE: f64 = 1.0e-6;

fn swept_bridge() -> Bridge {
    let (definition, chord) =
        reference_geometry(SpanProfile::TwoSpan, section(1.0, 0.02, 0.01, 0.3));
    let mut bridge = Bridge::new(SpanProfile::TwoSpan, &definition, reference_parameters(chord))
        .expect("reference two span is stable");
    bridge.sweep();
    bridge
}

#[test]
fn continuous_bridge_sweeps_every_position() {
    let bridge = swept_bridge();
    assert_eq!(bridge.node_count(), 40);
    assert_eq!(bridge.member_count(), 77);
    assert_eq!(bridge.layout().reduced_len(), 76);
    assert!(bridge.members().all(|member| member.axial_forces().len() == 1601));
    assert!(bridge.nodes().all(|node| node.displacements().len() == 1601));
}

#[test]
fn centre_bearing_takes_its_load_directly() {
    let bridge = swept_bridge();
    assert!(bridge.members().all(|member| member.axial_forces()[800] == 0.0));
    let centre = bridge.node_displacements(21).expect("centre bearing");
    assert!(centre.iter().all(|&v| v == 0.0));
}

#[test]
fn mirrored_members_see_mirrored_lines() {
    let bridge = swept_bridge();
    // Bottom chord members 1 and 76 sit at opposite ends, as do 17 and 61.
    for (left, right) in [(1, 76), (17, 61)] {
        let a = bridge.member_axial_forces(left).expect("member");
        let b = bridge.member_axial_forces(right).expect("member");
        for sample in (0..1601).step_by(37) {
            assert_relative_eq!(a[sample], b[1600 - sample], epsilon = TOLERANCE);
        }
    }
}

#[test]
fn top_chord_over_centre_bearing_is_in_tension() {
    let bridge = swept_bridge();
    for top in [36, 40] {
        let line = bridge.member_axial_forces(top).expect("member");
        assert!(line[400] > 0.0, "member {top} at first midspan");
        assert!(line[1200] > 0.0, "member {top} at second midspan");
    }
    let bottom = bridge.member_axial_forces(17).expect("member");
    assert!(bottom[400] > 0.0);
    assert!(bottom[1200] < 0.0);
}

#[test]
fn uniform_lane_envelope_is_symmetric_across_the_bridge() {
    let mut bridge = swept_bridge();
    bridge
        .search_worst_cases(&LoadPattern::uniform(10.0, 30.0))
        .expect("swept");
    let left = bridge.member_envelope(1).expect("member 1");
    let right = bridge.member_envelope(76).expect("member 76");
    assert_relative_eq!(left.max_positive, right.max_positive, max_relative = 1.0e-6);
    assert_relative_eq!(left.min_negative, right.min_negative, max_relative = 1.0e-6);
    assert!(left.max_positive > 0.0);
    assert!(left.min_negative < 0.0);
}
