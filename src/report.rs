//! Plain-text summaries and JSON export of recorded influence lines.

use std::fmt::Write;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bridge::Bridge;
use crate::errors::{AnalysisError, LoadError};
use crate::sweep::SAMPLE_SPACING;

/// One influence line in the form consumed by plotting tools.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfluenceLine {
    /// `V<node>` for a vertical displacement line, `N<member>` for an axial force line.
    pub label: String,
    /// Distance between consecutive samples.
    pub spacing: f64,
    /// Length of the loaded chord.
    pub span_length: f64,
    /// Response with the unit load at each sample.
    pub samples: Vec<f64>,
}

/// Collect every node and member influence line of a swept bridge.
///
/// # Errors
///
/// Returns [`AnalysisError::SweepNotRun`] when the bridge has not been swept.
pub fn influence_lines(bridge: &Bridge) -> Result<Vec<InfluenceLine>, AnalysisError> {
    if !bridge.is_swept() {
        return Err(AnalysisError::SweepNotRun);
    }
    let line = |label: String, samples: &[f64]| InfluenceLine {
        label,
        spacing: SAMPLE_SPACING,
        span_length: bridge.span_length(),
        samples: samples.to_vec(),
    };
    let nodes = bridge
        .nodes()
        .map(|node| line(format!("V{}", node.id()), node.displacements()));
    let members = bridge
        .members()
        .map(|member| line(format!("N{}", member.id()), member.axial_forces()));
    Ok(nodes.chain(members).collect())
}

/// Write influence lines to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be created and
/// [`LoadError::Json`] when serialisation fails.
pub fn write_influence_lines<P: AsRef<Path>>(
    path: P,
    lines: &[InfluenceLine],
) -> Result<(), LoadError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, lines)?;
    writer.flush().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Largest and smallest ordinate of an influence line.
fn extremes(line: &[f64]) -> (f64, f64) {
    line.iter()
        .fold((0.0_f64, 0.0_f64), |(hi, lo), &x| (hi.max(x), lo.min(x)))
}

/// Render a textual summary of the member responses of a bridge.
///
/// Unswept bridges only report their geometry.
#[must_use]
pub fn render_summary(bridge: &Bridge) -> String {
    let mut output = String::new();

    writeln!(
        &mut output,
        "{:?} truss bridge: span {:.1}, {} nodes, {} members, {} load positions",
        bridge.profile(),
        bridge.span_length(),
        bridge.node_count(),
        bridge.member_count(),
        bridge.sample_count()
    )
    .expect("writing to string cannot fail");

    if !bridge.is_swept() {
        output.push_str("Influence lines: not computed\n");
        return output;
    }

    let dead_load = bridge.parameters().self_weight != 0.0;
    write!(
        &mut output,
        "{:>6} {:>8} {:>12} {:>12} {:>12} {:>12}",
        "member", "kind", "peak +", "peak -", "worst +", "worst -"
    )
    .expect("writing to string cannot fail");
    if dead_load {
        write!(&mut output, " {:>12}", "dead load").expect("writing to string cannot fail");
    }
    output.push('\n');

    for member in bridge.members() {
        let (peak_positive, peak_negative) = extremes(member.axial_forces());
        write!(
            &mut output,
            "{:>6} {:>8} {:>+12.4e} {:>+12.4e}",
            member.id(),
            format!("{:?}", member.kind()).to_lowercase(),
            peak_positive,
            peak_negative
        )
        .expect("writing to string cannot fail");
        if let Some(envelope) = member.envelope() {
            write!(
                &mut output,
                " {:>+12.4e} {:>+12.4e}",
                envelope.max_positive, envelope.min_negative
            )
            .expect("writing to string cannot fail");
        } else {
            write!(&mut output, " {:>12} {:>12}", "-", "-").expect("writing to string cannot fail");
        }
        if dead_load {
            let force = bridge.dead_load_force(member.id()).ok().flatten().unwrap_or(0.0);
            write!(&mut output, " {force:>+12.4e}").expect("writing to string cannot fail");
        }
        output.push('\n');
    }

    output
}
