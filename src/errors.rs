//! Error types produced while building, sweeping or loading truss bridges.

use std::path::PathBuf;

use thiserror::Error;

/// Error returned when a bridge model cannot be assembled or analysed.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when the reduced stiffness matrix cannot be factorised.
    #[error("reduced stiffness matrix is singular; check supports and connectivity")]
    StructuralSingularity,
    /// Returned when a member references a node that is not part of the bridge.
    #[error("member {member} references unknown node {node}")]
    UnknownNode {
        /// Identifier of the offending member.
        member: usize,
        /// Identifier of the missing node.
        node: usize,
    },
    /// Returned when the bottom chord references a node that is not part of the bridge.
    #[error("bottom chord references unknown node {0}")]
    UnknownChordNode(usize),
    /// Returned when the supplied section for a member is not physically meaningful.
    #[error("member {member} has an invalid section: {source}")]
    InvalidSection {
        /// Identifier of the offending member.
        member: usize,
        /// Description of the invalid property.
        #[source]
        source: SectionError,
    },
    /// Returned when a member has no section data.
    #[error("member {0} has no section data")]
    MissingSection(usize),
    /// Returned when the elastic modulus is zero or negative.
    #[error("elastic modulus must be positive (received {0})")]
    NonPositiveModulus(f64),
    /// Returned when a member spans zero distance.
    #[error("member {0} has zero length")]
    ZeroLengthMember(usize),
    /// Returned when the bottom chord does not match the bridge profile.
    #[error("invalid bottom chord: {0}")]
    InvalidBottomChord(String),
    /// Returned when two nodes share an identifier.
    #[error("node {0} is defined more than once")]
    DuplicateNode(usize),
    /// Returned when two members share an identifier.
    #[error("member {0} is defined more than once")]
    DuplicateMember(usize),
    /// Returned when results are requested before the moving-load sweep ran.
    #[error("influence lines are not available; run the moving-load sweep first")]
    SweepNotRun,
}

/// Error returned when section dimensions describe an impossible cross-section.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum SectionError {
    /// Returned when the computed cross-sectional area is zero or negative.
    #[error("area must be positive (received {area})")]
    NonPositiveArea {
        /// Rejected cross-sectional area.
        area: f64,
    },
}

/// Error returned by the geometry and configuration loaders.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Returned when a file cannot be read.
    #[error("cannot read {path:?}: {source}")]
    Io {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Returned when a line of a data file is malformed.
    #[error("{path:?}, line {line}: {reason}")]
    Parse {
        /// File that contains the malformed line.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
    /// Returned when a configuration file is not valid JSON.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// Returned when a configured lane load is out of range.
    #[error("invalid lane load: {0}")]
    InvalidLane(String),
    /// Returned when the loaded data does not form a valid bridge.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
