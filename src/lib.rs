#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod bridge;
pub mod config;
pub mod elements;
pub mod envelope;
pub mod errors;
pub mod geometry;
pub mod loader;
pub mod presets;
pub mod profile;
pub mod recovery;
pub mod report;
pub mod stiffness;
pub mod sweep;

pub use bridge::{Bridge, BridgeDefinition, BridgeParameters, MemberDefinition};
pub use config::AnalysisConfig;
pub use elements::{Member, MemberKind, Node};
pub use envelope::{Envelope, LoadPattern};
pub use errors::{AnalysisError, LoadError, SectionError};
pub use geometry::{point, section, NodalDisplacement, Point, Section};
pub use profile::{DofLayout, SpanProfile};
pub use report::InfluenceLine;
pub use sweep::{LoadPosition, Placement, PositionResponse};
