//! Readers and writers for the whitespace-separated bridge data files.
//!
//! A bridge of span `L` is described by three files in one directory:
//!
//! ```text
//! nodes_coordinates_<L>.txt    id x y
//! unit_node_mapping_<L>.txt    id start end
//! beam_section_data_<L>.txt    id height flange_thickness web_thickness flange_width
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::fmt::{Display, Write as _};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;

use crate::bridge::{BridgeDefinition, MemberDefinition};
use crate::errors::LoadError;
use crate::geometry::{point, Section};
use crate::profile::SpanProfile;

/// File stem of the node coordinates.
pub const NODES_STEM: &str = "nodes_coordinates";

/// File stem of the member connectivity.
pub const MEMBERS_STEM: &str = "unit_node_mapping";

/// File stem of the member sections.
pub const SECTIONS_STEM: &str = "beam_section_data";

/// Path of the `stem` data file for `profile` inside `dir`.
#[must_use]
pub fn data_file(dir: &Path, stem: &str, profile: SpanProfile) -> PathBuf {
    dir.join(format!("{stem}_{}.txt", profile.span_length().round() as u32))
}

/// One non-empty line of a data file, split into fields.
struct Record {
    /// One-based line number.
    line: usize,
    /// Whitespace-separated fields.
    fields: Vec<String>,
}

/// Parse failure at `line` of `path`.
fn parse_error(path: &Path, line: usize, reason: String) -> LoadError {
    LoadError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    }
}

/// Non-empty lines of `path`, each required to hold `width` fields.
fn read_records(path: &Path, width: usize) -> Result<Vec<Record>, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut records = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<String> = trimmed.split_whitespace().map(str::to_owned).collect();
        if fields.len() != width {
            return Err(parse_error(
                path,
                index + 1,
                format!("expected {width} fields, found {}", fields.len()),
            ));
        }
        records.push(Record {
            line: index + 1,
            fields,
        });
    }
    Ok(records)
}

/// Parse column `column` of `record`.
fn field<T>(path: &Path, record: &Record, column: usize) -> Result<T, LoadError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = &record.fields[column];
    raw.parse().map_err(|error| {
        parse_error(
            path,
            record.line,
            format!("field {} ({raw:?}): {error}", column + 1),
        )
    })
}

/// Read the geometry of a `profile` bridge from the data files in `dir`.
///
/// Members without a line in the section file keep `section: None` and are
/// rejected when the bridge is built.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when a file cannot be read and
/// [`LoadError::Parse`] when a line is malformed or a section names an
/// unknown member.
pub fn load_definition<P: AsRef<Path>>(
    dir: P,
    profile: SpanProfile,
) -> Result<BridgeDefinition, LoadError> {
    let dir = dir.as_ref();
    let mut definition = BridgeDefinition::default();

    let path = data_file(dir, NODES_STEM, profile);
    for record in read_records(&path, 3)? {
        let id = field(&path, &record, 0)?;
        let position = point(field(&path, &record, 1)?, field(&path, &record, 2)?);
        definition.add_node(id, position);
    }

    let path = data_file(dir, MEMBERS_STEM, profile);
    for record in read_records(&path, 3)? {
        definition.add_member(MemberDefinition {
            id: field(&path, &record, 0)?,
            start: field(&path, &record, 1)?,
            end: field(&path, &record, 2)?,
            section: None,
        });
    }

    let path = data_file(dir, SECTIONS_STEM, profile);
    for record in read_records(&path, 5)? {
        let id: usize = field(&path, &record, 0)?;
        let section = Section::new(
            field(&path, &record, 1)?,
            field(&path, &record, 2)?,
            field(&path, &record, 3)?,
            field(&path, &record, 4)?,
        );
        let member = definition
            .members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or_else(|| {
                parse_error(&path, record.line, format!("section given for unknown member {id}"))
            })?;
        member.section = Some(section);
    }

    debug!(
        "loaded {} nodes and {} members from {}",
        definition.nodes.len(),
        definition.members.len(),
        dir.display()
    );
    Ok(definition)
}

/// Write `definition` as the three data files of a `profile` bridge in `dir`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when a file cannot be written.
pub fn save_definition<P: AsRef<Path>>(
    dir: P,
    profile: SpanProfile,
    definition: &BridgeDefinition,
) -> Result<(), LoadError> {
    let dir = dir.as_ref();
    let write = |stem: &str, contents: String| {
        let path = data_file(dir, stem, profile);
        fs::write(&path, contents).map_err(|source| LoadError::Io { path, source })
    };

    let mut nodes = String::new();
    for (id, position) in &definition.nodes {
        writeln!(nodes, "{id} {} {}", position.x, position.y)
            .expect("writing to string cannot fail");
    }
    let mut members = String::new();
    let mut sections = String::new();
    for member in &definition.members {
        writeln!(members, "{} {} {}", member.id, member.start, member.end)
            .expect("writing to string cannot fail");
        if let Some(s) = member.section {
            writeln!(
                sections,
                "{} {} {} {} {}",
                member.id, s.height, s.flange_thickness, s.web_thickness, s.flange_width
            )
            .expect("writing to string cannot fail");
        }
    }

    write(NODES_STEM, nodes)?;
    write(MEMBERS_STEM, members)?;
    write(SECTIONS_STEM, sections)
}
