//! JSON configuration of an analysis run.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::bridge::{Bridge, BridgeParameters};
use crate::envelope::{LoadPattern, MAX_LANE_LENGTH};
use crate::errors::LoadError;
use crate::geometry::{section, Section};
use crate::loader::load_definition;
use crate::presets::{reference_geometry, STEEL_MODULUS};
use crate::profile::SpanProfile;

/// A concentrated axle load within a lane pattern.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxleConfig {
    /// Distance from the front of the pattern.
    pub offset: f64,
    /// Axle weight.
    pub force: f64,
}

/// Lane load made of a uniform stretch and any number of axles.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadPatternConfig {
    /// Intensity of the uniform stretch.
    pub uniform_intensity: f64,
    /// Length of the uniform stretch, measured from the front.
    pub uniform_length: f64,
    /// Concentrated axle loads.
    pub axles: Vec<AxleConfig>,
}

/// Check that a lane distance is finite and within `0..=MAX_LANE_LENGTH`.
fn lane_distance(name: &str, value: f64) -> Result<f64, LoadError> {
    if (0.0..=MAX_LANE_LENGTH).contains(&value) {
        Ok(value)
    } else {
        Err(LoadError::InvalidLane(format!(
            "{name} must lie between 0 and {MAX_LANE_LENGTH}, found {value}"
        )))
    }
}

/// Check that a lane load is finite.
fn lane_load(name: &str, value: f64) -> Result<f64, LoadError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoadError::InvalidLane(format!("{name} must be finite, found {value}")))
    }
}

impl LoadPatternConfig {
    /// Discretise the configured lane.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidLane`] when a length or offset is negative,
    /// not finite or longer than [`MAX_LANE_LENGTH`], or when a load is not
    /// finite.
    pub fn to_pattern(&self) -> Result<LoadPattern, LoadError> {
        let mut pattern = LoadPattern::uniform(
            lane_load("uniform_intensity", self.uniform_intensity)?,
            lane_distance("uniform_length", self.uniform_length)?,
        );
        for axle in &self.axles {
            pattern = pattern.with_axle(
                lane_distance("axle offset", axle.offset)?,
                lane_load("axle force", axle.force)?,
            );
        }
        Ok(pattern)
    }
}

/// Everything needed to build, sweep and post-process one bridge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Support arrangement.
    pub profile: SpanProfile,
    /// Young's modulus.
    pub modulus: f64,
    /// Magnitude of the moving load.
    pub unit_load: f64,
    /// Distributed self-weight intensity.
    pub self_weight: f64,
    /// Bottom-chord node ids; the reference numbering when absent.
    pub bottom_chord: Option<Vec<usize>>,
    /// Directory holding the bridge data files; the built-in geometry when absent.
    pub data_dir: Option<PathBuf>,
    /// Section used by every member of the built-in geometry.
    pub section: Section,
    /// Lane load for the worst-case search; skipped when absent.
    pub load_pattern: Option<LoadPatternConfig>,
    /// Where to write the influence lines as JSON.
    pub output: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            profile: SpanProfile::SingleSpan,
            modulus: STEEL_MODULUS,
            unit_load: 1.0,
            self_weight: 0.0,
            bottom_chord: None,
            data_dir: None,
            section: section(1.0, 0.02, 0.01, 0.3),
            load_pattern: None,
            output: None,
        }
    }
}

impl AnalysisConfig {
    /// Read a configuration from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] when the file cannot be read and
    /// [`LoadError::Json`] when it is not a valid configuration.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents)?;
        info!("loaded analysis configuration from {}", path.display());
        Ok(config)
    }

    /// Build the configured bridge.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the data files cannot be read or the
    /// geometry does not form a valid bridge.
    pub fn build_bridge(&self) -> Result<Bridge, LoadError> {
        let (preset, reference_chord) = reference_geometry(self.profile, self.section);
        let definition = match &self.data_dir {
            Some(dir) => load_definition(dir, self.profile)?,
            None => preset,
        };
        let parameters = BridgeParameters {
            modulus: self.modulus,
            unit_load: self.unit_load,
            self_weight: self.self_weight,
            bottom_chord: self.bottom_chord.clone().unwrap_or(reference_chord),
        };
        Ok(Bridge::new(self.profile, &definition, parameters)?)
    }

    /// The configured lane load, if any.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidLane`] when the lane is out of range.
    pub fn load_pattern(&self) -> Result<Option<LoadPattern>, LoadError> {
        self.load_pattern
            .as_ref()
            .map(LoadPatternConfig::to_pattern)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::AnalysisError;
    use crate::loader::save_definition;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "profile": "two_span", "self_weight": 5.0 }"#)
                .expect("valid json");
        assert_eq!(config.profile, SpanProfile::TwoSpan);
        assert_relative_eq!(config.self_weight, 5.0);
        assert_relative_eq!(config.modulus, STEEL_MODULUS);
        assert!(config.load_pattern.is_none());
    }

    #[test]
    fn lane_combines_uniform_load_and_axles() {
        let config = LoadPatternConfig {
            uniform_intensity: 10.0,
            uniform_length: 2.0,
            axles: vec![AxleConfig {
                offset: 0.5,
                force: 100.0,
            }],
        };
        let pattern = config.to_pattern().expect("valid lane");
        assert_eq!(pattern.len(), 20);
        assert_relative_eq!(pattern.samples()[5], 101.0, epsilon = 1.0e-9);
        assert_relative_eq!(pattern.samples().iter().sum::<f64>(), 120.0, epsilon = 1.0e-9);
    }

    #[test]
    fn out_of_range_lanes_are_rejected() {
        let far_axle = LoadPatternConfig {
            axles: vec![AxleConfig {
                offset: 1.0e300,
                force: 100.0,
            }],
            ..LoadPatternConfig::default()
        };
        assert!(matches!(far_axle.to_pattern(), Err(LoadError::InvalidLane(_))));

        let endless = LoadPatternConfig {
            uniform_intensity: 1.0,
            uniform_length: f64::INFINITY,
            axles: Vec::new(),
        };
        assert!(matches!(endless.to_pattern(), Err(LoadError::InvalidLane(_))));

        let backwards = LoadPatternConfig {
            uniform_length: -4.0,
            ..LoadPatternConfig::default()
        };
        assert!(matches!(backwards.to_pattern(), Err(LoadError::InvalidLane(_))));

        let heavy = LoadPatternConfig {
            axles: vec![AxleConfig {
                offset: 1.0,
                force: f64::NAN,
            }],
            ..LoadPatternConfig::default()
        };
        let config = AnalysisConfig {
            load_pattern: Some(heavy),
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.load_pattern(), Err(LoadError::InvalidLane(_))));
    }

    #[test]
    fn reads_configuration_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{ "unit_load": 2.5, "load_pattern": {{ "uniform_intensity": 1.0, "uniform_length": 4.0 }} }}"#
        )
        .expect("write");
        let config = AnalysisConfig::from_path(file.path()).expect("config");
        assert_relative_eq!(config.unit_load, 2.5);
        let pattern = config.load_pattern().expect("valid lane");
        assert_eq!(pattern.map(|p| p.len()), Some(40));
    }

    #[test]
    fn invalid_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "{{ not json").expect("write");
        assert!(matches!(
            AnalysisConfig::from_path(file.path()),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn builds_bridge_from_data_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AnalysisConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..AnalysisConfig::default()
        };
        let (definition, _) = reference_geometry(config.profile, config.section);
        save_definition(dir.path(), config.profile, &definition).expect("save");
        let bridge = config.build_bridge().expect("bridge");
        assert_eq!(bridge.node_count(), 16);
        assert_eq!(bridge.member_count(), 29);
    }

    #[test]
    fn invalid_modulus_surfaces_as_analysis_error() {
        let config = AnalysisConfig {
            modulus: -1.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.build_bridge(),
            Err(LoadError::Analysis(AnalysisError::NonPositiveModulus(_)))
        ));
    }
}
