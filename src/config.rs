//! TOML job files describing a resampling run.
//!
//! ```toml
//! [[input]]
//! path = "uv_vis.parquet"
//! label = "uv-vis"
//!
//! [axis]
//! range = [350.0, 900.0]
//! points = 1101
//!
//! [output]
//! path = "merged.parquet"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    #[serde(rename = "input")]
    pub inputs: Vec<InputConfig>,
    pub axis: AxisSpec,
    #[serde(default)]
    pub output: OutputConfig,
}

/// One dataset to load and merge.
#[derive(Debug, Deserialize)]
pub struct InputConfig {
    pub path: PathBuf,
    /// Written to the `source` column. Default: the file stem.
    pub label: Option<String>,
}

impl InputConfig {
    pub fn label(&self) -> String {
        self.label.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string())
        })
    }
}

/// Target axis: an evenly spaced range or an explicit list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AxisSpec {
    Range { range: [f64; 2], points: usize },
    List { values: Vec<f64> },
}

impl AxisSpec {
    /// Expand into the list of target wavelengths.
    pub fn wavelengths(&self) -> Result<Vec<f64>> {
        match self {
            AxisSpec::Range {
                range: [start, stop],
                points,
            } => {
                if !start.is_finite() || !stop.is_finite() {
                    bail!("axis range must be finite, got [{start}, {stop}]");
                }
                if start >= stop {
                    bail!("axis range start {start} must be below stop {stop}");
                }
                if *points < 2 {
                    bail!("axis range needs at least 2 points, got {points}");
                }
                let step = (stop - start) / (*points - 1) as f64;
                let mut axis: Vec<f64> = (0..*points).map(|i| start + i as f64 * step).collect();
                // pin the end exactly; accumulated rounding could leave it short
                axis[*points - 1] = *stop;
                Ok(axis)
            }
            AxisSpec::List { values } => {
                if values.is_empty() {
                    bail!("axis list is empty");
                }
                if let Some(v) = values.iter().find(|v| !v.is_finite()) {
                    bail!("axis list contains non-finite value {v}");
                }
                if values.windows(2).any(|w| w[1] < w[0]) {
                    log::warn!("axis list is not ascending; resampling will rescan from the start");
                }
                Ok(values.clone())
            }
        }
    }
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Destination file; the extension picks the format.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("resampled.parquet")
}

impl JobConfig {
    /// Join every relative input / output path onto `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for input in &mut self.inputs {
            input.path = base.join(&input.path);
        }
        self.output.path = base.join(&self.output.path);
    }

    /// Check everything that can be checked without reading input files.
    /// Returns the expanded axis.
    pub fn validate(&self) -> Result<Vec<f64>> {
        if self.inputs.is_empty() {
            bail!("job lists no [[input]] files");
        }
        self.axis.wavelengths().context("invalid [axis]")
    }
}

pub fn parse_config(text: &str) -> Result<JobConfig> {
    toml::from_str(text).context("parsing job configuration")
}

/// Load and parse a TOML job configuration file. Relative input and
/// output paths are taken relative to the file's directory.
pub fn load_config(path: &Path) -> Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut job = parse_config(&content)?;
    if let Some(base) = path.parent() {
        job.resolve_paths(base);
    }
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_range_job() {
        let job = parse_config(
            r#"
            [[input]]
            path = "data/uv_vis.parquet"

            [[input]]
            path = "nir.csv"
            label = "nir"

            [axis]
            range = [400.0, 500.0]
            points = 101

            [output]
            path = "merged.json"
            "#,
        )
        .unwrap();

        assert_eq!(job.inputs.len(), 2);
        assert_eq!(job.inputs[0].label(), "uv_vis");
        assert_eq!(job.inputs[1].label(), "nir");
        assert_eq!(job.output.path, PathBuf::from("merged.json"));

        let axis = job.validate().unwrap();
        assert_eq!(axis.len(), 101);
        assert_eq!(axis[0], 400.0);
        assert_eq!(axis[100], 500.0);
        assert!((axis[50] - 450.0).abs() < 1e-9);
        assert!(axis.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn parses_list_axis_and_default_output() {
        let job = parse_config(
            r#"
            [[input]]
            path = "a.json"
            [axis]
            values = [400.0, 405.5, 410.0]
            "#,
        )
        .unwrap();
        assert_eq!(job.output.path, PathBuf::from("resampled.parquet"));
        assert_eq!(job.validate().unwrap(), vec![400.0, 405.5, 410.0]);
    }

    #[test]
    fn unsorted_list_is_accepted() {
        let spec = AxisSpec::List {
            values: vec![410.0, 400.0],
        };
        assert_eq!(spec.wavelengths().unwrap(), vec![410.0, 400.0]);
    }

    #[test]
    fn rejects_bad_axes() {
        let bad = [
            AxisSpec::Range { range: [500.0, 400.0], points: 10 },
            AxisSpec::Range { range: [400.0, 500.0], points: 1 },
            AxisSpec::Range { range: [400.0, f64::INFINITY], points: 10 },
            AxisSpec::List { values: vec![] },
            AxisSpec::List { values: vec![400.0, f64::NAN] },
        ];
        for spec in &bad {
            assert!(spec.wavelengths().is_err(), "{spec:?} should be rejected");
        }
    }

    #[test]
    fn job_without_inputs_is_invalid() {
        let job = parse_config("input = []\n[axis]\nvalues = [1.0]\n").unwrap();
        assert!(job.validate().is_err());
    }

    #[test]
    fn load_resolves_paths_next_to_job_file() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = dir.path().join("job.toml");
        std::fs::write(
            &job_path,
            "[[input]]\npath = \"vis.csv\"\n\n\
             [[input]]\npath = \"/data/nir.parquet\"\n\n\
             [axis]\nvalues = [500.0]\n\n\
             [output]\npath = \"out/merged.json\"\n",
        )
        .unwrap();

        let job = load_config(&job_path).unwrap();
        assert_eq!(job.inputs[0].path, dir.path().join("vis.csv"));
        assert_eq!(job.inputs[1].path, PathBuf::from("/data/nir.parquet"));
        assert_eq!(job.inputs[0].label(), "vis");
        assert_eq!(job.output.path, dir.path().join("out/merged.json"));
    }

    #[test]
    fn missing_axis_is_a_parse_error() {
        assert!(parse_config("[[input]]\npath = \"a.csv\"\n").is_err());
    }
}
