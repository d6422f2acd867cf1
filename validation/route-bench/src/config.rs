//! Configuration loading and resolution.
//!
//! Values come from three layers, highest priority first: command line flags
//! (or their environment variables), an optional YAML scenario file, and the
//! built-in defaults below.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::coords::CoordinateSource;
use crate::error::{BenchError, BenchResult};
use crate::query::{QueryKind, DEFAULT_MAX_DURATION_SECS};
use crate::report::ReportFormat;

pub const DEFAULT_TARGET: &str = "tcp://127.0.0.1:6000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Parameters of one benchmark run. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    /// How long to run; zero means a single query.
    pub duration: Duration,
    /// Number of concurrent workers in sustained mode.
    pub concurrency: usize,
    /// Per-request deadline handed to the routing client.
    pub timeout: Duration,
    pub quiet: bool,
    /// Seed for the process generator; derived from the clock when absent.
    pub seed: Option<u64>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            duration: Duration::ZERO,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            quiet: false,
            seed: None,
        }
    }
}

impl BenchmarkConfig {
    pub fn is_single_shot(&self) -> bool {
        self.duration.is_zero()
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.concurrency == 0 {
            return Err(BenchError::Configuration(
                "concurrency must be > 0".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(BenchError::Configuration("timeout must be > 0".to_string()));
        }
        Ok(())
    }
}

/// A benchmark scenario loaded from YAML.
///
/// Every field is optional; durations use the same syntax as the command
/// line (`500ms`, `10s`, `2m`).
///
/// ```yaml
/// name: paris-car-matrix
/// target: tcp://kraken:6000
/// bench: 30s
/// concurrency: 8
/// coords_file: coords/paris.txt
/// max_duration: 1200
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub timeout: Option<String>,
    #[serde(default)]
    pub bench: Option<String>,
    #[serde(default)]
    pub concurrency: Option<usize>,
    #[serde(default)]
    pub quiet: Option<bool>,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Relative paths are resolved against the scenario file's directory.
    #[serde(default)]
    pub coords_file: Option<PathBuf>,
    #[serde(default)]
    pub coordinates: Vec<String>,
    #[serde(default)]
    pub max_duration: Option<u32>,
    #[serde(default)]
    pub report: Option<String>,
}

impl Scenario {
    /// Load a scenario from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref();
        let scenario_error = |message: String| BenchError::Scenario {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| scenario_error(e.to_string()))?;
        let mut scenario: Scenario =
            serde_yaml::from_str(&content).map_err(|e| scenario_error(e.to_string()))?;

        if let (Some(file), Some(dir)) = (&scenario.coords_file, path.parent()) {
            if file.is_relative() {
                scenario.coords_file = Some(dir.join(file));
            }
        }

        Ok(scenario)
    }
}

/// Values given explicitly on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub target: Option<String>,
    pub timeout: Option<Duration>,
    pub bench: Option<Duration>,
    pub concurrency: Option<usize>,
    /// `Some(false)` turns off a scenario's `quiet: true`.
    pub quiet: Option<bool>,
    pub seed: Option<u64>,
    pub coords_file: Option<PathBuf>,
    pub coordinates: Vec<String>,
    pub max_duration: Option<u32>,
    pub report: Option<ReportFormat>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub target: String,
    pub query: QueryKind,
    pub coords: CoordinateSource,
    pub bench: BenchmarkConfig,
    pub report: ReportFormat,
}

impl Overrides {
    /// Merge with an optional scenario and the defaults, then validate.
    ///
    /// `matrix` selects the query kind; `max_duration` only applies to it.
    /// An explicit coordinate file wins over positional coordinates, and
    /// anything given here wins over the scenario.
    pub fn resolve(self, scenario: Option<&Scenario>, matrix: bool) -> BenchResult<RunSettings> {
        let default_scenario = Scenario::default();
        let scenario = scenario.unwrap_or(&default_scenario);

        let timeout = match self.timeout {
            Some(t) => t,
            None => parse_optional_duration("timeout", scenario.timeout.as_deref())?
                .unwrap_or(DEFAULT_TIMEOUT),
        };
        let duration = match self.bench {
            Some(d) => d,
            None => parse_optional_duration("bench", scenario.bench.as_deref())?
                .unwrap_or(Duration::ZERO),
        };

        let bench = BenchmarkConfig {
            duration,
            concurrency: self
                .concurrency
                .or(scenario.concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY),
            timeout,
            quiet: self.quiet.or(scenario.quiet).unwrap_or(false),
            seed: self.seed.or(scenario.seed),
        };
        bench.validate()?;

        let coords = if let Some(file) = self.coords_file {
            CoordinateSource::File(file)
        } else if !self.coordinates.is_empty() {
            CoordinateSource::Args(self.coordinates)
        } else if let Some(file) = &scenario.coords_file {
            CoordinateSource::File(file.clone())
        } else {
            CoordinateSource::Args(scenario.coordinates.clone())
        };

        let query = if matrix {
            QueryKind::Matrix {
                max_duration: self
                    .max_duration
                    .or(scenario.max_duration)
                    .unwrap_or(DEFAULT_MAX_DURATION_SECS),
            }
        } else {
            QueryKind::DirectPath
        };

        let report = match (self.report, &scenario.report) {
            (Some(report), _) => report,
            (None, Some(s)) => s.parse().map_err(BenchError::Configuration)?,
            (None, None) => ReportFormat::default(),
        };

        Ok(RunSettings {
            target: self
                .target
                .or_else(|| scenario.target.clone())
                .unwrap_or_else(|| DEFAULT_TARGET.to_string()),
            query,
            coords,
            bench,
            report,
        })
    }
}

fn parse_optional_duration(field: &str, value: Option<&str>) -> BenchResult<Option<Duration>> {
    value
        .map(|v| {
            humantime::parse_duration(v.trim()).map_err(|e| {
                BenchError::Configuration(format!("invalid {} duration '{}': {}", field, v, e))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Overrides::default().resolve(None, false).unwrap();

        assert_eq!(settings.target, "tcp://127.0.0.1:6000");
        assert_eq!(settings.query, QueryKind::DirectPath);
        assert_eq!(settings.bench, BenchmarkConfig::default());
        assert!(settings.bench.is_single_shot());
        assert_eq!(settings.coords, CoordinateSource::Args(vec![]));
        assert_eq!(settings.report, ReportFormat::Table);
    }

    #[test]
    fn test_matrix_default_max_duration() {
        let settings = Overrides::default().resolve(None, true).unwrap();
        assert_eq!(settings.query, QueryKind::Matrix { max_duration: 1800 });
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let overrides = Overrides {
            concurrency: Some(0),
            ..Overrides::default()
        };
        let err = overrides.resolve(None, false).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    fn test_coords_file_overrides_positional() {
        let overrides = Overrides {
            coords_file: Some(PathBuf::from("coords.txt")),
            coordinates: vec!["A".to_string()],
            ..Overrides::default()
        };
        let settings = overrides.resolve(None, false).unwrap();
        assert_eq!(
            settings.coords,
            CoordinateSource::File(PathBuf::from("coords.txt"))
        );
    }

    #[test]
    fn test_cli_wins_over_scenario() {
        let scenario = Scenario {
            target: Some("tcp://scenario:1".to_string()),
            bench: Some("30s".to_string()),
            concurrency: Some(8),
            coordinates: vec!["S".to_string()],
            max_duration: Some(900),
            ..Scenario::default()
        };
        let overrides = Overrides {
            target: Some("tcp://cli:2".to_string()),
            concurrency: Some(2),
            coordinates: vec!["C".to_string()],
            ..Overrides::default()
        };

        let settings = overrides.resolve(Some(&scenario), true).unwrap();
        assert_eq!(settings.target, "tcp://cli:2");
        assert_eq!(settings.bench.concurrency, 2);
        assert_eq!(settings.bench.duration, Duration::from_secs(30));
        assert_eq!(
            settings.coords,
            CoordinateSource::Args(vec!["C".to_string()])
        );
        assert_eq!(settings.query, QueryKind::Matrix { max_duration: 900 });
    }

    #[test]
    fn test_quiet_precedence() {
        let scenario = Scenario {
            quiet: Some(true),
            ..Scenario::default()
        };

        let inherited = Overrides::default().resolve(Some(&scenario), false).unwrap();
        assert!(inherited.bench.quiet);

        let disabled = Overrides {
            quiet: Some(false),
            ..Overrides::default()
        };
        let settings = disabled.resolve(Some(&scenario), false).unwrap();
        assert!(!settings.bench.quiet);

        let enabled = Overrides {
            quiet: Some(true),
            ..Overrides::default()
        };
        assert!(enabled.resolve(None, false).unwrap().bench.quiet);
    }

    #[test]
    fn test_bad_scenario_duration_rejected() {
        let scenario = Scenario {
            timeout: Some("soon".to_string()),
            ..Scenario::default()
        };
        let err = Overrides::default()
            .resolve(Some(&scenario), false)
            .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_scenario_from_file_resolves_relative_coords() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "name: smoke\nbench: 2s\nconcurrency: 3\ncoords_file: paris.txt\nreport: json"
        )
        .unwrap();

        let scenario = Scenario::from_file(&path).unwrap();
        assert_eq!(scenario.name.as_deref(), Some("smoke"));
        assert_eq!(scenario.coords_file, Some(dir.path().join("paris.txt")));

        let settings = Overrides::default().resolve(Some(&scenario), false).unwrap();
        assert_eq!(settings.report, ReportFormat::Json);
        assert_eq!(settings.bench.concurrency, 3);
    }

    #[test]
    fn test_scenario_unknown_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "concurency: 3\n").unwrap();

        let err = Scenario::from_file(&path).unwrap_err();
        assert!(matches!(err, BenchError::Scenario { .. }));
    }
}
