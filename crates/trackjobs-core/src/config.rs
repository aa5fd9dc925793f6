use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const DEFAULT_TAIL: usize = 5;
pub const DEFAULT_MAX_WIDTH: usize = 80;
pub const DEFAULT_VERBOSE_WIDTH: usize = 500;

/// Top-level config (trackjobs.toml + TRACKJOBS_* env overrides).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackJobsConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Location of the job table file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Which scheduler the default query command is generated for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulerFlavor {
    /// `squeue` is written to the command file when none exists.
    #[default]
    Slurm,
    /// No built-in command; the command file must be provided by the user.
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// File holding the queue-query command (program on line one, one argument per line).
    #[serde(default = "default_command_file")]
    pub command_file: String,
    #[serde(default)]
    pub flavor: SchedulerFlavor,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            command_file: default_command_file(),
            flavor: SchedulerFlavor::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Maximum characters per text cell in normal output.
    #[serde(default = "default_max_width")]
    pub max_width: usize,
    /// Maximum characters per text cell with `--verbose`.
    #[serde(default = "default_verbose_width")]
    pub verbose_width: usize,
    /// Rows shown by `tail` when `-n` is not given.
    #[serde(default = "default_tail")]
    pub tail: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            verbose_width: DEFAULT_VERBOSE_WIDTH,
            tail: DEFAULT_TAIL,
        }
    }
}

fn default_max_width() -> usize {
    DEFAULT_MAX_WIDTH
}
fn default_verbose_width() -> usize {
    DEFAULT_VERBOSE_WIDTH
}
fn default_tail() -> usize {
    DEFAULT_TAIL
}
fn home_dir() -> String {
    std::env::var("HOME").unwrap_or_else(|_| ".".to_string())
}
fn default_db_path() -> String {
    format!("{}/.trackjobs/jobs.db", home_dir())
}
fn default_command_file() -> String {
    format!("{}/.config/track_jobs/check_status_command", home_dir())
}
fn default_config_path() -> String {
    format!("{}/.trackjobs/trackjobs.toml", home_dir())
}

impl TrackJobsConfig {
    /// Load config from a TOML file with TRACKJOBS_* env var overrides.
    ///
    /// The file is optional; without it the defaults apply. Nested keys in
    /// environment variables are separated by a double underscore, e.g.
    /// `TRACKJOBS_DATABASE__PATH`.
    pub fn load(config_path: Option<&str>) -> Result<Self, CoreError> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        Self::figment(&path)
            .extract()
            .map_err(|e| CoreError::Config(e.to_string()))
    }

    fn figment(path: &str) -> Figment {
        Figment::from(Serialized::defaults(TrackJobsConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("TRACKJOBS_").split("__"))
    }
}
