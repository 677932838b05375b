//! Optional `config.toml` describing the course catalog and logging options.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::models::Course;
use crate::store::CourseCatalog;

const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "student-records.log";
/// Filter directive used when neither the CLI nor the config picks one.
pub const DEFAULT_LOG_FILTER: &str = "student_records=info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("course id {0:?} is listed more than once")]
    DuplicateCourse(String),
    #[error("could not locate the user's config directory")]
    NoConfigDir,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `student_records=debug`.
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.check_courses()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Load `explicit` when given (it must exist), otherwise the default
    /// location, falling back to defaults when that file is absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let path = default_config_path()?;
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Configured courses, or the built-in catalog when none are listed.
    pub fn catalog(&self) -> CourseCatalog {
        if self.courses.is_empty() {
            CourseCatalog::default()
        } else {
            CourseCatalog::new(self.courses.clone())
        }
    }

    fn check_courses(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for course in &self.courses {
            if !seen.insert(course.id.as_str()) {
                return Err(ConfigError::DuplicateCourse(course.id.clone()));
            }
        }
        Ok(())
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("", "", "student-records").ok_or(ConfigError::NoConfigDir)
}

/// `<config dir>/student-records/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
}

/// `<data dir>/student-records/student-records.log`.
pub fn default_log_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.data_dir().join(LOG_FILE_NAME))
}
