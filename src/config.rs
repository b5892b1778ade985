//! Configuration management for pipewright
//!
//! This module provides a configuration system that loads settings from
//! environment variables with sensible defaults. Configuration covers the
//! build root, the targeted game version, and the locations of the upstream
//! repositories and downloadable tools.
//!
//! # Environment Variables
//!
//! - `PIPEWRIGHT_ROOT`: Build root directory - default: current directory
//! - `PIPEWRIGHT_GAME_VERSION`: Game version to build - default: "1.8"
//! - `PIPEWRIGHT_MAVEN_VERSION`: Maven distribution version - default: "3.2.3"
//! - `PIPEWRIGHT_REPO_BASE`: Base URL of the upstream repositories -
//!   default: "https://hub.spigotmc.org/stash/scm/spigot"
//! - `PIPEWRIGHT_VANILLA_BASE`: Base URL of the vanilla server downloads -
//!   default: "https://s3.amazonaws.com/Minecraft.Download/versions"
//! - `PIPEWRIGHT_FORMATTER_BASE`: Base URL of the formatter archives -
//!   default: "http://www.tiobe.com/content/products/jacobe"
//! - `PIPEWRIGHT_MAVEN_BASE`: Base URL of the Maven distribution zip -
//!   default: "http://static.spigotmc.org/maven"
//! - `PIPEWRIGHT_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use pipewright::PipewrightConfig;
//!
//! let config = PipewrightConfig::default();
//! config.validate().expect("Invalid configuration");
//!
//! println!("building game version {}", config.game_version);
//! ```

use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Default values for configuration
const DEFAULT_GAME_VERSION: &str = "1.8";
const DEFAULT_MAVEN_VERSION: &str = "3.2.3";
const DEFAULT_REPO_BASE: &str = "https://hub.spigotmc.org/stash/scm/spigot";
const DEFAULT_VANILLA_BASE: &str = "https://s3.amazonaws.com/Minecraft.Download/versions";
const DEFAULT_FORMATTER_BASE: &str = "http://www.tiobe.com/content/products/jacobe";
const DEFAULT_MAVEN_BASE: &str = "http://static.spigotmc.org/maven";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value was empty
    #[error("{field} must not be empty")]
    EmptyValue { field: &'static str },

    /// A URL did not look like a URL
    #[error("{field} must start with http:// or https://, got: {value}")]
    InvalidUrl { field: &'static str, value: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Main configuration structure for pipewright
///
/// Construct with `Default::default()` to load from environment variables
/// with fallback defaults, then adjust fields (e.g. from CLI flags) and call
/// [`PipewrightConfig::validate`] before handing it to the pipeline.
#[derive(Debug, Clone)]
pub struct PipewrightConfig {
    /// Directory the build runs in; repositories, tools, and the work
    /// directory all live underneath it
    pub root: PathBuf,

    /// Game version to build (embedded in artifact and mapping file names)
    pub game_version: String,

    /// Version of the Maven distribution to download when none is present
    pub maven_version: String,

    /// Base URL the four upstream repositories are cloned from
    pub repo_base: String,

    /// Base URL the vanilla server jar is downloaded from
    pub vanilla_base: String,

    /// Base URL the formatter archives are downloaded from
    pub formatter_base: String,

    /// Base URL the Maven distribution zip is downloaded from
    pub maven_base: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for PipewrightConfig {
    /// Creates a new configuration by loading from environment variables with
    /// defaults for any missing values.
    fn default() -> Self {
        let root = env::var("PIPEWRIGHT_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let game_version = env::var("PIPEWRIGHT_GAME_VERSION")
            .unwrap_or_else(|_| DEFAULT_GAME_VERSION.to_string());

        let maven_version = env::var("PIPEWRIGHT_MAVEN_VERSION")
            .unwrap_or_else(|_| DEFAULT_MAVEN_VERSION.to_string());

        let repo_base =
            env::var("PIPEWRIGHT_REPO_BASE").unwrap_or_else(|_| DEFAULT_REPO_BASE.to_string());

        let vanilla_base = env::var("PIPEWRIGHT_VANILLA_BASE")
            .unwrap_or_else(|_| DEFAULT_VANILLA_BASE.to_string());

        let formatter_base = env::var("PIPEWRIGHT_FORMATTER_BASE")
            .unwrap_or_else(|_| DEFAULT_FORMATTER_BASE.to_string());

        let maven_base =
            env::var("PIPEWRIGHT_MAVEN_BASE").unwrap_or_else(|_| DEFAULT_MAVEN_BASE.to_string());

        let log_level = env::var("PIPEWRIGHT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            root,
            game_version,
            maven_version,
            repo_base,
            vanilla_base,
            formatter_base,
            maven_base,
            log_level,
        }
    }
}

impl PipewrightConfig {
    /// Validates the configuration
    ///
    /// Checks that versions are non-empty, URLs look like URLs, and the log
    /// level is one of the accepted values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_version.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                field: "game_version",
            });
        }
        if self.maven_version.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                field: "maven_version",
            });
        }

        for (field, value) in [
            ("repo_base", &self.repo_base),
            ("vanilla_base", &self.vanilla_base),
            ("formatter_base", &self.formatter_base),
            ("maven_base", &self.maven_base),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// URL a named upstream repository is cloned from
    pub fn repo_url(&self, name: &str) -> String {
        format!("{}/{}.git", self.repo_base, name.to_lowercase())
    }

    /// URL of the vanilla server jar for the configured game version
    pub fn vanilla_jar_url(&self) -> String {
        format!(
            "{base}/{v}/minecraft_server.{v}.jar",
            base = self.vanilla_base,
            v = self.game_version
        )
    }

    /// URL of the formatter archive for the current platform
    pub fn formatter_archive_url(&self) -> String {
        if cfg!(windows) {
            format!("{}/jacobe.win32.zip", self.formatter_base)
        } else {
            format!("{}/jacobe.linux.tar.gz", self.formatter_base)
        }
    }

    /// URL of the Maven binary distribution zip
    pub fn maven_dist_url(&self) -> String {
        format!(
            "{}/apache-maven-{}-bin.zip",
            self.maven_base, self.maven_version
        )
    }
}

impl fmt::Display for PipewrightConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipewright Configuration:")?;
        writeln!(f, "  Root: {}", self.root.display())?;
        writeln!(f, "  Game Version: {}", self.game_version)?;
        writeln!(f, "  Maven Version: {}", self.maven_version)?;
        writeln!(f, "  Repository Base: {}", self.repo_base)?;
        writeln!(f, "  Vanilla Base: {}", self.vanilla_base)?;
        writeln!(f, "  Formatter Base: {}", self.formatter_base)?;
        writeln!(f, "  Maven Base: {}", self.maven_base)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
