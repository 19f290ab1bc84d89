//! Layered configuration.
//!
//! # Resolution
//!
//! Precedence for scalar settings (highest wins):
//! 1. CLI flags ([`Overrides`])
//! 2. `HINLINE_INCLUDE_DIR` env var (include directory only)
//! 3. project file `./.hinline.toml`
//! 4. user file `<config_dir>/hinline/config.toml`
//! 5. defaults: `<home>/include`, resolved markers
//!
//! Exclude patterns accumulate across layers in the order user, project, CLI.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::assemble::MarkerStyle;

/// Name of the project-level config file.
pub const PROJECT_FILE: &str = ".hinline.toml";

/// Env var overriding the include directory.
pub const INCLUDE_DIR_ENV: &str = "HINLINE_INCLUDE_DIR";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid exclude pattern `{pattern}`")]
    InvalidExclude {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// ---------------------------------------------------------------------------
// ExcludeFilter
// ---------------------------------------------------------------------------

/// Compiled exclude patterns, matched against normalized header paths.
#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    patterns: Vec<Regex>,
}

impl ExcludeFilter {
    /// A filter that excludes nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Compile `patterns`. Blank patterns are skipped; an empty regex would
    /// otherwise exclude every header.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidExclude`] for the first malformed pattern.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(AsRef::as_ref)
            .filter(|p| !p.trim().is_empty())
            .map(|p| {
                Regex::new(p).map_err(|source| ConfigError::InvalidExclude {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(path))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Config files
// ---------------------------------------------------------------------------

/// One config file layer. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub include_dir: Option<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub markers: Option<MarkerStyle>,
}

/// Values passed explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub include_dir: Option<String>,
    pub excludes: Vec<String>,
    pub markers: Option<MarkerStyle>,
}

/// Fully resolved settings of one inlining run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineConfig {
    pub include_dir: String,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub markers: MarkerStyle,
}

impl InlineConfig {
    #[must_use]
    pub fn new(include_dir: impl Into<String>) -> Self {
        Self {
            include_dir: include_dir.into(),
            excludes: Vec::new(),
            markers: MarkerStyle::default(),
        }
    }

    /// Compile this config's exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidExclude`] for a malformed pattern.
    pub fn exclude_filter(&self) -> Result<ExcludeFilter, ConfigError> {
        ExcludeFilter::compile(&self.excludes)
    }
}

/// Load `<project_root>/.hinline.toml`, or an empty layer if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ConfigFile, ConfigError> {
    load_file(&project_root.join(PROJECT_FILE))
}

/// Load `<config_dir>/hinline/config.toml`, or an empty layer if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigFile, ConfigError> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    load_file(&config_dir.join("hinline/config.toml"))
}

fn load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "loaded config file");
    toml::from_str::<ConfigFile>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the effective config for a run started in `project_root`.
///
/// # Errors
///
/// Returns an error if a config file is unreadable or malformed, or if any
/// exclude pattern does not compile.
pub fn resolve_config(project_root: &Path, overrides: &Overrides) -> Result<InlineConfig, ConfigError> {
    let user = load_user_config()?;
    let project = load_project_config(project_root)?;
    let env_dir = env::var(INCLUDE_DIR_ENV).ok();
    resolve(overrides, env_dir, &project, &user)
}

/// Merge layers. Pure; used by [`resolve_config`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidExclude`] if the merged patterns do not
/// compile.
pub fn resolve(
    overrides: &Overrides,
    env_dir: Option<String>,
    project: &ConfigFile,
    user: &ConfigFile,
) -> Result<InlineConfig, ConfigError> {
    let include_dir = overrides
        .include_dir
        .clone()
        .or_else(|| env_dir.filter(|d| !d.trim().is_empty()))
        .or_else(|| project.include_dir.clone())
        .or_else(|| user.include_dir.clone())
        .unwrap_or_else(default_include_dir);

    let excludes: Vec<String> = user
        .excludes
        .iter()
        .chain(&project.excludes)
        .chain(&overrides.excludes)
        .cloned()
        .collect();

    let markers = overrides
        .markers
        .or(project.markers)
        .or(user.markers)
        .unwrap_or_default();

    let config = InlineConfig {
        include_dir,
        excludes,
        markers,
    };
    // Fail at startup, before any header is read.
    config.exclude_filter()?;
    Ok(config)
}

/// `<home>/include`, or `include` when no home directory is known.
#[must_use]
pub fn default_include_dir() -> String {
    dirs::home_dir()
        .map_or_else(|| PathBuf::from("include"), |home| home.join("include"))
        .to_string_lossy()
        .into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
