//! Site configuration for sitecfg.
//!
//! Parses the site configuration file (TOML, YAML or JSON) with serde,
//! validates it, and provides auto-discovery of the file in parent
//! directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Every string value of the loaded configuration (title, description,
//! `lastUpdated` label, head attributes, nav text and links, sidebar titles,
//! paths and children) may reference environment variables as `${VAR}` or
//! `${VAR:-default}`. See [`SiteConfig::expanded`].

mod expand;
mod format;
mod schema;
mod validate;

use std::path::{Path, PathBuf};

pub use format::Format;
pub use schema::{
    DEFAULT_LAST_UPDATED_LABEL, DEFAULT_SIDEBAR_DEPTH, HeadTag, LastUpdated, NavItem,
    SCHEMA_VERSION, SidebarGroup, SiteConfig,
};
pub use validate::{Diagnostic, Diagnostics, MAX_SIDEBAR_DEPTH, is_external, is_valid_link};

/// CLI settings that override resolved paths.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override public asset directory.
    pub public_dir: Option<PathBuf>,
}

/// Configuration filenames to search for, in precedence order.
const CONFIG_FILENAMES: [&str; 4] = ["sitecfg.toml", "sitecfg.yaml", "sitecfg.yml", "sitecfg.json"];

/// Public asset directory, relative to the source directory.
const PUBLIC_DIR: &str = ".vuepress/public";

/// Loaded configuration: the site object plus where it came from.
#[derive(Debug)]
pub struct Config {
    /// Validated site configuration.
    pub site: SiteConfig,
    /// Resolved content paths.
    pub paths: ContentPaths,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Format the file was written in.
    pub format: Format,
    /// Non-fatal problems found during validation.
    pub warnings: Vec<Diagnostic>,
}

/// Resolved directories the configuration refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPaths {
    /// Root of the markdown content tree.
    pub source_dir: PathBuf,
    /// Directory served at the site root unchanged (favicons, manifest).
    pub public_dir: PathBuf,
}

impl ContentPaths {
    /// Default paths for a content root.
    #[must_use]
    pub fn for_source(source_dir: &Path) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            public_dir: source_dir.join(PUBLIC_DIR),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// No file found by discovery.
    #[error("No sitecfg.toml, sitecfg.yaml or sitecfg.json found in {} or its parents", .0.display())]
    NotDiscovered(PathBuf),
    /// Extension is not a supported format.
    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Syntax or schema error in the document.
    #[error("{} parse error{}: {message}", .format.label(), location(.path))]
    Parse {
        /// Format being parsed.
        format: Format,
        /// Path of the offending entry (e.g. `nav[1].text`), empty at the root.
        path: String,
        /// Deserializer message.
        message: String,
    },
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialize(String),
    /// `schemaVersion` is not understood.
    #[error("Unsupported schemaVersion {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version in the file.
        found: u32,
        /// Version this build understands.
        supported: u32,
    },
    /// Semantic validation failed.
    #[error("{0}")]
    Invalid(Diagnostics),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`title`").
        field: String,
        /// Error message (e.g., "${`SITE_TITLE`} not set").
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn parse_error(
        format: Format,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            path: path.into(),
            message: message.into(),
        }
    }
}

fn location(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at {path}")
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sitecfg.{toml,yaml,yml,json}` in the current
    /// directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over defaults.
    ///
    /// # Errors
    ///
    /// Returns error if no file is found, parsing fails, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = Self::locate(config_path)?;
        let mut config = Self::load_from_file(&path)?;

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Resolve the configuration file: `config_path` if given, otherwise the
    /// first `sitecfg.{toml,yaml,yml,json}` in the current directory or its
    /// parents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for a missing explicit path and
    /// `ConfigError::NotDiscovered` when discovery finds nothing.
    pub fn locate(config_path: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Ok(path.to_path_buf());
        }
        let cwd = std::env::current_dir()?;
        Self::discover_config(&cwd).ok_or(ConfigError::NotDiscovered(cwd))
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.paths.source_dir.clone_from(source_dir);
            // Public dir follows the source dir unless set explicitly
            if settings.public_dir.is_none() {
                self.paths.public_dir = source_dir.join(PUBLIC_DIR);
            }
        }
        if let Some(public_dir) = &settings.public_dir {
            self.paths.public_dir.clone_from(public_dir);
        }
    }

    /// Search for a config file in `start` and its parents.
    ///
    /// Within one directory, TOML wins over YAML over JSON.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let found = CONFIG_FILENAMES
                .iter()
                .map(|name| current.join(name))
                .find(|candidate| candidate.is_file());
            if found.is_some() {
                return found;
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let (site, format) = SiteConfig::read(path)?;

        // Expand environment variables before validation
        let site = site.expanded()?;
        let warnings = site.validate()?;

        let config_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        tracing::info!(
            nav = site.nav.len(),
            sidebar = site.sidebar.len(),
            "Loaded {}",
            path.display()
        );

        Ok(Self {
            site,
            paths: ContentPaths::for_source(config_dir),
            config_path: path.to_path_buf(),
            format,
            warnings,
        })
    }
}
