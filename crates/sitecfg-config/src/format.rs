//! On-disk formats of the configuration file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::ConfigError;
use crate::schema::SiteConfig;

/// Serialization format, picked from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    /// Every supported format.
    pub const ALL: [Self; 3] = [Self::Toml, Self::Yaml, Self::Json];

    /// Detect the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedFormat` for unknown or missing extensions.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))
    }

    /// Name used in error messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        }
    }

    /// Canonical file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format: {other}")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl SiteConfig {
    /// Parse a configuration document.
    ///
    /// Only the shape is checked here; call [`SiteConfig::validate`] for the
    /// semantic rules. Schema errors carry the path of the offending entry
    /// (`nav[1].text`, `head[0]`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed input, missing required
    /// fields, wrong types or unknown fields.
    pub fn parse(content: &str, format: Format) -> Result<Self, ConfigError> {
        match format {
            Format::Toml => {
                let de = toml::Deserializer::parse(content)
                    .map_err(|e| ConfigError::parse_error(format, "", e.message()))?;
                serde_path_to_error::deserialize(de)
                    .map_err(|e| at_path(format, e, |inner| inner.message().to_owned()))
            }
            Format::Yaml => {
                let de = serde_yaml::Deserializer::from_str(content);
                serde_path_to_error::deserialize(de)
                    .map_err(|e| at_path(format, e, ToString::to_string))
            }
            Format::Json => {
                let mut de = serde_json::Deserializer::from_str(content);
                let site = serde_path_to_error::deserialize(&mut de)
                    .map_err(|e| at_path(format, e, ToString::to_string))?;
                de.end()
                    .map_err(|e| ConfigError::parse_error(format, "", e.to_string()))?;
                Ok(site)
            }
        }
    }

    /// Read and parse a configuration file as written, without env expansion
    /// or validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedFormat` for unknown extensions,
    /// `ConfigError::Io` if the file cannot be read and `ConfigError::Parse`
    /// for schema errors.
    pub fn read(path: &Path) -> Result<(Self, Format), ConfigError> {
        let format = Format::from_path(path)?;
        tracing::debug!(path = %path.display(), %format, "Reading site configuration");
        let content = std::fs::read_to_string(path)?;
        Ok((Self::parse(&content, format)?, format))
    }

    /// Serialize to a pretty-printed document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialize` if the serializer rejects the value.
    pub fn to_text(&self, format: Format) -> Result<String, ConfigError> {
        match format {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            Format::Yaml => {
                serde_yaml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            Format::Json => serde_json::to_string_pretty(self)
                .map(|mut json| {
                    json.push('\n');
                    json
                })
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }
}

fn at_path<E>(
    format: Format,
    err: serde_path_to_error::Error<E>,
    message: impl FnOnce(&E) -> String,
) -> ConfigError {
    let path = err.path().to_string();
    // Root-level errors report "." as their path
    let path = if path == "." { String::new() } else { path };
    ConfigError::parse_error(format, path, message(err.inner()))
}
