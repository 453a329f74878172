//! Load-time validation of the site configuration.
//!
//! Every rule runs and problems are collected, so one pass over a broken
//! file reports all of them with the field path of the offending entry.

use std::collections::HashMap;
use std::fmt;

use crate::ConfigError;
use crate::schema::{SCHEMA_VERSION, SiteConfig};

/// Largest accepted `sidebarDepth`.
pub const MAX_SIDEBAR_DEPTH: u8 = 3;

/// A single validation problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Field path, e.g. `sidebar[1].children[0]`.
    pub field: String,
    /// What is wrong.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

/// Collected validation problems.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(Diagnostic {
            field: field.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(Diagnostic {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Fatal problems.
    #[must_use]
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Non-fatal problems.
    #[must_use]
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Turn collected errors into a `ConfigError::Invalid`, or hand back the
    /// warnings when there are none.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if any error was recorded.
    pub fn into_result(self) -> Result<Vec<Diagnostic>, ConfigError> {
        if self.has_errors() {
            Err(ConfigError::Invalid(self))
        } else {
            Ok(self.warnings)
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        write!(
            f,
            "{count} invalid configuration {}",
            if count == 1 { "entry" } else { "entries" }
        )?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

/// Whether `link` is an external URL.
#[must_use]
pub fn is_external(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

/// Whether `link` is an external URL or a site-relative path.
#[must_use]
pub fn is_valid_link(link: &str) -> bool {
    is_external(link) || (link.starts_with('/') && !link.starts_with("//"))
}

fn require_link(diag: &mut Diagnostics, field: &str, owner: &str, link: &str) {
    if link.is_empty() {
        diag.error(field, format!("{owner}: link cannot be empty"));
    } else if !is_valid_link(link) {
        diag.error(
            field,
            format!("{owner}: \"{link}\" must start with \"/\" or http:// or https://"),
        );
    }
}

fn require_depth(diag: &mut Diagnostics, field: &str, depth: u8) {
    if depth > MAX_SIDEBAR_DEPTH {
        diag.error(
            field,
            format!("sidebarDepth {depth} exceeds the maximum of {MAX_SIDEBAR_DEPTH}"),
        );
    }
}

impl SiteConfig {
    /// Run every validation rule and collect the results.
    #[must_use]
    pub fn diagnose(&self) -> Diagnostics {
        let mut diag = Diagnostics::default();

        require_depth(&mut diag, "sidebarDepth", self.sidebar_depth);
        if matches!(self.last_updated.label(), Some("")) {
            diag.error("lastUpdated", "label cannot be empty (use false to disable)");
        }

        self.diagnose_head(&mut diag);
        self.diagnose_nav(&mut diag);
        self.diagnose_sidebar(&mut diag);

        diag
    }

    /// Validate the configuration, returning the non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedVersion` for an unknown `schemaVersion`
    /// and `ConfigError::Invalid` with every problem found otherwise.
    pub fn validate(&self) -> Result<Vec<Diagnostic>, ConfigError> {
        if let Some(found) = self.schema_version
            && found != SCHEMA_VERSION
        {
            return Err(ConfigError::UnsupportedVersion {
                found,
                supported: SCHEMA_VERSION,
            });
        }

        let diag = self.diagnose();
        for warning in diag.warnings() {
            tracing::warn!(field = %warning.field, "{}", warning.message);
        }
        diag.into_result()
    }

    fn diagnose_head(&self, diag: &mut Diagnostics) {
        for (i, tag) in self.head.iter().enumerate() {
            if tag.tag.is_empty() || !tag.tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                diag.error(
                    format!("head[{i}]"),
                    format!("\"{}\" is not a valid tag name", tag.tag),
                );
            }
        }
    }

    fn diagnose_nav(&self, diag: &mut Diagnostics) {
        self.walk_nav(|item, field| {
            if item.text.trim().is_empty() {
                diag.error(format!("{field}.text"), "text cannot be empty");
            }
            require_link(diag, &format!("{field}.link"), &format!("\"{}\"", item.text), &item.link);
            if item.items.as_ref().is_some_and(Vec::is_empty) {
                diag.error(
                    format!("{field}.items"),
                    format!("\"{}\": dropdown must have at least one item", item.text),
                );
            }
        });
    }

    fn diagnose_sidebar(&self, diag: &mut Diagnostics) {
        let mut group_paths: HashMap<&str, usize> = HashMap::new();
        let mut child_owner: HashMap<&str, usize> = HashMap::new();

        for (i, group) in self.sidebar.iter().enumerate() {
            let field = format!("sidebar[{i}]");
            let owner = format!("group \"{}\"", group.title);

            if group.title.trim().is_empty() {
                diag.error(format!("{field}.title"), "title cannot be empty");
            }
            if !group.is_navigable() {
                diag.error(
                    field.clone(),
                    format!("{owner} needs a path or at least one child"),
                );
            }
            if let Some(depth) = group.sidebar_depth {
                require_depth(diag, &format!("{field}.sidebarDepth"), depth);
            }

            if let Some(path) = &group.path {
                require_link(diag, &format!("{field}.path"), &owner, path);
                if let Some(&first) = group_paths.get(path.as_str()) {
                    diag.error(
                        format!("{field}.path"),
                        format!(
                            "{owner}: path \"{path}\" is already used by sidebar[{first}] \"{}\"",
                            self.sidebar[first].title
                        ),
                    );
                } else {
                    group_paths.insert(path.as_str(), i);
                }
            }

            for (j, child) in group.children.iter().enumerate() {
                let child_field = format!("{field}.children[{j}]");
                require_link(diag, &child_field, &owner, child);
                match child_owner.get(child.as_str()).copied() {
                    Some(other) if other != i => diag.warn(
                        child_field,
                        format!(
                            "{owner}: \"{child}\" is also listed in group \"{}\"",
                            self.sidebar[other].title
                        ),
                    ),
                    Some(_) => {}
                    None => {
                        child_owner.insert(child.as_str(), i);
                    }
                }
            }
        }
    }
}
