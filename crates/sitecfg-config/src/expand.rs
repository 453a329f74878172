//! Environment variable substitution across the site configuration.
//!
//! Values containing `${VAR}` or `${VAR:-default}` are expanded; an unset
//! variable without a default is an error naming the field it appears in.
//! Values without `${` are left untouched, so a literal `$` in a title is safe.

use std::env::{self, VarError};

use shellexpand::LookupError;

use crate::ConfigError;
use crate::schema::{LastUpdated, NavItem, SiteConfig};

impl SiteConfig {
    /// Substitute environment references in every string value.
    ///
    /// The on-disk configuration keeps its `${VAR}` references; callers that
    /// rewrite the file should serialize the unexpanded value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvVar` with the field path (e.g.
    /// `nav[1].items[0].link`) of the first unresolvable reference.
    pub fn expanded(mut self) -> Result<Self, ConfigError> {
        expand_field(&mut self.title, "title")?;
        expand_field(&mut self.description, "description")?;
        if let LastUpdated::Label(label) = &mut self.last_updated {
            expand_field(label, "lastUpdated")?;
        }

        for (i, tag) in self.head.iter_mut().enumerate() {
            for (name, value) in &mut tag.attrs {
                expand_field(value, &format!("head[{i}].{name}"))?;
            }
        }

        expand_nav(&mut self.nav, "nav")?;

        for (i, group) in self.sidebar.iter_mut().enumerate() {
            expand_field(&mut group.title, &format!("sidebar[{i}].title"))?;
            if let Some(path) = &mut group.path {
                expand_field(path, &format!("sidebar[{i}].path"))?;
            }
            for (j, child) in group.children.iter_mut().enumerate() {
                expand_field(child, &format!("sidebar[{i}].children[{j}]"))?;
            }
        }

        Ok(self)
    }
}

fn expand_nav(items: &mut [NavItem], prefix: &str) -> Result<(), ConfigError> {
    for (i, item) in items.iter_mut().enumerate() {
        let field = format!("{prefix}[{i}]");
        expand_field(&mut item.text, &format!("{field}.text"))?;
        expand_field(&mut item.link, &format!("{field}.link"))?;
        if let Some(children) = &mut item.items {
            expand_nav(children, &format!("{field}.items"))?;
        }
    }
    Ok(())
}

fn expand_field(value: &mut String, field: &str) -> Result<(), ConfigError> {
    if !value.contains("${") {
        return Ok(());
    }

    let expanded = shellexpand::env_with_context(value.as_str(), |name| env::var(name).map(Some))
        .map_err(|LookupError { var_name, cause }| ConfigError::EnvVar {
            field: field.to_owned(),
            message: match cause {
                VarError::NotPresent => format!("${{{var_name}}} not set"),
                VarError::NotUnicode(_) => format!("${{{var_name}}} is not valid UTF-8"),
            },
        })?
        .into_owned();

    if expanded != *value {
        tracing::debug!(field, "Expanded environment reference");
    }
    *value = expanded;
    Ok(())
}
