//! `sitecfg render` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use sitecfg_config::{CliSettings, Config};
use sitecfg_content::{ContentError, ContentTree};
use sitecfg_render::{PageNavigation, PathTitles};

use super::write_output;
use crate::error::CliError;
use crate::output::Output;

/// Output format of the render command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum RenderFormat {
    /// Preview page with navbar and sidebar.
    #[default]
    Html,
    /// Navigation view model.
    Json,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to configuration file (default: auto-discover sitecfg.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory used for page titles (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    format: RenderFormat,

    /// Route of the page to render.
    #[arg(short, long, default_value = "/")]
    page: String,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded, the content
    /// tree cannot be read, or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let page = match ContentTree::scan(&config.paths.source_dir) {
            Ok(tree) => {
                if tree.resolve(&self.page).is_none() {
                    output.warning(&format!("No page at {}", self.page));
                }
                PageNavigation::build(&config.site, &tree, &self.page)
            }
            Err(ContentError::MissingSourceDir(dir)) => {
                output.warning(&format!(
                    "Source directory {} not found, titles derived from links",
                    dir.display()
                ));
                PageNavigation::build(&config.site, &PathTitles, &self.page)
            }
            Err(err) => return Err(err.into()),
        };

        tracing::debug!(route = %page.route, format = ?self.format, "Rendering navigation");
        let rendered = match self.format {
            RenderFormat::Html => page.to_html(&config.site),
            RenderFormat::Json => {
                let mut json = serde_json::to_string_pretty(&page)?;
                json.push('\n');
                json
            }
        };
        write_output(self.output.as_deref(), &rendered)?;

        if let Some(path) = &self.output {
            output.success(&format!("Rendered {} to {}", page.route, path.display()));
        }
        Ok(())
    }
}
