//! `sitecfg check` command implementation.

use std::path::PathBuf;

use clap::Args;
use sitecfg_config::{CliSettings, Config};
use sitecfg_content::{ContentTree, check};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover sitecfg.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (default: the config file's directory).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Public asset directory (default: <source-dir>/.vuepress/public).
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// Only validate the configuration, do not scan content.
    #[arg(long)]
    skip_content: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or references
    /// missing content.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            public_dir: self.public_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.loaded(&config);
        for warning in &config.warnings {
            output.diagnostic(warning);
        }

        if self.skip_content {
            output.success(&format!(
                "Configuration valid: {} nav items, {} sidebar groups",
                config.site.nav.len(),
                config.site.sidebar.len()
            ));
            return Ok(());
        }

        let tree = ContentTree::scan(&config.paths.source_dir)?;
        output.scanned(&tree);
        let checked = check(&config.site, &tree, &config.paths.public_dir).into_result()?;

        output.success(&format!(
            "Configuration valid: {} nav items, {} sidebar groups, {checked} links resolved against {} pages",
            config.site.nav.len(),
            config.site.sidebar.len(),
            tree.pages().len()
        ));
        Ok(())
    }
}
