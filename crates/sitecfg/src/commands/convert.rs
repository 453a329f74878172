//! `sitecfg convert` command implementation.

use std::path::PathBuf;

use clap::Args;
use sitecfg_config::{Config, Format, SiteConfig};

use super::write_output;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Path to configuration file (default: auto-discover sitecfg.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target format: toml, yaml or json.
    #[arg(long)]
    to: Format,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let source = Config::locate(self.config.as_deref())?;
        let (site, format) = SiteConfig::read(&source)?;
        if format == self.to {
            output.warning(&format!("{} is already {}", source.display(), self.to));
        }

        // Validate what the generator will see, but write the ${VAR} references back
        site.clone().expanded()?.validate()?;

        let text = site.to_text(self.to)?;
        write_output(self.output.as_deref(), &text)?;

        if let Some(path) = &self.output {
            output.success(&format!("Converted {} to {}", source.display(), path.display()));
        }
        Ok(())
    }
}
