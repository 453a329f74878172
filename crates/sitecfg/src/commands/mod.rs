//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod convert;
pub(crate) mod render;

use std::io::Write;
use std::path::Path;

pub(crate) use check::CheckArgs;
pub(crate) use convert::ConvertArgs;
pub(crate) use render::RenderArgs;

use crate::error::CliError;

/// Write command output to `path`, or to stdout when no path is given.
fn write_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
