//! Content tree cross-referencing for sitecfg.
//!
//! This crate scans the markdown content root the site is built from and
//! checks the configuration against it. It handles:
//!
//! - Recursive directory scanning for markdown files
//! - Route assignment (`node/koa2/README.md` is served at `/node/koa2/`)
//! - Title extraction from front matter or the first H1 heading
//! - Dangling nav/sidebar links and missing head assets
//!
//! # Example
//!
//! ```ignore
//! use sitecfg_config::Config;
//! use sitecfg_content::{ContentTree, check};
//!
//! let config = Config::load(None, None)?;
//! let tree = ContentTree::scan(&config.paths.source_dir)?;
//! check(&config.site, &tree, &config.paths.public_dir).into_result()?;
//! ```

mod check;
mod title;
mod tree;

use std::path::PathBuf;

pub use check::{ContentReport, Problem, ProblemKind, check};
pub use tree::{ContentPage, ContentTree};

/// Content error.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Content root does not exist.
    #[error("Source directory not found: {}", .0.display())]
    MissingSourceDir(PathBuf),
    /// I/O error while scanning.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Configuration references content that does not exist.
    #[error("{0}")]
    Dangling(ContentReport),
}
