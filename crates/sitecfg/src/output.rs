//! Colored terminal output for check results.

use console::{Style, Term};
use sitecfg_config::{Config, Diagnostic};
use sitecfg_content::ContentTree;

/// Terminal output formatter, writing to stderr.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    heading: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            heading: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Print which file was loaded and in which format.
    pub(crate) fn loaded(&self, config: &Config) {
        let line = format!(
            "Configuration: {} ({})",
            config.config_path.display(),
            config.format
        );
        let _ = self.term.write_line(&self.heading.apply_to(line).to_string());
    }

    /// Print the content root and how many pages it holds.
    pub(crate) fn scanned(&self, tree: &ContentTree) {
        let _ = self.term.write_line(&format!(
            "Source: {} ({} pages)",
            tree.source_dir().display(),
            tree.pages().len()
        ));
    }

    /// Print a validation warning with its field path dimmed.
    pub(crate) fn diagnostic(&self, diagnostic: &Diagnostic) {
        let _ = self.term.write_line(&format!(
            "  {} {}",
            self.dim.apply_to(format!("[{}]", diagnostic.field)),
            self.yellow.apply_to(&diagnostic.message)
        ));
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}
