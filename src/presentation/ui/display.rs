use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Display utilities for the CLI interface
#[derive(Debug, Clone, Copy)]
pub struct DisplayHelper {
    pub use_color: bool,
    /// Whether stderr is a terminal someone is watching
    pub interactive: bool,
}

impl DisplayHelper {
    /// Create a new DisplayHelper
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            interactive: console::user_attended_stderr(),
        }
    }

    /// Print a success message to stderr, keeping stdout for command output
    pub fn success(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "✓".green().bold(), message);
        } else {
            eprintln!("[SUCCESS] {}", message);
        }
    }

    /// Format a repository name for display
    pub fn repo_name(&self, repo: &str) -> String {
        if self.use_color {
            repo.cyan().bold().to_string()
        } else {
            repo.to_string()
        }
    }

    /// Create a bar that tracks object transfer while cloning
    ///
    /// Hidden unless stderr is attended.
    pub fn create_transfer_bar(&self, message: &str) -> ProgressBar {
        if !self.interactive {
            return ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        }

        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos:>7}/{len:7} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(message.to_string());
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_repo_name() {
        let display = DisplayHelper {
            use_color: false,
            interactive: false,
        };
        assert_eq!(display.repo_name("api"), "api");
    }

    #[test]
    fn test_unattended_bar_is_hidden() {
        let display = DisplayHelper {
            use_color: false,
            interactive: false,
        };
        assert!(display.create_transfer_bar("cloning").is_hidden());
    }
}
