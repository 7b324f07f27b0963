//! Terminal styling helpers
//!
//! Thin wrappers over owo-colors that respect color support detection.
//! All output goes through `anstream` so styling degrades cleanly when
//! stdout is not a terminal.

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};

/// Extension trait for styling strings in CLI output
pub trait Stylize {
    /// Green, for successful operations
    fn success(&self) -> String;
    /// Yellow, for warnings and soft failures
    fn warn(&self) -> String;
    /// Red, for errors
    fn error(&self) -> String;
    /// Bold, for headings and important words
    fn emphasis(&self) -> String;
    /// Cyan, for names and values the eye should land on
    fn accent(&self) -> String;
    /// Dimmed, for secondary detail
    fn muted(&self) -> String;
}

impl<T: AsRef<str>> Stylize for T {
    fn success(&self) -> String {
        self.as_ref()
            .if_supports_color(Stream::Stdout, |s| s.green().to_string())
            .to_string()
    }

    fn warn(&self) -> String {
        self.as_ref()
            .if_supports_color(Stream::Stdout, |s| s.yellow().to_string())
            .to_string()
    }

    fn error(&self) -> String {
        self.as_ref()
            .if_supports_color(Stream::Stdout, |s| s.red().to_string())
            .to_string()
    }

    fn emphasis(&self) -> String {
        self.as_ref()
            .if_supports_color(Stream::Stdout, |s| s.bold().to_string())
            .to_string()
    }

    fn accent(&self) -> String {
        self.as_ref()
            .if_supports_color(Stream::Stdout, |s| s.cyan().to_string())
            .to_string()
    }

    fn muted(&self) -> String {
        self.as_ref()
            .if_supports_color(Stream::Stdout, |s| s.dimmed().to_string())
            .to_string()
    }
}

/// Green checkmark for completed steps
pub fn check() -> String {
    "✓".success()
}

/// Spinner style shared by all progress indicators
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
