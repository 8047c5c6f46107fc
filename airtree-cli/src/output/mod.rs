//! Output formatting module for the airtree CLI
//!
//! Provides unified output formatting across all commands with support for
//! two formats: table (human-readable) and json (machine-readable).
//!
//! Automatically detects TTY context to adjust colors and truncation behavior.

use clap::ValueEnum;
use serde::Serialize;
use std::io::IsTerminal;

mod json;
mod table;

pub use self::json::JsonOutput;
pub use self::table::TableOutput;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format (default)
    #[default]
    Table,
    /// JSON format for machine consumption
    Json,
}

/// Configuration for output rendering
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// The output format to use
    pub format: OutputFormat,
    /// Disable colored output
    pub no_color: bool,
    /// Disable truncation of long values
    pub no_truncate: bool,
    /// Override terminal width (None = auto-detect)
    pub width: Option<usize>,
}

impl OutputConfig {
    /// Create a new OutputConfig with the specified format
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            no_color: false,
            no_truncate: false,
            width: None,
        }
    }

    /// Create an OutputConfig with automatic TTY detection
    ///
    /// When output is not a TTY (piped or redirected):
    /// - Colors are disabled
    /// - Truncation is disabled
    pub fn auto_detect(format: OutputFormat) -> Self {
        let is_tty = is_tty();
        Self {
            format,
            no_color: !is_tty,
            no_truncate: !is_tty,
            width: None,
        }
    }

    /// Get the effective terminal width
    pub fn effective_width(&self) -> usize {
        self.width.unwrap_or_else(terminal_width)
    }

    /// Check if colors should be used
    pub fn use_colors(&self) -> bool {
        !self.no_color
    }

    /// Check if truncation should be applied
    pub fn should_truncate(&self) -> bool {
        !self.no_truncate
    }

    /// Builder: disable truncation
    pub fn without_truncation(mut self) -> Self {
        self.no_truncate = true;
        self
    }
}

/// Types that can be displayed as a table.
///
/// JSON rendering comes from `Serialize`.
pub trait TableDisplay: Serialize {
    /// Convert to table format string
    fn to_table(&self, config: &OutputConfig) -> String;
}

/// Result wrapper for formatted output with automatic format selection
pub struct Output<T> {
    data: T,
    config: OutputConfig,
}

impl<T: TableDisplay> Output<T> {
    /// Create a new output wrapper with specified format
    pub fn new(data: T, format: OutputFormat) -> Self {
        Self::with_config(data, OutputConfig::auto_detect(format))
    }

    /// Create a new output wrapper with full config
    pub fn with_config(data: T, config: OutputConfig) -> Self {
        Self { data, config }
    }

    /// Get the rendered string without printing
    pub fn render_to_string(&self) -> String {
        match self.config.format {
            OutputFormat::Table => self.data.to_table(&self.config),
            OutputFormat::Json => JsonOutput::format(&self.data),
        }
    }

    /// Render the output to stdout
    pub fn render(&self) -> anyhow::Result<()> {
        println!("{}", self.render_to_string());
        Ok(())
    }

    /// Render the output to stderr
    pub fn render_err(&self) {
        eprintln!("{}", self.render_to_string());
    }
}

// ============================================================================
// Built-in message types
// ============================================================================

/// Simple error message
#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub success: bool,
    pub error: String,
}

impl ErrorMessage {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

impl TableDisplay for ErrorMessage {
    fn to_table(&self, _config: &OutputConfig) -> String {
        use colored::Colorize;
        format!("{} {}", "ERROR:".red().bold(), self.error)
    }
}

// ============================================================================
// Utility functions
// ============================================================================

/// Truncate a string to a maximum width with ellipsis
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let truncated: String = s.chars().take(max_width - 3).collect();
        format!("{}...", truncated)
    }
}

/// Detect if stdout is a TTY
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to 80 if unavailable
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("A → B", 5), "A → B");
    }

    #[test]
    fn test_output_config_builder() {
        let config = OutputConfig {
            width: Some(120),
            ..OutputConfig::new(OutputFormat::Json).without_truncation()
        };

        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.use_colors());
        assert!(!config.should_truncate());
        assert_eq!(config.effective_width(), 120);
    }

    #[test]
    fn test_error_message_json() {
        let output = Output::with_config(
            ErrorMessage::new("Airport not found: 9"),
            OutputConfig::new(OutputFormat::Json),
        );
        let value: serde_json::Value = serde_json::from_str(&output.render_to_string()).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Airport not found: 9");
    }
}
