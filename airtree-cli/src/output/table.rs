//! Table output formatting using the `tabled` crate
//!
//! Provides table formatting with:
//! - Terminal width awareness
//! - Right-aligned numeric columns

use super::{truncate, OutputConfig};
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify, Width},
};

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    /// Create a table from rows of strings.
    ///
    /// `numeric` lists the column indexes to right-align.
    pub fn from_rows(
        headers: &[&str],
        rows: &[Vec<String>],
        numeric: &[usize],
        config: &OutputConfig,
    ) -> String {
        if rows.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().copied());

        for row in rows {
            builder.push_record(row.iter().map(|s| s.as_str()));
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        for &i in numeric {
            table.with(Modify::new(Columns::single(i)).with(Alignment::right()));
        }

        if config.should_truncate() {
            let term_width = config.effective_width();
            table.with(Width::wrap(term_width));
        }

        table.to_string()
    }

    /// Format a simple key-value table
    pub fn format_key_value(pairs: &[(&str, String)], config: &OutputConfig) -> String {
        let mut builder = Builder::default();

        for (key, value) in pairs {
            builder.push_record([*key, value.as_str()]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.with(Modify::new(Columns::first()).with(Alignment::right()));

        if config.should_truncate() {
            let term_width = config.effective_width();
            table.with(Width::wrap(term_width));
        }

        table.to_string()
    }

    /// Shorten a cell for narrow terminals.
    pub fn cell(value: &str, max_width: usize, config: &OutputConfig) -> String {
        if config.should_truncate() {
            truncate(value, max_width)
        } else {
            value.to_string()
        }
    }
}
