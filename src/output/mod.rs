//
//  gitlab-client
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Rendering of command results for the `glc` binary.
//!
//! ## Formats
//!
//! | Format | Flag | Use |
//! |--------|------|-----|
//! | Table | (default) | Human-readable tables and detail views |
//! | JSON | `--json` | Pretty-printed JSON for scripting |
//!
//! Lists render as a `comfy-table` via [`TableRow`]; single records render as
//! a field/value detail view via [`TableOutput`]. Colours come from
//! `console` and are dropped automatically when stdout is not a terminal.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gitlab_client::output::{OutputFormat, OutputWriter};
//!
//! let output = OutputWriter::new(OutputFormat::Table);
//! output.write_list(&merge_requests)?;
//! output.write_success("Merged !7");
//! ```

mod table;

pub use table::*;

use serde::Serialize;

/// How results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tables and detail views.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// `Json` when `json` is set, `Table` otherwise.
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// A record that renders as a detail view.
pub trait TableOutput {
    /// Prints the record as labelled fields.
    fn print_table(&self, color: bool);
}

/// A record that renders as one row of a list table.
pub trait TableRow {
    /// Column headers.
    fn headers() -> Vec<&'static str>;

    /// This record's cells, in header order.
    fn row(&self, color: bool) -> Vec<String>;
}

/// Writes command results and status messages in the selected format.
///
/// Status messages (`write_success`, `write_info`) are suppressed in JSON
/// mode so that stdout stays machine-readable; errors and warnings always go
/// to stderr.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a writer, detecting colour support from the terminal.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// The selected format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Whether colour output is enabled.
    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Writes a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialisation fails.
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Table => value.print_table(self.color),
        }
        Ok(())
    }

    /// Writes a list of records as a table.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialisation fails.
    pub fn write_list<T: Serialize + TableRow>(&self, values: &[T]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(values)?),
            OutputFormat::Table => {
                if values.is_empty() {
                    self.write_info("No results");
                    return Ok(());
                }
                TableBuilder::new()
                    .color(self.color)
                    .headers(T::headers())
                    .rows(values.iter().map(|v| v.row(self.color)))
                    .print();
            }
        }
        Ok(())
    }

    /// Writes raw text unchanged (snippet bodies).
    pub fn write_raw(&self, text: &str) {
        print!("{}", text);
        if !text.ends_with('\n') {
            println!();
        }
    }

    /// Writes an error message to stderr.
    pub fn write_error(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }

    /// Writes a warning to stderr.
    pub fn write_warning(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    /// Writes an informational line (table mode only).
    pub fn write_info(&self, msg: &str) {
        if self.format == OutputFormat::Table {
            println!("{}", msg);
        }
    }

    /// Writes a success line (table mode only).
    pub fn write_success(&self, msg: &str) {
        use console::style;
        if self.format != OutputFormat::Table {
            return;
        }
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// Prints a bold heading with an underline.
pub fn print_header(text: &str) {
    use console::style;
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

/// Prints a `key: value` line with a dimmed key.
pub fn print_field(key: &str, value: &str, color: bool) {
    use console::style;
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flag() {
        assert_eq!(OutputFormat::from_json_flag(true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_json_flag(false), OutputFormat::Table);
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}
