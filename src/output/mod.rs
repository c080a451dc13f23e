//! Result rendering.
//!
//! Every vulnerability is flattened into a [`Record`] holding exactly the
//! allow-listed [`Field`]s, converted to its human or machine form, then
//! handed to the renderer for the requested [`OutputFormat`].

mod csv;
mod fields;
mod json;
mod table;
mod yaml;

pub use csv::render_csv;
pub use fields::{Field, FieldSet, Projection, Record, Value, DEFAULT_FIELDS, NOT_FIXED, UNKNOWN};
pub use json::render_json;
pub use table::render_table;
pub use yaml::render_yaml;

use crate::error::CommandError;
use crate::model::VulnerabilityCollection;

/// Message shown instead of an empty table.
pub const NO_VULNERABILITIES: &str = "No vulnerabilities found.";

/// Output format for check results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// Comma separated values with a header row
    Csv,
    /// JSON array of objects
    Json,
    /// YAML sequence of mappings
    Yaml,
    /// Space separated vulnerability IDs
    Ids,
    /// Number of vulnerabilities found
    Count,
}

impl OutputFormat {
    /// Whether `--fields` applies to this format.
    pub fn uses_fields(&self) -> bool {
        !matches!(self, OutputFormat::Ids | OutputFormat::Count)
    }

    /// Machine readable formats never get a progress bar.
    pub fn shows_progress(&self) -> bool {
        *self == OutputFormat::Table
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Ids => "ids",
            OutputFormat::Count => "count",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "ids" => Ok(OutputFormat::Ids),
            "count" => Ok(OutputFormat::Count),
            _ => Err(format!(
                "Unknown format: {}. Use 'table', 'csv', 'json', 'yaml', 'ids', or 'count'",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a check produced for the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Formatted results, written to stdout as-is.
    Data(String),
    /// A status message shown in place of an empty table.
    Success(String),
}

impl Rendered {
    pub fn as_str(&self) -> &str {
        match self {
            Rendered::Data(text) | Rendered::Success(text) => text,
        }
    }
}

pub fn render(
    vulnerabilities: &VulnerabilityCollection,
    format: OutputFormat,
    fields: &FieldSet,
) -> Result<Rendered, CommandError> {
    let render_error = |details: String| CommandError::Render { format, details };

    match format {
        OutputFormat::Count => Ok(Rendered::Data(vulnerabilities.len().to_string())),
        OutputFormat::Ids => Ok(Rendered::Data(render_ids(vulnerabilities))),
        OutputFormat::Table => {
            if vulnerabilities.is_empty() {
                return Ok(Rendered::Success(NO_VULNERABILITIES.to_string()));
            }
            let records = vulnerabilities.map(|v| Record::flatten(v).for_table());
            Ok(Rendered::Data(render_table(&records, fields)))
        }
        OutputFormat::Csv => {
            let records = vulnerabilities.map(|v| Record::flatten(v).for_machine());
            Ok(Rendered::Data(render_csv(&records, fields)))
        }
        OutputFormat::Json => {
            let records = vulnerabilities.map(|v| Record::flatten(v).for_machine());
            render_json(&records, fields)
                .map(Rendered::Data)
                .map_err(|e| render_error(e.to_string()))
        }
        OutputFormat::Yaml => {
            let records = vulnerabilities.map(|v| Record::flatten(v).for_machine());
            render_yaml(&records, fields)
                .map(Rendered::Data)
                .map_err(|e| render_error(e.to_string()))
        }
    }
}

/// IDs in collection order; a record without an ID counts as `0`.
fn render_ids(vulnerabilities: &VulnerabilityCollection) -> String {
    vulnerabilities
        .map(|v| v.id.unwrap_or(0).to_string())
        .join(" ")
}
