//! CSV/JSON text parser producing ordered records.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{DashbaseError, Result};
use super::format::FileType;
use super::source::Record;

// Decimal or scientific notation, nothing else (no hex, no inf/nan).
static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap());

static INTEGER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").unwrap());

/// How CSV rows are split into cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvDialect {
    /// Single-pass scan that toggles an in-quotes flag on every `"`.
    /// Commas inside quoted cells are kept, but doubled quotes (`""`) are
    /// not unescaped and quoted cells cannot span lines.
    #[default]
    Simple,
    /// RFC 4180 tokenization via the `csv` crate: doubled quotes and quoted
    /// newlines are handled.
    Rfc4180,
}

/// Parser configuration.
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// CSV tokenization rules.
    pub csv_dialect: CsvDialect,
    /// Maximum records to keep (None = all).
    pub max_records: Option<usize>,
}

impl ParserConfig {
    pub fn with_csv_dialect(mut self, dialect: CsvDialect) -> Self {
        self.csv_dialect = dialect;
        self
    }

    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max);
        self
    }
}

/// Parses uploaded text into records.
#[derive(Debug, Clone, Default)]
pub struct TextParser {
    config: ParserConfig,
}

impl TextParser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse `content` as the declared type, falling back to the file
    /// name's extension when nothing usable was declared.
    pub fn parse(
        &self,
        content: &str,
        declared: FileType,
        file_name: &str,
    ) -> Result<Vec<Record>> {
        let format = declared.resolve(file_name)?;
        let mut records = match format {
            FileType::Csv => self.parse_csv(content)?,
            FileType::Json => self.parse_json(content)?,
            FileType::Unknown => {
                return Err(DashbaseError::UnsupportedFormat(file_name.to_string()));
            }
        };

        if let Some(max) = self.config.max_records {
            records.truncate(max);
        }

        if records.is_empty() {
            return Err(DashbaseError::EmptyDataset(format!(
                "'{}' contains no records",
                file_name
            )));
        }

        debug!(file = file_name, %format, records = records.len(), "parsed upload");
        Ok(records)
    }

    /// Parse CSV text: header line plus at least one data line.
    pub fn parse_csv(&self, content: &str) -> Result<Vec<Record>> {
        let mut rows = match self.config.csv_dialect {
            CsvDialect::Simple => split_lines_simple(content),
            CsvDialect::Rfc4180 => split_lines_rfc4180(content)?,
        };

        if rows.len() < 2 {
            return Err(DashbaseError::parse("insufficient rows"));
        }

        let headers: Vec<String> = rows
            .remove(0)
            .iter()
            .map(|h| clean_token(h).to_string())
            .collect();

        let records = rows
            .into_iter()
            .map(|row| {
                // Zip by header position: short rows are padded with empty
                // strings, surplus cells are dropped.
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        let cell = row.get(i).map(|c| clean_token(c)).unwrap_or("");
                        (header.clone(), coerce_cell(cell))
                    })
                    .collect::<Record>()
            })
            .collect();

        Ok(records)
    }

    /// Parse JSON text: an array of objects, an object wrapping such an
    /// array under `data`, or a single object.
    pub fn parse_json(&self, content: &str) -> Result<Vec<Record>> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| DashbaseError::parse(format!("invalid JSON: {}", e)))?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => {
                if matches!(map.get("data"), Some(Value::Array(_))) {
                    match map.get_mut("data").map(Value::take) {
                        Some(Value::Array(items)) => items,
                        _ => Vec::new(),
                    }
                } else {
                    vec![Value::Object(map)]
                }
            }
            other => {
                return Err(DashbaseError::parse(format!(
                    "expected a JSON object or array, found {}",
                    json_kind(&other)
                )));
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map.into_iter().collect::<Record>()),
                other => Err(DashbaseError::parse(format!(
                    "element {} is a {}, expected an object",
                    i,
                    json_kind(&other)
                ))),
            })
            .collect()
    }
}

/// Split into non-blank lines and tokenize each with the quote-toggling
/// scan.
fn split_lines_simple(content: &str) -> Vec<Vec<String>> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(split_row)
        .collect()
}

fn split_lines_rfc4180(content: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DashbaseError::parse(format!("invalid CSV: {}", e)))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(rows)
}

/// Tokenize one CSV line. A `,` separates cells only outside quotes;
/// quote characters are kept for `clean_token` to strip.
fn split_row(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => tokens.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    tokens.push(current);

    tokens
}

/// Trim and strip one layer of enclosing double quotes.
fn clean_token(token: &str) -> &str {
    let trimmed = token.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(trimmed)
}

/// Numeric-looking cells become JSON numbers, everything else stays text.
fn coerce_cell(cell: &str) -> Value {
    if !cell.is_empty() && NUMBER_PATTERN.is_match(cell) {
        if INTEGER_PATTERN.is_match(cell) {
            if let Ok(n) = cell.parse::<i64>() {
                return Value::from(n);
            }
        }
        if let Some(n) = cell
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            return Value::Number(n);
        }
    }

    Value::String(cell.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
