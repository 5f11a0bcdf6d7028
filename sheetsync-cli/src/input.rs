//! Reading batches from CSV and JSON files.

use anyhow::{bail, Context, Result};
use sheetsync_types::{canonical_column, Row, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Supported input file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Guesses the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(InputFormat::Csv),
            "json" => Some(InputFormat::Json),
            _ => None,
        }
    }
}

/// Reads CSV rows. The header row names the columns; empty cells are `Null`
/// and every other cell is text until coerced against a schema.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    for (i, header) in headers.iter().enumerate() {
        let canonical = canonical_column(header);
        if let Some(earlier) = headers
            .iter()
            .take(i)
            .find(|h| canonical_column(h) == canonical)
        {
            bail!("duplicate CSV column: {earlier:?} and {header:?}");
        }
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(column, cell)| {
                let value = if cell.is_empty() {
                    Value::Null
                } else {
                    Value::from(cell)
                };
                (column, value)
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Reads a JSON array of objects.
pub fn read_json<R: Read>(mut reader: R) -> Result<Vec<Row>> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .context("Failed to read JSON input")?;
    Row::batch_from_json_str(&text).context("Failed to parse JSON rows")
}

/// Reads a batch from a file, picking the format from the extension unless
/// one is given.
pub fn read_rows(path: &Path, format: Option<InputFormat>) -> Result<Vec<Row>> {
    let Some(format) = format.or_else(|| InputFormat::from_path(path)) else {
        bail!(
            "cannot tell the format of {}; pass --format csv or --format json",
            path.display()
        );
    };
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    match format {
        InputFormat::Csv => read_csv(file),
        InputFormat::Json => read_json(file),
    }
}
