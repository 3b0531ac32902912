//! Ratings file loading against an explicit column schema.

use crate::config::DataConfig;
use crate::error::{PipelineError, Result};
use crate::models::RatingRecord;
use crate::utils::validation::validate_rating_record;
use std::fs::File;
use std::io::{ErrorKind, Read};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

pub const USER_ID_COLUMN: ColumnSpec = ColumnSpec { name: "UserId", kind: ColumnKind::Integer };
pub const ISBN_COLUMN: ColumnSpec = ColumnSpec { name: "ISBN", kind: ColumnKind::Text };
pub const RATING_COLUMN: ColumnSpec = ColumnSpec { name: "Rating", kind: ColumnKind::Numeric };

/// Column layout of a ratings file, in positional order for header-less input.
pub const RATINGS_SCHEMA: [ColumnSpec; 3] = [USER_ID_COLUMN, ISBN_COLUMN, RATING_COLUMN];

// Each parser reads one column of a csv row and fails with the line and
// column name when the field is absent or malformed.
impl ColumnSpec {
    fn raw<'r>(&self, row: &'r csv::StringRecord, position: usize, line: u64) -> Result<&'r str> {
        row.get(position).map(str::trim).ok_or_else(|| {
            PipelineError::SchemaMismatch(format!("line {}: missing column {}", line, self.name))
        })
    }

    fn mismatch(&self, raw: &str, line: u64) -> PipelineError {
        PipelineError::SchemaMismatch(format!(
            "line {}: column {} expects {:?}, found {:?}",
            line, self.name, self.kind, raw
        ))
    }

    fn parse_integer(&self, row: &csv::StringRecord, position: usize, line: u64) -> Result<i64> {
        let raw = self.raw(row, position, line)?;
        raw.parse().map_err(|_| self.mismatch(raw, line))
    }

    fn parse_numeric(&self, row: &csv::StringRecord, position: usize, line: u64) -> Result<f32> {
        let raw = self.raw(row, position, line)?;
        raw.parse().map_err(|_| self.mismatch(raw, line))
    }

    fn parse_text(&self, row: &csv::StringRecord, position: usize, line: u64) -> Result<String> {
        let raw = self.raw(row, position, line)?;
        if raw.is_empty() {
            Err(self.mismatch(raw, line))
        } else {
            Ok(raw.to_string())
        }
    }
}

pub fn load_ratings(config: &DataConfig) -> Result<Vec<RatingRecord>> {
    let file = File::open(&config.path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            PipelineError::FileNotFound { path: config.path.clone() }
        } else {
            PipelineError::Io(e)
        }
    })?;

    let records = read_ratings(file, config.delimiter, config.has_header)?;
    info!("Loaded {} rating records from {}", records.len(), config.path);
    Ok(records)
}

pub fn read_ratings<R: Read>(reader: R, delimiter: char, has_header: bool) -> Result<Vec<RatingRecord>> {
    if !delimiter.is_ascii() {
        return Err(PipelineError::InvalidConfig(format!(
            "delimiter must be a single ASCII character, got {:?}",
            delimiter
        )));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(has_header)
        .flexible(true)
        .from_reader(reader);

    let positions = if has_header {
        resolve_columns(rdr.headers()?)?
    } else {
        [0, 1, 2]
    };

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or(i as u64 + 1);

        let [user_pos, isbn_pos, rating_pos] = positions;
        let record = RatingRecord {
            user_id: USER_ID_COLUMN.parse_integer(&row, user_pos, line)?,
            isbn: ISBN_COLUMN.parse_text(&row, isbn_pos, line)?,
            rating: RATING_COLUMN.parse_numeric(&row, rating_pos, line)?,
        };

        validate_rating_record(&record).map_err(|e| match e {
            PipelineError::SchemaMismatch(message) => {
                PipelineError::SchemaMismatch(format!("line {}: {}", line, message))
            }
            other => other,
        })?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    Ok(records)
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<[usize; 3]> {
    let mut positions = [0usize; 3];

    for (slot, spec) in positions.iter_mut().zip(RATINGS_SCHEMA.iter()) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(spec.name))
            .ok_or_else(|| {
                PipelineError::SchemaMismatch(format!(
                    "header is missing column {} (found: {})",
                    spec.name,
                    headers.iter().collect::<Vec<_>>().join(", ")
                ))
            })?;
    }

    Ok(positions)
}
