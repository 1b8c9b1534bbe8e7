use std::{fs::File, io, path::Path};

use thiserror::Error;
use tracing::{debug, warn};

use crate::location::Location;

pub const REQUIRED_COLUMNS: [&str; 4] = ["name", "address", "latitude", "longitude"];

const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A single problem with the location table. Rows are numbered from 1, the
/// depot being row 1.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("file must contain at least 2 rows (1 depot + 1 customer), found {rows}")]
    InsufficientData { rows: usize },
    #[error("{field} values must be numeric, row {row} has {value:?}")]
    Type {
        field: String,
        row: usize,
        value: String,
    },
    #[error("{field} values must be between {min} and {max}, row {row} has {value}")]
    Range {
        field: String,
        row: usize,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("missing values in required columns: {}", .fields.join(", "))]
    MissingValue { fields: Vec<String> },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("failed to read location file: {0}")]
    Read(String),
    #[error("{}", describe(.0))]
    Invalid(Vec<ValidationError>),
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<csv::Error> for LoadError {
    fn from(error: csv::Error) -> Self {
        LoadError::Read(error.to_string())
    }
}

impl From<io::Error> for LoadError {
    fn from(error: io::Error) -> Self {
        LoadError::Read(error.to_string())
    }
}

impl LoadError {
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            LoadError::Invalid(errors) => errors,
            LoadError::Read(_) => &[],
        }
    }
}

struct RawRow {
    cells: [Option<String>; 4],
}

impl RawRow {
    fn cell(&self, column: usize) -> Option<&str> {
        self.cells[column].as_deref()
    }
}

enum Coordinate {
    Missing,
    Value(f64),
}

/// Parses a coordinate cell. Empty cells and `NaN` count as missing, anything
/// else that is not a number is reported back as is.
fn parse_coordinate(cell: Option<&str>) -> Result<Coordinate, String> {
    match cell {
        None => Ok(Coordinate::Missing),
        Some(text) => match text.parse::<f64>() {
            Ok(value) if value.is_nan() => Ok(Coordinate::Missing),
            Ok(value) => Ok(Coordinate::Value(value)),
            Err(_) => Err(text.to_owned()),
        },
    }
}

/// Reads and validates a location table.
///
/// `limit > 0` keeps only the first `limit` rows before anything is checked,
/// so the depot is always row 1 of the kept rows.
pub fn load_locations<R: io::Read>(reader: R, limit: usize) -> Result<Vec<Location>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut column_indices = [0; 4];
    let mut missing = vec![];

    for (slot, column) in REQUIRED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|header| header == *column) {
            Some(index) => column_indices[slot] = index,
            None => missing.push(column.to_string()),
        }
    }

    if !missing.is_empty() {
        warn!(?missing, "location file is missing required columns");
        return Err(LoadError::Invalid(vec![ValidationError::Schema { missing }]));
    }

    let take = if limit == 0 { usize::MAX } else { limit };
    let mut rows = vec![];
    for record in reader.records().take(take) {
        let record = record?;
        let cells = column_indices.map(|index| {
            record
                .get(index)
                .filter(|cell| !cell.is_empty())
                .map(str::to_owned)
        });
        rows.push(RawRow { cells });
    }

    debug!(rows = rows.len(), limit, "read location rows");

    validate_rows(&rows)
}

pub fn load_locations_from_path(
    path: impl AsRef<Path>,
    limit: usize,
) -> Result<Vec<Location>, LoadError> {
    let file = File::open(path.as_ref())?;
    load_locations(io::BufReader::new(file), limit)
}

fn parse_column(
    rows: &[RawRow],
    column: usize,
    field: &str,
) -> Result<Vec<Coordinate>, ValidationError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            parse_coordinate(row.cell(column)).map_err(|value| ValidationError::Type {
                field: field.to_owned(),
                row: index + 1,
                value,
            })
        })
        .collect()
}

fn first_out_of_range<'a>(
    field: &str,
    (min, max): (f64, f64),
    values: impl Iterator<Item = &'a Coordinate>,
) -> Option<ValidationError> {
    values
        .enumerate()
        .find_map(|(index, coordinate)| match coordinate {
            Coordinate::Value(value) if !(min..=max).contains(value) => {
                Some(ValidationError::Range {
                    field: field.to_owned(),
                    row: index + 1,
                    value: *value,
                    min,
                    max,
                })
            }
            _ => None,
        })
}

fn validate_rows(rows: &[RawRow]) -> Result<Vec<Location>, LoadError> {
    let mut errors = vec![];

    if rows.len() < 2 {
        errors.push(ValidationError::InsufficientData { rows: rows.len() });
    }

    let mut coordinates = vec![];
    match (
        parse_column(rows, 2, "latitude"),
        parse_column(rows, 3, "longitude"),
    ) {
        (Ok(latitudes), Ok(longitudes)) => coordinates.extend(latitudes.into_iter().zip(longitudes)),
        // Only the first column holding a non-numeric cell is reported
        (Err(error), _) | (_, Err(error)) => errors.push(error),
    }

    if !errors.is_empty() {
        return Err(LoadError::Invalid(errors));
    }

    errors.extend(first_out_of_range(
        "latitude",
        LATITUDE_RANGE,
        coordinates.iter().map(|(latitude, _)| latitude),
    ));
    errors.extend(first_out_of_range(
        "longitude",
        LONGITUDE_RANGE,
        coordinates.iter().map(|(_, longitude)| longitude),
    ));

    if !errors.is_empty() {
        return Err(LoadError::Invalid(errors));
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .enumerate()
        .filter(|&(column, _)| match column {
            2 => coordinates
                .iter()
                .any(|(latitude, _)| matches!(latitude, Coordinate::Missing)),
            3 => coordinates
                .iter()
                .any(|(_, longitude)| matches!(longitude, Coordinate::Missing)),
            _ => rows.iter().any(|row| row.cell(column).is_none()),
        })
        .map(|(_, field)| field.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(LoadError::Invalid(vec![ValidationError::MissingValue {
            fields: missing,
        }]));
    }

    Ok(rows
        .iter()
        .zip(coordinates)
        .filter_map(|(row, coordinate)| match (row.cell(0), row.cell(1), coordinate) {
            (Some(name), Some(address), (Coordinate::Value(latitude), Coordinate::Value(longitude))) => {
                Some(Location::new(name, address, latitude, longitude))
            }
            _ => None,
        })
        .collect())
}
