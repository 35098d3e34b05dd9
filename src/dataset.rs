//! Comma-separated point files: dimension inference, parsing and ball output.
//!
//! Input has one point per line and one coordinate per comma-separated field. A
//! trailing comma after the last coordinate is allowed. Output is a single line
//! `squared_radius, c_0, ..., c_{D-1}`.

use std::io::{self, BufRead, Write};
use std::num::ParseFloatError;

use miniball_d::Ball;
use thiserror::Error;

/// Errors from reading a point file.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read data: {0}")]
    Io(#[from] io::Error),

    #[error("data file contains no points")]
    Empty,

    #[error("line {line}: cannot infer a dimension from the first record")]
    ZeroDimension { line: usize },

    #[error("line {line}: expected {expected} coordinates, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, field {field}: {source}")]
    Parse {
        line: usize,
        field: usize,
        #[source]
        source: ParseFloatError,
    },

    #[error("line {line}, field {field}: coordinate {value} is not finite")]
    NonFinite {
        line: usize,
        field: usize,
        value: f64,
    },
}

/// Points read from a file, all with `dim` coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub dim: usize,
    pub points: Vec<Vec<f64>>,
}

/// Count the coordinates in one record.
///
/// Every comma separates a coordinate; the last coordinate may come without a
/// trailing comma, in which case it is counted if it contains a digit.
pub fn estimate_dimension(line: &str) -> usize {
    let commas = line.matches(',').count();
    let tail = match line.rfind(',') {
        Some(idx) => &line[idx + 1..],
        None => line,
    };
    if tail.bytes().any(|b| b.is_ascii_digit()) {
        commas + 1
    } else {
        commas
    }
}

/// Read every non-blank line of `reader` as a point.
///
/// The dimension is inferred from the first non-blank line; any later line with a
/// different number of coordinates is rejected.
pub fn read_points<R: BufRead>(reader: R) -> Result<Dataset, DatasetError> {
    let mut dim = None;
    let mut points = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let record = line.trim();
        if record.is_empty() {
            continue;
        }

        let expected = match dim {
            Some(d) => d,
            None => {
                let d = estimate_dimension(record);
                if d == 0 {
                    return Err(DatasetError::ZeroDimension { line: line_no });
                }
                log::debug!("inferred dimension {} from line {}", d, line_no);
                dim = Some(d);
                d
            }
        };

        points.push(parse_record(record, line_no, expected)?);
    }

    match dim {
        Some(dim) => Ok(Dataset { dim, points }),
        None => Err(DatasetError::Empty),
    }
}

fn parse_record(record: &str, line: usize, expected: usize) -> Result<Vec<f64>, DatasetError> {
    let record = record.strip_suffix(',').unwrap_or(record);
    let fields: Vec<&str> = record.split(',').map(str::trim).collect();
    if fields.len() != expected {
        return Err(DatasetError::FieldCount {
            line,
            expected,
            found: fields.len(),
        });
    }

    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let value = field.parse::<f64>().map_err(|source| DatasetError::Parse {
                line,
                field: i + 1,
                source,
            })?;
            if !value.is_finite() {
                return Err(DatasetError::NonFinite {
                    line,
                    field: i + 1,
                    value,
                });
            }
            Ok(value)
        })
        .collect()
}

/// Write `squared_radius, c_0, ..., c_{D-1}` with six decimals and no trailing
/// separator.
pub fn write_ball<W: Write>(mut writer: W, ball: &Ball) -> io::Result<()> {
    write!(writer, "{:.6}", ball.squared_radius)?;
    for c in &ball.center {
        write!(writer, ", {:.6}", c)?;
    }
    writer.flush()
}
