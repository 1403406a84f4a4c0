//! Tabular slices returned by the upstream grid service.
//!
//! A slice is a list of column names plus rows of loosely typed values.
//! Columns are always located by name; the upstream is free to reorder them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const TIME: &str = "time";

/// Raw table as decoded from the upstream response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice {
    pub column_names: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl Slice {
    /// Position of a named column.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    fn require(&self, name: &str) -> Result<usize, MissingColumn> {
        self.column(name)
            .ok_or_else(|| MissingColumn(name.to_string()))
    }

    /// Resolve the four required wind columns (and the optional time column).
    pub fn wind_columns(&self, names: &WindColumns) -> Result<SliceColumns, MissingColumn> {
        Ok(SliceColumns {
            lat: self.require(LATITUDE)?,
            lon: self.require(LONGITUDE)?,
            u: self.require(&names.u)?,
            v: self.require(&names.v)?,
            time: self.column(TIME),
        })
    }
}

/// Variable names of the two wind components on the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindColumns {
    pub u: String,
    pub v: String,
}

impl Default for WindColumns {
    fn default() -> Self {
        Self {
            u: "ugrd10m".to_string(),
            v: "vgrd10m".to_string(),
        }
    }
}

/// Column positions within one slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceColumns {
    pub lat: usize,
    pub lon: usize,
    pub u: usize,
    pub v: usize,
    pub time: Option<usize>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Missing column: {0}")]
pub struct MissingColumn(pub String);

/// One typed row: coordinates in the upstream convention, components may be absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindRow {
    pub lat: f64,
    pub lon: f64,
    pub u: Option<f64>,
    pub v: Option<f64>,
}

/// A slice whose schema has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct WindSlice {
    columns: SliceColumns,
    rows: Vec<Vec<Value>>,
}

impl WindSlice {
    pub fn from_slice(slice: Slice, names: &WindColumns) -> Result<Self, MissingColumn> {
        let columns = slice.wind_columns(names)?;
        Ok(Self {
            columns,
            rows: slice.rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Typed rows in upstream order. `None` marks a row whose coordinates
    /// are not numeric.
    pub fn rows(&self) -> impl Iterator<Item = Option<WindRow>> + '_ {
        self.rows.iter().map(move |row| self.read(row))
    }

    /// First row that carries usable coordinates.
    pub fn first_row(&self) -> Option<WindRow> {
        self.rows.first().and_then(|row| self.read(row))
    }

    /// Time value of the first row, if the upstream included a time column.
    pub fn reference_time(&self) -> Option<String> {
        let idx = self.columns.time?;
        self.rows
            .first()
            .and_then(|row| row.get(idx))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn read(&self, row: &[Value]) -> Option<WindRow> {
        let number = |idx: usize| row.get(idx).and_then(Value::as_f64);
        Some(WindRow {
            lat: number(self.columns.lat)?,
            lon: number(self.columns.lon)?,
            u: number(self.columns.u),
            v: number(self.columns.v),
        })
    }
}
