//! Stitch one or more wind slices into a dense row-major grid.
//!
//! Rows run north to south, columns west to east in the -180..180
//! convention. Cells no slice covered stay `None`. The result depends only on
//! the set of rows, so a request split at the 0/360 seam assembles to the same
//! grid as one fetch of the whole range would.

use std::collections::{BTreeMap, HashMap};

use crate::grid::{coord_key, remap_lon, GRID_STEP};
use crate::slice::WindSlice;

/// Dense U/V matrices plus the axes that index them.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledGrid {
    /// Latitudes, descending. Row `j` of the matrices.
    pub lats: Vec<f64>,
    /// Longitudes in -180..180, ascending. Column `i` of the matrices.
    pub lons: Vec<f64>,
    /// Eastward component, row-major, `ny * nx` cells.
    pub u: Vec<Option<f64>>,
    /// Northward component, row-major, `ny * nx` cells.
    pub v: Vec<Option<f64>>,
    /// Source rows that could not be placed on the grid.
    pub skipped: usize,
}

impl AssembledGrid {
    pub fn nx(&self) -> usize {
        self.lons.len()
    }

    pub fn ny(&self) -> usize {
        self.lats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lons.is_empty() || self.lats.is_empty()
    }

    /// Longitude spacing, taken from the first two columns.
    pub fn dx(&self) -> f64 {
        axis_step(&self.lons)
    }

    /// Latitude spacing, taken from the first two rows.
    pub fn dy(&self) -> f64 {
        axis_step(&self.lats)
    }

    /// Components at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<(Option<f64>, Option<f64>)> {
        if row >= self.ny() || col >= self.nx() {
            return None;
        }
        let idx = row * self.nx() + col;
        Some((self.u[idx], self.v[idx]))
    }
}

fn axis_step(axis: &[f64]) -> f64 {
    match axis {
        [first, second, ..] => (second - first).abs(),
        _ => GRID_STEP,
    }
}

/// Build the grid from slices given west to east.
pub fn assemble(slices: &[WindSlice]) -> AssembledGrid {
    let mut lat_lines: BTreeMap<i64, f64> = BTreeMap::new();
    let mut lon_lines: BTreeMap<i64, f64> = BTreeMap::new();

    for row in slices.iter().flat_map(|s| s.rows()).flatten() {
        lat_lines.insert(coord_key(row.lat), row.lat);
        let lon = remap_lon(row.lon);
        lon_lines.insert(coord_key(lon), lon);
    }

    let lats: Vec<f64> = lat_lines.values().rev().copied().collect();
    let lons: Vec<f64> = lon_lines.values().copied().collect();

    let row_of: HashMap<i64, usize> = lats
        .iter()
        .enumerate()
        .map(|(j, lat)| (coord_key(*lat), j))
        .collect();
    let col_of: HashMap<i64, usize> = lons
        .iter()
        .enumerate()
        .map(|(i, lon)| (coord_key(*lon), i))
        .collect();

    let nx = lons.len();
    let cells = nx * lats.len();
    let mut u = vec![None; cells];
    let mut v = vec![None; cells];
    let mut skipped = 0;

    for row in slices.iter().flat_map(|s| s.rows()) {
        let placed = row.and_then(|r| {
            let j = *row_of.get(&coord_key(r.lat))?;
            let i = *col_of.get(&coord_key(remap_lon(r.lon)))?;
            Some((j * nx + i, r))
        });

        match placed {
            Some((idx, r)) => {
                u[idx] = r.u;
                v[idx] = r.v;
            }
            None => skipped += 1,
        }
    }

    AssembledGrid {
        lats,
        lons,
        u,
        v,
        skipped,
    }
}
