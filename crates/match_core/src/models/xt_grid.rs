//! # Expected Threat Grid
//!
//! A precomputed lookup table of threat values, rows = y-bins and
//! columns = x-bins, covering the full 120x80 pitch. The engine does not
//! learn or check the values; it only requires a non-empty rectangle.

use serde::{Deserialize, Serialize};

use crate::coordinates::{PITCH_LENGTH, PITCH_WIDTH};
use crate::error::{AnalyticsError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct XtGrid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl XtGrid {
    /// Build a grid from row-major rows. Rows must be equal length and non-empty.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if n_rows == 0 || n_cols == 0 {
            return Err(AnalyticsError::InvalidGrid("grid is empty".to_string()));
        }

        let mut values = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(AnalyticsError::InvalidGrid(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n_cols
                )));
            }
            if let Some(v) = row.iter().find(|v| !v.is_finite()) {
                return Err(AnalyticsError::InvalidGrid(format!(
                    "row {} contains non-finite value {}",
                    i, v
                )));
            }
            values.extend(row);
        }

        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            values,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row.min(self.rows - 1) * self.cols + col.min(self.cols - 1)]
    }

    /// Cell (row, col) for a point on the 120x80 pitch, clamped to the grid.
    pub fn cell_for(&self, x: f64, y: f64) -> (usize, usize) {
        (
            bin(y, PITCH_WIDTH, self.rows),
            bin(x, PITCH_LENGTH, self.cols),
        )
    }

    /// Threat value at a point on the 120x80 pitch.
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        let (row, col) = self.cell_for(x, y);
        self.get(row, col)
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.cols).map(|c| c.to_vec()).collect()
    }
}

/// Map `value` in [0, max] to one of `n_bins` bins, clamping out-of-range input.
pub fn bin(value: f64, max: f64, n_bins: usize) -> usize {
    let clamped = value.clamp(0.0, max);
    let idx = (clamped / max * n_bins as f64).floor() as usize;
    idx.min(n_bins - 1)
}

impl TryFrom<Vec<Vec<f64>>> for XtGrid {
    type Error = AnalyticsError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<XtGrid> for Vec<Vec<f64>> {
    fn from(grid: XtGrid) -> Self {
        grid.to_rows()
    }
}
