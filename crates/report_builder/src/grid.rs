//! xT grid CSV: headerless, rows = y-bins, columns = x-bins.

use anyhow::{Context, Result};
use match_core::{AnalyticsError, XtGrid};
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_GRID_COLS: usize = 120;
pub const DEFAULT_GRID_ROWS: usize = 80;

/// Parse a headerless numeric CSV into a grid.
pub fn read_xt_grid<R: std::io::Read>(reader: R) -> Result<XtGrid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read grid row {}", i + 1))?;
        let row = record
            .iter()
            .enumerate()
            .map(|(j, cell)| {
                cell.trim()
                    .parse::<f64>()
                    .with_context(|| format!("Invalid grid value at row {}, column {}: '{}'", i + 1, j + 1, cell))
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(XtGrid::from_rows(rows)?)
}

pub fn load_xt_grid(path: &Path) -> Result<XtGrid> {
    if !path.exists() {
        return Err(AnalyticsError::MissingConfiguration(format!("xT grid {}", path.display())).into());
    }
    let file = fs::File::open(path).with_context(|| format!("Failed to open xT grid: {}", path.display()))?;
    read_xt_grid(file).with_context(|| format!("Failed to load xT grid: {}", path.display()))
}

/// Placeholder grid whose value grows with the cube of the x position:
/// `grid[y][x] = (x / cols)^3 * 0.1`.
pub fn generate_dummy_grid(cols: usize, rows: usize) -> Result<XtGrid> {
    let row: Vec<f64> = (0..cols)
        .map(|x| (x as f64 / cols as f64).powi(3) * 0.1)
        .collect();
    Ok(XtGrid::from_rows(vec![row; rows])?)
}

pub fn write_xt_grid(path: &Path, grid: &XtGrid) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create grid file: {}", path.display()))?;
    for row in grid.to_rows() {
        writer.serialize(row).context("Failed to write grid row")?;
    }
    writer.flush().context("Failed to flush grid file")?;
    info!(rows = grid.rows(), cols = grid.cols(), path = %path.display(), "xT grid written");
    Ok(())
}
