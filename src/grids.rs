use std::{u16, u32, u8};

use crate::grid::{GridConfigError, MazeGrid};
use crate::units::{ColumnsCount, RowsCount};

pub type SmallMazeGrid = MazeGrid<u8>;
pub type MediumMazeGrid = MazeGrid<u16>;
pub type LargeMazeGrid = MazeGrid<u32>;

// The top index value of each width is reserved by the graph as an end
// marker, hence the strict comparisons.

pub fn small_maze_grid(columns: ColumnsCount,
                       rows: RowsCount)
                       -> Result<SmallMazeGrid, GridConfigError> {

    if columns.0 * rows.0 < u8::MAX as usize {
        SmallMazeGrid::with_dimensions(columns, rows)
    } else {
        Err(GridConfigError::CapacityExceeded)
    }
}

pub fn medium_maze_grid(columns: ColumnsCount,
                        rows: RowsCount)
                        -> Result<MediumMazeGrid, GridConfigError> {

    if columns.0 * rows.0 < u16::MAX as usize {
        MediumMazeGrid::with_dimensions(columns, rows)
    } else {
        Err(GridConfigError::CapacityExceeded)
    }
}

pub fn large_maze_grid(columns: ColumnsCount,
                       rows: RowsCount)
                       -> Result<LargeMazeGrid, GridConfigError> {

    if columns.0 * rows.0 < u32::MAX as usize {
        LargeMazeGrid::with_dimensions(columns, rows)
    } else {
        Err(GridConfigError::CapacityExceeded)
    }
}
