//! **maze-carver** is a maze generation library built around a steppable
//! depth-first backtracking carver, so a caller can drive one carving step
//! per frame or run the whole generation in one call.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod grids;
pub mod units;
pub mod utils;
