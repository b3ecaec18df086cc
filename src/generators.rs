use bit_set::BitSet;
use petgraph::graph::IndexType;
use rand::Rng;

use crate::cells::{Cartesian2DCoordinate, CoordinateSmallVec};
use crate::grid::{GridConfigError, MazeGrid};
use crate::units::{CellSize, Height, Width};

/// Where a carving run currently stands. `Complete` is terminal.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GeneratorState {
    Running,
    Complete,
}

/// Read-only view of one cell for callers that draw or inspect the maze
/// between steps. Walls are `[North, East, South, West]`, `true` when the
/// wall still stands.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellSnapshot {
    pub coord: Cartesian2DCoordinate,
    pub walls: [bool; 4],
    pub visited: bool,
}

/// Iterative depth-first backtracking maze carver, advanced one unit of work
/// at a time.
///
/// Starting from the first cell, each step either carves a passage into a
/// randomly chosen unvisited neighbour (remembering where it came from on a
/// stack), or retreats one stack entry when boxed in by visited cells. When
/// there is nowhere to carve and nowhere to retreat the run is complete.
/// Every passage opens into a cell that had no passages before, so the
/// carved passages form a spanning tree of the grid: a perfect maze with
/// exactly one route between any two cells and no cycles.
///
/// The carver holds no random state of its own. Each `step` draws from a
/// caller-supplied `Rng`, so a seeded generator replays the identical maze.
#[derive(Debug)]
pub struct RecursiveBacktracker<GridIndexType: IndexType> {
    grid: MazeGrid<GridIndexType>,
    current: Cartesian2DCoordinate,
    stack: Vec<Cartesian2DCoordinate>,
    visited: BitSet,
    state: GeneratorState,
}

impl<GridIndexType: IndexType> RecursiveBacktracker<GridIndexType> {
    /// Wraps an uncarved grid, with the cursor on the first cell and an
    /// empty backtracking stack. A grid of a single cell has nothing to
    /// carve and completes immediately.
    pub fn new(grid: MazeGrid<GridIndexType>) -> RecursiveBacktracker<GridIndexType> {
        let state = if grid.size() > 1 {
            GeneratorState::Running
        } else {
            GeneratorState::Complete
        };
        let cells_count = grid.size();

        RecursiveBacktracker {
            grid,
            current: Cartesian2DCoordinate::new(0, 0),
            stack: Vec::new(),
            visited: BitSet::with_capacity(cells_count),
            state,
        }
    }

    /// Builds the grid and the carving state in one call, sized to an area
    /// of `width` x `height` units at `cell_size` units per cell.
    pub fn for_area(width: Width,
                    height: Height,
                    cell_size: CellSize)
                    -> Result<RecursiveBacktracker<GridIndexType>, GridConfigError> {
        MazeGrid::new(width, height, cell_size).map(RecursiveBacktracker::new)
    }

    /// Performs one unit of carving work and reports the state afterwards.
    ///
    /// Each call does at most four neighbour checks and touches at most one
    /// wall, which makes it cheap enough to call once per rendered frame.
    /// A whole run finishes within `2 * columns * rows` calls. Stepping a
    /// complete carver is a no-op that reports `Complete` again, so over
    /// driving the machine is harmless.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> GeneratorState {
        if self.state == GeneratorState::Complete {
            return self.state;
        }

        self.mark_visited(self.current);
        let candidates = self.unvisited_neighbours(self.current);

        if let Some(next) = pick_random(rng, &candidates) {
            self.mark_visited(next);
            self.stack.push(self.current);
            self.grid
                .link(self.current, next)
                .expect("carve candidates are adjacent in-bounds cells");
            self.current = next;
        } else if let Some(backtrack_to) = self.stack.pop() {
            // Dead end: retreat without touching any wall.
            self.current = backtrack_to;
        } else {
            self.state = GeneratorState::Complete;
        }

        self.state
    }

    /// Drives `step` until the maze is fully carved.
    pub fn run_to_completion<R: Rng>(&mut self, rng: &mut R) {
        while let GeneratorState::Running = self.step(rng) {}
    }

    /// In-bounds neighbours of a cell that no carving step has reached yet,
    /// in the fixed direction scan order.
    pub fn unvisited_neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        self.grid
            .neighbours(coord)
            .iter()
            .cloned()
            .filter(|neighbour| !self.is_visited(*neighbour))
            .collect()
    }

    pub fn is_visited(&self, coord: Cartesian2DCoordinate) -> bool {
        self.grid
            .grid_coordinate_to_index(coord)
            .map_or(false, |index| self.visited.contains(index))
    }

    #[inline]
    pub fn state(&self) -> GeneratorState {
        self.state
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state == GeneratorState::Complete
    }

    /// The cell the next step will work from.
    #[inline]
    pub fn current(&self) -> Cartesian2DCoordinate {
        self.current
    }

    /// The backtracking trail, oldest entry first.
    #[inline]
    pub fn stack(&self) -> &[Cartesian2DCoordinate] {
        &self.stack
    }

    /// Snapshots of every cell in row major order, for rendering a frame of
    /// the carving process.
    pub fn cells(&self) -> impl Iterator<Item = CellSnapshot> + '_ {
        self.grid.iter().map(move |coord| {
            CellSnapshot {
                coord,
                walls: self.grid
                           .walls(coord)
                           .expect("cell iteration stays in bounds"),
                visited: self.is_visited(coord),
            }
        })
    }

    #[inline]
    pub fn grid(&self) -> &MazeGrid<GridIndexType> {
        &self.grid
    }

    /// Gives up the carving state, keeping only the grid.
    pub fn into_grid(self) -> MazeGrid<GridIndexType> {
        self.grid
    }

    fn mark_visited(&mut self, coord: Cartesian2DCoordinate) {
        let index = self.grid
                        .grid_coordinate_to_index(coord)
                        .expect("the cursor never leaves the grid");
        self.visited.insert(index);
    }
}

/// One candidate chosen uniformly at random, none when there is nothing to
/// choose from. Uniform because a cell never has more than four candidates.
fn pick_random<R: Rng>(rng: &mut R,
                       candidates: &CoordinateSmallVec)
                       -> Option<Cartesian2DCoordinate> {
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.gen::<usize>() % candidates.len()])
    }
}

/// Carve a complete maze into `grid` in one call.
pub fn recursive_backtracker<GridIndexType, R>(grid: MazeGrid<GridIndexType>,
                                               rng: &mut R)
                                               -> MazeGrid<GridIndexType>
    where GridIndexType: IndexType,
          R: Rng
{
    let mut carver = RecursiveBacktracker::new(grid);
    carver.run_to_completion(rng);
    carver.into_grid()
}
