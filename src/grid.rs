use std::error;
use std::fmt;

use petgraph::graph;
use petgraph::graph::IndexType;
use petgraph::{Graph, Undirected};

use crate::cells::{direction_between, offset_coordinate, Cartesian2DCoordinate,
                   CoordinateSmallVec, GridDirection, DIRECTIONS};
use crate::units::{CellSize, ColumnsCount, EdgesCount, Height, NodesCount, RowsCount, Width};

/// Rejected grid configurations. No partial grid is ever handed back.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridConfigError {
    ZeroCellSize,
    ZeroColumns,
    ZeroRows,
    CapacityExceeded,
}

impl fmt::Display for GridConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match *self {
            GridConfigError::ZeroCellSize => "cell size must be at least one unit",
            GridConfigError::ZeroColumns => "grid extent is narrower than one cell",
            GridConfigError::ZeroRows => "grid extent is shorter than one cell",
            GridConfigError::CapacityExceeded => "cell count does not fit the graph index type",
        };
        write!(f, "{}", message)
    }
}

impl error::Error for GridConfigError {}

/// Rejected carving requests.
///
/// `NotAdjacent` marks an internal invariant breach when it escapes from the
/// generator: the step machine only ever carves between grid neighbours.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CarveError {
    InvalidGridCoordinate,
    SelfLink,
    NotAdjacent,
}

impl fmt::Display for CarveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match *self {
            CarveError::InvalidGridCoordinate => "coordinate outside the grid",
            CarveError::SelfLink => "cannot carve a passage from a cell to itself",
            CarveError::NotAdjacent => "cannot carve a passage between non-adjacent cells",
        };
        write!(f, "{}", message)
    }
}

impl error::Error for CarveError {}

/// A rectangular grid of cells where every cell starts boxed in by four
/// walls.
///
/// Walls are not stored per cell. The grid keeps one undirected graph node
/// per cell and records a carved passage as a graph edge, so the wall on
/// either side of a shared boundary is a single fact: `walls[k]` of a cell
/// is `false` exactly when an edge links it to the neighbour across side
/// `k`. Passages are only ever carved, never bricked back up.
#[derive(Debug)]
pub struct MazeGrid<GridIndexType: IndexType> {
    graph: Graph<(), (), Undirected, GridIndexType>,
    columns: ColumnsCount,
    rows: RowsCount,
}

impl<GridIndexType: IndexType> MazeGrid<GridIndexType> {
    /// Creates a grid sized to fit an area of `width` x `height` units when
    /// each cell is `cell_size` units square. Partial cells at the edges are
    /// dropped, as the fractional cell cannot be carved.
    pub fn new(width: Width,
               height: Height,
               cell_size: CellSize)
               -> Result<MazeGrid<GridIndexType>, GridConfigError> {

        if cell_size.0 == 0 {
            return Err(GridConfigError::ZeroCellSize);
        }
        let columns = ColumnsCount(width.0 / cell_size.0);
        let rows = RowsCount(height.0 / cell_size.0);
        MazeGrid::with_dimensions(columns, rows)
    }

    /// Creates a grid from already known cell counts.
    pub fn with_dimensions(columns: ColumnsCount,
                           rows: RowsCount)
                           -> Result<MazeGrid<GridIndexType>, GridConfigError> {

        if columns.0 < 1 {
            return Err(GridConfigError::ZeroColumns);
        }
        if rows.0 < 1 {
            return Err(GridConfigError::ZeroRows);
        }

        let (NodesCount(nodes), EdgesCount(edges)) = graph_size(columns, rows);
        let mut grid = MazeGrid {
            graph: Graph::with_capacity(nodes, edges),
            columns,
            rows,
        };
        for _ in 0..nodes {
            let _ = grid.graph.add_node(());
        }

        Ok(grid)
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.columns.0 * self.rows.0
    }

    /// How many passages have been carved so far.
    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.columns.0 && (coord.y as usize) < self.rows.0
    }

    /// Row major index of a cell, `None` for anything outside the grid.
    /// The `None` is the only out-of-bounds marker - there is no sentinel
    /// index value to misuse.
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            let ColumnsCount(columns) = self.columns;
            Some(coord.y as usize * columns + coord.x as usize)
        } else {
            None
        }
    }

    /// Carve a passage between two adjacent cells, opening the facing walls
    /// on both sides at once.
    ///
    /// Carving an already open passage is a no-op. Anything other than a
    /// pair of distinct in-bounds axis neighbours is refused.
    pub fn link(&mut self,
                a: Cartesian2DCoordinate,
                b: Cartesian2DCoordinate)
                -> Result<(), CarveError> {

        let a_index = self.grid_coordinate_graph_index(a)
                          .ok_or(CarveError::InvalidGridCoordinate)?;
        let b_index = self.grid_coordinate_graph_index(b)
                          .ok_or(CarveError::InvalidGridCoordinate)?;
        if a == b {
            return Err(CarveError::SelfLink);
        }
        if direction_between(a, b).is_none() {
            return Err(CarveError::NotAdjacent);
        }

        let _ = self.graph.update_edge(a_index, b_index, ());
        Ok(())
    }

    /// Cell nodes that are linked to a particular node by a passage.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        self.grid_coordinate_graph_index(coord).map(|node_index| {
            let ColumnsCount(columns) = self.columns;
            self.graph
                .neighbors(node_index)
                .map(|linked_node| index_to_grid_coordinate(columns, linked_node.index()))
                .collect()
        })
    }

    /// Are two cells in the grid connected by a carved passage?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        match (self.grid_coordinate_graph_index(a), self.grid_coordinate_graph_index(b)) {
            (Some(a_index), Some(b_index)) => self.graph.find_edge(a_index, b_index).is_some(),
            _ => false,
        }
    }

    pub fn is_neighbour_linked(&self,
                               coord: Cartesian2DCoordinate,
                               direction: GridDirection)
                               -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false,
                    |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// Cell nodes that are to the North, East, South or West of a particular
    /// node, whether or not a passage links them. Order follows the fixed
    /// `DIRECTIONS` scan.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        DIRECTIONS.iter()
                  .filter_map(|&dir| self.neighbour_at_direction(coord, dir))
                  .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: GridDirection)
                                  -> Option<Cartesian2DCoordinate> {
        offset_coordinate(coord, direction)
            .and_then(|neighbour_coord| if self.is_valid_coordinate(neighbour_coord) {
                Some(neighbour_coord)
            } else {
                None
            })
    }

    /// The wall state of one cell as `[North, East, South, West]`, `true`
    /// meaning the wall still stands. Derived from the passage graph, so the
    /// two sides of a shared wall can never disagree.
    pub fn walls(&self, coord: Cartesian2DCoordinate) -> Option<[bool; 4]> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        let mut walls = [true; 4];
        for dir in DIRECTIONS.iter().cloned() {
            walls[dir.wall_index()] = !self.is_neighbour_linked(coord, dir);
        }
        Some(walls)
    }

    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            columns: self.columns.0,
            cells_count: self.size(),
        }
    }

    fn grid_coordinate_graph_index(&self,
                                   coord: Cartesian2DCoordinate)
                                   -> Option<graph::NodeIndex<GridIndexType>> {
        self.grid_coordinate_to_index(coord)
            .map(graph::NodeIndex::<GridIndexType>::new)
    }
}

impl<GridIndexType: IndexType> fmt::Display for MazeGrid<GridIndexType> {
    /// Plain text wall diagram, one `+---+` box per cell. Diagnostic aid for
    /// tests and docs.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {

        const CORNER: &str = "+";
        const WALL_NS: &str = "---";
        const OPEN_NS: &str = "   ";
        const WALL_EW: &str = "|";
        const OPEN_EW: &str = " ";
        const CELL_BODY: &str = "   ";

        let ColumnsCount(columns) = self.columns;
        let RowsCount(rows) = self.rows;

        let mut output = String::new();
        for y in 0..rows {
            let mut north_walls = String::from(CORNER);
            let mut west_walls = String::new();
            for x in 0..columns {
                let coord = Cartesian2DCoordinate::new(x as u32, y as u32);
                let walls = self.walls(coord).expect("display only visits in-bounds cells");

                north_walls.push_str(if walls[GridDirection::North.wall_index()] {
                    WALL_NS
                } else {
                    OPEN_NS
                });
                north_walls.push_str(CORNER);

                west_walls.push_str(if walls[GridDirection::West.wall_index()] {
                    WALL_EW
                } else {
                    OPEN_EW
                });
                west_walls.push_str(CELL_BODY);
            }
            // The grid boundary is always a standing wall.
            west_walls.push_str(WALL_EW);

            output.push_str(&north_walls);
            output.push('\n');
            output.push_str(&west_walls);
            output.push('\n');
        }
        output.push_str(CORNER);
        for _ in 0..columns {
            output.push_str(WALL_NS);
            output.push_str(CORNER);
        }
        output.push('\n');

        write!(f, "{}", output)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    columns: usize,
    cells_count: usize,
}

impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = index_to_grid_coordinate(self.columns, self.current_cell_number);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()

impl<'a, GridIndexType: IndexType> IntoIterator for &'a MazeGrid<GridIndexType> {
    type Item = Cartesian2DCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn index_to_grid_coordinate(columns: usize, one_dimensional_index: usize) -> Cartesian2DCoordinate {
    let y = one_dimensional_index / columns;
    let x = one_dimensional_index - (y * columns);
    Cartesian2DCoordinate {
        x: x as u32,
        y: y as u32,
    }
}

fn graph_size(columns: ColumnsCount, rows: RowsCount) -> (NodesCount, EdgesCount) {
    let (ColumnsCount(c), RowsCount(r)) = (columns, rows);
    // Exact count of interior walls: every one is a potential passage.
    let edges_count = c * (r - 1) + r * (c - 1);
    (NodesCount(c * r), EdgesCount(edges_count))
}

#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools; // a trait

    type SmallGrid = MazeGrid<u8>;

    fn small_grid(columns: usize, rows: usize) -> SmallGrid {
        SmallGrid::with_dimensions(ColumnsCount(columns), RowsCount(rows)).unwrap()
    }

    #[test]
    fn area_construction_floors_partial_cells() {
        let g: MazeGrid<u16> = MazeGrid::new(Width(320), Height(250), CellSize(20)).unwrap();
        assert_eq!(g.columns(), ColumnsCount(16));
        assert_eq!(g.rows(), RowsCount(12));
        assert_eq!(g.size(), 192);
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn degenerate_configurations_are_rejected() {
        let narrow = MazeGrid::<u16>::new(Width(10), Height(10), CellSize(20));
        assert_eq!(narrow.err(), Some(GridConfigError::ZeroColumns));

        let short = MazeGrid::<u16>::new(Width(40), Height(10), CellSize(20));
        assert_eq!(short.err(), Some(GridConfigError::ZeroRows));

        let unsized_cell = MazeGrid::<u16>::new(Width(40), Height(40), CellSize(0));
        assert_eq!(unsized_cell.err(), Some(GridConfigError::ZeroCellSize));

        let no_columns = MazeGrid::<u16>::with_dimensions(ColumnsCount(0), RowsCount(3));
        assert_eq!(no_columns.err(), Some(GridConfigError::ZeroColumns));
    }

    #[test]
    fn neighbour_cells() {
        // Deliberately non-square so that transposed column/row handling
        // would show up at the Eastern and Southern boundaries.
        let g = small_grid(10, 6);

        let check_expected_neighbours = |coord, expected_neighbours: &[Cartesian2DCoordinate]| {
            let neighbours: Vec<Cartesian2DCoordinate> = g.neighbours(coord)
                                                          .iter()
                                                          .cloned()
                                                          .sorted();
            let expected: Vec<Cartesian2DCoordinate> = expected_neighbours.iter()
                                                                          .cloned()
                                                                          .sorted();
            assert_eq!(neighbours, expected);
        };
        let gc = Cartesian2DCoordinate::new;

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 5), &[gc(0, 4), gc(1, 5)]);
        check_expected_neighbours(gc(9, 5), &[gc(9, 4), gc(8, 5)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(0, 2), gc(1, 1)]);
        check_expected_neighbours(gc(9, 4), &[gc(9, 3), gc(9, 5), gc(8, 4)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbours_follow_direction_scan_order() {
        let g = small_grid(3, 3);
        let mid = Cartesian2DCoordinate::new(1, 1);
        assert_eq!(&*g.neighbours(mid),
                   &[Cartesian2DCoordinate::new(1, 0),
                     Cartesian2DCoordinate::new(2, 1),
                     Cartesian2DCoordinate::new(1, 2),
                     Cartesian2DCoordinate::new(0, 1)]);
    }

    #[test]
    fn neighbour_at_dir() {
        let g = small_grid(2, 2);
        let gc = Cartesian2DCoordinate::new;
        let check_neighbour = |coord, dir: GridDirection, expected| {
            assert_eq!(g.neighbour_at_direction(coord, dir), expected);
        };
        check_neighbour(gc(0, 0), GridDirection::North, None);
        check_neighbour(gc(0, 0), GridDirection::South, Some(gc(0, 1)));
        check_neighbour(gc(0, 0), GridDirection::East, Some(gc(1, 0)));
        check_neighbour(gc(0, 0), GridDirection::West, None);

        check_neighbour(gc(1, 1), GridDirection::North, Some(gc(1, 0)));
        check_neighbour(gc(1, 1), GridDirection::South, None);
        check_neighbour(gc(1, 1), GridDirection::East, None);
        check_neighbour(gc(1, 1), GridDirection::West, Some(gc(0, 1)));
    }

    #[test]
    fn coordinate_index_mapping_is_row_major() {
        let g = small_grid(4, 3);
        let gc = Cartesian2DCoordinate::new;

        assert_eq!(g.grid_coordinate_to_index(gc(0, 0)), Some(0));
        assert_eq!(g.grid_coordinate_to_index(gc(3, 0)), Some(3));
        assert_eq!(g.grid_coordinate_to_index(gc(0, 1)), Some(4));
        assert_eq!(g.grid_coordinate_to_index(gc(3, 2)), Some(11));

        // Out of bounds in either axis is a None, nothing to dereference.
        assert_eq!(g.grid_coordinate_to_index(gc(4, 0)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(0, 3)), None);
    }

    #[test]
    fn cell_iter() {
        let g = small_grid(2, 2);
        assert_eq!(g.iter().collect::<Vec<Cartesian2DCoordinate>>(),
                   &[Cartesian2DCoordinate::new(0, 0),
                     Cartesian2DCoordinate::new(1, 0),
                     Cartesian2DCoordinate::new(0, 1),
                     Cartesian2DCoordinate::new(1, 1)]);
        assert_eq!(g.iter().len(), 4);
    }

    #[test]
    fn all_walls_stand_initially() {
        let g = small_grid(3, 2);
        for coord in g.iter() {
            assert_eq!(g.walls(coord), Some([true; 4]));
        }
        assert_eq!(g.walls(Cartesian2DCoordinate::new(3, 0)), None);
    }

    #[test]
    fn linking_cells() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(0, 1);
        let b = Cartesian2DCoordinate::new(0, 2);
        let c = Cartesian2DCoordinate::new(0, 3);

        let sorted_links = |grid: &SmallGrid, coord| -> Vec<Cartesian2DCoordinate> {
            grid.links(coord)
                .expect("coordinate is in the grid")
                .iter()
                .cloned()
                .sorted()
        };
        macro_rules! links_sorted {
            ($x:expr) => (sorted_links(&g, $x))
        }

        // Testing that the order of the arguments to `is_linked` does not matter
        macro_rules! bi_check_linked {
            ($x:expr, $y:expr) => (g.is_linked($x, $y) && g.is_linked($y, $x))
        }

        // a, b and c start with no links
        assert!(!bi_check_linked!(a, b));
        assert!(!bi_check_linked!(a, c));
        assert!(!bi_check_linked!(b, c));
        assert_eq!(links_sorted!(a), vec![]);
        assert_eq!(links_sorted!(b), vec![]);
        assert_eq!(links_sorted!(c), vec![]);

        g.link(a, b).unwrap();
        // a - b linked bi-directionally
        assert!(bi_check_linked!(a, b));
        assert_eq!(links_sorted!(a), vec![b]);
        assert_eq!(links_sorted!(b), vec![a]);

        // The facing walls opened together, the other walls still stand.
        assert_eq!(g.walls(a).unwrap(), [true, true, false, true]);
        assert_eq!(g.walls(b).unwrap(), [false, true, true, true]);

        g.link(b, c).unwrap();
        // a - b still linked bi-directionally after linking b - c
        assert!(bi_check_linked!(a, b));
        assert!(bi_check_linked!(b, c));
        assert!(!bi_check_linked!(a, c));
        assert_eq!(links_sorted!(a), vec![b]);
        assert_eq!(links_sorted!(b), vec![a, c]);
        assert_eq!(links_sorted!(c), vec![b]);
    }

    #[test]
    fn carving_is_idempotent() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(0, 0);
        let b = Cartesian2DCoordinate::new(0, 1);
        g.link(a, b).unwrap();
        g.link(a, b).unwrap();
        g.link(b, a).unwrap();
        assert_eq!(g.links_count(), 1);
        assert_eq!(&*g.links(a).unwrap(), &[b]);
        assert_eq!(&*g.links(b).unwrap(), &[a]);
    }

    #[test]
    fn self_carving_is_rejected() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(0, 0);
        assert_eq!(g.link(a, a), Err(CarveError::SelfLink));
        assert!(g.links(a).unwrap().is_empty());
    }

    #[test]
    fn non_adjacent_carving_is_rejected() {
        let mut g = small_grid(4, 4);
        let gc = Cartesian2DCoordinate::new;

        // Two apart on an axis and diagonal single steps are all refused.
        assert_eq!(g.link(gc(0, 0), gc(2, 0)), Err(CarveError::NotAdjacent));
        assert_eq!(g.link(gc(0, 0), gc(1, 1)), Err(CarveError::NotAdjacent));
        assert_eq!(g.link(gc(3, 3), gc(1, 2)), Err(CarveError::NotAdjacent));
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn carving_outside_the_grid_is_rejected() {
        let mut g = small_grid(2, 2);
        let gc = Cartesian2DCoordinate::new;
        assert_eq!(g.link(gc(1, 0), gc(2, 0)),
                   Err(CarveError::InvalidGridCoordinate));
        assert_eq!(g.link(gc(5, 5), gc(5, 6)),
                   Err(CarveError::InvalidGridCoordinate));
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn display_draws_standing_walls() {
        let mut g = small_grid(2, 1);
        assert_eq!(format!("{}", g), "+---+---+\n|   |   |\n+---+---+\n");

        g.link(Cartesian2DCoordinate::new(0, 0), Cartesian2DCoordinate::new(1, 0))
         .unwrap();
        assert_eq!(format!("{}", g), "+---+---+\n|       |\n+---+---+\n");
    }
}
