use smallvec::SmallVec;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    /// Column of the cell, increasing to the East.
    pub x: u32,
    /// Row of the cell, increasing to the South.
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridDirection {
    North,
    East,
    South,
    West,
}

/// The fixed order in which neighbouring cells are examined.
///
/// Candidate sets keep this order so that a seeded random source replays
/// the same selections on every run.
pub const DIRECTIONS: [GridDirection; 4] = [GridDirection::North,
                                            GridDirection::East,
                                            GridDirection::South,
                                            GridDirection::West];

impl GridDirection {
    pub fn opposite(self) -> GridDirection {
        match self {
            GridDirection::North => GridDirection::South,
            GridDirection::East => GridDirection::West,
            GridDirection::South => GridDirection::North,
            GridDirection::West => GridDirection::East,
        }
    }

    /// Which slot of a cell's wall array this direction maps to.
    ///
    /// The arithmetic `2±dy`/`1∓dx` formulation of the same mapping is a
    /// classic source of sign errors, so it is a lookup instead.
    pub fn wall_index(self) -> usize {
        match self {
            GridDirection::North => 0,
            GridDirection::East => 1,
            GridDirection::South => 2,
            GridDirection::West => 3,
        }
    }
}

/// Creates a new `Cartesian2DCoordinate` offset 1 cell away in the given direction.
/// Returns None if the coordinate is not representable.
pub fn offset_coordinate(coord: Cartesian2DCoordinate,
                         dir: GridDirection)
                         -> Option<Cartesian2DCoordinate> {
    let (x, y) = (coord.x, coord.y);
    match dir {
        GridDirection::North => {
            if y > 0 {
                Some(Cartesian2DCoordinate::new(x, y - 1))
            } else {
                None
            }
        }
        GridDirection::East => Some(Cartesian2DCoordinate::new(x + 1, y)),
        GridDirection::South => Some(Cartesian2DCoordinate::new(x, y + 1)),
        GridDirection::West => {
            if x > 0 {
                Some(Cartesian2DCoordinate::new(x - 1, y))
            } else {
                None
            }
        }
    }
}

/// The direction leading from `a` to `b`, if the two coordinates are exactly
/// one cell apart along an axis.
pub fn direction_between(a: Cartesian2DCoordinate,
                         b: Cartesian2DCoordinate)
                         -> Option<GridDirection> {
    DIRECTIONS.iter()
              .cloned()
              .find(|dir| offset_coordinate(a, *dir) == Some(b))
}
