/// A cell on the game grid.  Coordinates are signed so that a position one
/// step past an edge can be represented and recognized as a collision.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Position {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Position {
    pub(crate) const ORIGIN: Position = Position { x: 0, y: 0 };

    pub(crate) const fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    /// Return the position one cell away in `direction`, ignoring bounds
    pub(crate) fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Offset of one step in this direction; `y` grows downwards.
    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Move `pos` one cell in this direction within `bounds`.  Returns `None`
    /// if the move would leave a non-wraparound grid.
    pub(crate) fn advance(self, pos: Position, bounds: Bounds) -> Option<Position> {
        let next = pos.step(self);
        if !bounds.check_boundary_collision(next) {
            Some(next)
        } else if bounds.wrap {
            Some(Position {
                x: next.x.rem_euclid(bounds.width),
                y: next.y.rem_euclid(bounds.height),
            })
        } else {
            None
        }
    }
}

/// Extents of the playing field
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) width: i32,
    pub(crate) height: i32,
    /// Whether leaving one edge re-enters from the opposite edge instead of
    /// ending the game
    pub(crate) wrap: bool,
}

impl Bounds {
    pub(crate) fn new(width: u16, height: u16, wrap: bool) -> Bounds {
        Bounds {
            width: i32::from(width),
            height: i32::from(height),
            wrap,
        }
    }

    /// Return true if `pos` lies outside the grid
    pub(crate) fn check_boundary_collision(self, pos: Position) -> bool {
        !((0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y))
    }

    /// Iterate over every cell of the grid in row-major order
    pub(crate) fn positions(self) -> impl Iterator<Item = Position> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position { x, y }))
    }

    pub(crate) fn center(self) -> Position {
        Position {
            x: self.width / 2,
            y: self.height / 2,
        }
    }
}
