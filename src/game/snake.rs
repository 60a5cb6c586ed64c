use super::grid::{Bounds, Direction, Position};
use std::collections::VecDeque;

/// Snake state.  Segments are stored head first, and there is always at
/// least one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The positions of all of the cells of the snake, with the head at the
    /// front and the tail at the back
    pub(super) segments: VecDeque<Position>,

    /// The direction in which the snake last moved (or faces, before its
    /// first move)
    pub(super) heading: Direction,
}

/// What happened when the snake tried to move
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Advance {
    /// The snake moved one cell and kept its length
    Moved,
    /// The snake moved onto the food and grew by one cell
    Ate,
    /// The snake could not move; it is left as it was
    Collided(Collision),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Collision {
    /// The head would have left a non-wraparound grid
    Wall,
    /// The head would have entered one of the snake's own cells
    Body,
}

impl Snake {
    /// Create a snake with its head at `head`, facing `heading`, with up to
    /// `length - 1` body cells trailing behind it.  Body cells that would fall
    /// outside of `bounds` are omitted.
    pub(crate) fn new(head: Position, heading: Direction, length: usize, bounds: Bounds) -> Snake {
        let behind = heading.reverse();
        let segments = std::iter::successors(Some(head), |&p| Some(p.step(behind)))
            .take(length.max(1))
            .take_while(|&p| !bounds.check_boundary_collision(p))
            .collect::<VecDeque<_>>();
        let segments = if segments.is_empty() {
            VecDeque::from([head])
        } else {
            segments
        };
        Snake { segments, heading }
    }

    /// Return the position of the snake's head
    pub(crate) fn head(&self) -> Position {
        // `segments` is never empty.
        self.segments.front().copied().unwrap_or(Position::ORIGIN)
    }

    pub(crate) fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn heading(&self) -> Direction {
        self.heading
    }

    /// Return true if `pos` is occupied by any part of the snake
    pub(crate) fn check_self_collision(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Move the snake forwards one cell in `direction` within `bounds`.
    ///
    /// The new head is checked against the body as it is before the tail
    /// moves, so entering the cell the tail is about to vacate counts as a
    /// collision.  On a collision the snake is not modified.
    pub(crate) fn advance(
        &mut self,
        direction: Direction,
        bounds: Bounds,
        food: Option<Position>,
    ) -> Advance {
        let Some(next) = direction.advance(self.head(), bounds) else {
            return Advance::Collided(Collision::Wall);
        };
        if self.check_self_collision(next) {
            return Advance::Collided(Collision::Body);
        }
        self.segments.push_front(next);
        self.heading = direction;
        if food == Some(next) {
            Advance::Ate
        } else {
            let _ = self.segments.pop_back();
            Advance::Moved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bounds() -> Bounds {
        Bounds::new(10, 10, false)
    }

    #[test]
    fn new_snake_trails_behind_head() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3, bounds());
        assert_eq!(
            snake.segments,
            VecDeque::from([
                Position::new(5, 5),
                Position::new(4, 5),
                Position::new(3, 5)
            ])
        );
        assert_eq!(snake.heading(), Direction::Right);
    }

    #[test]
    fn new_snake_clipped_at_edge() {
        let snake = Snake::new(Position::new(1, 5), Direction::Right, 4, bounds());
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(1, 5));
    }

    #[test]
    fn plain_move_keeps_length() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3, bounds());
        assert_eq!(
            snake.advance(Direction::Up, bounds(), Some(Position::new(0, 0))),
            Advance::Moved
        );
        assert_eq!(
            snake.segments,
            VecDeque::from([
                Position::new(5, 4),
                Position::new(5, 5),
                Position::new(4, 5)
            ])
        );
        assert_eq!(snake.heading(), Direction::Up);
    }

    #[test]
    fn eating_grows_by_one() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3, bounds());
        assert_eq!(
            snake.advance(Direction::Right, bounds(), Some(Position::new(6, 5))),
            Advance::Ate
        );
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.segments.back(), Some(&Position::new(3, 5)));
    }

    #[test]
    fn wall_collision_leaves_snake_untouched() {
        let mut snake = Snake::new(Position::new(9, 5), Direction::Right, 3, bounds());
        let before = snake.clone();
        assert_eq!(
            snake.advance(Direction::Right, bounds(), None),
            Advance::Collided(Collision::Wall)
        );
        assert_eq!(snake, before);
    }

    #[test]
    fn wraparound_move() {
        let wrap = Bounds::new(10, 10, true);
        let mut snake = Snake::new(Position::new(9, 5), Direction::Right, 3, wrap);
        assert_eq!(snake.advance(Direction::Right, wrap, None), Advance::Moved);
        assert_eq!(snake.head(), Position::new(0, 5));
    }

    #[test]
    fn body_collision() {
        // A 2x2 loop: moving down from the head enters the tail's cell.
        let mut snake = Snake {
            segments: VecDeque::from([
                Position::new(4, 4),
                Position::new(5, 4),
                Position::new(5, 5),
                Position::new(4, 5),
            ]),
            heading: Direction::Left,
        };
        let before = snake.clone();
        assert!(snake.check_self_collision(Position::new(4, 5)));
        assert_eq!(
            snake.advance(Direction::Down, bounds(), None),
            Advance::Collided(Collision::Body)
        );
        assert_eq!(snake, before);
    }
}
