mod grid;
mod snake;
mod speed;
pub(crate) use self::grid::{Bounds, Direction, Position};
pub(crate) use self::snake::Collision;
use self::snake::{Advance, Snake};
pub(crate) use self::speed::SpeedCurve;
use crate::consts;
use log::debug;
use rand::{seq::IteratorRandom, Rng};
use std::collections::{HashSet, VecDeque};

/// The state of a single game from start to game over.  Playing again means
/// constructing a new `GameState`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GameState<R = rand::rngs::ThreadRng> {
    rng: R,
    bounds: Bounds,
    snake: Snake,
    /// The direction the snake will move in on the next tick
    direction: Direction,
    /// `None` only once the board has been filled
    food: Option<Position>,
    score: u32,
    level: u32,
    status: Status,
}

impl GameState<rand::rngs::ThreadRng> {
    pub(crate) fn new(bounds: Bounds) -> Self {
        GameState::new_with_rng(bounds, rand::rng())
    }
}

impl<R: Rng> GameState<R> {
    pub(crate) fn new_with_rng(bounds: Bounds, rng: R) -> GameState<R> {
        let direction = Direction::Right;
        let snake = Snake::new(
            bounds.center(),
            direction,
            consts::INITIAL_SNAKE_LENGTH,
            bounds,
        );
        let mut game = GameState {
            rng,
            bounds,
            snake,
            direction,
            food: None,
            score: 0,
            level: level_for_score(0),
            status: Status::Running,
        };
        game.place_food();
        if game.food.is_none() {
            game.status = Status::Over(Ending::BoardFilled);
        }
        game
    }

    /// Advance the game by one step.  Does nothing unless the game is
    /// running.
    pub(crate) fn tick(&mut self) -> TickOutcome {
        if !self.running() {
            return TickOutcome::Idle;
        }
        match self.snake.advance(self.direction, self.bounds, self.food) {
            Advance::Moved => TickOutcome::Moved,
            Advance::Ate => {
                self.score = self.score.saturating_add(consts::FOOD_SCORE);
                let previous_level = self.level;
                self.level = level_for_score(self.score);
                self.place_food();
                if self.food.is_none() {
                    self.status = Status::Over(Ending::BoardFilled);
                    return TickOutcome::GameOver(Ending::BoardFilled);
                }
                TickOutcome::Ate {
                    level_up: self.level > previous_level,
                }
            }
            Advance::Collided(collision) => {
                let ending = Ending::Collision(collision);
                self.status = Status::Over(ending);
                TickOutcome::GameOver(ending)
            }
        }
    }

    /// Put the food on a cell chosen uniformly at random from those not
    /// occupied by the snake
    fn place_food(&mut self) {
        let occupied = self.snake.segments().iter().collect::<HashSet<_>>();
        self.food = self
            .bounds
            .positions()
            .filter(|p| !occupied.contains(p))
            .choose(&mut self.rng);
    }
}

impl<R> GameState<R> {
    /// Request that the snake move in `requested` from the next tick on.
    ///
    /// Turning back on itself is refused for any snake longer than one cell,
    /// both relative to the direction last requested and the direction the
    /// snake last moved in.  Refused and out-of-play requests are dropped.
    /// Returns whether the request was accepted.
    pub(crate) fn set_direction(&mut self, requested: Direction) -> bool {
        if !self.running() {
            return false;
        }
        if self.snake.len() > 1
            && (requested == self.direction.reverse()
                || requested == self.snake.heading().reverse())
        {
            debug!(
                "Ignoring turn to {requested:?} while heading {:?}",
                self.snake.heading()
            );
            return false;
        }
        self.direction = requested;
        true
    }

    /// Pause a running game or resume a paused one.  Returns `true` if the
    /// game is now paused.
    pub(crate) fn toggle_pause(&mut self) -> bool {
        match self.status {
            Status::Running => self.status = Status::Paused,
            Status::Paused => self.status = Status::Running,
            Status::Over(_) => (),
        }
        self.status == Status::Paused
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn status(&self) -> Status {
        self.status
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn running(&self) -> bool {
        self.status == Status::Running
    }

    pub(crate) fn is_over(&self) -> bool {
        matches!(self.status, Status::Over(_))
    }

    /// Return everything a renderer needs to draw the current frame
    pub(crate) fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: self.snake.segments(),
            heading: self.snake.heading(),
            food: self.food,
            score: self.score,
            level: self.level,
            status: self.status,
            bounds: self.bounds,
        }
    }
}

/// Read-only view of a game for drawing
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Snapshot<'a> {
    /// Snake cells, head first
    pub(crate) snake: &'a VecDeque<Position>,
    pub(crate) heading: Direction,
    pub(crate) food: Option<Position>,
    pub(crate) score: u32,
    pub(crate) level: u32,
    pub(crate) status: Status,
    pub(crate) bounds: Bounds,
}

impl Snapshot<'_> {
    pub(crate) fn head(&self) -> Option<Position> {
        self.snake.front().copied()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Status {
    Running,
    Paused,
    Over(Ending),
}

/// Why a game ended
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Ending {
    Collision(Collision),
    /// The snake has filled the board and there are no more cells to place
    /// food in.
    BoardFilled,
}

/// The result of a call to [`GameState::tick()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TickOutcome {
    /// The game is paused or over; nothing happened
    Idle,
    Moved,
    Ate {
        level_up: bool,
    },
    GameOver(Ending),
}

/// Compute the level reached with a given score
pub(crate) fn level_for_score(score: u32) -> u32 {
    (score / consts::LEVEL_THRESHOLD).saturating_add(consts::BASE_LEVEL)
}
