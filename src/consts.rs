//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};

/// Default width of the playing field, in cells
pub(crate) const DEFAULT_GRID_WIDTH: u16 = 50;

/// Default height of the playing field, in cells
pub(crate) const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Length of the snake at the start of a game
pub(crate) const INITIAL_SNAKE_LENGTH: usize = 3;

/// Points awarded for each piece of food eaten
pub(crate) const FOOD_SCORE: u32 = 1;

/// Number of points needed to advance one level
pub(crate) const LEVEL_THRESHOLD: u32 = 5;

/// The level at which every game starts
pub(crate) const BASE_LEVEL: u32 = 1;

/// Time between movements of the snake at [`BASE_LEVEL`], in milliseconds
pub(crate) const INITIAL_INTERVAL_MS: u32 = 120;

/// How much shorter the time between movements gets with each level, in
/// milliseconds
pub(crate) const INTERVAL_STEP_MS: u32 = 5;

/// The time between movements never gets shorter than this, in milliseconds
pub(crate) const MIN_INTERVAL_MS: u32 = 40;

/// The maximum number of entries in the high score table
pub(crate) const MAX_HIGH_SCORES: usize = 10;

/// Maximum number of characters in a player's initials
pub(crate) const INITIALS_LENGTH: usize = 3;

/// Initials recorded when the player declines to enter any
pub(crate) const DEFAULT_INITIALS: &str = "AAA";

/// Storage key under which the high score table is kept
pub(crate) const HIGH_SCORES_KEY: &str = "highScoreList";

/// Message shown when asking for a high scorer's initials
pub(crate) const INITIALS_PROMPT: &str = "You earned a high score! Please enter your initials.";

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Width of the high score sidebar, including its border
pub(crate) const LEADERBOARD_WIDTH: u16 = 18;

/// Largest playing field width that fits in [`DISPLAY_SIZE`] beside the
/// high score sidebar and inside the board's border
pub(crate) const MAX_GRID_WIDTH: u16 = DISPLAY_SIZE.width - LEADERBOARD_WIDTH - 2;

/// Largest playing field height that fits in [`DISPLAY_SIZE`] between the
/// score bar and the key hints and inside the board's border
pub(crate) const MAX_GRID_HEIGHT: u16 = DISPLAY_SIZE.height - 4;

/// Glyph for the snake's head when it is moving up
pub(crate) const SNAKE_HEAD_UP_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving down
pub(crate) const SNAKE_HEAD_DOWN_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving right
pub(crate) const SNAKE_HEAD_RIGHT_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving left
pub(crate) const SNAKE_HEAD_LEFT_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for the food
pub(crate) const FOOD_SYMBOL: char = '●';

/// Glyph for the snake's head when it's collided with a wall or itself
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for the food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the most recently added high score
pub(crate) const NEW_HIGH_SCORE_STYLE: Style =
    Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
