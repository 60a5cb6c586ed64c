//! Drawing the game, the high score table, and the initials dialog
use crate::consts;
use crate::game::{Direction, Ending, Position, Snapshot, Status};
use crate::highscores::HighScoreList;
use crate::util::{center_rect, get_display_area};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        BorderType, Clear, Paragraph, Widget, Wrap,
    },
};

/// The whole game screen: score bar, board, high score table, and a line of
/// key hints
#[derive(Clone, Copy, Debug)]
pub(crate) struct GameScreen<'a> {
    pub(crate) snapshot: Snapshot<'a>,
    pub(crate) high_scores: &'a HighScoreList,
    /// Index of the entry added to `high_scores` by the game just finished
    pub(crate) new_entry: Option<usize>,
}

impl Widget for GameScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, main_area, msg_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(display);
        let [board_area, scores_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(consts::LEADERBOARD_WIDTH)])
                .areas(main_area);

        Line::styled(
            format!(
                " Score: {}   Level: {}",
                self.snapshot.score, self.snapshot.level
            ),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);
        Board(self.snapshot).render(board_area, buf);
        Leaderboard {
            list: self.high_scores,
            highlight: self.new_entry,
        }
        .render(scores_area, buf);
        status_line(self.snapshot.status).render(msg_area, buf);
    }
}

fn status_line(status: Status) -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, consts::KEY_STYLE);
    match status {
        Status::Running => Line::from_iter([
            Span::raw(" Move ("),
            key("←↓↑→"),
            Span::raw(") — Pause ("),
            key("p"),
            Span::raw(") — Quit ("),
            key("q"),
            Span::raw(")"),
        ]),
        Status::Paused => Line::from_iter([
            Span::raw(" — PAUSED — Resume ("),
            key("p"),
            Span::raw(") — Quit ("),
            key("q"),
            Span::raw(")"),
        ]),
        Status::Over(_) => Line::from_iter([
            Span::raw(" — GAME OVER — New Game ("),
            key("n"),
            Span::raw(") — Quit ("),
            key("q"),
            Span::raw(")"),
        ]),
    }
}

/// The bordered playing field with the snake and the food
#[derive(Clone, Copy, Debug)]
struct Board<'a>(Snapshot<'a>);

impl Board<'_> {
    fn head_symbol(&self) -> char {
        match self.0.heading {
            Direction::Up => consts::SNAKE_HEAD_UP_SYMBOL,
            Direction::Down => consts::SNAKE_HEAD_DOWN_SYMBOL,
            Direction::Left => consts::SNAKE_HEAD_LEFT_SYMBOL,
            Direction::Right => consts::SNAKE_HEAD_RIGHT_SYMBOL,
        }
    }
}

impl Widget for Board<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bounds = self.0.bounds;
        let block_size = Size {
            width: u16::try_from(bounds.width)
                .unwrap_or(u16::MAX)
                .saturating_add(2),
            height: u16::try_from(bounds.height)
                .unwrap_or(u16::MAX)
                .saturating_add(2),
        };
        let block_area = center_rect(area, block_size);
        let block = if bounds.wrap {
            Block::bordered().border_type(BorderType::Rounded)
        } else {
            Block::bordered()
        };
        block.render(block_area, buf);

        let mut canvas = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for &p in self.0.snake.iter().skip(1) {
            canvas.draw_cell(p, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        if let Some(food) = self.0.food {
            canvas.draw_cell(food, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        if let Some(head) = self.0.head() {
            if matches!(self.0.status, Status::Over(Ending::Collision(_))) {
                canvas.draw_cell(head, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
            } else {
                canvas.draw_cell(head, self.head_symbol(), consts::SNAKE_STYLE);
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        let (Ok(dx), Ok(dy)) = (u16::try_from(pos.x), u16::try_from(pos.y)) else {
            return;
        };
        if dx >= self.area.width || dy >= self.area.height {
            return;
        }
        let Some(x) = self.area.x.checked_add(dx) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(dy) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}

/// The high score table, with the newest entry highlighted
#[derive(Clone, Copy, Debug)]
struct Leaderboard<'a> {
    list: &'a HighScoreList,
    highlight: Option<usize>,
}

impl Widget for Leaderboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" HIGH SCORES ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);
        for ((i, entry), row) in self.list.entries().iter().enumerate().zip(inner.rows()) {
            let style = if self.highlight == Some(i) {
                consts::NEW_HIGH_SCORE_STYLE
            } else {
                Style::new()
            };
            Line::styled(
                format!(
                    "{rank:>2}. {initials:<3} {score:>6}",
                    rank = i + 1,
                    initials = entry.initials,
                    score = entry.score
                ),
                style,
            )
            .render(row, buf);
        }
    }
}

/// A pop-up asking for a high scorer's initials
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct InitialsDialog<'a> {
    pub(crate) message: &'a str,
    pub(crate) input: &'a str,
}

impl InitialsDialog<'_> {
    const WIDTH: u16 = 40;
    const HEIGHT: u16 = 9;
}

impl Widget for InitialsDialog<'_> {
    /*
     * ┌─────────── NEW HIGH SCORE ───────────┐
     * │ You earned a high score! Please      │
     * │ enter your initials.                 │
     * │                                      │
     * │ Initials: AB_                        │
     * │                                      │
     * │ Enter: OK — Esc: Skip                │
     * └──────────────────────────────────────┘
     */

    // `area` is here the area of the entire display in which the program is
    // drawing, not the area for just the widget proper.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = center_rect(
            get_display_area(area),
            Size {
                width: Self::WIDTH,
                height: Self::HEIGHT,
            },
        );
        Clear.render(area, buf);
        let block = Block::bordered()
            .title(" NEW HIGH SCORE ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        block.render(area, buf);
        let [msg_area, input_area, hint_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .areas(inner);
        Paragraph::new(self.message)
            .wrap(Wrap { trim: true })
            .render(msg_area, buf);
        let blanks = consts::INITIALS_LENGTH.saturating_sub(self.input.chars().count());
        Line::from_iter([
            Span::raw("Initials: "),
            Span::styled(
                format!("{}{}", self.input, "_".repeat(blanks)),
                consts::NEW_HIGH_SCORE_STYLE,
            ),
        ])
        .render(input_area, buf);
        Line::from_iter([
            Span::styled("Enter", consts::KEY_STYLE),
            Span::raw(": OK — "),
            Span::styled("Esc", consts::KEY_STYLE),
            Span::raw(": Skip"),
        ])
        .render(hint_area, buf);
    }
}
