use crate::command::Command;
use crate::game::{Bounds, GameState, SpeedCurve, TickOutcome};
use crate::highscores::{HighScoreList, HighScoreStore};
use crate::prompt::{InitialsPrompt, TerminalPrompt};
use crate::storage::{FileStore, KeyValueStore};
use crate::ui::GameScreen;
use crate::util::ErrorChain;
use crossterm::event::{poll, read, Event};
use log::{debug, error, info};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::Instant;

/// Owns the game currently being played along with the high score table, and
/// routes input and timer ticks to them
#[derive(Debug)]
pub(crate) struct App<S = FileStore> {
    game: GameState,
    bounds: Bounds,
    speed: SpeedCurve,
    store: HighScoreStore<S>,
    scores: HighScoreList,
    /// Index into `scores` of the entry made by the last game, if any
    new_entry: Option<usize>,
    next_tick: Option<Instant>,
    quitting: bool,
}

impl<S: KeyValueStore> App<S> {
    pub(crate) fn new(bounds: Bounds, speed: SpeedCurve, store: HighScoreStore<S>) -> App<S> {
        let scores = store.load_or_seed();
        info!("Starting new {}x{} game", bounds.width, bounds.height);
        App {
            game: GameState::new(bounds),
            bounds,
            speed,
            store,
            scores,
            new_entry: None,
            next_tick: None,
            quitting: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting {
            self.draw(terminal)?;
            self.process_input(terminal)?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let screen = GameScreen {
            snapshot: self.game.snapshot(),
            high_scores: &self.scores,
            new_entry: self.new_entry,
        };
        terminal.draw(|frame| frame.render_widget(screen, frame.area()))?;
        Ok(())
    }

    /// Wait for either the next input event or the next tick, whichever comes
    /// first.  While the game is not running, only input is waited for.
    fn process_input<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        if self.game.running() {
            let when = *self.next_tick.get_or_insert_with(|| {
                Instant::now() + self.speed.interval_for_level(self.game.level())
            });
            let wait = when.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                self.next_tick = None;
                self.advance(terminal);
            } else {
                self.handle_event(read()?);
            }
        } else {
            self.handle_event(read()?);
        }
        Ok(())
    }

    fn advance<B: Backend>(&mut self, terminal: &mut Terminal<B>) {
        match self.game.tick() {
            TickOutcome::Idle | TickOutcome::Moved => (),
            TickOutcome::Ate { level_up } => {
                if level_up {
                    info!(
                        "Reached level {}; tick interval is now {:?}",
                        self.game.level(),
                        self.speed.interval_for_level(self.game.level())
                    );
                }
            }
            TickOutcome::GameOver(ending) => {
                info!("Game over ({ending:?}) with score {}", self.game.score());
                // The dialog is drawn over the table as it was before this
                // game's entry is added.
                let backdrop = self.scores.clone();
                let mut prompt = TerminalPrompt::new(terminal, self.game.snapshot(), &backdrop);
                self.new_entry =
                    record_score(&self.store, &mut self.scores, self.game.score(), &mut prompt);
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        if event == Event::FocusLost {
            if self.game.running() {
                debug!("Terminal lost focus; pausing");
                self.pause();
            }
            return;
        }
        let Some(cmd) = event.as_key_press_event().and_then(Command::from_key_event) else {
            return;
        };
        match cmd {
            Command::Quit => {
                info!("Quitting");
                self.quitting = true;
            }
            Command::Turn(direction) => {
                let _ = self.game.set_direction(direction);
            }
            Command::Pause => self.pause(),
            Command::NewGame => {
                if self.game.is_over() {
                    self.new_game();
                }
            }
        }
    }

    fn pause(&mut self) {
        if self.game.toggle_pause() {
            debug!("Game paused");
            self.next_tick = None;
        } else if self.game.running() {
            debug!("Game resumed");
        }
    }

    fn new_game(&mut self) {
        info!("Starting new {}x{} game", self.bounds.width, self.bounds.height);
        self.game = GameState::new(self.bounds);
        self.new_entry = None;
        self.next_tick = None;
    }
}

/// Run the high score flow for a finished game's `score`.  Failing to save
/// the table is logged and otherwise ignored.
fn record_score<S: KeyValueStore>(
    store: &HighScoreStore<S>,
    scores: &mut HighScoreList,
    score: u32,
    prompt: &mut dyn InitialsPrompt,
) -> Option<usize> {
    match store.record(scores, score, prompt) {
        Ok(Some(rank)) => {
            info!("Score {score} entered the high score table at #{}", rank + 1);
            Some(rank)
        }
        Ok(None) => None,
        Err(e) => {
            error!("{}", ErrorChain(&e));
            None
        }
    }
}
