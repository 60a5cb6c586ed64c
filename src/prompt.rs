use crate::consts;
use crate::game::Snapshot;
use crate::highscores::{HighScoreList, Initials};
use crate::ui::{GameScreen, InitialsDialog};
use crate::util::ErrorChain;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use log::{debug, error};
use ratatui::{backend::Backend, Terminal};

/// Something that can ask the player for their initials
pub(crate) trait InitialsPrompt {
    /// Show `message` and wait for an answer, suggesting `default`.  Returns
    /// `None` if the player cancelled.
    fn request(&mut self, message: &str, default: &str) -> Option<String>;
}

impl<F> InitialsPrompt for F
where
    F: FnMut(&str, &str) -> Option<String>,
{
    fn request(&mut self, message: &str, default: &str) -> Option<String> {
        self(message, default)
    }
}

/// Ask `prompt` for a high scorer's initials.  A cancelled or blank answer is
/// replaced by `default`.
pub(crate) fn request_initials(prompt: &mut dyn InitialsPrompt, default: &str) -> Initials {
    prompt
        .request(consts::INITIALS_PROMPT, default)
        .and_then(|answer| Initials::normalize(&answer))
        .or_else(|| Initials::normalize(default))
        .unwrap_or_default()
}

/// Asks for initials with a dialog drawn over the final state of the game.
/// Blocks until the player confirms or cancels.
#[derive(Debug)]
pub(crate) struct TerminalPrompt<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    snapshot: Snapshot<'a>,
    high_scores: &'a HighScoreList,
}

impl<'a, B: Backend> TerminalPrompt<'a, B> {
    pub(crate) fn new(
        terminal: &'a mut Terminal<B>,
        snapshot: Snapshot<'a>,
        high_scores: &'a HighScoreList,
    ) -> Self {
        TerminalPrompt {
            terminal,
            snapshot,
            high_scores,
        }
    }

    fn draw(&mut self, message: &str, input: &str) -> std::io::Result<()> {
        let screen = GameScreen {
            snapshot: self.snapshot,
            high_scores: self.high_scores,
            new_entry: None,
        };
        self.terminal.draw(|frame| {
            frame.render_widget(screen, frame.area());
            frame.render_widget(InitialsDialog { message, input }, frame.area());
        })?;
        Ok(())
    }

    /// Show the dialog until the player confirms or cancels.  The input
    /// starts out filled in with `default`.
    fn run(&mut self, message: &str, default: &str) -> std::io::Result<Option<String>> {
        let mut input = default.to_owned();
        loop {
            self.draw(message, &input)?;
            let Some(ev) = read()?.as_key_press_event() else {
                continue;
            };
            match InitialsKey::from_key_event(ev) {
                Some(InitialsKey::Char(c)) => {
                    if input.chars().count() < consts::INITIALS_LENGTH {
                        input.extend(c.to_uppercase());
                    }
                }
                Some(InitialsKey::Backspace) => {
                    let _ = input.pop();
                }
                Some(InitialsKey::Confirm) => return Ok(Some(input)),
                Some(InitialsKey::Cancel) => return Ok(None),
                None => (),
            }
        }
    }
}

impl<B: Backend> InitialsPrompt for TerminalPrompt<'_, B> {
    fn request(&mut self, message: &str, default: &str) -> Option<String> {
        match self.run(message, default) {
            Ok(answer) => {
                debug!("Initials prompt answered with {answer:?}");
                answer
            }
            Err(e) => {
                error!("Failed to prompt for initials: {}", ErrorChain(&e));
                None
            }
        }
    }
}

/// Keys understood by the initials prompt
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum InitialsKey {
    Char(char),
    Backspace,
    Confirm,
    Cancel,
}

impl InitialsKey {
    fn from_key_event(ev: KeyEvent) -> Option<InitialsKey> {
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => {
                Some(InitialsKey::Cancel)
            }
            (_, KeyCode::Enter) => Some(InitialsKey::Confirm),
            (_, KeyCode::Backspace) => Some(InitialsKey::Backspace),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) if c.is_alphanumeric() => {
                Some(InitialsKey::Char(c))
            }
            _ => None,
        }
    }
}
