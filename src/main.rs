mod app;
mod command;
mod config;
mod consts;
mod game;
mod highscores;
mod prompt;
mod storage;
mod ui;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::highscores::HighScoreStore;
use crate::storage::FileStore;
use anyhow::Context;
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::execute;
use lexopt::{Arg, Parser};
use log::info;
use simplelog::WriteLogger;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "\
Usage: gridsnake [-c|--config <FILE>]

Play Snake in your terminal

Options:
  -c, --config <FILE>   Read configuration from <FILE>
  -h, --help            Display this help message and exit
  -V, --version         Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Invocation {
    Run { config: Option<PathBuf> },
    Help,
    Version,
}

impl Invocation {
    fn from_parser(mut parser: Parser) -> Result<Invocation, lexopt::Error> {
        let mut config = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Invocation::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Invocation::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Invocation::Run { config })
    }
}

fn main() -> ExitCode {
    match Invocation::from_parser(Parser::from_env()) {
        Ok(Invocation::Run { config }) => run(config),
        Ok(Invocation::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Invocation::Version) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {e}", env!("CARGO_PKG_NAME"));
            eprint!("{USAGE}");
            ExitCode::from(2)
        }
    }
}

fn run(config_path: Option<PathBuf>) -> ExitCode {
    let (config, data_dir) = match setup(config_path) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("{}: {e:?}", env!("CARGO_PKG_NAME"));
            return ExitCode::from(2);
        }
    };
    init_logging(&config);
    info!(
        "Starting {} {}; high scores are stored in {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        data_dir.display()
    );
    let store = HighScoreStore::new(FileStore::new(data_dir));
    let app = App::new(config.game.bounds(), config.speed, store);
    let mut terminal = ratatui::init();
    let r = execute!(io::stdout(), EnableFocusChange).and_then(|()| app.run(&mut terminal));
    let _ = execute!(io::stdout(), DisableFocusChange);
    ratatui::restore();
    io_exit(r)
}

/// Load the configuration and work out where high scores live
fn setup(config_path: Option<PathBuf>) -> anyhow::Result<(Config, PathBuf)> {
    let config = match config_path {
        Some(path) => Config::load(&path, false)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => {
            let path = Config::default_path()?;
            Config::load(&path, true)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
    };
    let data_dir = config
        .data_dir()
        .context("failed to determine path to local data directory")?;
    Ok((config, data_dir))
}

/// Send log messages to the configured log file.  If that is not possible,
/// say so and carry on without logging.
fn init_logging(config: &Config) {
    let Some(path) = config.log_file() else {
        eprintln!("Warning: could not determine log file path; logging disabled");
        return;
    };
    let file = path
        .parent()
        .map_or(Ok(()), fs_err::create_dir_all)
        .and_then(|()| {
            fs_err::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        });
    match file {
        Ok(fp) => {
            if let Err(e) =
                WriteLogger::init(config.files.log_level, simplelog::Config::default(), fp)
            {
                eprintln!("Warning: could not initialize logging: {e}");
            }
        }
        Err(e) => eprintln!("Warning: {e}; logging disabled"),
    }
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}
