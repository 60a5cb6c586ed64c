use crate::consts;
use crate::game::{Bounds, SpeedCurve};
use crate::storage::FileStore;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Settings about the playing field
    #[serde(default)]
    pub(crate) game: GameConfig,

    /// How fast the snake moves at each level
    #[serde(default)]
    pub(crate) speed: SpeedCurve,

    /// Settings about data & log files
    #[serde(default)]
    pub(crate) files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the directory in which the high score table is stored: the
    /// directory given in the configuration or, if that is not set, the
    /// default data directory.  Return `None` if no directory is configured
    /// and the default could not be computed.
    pub(crate) fn data_dir(&self) -> Option<PathBuf> {
        self.files
            .data_dir
            .clone()
            .or_else(FileStore::default_dir)
    }

    /// Return the path to write log messages to
    pub(crate) fn log_file(&self) -> Option<PathBuf> {
        self.files
            .log_file
            .clone()
            .or_else(|| self.data_dir().map(|p| p.join("gridsnake.log")))
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawGameConfig")]
pub(crate) struct GameConfig {
    width: u16,
    height: u16,
    wraparound: bool,
}

impl GameConfig {
    pub(crate) fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height, self.wraparound)
    }
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            width: consts::DEFAULT_GRID_WIDTH,
            height: consts::DEFAULT_GRID_HEIGHT,
            wraparound: false,
        }
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default)]
struct RawGameConfig {
    width: u16,
    height: u16,
    wraparound: bool,
}

impl Default for RawGameConfig {
    fn default() -> RawGameConfig {
        let GameConfig {
            width,
            height,
            wraparound,
        } = GameConfig::default();
        RawGameConfig {
            width,
            height,
            wraparound,
        }
    }
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameConfigError;

    fn try_from(value: RawGameConfig) -> Result<GameConfig, GameConfigError> {
        if value.width < 2 || value.height < 2 {
            Err(GameConfigError::TooSmall {
                width: value.width,
                height: value.height,
            })
        } else if value.width > consts::MAX_GRID_WIDTH || value.height > consts::MAX_GRID_HEIGHT {
            Err(GameConfigError::TooLarge {
                width: value.width,
                height: value.height,
            })
        } else {
            Ok(GameConfig {
                width: value.width,
                height: value.height,
                wraparound: value.wraparound,
            })
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum GameConfigError {
    #[error("grid must be at least 2x2 cells, got {width}x{height}")]
    TooSmall { width: u16, height: u16 },
    #[error(
        "grid must be at most {max_width}x{max_height} cells, got {width}x{height}",
        max_width = consts::MAX_GRID_WIDTH,
        max_height = consts::MAX_GRID_HEIGHT
    )]
    TooLarge { width: u16, height: u16 },
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Directory in which to store the high score table
    data_dir: Option<PathBuf>,

    /// File to which to write log messages
    log_file: Option<PathBuf>,

    /// Minimum level of log messages to write
    pub(crate) log_level: LevelFilter,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig::from(RawFileConfig::default())
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    data_dir: Option<String>,
    log_file: Option<String>,
    log_level: LevelFilter,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            data_dir: None,
            log_file: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl From<RawFileConfig> for FileConfig {
    fn from(value: RawFileConfig) -> FileConfig {
        FileConfig {
            data_dir: value.data_dir.as_deref().map(expand_tilde),
            log_file: value.log_file.as_deref().map(expand_tilde),
            log_level: value.log_level,
        }
    }
}

/// Replace a leading `~` path component with the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::time::Duration;

    #[test]
    fn empty_config() {
        let config = toml::from_str::<Config>("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.game.bounds(),
            Bounds::new(consts::DEFAULT_GRID_WIDTH, consts::DEFAULT_GRID_HEIGHT, false)
        );
        assert_eq!(config.speed, SpeedCurve::default());
        assert_eq!(config.files.log_level, LevelFilter::Info);
    }

    #[test]
    fn full_config() {
        let config = toml::from_str::<Config>(
            r#"
[game]
width = 30
height = 12
wraparound = true

[speed]
initial-interval-ms = 150
step-ms = 10
min-interval-ms = 60

[files]
data-dir = "/var/lib/gridsnake"
log-file = "/tmp/gridsnake.log"
log-level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.game.bounds(), Bounds::new(30, 12, true));
        assert_eq!(
            config.speed.interval_for_level(2),
            Duration::from_millis(140)
        );
        assert_eq!(
            config.data_dir(),
            Some(PathBuf::from("/var/lib/gridsnake"))
        );
        assert_eq!(
            config.log_file(),
            Some(PathBuf::from("/tmp/gridsnake.log"))
        );
        assert_eq!(config.files.log_level, LevelFilter::Debug);
    }

    #[test]
    fn partial_game_section() {
        let config = toml::from_str::<Config>("[game]\nwraparound = true\n").unwrap();
        assert_eq!(
            config.game.bounds(),
            Bounds::new(consts::DEFAULT_GRID_WIDTH, consts::DEFAULT_GRID_HEIGHT, true)
        );
    }

    #[test]
    fn log_file_defaults_into_data_dir() {
        let config =
            toml::from_str::<Config>("[files]\ndata-dir = \"/srv/snake\"\n").unwrap();
        assert_eq!(
            config.log_file(),
            Some(PathBuf::from("/srv/snake/gridsnake.log"))
        );
    }

    #[test]
    fn grid_too_small() {
        assert!(toml::from_str::<Config>("[game]\nwidth = 1\n").is_err());
    }

    #[rstest]
    #[case(60, 20, true)]
    #[case(61, 20, false)]
    #[case(60, 21, false)]
    #[case(200, 60, false)]
    #[case(u16::MAX, u16::MAX, false)]
    fn grid_must_fit_display(#[case] width: u16, #[case] height: u16, #[case] ok: bool) {
        let src = format!("[game]\nwidth = {width}\nheight = {height}\n");
        assert_eq!(toml::from_str::<Config>(&src).is_ok(), ok);
    }

    #[test]
    fn too_large_message() {
        let e = GameConfig::try_from(RawGameConfig {
            width: 200,
            height: 60,
            wraparound: false,
        })
        .unwrap_err();
        assert_eq!(e, GameConfigError::TooLarge { width: 200, height: 60 });
        assert_eq!(
            e.to_string(),
            "grid must be at most 60x20 cells, got 200x60"
        );
    }

    #[test]
    fn floor_above_initial_interval() {
        assert!(toml::from_str::<Config>("[speed]\nmin-interval-ms = 500\n").is_err());
    }

    #[test]
    fn bad_log_level() {
        assert!(toml::from_str::<Config>("[files]\nlog-level = \"loud\"\n").is_err());
    }

    #[test]
    fn expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/scores"), home.join("scores"));
            assert_eq!(expand_tilde("~"), home);
        }
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("~user/x"), PathBuf::from("~user/x"));
    }

    #[test]
    fn load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        assert_eq!(Config::load(&path, true).unwrap(), Config::default());
        assert!(matches!(
            Config::load(&path, false),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn load_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs_err::write(&path, "[game]\nwidth = 8\nheight = 8\n").unwrap();
        let config = Config::load(&path, false).unwrap();
        assert_eq!(config.game.bounds(), Bounds::new(8, 8, false));
    }
}
