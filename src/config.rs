//! Game configuration: levels, display settings, audio volumes and gameplay tunables.
//!
//! Values are layered with figment: built-in defaults, then the JSON file, then
//! `PACMAN_`-prefixed environment variables (nested keys separated by `__`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bevy_ecs::resource::Resource;
use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{self, cadence, timing, MIN_TILE_SIZE, TILE_SIZE_STEP};
use crate::error::{GameResult, InvalidConfigurationError};
use crate::ghost::StrategyKind;
use crate::map::catalog::LevelCatalog;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PACMAN_";

/// A validated `[width, height, tileSize]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
}

impl Resolution {
    pub fn as_array(self) -> [u32; 3] {
        [self.width, self.height, self.tile_size]
    }
}

impl TryFrom<[u32; 3]> for Resolution {
    type Error = InvalidConfigurationError;

    fn try_from([width, height, tile_size]: [u32; 3]) -> Result<Self, Self::Error> {
        if width == 0 || height == 0 {
            return Err(InvalidConfigurationError::Dimensions { width, height });
        }
        if tile_size < MIN_TILE_SIZE || tile_size % TILE_SIZE_STEP != 0 {
            return Err(InvalidConfigurationError::TileSize(tile_size));
        }
        Ok(Self {
            width,
            height,
            tile_size,
        })
    }
}

/// Sound and music volumes, each within `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sound_volume: f32,
    pub music_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sound_volume: 0.5,
            music_volume: 0.5,
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> Result<(), InvalidConfigurationError> {
        for (name, value) in [("sound", self.sound_volume), ("music", self.music_volume)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(InvalidConfigurationError::Volume { name, value });
            }
        }
        Ok(())
    }
}

/// Rule tunables. All durations and cadences are in ticks.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub starting_lives: u8,
    pub frightened_ticks: u32,
    pub ghost_respawn_ticks: u32,
    pub player_respawn_ticks: u32,
    pub player_move_period: u32,
    pub ghost_move_period: u32,
    pub frightened_move_period: u32,
    pub eaten_move_period: u32,
    pub ghost_strategy: StrategyKind,
    pub seed: u64,
    pub extra_life_per_level: bool,
    /// A bonus fruit appears with a 1-in-N chance per tick; 0 disables it.
    pub bonus_fruit_chance: u32,
    pub bonus_fruit_limit: u32,
    pub tick_rate: u32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            starting_lives: constants::STARTING_LIVES,
            frightened_ticks: timing::FRIGHTENED_TICKS,
            ghost_respawn_ticks: timing::GHOST_RESPAWN_TICKS,
            player_respawn_ticks: timing::PLAYER_RESPAWN_TICKS,
            player_move_period: cadence::PLAYER,
            ghost_move_period: cadence::GHOST,
            frightened_move_period: cadence::FRIGHTENED_GHOST,
            eaten_move_period: cadence::EATEN_GHOST,
            ghost_strategy: StrategyKind::default(),
            seed: 0,
            extra_life_per_level: true,
            bonus_fruit_chance: constants::BONUS_FRUIT_CHANCE,
            bonus_fruit_limit: constants::BONUS_FRUIT_LIMIT,
            tick_rate: constants::TICK_RATE,
        }
    }
}

impl GameplayConfig {
    pub fn validate(&self) -> Result<(), InvalidConfigurationError> {
        let required = [
            ("starting_lives", u32::from(self.starting_lives)),
            ("frightened_ticks", self.frightened_ticks),
            ("player_move_period", self.player_move_period),
            ("ghost_move_period", self.ghost_move_period),
            ("frightened_move_period", self.frightened_move_period),
            ("eaten_move_period", self.eaten_move_period),
            ("tick_rate", self.tick_rate),
        ];
        match required.into_iter().find(|(_, value)| *value == 0) {
            Some((field, _)) => Err(InvalidConfigurationError::Zero { field }),
            None => Ok(()),
        }
    }
}

/// Display and audio settings that may change while the game runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    resolution: Resolution,
    options: Vec<Resolution>,
    audio: AudioConfig,
}

impl Settings {
    pub fn new(resolution: Resolution, options: Vec<Resolution>, audio: AudioConfig) -> Result<Self, InvalidConfigurationError> {
        if options.is_empty() {
            return Err(InvalidConfigurationError::NoResolutionOptions);
        }
        audio.validate()?;
        Ok(Self {
            resolution,
            options,
            audio,
        })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn resolution_options(&self) -> &[Resolution] {
        &self.options
    }

    pub fn audio(&self) -> AudioConfig {
        self.audio
    }

    /// Validates and applies a new resolution. On failure the current one is kept.
    pub fn set_resolution(&mut self, raw: [u32; 3]) -> Result<Resolution, InvalidConfigurationError> {
        let resolution = Resolution::try_from(raw)?;
        debug!(from = ?self.resolution.as_array(), to = ?raw, "Resolution changed");
        self.resolution = resolution;
        Ok(resolution)
    }

    /// Switches to the option after the current resolution, wrapping around.
    ///
    /// A resolution not among the options moves to the first option.
    pub fn cycle_resolution(&mut self) -> Resolution {
        let next = self
            .options
            .iter()
            .position(|&option| option == self.resolution)
            .map_or(0, |index| (index + 1) % self.options.len());
        self.resolution = self.options[next];
        debug!(resolution = ?self.resolution.as_array(), "Resolution cycled");
        self.resolution
    }

    /// Validates and applies new volumes. On failure the current ones are kept.
    pub fn set_audio(&mut self, audio: AudioConfig) -> Result<(), InvalidConfigurationError> {
        audio.validate()?;
        self.audio = audio;
        Ok(())
    }
}

/// The configuration file as written on disk, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub levels: BTreeMap<String, PathBuf>,
    pub resolution: [u32; 3],
    pub resolution_options: Vec<[u32; 3]>,
    pub audio: AudioConfig,
    pub highscore_file: PathBuf,
    pub gameplay: GameplayConfig,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            levels: BTreeMap::from([("1".to_string(), PathBuf::from("levels/1.csv"))]),
            resolution: [800, 600, 20],
            resolution_options: vec![[800, 600, 20], [1280, 720, 25], [1280, 800, 30], [1920, 1080, 40]],
            audio: AudioConfig::default(),
            highscore_file: PathBuf::from("highscores.csv"),
            gameplay: GameplayConfig::default(),
        }
    }
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Level paths by number, resolved against the config file's directory.
    pub levels: BTreeMap<u32, PathBuf>,
    pub settings: Settings,
    pub highscore_file: PathBuf,
    pub gameplay: GameplayConfig,
}

impl TryFrom<RawConfig> for Config {
    type Error = InvalidConfigurationError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let mut levels = BTreeMap::new();
        for (key, path) in raw.levels {
            let number = key
                .trim()
                .parse::<u32>()
                .map_err(|_| InvalidConfigurationError::LevelKey(key.clone()))?;
            if number == 0 {
                debug!(path = %path.display(), "Skipping reserved level 0");
                continue;
            }
            levels.insert(number, path);
        }

        let resolution = Resolution::try_from(raw.resolution)?;
        let options = raw
            .resolution_options
            .into_iter()
            .map(Resolution::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        raw.gameplay.validate()?;

        Ok(Config {
            levels,
            settings: Settings::new(resolution, options, raw.audio)?,
            highscore_file: raw.highscore_file,
            gameplay: raw.gameplay,
        })
    }
}

impl Config {
    /// The layered sources, in increasing precedence.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(RawConfig::default()))
            .merge(Json::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates the configuration at `path`.
    ///
    /// A missing file is not an error: defaults and environment overrides still apply.
    /// Relative level and highscore paths are resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> GameResult<Config> {
        let path = path.as_ref();
        let raw: RawConfig = Self::figment(path).extract()?;
        let mut config = Config::try_from(raw)?;

        if let Some(base) = path.parent().filter(|base| !base.as_os_str().is_empty()) {
            for level in config.levels.values_mut() {
                if level.is_relative() {
                    *level = base.join(&*level);
                }
            }
            if config.highscore_file.is_relative() {
                config.highscore_file = base.join(&config.highscore_file);
            }
        }

        info!(path = %path.display(), levels = config.levels.len(), "Configuration loaded");
        Ok(config)
    }

    /// Loads the configuration, first writing the defaults to `path` if it does not exist.
    pub fn load_or_create(path: impl AsRef<Path>) -> GameResult<Config> {
        let path = path.as_ref();
        if !path.exists() {
            write_default(path)?;
        }
        Self::load(path)
    }

    /// The levels as a catalog, in play order.
    pub fn catalog(&self) -> LevelCatalog {
        LevelCatalog::from_paths(self.levels.iter().map(|(&key, path)| (key, path.clone())))
    }
}

/// Writes the default configuration as pretty-printed JSON.
pub fn write_default(path: impl AsRef<Path>) -> GameResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&RawConfig::default()).map_err(std::io::Error::from)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "Default configuration written");
    Ok(())
}
