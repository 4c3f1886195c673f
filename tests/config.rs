use std::fs;
use std::path::PathBuf;

use pacman_engine::{
    config::{write_default, AudioConfig, Config, GameplayConfig, RawConfig, Resolution},
    error::{GameError, InvalidConfigurationError},
    ghost::StrategyKind,
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

fn write_config(json: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, json).unwrap();
    (dir, path)
}

fn invalid(result: Result<Config, GameError>) -> InvalidConfigurationError {
    match result {
        Err(GameError::InvalidConfiguration(error)) => error,
        other => panic!("Expected an invalid configuration, got {other:?}"),
    }
}

#[test]
fn test_file_values_merge_over_defaults() {
    let (dir, path) = write_config(
        r#"{
            "resolution": [1280, 720, 25],
            "levels": { "2": "maps/two.csv" },
            "gameplay": { "seed": 42, "ghost_strategy": "pursuit" }
        }"#,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.settings.resolution().as_array(), [1280, 720, 25]);
    assert_that(&config.settings.resolution_options().len()).is_equal_to(4);
    assert_eq!(config.gameplay.seed, 42);
    assert_eq!(config.gameplay.ghost_strategy, StrategyKind::Pursuit);
    assert_eq!(config.gameplay.starting_lives, GameplayConfig::default().starting_lives);
    assert_eq!(config.levels.get(&1), Some(&dir.path().join("levels/1.csv")));
    assert_eq!(config.levels.get(&2), Some(&dir.path().join("maps/two.csv")));
    assert_eq!(config.highscore_file, dir.path().join("highscores.csv"));
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let config = Config::load(&path).unwrap();

    assert_eq!(config.settings.resolution().as_array(), [800, 600, 20]);
    assert_eq!(config.settings.audio(), AudioConfig::default());
    assert_eq!(config.gameplay, GameplayConfig::default());
    assert_that(&path.exists()).is_false();
}

#[test]
fn test_absolute_paths_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let level = dir.path().join("elsewhere").join("1.csv");
    let json = serde_json::json!({ "levels": { "1": level } }).to_string();
    let (_config_dir, path) = write_config(&json);

    let config = Config::load(&path).unwrap();

    assert_eq!(config.levels.get(&1), Some(&level));
}

#[test]
fn test_invalid_tile_size_is_rejected() {
    let (_dir, path) = write_config(r#"{ "resolution": [800, 600, 22] }"#);

    assert_eq!(invalid(Config::load(&path)), InvalidConfigurationError::TileSize(22));
}

#[test]
fn test_invalid_resolution_option_is_rejected() {
    let (_dir, path) = write_config(r#"{ "resolution_options": [[800, 600, 20], [640, 480, 5]] }"#);

    assert_eq!(invalid(Config::load(&path)), InvalidConfigurationError::TileSize(5));
}

#[test]
fn test_volume_out_of_range_is_rejected() {
    let (_dir, path) = write_config(r#"{ "audio": { "music_volume": 1.5 } }"#);

    assert_eq!(
        invalid(Config::load(&path)),
        InvalidConfigurationError::Volume {
            name: "music",
            value: 1.5
        }
    );
}

#[test]
fn test_level_keys_must_be_numbers() {
    let (_dir, path) = write_config(r#"{ "levels": { "bonus": "bonus.csv" } }"#);

    assert_eq!(
        invalid(Config::load(&path)),
        InvalidConfigurationError::LevelKey("bonus".to_string())
    );
}

#[test]
fn test_level_zero_is_ignored() {
    let (_dir, path) = write_config(r#"{ "levels": { "0": "zero.csv", "3": "three.csv" } }"#);

    let config = Config::load(&path).unwrap();

    assert_eq!(config.levels.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(config.catalog().first(), Some(1));
}

#[test]
fn test_zero_gameplay_period_is_rejected() {
    let (_dir, path) = write_config(r#"{ "gameplay": { "player_move_period": 0 } }"#);

    assert_eq!(
        invalid(Config::load(&path)),
        InvalidConfigurationError::Zero {
            field: "player_move_period"
        }
    );
}

#[test]
fn test_malformed_json_is_a_config_error() {
    let (_dir, path) = write_config("{ not json");

    assert!(matches!(Config::load(&path), Err(GameError::Config(_))));
}

#[test]
fn test_load_or_create_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let created = Config::load_or_create(&path).unwrap();
    assert_that(&path.exists()).is_true();

    let written: RawConfig = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, RawConfig::default());
    assert_eq!(Config::load(&path).unwrap(), created);
}

#[test]
fn test_write_default_is_readable_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    write_default(&path).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["resolution"], serde_json::json!([800, 600, 20]));
    assert_eq!(value["highscore_file"], serde_json::json!("highscores.csv"));
    assert_eq!(value["gameplay"]["ghost_strategy"], serde_json::json!("wander"));
}

#[test]
fn test_set_resolution_keeps_previous_on_error() {
    let mut config = Config::try_from(RawConfig::default()).unwrap();

    let error = config.settings.set_resolution([1024, 768, 7]).unwrap_err();
    assert_eq!(error, InvalidConfigurationError::TileSize(7));
    assert_eq!(config.settings.resolution().as_array(), [800, 600, 20]);

    let applied = config.settings.set_resolution([1024, 768, 30]).unwrap();
    assert_eq!(applied, Resolution::try_from([1024, 768, 30]).unwrap());
    assert_eq!(config.settings.resolution(), applied);
}

#[test]
fn test_cycle_resolution_wraps() {
    let mut config = Config::try_from(RawConfig::default()).unwrap();

    let visited: Vec<_> = (0..4).map(|_| config.settings.cycle_resolution().as_array()).collect();

    assert_eq!(
        visited,
        vec![[1280, 720, 25], [1280, 800, 30], [1920, 1080, 40], [800, 600, 20]]
    );

    // A resolution outside the options restarts the cycle.
    config.settings.set_resolution([1024, 768, 30]).unwrap();
    assert_eq!(config.settings.cycle_resolution().as_array(), [800, 600, 20]);
}

#[test]
fn test_set_audio_validates() {
    let mut config = Config::try_from(RawConfig::default()).unwrap();

    let louder = AudioConfig {
        sound_volume: 1.0,
        music_volume: 0.0,
    };
    config.settings.set_audio(louder).unwrap();
    assert_eq!(config.settings.audio(), louder);

    let broken = AudioConfig {
        sound_volume: -0.1,
        music_volume: 0.5,
    };
    assert!(matches!(
        config.settings.set_audio(broken),
        Err(InvalidConfigurationError::Volume { name: "sound", .. })
    ));
    assert_eq!(config.settings.audio(), louder);
}

#[test]
fn test_empty_resolution_options_are_rejected() {
    let raw = RawConfig {
        resolution_options: Vec::new(),
        ..RawConfig::default()
    };

    assert_eq!(Config::try_from(raw), Err(InvalidConfigurationError::NoResolutionOptions));
}
