use std::fs;

use pacman_engine::{config::Config, profile::Profile};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

#[test]
fn test_nothing_loads_until_asked() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let profile = Profile::new(&path);

    assert_that(&profile.is_config_loaded()).is_false();
    assert_that(&profile.is_highscores_loaded()).is_false();
    assert_eq!(profile.config_path(), path.as_path());

    profile.shutdown().unwrap();
    assert_that(&path.exists()).is_false();
    assert_that(&dir.path().join("highscores.csv").exists()).is_false();
}

#[test]
fn test_config_is_created_on_first_access() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut profile = Profile::new(&path);

    let resolution = profile.config().unwrap().settings.resolution();

    assert_eq!(resolution.as_array(), [800, 600, 20]);
    assert_that(&profile.is_config_loaded()).is_true();
    assert_that(&profile.is_highscores_loaded()).is_false();
    assert_that(&path.exists()).is_true();
}

#[test]
fn test_runtime_changes_persist_for_the_process() {
    let dir = tempfile::tempdir().unwrap();
    let mut profile = Profile::new(dir.path().join("config.json"));

    profile.config().unwrap().settings.cycle_resolution();

    assert_eq!(profile.config().unwrap().settings.resolution().as_array(), [1280, 720, 25]);
}

#[test]
fn test_shutdown_saves_recorded_scores() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut profile = Profile::new(&path);
    let rank = profile.highscores().unwrap().record("xev", 3000).unwrap();
    assert_eq!(rank, Some(0));
    assert_that(&profile.is_config_loaded()).is_true();
    profile.shutdown().unwrap();

    let saved = fs::read_to_string(dir.path().join("highscores.csv")).unwrap();
    assert_that(&saved.starts_with("XEV,3000\n")).is_true();

    let mut reopened = Profile::new(&path);
    assert_eq!(reopened.highscores().unwrap().top(), Some(3000));
    assert_that(&reopened.highscores().unwrap().is_dirty()).is_false();
}

#[test]
fn test_with_config_skips_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = Config::load(dir.path().join("unused.json")).unwrap();

    let mut profile = Profile::with_config(&path, config.clone());

    assert_that(&profile.is_config_loaded()).is_true();
    assert_eq!(profile.config().unwrap(), &config);
    assert_that(&path.exists()).is_false();
}
