//! Process-scoped settings and highscores, loaded on first use and saved on shutdown.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Config;
use crate::error::GameResult;
use crate::highscore::HighscoreTable;

/// Owns the configuration and highscore table for one process.
#[derive(Debug)]
pub struct Profile {
    config_path: PathBuf,
    config: Option<Config>,
    highscores: Option<HighscoreTable>,
}

impl Profile {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            config: None,
            highscores: None,
        }
    }

    /// A profile around an already-loaded configuration.
    pub fn with_config(config_path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            config: Some(config),
            ..Self::new(config_path)
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn is_config_loaded(&self) -> bool {
        self.config.is_some()
    }

    pub fn is_highscores_loaded(&self) -> bool {
        self.highscores.is_some()
    }

    /// The configuration, loading it (and writing defaults if absent) on first access.
    pub fn config(&mut self) -> GameResult<&mut Config> {
        let config = match self.config.take() {
            Some(config) => config,
            None => {
                debug!(path = %self.config_path.display(), "Loading configuration on first access");
                Config::load_or_create(&self.config_path)?
            }
        };
        Ok(self.config.insert(config))
    }

    /// The highscore table, loading it from the configured file on first access.
    pub fn highscores(&mut self) -> GameResult<&mut HighscoreTable> {
        let table = match self.highscores.take() {
            Some(table) => table,
            None => {
                let path = self.config()?.highscore_file.clone();
                HighscoreTable::load(path)
            }
        };
        Ok(self.highscores.insert(table))
    }

    /// Saves the highscore table if it was loaded and changed.
    pub fn shutdown(mut self) -> GameResult<()> {
        let (Some(config), Some(table)) = (self.config.as_ref(), self.highscores.as_mut()) else {
            debug!("Profile shut down without highscore changes");
            return Ok(());
        };
        if table.is_dirty() {
            table.save(&config.highscore_file)?;
            info!(path = %config.highscore_file.display(), "Highscores saved on shutdown");
        }
        Ok(())
    }
}
