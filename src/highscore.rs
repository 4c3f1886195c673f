//! The persisted top-scores table, stored as `name,score` CSV lines.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::constants::{DEFAULT_HIGHSCORES, HIGHSCORE_NAME_LEN, HIGHSCORE_SLOTS};
use crate::error::{GameResult, HighscoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighscoreEntry {
    pub name: String,
    pub score: u32,
}

/// Upper-cases a name and checks it is 1-3 characters of `A-Z0-9`.
pub fn normalize_name(name: &str) -> Result<String, HighscoreError> {
    let upper = name.trim().to_ascii_uppercase();
    let valid = (1..=HIGHSCORE_NAME_LEN).contains(&upper.len())
        && upper.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if valid {
        Ok(upper)
    } else {
        Err(HighscoreError::InvalidName(name.to_string()))
    }
}

/// The best scores, sorted descending, at most [`HIGHSCORE_SLOTS`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighscoreTable {
    entries: Vec<HighscoreEntry>,
    /// Whether the table differs from what is on disk.
    dirty: bool,
}

impl Default for HighscoreTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_HIGHSCORES
                .iter()
                .map(|&(name, score)| HighscoreEntry {
                    name: name.to_string(),
                    score,
                })
                .collect(),
            dirty: false,
        }
    }
}

impl HighscoreTable {
    /// Parses CSV lines. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, HighscoreError> {
        let mut entries = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let corrupt = |reason: &str| HighscoreError::Corrupt {
                line: index + 1,
                reason: reason.to_string(),
            };
            let (name, score) = line.split_once(',').ok_or_else(|| corrupt("expected name,score"))?;
            let score = score.trim().parse::<u32>().map_err(|_| corrupt("score is not a number"))?;
            let name = normalize_name(name).map_err(|e| corrupt(&e.to_string()))?;
            entries.push(HighscoreEntry { name, score });
        }

        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(HIGHSCORE_SLOTS);
        Ok(Self { entries, dirty: false })
    }

    /// Reads the table from disk.
    ///
    /// Never fails: a missing file yields the defaults, and an unreadable or corrupt one
    /// logs a warning and yields the defaults. Either way the file is rewritten on save.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let fallback = || Self {
            dirty: true,
            ..Self::default()
        };

        match fs::read_to_string(path) {
            Ok(text) => match Self::parse(&text) {
                Ok(table) => {
                    debug!(path = %path.display(), entries = table.entries.len(), "Highscores loaded");
                    table
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "Highscore file is corrupt, using defaults");
                    fallback()
                }
            },
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No highscore file, using defaults");
                fallback()
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "Cannot read highscore file, using defaults");
                fallback()
            }
        }
    }

    pub fn entries(&self) -> &[HighscoreEntry] {
        &self.entries
    }

    /// The best score in the table.
    pub fn top(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.score)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether `score` would earn a place in the table.
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < HIGHSCORE_SLOTS || self.entries.last().is_some_and(|lowest| score > lowest.score)
    }

    /// Records a score, returning its zero-based rank if it made the table.
    ///
    /// Equal scores rank below the ones already recorded.
    pub fn record(&mut self, name: &str, score: u32) -> Result<Option<usize>, HighscoreError> {
        let name = normalize_name(name)?;
        if !self.qualifies(score) {
            return Ok(None);
        }

        let rank = self.entries.partition_point(|entry| entry.score >= score);
        self.entries.insert(rank, HighscoreEntry { name, score });
        self.entries.truncate(HIGHSCORE_SLOTS);
        self.dirty = true;
        debug!(rank, score, "Highscore recorded");
        Ok(Some(rank))
    }

    pub fn to_csv(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{},{}\n", entry.name, entry.score))
            .collect()
    }

    /// Writes the table to disk and marks it clean.
    pub fn save(&mut self, path: impl AsRef<Path>) -> GameResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_csv())?;
        self.dirty = false;
        debug!(path = %path.display(), "Highscores saved");
        Ok(())
    }
}
