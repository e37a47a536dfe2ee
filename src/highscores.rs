//! High score persistence
//!
//! The stored record is a single integer in a plain-text file. Reading a
//! missing or unreadable file yields 0; write failures are logged and the
//! session carries on.

use std::cell::Cell;
use std::fmt;
use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Default high score file name
pub const HIGH_SCORE_FILE: &str = "highscore.txt";

/// Failure reading or writing the high score
#[derive(Debug)]
pub enum HighScoreError {
    Io(io::Error),
    Parse(ParseIntError),
}

impl fmt::Display for HighScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighScoreError::Io(e) => write!(f, "high score I/O error: {e}"),
            HighScoreError::Parse(e) => write!(f, "high score is not an integer: {e}"),
        }
    }
}

impl std::error::Error for HighScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HighScoreError::Io(e) => Some(e),
            HighScoreError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for HighScoreError {
    fn from(e: io::Error) -> Self {
        HighScoreError::Io(e)
    }
}

impl From<ParseIntError> for HighScoreError {
    fn from(e: ParseIntError) -> Self {
        HighScoreError::Parse(e)
    }
}

/// Persistence boundary for the single stored high score
pub trait HighScoreStore {
    fn try_load(&self) -> Result<u64, HighScoreError>;
    fn try_save(&mut self, score: u64) -> Result<(), HighScoreError>;

    /// Stored high score, or 0 if it cannot be read
    fn load_high_score(&self) -> u64 {
        match self.try_load() {
            Ok(score) => score,
            Err(HighScoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!("Treating high score as 0: {e}");
                0
            }
        }
    }

    /// Persist `score`; failures are logged and otherwise ignored
    fn save_high_score(&mut self, score: u64) {
        match self.try_save(score) {
            Ok(()) => log::info!("High score {score} saved"),
            Err(e) => log::warn!("Could not save high score {score}: {e}"),
        }
    }
}

/// `highscore.txt`-style store: one decimal integer
#[derive(Debug, Clone)]
pub struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for HighScoreFile {
    fn default() -> Self {
        Self::new(HIGH_SCORE_FILE)
    }
}

impl HighScoreStore for HighScoreFile {
    fn try_load(&self) -> Result<u64, HighScoreError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(text.trim().parse::<u64>()?)
    }

    fn try_save(&mut self, score: u64) -> Result<(), HighScoreError> {
        fs::write(&self.path, score.to_string())?;
        Ok(())
    }
}

/// In-memory store. Clones share the same slot, so a test can keep a handle
/// while the game owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScores {
    stored: Rc<Cell<Option<u64>>>,
    saves: Rc<Cell<u32>>,
    fail_writes: bool,
}

impl MemoryHighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        let store = Self::default();
        store.stored.set(Some(score));
        store
    }

    /// Store whose writes always fail
    pub fn read_only(score: u64) -> Self {
        let mut store = Self::with_score(score);
        store.fail_writes = true;
        store
    }

    pub fn stored(&self) -> Option<u64> {
        self.stored.get()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> u32 {
        self.saves.get()
    }
}

impl HighScoreStore for MemoryHighScores {
    fn try_load(&self) -> Result<u64, HighScoreError> {
        self.stored
            .get()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no high score recorded").into())
    }

    fn try_save(&mut self, score: u64) -> Result<(), HighScoreError> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only store").into());
        }
        self.stored.set(Some(score));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
