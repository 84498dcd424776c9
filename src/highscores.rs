//! Best score per difficulty
//!
//! Persisted as three whitespace-separated integers (easy, medium, hard) in a
//! single text file. A missing file is a fresh install, not an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// Default score file, relative to the working directory
pub const DEFAULT_SCORE_FILE: &str = "amazing_ball_highscore.dat";

/// Best score for each difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub easy: i32,
    pub medium: i32,
    pub hard: i32,
}

impl HighScores {
    pub fn get(&self, difficulty: Difficulty) -> i32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    fn slot_mut(&mut self, difficulty: Difficulty) -> &mut i32 {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Check if a score beats the stored one
    pub fn qualifies(&self, score: i32, difficulty: Difficulty) -> bool {
        score > self.get(difficulty)
    }

    /// Record `score` if it is an improvement. Returns true if it was.
    pub fn submit(&mut self, score: i32, difficulty: Difficulty) -> bool {
        if !self.qualifies(score, difficulty) {
            return false;
        }
        *self.slot_mut(difficulty) = score;
        true
    }

    /// Get the top score across all difficulties
    pub fn top_score(&self) -> i32 {
        self.easy.max(self.medium).max(self.hard)
    }

    /// Parse the file format. Missing or unparsable fields read as zero.
    pub fn parse(text: &str) -> Self {
        let mut fields = text.split_whitespace();
        let mut next = |name: &str| match fields.next() {
            Some(raw) => raw.parse::<i32>().unwrap_or_else(|_| {
                log::warn!("Ignoring malformed {name} high score {raw:?}");
                0
            }),
            None => 0,
        };
        let easy = next("easy");
        let medium = next("medium");
        let hard = next("hard");
        Self { easy, medium, hard }
    }

    /// Render the file format
    pub fn to_file_string(&self) -> String {
        format!("{} {} {}\n", self.easy, self.medium, self.hard)
    }
}

/// Load/save interface for best scores
pub trait ScoreStore {
    /// Read persisted scores (zeros when nothing is stored)
    fn load(&mut self) -> HighScores;

    /// Persist `score` only if it beats the stored value for `difficulty`.
    ///
    /// Returns true if a new best was written.
    fn save(&mut self, score: i32, difficulty: Difficulty) -> bool;

    /// Scores as last loaded or saved
    fn scores(&self) -> HighScores;
}

/// Text-file backed store
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
    scores: HighScores,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            scores: HighScores::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> io::Result<HighScores> {
        let text = fs::read_to_string(&self.path)?;
        Ok(HighScores::parse(&text))
    }

    fn write(&self, scores: &HighScores) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, scores.to_file_string())
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&mut self) -> HighScores {
        self.scores = match self.read() {
            Ok(scores) => {
                log::info!(
                    "Loaded high scores from {}: {} / {} / {}",
                    self.path.display(),
                    scores.easy,
                    scores.medium,
                    scores.hard
                );
                scores
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high score file at {}, starting fresh", self.path.display());
                HighScores::default()
            }
            Err(e) => {
                log::warn!("Failed to read {}: {e}", self.path.display());
                HighScores::default()
            }
        };
        self.scores
    }

    fn save(&mut self, score: i32, difficulty: Difficulty) -> bool {
        let mut updated = self.scores;
        if !updated.submit(score, difficulty) {
            return false;
        }

        match self.write(&updated) {
            Ok(()) => {
                log::info!("New {} high score: {}", difficulty.as_str(), score);
                self.scores = updated;
                true
            }
            Err(e) => {
                log::warn!("Failed to save high score to {}: {e}", self.path.display());
                false
            }
        }
    }

    fn scores(&self) -> HighScores {
        self.scores
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: HighScores,
    /// Number of successful saves
    pub writes: u32,
}

impl MemoryScoreStore {
    pub fn with_scores(scores: HighScores) -> Self {
        Self { scores, writes: 0 }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&mut self) -> HighScores {
        self.scores
    }

    fn save(&mut self, score: i32, difficulty: Difficulty) -> bool {
        let saved = self.scores.submit(score, difficulty);
        if saved {
            self.writes += 1;
        }
        saved
    }

    fn scores(&self) -> HighScores {
        self.scores
    }
}
