use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Difficulty;

/// How many ranked entries the win screen shows.
pub const DEFAULT_TOP_LIMIT: usize = 5;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Score log unavailable: {0}")]
    Io(#[from] std::io::Error),
}

/// One completed game: who played and how many turns it took. Fewer
/// attempts ranks higher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_name: String,
    pub attempts: u32,
}

/// Append-only record log per difficulty with ranked retrieval. Ranking is
/// computed on read: ascending by attempts, insertion order breaks ties.
pub trait ScoreStore {
    fn record(
        &mut self,
        difficulty: Difficulty,
        player_name: &str,
        attempts: u32,
    ) -> Result<(), ScoreError>;

    fn top_scores(
        &self,
        difficulty: Difficulty,
        limit: usize,
    ) -> Result<Vec<ScoreEntry>, ScoreError>;
}

/// One `<name>:<attempts>` line per record, one UTF-8 text log per
/// difficulty. Logs are created empty when the store opens and are only
/// ever appended to afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct FileScoreStore {
    dir: PathBuf,
}

impl FileScoreStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ScoreError> {
        let store = Self { dir: dir.into() };
        std::fs::create_dir_all(&store.dir)?;
        for difficulty in Difficulty::ALL {
            let path = store.log_path(difficulty);
            if !path.exists() {
                File::create(&path)?;
            }
        }
        Ok(store)
    }

    pub fn log_path(&self, difficulty: Difficulty) -> PathBuf {
        self.dir.join(format!("highscores-{}.txt", difficulty.label()))
    }
}

impl ScoreStore for FileScoreStore {
    fn record(
        &mut self,
        difficulty: Difficulty,
        player_name: &str,
        attempts: u32,
    ) -> Result<(), ScoreError> {
        let mut log = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.log_path(difficulty))?;
        writeln!(log, "{player_name}:{attempts}")?;
        Ok(())
    }

    fn top_scores(
        &self,
        difficulty: Difficulty,
        limit: usize,
    ) -> Result<Vec<ScoreEntry>, ScoreError> {
        let log = match File::open(self.log_path(difficulty)) {
            Ok(log) => log,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut entries = Vec::new();
        for line in BufReader::new(log).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_record(&line) {
                Some(entry) => entries.push(entry),
                None => log::warn!("Skipping malformed score record {line:?}"),
            }
        }
        Ok(rank(entries, limit))
    }
}

/// In-memory twin of the file store, for tests and adapters that do not
/// persist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryScoreStore {
    records: Vec<(Difficulty, ScoreEntry)>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn record(
        &mut self,
        difficulty: Difficulty,
        player_name: &str,
        attempts: u32,
    ) -> Result<(), ScoreError> {
        self.records.push((
            difficulty,
            ScoreEntry {
                player_name: player_name.to_owned(),
                attempts,
            },
        ));
        Ok(())
    }

    fn top_scores(
        &self,
        difficulty: Difficulty,
        limit: usize,
    ) -> Result<Vec<ScoreEntry>, ScoreError> {
        let entries = self
            .records
            .iter()
            .filter(|(recorded, _)| *recorded == difficulty)
            .map(|(_, entry)| entry.clone())
            .collect();
        Ok(rank(entries, limit))
    }
}

/// Names are validated at session start, but a legacy line may still carry
/// `:` inside the name; splitting from the right keeps it rankable.
fn parse_record(line: &str) -> Option<ScoreEntry> {
    let (player_name, attempts) = line.trim_end().rsplit_once(':')?;
    let player_name = player_name.trim();
    if player_name.is_empty() {
        return None;
    }
    let attempts = attempts.trim().parse().ok()?;
    Some(ScoreEntry {
        player_name: player_name.to_owned(),
        attempts,
    })
}

fn rank(mut entries: Vec<ScoreEntry>, limit: usize) -> Vec<ScoreEntry> {
    entries.sort_by_key(|entry| entry.attempts);
    entries.truncate(limit);
    entries
}
