use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::{app_dirs::AppDirs, difficulty::Difficulty};

/// One finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub finished_at: DateTime<Local>,
    pub difficulty: Difficulty,
    pub score: i32,
}

impl ScoreRecord {
    pub fn now(difficulty: Difficulty, score: i32) -> Self {
        Self {
            finished_at: Local::now(),
            difficulty,
            score,
        }
    }
}

/// Append-only CSV log of finished rounds
#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::scores_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, record: &ScoreRecord) -> Result<(), csv::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // If the file doesn't exist yet, we need to emit a header
        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    /// All readable records; malformed rows are skipped
    pub fn records(&self) -> Result<Vec<ScoreRecord>, csv::Error> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        Ok(reader
            .deserialize::<ScoreRecord>()
            .filter_map(|row| match row {
                Ok(record) => Some(record),
                Err(err) => {
                    log::warn!("skipping malformed score row: {err}");
                    None
                }
            })
            .collect())
    }

    pub fn best_score(&self, difficulty: Difficulty) -> Result<Option<i32>, csv::Error> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.difficulty == difficulty)
            .map(|r| r.score)
            .max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_log_has_no_best() {
        let dir = tempdir().unwrap();
        let log = ScoreLog::with_path(dir.path().join("scores.csv"));
        assert_eq!(log.records().unwrap(), vec![]);
        assert_eq!(log.best_score(Difficulty::Easy).unwrap(), None);
    }

    #[test]
    fn appends_and_reads_back() {
        let dir = tempdir().unwrap();
        let log = ScoreLog::with_path(dir.path().join("state").join("scores.csv"));

        log.append(&ScoreRecord::now(Difficulty::Easy, 12)).unwrap();
        log.append(&ScoreRecord::now(Difficulty::Hard, -2)).unwrap();
        log.append(&ScoreRecord::now(Difficulty::Easy, 30)).unwrap();

        let records = log.records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].difficulty, Difficulty::Hard);
        assert_eq!(records[1].score, -2);

        assert_eq!(log.best_score(Difficulty::Easy).unwrap(), Some(30));
        assert_eq!(log.best_score(Difficulty::Hard).unwrap(), Some(-2));
        assert_eq!(log.best_score(Difficulty::Medium).unwrap(), None);
    }

    #[test]
    fn header_written_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let log = ScoreLog::with_path(&path);
        log.append(&ScoreRecord::now(Difficulty::Medium, 1)).unwrap();
        log.append(&ScoreRecord::now(Difficulty::Medium, 2)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("finished_at").count(), 1);
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let log = ScoreLog::with_path(&path);
        log.append(&ScoreRecord::now(Difficulty::Easy, 5)).unwrap();
        let mut contents = fs::read_to_string(&path).unwrap();
        contents.push_str("garbage,expert,lots\n");
        fs::write(&path, contents).unwrap();

        assert_eq!(log.records().unwrap().len(), 1);
    }
}
