use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{app_dirs::AppDirs, cadence::CadenceConfig, difficulty::Difficulty};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Last selected difficulty, kept as text so hand-edited files can't fail the load
    #[serde(deserialize_with = "difficulty_name")]
    pub difficulty: String,
    pub bell: bool,
    pub tick_ms: u64,
    pub min_pitch: f64,
    pub max_pitch: f64,
    pub pitch_damping: f64,
}

impl Default for Config {
    fn default() -> Self {
        let cadence = CadenceConfig::default();
        Self {
            difficulty: Difficulty::default().to_string().to_lowercase(),
            bell: true,
            tick_ms: 30,
            min_pitch: cadence.min_pitch,
            max_pitch: cadence.max_pitch,
            pitch_damping: 8.0,
        }
    }
}

impl Config {
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::parse_or_default(&self.difficulty)
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty.to_string().to_lowercase();
    }

    pub fn cadence(&self) -> CadenceConfig {
        let (min_pitch, max_pitch) = if self.min_pitch <= self.max_pitch {
            (self.min_pitch, self.max_pitch)
        } else {
            log::warn!(
                "min_pitch {} exceeds max_pitch {}; swapping",
                self.min_pitch,
                self.max_pitch
            );
            (self.max_pitch, self.min_pitch)
        };
        CadenceConfig {
            min_pitch,
            max_pitch,
        }
    }
}

/// Accepts a difficulty name, or the numeric menu index older config files stored
fn difficulty_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Name(String),
        Index(i64),
    }

    let difficulty = match Stored::deserialize(deserializer)? {
        Stored::Name(name) => return Ok(name),
        Stored::Index(index) => Difficulty::from_index(index).unwrap_or_else(|err| {
            log::warn!("{err}; falling back to {}", Difficulty::Easy);
            Difficulty::Easy
        }),
    };
    Ok(difficulty.to_string().to_lowercase())
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("ignoring unreadable config {}: {err}", self.path.display());
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
