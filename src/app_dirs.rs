use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "keyrush";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("keyrush_config.json"))
    }

    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn scores_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("scores.csv"))
            .unwrap_or_else(|| PathBuf::from("keyrush_scores.csv"))
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("keyrush.log"))
            .unwrap_or_else(|| PathBuf::from("keyrush.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_have_expected_names() {
        assert!(AppDirs::config_path().ends_with("config.json"));
        assert!(AppDirs::scores_path().ends_with("scores.csv"));
        assert!(AppDirs::log_path().ends_with("keyrush.log"));
    }
}
