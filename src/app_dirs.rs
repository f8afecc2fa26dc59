use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "guessword")
    }

    /// Per-user data directory that replaces the embedded data when it holds
    /// an `app.config.json`
    pub fn data_override_dir() -> Option<PathBuf> {
        Self::project().map(|pd| pd.config_dir().join("data"))
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("guessword");
            Some(state_dir.join("guessword.log"))
        } else {
            Self::project().map(|pd| pd.data_local_dir().join("guessword.log"))
        }
    }
}
