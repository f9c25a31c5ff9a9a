use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where log files go; `$HOME/.local/state/typeace` when HOME is set
    pub fn log_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("typeace"),
            )
        } else {
            ProjectDirs::from("", "", "typeace").map(|pd| pd.data_local_dir().to_path_buf())
        }
    }
}
