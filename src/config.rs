use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::language::Language;

pub const DEFAULT_WORD_COUNT: usize = 30;

/// Word counts offered by the word-count shortcut
pub const WORD_COUNT_PRESETS: [usize; 3] = [10, 30, 50];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub word_count: usize,
    pub language: Language,
    pub backspace_disabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            word_count: DEFAULT_WORD_COUNT,
            language: Language::English,
            backspace_disabled: false,
        }
    }
}

impl Settings {
    /// Replace values that cannot drive a session with their defaults
    pub fn sanitized(mut self) -> Self {
        if self.word_count == 0 {
            self.word_count = DEFAULT_WORD_COUNT;
        }
        self
    }

    /// The next preset after the current word count, wrapping around
    pub fn next_word_count(&self) -> usize {
        WORD_COUNT_PRESETS
            .iter()
            .copied()
            .find(|&n| n > self.word_count)
            .unwrap_or(WORD_COUNT_PRESETS[0])
    }
}

pub trait ConfigStore {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typeace") {
            pd.config_dir().join("settings.json")
        } else {
            PathBuf::from("typeace_settings.json")
        };
        Self { path }
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
    fn load(&self) -> Settings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(target: "config", path = %self.path.display(), error = %err, "settings_not_read");
                return Settings::default();
            }
        };
        match serde_json::from_slice::<Settings>(&bytes) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                warn!(target: "config", path = %self.path.display(), error = %err, "settings_invalid_using_defaults");
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(settings)?;
        fs::write(&self.path, data)
    }
}

/// Store that keeps settings in memory, for headless runs and tests
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    settings: RefCell<Option<Settings>>,
    saves: Cell<usize>,
}

impl MemoryConfigStore {
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: RefCell::new(Some(settings)),
            saves: Cell::new(0),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Settings {
        self.settings.borrow().unwrap_or_default()
    }

    fn save(&self, settings: &Settings) -> std::io::Result<()> {
        *self.settings.borrow_mut() = Some(*settings);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
