//! Persisted UI theme and the key/value local store that backs it.
//!
//! The local store is a flat JSON object in the state directory, written whole on
//! every change. The theme is the only value the client keeps across runs.

use crate::config::CoreConfig;
use crate::constants::THEME_KEY;
use crate::{RecordsError, RecordsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(RecordsError::InvalidInput(format!("unknown theme: {other}"))),
        }
    }
}

/// String key/value store persisted as a JSON object.
#[derive(Clone, Debug)]
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `RecordsError::FileRead` if the file exists but cannot be read, or
    /// `RecordsError::Deserialization` if it is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> RecordsResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(RecordsError::Deserialization)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(RecordsError::FileRead(e)),
        };
        Ok(Self { path, entries })
    }

    fn empty(path: PathBuf) -> Self {
        Self {
            path,
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Sets `key` and writes the whole store back to disk.
    ///
    /// The in-memory entries only change once the write has succeeded.
    pub fn set(&mut self, key: &str, value: &str) -> RecordsResult<()> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)?;
        self.entries = entries;
        Ok(())
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> RecordsResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(RecordsError::StateDirCreation)?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(RecordsError::Serialization)?;
        fs::write(&self.path, json).map_err(RecordsError::FileWrite)
    }
}

/// The active theme plus the store it is persisted in.
#[derive(Clone, Debug)]
pub struct ThemeService {
    store: LocalStore,
    theme: Theme,
}

impl ThemeService {
    /// Loads the saved theme. An absent or unrecognised value falls back to light,
    /// and an unparseable store is treated as empty and rewritten on the next change.
    pub fn load(cfg: &CoreConfig) -> RecordsResult<Self> {
        let path = cfg.local_store_path();
        let store = match LocalStore::open(&path) {
            Ok(store) => store,
            Err(RecordsError::Deserialization(e)) => {
                tracing::warn!("discarding unreadable local store {}: {}", path.display(), e);
                LocalStore::empty(path)
            }
            Err(e) => return Err(e),
        };
        let theme = match store.get(THEME_KEY).map(str::parse::<Theme>) {
            Some(Ok(theme)) => theme,
            Some(Err(_)) => {
                tracing::warn!("ignoring unrecognised saved theme in {}", store.path().display());
                Theme::default()
            }
            None => Theme::default(),
        };
        Ok(Self { store, theme })
    }

    pub fn current(&self) -> Theme {
        self.theme
    }

    pub fn set(&mut self, theme: Theme) -> RecordsResult<Theme> {
        self.store.set(THEME_KEY, theme.as_str())?;
        self.theme = theme;
        Ok(theme)
    }

    pub fn toggle(&mut self) -> RecordsResult<Theme> {
        self.set(self.theme.toggled())
    }
}
