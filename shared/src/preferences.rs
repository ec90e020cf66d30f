//! Display preferences
//!
//! Unit system and card theme are explicit values handed to whoever renders.
//! A [`PreferenceSession`] reads them once from its store and writes them
//! back on every change.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::card::Theme;
use crate::errors::PreferenceError;
use crate::units::UnitSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub unit_system: UnitSystem,
    pub theme: Theme,
}

/// Persistence adapter for [`Preferences`]
pub trait PreferenceStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<Preferences>, PreferenceError>;

    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError>;
}

/// Keeps preferences in memory only
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    saved: Mutex<Option<Preferences>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(preferences: Preferences) -> Self {
        Self {
            saved: Mutex::new(Some(preferences)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Preferences>> {
        self.saved.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Option<Preferences>, PreferenceError> {
        Ok(*self.slot())
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        *self.slot() = Some(*preferences);
        Ok(())
    }
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Option<Preferences>, PreferenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(preferences)?)?;
        debug!(path = %self.path.display(), "Saved preferences");
        Ok(())
    }
}

/// Current preferences plus the store they persist to
pub struct PreferenceSession<S> {
    store: S,
    current: Preferences,
}

impl<S: PreferenceStore> PreferenceSession<S> {
    /// Read stored preferences; an unreadable store falls back to defaults
    pub fn open(store: S) -> Self {
        let current = match store.load() {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Could not read preferences, using defaults");
                Preferences::default()
            }
        };
        Self { store, current }
    }

    pub fn current(&self) -> Preferences {
        self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_unit_system(&mut self, unit_system: UnitSystem) -> Result<(), PreferenceError> {
        self.update(Preferences {
            unit_system,
            ..self.current
        })
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), PreferenceError> {
        self.update(Preferences { theme, ..self.current })
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, PreferenceError> {
        let theme = self.current.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    /// Replace the preferences, writing through when they changed
    pub fn update(&mut self, preferences: Preferences) -> Result<(), PreferenceError> {
        if preferences == self.current {
            return Ok(());
        }
        self.store.save(&preferences)?;
        self.current = preferences;
        Ok(())
    }
}
