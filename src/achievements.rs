//! Medal wall: fixed achievement definitions with persisted unlock flags
//!
//! Unlocks are monotonic - once earned, an achievement is never re-locked,
//! even if a later game scores lower. The load/save store is injected so
//! the evaluator stays testable; LocalStorage backs it on web, a JSON file
//! in the user's data directory on native.

use serde::{Deserialize, Serialize};

use crate::sim::RunStats;

/// Storage key / file stem for the achievement set
pub const STORAGE_KEY: &str = "word_ninja_achievements";

/// A single achievement; only `unlocked` ever mutates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
}

/// Persisted form: just the flags, merged against definitions on load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFlag {
    pub id: String,
    pub unlocked: bool,
}

/// The fixed definition set. New ids added here default to locked for
/// players with an older save.
fn definitions() -> Vec<Achievement> {
    let def = |id, title, description, icon| Achievement {
        id,
        title,
        description,
        icon,
        unlocked: false,
    };
    vec![
        def("rookie", "初出茅庐", "Score 800+", "🌱"),
        def("speedster", "眼疾手快", "Score 1500+", "⚡"),
        def("sharpshooter", "百步穿杨", "Score 2000+", "🎯"),
        def("legend", "传奇玩家", "Score 2500+", "👑"),
        def("combo_master", "Combo Master", "Reach 10x Combo", "🔥"),
        def("lightning", "Lightning Reflexes", "Get 5 Speed Bonuses", "🐆"),
    ]
}

/// Whether a run's stats earn the given achievement
fn earned(id: &str, stats: &RunStats) -> bool {
    match id {
        "rookie" => stats.score >= 800,
        "speedster" => stats.score >= 1500,
        "sharpshooter" => stats.score >= 2000,
        "legend" => stats.score >= 2500,
        "combo_master" => stats.max_combo >= 10,
        "lightning" => stats.speed_bonus_count >= 5,
        _ => false,
    }
}

/// Injected persistence collaborator for the achievement set
pub trait AchievementStore {
    /// Saved flags, or None when nothing valid is stored
    fn load(&self) -> Option<Vec<SavedFlag>>;
    /// Persist the full set; failures are logged, never surfaced
    fn save(&self, achievements: &[Achievement]);
}

/// The process-wide achievement set
#[derive(Debug, Clone)]
pub struct Achievements {
    entries: Vec<Achievement>,
}

impl Achievements {
    /// Load from the store, merging saved flags into the definition list.
    /// Unknown saved ids are ignored; missing ids stay locked.
    pub fn load_from(store: &dyn AchievementStore) -> Self {
        let mut entries = definitions();
        if let Some(saved) = store.load() {
            for flag in saved {
                if let Some(entry) = entries.iter_mut().find(|e| e.id == flag.id) {
                    entry.unlocked = flag.unlocked;
                }
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[Achievement] {
        &self.entries
    }

    /// Evaluate a finished run. Called once per Playing -> GameOver
    /// transition; returns the newly unlocked achievements and persists
    /// the full set when anything changed.
    pub fn evaluate(&mut self, stats: &RunStats, store: &dyn AchievementStore) -> Vec<Achievement> {
        let mut newly_unlocked = Vec::new();
        for entry in &mut self.entries {
            if !entry.unlocked && earned(entry.id, stats) {
                entry.unlocked = true;
                newly_unlocked.push(entry.clone());
                log::info!("Achievement unlocked: {}", entry.id);
            }
        }
        if !newly_unlocked.is_empty() {
            store.save(&self.entries);
        }
        newly_unlocked
    }
}

/// Serialize the flag array for storage
pub fn to_saved_json(achievements: &[Achievement]) -> Result<String, serde_json::Error> {
    let flags: Vec<SavedFlag> = achievements
        .iter()
        .map(|a| SavedFlag {
            id: a.id.to_string(),
            unlocked: a.unlocked,
        })
        .collect();
    serde_json::to_string(&flags)
}

/// LocalStorage-backed store (web)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl AchievementStore for LocalStorageStore {
    fn load(&self) -> Option<Vec<SavedFlag>> {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten()?;
        let json = storage.get_item(STORAGE_KEY).ok().flatten()?;
        match serde_json::from_str(&json) {
            Ok(flags) => Some(flags),
            Err(e) => {
                log::warn!("Failed to parse saved achievements: {e}");
                None
            }
        }
    }

    fn save(&self, achievements: &[Achievement]) {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
        else {
            log::warn!("LocalStorage unavailable, achievements not saved");
            return;
        };
        match to_saved_json(achievements) {
            Ok(json) => {
                let _ = storage.set_item(STORAGE_KEY, &json);
            }
            Err(e) => log::warn!("Failed to serialize achievements: {e}"),
        }
    }
}

/// Data-directory file store (native)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    fn file_path() -> Option<std::path::PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("word-ninja").join(format!("{STORAGE_KEY}.json")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AchievementStore for FileStore {
    fn load(&self) -> Option<Vec<SavedFlag>> {
        let path = Self::file_path()?;
        let contents = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(flags) => Some(flags),
            Err(e) => {
                log::warn!("Failed to parse {path:?}: {e}");
                None
            }
        }
    }

    fn save(&self, achievements: &[Achievement]) {
        let Some(path) = Self::file_path() else {
            log::warn!("No data directory, achievements not saved");
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create {parent:?}: {e}");
                return;
            }
        }
        match to_saved_json(achievements) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    log::warn!("Failed to write achievements: {e}");
                }
            }
            Err(e) => log::warn!("Failed to serialize achievements: {e}"),
        }
    }
}
