//=========================================================================
// Application State
//=========================================================================
//
// Profiles, appearances and high scores persisted between runs.
//
// Architecture:
//   AppState (owned by the entry point, lent to scenes)
//     ├─ SaveData      versioned schema, serde camelCase JSON
//     └─ KeyValueStore whole-blob load/save
//
// Every mutation serializes the entire blob and writes it back. Load
// never fails: unreadable data is logged and replaced by defaults.
//
//=========================================================================

//=== Module Declarations =================================================

mod migrate;
mod store;

//=== Public API ==========================================================

pub use migrate::CURRENT_VERSION;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use log::{error, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Constants ===========================================================

/// Store key the save blob lives under.
pub const SAVE_KEY: &str = "sara-demon-hunters-save-v2";

/// Built-in profile slots: `(key, display name)`.
pub const DEFAULT_SLOTS: [(&str, &str); 3] = [("sara", "Sara"), ("lara", "Lara"), ("sofia", "Sofia")];

/// Games whose high score every profile starts with.
pub const DEFAULT_SCORED_GAMES: [&str; 2] = ["runner", "blocks"];

//=== StateError ==========================================================

#[derive(Debug, Error)]
pub enum StateError {
    #[error("save data JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("save data root is not a JSON object")]
    NotAnObject,

    #[error("save data version {found} is not supported (newest is {supported})")]
    UnsupportedVersion { found: String, supported: u32 },

    #[error("no profile slot named {0:?}")]
    UnknownSlot(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

//=== Pet =================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pet {
    #[default]
    None,
    Cat,
    Dog,
    Dragon,
}

impl Pet {
    /// Cycle order used by the wardrobe.
    pub const ALL: [Pet; 4] = [Pet::None, Pet::Cat, Pet::Dog, Pet::Dragon];

    pub fn from_name(name: &str) -> Option<Pet> {
        match name {
            "none" => Some(Pet::None),
            "cat" => Some(Pet::Cat),
            "dog" => Some(Pet::Dog),
            "dragon" => Some(Pet::Dragon),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pet::None => "No Pet",
            Pet::Cat => "Cat",
            Pet::Dog => "Dog",
            Pet::Dragon => "Dragon",
        }
    }

    /// The pet after this one in [`Pet::ALL`], wrapping around.
    pub fn next(self) -> Pet {
        let i = Pet::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Pet::ALL[(i + 1) % Pet::ALL.len()]
    }
}

//=== Appearance ==========================================================

/// Paper-doll look of a profile's hero. Colors are `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appearance {
    pub hair_style: u32,
    pub hair_color: String,
    pub outfit: u32,
    pub outfit_color: String,
    pub skin_tone: String,
    pub pet: Pet,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            hair_style: 0,
            hair_color: "#ff9a9e".to_string(),
            outfit: 0,
            outfit_color: "#a18cd1".to_string(),
            skin_tone: "#f5d0b0".to_string(),
            pet: Pet::None,
        }
    }
}

//=== Profile =============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub display_name: String,
    pub appearance: Appearance,
    pub high_scores: BTreeMap<String, u32>,
}

impl Profile {
    pub fn named(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            appearance: Appearance::default(),
            high_scores: DEFAULT_SCORED_GAMES
                .iter()
                .map(|game| (game.to_string(), 0))
                .collect(),
        }
    }

    pub fn high_score(&self, game: &str) -> u32 {
        self.high_scores.get(game).copied().unwrap_or(0)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::named("Friend")
    }
}

//=== SaveData ============================================================

/// The persisted blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub version: u32,
    #[serde(default)]
    pub current_slot: String,
    pub slots: BTreeMap<String, Profile>,
}

impl SaveData {
    /// Adds any missing built-in slot and repairs the current selection.
    fn fill_defaults(&mut self) {
        for (key, name) in DEFAULT_SLOTS {
            self.slots
                .entry(key.to_string())
                .or_insert_with(|| Profile::named(name));
        }
        for profile in self.slots.values_mut() {
            for game in DEFAULT_SCORED_GAMES {
                profile.high_scores.entry(game.to_string()).or_insert(0);
            }
        }
        if !self.slots.contains_key(&self.current_slot) {
            self.current_slot = DEFAULT_SLOTS[0].0.to_string();
        }
    }
}

impl Default for SaveData {
    fn default() -> Self {
        let mut data = Self {
            version: CURRENT_VERSION,
            current_slot: String::new(),
            slots: BTreeMap::new(),
        };
        data.fill_defaults();
        data
    }
}

//=== AppState ============================================================

/// Process-wide persisted state, passed by reference into scenes.
pub struct AppState {
    data: SaveData,
    store: Box<dyn KeyValueStore>,
    fallback: Profile,
}

impl AppState {
    //--- Construction -----------------------------------------------------

    /// Loads from `store`, falling back to defaults on any failure.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let mut data = match store.get(SAVE_KEY) {
            Ok(Some(text)) => migrate::decode(&text).unwrap_or_else(|e| {
                error!(target: "state", "Discarding unreadable save data: {}", e);
                SaveData::default()
            }),
            Ok(None) => {
                info!(target: "state", "No save data found, starting fresh");
                SaveData::default()
            }
            Err(e) => {
                error!(target: "state", "Could not read save data: {}", e);
                SaveData::default()
            }
        };
        data.fill_defaults();

        info!(
            target: "state",
            "Loaded {} profile slot(s), current: {}",
            data.slots.len(),
            data.current_slot
        );

        Self {
            data,
            store,
            fallback: Profile::default(),
        }
    }

    /// Fresh defaults backed by a [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    //--- Queries ----------------------------------------------------------

    pub fn data(&self) -> &SaveData {
        &self.data
    }

    pub fn current_slot(&self) -> &str {
        &self.data.current_slot
    }

    /// Slots in key order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.data.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Built-in slots in their fixed order, then any others in key order.
    pub fn ordered_slots(&self) -> Vec<(&str, &Profile)> {
        let builtin = DEFAULT_SLOTS
            .iter()
            .filter_map(|(key, _)| self.data.slots.get_key_value(*key));
        let extra = self
            .data
            .slots
            .iter()
            .filter(|(key, _)| !DEFAULT_SLOTS.iter().any(|(k, _)| k == key));
        builtin
            .chain(extra)
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    /// Profile of the current slot.
    pub fn profile(&self) -> &Profile {
        self.data
            .slots
            .get(&self.data.current_slot)
            .unwrap_or(&self.fallback)
    }

    pub fn high_score(&self, game: &str) -> u32 {
        self.profile().high_score(game)
    }

    //--- Mutations --------------------------------------------------------

    pub fn select_slot(&mut self, slot: &str) -> Result<(), StateError> {
        if !self.data.slots.contains_key(slot) {
            return Err(StateError::UnknownSlot(slot.to_string()));
        }
        self.data.current_slot = slot.to_string();
        info!(target: "state", "Selected profile slot {}", slot);
        self.save()
    }

    pub fn set_display_name(&mut self, name: &str) -> Result<(), StateError> {
        self.profile_mut().display_name = name.to_string();
        self.save()
    }

    pub fn update_appearance(&mut self, appearance: Appearance) -> Result<(), StateError> {
        self.profile_mut().appearance = appearance;
        self.save()
    }

    /// Stores `score` if it beats the current best. Returns whether it did.
    pub fn record_high_score(&mut self, game: &str, score: u32) -> Result<bool, StateError> {
        if score <= self.high_score(game) {
            return Ok(false);
        }
        self.profile_mut()
            .high_scores
            .insert(game.to_string(), score);
        info!(target: "state", "New {} high score: {}", game, score);
        self.save()?;
        Ok(true)
    }

    /// Serializes the whole blob and writes it to the store.
    pub fn save(&mut self) -> Result<(), StateError> {
        let text = serde_json::to_string(&self.data)?;
        self.store.set(SAVE_KEY, &text).map_err(|e| {
            error!(target: "state", "Failed to save: {}", e);
            StateError::from(e)
        })
    }

    //--- Internal Helpers -------------------------------------------------

    fn profile_mut(&mut self) -> &mut Profile {
        let slot = self.data.current_slot.clone();
        self.data.slots.entry(slot).or_default()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Memory store whose contents outlive the `AppState` that owns it.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.borrow_mut().set(key, value)
        }
    }

    #[test]
    fn fresh_state_has_default_slots() {
        let state = AppState::in_memory();

        assert_eq!(state.slots().count(), DEFAULT_SLOTS.len());
        assert_eq!(state.current_slot(), "sara");
        assert_eq!(state.profile().display_name, "Sara");
        assert_eq!(state.profile().appearance, Appearance::default());
        assert_eq!(state.high_score("runner"), 0);
    }

    #[test]
    fn save_then_load_reproduces_every_field() {
        let store = SharedStore::default();
        let mut state = AppState::load(Box::new(store.clone()));

        state.select_slot("lara").unwrap();
        state.set_display_name("Captain Lara").unwrap();
        state
            .update_appearance(Appearance {
                hair_style: 7,
                hair_color: "#123456".into(),
                outfit: 3,
                outfit_color: "#abcdef".into(),
                skin_tone: "#8d5524".into(),
                pet: Pet::Dragon,
            })
            .unwrap();
        state.record_high_score("blocks", 130).unwrap();

        let reloaded = AppState::load(Box::new(store));
        assert_eq!(reloaded.data(), state.data());
        assert_eq!(reloaded.profile().display_name, "Captain Lara");
        assert_eq!(reloaded.profile().appearance.pet, Pet::Dragon);
        assert_eq!(reloaded.high_score("blocks"), 130);
    }

    #[test]
    fn missing_slot_is_filled_without_touching_others() {
        let mut data = SaveData::default();
        data.slots.remove("sofia");
        let lara = data.slots.get_mut("lara").unwrap();
        lara.display_name = "Renamed".into();
        lara.high_scores.insert("runner".into(), 42);
        let text = serde_json::to_string(&data).unwrap();

        let state = AppState::load(Box::new(MemoryStore::with_entry(SAVE_KEY, &text)));

        let slots: BTreeMap<_, _> = state.slots().collect();
        assert_eq!(slots["sofia"], &Profile::named("Sofia"));
        assert_eq!(slots["lara"].display_name, "Renamed");
        assert_eq!(slots["lara"].high_score("runner"), 42);
    }

    #[test]
    fn original_blob_missing_a_slot_gains_only_that_slot() {
        let original = r##"{
            "sara": {
                "playerName": "Sara",
                "character": {
                    "hairStyle": 2, "hairColor": "#2c3e50", "outfit": 5,
                    "outfitColor": "#ff6b81", "skinTone": "#e0ac69", "pet": "cat"
                },
                "highScores": { "runner": 120, "tetris": 40 }
            },
            "lara": {
                "playerName": "Lara",
                "character": {
                    "hairStyle": 0, "hairColor": "#ff9a9e", "outfit": 0,
                    "outfitColor": "#a18cd1", "skinTone": "#f5d0b0", "pet": null
                },
                "highScores": { "runner": 0, "tetris": 0 }
            }
        }"##;

        let state = AppState::load(Box::new(MemoryStore::with_entry(SAVE_KEY, original)));

        let keys: Vec<_> = state.ordered_slots().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["sara", "lara", "sofia"]);
        assert_eq!(state.current_slot(), "sara");
        assert_eq!(state.profile().appearance.pet, Pet::Cat);
        assert_eq!(state.high_score("runner"), 120);
        assert_eq!(state.high_score("blocks"), 40);

        let slots: BTreeMap<_, _> = state.slots().collect();
        assert_eq!(slots["sofia"], &Profile::named("Sofia"));
    }

    #[test]
    fn extra_slots_follow_the_built_in_ones() {
        let mut data = SaveData::default();
        data.slots.insert("abby".into(), Profile::named("Abby"));
        let text = serde_json::to_string(&data).unwrap();

        let state = AppState::load(Box::new(MemoryStore::with_entry(SAVE_KEY, &text)));

        let keys: Vec<_> = state.ordered_slots().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["sara", "lara", "sofia", "abby"]);
    }

    #[test]
    fn corrupt_blob_falls_back_to_defaults() {
        let store = MemoryStore::with_entry(SAVE_KEY, "{not json");
        let state = AppState::load(Box::new(store));

        assert_eq!(state.data(), &SaveData::default());
    }

    #[test]
    fn high_score_only_saves_improvements() {
        let mut state = AppState::in_memory();

        assert!(state.record_high_score("runner", 12).unwrap());
        assert!(!state.record_high_score("runner", 5).unwrap());
        assert_eq!(state.high_score("runner"), 12);
    }

    #[test]
    fn selecting_unknown_slot_is_an_error() {
        let mut state = AppState::in_memory();

        assert!(matches!(
            state.select_slot("nobody"),
            Err(StateError::UnknownSlot(_))
        ));
        assert_eq!(state.current_slot(), "sara");
    }

    #[test]
    fn json_uses_camel_case_and_lowercase_pets() {
        let mut profile = Profile::named("A");
        profile.appearance.pet = Pet::Cat;
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["displayName"], "A");
        assert_eq!(json["appearance"]["hairColor"], "#ff9a9e");
        assert_eq!(json["appearance"]["pet"], "cat");
        assert_eq!(json["highScores"]["blocks"], 0);
    }

    #[test]
    fn pet_cycle_wraps() {
        assert_eq!(Pet::None.next(), Pet::Cat);
        assert_eq!(Pet::Dragon.next(), Pet::None);
    }
}
