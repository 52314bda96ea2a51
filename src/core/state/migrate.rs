//=========================================================================
// Save Data Migration
//=========================================================================
//
// Turns a stored blob of any known schema version into `SaveData`.
//
// Versions:
//   (none) legacy map of slot → { playerName, character, highScores },
//          with a nullable `pet` and the block game scored as "tetris"
//   2      { version, currentSlot, slots: slot → Profile }
//
// Each version step is an explicit function. Nested fields a blob lacks
// come from the built-in defaults; fields it has are never dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, warn};
use serde_json::{Map, Value};

//=== Internal Dependencies ===============================================

use super::{Appearance, Pet, Profile, SaveData, StateError, DEFAULT_SLOTS};

//=== Versions ============================================================

/// Schema version written by this build.
pub const CURRENT_VERSION: u32 = 2;

//=== decode ==============================================================

/// Parses `text` and migrates it to the current schema.
pub(super) fn decode(text: &str) -> Result<SaveData, StateError> {
    let root = match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => map,
        _ => return Err(StateError::NotAnObject),
    };

    match root.get("version") {
        None => {
            info!(target: "state", "Migrating unversioned save data to v{}", CURRENT_VERSION);
            Ok(migrate_legacy(&root))
        }
        Some(version) if version.as_u64() == Some(u64::from(CURRENT_VERSION)) => {
            Ok(serde_json::from_value(Value::Object(root))?)
        }
        Some(other) => Err(StateError::UnsupportedVersion {
            found: other.to_string(),
            supported: CURRENT_VERSION,
        }),
    }
}

//=== Legacy → v2 =========================================================

fn migrate_legacy(root: &Map<String, Value>) -> SaveData {
    let mut data = SaveData {
        version: CURRENT_VERSION,
        current_slot: String::new(),
        slots: Default::default(),
    };

    for (key, value) in root {
        let Some(slot) = value.as_object() else {
            warn!(target: "state", "Skipping legacy slot {:?}: not an object", key);
            continue;
        };
        data.slots.insert(key.clone(), migrate_legacy_slot(key, slot));
    }

    // Legacy blobs had no persisted selection; resume the first built-in
    // slot that was stored, else whichever slot sorts first.
    let resume = DEFAULT_SLOTS
        .iter()
        .map(|(key, _)| key.to_string())
        .find(|key| data.slots.contains_key(key))
        .or_else(|| data.slots.keys().next().cloned());
    if let Some(slot) = resume {
        data.current_slot = slot;
    }
    data
}

fn migrate_legacy_slot(key: &str, slot: &Map<String, Value>) -> Profile {
    let default_name = DEFAULT_SLOTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| key.to_string());

    let mut profile = Profile::named(&default_name);

    if let Some(name) = slot.get("playerName").and_then(Value::as_str) {
        profile.display_name = name.to_string();
    }
    if let Some(character) = slot.get("character").and_then(Value::as_object) {
        profile.appearance = migrate_appearance(character);
    }
    if let Some(scores) = slot.get("highScores").and_then(Value::as_object) {
        for (game, score) in scores {
            let Some(score) = score.as_f64().filter(|s| s.is_finite() && *s >= 0.0) else {
                continue;
            };
            let game = if game == "tetris" { "blocks" } else { game.as_str() };
            profile
                .high_scores
                .insert(game.to_string(), score.min(u32::MAX as f64) as u32);
        }
    }
    profile
}

fn migrate_appearance(character: &Map<String, Value>) -> Appearance {
    let mut appearance = Appearance::default();

    let int = |name: &str| {
        character
            .get(name)
            .and_then(Value::as_u64)
            .map(|n| n.min(u32::MAX as u64) as u32)
    };
    let text = |name: &str| character.get(name).and_then(Value::as_str).map(str::to_string);

    if let Some(n) = int("hairStyle") {
        appearance.hair_style = n;
    }
    if let Some(n) = int("outfit") {
        appearance.outfit = n;
    }
    if let Some(c) = text("hairColor") {
        appearance.hair_color = c;
    }
    if let Some(c) = text("outfitColor") {
        appearance.outfit_color = c;
    }
    if let Some(c) = text("skinTone") {
        appearance.skin_tone = c;
    }
    appearance.pet = match character.get("pet") {
        Some(Value::String(name)) => Pet::from_name(name).unwrap_or_default(),
        _ => Pet::None,
    };
    appearance
}

//=========================================================================
// Unit Tests
//=========================================================================
