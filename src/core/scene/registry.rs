//=========================================================================
// Scene Registry
//=========================================================================
//
// Maps scene keys to factories. Every activation builds a new instance,
// so scenes never carry state from one visit to the next.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::warn;

//=== Internal Dependencies ===============================================

use super::{Scene, SceneError, SceneKey};

//=== SceneRegistry =======================================================

/// Builds a fresh scene instance.
pub type SceneFactory<K> = Box<dyn Fn() -> Box<dyn Scene<K>>>;

pub struct SceneRegistry<K: SceneKey> {
    factories: HashMap<K, SceneFactory<K>>,
}

impl<K: SceneKey> SceneRegistry<K> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers `factory` under `key`, replacing any earlier one.
    pub fn register<F>(&mut self, key: K, factory: F)
    where
        F: Fn() -> Box<dyn Scene<K>> + 'static,
    {
        if self.factories.insert(key, Box::new(factory)).is_some() {
            warn!(target: "scene", "Scene {:?} was already registered and has been replaced", key);
        }
    }

    pub fn contains(&self, key: K) -> bool {
        self.factories.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Builds a new instance of the scene registered under `key`.
    pub fn create(&self, key: K) -> Result<Box<dyn Scene<K>>, SceneError> {
        self.factories
            .get(&key)
            .map(|factory| factory())
            .ok_or_else(|| SceneError::Unregistered(format!("{:?}", key)))
    }
}

impl<K: SceneKey> Default for SceneRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
