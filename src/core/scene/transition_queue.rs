//=========================================================================
// Transition Queue
//=========================================================================
//
// Scenes queue transitions here during their callbacks. The host
// resolves the queue once per tick, after draw.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{SceneKey, SceneTransition};

//=== Transition Queue ====================================================

/// Pending scene transitions for the current tick.
pub struct TransitionQueue<K: SceneKey> {
    queue: Vec<SceneTransition<K>>,
}

impl<K: SceneKey> TransitionQueue<K> {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub fn push(&mut self, transition: SceneTransition<K>) {
        self.queue.push(transition);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes all transitions from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<SceneTransition<K>> {
        std::mem::take(&mut self.queue)
    }

    /// Empties the queue and returns the target of the last switch.
    ///
    /// Earlier switches in the same tick are superseded.
    pub fn take_last_switch(&mut self) -> Option<K> {
        self.take().into_iter().rev().find_map(|transition| match transition {
            SceneTransition::Switch(key) => Some(key),
            SceneTransition::Empty => None,
        })
    }
}

impl<K: SceneKey> Default for TransitionQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Menu,
        Game,
    }

    impl SceneKey for Key {}

    #[test]
    fn last_switch_wins() {
        let mut queue = TransitionQueue::new();
        queue.push(SceneTransition::Switch(Key::Game));
        queue.push(SceneTransition::Switch(Key::Menu));
        queue.push(SceneTransition::Empty);

        assert_eq!(queue.take_last_switch(), Some(Key::Menu));
        assert!(queue.is_empty());
    }

    #[test]
    fn empty_only_yields_nothing() {
        let mut queue: TransitionQueue<Key> = TransitionQueue::new();
        queue.push(SceneTransition::Empty);

        assert_eq!(queue.take_last_switch(), None);
        assert_eq!(queue.len(), 0);
    }
}
