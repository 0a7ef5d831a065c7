//! In-process storage backend.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::GameStorage;
use crate::game::Game;

/// Key-value storage held in memory. Clones share the same map, so a test can
/// keep a handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    saves: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw record, bypassing serialization. Used to seed legacy saves.
    pub fn insert_raw(&self, key: &str, json: impl Into<String>) {
        self.saves.borrow_mut().insert(key.to_string(), json.into());
    }

    /// Raw record under `key`, if any.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.saves.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.saves.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.saves.borrow().is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryStorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GameStorage for MemoryStorage {
    type Error = MemoryStorageError;

    fn save_game(&self, key: &str, game: &Game) -> Result<(), Self::Error> {
        let json = game.to_json()?;
        self.saves.borrow_mut().insert(key.to_string(), json);
        Ok(())
    }

    fn load_game(&self, key: &str) -> Result<Option<Game>, Self::Error> {
        self.saves
            .borrow()
            .get(key)
            .map(|json| Game::from_json(json))
            .transpose()
            .map_err(Into::into)
    }

    fn delete_save(&self, key: &str) -> Result<(), Self::Error> {
        self.saves.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;

    #[test]
    fn clones_share_saves() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        let mut game = Game::new("shared", 3);
        game.record_end(2, Side::A).unwrap();
        storage.save_game("k", &game).unwrap();
        assert_eq!(handle.load_game("k").unwrap(), Some(game));
        handle.delete_save("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn corrupt_record_is_an_error() {
        let storage = MemoryStorage::new();
        storage.insert_raw("k", "{not json");
        assert!(storage.load_game("k").is_err());
        assert_eq!(storage.load_game("missing").unwrap(), None);
    }
}
