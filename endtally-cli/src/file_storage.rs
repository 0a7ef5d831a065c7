//! JSON-file storage: one `<key>.json` per saved game.
use endtally_game::{Game, GameStorage};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub struct JsonFileStorage {
    dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum FileStorageError {
    #[error("Storage error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> FileStorageError + '_ {
    move |source| FileStorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl GameStorage for JsonFileStorage {
    type Error = FileStorageError;

    fn save_game(&self, key: &str, game: &Game) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let payload = serde_json::to_vec_pretty(game)?;
        fs::write(&tmp, payload).map_err(io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_error(&path))
    }

    fn load_game(&self, key: &str) -> Result<Option<Game>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(json) => Ok(Some(Game::from_json(&json)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&path)(err)),
        }
    }

    fn delete_save(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(io_error(&path)(err)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use endtally_game::Side;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "endtally-storage-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn save_load_delete_roundtrip() {
        let dir = temp_dir("roundtrip");
        let storage = JsonFileStorage::new(&dir);
        assert_eq!(storage.load_game("currentGame").unwrap(), None);

        let mut game = Game::new("file-game", 42);
        game.record_end(2, Side::B).unwrap();
        game.amend_end(0, 3).unwrap();
        storage.save_game("currentGame", &game).unwrap();
        assert!(storage.path_for("currentGame").exists());
        assert!(!storage.path_for("currentGame").with_extension("json.tmp").exists());
        assert_eq!(storage.load_game("currentGame").unwrap(), Some(game));

        storage.delete_save("currentGame").unwrap();
        storage.delete_save("currentGame").unwrap();
        assert_eq!(storage.load_game("currentGame").unwrap(), None);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = temp_dir("corrupt");
        let storage = JsonFileStorage::new(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(storage.path_for("bad"), "not json").unwrap();
        assert!(matches!(
            storage.load_game("bad"),
            Err(FileStorageError::Serialization(_))
        ));
        let _ = fs::remove_dir_all(dir);
    }
}
