use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

use super::{SessionError, SessionStore, UserId};

/// Key under which the signed-in user identifier is stored
const USER_ID_KEY: &str = "user_id";

/// SQLite-backed session store.
/// Holds one key/value row so the signed-in user survives app restarts.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteSessionStore {
    /// Open the session database at its default location.
    ///
    /// The database file is created in the user's data directory:
    /// - Linux: ~/.local/share/plant-doctor/session.db
    /// - macOS: ~/Library/Application Support/plant-doctor/session.db
    /// - Windows: %APPDATA%\plant-doctor\session.db
    pub fn open_default() -> Result<Self, SessionError> {
        Self::open(&Self::default_path()?)
    }

    /// Open (or create) the session database at `db_path`
    pub fn open(db_path: &Path) -> Result<Self, SessionError> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;

        info!("📁 Session store at: {}", db_path.display());

        Ok(SqliteSessionStore {
            conn: Mutex::new(conn),
            db_path: db_path.to_path_buf(),
        })
    }

    /// Where the database is stored when no override is configured
    fn default_path() -> Result<PathBuf, SessionError> {
        let mut path = dirs::data_dir().or_else(dirs::home_dir).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine user data directory",
            )
        })?;

        path.push("plant-doctor");
        path.push("session.db");
        Ok(path)
    }
}

impl SessionStore for SqliteSessionStore {
    fn get(&self) -> Result<Option<UserId>, SessionError> {
        let conn = self.conn.lock().map_err(|_| SessionError::Poisoned)?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM session WHERE key = ?1",
                [USER_ID_KEY],
                |row| row.get(0),
            )
            .optional()?;

        Ok(raw.and_then(|raw| {
            let parsed = UserId::parse(&raw);
            if parsed.is_none() {
                warn!("⚠️  Stored user id {:?} is not a number, ignoring it", raw);
            }
            parsed
        }))
    }

    fn set(&self, user_id: UserId) -> Result<(), SessionError> {
        let conn = self.conn.lock().map_err(|_| SessionError::Poisoned)?;
        conn.execute(
            "INSERT INTO session (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![USER_ID_KEY, user_id.to_string()],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let conn = self.conn.lock().map_err(|_| SessionError::Poisoned)?;
        conn.execute("DELETE FROM session WHERE key = ?1", [USER_ID_KEY])?;
        Ok(())
    }
}

impl std::fmt::Debug for SqliteSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSessionStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteSessionStore::open(&dir.path().join("session.db")).unwrap();

        assert_eq!(store.get().unwrap(), None);
        store.set(UserId(42)).unwrap();
        assert_eq!(store.get().unwrap(), Some(UserId(42)));

        // Overwrite replaces the value in full
        store.set(UserId(43)).unwrap();
        assert_eq!(store.get().unwrap(), Some(UserId(43)));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);

        // Clearing an empty store is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.db");

        {
            let store = SqliteSessionStore::open(&path).unwrap();
            store.set(UserId(42)).unwrap();
        }

        let reopened = SqliteSessionStore::open(&path).unwrap();
        assert_eq!(reopened.db_path, path);
        assert_eq!(reopened.get().unwrap(), Some(UserId(42)));
    }

    #[test]
    fn test_garbage_value_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.db");
        let store = SqliteSessionStore::open(&path).unwrap();

        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO session (key, value) VALUES ('user_id', 'NaN')",
                [],
            )
            .unwrap();
        }

        assert_eq!(store.get().unwrap(), None);
    }
}
