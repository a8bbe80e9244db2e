//! Persistent store: named JSON documents in SQLite.
//!
//! Every piece of mutable state (admin set, user registry, catalogs,
//! activity log) lives in one small document. Operations read a fresh
//! snapshot, mutate a local copy, and write the whole document back; the
//! connection lock makes each read-modify-write single-writer, so two
//! concurrent uploads to the same section cannot lose each other's append.

pub mod blobs;
mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{ActorId, FileEntry, Section};

/// Document holding the admin set (owner excluded, always).
pub const DOC_ADMINS: &str = "admins";
/// Document holding every actor that ever sent the entry command.
pub const DOC_USERS: &str = "users";
/// Document holding the activity log, newest first.
pub const DOC_LOGS: &str = "logs";

/// The activity log keeps at most this many entries.
pub const LOG_CAP: usize = 100;

/// Platform data directory for the store and blobs.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "depot")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().to_path_buf())
}

/// A storage failure. Fatal to the request that hit it, nothing more.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("document '{name}' is corrupt: {source}")]
    Corrupt {
        name: String,
        source: serde_json::Error,
    },
}

pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Store path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock();
        schema::run_migrations(&conn)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("store lock poisoned")
    }

    // ============================================================
    // Document primitives
    // ============================================================

    /// Read a document, persisting and returning `default` on first access.
    pub fn read<T>(&self, name: &str, default: impl FnOnce() -> T) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let conn = self.lock();
        read_or_init(&conn, name, default)
    }

    /// Replace a document wholesale.
    pub fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let conn = self.lock();
        write_doc(&conn, name, value)
    }

    /// Read-modify-write a document under a single lock acquisition.
    /// Concurrent updates to the same document serialize here instead of
    /// overwriting each other.
    pub fn update<T, R>(
        &self,
        name: &str,
        default: impl FnOnce() -> T,
        apply: impl FnOnce(&mut T) -> R,
    ) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let conn = self.lock();
        let mut doc = read_or_init(&conn, name, default)?;
        let out = apply(&mut doc);
        write_doc(&conn, name, &doc)?;
        Ok(out)
    }

    // ============================================================
    // Admin set
    // ============================================================

    pub fn admins(&self) -> Result<Vec<ActorId>, StoreError> {
        self.read(DOC_ADMINS, Vec::new)
    }

    pub fn is_admin(&self, actor: ActorId) -> Result<bool, StoreError> {
        Ok(self.admins()?.contains(&actor))
    }

    /// Returns `true` if the actor was not an admin before.
    pub fn insert_admin(&self, actor: ActorId) -> Result<bool, StoreError> {
        self.update(DOC_ADMINS, Vec::new, |admins: &mut Vec<ActorId>| {
            if admins.contains(&actor) {
                false
            } else {
                admins.push(actor);
                true
            }
        })
    }

    /// Returns `true` if the actor was an admin before.
    pub fn remove_admin(&self, actor: ActorId) -> Result<bool, StoreError> {
        self.update(DOC_ADMINS, Vec::new, |admins: &mut Vec<ActorId>| {
            let before = admins.len();
            admins.retain(|a| *a != actor);
            admins.len() < before
        })
    }

    // ============================================================
    // User registry
    // ============================================================

    pub fn users(&self) -> Result<Vec<ActorId>, StoreError> {
        self.read(DOC_USERS, Vec::new)
    }

    /// Returns `true` if the actor was not registered before.
    pub fn register_user(&self, actor: ActorId) -> Result<bool, StoreError> {
        self.update(DOC_USERS, Vec::new, |users: &mut Vec<ActorId>| {
            if users.contains(&actor) {
                false
            } else {
                users.push(actor);
                true
            }
        })
    }

    // ============================================================
    // Activity log
    // ============================================================

    /// Prepend a timestamped entry, truncating to [`LOG_CAP`].
    pub fn record_activity(&self, text: &str) -> Result<(), StoreError> {
        let entry = format!("{} {}", Utc::now().format("%Y-%m-%d %H:%M"), text);
        self.update(DOC_LOGS, Vec::new, |logs: &mut Vec<String>| {
            logs.insert(0, entry);
            logs.truncate(LOG_CAP);
        })
    }

    /// Most recent entries, newest first.
    pub fn recent_activity(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let mut logs: Vec<String> = self.read(DOC_LOGS, Vec::new)?;
        logs.truncate(limit);
        Ok(logs)
    }

    // ============================================================
    // Catalog documents
    // ============================================================

    pub fn catalog(&self, section: Section) -> Result<Vec<FileEntry>, StoreError> {
        self.read(section.document(), Vec::new)
    }

    /// Replace any entry with the same filename and append the new one.
    pub fn upsert_entry(&self, section: Section, entry: FileEntry) -> Result<(), StoreError> {
        self.update(section.document(), Vec::new, |entries: &mut Vec<FileEntry>| {
            entries.retain(|e| e.filename != entry.filename);
            entries.push(entry);
        })
    }

    /// Returns `true` if an entry was removed.
    pub fn remove_entry(&self, section: Section, filename: &str) -> Result<bool, StoreError> {
        self.update(section.document(), Vec::new, |entries: &mut Vec<FileEntry>| {
            let before = entries.len();
            entries.retain(|e| e.filename != filename);
            entries.len() < before
        })
    }

    pub fn clear_section(&self, section: Section) -> Result<(), StoreError> {
        self.write(section.document(), &Vec::<FileEntry>::new())
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn read_or_init<T>(
    conn: &Connection,
    name: &str,
    default: impl FnOnce() -> T,
) -> Result<T, StoreError>
where
    T: Serialize + DeserializeOwned,
{
    let stored: Option<String> = conn
        .query_row("SELECT value FROM documents WHERE name = ?", [name], |row| {
            row.get(0)
        })
        .optional()?;

    match stored {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            name: name.to_string(),
            source,
        }),
        None => {
            let value = default();
            write_doc(conn, name, &value)?;
            Ok(value)
        }
    }
}

fn write_doc<T: Serialize>(conn: &Connection, name: &str, value: &T) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Corrupt {
        name: name.to_string(),
        source,
    })?;
    conn.execute(
        "INSERT OR REPLACE INTO documents (name, value, updated_at) VALUES (?, ?, ?)",
        (name, &raw, Utc::now().to_rfc3339()),
    )?;
    Ok(())
}
