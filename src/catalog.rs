//! Catalog manager: the per-section file listings and their blobs.
//!
//! Sequencing rule for uploads: the blob is written before the catalog
//! entry, so a crash mid-upload leaves an orphaned blob rather than a
//! catalog entry pointing at nothing. Deletions go the other way and treat
//! a missing blob as already done.

use crate::error::BotError;
use crate::models::{ActorId, FileEntry, Section};
use crate::store::blobs::BlobStore;
use crate::store::Store;

#[derive(Clone)]
pub struct Catalog {
    store: Store,
    blobs: BlobStore,
}

impl Catalog {
    pub fn new(store: Store, blobs: BlobStore) -> Self {
        Self { store, blobs }
    }

    /// Entries in insertion order. An empty section is an empty list.
    pub fn list(&self, section: Section) -> Result<Vec<FileEntry>, BotError> {
        Ok(self.store.catalog(section)?)
    }

    /// Register an uploaded file. The caller must have stored the blob
    /// already. Replaces any entry with the same filename, moving it to the
    /// end of the section.
    pub fn upsert(
        &self,
        actor: ActorId,
        section: Section,
        filename: &str,
        label: &str,
    ) -> Result<(), BotError> {
        self.store
            .upsert_entry(section, FileEntry::new(filename, label))?;
        self.store
            .record_activity(&format!("{actor} uploaded {filename}"))?;
        Ok(())
    }

    /// Delete one file: blob first (best effort), then the entry. Removing
    /// a filename that is not listed succeeds and changes nothing.
    pub fn remove(&self, actor: ActorId, section: Section, filename: &str) -> Result<(), BotError> {
        self.blobs.remove(filename)?;
        self.store.remove_entry(section, filename)?;
        self.store
            .record_activity(&format!("{actor} deleted {filename}"))?;
        Ok(())
    }

    /// Wipe every section: blobs best-effort, then the catalogs.
    pub fn clear_all(&self) -> Result<(), BotError> {
        for section in Section::ALL {
            for entry in self.store.catalog(section)? {
                self.blobs.remove(&entry.filename)?;
            }
            self.store.clear_section(section)?;
        }
        self.store.record_activity("All files deleted by owner")?;
        Ok(())
    }
}
