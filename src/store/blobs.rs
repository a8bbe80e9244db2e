//! Blob store: uploaded file contents on disk, keyed by filename.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("no stored file named '{0}'")]
    NotFound(String),

    #[error("'{0}' is not a valid stored filename")]
    InvalidName(String),

    #[error("blob i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// Flat directory of uploaded files. Catalog entries reference blobs by
/// filename; a catalog entry whose blob is gone is tolerated and reported
/// as not-found at download time.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn open(root: PathBuf) -> io::Result<Self> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Blob keys become filesystem names, so anything that could escape the
    /// root directory is rejected outright.
    fn path(&self, filename: &str) -> Result<PathBuf, BlobError> {
        if filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\'])
        {
            return Err(BlobError::InvalidName(filename.to_string()));
        }
        Ok(self.root.join(filename))
    }

    pub fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), BlobError> {
        let path = self.path(filename)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load(&self, filename: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.path(filename)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a blob. A missing blob is not an error; any other I/O failure
    /// still surfaces so operators see it.
    pub fn remove(&self, filename: &str) -> Result<(), BlobError> {
        let path = self.path(filename)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_escapes() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::open(dir.path().to_path_buf()).unwrap();

        assert!(matches!(
            blobs.save("../evil.py", b"x"),
            Err(BlobError::InvalidName(_))
        ));
        assert!(matches!(
            blobs.load("a/b.txt"),
            Err(BlobError::InvalidName(_))
        ));
        assert!(matches!(blobs.remove(""), Err(BlobError::InvalidName(_))));
    }

    #[test]
    fn removing_a_missing_blob_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::open(dir.path().to_path_buf()).unwrap();

        blobs.remove("never-stored.txt").unwrap();
    }

    #[test]
    fn save_load_remove() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::open(dir.path().to_path_buf()).unwrap();

        blobs.save("runner.py", b"print('hi')").unwrap();
        assert_eq!(blobs.load("runner.py").unwrap(), b"print('hi')");

        blobs.remove("runner.py").unwrap();
        assert!(matches!(
            blobs.load("runner.py"),
            Err(BlobError::NotFound(_))
        ));
    }
}
