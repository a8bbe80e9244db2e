use serde::{Deserialize, Serialize};

/// Metadata for one downloadable asset within a section.
///
/// `filename` is unique within its section and keys the blob store; `label`
/// is the caption shown on the download button. Re-uploading a filename
/// replaces the prior entry and moves it to the end of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    pub filename: String,
    pub label: String,
}

impl FileEntry {
    pub fn new(filename: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            label: label.into(),
        }
    }
}
