//! Dispatcher-level error taxonomy.
//!
//! `Denied`, `NotFound`, and `Validation` are conversational outcomes: the
//! message inside is sent back to the actor verbatim and nothing was
//! mutated. `Storage` and `Gateway` are real faults, fatal to the current
//! request only.

use thiserror::Error;

use crate::bot::gateway::GatewayError;
use crate::store::blobs::BlobError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum BotError {
    /// The actor lacks the tier required for the action.
    #[error("{0}")]
    Denied(String),

    /// The requested section or file does not exist. Informational.
    #[error("{0}")]
    NotFound(String),

    /// The input was rejected (bad extension, missing caption, oversize
    /// upload, unparsable identifier). The message says how to fix it.
    #[error("{0}")]
    Validation(String),

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("blob storage failure: {0}")]
    Blob(BlobError),

    #[error("gateway failure: {0}")]
    Gateway(#[from] GatewayError),
}

impl From<BlobError> for BotError {
    fn from(e: BlobError) -> Self {
        match e {
            // A catalog entry pointing at a vanished blob self-heals as a
            // not-found reply, never a fault.
            BlobError::NotFound(name) => BotError::NotFound(format!("File '{name}' not found.")),
            BlobError::InvalidName(name) => {
                BotError::Validation(format!("'{name}' is not an acceptable filename."))
            }
            other => BotError::Blob(other),
        }
    }
}
