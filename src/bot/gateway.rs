//! Outbound messaging seam.
//!
//! The dispatcher talks to the chat surface only through [`Gateway`], so
//! tests drive it with a recording implementation and the binary plugs in
//! the Telegram client.

use std::future::Future;

use thiserror::Error;

use crate::models::{Action, ChatId};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport rejected the call: {0}")]
    Api(String),
}

/// One inline button: a label and the callback token it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub token: String,
}

impl Button {
    pub fn action(label: impl Into<String>, action: &Action) -> Self {
        Self {
            label: label.into(),
            token: action.encode(),
        }
    }
}

pub trait Gateway: Send + Sync {
    /// Send plain text to a chat.
    fn send_text(
        &self,
        chat: ChatId,
        text: &str,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Send text with an inline button keyboard, one `Vec<Button>` per row.
    fn send_menu(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: &[Vec<Button>],
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Stream stored bytes to a chat as a named document.
    fn send_document(
        &self,
        chat: ChatId,
        filename: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Pull the bytes of a document an actor just uploaded.
    fn fetch_document(
        &self,
        file_id: &str,
    ) -> impl Future<Output = Result<Vec<u8>, GatewayError>> + Send;
}
