#![allow(dead_code)]

//! Shared fixtures: an in-memory bot wired to a recording gateway.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use depot::bot::gateway::{Button, Gateway, GatewayError};
use depot::bot::Dispatcher;
use depot::config::Config;
use depot::models::{ActorId, ChatId, DocumentUpload, Event, EventKind};
use depot::store::blobs::BlobStore;
use depot::store::Store;

pub const OWNER: ActorId = 1;

/// What the gateway was asked to send, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat: ChatId,
        text: String,
    },
    Menu {
        chat: ChatId,
        text: String,
        keyboard: Vec<Vec<Button>>,
    },
    Document {
        chat: ChatId,
        filename: String,
        bytes: Vec<u8>,
    },
}

/// Gateway double: records outbound traffic, serves staged uploads, and can
/// play dead for chosen chats.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    sent: Arc<Mutex<Vec<Sent>>>,
    unreachable: Arc<Mutex<HashSet<ChatId>>>,
    staged: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl RecordingGateway {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.sent.lock().unwrap().clear();
    }

    /// All plain-text sends to one chat, in order.
    pub fn texts_to(&self, chat: ChatId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { chat: c, text } if c == chat => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent().into_iter().rev().find_map(|s| match s {
            Sent::Text { text, .. } => Some(text),
            _ => None,
        })
    }

    /// Make every send to this chat fail.
    pub fn mark_unreachable(&self, chat: ChatId) {
        self.unreachable.lock().unwrap().insert(chat);
    }

    /// Stage bytes the dispatcher can fetch by file id.
    pub fn stage_document(&self, file_id: &str, bytes: &[u8]) {
        self.staged
            .lock()
            .unwrap()
            .insert(file_id.to_string(), bytes.to_vec());
    }
}

impl Gateway for RecordingGateway {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), GatewayError> {
        if self.unreachable.lock().unwrap().contains(&chat) {
            return Err(GatewayError::Api("chat unreachable".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Text {
            chat,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_menu(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: &[Vec<Button>],
    ) -> Result<(), GatewayError> {
        self.sent.lock().unwrap().push(Sent::Menu {
            chat,
            text: text.to_string(),
            keyboard: keyboard.to_vec(),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        chat: ChatId,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<(), GatewayError> {
        self.sent.lock().unwrap().push(Sent::Document {
            chat,
            filename: filename.to_string(),
            bytes,
        });
        Ok(())
    }

    async fn fetch_document(&self, file_id: &str) -> Result<Vec<u8>, GatewayError> {
        self.staged
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| GatewayError::Api(format!("no staged document '{file_id}'")))
    }
}

pub struct TestBot {
    pub bot: Arc<Dispatcher<RecordingGateway>>,
    pub gateway: RecordingGateway,
    pub store: Store,
    pub blobs: BlobStore,
    _tmp: tempfile::TempDir,
}

pub fn test_bot() -> TestBot {
    let tmp = tempfile::tempdir().expect("Failed to create tempdir");
    let store = Store::open_memory().expect("Failed to open in-memory store");
    store.migrate().expect("Failed to migrate");
    let blobs = BlobStore::open(tmp.path().join("blobs")).expect("Failed to open blob store");
    let gateway = RecordingGateway::default();
    let bot = Arc::new(Dispatcher::new(
        &Config::for_tests(OWNER),
        store.clone(),
        blobs.clone(),
        gateway.clone(),
    ));
    TestBot {
        bot,
        gateway,
        store,
        blobs,
        _tmp: tmp,
    }
}

pub fn command(actor: ActorId, name: &str) -> Event {
    Event::new(actor, actor, EventKind::Command(name.to_string()))
}

pub fn callback(actor: ActorId, token: &str) -> Event {
    Event::new(actor, actor, EventKind::Callback(token.to_string()))
}

pub fn text(actor: ActorId, body: &str) -> Event {
    Event::new(actor, actor, EventKind::Text(body.to_string()))
}

pub fn document(
    actor: ActorId,
    file_id: &str,
    file_name: &str,
    file_size: i64,
    caption: Option<&str>,
) -> Event {
    Event::new(
        actor,
        actor,
        EventKind::Document(DocumentUpload {
            file_id: file_id.to_string(),
            file_name: file_name.to_string(),
            file_size,
            caption: caption.map(str::to_string),
        }),
    )
}
