//! Minimal Telegram update wire model.
//!
//! Only the fields the dispatcher needs are declared; everything else in
//! the payload is ignored by serde.

use serde::Deserialize;

use crate::models::{DocumentUpload, Event, EventKind};

#[derive(Debug, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    pub message: Option<Incoming>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Incoming {
    pub from: Option<Sender>,
    pub chat: ChatRef,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub document: Option<DocumentMeta>,
}

#[derive(Debug, Deserialize)]
pub struct Sender {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ChatRef {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct DocumentMeta {
    pub file_id: String,
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: i64,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub from: Sender,
    pub message: Option<Incoming>,
    pub data: Option<String>,
}

impl Update {
    /// Translate into a dispatcher event. Updates this bot has no use for
    /// (edits, stickers, joins) translate to `None` and are acknowledged.
    pub fn into_event(self) -> Option<Event> {
        if let Some(cb) = self.callback_query {
            let chat = cb.message.as_ref().map(|m| m.chat.id).unwrap_or(cb.from.id);
            let token = cb.data?;
            return Some(Event::new(cb.from.id, chat, EventKind::Callback(token)));
        }

        let msg = self.message?;
        let actor = msg.from.as_ref()?.id;
        let chat = msg.chat.id;

        if let Some(doc) = msg.document {
            // A nameless document still produces an event so the actor gets
            // the extension rejection instead of silence.
            return Some(Event::new(
                actor,
                chat,
                EventKind::Document(DocumentUpload {
                    file_id: doc.file_id,
                    file_name: doc.file_name.unwrap_or_default(),
                    file_size: doc.file_size,
                    caption: msg.caption,
                }),
            ));
        }

        let text = msg.text?;
        if let Some(rest) = text.strip_prefix('/') {
            let command = rest
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string();
            return Some(Event::new(actor, chat, EventKind::Command(command)));
        }

        Some(Event::new(actor, chat, EventKind::Text(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Option<Event> {
        serde_json::from_str::<Update>(raw).unwrap().into_event()
    }

    #[test]
    fn start_command() {
        let event = parse(
            r#"{"update_id": 1, "message": {"message_id": 10, "from": {"id": 42}, "chat": {"id": 42}, "text": "/start"}}"#,
        )
        .unwrap();
        assert_eq!(event.actor, 42);
        assert!(matches!(event.kind, EventKind::Command(ref c) if c == "start"));
    }

    #[test]
    fn command_with_bot_suffix() {
        let event = parse(
            r#"{"message": {"from": {"id": 1}, "chat": {"id": 1}, "text": "/start@depot_bot now"}}"#,
        )
        .unwrap();
        assert!(matches!(event.kind, EventKind::Command(ref c) if c == "start"));
    }

    #[test]
    fn callback_uses_originating_chat() {
        let event = parse(
            r#"{"callback_query": {"from": {"id": 5}, "message": {"chat": {"id": -100}}, "data": "view:tools"}}"#,
        )
        .unwrap();
        assert_eq!(event.actor, 5);
        assert_eq!(event.chat, -100);
        assert!(matches!(event.kind, EventKind::Callback(ref t) if t == "view:tools"));
    }

    #[test]
    fn document_with_caption() {
        let event = parse(
            r#"{"message": {"from": {"id": 2}, "chat": {"id": 2}, "caption": "Runner", "document": {"file_id": "abc", "file_name": "script.py", "file_size": 120}}}"#,
        )
        .unwrap();
        match event.kind {
            EventKind::Document(doc) => {
                assert_eq!(doc.file_name, "script.py");
                assert_eq!(doc.caption.as_deref(), Some("Runner"));
            }
            other => panic!("expected document event, got {other:?}"),
        }
    }

    #[test]
    fn irrelevant_updates_translate_to_none() {
        assert!(parse(r#"{"update_id": 9}"#).is_none());
        assert!(parse(r#"{"message": {"chat": {"id": 3}}}"#).is_none());
    }
}
