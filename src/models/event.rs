/// Canonical actor identifier. Sender ids arrive as integers from the
/// transport; the owner id is parsed into the same type at the configuration
/// boundary so tier checks are always integer comparisons.
pub type ActorId = i64;

/// Chat identifier. For direct chats this equals the actor id.
pub type ChatId = i64;

/// An inbound interaction, stripped of transport framing.
///
/// The webhook layer translates raw updates into this shape; the dispatcher
/// never sees the wire format.
#[derive(Debug, Clone)]
pub struct Event {
    pub actor: ActorId,
    pub chat: ChatId,
    pub kind: EventKind,
}

#[derive(Debug, Clone)]
pub enum EventKind {
    /// A slash command, without the leading slash (e.g. `start`).
    Command(String),
    /// A callback-button activation carrying an opaque token.
    Callback(String),
    /// A free-text message.
    Text(String),
    /// A document upload with its caption, if any.
    Document(DocumentUpload),
}

/// An uploaded document as reported by the transport. The bytes are not
/// included; they are fetched through the gateway once the upload passes
/// validation.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_id: String,
    pub file_name: String,
    pub file_size: i64,
    pub caption: Option<String>,
}

impl Event {
    pub fn new(actor: ActorId, chat: ChatId, kind: EventKind) -> Self {
        Self { actor, chat, kind }
    }
}
