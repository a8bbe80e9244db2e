//! Event dispatch.
//!
//! One [`Dispatcher`] instance routes every inbound [`Event`], in priority
//! order: structured tokens first, then document uploads, then free text
//! interpreted against the owner's pending intent. Authorization is checked
//! inside each handler before anything is mutated, so a denial can never
//! leave half-applied state behind.

pub mod broadcast;
pub mod gateway;
pub mod session;
pub mod telegram;

use crate::access::{Access, AdminChange};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::BotError;
use crate::models::{Action, ActorId, ChatId, DocumentUpload, Event, EventKind, Section};
use crate::store::blobs::BlobStore;
use crate::store::Store;
use self::gateway::{Button, Gateway};
use self::session::{Intents, PendingIntent};

/// Uploads above this size are refused before any bytes are fetched.
pub const MAX_UPLOAD_BYTES: i64 = 50 * 1024 * 1024;

pub struct Dispatcher<G> {
    store: Store,
    blobs: BlobStore,
    access: Access,
    catalog: Catalog,
    intents: Intents,
    gateway: G,
}

impl<G: Gateway> Dispatcher<G> {
    pub fn new(config: &Config, store: Store, blobs: BlobStore, gateway: G) -> Self {
        let access = Access::new(config.owner, store.clone());
        let catalog = Catalog::new(store.clone(), blobs.clone());
        Self {
            store,
            blobs,
            access,
            catalog,
            intents: Intents::default(),
            gateway,
        }
    }

    /// Route one event and answer the actor. Conversational outcomes
    /// (denied, not found, validation) become their message; storage faults
    /// get a generic reply and an operator log line.
    pub async fn dispatch(&self, event: Event) {
        let chat = event.chat;
        match self.route(&event).await {
            Ok(()) => {}
            Err(
                BotError::Denied(msg) | BotError::NotFound(msg) | BotError::Validation(msg),
            ) => {
                self.reply(chat, &msg).await;
            }
            Err(BotError::Gateway(e)) => {
                tracing::warn!("outbound send failed: {e}");
            }
            Err(e) => {
                tracing::error!("request failed: {e}");
                self.reply(chat, "Something went wrong. Please try again.")
                    .await;
            }
        }
    }

    async fn reply(&self, chat: ChatId, text: &str) {
        if let Err(e) = self.gateway.send_text(chat, text).await {
            tracing::warn!("failed to reply: {e}");
        }
    }

    async fn route(&self, event: &Event) -> Result<(), BotError> {
        match &event.kind {
            EventKind::Command(cmd) if cmd == "start" => {
                self.handle_start(event.actor, event.chat).await
            }
            EventKind::Command(cmd) => {
                tracing::debug!("ignoring unknown command /{cmd}");
                Ok(())
            }
            EventKind::Callback(token) => match Action::parse(token) {
                Some(action) => self.handle_action(event.actor, event.chat, action).await,
                None => {
                    tracing::debug!("ignoring unknown callback token '{token}'");
                    Ok(())
                }
            },
            EventKind::Document(doc) => self.handle_upload(event.actor, event.chat, doc).await,
            EventKind::Text(text) => self.handle_text(event.actor, event.chat, text).await,
        }
    }

    fn require_owner(&self, actor: ActorId, denial: &str) -> Result<(), BotError> {
        if self.access.is_owner(actor) {
            Ok(())
        } else {
            Err(BotError::Denied(denial.to_string()))
        }
    }

    // ============================================================
    // Entry menu
    // ============================================================

    async fn handle_start(&self, actor: ActorId, chat: ChatId) -> Result<(), BotError> {
        self.store.register_user(actor)?;
        self.store
            .record_activity(&format!("User {actor} started bot"))?;

        let mut keyboard = vec![vec![
            Button::action(Section::Tools.title(), &Action::View(Section::Tools)),
            Button::action(Section::Combos.title(), &Action::View(Section::Combos)),
        ]];
        if self.access.is_authorized(actor)? {
            keyboard.push(vec![Button::action("Upload File", &Action::UploadPrompt)]);
        }
        if self.access.is_owner(actor) {
            keyboard.push(vec![
                Button::action("Add/Remove Admin", &Action::AdminPrompt),
                Button::action("Delete All Files", &Action::DeleteAll),
            ]);
            keyboard.push(vec![
                Button::action("Broadcast", &Action::BroadcastPrompt),
                Button::action("Activity Logs", &Action::ActivityLogs),
            ]);
        }

        self.gateway
            .send_menu(
                chat,
                "Welcome to the file depot.\nPlease choose a section.",
                &keyboard,
            )
            .await?;
        Ok(())
    }

    // ============================================================
    // Callback actions
    // ============================================================

    async fn handle_action(
        &self,
        actor: ActorId,
        chat: ChatId,
        action: Action,
    ) -> Result<(), BotError> {
        match action {
            Action::View(section) => self.show_section(actor, chat, section).await,
            Action::Get(section, filename) => self.send_file(actor, chat, section, filename).await,
            Action::Delete(section, filename) => {
                self.delete_file(actor, chat, section, filename).await
            }
            Action::UploadPrompt => {
                if !self.access.is_authorized(actor)? {
                    return Err(BotError::Denied(
                        "You are not allowed to upload files.".to_string(),
                    ));
                }
                self.gateway
                    .send_text(
                        chat,
                        "Send a .py or .txt file with a short caption (the button name).",
                    )
                    .await?;
                Ok(())
            }
            Action::AdminPrompt => {
                self.require_owner(actor, "Only the owner can manage admins.")?;
                self.intents.set(actor, PendingIntent::AwaitingAdminId);
                self.gateway
                    .send_text(chat, "Send the user ID to add or remove.")
                    .await?;
                Ok(())
            }
            Action::DeleteAll => {
                self.require_owner(actor, "Only the owner can delete all files.")?;
                self.catalog.clear_all()?;
                self.gateway.send_text(chat, "All files deleted.").await?;
                Ok(())
            }
            Action::BroadcastPrompt => {
                self.require_owner(actor, "Only the owner can broadcast.")?;
                self.intents.set(actor, PendingIntent::AwaitingBroadcast);
                self.gateway
                    .send_text(chat, "Send the broadcast message text.")
                    .await?;
                Ok(())
            }
            Action::ActivityLogs => {
                self.require_owner(actor, "Only the owner can view activity logs.")?;
                self.show_logs(chat).await
            }
        }
    }

    async fn show_section(
        &self,
        actor: ActorId,
        chat: ChatId,
        section: Section,
    ) -> Result<(), BotError> {
        let entries = self.catalog.list(section)?;
        if entries.is_empty() {
            return Err(BotError::NotFound(format!(
                "No files found in the {} section.",
                section.as_str()
            )));
        }

        let can_manage = self.access.is_authorized(actor)?;
        for entry in entries {
            let mut keyboard = vec![vec![Button::action(
                format!("Download: {}", entry.label),
                &Action::Get(section, entry.filename.clone()),
            )]];
            if can_manage {
                keyboard.push(vec![Button::action(
                    format!("Delete: {}", entry.label),
                    &Action::Delete(section, entry.filename.clone()),
                )]);
            }
            self.gateway
                .send_menu(chat, &format!("File: {}", entry.filename), &keyboard)
                .await?;
        }
        Ok(())
    }

    async fn send_file(
        &self,
        actor: ActorId,
        chat: ChatId,
        section: Section,
        filename: String,
    ) -> Result<(), BotError> {
        let listed = self
            .catalog
            .list(section)?
            .into_iter()
            .any(|e| e.filename == filename);
        if !listed {
            return Err(BotError::NotFound(format!(
                "File '{filename}' is no longer listed."
            )));
        }

        // A listed entry whose blob is gone surfaces here as not-found.
        let bytes = self.blobs.load(&filename)?;
        self.gateway.send_document(chat, &filename, bytes).await?;
        self.store
            .record_activity(&format!("{actor} downloaded {filename}"))?;
        Ok(())
    }

    async fn delete_file(
        &self,
        actor: ActorId,
        chat: ChatId,
        section: Section,
        filename: String,
    ) -> Result<(), BotError> {
        if !self.access.is_authorized(actor)? {
            return Err(BotError::Denied("Only admins can delete files.".to_string()));
        }
        self.catalog.remove(actor, section, &filename)?;
        self.gateway
            .send_text(chat, &format!("The file '{filename}' was deleted."))
            .await?;
        Ok(())
    }

    async fn show_logs(&self, chat: ChatId) -> Result<(), BotError> {
        let users = self.store.users()?;
        let admins = self.store.admins()?;
        let recent = self.store.recent_activity(5)?;

        let mut text = format!("Users: {}\nAdmins: {}\n\nLast activities:\n", users.len(), admins.len());
        if recent.is_empty() {
            text.push_str("No activity yet.");
        } else {
            text.push_str(&recent.join("\n"));
        }
        self.gateway.send_text(chat, &text).await?;
        Ok(())
    }

    // ============================================================
    // Document uploads
    // ============================================================

    async fn handle_upload(
        &self,
        actor: ActorId,
        chat: ChatId,
        doc: &DocumentUpload,
    ) -> Result<(), BotError> {
        if !self.access.is_authorized(actor)? {
            return Err(BotError::Denied(
                "You are not allowed to upload files.".to_string(),
            ));
        }
        if doc.file_size > MAX_UPLOAD_BYTES {
            return Err(BotError::Validation("File too big (max 50MB).".to_string()));
        }
        let label = doc.caption.as_deref().map(str::trim).unwrap_or_default();
        if label.is_empty() {
            return Err(BotError::Validation(
                "Please add a caption for the button name.".to_string(),
            ));
        }
        let section = Section::from_filename(&doc.file_name).ok_or_else(|| {
            BotError::Validation("Only .py and .txt files are allowed.".to_string())
        })?;

        // Blob before metadata: a crash between the two leaves an orphaned
        // blob, never a catalog entry pointing at nothing.
        let bytes = self.gateway.fetch_document(&doc.file_id).await?;
        self.blobs.save(&doc.file_name, &bytes)?;
        self.catalog.upsert(actor, section, &doc.file_name, label)?;

        self.gateway
            .send_text(
                chat,
                &format!("File uploaded and button added in {}.", section.as_str()),
            )
            .await?;
        Ok(())
    }

    // ============================================================
    // Free text against pending intent
    // ============================================================

    async fn handle_text(&self, actor: ActorId, chat: ChatId, text: &str) -> Result<(), BotError> {
        let Some(intent) = self.intents.get(actor) else {
            tracing::debug!("ignoring free text with no pending intent");
            return Ok(());
        };

        match intent {
            PendingIntent::AwaitingAdminId => {
                // Parse failure keeps the intent so the owner can retry.
                let id: ActorId = text.trim().parse().map_err(|_| {
                    BotError::Validation(
                        "That does not look like a user ID. Send a numeric ID.".to_string(),
                    )
                })?;
                self.intents.clear(actor);

                let reply = match self.access.toggle_admin(id)? {
                    AdminChange::AlreadyOwner => "You are already the owner.".to_string(),
                    AdminChange::Added => format!("Admin {id} added."),
                    AdminChange::Removed => format!("Admin {id} removed."),
                    AdminChange::Unchanged => format!("Admin {id} unchanged."),
                };
                self.gateway.send_text(chat, &reply).await?;
                Ok(())
            }
            PendingIntent::AwaitingBroadcast => {
                self.intents.clear(actor);

                let users = self.store.users()?;
                let outcome = broadcast::fan_out(&self.gateway, &users, text).await;
                self.store.record_activity(&format!(
                    "Broadcast sent by owner to {} users",
                    outcome.delivered
                ))?;
                self.gateway
                    .send_text(
                        chat,
                        &format!(
                            "Broadcast sent to {} of {} users.",
                            outcome.delivered, outcome.total
                        ),
                    )
                    .await?;
                Ok(())
            }
        }
    }
}
