//! Telegram Bot API gateway.
//!
//! Thin client over the HTTP API: every call posts JSON to
//! `{base}/bot{token}/{method}` and unwraps the `ok`/`result` envelope.
//! Document upload goes through multipart, document download through
//! `getFile` plus the file endpoint.

use serde::Deserialize;

use super::gateway::{Button, Gateway, GatewayError};
use crate::models::ChatId;

const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct TelegramGateway {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl TelegramGateway {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(API_BASE, token)
    }

    /// Point the client at a different API host (test doubles).
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call(
        &self,
        method: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await?;
        let envelope: ApiResponse<serde_json::Value> = response.json().await?;
        envelope.into_result()
    }

    /// Register the webhook the transport should deliver updates to.
    pub async fn set_webhook(&self, url: &str) -> Result<(), GatewayError> {
        self.call("setWebhook", &serde_json::json!({ "url": url }))
            .await
            .map(drop)
    }

    /// Drop any previously registered webhook.
    pub async fn delete_webhook(&self) -> Result<(), GatewayError> {
        self.call("deleteWebhook", &serde_json::json!({}))
            .await
            .map(drop)
    }
}

impl Gateway for TelegramGateway {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), GatewayError> {
        self.call(
            "sendMessage",
            &serde_json::json!({ "chat_id": chat, "text": text }),
        )
        .await
        .map(drop)
    }

    async fn send_menu(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: &[Vec<Button>],
    ) -> Result<(), GatewayError> {
        let rows: Vec<Vec<serde_json::Value>> = keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| serde_json::json!({ "text": b.label, "callback_data": b.token }))
                    .collect()
            })
            .collect();
        self.call(
            "sendMessage",
            &serde_json::json!({
                "chat_id": chat,
                "text": text,
                "reply_markup": { "inline_keyboard": rows },
            }),
        )
        .await
        .map(drop)
    }

    async fn send_document(
        &self,
        chat: ChatId,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<(), GatewayError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat.to_string())
            .part("document", part);
        let response = self
            .client
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;
        let envelope: ApiResponse<serde_json::Value> = response.json().await?;
        envelope.into_result().map(drop)
    }

    async fn fetch_document(&self, file_id: &str) -> Result<Vec<u8>, GatewayError> {
        let result = self
            .call("getFile", &serde_json::json!({ "file_id": file_id }))
            .await?;
        let info: FileInfo = serde_json::from_value(result)
            .map_err(|_| GatewayError::Api("malformed getFile response".to_string()))?;
        let file_path = info
            .file_path
            .ok_or_else(|| GatewayError::Api("getFile returned no file path".to_string()))?;

        let url = format!("{}/file/bot{}/{}", self.base_url, self.token, file_path);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Every API method answers with this envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, GatewayError> {
        if self.ok {
            self.result
                .ok_or_else(|| GatewayError::Api("response had no result".to_string()))
        } else {
            Err(GatewayError::Api(
                self.description
                    .unwrap_or_else(|| "unknown transport error".to_string()),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    file_path: Option<String>,
}
