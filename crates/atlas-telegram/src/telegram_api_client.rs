use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use atlas_menu::{MenuPayload, StatusPayload};
use atlas_runtime::{ChatId, ChatTransport, MessageId};

/// Default Bot API endpoint.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Hard Bot API limit on message text length.
const TELEGRAM_SAFE_MAX_CHARS: usize = 4096;

#[derive(Debug, Clone, Deserialize)]
struct TelegramApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TelegramMessageRef {
    pub(crate) message_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TelegramUpdate {
    pub(crate) update_id: i64,
    #[serde(default)]
    pub(crate) message: Option<TelegramInboundMessage>,
    #[serde(default)]
    pub(crate) callback_query: Option<TelegramCallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TelegramInboundMessage {
    pub(crate) message_id: i64,
    pub(crate) chat: TelegramChat,
    #[serde(default)]
    pub(crate) from: Option<TelegramUser>,
    #[serde(default)]
    pub(crate) text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TelegramChat {
    pub(crate) id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TelegramUser {
    pub(crate) id: i64,
    #[serde(default)]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    pub(crate) username: Option<String>,
    #[serde(default)]
    pub(crate) language_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TelegramCallbackQuery {
    #[serde(default)]
    pub(crate) message: Option<TelegramInboundMessage>,
    #[serde(default)]
    pub(crate) data: Option<String>,
}

#[derive(Clone)]
/// Minimal Bot API client for the methods the runtime needs.
pub struct TelegramApiClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl TelegramApiClient {
    pub fn new(api_base: String, bot_token: String, request_timeout_ms: u64) -> Result<Self> {
        if bot_token.trim().is_empty() {
            bail!("telegram bot token cannot be empty");
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create telegram api client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.trim().to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    async fn call_method<T: DeserializeOwned>(&self, method: &str, payload: &Value) -> Result<T> {
        let response = self
            .http
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("telegram {method} request failed"))?;

        let envelope: TelegramApiEnvelope<T> = response
            .json()
            .await
            .with_context(|| format!("telegram {method} returned an unreadable body"))?;
        if !envelope.ok {
            bail!(
                "telegram {method} failed: {}",
                envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string())
            );
        }
        envelope
            .result
            .with_context(|| format!("telegram {method} returned no result"))
    }

    /// Long-polls for updates after `offset`, waiting up to `timeout_s`.
    pub(crate) async fn get_updates(
        &self,
        offset: i64,
        timeout_s: u64,
    ) -> Result<Vec<TelegramUpdate>> {
        self.call_method(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_s,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }
}

fn reply_markup_for(payload: &MenuPayload) -> Value {
    // One button per row, as the menus are rendered.
    json!({
        "inline_keyboard": payload
            .rows
            .iter()
            .map(|row| json!([{ "text": row.label, "callback_data": row.token }]))
            .collect::<Vec<_>>(),
    })
}

fn truncate_for_telegram(text: &str) -> &str {
    if text.chars().count() <= TELEGRAM_SAFE_MAX_CHARS {
        return text;
    }
    let cut = text
        .char_indices()
        .nth(TELEGRAM_SAFE_MAX_CHARS)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    &text[..cut]
}

#[async_trait]
impl ChatTransport for TelegramApiClient {
    async fn send_menu(&self, chat_id: ChatId, payload: &MenuPayload) -> Result<MessageId> {
        let message: TelegramMessageRef = self
            .call_method(
                "sendMessage",
                &json!({
                    "chat_id": chat_id,
                    "text": payload.prompt,
                    "reply_markup": reply_markup_for(payload),
                }),
            )
            .await?;
        Ok(message.message_id)
    }

    async fn edit_menu(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        payload: &MenuPayload,
    ) -> Result<()> {
        let _: Value = self
            .call_method(
                "editMessageText",
                &json!({
                    "chat_id": chat_id,
                    "message_id": message_id,
                    "text": payload.prompt,
                    "reply_markup": reply_markup_for(payload),
                }),
            )
            .await?;
        Ok(())
    }

    async fn send_status(&self, chat_id: ChatId, payload: &StatusPayload) -> Result<MessageId> {
        self.send_text(chat_id, &payload.text).await
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        let _: Value = self
            .call_method(
                "deleteMessage",
                &json!({
                    "chat_id": chat_id,
                    "message_id": message_id,
                }),
            )
            .await?;
        Ok(())
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId> {
        let message: TelegramMessageRef = self
            .call_method(
                "sendMessage",
                &json!({
                    "chat_id": chat_id,
                    "text": truncate_for_telegram(text),
                }),
            )
            .await?;
        Ok(message.message_id)
    }
}
