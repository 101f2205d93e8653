use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use atlas_runtime::{InteractionRouter, UserProfile};

use crate::telegram_api_client::{TelegramApiClient, TelegramUpdate};

#[derive(Debug, Clone)]
/// Long-poll loop tuning.
pub struct TelegramPollConfig {
    pub poll_timeout_s: u64,
    pub error_backoff: Duration,
}

impl Default for TelegramPollConfig {
    fn default() -> Self {
        Self {
            poll_timeout_s: 30,
            error_backoff: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum InboundInteraction {
    Start(UserProfile),
    MenuSelection {
        chat_id: i64,
        message_id: i64,
        token: String,
    },
    PlainMessage {
        chat_id: i64,
        text: String,
    },
}

fn classify_update(update: TelegramUpdate) -> Option<InboundInteraction> {
    if let Some(query) = update.callback_query {
        let message = query.message?;
        let token = query.data?;
        return Some(InboundInteraction::MenuSelection {
            chat_id: message.chat.id,
            message_id: message.message_id,
            token,
        });
    }

    let message = update.message?;
    let text = message.text?;
    if text.trim().starts_with("/start") {
        let from = message.from?;
        return Some(InboundInteraction::Start(UserProfile {
            user_id: from.id,
            chat_id: message.chat.id,
            first_name: from.first_name,
            last_name: from.last_name,
            username: from.username,
            language: from.language_code,
        }));
    }
    Some(InboundInteraction::PlainMessage {
        chat_id: message.chat.id,
        text,
    })
}

async fn dispatch_interaction(router: Arc<InteractionRouter>, interaction: InboundInteraction) {
    match interaction {
        InboundInteraction::Start(profile) => router.on_start_command(profile).await,
        InboundInteraction::MenuSelection {
            chat_id,
            message_id,
            token,
        } => {
            router
                .on_menu_selection(chat_id, message_id, &token)
                .await
        }
        InboundInteraction::PlainMessage { chat_id, text } => {
            router.on_plain_message(chat_id, &text).await;
        }
    }
}

/// Runs the `getUpdates` long-poll loop until cancelled by the caller.
/// Every interaction is dispatched on its own task, so a conversation
/// awaiting a generation call never delays polling or other conversations.
pub async fn run_telegram_poll_loop(
    client: TelegramApiClient,
    router: Arc<InteractionRouter>,
    config: TelegramPollConfig,
) -> Result<()> {
    info!("telegram long-poll loop started");
    let mut offset = 0_i64;
    loop {
        match client.get_updates(offset, config.poll_timeout_s).await {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    let Some(interaction) = classify_update(update) else {
                        debug!("ignoring unsupported update");
                        continue;
                    };
                    tokio::spawn(dispatch_interaction(Arc::clone(&router), interaction));
                }
            }
            Err(error) => {
                warn!("getUpdates failed, backing off: {error:#}");
                tokio::time::sleep(config.error_backoff).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{from_value, json};

    use super::{classify_update, InboundInteraction};
    use crate::telegram_api_client::TelegramUpdate;

    fn update(value: serde_json::Value) -> TelegramUpdate {
        from_value(value).expect("update")
    }

    #[test]
    fn start_commands_carry_the_sender_profile() {
        let classified = classify_update(update(json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "chat": { "id": 7 },
                "from": { "id": 5, "first_name": "Nadia", "language_code": "fr" },
                "text": "/start"
            }
        })));
        let Some(InboundInteraction::Start(profile)) = classified else {
            panic!("expected a start interaction");
        };
        assert_eq!(profile.user_id, 5);
        assert_eq!(profile.chat_id, 7);
    }

    #[test]
    fn callback_queries_become_menu_selections() {
        let classified = classify_update(update(json!({
            "update_id": 2,
            "callback_query": {
                "data": "Osteologie_Clavicule",
                "message": { "message_id": 11, "chat": { "id": 7 } }
            }
        })));
        assert_eq!(
            classified,
            Some(InboundInteraction::MenuSelection {
                chat_id: 7,
                message_id: 11,
                token: "Osteologie_Clavicule".to_string(),
            })
        );
    }

    #[test]
    fn other_texts_are_plain_messages() {
        let classified = classify_update(update(json!({
            "update_id": 3,
            "message": {
                "message_id": 12,
                "chat": { "id": 999 },
                "text": "Nouvelle mise à jour : v2"
            }
        })));
        assert_eq!(
            classified,
            Some(InboundInteraction::PlainMessage {
                chat_id: 999,
                text: "Nouvelle mise à jour : v2".to_string(),
            })
        );
    }

    #[test]
    fn unsupported_updates_are_ignored() {
        assert!(classify_update(update(json!({ "update_id": 4 }))).is_none());
        assert!(classify_update(update(json!({
            "update_id": 5,
            "callback_query": { "message": { "message_id": 1, "chat": { "id": 2 } } }
        })))
        .is_none());
        assert!(classify_update(update(json!({
            "update_id": 6,
            "message": { "message_id": 13, "chat": { "id": 7 } }
        })))
        .is_none());
    }
}
