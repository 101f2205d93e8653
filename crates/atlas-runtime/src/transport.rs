use anyhow::Result;
use async_trait::async_trait;
use atlas_menu::{MenuPayload, StatusPayload};

/// Stable delivery address of a conversation.
pub type ChatId = i64;
/// Transport-assigned message handle within a conversation.
pub type MessageId = i64;

#[async_trait]
/// Outbound boundary towards the chat-transport collaborator.
///
/// Implementations must not retry on the caller's behalf; the runtime logs
/// and absorbs failures where the flow allows it.
pub trait ChatTransport: Send + Sync {
    /// Sends a fresh interactive menu, returning its message handle.
    async fn send_menu(&self, chat_id: ChatId, payload: &MenuPayload) -> Result<MessageId>;

    /// Re-renders an existing menu message in place.
    async fn edit_menu(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        payload: &MenuPayload,
    ) -> Result<()>;

    /// Sends a transient status notification, returning its handle so it can
    /// be removed later.
    async fn send_status(&self, chat_id: ChatId, payload: &StatusPayload) -> Result<MessageId>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()>;

    /// Sends plain text, returning the new message handle.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId>;
}
