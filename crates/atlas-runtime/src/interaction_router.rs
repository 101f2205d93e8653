use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use atlas_ai::GenerationClient;
use atlas_menu::{decode_token, render_node, render_root};
use atlas_taxonomy::Taxonomy;

use crate::broadcast::{broadcast, DeliveryReport};
use crate::request_lifecycle::{
    RequestLifecycleController, NOT_FOUND_MESSAGE, SECTION_UNAVAILABLE_MESSAGE,
};
use crate::transport::{ChatId, ChatTransport, MessageId};
use crate::user_registry::{User, UserRegistry};

/// Owner messages starting with this prefix trigger a broadcast.
pub const BROADCAST_PREFIX: &str = "Nouvelle mise à jour";

#[derive(Debug, Clone)]
/// Router wiring that is not a collaborator: the owner address and the
/// optional user-snapshot location.
pub struct RouterConfig {
    pub owner_chat_id: ChatId,
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Sender profile attached to an inbound `/start` command.
pub struct UserProfile {
    pub user_id: i64,
    pub chat_id: ChatId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language: Option<String>,
}

impl UserProfile {
    fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn into_user(self) -> User {
        let full_name = self.full_name();
        User {
            user_id: self.user_id,
            chat_id: self.chat_id,
            full_name,
            username: self.username,
            language: self.language,
        }
    }
}

/// Dispatches inbound interactions: `/start`, menu clicks, and owner
/// broadcasts. One router instance serves every conversation; the transport
/// loop spawns a task per interaction so an outstanding generation call
/// never blocks other conversations.
pub struct InteractionRouter {
    taxonomy: Arc<Taxonomy>,
    registry: Arc<UserRegistry>,
    transport: Arc<dyn ChatTransport>,
    controller: RequestLifecycleController,
    config: RouterConfig,
}

impl InteractionRouter {
    pub fn new(
        taxonomy: Arc<Taxonomy>,
        registry: Arc<UserRegistry>,
        generation: Arc<dyn GenerationClient>,
        transport: Arc<dyn ChatTransport>,
        config: RouterConfig,
    ) -> Self {
        let controller =
            RequestLifecycleController::new(Arc::clone(&taxonomy), generation, Arc::clone(&transport));
        Self {
            taxonomy,
            registry,
            transport,
            controller,
            config,
        }
    }

    /// `/start`: registers the sender (owner notification and snapshot save
    /// on first contact) and sends the root menu.
    pub async fn on_start_command(&self, profile: UserProfile) {
        let user = profile.into_user();
        let chat_id = user.chat_id;

        match self.registry.register(user.clone()) {
            Ok(outcome) if outcome.was_new => {
                info!(user_id = user.user_id, full_name = %user.full_name, "new user registered");
                self.notify_owner_of_new_user(&user).await;
                self.persist_snapshot();
            }
            Ok(_) => {}
            Err(error) => warn!("user registration failed: {error:#}"),
        }

        if let Err(error) = self
            .transport
            .send_menu(chat_id, &render_root(&self.taxonomy))
            .await
        {
            warn!(chat_id, "failed to send root menu: {error:#}");
        }
    }

    /// Menu click carrying `token` on menu message `message_id`. Malformed
    /// or unresolvable tokens degrade to an apology; internal nodes re-edit
    /// the menu in place; leaves start a request lifecycle.
    pub async fn on_menu_selection(&self, chat_id: ChatId, message_id: MessageId, token: &str) {
        let Ok(path) = decode_token(token) else {
            debug!(chat_id, token, "malformed navigation token");
            self.send_text_logged(chat_id, NOT_FOUND_MESSAGE).await;
            return;
        };

        if path.is_root() {
            self.edit_menu_logged(chat_id, message_id, &render_root(&self.taxonomy))
                .await;
            return;
        }

        let segments = path.as_refs();
        match segments.as_slice() {
            [section, _, leaf_id] => {
                self.run_leaf_selection(chat_id, message_id, section, leaf_id)
                    .await;
            }
            [section, child] => {
                // A two-segment token is an internal position when it
                // resolves to one, otherwise a leaf directly under the
                // section.
                if let Some(payload) = render_node(&self.taxonomy, &segments) {
                    self.edit_menu_logged(chat_id, message_id, &payload).await;
                } else {
                    self.run_leaf_selection(chat_id, message_id, section, child)
                        .await;
                }
            }
            [_] => {
                if let Some(payload) = render_node(&self.taxonomy, &segments) {
                    self.edit_menu_logged(chat_id, message_id, &payload).await;
                } else {
                    self.send_text_logged(chat_id, SECTION_UNAVAILABLE_MESSAGE)
                        .await;
                }
            }
            _ => {
                self.send_text_logged(chat_id, NOT_FOUND_MESSAGE).await;
            }
        }
    }

    /// Plain inbound message. Only the owner talking to the bot with the
    /// broadcast prefix does anything; everything else is ignored.
    pub async fn on_plain_message(&self, chat_id: ChatId, text: &str) -> Option<DeliveryReport> {
        if chat_id != self.config.owner_chat_id || !text.starts_with(BROADCAST_PREFIX) {
            return None;
        }

        let recipients = self.registry.all();
        info!(recipients = recipients.len(), "owner broadcast triggered");
        Some(broadcast(self.transport.as_ref(), text, &recipients).await)
    }

    async fn run_leaf_selection(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        section: &str,
        leaf_id: &str,
    ) {
        let requester = self.registry.find_by_chat(chat_id);
        self.controller
            .handle_leaf_selection(
                chat_id,
                message_id,
                section,
                leaf_id,
                requester.as_ref().map(|user| user.full_name.as_str()),
            )
            .await;
    }

    async fn notify_owner_of_new_user(&self, user: &User) {
        let summary = format!(
            "Nouvel utilisateur du bot :\nNom complet : {}\nNom d'utilisateur : {}\nIdentifiant utilisateur : {}\nIdentifiant de conversation : {}\nLangue : {}",
            user.full_name,
            user.username.as_deref().unwrap_or("non renseigné"),
            user.user_id,
            user.chat_id,
            user.language.as_deref().unwrap_or("non renseignée"),
        );
        if let Err(error) = self
            .transport
            .send_text(self.config.owner_chat_id, &summary)
            .await
        {
            warn!("failed to notify owner of new user: {error:#}");
        }
    }

    fn persist_snapshot(&self) {
        let Some(path) = self.config.snapshot_path.as_deref() else {
            return;
        };
        if let Err(error) = self.registry.save_snapshot(path) {
            warn!(path = %path.display(), "failed to persist user snapshot: {error:#}");
        }
    }

    async fn send_text_logged(&self, chat_id: ChatId, text: &str) {
        if let Err(error) = self.transport.send_text(chat_id, text).await {
            warn!(chat_id, "failed to send message: {error:#}");
        }
    }

    async fn edit_menu_logged(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        payload: &atlas_menu::MenuPayload,
    ) {
        if let Err(error) = self.transport.edit_menu(chat_id, message_id, payload).await {
            warn!(chat_id, message_id, "failed to edit menu: {error:#}");
        }
    }
}
