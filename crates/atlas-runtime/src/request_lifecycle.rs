use std::sync::Arc;

use tracing::{info, warn};

use atlas_ai::{GenerationClient, GenerationError};
use atlas_menu::render_leaf_pending;
use atlas_taxonomy::Taxonomy;

use crate::prompt_templates::SectionPrompt;
use crate::transport::{ChatId, ChatTransport, MessageId};

/// Apology for tokens that resolve to nothing.
pub const NOT_FOUND_MESSAGE: &str = "L'élément demandé n'a pas été trouvé.";
/// Apology for unknown top-level sections.
pub const SECTION_UNAVAILABLE_MESSAGE: &str = "Désolé, la section n'est pas disponible.";
/// Apology for generation failures, distinct from the not-found message.
pub const GENERATION_APOLOGY: &str =
    "Désolé, une erreur s'est produite lors de la récupération des informations. Réessayez plus tard.";

fn empty_generation_apology(item_name: &str) -> String {
    format!("Désolé, je n'ai pas pu récupérer les informations demandées pour {item_name}.")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Terminal state of one leaf-selection request.
pub enum LeafSelectionOutcome {
    Delivered,
    NotFound,
    Failed,
}

/// Ephemeral bookkeeping for one in-flight selection. Created when the leaf
/// resolves, destroyed once the terminal message is out. Each spawned
/// interaction owns its own instance, so two in-flight requests from the
/// same conversation cannot clobber each other's cleanup.
struct PendingRequest {
    chat_id: ChatId,
    interaction_id: MessageId,
    notification: Option<MessageId>,
}

impl PendingRequest {
    /// Removes the transient status message, if one was created. Required
    /// before sending the terminal message on every exit path; failure is
    /// logged and the flow continues.
    async fn clear_notification(&mut self, transport: &dyn ChatTransport) {
        if let Some(message_id) = self.notification.take() {
            if let Err(error) = transport.delete_message(self.chat_id, message_id).await {
                warn!(
                    chat_id = self.chat_id,
                    interaction_id = self.interaction_id,
                    "failed to remove status message: {error:#}"
                );
            }
        }
    }
}

/// Drives one leaf selection from token resolution to the single terminal
/// message: resolve leaf, replace the menu with a transient status, await
/// the generation call, then deliver the text or an apology.
pub struct RequestLifecycleController {
    taxonomy: Arc<Taxonomy>,
    generation: Arc<dyn GenerationClient>,
    transport: Arc<dyn ChatTransport>,
}

impl RequestLifecycleController {
    pub fn new(
        taxonomy: Arc<Taxonomy>,
        generation: Arc<dyn GenerationClient>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            taxonomy,
            generation,
            transport,
        }
    }

    /// Handles the selection of leaf `leaf_id` inside `section`, originating
    /// from menu message `interaction_id`. Every failure is converted into a
    /// terminal user-facing message here; nothing propagates.
    pub async fn handle_leaf_selection(
        &self,
        chat_id: ChatId,
        interaction_id: MessageId,
        section: &str,
        leaf_id: &str,
        requester_name: Option<&str>,
    ) -> LeafSelectionOutcome {
        let Some(leaf) = self.taxonomy.find_leaf(section, leaf_id) else {
            self.send_text_logged(chat_id, NOT_FOUND_MESSAGE).await;
            return LeafSelectionOutcome::NotFound;
        };
        let leaf = leaf.clone();

        // Menu removal is best-effort UI hygiene; the request proceeds even
        // when the message is already gone.
        if let Err(error) = self.transport.delete_message(chat_id, interaction_id).await {
            warn!(
                chat_id,
                interaction_id, "failed to remove originating menu: {error:#}"
            );
        }

        let mut pending = PendingRequest {
            chat_id,
            interaction_id,
            notification: None,
        };
        match self
            .transport
            .send_status(chat_id, &render_leaf_pending())
            .await
        {
            Ok(message_id) => pending.notification = Some(message_id),
            Err(error) => {
                warn!(chat_id, "failed to send status message: {error:#}");
            }
        }

        let Some(template) = SectionPrompt::from_section(section) else {
            pending.clear_notification(self.transport.as_ref()).await;
            self.send_text_logged(chat_id, GENERATION_APOLOGY).await;
            return LeafSelectionOutcome::Failed;
        };

        let prompt = template.render(&leaf.name);
        match self.generation.generate(&prompt).await {
            Ok(text) => {
                pending.clear_notification(self.transport.as_ref()).await;
                self.send_text_logged(chat_id, &text).await;
                info!(
                    chat_id,
                    recipient = requester_name.unwrap_or("inconnu"),
                    item = %leaf.name,
                    "delivered generated description"
                );
                LeafSelectionOutcome::Delivered
            }
            Err(error) => {
                warn!(chat_id, item = %leaf.name, "generation failed: {error:#}");
                pending.clear_notification(self.transport.as_ref()).await;
                let apology = match error {
                    GenerationError::EmptyResponse => empty_generation_apology(&leaf.name),
                    _ => GENERATION_APOLOGY.to_string(),
                };
                self.send_text_logged(chat_id, &apology).await;
                LeafSelectionOutcome::Failed
            }
        }
    }

    async fn send_text_logged(&self, chat_id: ChatId, text: &str) {
        if let Err(error) = self.transport.send_text(chat_id, text).await {
            warn!(chat_id, "failed to send message: {error:#}");
        }
    }
}
