use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use atlas_ai::{GenerationClient, GenerationError};
use atlas_menu::{MenuPayload, StatusPayload};
use atlas_runtime::{
    ChatId, ChatTransport, InteractionRouter, MessageId, RouterConfig, UserProfile, UserRegistry,
};
use atlas_taxonomy::Taxonomy;
use tokio::sync::Mutex as AsyncMutex;

const OWNER_CHAT: ChatId = 900;
const STUDENT_CHAT: ChatId = 11;

/// Generation collaborator with a scripted response queue; an exhausted
/// queue behaves like a remote failure.
struct ScriptedGeneration {
    responses: AsyncMutex<VecDeque<Result<String, GenerationError>>>,
    prompts: AsyncMutex<Vec<String>>,
}

impl ScriptedGeneration {
    fn new(responses: Vec<Result<String, GenerationError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: AsyncMutex::new(VecDeque::from(responses)),
            prompts: AsyncMutex::new(Vec::new()),
        })
    }

    async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedGeneration {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().await.push(prompt.to_string());
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(GenerationError::HttpStatus {
                status: 500,
                body: "scripted response queue exhausted".to_string(),
            }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outbound {
    Menu { chat_id: ChatId, tokens: Vec<String> },
    MenuEdit { chat_id: ChatId, tokens: Vec<String> },
    Status { chat_id: ChatId },
    Deleted { chat_id: ChatId, message_id: MessageId },
    Text { chat_id: ChatId, text: String },
}

#[derive(Default)]
struct RecordingTransport {
    outbound: AsyncMutex<Vec<Outbound>>,
    next_message_id: AtomicI64,
}

impl RecordingTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            next_message_id: AtomicI64::new(500),
            ..Self::default()
        })
    }

    async fn outbound(&self) -> Vec<Outbound> {
        self.outbound.lock().await.clone()
    }

    fn next_id(&self) -> MessageId {
        self.next_message_id.fetch_add(1, Ordering::SeqCst)
    }
}

fn tokens_of(payload: &MenuPayload) -> Vec<String> {
    payload.rows.iter().map(|row| row.token.clone()).collect()
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_menu(&self, chat_id: ChatId, payload: &MenuPayload) -> Result<MessageId> {
        self.outbound.lock().await.push(Outbound::Menu {
            chat_id,
            tokens: tokens_of(payload),
        });
        Ok(self.next_id())
    }

    async fn edit_menu(
        &self,
        chat_id: ChatId,
        _message_id: MessageId,
        payload: &MenuPayload,
    ) -> Result<()> {
        self.outbound.lock().await.push(Outbound::MenuEdit {
            chat_id,
            tokens: tokens_of(payload),
        });
        Ok(())
    }

    async fn send_status(&self, chat_id: ChatId, _payload: &StatusPayload) -> Result<MessageId> {
        self.outbound.lock().await.push(Outbound::Status { chat_id });
        Ok(self.next_id())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        self.outbound.lock().await.push(Outbound::Deleted {
            chat_id,
            message_id,
        });
        Ok(())
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId> {
        self.outbound.lock().await.push(Outbound::Text {
            chat_id,
            text: text.to_string(),
        });
        Ok(self.next_id())
    }
}

fn anatomy_taxonomy() -> Taxonomy {
    Taxonomy::load(
        r#"{
            "Osteologie": {
                "Membre superieur": [
                    { "name": "Clavicule", "id": "Clavicule" },
                    { "name": "Humerus", "id": "Humerus" }
                ]
            },
            "Myologie": [
                { "name": "Deltoide", "id": "Deltoide" }
            ]
        }"#,
    )
    .expect("taxonomy")
}

fn build_router(
    transport: Arc<RecordingTransport>,
    generation: Arc<ScriptedGeneration>,
) -> InteractionRouter {
    InteractionRouter::new(
        Arc::new(anatomy_taxonomy()),
        Arc::new(UserRegistry::new()),
        generation,
        transport,
        RouterConfig {
            owner_chat_id: OWNER_CHAT,
            snapshot_path: None,
        },
    )
}

fn student_profile() -> UserProfile {
    UserProfile {
        user_id: 1,
        chat_id: STUDENT_CHAT,
        first_name: Some("Lina".to_string()),
        last_name: Some("B".to_string()),
        username: Some("lina".to_string()),
        language: Some("fr".to_string()),
    }
}

#[tokio::test]
async fn full_menu_walk_delivers_a_generated_description() {
    let transport = RecordingTransport::new();
    let generation = ScriptedGeneration::new(vec![Ok(
        "La clavicule est un os pair en forme de S italique.".to_string(),
    )]);
    let router = build_router(Arc::clone(&transport), Arc::clone(&generation));

    // /start → root menu, owner notified of the first contact.
    router.on_start_command(student_profile()).await;
    // Drill down: section, sub-section, then the leaf itself.
    router.on_menu_selection(STUDENT_CHAT, 1, "Osteologie").await;
    router
        .on_menu_selection(STUDENT_CHAT, 1, "Osteologie_Membre superieur")
        .await;
    router
        .on_menu_selection(STUDENT_CHAT, 1, "Osteologie_Membre superieur_Clavicule")
        .await;

    let prompts = generation.prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Clavicule"));

    let outbound = transport.outbound().await;
    let menus = outbound
        .iter()
        .filter(|entry| matches!(entry, Outbound::Menu { .. } | Outbound::MenuEdit { .. }))
        .count();
    assert_eq!(menus, 3, "root menu plus two in-place edits");

    let student_texts = outbound
        .iter()
        .filter_map(|entry| match entry {
            Outbound::Text { chat_id, text } if *chat_id == STUDENT_CHAT => Some(text.clone()),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(student_texts.len(), 1, "exactly one terminal message");
    assert!(student_texts[0].contains("os pair"));

    // The transient status was created and later removed.
    assert!(outbound
        .iter()
        .any(|entry| matches!(entry, Outbound::Status { chat_id } if *chat_id == STUDENT_CHAT)));
    let status_index = outbound
        .iter()
        .position(|entry| matches!(entry, Outbound::Status { .. }))
        .expect("status");
    assert!(outbound[status_index + 1..]
        .iter()
        .any(|entry| matches!(entry, Outbound::Deleted { .. })));

    // Owner heard about the new user exactly once.
    let owner_texts = outbound
        .iter()
        .filter(|entry| matches!(entry, Outbound::Text { chat_id, .. } if *chat_id == OWNER_CHAT))
        .count();
    assert_eq!(owner_texts, 1);
}

#[tokio::test]
async fn exhausted_generation_service_yields_one_apology_per_selection() {
    let transport = RecordingTransport::new();
    let generation = ScriptedGeneration::new(Vec::new());
    let router = build_router(Arc::clone(&transport), Arc::clone(&generation));

    router
        .on_menu_selection(STUDENT_CHAT, 1, "Myologie_Deltoide")
        .await;

    let outbound = transport.outbound().await;
    let texts = outbound
        .iter()
        .filter(|entry| matches!(entry, Outbound::Text { .. }))
        .count();
    assert_eq!(texts, 1);
    assert!(outbound
        .iter()
        .any(|entry| matches!(entry, Outbound::Text { text, .. } if text.contains("Désolé"))));
}

#[tokio::test]
async fn owner_broadcast_reaches_every_registered_user() {
    let transport = RecordingTransport::new();
    let generation = ScriptedGeneration::new(Vec::new());
    let router = build_router(Arc::clone(&transport), generation);

    for (user_id, chat_id) in [(1, 21), (2, 22)] {
        let mut profile = student_profile();
        profile.user_id = user_id;
        profile.chat_id = chat_id;
        router.on_start_command(profile).await;
    }

    let report = router
        .on_plain_message(OWNER_CHAT, "Nouvelle mise à jour : séance de révision ce soir")
        .await
        .expect("broadcast");
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 0);

    let outbound = transport.outbound().await;
    for chat_id in [21, 22] {
        assert!(outbound.iter().any(|entry| matches!(
            entry,
            Outbound::Text { chat_id: chat, text } if *chat == chat_id && text.contains("Nouvelle mise à jour")
        )));
    }
}
