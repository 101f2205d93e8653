//! Interaction runtime for the Atlas assistant.
//!
//! Hosts the hierarchical-navigation router, the per-selection request
//! lifecycle, the deduplicated user registry, and the broadcast dispatcher.
//! The chat transport and the generation service are injected behind traits;
//! nothing in this crate talks to the network directly.

mod broadcast;
mod interaction_router;
mod prompt_templates;
mod request_lifecycle;
mod transport;
mod user_registry;

pub use broadcast::{broadcast, DeliveryReport};
pub use interaction_router::{InteractionRouter, RouterConfig, UserProfile, BROADCAST_PREFIX};
pub use prompt_templates::SectionPrompt;
pub use request_lifecycle::{
    LeafSelectionOutcome, RequestLifecycleController, GENERATION_APOLOGY, NOT_FOUND_MESSAGE,
    SECTION_UNAVAILABLE_MESSAGE,
};
pub use transport::{ChatId, ChatTransport, MessageId};
pub use user_registry::{RegisterOutcome, User, UserRegistry};
