//! Telegram Bot API binding for the Atlas runtime.
//!
//! A thin transport collaborator: the API client implements the runtime's
//! `ChatTransport` trait, and the poll runtime turns `getUpdates` results
//! into router calls. No navigation or lifecycle logic lives here.

mod telegram_api_client;
mod telegram_poll_runtime;

pub use telegram_api_client::{TelegramApiClient, TELEGRAM_API_BASE};
pub use telegram_poll_runtime::{run_telegram_poll_loop, TelegramPollConfig};
