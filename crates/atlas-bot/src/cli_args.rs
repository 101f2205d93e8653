use std::path::PathBuf;

use clap::Parser;

use atlas_telegram::TELEGRAM_API_BASE;

#[derive(Debug, Parser)]
#[command(name = "atlas-bot", about = "Menu-driven anatomy assistant for Telegram")]
pub(crate) struct Cli {
    /// Telegram bot token.
    #[arg(long, env = "ATLAS_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// Google Generative Language API key.
    #[arg(long, env = "ATLAS_GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: String,

    /// Chat id receiving new-user notifications and allowed to broadcast.
    #[arg(long, env = "ATLAS_OWNER_CHAT_ID")]
    pub owner_chat_id: i64,

    /// Taxonomy source file.
    #[arg(long, env = "ATLAS_TAXONOMY_PATH", default_value = "anatomie.json")]
    pub taxonomy_path: PathBuf,

    /// User-registry snapshot file.
    #[arg(long, env = "ATLAS_USERS_PATH", default_value = "users.json")]
    pub users_path: PathBuf,

    /// Generation model id.
    #[arg(long, env = "ATLAS_MODEL", default_value = "gemini-1.5-pro")]
    pub model: String,

    #[arg(
        long,
        env = "ATLAS_GOOGLE_API_BASE",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    pub google_api_base: String,

    #[arg(long, env = "ATLAS_TELEGRAM_API_BASE", default_value = TELEGRAM_API_BASE)]
    pub telegram_api_base: String,

    /// Outbound HTTP timeout; must exceed the long-poll timeout.
    #[arg(long, env = "ATLAS_REQUEST_TIMEOUT_MS", default_value_t = 60_000)]
    pub request_timeout_ms: u64,

    #[arg(long, env = "ATLAS_POLL_TIMEOUT_S", default_value_t = 30)]
    pub poll_timeout_s: u64,

    /// Port for the static landing page.
    #[arg(long, env = "ATLAS_HTTP_PORT", default_value_t = 3000)]
    pub http_port: u16,

    /// Directory containing index.html.
    #[arg(long, env = "ATLAS_STATIC_DIR", default_value = ".")]
    pub static_dir: PathBuf,
}
