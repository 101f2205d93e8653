use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use atlas_core::write_text_atomic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Known interacting user. Identity key is `user_id`; `chat_id` is the
/// delivery address and may differ from it. Never mutated once registered.
pub struct User {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "chatId")]
    pub chat_id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of a [`UserRegistry::register`] call.
pub struct RegisterOutcome {
    pub was_new: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserSnapshotFile {
    #[serde(rename = "Users", default)]
    users: Vec<User>,
}

#[derive(Debug, Default)]
/// Deduplicated, process-lifetime store of everyone who has interacted with
/// the assistant. Read-mostly; the single mutating operation is `register`.
pub struct UserRegistry {
    users: Mutex<HashMap<i64, User>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a registry from the `{"Users": [...]}` snapshot file.
    /// Duplicate `userId` entries in the file collapse to the first one.
    pub fn load_snapshot(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let snapshot: UserSnapshotFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let registry = Self::new();
        for user in snapshot.users {
            registry.register(user)?;
        }
        Ok(registry)
    }

    /// Writes the `{"Users": [...]}` snapshot atomically.
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        let mut users = self.all();
        users.sort_by_key(|user| user.user_id);
        let snapshot = UserSnapshotFile { users };
        let raw =
            serde_json::to_string_pretty(&snapshot).context("failed to encode user snapshot")?;
        write_text_atomic(path, &raw)
    }

    pub fn has(&self, user_id: i64) -> bool {
        self.users
            .lock()
            .map(|users| users.contains_key(&user_id))
            .unwrap_or(false)
    }

    /// Idempotent registration: the first registration for a `user_id` wins
    /// and reports `was_new`; later calls are storage no-ops. `was_new` is
    /// decided under the map lock, so two concurrent first contacts for the
    /// same user observe exactly one `true`.
    pub fn register(&self, user: User) -> Result<RegisterOutcome> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| anyhow!("user registry lock is poisoned"))?;
        let was_new = match users.entry(user.user_id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(user);
                true
            }
        };
        Ok(RegisterOutcome { was_new })
    }

    /// Point-in-time snapshot of every registered user, in no particular
    /// order. Finite and restartable, as broadcast iteration requires.
    pub fn all(&self) -> Vec<User> {
        self.users
            .lock()
            .map(|users| users.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Looks a user up by delivery address, for display-name logging.
    pub fn find_by_chat(&self, chat_id: i64) -> Option<User> {
        self.users
            .lock()
            .ok()?
            .values()
            .find(|user| user.chat_id == chat_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
