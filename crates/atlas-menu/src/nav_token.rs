use atlas_taxonomy::TOKEN_DELIMITER;
use thiserror::Error;

/// Reserved token rendering the top-level menu.
pub const ROOT_TOKEN: &str = "main_menu";
/// Reserved back-navigation token equivalent to [`ROOT_TOKEN`].
pub const BACK_TO_ROOT_TOKEN: &str = "back_to_main";

const MAX_SEGMENTS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
/// Enumerates navigation-token decode failures.
pub enum TokenError {
    #[error("navigation token is malformed")]
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Decoded tree position: zero segments for the root menu, one to three
/// segments (section, optional sub-section, optional leaf id) otherwise.
pub struct NavigationPath {
    segments: Vec<String>,
}

impl NavigationPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Borrowed segment views, the shape taxonomy lookups take.
    pub fn as_refs(&self) -> Vec<&str> {
        self.segments.iter().map(String::as_str).collect()
    }
}

/// Joins 1-3 delimiter-clean segments into an opaque token.
pub fn encode_path(segments: &[&str]) -> String {
    segments.join(&TOKEN_DELIMITER.to_string())
}

/// Decodes a token back into a tree position. Total: malformed input
/// degrades to [`TokenError::Malformed`], never a panic. The reserved root
/// sentinels decode to the empty path.
pub fn decode_token(token: &str) -> Result<NavigationPath, TokenError> {
    if token == ROOT_TOKEN || token == BACK_TO_ROOT_TOKEN {
        return Ok(NavigationPath::root());
    }

    let segments = token
        .split(TOKEN_DELIMITER)
        .map(str::to_string)
        .collect::<Vec<_>>();
    if segments.is_empty()
        || segments.len() > MAX_SEGMENTS
        || segments.iter().any(|segment| segment.trim().is_empty())
    {
        return Err(TokenError::Malformed);
    }
    Ok(NavigationPath { segments })
}
