//! Navigation tokens and menu rendering for the taxonomy browser.
//!
//! Tokens are pure functions of tree position: no per-user state, so every
//! menu can be re-rendered deterministically and edited in place at the
//! transport boundary.

mod menu_render;
mod nav_token;

pub use menu_render::{
    render_leaf_pending, render_node, render_root, MenuPayload, MenuRow, StatusPayload, BACK_LABEL,
};
pub use nav_token::{
    decode_token, encode_path, NavigationPath, TokenError, BACK_TO_ROOT_TOKEN, ROOT_TOKEN,
};
