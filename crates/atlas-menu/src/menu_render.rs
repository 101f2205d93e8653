use atlas_taxonomy::Taxonomy;
use serde::{Deserialize, Serialize};

use crate::nav_token::{encode_path, ROOT_TOKEN};

/// Label used for the back-navigation row, as shown to users.
pub const BACK_LABEL: &str = "Retour ⬅️";

const ROOT_PROMPT: &str = "Choisissez le type souhaité :";
const PENDING_TEXT: &str =
    "Votre commande est en cours de préparation, veuillez patienter...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One interactive menu row.
pub struct MenuRow {
    pub label: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Transport-agnostic menu: prompt text plus ordered interactive rows.
pub struct MenuPayload {
    pub prompt: String,
    pub rows: Vec<MenuRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Transient status text with no interactive choices.
pub struct StatusPayload {
    pub text: String,
}

/// Renders the top-level menu: one row per section, no back row.
pub fn render_root(taxonomy: &Taxonomy) -> MenuPayload {
    let rows = taxonomy
        .sections()
        .map(|section| MenuRow {
            label: section.to_string(),
            token: encode_path(&[section]),
        })
        .collect();
    MenuPayload {
        prompt: ROOT_PROMPT.to_string(),
        rows,
    }
}

/// Renders the menu for an internal node at `path` (one or two segments),
/// with a trailing back row targeting the parent position. Returns `None`
/// when the path is empty or does not resolve to an internal node with
/// children.
pub fn render_node(taxonomy: &Taxonomy, path: &[&str]) -> Option<MenuPayload> {
    let last = *path.last()?;
    let children = taxonomy.children_of(path);
    if children.is_empty() {
        return None;
    }

    let mut rows = children
        .iter()
        .map(|child| {
            let mut child_path = path.to_vec();
            child_path.push(child.key.as_str());
            MenuRow {
                label: child.label.clone(),
                token: encode_path(&child_path),
            }
        })
        .collect::<Vec<_>>();
    rows.push(MenuRow {
        label: BACK_LABEL.to_string(),
        token: if path.len() == 1 {
            ROOT_TOKEN.to_string()
        } else {
            encode_path(&path[..path.len() - 1])
        },
    });

    let prompt = if path.len() == 1 {
        format!("Sélectionnez une sous-section de {last}:")
    } else {
        format!("Sélectionnez un élément parmi {last}:")
    };
    Some(MenuPayload { prompt, rows })
}

/// Renders the transient "processing" notification shown while a
/// generation request is outstanding.
pub fn render_leaf_pending() -> StatusPayload {
    StatusPayload {
        text: PENDING_TEXT.to_string(),
    }
}
