use serde_json::Value;
use thiserror::Error;

use crate::taxonomy_store::{Leaf, Taxonomy, TaxonomyNode, TOKEN_DELIMITER};

#[derive(Debug, Error)]
/// Enumerates failures while loading the taxonomy source.
pub enum TaxonomyError {
    #[error("taxonomy source is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("taxonomy root must be a JSON object")]
    RootShape,
    #[error("taxonomy label under '{parent}' is empty")]
    EmptyLabel { parent: String },
    #[error("taxonomy label or id '{value}' contains the reserved token delimiter")]
    ReservedDelimiter { value: String },
    #[error("leaf entry under '{parent}' must be an object with string 'name' and 'id'")]
    MalformedLeaf { parent: String },
    #[error("unsupported node shape under '{parent}'")]
    UnsupportedShape { parent: String },
}

impl Taxonomy {
    /// Parses a nested labeled JSON structure: objects become internal
    /// nodes (entry order preserved), arrays become lists of
    /// `{"name", "id"}` leaves.
    pub fn load(raw: &str) -> Result<Self, TaxonomyError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    /// Same as [`Taxonomy::load`] for an already-parsed document.
    pub fn from_value(value: Value) -> Result<Self, TaxonomyError> {
        let Value::Object(entries) = value else {
            return Err(TaxonomyError::RootShape);
        };

        let mut sections = Vec::with_capacity(entries.len());
        for (label, node_value) in entries {
            validate_segment(&label, "taxonomy root")?;
            let node = parse_node(&label, node_value)?;
            sections.push((label, node));
        }
        Ok(Self { sections })
    }
}

fn parse_node(parent: &str, value: Value) -> Result<TaxonomyNode, TaxonomyError> {
    match value {
        Value::Object(entries) => {
            let mut children = Vec::with_capacity(entries.len());
            for (label, child_value) in entries {
                validate_segment(&label, parent)?;
                let child = parse_node(&label, child_value)?;
                children.push((label, child));
            }
            Ok(TaxonomyNode::Internal(children))
        }
        Value::Array(items) => {
            let mut children = Vec::with_capacity(items.len());
            for item in items {
                let leaf = parse_leaf(parent, item)?;
                children.push((leaf.name.clone(), TaxonomyNode::Leaf(leaf)));
            }
            Ok(TaxonomyNode::Internal(children))
        }
        _ => Err(TaxonomyError::UnsupportedShape {
            parent: parent.to_string(),
        }),
    }
}

fn parse_leaf(parent: &str, value: Value) -> Result<Leaf, TaxonomyError> {
    let Value::Object(fields) = value else {
        return Err(TaxonomyError::MalformedLeaf {
            parent: parent.to_string(),
        });
    };

    let read_string = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    };

    let (Some(name), Some(id)) = (read_string("name"), read_string("id")) else {
        return Err(TaxonomyError::MalformedLeaf {
            parent: parent.to_string(),
        });
    };
    if id.contains(TOKEN_DELIMITER) {
        return Err(TaxonomyError::ReservedDelimiter { value: id });
    }
    Ok(Leaf { id, name })
}

fn validate_segment(label: &str, parent: &str) -> Result<(), TaxonomyError> {
    if label.trim().is_empty() {
        return Err(TaxonomyError::EmptyLabel {
            parent: parent.to_string(),
        });
    }
    if label.contains(TOKEN_DELIMITER) {
        return Err(TaxonomyError::ReservedDelimiter {
            value: label.to_string(),
        });
    }
    Ok(())
}
