/// Delimiter used to join path segments into navigation tokens.
///
/// Labels and leaf ids must stay delimiter-clean; `Taxonomy::load` rejects
/// sources that violate this.
pub const TOKEN_DELIMITER: char = '_';

#[derive(Debug, Clone, PartialEq, Eq)]
/// Terminal taxonomy entry describing a single nameable structure.
pub struct Leaf {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Taxonomy tree node, decided once at load time.
pub enum TaxonomyNode {
    /// Ordered children; insertion order is display order.
    Internal(Vec<(String, TaxonomyNode)>),
    Leaf(Leaf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Direct child of a node, flattened for menu rendering.
pub struct ChildEntry {
    /// Human-readable row label.
    pub label: String,
    /// Token path segment: the child label for internal nodes, the leaf id
    /// for leaves.
    pub key: String,
    pub is_leaf: bool,
}

#[derive(Debug, Clone, Default)]
/// Immutable taxonomy owned for the lifetime of the process.
pub struct Taxonomy {
    pub(crate) sections: Vec<(String, TaxonomyNode)>,
}

impl Taxonomy {
    /// Empty taxonomy used when the source is missing or malformed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Top-level section labels in display order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(label, _)| label.as_str())
    }

    /// Direct children at `path`, or empty when the path does not resolve
    /// to an internal node.
    pub fn children_of(&self, path: &[&str]) -> Vec<ChildEntry> {
        let children = match self.node_at(path) {
            Some(TaxonomyNode::Internal(children)) => children,
            Some(TaxonomyNode::Leaf(_)) | None => return Vec::new(),
        };

        children
            .iter()
            .map(|(label, node)| match node {
                TaxonomyNode::Internal(_) => ChildEntry {
                    label: label.clone(),
                    key: label.clone(),
                    is_leaf: false,
                },
                TaxonomyNode::Leaf(leaf) => ChildEntry {
                    label: leaf.name.clone(),
                    key: leaf.id.clone(),
                    is_leaf: true,
                },
            })
            .collect()
    }

    /// Depth-first search for `leaf_id`, restricted to the named top-level
    /// section. With duplicate ids in one section the first match in child
    /// order wins, deterministically across calls.
    pub fn find_leaf(&self, section: &str, leaf_id: &str) -> Option<&Leaf> {
        let (_, node) = self.sections.iter().find(|(label, _)| label == section)?;
        find_in_node(node, leaf_id)
    }

    fn node_at(&self, path: &[&str]) -> Option<&TaxonomyNode> {
        let (first, rest) = path.split_first()?;
        let (_, first_node) = self.sections.iter().find(|(label, _)| label == first)?;
        let mut node = first_node;
        for segment in rest {
            let TaxonomyNode::Internal(children) = node else {
                return None;
            };
            let (_, child) = children.iter().find(|(label, _)| label == segment)?;
            node = child;
        }
        Some(node)
    }
}

fn find_in_node<'a>(node: &'a TaxonomyNode, leaf_id: &str) -> Option<&'a Leaf> {
    match node {
        TaxonomyNode::Leaf(leaf) => (leaf.id == leaf_id).then_some(leaf),
        TaxonomyNode::Internal(children) => children
            .iter()
            .find_map(|(_, child)| find_in_node(child, leaf_id)),
    }
}
