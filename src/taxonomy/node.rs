use serde::{Deserialize, Serialize};

use crate::types::identifiers::id_depth;
use crate::types::CandidateOption;

/// A decoded taxonomy: ordered vertical roots, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub version: String,
    roots: Vec<Node>,
}

/// One taxonomy entry. Owned by its parent; there are no back-references.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Node {
    /// Empty for synthetic vertical roots.
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub children: Vec<Node>,
}

impl Taxonomy {
    pub fn new(version: impl Into<String>, roots: Vec<Node>) -> Self {
        Self {
            version: version.into(),
            roots,
        }
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order walk over every node of every root.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// First node, in pre-order, whose id equals `id` exactly.
    ///
    /// Surrounding whitespace is ignored; an empty id is never found, so
    /// synthetic roots cannot be looked up this way.
    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        self.iter().find(|node| node.id == id)
    }

    /// Breadcrumb name of the category with the given id.
    pub fn full_name(&self, id: &str) -> Option<&str> {
        self.find_by_id(id).map(|node| node.full_name.as_str())
    }
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            name: name.into(),
            full_name: full_name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn depth(&self) -> usize {
        id_depth(&self.id)
    }

    /// Case-insensitive match on a direct child's name or full name.
    pub fn find_child_by_name(&self, name: &str) -> Option<&Node> {
        let wanted = name.trim().to_lowercase();
        self.children.iter().find(|child| {
            child.name.to_lowercase() == wanted || child.full_name.to_lowercase() == wanted
        })
    }

    pub fn options(&self) -> Vec<CandidateOption> {
        self.children.iter().map(CandidateOption::from).collect()
    }
}

pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
