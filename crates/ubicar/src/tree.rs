//! Immutable arena model of one UI hierarchy snapshot.
//!
//! A [`ViewTree`] is built once per capture and never mutated afterwards.
//! Nodes are addressed by integer [`NodeId`] into the arena, the parent is a
//! back-reference stored as an index and children are held as an ordered
//! index list, so a tree is cheap to clone and serialize and cannot alias or
//! cycle once validated.

use serde::{Deserialize, Serialize};

use crate::result::{UbicarError, UbicarResult};

/// Opaque identity of a node within one snapshot.
///
/// A `NodeId` is only meaningful for the tree that issued it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Attributes captured for one view in the hierarchy.
///
/// All attributes are optional; an empty string is treated as absent by the
/// text-based constraint kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewAttributes {
    /// Framework-assigned identifier
    pub identifier: Option<String>,
    /// Resource entry name
    pub resource_name: Option<String>,
    /// Fully qualified class name
    pub class_name: Option<String>,
    /// Visible text
    pub text: Option<String>,
    /// Accessibility content description
    pub content_description: Option<String>,
}

impl ViewAttributes {
    /// Create an empty attribute set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the resource entry name
    #[must_use]
    pub fn with_resource_name(mut self, resource_name: impl Into<String>) -> Self {
        self.resource_name = Some(resource_name.into());
        self
    }

    /// Set the class name
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set the visible text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the content description
    #[must_use]
    pub fn with_content_description(mut self, description: impl Into<String>) -> Self {
        self.content_description = Some(description.into());
        self
    }
}

/// One node of the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ViewNode {
    attributes: ViewAttributes,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// One raw node record as produced by a UI-capture collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNode {
    /// Captured attributes
    pub attributes: ViewAttributes,
    /// Declared children, as indexes into the snapshot's node list
    pub children: Vec<usize>,
}

/// A freshly captured, not yet validated UI hierarchy.
///
/// The node list is flat; structure is declared through each record's child
/// index list and checked by [`ViewTree::from_snapshot`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    /// Flat list of captured node records
    pub nodes: Vec<RawNode>,
}

/// Immutable representation of one UI snapshot as a rooted node tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewTree {
    nodes: Vec<ViewNode>,
    root: NodeId,
}

impl ViewTree {
    /// Validate raw hierarchy data and build the arena.
    ///
    /// # Errors
    ///
    /// Returns [`UbicarError::MalformedSnapshot`] when the records do not
    /// describe a single rooted tree: a child index out of range, a node
    /// owned by more than one parent, no (or more than one) parentless node,
    /// or nodes unreachable from the root. Construction is the only place
    /// the hierarchy is validated; the synthesis algorithms assume a
    /// well-formed tree.
    pub fn from_snapshot(snapshot: &RawSnapshot) -> UbicarResult<Self> {
        let node_count = snapshot.nodes.len();
        if node_count == 0 {
            return Err(UbicarError::MalformedSnapshot {
                message: "snapshot contains no nodes".to_string(),
            });
        }

        let mut parents: Vec<Option<NodeId>> = vec![None; node_count];
        for (index, record) in snapshot.nodes.iter().enumerate() {
            for &child in &record.children {
                if child >= node_count {
                    return Err(UbicarError::MalformedSnapshot {
                        message: format!(
                            "node {index} declares child {child}, but the snapshot has only \
                             {node_count} nodes"
                        ),
                    });
                }
                if let Some(previous) = parents[child] {
                    return Err(UbicarError::MalformedSnapshot {
                        message: format!(
                            "node {child} is owned by both node {} and node {index}",
                            previous.index()
                        ),
                    });
                }
                parents[child] = Some(NodeId(index));
            }
        }

        let mut roots = parents
            .iter()
            .enumerate()
            .filter(|(_, parent)| parent.is_none())
            .map(|(index, _)| NodeId(index));
        let root = roots.next().ok_or_else(|| UbicarError::MalformedSnapshot {
            message: "snapshot has no parentless node".to_string(),
        })?;
        if let Some(extra) = roots.next() {
            return Err(UbicarError::MalformedSnapshot {
                message: format!(
                    "snapshot has more than one parentless node ({} and {})",
                    root.index(),
                    extra.index()
                ),
            });
        }

        let nodes: Vec<ViewNode> = snapshot
            .nodes
            .iter()
            .enumerate()
            .map(|(index, record)| ViewNode {
                attributes: record.attributes.clone(),
                parent: parents[index],
                children: record.children.iter().map(|&child| NodeId(child)).collect(),
            })
            .collect();

        let tree = Self { nodes, root };

        let mut visited = vec![false; node_count];
        let mut stack = vec![root];
        let mut reached = 0usize;
        while let Some(node) = stack.pop() {
            if visited[node.index()] {
                continue;
            }
            visited[node.index()] = true;
            reached += 1;
            stack.extend(tree.children_of(node));
        }
        if reached != node_count {
            return Err(UbicarError::MalformedSnapshot {
                message: format!(
                    "{} of {node_count} nodes are not reachable from the root",
                    node_count - reached
                ),
            });
        }

        Ok(tree)
    }

    /// The single parentless node
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes in this snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes (never true for a validated tree)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of `node`, if any
    #[must_use]
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    /// Whether `node` has a parent
    #[must_use]
    pub fn has_parent(&self, node: NodeId) -> bool {
        self.nodes[node.index()].parent.is_some()
    }

    /// Ordered children of `node`
    #[must_use]
    pub fn children_of(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    /// Child of `node` at position `index`, if in range
    #[must_use]
    pub fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.nodes[node.index()].children.get(index).copied()
    }

    /// Position of `child` among the children of `parent`
    #[must_use]
    pub fn index_of_child(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes[parent.index()]
            .children
            .iter()
            .position(|&candidate| candidate == child)
    }

    /// Attributes of `node`
    #[must_use]
    pub fn attributes(&self, node: NodeId) -> &ViewAttributes {
        &self.nodes[node.index()].attributes
    }

    /// All node ids of this snapshot, in arena order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }
}

/// Programmatic construction of a [`ViewTree`].
///
/// The builder hands out parent ids as nodes are attached, so it cannot
/// produce a malformed hierarchy and `build` is infallible.
#[derive(Debug)]
pub struct ViewTreeBuilder {
    nodes: Vec<ViewNode>,
}

impl ViewTreeBuilder {
    /// Start a tree from the root node's attributes
    #[must_use]
    pub fn new(root: ViewAttributes) -> Self {
        Self {
            nodes: vec![ViewNode {
                attributes: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Root id of the tree under construction
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a child under `parent` and return its id
    pub fn add_child(&mut self, parent: NodeId, attributes: ViewAttributes) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ViewNode {
            attributes,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Finish construction
    #[must_use]
    pub fn build(self) -> ViewTree {
        ViewTree {
            nodes: self.nodes,
            root: NodeId(0),
        }
    }
}
