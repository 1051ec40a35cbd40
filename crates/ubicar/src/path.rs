//! Relative paths between nodes of a [`ViewTree`].
//!
//! A [`TreePath`] is read outward from the node it is anchored at. The two
//! walk modes differ only at child steps: [`TreePath::walk_fixed`] follows
//! the stored index and recovers the one concrete node the path was built
//! for, while [`TreePath::walk_free`] ignores the stored index and fans out
//! over every child, returning the whole frontier. Candidate nodes elsewhere
//! in the tree are not guaranteed to share the target's local child
//! ordering, so ambiguity checks must always use the free walk.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::tree::{NodeId, ViewTree};

/// One movement relative to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathStep {
    /// Move to the node's parent
    ToParent,
    /// Move to the child at this position
    ToChildAtIndex(usize),
}

/// An ordered sequence of steps, read outward from an anchor node
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreePath {
    steps: Vec<PathStep>,
}

impl TreePath {
    /// The empty path (stays at the anchor node)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a path from explicit steps
    #[must_use]
    pub fn from_steps(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    /// The steps of this path, in walk order
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Whether this path has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// First step, if any
    #[must_use]
    pub fn head(&self) -> Option<PathStep> {
        self.steps.first().copied()
    }

    /// Everything after the first step
    #[must_use]
    pub fn tail(&self) -> Self {
        Self {
            steps: self.steps.iter().skip(1).copied().collect(),
        }
    }

    /// This path with one more step appended
    #[must_use]
    pub(crate) fn extended(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// Deterministic walk: child steps follow exactly the stored index.
    ///
    /// Returns `None` when the path runs off the tree: a parent step at the
    /// root or a child index past the last child.
    #[must_use]
    pub fn walk_fixed(&self, tree: &ViewTree, from: NodeId) -> Option<NodeId> {
        let mut current = from;
        for step in &self.steps {
            current = match *step {
                PathStep::ToParent => tree.parent_of(current)?,
                PathStep::ToChildAtIndex(index) => tree.child_at(current, index)?,
            };
        }
        Some(current)
    }

    /// Exploratory walk: child steps ignore the stored index and fan out
    /// over every child at that level.
    ///
    /// Returns the frontier of reachable nodes, deduplicated in first-visit
    /// order. Branches that run off the tree are dropped, so the frontier
    /// may be empty.
    #[must_use]
    pub fn walk_free(&self, tree: &ViewTree, from: NodeId) -> Vec<NodeId> {
        let mut frontier = vec![from];
        for step in &self.steps {
            let mut next = Vec::with_capacity(frontier.len());
            let mut seen = HashSet::with_capacity(frontier.len());
            match *step {
                PathStep::ToParent => {
                    for node in frontier {
                        if let Some(parent) = tree.parent_of(node) {
                            if seen.insert(parent) {
                                next.push(parent);
                            }
                        }
                    }
                }
                PathStep::ToChildAtIndex(_) => {
                    for node in frontier {
                        for &child in tree.children_of(node) {
                            if seen.insert(child) {
                                next.push(child);
                            }
                        }
                    }
                }
            }
            if next.is_empty() {
                return next;
            }
            frontier = next;
        }
        frontier
    }
}

/// Practical ceilings for the candidate path enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Longest path that will be enumerated
    pub max_path_length: usize,
    /// Total number of paths that will be enumerated
    pub max_paths: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_path_length: 20,
            max_paths: 10_000,
        }
    }
}

impl SearchLimits {
    /// Limit the path length
    #[must_use]
    pub const fn with_max_path_length(mut self, max_path_length: usize) -> Self {
        self.max_path_length = max_path_length;
        self
    }

    /// Limit the number of enumerated paths
    #[must_use]
    pub const fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }
}

/// A candidate path together with the concrete node it leads to from the
/// anchor
#[derive(Debug, Clone)]
pub struct PathWithNode {
    /// Path from the anchor node
    pub path: TreePath,
    /// Node reached by walking `path` with the fixed walk
    pub node: NodeId,
}

/// Breadth-first enumeration of relative paths outward from one node.
///
/// Yields the empty path first, then one-step paths (parent and children),
/// then two-step paths, and so on. Each tree node is reached exactly once,
/// along its shortest path from the anchor; enumeration order is fully
/// deterministic.
#[derive(Debug)]
pub struct PathsFromNode<'a> {
    tree: &'a ViewTree,
    queue: VecDeque<PathWithNode>,
    visited: Vec<bool>,
    limits: SearchLimits,
    yielded: usize,
}

impl<'a> PathsFromNode<'a> {
    /// Start a breadth-first path enumeration at `anchor`
    #[must_use]
    pub fn new(tree: &'a ViewTree, anchor: NodeId, limits: SearchLimits) -> Self {
        let mut visited = vec![false; tree.len()];
        visited[anchor.index()] = true;
        let mut queue = VecDeque::new();
        queue.push_back(PathWithNode {
            path: TreePath::empty(),
            node: anchor,
        });
        Self {
            tree,
            queue,
            visited,
            limits,
            yielded: 0,
        }
    }
}

impl Iterator for PathsFromNode<'_> {
    type Item = PathWithNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.yielded >= self.limits.max_paths {
            return None;
        }
        let item = self.queue.pop_front()?;
        self.yielded += 1;

        if item.path.len() < self.limits.max_path_length {
            if let Some(parent) = self.tree.parent_of(item.node) {
                if !self.visited[parent.index()] {
                    self.visited[parent.index()] = true;
                    self.queue.push_back(PathWithNode {
                        path: item.path.extended(PathStep::ToParent),
                        node: parent,
                    });
                }
            }
            for (index, &child) in self.tree.children_of(item.node).iter().enumerate() {
                if !self.visited[child.index()] {
                    self.visited[child.index()] = true;
                    self.queue.push_back(PathWithNode {
                        path: item.path.extended(PathStep::ToChildAtIndex(index)),
                        node: child,
                    });
                }
            }
        }

        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ViewAttributes, ViewTreeBuilder};

    /// root ── a ── leaf
    ///     └── b
    fn small_tree() -> (ViewTree, NodeId, NodeId, NodeId, NodeId) {
        let mut builder = ViewTreeBuilder::new(ViewAttributes::new());
        let root = builder.root();
        let a = builder.add_child(root, ViewAttributes::new());
        let b = builder.add_child(root, ViewAttributes::new());
        let leaf = builder.add_child(a, ViewAttributes::new());
        (builder.build(), root, a, b, leaf)
    }

    mod fixed_walk_tests {
        use super::*;

        #[test]
        fn test_empty_path_stays_put() {
            let (tree, _, a, _, _) = small_tree();
            assert_eq!(TreePath::empty().walk_fixed(&tree, a), Some(a));
        }

        #[test]
        fn test_up_then_down() {
            let (tree, _, a, b, leaf) = small_tree();
            let path = TreePath::from_steps(vec![
                PathStep::ToParent,
                PathStep::ToParent,
                PathStep::ToChildAtIndex(1),
            ]);
            assert_eq!(path.walk_fixed(&tree, leaf), Some(b));

            let down = TreePath::from_steps(vec![PathStep::ToChildAtIndex(0)]);
            assert_eq!(down.walk_fixed(&tree, a), Some(leaf));
        }

        #[test]
        fn test_walk_off_the_root_is_none() {
            let (tree, root, _, _, _) = small_tree();
            let path = TreePath::from_steps(vec![PathStep::ToParent]);
            assert_eq!(path.walk_fixed(&tree, root), None);
        }

        #[test]
        fn test_child_index_out_of_range_is_none() {
            let (tree, root, _, _, _) = small_tree();
            let path = TreePath::from_steps(vec![PathStep::ToChildAtIndex(5)]);
            assert_eq!(path.walk_fixed(&tree, root), None);
        }
    }

    mod free_walk_tests {
        use super::*;

        #[test]
        fn test_child_step_fans_out_over_all_children() {
            let (tree, root, a, b, _) = small_tree();
            let path = TreePath::from_steps(vec![PathStep::ToChildAtIndex(0)]);
            assert_eq!(path.walk_free(&tree, root), vec![a, b]);
        }

        #[test]
        fn test_down_then_up_dedups_to_single_origin() {
            let (tree, root, _, _, _) = small_tree();
            let path =
                TreePath::from_steps(vec![PathStep::ToChildAtIndex(0), PathStep::ToParent]);
            assert_eq!(path.walk_free(&tree, root), vec![root]);
        }

        #[test]
        fn test_exhausted_branch_yields_empty_frontier() {
            let (tree, _, _, b, _) = small_tree();
            let path = TreePath::from_steps(vec![PathStep::ToChildAtIndex(0)]);
            assert!(path.walk_free(&tree, b).is_empty());
        }

        #[test]
        fn test_parent_step_matches_fixed_walk() {
            let (tree, root, a, _, leaf) = small_tree();
            let path = TreePath::from_steps(vec![PathStep::ToParent]);
            assert_eq!(path.walk_free(&tree, leaf), vec![a]);
            assert_eq!(path.walk_free(&tree, a), vec![root]);
        }
    }

    mod enumeration_tests {
        use super::*;

        #[test]
        fn test_empty_path_comes_first() {
            let (tree, _, a, _, _) = small_tree();
            let first = PathsFromNode::new(&tree, a, SearchLimits::default())
                .next()
                .unwrap();
            assert!(first.path.is_empty());
            assert_eq!(first.node, a);
        }

        #[test]
        fn test_visits_every_node_once_in_bfs_order() {
            let (tree, root, a, b, leaf) = small_tree();
            let items: Vec<PathWithNode> =
                PathsFromNode::new(&tree, leaf, SearchLimits::default()).collect();

            let nodes: Vec<NodeId> = items.iter().map(|item| item.node).collect();
            assert_eq!(nodes, vec![leaf, a, root, b]);

            let lengths: Vec<usize> = items.iter().map(|item| item.path.len()).collect();
            assert!(lengths.windows(2).all(|pair| pair[0] <= pair[1]));
        }

        #[test]
        fn test_fixed_walk_recovers_each_enumerated_node() {
            let (tree, _, _, _, leaf) = small_tree();
            for item in PathsFromNode::new(&tree, leaf, SearchLimits::default()) {
                assert_eq!(item.path.walk_fixed(&tree, leaf), Some(item.node));
            }
        }

        #[test]
        fn test_max_paths_caps_enumeration() {
            let (tree, root, _, _, _) = small_tree();
            let limits = SearchLimits::default().with_max_paths(2);
            let count = PathsFromNode::new(&tree, root, limits).count();
            assert_eq!(count, 2);
        }

        #[test]
        fn test_max_path_length_prunes_deep_paths() {
            let (tree, _, _, _, leaf) = small_tree();
            let limits = SearchLimits::default().with_max_path_length(1);
            let items: Vec<PathWithNode> = PathsFromNode::new(&tree, leaf, limits).collect();
            assert!(items.iter().all(|item| item.path.len() <= 1));
            // the sibling two steps away is out of reach
            assert_eq!(items.len(), 2);
        }
    }
}
