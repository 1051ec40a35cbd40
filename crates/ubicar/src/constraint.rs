//! Constraint kinds, single constraints and constraint combinations.
//!
//! The catalog is a closed, ordered list of kinds. The order encodes a
//! stability preference: kinds least likely to change across incidental UI
//! re-layout come first, so the builder tries them first.

use serde::{Deserialize, Serialize};

use crate::path::TreePath;
use crate::tree::{NodeId, ViewTree};

/// The closed set of constraint kinds, one per comparable node property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// The node is the tree's root
    IsRoot,
    /// The node's resource entry name equals the captured value
    WithResourceName,
    /// The node's identifier equals the captured value
    WithIdentifier,
    /// The node's visible text equals the captured value
    WithText,
    /// The node's content description equals the captured value
    WithContentDescription,
    /// The node's class name equals the captured value
    WithClassName,
}

/// Catalog of kinds in fixed priority order.
///
/// `IsRoot` comes first and short-circuits the rest for the root node.
pub const CATALOG_PRIORITY: [ConstraintKind; 6] = [
    ConstraintKind::IsRoot,
    ConstraintKind::WithResourceName,
    ConstraintKind::WithIdentifier,
    ConstraintKind::WithText,
    ConstraintKind::WithContentDescription,
    ConstraintKind::WithClassName,
];

impl ConstraintKind {
    /// The attribute this kind compares, absent for empty strings
    fn attribute<'t>(self, tree: &'t ViewTree, node: NodeId) -> Option<&'t str> {
        let attributes = tree.attributes(node);
        let value = match self {
            Self::IsRoot => return None,
            Self::WithResourceName => attributes.resource_name.as_deref(),
            Self::WithIdentifier => attributes.identifier.as_deref(),
            Self::WithText => attributes.text.as_deref(),
            Self::WithContentDescription => attributes.content_description.as_deref(),
            Self::WithClassName => attributes.class_name.as_deref(),
        };
        value.filter(|value| !value.is_empty())
    }

    /// Whether this kind can constrain `node` at all
    #[must_use]
    pub fn is_applicable(self, tree: &ViewTree, node: NodeId) -> bool {
        match self {
            Self::IsRoot => !tree.has_parent(node),
            _ => self.attribute(tree, node).is_some(),
        }
    }

    /// The comparison value captured for `node`, `None` when inapplicable.
    ///
    /// Used purely for equality comparison, never for display; `IsRoot`
    /// carries an empty value because root-ness is the whole comparison.
    #[must_use]
    pub fn value_of(self, tree: &ViewTree, node: NodeId) -> Option<String> {
        match self {
            Self::IsRoot => (!tree.has_parent(node)).then(String::new),
            _ => self.attribute(tree, node).map(str::to_owned),
        }
    }
}

/// One structural/attribute constraint, anchored by a relative path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Which property is compared
    pub kind: ConstraintKind,
    /// Path from the node the constraint is attached to
    pub path: TreePath,
    /// Comparison value captured at synthesis time
    pub value: String,
}

impl Constraint {
    /// Create a constraint from its parts
    #[must_use]
    pub fn new(kind: ConstraintKind, path: TreePath, value: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            value: value.into(),
        }
    }

    /// Whether `origin` can satisfy this constraint.
    ///
    /// The path is walked with the free walk: the constraint holds if any
    /// node on the frontier is applicable for the kind and carries an equal
    /// value. Walking from the real target along its own paths always
    /// succeeds; walking from an impostor may not.
    #[must_use]
    pub fn holds_from(&self, tree: &ViewTree, origin: NodeId) -> bool {
        self.path.walk_free(tree, origin).into_iter().any(|node| {
            self.kind.value_of(tree, node).as_deref() == Some(self.value.as_str())
        })
    }
}

/// Nodes of `ambiguous` that still satisfy `constraint`.
///
/// Pure: returns a new, order-preserving list each call.
#[must_use]
pub(crate) fn survivors(
    tree: &ViewTree,
    ambiguous: &[NodeId],
    constraint: &Constraint,
) -> Vec<NodeId> {
    ambiguous
        .iter()
        .copied()
        .filter(|&candidate| constraint.holds_from(tree, candidate))
        .collect()
}

/// An ordered list of constraints, all anchored at one target node of one
/// tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    target: NodeId,
    constraints: Vec<Constraint>,
}

impl Combination {
    /// An empty combination for `target`
    #[must_use]
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            constraints: Vec::new(),
        }
    }

    /// A combination from an explicit constraint list
    #[must_use]
    pub fn from_constraints(target: NodeId, constraints: Vec<Constraint>) -> Self {
        Self {
            target,
            constraints,
        }
    }

    /// The node this combination identifies
    #[must_use]
    pub const fn target(&self) -> NodeId {
        self.target
    }

    /// The constraints, in commit order
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of constraints
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether the combination has no constraints
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub(crate) fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Whether this combination distinguishes the target from every other
    /// node of `tree`.
    ///
    /// Evaluated against the full node set: a combination carries no meaning
    /// outside the tree it was built for.
    #[must_use]
    pub fn is_unequivocal(&self, tree: &ViewTree) -> bool {
        let mut ambiguous: Vec<NodeId> =
            tree.node_ids().filter(|&node| node != self.target).collect();
        for constraint in &self.constraints {
            if ambiguous.is_empty() {
                break;
            }
            ambiguous = survivors(tree, &ambiguous, constraint);
        }
        ambiguous.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathStep;
    use crate::tree::{ViewAttributes, ViewTreeBuilder};

    /// Two sibling buttons sharing an identifier, differing in text.
    fn sibling_buttons() -> (ViewTree, NodeId, NodeId, NodeId) {
        let mut builder = ViewTreeBuilder::new(ViewAttributes::new().with_class_name("Frame"));
        let root = builder.root();
        let yes = builder.add_child(
            root,
            ViewAttributes::new().with_identifier("btn").with_text("Yes"),
        );
        let no = builder.add_child(
            root,
            ViewAttributes::new().with_identifier("btn").with_text("No"),
        );
        (builder.build(), root, yes, no)
    }

    mod catalog_tests {
        use super::*;

        #[test]
        fn test_priority_order_is_fixed() {
            assert_eq!(CATALOG_PRIORITY[0], ConstraintKind::IsRoot);
            assert_eq!(CATALOG_PRIORITY[1], ConstraintKind::WithResourceName);
            assert_eq!(CATALOG_PRIORITY[5], ConstraintKind::WithClassName);
        }

        #[test]
        fn test_is_root_only_applicable_to_root() {
            let (tree, root, yes, _) = sibling_buttons();
            assert!(ConstraintKind::IsRoot.is_applicable(&tree, root));
            assert!(!ConstraintKind::IsRoot.is_applicable(&tree, yes));
            assert_eq!(ConstraintKind::IsRoot.value_of(&tree, yes), None);
        }

        #[test]
        fn test_absent_attribute_is_inapplicable() {
            let (tree, root, yes, _) = sibling_buttons();
            assert!(!ConstraintKind::WithText.is_applicable(&tree, root));
            assert!(ConstraintKind::WithText.is_applicable(&tree, yes));
            assert!(!ConstraintKind::WithResourceName.is_applicable(&tree, yes));
        }

        #[test]
        fn test_empty_string_attribute_is_inapplicable() {
            let mut builder = ViewTreeBuilder::new(ViewAttributes::new());
            let root = builder.root();
            let child = builder.add_child(root, ViewAttributes::new().with_text(""));
            let tree = builder.build();
            assert!(!ConstraintKind::WithText.is_applicable(&tree, child));
            assert_eq!(ConstraintKind::WithText.value_of(&tree, child), None);
        }

        #[test]
        fn test_value_of_returns_the_attribute() {
            let (tree, _, yes, _) = sibling_buttons();
            assert_eq!(
                ConstraintKind::WithText.value_of(&tree, yes).as_deref(),
                Some("Yes")
            );
            assert_eq!(
                ConstraintKind::WithIdentifier.value_of(&tree, yes).as_deref(),
                Some("btn")
            );
        }
    }

    mod constraint_tests {
        use super::*;

        #[test]
        fn test_local_constraint_holds_from_matching_node_only() {
            let (tree, root, yes, no) = sibling_buttons();
            let constraint =
                Constraint::new(ConstraintKind::WithText, TreePath::empty(), "Yes");
            assert!(constraint.holds_from(&tree, yes));
            assert!(!constraint.holds_from(&tree, no));
            assert!(!constraint.holds_from(&tree, root));
        }

        #[test]
        fn test_child_constraint_fans_out_over_every_child() {
            let (tree, root, yes, no) = sibling_buttons();
            // Anchored at the root, "some child has text Yes" holds even
            // though the stored index points at the other sibling.
            let constraint = Constraint::new(
                ConstraintKind::WithText,
                TreePath::from_steps(vec![PathStep::ToChildAtIndex(1)]),
                "Yes",
            );
            assert!(constraint.holds_from(&tree, root));
            assert!(!constraint.holds_from(&tree, yes));
            assert!(!constraint.holds_from(&tree, no));
        }

        #[test]
        fn test_shared_identifier_holds_from_both_siblings() {
            let (tree, _, yes, no) = sibling_buttons();
            let constraint =
                Constraint::new(ConstraintKind::WithIdentifier, TreePath::empty(), "btn");
            assert!(constraint.holds_from(&tree, yes));
            assert!(constraint.holds_from(&tree, no));
        }
    }

    mod combination_tests {
        use super::*;

        #[test]
        fn test_shared_identifier_is_equivocal() {
            let (tree, _, yes, _) = sibling_buttons();
            let combination = Combination::from_constraints(
                yes,
                vec![Constraint::new(
                    ConstraintKind::WithIdentifier,
                    TreePath::empty(),
                    "btn",
                )],
            );
            assert!(!combination.is_unequivocal(&tree));
        }

        #[test]
        fn test_distinct_text_is_unequivocal() {
            let (tree, _, yes, _) = sibling_buttons();
            let combination = Combination::from_constraints(
                yes,
                vec![Constraint::new(
                    ConstraintKind::WithText,
                    TreePath::empty(),
                    "Yes",
                )],
            );
            assert!(combination.is_unequivocal(&tree));
        }

        #[test]
        fn test_empty_combination_is_equivocal() {
            let (tree, _, yes, _) = sibling_buttons();
            assert!(!Combination::new(yes).is_unequivocal(&tree));
        }

        #[test]
        fn test_survivors_is_order_preserving() {
            let (tree, root, yes, no) = sibling_buttons();
            let constraint =
                Constraint::new(ConstraintKind::WithIdentifier, TreePath::empty(), "btn");
            let remaining = survivors(&tree, &[root, no, yes], &constraint);
            assert_eq!(remaining, vec![no, yes]);
        }
    }
}
