//! Locator expressions: nested matchers assembled from a flat combination.
//!
//! A [`Matcher`] is a plain, closed expression tree with two consumption
//! modes: evaluate it against a live tree to physically find the element
//! ([`Matcher::matches`] / [`Matcher::select`]), or serialize it into a
//! portable automation-script expression ([`Matcher::to_code`]). The
//! [`assemble`] fold turns the flat constraint list of a [`Combination`]
//! into one such expression; [`synthesize_locator`] runs the whole
//! pipeline: build, minimize, assemble.

use serde::{Deserialize, Serialize};

use crate::builder::CombinationBuilder;
use crate::cancel::Cancellation;
use crate::constraint::{Combination, ConstraintKind};
use crate::minimize::minimize;
use crate::path::{PathStep, SearchLimits, TreePath};
use crate::tree::{NodeId, ViewTree};

/// A nested matcher expression over one UI snapshot.
///
/// Leaf variants test a single node property; recursive variants impose
/// constraints on other parts of the hierarchy. `WithChild`'s index is a
/// grouping key from assembly only: evaluation quantifies over every
/// child, mirroring the free walk the uniqueness proof was done with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Matcher {
    /// Matches the tree's root
    IsRoot,
    /// Matches nodes with this resource entry name
    WithResourceName(String),
    /// Matches nodes with this identifier
    WithIdentifier(String),
    /// Matches nodes with this visible text
    WithText(String),
    /// Matches nodes with this content description
    WithContentDescription(String),
    /// Matches nodes with this class name
    WithClassName(String),
    /// Matches nodes satisfying every inner matcher
    AllOf(Vec<Matcher>),
    /// Matches nodes satisfying at least one inner matcher
    AnyOf(Vec<Matcher>),
    /// Matches nodes whose parent satisfies every inner matcher
    WithParent(Vec<Matcher>),
    /// Matches nodes with some child satisfying every inner matcher
    WithChild {
        /// Position of the child the constraints were captured from
        index: usize,
        /// Constraints on that child
        matchers: Vec<Matcher>,
    },
}

impl Matcher {
    /// AND-combine a matcher list, collapsing a single element to itself
    #[must_use]
    pub fn all_of(mut matchers: Vec<Matcher>) -> Self {
        if matchers.len() == 1 {
            matchers.remove(0)
        } else {
            Self::AllOf(matchers)
        }
    }

    /// Whether `node` satisfies this expression
    #[must_use]
    pub fn matches(&self, tree: &ViewTree, node: NodeId) -> bool {
        match self {
            Self::IsRoot => !tree.has_parent(node),
            Self::WithResourceName(value) => {
                attribute_equals(ConstraintKind::WithResourceName, tree, node, value)
            }
            Self::WithIdentifier(value) => {
                attribute_equals(ConstraintKind::WithIdentifier, tree, node, value)
            }
            Self::WithText(value) => attribute_equals(ConstraintKind::WithText, tree, node, value),
            Self::WithContentDescription(value) => {
                attribute_equals(ConstraintKind::WithContentDescription, tree, node, value)
            }
            Self::WithClassName(value) => {
                attribute_equals(ConstraintKind::WithClassName, tree, node, value)
            }
            Self::AllOf(matchers) => matchers.iter().all(|matcher| matcher.matches(tree, node)),
            Self::AnyOf(matchers) => matchers.iter().any(|matcher| matcher.matches(tree, node)),
            Self::WithParent(matchers) => tree.parent_of(node).is_some_and(|parent| {
                matchers.iter().all(|matcher| matcher.matches(tree, parent))
            }),
            Self::WithChild { matchers, .. } => tree.children_of(node).iter().any(|&child| {
                matchers.iter().all(|matcher| matcher.matches(tree, child))
            }),
        }
    }

    /// All nodes of `tree` satisfying this expression, in arena order
    #[must_use]
    pub fn select(&self, tree: &ViewTree) -> Vec<NodeId> {
        tree.node_ids()
            .filter(|&node| self.matches(tree, node))
            .collect()
    }

    /// Serialize into a portable automation-script expression.
    ///
    /// Single-element `AllOf`/`AnyOf` groups collapse to their only
    /// operand; string values are quote-escaped.
    #[must_use]
    pub fn to_code(&self) -> String {
        match self {
            Self::IsRoot => "isRoot()".to_string(),
            Self::WithResourceName(value) => format!("withResourceName({value:?})"),
            Self::WithIdentifier(value) => format!("withId({value:?})"),
            Self::WithText(value) => format!("withText({value:?})"),
            Self::WithContentDescription(value) => {
                format!("withContentDescription({value:?})")
            }
            Self::WithClassName(value) => format!("withClassName({value:?})"),
            Self::AllOf(matchers) => group_code("allOf", matchers),
            Self::AnyOf(matchers) => group_code("anyOf", matchers),
            Self::WithParent(matchers) => {
                format!("withParent({})", group_code("allOf", matchers))
            }
            Self::WithChild { matchers, .. } => {
                format!("withChild({})", group_code("allOf", matchers))
            }
        }
    }
}

fn attribute_equals(kind: ConstraintKind, tree: &ViewTree, node: NodeId, value: &str) -> bool {
    kind.value_of(tree, node).as_deref() == Some(value)
}

fn group_code(name: &str, matchers: &[Matcher]) -> String {
    if matchers.len() == 1 {
        return matchers[0].to_code();
    }
    let inner: Vec<String> = matchers.iter().map(Matcher::to_code).collect();
    format!("{name}({})", inner.join(", "))
}

/// Fold a flat combination into one nested matcher expression.
///
/// Empty-path constraints attach to the target's own predicate; constraints
/// sharing a `ToParent` first step merge into a single `WithParent` node and
/// constraints sharing the same `ToChildAtIndex` first step merge into a
/// single `WithChild` node, both assembled recursively from the path tails.
#[must_use]
pub fn assemble(combination: &Combination) -> Matcher {
    let items: Vec<(TreePath, ConstraintKind, String)> = combination
        .constraints()
        .iter()
        .map(|constraint| {
            (
                constraint.path.clone(),
                constraint.kind,
                constraint.value.clone(),
            )
        })
        .collect();
    Matcher::all_of(assemble_group(items))
}

fn assemble_group(items: Vec<(TreePath, ConstraintKind, String)>) -> Vec<Matcher> {
    let mut local = Vec::new();
    let mut parent_items = Vec::new();
    let mut child_groups: Vec<(usize, Vec<(TreePath, ConstraintKind, String)>)> = Vec::new();

    for (path, kind, value) in items {
        match path.head() {
            None => local.push(leaf(kind, value)),
            Some(PathStep::ToParent) => parent_items.push((path.tail(), kind, value)),
            Some(PathStep::ToChildAtIndex(index)) => {
                let tail = (path.tail(), kind, value);
                match child_groups.iter_mut().find(|(key, _)| *key == index) {
                    Some((_, group)) => group.push(tail),
                    None => child_groups.push((index, vec![tail])),
                }
            }
        }
    }

    if !parent_items.is_empty() {
        local.push(Matcher::WithParent(assemble_group(parent_items)));
    }
    for (index, group) in child_groups {
        local.push(Matcher::WithChild {
            index,
            matchers: assemble_group(group),
        });
    }
    local
}

fn leaf(kind: ConstraintKind, value: String) -> Matcher {
    match kind {
        ConstraintKind::IsRoot => Matcher::IsRoot,
        ConstraintKind::WithResourceName => Matcher::WithResourceName(value),
        ConstraintKind::WithIdentifier => Matcher::WithIdentifier(value),
        ConstraintKind::WithText => Matcher::WithText(value),
        ConstraintKind::WithContentDescription => Matcher::WithContentDescription(value),
        ConstraintKind::WithClassName => Matcher::WithClassName(value),
    }
}

/// An unequivocal, minimized locator for one element of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    combination: Combination,
    matcher: Matcher,
}

impl Locator {
    /// The minimized flat combination behind this locator
    #[must_use]
    pub const fn combination(&self) -> &Combination {
        &self.combination
    }

    /// The assembled matcher expression
    #[must_use]
    pub const fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Whether `node` satisfies this locator
    #[must_use]
    pub fn matches(&self, tree: &ViewTree, node: NodeId) -> bool {
        self.matcher.matches(tree, node)
    }

    /// All nodes of `tree` satisfying this locator
    #[must_use]
    pub fn select(&self, tree: &ViewTree) -> Vec<NodeId> {
        self.matcher.select(tree)
    }

    /// Portable automation-script expression for this locator
    #[must_use]
    pub fn to_code(&self) -> String {
        self.matcher.to_code()
    }
}

/// Run the full synthesis pipeline for one target node.
///
/// Builds an unequivocal combination, reduces it to a local minimum and
/// assembles the matcher expression. Returns `None` when no unequivocal
/// combination exists within the limits, or the budget expired first.
/// Callers skip such elements; this is never a fatal condition and is
/// logged at debug severity only.
#[must_use]
pub fn synthesize_locator(
    tree: &ViewTree,
    target: NodeId,
    limits: SearchLimits,
    cancellation: &Cancellation,
) -> Option<Locator> {
    let built = CombinationBuilder::new(tree, target)
        .with_limits(limits)
        .with_cancellation(cancellation.clone())
        .build();

    match built {
        Ok(combination) => {
            let combination = minimize(tree, combination, cancellation);
            let matcher = assemble(&combination);
            Some(Locator {
                combination,
                matcher,
            })
        }
        Err(error) => {
            tracing::debug!(
                target_index = target.index(),
                %error,
                "skipping element without unequivocal locator"
            );
            None
        }
    }
}
