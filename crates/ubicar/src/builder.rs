//! Widening search for an unequivocal constraint combination.
//!
//! The builder walks candidate paths outward from the target in
//! breadth-first order and commits every applicable constraint it meets,
//! shrinking the set of still-ambiguous nodes after each commit. The search
//! is greedy and monotone: committed constraints are permanent and nothing
//! backtracks. The result is unequivocal but usually verbose; reduction is
//! the minimizer's job.

use crate::cancel::Cancellation;
use crate::constraint::{survivors, Combination, Constraint, ConstraintKind, CATALOG_PRIORITY};
use crate::path::{PathsFromNode, SearchLimits, TreePath};
use crate::result::{UbicarError, UbicarResult};
use crate::tree::{NodeId, ViewTree};

/// Builds an unequivocal [`Combination`] for one target node of one tree.
#[derive(Debug)]
pub struct CombinationBuilder<'a> {
    tree: &'a ViewTree,
    target: NodeId,
    limits: SearchLimits,
    cancellation: Cancellation,
}

impl<'a> CombinationBuilder<'a> {
    /// Start a build for `target` within `tree`
    #[must_use]
    pub fn new(tree: &'a ViewTree, target: NodeId) -> Self {
        Self {
            tree,
            target,
            limits: SearchLimits::default(),
            cancellation: Cancellation::none(),
        }
    }

    /// Bound the candidate path enumeration
    #[must_use]
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Attach an externally supplied expiry signal, checked before each new
    /// candidate path
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Run the search.
    ///
    /// # Errors
    ///
    /// Returns [`UbicarError::LocatorUnsynthesizable`] when the bounded
    /// search space is exhausted, or the expiry signal fires, while some
    /// other node still satisfies every committed constraint. Callers treat
    /// this as "skip the element", never as a fatal condition.
    pub fn build(self) -> UbicarResult<Combination> {
        // A node without a parent is, by definition, the root: one
        // constraint identifies it.
        if !self.tree.has_parent(self.target) {
            return Ok(Combination::from_constraints(
                self.target,
                vec![Constraint::new(
                    ConstraintKind::IsRoot,
                    TreePath::empty(),
                    String::new(),
                )],
            ));
        }

        let mut combination = Combination::new(self.target);
        let mut ambiguous: Vec<NodeId> = self
            .tree
            .node_ids()
            .filter(|&node| node != self.target)
            .collect();

        'paths: for item in PathsFromNode::new(self.tree, self.target, self.limits) {
            if self.cancellation.is_expired() {
                break;
            }

            for kind in CATALOG_PRIORITY {
                if !kind.is_applicable(self.tree, item.node) {
                    continue;
                }
                let Some(value) = kind.value_of(self.tree, item.node) else {
                    continue;
                };
                let constraint = Constraint::new(kind, item.path.clone(), value);
                ambiguous = survivors(self.tree, &ambiguous, &constraint);
                combination.push(constraint);

                if ambiguous.is_empty() {
                    break 'paths;
                }
                if kind == ConstraintKind::IsRoot {
                    // Root-ness subsumes every other constraint on the root
                    // node; skip the remaining kinds for it.
                    break;
                }
            }
        }

        if ambiguous.is_empty() {
            tracing::debug!(
                node_count = self.tree.len(),
                constraint_count = combination.len(),
                "combination search reached uniqueness"
            );
            Ok(combination)
        } else {
            tracing::debug!(
                node_count = self.tree.len(),
                constraint_count = combination.len(),
                ambiguous_count = ambiguous.len(),
                "combination search exhausted without reaching uniqueness"
            );
            Err(UbicarError::LocatorUnsynthesizable)
        }
    }
}
