//! Ubicar: Unequivocal UI Element Locator Synthesis
//!
//! Ubicar (Spanish: "to locate") takes one immutable snapshot of a UI
//! hierarchy plus a target element and synthesizes the smallest set of
//! structural/attribute constraints that identifies that element uniquely
//! among all elements in the same snapshot. The result re-finds the element
//! at test-replay time or serializes into portable automation-script code.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      UBICAR Pipeline                             │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌──────────┐   ┌─────────────┐   ┌───────────┐   ┌──────────┐  │
//! │   │ ViewTree │──►│ Combination │──►│ Minimizer │──►│ Matcher  │  │
//! │   │ snapshot │   │ Builder     │   │ (ddmin)   │   │ assembly │  │
//! │   └──────────┘   └─────────────┘   └───────────┘   └──────────┘  │
//! │        widening search ──► local minimum ──► nested expression   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Synthesis is pure, synchronous computation over in-memory structures:
//! no I/O, no retries, deterministic per call. Elements that cannot be
//! uniquely addressed are skipped, never treated as fatal.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Widening search producing an unequivocal constraint combination
mod builder;
/// Cancellation/expiry signalling for budgeted synthesis
mod cancel;
/// Constraint kinds, single constraints and combinations
mod constraint;
/// Locator expressions, assembly and the synthesis pipeline
mod locator;
/// Delta-debugging reduction of a combination
mod minimize;
/// Relative paths and the two walk modes
mod path;
mod result;
/// Immutable arena model of one UI snapshot
mod tree;

pub use builder::CombinationBuilder;
pub use cancel::Cancellation;
pub use constraint::{Combination, Constraint, ConstraintKind, CATALOG_PRIORITY};
pub use locator::{assemble, synthesize_locator, Locator, Matcher};
pub use minimize::minimize;
pub use path::{PathStep, PathWithNode, PathsFromNode, SearchLimits, TreePath};
pub use result::{UbicarError, UbicarResult};
pub use tree::{NodeId, RawNode, RawSnapshot, ViewAttributes, ViewTree, ViewTreeBuilder};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::builder::*;
    pub use super::cancel::*;
    pub use super::constraint::*;
    pub use super::locator::*;
    pub use super::minimize::*;
    pub use super::path::*;
    pub use super::result::*;
    pub use super::tree::*;
}
