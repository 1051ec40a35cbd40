//! Locator Demo - Unequivocal Element Addressing
//!
//! Demonstrates synthesizing locators for elements of a UI snapshot:
//! the widening search, ddmin reduction and the two consumption modes of
//! the assembled matcher expression.
//!
//! # Running
//!
//! ```bash
//! cargo run --example locator_demo -p ubicar
//! ```

#![allow(clippy::uninlined_format_args, clippy::unwrap_used)]

use ubicar::{
    synthesize_locator, Cancellation, NodeId, SearchLimits, ViewAttributes, ViewTree,
    ViewTreeBuilder,
};

fn main() {
    println!("=== Ubicar Locator Demo ===\n");

    let (tree, yes, no, field) = dialog_snapshot();

    demo_local_attribute(&tree, yes, no);
    demo_ancestor_constraint(&tree, field);
    demo_serialization(&tree, yes);

    println!("\n=== Locator Demo Complete ===");
}

/// A dialog with two confirm buttons sharing an identifier, plus an input
/// field that only its panel can disambiguate.
fn dialog_snapshot() -> (ViewTree, NodeId, NodeId, NodeId) {
    let mut builder = ViewTreeBuilder::new(ViewAttributes::new().with_class_name("Window"));
    let root = builder.root();

    let panel = builder.add_child(
        root,
        ViewAttributes::new()
            .with_resource_name("panel_login")
            .with_class_name("Panel"),
    );
    let field = builder.add_child(panel, ViewAttributes::new().with_class_name("EditText"));

    let bar = builder.add_child(root, ViewAttributes::new().with_class_name("Panel"));
    builder.add_child(bar, ViewAttributes::new().with_class_name("EditText"));

    let yes = builder.add_child(
        bar,
        ViewAttributes::new().with_identifier("confirm").with_text("Yes"),
    );
    let no = builder.add_child(
        bar,
        ViewAttributes::new().with_identifier("confirm").with_text("No"),
    );

    (builder.build(), yes, no, field)
}

fn demo_local_attribute(tree: &ViewTree, yes: NodeId, no: NodeId) {
    println!("--- Demo 1: Local Attributes Win ---\n");

    for (name, target) in [("Yes", yes), ("No", no)] {
        let locator =
            synthesize_locator(tree, target, SearchLimits::default(), &Cancellation::none())
                .unwrap();
        println!("{} button: {}", name, locator.to_code());
        println!("  constraints after reduction: {}", locator.combination().len());
        assert_eq!(locator.select(tree), vec![target]);
    }
    println!();
}

fn demo_ancestor_constraint(tree: &ViewTree, field: NodeId) {
    println!("--- Demo 2: Ancestor Constraints ---\n");

    let locator =
        synthesize_locator(tree, field, SearchLimits::default(), &Cancellation::none()).unwrap();
    println!("login field: {}", locator.to_code());
    assert_eq!(locator.select(tree), vec![field]);
    println!();
}

fn demo_serialization(tree: &ViewTree, yes: NodeId) {
    println!("--- Demo 3: Locator as Data ---\n");

    let locator =
        synthesize_locator(tree, yes, SearchLimits::default(), &Cancellation::none()).unwrap();
    let json = serde_json::to_string_pretty(locator.matcher()).unwrap();
    println!("matcher as JSON:\n{}", json);
}
