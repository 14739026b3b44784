//! Headless walkthrough of the tree-dnd engine: builds two trees, replays a
//! scripted gesture sequence through the registry (reorder, nest, a policy
//! rejection, a cross-tree drag) and prints the structure after each step.

use anyhow::{Context, Result};
use serde_json::json;
use tree_dnd_drag::TreeRegistry;
use tree_dnd_model::{TreeChange, TreeIdentifier, TreeNode};

fn documents() -> TreeIdentifier {
    TreeIdentifier::new(
        "documents",
        vec![
            TreeNode::directory("src", "src")
                .expanded(true)
                .child(TreeNode::leaf("main", "main.rs"))
                .child(TreeNode::leaf("lib", "lib.rs")),
            TreeNode::directory("archive", "archive"),
            TreeNode::leaf("readme", "README.md").with_data(json!({ "pinned": true })),
            TreeNode::leaf("todo", "TODO.md"),
        ],
    )
}

fn palette() -> TreeIdentifier {
    TreeIdentifier::new(
        "palette",
        vec![
            TreeNode::leaf("snippet", "snippet.rs"),
            TreeNode::leaf("license", "LICENSE"),
        ],
    )
}

fn show(step: &str, registry: &TreeRegistry, tree_id: &str) {
    println!("== {step} ==");
    if let Some(tree) = registry.tree(tree_id) {
        print!("{}", tree.dump());
    }
    println!();
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut registry = TreeRegistry::new();
    registry.register(documents()).set_policy(|node, target| {
        // the archive is read-only for foreign payloads
        if target.node_id == "archive" {
            return None;
        }
        node.cloned().map(|accepted| vec![accepted])
    });
    registry.register(palette());

    show("initial", &registry, "documents");

    // reorder two root-level siblings
    let readme = registry
        .tree("documents")
        .and_then(|tree| tree.find("readme"))
        .cloned()
        .context("readme missing from the documents tree")?;
    registry.drag_start("documents", readme, false);
    registry.drag_over("documents", "todo", 0.9);
    registry.commit_drop("documents");
    show("README.md dragged below TODO.md", &registry, "documents");

    // nest a file into a collapsed directory: the middle band means Inside
    let todo = registry
        .tree("documents")
        .and_then(|tree| tree.find("todo"))
        .cloned()
        .context("todo missing from the documents tree")?;
    registry.drag_start("documents", todo, false);
    registry.drag_over("documents", "archive", 0.5);
    registry.commit_drop("documents");
    show("TODO.md dropped into archive/", &registry, "documents");

    // a directory can never land inside its own subtree
    let src = registry
        .tree("documents")
        .and_then(|tree| tree.find("src"))
        .cloned()
        .context("src missing from the documents tree")?;
    registry.drag_start("documents", src, false);
    let accepted = registry.drag_over("documents", "main", 0.5);
    println!("src/ over its own child accepted: {accepted}");
    registry.drag_end("documents");
    show("after the refused gesture", &registry, "documents");

    // cross-tree: the host replays the palette payload as an external drag
    let payload = registry
        .tree("palette")
        .and_then(|tree| tree.find("snippet"))
        .cloned()
        .context("snippet missing from the palette")?;
    registry.drag_start("palette", payload.clone(), false);
    registry.drag_start("documents", payload, true);
    registry.drag_over("documents", "lib", 0.9);
    if registry.commit_drop("documents").is_some() {
        registry.drag_end("palette");
        registry
            .slot("palette")
            .apply(&TreeChange::remove("snippet"));
    }
    show("snippet.rs pulled over from the palette", &registry, "documents");
    show("palette afterwards", &registry, "palette");

    // the archive policy turns foreign payloads away
    let license = registry
        .tree("palette")
        .and_then(|tree| tree.find("license"))
        .cloned()
        .context("license missing from the palette")?;
    registry.drag_start("documents", license, true);
    let accepted = registry.drag_over("documents", "archive", 0.5);
    println!("LICENSE over archive/ accepted: {accepted}");
    registry.drag_end("documents");
    show("archive stays untouched", &registry, "documents");

    if let Some(tree) = registry.tree("documents") {
        println!("final documents tree as JSON:");
        println!("{}", serde_json::to_string_pretty(tree)?);
    }

    Ok(())
}
