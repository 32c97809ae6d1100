//! Integration tests for Tracegraph
//!
//! These tests drive the graph store and the layered layout together
//! through graph documents on disk.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;
use tracegraph_core::{
    CommandScript, EngineConfig, Expansion, GraphDocument, GraphNode, GraphStore, NodeId,
    Position, RevealState,
};
use tracegraph_layout::{LongestPathLayout, layout_nodes, layout_store};

fn id(address: &str) -> NodeId {
    NodeId::new(address).unwrap()
}

fn origin_store(address: &str) -> GraphStore {
    let nodes = vec![GraphNode::new(id(address), Position::default())];
    GraphStore::from_parts(nodes, Vec::new(), EngineConfig::default()).unwrap()
}

fn owned(paths: &[&[&str]]) -> Vec<Vec<String>> {
    paths
        .iter()
        .map(|p| p.iter().map(|a| a.to_string()).collect())
        .collect()
}

/// Expand, lay out, save, reload: the document carries everything over.
#[test]
fn test_expand_layout_document_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("graph.json");

    let mut store = origin_store("0xORIGIN");
    store
        .expand(&Expansion::incoming(owned(&[
            &["0xorigin", "0xa", "0xb"],
            &["0xorigin", "0xc"],
        ])))
        .unwrap();
    store
        .expand(&Expansion::outgoing(owned(&[&["0xorigin", "0xd"]])))
        .unwrap();
    layout_store(&mut store, &LongestPathLayout).unwrap();
    GraphDocument::from_store(&store).save(&path).unwrap();

    let document = GraphDocument::load(&path).unwrap();
    assert_eq!(document.nodes.len(), 5);
    assert_eq!(document.edges.len(), 4);
    assert_eq!(document, GraphDocument::from_store(&store));

    let reloaded =
        GraphStore::from_parts(document.nodes, document.edges, EngineConfig::default()).unwrap();
    assert_eq!(reloaded.nodes(), store.nodes());

    // Incoming flow b -> a -> origin -> d reads left to right after layout.
    let x = |a: &str| reloaded.node(&id(a)).unwrap().position.x;
    assert!(x("0xb") < x("0xa"));
    assert!(x("0xa") < x("0xorigin"));
    assert!(x("0xorigin") < x("0xd"));
}

/// Layout leaves a hidden edge's endpoints unconstrained but keeps the edge.
#[test]
fn test_layout_ignores_hidden_edges() {
    let mut store = origin_store("0xorigin");
    store
        .expand(&Expansion::outgoing(owned(&[&["0xorigin", "0xa", "0xb"]])))
        .unwrap();
    let hidden = store
        .edges()
        .iter()
        .find(|e| e.source == id("0xa"))
        .map(|e| e.id.clone())
        .unwrap();
    let (state, _) = store.toggle_edge(&hidden).unwrap();
    assert_eq!(state, RevealState::Hidden);

    let (nodes, edges) = layout_nodes(
        store.nodes(),
        store.edges(),
        &LongestPathLayout,
        &store.config().layout,
    )
    .unwrap();
    assert_eq!(edges.len(), 2);

    // Without the hidden edge, b has no predecessor and sits in the first rank.
    let by_id = |a: &str| nodes.iter().find(|n| n.id == id(a)).unwrap().position;
    assert_eq!(by_id("0xb").x, by_id("0xorigin").x);
    assert!(by_id("0xa").x > by_id("0xorigin").x);
}

/// A script replayed against a saved document lands in the expected state.
#[test]
fn test_script_replay_with_undo() {
    let temp_dir = TempDir::new().unwrap();
    let script_path = temp_dir.path().join("script.json");
    std::fs::write(
        &script_path,
        r#"[
  { "command": "expand", "paths": [["0xO", "0xA"]], "incoming": false },
  { "command": "expand", "paths": [["0xO", "0xB"]], "incoming": false },
  { "command": "undo" },
  { "command": "set_highlight", "id": "0xA", "highlight": true }
]"#,
    )
    .unwrap();

    let CommandScript(commands) =
        tracegraph_core::document::load_json(&script_path).unwrap();
    let mut store = origin_store("0xo");
    for command in commands {
        store.apply(command).unwrap();
    }

    assert_eq!(store.nodes().len(), 2);
    assert!(store.node(&id("0xb")).is_none());
    assert!(store.node(&id("0xa")).unwrap().data.highlight);
    // Highlighting does not change counts, so the redo branch survives.
    assert!(store.can_redo());
}

/// Random expansions followed by layout never lose or duplicate records.
#[test]
fn test_random_expansions_then_layout() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut store = origin_store("0xroot");

        for _ in 0..8 {
            let anchor = {
                let nodes = store.nodes();
                nodes[rng.random_range(0..nodes.len())].id.to_string()
            };
            let hops = rng.random_range(1..4);
            let path: Vec<String> = std::iter::once(anchor)
                .chain((0..hops).map(|_| format!("0x{:x}", rng.random_range(0..24u32))))
                .collect();
            let incoming = rng.random_bool(0.5);
            let expansion = if incoming {
                Expansion::incoming(vec![path])
            } else {
                Expansion::outgoing(vec![path])
            };
            store.expand(&expansion).unwrap();
        }

        let node_count = store.nodes().len();
        let edge_count = store.edges().len();
        layout_store(&mut store, &LongestPathLayout).unwrap();

        assert_eq!(store.nodes().len(), node_count, "seed {seed}");
        assert_eq!(store.edges().len(), edge_count, "seed {seed}");
        for edge in store.edges() {
            assert!(store.node(&edge.source).is_some(), "seed {seed}");
            assert!(store.node(&edge.target).is_some(), "seed {seed}");
            assert!(edge.handles.is_some(), "seed {seed}");
        }
    }
}
