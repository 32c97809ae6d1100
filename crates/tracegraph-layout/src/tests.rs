//! Unit tests for tracegraph-layout module

use crate::*;
use tracegraph_core::{
    Dimensions, EdgeHandles, EngineConfig, GraphEdge, GraphNode, GraphStore, HandleSide,
    LayoutConfig, NodeDisplay, NodeId, Orientation, Position, RevealState,
};

fn id(address: &str) -> NodeId {
    NodeId::new(address).unwrap()
}

fn node(address: &str) -> GraphNode {
    GraphNode::new(id(address), Position::default())
}

fn revealed(source: &str, target: &str) -> GraphEdge {
    GraphEdge::new(id(source), id(target), 1.0, RevealState::Revealed)
}

fn centers(nodes: &[&str], edges: &[(&str, &str)], orientation: Orientation) -> LayoutResult {
    let config = LayoutConfig {
        orientation,
        ..LayoutConfig::default()
    };
    let nodes: Vec<GraphNode> = nodes.iter().map(|a| node(a)).collect();
    let edges: Vec<GraphEdge> = edges.iter().map(|(s, t)| revealed(s, t)).collect();
    LongestPathLayout
        .compute(&to_layout_graph(&nodes, &edges, &config))
        .unwrap()
}

fn center(result: &LayoutResult, address: &str) -> Position {
    result.centers[&id(address)]
}

#[test]
fn test_chain_ranks_left_to_right() {
    let result = centers(&["a", "b", "c"], &[("a", "b"), ("b", "c")], Orientation::LeftToRight);

    let (a, b, c) = (center(&result, "a"), center(&result, "b"), center(&result, "c"));
    // 200 wide nodes, 130 between ranks
    assert_eq!(b.x - a.x, 330.0);
    assert_eq!(c.x - b.x, 330.0);
    assert_eq!(a.y, b.y);
    assert_eq!(b.y, c.y);
}

#[test]
fn test_orientations() {
    let edges = [("a", "b")];

    let rl = centers(&["a", "b"], &edges, Orientation::RightToLeft);
    assert!(center(&rl, "b").x < center(&rl, "a").x);

    let tb = centers(&["a", "b"], &edges, Orientation::TopToBottom);
    let (a, b) = (center(&tb, "a"), center(&tb, "b"));
    // 50 high nodes, 130 between ranks
    assert_eq!(b.y - a.y, 180.0);
    assert_eq!(a.x, b.x);

    let bt = centers(&["a", "b"], &edges, Orientation::BottomToTop);
    assert!(center(&bt, "b").y < center(&bt, "a").y);
}

#[test]
fn test_siblings_do_not_overlap() {
    let result = centers(
        &["a", "b", "c", "d"],
        &[("a", "b"), ("a", "c"), ("a", "d")],
        Orientation::LeftToRight,
    );

    let mut ys: Vec<f64> = ["b", "c", "d"].iter().map(|n| center(&result, n).y).collect();
    ys.sort_by(f64::total_cmp);
    for pair in ys.windows(2) {
        assert!(pair[1] - pair[0] >= 50.0 + 80.0);
    }
    // Rank is centered on the axis
    assert_eq!(ys[0], -ys[2]);
}

#[test]
fn test_barycenter_orders_children_under_parents() {
    // Children inserted opposite to their parents' order.
    let result = centers(
        &["a", "b", "d", "c"],
        &[("a", "c"), ("b", "d")],
        Orientation::LeftToRight,
    );
    assert!(center(&result, "a").y < center(&result, "b").y);
    assert!(center(&result, "c").y < center(&result, "d").y);
}

#[test]
fn test_cycle_is_broken() {
    let result = centers(&["a", "b"], &[("a", "b"), ("b", "a")], Orientation::LeftToRight);
    assert_eq!(result.centers.len(), 2);
    assert_ne!(center(&result, "a").x, center(&result, "b").x);
}

#[test]
fn test_unknown_node_rejected() {
    let graph = LayoutGraph {
        nodes: vec![LayoutNode {
            id: id("a"),
            width: 200.0,
            height: 50.0,
        }],
        edges: vec![(id("a"), id("ghost"))],
        orientation: Orientation::LeftToRight,
        rank_separation: 130.0,
        node_separation: 80.0,
    };
    let err = LongestPathLayout.compute(&graph).unwrap_err();
    assert!(matches!(err, LayoutError::UnknownNode(n) if n == id("ghost")));
}

#[test]
fn test_empty_graph() {
    let graph = to_layout_graph(&[], &[], &LayoutConfig::default());
    assert!(LongestPathLayout.compute(&graph).unwrap().centers.is_empty());
}

#[test]
fn test_hidden_and_dangling_edges_do_not_participate() {
    let nodes = vec![node("a"), node("b")];
    let mut hidden = revealed("b", "a");
    hidden.data.state = RevealState::Hidden;
    let edges = vec![revealed("a", "b"), hidden, revealed("a", "ghost")];

    let graph = to_layout_graph(&nodes, &edges, &LayoutConfig::default());
    assert_eq!(graph.edges, vec![(id("a"), id("b"))]);
}

#[test]
fn test_measured_dimensions_override_defaults() {
    let mut wide = node("a");
    wide.dimensions = Some(Dimensions {
        width: 400.0,
        height: 90.0,
    });
    let graph = to_layout_graph(&[wide, node("b")], &[], &LayoutConfig::default());
    assert_eq!((graph.nodes[0].width, graph.nodes[0].height), (400.0, 90.0));
    assert_eq!((graph.nodes[1].width, graph.nodes[1].height), (200.0, 50.0));
}

#[test]
fn test_layout_graph_serialization() {
    let graph = to_layout_graph(
        &[node("0xA"), node("0xB")],
        &[revealed("0xA", "0xB")],
        &LayoutConfig::default(),
    );
    insta::assert_json_snapshot!(graph, @r###"
    {
      "nodes": [
        {
          "id": "0xa",
          "width": 200.0,
          "height": 50.0
        },
        {
          "id": "0xb",
          "width": 200.0,
          "height": 50.0
        }
      ],
      "edges": [
        [
          "0xa",
          "0xb"
        ]
      ],
      "orientation": "LR",
      "rank_separation": 130.0,
      "node_separation": 80.0
    }
    "###);
}

#[test]
fn test_layout_nodes_rewrites_positions_only() {
    let mut a = GraphNode::new(id("a"), Position::new(900.0, 900.0));
    a.data.highlight = true;
    a.data.state = NodeDisplay::Expanded;
    let b = GraphNode::new(id("b"), Position::new(-900.0, 0.0));
    let mut edge = revealed("a", "b");
    edge.handles = Some(EdgeHandles::for_positions(a.position, b.position));

    let (nodes, edges) =
        layout_nodes(&[a, b], &[edge], &LongestPathLayout, &LayoutConfig::default()).unwrap();

    // Center (100, 0) of a 200x50 box
    assert_eq!(nodes[0].position, Position::new(0.0, -25.0));
    assert_eq!(nodes[1].position, Position::new(330.0, -25.0));
    assert!(nodes[0].data.highlight);
    assert_eq!(nodes[0].data.state, NodeDisplay::Expanded);
    assert_eq!(nodes[0].data.address, "a");

    let handles = edges[0].handles.unwrap();
    assert_eq!(handles.source, HandleSide::Right);
    assert_eq!(handles.target, HandleSide::Left);
}

#[test]
fn test_layout_store_commits_positions() {
    let nodes = vec![node("a"), node("b"), node("c")];
    let edges = vec![revealed("a", "b"), revealed("a", "c")];
    let mut store = GraphStore::from_parts(nodes, edges, EngineConfig::default()).unwrap();

    let diff = layout_store(&mut store, &LongestPathLayout).unwrap();
    assert_eq!(diff.moved_nodes.len(), 3);

    let b = store.node(&id("b")).unwrap().position;
    let c = store.node(&id("c")).unwrap().position;
    assert_eq!(b.x, c.x);
    assert!((b.y - c.y).abs() >= 130.0);
    assert!(store.edges().iter().all(|e| e.handles.is_some()));

    // Positions alone do not change counts, so nothing new to undo.
    assert!(!store.can_undo());
}
