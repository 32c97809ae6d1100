//! Edge reveal lifecycle and focus-dependent visibility

use serde::{Deserialize, Serialize};

use crate::model::{EdgeData, GraphEdge, NodeId};

/// Whether an edge is drawn unconditionally or only next to the focused node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevealState {
    Hidden,
    Revealed,
}

impl RevealState {
    /// Explicit user toggle. The only way back from `Revealed` to `Hidden`.
    pub fn toggled(self) -> Self {
        match self {
            RevealState::Hidden => RevealState::Revealed,
            RevealState::Revealed => RevealState::Hidden,
        }
    }

    /// Merge rule: `Revealed` dominates `Hidden`.
    pub fn promote(self, incoming: RevealState) -> Self {
        self.max(incoming)
    }
}

impl EdgeData {
    /// Fold a duplicate edge's data into this one.
    ///
    /// Volume only ever grows and the state only ever promotes, so repeated
    /// merges of the same edge are monotone.
    pub fn absorb(&mut self, incoming: &EdgeData) {
        if incoming.volume > self.volume {
            self.volume = incoming.volume;
        }
        self.state = self.state.promote(incoming.state);
    }
}

/// Rendering contract: a hidden edge is drawn only when one of its endpoints
/// is the focused node, and not at all otherwise.
pub fn is_edge_visible(edge: &GraphEdge, focus: Option<&NodeId>) -> bool {
    match edge.data.state {
        RevealState::Revealed => true,
        RevealState::Hidden => focus.is_some_and(|f| edge.touches(f)),
    }
}

pub fn visible_edges<'a>(
    edges: &'a [GraphEdge],
    focus: Option<&'a NodeId>,
) -> impl Iterator<Item = &'a GraphEdge> + 'a {
    edges.iter().filter(move |e| is_edge_visible(e, focus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNRESOLVED_VOLUME;

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    #[test]
    fn test_absorb_keeps_maximum_volume() {
        let mut data = EdgeData {
            volume: 50.0,
            state: RevealState::Hidden,
        };
        data.absorb(&EdgeData {
            volume: 30.0,
            state: RevealState::Revealed,
        });
        assert_eq!(data.volume, 50.0);
        assert_eq!(data.state, RevealState::Revealed);
    }

    #[test]
    fn test_absorb_never_hides() {
        let mut data = EdgeData {
            volume: UNRESOLVED_VOLUME,
            state: RevealState::Revealed,
        };
        data.absorb(&EdgeData {
            volume: 12.5,
            state: RevealState::Hidden,
        });
        assert_eq!(data.volume, 12.5);
        assert_eq!(data.state, RevealState::Revealed);
    }

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(RevealState::Hidden.toggled(), RevealState::Revealed);
        assert_eq!(RevealState::Revealed.toggled(), RevealState::Hidden);
    }

    #[test]
    fn test_hidden_edge_visible_only_at_focus() {
        let edge = GraphEdge::new(id("b"), id("a"), 1.0, RevealState::Hidden);
        assert!(!is_edge_visible(&edge, None));
        assert!(!is_edge_visible(&edge, Some(&id("c"))));
        assert!(is_edge_visible(&edge, Some(&id("a"))));
        assert!(is_edge_visible(&edge, Some(&id("b"))));

        let shown = GraphEdge::new(id("b"), id("a"), 1.0, RevealState::Revealed);
        assert!(is_edge_visible(&shown, None));
    }
}
