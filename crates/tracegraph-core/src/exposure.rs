//! Deriving expansion input from an address-analysis exposure breakdown
//!
//! The analysis collaborator reports, for one resolved address, how its
//! volume splits into categories, entities within each category, and the
//! counterparty addresses behind each entity. That shape is trusted input.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Direction, GraphEdge, NodeId};
use crate::reveal::RevealState;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExposureTree {
    #[serde(default)]
    pub categories: Vec<CategoryExposure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryExposure {
    pub category: String,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub entities: Vec<EntityExposure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityExposure {
    pub entity: String,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub addresses: Vec<AddressExposure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressExposure {
    pub address: String,
    #[serde(default)]
    pub volume: f64,
    /// Intermediate addresses between the analysed address and this one, nearest first.
    #[serde(default)]
    pub hops: Vec<String>,
}

impl ExposureTree {
    pub fn addresses(&self) -> impl Iterator<Item = &AddressExposure> {
        self.categories
            .iter()
            .flat_map(|c| c.entities.iter())
            .flat_map(|e| e.addresses.iter())
    }
}

/// Hop-ordered paths `origin, hops.., address`, largest exposure first.
///
/// Paths that mention an empty address, point back at the origin, or repeat
/// an earlier path are dropped. At most `limit` paths are returned.
pub fn paths_from_exposure(origin: &NodeId, tree: &ExposureTree, limit: usize) -> Vec<Vec<String>> {
    let mut exposures: Vec<&AddressExposure> = tree.addresses().collect();
    exposures.sort_by(|a, b| b.volume.total_cmp(&a.volume));

    let mut seen: HashSet<Vec<NodeId>> = HashSet::new();
    let mut paths = Vec::new();

    for exposure in exposures {
        if paths.len() >= limit {
            break;
        }

        let mut path = vec![origin.clone()];
        let hops = exposure
            .hops
            .iter()
            .chain(std::iter::once(&exposure.address))
            .map(|a| NodeId::new(a))
            .collect::<Result<Vec<_>, _>>();
        let Ok(hops) = hops else {
            tracing::warn!("Skipping exposure with an empty address near {}", exposure.address);
            continue;
        };
        if hops.last() == Some(origin) {
            continue;
        }
        path.extend(hops);

        if seen.insert(path.clone()) {
            paths.push(path.into_iter().map(String::from).collect());
        }
    }

    tracing::debug!("Derived {} path(s) from exposure of {}", paths.len(), origin);
    paths
}

/// Revealed edges with known volumes for direct counterparties (no hops).
///
/// Merging these resolves the unknown-volume sentinel on edges synthesized
/// from the same expansion.
pub fn edges_from_exposure(
    origin: &NodeId,
    tree: &ExposureTree,
    direction: Direction,
) -> Vec<GraphEdge> {
    tree.addresses()
        .filter(|a| a.hops.is_empty() && a.volume >= 0.0)
        .filter_map(|a| NodeId::new(&a.address).ok().map(|id| (id, a.volume)))
        .filter(|(id, _)| id != origin)
        .map(|(counterparty, volume)| match direction {
            Direction::Incoming => {
                GraphEdge::new(counterparty, origin.clone(), volume, RevealState::Revealed)
            }
            Direction::Outgoing => {
                GraphEdge::new(origin.clone(), counterparty, volume, RevealState::Revealed)
            }
        })
        .collect()
}
