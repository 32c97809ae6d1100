//! JSON read-model documents exchanged with collaborators and the CLI

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::merge::Expansion;
use crate::model::{Direction, GraphEdge, GraphNode};
use crate::store::{GraphCommand, GraphStore};

/// The node/edge lists as the renderer consumes them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl GraphDocument {
    pub fn from_store(store: &GraphStore) -> Self {
        GraphDocument {
            nodes: store.nodes().to_vec(),
            edges: store.edges().to_vec(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_json(self, path)
    }
}

/// Expansion input as UI handlers hand it over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionRequest {
    pub paths: Vec<Vec<String>>,
    #[serde(default)]
    pub incoming: bool,
}

impl From<ExpansionRequest> for Expansion {
    fn from(request: ExpansionRequest) -> Self {
        Expansion::new(request.paths, Direction::from_incoming(request.incoming))
    }
}

/// A sequence of store commands to replay in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandScript(pub Vec<GraphCommand>);

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let source = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
