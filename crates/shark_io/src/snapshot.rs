//! JSON persistence of a [`MemoryStore`]'s object tree.
//!
//! Only the tree is saved; open identifiers belong to the running process and
//! are not part of a snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shark_core::{DataSpace, DataType, InvalidData, Result};
use tracing::info;

use crate::config::MemoryStoreConfig;
use crate::memory_store::{MemoryStore, Node};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotNode {
    Group {
        children: BTreeMap<String, SnapshotNode>,
    },
    Dataset {
        data_type: DataType,
        data_space: DataSpace,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub files: BTreeMap<String, SnapshotNode>,
}

impl Snapshot {
    /// Number of groups and datasets across all files, file roots included.
    pub fn num_nodes(&self) -> usize {
        fn count(node: &SnapshotNode) -> usize {
            match node {
                SnapshotNode::Group { children } => 1 + children.values().map(count).sum::<usize>(),
                SnapshotNode::Dataset { .. } => 1,
            }
        }
        self.files.values().map(count).sum()
    }
}

fn export(nodes: &[Node], index: usize) -> SnapshotNode {
    match &nodes[index] {
        Node::Group { children } => SnapshotNode::Group {
            children: children
                .iter()
                .map(|(name, &child)| (name.clone(), export(nodes, child)))
                .collect(),
        },
        Node::Dataset {
            data_type,
            data_space,
        } => SnapshotNode::Dataset {
            data_type: *data_type,
            data_space: data_space.clone(),
        },
    }
}

fn import(nodes: &mut Vec<Node>, node: &SnapshotNode) -> usize {
    let built = match node {
        SnapshotNode::Group { children } => Node::Group {
            children: children
                .iter()
                .map(|(name, child)| (name.clone(), import(nodes, child)))
                .collect(),
        },
        SnapshotNode::Dataset {
            data_type,
            data_space,
        } => Node::Dataset {
            data_type: *data_type,
            data_space: data_space.clone(),
        },
    };
    nodes.push(built);
    nodes.len() - 1
}

fn check_names(path: &str, node: &SnapshotNode) -> Result<()> {
    if let SnapshotNode::Group { children } = node {
        for (name, child) in children {
            if name.is_empty() || name.contains('/') || name.contains('\0') {
                return Err(InvalidData::Malformed(format!(
                    "Invalid object name '{}' below '{path}'",
                    name.escape_default()
                ))
                .into());
            }
            check_names(&format!("{}/{name}", path.trim_end_matches('/')), child)?;
        }
    }
    Ok(())
}

impl MemoryStore {
    /// Captures the current object tree.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.lock();
        Snapshot {
            files: state
                .files
                .iter()
                .map(|(name, &root)| (name.clone(), export(&state.nodes, root)))
                .collect(),
        }
    }

    /// Builds a store holding `snapshot`'s tree and no open identifiers.
    pub fn from_snapshot(snapshot: &Snapshot, config: MemoryStoreConfig) -> Result<Self> {
        let mut nodes = Vec::with_capacity(snapshot.num_nodes());
        let mut files = BTreeMap::new();
        for (name, root) in &snapshot.files {
            if !matches!(root, SnapshotNode::Group { .. }) {
                return Err(InvalidData::Malformed(format!(
                    "Root of file '{name}' is not a group"
                ))
                .into());
            }
            check_names("/", root)?;
            files.insert(name.clone(), import(&mut nodes, root));
        }
        Self::from_state(nodes, files, config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| InvalidData::Malformed(format!("Cannot serialise store: {e}")).into())
    }

    pub fn from_json(json: &str, config: MemoryStoreConfig) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| InvalidData::Malformed(format!("Invalid store snapshot: {e}")))?;
        Self::from_snapshot(&snapshot, config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "saved store snapshot");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>, config: MemoryStoreConfig) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let store = Self::from_json(&json, config)?;
        info!(path = %path.display(), "loaded store snapshot");
        Ok(store)
    }
}
