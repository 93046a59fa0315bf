//! An in-process hierarchical store.
//!
//! Objects live in an arena of nodes; identifiers handed out to callers are
//! entries of a separate handle table, so several identifiers may name the
//! same node and closing one never affects another. Identifiers are never
//! reused. All state sits behind one lock, which is the global lock the
//! access layer expects around store calls.

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;
use shark_core::{
    fill_probe, DataSpace, DataType, NativeId, ObjectKind, Result, Store, StoreResult,
    StoreStatus,
};
use tracing::trace;

use crate::config::MemoryStoreConfig;

type NodeIndex = usize;

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Group {
        children: BTreeMap<String, NodeIndex>,
    },
    Dataset {
        data_type: DataType,
        data_space: DataSpace,
    },
}

impl Node {
    fn empty_group() -> Self {
        Node::Group {
            children: BTreeMap::new(),
        }
    }

    fn kind(&self) -> ObjectKind {
        match self {
            Node::Group { .. } => ObjectKind::Group,
            Node::Dataset { .. } => ObjectKind::Dataset,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Handle {
    node: NodeIndex,
    kind: ObjectKind,
}

#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) nodes: Vec<Node>,
    pub(crate) files: BTreeMap<String, NodeIndex>,
    handles: HashMap<NativeId, Handle>,
    next_id: i64,
    opened: u64,
    closed: u64,
}

impl State {
    pub(crate) fn push(&mut self, node: Node) -> NodeIndex {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn acquire(
        &mut self,
        node: NodeIndex,
        kind: ObjectKind,
        limit: usize,
    ) -> StoreResult<NativeId> {
        if self.handles.len() >= limit {
            return Err(StoreStatus::TooManyHandles);
        }
        let id = NativeId::new(self.next_id);
        self.next_id += 1;
        self.opened += 1;
        self.handles.insert(id, Handle { node, kind });
        trace!(%id, %kind, node, "handle acquired");
        Ok(id)
    }

    fn handle(&self, id: NativeId) -> StoreResult<Handle> {
        self.handles.get(&id).copied().ok_or(StoreStatus::InvalidHandle)
    }

    fn children(&self, group: NativeId) -> StoreResult<&BTreeMap<String, NodeIndex>> {
        let handle = self.handle(group)?;
        if !handle.kind.is_group_like() {
            return Err(StoreStatus::WrongKind);
        }
        match &self.nodes[handle.node] {
            Node::Group { children } => Ok(children),
            Node::Dataset { .. } => Err(StoreStatus::WrongKind),
        }
    }

    fn child(&self, parent: NativeId, name: &str) -> StoreResult<NodeIndex> {
        self.children(parent)?
            .get(name)
            .copied()
            .ok_or(StoreStatus::NotFound)
    }

    fn child_by_idx(&self, group: NativeId, idx: u64) -> StoreResult<(&String, NodeIndex)> {
        let idx = usize::try_from(idx).map_err(|_| StoreStatus::NotFound)?;
        self.children(group)?
            .iter()
            .nth(idx)
            .map(|(name, node)| (name, *node))
            .ok_or(StoreStatus::NotFound)
    }

    fn insert_child(
        &mut self,
        parent: NativeId,
        name: &str,
        node: Node,
    ) -> StoreResult<NodeIndex> {
        if name.is_empty() || name.contains('/') || name.contains('\0') {
            return Err(StoreStatus::InvalidName);
        }
        if self.children(parent)?.contains_key(name) {
            return Err(StoreStatus::AlreadyExists);
        }
        let index = self.push(node);
        let parent_node = self.handle(parent)?.node;
        if let Node::Group { children } = &mut self.nodes[parent_node] {
            children.insert(name.to_string(), index);
        }
        Ok(index)
    }
}

/// A [`Store`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) state: Mutex<State>,
    config: MemoryStoreConfig,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails with `InvalidOption` if `config` allows no open identifiers.
    pub fn with_config(config: MemoryStoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(State::default()),
            config,
        })
    }

    pub(crate) fn from_state(
        nodes: Vec<Node>,
        files: BTreeMap<String, NodeIndex>,
        config: MemoryStoreConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(State {
                nodes,
                files,
                ..State::default()
            }),
            config,
        })
    }

    pub fn config(&self) -> &MemoryStoreConfig {
        &self.config
    }

    /// Number of identifiers currently open.
    pub fn open_handles(&self) -> usize {
        self.state.lock().handles.len()
    }

    /// Number of identifiers handed out since the store was created.
    pub fn total_opens(&self) -> u64 {
        self.state.lock().opened
    }

    /// Number of successful closes since the store was created.
    pub fn total_closes(&self) -> u64 {
        self.state.lock().closed
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.config.read_only {
            return Err(StoreStatus::ReadOnly);
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn file_create(&self, name: &str) -> StoreResult<NativeId> {
        self.check_writable()?;
        let mut state = self.state.lock();
        if state.files.contains_key(name) {
            return Err(StoreStatus::AlreadyExists);
        }
        if state.handles.len() >= self.config.max_open_handles {
            return Err(StoreStatus::TooManyHandles);
        }
        let root = state.push(Node::empty_group());
        state.files.insert(name.to_string(), root);
        state.acquire(root, ObjectKind::File, self.config.max_open_handles)
    }

    fn file_open(&self, name: &str) -> StoreResult<NativeId> {
        let mut state = self.state.lock();
        let root = *state.files.get(name).ok_or(StoreStatus::NotFound)?;
        state.acquire(root, ObjectKind::File, self.config.max_open_handles)
    }

    fn group_open(&self, parent: NativeId, name: &str) -> StoreResult<NativeId> {
        let mut state = self.state.lock();
        let node = state.child(parent, name)?;
        if state.nodes[node].kind() != ObjectKind::Group {
            return Err(StoreStatus::WrongKind);
        }
        state.acquire(node, ObjectKind::Group, self.config.max_open_handles)
    }

    fn group_create(&self, parent: NativeId, name: &str) -> StoreResult<NativeId> {
        self.check_writable()?;
        let mut state = self.state.lock();
        if state.handles.len() >= self.config.max_open_handles {
            return Err(StoreStatus::TooManyHandles);
        }
        let node = state.insert_child(parent, name, Node::empty_group())?;
        state.acquire(node, ObjectKind::Group, self.config.max_open_handles)
    }

    fn dataset_open(&self, parent: NativeId, name: &str) -> StoreResult<NativeId> {
        let mut state = self.state.lock();
        let node = state.child(parent, name)?;
        if state.nodes[node].kind() != ObjectKind::Dataset {
            return Err(StoreStatus::WrongKind);
        }
        state.acquire(node, ObjectKind::Dataset, self.config.max_open_handles)
    }

    fn dataset_create(
        &self,
        parent: NativeId,
        name: &str,
        data_type: &DataType,
        data_space: &DataSpace,
    ) -> StoreResult<NativeId> {
        self.check_writable()?;
        let mut state = self.state.lock();
        if state.handles.len() >= self.config.max_open_handles {
            return Err(StoreStatus::TooManyHandles);
        }
        let node = state.insert_child(
            parent,
            name,
            Node::Dataset {
                data_type: *data_type,
                data_space: data_space.clone(),
            },
        )?;
        state.acquire(node, ObjectKind::Dataset, self.config.max_open_handles)
    }

    fn close(&self, id: NativeId) -> StoreResult<()> {
        let mut state = self.state.lock();
        let handle = state.handles.remove(&id).ok_or(StoreStatus::InvalidHandle)?;
        state.closed += 1;
        trace!(%id, kind = %handle.kind, "handle closed");
        Ok(())
    }

    fn kind_of(&self, id: NativeId) -> Option<ObjectKind> {
        self.state.lock().handles.get(&id).map(|h| h.kind)
    }

    fn num_objs(&self, group: NativeId) -> StoreResult<u64> {
        let state = self.state.lock();
        Ok(state.children(group)?.len() as u64)
    }

    fn objname_by_idx(&self, group: NativeId, idx: u64, buf: Option<&mut [u8]>) -> isize {
        let state = self.state.lock();
        match state.child_by_idx(group, idx) {
            Ok((name, _)) => fill_probe(name, buf),
            Err(_) => -1,
        }
    }

    fn objtype_by_idx(&self, group: NativeId, idx: u64) -> StoreResult<ObjectKind> {
        let state = self.state.lock();
        let (_, node) = state.child_by_idx(group, idx)?;
        Ok(state.nodes[node].kind())
    }

    fn dataset_type(&self, dataset: NativeId) -> StoreResult<DataType> {
        let state = self.state.lock();
        match &state.nodes[state.handle(dataset)?.node] {
            Node::Dataset { data_type, .. } => Ok(*data_type),
            Node::Group { .. } => Err(StoreStatus::WrongKind),
        }
    }

    fn dataset_space(&self, dataset: NativeId) -> StoreResult<DataSpace> {
        let state = self.state.lock();
        match &state.nodes[state.handle(dataset)?.node] {
            Node::Dataset { data_space, .. } => Ok(data_space.clone()),
            Node::Group { .. } => Err(StoreStatus::WrongKind),
        }
    }
}
