//! The directed graph every [Genome](super::Genome) is built on. Connections that are enabled
//! must never form a cycle, and every edit that could break that is checked before it touches
//! any state.
//!
//! Nodes and connections are kept in insertion order, which is what breaks ties in
//! [Graph::topological_order] and what crossover walks, with id-keyed indices beside them for
//! lookups.

use super::{Connection, Node, NodeId, NodeKind};
use crate::{activate::Activation, error::GraphError, random::signed_unit};
use fxhash::{FxHashMap, FxHashSet};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphRepr", into = "GraphRepr")]
pub struct Graph {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    /// id handed to the next node made by [Graph::create_new_node]
    next_hidden: NodeId,
    node_idx: FxHashMap<NodeId, usize>,
    path_idx: FxHashMap<(NodeId, NodeId), usize>,
}

#[derive(Serialize, Deserialize)]
struct GraphRepr {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    #[serde(default)]
    next_hidden: NodeId,
}

impl From<Graph> for GraphRepr {
    fn from(graph: Graph) -> Self {
        Self {
            nodes: graph.nodes,
            connections: graph.connections,
            next_hidden: graph.next_hidden,
        }
    }
}

impl TryFrom<GraphRepr> for Graph {
    type Error = GraphError;

    fn try_from(repr: GraphRepr) -> Result<Self, Self::Error> {
        let mut graph = Self::from_parts(repr.nodes, repr.connections)?;
        graph.advance_hidden_counter(repr.next_hidden);
        Ok(graph)
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph by inserting every node and then every connection through the checked
    /// paths, so a graph built this way upholds every invariant that [Graph::add_connection]
    /// does
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        connections: impl IntoIterator<Item = Connection>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::default();
        for node in nodes {
            if graph.contains(node.id) {
                return Err(GraphError::DuplicateNode(node.id));
            }
            if node.id == NodeId::MAX {
                return Err(GraphError::IdExhausted(node.id));
            }
            graph.add_node(node);
        }
        for connection in connections {
            graph.add_connection(connection)?;
        }
        Ok(graph)
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node_idx.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_idx.get(&id).map(|idx| &self.nodes[*idx])
    }

    pub fn connection(&self, from: NodeId, to: NodeId) -> Option<&Connection> {
        self.path_idx
            .get(&(from, to))
            .map(|idx| &self.connections[*idx])
    }

    pub fn nodes_of<'a>(&'a self, kinds: &'a [NodeKind]) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.is(kinds))
    }

    #[inline]
    pub fn next_hidden_id(&self) -> NodeId {
        self.next_hidden
    }

    /// Make sure no id below `floor` is ever handed out by [Graph::create_new_node]
    pub fn advance_hidden_counter(&mut self, floor: NodeId) {
        self.next_hidden = self.next_hidden.max(floor);
    }

    /// Append a node. Ids must be unique; the hidden counter is pushed past the new id
    pub fn add_node(&mut self, node: Node) {
        debug_assert!(!self.contains(node.id), "node id {} reused", node.id);
        // NodeId::MAX is never handed out, see create_new_node
        self.advance_hidden_counter(node.id.saturating_add(1));
        self.node_idx.insert(node.id, self.nodes.len());
        self.nodes.push(node);
    }

    /// Append a connection, unless it would close a cycle among enabled connections, point at
    /// a node we don't have, or duplicate an existing path. Nothing changes on failure
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), GraphError> {
        let (from, to) = connection.path();
        for id in [from, to] {
            if !self.contains(id) {
                return Err(GraphError::UnknownNode(id));
            }
        }

        if self.path_idx.contains_key(&(from, to)) {
            return Err(GraphError::DuplicateConnection { from, to });
        }

        // a disabled connection can't take part in a cycle until it's enabled, which is
        // checked again by set_enabled. Self loops are never allowed
        if from == to || (connection.enabled && self.introduces_cycle(from, to)) {
            return Err(GraphError::CycleRejected { from, to });
        }

        self.push_connection(connection);
        Ok(())
    }

    /// Append without checks, for callers that know the edge is safe (bipartite seeding)
    pub(crate) fn push_connection(&mut self, connection: Connection) {
        debug_assert!(!self.path_idx.contains_key(&connection.path()));
        self.path_idx
            .insert(connection.path(), self.connections.len());
        self.connections.push(connection);
    }

    /// Whether enabling `from -> to` would close a cycle, ie whether `from` is already
    /// reachable from `to` along enabled connections
    pub fn introduces_cycle(&self, from: NodeId, to: NodeId) -> bool {
        from == to || self.reaches(to, from)
    }

    /// Whether `to` is reachable from `from` along enabled connections
    pub fn is_connected(&self, from: NodeId, to: NodeId) -> bool {
        self.reaches(from, to)
    }

    fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        let mut successors = FxHashMap::<NodeId, Vec<NodeId>>::default();
        for c in self.connections.iter().filter(|c| c.enabled) {
            successors.entry(c.from).or_default().push(c.to);
        }

        let mut visited = FxHashSet::default();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(next) = successors.get(&current) {
                stack.extend(next.iter().copied().filter(|n| !visited.contains(n)));
            }
        }

        false
    }

    /// Kahn's algorithm over enabled connections, as indices into [Graph::nodes]. Ready nodes
    /// are taken first-in first-out, seeded in insertion order
    pub(crate) fn topological_indices(&self) -> Result<Vec<usize>, GraphError> {
        let n = self.nodes.len();
        let mut in_degree = vec![0usize; n];
        let mut successors = vec![Vec::<usize>::new(); n];
        for c in self.connections.iter().filter(|c| c.enabled) {
            if let (Some(&from), Some(&to)) = (self.node_idx.get(&c.from), self.node_idx.get(&c.to))
            {
                successors[from].push(to);
                in_degree[to] += 1;
            }
        }

        let mut queue = (0..n)
            .filter(|idx| in_degree[*idx] == 0)
            .collect::<VecDeque<_>>();
        let mut order = Vec::with_capacity(n);
        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for &next in &successors[idx] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() != n {
            return Err(GraphError::Integrity {
                emitted: order.len(),
                expected: n,
            });
        }

        Ok(order)
    }

    pub fn topological_order(&self) -> Result<Vec<&Node>, GraphError> {
        Ok(self
            .topological_indices()?
            .into_iter()
            .map(|idx| &self.nodes[idx])
            .collect())
    }

    /// Enabled connections into every node, as `(from index, weight)`, indexed like
    /// [Graph::nodes]
    pub(crate) fn incoming(&self) -> Vec<Vec<(usize, f64)>> {
        let mut incoming = vec![Vec::new(); self.nodes.len()];
        for c in self.connections.iter().filter(|c| c.enabled) {
            if let (Some(&from), Some(&to)) = (self.node_idx.get(&c.from), self.node_idx.get(&c.to))
            {
                incoming[to].push((from, c.weight));
            }
        }
        incoming
    }

    pub fn random_node_index(&self, kinds: &[NodeKind], rng: &mut impl Rng) -> Option<usize> {
        let candidates = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| node.is(kinds).then_some(idx))
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.random_range(0..candidates.len())])
        }
    }

    /// Uniform pick among nodes whose kind is one of `kinds`
    pub fn random_node_by_kinds(&self, kinds: &[NodeKind], rng: &mut impl Rng) -> Option<&Node> {
        self.random_node_index(kinds, rng)
            .map(|idx| &self.nodes[idx])
    }

    pub fn random_connection_index(&self, rng: &mut impl Rng) -> Option<usize> {
        if self.connections.is_empty() {
            None
        } else {
            Some(rng.random_range(0..self.connections.len()))
        }
    }

    /// Uniform pick among every connection, enabled or not
    pub fn random_connection(&self, rng: &mut impl Rng) -> Option<&Connection> {
        self.random_connection_index(rng)
            .map(|idx| &self.connections[idx])
    }

    #[inline]
    pub fn weight_mut(&mut self, idx: usize) -> Option<&mut f64> {
        self.connections.get_mut(idx).map(|c| &mut c.weight)
    }

    #[inline]
    pub fn bias_mut(&mut self, idx: usize) -> Option<&mut f64> {
        self.nodes.get_mut(idx).map(|n| &mut n.bias)
    }

    /// Enable or disable the connection at `idx`. Enabling is refused if it would close a
    /// cycle
    pub fn set_enabled(&mut self, idx: usize, enabled: bool) -> Result<(), GraphError> {
        let (from, to, was) = match self.connections.get(idx) {
            Some(c) => (c.from, c.to, c.enabled),
            None => return Err(GraphError::UnknownConnection(idx)),
        };

        if enabled && !was && self.introduces_cycle(from, to) {
            return Err(GraphError::CycleRejected { from, to });
        }

        self.connections[idx].enabled = enabled;
        Ok(())
    }

    /// Remove a node and every connection touching it. Returns the removed node, or None if
    /// there was no such node
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let idx = *self.node_idx.get(&id)?;
        self.connections.retain(|c| c.from != id && c.to != id);
        let node = self.nodes.remove(idx);
        self.reindex();
        Some(node)
    }

    pub fn remove_connection_at(&mut self, idx: usize) -> Option<Connection> {
        if idx >= self.connections.len() {
            return None;
        }
        let connection = self.connections.remove(idx);
        self.reindex();
        Some(connection)
    }

    fn reindex(&mut self) {
        self.node_idx = self
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id, idx))
            .collect();
        self.path_idx = self
            .connections
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.path(), idx))
            .collect();
    }

    /// Allocate a fresh node with a random bias and activation. It is not inserted. Fails once
    /// the counter reaches [NodeId::MAX]
    pub fn create_new_node(
        &mut self,
        kind: NodeKind,
        rng: &mut impl Rng,
    ) -> Result<Node, GraphError> {
        let id = self.next_hidden;
        self.next_hidden = id.checked_add(1).ok_or(GraphError::IdExhausted(id))?;
        Ok(match kind {
            NodeKind::Input => Node::input(id),
            _ => Node::new(id, kind, signed_unit(rng), Activation::random(rng)),
        })
    }

    /// Route the connection at `idx` through a new hidden node: the original is disabled but
    /// kept, and `from -> new` (weight 1) and `new -> to` (the original weight) are added.
    /// The split is all or nothing; if either new connection is refused, the graph is put back
    /// the way it was. Returns the id of the new node
    pub fn split_connection(
        &mut self,
        idx: usize,
        rng: &mut impl Rng,
    ) -> Result<NodeId, GraphError> {
        let Some(was_enabled) = self.connections.get(idx).map(|c| c.enabled) else {
            return Err(GraphError::UnknownConnection(idx));
        };
        let (node_count, connection_count, counter) =
            (self.nodes.len(), self.connections.len(), self.next_hidden);

        let node = self.create_new_node(NodeKind::Hidden, rng)?;
        let center = node.id;
        let (first, second) = self.connections[idx].bisect(center);
        self.add_node(node);

        if let Err(e) = self
            .add_connection(first)
            .and_then(|()| self.add_connection(second))
        {
            self.connections.truncate(connection_count);
            self.nodes.truncate(node_count);
            self.connections[idx].enabled = was_enabled;
            self.next_hidden = counter;
            self.reindex();
            return Err(e);
        }

        Ok(center)
    }
}
