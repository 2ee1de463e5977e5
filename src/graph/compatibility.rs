// src/graph/compatibility.rs

use crate::agents::agent::Agent;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stable handle assigned to an agent when it enters the graph.
/// Handles grow with insertion order and are never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live agent plus the handles of everyone it can be matched with.
#[derive(Debug)]
struct Node {
    agent: Agent,
    // Ordered by handle, which is insertion order: `first()` is the earliest compatible agent.
    neighbors: BTreeSet<AgentId>,
}

/// Undirected compatibility graph over the agents currently waiting in the market.
///
/// Edges are only created while inserting a node, and only disappear together with
/// one of their endpoints. Every edge is stored on both sides.
#[derive(Debug, Default)]
pub struct CompatibilityGraph {
    nodes: BTreeMap<AgentId, Node>,
    next_id: u64,
}

impl CompatibilityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `agent` as a new node. `is_compatible` is asked once for every node
    /// already present, in insertion order, and an edge is created when it says yes.
    pub fn insert<F>(&mut self, agent: Agent, mut is_compatible: F) -> AgentId
    where
        F: FnMut(AgentId) -> bool,
    {
        let id = AgentId(self.next_id);
        self.next_id += 1;

        let mut neighbors = BTreeSet::new();
        for (&other_id, other) in self.nodes.iter_mut() {
            if is_compatible(other_id) {
                neighbors.insert(other_id);
                other.neighbors.insert(id);
            }
        }

        self.nodes.insert(id, Node { agent, neighbors });
        id
    }

    /// Removes the node and every edge touching it. Returns `None` if there was no such node.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let node = self.nodes.remove(&id)?;
        for neighbor in &node.neighbors {
            if let Some(other) = self.nodes.get_mut(neighbor) {
                other.neighbors.remove(&id);
            }
        }
        Some(node.agent)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.nodes.get(&id).map(|node| &node.agent)
    }

    pub fn neighbors(&self, id: AgentId) -> Option<&BTreeSet<AgentId>> {
        self.nodes.get(&id).map(|node| &node.neighbors)
    }

    pub fn degree(&self, id: AgentId) -> Option<usize> {
        self.neighbors(id).map(BTreeSet::len)
    }

    /// Handles of all live agents, in insertion order.
    pub fn ids(&self) -> Vec<AgentId> {
        self.nodes.keys().copied().collect()
    }

    pub fn agents_mut(&mut self) -> impl Iterator<Item = (AgentId, &mut Agent)> {
        self.nodes.iter_mut().map(|(&id, node)| (id, &mut node.agent))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.neighbors.len()).sum::<usize>() / 2
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.next_id = 0;
    }
}
