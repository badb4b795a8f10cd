//! Directed graph view over a normalized workflow.
//!
//! Node identity is the workflow node id; every connection whose endpoints
//! both exist becomes one edge (parallel edges are kept). Connections that
//! reference unknown ids are set aside for the validator instead of being
//! added as phantom nodes.

use crate::error::AnalysisError;
use crate::workflow::{ConnectionDefinition, WorkflowDefinition};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use petgraph::Direction;
use petgraph::algo::{is_cyclic_directed, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: String,
    pub node_type: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub output_slot: String,
    pub input_slot: String,
    pub output_index: u32,
    pub input_index: u32,
}

pub struct WorkflowGraph {
    graph: DiGraph<GraphNode, GraphEdge>,
    index: AHashMap<String, NodeIndex>,
    dangling: Vec<ConnectionDefinition>,
}

impl WorkflowGraph {
    pub fn build(workflow: &WorkflowDefinition) -> Self {
        let mut graph = DiGraph::with_capacity(workflow.nodes.len(), workflow.connections.len());
        let mut index = AHashMap::with_capacity(workflow.nodes.len());

        for node in &workflow.nodes {
            let idx = graph.add_node(GraphNode {
                id: node.id.clone(),
                node_type: node.node_type.clone(),
                name: node.name.clone(),
            });
            index.insert(node.id.clone(), idx);
        }

        let mut dangling = Vec::new();
        for connection in &workflow.connections {
            match (index.get(&connection.source), index.get(&connection.target)) {
                (Some(&from), Some(&to)) => {
                    graph.add_edge(
                        from,
                        to,
                        GraphEdge {
                            output_slot: connection.output_slot.clone(),
                            input_slot: connection.input_slot.clone(),
                            output_index: connection.output_index,
                            input_index: connection.input_index,
                        },
                    );
                }
                _ => dangling.push(connection.clone()),
            }
        }

        if !dangling.is_empty() {
            tracing::debug!(count = dangling.len(), "Connections reference unknown nodes");
        }

        Self {
            graph,
            index,
            dangling,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Connections skipped because an endpoint is not a declared node.
    pub fn dangling_connections(&self) -> &[ConnectionDefinition] {
        &self.dangling
    }

    /// Node ids in declaration order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|idx| self.graph[idx].id.as_str())
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.degree_in(id, Direction::Incoming)
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.degree_in(id, Direction::Outgoing)
    }

    /// In-degree plus out-degree; a self-loop counts twice.
    pub fn degree(&self, id: &str) -> usize {
        self.in_degree(id) + self.out_degree(id)
    }

    fn degree_in(&self, id: &str, direction: Direction) -> usize {
        self.index
            .get(id)
            .map_or(0, |&idx| self.graph.edges_directed(idx, direction).count())
    }

    /// Distinct successor ids in connection order.
    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Distinct predecessor ids in connection order.
    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        // petgraph walks a node's edge list newest first.
        let mut edges: Vec<_> = self.graph.edges_directed(idx, direction).collect();
        edges.reverse();
        edges
            .into_iter()
            .map(|edge| match direction {
                Direction::Outgoing => edge.target(),
                Direction::Incoming => edge.source(),
            })
            .unique()
            .map(|n| self.graph[n].id.as_str())
            .collect()
    }

    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Node ids in a topological order, or the node closing a cycle.
    pub fn topological_order(&self) -> Result<Vec<&str>, AnalysisError> {
        Ok(self
            .sorted_indices()?
            .into_iter()
            .map(|idx| self.graph[idx].id.as_str())
            .collect())
    }

    fn sorted_indices(&self) -> Result<Vec<NodeIndex>, AnalysisError> {
        toposort(&self.graph, None)
            .map_err(|cycle| AnalysisError::CyclicGraph(self.graph[cycle.node_id()].id.clone()))
    }

    /// The path with the most edges, as a list of node ids.
    ///
    /// Ties go to whichever end node comes first in the topological order.
    /// A non-empty graph always yields at least one node.
    pub fn longest_path(&self) -> Result<Vec<String>, AnalysisError> {
        let order = self.sorted_indices()?;

        let mut distance: AHashMap<NodeIndex, usize> = AHashMap::with_capacity(order.len());
        let mut previous: AHashMap<NodeIndex, NodeIndex> = AHashMap::new();
        let mut best: Option<(NodeIndex, usize)> = None;

        for &node in &order {
            let mut node_distance = 0;
            for edge in self.graph.edges_directed(node, Direction::Incoming) {
                let candidate = distance.get(&edge.source()).copied().unwrap_or(0) + 1;
                if candidate > node_distance {
                    node_distance = candidate;
                    previous.insert(node, edge.source());
                }
            }
            distance.insert(node, node_distance);
            if best.is_none_or(|(_, d)| node_distance > d) {
                best = Some((node, node_distance));
            }
        }

        let mut path = Vec::new();
        let mut cursor = best.map(|(node, _)| node);
        while let Some(node) = cursor {
            path.push(self.graph[node].id.clone());
            cursor = previous.get(&node).copied();
        }
        path.reverse();
        Ok(path)
    }

    /// Weakly-connected components, each listed in declaration order.
    pub fn weakly_connected_components(&self) -> Vec<Vec<String>> {
        let mut sets = UnionFind::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut components: Vec<Vec<String>> = Vec::new();
        let mut slot_for_root: AHashMap<usize, usize> = AHashMap::new();
        for idx in self.graph.node_indices() {
            let root = sets.find(idx.index());
            let slot = *slot_for_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(self.graph[idx].id.clone());
        }
        components
    }

    /// Every elementary cycle, each starting at its earliest-declared node.
    /// A self-loop is a single-node cycle.
    ///
    /// The search runs inside one strongly-connected component at a time and
    /// only extends a path through members declared after its start node, so
    /// each cycle is found exactly once.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut found: Vec<Vec<NodeIndex>> = Vec::new();
        for scc in tarjan_scc(&self.graph) {
            let members: AHashSet<NodeIndex> = scc.iter().copied().collect();
            for &start in &scc {
                let mut path = vec![start];
                self.close_cycles(start, &members, &mut path, &mut found);
            }
        }
        found.sort();
        found
            .into_iter()
            .map(|cycle| cycle.into_iter().map(|idx| self.graph[idx].id.clone()).collect())
            .collect()
    }

    fn close_cycles(
        &self,
        start: NodeIndex,
        members: &AHashSet<NodeIndex>,
        path: &mut Vec<NodeIndex>,
        found: &mut Vec<Vec<NodeIndex>>,
    ) {
        let Some(&current) = path.last() else {
            return;
        };
        let next_nodes: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(current, Direction::Outgoing)
            .unique()
            .collect();
        for next in next_nodes {
            if next == start {
                found.push(path.clone());
            } else if next > start && members.contains(&next) && !path.contains(&next) {
                path.push(next);
                self.close_cycles(start, members, path, found);
                path.pop();
            }
        }
    }
}
