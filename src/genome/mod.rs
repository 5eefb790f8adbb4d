pub mod connection;
pub mod graph;
pub mod node;

pub use connection::Connection;
pub use graph::Graph;
pub use node::{Node, NodeId, NodeKind};

use crate::{
    error::{EvalError, GraphError},
    random::signed_unit,
};
use core::error::Error;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One candidate controller: an acyclic graph with a fixed number of sensors and actuators,
/// and the fitness it earned this generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GenomeRepr")]
pub struct Genome {
    num_inputs: usize,
    num_outputs: usize,
    /// Written by whoever scores the genome, read by reproduction
    pub fitness: f64,
    graph: Graph,
}

#[derive(Deserialize)]
struct GenomeRepr {
    num_inputs: usize,
    num_outputs: usize,
    #[serde(default)]
    fitness: f64,
    graph: Graph,
}

impl TryFrom<GenomeRepr> for Genome {
    type Error = GraphError;

    fn try_from(repr: GenomeRepr) -> Result<Self, Self::Error> {
        let mut genome = Self::with_graph(repr.num_inputs, repr.num_outputs, repr.graph)?;
        genome.fitness = repr.fitness;
        Ok(genome)
    }
}

impl Genome {
    /// The smallest useful genome: every input wired straight to every output with a random
    /// weight. Inputs get ids `-num_inputs..=-1` and outputs `0..num_outputs`, so that hidden
    /// nodes made later start at `num_outputs`
    pub fn minimal(num_inputs: usize, num_outputs: usize, rng: &mut impl Rng) -> Self {
        let mut graph = Graph::new();
        let first_input = -(num_inputs as NodeId);
        for i in 0..num_inputs as NodeId {
            graph.add_node(Node::input(first_input + i));
        }

        for output in 0..num_outputs as NodeId {
            graph.add_node(Node::output(output, signed_unit(rng)));
            for i in 0..num_inputs as NodeId {
                // inputs only ever feed outputs here, nothing to cycle through
                graph.push_connection(Connection::new(first_input + i, output, signed_unit(rng)));
            }
        }
        graph.advance_hidden_counter(num_outputs as NodeId);

        Self::from_graph(num_inputs, num_outputs, graph)
    }

    /// Wrap a hand-built graph, checking that it has exactly as many input and output nodes as
    /// claimed
    pub fn with_graph(
        num_inputs: usize,
        num_outputs: usize,
        graph: Graph,
    ) -> Result<Self, GraphError> {
        for (kind, expected) in [
            (NodeKind::Input, num_inputs),
            (NodeKind::Output, num_outputs),
        ] {
            let found = graph.nodes_of(&[kind]).count();
            if found != expected {
                return Err(GraphError::Arity {
                    kind,
                    expected,
                    found,
                });
            }
        }

        Ok(Self::from_graph(num_inputs, num_outputs, graph))
    }

    pub(crate) fn from_graph(num_inputs: usize, num_outputs: usize, graph: Graph) -> Self {
        Self {
            num_inputs,
            num_outputs,
            fitness: 0.,
            graph,
        }
    }

    #[inline]
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    #[inline]
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[inline]
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Feed `inputs` forward through the network and read the outputs, in output node order.
    ///
    /// Every non-input node takes the weighted sum of its enabled incoming connections plus
    /// its own bias, squashed by its activation. Inputs take their sensor value as is.
    pub fn evaluate(&self, inputs: &[f64]) -> Result<Vec<f64>, EvalError> {
        if inputs.len() != self.num_inputs {
            return Err(EvalError::InputCount {
                expected: self.num_inputs,
                got: inputs.len(),
            });
        }

        let nodes = self.graph.nodes();
        let mut values = vec![0.; nodes.len()];
        let sensory = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == NodeKind::Input);
        for ((idx, _), v) in sensory.zip(inputs) {
            values[idx] = *v;
        }

        let incoming = self.graph.incoming();
        for idx in self.graph.topological_indices()? {
            let node = &nodes[idx];
            if node.kind == NodeKind::Input {
                continue;
            }

            let sum = incoming[idx]
                .iter()
                .fold(node.bias, |acc, (from, weight)| acc + values[*from] * weight);
            values[idx] = node.activation.apply(sum);
        }

        Ok(nodes
            .iter()
            .zip(values)
            .filter_map(|(n, v)| (n.kind == NodeKind::Output).then_some(v))
            .collect())
    }

    pub fn to_string(&self) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string(self)?)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, Box<dyn Error>> {
        serde_json::from_str(s).map_err(|op| op.into())
    }
}
