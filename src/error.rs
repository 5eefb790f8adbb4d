//! Failure taxonomy for graph edits, evaluation, crossover and configuration.
//!
//! Rejections that a mutation operator may simply skip ([GraphError::CycleRejected],
//! [GraphError::DuplicateConnection], [GraphError::UnknownNode]) are separated from integrity
//! failures that signal a defect and must reach the caller. See [GraphError::is_rejection].

use crate::{
    genome::{NodeId, NodeKind},
    mutate::MutationKind,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// Adding or enabling `from -> to` would close a cycle among enabled connections
    #[error("connection {from} -> {to} would introduce a cycle")]
    CycleRejected { from: NodeId, to: NodeId },

    #[error("connection {from} -> {to} already exists")]
    DuplicateConnection { from: NodeId, to: NodeId },

    #[error("no node with id {0}")]
    UnknownNode(NodeId),

    #[error("node id {0} is already taken")]
    DuplicateNode(NodeId),

    #[error("no connection at index {0}")]
    UnknownConnection(usize),

    /// Node ids are allocated upward, so the largest id is reserved
    #[error("node id {0} leaves no room for new nodes")]
    IdExhausted(NodeId),

    /// Topological ordering could not reach every node. Unreachable while the acyclic
    /// invariant holds, so this always indicates a defect in whatever edited the graph
    #[error("topological order covered {emitted} of {expected} nodes")]
    Integrity { emitted: usize, expected: usize },

    #[error("expected {expected} {kind:?} nodes, found {found}")]
    Arity {
        kind: NodeKind,
        expected: usize,
        found: usize,
    },
}

impl GraphError {
    /// Whether this is an edit that was refused before touching state, as opposed to a broken
    /// graph. Rejections are what mutation operators absorb.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::CycleRejected { .. } | Self::DuplicateConnection { .. } | Self::UnknownNode(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("expected {expected} inputs, got {got}")]
    InputCount { expected: usize, got: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CrossoverError {
    #[error("node {id} is {dominant:?} in the dominant parent but {recessive:?} in the other")]
    KindMismatch {
        id: NodeId,
        dominant: NodeKind,
        recessive: NodeKind,
    },

    #[error("cannot cross connections {dominant:?} and {recessive:?}")]
    EndpointMismatch {
        dominant: (NodeId, NodeId),
        recessive: (NodeId, NodeId),
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population size must be positive")]
    EmptyPopulation,

    #[error("genomes need at least one input")]
    NoInputs,

    #[error("genomes need at least one output")]
    NoOutputs,

    #[error("survival threshold {0} is outside (0, 1]")]
    SurvivalThreshold(f64),

    #[error("{kind:?} chance {value} is outside [0, 1]")]
    Probability { kind: MutationKind, value: f64 },

    #[error("mutation strength {0} must be finite and non-negative")]
    MutationStrength(f64),

    /// A genome handed to a population doesn't have the configured `(inputs, outputs)`
    #[error("genome {index} has {found:?} inputs and outputs, expected {expected:?}")]
    GenomeArity {
        index: usize,
        found: (usize, usize),
        expected: (usize, usize),
    },
}

/// Everything this crate can fail with, for drivers who'd rather `?` one type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Crossover(#[from] CrossoverError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("too few members to reproduce (wanted to produce {wanted} from 0)")]
    Extinct { wanted: usize },
}
