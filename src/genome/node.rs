use crate::activate::Activation;
use serde::{Deserialize, Serialize};

/// Negative ids are inputs, `0..outputs` are outputs, and everything above is hidden
pub type NodeId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Input,
    Hidden,
    Output,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub bias: f64,
    pub activation: Activation,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, bias: f64, activation: Activation) -> Self {
        Self {
            id,
            kind,
            bias,
            activation,
        }
    }

    /// Inputs pass their sensor value through untouched
    pub fn input(id: NodeId) -> Self {
        Self::new(id, NodeKind::Input, 0., Activation::Identity)
    }

    pub fn output(id: NodeId, bias: f64) -> Self {
        Self::new(id, NodeKind::Output, bias, Activation::Tanh)
    }

    #[inline]
    pub fn is(&self, kinds: &[NodeKind]) -> bool {
        kinds.contains(&self.kind)
    }
}
