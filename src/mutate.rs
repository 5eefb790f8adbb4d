//! The eight ways a genome changes between generations.
//!
//! Every operator picks its target uniformly at random and quietly does nothing when there is
//! nothing to pick, or when the edit it wants is [refused](GraphError::is_rejection) by the
//! graph. Each reports whether it found a target and made its edit; a nudge that happens to be
//! zero still counts.

use crate::{
    config::MutationConfig,
    error::GraphError,
    genome::{Connection, Genome, NodeKind},
    random::{signed_unit, Happens, Probabilities},
};
use log::{debug, trace, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    MutateWeight,
    ResetWeight,
    ToggleConnection,
    MutateBias,
    AddHiddenNode,
    RemoveHiddenNode,
    AddConnection,
    RemoveConnection,
}

impl MutationKind {
    /// Every kind, in the order [mutate] rolls for them
    pub const ORDER: [Self; 8] = [
        Self::MutateWeight,
        Self::ResetWeight,
        Self::ToggleConnection,
        Self::MutateBias,
        Self::AddHiddenNode,
        Self::RemoveHiddenNode,
        Self::AddConnection,
        Self::RemoveConnection,
    ];

    /// Whether this kind adds or removes genes, rather than tuning existing ones
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::AddHiddenNode
                | Self::RemoveHiddenNode
                | Self::AddConnection
                | Self::RemoveConnection
        )
    }
}

/// Wire a random input or hidden node into a random hidden or output node with a fresh weight.
/// Pairs that would cycle, or that are already connected, are skipped
pub fn add_connection(genome: &mut Genome, rng: &mut impl Rng) -> bool {
    let graph = genome.graph_mut();
    let Some(from) = graph
        .random_node_by_kinds(&[NodeKind::Input, NodeKind::Hidden], rng)
        .map(|n| n.id)
    else {
        return false;
    };
    let Some(to) = graph
        .random_node_by_kinds(&[NodeKind::Hidden, NodeKind::Output], rng)
        .map(|n| n.id)
    else {
        return false;
    };
    if from == to {
        return false;
    }

    let result = graph.add_connection(Connection::new(from, to, signed_unit(rng)));
    absorb("new connection", result).is_some()
}

/// Turn a refused edit into `None`. Anything else means the graph is in trouble, which is
/// louder but still leaves the genome as it was
fn absorb<T>(what: &str, result: Result<T, GraphError>) -> Option<T> {
    match result {
        Ok(t) => Some(t),
        Err(e) if e.is_rejection() => {
            debug!("skipping {what}: {e}");
            None
        }
        Err(e) => {
            warn!("{what} failed: {e}");
            None
        }
    }
}

pub fn remove_connection(genome: &mut Genome, rng: &mut impl Rng) -> bool {
    let graph = genome.graph_mut();
    graph
        .random_connection_index(rng)
        .and_then(|idx| graph.remove_connection_at(idx))
        .is_some()
}

/// Split a random connection with a new hidden node. See [Graph::split_connection](crate::genome::Graph::split_connection)
pub fn add_hidden_node(genome: &mut Genome, rng: &mut impl Rng) -> bool {
    let graph = genome.graph_mut();
    let Some(idx) = graph.random_connection_index(rng) else {
        return false;
    };

    match absorb("split", graph.split_connection(idx, rng)) {
        Some(id) => {
            trace!("split connection {idx} with node {id}");
            true
        }
        None => false,
    }
}

/// Remove a random hidden node along with every connection touching it
pub fn remove_hidden_node(genome: &mut Genome, rng: &mut impl Rng) -> bool {
    let graph = genome.graph_mut();
    let Some(id) = graph
        .random_node_by_kinds(&[NodeKind::Hidden], rng)
        .map(|n| n.id)
    else {
        return false;
    };
    graph.remove_node(id).is_some()
}

/// Nudge a random weight by up to `strength` either way
pub fn mutate_weight(genome: &mut Genome, strength: f64, rng: &mut impl Rng) -> bool {
    let graph = genome.graph_mut();
    let Some(idx) = graph.random_connection_index(rng) else {
        return false;
    };
    let delta = signed_unit(rng) * strength;
    graph.weight_mut(idx).map(|w| *w += delta).is_some()
}

pub fn reset_weight(genome: &mut Genome, rng: &mut impl Rng) -> bool {
    let graph = genome.graph_mut();
    let Some(idx) = graph.random_connection_index(rng) else {
        return false;
    };
    let weight = signed_unit(rng);
    graph.weight_mut(idx).map(|w| *w = weight).is_some()
}

/// Flip a random connection. Enabling one that would close a cycle is skipped
pub fn toggle_connection(genome: &mut Genome, rng: &mut impl Rng) -> bool {
    let graph = genome.graph_mut();
    let Some(idx) = graph.random_connection_index(rng) else {
        return false;
    };
    let enabled = graph.connections()[idx].enabled;

    absorb("toggle", graph.set_enabled(idx, !enabled)).is_some()
}

/// Nudge the bias of a random hidden or output node by up to `strength` either way
pub fn mutate_bias(genome: &mut Genome, strength: f64, rng: &mut impl Rng) -> bool {
    let graph = genome.graph_mut();
    let Some(idx) = graph.random_node_index(&[NodeKind::Hidden, NodeKind::Output], rng) else {
        return false;
    };
    let delta = signed_unit(rng) * strength;
    graph.bias_mut(idx).map(|b| *b += delta).is_some()
}

/// Run the operator for `kind` once, unconditionally
pub fn apply(kind: MutationKind, genome: &mut Genome, strength: f64, rng: &mut impl Rng) -> bool {
    match kind {
        MutationKind::MutateWeight => mutate_weight(genome, strength, rng),
        MutationKind::ResetWeight => reset_weight(genome, rng),
        MutationKind::ToggleConnection => toggle_connection(genome, rng),
        MutationKind::MutateBias => mutate_bias(genome, strength, rng),
        MutationKind::AddHiddenNode => add_hidden_node(genome, rng),
        MutationKind::RemoveHiddenNode => remove_hidden_node(genome, rng),
        MutationKind::AddConnection => add_connection(genome, rng),
        MutationKind::RemoveConnection => remove_connection(genome, rng),
    }
}

/// Roll once for every [MutationKind], in [MutationKind::ORDER], applying each that comes up.
/// Returns how many operators found a target
pub fn mutate(genome: &mut Genome, config: &MutationConfig, rng: &mut impl Rng) -> usize {
    let mut changed = 0;
    for kind in MutationKind::ORDER {
        if !rng.happens(config.probability(kind)) {
            continue;
        }

        if apply(kind, genome, config.mutation_strength, rng) {
            trace!("applied {kind:?}");
            changed += 1;
        } else {
            trace!("{kind:?} was a no-op");
        }
    }
    changed
}
