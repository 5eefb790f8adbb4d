//! Gene-aligned crossover. Genes are matched by node id and by connection path; the fitter
//! parent decides which genes the child has at all, and matched genes mix their values by coin
//! flip.

use crate::{
    error::CrossoverError,
    genome::{Connection, Genome, Graph, Node},
    random::coin,
};
use log::debug;
use rand::Rng;

fn cross_node(dominant: &Node, recessive: &Node, rng: &mut impl Rng) -> Result<Node, CrossoverError> {
    if dominant.kind != recessive.kind {
        return Err(CrossoverError::KindMismatch {
            id: dominant.id,
            dominant: dominant.kind,
            recessive: recessive.kind,
        });
    }

    let bias = if coin(rng) { dominant.bias } else { recessive.bias };
    let activation = if coin(rng) {
        dominant.activation
    } else {
        recessive.activation
    };
    Ok(Node::new(dominant.id, dominant.kind, bias, activation))
}

fn cross_connection(
    dominant: &Connection,
    recessive: &Connection,
    rng: &mut impl Rng,
) -> Result<Connection, CrossoverError> {
    if dominant.path() != recessive.path() {
        return Err(CrossoverError::EndpointMismatch {
            dominant: dominant.path(),
            recessive: recessive.path(),
        });
    }

    let weight = if coin(rng) {
        dominant.weight
    } else {
        recessive.weight
    };
    let enabled = if coin(rng) {
        dominant.enabled
    } else {
        recessive.enabled
    };
    Ok(Connection {
        weight,
        enabled,
        ..dominant.clone()
    })
}

/// Produce a child of `parent1` and `parent2`.
///
/// The dominant parent is the one with strictly greater fitness, `parent1` on a tie. The child
/// has exactly the dominant's genes, in the dominant's order, and the dominant's arity. Where
/// the other parent has the same gene, bias and activation (for nodes) or weight and enabled
/// flag (for connections) are each taken from either parent with equal chance.
///
/// Taking the enabled flag from the recessive parent can switch on an edge the dominant kept
/// off, which may close a cycle in the child. Such an edge is inherited disabled instead.
pub fn crossover(
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut impl Rng,
) -> Result<Genome, CrossoverError> {
    let (dominant, recessive) = if parent2.fitness > parent1.fitness {
        (parent2, parent1)
    } else {
        (parent1, parent2)
    };
    let (lead, other) = (dominant.graph(), recessive.graph());

    let mut graph = Graph::new();
    for node in lead.nodes() {
        let child = match other.node(node.id) {
            Some(matched) => cross_node(node, matched, rng)?,
            None => node.clone(),
        };
        graph.add_node(child);
    }

    for connection in lead.connections() {
        let mut child = match other.connection(connection.from, connection.to) {
            Some(matched) => cross_connection(connection, matched, rng)?,
            None => connection.clone(),
        };
        if child.enabled && graph.introduces_cycle(child.from, child.to) {
            debug!(
                "inheriting {} -> {} disabled, enabling it would close a cycle",
                child.from, child.to
            );
            child.disable();
        }
        graph.add_connection(child)?;
    }
    graph.advance_hidden_counter(lead.next_hidden_id());

    Ok(Genome::from_graph(
        dominant.num_inputs(),
        dominant.num_outputs(),
        graph,
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        activate::Activation,
        genome::{NodeId, NodeKind},
        mutate,
        random::WyRng,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn hidden(id: NodeId) -> Node {
        Node::new(id, NodeKind::Hidden, 0., Activation::Identity)
    }

    fn ids(genome: &Genome) -> Vec<NodeId> {
        genome.graph().nodes().iter().map(|n| n.id).collect()
    }

    fn paths(genome: &Genome) -> Vec<(NodeId, NodeId)> {
        genome
            .graph()
            .connections()
            .iter()
            .map(|c| c.path())
            .collect()
    }

    #[test]
    fn test_crossover_arity() {
        let mut rng = WyRng::seeded(0);
        let (l, r) = (Genome::minimal(3, 2, &mut rng), Genome::minimal(3, 2, &mut rng));
        let child = crossover(&l, &r, &mut rng).unwrap();
        assert_eq!(child.num_inputs(), 3);
        assert_eq!(child.num_outputs(), 2);
        assert_eq!(child.fitness, 0.);
        assert_eq!(ids(&child), ids(&l));
        assert_eq!(paths(&child), paths(&l));
    }

    #[test]
    fn test_crossover_dominance() {
        let mut rng = WyRng::seeded(1);
        let mut grown = Genome::minimal(2, 1, &mut rng);
        let plain = grown.clone();
        assert!(mutate::add_hidden_node(&mut grown, &mut rng));

        grown.fitness = 1.;
        for (l, r) in [(&grown, &plain), (&plain, &grown)] {
            let child = crossover(l, r, &mut rng).unwrap();
            assert_eq!(ids(&child), ids(&grown));
            assert_eq!(paths(&child), paths(&grown));
            assert_eq!(child.graph().next_hidden_id(), 2);
        }

        grown.fitness = -1.;
        for (l, r) in [(&grown, &plain), (&plain, &grown)] {
            let child = crossover(l, r, &mut rng).unwrap();
            assert_eq!(ids(&child), ids(&plain));
            assert_eq!(paths(&child), paths(&plain));
        }
    }

    #[test]
    fn test_crossover_tie_prefers_first() {
        let mut rng = WyRng::seeded(2);
        let mut grown = Genome::minimal(2, 1, &mut rng);
        let plain = grown.clone();
        assert!(mutate::add_hidden_node(&mut grown, &mut rng));

        assert_eq!(ids(&crossover(&grown, &plain, &mut rng).unwrap()), ids(&grown));
        assert_eq!(ids(&crossover(&plain, &grown, &mut rng).unwrap()), ids(&plain));
    }

    #[test]
    fn test_crossover_mixes_matched_genes() {
        let mut rng = StdRng::seed_from_u64(3);
        let (l, r) = (Genome::minimal(4, 4, &mut rng), Genome::minimal(4, 4, &mut rng));
        let (mut from_l, mut from_r) = (0, 0);
        for _ in 0..20 {
            let child = crossover(&l, &r, &mut rng).unwrap();
            for c in child.graph().connections() {
                let (lw, rw) = (
                    l.graph().connection(c.from, c.to).unwrap().weight,
                    r.graph().connection(c.from, c.to).unwrap().weight,
                );
                if c.weight == lw {
                    from_l += 1;
                } else if c.weight == rw {
                    from_r += 1;
                } else {
                    panic!("weight {} came from neither parent", c.weight);
                }
            }
            for n in child.graph().nodes_of(&[NodeKind::Output]) {
                let (lb, rb) = (l.graph().node(n.id).unwrap().bias, r.graph().node(n.id).unwrap().bias);
                assert!(n.bias == lb || n.bias == rb);
            }
        }
        assert!(from_l > 0 && from_r > 0);
    }

    #[test]
    fn test_crossover_kind_mismatch() {
        let mut rng = WyRng::seeded(4);
        let l = Genome::with_graph(
            1,
            1,
            Graph::from_parts([Node::input(-1), Node::output(0, 0.), hidden(1)], []).unwrap(),
        )
        .unwrap();
        let r = Genome::with_graph(
            1,
            1,
            Graph::from_parts([Node::input(-1), hidden(0), Node::output(1, 0.)], []).unwrap(),
        )
        .unwrap();

        assert_eq!(
            crossover(&l, &r, &mut rng),
            Err(CrossoverError::KindMismatch {
                id: 0,
                dominant: NodeKind::Output,
                recessive: NodeKind::Hidden
            })
        );
    }

    #[test]
    fn test_cross_connection_endpoints() {
        let mut rng = WyRng::seeded(5);
        assert_eq!(
            cross_connection(
                &Connection::new(-1, 0, 1.),
                &Connection::new(-1, 1, 1.),
                &mut rng
            ),
            Err(CrossoverError::EndpointMismatch {
                dominant: (-1, 0),
                recessive: (-1, 1)
            })
        );
    }

    #[test]
    fn test_crossover_repairs_cycles() {
        let mut rng = WyRng::seeded(6);
        let nodes = [Node::input(-1), Node::output(0, 0.), hidden(2), hidden(3)];
        let parent = |forward: bool| {
            let (mut there, mut back) = (Connection::new(2, 3, 1.), Connection::new(3, 2, 1.));
            if forward {
                back.disable();
            } else {
                there.disable();
            }
            Genome::with_graph(
                1,
                1,
                Graph::from_parts(nodes.clone(), [there, back]).unwrap(),
            )
            .unwrap()
        };
        let (l, r) = (parent(true), parent(false));

        let (mut forward, mut backward) = (0, 0);
        for _ in 0..64 {
            let child = crossover(&l, &r, &mut rng).unwrap();
            let graph = child.graph();
            assert!(graph.topological_order().is_ok());

            let there = graph.connection(2, 3).unwrap().enabled;
            let back = graph.connection(3, 2).unwrap().enabled;
            assert!(!(there && back));
            forward += usize::from(there);
            backward += usize::from(back);
        }
        assert!(forward > 0 && backward > 0);
    }

    #[test]
    fn test_crossover_deterministic() {
        let mut rng = WyRng::seeded(7);
        let (l, r) = (Genome::minimal(3, 2, &mut rng), Genome::minimal(3, 2, &mut rng));
        assert_eq!(
            crossover(&l, &r, &mut WyRng::seeded(99)).unwrap(),
            crossover(&l, &r, &mut WyRng::seeded(99)).unwrap()
        );
    }
}
