//! Neuroevolution over acyclic genomes.
//!
//! A [Population] of [Genome]s is scored by whatever drives it, through [Genome::evaluate] and
//! [Genome::fitness], and then [reproduced](Population::reproduce) into the next generation by
//! truncation selection, gene-aligned [crossover](crossover::crossover) and the operators in
//! [mutate]. Every genome is a [Graph] whose enabled connections never form a cycle.

pub mod activate;
pub mod config;
pub mod constants;
pub mod crossover;
pub mod error;
pub mod genome;
mod macros;
pub mod mutate;
pub mod population;
pub mod random;
pub mod reproduce;

pub use activate::Activation;
pub use config::{Config, MutationConfig, PopulationConfig};
pub use error::{ConfigError, CrossoverError, Error, EvalError, GraphError};
pub use genome::{Connection, Genome, Graph, Node, NodeId, NodeKind};
pub use mutate::MutationKind;
pub use population::Population;
pub use random::{default_rng, Happens, Probabilities, WyRng};
