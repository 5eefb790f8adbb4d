//! Default evolution parameters.
//!
//! Everything [PopulationConfig](crate::config::PopulationConfig) and
//! [MutationConfig](crate::config::MutationConfig) fall back to is defined here with the
//! `STRIDER_` prefix.

// ============================================================================
// Population Parameters
// ============================================================================

/// Genomes per generation
pub const STRIDER_POPULATION_SIZE: usize = 50;

/// Sensors per genome
pub const STRIDER_NUM_INPUTS: usize = 3;

/// Actuators per genome
pub const STRIDER_NUM_OUTPUTS: usize = 2;

/// Fraction of the ranked population allowed to parent the next generation
pub const STRIDER_SURVIVAL_THRESHOLD: f64 = 0.5;

// ============================================================================
// Parameter Mutation Chances
// ============================================================================

/// Chance of perturbing one connection weight
pub const STRIDER_MUTATE_WEIGHT_CHANCE: f64 = 0.8;

/// Chance of replacing one connection weight outright
pub const STRIDER_RESET_WEIGHT_CHANCE: f64 = 0.1;

/// Chance of flipping one connection between enabled and disabled
pub const STRIDER_TOGGLE_CONNECTION_CHANCE: f64 = 0.05;

/// Chance of perturbing one hidden or output bias
pub const STRIDER_MUTATE_BIAS_CHANCE: f64 = 0.2;

/// Scale applied to weight and bias perturbations
pub const STRIDER_MUTATION_STRENGTH: f64 = 0.5;

// ============================================================================
// Structural Mutation Chances
// ============================================================================

/// Chance of splitting a connection with a new hidden node
pub const STRIDER_ADD_HIDDEN_NODE_CHANCE: f64 = 0.03;

/// Chance of removing a hidden node along with its connections
pub const STRIDER_REMOVE_HIDDEN_NODE_CHANCE: f64 = 0.02;

/// Chance of wiring a new connection
pub const STRIDER_ADD_CONNECTION_CHANCE: f64 = 0.05;

/// Chance of deleting a connection
pub const STRIDER_REMOVE_CONNECTION_CHANCE: f64 = 0.02;
