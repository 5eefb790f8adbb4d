//! Tunable parameters for seeding and evolving a population. Every field has a default from
//! [constants](crate::constants), so a config file only needs to name what it changes.

use crate::{
    constants::*,
    error::ConfigError,
    mutate::MutationKind,
    random::{chance, Probabilities},
};
use core::error::Error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub size: usize,
    pub num_inputs: usize,
    pub num_outputs: usize,
    /// Fraction of the ranked population eligible to parent, in `(0, 1]`
    pub survival_threshold: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: STRIDER_POPULATION_SIZE,
            num_inputs: STRIDER_NUM_INPUTS,
            num_outputs: STRIDER_NUM_OUTPUTS,
            survival_threshold: STRIDER_SURVIVAL_THRESHOLD,
        }
    }
}

impl PopulationConfig {
    pub fn new(size: usize, num_inputs: usize, num_outputs: usize) -> Self {
        Self {
            size,
            num_inputs,
            num_outputs,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.num_inputs == 0 {
            return Err(ConfigError::NoInputs);
        }
        if self.num_outputs == 0 {
            return Err(ConfigError::NoOutputs);
        }
        // written so that NaN fails too
        if !(self.survival_threshold > 0. && self.survival_threshold <= 1.) {
            return Err(ConfigError::SurvivalThreshold(self.survival_threshold));
        }
        Ok(())
    }
}

/// How likely each operator is to fire once per offspring, plus how far the parameter
/// operators may push a value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    pub add_connection_chance: f64,
    pub remove_connection_chance: f64,
    pub add_hidden_node_chance: f64,
    pub remove_hidden_node_chance: f64,
    pub mutate_weight_chance: f64,
    pub reset_weight_chance: f64,
    pub toggle_connection_chance: f64,
    pub mutate_bias_chance: f64,
    pub mutation_strength: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            add_connection_chance: STRIDER_ADD_CONNECTION_CHANCE,
            remove_connection_chance: STRIDER_REMOVE_CONNECTION_CHANCE,
            add_hidden_node_chance: STRIDER_ADD_HIDDEN_NODE_CHANCE,
            remove_hidden_node_chance: STRIDER_REMOVE_HIDDEN_NODE_CHANCE,
            mutate_weight_chance: STRIDER_MUTATE_WEIGHT_CHANCE,
            reset_weight_chance: STRIDER_RESET_WEIGHT_CHANCE,
            toggle_connection_chance: STRIDER_TOGGLE_CONNECTION_CHANCE,
            mutate_bias_chance: STRIDER_MUTATE_BIAS_CHANCE,
            mutation_strength: STRIDER_MUTATION_STRENGTH,
        }
    }
}

impl MutationConfig {
    /// Every operator at the same chance `p`, with the default strength
    pub fn uniform(p: f64) -> Self {
        MutationKind::ORDER
            .into_iter()
            .fold(Self::default(), |config, kind| config.with_chance(kind, p))
    }

    pub fn chance(&self, kind: MutationKind) -> f64 {
        match kind {
            MutationKind::MutateWeight => self.mutate_weight_chance,
            MutationKind::ResetWeight => self.reset_weight_chance,
            MutationKind::ToggleConnection => self.toggle_connection_chance,
            MutationKind::MutateBias => self.mutate_bias_chance,
            MutationKind::AddHiddenNode => self.add_hidden_node_chance,
            MutationKind::RemoveHiddenNode => self.remove_hidden_node_chance,
            MutationKind::AddConnection => self.add_connection_chance,
            MutationKind::RemoveConnection => self.remove_connection_chance,
        }
    }

    fn chance_mut(&mut self, kind: MutationKind) -> &mut f64 {
        match kind {
            MutationKind::MutateWeight => &mut self.mutate_weight_chance,
            MutationKind::ResetWeight => &mut self.reset_weight_chance,
            MutationKind::ToggleConnection => &mut self.toggle_connection_chance,
            MutationKind::MutateBias => &mut self.mutate_bias_chance,
            MutationKind::AddHiddenNode => &mut self.add_hidden_node_chance,
            MutationKind::RemoveHiddenNode => &mut self.remove_hidden_node_chance,
            MutationKind::AddConnection => &mut self.add_connection_chance,
            MutationKind::RemoveConnection => &mut self.remove_connection_chance,
        }
    }

    pub fn with_chance(mut self, kind: MutationKind, p: f64) -> Self {
        *self.chance_mut(kind) = p;
        self
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.mutation_strength = strength;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in MutationKind::ORDER {
            let value = self.chance(kind);
            if !(0. ..=1.).contains(&value) {
                return Err(ConfigError::Probability { kind, value });
            }
        }
        if !(self.mutation_strength.is_finite() && self.mutation_strength >= 0.) {
            return Err(ConfigError::MutationStrength(self.mutation_strength));
        }
        Ok(())
    }
}

impl Probabilities for MutationConfig {
    fn probability(&self, kind: MutationKind) -> u64 {
        chance(self.chance(kind))
    }
}

/// Everything needed to run a population, as loaded from one JSON document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub population: PopulationConfig,
    pub mutation: MutationConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.population.validate()?;
        self.mutation.validate()
    }

    pub fn to_string(&self) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
