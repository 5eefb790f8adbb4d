//! A generation of genomes, and the step to the next one.

use crate::{
    config::{MutationConfig, PopulationConfig},
    error::{ConfigError, Error},
    genome::Genome,
    reproduce,
};
use core::cmp::Ordering;
use log::info;
use rand::Rng;

/// Best first. NaN fitness sorts after every number
fn by_fitness(l: &Genome, r: &Genome) -> Ordering {
    match (l.fitness.is_nan(), r.fitness.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => r.fitness.partial_cmp(&l.fitness).unwrap_or(Ordering::Equal),
    }
}

/// An ordered set of genomes. The order is stable between calls, so a driver may pair each
/// index with one of its agents, write that agent's score into [Population::genomes_mut] or
/// [Population::assign_fitness], and then ask for the next generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    genomes: Vec<Genome>,
    config: PopulationConfig,
    mutation: MutationConfig,
    generation: usize,
}

impl Population {
    /// Generation zero: `config.size` [minimal](Genome::minimal) genomes
    pub fn seeded(
        config: PopulationConfig,
        mutation: MutationConfig,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        mutation.validate()?;

        let genomes = (0..config.size)
            .map(|_| Genome::minimal(config.num_inputs, config.num_outputs, rng))
            .collect();
        Ok(Self {
            genomes,
            config,
            mutation,
            generation: 0,
        })
    }

    /// Wrap genomes that already exist, such as restored snapshots. Every genome must have the
    /// arity `config` asks for
    pub fn from_genomes(
        config: PopulationConfig,
        mutation: MutationConfig,
        genomes: Vec<Genome>,
        generation: usize,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        mutation.validate()?;

        let expected = (config.num_inputs, config.num_outputs);
        for (index, genome) in genomes.iter().enumerate() {
            let found = (genome.num_inputs(), genome.num_outputs());
            if found != expected {
                return Err(ConfigError::GenomeArity {
                    index,
                    found,
                    expected,
                });
            }
        }
        Ok(Self {
            genomes,
            config,
            mutation,
            generation,
        })
    }

    #[inline]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// For writing fitness. The genomes themselves may be edited too, at the caller's risk
    #[inline]
    pub fn genomes_mut(&mut self) -> &mut [Genome] {
        &mut self.genomes
    }

    #[inline]
    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    #[inline]
    pub fn mutation(&self) -> &MutationConfig {
        &self.mutation
    }

    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Write scores onto genomes by index. Extra scores are ignored, and genomes past the last
    /// score keep theirs
    pub fn assign_fitness(&mut self, fitness: impl IntoIterator<Item = f64>) {
        for (genome, f) in self.genomes.iter_mut().zip(fitness) {
            genome.fitness = f;
        }
    }

    pub fn fittest(&self) -> Option<&Genome> {
        self.genomes.iter().min_by(|l, r| by_fitness(l, r))
    }

    /// Stable sort, best first
    pub fn sort_by_fitness(&mut self) {
        self.genomes.sort_by(by_fitness);
    }

    /// Genomes best first, leaving our own order alone
    pub fn ranked(&self) -> Vec<&Genome> {
        let mut ranked = self.genomes.iter().collect::<Vec<_>>();
        ranked.sort_by(|l, r| by_fitness(l, r));
        ranked
    }

    /// The next generation: `config.size` children bred from the best
    /// `survival_threshold` share of this one. This population is left as it was
    pub fn reproduce(&self, rng: &mut impl Rng) -> Result<Self, Error> {
        let ranked = self.ranked();
        if let Some(best) = ranked.first() {
            info!(
                "generation {} ends, best fitness {}",
                self.generation, best.fitness
            );
        }

        let genomes = reproduce::reproduce(
            &ranked,
            self.config.size,
            self.config.survival_threshold,
            &self.mutation,
            rng,
        )?;
        Ok(Self {
            genomes,
            config: self.config.clone(),
            mutation: self.mutation.clone(),
            generation: self.generation + 1,
        })
    }
}
