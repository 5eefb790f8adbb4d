//! Truncation selection and the generational step built on it.

use crate::{config::MutationConfig, crossover::crossover, error::Error, genome::Genome, mutate};
use log::debug;
use rand::Rng;

/// How many of the best ranked genomes may parent: `floor(len * survival_threshold)`, but at
/// least one and never more than there are
pub fn survivor_cutoff(len: usize, survival_threshold: f64) -> usize {
    ((len as f64 * survival_threshold).floor() as usize)
        .max(1)
        .min(len)
}

/// Two ranks drawn uniformly and independently from `0..cutoff`. They may be the same
pub fn parent_pair(cutoff: usize, rng: &mut impl Rng) -> (usize, usize) {
    (rng.random_range(0..cutoff), rng.random_range(0..cutoff))
}

/// Breed `size` children from the best ranked genomes. `ranked` must be sorted best first.
///
/// Every child is the crossover of two parents drawn from the survivors, then mutated once
/// according to `mutation`. The parents are never modified.
pub fn reproduce(
    ranked: &[&Genome],
    size: usize,
    survival_threshold: f64,
    mutation: &MutationConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Genome>, Error> {
    if size == 0 {
        return Ok(vec![]);
    }

    if ranked.is_empty() {
        return Err(Error::Extinct { wanted: size });
    }

    let cutoff = survivor_cutoff(ranked.len(), survival_threshold);
    debug!(
        "breeding {size} from the best {cutoff} of {}, top fitness {}",
        ranked.len(),
        ranked[0].fitness
    );

    (0..size)
        .map(|_| -> Result<Genome, Error> {
            let (l, r) = parent_pair(cutoff, rng);
            let mut child = crossover(ranked[l], ranked[r], rng)?;
            mutate::mutate(&mut child, mutation, rng);
            Ok(child)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::random::WyRng;

    #[test]
    fn test_survivor_cutoff() {
        assert_eq!(survivor_cutoff(10, 0.5), 5);
        assert_eq!(survivor_cutoff(10, 1.), 10);
        assert_eq!(survivor_cutoff(7, 0.5), 3);
        assert_eq!(survivor_cutoff(10, 0.01), 1);
        assert_eq!(survivor_cutoff(1, 0.5), 1);
        assert_eq!(survivor_cutoff(0, 0.5), 0);
    }

    #[test]
    fn test_parent_pair_bounds() {
        let mut rng = WyRng::seeded(0);
        let (mut seen_last, mut seen_same) = (false, false);
        for _ in 0..1000 {
            let (l, r) = parent_pair(5, &mut rng);
            assert!(l < 5 && r < 5);
            seen_last |= l == 4 || r == 4;
            seen_same |= l == r;
        }
        assert!(seen_last && seen_same);
    }

    #[test]
    fn test_reproduce_empty() {
        let mut rng = WyRng::seeded(1);
        let config = MutationConfig::default();
        assert_eq!(reproduce(&[], 0, 0.5, &config, &mut rng), Ok(vec![]));
        assert_eq!(
            reproduce(&[], 4, 0.5, &config, &mut rng),
            Err(Error::Extinct { wanted: 4 })
        );
    }

    #[test]
    fn test_reproduce_size() {
        let mut rng = WyRng::seeded(2);
        let genomes = (0..3)
            .map(|_| Genome::minimal(2, 2, &mut rng))
            .collect::<Vec<_>>();
        let ranked = genomes.iter().collect::<Vec<_>>();
        let children = reproduce(&ranked, 11, 0.5, &MutationConfig::default(), &mut rng).unwrap();
        assert_eq!(children.len(), 11);
        assert!(children
            .iter()
            .all(|c| c.num_inputs() == 2 && c.num_outputs() == 2 && c.fitness == 0.));
    }
}
