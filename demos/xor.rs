use approx::relative_eq;
use log::info;
use strider::{random::default_rng, Genome, MutationConfig, Population, PopulationConfig};

const POPULATION: usize = 300;
const GENERATIONS: usize = 2_000;

const CASES: [([f64; 2], f64); 4] = [
    ([0., 0.], 0.),
    ([1., 1.], 0.),
    ([1., 0.], 1.),
    ([0., 1.], 1.),
];

fn score(genome: &Genome) -> f64 {
    let mut fit = 0.;
    for (inputs, want) in CASES {
        let v = match genome.evaluate(&inputs) {
            Ok(outputs) => outputs[0],
            Err(e) => {
                info!("unscorable genome: {e}");
                return f64::NEG_INFINITY;
            }
        };
        if relative_eq!(v, want, epsilon = 0.1) {
            fit += 100.;
        } else {
            fit -= (want - v).abs();
        }
    }
    fit
}

fn main() {
    env_logger::init();

    let mut rng = default_rng();
    let mut population = Population::seeded(
        PopulationConfig {
            survival_threshold: 0.2,
            ..PopulationConfig::new(POPULATION, 2, 1)
        },
        MutationConfig::default(),
        &mut rng,
    )
    .unwrap();

    for _ in 0..GENERATIONS {
        let scores = population.genomes().iter().map(score).collect::<Vec<_>>();
        population.assign_fitness(scores);

        let fittest = population.fittest().unwrap();
        if population.generation() % 100 == 0 {
            println!(
                "fittest of gen {}: {:.4} ({} hidden nodes)",
                population.generation(),
                fittest.fitness,
                fittest.graph().nodes().len() - 3
            );
        }

        if fittest.fitness >= 400. - f64::EPSILON {
            println!(
                "target met in gen {}: {}",
                population.generation(),
                fittest.to_string().unwrap()
            );
            return;
        }

        population = population.reproduce(&mut rng).unwrap();
    }

    println!("no solution in {GENERATIONS} generations");
}
