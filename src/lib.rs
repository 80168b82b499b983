//! # Apex NEAT
//!
//! A NEAT-style neuroevolution engine for fixed-arity feed-forward
//! controllers. An external simulator drives the engine tick by tick:
//! a normalised sensor vector goes in, an actuator vector comes out, and
//! between episodes the caller reports a fitness score. Across episodes
//! the engine evolves both the weights and the topology of the network.
//!
//! ## Quick start
//!
//! ```no_run
//! use apex_neat::{Brain, EngineContext, INPUTS, OUTPUTS};
//!
//! let mut brain = Brain::new(true, EngineContext::new());
//!
//! // One episode: drive, then report how it went.
//! let sensors = [0.5_f32; INPUTS];
//! let mut actuators = [0.0_f32; OUTPUTS];
//! brain.evaluate(&sensors, &mut actuators);
//! brain.appraise(12.5);
//! brain.advance_in_train();
//! ```
//!
//! ## Architecture
//!
//! - [`EngineContext`] carries the two pieces of process-wide state: the
//!   `[0, 1)` random source and the monotonic innovation counter that
//!   makes historical gene alignment meaningful.
//! - [`Genome`] is the unit of evolution: an ordered gene list plus a
//!   neuron count. Enabled genes keep `from < to`, so forward evaluation
//!   is a single ascending pass over transient neurons.
//! - [`Gym`] owns the species, walks the evaluation cursor, and runs the
//!   generational pipeline (half-cull, stale and weak species removal,
//!   breeding, full cull, re-speciation).
//! - [`Brain`] is the dual-mode front: training forwards to the gym,
//!   inference to a champion restored from `genomes/top_genome_final.txt`.
//!
//! The champion crosses process lifetimes as a plain text file; restoring
//! it re-issues innovation numbers, so only the structure and weights are
//! stable across runs.

pub mod brain;
pub mod context;
pub mod gene;
pub mod genome;
pub mod gym;
pub mod settings;
pub mod species;
pub mod store;

pub use brain::Brain;
pub use context::EngineContext;
pub use gene::Gene;
pub use genome::Genome;
pub use gym::{Gym, GymStats};
pub use settings::{INPUTS, OUTPUTS};
pub use species::Species;
pub use store::PersistError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evolved_genomes_stay_drivable() {
        let mut ctx = EngineContext::from_seed(42);
        let mut genome = Genome::bootstrap(&mut ctx);

        let mut inputs = [0.0_f32; INPUTS];
        for (index, input) in inputs.iter_mut().enumerate() {
            *input = (index as f32 / INPUTS as f32).min(1.0);
        }
        let mut outputs = [0.0_f32; OUTPUTS];

        for _ in 0..100 {
            genome.mutate(&mut ctx);
        }
        genome.evaluate(&inputs, &mut outputs);
        for output in outputs {
            assert!((-1.0..=1.0).contains(&output), "output drifted: {output}");
        }
    }

    #[test]
    fn crossover_of_divergent_lines_keeps_invariants() {
        let mut ctx = EngineContext::from_seed(7);
        let mut left = Genome::bootstrap(&mut ctx);
        let mut right = left.clone();
        for _ in 0..30 {
            left.mutate(&mut ctx);
            right.mutate(&mut ctx);
        }

        let child = left.crossover(&right, &mut ctx);
        assert_eq!(
            child.neuron_count(),
            left.neuron_count().max(right.neuron_count())
        );
        for gene in child.genes() {
            assert!(gene.from < child.neuron_count());
            assert!(gene.to < child.neuron_count());
        }
    }
}
