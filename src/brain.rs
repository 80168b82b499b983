//! The driver-facing front: a training gym or a frozen champion.

use std::path::PathBuf;

use crate::context::EngineContext;
use crate::genome::Genome;
use crate::gym::{Gym, GymStats};
use crate::settings::{INPUTS, OUTPUTS};
use crate::store;

enum Mode {
    /// Evolving: requests go to the gym's cursor genome.
    Training(Gym),
    /// Racing: requests go to the champion loaded at construction.
    Inference(Genome),
}

/// Dual-mode controller front. In training mode it owns a [`Gym`] and
/// forwards everything to the genome under evaluation; in inference mode
/// it owns a frozen champion loaded from disk and the training calls are
/// no-ops.
pub struct Brain {
    mode: Mode,
}

impl Brain {
    /// Brain rooted at the default `genomes/` directory.
    #[must_use]
    pub fn new(training: bool, ctx: EngineContext) -> Self {
        Self::with_dir(training, ctx, store::DEFAULT_GENOME_DIR)
    }

    /// Brain persisting under (or loading its champion from) `genome_dir`.
    pub fn with_dir(
        training: bool,
        mut ctx: EngineContext,
        genome_dir: impl Into<PathBuf>,
    ) -> Self {
        let genome_dir = genome_dir.into();
        let mode = if training {
            Mode::Training(Gym::with_dir(ctx, genome_dir))
        } else {
            Mode::Inference(store::load_or_bootstrap(&genome_dir, &mut ctx))
        };
        Self { mode }
    }

    /// One controller tick: sensor vector in, actuator vector out.
    pub fn evaluate(&self, inputs: &[f32; INPUTS], outputs: &mut [f32; OUTPUTS]) {
        match &self.mode {
            Mode::Training(gym) => gym.evaluate_current(inputs, outputs),
            Mode::Inference(champion) => champion.evaluate(inputs, outputs),
        }
    }

    /// Records the episode fitness on the genome under evaluation. No-op
    /// when racing a frozen champion.
    pub fn appraise(&mut self, fitness: f32) {
        if let Mode::Training(gym) = &mut self.mode {
            gym.appraise_current(fitness);
        }
    }

    /// Moves the evaluation cursor to the next genome. No-op when racing.
    pub fn advance_in_train(&mut self) {
        if let Mode::Training(gym) = &mut self.mode {
            gym.advance_in_train();
        }
    }

    /// Training statistics; in inference mode they describe the frozen
    /// champion and the species count is zero.
    #[must_use]
    pub fn stats(&self) -> GymStats {
        match &self.mode {
            Mode::Training(gym) => gym.stats(),
            Mode::Inference(champion) => GymStats {
                generation: champion.generation(),
                species: 0,
                fitness: champion.fitness(),
                top_fitness: champion.fitness(),
                top_genes: champion.gene_count(),
                top_neurons: champion.neuron_count(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("apex-neat-brain-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn inference_mode_ignores_training_calls() {
        let dir = scratch_dir("inference");
        let mut brain = Brain::with_dir(false, EngineContext::from_seed(42), &dir);

        let before = brain.stats();
        brain.appraise(100.0);
        brain.advance_in_train();
        let after = brain.stats();
        assert_eq!(before, after);
        assert_eq!(after.species, 0);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn inference_without_champion_still_drives() {
        let dir = scratch_dir("bootstrap");
        let brain = Brain::with_dir(false, EngineContext::from_seed(42), &dir);
        let inputs = [0.5_f32; INPUTS];
        let mut outputs = [0.0_f32; OUTPUTS];
        brain.evaluate(&inputs, &mut outputs);
        assert!(outputs.iter().all(|output| (-1.0..=1.0).contains(output)));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn training_mode_reaches_the_gym() {
        let dir = scratch_dir("training");
        {
            let mut brain = Brain::with_dir(true, EngineContext::from_seed(42), &dir);
            brain.appraise(2.5);
            assert_eq!(brain.stats().fitness, 2.5);
            brain.advance_in_train();
            assert_eq!(brain.stats().fitness, 0.0);
        }
        let _ = fs::remove_dir_all(&dir);
    }
}
