//! The population manager: speciation, the evaluation cursor, and the
//! generational pipeline.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::context::EngineContext;
use crate::genome::Genome;
use crate::settings::{self, INPUTS, OUTPUTS};
use crate::species::Species;
use crate::store;

/// A snapshot of the training state, for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GymStats {
    /// Current generation.
    pub generation: usize,
    /// Number of live species.
    pub species: usize,
    /// Fitness of the genome under evaluation.
    pub fitness: f32,
    /// Fitness of the champion.
    pub top_fitness: f32,
    /// Gene count of the champion.
    pub top_genes: usize,
    /// Neuron count of the champion.
    pub top_neurons: usize,
}

/// Owns every species, walks the evaluation cursor across them, and runs
/// the generational loop. On drop it persists the better of the stored
/// champion and the genome under the cursor.
pub struct Gym {
    ctx: EngineContext,
    all_species: Vec<Species>,
    current_species: usize,
    current_genome: usize,
    generation: usize,
    top_fitness_genome: Genome,
    genome_dir: PathBuf,
}

impl Gym {
    /// Gym rooted at the default `genomes/` directory.
    #[must_use]
    pub fn new(ctx: EngineContext) -> Self {
        Self::with_dir(ctx, store::DEFAULT_GENOME_DIR)
    }

    /// Gym persisting under `genome_dir`. Loads the champion from there
    /// (or bootstraps one), resumes its generation counter, and seeds the
    /// population with mutated clones of it.
    pub fn with_dir(mut ctx: EngineContext, genome_dir: impl Into<PathBuf>) -> Self {
        let genome_dir = genome_dir.into();
        let top_fitness_genome = store::load_or_bootstrap(&genome_dir, &mut ctx);
        let generation = top_fitness_genome.generation();
        let mut gym = Self {
            ctx,
            all_species: Vec::new(),
            current_species: 0,
            current_genome: 0,
            generation,
            top_fitness_genome,
            genome_dir,
        };
        for _ in 0..settings::GYM_POPULATION {
            let mut genome = gym.top_fitness_genome.clone();
            genome.mutate(&mut gym.ctx);
            gym.add_to_respective_species(genome);
        }
        gym
    }

    /// Forward pass through the genome under the cursor.
    pub fn evaluate_current(&self, inputs: &[f32; INPUTS], outputs: &mut [f32; OUTPUTS]) {
        self.current().evaluate(inputs, outputs);
    }

    /// Records the episode fitness on the genome under the cursor.
    pub fn appraise_current(&mut self, fitness: f32) {
        self.current_mut().set_fitness(fitness);
    }

    /// Moves the cursor to the next genome, walking species in order; once
    /// every genome has been evaluated the generation advances and the
    /// cursor wraps to the start.
    ///
    /// # Panics
    ///
    /// Panics if the gym holds no species, which indicates a bug in the
    /// generational pipeline.
    pub fn advance_in_train(&mut self) {
        assert!(
            !self.all_species.is_empty(),
            "gym has no species to advance through"
        );
        self.current_genome += 1;
        if self.current_genome < self.all_species[self.current_species].genomes.len() {
            return;
        }
        self.current_genome = 0;
        self.current_species += 1;
        if self.current_species < self.all_species.len() {
            return;
        }
        self.current_species = 0;
        self.advance_generation();
    }

    /// Current training statistics.
    #[must_use]
    pub fn stats(&self) -> GymStats {
        GymStats {
            generation: self.generation,
            species: self.all_species.len(),
            fitness: self.current().fitness(),
            top_fitness: self.top_fitness_genome.fitness(),
            top_genes: self.top_fitness_genome.gene_count(),
            top_neurons: self.top_fitness_genome.neuron_count(),
        }
    }

    /// One generational step. The stage order is load-bearing: the
    /// champion snapshot must land between the stale pass and the weak
    /// pass, and breeding must see the pre-full-cull populations.
    pub fn advance_generation(&mut self) {
        assert!(!self.all_species.is_empty());
        // 1. Keep the top half of every species.
        self.cull_species(true);
        // 2. Drop under-populated species, best species excepted.
        self.remove_stale_species();
        // 3. Snapshot the champion while its species still leads the sort.
        self.top_fitness_genome = self.all_species[0].genomes[0].clone();
        if let Err(error) = store::save_snapshot(&self.top_fitness_genome, &self.genome_dir) {
            warn!(%error, "failed to write the generation snapshot");
        }
        // 4. Drop species whose breed quota is below the survival bar.
        self.remove_weak_species();
        // 5. Breed from the surviving half-populations.
        let children = self.breed_children();
        // 6. Reduce every species to its champion.
        self.cull_species(false);
        // 7. Mutate the children into the next population.
        for mut child in children {
            child.mutate(&mut self.ctx);
            self.add_to_respective_species(child);
        }
        // 8. Stamp the new generation on everyone.
        self.generation += 1;
        for species in &mut self.all_species {
            for genome in &mut species.genomes {
                genome.set_generation(self.generation);
            }
        }

        let stats = self.stats();
        info!(
            generation = stats.generation,
            species = stats.species,
            top_fitness = stats.top_fitness,
            top_genes = stats.top_genes,
            top_neurons = stats.top_neurons,
            "generation advanced"
        );
    }

    fn current(&self) -> &Genome {
        &self.all_species[self.current_species].genomes[self.current_genome]
    }

    fn current_mut(&mut self) -> &mut Genome {
        &mut self.all_species[self.current_species].genomes[self.current_genome]
    }

    /// Files the genome with the first species whose representative admits
    /// it, founding a new species when none does.
    fn add_to_respective_species(&mut self, genome: Genome) {
        for species in &mut self.all_species {
            if species.admits(&genome) {
                species.genomes.push(genome);
                return;
            }
        }
        self.all_species.push(Species::around(genome));
    }

    /// Sorts every species descending by fitness, then keeps the top half
    /// (or only the champion). Singleton species are left as they are.
    fn cull_species(&mut self, half_cull: bool) {
        for species in &mut self.all_species {
            if species.genomes.len() < 2 {
                continue;
            }
            species
                .genomes
                .sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
            let remaining = if half_cull {
                species.genomes.len() / 2
            } else {
                1
            };
            species.genomes.truncate(remaining);
        }
    }

    /// Sorts species by champion fitness and drops every species past the
    /// first that fell under the stale member threshold.
    fn remove_stale_species(&mut self) {
        if self.all_species.len() < 2 {
            return;
        }
        self.all_species
            .sort_by(|a, b| b.genomes[0].fitness().total_cmp(&a.genomes[0].fitness()));
        let mut index = 0;
        self.all_species.retain(|species| {
            let keep = index == 0 || species.genomes.len() >= settings::SPECIES_STALE_THRESHOLD;
            index += 1;
            keep
        });
    }

    /// Drops every species past the first whose breed quota falls under
    /// the survival bar.
    fn remove_weak_species(&mut self) {
        if self.all_species.len() < 2 {
            return;
        }
        let total_average_fitness = self.total_average_fitness();
        let mut index = 0;
        self.all_species.retain(|species| {
            let keep = index == 0
                || species.breed_count(total_average_fitness) >= settings::SPECIES_BREED_THRESHOLD;
            index += 1;
            keep
        });
    }

    fn total_average_fitness(&self) -> f32 {
        self.all_species.iter().map(Species::average_fitness).sum()
    }

    /// Collects every surviving species' offspring quota.
    fn breed_children(&mut self) -> Vec<Genome> {
        let total_average_fitness = self.total_average_fitness();
        let Self {
            all_species, ctx, ..
        } = self;
        let mut children = Vec::new();
        for species in all_species.iter() {
            for _ in 0..species.breed_count(total_average_fitness) {
                children.push(species.breed_child(ctx));
            }
        }
        children
    }
}

impl Drop for Gym {
    /// Persists the better of the cursor genome and the stored champion as
    /// the final champion.
    fn drop(&mut self) {
        let cursor = self
            .all_species
            .get(self.current_species)
            .and_then(|species| species.genomes.get(self.current_genome));
        let final_genome = match cursor {
            Some(current) if self.top_fitness_genome.fitness() < current.fitness() => current,
            _ => &self.top_fitness_genome,
        };
        if let Err(error) = store::save_final(final_genome, &self.genome_dir) {
            warn!(%error, "failed to persist the final champion");
        }
    }
}
