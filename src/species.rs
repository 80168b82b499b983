//! Species: clusters of compatible genomes and their breeding quotas.

use crate::context::EngineContext;
use crate::genome::Genome;
use crate::settings;

/// A compatibility cluster. Once culled the member list is sorted
/// descending by fitness, so element 0 doubles as the representative the
/// membership test runs against and as the breeding champion.
#[derive(Debug, Clone, Default)]
pub struct Species {
    pub(crate) genomes: Vec<Genome>,
}

impl Species {
    /// A new species seeded with its founding genome.
    #[must_use]
    pub fn around(genome: Genome) -> Self {
        Self {
            genomes: vec![genome],
        }
    }

    /// Whether `genome` is compatible with this species' representative.
    #[must_use]
    pub fn admits(&self, genome: &Genome) -> bool {
        let (disjoint, weights) = self.genomes[0].compare(genome);
        settings::SPECIES_DELTA_DISJOINT * disjoint + settings::SPECIES_DELTA_WEIGHTS * weights
            < settings::SPECIES_DELTA_THRESHOLD
    }

    /// Arithmetic mean of member fitness, 0 when empty.
    #[must_use]
    pub fn average_fitness(&self) -> f32 {
        if self.genomes.is_empty() {
            return 0.0;
        }
        let total: f32 = self.genomes.iter().map(Genome::fitness).sum();
        total / self.genomes.len() as f32
    }

    /// Offspring quota: this species' share of the population by average
    /// fitness, less the champion slot, clamped at zero. A population that
    /// was never appraised breeds nothing.
    #[must_use]
    pub fn breed_count(&self, total_average_fitness: f32) -> usize {
        if total_average_fitness <= 0.0 {
            return 0;
        }
        let share = self.average_fitness() / total_average_fitness;
        let quota = (share * settings::GYM_POPULATION as f32).floor() as usize;
        quota.saturating_sub(1)
    }

    /// Breed one child: a crossover of the champion with a random member
    /// with probability `CROSSOVER_CHANCE`, else a plain champion clone.
    #[must_use]
    pub fn breed_child(&self, ctx: &mut EngineContext) -> Genome {
        let champion = &self.genomes[0];
        if ctx.random() < settings::CROSSOVER_CHANCE {
            let partner = &self.genomes[ctx.random_index(self.genomes.len())];
            champion.crossover(partner, ctx)
        } else {
            champion.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::relative_eq;

    fn test_ctx() -> EngineContext {
        EngineContext::from_seed(42)
    }

    fn genome_with_fitness(ctx: &mut EngineContext, fitness: f32) -> Genome {
        let mut genome = Genome::bootstrap(ctx);
        genome.set_fitness(fitness);
        genome
    }

    #[test]
    fn average_fitness_is_the_arithmetic_mean() {
        let mut ctx = test_ctx();
        let species = Species {
            genomes: vec![
                genome_with_fitness(&mut ctx, 1.0),
                genome_with_fitness(&mut ctx, 2.0),
                genome_with_fitness(&mut ctx, 6.0),
            ],
        };
        assert!(relative_eq!(species.average_fitness(), 3.0));
        assert_eq!(Species::default().average_fitness(), 0.0);
    }

    #[test]
    fn admits_its_own_kind() {
        let mut ctx = test_ctx();
        let genome = Genome::bootstrap(&mut ctx);
        let species = Species::around(genome.clone());
        assert!(species.admits(&genome));
    }

    #[test]
    fn breed_count_tracks_fitness_share() {
        let mut ctx = test_ctx();
        let strong = Species {
            genomes: vec![genome_with_fitness(&mut ctx, 3.0)],
        };
        let weak = Species {
            genomes: vec![genome_with_fitness(&mut ctx, 1.0)],
        };
        let total = strong.average_fitness() + weak.average_fitness();
        // 3/4 and 1/4 of the population, champion slot deducted.
        assert_eq!(strong.breed_count(total), 74);
        assert_eq!(weak.breed_count(total), 24);
    }

    #[test]
    fn breed_count_clamps_at_zero() {
        let mut ctx = test_ctx();
        let species = Species {
            genomes: vec![genome_with_fitness(&mut ctx, 0.001)],
        };
        // A sliver of the population floors to zero, not below.
        assert_eq!(species.breed_count(1000.0), 0);
        // An unappraised population breeds nothing at all.
        assert_eq!(species.breed_count(0.0), 0);
    }

    #[test]
    fn breed_child_builds_on_the_champion() {
        let mut ctx = test_ctx();
        let champion = genome_with_fitness(&mut ctx, 5.0);
        let mut follower = champion.clone();
        follower.set_fitness(1.0);
        let species = Species {
            genomes: vec![champion.clone(), follower],
        };
        for _ in 0..20 {
            let child = species.breed_child(&mut ctx);
            // Clone or crossover, the child always starts from the champion.
            assert!(child.gene_count() >= champion.gene_count());
            assert_eq!(child.fitness(), champion.fitness());
        }
    }
}
