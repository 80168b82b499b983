//! Genomes: evolvable feed-forward networks and their mutation operators.
//!
//! A genome is a neuron count plus an ordered gene list. Neuron indices
//! `[0, INPUTS)` are inputs, the trailing `OUTPUTS` indices are outputs,
//! anything in between is hidden. Every enabled gene keeps `from < to`,
//! which makes one ascending index pass a valid evaluation order: a neuron
//! is fully computed before anything downstream reads it.

use crate::context::EngineContext;
use crate::gene::Gene;
use crate::settings::{self, INPUTS, OUTPUTS};

/// Per-evaluation view of one neuron: its activation plus the indices of
/// its incoming genes. Carrying indices into the gene list (rather than
/// references) keeps the borrow of the network scoped to one forward pass.
struct Neuron {
    incoming: Vec<usize>,
    value: f32,
}

impl Neuron {
    fn new(index: usize, network: &[Gene]) -> Self {
        let incoming = if index < INPUTS {
            Vec::new()
        } else {
            network
                .iter()
                .enumerate()
                .filter(|(_, gene)| gene.to == index)
                .map(|(gene_index, _)| gene_index)
                .collect()
        };
        Self {
            incoming,
            value: 0.0,
        }
    }
}

/// One candidate controller network.
#[derive(Debug, Clone)]
pub struct Genome {
    fitness: f32,
    generation: usize,
    total_neurons: usize,
    network: Vec<Gene>,
}

impl Genome {
    /// The starting genome: `INPUTS + OUTPUTS` neurons, fully meshed from
    /// every input to every output when `BASIC_FULL_LINK` is set, linkless
    /// otherwise.
    #[must_use]
    pub fn bootstrap(ctx: &mut EngineContext) -> Self {
        let total_neurons = INPUTS + OUTPUTS;
        let mut network = Vec::new();
        if settings::BASIC_FULL_LINK {
            network.reserve(INPUTS * OUTPUTS);
            for to in INPUTS..total_neurons {
                for from in 0..INPUTS {
                    network.push(Gene::new(ctx, from, to, true));
                }
            }
        }
        Self {
            fitness: 0.0,
            generation: 0,
            total_neurons,
            network,
        }
    }

    /// Assembles a genome from already-built parts. Used by persistence
    /// when restoring a champion; callers own the structural invariants.
    #[must_use]
    pub fn from_parts(
        generation: usize,
        fitness: f32,
        total_neurons: usize,
        network: Vec<Gene>,
    ) -> Self {
        debug_assert!(network
            .iter()
            .all(|gene| gene.from < total_neurons && gene.to < total_neurons));
        debug_assert!(network.iter().all(|gene| !gene.enabled || gene.from < gene.to));
        Self {
            fitness,
            generation,
            total_neurons,
            network,
        }
    }

    /// Fitness of the last appraised episode.
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    /// Generation this genome belongs to.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    /// Number of neurons, inputs and outputs included.
    #[must_use]
    pub fn neuron_count(&self) -> usize {
        self.total_neurons
    }

    /// Number of genes, disabled ones included.
    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.network.len()
    }

    /// The ordered gene list.
    #[must_use]
    pub fn genes(&self) -> &[Gene] {
        &self.network
    }

    /// One forward pass: sensor vector in, actuator vector out.
    ///
    /// A linkless network leaves `outputs` untouched. Otherwise every
    /// neuron with at least one incoming gene is set to the sigmoid of its
    /// weighted input sum, walking indices in ascending order, and the last
    /// `OUTPUTS` neuron values are copied out.
    ///
    /// # Panics
    ///
    /// Panics if any input lies outside `[0, 1]`.
    pub fn evaluate(&self, inputs: &[f32; INPUTS], outputs: &mut [f32; OUTPUTS]) {
        for &input in inputs.iter() {
            assert!(
                (0.0..=1.0).contains(&input),
                "input outside [0, 1]: {input}"
            );
        }
        if self.network.is_empty() {
            return;
        }

        let mut neurons: Vec<Neuron> = (0..self.total_neurons)
            .map(|index| Neuron::new(index, &self.network))
            .collect();
        for (neuron, &input) in neurons.iter_mut().zip(inputs.iter()) {
            neuron.value = input;
        }

        for index in INPUTS..self.total_neurons {
            if neurons[index].incoming.is_empty() {
                continue;
            }
            let mut sum = 0.0;
            for &gene_index in &neurons[index].incoming {
                let gene = &self.network[gene_index];
                if gene.enabled {
                    sum += neurons[gene.from].value * gene.weight;
                }
            }
            neurons[index].value = settings::SIGMOID_RANGE
                / (1.0 + (settings::SIGMOID_GROWTH_RATE * sum).exp())
                + settings::SIGMOID_OFFSET;
        }

        let output_offset = self.total_neurons - OUTPUTS;
        for (index, output) in outputs.iter_mut().enumerate() {
            *output = neurons[output_offset + index].value;
        }
        debug_assert!(outputs.iter().all(|output| {
            (settings::LINK_OFFSET..=settings::LINK_OFFSET + settings::LINK_RANGE)
                .contains(output)
        }));
    }

    /// One mutation round. Each of the four mutation classes rolls its own
    /// gate independently; a round can apply none or all of them.
    pub fn mutate(&mut self, ctx: &mut EngineContext) {
        debug_assert!(self.total_neurons >= INPUTS + OUTPUTS);
        if ctx.random() < settings::MUTATE_WEIGHT_CHANCE {
            self.mutate_weight(ctx);
        }
        if ctx.random() < settings::MUTATE_NODE_CHANCE
            && self.total_neurons < settings::NEURON_LIMIT
        {
            self.mutate_node(ctx);
        }
        if ctx.random() < settings::MUTATE_LINK_CHANCE {
            self.mutate_link(ctx);
        }
        if ctx.random() < settings::MUTATE_STATE_CHANCE {
            self.mutate_state(ctx);
        }
    }

    /// Compatibility distance to `other`, as `(disjoint, weights)`.
    ///
    /// Genes are aligned by innovation number. `weights` is the mean
    /// absolute weight difference over aligned pairs (0 with no pairs, and
    /// symmetric in the operands). `disjoint` folds the unaligned count of
    /// `self` and the full size of `other` over the larger gene count; it
    /// is 1.0 for two identical genomes and grows with divergence.
    ///
    /// Two linkless genomes compare as `(0, 0)`; a linkless genome against
    /// a linked one is `(1, 1)` in either direction.
    #[must_use]
    pub fn compare(&self, other: &Genome) -> (f32, f32) {
        if self.network.is_empty() && other.network.is_empty() {
            return (0.0, 0.0);
        }
        if self.network.is_empty() || other.network.is_empty() {
            return (1.0, 1.0);
        }

        let mut weights = 0.0f32;
        let mut coincident = 0.0f32;
        let mut disjoint = 0.0f32;
        for gene in &self.network {
            match other
                .network
                .iter()
                .find(|candidate| gene.same_innovation(candidate))
            {
                Some(matching) => {
                    weights += (gene.weight - matching.weight).abs();
                    coincident += 1.0;
                }
                None => disjoint += 1.0,
            }
        }

        let maximum_genes = self.network.len().max(other.network.len()) as f32;
        let disjoint = (disjoint + other.network.len() as f32) / maximum_genes;
        let weights = if coincident == 0.0 {
            0.0
        } else {
            weights / coincident
        };
        (disjoint, weights)
    }

    /// Child of `self` and `other`, with `self` as the fitter parent.
    ///
    /// The child starts as a clone of `self` with the larger neuron count
    /// of the two parents; every `other` gene absent from `self` (by
    /// innovation or by endpoints) is inherited with probability
    /// `CROSSOVER_GENE_ADDITION`.
    #[must_use]
    pub fn crossover(&self, other: &Genome, ctx: &mut EngineContext) -> Genome {
        let mut child = self.clone();
        if self.network.is_empty() && other.network.is_empty() {
            return child;
        }
        child.total_neurons = self.total_neurons.max(other.total_neurons);
        for other_gene in &other.network {
            let present = self.network.iter().any(|gene| gene.matches(other_gene));
            if !present && ctx.random() < settings::CROSSOVER_GENE_ADDITION {
                child.network.push(other_gene.clone());
            }
        }
        child
    }

    /// Weight mutation: hit every gene or one random gene, redrawing or
    /// nudging the chosen target(s).
    fn mutate_weight(&mut self, ctx: &mut EngineContext) {
        if self.network.is_empty() {
            return;
        }
        if ctx.random() < settings::MUTATE_WEIGHT_ALL_CHANCE {
            if ctx.random() < settings::MUTATE_WEIGHT_NEW_RANDOM_CHANCE {
                for gene in &mut self.network {
                    gene.randomize_weight(ctx);
                }
            } else {
                for gene in &mut self.network {
                    gene.deviate_weight(ctx);
                }
            }
        } else {
            let target = ctx.random_index(self.network.len());
            if ctx.random() < settings::MUTATE_WEIGHT_NEW_RANDOM_CHANCE {
                self.network[target].randomize_weight(ctx);
            } else {
                self.network[target].deviate_weight(ctx);
            }
        }
    }

    /// State mutation: toggle one random gene, or every incoming gene of
    /// one random neuron.
    fn mutate_state(&mut self, ctx: &mut EngineContext) {
        if self.network.is_empty() {
            return;
        }
        if ctx.random() < settings::MUTATE_STATE_INVERT_ALL_NEURON_GENES_CHANCE {
            let target = ctx.random_index(self.total_neurons);
            for gene in &mut self.network {
                if gene.to == target {
                    gene.enabled = !gene.enabled;
                }
            }
        } else {
            let target = ctx.random_index(self.network.len());
            self.network[target].enabled = !self.network[target].enabled;
        }
    }

    /// Link mutation: wire two random neurons, avoiding outputs as sources
    /// and inputs as sinks. A same-neuron pick or an already-wired pair is
    /// a no-op. The new gene is oriented low index to high index.
    fn mutate_link(&mut self, ctx: &mut EngineContext) {
        let source = ctx.random_index(self.total_neurons - OUTPUTS);
        let sink = ctx.random_index(self.total_neurons - INPUTS) + INPUTS;
        if source == sink {
            return;
        }
        if self.has_link(source, sink) || self.has_link(sink, source) {
            return;
        }
        let (low, high) = oriented(source, sink);
        self.network.push(Gene::new(ctx, low, high, true));
    }

    /// Node mutation: split one random enabled gene `a -> b` into
    /// `a -> h -> b` through a fresh hidden neuron, disabling the original.
    ///
    /// The new neuron slides in just before the output block, or at the
    /// split gene's destination when that is still a hidden slot; every
    /// gene index at or past the insertion point shifts up by one. Both
    /// replacement genes are oriented to keep the ascending evaluation
    /// order intact.
    fn mutate_node(&mut self, ctx: &mut EngineContext) {
        if self.network.is_empty() {
            return;
        }
        let target = ctx.random_index(self.network.len());
        if !self.network[target].enabled {
            return;
        }
        self.network[target].enabled = false;
        let from = self.network[target].from;
        let to = self.network[target].to;

        let first_output = self.total_neurons - OUTPUTS;
        let pivot = to.min(first_output);
        self.total_neurons += 1;

        for gene in &mut self.network {
            if gene.from >= pivot {
                gene.from += 1;
            }
            if gene.to >= pivot {
                gene.to += 1;
            }
        }

        let (bottom_from, bottom_to) = oriented(from, pivot);
        let (top_from, top_to) = oriented(pivot, to + 1);
        self.network.push(Gene::new(ctx, bottom_from, bottom_to, true));
        self.network.push(Gene::new(ctx, top_from, top_to, true));
    }

    fn has_link(&self, from: usize, to: usize) -> bool {
        self.network
            .iter()
            .any(|gene| gene.from == from && gene.to == to)
    }
}

fn oriented(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
