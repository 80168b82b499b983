//! Compile-time engine settings.
//!
//! Everything the engine can be tuned by lives here as a constant; there is
//! no runtime configuration file. Changing `INPUTS` or `OUTPUTS` invalidates
//! any previously persisted genome.

/// Controller input arity. Input order is a caller contract.
pub const INPUTS: usize = 76;
/// Controller output arity. Output order survives evolution.
pub const OUTPUTS: usize = 6;
/// Hard cap on neurons per genome; node mutation stops growing past it.
pub const NEURON_LIMIT: usize = 1000;
/// Bootstrap genomes fully connect every input to every output when set,
/// otherwise start with no links at all.
pub const BASIC_FULL_LINK: bool = true;

/// Target population across all species.
pub const GYM_POPULATION: usize = 100;
/// Minimum breed quota for a species to survive the weak-species pass.
pub const SPECIES_BREED_THRESHOLD: usize = 3;
/// Minimum member count for a species to survive the stale-species pass.
pub const SPECIES_STALE_THRESHOLD: usize = 5;
/// Disjoint-rating multiplier in the compatibility test.
pub const SPECIES_DELTA_DISJOINT: f32 = 0.4;
/// Weight-difference multiplier in the compatibility test.
pub const SPECIES_DELTA_WEIGHTS: f32 = 0.6;
/// Maximum weighted distance for two genomes to share a species.
pub const SPECIES_DELTA_THRESHOLD: f32 = 0.5;

/// Gene weight span, as in `[LINK_OFFSET, LINK_OFFSET + LINK_RANGE]`.
pub const LINK_RANGE: f32 = 2.0;
/// Gene weight offset.
pub const LINK_OFFSET: f32 = -1.0;
/// Neuron activation span, as in `[SIGMOID_OFFSET, SIGMOID_OFFSET + SIGMOID_RANGE]`.
pub const SIGMOID_RANGE: f32 = 2.0;
/// How fast the activation saturates. Negative: the logistic rises with its input.
pub const SIGMOID_GROWTH_RATE: f32 = -4.9;
/// Neuron activation offset.
pub const SIGMOID_OFFSET: f32 = -1.0;

/// Chance of a weight mutation per `mutate` call.
pub const MUTATE_WEIGHT_CHANCE: f32 = 0.4;
/// Chance the weight mutation touches every gene instead of one.
pub const MUTATE_WEIGHT_ALL_CHANCE: f32 = 0.3;
/// Chance a touched weight is redrawn instead of nudged.
pub const MUTATE_WEIGHT_NEW_RANDOM_CHANCE: f32 = 0.2;
/// Full span of a weight nudge, centred on zero.
pub const MUTATE_WEIGHT_DEVIATION_RANGE: f32 = 0.2;
/// Chance of a node-split mutation per `mutate` call.
pub const MUTATE_NODE_CHANCE: f32 = 0.3;
/// Chance of a new-link mutation per `mutate` call.
pub const MUTATE_LINK_CHANCE: f32 = 0.3;
/// Chance of an enable-toggle mutation per `mutate` call.
pub const MUTATE_STATE_CHANCE: f32 = 0.5;
/// Chance the toggle flips every incoming gene of one neuron instead of one gene.
pub const MUTATE_STATE_INVERT_ALL_NEURON_GENES_CHANCE: f32 = 0.0;

/// Chance a bred child is a crossover instead of a champion clone.
pub const CROSSOVER_CHANCE: f32 = 0.75;
/// Chance an unmatched gene of the weaker parent is inherited.
pub const CROSSOVER_GENE_ADDITION: f32 = 0.5;
