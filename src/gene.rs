//! Connection genes, the atoms a genome's network is built from.

use crate::context::EngineContext;
use crate::settings;

/// A directed, weighted, enable-flagged connection between two neuron
/// indices, tagged with the innovation number issued at creation.
///
/// `innovation`, `from` and `to` are structural: they only ever change
/// through the index renumbering node insertion performs. `weight` and
/// `enabled` are the evolvable state.
#[derive(Debug, Clone)]
pub struct Gene {
    /// Historical origin marker, unique per structurally new connection.
    pub innovation: u64,
    /// Source neuron index.
    pub from: usize,
    /// Destination neuron index. Enabled genes keep `from < to`, so a
    /// single ascending pass evaluates every source before its sinks.
    pub to: usize,
    /// Link weight in `[LINK_OFFSET, LINK_OFFSET + LINK_RANGE]`.
    pub weight: f32,
    /// Disabled genes are skipped during evaluation but kept for crossover.
    pub enabled: bool,
}

impl Gene {
    /// New gene with a fresh innovation number and a random weight.
    pub fn new(ctx: &mut EngineContext, from: usize, to: usize, enabled: bool) -> Self {
        debug_assert_ne!(from, to, "a gene cannot loop a neuron onto itself");
        let mut gene = Self {
            innovation: ctx.next_innovation(),
            from,
            to,
            weight: 0.0,
            enabled,
        };
        gene.randomize_weight(ctx);
        gene
    }

    /// Redraw the weight uniformly over the full link range.
    pub fn randomize_weight(&mut self, ctx: &mut EngineContext) {
        self.weight = ctx.random() * settings::LINK_RANGE + settings::LINK_OFFSET;
    }

    /// Nudge the weight by a uniform draw centred on zero, clamped back
    /// into the link range.
    pub fn deviate_weight(&mut self, ctx: &mut EngineContext) {
        let deviation = settings::MUTATE_WEIGHT_DEVIATION_RANGE;
        self.weight += ctx.random() * deviation - deviation / 2.0;
        self.weight = self.weight.clamp(
            settings::LINK_OFFSET,
            settings::LINK_OFFSET + settings::LINK_RANGE,
        );
    }

    /// Historical equality. The compatibility metric aligns genes by this.
    #[must_use]
    pub fn same_innovation(&self, other: &Gene) -> bool {
        self.innovation == other.innovation
    }

    /// Structural equality: the two genes wire the same neuron pair.
    #[must_use]
    pub fn same_endpoints(&self, other: &Gene) -> bool {
        self.from == other.from && self.to == other.to
    }

    /// Either equality. Crossover gene-presence tests use the union.
    #[must_use]
    pub fn matches(&self, other: &Gene) -> bool {
        self.same_innovation(other) || self.same_endpoints(other)
    }
}
