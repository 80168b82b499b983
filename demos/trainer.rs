//! Synthetic training demo.
//!
//! Evolves a controller against a toy steering task: given a constant
//! sensor frame, the first actuator should push towards a fixed target.
//! There is no simulator here; the point is to watch fitness climb and
//! the champion land in `genomes/` exactly as a real bridge would see it.
//!
//! Run with: `cargo run --example trainer`

use apex_neat::{Brain, EngineContext, INPUTS, OUTPUTS};

const EPISODES: usize = 2_000;
const TARGET: f32 = 0.6;

fn sensor_frame(episode: usize) -> [f32; INPUTS] {
    let mut sensors = [0.0_f32; INPUTS];
    for (index, sensor) in sensors.iter_mut().enumerate() {
        // A stable, vaguely track-shaped pattern with mild episode drift.
        let phase = (index + episode % 7) as f32;
        *sensor = (phase.sin() * 0.5 + 0.5).clamp(0.0, 1.0);
    }
    sensors
}

fn main() {
    tracing_subscriber::fmt().compact().init();

    let mut brain = Brain::new(true, EngineContext::new());
    let mut best = f32::MIN;

    for episode in 0..EPISODES {
        let sensors = sensor_frame(episode);
        let mut actuators = [0.0_f32; OUTPUTS];
        brain.evaluate(&sensors, &mut actuators);

        // Closer to the steering target is better; a perfect episode
        // scores 100.
        let miss = (actuators[0] - TARGET).abs();
        let fitness = 100.0 * (1.0 - miss / 2.0);
        brain.appraise(fitness);
        brain.advance_in_train();

        if fitness > best {
            best = fitness;
            println!("episode {episode:5}: new best fitness {fitness:.3}");
        }
        if episode % 500 == 0 {
            let stats = brain.stats();
            println!(
                "episode {episode:5}: generation {} with {} species, top fitness {:.3}",
                stats.generation, stats.species, stats.top_fitness
            );
        }
    }

    let stats = brain.stats();
    println!(
        "done: generation {}, top fitness {:.3} ({} genes, {} neurons)",
        stats.generation, stats.top_fitness, stats.top_genes, stats.top_neurons
    );
}
