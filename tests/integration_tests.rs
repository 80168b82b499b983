//! Integration tests for apex-neat: full training cycles and champion
//! persistence across engine lifetimes.

use std::fs;
use std::path::PathBuf;

use apex_neat::{store, Brain, EngineContext, Gene, Genome, Gym, INPUTS, OUTPUTS};

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("apex-neat-it-{tag}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn assert_same_structure(expected: &Genome, actual: &Genome) {
    assert_eq!(expected.generation(), actual.generation());
    assert_eq!(expected.fitness(), actual.fitness());
    assert_eq!(expected.neuron_count(), actual.neuron_count());
    assert_eq!(expected.gene_count(), actual.gene_count());
    for (left, right) in expected.genes().iter().zip(actual.genes()) {
        assert_eq!(left.from, right.from);
        assert_eq!(left.to, right.to);
        assert_eq!(left.enabled, right.enabled);
        assert_eq!(left.weight.to_bits(), right.weight.to_bits());
    }
}

#[test]
fn champion_survives_an_idle_gym_lifetime() {
    let dir = scratch_dir("idle-gym");
    let mut ctx = EngineContext::from_seed(42);

    // A recognisable champion: a mutated bootstrap with a high fitness.
    let mut champion = Genome::bootstrap(&mut ctx);
    for _ in 0..30 {
        champion.mutate(&mut ctx);
    }
    champion.set_generation(9);
    champion.set_fitness(42.0);
    store::save_final(&champion, &dir).unwrap();

    // A gym that trains for zero steps must hand the champion back intact.
    {
        let gym = Gym::with_dir(EngineContext::from_seed(7), &dir);
        assert_eq!(gym.stats().generation, 9);
        assert_eq!(gym.stats().top_fitness, 42.0);
    }

    let restored = store::load_champion(&dir, &mut ctx).unwrap();
    assert_same_structure(&champion, &restored);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn better_cursor_genome_wins_the_final_save() {
    let dir = scratch_dir("cursor-save");
    {
        let mut brain = Brain::with_dir(true, EngineContext::from_seed(3), &dir);
        // The genome under evaluation outruns the (bootstrap) champion.
        brain.appraise(17.5);
    }
    let mut ctx = EngineContext::from_seed(1);
    let restored = store::load_champion(&dir, &mut ctx).unwrap();
    assert_eq!(restored.fitness(), 17.5);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn one_full_generation_of_training() {
    let dir = scratch_dir("full-gen");
    let mut brain = Brain::with_dir(true, EngineContext::from_seed(42), &dir);
    assert_eq!(brain.stats().generation, 0);

    let sensors = [0.5_f32; INPUTS];
    let mut actuators = [0.0_f32; OUTPUTS];

    // Drive one episode per genome; the hundredth advance wraps the
    // cursor and rolls the generation.
    let mut episodes = 0;
    while brain.stats().generation == 0 {
        brain.evaluate(&sensors, &mut actuators);
        for actuator in actuators {
            assert!((-1.0..=1.0).contains(&actuator));
        }
        brain.appraise(1.0 + episodes as f32);
        brain.advance_in_train();
        episodes += 1;
        assert!(episodes <= 100, "generation never advanced");
    }

    assert_eq!(episodes, 100);
    let stats = brain.stats();
    assert_eq!(stats.generation, 1);
    assert!(stats.species >= 1);
    assert_eq!(stats.top_fitness, 100.0);

    // The per-generation snapshot was written alongside the directory.
    let snapshots: Vec<_> = fs::read_dir(&dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with("top_genome_generation_")
        })
        .collect();
    assert!(!snapshots.is_empty());

    drop(brain);
    let mut ctx = EngineContext::from_seed(5);
    let restored = store::load_champion(&dir, &mut ctx).unwrap();
    assert_eq!(restored.fitness(), 100.0);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn inference_runs_the_persisted_champion() {
    let dir = scratch_dir("inference");
    let mut ctx = EngineContext::from_seed(42);

    // Hand-build a champion with a known response: one strong link from
    // sensor 0 to the first actuator.
    let mut gene = Gene::new(&mut ctx, 0, INPUTS, true);
    gene.weight = 1.0;
    let champion = Genome::from_parts(4, 8.0, INPUTS + OUTPUTS, vec![gene]);
    store::save_final(&champion, &dir).unwrap();

    let brain = Brain::with_dir(false, EngineContext::from_seed(9), &dir);
    let stats = brain.stats();
    assert_eq!(stats.generation, 4);
    assert_eq!(stats.top_fitness, 8.0);
    assert_eq!(stats.top_genes, 1);

    let mut sensors = [0.0_f32; INPUTS];
    sensors[0] = 1.0;
    let mut actuators = [0.0_f32; OUTPUTS];
    brain.evaluate(&sensors, &mut actuators);

    // sigmoid(1.0) under the default shape, pushed well above centre.
    let expected = 2.0 / (1.0 + (-4.9_f32).exp()) - 1.0;
    assert!((actuators[0] - expected).abs() < 1e-6);
    for &actuator in &actuators[1..] {
        assert_eq!(actuator, 0.0, "unwired actuators stay untouched");
    }
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn training_resumes_from_the_prior_generation() {
    let dir = scratch_dir("resume");
    let mut ctx = EngineContext::from_seed(42);
    let mut champion = Genome::bootstrap(&mut ctx);
    champion.set_generation(31);
    champion.set_fitness(5.0);
    store::save_final(&champion, &dir).unwrap();

    let brain = Brain::with_dir(true, EngineContext::from_seed(2), &dir);
    assert_eq!(brain.stats().generation, 31);
    drop(brain);
    let _ = fs::remove_dir_all(&dir);
}
