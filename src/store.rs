//! Champion persistence: the text genome format and the snapshot files.
//!
//! The format is three header lines (generation, fitness, neuron count)
//! followed by one `from to weight enabled` line per gene, all decimal and
//! whitespace-tolerant on read. Weights are written in the shortest form
//! that round-trips an `f32` exactly, so a save/load cycle is lossless.
//! Innovation numbers are not persisted: restored genes draw fresh ones.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::context::EngineContext;
use crate::gene::Gene;
use crate::genome::Genome;
use crate::settings::{INPUTS, OUTPUTS};

/// Directory the engine persists champions under.
pub const DEFAULT_GENOME_DIR: &str = "genomes";

const FINAL_FILE: &str = "top_genome_final.txt";

/// Failure while reading or writing a persisted genome. Every call site
/// treats these as recoverable: log, then fall back or carry on.
#[derive(Debug)]
pub enum PersistError {
    /// The underlying file operation failed.
    Io(io::Error),
    /// The file was readable but does not describe a valid genome.
    Malformed {
        /// The offending file.
        path: PathBuf,
        /// What was wrong with it.
        detail: String,
    },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(error) => write!(f, "genome file I/O failed: {error}"),
            PersistError::Malformed { path, detail } => {
                write!(f, "malformed genome file {}: {detail}", path.display())
            }
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(error) => Some(error),
            PersistError::Malformed { .. } => None,
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(error: io::Error) -> Self {
        PersistError::Io(error)
    }
}

fn malformed(path: &Path, detail: impl Into<String>) -> PersistError {
    PersistError::Malformed {
        path: path.to_path_buf(),
        detail: detail.into(),
    }
}

/// Creates the genome directory (`rwxrwxr-x` on Unix) if it is absent.
pub fn bootstrap_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new().recursive(true).mode(0o775).create(dir)
    }
    #[cfg(not(unix))]
    {
        fs::DirBuilder::new().recursive(true).create(dir)
    }
}

fn final_path(dir: &Path) -> PathBuf {
    dir.join(FINAL_FILE)
}

fn snapshot_path(dir: &Path, genome: &Genome) -> PathBuf {
    dir.join(format!(
        "top_genome_generation_{}_fitness_{:.6}.txt",
        genome.generation(),
        genome.fitness()
    ))
}

fn encode(genome: &Genome) -> String {
    let mut text = String::new();
    text.push_str(&format!("{}\n", genome.generation()));
    text.push_str(&format!("{}\n", genome.fitness()));
    text.push_str(&format!("{}\n", genome.neuron_count()));
    for gene in genome.genes() {
        text.push_str(&format!(
            "{} {} {} {}\n",
            gene.from,
            gene.to,
            gene.weight,
            u8::from(gene.enabled)
        ));
    }
    text
}

fn decode(path: &Path, text: &str, ctx: &mut EngineContext) -> Result<Genome, PersistError> {
    let mut numbers = Vec::new();
    for token in text.split_whitespace() {
        let value: f32 = token
            .parse()
            .map_err(|error| malformed(path, format!("bad token {token:?}: {error}")))?;
        numbers.push(value);
    }
    if numbers.len() < 3 {
        return Err(malformed(path, "missing header"));
    }
    if (numbers.len() - 3) % 4 != 0 {
        return Err(malformed(path, "gene records must have four fields"));
    }

    let generation = numbers[0] as usize;
    let fitness = numbers[1];
    let total_neurons = numbers[2] as usize;
    if total_neurons < INPUTS + OUTPUTS {
        return Err(malformed(
            path,
            format!("neuron count {total_neurons} is below the input/output block"),
        ));
    }

    let mut network = Vec::with_capacity((numbers.len() - 3) / 4);
    for record in numbers[3..].chunks_exact(4) {
        let from = record[0] as usize;
        let to = record[1] as usize;
        let enabled = record[3] != 0.0;
        if from >= total_neurons || to >= total_neurons || from == to || (enabled && from > to) {
            return Err(malformed(
                path,
                format!("gene {from} -> {to} breaks the evaluation order"),
            ));
        }
        let mut gene = Gene::new(ctx, from, to, enabled);
        gene.weight = record[2];
        network.push(gene);
    }
    Ok(Genome::from_parts(generation, fitness, total_neurons, network))
}

fn write_genome(genome: &Genome, path: &Path) -> Result<(), PersistError> {
    if let Some(dir) = path.parent() {
        bootstrap_dir(dir)?;
    }
    fs::write(path, encode(genome))?;
    Ok(())
}

/// Writes the per-generation (non-final) champion snapshot.
pub fn save_snapshot(genome: &Genome, dir: &Path) -> Result<(), PersistError> {
    write_genome(genome, &snapshot_path(dir, genome))
}

/// Writes the final champion, the one read back on the next start.
pub fn save_final(genome: &Genome, dir: &Path) -> Result<(), PersistError> {
    write_genome(genome, &final_path(dir))
}

/// Reads the persisted final champion from `dir`.
pub fn load_champion(dir: &Path, ctx: &mut EngineContext) -> Result<Genome, PersistError> {
    let path = final_path(dir);
    let text = fs::read_to_string(&path)?;
    decode(&path, &text, ctx)
}

/// The persisted champion if one is readable, otherwise the bootstrap
/// genome. A missing file is the normal first-run case and stays quiet;
/// anything else is logged before falling back.
pub fn load_or_bootstrap(dir: &Path, ctx: &mut EngineContext) -> Genome {
    if let Err(error) = bootstrap_dir(dir) {
        warn!(%error, dir = %dir.display(), "could not create the genome directory");
    }
    match load_champion(dir, ctx) {
        Ok(champion) => champion,
        Err(PersistError::Io(error)) if error.kind() == io::ErrorKind::NotFound => {
            Genome::bootstrap(ctx)
        }
        Err(error) => {
            warn!(%error, "champion unreadable, bootstrapping a fresh genome");
            Genome::bootstrap(ctx)
        }
    }
}
