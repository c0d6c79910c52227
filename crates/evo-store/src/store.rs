use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use evo_core::{GenerationStats, Transcript};
use evo_genome::{GenerationRecord, Genotype};
use tracing::info;

use crate::lock::LockedFile;
use crate::paths::{generation_file, generation_id_from_file_name, stats_file, transcripts_file};

/// File-backed persistence for one run directory (§6). Each generation
/// writes to distinct paths, guarded by an advisory lock so a concurrent
/// reader never observes a half-written file; the stats log is
/// append-only, one JSON object per line, also written under lock.
/// Grounded on `beagle_memory::engine::MemoryEngine`'s facade-over-disk
/// shape, narrowed from a database-backed store to plain files since
/// this spec's persistence contract is file-based.
pub struct Store {
    run_dir: PathBuf,
}

impl Store {
    pub fn new(run_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let run_dir = run_dir.into();
        fs::create_dir_all(&run_dir)
            .with_context(|| format!("creating run directory {}", run_dir.display()))?;
        Ok(Self { run_dir })
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Writes `gen_<N>.json` (genotypes only, per §6's file contract),
    /// `transcripts_gen_<N>.json`, and appends one line to
    /// `generation_stats.jsonl`.
    pub fn save_generation(&self, record: &GenerationRecord) -> anyhow::Result<()> {
        let genotypes: Vec<&Genotype> = record.individuals.iter().map(|i| &i.genotype).collect();
        self.write_locked_json(&generation_file(&self.run_dir, record.generation_id), &genotypes)?;
        self.write_locked_json(
            &transcripts_file(&self.run_dir, record.generation_id),
            &record.transcripts,
        )?;
        self.append_stats(&record.stats)?;

        info!(
            generation_id = record.generation_id,
            population = record.individuals.len(),
            "persisted generation"
        );
        Ok(())
    }

    pub fn append_stats(&self, stats: &GenerationStats) -> anyhow::Result<()> {
        let path = stats_file(&self.run_dir);
        let mut locked = LockedFile::open_exclusive(&path)?;
        locked.seek_to_end()?;
        let line = serde_json::to_string(stats)?;
        writeln!(locked, "{line}")?;
        Ok(())
    }

    pub fn load_generation(&self, generation_id: u64) -> anyhow::Result<Vec<Genotype>> {
        let path = generation_file(&self.run_dir, generation_id);
        let mut locked = LockedFile::open_exclusive(&path)?;
        let contents = locked.read_to_string()?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))
    }

    pub fn load_transcripts(&self, generation_id: u64) -> anyhow::Result<Vec<Transcript>> {
        let path = transcripts_file(&self.run_dir, generation_id);
        let mut locked = LockedFile::open_exclusive(&path)?;
        let contents = locked.read_to_string()?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))
    }

    /// All persisted generation ids, sorted ascending. Per §3's invariant
    /// they form a contiguous prefix `0..=K`; this just lists what is on
    /// disk, it does not itself verify contiguity.
    pub fn list_generations(&self) -> anyhow::Result<Vec<u64>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.run_dir)
            .with_context(|| format!("reading {}", self.run_dir.display()))?
        {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                if let Some(id) = generation_id_from_file_name(name) {
                    ids.push(id);
                }
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    pub fn latest_generation(&self) -> anyhow::Result<Option<u64>> {
        Ok(self.list_generations()?.into_iter().max())
    }

    fn write_locked_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> anyhow::Result<()> {
        let mut locked = LockedFile::open_exclusive(path)?;
        let json = serde_json::to_string_pretty(value)?;
        locked.write_all_truncated(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_core::{AgentStats, GenerationStats, TranscriptEvent};
    use evo_genome::{compile, Individual};

    fn sample_record(generation_id: u64) -> GenerationRecord {
        let genotype = Genotype::new("alice");
        let phenotype = compile(&genotype);
        let individual = Individual::new(genotype, phenotype);
        GenerationRecord {
            generation_id,
            individuals: vec![individual],
            transcripts: vec![vec![TranscriptEvent::Post {
                author: "alice".into(),
                content: "hi".into(),
            }]],
            stats: GenerationStats {
                timestamp: GenerationStats::now_timestamp(),
                generation: generation_id,
                population_size: 1,
                population_diversity: 0.0,
                fitness_mean: 0.5,
                fitness_max: 0.5,
                fitness_min: 0.5,
                degraded_events: 0,
                agents: vec![AgentStats {
                    name: "alice".into(),
                    engagement: 0.5,
                    conversation_quality: 0.5,
                    diversity: 0.0,
                    persona_fidelity: 0.5,
                    safety: 1.0,
                    raw_fitness: 0.5,
                    shared_fitness: 0.5,
                    degraded: false,
                }],
            },
        }
    }

    #[test]
    fn save_and_load_generation_round_trips_genotypes() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path()).unwrap();
        store.save_generation(&sample_record(0)).unwrap();

        let loaded = store.load_generation(0).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "alice");
    }

    #[test]
    fn list_generations_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path()).unwrap();
        store.save_generation(&sample_record(2)).unwrap();
        store.save_generation(&sample_record(0)).unwrap();
        store.save_generation(&sample_record(1)).unwrap();

        assert_eq!(store.list_generations().unwrap(), vec![0, 1, 2]);
        assert_eq!(store.latest_generation().unwrap(), Some(2));
    }

    #[test]
    fn stats_log_is_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path()).unwrap();
        store.append_stats(&sample_record(0).stats).unwrap();
        store.append_stats(&sample_record(1).stats).unwrap();

        let contents = fs::read_to_string(stats_file(dir.path())).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
