use std::path::{Path, PathBuf};

pub fn generation_file(run_dir: &Path, generation_id: u64) -> PathBuf {
    run_dir.join(format!("gen_{generation_id}.json"))
}

pub fn transcripts_file(run_dir: &Path, generation_id: u64) -> PathBuf {
    run_dir.join(format!("transcripts_gen_{generation_id}.json"))
}

pub fn stats_file(run_dir: &Path) -> PathBuf {
    run_dir.join("generation_stats.jsonl")
}

/// Parses the generation index out of a `gen_<N>.json` file name, if any.
pub fn generation_id_from_file_name(file_name: &str) -> Option<u64> {
    file_name
        .strip_prefix("gen_")?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_generation_id() {
        assert_eq!(generation_id_from_file_name("gen_3.json"), Some(3));
        assert_eq!(generation_id_from_file_name("transcripts_gen_3.json"), None);
        assert_eq!(generation_id_from_file_name("gen_x.json"), None);
    }
}
