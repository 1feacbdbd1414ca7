// ============================================================
// Layer 6 — Output Directory
// ============================================================
// Owns the directory every run artefact is written to:
//
//   output/
//     run_config.json         ← the PipelineConfig of this run
//     metrics.csv             ← one row per epoch
//     wordcloud_positive.png
//     wordcloud_negative.png
//     review_lengths.png
//     training_curves.png
//
// The trained model itself is never written; it only lives for
// the duration of the run.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub struct OutputDir {
    dir: PathBuf,
}

impl OutputDir {
    /// Create the directory (and parents) if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Save the run configuration as pretty-printed JSON.
    pub fn save_config<C: Serialize>(&self, cfg: &C) -> Result<PathBuf> {
        let path = self.dir.join("run_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved run config to '{}'", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_save_config_writes_json() {
        let dir = std::env::temp_dir()
            .join(format!("imdb-output-{}", std::process::id()))
            .join("nested");
        let out = OutputDir::create(&dir).unwrap();

        let cfg: BTreeMap<&str, usize> = [("epochs", 3)].into_iter().collect();
        let path = out.save_config(&cfg).unwrap();

        let back: BTreeMap<String, usize> =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back["epochs"], 3);
        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }
}
