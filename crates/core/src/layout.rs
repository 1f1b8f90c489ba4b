use std::path::{Path, PathBuf};

use crate::config::HarvestConfig;

/// On-disk layout of a harvest run.
///
/// Derived from the run root and config. It does *not* perform any IO itself.
#[derive(Debug, Clone)]
pub struct HarvestLayout {
    /// Root directory of the run (the tool's working directory).
    pub root: PathBuf,
    /// Content-addressed binary cache (`cache`).
    pub cache_dir: PathBuf,
    /// Report output directory (`csvs`).
    pub reports_dir: PathBuf,
    /// File the extraction tool writes the PDB path into.
    pub pointer_path: PathBuf,
    /// Extraction tool executable.
    pub tool_path: PathBuf,
}

impl HarvestLayout {
    /// Compute the layout for a run rooted at `root`.
    pub fn new(root: impl AsRef<Path>, config: &HarvestConfig) -> Self {
        let root = root.as_ref().to_path_buf();
        let resolve = |p: &Path| if p.is_absolute() { p.to_path_buf() } else { root.join(p) };
        Self {
            cache_dir: resolve(&config.cache_dir),
            reports_dir: resolve(&config.reports_dir),
            pointer_path: resolve(&config.pdb_pointer_file),
            tool_path: resolve(&config.tool_path),
            root,
        }
    }

    /// `cache/{module}/{hash}`
    pub fn cache_entry_dir(&self, module: &str, hash: &str) -> PathBuf {
        self.cache_dir.join(module).join(hash)
    }

    /// `cache/{module}/{hash}/{module}`
    pub fn binary_path(&self, module: &str, hash: &str) -> PathBuf {
        self.cache_entry_dir(module, hash).join(module)
    }

    /// `csvs/{module}.csv`
    pub fn report_path(&self, module: &str) -> PathBuf {
        self.reports_dir.join(format!("{module}.csv"))
    }
}
