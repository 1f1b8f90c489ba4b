use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::error::{HarvestError, HarvestResult};
use crate::layout::HarvestLayout;
use crate::model::ExtractedPdb;

/// Produces a PDB for a local binary.
pub trait Extractor: Send + Sync {
    fn extract(&self, binary: &Path) -> HarvestResult<ExtractedPdb>;
    fn name(&self) -> &'static str;
}

/// Shells out to the external symbol tool.
///
/// Protocol: the tool gets the absolute binary path as its only argument, runs
/// in the harvest root, exits zero on success, and leaves the absolute PDB path
/// as the entire content of the pointer file (`current_pdb.txt`).
pub struct SymbolToolExtractor {
    pub tool_path: PathBuf,
    pub working_dir: PathBuf,
    pub pointer_path: PathBuf,
}

impl SymbolToolExtractor {
    pub fn new(tool_path: PathBuf, working_dir: PathBuf, pointer_path: PathBuf) -> Self {
        Self { tool_path, working_dir, pointer_path }
    }

    pub fn from_layout(layout: &HarvestLayout) -> Self {
        Self::new(layout.tool_path.clone(), layout.root.clone(), layout.pointer_path.clone())
    }
}

impl Extractor for SymbolToolExtractor {
    fn extract(&self, binary: &Path) -> HarvestResult<ExtractedPdb> {
        // A pointer left over from the previous binary must not be mistaken for this one.
        if self.pointer_path.exists() {
            fs::remove_file(&self.pointer_path)
                .map_err(|e| HarvestError::io(&self.pointer_path, e))?;
        }

        debug!("running {} {}", self.tool_path.display(), binary.display());
        let output = Command::new(&self.tool_path)
            .arg(binary)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|e| {
                HarvestError::ExtractionFailed(format!(
                    "failed to spawn {}: {e}",
                    self.tool_path.display()
                ))
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarvestError::ExtractionFailed(format!(
                "{} exited with {}: {}",
                self.tool_path.display(),
                output.status,
                stderr.trim()
            )));
        }

        let pdb_path = read_pdb_pointer(&self.pointer_path)?;
        stat_pdb(pdb_path)
    }

    fn name(&self) -> &'static str {
        "symbol-tool"
    }
}

/// Read the PDB path the tool left in the pointer file.
///
/// Trailing whitespace and a leading UTF-8 BOM are ignored.
pub fn read_pdb_pointer(pointer_path: &Path) -> HarvestResult<PathBuf> {
    let body = fs::read_to_string(pointer_path).map_err(|e| {
        HarvestError::ExtractionFailed(format!("cannot read {}: {e}", pointer_path.display()))
    })?;
    let trimmed = body.trim_start_matches('\u{feff}').trim_end();
    if trimmed.is_empty() {
        return Err(HarvestError::ExtractionFailed(format!(
            "{} is empty",
            pointer_path.display()
        )));
    }
    Ok(PathBuf::from(trimmed))
}

/// Size the PDB at `path`; a missing file is a skippable extraction failure.
pub fn stat_pdb(path: PathBuf) -> HarvestResult<ExtractedPdb> {
    if !path.is_file() {
        return Err(HarvestError::ExtractionFailed(format!(
            "PDB reported at {} does not exist",
            path.display()
        )));
    }
    let size = fs::metadata(&path).map_err(|e| HarvestError::io(&path, e))?.len();
    info!("Size of PDB: {size}");
    Ok(ExtractedPdb { path, size })
}
