use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::config::HarvestConfig;
use crate::error::{HarvestError, HarvestResult};
use crate::layout::HarvestLayout;
use crate::model::{AcquisitionResult, Candidate};
use crate::services::download::{BinaryCache, CacheStatus};
use crate::services::extract::Extractor;
use crate::services::filter::{select_candidates, FilterPolicy};
use crate::services::index::fetch_index;
use crate::services::report::write_report;
use crate::services::transport::Transport;

/// Outcome of one harvest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub module: String,
    /// [`Extractor::name`] of the tool that produced the PDB paths.
    pub extractor: String,
    pub index_entries: usize,
    pub candidates: usize,
    pub cache_hits: usize,
    pub downloads: usize,
    pub download_failures: usize,
    pub extraction_failures: usize,
    /// Report rows, already sorted.
    pub results: Vec<AcquisitionResult>,
    pub report_path: PathBuf,
}

/// Candidates selected for a module, plus the index size they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSet {
    pub module: String,
    pub index_entries: usize,
    pub candidates: Vec<Candidate>,
}

/// Sequential index -> filter -> download -> extract -> report driver.
///
/// Candidates are processed strictly one after another to keep load on the
/// symbol server bounded.
pub struct Harvester<'a> {
    pub transport: &'a dyn Transport,
    pub extractor: &'a dyn Extractor,
    pub layout: &'a HarvestLayout,
    pub config: &'a HarvestConfig,
}

impl<'a> Harvester<'a> {
    /// Fetch the index and apply the filter policy, without downloading anything.
    pub fn candidates(&self, module: &str) -> HarvestResult<CandidateSet> {
        let policy = FilterPolicy::from_config(self.config)?;
        let index = fetch_index(self.transport, self.config, module)?;
        let candidates = select_candidates(&index, &policy);
        Ok(CandidateSet { module: module.to_string(), index_entries: index.len(), candidates })
    }

    /// Run the full pipeline and write the report.
    ///
    /// Download and extraction failures skip the candidate; index failures and
    /// local I/O errors abort the run before a report is written.
    pub fn run(&self, module: &str) -> HarvestResult<RunSummary> {
        let set = self.candidates(module)?;
        info!(
            "{} candidate(s) for {module}, extracting with {}",
            set.candidates.len(),
            self.extractor.name()
        );

        let cache = BinaryCache::new(self.transport, self.layout, self.config);
        let mut summary = RunSummary {
            module: module.to_string(),
            extractor: self.extractor.name().to_string(),
            index_entries: set.index_entries,
            candidates: set.candidates.len(),
            cache_hits: 0,
            downloads: 0,
            download_failures: 0,
            extraction_failures: 0,
            results: Vec::new(),
            report_path: self.layout.report_path(module),
        };

        for candidate in &set.candidates {
            let local = match cache.ensure_local(module, candidate) {
                Ok(local) => local,
                Err(err) if !err.is_fatal() => {
                    warn!("Skipping {}: {err}", candidate.hash);
                    summary.download_failures += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };
            match local.status {
                CacheStatus::Hit => summary.cache_hits += 1,
                CacheStatus::Downloaded => summary.downloads += 1,
            }

            let module_path = absolutize(&local.path)?;
            let pdb = match self.extractor.extract(&module_path) {
                Ok(pdb) => pdb,
                Err(err) if !err.is_fatal() => {
                    warn!("Skipping {} ({} failed): {err}", candidate.hash, self.extractor.name());
                    summary.extraction_failures += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            summary.results.push(AcquisitionResult::new(candidate, module_path, pdb));
        }

        info!("Writing CSV...");
        summary.report_path = write_report(&summary.report_path, &mut summary.results)?;
        info!("Written to {}", summary.report_path.display());
        Ok(summary)
    }
}

fn absolutize(path: &Path) -> HarvestResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| HarvestError::io(path, e))?;
    Ok(cwd.join(path))
}

