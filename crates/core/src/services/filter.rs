use log::debug;

use crate::config::HarvestConfig;
use crate::error::HarvestResult;
use crate::model::{Candidate, ModuleIndex};

/// Version/architecture whitelist applied to index entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    pub windows_versions: Vec<String>,
    pub machine_types: Vec<u32>,
}

impl FilterPolicy {
    pub fn new(windows_versions: Vec<String>, machine_types: Vec<u32>) -> Self {
        Self { windows_versions, machine_types }
    }

    pub fn from_config(config: &HarvestConfig) -> HarvestResult<Self> {
        Ok(Self::new(config.windows_versions.clone(), config.machine_type_codes()?))
    }
}

/// Select the entries worth downloading, in index order.
///
/// An entry qualifies when it shipped in at least one whitelisted Windows
/// version, its machine type is whitelisted, and it carries a timestamp and
/// image size. Everything else is dropped without a diagnostic.
pub fn select_candidates(index: &ModuleIndex, policy: &FilterPolicy) -> Vec<Candidate> {
    let candidates: Vec<Candidate> = index
        .iter()
        .filter(|(_, entry)| policy.windows_versions.iter().any(|v| entry.has_version(v)))
        .filter(|(_, entry)| {
            entry.machine_type.map(|m| policy.machine_types.contains(&m)).unwrap_or(false)
        })
        .filter_map(|(hash, entry)| Candidate::from_entry(hash, entry))
        .collect();

    debug!("{} of {} index entries selected", candidates.len(), index.len());
    candidates
}
