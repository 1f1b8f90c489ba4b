use anyhow::{Context, Result};
use harvest_core::config::HarvestConfig;
use harvest_core::layout::HarvestLayout;
use harvest_core::services::extract::SymbolToolExtractor;
use harvest_core::services::pipeline::{CandidateSet, Harvester};
use harvest_core::services::transport::{HttpTransport, Transport};

use crate::commands::{prepare_run, HarvestOptions};
use crate::validate_module_name;

/// Fetch and filter the index for `module`, printing what a harvest would download.
pub fn list_candidates_command(module: &str, options: &HarvestOptions, json: bool) -> Result<()> {
    let (config, layout) = prepare_run(options)?;
    let transport = HttpTransport::new(&config.user_agent)?;
    list_candidates(module, &config, &layout, &transport, json).map(|_| ())
}

/// [`list_candidates_command`] over a caller-supplied transport.
pub fn list_candidates_with(
    module: &str,
    options: &HarvestOptions,
    transport: &dyn Transport,
    json: bool,
) -> Result<CandidateSet> {
    let (config, layout) = prepare_run(options)?;
    list_candidates(module, &config, &layout, transport, json)
}

fn list_candidates(
    module: &str,
    config: &HarvestConfig,
    layout: &HarvestLayout,
    transport: &dyn Transport,
    json: bool,
) -> Result<CandidateSet> {
    validate_module_name(module)?;
    // Listing stops before extraction, so the tool is never spawned.
    let extractor = SymbolToolExtractor::from_layout(layout);
    let harvester = Harvester { transport, extractor: &extractor, layout, config };
    let set = harvester
        .candidates(module)
        .with_context(|| format!("Failed to list candidates for {module}"))?;

    if json {
        let serialized =
            serde_json::to_string_pretty(&set).context("Failed to serialize candidates to JSON")?;
        println!("{}", serialized);
        return Ok(set);
    }

    println!(
        "Candidates for {} ({} of {} index entries):",
        set.module,
        set.candidates.len(),
        set.index_entries
    );
    if set.candidates.is_empty() {
        println!("  (none)");
        return Ok(set);
    }
    for c in &set.candidates {
        let cached = layout.binary_path(module, &c.hash).exists();
        println!(
            "  - {} [{}] version={} cached={}",
            c.hash,
            c.machine_name(),
            c.version.as_deref().unwrap_or("-"),
            if cached { "yes" } else { "no" }
        );
    }
    Ok(set)
}
