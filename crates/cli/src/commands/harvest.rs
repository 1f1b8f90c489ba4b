use std::path::PathBuf;

use anyhow::{Context, Result};
use harvest_core::config::{load_config, HarvestConfig};
use harvest_core::layout::HarvestLayout;
use harvest_core::services::extract::{Extractor, SymbolToolExtractor};
use harvest_core::services::pipeline::{Harvester, RunSummary};
use harvest_core::services::transport::{HttpTransport, Transport};

use crate::commands::print_run_summary;
use crate::{canonicalize_or_current, validate_module_name};

/// Options shared by the harvest and listing commands.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Run root; cache, reports, tool and pointer file resolve against it.
    pub root: String,
    pub config: Option<PathBuf>,
    /// Extraction tool override (beats config and environment).
    pub tool: Option<PathBuf>,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self { root: ".".to_string(), config: None, tool: None }
    }
}

/// Resolve config and layout for a run.
pub fn prepare_run(options: &HarvestOptions) -> Result<(HarvestConfig, HarvestLayout)> {
    let root = canonicalize_or_current(&options.root)?;
    let mut config = load_config(&root, options.config.as_deref())?;
    if let Some(tool) = &options.tool {
        config.tool_path = tool.clone();
    }
    let layout = HarvestLayout::new(&root, &config);
    Ok((config, layout))
}

/// Acquire every matching build of `module` and write `csvs/<module>.csv`.
pub fn harvest_command(module: &str, options: &HarvestOptions) -> Result<RunSummary> {
    let (config, layout) = prepare_run(options)?;
    let transport = HttpTransport::new(&config.user_agent)?;
    let extractor = SymbolToolExtractor::from_layout(&layout);
    run_harvest(module, &config, &layout, &transport, &extractor)
}

/// Same as [`harvest_command`] with caller-supplied network and extraction backends.
pub fn harvest_with(
    module: &str,
    options: &HarvestOptions,
    transport: &dyn Transport,
    extractor: &dyn Extractor,
) -> Result<RunSummary> {
    let (config, layout) = prepare_run(options)?;
    run_harvest(module, &config, &layout, transport, extractor)
}

fn run_harvest(
    module: &str,
    config: &HarvestConfig,
    layout: &HarvestLayout,
    transport: &dyn Transport,
    extractor: &dyn Extractor,
) -> Result<RunSummary> {
    validate_module_name(module)?;
    println!("Getting symbols for module {module}");

    let harvester = Harvester { transport, extractor, layout, config };
    let summary = harvester
        .run(module)
        .with_context(|| format!("Failed to harvest symbols for {module}"))?;

    print_run_summary(&summary);
    Ok(summary)
}
