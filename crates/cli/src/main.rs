use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pdb_harvest::commands::{harvest_command, list_candidates_command, HarvestOptions};

/// Download historical builds of a Windows module and extract their PDBs.
///
/// The module's Winbindex index is filtered by Windows version and machine
/// type, each matching binary is fetched from the symbol server into
/// `cache/<module>/<hash>/`, the symbol tool extracts its PDB, and the results
/// land in `csvs/<module>.csv` sorted by PDB size.
#[derive(Parser, Debug)]
#[command(name = "pdb-harvest", version, about = "Harvest PDBs for every build of a Windows module", long_about = None)]
struct Cli {
    /// Module file name, e.g. `ntdll.dll`.
    module: Option<String>,

    /// Run root holding `cache/`, `csvs/`, `bin/` and `current_pdb.txt`.
    #[arg(long, default_value = ".")]
    root: String,

    /// Config file (YAML or JSON). Defaults to `pdb-harvest.{yaml,yml,json}` under the root.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Symbol extraction tool. Overrides the config file and `PDB_HARVEST_TOOL`.
    #[arg(long)]
    tool: Option<PathBuf>,

    /// Only fetch and filter the index; print the candidates and exit.
    #[arg(long, default_value_t = false)]
    list: bool,

    /// Emit JSON instead of human-readable text (requires `--list`).
    #[arg(long, default_value_t = false, requires = "list")]
    json: bool,

    /// Log debug detail (overridden by `RUST_LOG`).
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new().filter_level(level).format_target(false).parse_default_env().init();

    if !cli.json {
        println!("pdb-harvest v{}", harvest_core::version());
    }

    let Some(module) = cli.module else {
        eprintln!("No module name specified");
        std::process::exit(1);
    };

    let options = HarvestOptions { root: cli.root, config: cli.config, tool: cli.tool };
    if cli.list {
        list_candidates_command(&module, &options, cli.json)?;
    } else {
        harvest_command(&module, &options)?;
    }

    Ok(())
}
