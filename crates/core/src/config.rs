use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{HarvestError, HarvestResult};
use crate::platform::machine_type_code;

/// Default Winbindex endpoint; `{module}` is replaced with the module name.
pub const DEFAULT_INDEX_URL: &str =
    "https://winbindex.m417z.com/data/by_filename_compressed/{module}.json.gz";

/// Default public symbol server root.
pub const DEFAULT_SYMBOL_SERVER: &str = "https://msdl.microsoft.com/download/symbols";

/// Environment variable overriding the extraction tool path.
pub const TOOL_ENV_VAR: &str = "PDB_HARVEST_TOOL";

/// Config file names probed at the run root when `--config` is not given.
pub const CONFIG_FILE_NAMES: &[&str] = &["pdb-harvest.yaml", "pdb-harvest.yml", "pdb-harvest.json"];

/// A machine type given either by catalog name or by numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MachineTypeSpec {
    Code(u32),
    Name(String),
}

impl MachineTypeSpec {
    pub fn resolve(&self) -> HarvestResult<u32> {
        match self {
            MachineTypeSpec::Code(code) => Ok(*code),
            MachineTypeSpec::Name(name) => machine_type_code(name)
                .ok_or_else(|| HarvestError::Config(format!("unknown machine type '{name}'"))),
        }
    }
}

/// Serializable run configuration.
///
/// Every field has a default, so an empty file (or no file at all) yields the
/// stock Winbindex + Microsoft symbol server setup for x86/x64 Windows 10 builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Index URL template containing `{module}`.
    pub index_url: String,
    /// Symbol server root, without trailing slash.
    pub symbol_server: String,
    /// Windows version labels a revision must have shipped in (any of).
    pub windows_versions: Vec<String>,
    /// Accepted PE machine types.
    pub machine_types: Vec<MachineTypeSpec>,
    /// Extraction tool, relative to the run root unless absolute.
    pub tool_path: PathBuf,
    pub cache_dir: PathBuf,
    pub reports_dir: PathBuf,
    /// File the extraction tool writes the PDB path into.
    pub pdb_pointer_file: PathBuf,
    /// Hash downloaded bodies and compare against the index key before caching.
    pub verify_sha256: bool,
    pub user_agent: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            symbol_server: DEFAULT_SYMBOL_SERVER.to_string(),
            windows_versions: ["2004", "20H2", "21H1", "21H2", "22H2"]
                .iter()
                .map(|v| v.to_string())
                .collect(),
            machine_types: vec![
                MachineTypeSpec::Name("IMAGE_FILE_MACHINE_AMD64".into()),
                MachineTypeSpec::Name("IMAGE_FILE_MACHINE_I386".into()),
            ],
            tool_path: PathBuf::from("bin").join("SymbolDownloader.exe"),
            cache_dir: PathBuf::from("cache"),
            reports_dir: PathBuf::from("csvs"),
            pdb_pointer_file: PathBuf::from("current_pdb.txt"),
            verify_sha256: false,
            user_agent: format!("pdb-harvest/{}", crate::version()),
        }
    }
}

impl HarvestConfig {
    /// Resolve the machine type whitelist to numeric codes.
    pub fn machine_type_codes(&self) -> HarvestResult<Vec<u32>> {
        self.machine_types.iter().map(MachineTypeSpec::resolve).collect()
    }

    /// Index URL for a module.
    pub fn index_url_for(&self, module: &str) -> String {
        self.index_url.replace("{module}", module)
    }

    /// Apply `PDB_HARVEST_TOOL` if set.
    pub fn apply_env(&mut self) {
        if let Some(tool) = std::env::var_os(TOOL_ENV_VAR) {
            if !tool.is_empty() {
                self.tool_path = PathBuf::from(tool);
            }
        }
    }

    /// Sanity checks that would otherwise surface mid-run.
    pub fn validate(&self) -> HarvestResult<()> {
        if !self.index_url.contains("{module}") {
            return Err(HarvestError::Config(format!(
                "index_url must contain a {{module}} placeholder: {}",
                self.index_url
            )));
        }
        if self.symbol_server.trim().is_empty() {
            return Err(HarvestError::Config("symbol_server must not be empty".into()));
        }
        self.machine_type_codes()?;
        Ok(())
    }
}

/// Parse a config file, picking YAML or JSON by extension.
pub fn load_config_file(path: &Path) -> Result<HarvestConfig> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
    let config: HarvestConfig = match ext.as_deref() {
        Some("json") => serde_json::from_str(&body).context("Failed to parse config JSON")?,
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&body).context("Failed to parse config YAML")?
        }
        _ => return Err(anyhow!("Unsupported config extension: {}", path.display())),
    };
    Ok(config)
}

/// Locate the config for a run: the explicit path if given, else a well-known
/// file name at `root`, else `None`.
pub fn find_config_file(root: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(if path.is_absolute() { path.to_path_buf() } else { root.join(path) });
    }
    CONFIG_FILE_NAMES.iter().map(|name| root.join(name)).find(|p| p.is_file())
}

/// Load defaults, then the config file (if any), then the environment.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<HarvestConfig> {
    let mut config = match find_config_file(root, explicit) {
        Some(path) => load_config_file(&path)?,
        None => HarvestConfig::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}
