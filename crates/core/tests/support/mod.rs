#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use flate2::write::GzEncoder;
use flate2::Compression;
use harvest_core::model::ExtractedPdb;
use harvest_core::services::extract::{stat_pdb, Extractor};
use harvest_core::services::transport::{HttpResponse, Transport};
use harvest_core::{HarvestError, HarvestResult};

pub const INDEX_URL: &str = "https://index.test/{module}.json.gz";
pub const SYMBOLS: &str = "https://symbols.test/download/symbols";

/// In-memory transport: canned responses by URL, 404 otherwise.
#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, HttpResponse>,
    unreachable: Vec<String>,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.into(), HttpResponse::new(status, body));
        self
    }

    pub fn unreachable(mut self, url: impl Into<String>) -> Self {
        self.unreachable.push(url.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| u.as_str() == url).count()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> HarvestResult<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        if self.unreachable.iter().any(|u| u == url) {
            return Err(HarvestError::Transport {
                url: url.to_string(),
                message: "connection refused".into(),
            });
        }
        Ok(self.responses.get(url).cloned().unwrap_or_else(|| HttpResponse::new(404, Vec::new())))
    }
}

/// Extractor that "extracts" a PDB holding the same bytes as the binary.
///
/// Binaries whose content starts with `bad` fail, mimicking a tool crash.
pub struct FakeExtractor {
    pub pdb_dir: PathBuf,
    pub seen: Mutex<Vec<PathBuf>>,
}

impl FakeExtractor {
    pub fn new(pdb_dir: impl Into<PathBuf>) -> Self {
        Self { pdb_dir: pdb_dir.into(), seen: Mutex::new(Vec::new()) }
    }
}

impl Extractor for FakeExtractor {
    fn extract(&self, binary: &Path) -> HarvestResult<ExtractedPdb> {
        self.seen.lock().unwrap().push(binary.to_path_buf());
        let bytes = fs::read(binary).map_err(|e| HarvestError::ExtractionFailed(e.to_string()))?;
        if bytes.starts_with(b"bad") {
            return Err(HarvestError::ExtractionFailed("tool exited with 1".into()));
        }
        let hash = binary
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".into());
        fs::create_dir_all(&self.pdb_dir).unwrap();
        let pdb = self.pdb_dir.join(format!("{hash}.pdb"));
        fs::write(&pdb, &bytes).unwrap();
        stat_pdb(pdb)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// One index entry as Winbindex serializes it.
pub fn entry_json(versions: &[&str], machine: u32, timestamp: u64, size: u64, version: &str) -> String {
    let versions = versions
        .iter()
        .map(|v| format!(r#""{v}": {{"KB0000000": {{}}}}"#))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"{{"windowsVersions": {{{versions}}}, "fileInfo": {{"machineType": {machine}, "timestamp": {timestamp}, "virtualSize": {size}, "version": "{version}", "size": 1234}}}}"#
    )
}

pub fn index_json(entries: &[(&str, String)]) -> String {
    let body = entries
        .iter()
        .map(|(hash, entry)| format!(r#""{hash}": {entry}"#))
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{body}}}")
}
