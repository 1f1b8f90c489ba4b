//! Winbindex per-module index: fetch, gunzip, parse.
//!
//! The index is a gzip-compressed JSON object mapping a file hash to
//! `{ windowsVersions: {label: ...}, fileInfo: {machineType, timestamp, virtualSize, version} }`.
//! It is re-fetched on every run.

use std::io::Read;

use flate2::read::GzDecoder;
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::HarvestConfig;
use crate::error::{HarvestError, HarvestResult};
use crate::model::{IndexEntry, ModuleIndex};
use crate::services::transport::Transport;

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default, rename = "windowsVersions")]
    windows_versions: Option<Map<String, Value>>,
    #[serde(default, rename = "fileInfo")]
    file_info: Option<RawFileInfo>,
}

#[derive(Debug, Deserialize)]
struct RawFileInfo {
    #[serde(default, rename = "machineType")]
    machine_type: Option<u32>,
    #[serde(default)]
    timestamp: Option<u64>,
    #[serde(default, rename = "virtualSize")]
    virtual_size: Option<u64>,
    #[serde(default)]
    version: Option<String>,
}

/// JSON truthiness: labels map to update objects, but `false`, `0`, `""` and `null` mean absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl From<RawEntry> for IndexEntry {
    fn from(raw: RawEntry) -> Self {
        let windows_versions = raw
            .windows_versions
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, v)| is_truthy(v))
            .map(|(label, _)| label)
            .collect();
        let info = raw.file_info;
        IndexEntry {
            windows_versions,
            machine_type: info.as_ref().and_then(|i| i.machine_type),
            timestamp: info.as_ref().and_then(|i| i.timestamp),
            virtual_size: info.as_ref().and_then(|i| i.virtual_size),
            version: info.and_then(|i| i.version),
        }
    }
}

/// Parse an already-decompressed index document.
pub fn parse_index(json: &[u8]) -> HarvestResult<ModuleIndex> {
    let raw: Map<String, Value> = serde_json::from_slice(json)
        .map_err(|e| HarvestError::MalformedIndex(format!("invalid JSON: {e}")))?;
    let mut pairs = Vec::with_capacity(raw.len());
    for (hash, value) in raw {
        let entry: RawEntry = serde_json::from_value(value)
            .map_err(|e| HarvestError::MalformedIndex(format!("entry {hash}: {e}")))?;
        pairs.push((hash, IndexEntry::from(entry)));
    }
    Ok(ModuleIndex::from_entries(pairs))
}

/// Gunzip and parse an index response body.
pub fn decode_index(gzipped: &[u8]) -> HarvestResult<ModuleIndex> {
    let mut json = Vec::new();
    GzDecoder::new(gzipped)
        .read_to_end(&mut json)
        .map_err(|e| HarvestError::MalformedIndex(format!("gzip: {e}")))?;
    parse_index(&json)
}

/// Fetch the index for `module`. Any failure here is fatal for the run.
pub fn fetch_index(
    transport: &dyn Transport,
    config: &HarvestConfig,
    module: &str,
) -> HarvestResult<ModuleIndex> {
    let url = config.index_url_for(module);
    info!("Fetching index for {module} from {url}");

    let response = transport.get(&url)?;
    debug!("index response: HTTP {} ({} bytes)", response.status, response.body.len());
    if !response.is_ok() {
        return Err(HarvestError::RemoteUnavailable { url, status: response.status });
    }

    let index = decode_index(&response.body)?;
    info!("Index for {module} lists {} file revisions", index.len());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_matches_json_semantics() {
        assert!(is_truthy(&serde_json::json!({})));
        assert!(is_truthy(&serde_json::json!(true)));
        assert!(!is_truthy(&serde_json::json!(0)));
        assert!(!is_truthy(&serde_json::json!("")));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn parse_keeps_source_order_and_drops_falsy_versions() {
        let body = br#"{
            "zz": {"windowsVersions": {"22H2": {"KB1": {}}, "1909": false}, "fileInfo": {"machineType": 34404, "timestamp": 1, "virtualSize": 2, "version": "10.0"}},
            "aa": {"windowsVersions": {"2004": {}}}
        }"#;
        let index = parse_index(body).unwrap();
        let hashes: Vec<&str> = index.iter().map(|(h, _)| h).collect();
        assert_eq!(hashes, vec!["zz", "aa"]);
        let zz = index.get("zz").unwrap();
        assert_eq!(zz.windows_versions, vec!["22H2".to_string()]);
        assert_eq!(zz.machine_type, Some(0x8664));
        let aa = index.get("aa").unwrap();
        assert_eq!(aa.machine_type, None);
        assert_eq!(aa.timestamp, None);
    }

    #[test]
    fn non_object_body_is_malformed() {
        let err = parse_index(b"[1,2,3]").unwrap_err();
        assert!(matches!(err, HarvestError::MalformedIndex(_)));
    }
}
