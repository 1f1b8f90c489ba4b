//! Core data model for index entries, candidates, and acquisition results.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::platform::machine_type_name;

/// One tracked file revision from the module index.
///
/// File metadata is optional because the index carries partial records; see
/// [`IndexEntry::symbol_key`] for the precondition a revision must meet before
/// it can be downloaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexEntry {
    /// Windows version labels this revision shipped in (only truthy labels are kept).
    pub windows_versions: Vec<String>,
    pub machine_type: Option<u32>,
    /// PE link timestamp.
    pub timestamp: Option<u64>,
    /// PE `SizeOfImage`.
    pub virtual_size: Option<u64>,
    pub version: Option<String>,
}

impl IndexEntry {
    /// Timestamp and image size, if both are present and non-zero.
    ///
    /// These two values address the binary on the symbol server; without them
    /// the revision cannot be fetched.
    pub fn symbol_key(&self) -> Option<(u64, u64)> {
        match (self.timestamp, self.virtual_size) {
            (Some(ts), Some(size)) if ts != 0 && size != 0 => Some((ts, size)),
            _ => None,
        }
    }

    pub fn has_version(&self, label: &str) -> bool {
        self.windows_versions.iter().any(|v| v == label)
    }
}

/// The parsed index for one module: hash -> entry, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleIndex {
    entries: Vec<(String, IndexEntry)>,
}

impl ModuleIndex {
    /// Build from `(hash, entry)` pairs. Later duplicates replace earlier ones in place.
    pub fn from_entries(pairs: impl IntoIterator<Item = (String, IndexEntry)>) -> Self {
        let mut entries: Vec<(String, IndexEntry)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (hash, entry) in pairs {
            match positions.get(&hash) {
                Some(&pos) => entries[pos].1 = entry,
                None => {
                    positions.insert(hash.clone(), entries.len());
                    entries.push((hash, entry));
                }
            }
        }
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(h, e)| (h.as_str(), e))
    }

    pub fn get(&self, hash: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|(h, _)| h == hash).map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An index entry that passed the filter. All addressing fields are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub hash: String,
    pub machine_type: u32,
    pub timestamp: u64,
    pub virtual_size: u64,
    pub version: Option<String>,
    pub windows_versions: Vec<String>,
}

impl Candidate {
    /// Promote an entry to a candidate; `None` if it lacks architecture or addressing data.
    pub fn from_entry(hash: &str, entry: &IndexEntry) -> Option<Self> {
        let machine_type = entry.machine_type?;
        let (timestamp, virtual_size) = entry.symbol_key()?;
        Some(Self {
            hash: hash.to_string(),
            machine_type,
            timestamp,
            virtual_size,
            version: entry.version.clone(),
            windows_versions: entry.windows_versions.clone(),
        })
    }

    pub fn machine_name(&self) -> &'static str {
        machine_type_name(self.machine_type)
    }
}

/// PDB produced by the extraction tool for one binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPdb {
    pub path: PathBuf,
    pub size: u64,
}

/// One successfully processed candidate; becomes one report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionResult {
    pub module_path: PathBuf,
    pub pdb_path: PathBuf,
    pub pdb_size: u64,
    pub machine_type: String,
    pub version: String,
}

impl AcquisitionResult {
    pub fn new(candidate: &Candidate, module_path: PathBuf, pdb: ExtractedPdb) -> Self {
        Self {
            module_path,
            pdb_path: pdb.path,
            pdb_size: pdb.size,
            machine_type: candidate.machine_name().to_string(),
            version: candidate.version.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: Option<u64>, size: Option<u64>) -> IndexEntry {
        IndexEntry {
            windows_versions: vec!["22H2".into()],
            machine_type: Some(0x8664),
            timestamp: ts,
            virtual_size: size,
            version: Some("10.0.19041.1".into()),
        }
    }

    #[test]
    fn symbol_key_requires_both_fields() {
        assert_eq!(entry(Some(1), Some(2)).symbol_key(), Some((1, 2)));
        assert_eq!(entry(None, Some(2)).symbol_key(), None);
        assert_eq!(entry(Some(1), None).symbol_key(), None);
        assert_eq!(entry(Some(0), Some(2)).symbol_key(), None);
    }

    #[test]
    fn module_index_keeps_first_position_for_duplicate_hash() {
        let index = ModuleIndex::from_entries(vec![
            ("a".to_string(), entry(Some(1), Some(1))),
            ("b".to_string(), entry(Some(2), Some(2))),
            ("a".to_string(), entry(Some(3), Some(3))),
        ]);
        let hashes: Vec<&str> = index.iter().map(|(h, _)| h).collect();
        assert_eq!(hashes, vec!["a", "b"]);
        assert_eq!(index.get("a").and_then(|e| e.timestamp), Some(3));
    }

    #[test]
    fn result_uses_catalog_name_and_empty_version_fallback() {
        let mut e = entry(Some(1), Some(2));
        e.version = None;
        let candidate = Candidate::from_entry("h", &e).unwrap();
        let result = AcquisitionResult::new(
            &candidate,
            PathBuf::from("/c/m"),
            ExtractedPdb { path: PathBuf::from("/p.pdb"), size: 7 },
        );
        assert_eq!(result.machine_type, "IMAGE_FILE_MACHINE_AMD64");
        assert_eq!(result.version, "");
        assert_eq!(result.pdb_size, 7);
    }
}
