use std::fs;
use std::path::PathBuf;

use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::config::HarvestConfig;
use crate::error::{HarvestError, HarvestResult};
use crate::layout::HarvestLayout;
use crate::model::Candidate;
use crate::services::transport::Transport;

/// Symbol-server file id: `%08X` link timestamp followed by `%x` image size.
///
/// Only the low 32 bits of the timestamp are used, matching the PE header field.
pub fn symbol_fingerprint(timestamp: u64, image_size: u64) -> String {
    format!("{:08X}{:x}", timestamp & 0xFFFF_FFFF, image_size)
}

/// `<root>/<module>/<fingerprint>/<module>`
pub fn symbol_server_url(root: &str, module: &str, timestamp: u64, image_size: u64) -> String {
    format!(
        "{}/{module}/{}/{module}",
        root.trim_end_matches('/'),
        symbol_fingerprint(timestamp, image_size)
    )
}

/// Lower-case hex SHA-256 of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Where a local binary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Downloaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBinary {
    pub path: PathBuf,
    pub status: CacheStatus,
}

/// Content-addressed binary cache backed by the symbol server.
pub struct BinaryCache<'a> {
    transport: &'a dyn Transport,
    layout: &'a HarvestLayout,
    symbol_server: String,
    verify_sha256: bool,
}

impl<'a> BinaryCache<'a> {
    pub fn new(transport: &'a dyn Transport, layout: &'a HarvestLayout, config: &HarvestConfig) -> Self {
        Self {
            transport,
            layout,
            symbol_server: config.symbol_server.clone(),
            verify_sha256: config.verify_sha256,
        }
    }

    /// Return the cached binary for `(module, candidate.hash)`, downloading it on a miss.
    ///
    /// Existing cache files are trusted as-is. Any status other than 200 is
    /// [`HarvestError::DownloadFailed`] and leaves the cache untouched.
    pub fn ensure_local(&self, module: &str, candidate: &Candidate) -> HarvestResult<LocalBinary> {
        let path = self.layout.binary_path(module, &candidate.hash);
        if path.exists() {
            info!("Loading {module} ({}) from cache", candidate.hash);
            return Ok(LocalBinary { path, status: CacheStatus::Hit });
        }

        let url = symbol_server_url(
            &self.symbol_server,
            module,
            candidate.timestamp,
            candidate.virtual_size,
        );
        info!("Downloading {module} from URL {url}...");

        let response = match self.transport.get(&url) {
            Ok(r) => r,
            // No response at all is as skippable as a 404 for one candidate.
            Err(HarvestError::Transport { url, message }) => {
                debug!("download transport failure for {url}: {message}");
                return Err(HarvestError::DownloadFailed { url, status: 0 });
            }
            Err(other) => return Err(other),
        };
        if !response.is_ok() {
            return Err(HarvestError::DownloadFailed { url, status: response.status });
        }

        if self.verify_sha256 {
            let actual = sha256_hex(&response.body);
            if !actual.eq_ignore_ascii_case(&candidate.hash) {
                return Err(HarvestError::ChecksumMismatch {
                    expected: candidate.hash.clone(),
                    actual,
                });
            }
        }

        let dir = self.layout.cache_entry_dir(module, &candidate.hash);
        fs::create_dir_all(&dir).map_err(|e| HarvestError::io(&dir, e))?;
        fs::write(&path, &response.body).map_err(|e| HarvestError::io(&path, e))?;
        info!("Downloaded {} bytes to {}", response.body.len(), path.display());

        Ok(LocalBinary { path, status: CacheStatus::Downloaded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_pads_timestamp_upper_and_leaves_size_lower() {
        assert_eq!(symbol_fingerprint(0x5F3759DF, 0x1000), "5F3759DF1000");
        assert_eq!(symbol_fingerprint(0xabc, 0xABCDE), "00000ABCabcde");
    }

    #[test]
    fn url_uses_module_twice_around_fingerprint() {
        assert_eq!(
            symbol_server_url("https://sym.example/download/symbols/", "ntdll.dll", 0x1, 0x2f000),
            "https://sym.example/download/symbols/ntdll.dll/000000012f000/ntdll.dll"
        );
    }

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
