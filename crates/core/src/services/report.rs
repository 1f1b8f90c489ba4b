use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HarvestError, HarvestResult};
use crate::model::AcquisitionResult;

pub const CSV_HEADER: &str = "Module path,PDB path,PDB size,Machine type,Version";

/// Largest PDB first; equal sizes keep their input order.
pub fn sort_results(results: &mut [AcquisitionResult]) {
    results.sort_by(|a, b| b.pdb_size.cmp(&a.pdb_size));
}

/// Render rows under the fixed header, one line per result.
///
/// Fields are joined verbatim; commas inside paths or versions are not escaped.
pub fn render_csv(results: &[AcquisitionResult]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for r in results {
        let row = [
            r.module_path.display().to_string(),
            r.pdb_path.display().to_string(),
            r.pdb_size.to_string(),
            r.machine_type.clone(),
            r.version.clone(),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

/// Sort, render, and write the report to `path`, creating its directory.
pub fn write_report(path: &Path, results: &mut [AcquisitionResult]) -> HarvestResult<PathBuf> {
    sort_results(results);
    let text = render_csv(results);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| HarvestError::io(dir, e))?;
    }
    fs::write(path, text).map_err(|e| HarvestError::io(path, e))?;
    Ok(path.to_path_buf())
}
