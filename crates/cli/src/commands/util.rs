use harvest_core::services::pipeline::RunSummary;

/// Print the end-of-run counters and report location.
pub fn print_run_summary(summary: &RunSummary) {
    println!("Harvest summary for {}", summary.module);
    println!("  Index entries: {}", summary.index_entries);
    println!("  Candidates: {}", summary.candidates);
    println!("  Extractor: {}", summary.extractor);
    println!("  Cache hits: {}", summary.cache_hits);
    println!("  Downloaded: {}", summary.downloads);
    println!("  Download failures: {}", summary.download_failures);
    println!("  Extraction failures: {}", summary.extraction_failures);
    println!("  PDBs reported: {}", summary.results.len());
    println!("Written to {}", summary.report_path.display());
}
