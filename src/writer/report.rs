use crate::setops::BuildCounts;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Machine-readable summary of one extraction run. The human rendering
/// prints counts only, never addresses.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub files_processed: usize,
    pub files_repaired: Vec<PathBuf>,
    pub files_skipped: Vec<PathBuf>,
    pub records_scanned: usize,
    pub values_extracted: usize,
    pub duplicates: usize,
    pub excluded: usize,
    pub final_size: usize,
    pub output_path: PathBuf,
    pub finished_at: DateTime<Utc>,
}

impl PipelineReport {
    pub fn new(counts: &BuildCounts, final_size: usize, output_path: PathBuf) -> Self {
        Self {
            files_processed: 0,
            files_repaired: Vec::new(),
            files_skipped: Vec::new(),
            records_scanned: counts.records_scanned,
            values_extracted: counts.values_extracted,
            duplicates: counts.duplicates,
            excluded: 0,
            final_size,
            output_path,
            finished_at: Utc::now(),
        }
    }
}

/// Summary of one statistics run.
#[derive(Debug, Clone, Serialize)]
pub struct StatsRunReport {
    pub files_processed: usize,
    pub records_scanned: usize,
    pub categories: usize,
    pub no_points_count: u64,
    pub output_path: PathBuf,
    pub finished_at: DateTime<Utc>,
}
