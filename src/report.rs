//! Result aggregation and CSV export
//!
//! Per-verdict counts for the UI metric tiles (Inaccurate and False share a
//! tile, matching the result page layout) and a CSV rendering of the full
//! result list for download.

use serde::Serialize;

use crate::verdict::{VerificationResult, Verdict};

/// Per-verdict tallies shown above the result list
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictCounts {
    pub verified: usize,
    pub inaccurate_or_false: usize,
    pub outdated: usize,
    pub unverifiable: usize,
    pub errors: usize,
}

impl VerdictCounts {
    pub fn tally(results: &[VerificationResult]) -> Self {
        let mut counts = VerdictCounts::default();
        for r in results {
            match r.verdict {
                Verdict::Verified => counts.verified += 1,
                Verdict::Inaccurate | Verdict::False => counts.inaccurate_or_false += 1,
                Verdict::Outdated => counts.outdated += 1,
                Verdict::Unverifiable => counts.unverifiable += 1,
                Verdict::Error => counts.errors += 1,
            }
        }
        counts
    }
}

/// Render results as CSV with the download column layout.
pub fn to_csv(results: &[VerificationResult]) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Original Claim", "Verdict", "Correction/Evidence", "Source URL"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for r in results {
        writer
            .write_record([
                r.original_claim.as_str(),
                r.verdict.as_str(),
                r.evidence.as_str(),
                r.source_url.as_str(),
            ])
            .map_err(|e| format!("Failed to write CSV row: {}", e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| format!("Failed to flush CSV: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("CSV was not valid UTF-8: {}", e))
}
