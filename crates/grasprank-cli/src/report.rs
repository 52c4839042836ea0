use crate::error::Result;
use grasprank::engine::ranking::{RankedCandidate, RankingResult};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Serialize, Debug)]
struct ReportRow {
    rank: usize,
    hypothesis: usize,
    performance: f64,
    sigma_min: f64,
    wrench_volume: f64,
    isotropy: f64,
    failed: bool,
}

impl ReportRow {
    fn new(rank: usize, candidate: &RankedCandidate) -> Self {
        Self {
            rank,
            hypothesis: candidate.hypothesis_id.0,
            performance: candidate.performance,
            sigma_min: candidate.raw.sigma_min,
            wrench_volume: candidate.raw.wrench_volume,
            isotropy: candidate.raw.isotropy,
            failed: candidate.failed,
        }
    }
}

/// Writes every ranked candidate as one CSV row, best first, ranks starting at 1.
pub fn write_csv<W: io::Write>(writer: W, result: &RankingResult) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (index, candidate) in result.candidates.iter().enumerate() {
        csv_writer.serialize(ReportRow::new(index + 1, candidate))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, result: &RankingResult) -> Result<()> {
    write_csv(File::create(path)?, result)
}

/// A fixed-width table of the best `top` candidates for the terminal.
pub fn render_summary(result: &RankingResult, top: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:>10}  {:>12}  {:>12}  {:>13}  {:>9}",
        "rank", "hypothesis", "performance", "sigma_min", "wrench_volume", "isotropy"
    );
    for (index, candidate) in result.top(top).iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:>10}  {:>12.4}  {:>12.4e}  {:>13.4e}  {:>9.4}{}",
            index + 1,
            candidate.hypothesis_id.to_string(),
            candidate.performance,
            candidate.raw.sigma_min,
            candidate.raw.wrench_volume,
            candidate.raw.isotropy,
            if candidate.failed { "  (failed)" } else { "" }
        );
    }
    let failures = result.failures().count();
    if failures > 0 {
        let _ = writeln!(
            out,
            "{} of {} hypotheses could not be evaluated and scored zero.",
            failures,
            result.len()
        );
    }
    out
}
