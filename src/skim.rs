//! Skimming of event files down to the events with a primary kaon

use crate::{
    analysis::Progress,
    pdg,
    source::{EventChain, EventFile, EventRecord},
    Result,
};
use eyre::ensure;
use std::{fmt, path::Path};
use tracing::info;

/// Truth that an event has a kaon among its first-vertex primaries
pub fn is_kaon_event(record: &EventRecord<'_>) -> bool {
    record
        .edep
        .primary_vertex()
        .map_or(false, |vtx| pdg::any_abs_in(&vtx.pdg_codes(), &pdg::KAONS))
}

/// Outcome of a skim
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkimReport {
    /// Number of input events
    pub total: usize,

    /// Number of events kept
    pub saved: usize,
}
//
impl SkimReport {
    /// Fraction of the input events which were kept
    pub fn fraction(&self) -> f64 {
        self.saved as f64 / self.total as f64
    }
}
//
impl fmt::Display for SkimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} events ({:.3})", self.saved, self.fraction())
    }
}

/// Select the kaon events of a chain, keeping both tables in step
pub fn skim(chain: &EventChain, progress_steps: usize) -> Result<(EventFile, SkimReport)> {
    let total = chain.len();
    ensure!(total > 0, "There are no events to skim");

    let progress = Progress::new(total, progress_steps);
    let mut output = EventFile::default();
    for record in chain.iter() {
        progress.tick(record.index);
        if is_kaon_event(&record) {
            output.push(record);
        }
    }

    let report = SkimReport {
        total,
        saved: output.len(),
    };
    Ok((output, report))
}

/// Skim an event file into a new event file
pub fn skim_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    progress_steps: usize,
) -> Result<SkimReport> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let chain = EventChain::open(&[input])?;
    info!("Skimming {} events from {}", chain.len(), input.display());

    let (skimmed, report) = skim(&chain, progress_steps)?;
    skimmed.save(output)?;
    info!(
        "Saved {} events to {} ({:.3})",
        report.saved,
        output.display(),
        report.fraction()
    );
    Ok(report)
}
