//! This module is in charge of outputting the final analysis results to the
//! log and to disk

use crate::{histogram::Histogram, Result};
use eyre::WrapErr;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    time::Duration,
};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::info;

/// Layout of a histogram output file
#[derive(Serialize)]
struct HistogramFile<'a> {
    /// When the file was written
    created: String,

    /// Histograms, in the order the analysis declared them
    histograms: &'a [Histogram],
}

/// Write a set of histograms to a new output file
pub fn write_histograms(path: impl AsRef<Path>, histograms: &[Histogram]) -> Result<()> {
    let path = path.as_ref();

    // Compute a timestamp of when the run ended
    let created = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .wrap_err("Failed to format the output timestamp")?;

    let mut writer = BufWriter::new(
        File::create(path).wrap_err_with(|| format!("Failed to create {}", path.display()))?,
    );
    serde_json::to_writer_pretty(&mut writer, &HistogramFile { created, histograms })
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;

    info!("Wrote {} histograms to {}", histograms.len(), path.display());
    Ok(())
}

/// Format a wall-clock duration as HH:MM:SS
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::{Hist1D, Hist2D};

    #[test]
    fn elapsed_time_formatting() {
        assert_eq!(format_elapsed(Duration::from_millis(999)), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(3725)), "01:02:05");
        assert_eq!(format_elapsed(Duration::from_secs(100 * 3600)), "100:00:00");
    }

    #[test]
    fn histogram_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let mut h1 = Hist1D::new("k0_mass", "k0_mass;Mass (MeV); N", 50, 0., 1000.);
        h1.fill(497.6);
        let h2 = Hist2D::new("k0_pcos", "k0_pcos;#theta; True KE (MeV)", 45, 0., 90., 50, 0., 1e4);
        write_histograms(&path, &[h1.into(), h2.into()]).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["created"].as_str().unwrap().contains('T'));
        let hists = json["histograms"].as_array().unwrap();
        assert_eq!(hists.len(), 2);
        assert_eq!(hists[0]["kind"], "TH1D");
        assert_eq!(hists[0]["name"], "k0_mass");
        assert_eq!(hists[0]["axis"]["num_bins"], 50);
        assert_eq!(hists[0]["contents"].as_array().unwrap().len(), 52);
        assert_eq!(hists[0]["contents"][25], 1.0);
        assert_eq!(hists[0]["entries"], 1);
        assert_eq!(hists[1]["kind"], "TH2D");
        assert_eq!(hists[1]["contents"].as_array().unwrap().len(), 47 * 52);
    }
}
