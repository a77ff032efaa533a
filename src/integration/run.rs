//! One-shot evaluation run: scan the corpus, then export once.

use std::path::PathBuf;

use crate::error::{OutputWriteError, RunError};
use crate::output::{OutputLocation, ResultWriter, timings_file_name, unix_millis, write_timings};

use super::{CorpusScanner, CorpusSource, Detector, ImageLoader, ScanReport};

/// Result of [`run_evaluation`].
#[derive(Debug)]
pub struct RunOutcome {
    pub report: ScanReport,
    /// `all_detections_<stamp>.json`
    pub detections_path: PathBuf,
    /// `inference_times_<stamp>.csv`, same stamp and directory. A failure
    /// here does not affect the detections file.
    pub timings: Result<PathBuf, OutputWriteError>,
}

/// Scan the corpus and write the batch, exactly once, to a fresh results
/// file under `location`, plus the per-image timings next to it.
///
/// Per-image failures stay in the report. If the detections cannot be
/// written the report comes back inside the [`RunError`].
pub fn run_evaluation<C, L, D>(
    scanner: &mut CorpusScanner<C, L, D>,
    location: &OutputLocation,
) -> Result<RunOutcome, RunError>
where
    C: CorpusSource,
    L: ImageLoader,
    D: Detector,
{
    let report = scanner.scan();
    let stamp = unix_millis();

    let written = ResultWriter::create_at(location, stamp).and_then(|writer| {
        writer.append(&report.batch)?;
        Ok(writer)
    });
    let writer = match written {
        Ok(writer) => writer,
        Err(source) => {
            tracing::error!(
                error = %source,
                records = report.batch.len(),
                "failed to export detections"
            );
            return Err(RunError {
                report: Box::new(report),
                source,
            });
        }
    };

    let timings_path = writer.path().with_file_name(timings_file_name(stamp));
    let timings = write_timings(&timings_path, &report.timings)
        .map(|()| timings_path)
        .inspect_err(|err| tracing::warn!(error = %err, "failed to export timings"));

    Ok(RunOutcome {
        report,
        detections_path: writer.path().to_path_buf(),
        timings,
    })
}
