use std::io::Write;
use std::path::Path;
use tracing::info;

use super::{ReportRow, ReportSpec};

/// Write the preview as CSV with a leading rank column, returning the number of rows written
pub fn write_csv<W: Write>(spec: &ReportSpec, rows: &[ReportRow], writer: W) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["#"];
    header.extend(spec.columns.iter().map(|c| c.header));
    csv_writer.write_record(&header)?;

    for (index, row) in rows.iter().enumerate() {
        let mut record = vec![(index + 1).to_string()];
        record.extend(spec.columns.iter().map(|c| row.cell(c)));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(rows.len())
}

pub fn export_csv(spec: &ReportSpec, rows: &[ReportRow], path: &Path) -> Result<usize, csv::Error> {
    let file = std::fs::File::create(path)?;
    let written = write_csv(spec, rows, file)?;
    info!("Exported {} rows of {} to {}", written, spec.id, path.display());
    Ok(written)
}
