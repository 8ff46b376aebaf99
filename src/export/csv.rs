use std::io::Write;
use std::path::Path;

use super::ExportError;
use crate::models::SleepRecord;

/// Export records to a CSV file
pub fn export_records<P: AsRef<Path>>(
    records: &[SleepRecord],
    output_path: P,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(output_path)?;
    write_records(records, file)
}

/// Write records as CSV with a header row
pub fn write_records<W: Write>(records: &[SleepRecord], writer: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);

    // serde writes the header from the first record; an empty export still gets one
    if records.is_empty() {
        writer.write_record([
            "date",
            "bedtime",
            "waketime",
            "sleep_duration",
            "sleep_quality",
        ])?;
    }

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}
