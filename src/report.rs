use camino::Utf8Path;

use crate::domain::SequenceRecord;
use crate::error::HarvestError;

pub const CSV_HEADER: [&str; 3] = ["Accession Number", "Sequence Length", "Description"];

/// Writes one row per record, in input (fetch) order.
pub fn write_csv(records: &[SequenceRecord], path: &Utf8Path) -> Result<(), HarvestError> {
    let mut writer = csv::Writer::from_path(path.as_std_path())
        .map_err(|err| HarvestError::Report(err.to_string()))?;
    writer
        .write_record(CSV_HEADER)
        .map_err(|err| HarvestError::Report(err.to_string()))?;
    for record in records {
        let length = record.length.to_string();
        writer
            .write_record([
                record.accession.as_str(),
                length.as_str(),
                record.description.as_str(),
            ])
            .map_err(|err| HarvestError::Report(err.to_string()))?;
    }
    writer
        .flush()
        .map_err(|err| HarvestError::Report(err.to_string()))
}
