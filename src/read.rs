use crate::data::ReportRow;

/// Simple CSV importer for the report. Rows come back in file order; a
/// malformed row aborts the whole read since the table is rewritten in full
/// afterwards and we don't want to drop lines silently.
pub(crate) fn read_report<R: std::io::Read>(reader: R) -> Result<Vec<ReportRow>, anyhow::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: ReportRow = result?;
        rows.push(row);
    }
    Ok(rows)
}
