use super::super::domain::{Snapshot, SnapshotError, SnapshotRole};
use std::io::Read;

pub(crate) fn parse_delimited<R: Read>(
    reader: R,
    delimiter: u8,
    role: SnapshotRole,
) -> Result<Snapshot, SnapshotError> {
    let csv_error = |source| SnapshotError::Csv { role, source };
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let columns = csv_reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(clean_header)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Snapshot::new(role, columns, rows))
}

/// Header text without byte-order marks or zero-width spaces.
pub(crate) fn clean_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_headers_and_trims_cells() {
        let csv = "\u{feff}Request ID, Status ,Hiring Manager\n REQ1001.0 , Active ,Alice Green\n";
        let snapshot =
            parse_delimited(Cursor::new(csv), b',', SnapshotRole::Old).expect("csv parses");

        assert_eq!(snapshot.columns(), ["Request ID", "Status", "Hiring Manager"]);
        assert_eq!(snapshot.rows()[0], vec!["REQ1001.0", "Active", "Alice Green"]);
    }

    #[test]
    fn tolerates_ragged_rows_and_blank_lines() {
        let csv = "Request ID,Status,Job Title\nR1,active\n,,\nR2,closed,Analyst\n";
        let snapshot =
            parse_delimited(Cursor::new(csv), b',', SnapshotRole::New).expect("csv parses");

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.rows()[0], vec!["R1", "active", ""]);
        assert_eq!(snapshot.rows()[1][2], "Analyst");
    }

    #[test]
    fn honours_tab_delimiter() {
        let tsv = "Request ID\tStatus\nR1\tZero Filled\n";
        let snapshot =
            parse_delimited(Cursor::new(tsv), b'\t', SnapshotRole::Single).expect("tsv parses");
        assert_eq!(snapshot.rows()[0][1], "Zero Filled");
    }
}
