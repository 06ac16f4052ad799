use super::super::domain::{Snapshot, SnapshotError, SnapshotRole};
use super::parser::clean_header;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::{Read, Seek};

/// Decode the first worksheet of an xlsx/xls/xlsb/ods workbook.
pub(crate) fn parse_workbook<RS>(data: RS, role: SnapshotRole) -> Result<Snapshot, SnapshotError>
where
    RS: Read + Seek + Clone,
{
    let workbook_error = |source| SnapshotError::Workbook { role, source };
    let mut workbook = open_workbook_auto_from_rs(data).map_err(workbook_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SnapshotError::EmptyWorkbook { role })?
        .map_err(workbook_error)?;

    let mut rows = range.rows();
    let columns = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| clean_header(&cell_text(cell)))
            .collect(),
        None => Vec::new(),
    };

    let body = rows
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    Ok(Snapshot::new(role, columns, body))
}

/// Integral floats render without a fractional part so identifiers such as
/// `1001` do not pick up a `.0` suffix.
pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{value:.0}")
        }
        Data::Float(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        other => other.to_string(),
    }
}
