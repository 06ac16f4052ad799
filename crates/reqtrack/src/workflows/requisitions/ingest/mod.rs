mod normalizer;
mod parser;
mod workbook;

use super::domain::{Snapshot, SnapshotError, SnapshotRole};
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;

pub use normalizer::{
    normalize, normalize_request_id, normalize_status, validate_columns, NormalizedRow,
    NormalizedSnapshot,
};

#[cfg(test)]
pub(crate) use normalizer::normalize_for_tests;

/// Input encodings recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Delimited { delimiter: u8 },
    Workbook,
}

impl SnapshotFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::Delimited { delimiter: b',' }),
            "tsv" | "tab" => Some(Self::Delimited { delimiter: b'\t' }),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }

    pub fn from_path(path: &Path, role: SnapshotRole) -> Result<Self, SnapshotError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension).ok_or_else(|| SnapshotError::UnsupportedFormat {
            role,
            extension: extension.to_string(),
        })
    }
}

pub struct SnapshotReader;

impl SnapshotReader {
    pub fn from_path<P: AsRef<Path>>(path: P, role: SnapshotRole) -> Result<Snapshot, SnapshotError> {
        let path = path.as_ref();
        let format = SnapshotFormat::from_path(path, role)?;
        let bytes = std::fs::read(path).map_err(|source| SnapshotError::Io { role, source })?;
        let snapshot = Self::from_bytes(bytes, format, role)?;

        debug!(
            path = %path.display(),
            %role,
            rows = snapshot.len(),
            columns = snapshot.columns().len(),
            "snapshot decoded"
        );
        Ok(snapshot)
    }

    pub fn from_bytes(
        bytes: Vec<u8>,
        format: SnapshotFormat,
        role: SnapshotRole,
    ) -> Result<Snapshot, SnapshotError> {
        match format {
            SnapshotFormat::Delimited { delimiter } => {
                parser::parse_delimited(Cursor::new(bytes), delimiter, role)
            }
            SnapshotFormat::Workbook => workbook::parse_workbook(Cursor::new(bytes), role),
        }
    }

    pub fn from_csv<R: Read>(reader: R, role: SnapshotRole) -> Result<Snapshot, SnapshotError> {
        parser::parse_delimited(reader, b',', role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            SnapshotFormat::from_extension("CSV"),
            Some(SnapshotFormat::Delimited { delimiter: b',' })
        );
        assert_eq!(
            SnapshotFormat::from_extension(".xlsx"),
            Some(SnapshotFormat::Workbook)
        );
        assert_eq!(SnapshotFormat::from_extension("pdf"), None);
    }

    #[test]
    fn unsupported_extension_is_reported_with_role() {
        let error = SnapshotReader::from_path("requisitions.pdf", SnapshotRole::New)
            .expect_err("pdf unsupported");
        match error {
            SnapshotError::UnsupportedFormat { role, extension } => {
                assert_eq!(role, SnapshotRole::New);
                assert_eq!(extension, "pdf");
            }
            other => panic!("expected unsupported format, got {other:?}"),
        }
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = SnapshotReader::from_path("./does-not-exist.csv", SnapshotRole::Old)
            .expect_err("expected io error");
        assert!(matches!(error, SnapshotError::Io { .. }));
    }

    #[test]
    fn from_csv_reads_in_memory_text() {
        let snapshot = SnapshotReader::from_csv(
            "Request ID,Status\nR1,Active\n".as_bytes(),
            SnapshotRole::Single,
        )
        .expect("csv parses");
        assert_eq!(snapshot.role(), SnapshotRole::Single);
        assert_eq!(snapshot.len(), 1);
    }
}
