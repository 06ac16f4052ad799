use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode spreadsheet export: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("{kind} export has {columns} columns, more than a worksheet holds")]
    TooWide { kind: ExportKind, columns: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown export format '{other}' (expected xlsx or csv)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    ActiveExtract,
    Combined,
    OldOnly,
    NewOnly,
    Comparison,
    Filtered,
}

impl ExportKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ActiveExtract => "Active Requests",
            Self::Combined => "Combined",
            Self::OldOnly => "OLD Active",
            Self::NewOnly => "NEW Active",
            Self::Comparison => "Comparison",
            Self::Filtered => "Filtered",
        }
    }

    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::ActiveExtract => "active_requests",
            Self::Combined => "active_statuses_from_both_files",
            Self::OldOnly => "active_statuses_old_file",
            Self::NewOnly => "active_statuses_new_file",
            Self::Comparison => "active_status_comparison",
            Self::Filtered => "filtered_active_statuses",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Header row plus one row per record, ready to serialize. No index column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    pub kind: ExportKind,
    pub file_stem: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn new(kind: ExportKind, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            kind,
            file_stem: kind.file_stem().to_string(),
            headers,
            rows,
        }
    }

    pub fn with_file_stem(mut self, file_stem: impl Into<String>) -> Self {
        self.file_stem = file_stem.into();
        self
    }

    pub fn file_name(&self, format: ExportFormat) -> String {
        format!("{}.{}", self.file_stem, format.extension())
    }

    pub fn to_bytes(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Csv => self.csv_bytes(),
            ExportFormat::Xlsx => self.xlsx_bytes(),
        }
    }

    pub fn write_to_dir(&self, dir: &Path, format: ExportFormat) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name(format));
        std::fs::write(&path, self.to_bytes(format)?)?;

        info!(
            kind = %self.kind,
            path = %path.display(),
            rows = self.rows.len(),
            "export written"
        );
        Ok(path)
    }

    fn csv_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))
    }

    fn xlsx_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let columns = u16::try_from(self.headers.len()).map_err(|_| ExportError::TooWide {
            kind: self.kind,
            columns: self.headers.len(),
        })?;

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.kind.label())?;

        for (column, header) in (0..columns).zip(&self.headers) {
            worksheet.write_string_with_format(0, column, header, &header_format)?;
        }
        for (row_number, row) in (1u32..).zip(&self.rows) {
            for (column, value) in (0..columns).zip(row) {
                if !value.is_empty() {
                    worksheet.write_string(row_number, column, value)?;
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExportTable {
        ExportTable::new(
            ExportKind::Combined,
            vec!["Request ID".to_string(), "Status".to_string()],
            vec![
                vec!["R1".to_string(), "Active".to_string()],
                vec!["R2, west".to_string(), "Zero Filled".to_string()],
            ],
        )
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let bytes = sample().to_bytes(ExportFormat::Csv).expect("csv encodes");
        let text = String::from_utf8(bytes).expect("utf8");
        assert_eq!(
            text,
            "Request ID,Status\nR1,Active\n\"R2, west\",Zero Filled\n"
        );
    }

    #[test]
    fn xlsx_is_a_zip_container() {
        let bytes = sample().to_bytes(ExportFormat::Xlsx).expect("xlsx encodes");
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn file_names_follow_kind_and_format() {
        assert_eq!(
            sample().file_name(ExportFormat::Xlsx),
            "active_statuses_from_both_files.xlsx"
        );
        assert_eq!(
            sample()
                .with_file_stem("filtered_active_statuses_all")
                .file_name(ExportFormat::Csv),
            "filtered_active_statuses_all.csv"
        );
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("XLSX".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert_eq!(".csv".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
