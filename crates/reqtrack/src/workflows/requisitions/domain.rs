use serde::{Deserialize, Serialize};
use std::fmt;

pub const REQUEST_ID_COLUMN: &str = "Request ID";
pub const STATUS_COLUMN: &str = "Status";

/// Which upload a table was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotRole {
    Old,
    New,
    Single,
}

impl SnapshotRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Old => "OLD",
            Self::New => "NEW",
            Self::Single => "single",
        }
    }
}

impl fmt::Display for SnapshotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Side of a comparison a reconciled record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Source {
    Old,
    New,
}

impl Source {
    pub const fn ordered() -> [Self; 2] {
        [Self::Old, Self::New]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Old => "OLD",
            Self::New => "NEW",
        }
    }

    pub const fn role(self) -> SnapshotRole {
        match self {
            Self::Old => SnapshotRole::Old,
            Self::New => SnapshotRole::New,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const UNKNOWN_STATUS_PRIORITY: u8 = 99;

/// Statuses treated as still-open requisitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveStatus {
    Active,
    PartiallyFilled,
    ZeroFilled,
}

impl ActiveStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Active, Self::PartiallyFilled, Self::ZeroFilled]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::PartiallyFilled => "Partially Filled",
            Self::ZeroFilled => "Zero Filled",
        }
    }

    pub const fn priority(self) -> u8 {
        match self {
            Self::Active => 1,
            Self::PartiallyFilled => 2,
            Self::ZeroFilled => 3,
        }
    }

    /// Exact match against the canonical display label.
    pub fn from_label(canonical: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|status| status.label() == canonical)
    }
}

/// Sort priority of a canonical status; anything outside the family sorts last.
pub fn status_priority(canonical: &str) -> u8 {
    ActiveStatus::from_label(canonical)
        .map(ActiveStatus::priority)
        .unwrap_or(UNKNOWN_STATUS_PRIORITY)
}

/// Columns carried through when present. Absent columns and blank cells
/// resolve to [`OptionalColumn::default_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalColumn {
    HiringManager,
    JobTitle,
    Interviewed,
    WorkSiteName,
    TotalPositions,
}

impl OptionalColumn {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::HiringManager,
            Self::JobTitle,
            Self::Interviewed,
            Self::WorkSiteName,
            Self::TotalPositions,
        ]
    }

    pub const fn header(self) -> &'static str {
        match self {
            Self::HiringManager => "Hiring Manager",
            Self::JobTitle => "Job Title",
            Self::Interviewed => "Interviewed?",
            Self::WorkSiteName => "Work Site Name",
            Self::TotalPositions => "Total Positions",
        }
    }

    pub const fn default_value(self) -> &'static str {
        ""
    }
}

/// Optional fields of one requisition, already resolved against their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalFields {
    pub hiring_manager: String,
    pub job_title: String,
    pub interviewed: String,
    pub work_site_name: String,
    pub total_positions: String,
}

impl OptionalFields {
    pub fn get(&self, column: OptionalColumn) -> &str {
        match column {
            OptionalColumn::HiringManager => &self.hiring_manager,
            OptionalColumn::JobTitle => &self.job_title,
            OptionalColumn::Interviewed => &self.interviewed,
            OptionalColumn::WorkSiteName => &self.work_site_name,
            OptionalColumn::TotalPositions => &self.total_positions,
        }
    }

    fn slot(&mut self, column: OptionalColumn) -> &mut String {
        match column {
            OptionalColumn::HiringManager => &mut self.hiring_manager,
            OptionalColumn::JobTitle => &mut self.job_title,
            OptionalColumn::Interviewed => &mut self.interviewed,
            OptionalColumn::WorkSiteName => &mut self.work_site_name,
            OptionalColumn::TotalPositions => &mut self.total_positions,
        }
    }

    /// Resolve every optional column for one row of `snapshot`.
    pub(crate) fn resolve(snapshot: &Snapshot, row: &[String]) -> Self {
        let mut fields = Self::default();
        for column in OptionalColumn::ordered() {
            let value = snapshot
                .column_index(column.header())
                .and_then(|index| row.get(index))
                .map(String::as_str)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(column.default_value());
            *fields.slot(column) = value.to_string();
        }
        fields
    }
}

/// One decoded table: ordered headers plus rows of cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    role: SnapshotRole,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Snapshot {
    /// Rows are padded or truncated to the header width.
    pub fn new(role: SnapshotRole, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            role,
            columns,
            rows,
        }
    }

    pub fn role(&self) -> SnapshotRole {
        self.role
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn require_column(&self, column: &'static str) -> Result<usize, SnapshotError> {
        self.column_index(column)
            .ok_or(SnapshotError::MissingColumn {
                column,
                role: self.role,
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("'{column}' column not found in {role} file")]
    MissingColumn {
        column: &'static str,
        role: SnapshotRole,
    },
    #[error("failed to read {role} file: {source}")]
    Io {
        role: SnapshotRole,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data in {role} file: {source}")]
    Csv {
        role: SnapshotRole,
        #[source]
        source: csv::Error,
    },
    #[error("could not decode {role} workbook: {source}")]
    Workbook {
        role: SnapshotRole,
        #[source]
        source: calamine::Error,
    },
    #[error("{role} workbook contains no worksheets")]
    EmptyWorkbook { role: SnapshotRole },
    #[error("unsupported file type '{extension}' for {role} file")]
    UnsupportedFormat {
        role: SnapshotRole,
        extension: String,
    },
}

impl SnapshotError {
    pub fn role(&self) -> SnapshotRole {
        match self {
            Self::MissingColumn { role, .. }
            | Self::Io { role, .. }
            | Self::Csv { role, .. }
            | Self::Workbook { role, .. }
            | Self::EmptyWorkbook { role }
            | Self::UnsupportedFormat { role, .. } => *role,
        }
    }

    pub fn is_missing_column(&self) -> bool {
        matches!(self, Self::MissingColumn { .. })
    }
}
