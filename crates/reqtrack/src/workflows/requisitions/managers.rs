use super::domain::{status_priority, Source};
use super::reconcile::ReconciledRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

const PLACEHOLDER_MANAGERS: [&str; 3] = ["nan", "none", "null"];

/// Trimmed manager name, or `None` for blanks and spreadsheet placeholders.
pub fn clean_manager(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || PLACEHOLDER_MANAGERS
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token))
    {
        None
    } else {
        Some(trimmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiringManagerSummary {
    pub hiring_manager: String,
    pub old_requests: usize,
    pub new_requests: usize,
    pub total_requests: usize,
}

/// Distinct request ids per manager and source, busiest managers first.
pub fn summarize_managers(records: &[ReconciledRecord]) -> Vec<HiringManagerSummary> {
    let mut grouped: BTreeMap<&str, [HashSet<&str>; 2]> = BTreeMap::new();

    for record in records {
        let Some(manager) = clean_manager(&record.hiring_manager) else {
            continue;
        };
        let slot = match record.source {
            Source::Old => 0,
            Source::New => 1,
        };
        grouped.entry(manager).or_default()[slot].insert(record.request_id.as_str());
    }

    let mut summaries: Vec<HiringManagerSummary> = grouped
        .into_iter()
        .map(|(manager, [old, new])| HiringManagerSummary {
            hiring_manager: manager.to_string(),
            old_requests: old.len(),
            new_requests: new.len(),
            total_requests: old.len() + new.len(),
        })
        .collect();

    // BTreeMap iteration already yields names ascending; the stable sort keeps it for ties.
    summaries.sort_by(|a, b| b.total_requests.cmp(&a.total_requests));
    summaries
}

/// Sorted distinct manager names, for a selector control.
pub fn hiring_managers(records: &[ReconciledRecord]) -> Vec<String> {
    let mut names: Vec<String> = records
        .iter()
        .filter_map(|record| clean_manager(&record.hiring_manager))
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    names
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum ManagerSelection {
    #[default]
    All,
    Named(String),
}

impl ManagerSelection {
    /// Blank input and "all" (or the selector's "All Hiring Managers") select everyone.
    pub fn from_input(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::All,
            Some(name)
                if name.eq_ignore_ascii_case("all")
                    || name.eq_ignore_ascii_case("all hiring managers") =>
            {
                Self::All
            }
            Some(name) => Self::Named(name.to_string()),
        }
    }

    pub fn matches(&self, manager: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => manager.trim() == name.trim(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "all hiring managers",
            Self::Named(name) => name,
        }
    }

    /// File-name fragment, or `all`. Lower-cased; anything outside
    /// `[a-z0-9_-]` becomes `_`.
    pub fn slug(&self) -> String {
        match self {
            Self::All => "all".to_string(),
            Self::Named(name) => name
                .trim()
                .to_lowercase()
                .chars()
                .map(|c| match c {
                    'a'..='z' | '0'..='9' | '_' | '-' => c,
                    _ => '_',
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSelection {
    #[default]
    Both,
    OldOnly,
    NewOnly,
}

impl SourceSelection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Both => "Both",
            Self::OldOnly => "OLD only",
            Self::NewOnly => "NEW only",
        }
    }

    pub fn includes(self, source: Source) -> bool {
        match self {
            Self::Both => true,
            Self::OldOnly => source == Source::Old,
            Self::NewOnly => source == Source::New,
        }
    }
}

impl fmt::Display for SourceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SourceSelection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "both" | "both files" | "" => Ok(Self::Both),
            "old" | "old only" | "old file only" => Ok(Self::OldOnly),
            "new" | "new only" | "new file only" => Ok(Self::NewOnly),
            _ => Err(format!(
                "unknown source '{value}' (expected both, old or new)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(default)]
    pub manager: ManagerSelection,
    #[serde(default)]
    pub source: SourceSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStatusRow {
    pub source: Source,
    pub counts: Vec<usize>,
}

/// (source, status) counts. Columns are the statuses present, rows the sources
/// present; absent combinations are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceStatusTable {
    pub statuses: Vec<String>,
    pub rows: Vec<SourceStatusRow>,
}

impl SourceStatusTable {
    pub fn count(&self, source: Source, status: &str) -> usize {
        let Some(column) = self.statuses.iter().position(|s| s == status) else {
            return 0;
        };
        self.rows
            .iter()
            .find(|row| row.source == source)
            .map(|row| row.counts[column])
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredView {
    pub records: Vec<ReconciledRecord>,
    pub status_distribution: Vec<StatusCount>,
    pub breakdown: SourceStatusTable,
}

pub fn filter_records(records: &[ReconciledRecord], filter: &RecordFilter) -> FilteredView {
    let records: Vec<ReconciledRecord> = records
        .iter()
        .filter(|record| filter.manager.matches(&record.hiring_manager))
        .filter(|record| filter.source.includes(record.source))
        .cloned()
        .collect();

    FilteredView {
        status_distribution: status_distribution(&records),
        breakdown: source_status_table(&records),
        records,
    }
}

/// Count per status, largest first; ties follow status priority then name.
pub fn status_distribution(records: &[ReconciledRecord]) -> Vec<StatusCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.status.as_str()).or_default() += 1;
    }

    let mut distribution: Vec<StatusCount> = counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect();
    distribution.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| status_priority(&a.status).cmp(&status_priority(&b.status)))
            .then_with(|| a.status.cmp(&b.status))
    });
    distribution
}

pub fn source_status_table(records: &[ReconciledRecord]) -> SourceStatusTable {
    let mut statuses: Vec<String> = Vec::new();
    for record in records {
        if !statuses.contains(&record.status) {
            statuses.push(record.status.clone());
        }
    }
    statuses.sort_by(|a, b| {
        status_priority(a)
            .cmp(&status_priority(b))
            .then_with(|| a.cmp(b))
    });

    let rows = Source::ordered()
        .into_iter()
        .filter(|source| records.iter().any(|record| record.source == *source))
        .map(|source| SourceStatusRow {
            source,
            counts: statuses
                .iter()
                .map(|status| {
                    records
                        .iter()
                        .filter(|record| record.source == source && &record.status == status)
                        .count()
                })
                .collect(),
        })
        .collect();

    SourceStatusTable { statuses, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: Source, id: &str, status: &str, manager: &str) -> ReconciledRecord {
        ReconciledRecord {
            source,
            request_id: id.to_string(),
            status: status.to_string(),
            hiring_manager: manager.to_string(),
            job_title: String::new(),
            interviewed: String::new(),
            work_site_name: String::new(),
            total_positions: String::new(),
        }
    }

    fn sample() -> Vec<ReconciledRecord> {
        vec![
            record(Source::Old, "R1", "Active", "Alice Green"),
            record(Source::Old, "R2", "Zero Filled", "Alice Green"),
            record(Source::Old, "R2", "Zero Filled", "Alice Green"),
            record(Source::New, "R1", "Active", "Alice Green "),
            record(Source::New, "R3", "Active", "Alice Green"),
            record(Source::New, "R4", "Partially Filled", "Alice Green"),
            record(Source::New, "R5", "Active", "Bob White"),
            record(Source::Old, "R6", "Active", "nan"),
            record(Source::New, "R7", "Active", ""),
        ]
    }

    #[test]
    fn counts_distinct_requests_per_source() {
        let summary = summarize_managers(&sample());
        assert_eq!(summary.len(), 2);
        assert_eq!(
            summary[0],
            HiringManagerSummary {
                hiring_manager: "Alice Green".to_string(),
                old_requests: 2,
                new_requests: 3,
                total_requests: 5,
            }
        );
        assert_eq!(summary[1].hiring_manager, "Bob White");
        assert_eq!(summary[1].old_requests, 0);
        assert_eq!(summary[1].total_requests, 1);
    }

    #[test]
    fn ties_fall_back_to_manager_name() {
        let records = vec![
            record(Source::Old, "R1", "Active", "Zed"),
            record(Source::New, "R2", "Active", "Amy"),
        ];
        let names: Vec<_> = summarize_managers(&records)
            .into_iter()
            .map(|row| row.hiring_manager)
            .collect();
        assert_eq!(names, ["Amy", "Zed"]);
    }

    #[test]
    fn placeholders_are_not_managers() {
        assert_eq!(clean_manager(" NaN "), None);
        assert_eq!(clean_manager("None"), None);
        assert_eq!(clean_manager("null"), None);
        assert_eq!(clean_manager(" Diana Gray "), Some("Diana Gray"));
        assert_eq!(hiring_managers(&sample()), ["Alice Green", "Bob White"]);
    }

    #[test]
    fn filter_by_manager_and_source() {
        let filter = RecordFilter {
            manager: ManagerSelection::from_input(Some("Alice Green")),
            source: SourceSelection::NewOnly,
        };
        let view = filter_records(&sample(), &filter);

        assert_eq!(view.records.len(), 3);
        assert!(view.records.iter().all(|r| r.source == Source::New));
        assert_eq!(
            view.status_distribution,
            vec![
                StatusCount {
                    status: "Active".to_string(),
                    count: 2
                },
                StatusCount {
                    status: "Partially Filled".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(view.breakdown.rows.len(), 1);
        assert_eq!(view.breakdown.count(Source::Old, "Active"), 0);
    }

    #[test]
    fn cross_tab_zero_fills_missing_combinations() {
        let table = source_status_table(&sample());
        assert_eq!(table.statuses, ["Active", "Partially Filled", "Zero Filled"]);
        assert_eq!(table.count(Source::Old, "Active"), 2);
        assert_eq!(table.count(Source::Old, "Partially Filled"), 0);
        assert_eq!(table.count(Source::New, "Zero Filled"), 0);
        assert_eq!(table.count(Source::New, "Active"), 4);
    }

    #[test]
    fn selections_parse_user_input() {
        assert_eq!(ManagerSelection::from_input(None), ManagerSelection::All);
        assert_eq!(
            ManagerSelection::from_input(Some("All Hiring Managers")),
            ManagerSelection::All
        );
        assert_eq!(
            ManagerSelection::from_input(Some("Bob White")).slug(),
            "bob_white"
        );
        assert_eq!(
            ManagerSelection::from_input(Some("Smith/Jones \"Ops\"")).slug(),
            "smith_jones__ops_"
        );
        assert_eq!(
            ManagerSelection::from_input(Some("..\\Ana\tRuiz")).slug(),
            "___ana_ruiz"
        );
        assert_eq!("OLD only".parse::<SourceSelection>(), Ok(SourceSelection::OldOnly));
        assert_eq!("new".parse::<SourceSelection>(), Ok(SourceSelection::NewOnly));
        assert_eq!("Both Files".parse::<SourceSelection>(), Ok(SourceSelection::Both));
        assert!("neither".parse::<SourceSelection>().is_err());
    }
}
