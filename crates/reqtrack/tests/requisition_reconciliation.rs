use reqtrack::workflows::requisitions::{
    canonicalize, is_active_family, normalize_request_id, summarize_managers, ComparisonOutcome,
    ManagerSelection, PivotOutcome, RecordFilter, RequisitionTracker, Snapshot, SnapshotReader,
    SnapshotRole, Source, SourceSelection, StatusMatchRule,
};

fn snapshot(csv: &str, role: SnapshotRole) -> Snapshot {
    SnapshotReader::from_csv(csv.as_bytes(), role).expect("fixture parses")
}

fn reconcile(old: &str, new: &str) -> ComparisonOutcome {
    RequisitionTracker::default()
        .compare(
            &snapshot(old, SnapshotRole::Old),
            &snapshot(new, SnapshotRole::New),
        )
        .expect("inputs are valid")
}

#[test]
fn old_and_new_exports_reconcile_end_to_end() {
    let outcome = reconcile(
        "Request ID,Status,Hiring Manager\nR1,active,MgrA\nR2,closed,MgrB\n",
        "Request ID,Status,Hiring Manager\nR1,zero filled,MgrA\nR3,partially filled,MgrC\n",
    );
    let reconciliation = outcome.reconciliation().expect("active rows on both sides");

    let unioned: Vec<(Source, &str, &str)> = reconciliation
        .unioned()
        .iter()
        .map(|record| (record.source, record.request_id.as_str(), record.status.as_str()))
        .collect();
    assert_eq!(
        unioned,
        vec![
            (Source::Old, "R1", "Active"),
            (Source::New, "R3", "Partially Filled"),
            (Source::New, "R1", "Zero Filled"),
        ]
    );

    let changed: Vec<&str> = reconciliation
        .pivot()
        .rows()
        .iter()
        .filter(|row| row.status_changed)
        .map(|row| row.request_id.as_str())
        .collect();
    assert_eq!(changed, ["R1"]);

    let summary: Vec<(String, usize, usize, usize)> = summarize_managers(reconciliation.unioned())
        .into_iter()
        .map(|s| (s.hiring_manager, s.old_requests, s.new_requests, s.total_requests))
        .collect();
    assert_eq!(
        summary,
        vec![("MgrA".to_string(), 1, 1, 2), ("MgrC".to_string(), 0, 1, 1)]
    );
}

#[test]
fn pivot_flags_only_status_transitions() {
    let outcome = reconcile(
        "Request ID,Status\nR1,Active\nR2,Active\nR3,Active\n",
        "Request ID,Status\nR1,Zero Filled\nR2,Active\n",
    );
    let rows = outcome.reconciliation().expect("rows qualify").pivot().rows();

    let flags: Vec<(&str, bool)> = rows
        .iter()
        .map(|row| (row.request_id.as_str(), row.status_changed))
        .collect();
    assert_eq!(flags, vec![("R1", true), ("R2", false), ("R3", false)]);
    assert_eq!(rows[2].status_new, None);
}

#[test]
fn manager_counts_distinct_requests_per_side() {
    let outcome = reconcile(
        "Request ID,Status,Hiring Manager\n1,Active,Alice Green\n2,Active,Alice Green\n",
        "Request ID,Status,Hiring Manager\n1,Active,Alice Green\n3,Zero Filled,Alice Green\n4,Partially Filled,Alice Green\n",
    );
    let summary = summarize_managers(outcome.reconciliation().expect("rows qualify").unioned());

    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].hiring_manager, "Alice Green");
    assert_eq!(summary[0].old_requests, 2);
    assert_eq!(summary[0].new_requests, 3);
    assert_eq!(summary[0].total_requests, 5);
}

#[test]
fn union_length_is_sum_of_filtered_sides() {
    let outcome = reconcile(
        "Request ID,Status\n10,Active\n11,On Hold\n12,Partially-Filled\n12,Active\n",
        "Request ID,Status\n10.0,Cancelled\n13,ZeroFilled\n",
    );
    let reconciliation = outcome.reconciliation().expect("rows qualify");

    assert_eq!(reconciliation.active(Source::Old).len(), 3);
    assert_eq!(reconciliation.active(Source::New).len(), 1);
    assert_eq!(reconciliation.unioned().len(), 4);
}

#[test]
fn pivot_needs_both_sides() {
    let outcome = reconcile("Request ID,Status\nR1,Active\n", "Request ID,Status\nR1,Closed\n");
    match outcome.reconciliation().expect("old side qualifies").pivot() {
        PivotOutcome::NoCrossSourceData { missing } => assert_eq!(*missing, Source::New),
        PivotOutcome::Available { .. } => panic!("pivot must be omitted"),
    }

    let empty = reconcile("Request ID,Status\nR1,Closed\n", "Request ID,Status\n");
    assert!(matches!(empty, ComparisonOutcome::EmptyResult));
}

#[test]
fn missing_columns_are_checked_before_any_work() {
    let tracker = RequisitionTracker::default();
    let error = tracker
        .compare(
            &snapshot("Request ID,Stage\nR1,Active\n", SnapshotRole::Old),
            &snapshot("Status\nActive\n", SnapshotRole::New),
        )
        .expect_err("old file lacks Status");

    assert!(error.is_missing_column());
    assert_eq!(error.role(), SnapshotRole::Old);
    assert_eq!(error.to_string(), "'Status' column not found in OLD file");
}

#[test]
fn filters_apply_manager_and_source_together() {
    let outcome = reconcile(
        "Request ID,Status,Hiring Manager\nR1,Active,MgrA\nR2,Active,MgrB\n",
        "Request ID,Status,Hiring Manager\nR1,Active,MgrA\nR4,Active,MgrA\n",
    );
    let reconciliation = outcome.reconciliation().expect("rows qualify");
    let filter = RecordFilter {
        manager: ManagerSelection::from_input(Some("MgrA")),
        source: SourceSelection::NewOnly,
    };
    let view = reqtrack::workflows::requisitions::filter_records(reconciliation.unioned(), &filter);

    let ids: Vec<&str> = view.records.iter().map(|r| r.request_id.as_str()).collect();
    assert_eq!(ids, ["R1", "R4"]);
    assert_eq!(view.breakdown.count(Source::New, "Active"), 2);
    assert_eq!(view.breakdown.count(Source::Old, "Active"), 0);
}

#[test]
fn status_helpers_behave_as_documented() {
    for status in ["Zero Filled", "Partially-Filled", "ACTIVE"] {
        assert!(is_active_family(&status.to_lowercase()), "{status}");
    }
    for status in ["Closed", "On Hold", "Cancelled"] {
        assert!(!is_active_family(&status.to_lowercase()), "{status}");
    }
    for status in ["zerofilled", "Partially-Filled", "on hold"] {
        let once = canonicalize(status);
        assert_eq!(canonicalize(&once), once);
    }
    assert_eq!(normalize_request_id("REQ1001.0 "), "REQ1001");
    assert_eq!(normalize_request_id("REQ1002"), "REQ1002");
}

#[test]
fn alias_rule_rejects_inactive() {
    let old = snapshot("Request ID,Status\nR1,Inactive\nR2,Active\n", SnapshotRole::Old);
    let new = snapshot("Request ID,Status\nR3,Filled\n", SnapshotRole::New);

    let substring = RequisitionTracker::new(StatusMatchRule::Substring)
        .compare(&old, &new)
        .expect("valid");
    assert_eq!(substring.reconciliation().map(|r| r.unioned().len()), Some(3));

    let alias = RequisitionTracker::new(StatusMatchRule::Alias)
        .compare(&old, &new)
        .expect("valid");
    let reconciliation = alias.reconciliation().expect("R2 qualifies");
    assert_eq!(reconciliation.unioned().len(), 1);
    assert_eq!(reconciliation.unioned()[0].request_id, "R2");
}
