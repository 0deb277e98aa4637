use std::collections::BTreeSet;

use tracing::{debug, info, instrument};

use crate::classify;
use crate::error::{ProcessError, Result};
use crate::grade;
use crate::matching::{self, SubstringMatch};
use crate::model::{
    Category, CategoryTable, ExportFlags, Grade, ReportRow, ResultsTable, Roster, Session,
};
use crate::report::{self, ReportFile};

/// Per-category tables plus the matching tallies for one reconciliation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub tables: Vec<CategoryTable>,
    pub matched_count: usize,
    pub unmatched_count: usize,
}

/// Final product of one processing invocation.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub files: Vec<ReportFile>,
    pub matched_count: usize,
    pub unmatched_count: usize,
}

/// Runs one full processing invocation against the caller's session.
///
/// Validates that both inputs are loaded and that the selection is usable,
/// then reconciles and builds the report documents. Any failure aborts the
/// whole invocation before a single document is handed out; there is no
/// partial-success report.
#[instrument(level = "info", skip_all, fields(groups = session.selected_groups.len()))]
pub fn process(session: &Session) -> Result<ProcessOutcome> {
    let results = session
        .results
        .as_ref()
        .ok_or(ProcessError::MissingInput("results table is not loaded"))?;
    let roster = session
        .roster
        .as_ref()
        .ok_or(ProcessError::MissingInput("student roster is not loaded"))?;
    if session.selected_groups.is_empty() {
        return Err(ProcessError::EmptySelection("no groups selected"));
    }
    if !session.exports.any() {
        return Err(ProcessError::EmptySelection("no test categories selected"));
    }

    let reconciliation = reconcile(roster, results, &session.selected_groups, session.exports);
    let files = report::build(&reconciliation.tables, session.layout)?;
    info!(
        matched = reconciliation.matched_count,
        unmatched = reconciliation.unmatched_count,
        files = files.len(),
        "processing finished"
    );

    Ok(ProcessOutcome {
        files,
        matched_count: reconciliation.matched_count,
        unmatched_count: reconciliation.unmatched_count,
    })
}

/// Reconciles the roster against the results table.
///
/// Every roster entry in a selected group is matched against the results
/// exactly once; the tallies count students, not rows, so
/// `matched_count + unmatched_count` always equals the size of the filtered
/// roster. A student without a result row still receives a uniformly
/// not-available row per enabled category, so the report documents cover
/// the whole selection.
#[instrument(level = "info", skip_all)]
pub fn reconcile(
    roster: &Roster,
    results: &ResultsTable,
    selected_groups: &BTreeSet<String>,
    exports: ExportFlags,
) -> Reconciliation {
    let catalog = classify::classify(&results.headers);
    debug!(
        lectures = catalog.lectures.len(),
        labs = catalog.labs.len(),
        finals = catalog.finals.len(),
        "classified test columns"
    );

    let mut tables: Vec<CategoryTable> = Category::ALL
        .into_iter()
        .filter(|category| exports.enabled(*category) && !catalog.columns(*category).is_empty())
        .map(|category| CategoryTable {
            category,
            columns: catalog.columns(category).to_vec(),
            rows: Vec::new(),
        })
        .collect();

    // Header positions resolved once per table instead of once per student.
    let column_indices: Vec<Vec<Option<usize>>> = tables
        .iter()
        .map(|table| {
            table
                .columns
                .iter()
                .map(|column| results.column_index(&column.header))
                .collect()
        })
        .collect();

    let strategy = SubstringMatch;
    let mut matched_count = 0;
    let mut unmatched_count = 0;

    for (full_name, group) in roster.iter() {
        if !selected_groups.contains(group) {
            continue;
        }

        let found = matching::find_result_row(full_name, results, &strategy);
        if found.is_some() {
            matched_count += 1;
        } else {
            unmatched_count += 1;
        }

        for (table, indices) in tables.iter_mut().zip(&column_indices) {
            let grades = match found {
                Some(row) => indices
                    .iter()
                    .map(|index| match index.and_then(|idx| row.get(idx)) {
                        Some(cell) => grade::convert(cell),
                        None => Grade::NotAvailable,
                    })
                    .collect(),
                None => vec![Grade::NotAvailable; indices.len()],
            };
            table.rows.push(ReportRow {
                full_name: full_name.clone(),
                group: group.clone(),
                grades,
            });
        }
    }

    info!(matched_count, unmatched_count, "matched roster against results");

    Reconciliation {
        tables,
        matched_count,
        unmatched_count,
    }
}
