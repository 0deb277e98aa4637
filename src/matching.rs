use crate::model::ResultsTable;

/// Decides whether a normalized roster name matches a normalized result cell.
///
/// Both inputs arrive already passed through [`normalize`]: lowercased, with
/// whitespace runs collapsed to single spaces. Implementations must be pure;
/// the reconciliation flow relies on repeated calls being deterministic.
pub trait MatchStrategy {
    fn is_match(&self, query: &str, candidate: &str) -> bool;
}

/// Permissive substring strategy used by default.
///
/// A candidate matches when the query contains it, it contains the query, or
/// every one of the query's first two tokens (surname and given name) appears
/// as a substring of some candidate token, which is what lets "Ivanov Ivan"
/// match an abbreviated "Ivanov I." cell. The permissiveness trades false
/// positives on short or common tokens for recall.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatch;

impl MatchStrategy for SubstringMatch {
    fn is_match(&self, query: &str, candidate: &str) -> bool {
        if query.is_empty() || candidate.is_empty() {
            return false;
        }
        if candidate.contains(query) || query.contains(candidate) {
            return true;
        }
        query
            .split_whitespace()
            .take(2)
            .all(|part| candidate.split_whitespace().any(|token| token.contains(part)))
    }
}

/// Lowercases text and collapses internal whitespace runs to single spaces.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Finds the first result row containing a cell that matches the given name.
///
/// Rows are scanned in table order and every column of a row is checked
/// before advancing to the next row; the first hit wins. Empty cells are
/// skipped, since an empty candidate would trivially be a substring of any
/// query. No match anywhere returns `None`; this never fails.
pub fn find_result_row<'t, S: MatchStrategy>(
    name: &str,
    table: &'t ResultsTable,
    strategy: &S,
) -> Option<&'t Vec<String>> {
    let query = normalize(name);
    if query.is_empty() {
        return None;
    }

    for row in &table.rows {
        for cell in row {
            let candidate = normalize(cell);
            if candidate.is_empty() {
                continue;
            }
            if strategy.is_match(&query, &candidate) {
                return Some(row);
            }
        }
    }

    None
}
