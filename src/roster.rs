use crate::error::Result;
use crate::io::excel_read;
use crate::model::Roster;

/// How many leading cells of a row are probed for a name candidate.
const NAME_LOOKAHEAD: usize = 5;
/// A name cell must be longer than this many characters, counted in chars
/// rather than bytes since roster names are usually Cyrillic.
const MIN_NAME_CHARS: usize = 4;

/// Knobs for the roster scan.
#[derive(Debug, Clone, Copy)]
pub struct RosterOptions {
    /// Leading rows skipped outright to jump over title and header rows.
    /// When skipping leaves zero usable entries the scan retries from the
    /// first row instead of failing.
    pub skip_rows: usize,
}

impl Default for RosterOptions {
    /// Roster uploads conventionally carry two title rows.
    fn default() -> Self {
        Self { skip_rows: 2 }
    }
}

/// Decodes roster workbook bytes and extracts the full name → group mapping.
///
/// Only the workbook decode can fail here; the scan itself degrades row by
/// row and never errors.
pub fn parse(bytes: &[u8], options: RosterOptions) -> Result<Roster> {
    let grid = excel_read::read_grid(bytes)?;
    Ok(scan_grid(&grid, options))
}

/// Scans a raw grid for (full name, group) pairs.
///
/// Roster sheets are produced by different people with no reliable layout,
/// so each row is probed independently: the first name-like cell within the
/// lookahead window is the name, and the cell immediately after it must
/// carry at least one digit to count as the group code. Rows without such a
/// pair are skipped silently; partial and garbage rows are expected.
pub fn scan_grid(grid: &[Vec<String>], options: RosterOptions) -> Roster {
    let start = options.skip_rows.min(grid.len());
    let roster = scan_rows(&grid[start..]);
    if roster.is_empty() && options.skip_rows > 0 {
        // The skip count ate every usable row; retry from the top.
        return scan_rows(grid);
    }
    roster
}

fn scan_rows(rows: &[Vec<String>]) -> Roster {
    let mut roster = Roster::default();
    for row in rows {
        if let Some((name, group)) = extract_entry(row) {
            roster.insert(name, group);
        }
    }
    roster
}

/// First qualifying name cell in the window wins. A qualifying name without
/// a digit-bearing follower cell disqualifies the whole row rather than
/// resuming the search further right.
fn extract_entry(row: &[String]) -> Option<(String, String)> {
    for (index, cell) in row.iter().take(NAME_LOOKAHEAD).enumerate() {
        let name = cell.trim();
        if !is_name_like(name) {
            continue;
        }
        let group = row.get(index + 1)?.trim();
        if !group.chars().any(|ch| ch.is_ascii_digit()) {
            return None;
        }
        return Some((name.to_string(), group.to_string()));
    }
    None
}

/// Qualification predicate for a trimmed name candidate: alphabetic content,
/// an interior space, not purely numeric, and long enough to be a real name.
fn is_name_like(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
        && text.chars().any(char::is_whitespace)
        && !text.chars().all(char::is_numeric)
        && text.chars().count() > MIN_NAME_CHARS
}
