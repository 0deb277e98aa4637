use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Marker written into report cells (and accepted in source cells) for a
/// grade that is missing, unparsable, or belongs to an unmatched student.
pub const NOT_AVAILABLE_MARKER: &str = "н";

/// A converted grade on the coarse five-point scale.
///
/// The no-grade case is an explicit variant rather than a magic cell value so
/// callers cannot mistake it for a real score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    /// Successfully rescaled score, always in `1..=5`.
    Converted(u8),
    /// Missing, unparsable, or not-applicable score.
    NotAvailable,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::Converted(value) => write!(f, "{value}"),
            Grade::NotAvailable => write!(f, "{NOT_AVAILABLE_MARKER}"),
        }
    }
}

/// Test category a result column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Lecture,
    Lab,
    Final,
}

impl Category {
    /// Every category, in the order reports are emitted.
    pub const ALL: [Category; 3] = [Category::Lecture, Category::Lab, Category::Final];

    /// Human-facing label, also used as the flat-layout sheet name.
    pub fn label(self) -> &'static str {
        match self {
            Category::Lecture => "Лекции",
            Category::Lab => "Лабораторные",
            Category::Final => "Итоговые",
        }
    }

    /// Fixed name of the report document produced for this category.
    pub fn filename(self) -> &'static str {
        match self {
            Category::Lecture => "Лекции_результаты.xlsx",
            Category::Lab => "Лабораторные_результаты.xlsx",
            Category::Final => "Итоговые_результаты.xlsx",
        }
    }
}

/// A result-table column recognised as a test.
///
/// `header` is the lookup key into the results table; `name` is the display
/// label used for the report column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestColumn {
    pub header: String,
    pub name: String,
}

/// Test columns partitioned by category, each list sorted by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCatalog {
    pub lectures: Vec<TestColumn>,
    pub labs: Vec<TestColumn>,
    pub finals: Vec<TestColumn>,
}

impl TestCatalog {
    /// Columns recognised for the given category.
    pub fn columns(&self, category: Category) -> &[TestColumn] {
        match category {
            Category::Lecture => &self.lectures,
            Category::Lab => &self.labs,
            Category::Final => &self.finals,
        }
    }

    /// True when no header qualified as a test column at all.
    pub fn is_empty(&self) -> bool {
        self.lectures.is_empty() && self.labs.is_empty() && self.finals.is_empty()
    }
}

/// Student full name → group code mapping extracted from a roster sheet.
///
/// Entries are keyed by full name, so a duplicated name overwrites the
/// earlier entry (last-write-wins). Iteration is name-sorted, which keeps
/// report output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    entries: BTreeMap<String, String>,
}

impl Roster {
    /// Inserts or replaces a roster entry.
    pub fn insert(&mut self, full_name: impl Into<String>, group: impl Into<String>) {
        self.entries.insert(full_name.into(), group.into());
    }

    /// Number of distinct students.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(full_name, group)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }

    /// Distinct group codes, sorted.
    pub fn groups(&self) -> Vec<String> {
        let groups: BTreeSet<&String> = self.entries.values().collect();
        groups.into_iter().cloned().collect()
    }
}

/// Decoded results table: a header row plus rectangular data rows.
///
/// Cells are stringified at decode time; empty cells decode to `""`. Headers
/// are the only column identity, no positional order is assumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultsTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Position of the given header, if the table has it.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|candidate| candidate == header)
    }
}

/// One student's line in a per-category report.
///
/// `grades` is aligned with the owning [`CategoryTable::columns`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub full_name: String,
    pub group: String,
    pub grades: Vec<Grade>,
}

/// All reconciled rows for one category, together with its column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub category: Category,
    pub columns: Vec<TestColumn>,
    pub rows: Vec<ReportRow>,
}

/// Which test categories the caller wants exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFlags {
    pub lectures: bool,
    pub labs: bool,
    pub finals: bool,
}

impl Default for ExportFlags {
    /// Every category enabled, matching the transport layer's defaults.
    fn default() -> Self {
        Self {
            lectures: true,
            labs: true,
            finals: true,
        }
    }
}

impl ExportFlags {
    /// Flags with every category disabled, for callers that enable
    /// categories one by one.
    pub fn none() -> Self {
        Self {
            lectures: false,
            labs: false,
            finals: false,
        }
    }

    pub fn enable(&mut self, category: Category) {
        match category {
            Category::Lecture => self.lectures = true,
            Category::Lab => self.labs = true,
            Category::Final => self.finals = true,
        }
    }

    pub fn enabled(&self, category: Category) -> bool {
        match category {
            Category::Lecture => self.lectures,
            Category::Lab => self.labs,
            Category::Final => self.finals,
        }
    }

    /// True when at least one category is enabled.
    pub fn any(&self) -> bool {
        self.lectures || self.labs || self.finals
    }
}

/// How report rows are split into sheets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetLayout {
    /// One sheet per group, groups in sorted order.
    #[default]
    PerGroup,
    /// A single sheet carrying every row.
    Flat,
}

/// Per-caller processing context supplied by the transport layer.
///
/// The core itself is stateless: it reads one of these per invocation and
/// never stores caller data between calls.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub results: Option<ResultsTable>,
    pub roster: Option<Roster>,
    pub selected_groups: BTreeSet<String>,
    pub exports: ExportFlags,
    pub layout: SheetLayout,
}
