use crate::model::{Category, TestCatalog, TestColumn};

/// Generic markers that make a header test-like without naming a category.
const TEST_KEYWORDS: [&str; 2] = ["тест", "test"];
/// Final/total markers; these take precedence when categorizing.
const FINAL_KEYWORDS: [&str; 3] = ["итог", "final", "total"];
/// Lecture markers.
const LECTURE_KEYWORDS: [&str; 2] = ["лекц", "lecture"];
/// Lab markers.
const LAB_KEYWORDS: [&str; 2] = ["лаб", "lab"];

/// Partitions result-table headers into the three test categories.
///
/// Qualification and category assignment both work on lowercased substring
/// checks against the fixed bilingual vocabulary above. Non-test headers are
/// skipped silently. Membership depends only on the header text, so it is
/// invariant to input order; each category list is sorted by display name to
/// keep report column order reproducible across runs.
pub fn classify(headers: &[String]) -> TestCatalog {
    let mut catalog = TestCatalog::default();

    for header in headers {
        let lowered = header.to_lowercase();
        if !is_test_header(&lowered) {
            continue;
        }

        let column = TestColumn {
            header: header.clone(),
            name: header.clone(),
        };
        match categorize(&lowered) {
            Category::Lecture => catalog.lectures.push(column),
            Category::Lab => catalog.labs.push(column),
            Category::Final => catalog.finals.push(column),
        }
    }

    catalog.lectures.sort_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
    catalog.labs.sort_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
    catalog.finals.sort_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
    catalog
}

fn is_test_header(lowered: &str) -> bool {
    contains_any(lowered, &TEST_KEYWORDS)
        || contains_any(lowered, &FINAL_KEYWORDS)
        || contains_any(lowered, &LECTURE_KEYWORDS)
        || contains_any(lowered, &LAB_KEYWORDS)
}

/// First match wins: a final keyword beats a lecture keyword in the same
/// header, and anything test-like without either lands in the lab bucket.
fn categorize(lowered: &str) -> Category {
    if contains_any(lowered, &FINAL_KEYWORDS) {
        Category::Final
    } else if contains_any(lowered, &LECTURE_KEYWORDS) {
        Category::Lecture
    } else {
        Category::Lab
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
