use crate::model::{Grade, NOT_AVAILABLE_MARKER};

/// Cell tokens treated as an explicit "no grade" marker, compared after
/// trimming and lowercasing.
const NO_GRADE_TOKENS: [&str; 2] = ["-", NOT_AVAILABLE_MARKER];

/// Converts a raw result cell from the ten-point scale to [`Grade`].
///
/// Empty cells, the no-grade tokens, and anything that fails to parse as a
/// number degrade to [`Grade::NotAvailable`]; a single bad cell must never
/// abort a whole batch. Decimal commas are accepted alongside decimal points.
pub fn convert(raw: &str) -> Grade {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Grade::NotAvailable;
    }

    let lowered = trimmed.to_lowercase();
    if NO_GRADE_TOKENS.contains(&lowered.as_str()) {
        return Grade::NotAvailable;
    }

    match lowered.replace(',', ".").parse::<f64>() {
        Ok(score) => Grade::Converted(scale(score)),
        Err(_) => Grade::NotAvailable,
    }
}

/// Bucket thresholds with inclusive lower bounds, highest bucket first.
/// Out-of-range scores fall through the same inequalities, so anything above
/// ten still maps to 5 and anything below three (negatives included) to 1.
fn scale(score: f64) -> u8 {
    if score >= 9.0 {
        5
    } else if score >= 7.0 {
        4
    } else if score >= 5.0 {
        3
    } else if score >= 3.0 {
        2
    } else {
        1
    }
}
