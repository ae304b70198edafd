use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, trace};

use crate::patterns::{date_line_skip, date_shapes, DATE_FORMATS};
use crate::types::{Candidate, RawLine};

/// Lines before this position get `HEADER_BONUS`; receipts print the date near the top.
const HEADER_LINES: usize = 10;
const HEADER_BONUS: i32 = 5;
const MIN_YEAR: i32 = 2000;

/// Finds the transaction date.
pub struct DateExtractor;

impl DateExtractor {
    /// Extract relative to the local calendar day.
    pub fn extract(lines: &[RawLine]) -> Option<NaiveDate> {
        Self::extract_at(lines, Local::now().date_naive())
    }

    pub fn extract_at(lines: &[RawLine], today: NaiveDate) -> Option<NaiveDate> {
        let best = Self::candidates(lines, today).into_iter().next()?;
        debug!(date = %best.value, confidence = best.confidence, line = best.line, "date selected");
        Some(best.value)
    }

    /// Every (match, format) pair that parses to an acceptable date, best first.
    ///
    /// Confidence is the format's distance from the end of [`DATE_FORMATS`]
    /// plus a bonus for header lines. Ties go to the more recent date.
    pub fn candidates(lines: &[RawLine], today: NaiveDate) -> Vec<Candidate<NaiveDate>> {
        let mut found = Vec::new();

        for (pos, line) in lines.iter().enumerate() {
            if date_line_skip().is_match(&line.text) {
                continue;
            }
            let bonus = if pos < HEADER_LINES { HEADER_BONUS } else { 0 };

            for shape in date_shapes().iter() {
                for m in shape.regex.find_iter(&line.text) {
                    let text = normalize(m.as_str());
                    for (priority, format) in DATE_FORMATS.iter().enumerate() {
                        let Ok(date) = NaiveDate::parse_from_str(&text, format) else {
                            continue;
                        };
                        if !plausible(date, today) {
                            trace!(%date, shape = shape.name, format, "date outside accepted range");
                            continue;
                        }
                        let confidence = (DATE_FORMATS.len() - priority) as i32 + bonus;
                        found.push(Candidate::new(date, confidence, line));
                    }
                }
            }
        }

        found.sort_by(|a, b| {
            b.confidence
                .cmp(&a.confidence)
                .then_with(|| b.value.cmp(&a.value))
        });
        found
    }
}

/// Year in `[2000, today.year + 1]` and not after `today`.
fn plausible(date: NaiveDate, today: NaiveDate) -> bool {
    (MIN_YEAR..=today.year() + 1).contains(&date.year()) && date <= today
}

/// Month-name matches lose punctuation and keep a three-letter month so they
/// fit the `%b` formats. Numeric matches pass through unchanged.
fn normalize(matched: &str) -> String {
    if !matched.chars().any(char::is_alphabetic) {
        return matched.to_string();
    }
    matched
        .split_whitespace()
        .map(|token| {
            let token = token.trim_matches(|c: char| c == ',' || c == '.');
            if token.chars().any(char::is_alphabetic) {
                token.chars().take(3).collect()
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
