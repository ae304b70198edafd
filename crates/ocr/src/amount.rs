use expensa_core::Money;
use tracing::{debug, trace};

use crate::patterns::{
    amount_skip, re_amount, re_standalone_total, re_well_formed_amount, total_keywords,
    PatternRole,
};
use crate::types::{Candidate, RawLine};

// Ranges are in cents.
const KEYWORD_SANITY: (i64, i64) = (1, 1_000_000);
const PLAUSIBLE: (i64, i64) = (100, 50_000);
const TOLERABLE: (i64, i64) = (50, 100_000);
const PENALTY_BELOW: i64 = 10;
const PENALTY_ABOVE: i64 = 150_000;
const FALLBACK_SCAN: (i64, i64) = (1, 200_000);
const FALLBACK_PICK: (i64, i64) = (100, 100_000);

const PLAUSIBLE_BONUS: i32 = 30;
const TOLERABLE_BONUS: i32 = 15;
const IMPLAUSIBLE_PENALTY: i32 = 50;
const FORMAT_BONUS: i32 = 5;
const NEXT_LINE_BONUS: i32 = 20;
const PREV_LINE_BONUS: i32 = 15;

/// Finds the transaction total.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn extract(lines: &[RawLine]) -> Option<Money> {
        Self::candidates(lines).into_iter().next().map(|c| c.value)
    }

    /// Ranked total candidates, best first.
    ///
    /// Keyword-line candidates are returned when any exist. Otherwise every
    /// plausible standalone amount is returned with confidence 0, largest first.
    pub fn candidates(lines: &[RawLine]) -> Vec<Candidate<Money>> {
        let keyword = keyword_candidates(lines);
        if let Some(best) = keyword.first() {
            debug!(amount = %best.value, confidence = best.confidence, line = best.line, "total from keyword line");
            return keyword;
        }
        let fallback = fallback_candidates(lines);
        if let Some(best) = fallback.first() {
            debug!(amount = %best.value, line = best.line, "total from largest standalone amount");
        }
        fallback
    }
}

fn keyword_candidates(lines: &[RawLine]) -> Vec<Candidate<Money>> {
    let mut found = Vec::new();

    for (pos, line) in lines.iter().enumerate() {
        let Some(weight) = keyword_weight(&line.text) else {
            continue;
        };
        if let Some(rule) = amount_skip().first_match(&line.text) {
            trace!(line = %line.text, rule = rule.name, "skipping total-like line");
            continue;
        }

        if re_standalone_total().is_match(&line.text) {
            // The amount was split onto a neighbouring line.
            let neighbours = [
                (pos.checked_add(1), NEXT_LINE_BONUS),
                (pos.checked_sub(1), PREV_LINE_BONUS),
            ];
            for (at, bonus) in neighbours {
                let Some(adjacent) = at.and_then(|i| lines.get(i)) else {
                    continue;
                };
                if amount_skip().is_match(&adjacent.text) {
                    continue;
                }
                if let Some((raw, amount)) = last_amount(&adjacent.text) {
                    push_scored(&mut found, adjacent, raw, amount, weight + bonus);
                }
            }
        } else if let Some((raw, amount)) = last_amount(&line.text) {
            push_scored(&mut found, line, raw, amount, weight);
        }
    }

    // Stable: equal scores keep discovery order.
    found.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    found
}

fn fallback_candidates(lines: &[RawLine]) -> Vec<Candidate<Money>> {
    let mut found: Vec<Candidate<Money>> = lines
        .iter()
        .filter(|l| !amount_skip().is_match(&l.text))
        .flat_map(|l| {
            amounts(&l.text)
                .filter(|(_, a)| in_range(*a, FALLBACK_SCAN))
                .filter(|(_, a)| in_range(*a, FALLBACK_PICK))
                .map(move |(_, a)| Candidate::new(a, 0, l))
                .collect::<Vec<_>>()
        })
        .collect();
    found.sort_by(|a, b| b.value.cmp(&a.value));
    found
}

fn push_scored(
    found: &mut Vec<Candidate<Money>>,
    line: &RawLine,
    raw: &str,
    amount: Money,
    base: i32,
) {
    if !in_range(amount, KEYWORD_SANITY) {
        trace!(amount = %amount, line = %line.text, "total outside sanity range");
        return;
    }
    found.push(Candidate::new(amount, score(raw, amount, base), line));
}

/// Base plus range and formatting signals. Each signal only ever adds,
/// except the implausibility penalty.
fn score(raw: &str, amount: Money, base: i32) -> i32 {
    let mut score = base;
    if in_range(amount, PLAUSIBLE) {
        score += PLAUSIBLE_BONUS;
    } else if in_range(amount, TOLERABLE) {
        score += TOLERABLE_BONUS;
    }
    if amount < Money::from_cents(PENALTY_BELOW) || amount > Money::from_cents(PENALTY_ABOVE) {
        score -= IMPLAUSIBLE_PENALTY;
    }
    if re_well_formed_amount().is_match(raw) {
        score += FORMAT_BONUS;
    }
    score
}

/// Strongest total keyword on the line, if any.
fn keyword_weight(text: &str) -> Option<i32> {
    total_keywords()
        .iter()
        .filter(|r| r.regex.is_match(text))
        .filter_map(|r| match r.role {
            PatternRole::TotalKeyword { weight } => Some(weight),
            _ => None,
        })
        .max()
}

fn amounts<'a>(text: &'a str) -> impl Iterator<Item = (&'a str, Money)> + 'a {
    re_amount().captures_iter(text).filter_map(|c| {
        let raw = c.get(1)?.as_str();
        Some((raw, Money::parse(raw)?))
    })
}

/// Totals are printed after their label, so the rightmost amount wins.
fn last_amount(text: &str) -> Option<(&str, Money)> {
    amounts(text).last()
}

fn in_range(amount: Money, (lo, hi): (i64, i64)) -> bool {
    amount.within(Money::from_cents(lo), Money::from_cents(hi))
}
