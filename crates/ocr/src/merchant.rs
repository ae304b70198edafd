use tracing::{debug, trace};

use crate::patterns::{merchant_indicators, merchant_skip};
use crate::types::{Candidate, RawLine};

const INDICATOR_BONUS: i32 = 100;
const TOP_LINES: (usize, i32) = (5, 20);
const UPPER_LINES: (usize, i32) = (10, 10);
const ALL_CAPS_BONUS: i32 = 15;
const NAME_LENGTH: (usize, usize) = (3, 30);
const NAME_LENGTH_BONUS: i32 = 10;
const HAS_LETTER_BONUS: i32 = 5;
const DIGIT_HEAVY_PENALTY: i32 = 20;

/// Finds the business name.
pub struct MerchantExtractor;

impl MerchantExtractor {
    pub fn extract(lines: &[RawLine]) -> Option<String> {
        let best = Self::candidates(lines).into_iter().next()?;
        debug!(merchant = %best.value, confidence = best.confidence, line = best.line, "merchant selected");
        Some(best.value)
    }

    /// Positive-scoring lines, best first; equal scores keep the earlier line.
    pub fn candidates(lines: &[RawLine]) -> Vec<Candidate<String>> {
        let mut found: Vec<Candidate<String>> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !excluded(&line.text))
            .map(|(pos, line)| Candidate::new(line.text.clone(), score(pos, &line.text), line))
            .filter(|c| c.confidence > 0)
            .collect();
        found.sort_by(|a, b| b.confidence.cmp(&a.confidence).then(a.line.cmp(&b.line)));
        found
    }
}

fn excluded(text: &str) -> bool {
    if text.chars().count() <= 2 || !text.chars().any(char::is_alphabetic) {
        return true;
    }
    match merchant_skip().first_match(text) {
        Some(rule) => {
            trace!(line = text, rule = rule.name, "not a merchant line");
            true
        }
        None => false,
    }
}

fn score(pos: usize, text: &str) -> i32 {
    let len = text.chars().count();
    let mut score = 0;

    if merchant_indicators().is_match(text) {
        score += INDICATOR_BONUS;
    }
    if pos < TOP_LINES.0 {
        score += TOP_LINES.1;
    } else if pos < UPPER_LINES.0 {
        score += UPPER_LINES.1;
    }
    if len > 2 && is_all_caps(text) {
        score += ALL_CAPS_BONUS;
    }
    if (NAME_LENGTH.0..=NAME_LENGTH.1).contains(&len) {
        score += NAME_LENGTH_BONUS;
    }
    if text.chars().any(char::is_alphabetic) {
        score += HAS_LETTER_BONUS;
    }
    let digits = text.chars().filter(char::is_ascii_digit).count();
    if digits * 2 > len {
        score -= DIGIT_HEAVY_PENALTY;
    }
    score
}

fn is_all_caps(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::preprocess;

    fn extract(text: &str) -> Option<String> {
        MerchantExtractor::extract(&preprocess(text))
    }

    #[test]
    fn known_chain_on_first_line() {
        assert_eq!(extract("WALMART\n123 Main St\n05/02/24\nTOTAL 20.00").as_deref(), Some("WALMART"));
    }

    #[test]
    fn known_chain_outscores_generic_lowercase_line() {
        assert!(score(2, "WALMART") > score(2, "hello there"));
        assert_eq!(extract("hello there\nWALMART").as_deref(), Some("WALMART"));
    }

    #[test]
    fn all_caps_preferred_over_mixed_case() {
        assert_eq!(extract("Welcome friend\nSome Place\nBLUE DOOR").as_deref(), Some("BLUE DOOR"));
    }

    #[test]
    fn earlier_line_wins_ties() {
        assert_eq!(extract("NORTH SIDE\nSOUTH SIDE").as_deref(), Some("NORTH SIDE"));
    }

    #[test]
    fn skip_patterns_never_selected() {
        let text = "(555) 123-4567\nTHANK YOU FOR SHOPPING\n42 Elm Street\nwww.example.com\nRECEIPT\nTel 555 1234";
        assert_eq!(extract(text), None);
    }

    #[test]
    fn address_and_amount_lines_skipped() {
        let text = "123 MAIN ST\nMILK $3.49\nCORNER BAKERY\nSUBTOTAL";
        assert_eq!(extract(text).as_deref(), Some("CORNER BAKERY"));
    }

    #[test]
    fn written_dates_are_not_merchants() {
        assert_eq!(extract("March 15, 2024\nblue door").as_deref(), Some("blue door"));
        assert_eq!(extract("SEPTEMBER 3, 2025\nBlue Door").as_deref(), Some("Blue Door"));
        assert_eq!(merchant_skip().first_match("SEPTEMBER 3, 2025").unwrap().name, "written_date");
    }

    #[test]
    fn place_names_starting_like_a_month_are_kept() {
        assert_eq!(extract("DECATUR DINER\nTOTAL 5.00").as_deref(), Some("DECATUR DINER"));
    }

    #[test]
    fn short_and_letterless_lines_skipped() {
        assert_eq!(extract("AB\n***\n---").as_deref(), None);
    }

    #[test]
    fn position_bonus_decays() {
        assert_eq!(score(0, "Blue Door") - score(7, "Blue Door"), TOP_LINES.1 - UPPER_LINES.1);
        assert_eq!(score(7, "Blue Door") - score(12, "Blue Door"), UPPER_LINES.1);
    }

    #[test]
    fn digit_heavy_lines_penalized() {
        assert_eq!(score(12, "A1234567"), NAME_LENGTH_BONUS + HAS_LETTER_BONUS + ALL_CAPS_BONUS - DIGIT_HEAVY_PENALTY);
    }

    #[test]
    fn all_caps_requires_letters() {
        assert!(is_all_caps("CAFÉ 24"));
        assert!(!is_all_caps("Café"));
        assert!(!is_all_caps("1234"));
    }

    #[test]
    fn empty_input() {
        assert!(MerchantExtractor::candidates(&[]).is_empty());
    }
}
