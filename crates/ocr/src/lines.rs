use crate::types::RawLine;

/// Split recognized text into trimmed, non-empty lines, numbered after filtering.
pub fn preprocess(text: &str) -> Vec<RawLine> {
    from_observations(std::iter::once(text))
}

/// Build the line sequence from OCR observations that arrive already split.
/// An observation containing line breaks contributes one line per break.
pub fn from_observations<I, S>(observations: I) -> Vec<RawLine>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = Vec::new();
    for observation in observations {
        for piece in observation.as_ref().split(['\n', '\r']) {
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                lines.push(RawLine::new(lines.len(), trimmed));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[RawLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn trims_and_drops_blank_lines() {
        let lines = preprocess("  WALMART  \n\n   \n05/02/24\r\nTOTAL 20.00\n");
        assert_eq!(texts(&lines), vec!["WALMART", "05/02/24", "TOTAL 20.00"]);
    }

    #[test]
    fn indices_follow_filtered_order() {
        let lines = preprocess("A\n\n\nB\n\nC");
        let idx: Vec<usize> = lines.iter().map(|l| l.index).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn all_blank_input_is_empty() {
        assert!(preprocess("").is_empty());
        assert!(preprocess(" \n\t\n  \r\n").is_empty());
    }

    #[test]
    fn observations_are_split_and_numbered_continuously() {
        let lines = from_observations(vec!["STARBUCKS", "  ", "Total\n$5.50"]);
        assert_eq!(texts(&lines), vec!["STARBUCKS", "Total", "$5.50"]);
        assert_eq!(lines[2].index, 2);
    }
}
