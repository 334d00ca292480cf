use regex::Regex;
use serde::Deserialize;

use super::SplitError;

/// Whether/where a separator's literal text is reattached after splitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepSeparator {
    /// Drop the separator text entirely
    None,
    /// Glue the separator to the start of the following piece
    Start,
    /// Glue the separator to the end of the preceding piece
    #[default]
    End,
}

/// A split marker, resolved once at configuration time
#[derive(Debug, Clone)]
pub enum Separator {
    /// Exact text match
    Literal(String),
    /// Compiled regular expression
    Pattern(Regex),
}

impl Separator {
    /// Compile a separator list
    ///
    /// Non-empty entries become patterns when `is_pattern` is set; the
    /// empty string always stays a literal (it is the terminal fallback).
    pub fn compile<S: AsRef<str>>(raw: &[S], is_pattern: bool) -> Result<Vec<Separator>, SplitError> {
        raw.iter()
            .map(|s| {
                let s = s.as_ref();
                if is_pattern && !s.is_empty() {
                    Ok(Separator::Pattern(Regex::new(s)?))
                } else {
                    Ok(Separator::Literal(s.to_string()))
                }
            })
            .collect()
    }

    /// The empty literal is the terminal "split anywhere" fallback
    pub fn is_terminal(&self) -> bool {
        matches!(self, Separator::Literal(s) if s.is_empty())
    }

    /// Whether this separator occurs in `text`
    pub fn occurs_in(&self, text: &str) -> bool {
        match self {
            Separator::Literal(s) => !s.is_empty() && text.contains(s.as_str()),
            Separator::Pattern(re) => re.is_match(text),
        }
    }

    /// Literal text reinserted between merged pieces; patterns have none
    pub fn merge_text(&self) -> &str {
        match self {
            Separator::Literal(s) => s,
            Separator::Pattern(_) => "",
        }
    }

    /// First occurrence in `text` as a byte range
    pub fn find_first(&self, text: &str) -> Option<(usize, usize)> {
        match self {
            Separator::Literal(s) => {
                if s.is_empty() {
                    return None;
                }
                text.find(s.as_str()).map(|i| (i, i + s.len()))
            }
            Separator::Pattern(re) => re
                .find_iter(text)
                .find(|m| !m.is_empty())
                .map(|m| (m.start(), m.end())),
        }
    }

    /// Last occurrence in `text` as a byte range
    pub fn find_last(&self, text: &str) -> Option<(usize, usize)> {
        match self {
            Separator::Literal(s) => {
                if s.is_empty() {
                    return None;
                }
                text.rfind(s.as_str()).map(|i| (i, i + s.len()))
            }
            Separator::Pattern(re) => re
                .find_iter(text)
                .filter(|m| !m.is_empty())
                .last()
                .map(|m| (m.start(), m.end())),
        }
    }

    /// Byte ranges of every occurrence; zero-length matches are skipped so
    /// a degenerate pattern cannot stall the scan
    fn match_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        match self {
            Separator::Literal(s) => {
                if s.is_empty() {
                    return Vec::new();
                }
                text.match_indices(s.as_str())
                    .map(|(i, m)| (i, i + m.len()))
                    .collect()
            }
            Separator::Pattern(re) => re
                .find_iter(text)
                .filter(|m| !m.is_empty())
                .map(|m| (m.start(), m.end()))
                .collect(),
        }
    }

    /// Split `text` on this separator, reattaching the separator text
    /// according to `keep` (never to both sides)
    ///
    /// The terminal empty literal degrades to character-by-character
    /// splitting. Empty pieces are dropped.
    pub fn split(&self, text: &str, keep: KeepSeparator) -> Vec<String> {
        if self.is_terminal() {
            return text.chars().map(String::from).collect();
        }

        let ranges = self.match_ranges(text);
        if ranges.is_empty() {
            return vec![text.to_string()];
        }

        let mut pieces = Vec::with_capacity(ranges.len() + 1);
        match keep {
            KeepSeparator::None => {
                let mut prev = 0;
                for &(start, end) in &ranges {
                    pieces.push(text[prev..start].to_string());
                    prev = end;
                }
                pieces.push(text[prev..].to_string());
            }
            KeepSeparator::Start => {
                // Piece boundaries sit at each match start
                let mut prev = 0;
                for &(start, _) in &ranges {
                    pieces.push(text[prev..start].to_string());
                    prev = start;
                }
                pieces.push(text[prev..].to_string());
            }
            KeepSeparator::End => {
                // Piece boundaries sit right after each match end
                let mut prev = 0;
                for &(_, end) in &ranges {
                    pieces.push(text[prev..end].to_string());
                    prev = end;
                }
                pieces.push(text[prev..].to_string());
            }
        }

        pieces.retain(|p| !p.is_empty());
        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(s: &str) -> Separator {
        Separator::Literal(s.to_string())
    }

    #[test]
    fn test_split_drops_separator() {
        let pieces = literal(",").split("a,b,c", KeepSeparator::None);
        assert_eq!(pieces, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_keeps_separator_at_start_of_next_piece() {
        let pieces = literal(",").split("a,b,c", KeepSeparator::Start);
        assert_eq!(pieces, vec!["a", ",b", ",c"]);
    }

    #[test]
    fn test_split_keeps_separator_at_end_of_current_piece() {
        let pieces = literal(",").split("a,b,c", KeepSeparator::End);
        assert_eq!(pieces, vec!["a,", "b,", "c"]);
    }

    #[test]
    fn test_retention_loses_no_text() {
        for keep in [KeepSeparator::Start, KeepSeparator::End] {
            let pieces = literal("\n\n").split("one\n\ntwo\n\nthree", keep);
            assert_eq!(pieces.concat(), "one\n\ntwo\n\nthree");
        }
    }

    #[test]
    fn test_terminal_separator_splits_into_characters() {
        let pieces = literal("").split("héllo", KeepSeparator::End);
        assert_eq!(pieces, vec!["h", "é", "l", "l", "o"]);
    }

    #[test]
    fn test_no_occurrence_returns_whole_text() {
        let pieces = literal("|").split("abc", KeepSeparator::None);
        assert_eq!(pieces, vec!["abc"]);
    }

    #[test]
    fn test_leading_separator_produces_no_empty_piece() {
        let pieces = literal(",").split(",a,b", KeepSeparator::Start);
        assert_eq!(pieces, vec![",a", ",b"]);
    }

    #[test]
    fn test_pattern_separator_splits_on_matches() {
        let seps = Separator::compile(&[r"\d+"], true).unwrap();
        let pieces = seps[0].split("aa12bb345cc", KeepSeparator::None);
        assert_eq!(pieces, vec!["aa", "bb", "cc"]);
    }

    #[test]
    fn test_pattern_compile_failure_is_reported() {
        let err = Separator::compile(&["["], true).unwrap_err();
        assert!(matches!(err, SplitError::InvalidPattern(_)));
    }

    #[test]
    fn test_compile_keeps_empty_string_literal_under_pattern_mode() {
        let seps = Separator::compile(&[r"\s+", ""], true).unwrap();
        assert!(matches!(seps[0], Separator::Pattern(_)));
        assert!(seps[1].is_terminal());
    }
}
