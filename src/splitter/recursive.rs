use crate::document::Document;

use super::separator::{KeepSeparator, Separator};
use super::SplitError;

/// Default maximum chunk size, in length-function units
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Default separator hierarchy: paragraph and line breaks first, then
/// sentence punctuation (ASCII and CJK), then whitespace, then the
/// terminal split-anywhere fallback
pub const DEFAULT_SEPARATORS: &[&str] = &[
    "\n\n", "\n", "。", ".", "！", ";", "；", "?", "？", ",", "，", "、", " ", "",
];

/// Pluggable length measurement; the default counts Unicode code points
pub type LengthFn = fn(&str) -> usize;

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Generic recursive splitter over a priority-ordered separator list
///
/// Splits on the first separator that occurs in the text, merges
/// undersized pieces up to the size bound, and recurses into oversized
/// pieces with the remaining separators. The terminal empty separator
/// guarantees termination via character-level splitting.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    separators: Vec<Separator>,
    keep_separator: KeepSeparator,
    length_fn: LengthFn,
    overlap: usize,
}

impl RecursiveSplitter {
    /// Create a splitter with the default separator hierarchy
    ///
    /// Fails with `NonPositiveBound` when `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Result<Self, SplitError> {
        if chunk_size == 0 {
            return Err(SplitError::NonPositiveBound);
        }
        Ok(Self {
            chunk_size,
            separators: default_separators(),
            keep_separator: KeepSeparator::default(),
            length_fn: char_len,
            overlap: 0,
        })
    }

    /// Replace the separator hierarchy (most structural first, empty
    /// string last as the terminal fallback)
    pub fn with_separators(mut self, separators: Vec<Separator>) -> Self {
        self.separators = separators;
        self
    }

    /// Set the boundary-retention mode
    pub fn with_keep_separator(mut self, keep: KeepSeparator) -> Self {
        self.keep_separator = keep;
        self
    }

    /// Replace the length measurement function
    pub fn with_length_fn(mut self, length_fn: LengthFn) -> Self {
        self.length_fn = length_fn;
        self
    }

    /// Set the overlap size shared between adjacent chunks
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Split `text` into bounded chunks without metadata
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    /// Split `text` and wrap each non-blank chunk in a `Document`
    /// carrying the title, applying overlap expansion when configured
    pub fn chunk(&self, text: &str, title: &str) -> Vec<Document> {
        let mut chunks: Vec<String> = self
            .split_text(text)
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect();

        if self.overlap > 0 && chunks.len() > 1 {
            chunks = self.apply_overlap(chunks);
        }

        chunks
            .into_iter()
            .map(|c| Document::with_title(c, title))
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[Separator]) -> Vec<String> {
        if separators.is_empty() {
            return vec![text.to_string()];
        }

        // Pick the first separator that is terminal or actually occurs;
        // everything after it becomes the list for recursive calls
        let mut chosen = separators.len() - 1;
        let mut rest: &[Separator] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_terminal() {
                chosen = i;
                break;
            }
            if sep.occurs_in(text) {
                chosen = i;
                rest = &separators[i + 1..];
                break;
            }
        }
        let separator = &separators[chosen];

        let splits = separator.split(text, self.keep_separator);
        // Retained separators already carry the boundary text, so merged
        // pieces join with nothing extra
        let join = if self.keep_separator == KeepSeparator::None {
            separator.merge_text()
        } else {
            ""
        };

        let mut final_chunks = Vec::new();
        let mut good: Vec<String> = Vec::new();
        for piece in splits {
            if (self.length_fn)(&piece) < self.chunk_size {
                good.push(piece);
                continue;
            }
            if !good.is_empty() {
                self.merge_splits(&mut final_chunks, &good, join);
                good.clear();
            }
            if rest.is_empty() {
                // No separators left; emit the oversized piece as-is
                final_chunks.push(piece);
            } else {
                final_chunks.extend(self.split_recursive(&piece, rest));
            }
        }
        if !good.is_empty() {
            self.merge_splits(&mut final_chunks, &good, join);
        }
        final_chunks
    }

    /// First-fit greedy bin-fill: concatenate pieces while the running
    /// length stays strictly below the size bound
    fn merge_splits(&self, out: &mut Vec<String>, pieces: &[String], join: &str) {
        let mut current = String::new();
        for piece in pieces {
            if current.is_empty() {
                current = piece.clone();
                continue;
            }
            let mut candidate = String::with_capacity(current.len() + join.len() + piece.len());
            candidate.push_str(&current);
            candidate.push_str(join);
            candidate.push_str(piece);
            if (self.length_fn)(&candidate) < self.chunk_size {
                current = candidate;
            } else {
                out.push(std::mem::take(&mut current));
                current = piece.clone();
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
    }

    fn apply_overlap(&self, chunks: Vec<String>) -> Vec<String> {
        let mut out = Vec::with_capacity(chunks.len());
        for i in 0..chunks.len() {
            let mut expanded = String::new();
            if i > 0 {
                expanded.push_str(&self.overlap_prefix(&chunks[i - 1]));
            }
            expanded.push_str(&chunks[i]);
            if i + 1 < chunks.len() {
                expanded.push_str(&self.overlap_suffix(&chunks[i + 1]));
            }
            out.push(expanded);
        }
        out
    }

    /// Trailing slice of the previous chunk, cut at the last separator
    /// occurrence inside the candidate region when one exists
    fn overlap_prefix(&self, prev: &str) -> String {
        let mut region = suffix_chars(prev, self.overlap).to_string();
        for sep in &self.separators {
            if sep.is_terminal() {
                continue;
            }
            if let Some((_, end)) = sep.find_last(&region) {
                region = region[end..].to_string();
                break;
            }
        }
        region
    }

    /// Leading slice of the next chunk, cut before the first separator
    /// occurrence inside the candidate region when one exists
    fn overlap_suffix(&self, next: &str) -> String {
        let mut region = prefix_chars(next, self.overlap).to_string();
        for sep in &self.separators {
            if sep.is_terminal() {
                continue;
            }
            if let Some((start, _)) = sep.find_first(&region) {
                region.truncate(start);
                break;
            }
        }
        region
    }
}

fn default_separators() -> Vec<Separator> {
    DEFAULT_SEPARATORS
        .iter()
        .map(|s| Separator::Literal((*s).to_string()))
        .collect()
}

/// Last `n` code points of `s`
fn suffix_chars(s: &str, n: usize) -> &str {
    let total = s.chars().count();
    if total <= n {
        return s;
    }
    let start = s
        .char_indices()
        .nth(total - n)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &s[start..]
}

/// First `n` code points of `s`
fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
