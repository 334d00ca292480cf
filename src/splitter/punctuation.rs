use crate::document::Document;

use super::SplitError;

/// Default sentence-ending punctuation (ASCII and CJK)
pub const DEFAULT_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', '。', '，'];

/// Scans for sentence-ending punctuation inside a `[min, max]` window
///
/// Independent of the recursive splitter: each cut is placed immediately
/// after a punctuation character, and the next chunk starts `overlap`
/// characters before the cut. All sizes are measured in code points.
#[derive(Debug, Clone)]
pub struct PunctuationSplitter {
    punctuation: Vec<char>,
    min_size: usize,
    max_size: usize,
    overlap: usize,
}

impl PunctuationSplitter {
    /// Create a splitter with the default punctuation set
    ///
    /// Bounds are validated here: both sizes must be positive, `min_size`
    /// must not exceed `max_size`, and `overlap` must stay below
    /// `max_size`.
    pub fn new(min_size: usize, max_size: usize, overlap: usize) -> Result<Self, SplitError> {
        if min_size == 0 || max_size == 0 {
            return Err(SplitError::NonPositiveBound);
        }
        if min_size > max_size {
            return Err(SplitError::MinExceedsMax {
                min: min_size,
                max: max_size,
            });
        }
        if overlap >= max_size {
            return Err(SplitError::OverlapTooLarge {
                overlap,
                max: max_size,
            });
        }
        Ok(Self {
            punctuation: DEFAULT_PUNCTUATION.to_vec(),
            min_size,
            max_size,
            overlap,
        })
    }

    /// Replace the punctuation set
    pub fn with_punctuation(mut self, punctuation: Vec<char>) -> Self {
        self.punctuation = punctuation;
        self
    }

    /// Split `text` into punctuation-bounded chunks
    ///
    /// When no punctuation occurs inside the window, the scan continues
    /// without an upper bound until punctuation or end-of-text, so a
    /// chunk may exceed `max_size`. That is intentional policy: a
    /// sentence is never truncated mid-way. A final chunk shorter than
    /// `min_size` is merged into the previous chunk.
    pub fn chunk(&self, text: &str, title: &str) -> Vec<Document> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() < self.min_size {
            return vec![Document::with_title(text, title)];
        }

        let mut chunks: Vec<String> = Vec::new();
        let len = chars.len();
        let mut start = 0;
        while start < len {
            let end = self.find_cut(&chars, start).unwrap_or(len);
            chunks.push(chars[start..end].iter().collect());
            if end == len {
                break;
            }
            // Overlap may not cancel forward progress
            let next = end.saturating_sub(self.overlap);
            start = if next > start { next } else { end };
        }

        if chunks.len() > 1
            && chunks
                .last()
                .map_or(false, |c| c.chars().count() < self.min_size)
        {
            if let Some(last) = chunks.pop() {
                if let Some(prev) = chunks.last_mut() {
                    prev.push_str(&last);
                }
            }
        }

        chunks
            .into_iter()
            .map(|c| Document::with_title(c, title))
            .collect()
    }

    /// Position one past the first punctuation character at or after
    /// `start + min_size`, bounded by `start + max_size` first and then
    /// unbounded; `None` when the rest of the text has no punctuation
    fn find_cut(&self, chars: &[char], start: usize) -> Option<usize> {
        let min_end = start + self.min_size;
        let max_end = (start + self.max_size).min(chars.len());
        for i in min_end..max_end {
            if self.punctuation.contains(&chars[i]) {
                return Some(i + 1);
            }
        }
        for i in max_end..chars.len() {
            if self.punctuation.contains(&chars[i]) {
                return Some(i + 1);
            }
        }
        None
    }
}
