use serde::Deserialize;

use crate::document::Document;

use super::recursive::RecursiveSplitter;
use super::separator::Separator;
use super::SplitError;

/// Languages with dedicated separator hierarchies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Rust,
}

impl Language {
    /// Separator hierarchy biased toward the language's structure
    /// markers: definition boundaries first, then blank lines, then
    /// generic whitespace, then the terminal fallback
    pub fn separators(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["\nclass ", "\ndef ", "\n\tdef ", "\n\n", "\n", " ", ""],
            Language::Rust => &[
                "\nfn ", "\nstruct ", "\nenum ", "\nimpl ", "\ntrait ", "\nmod ", "\n\n", "\n",
                " ", "",
            ],
        }
    }

    /// Map a file extension to its language table
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Language::Python),
            "rs" => Some(Language::Rust),
            _ => None,
        }
    }
}

/// Code-structure-aware splitter
///
/// A thin configuration of the recursive splitter; its correctness rests
/// on separator ordering, not new algorithm.
#[derive(Debug, Clone)]
pub struct CodeSplitter {
    inner: RecursiveSplitter,
}

impl CodeSplitter {
    pub fn new(language: Language, chunk_size: usize) -> Result<Self, SplitError> {
        let separators = Separator::compile(language.separators(), false)?;
        let inner = RecursiveSplitter::new(chunk_size)?.with_separators(separators);
        Ok(Self { inner })
    }

    /// Split source code into bounded chunks with title-only metadata
    pub fn chunk(&self, text: &str, title: &str) -> Vec<Document> {
        self.inner.chunk(text, title)
    }
}
