mod error;
mod html;
mod language;
mod markdown;
mod punctuation;
mod recursive;
mod separator;

#[cfg(test)]
mod tests;

pub use error::SplitError;
pub use html::{default_heading_tags, HtmlSplitter};
pub use language::{CodeSplitter, Language};
pub use markdown::{default_heading_markers, LineRecord, MarkdownSplitter, DEFAULT_CHUNK_LIMIT};
pub use punctuation::{PunctuationSplitter, DEFAULT_PUNCTUATION};
pub use recursive::{LengthFn, RecursiveSplitter, DEFAULT_CHUNK_SIZE, DEFAULT_SEPARATORS};
pub use separator::{KeepSeparator, Separator};

use serde::Deserialize;

use crate::document::Document;

/// Strategy selector keyed the way callers name strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Recursive,
    Punctuation,
    Code,
    Markdown,
    Html,
}

impl StrategyKind {
    /// Resolve a strategy name supplied by a caller
    pub fn from_name(name: &str) -> Result<Self, SplitError> {
        match name {
            "recursive" => Ok(StrategyKind::Recursive),
            "punctuation" => Ok(StrategyKind::Punctuation),
            "code" => Ok(StrategyKind::Code),
            "markdown" => Ok(StrategyKind::Markdown),
            "html" => Ok(StrategyKind::Html),
            other => Err(SplitError::UnknownStrategy(other.to_string())),
        }
    }

    /// Default strategy for a file path, keyed on its extension
    pub fn for_path(path: &str) -> Self {
        let ext = std::path::Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "md" | "markdown" => StrategyKind::Markdown,
            "html" | "htm" => StrategyKind::Html,
            "py" | "rs" => StrategyKind::Code,
            _ => StrategyKind::Recursive,
        }
    }
}

/// A configured chunking strategy with one polymorphic entry point
///
/// Configuration errors surface when a strategy is built; `split` itself
/// cannot fail.
#[derive(Debug)]
pub enum Strategy {
    Recursive(RecursiveSplitter),
    Punctuation(PunctuationSplitter),
    Code(CodeSplitter),
    Markdown(MarkdownSplitter),
    Html(HtmlSplitter),
}

impl Strategy {
    /// Split raw text into an ordered sequence of Documents
    pub fn split(&self, text: &str, title: &str) -> Vec<Document> {
        match self {
            Strategy::Recursive(s) => s.chunk(text, title),
            Strategy::Punctuation(s) => s.chunk(text, title),
            Strategy::Code(s) => s.chunk(text, title),
            Strategy::Markdown(s) => s.chunk(text, title),
            Strategy::Html(s) => s.chunk(text, title),
        }
    }
}

/// Declarative strategy configuration, resolved into a `Strategy` at
/// configuration-parse time (bound validation and pattern compilation
/// happen in `resolve`, never lazily)
#[derive(Debug, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum StrategyConfig {
    Recursive {
        #[serde(default = "default_chunk_size")]
        chunk_size: usize,
        #[serde(default)]
        separators: Option<Vec<String>>,
        #[serde(default)]
        is_separator_regex: bool,
        #[serde(default)]
        keep_separator: KeepSeparator,
        #[serde(default)]
        overlap: usize,
    },
    Punctuation {
        min_size: usize,
        max_size: usize,
        #[serde(default)]
        overlap: usize,
    },
    Code {
        language: Language,
        #[serde(default = "default_chunk_size")]
        chunk_size: usize,
    },
    Markdown {
        #[serde(default = "default_heading_markers")]
        heading_markers: Vec<(String, String)>,
        #[serde(default = "default_true")]
        strip_headers: bool,
        #[serde(default)]
        return_each_line: bool,
        #[serde(default = "default_chunk_limit")]
        chunk_limit: usize,
    },
    Html {
        #[serde(default = "default_heading_tags")]
        heading_tags: Vec<(String, String)>,
        #[serde(default)]
        return_each_element: bool,
    },
}

impl StrategyConfig {
    /// Validate bounds, compile separators, and build the strategy
    pub fn resolve(self) -> Result<Strategy, SplitError> {
        match self {
            StrategyConfig::Recursive {
                chunk_size,
                separators,
                is_separator_regex,
                keep_separator,
                overlap,
            } => {
                let mut splitter = RecursiveSplitter::new(chunk_size)?
                    .with_keep_separator(keep_separator)
                    .with_overlap(overlap);
                if let Some(raw) = separators {
                    splitter =
                        splitter.with_separators(Separator::compile(&raw, is_separator_regex)?);
                }
                Ok(Strategy::Recursive(splitter))
            }
            StrategyConfig::Punctuation {
                min_size,
                max_size,
                overlap,
            } => Ok(Strategy::Punctuation(PunctuationSplitter::new(
                min_size, max_size, overlap,
            )?)),
            StrategyConfig::Code {
                language,
                chunk_size,
            } => Ok(Strategy::Code(CodeSplitter::new(language, chunk_size)?)),
            StrategyConfig::Markdown {
                heading_markers,
                strip_headers,
                return_each_line,
                chunk_limit,
            } => Ok(Strategy::Markdown(MarkdownSplitter::new(
                heading_markers,
                strip_headers,
                return_each_line,
                chunk_limit,
            )?)),
            StrategyConfig::Html {
                heading_tags,
                return_each_element,
            } => Ok(Strategy::Html(
                HtmlSplitter::new(heading_tags).with_return_each_element(return_each_element),
            )),
        }
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_chunk_limit() -> usize {
    DEFAULT_CHUNK_LIMIT
}

fn default_true() -> bool {
    true
}
