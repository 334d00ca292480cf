// Public API exports
pub mod document;
pub mod splitter;

// Re-export main types for convenience
pub use document::Document;

pub use splitter::{
    default_heading_markers, default_heading_tags, CodeSplitter, HtmlSplitter, KeepSeparator,
    Language, LineRecord, MarkdownSplitter, PunctuationSplitter, RecursiveSplitter, Separator,
    SplitError, Strategy, StrategyConfig, StrategyKind, DEFAULT_CHUNK_LIMIT, DEFAULT_CHUNK_SIZE,
    DEFAULT_PUNCTUATION, DEFAULT_SEPARATORS,
};
