use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A bounded text segment plus its structural metadata
///
/// Documents are produced only by splitters and carry no back-references;
/// ownership transfers entirely to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The text content of this chunk
    pub text: String,
    /// Insertion-ordered metadata: `title` first, then hierarchy keys in
    /// discovery order
    pub metadata: IndexMap<String, String>,
}

impl Document {
    /// Create a document carrying only a title
    pub fn with_title(text: impl Into<String>, title: &str) -> Self {
        let mut metadata = IndexMap::new();
        metadata.insert("title".to_string(), title.to_string());
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Render metadata as `key: value` lines followed by a blank line and
    /// the raw chunk text
    ///
    /// The `title` value is reduced to its final `/`-separated component.
    /// Pure and side-effect-free; repeated calls yield identical output.
    pub fn format_chunk(&self) -> String {
        let lines: Vec<String> = self
            .metadata
            .iter()
            .map(|(key, value)| {
                if key == "title" {
                    let short = value.rsplit('/').next().unwrap_or_default();
                    format!("{key}: {short}")
                } else {
                    format!("{key}: {value}")
                }
            })
            .collect();
        format!("{}\n\n{}", lines.join("\n"), self.text)
    }
}
