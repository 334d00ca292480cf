use indexmap::IndexMap;

use crate::document::Document;

use super::recursive::{char_len, RecursiveSplitter};
use super::SplitError;

/// Default escalation limit: records longer than this go through the
/// recursive splitter
pub const DEFAULT_CHUNK_LIMIT: usize = 200;

/// Default heading markers, `#` through `######` mapped to `h1`..`h6`
pub fn default_heading_markers() -> Vec<(String, String)> {
    (1..=6).map(|n| ("#".repeat(n), format!("h{n}"))).collect()
}

/// An aggregated run of same-context lines prior to materialization
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub content: String,
    pub metadata: IndexMap<String, String>,
}

/// One entry on the heading scope stack; levels strictly increase from
/// bottom to top
#[derive(Debug)]
struct HeaderEntry {
    level: usize,
    name: String,
}

/// Line-based structural splitter for lightweight markup
///
/// Scans text line by line, tracks literal-block state and a header
/// stack keyed by heading level, aggregates same-context lines, and
/// escalates oversized aggregates to the recursive splitter.
#[derive(Debug, Clone)]
pub struct MarkdownSplitter {
    /// Sorted longest marker first so a short marker never matches a
    /// prefix of a longer one
    heading_markers: Vec<(String, String)>,
    strip_headers: bool,
    return_each_line: bool,
    chunk_limit: usize,
    escalator: RecursiveSplitter,
}

impl MarkdownSplitter {
    pub fn new(
        heading_markers: Vec<(String, String)>,
        strip_headers: bool,
        return_each_line: bool,
        chunk_limit: usize,
    ) -> Result<Self, SplitError> {
        let mut markers = heading_markers;
        markers.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        let escalator = RecursiveSplitter::new(chunk_limit)?;
        Ok(Self {
            heading_markers: markers,
            strip_headers,
            return_each_line,
            chunk_limit,
            escalator,
        })
    }

    /// Split `text` into `{content, metadata}` records
    ///
    /// Records are aggregated by identical metadata unless
    /// `return_each_line` is set.
    pub fn split_text(&self, text: &str) -> Vec<LineRecord> {
        let mut records: Vec<LineRecord> = Vec::new();
        let mut current_content: Vec<String> = Vec::new();
        let mut current_metadata: IndexMap<String, String> = IndexMap::new();
        let mut scope_metadata: IndexMap<String, String> = IndexMap::new();
        let mut header_stack: Vec<HeaderEntry> = Vec::new();
        let mut in_code_block = false;
        let mut opening_fence = "";

        for raw_line in text.split('\n') {
            let stripped: String = raw_line.trim().chars().filter(|c| !c.is_control()).collect();

            // Fence tracking; structural markers inside a literal block
            // are inert
            if !in_code_block {
                if stripped.starts_with("```") && stripped.matches("```").count() == 1 {
                    in_code_block = true;
                    opening_fence = "```";
                } else if stripped.starts_with("~~~") {
                    in_code_block = true;
                    opening_fence = "~~~";
                }
            } else if stripped.starts_with(opening_fence) {
                in_code_block = false;
                opening_fence = "";
            }
            if in_code_block {
                current_content.push(stripped);
                continue;
            }

            let mut matched_heading = false;
            for (marker, name) in &self.heading_markers {
                if !stripped.starts_with(marker.as_str()) {
                    continue;
                }
                // A marker counts only when followed by end-of-line or a
                // space
                if stripped.len() != marker.len() && !stripped[marker.len()..].starts_with(' ') {
                    continue;
                }
                matched_heading = true;

                let level = marker_level(marker);
                // Close same-or-deeper sections; later-opened shallower
                // headers survive
                while header_stack.last().map_or(false, |h| h.level >= level) {
                    if let Some(popped) = header_stack.pop() {
                        scope_metadata.shift_remove(&popped.name);
                    }
                }
                header_stack.push(HeaderEntry {
                    level,
                    name: name.clone(),
                });
                scope_metadata.insert(name.clone(), stripped[marker.len()..].trim().to_string());

                // The flush uses the metadata in effect before this
                // heading line
                if !current_content.is_empty() {
                    records.push(LineRecord {
                        content: current_content.join("\n"),
                        metadata: current_metadata.clone(),
                    });
                    current_content.clear();
                }
                if !self.strip_headers {
                    current_content.push(stripped.clone());
                }
                break;
            }

            if !matched_heading {
                if !stripped.is_empty() {
                    current_content.push(stripped);
                } else if !current_content.is_empty() {
                    records.push(LineRecord {
                        content: current_content.join("\n"),
                        metadata: current_metadata.clone(),
                    });
                    current_content.clear();
                }
            }

            current_metadata = scope_metadata.clone();
        }

        if !current_content.is_empty() {
            records.push(LineRecord {
                content: current_content.join("\n"),
                metadata: current_metadata,
            });
        }

        if self.return_each_line {
            records
        } else {
            self.aggregate(records)
        }
    }

    /// Merge consecutive records with identical metadata; additionally a
    /// heading kept in-line stays glued to its own immediately-following
    /// same-flush content
    fn aggregate(&self, lines: Vec<LineRecord>) -> Vec<LineRecord> {
        let mut aggregated: Vec<LineRecord> = Vec::new();
        for line in lines {
            if let Some(prev) = aggregated.last_mut() {
                if prev.metadata == line.metadata {
                    prev.content.push_str("  \n");
                    prev.content.push_str(&line.content);
                    continue;
                }
                let glue_heading = prev.metadata.len() < line.metadata.len()
                    && !self.strip_headers
                    && self.last_line_is_heading(&prev.content);
                if glue_heading {
                    prev.content.push_str("  \n");
                    prev.content.push_str(&line.content);
                    prev.metadata = line.metadata;
                    continue;
                }
            }
            aggregated.push(line);
        }
        aggregated
    }

    fn last_line_is_heading(&self, content: &str) -> bool {
        let last = content.rsplit('\n').next().unwrap_or_default();
        self.heading_markers
            .iter()
            .any(|(marker, _)| last.starts_with(marker.as_str()))
    }

    /// Materialize records into `Document`s, escalating oversized records
    /// through the recursive splitter
    ///
    /// Escalated sub-pieces inherit the record's metadata, with the
    /// record's own keys taking precedence.
    pub fn chunk(&self, text: &str, title: &str) -> Vec<Document> {
        let mut documents = Vec::new();
        for record in self.split_text(text) {
            let mut metadata = IndexMap::new();
            metadata.insert("title".to_string(), title.to_string());
            for (k, v) in &record.metadata {
                metadata.insert(k.clone(), v.clone());
            }

            if char_len(&record.content) > self.chunk_limit {
                for mut doc in self.escalator.chunk(&record.content, title) {
                    for (k, v) in &metadata {
                        doc.metadata.insert(k.clone(), v.clone());
                    }
                    documents.push(doc);
                }
            } else {
                documents.push(Document {
                    text: record.content,
                    metadata,
                });
            }
        }
        documents
    }
}

/// Heading level: count of `#` characters, falling back to the marker's
/// character length for custom non-`#` markers
fn marker_level(marker: &str) -> usize {
    let hashes = marker.chars().filter(|&c| c == '#').count();
    if hashes > 0 {
        hashes
    } else {
        marker.chars().count()
    }
}
