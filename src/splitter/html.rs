use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};

use crate::document::Document;

/// Level assigned to mapped heading tags that do not parse as `h<N>`
const UNNUMBERED_LEVEL: usize = 9999;

/// Default heading map: `h1`..`h6` keyed under their own tag names
pub fn default_heading_tags() -> Vec<(String, String)> {
    (1..=6).map(|n| (format!("h{n}"), format!("h{n}"))).collect()
}

/// A heading currently in scope for subsequent content
#[derive(Debug)]
struct ActiveHeader {
    text: String,
    level: usize,
    depth: usize,
}

/// Tree-based structural splitter for markup documents
///
/// Walks a leniently parsed HTML tree depth-first, maintains an active
/// header scope keyed by heading level and tree depth, and emits one
/// `Document` per header-delimited region (or per node when
/// `return_each_element` is set). Parsing is delegated to `scraper`,
/// which recovers from malformed input instead of failing.
#[derive(Debug, Clone)]
pub struct HtmlSplitter {
    /// Sorted ascending by numeric heading level
    heading_tags: Vec<(String, String)>,
    return_each_element: bool,
}

impl HtmlSplitter {
    pub fn new(mut heading_tags: Vec<(String, String)>) -> Self {
        heading_tags.sort_by_key(|(tag, _)| tag_level(tag));
        Self {
            heading_tags,
            return_each_element: false,
        }
    }

    /// Emit one `Document` per node instead of aggregating blocks
    pub fn with_return_each_element(mut self, return_each_element: bool) -> Self {
        self.return_each_element = return_each_element;
        self
    }

    fn mapped_name(&self, tag: &str) -> Option<&str> {
        self.heading_tags
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, name)| name.as_str())
    }

    /// Split markup into `Document`s keyed by the active heading scope
    pub fn chunk(&self, html: &str, title: &str) -> Vec<Document> {
        let tree = Html::parse_document(html);
        let root = Selector::parse("body")
            .ok()
            .and_then(|sel| tree.select(&sel).next())
            .unwrap_or_else(|| tree.root_element());

        let mut active_headers: IndexMap<String, ActiveHeader> = IndexMap::new();
        let mut current_block: Vec<String> = Vec::new();
        let mut documents: Vec<Document> = Vec::new();

        let mut stack: Vec<ElementRef> = vec![root];
        while let Some(node) = stack.pop() {
            // Depth-first: children pushed in reverse so the leftmost is
            // visited next
            let children: Vec<ElementRef> = node.children().filter_map(ElementRef::wrap).collect();
            for child in children.into_iter().rev() {
                stack.push(child);
            }

            let node_text = direct_text(&node);
            if node_text.is_empty() {
                continue;
            }
            let tree_depth = node.ancestors().count();
            let tag = node.value().name();

            if let Some(name) = self.mapped_name(tag) {
                if !self.return_each_element {
                    if let Some(doc) = flush_block(&mut current_block, title, &active_headers) {
                        documents.push(doc);
                    }
                }

                let level = tag_level(tag);
                // Close sections at the same or a deeper level;
                // later-opened shallower headers survive
                active_headers.retain(|_, h| h.level < level);
                active_headers.insert(
                    name.to_string(),
                    ActiveHeader {
                        text: node_text.clone(),
                        level,
                        depth: tree_depth,
                    },
                );

                // The heading node itself becomes a Document, with its
                // own entry included in the metadata
                documents.push(Document {
                    text: node_text,
                    metadata: metadata_for(title, &active_headers),
                });
            } else {
                // Leaving a header's subtree invalidates it
                active_headers.retain(|_, h| h.depth <= tree_depth);

                if self.return_each_element {
                    documents.push(Document {
                        text: node_text,
                        metadata: metadata_for(title, &active_headers),
                    });
                } else {
                    current_block.push(node_text);
                }
            }
        }

        if !self.return_each_element {
            if let Some(doc) = flush_block(&mut current_block, title, &active_headers) {
                documents.push(doc);
            }
        }
        documents
    }
}

/// Numeric heading level: `h2` -> 2; anything unparsable gets the
/// unnumbered sentinel
fn tag_level(tag: &str) -> usize {
    tag.get(1..)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(UNNUMBERED_LEVEL)
}

/// Direct text children of a node, trimmed and joined with a space;
/// descendant text belongs to the descendants themselves
fn direct_text(node: &ElementRef) -> String {
    let parts: Vec<&str> = node
        .children()
        .filter_map(|child| child.value().as_text().map(|t| t.trim()))
        .filter(|t| !t.is_empty())
        .collect();
    parts.join(" ")
}

fn metadata_for(title: &str, active: &IndexMap<String, ActiveHeader>) -> IndexMap<String, String> {
    let mut metadata = IndexMap::new();
    if !title.is_empty() {
        metadata.insert("title".to_string(), title.to_string());
    }
    for (name, header) in active {
        metadata.insert(name.clone(), header.text.clone());
    }
    metadata
}

/// Drain the current block into a Document; blank blocks are discarded
fn flush_block(
    block: &mut Vec<String>,
    title: &str,
    active: &IndexMap<String, ActiveHeader>,
) -> Option<Document> {
    if block.is_empty() {
        return None;
    }
    let text = block
        .iter()
        .filter(|line| !line.trim().is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("  \n");
    block.clear();
    if text.trim().is_empty() {
        return None;
    }
    Some(Document {
        text,
        metadata: metadata_for(title, active),
    })
}
