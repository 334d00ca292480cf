use super::*;
use crate::document::Document;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn texts(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.text.as_str()).collect()
}

// --- recursive splitter ---

#[test]
fn test_recursive_respects_size_bound_and_reconstructs() {
    let separators = Separator::compile(&["\n\n", "\n", " ", ""], false).unwrap();
    let splitter = RecursiveSplitter::new(10).unwrap().with_separators(separators);

    let text = "ab cd\n\nefghijklmno";
    let docs = splitter.chunk(text, "t");

    for doc in &docs {
        assert!(
            char_len(&doc.text) <= 10,
            "chunk exceeds bound: {:?}",
            doc.text
        );
    }
    // End-retention keeps every byte, so concatenation rebuilds the input
    let rebuilt: String = docs.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(rebuilt, text);
}

#[test]
fn test_recursive_short_text_single_chunk() {
    let splitter = RecursiveSplitter::new(100).unwrap();
    let docs = splitter.chunk("hello", "t");

    assert_eq!(texts(&docs), vec!["hello"]);
    assert_eq!(docs[0].metadata.get("title").map(String::as_str), Some("t"));
}

#[test]
fn test_recursive_merge_is_greedy() {
    let separators = Separator::compile(&[" ", ""], false).unwrap();
    let splitter = RecursiveSplitter::new(5)
        .unwrap()
        .with_separators(separators)
        .with_keep_separator(KeepSeparator::None);

    let docs = splitter.chunk("aaaa bbbb cccc dddd", "t");
    assert_eq!(texts(&docs), vec!["aaaa", "bbbb", "cccc", "dddd"]);

    // Any two consecutive chunks rejoined with the separator would
    // meet or exceed the bound
    for pair in docs.windows(2) {
        assert!(char_len(&pair[0].text) + 1 + char_len(&pair[1].text) >= 5);
    }
}

#[test]
fn test_recursive_overlap_expands_interior_chunks() {
    let separators = Separator::compile(&[" ", ""], false).unwrap();
    let splitter = RecursiveSplitter::new(5)
        .unwrap()
        .with_separators(separators)
        .with_keep_separator(KeepSeparator::None)
        .with_overlap(3);

    let docs = splitter.chunk("aaaa bbbb cccc dddd", "t");
    // No overlap before the first chunk's start or after the last
    // chunk's end
    assert_eq!(
        texts(&docs),
        vec!["aaaabbb", "aaabbbbccc", "bbbccccddd", "cccdddd"]
    );
}

#[test]
fn test_recursive_overlap_snaps_to_separator() {
    let separators = Separator::compile(&[" ", ""], false).unwrap();
    let splitter = RecursiveSplitter::new(12)
        .unwrap()
        .with_separators(separators)
        .with_keep_separator(KeepSeparator::None)
        .with_overlap(6);

    let docs = splitter.chunk("alpha beta gamma delta", "t");
    // The raw 6-character overlap regions contain a space, so the
    // overlap is cut at the separator instead of the length bound
    assert_eq!(texts(&docs), vec!["alpha betagamma", "betagamma delta"]);
}

#[test]
fn test_recursive_pattern_separators() {
    let separators = Separator::compile(&[r"\d+", ""], true).unwrap();
    let splitter = RecursiveSplitter::new(5)
        .unwrap()
        .with_separators(separators)
        .with_keep_separator(KeepSeparator::None);

    let docs = splitter.chunk("aaa12bbb345ccc", "t");
    assert_eq!(texts(&docs), vec!["aaa", "bbb", "ccc"]);
}

#[test]
fn test_recursive_rejects_zero_chunk_size() {
    assert!(matches!(
        RecursiveSplitter::new(0),
        Err(SplitError::NonPositiveBound)
    ));
}

#[test]
fn test_recursive_custom_length_function() {
    fn byte_len(s: &str) -> usize {
        s.len()
    }

    let separators = Separator::compile(&[" ", ""], false).unwrap();
    let by_chars = RecursiveSplitter::new(4)
        .unwrap()
        .with_separators(separators.clone())
        .with_keep_separator(KeepSeparator::None);
    let by_bytes = by_chars.clone().with_length_fn(byte_len);

    // Two-byte characters: within bound by code points, over it by bytes
    assert_eq!(by_chars.chunk("éé éé", "t").len(), 2);
    assert_eq!(by_bytes.chunk("éé éé", "t").len(), 4);
}

#[test]
fn test_recursive_filters_blank_chunks() {
    let splitter = RecursiveSplitter::new(10).unwrap();
    let docs = splitter.chunk("one\n\n\n\ntwo", "t");
    assert!(docs.iter().all(|d| !d.text.trim().is_empty()));
}

// --- punctuation splitter ---

#[test]
fn test_punctuation_cuts_after_punctuation_with_overlap() {
    let splitter = PunctuationSplitter::new(5, 10, 2).unwrap();
    let docs = splitter.chunk("Hello world. This is a test.", "t");

    assert_eq!(texts(&docs), vec!["Hello world.", "d. This is a test."]);
    // The second chunk starts two characters before the first cut
    assert!(docs[1].text.starts_with("d."));
}

#[test]
fn test_punctuation_short_text_returned_whole() {
    let splitter = PunctuationSplitter::new(5, 10, 0).unwrap();
    let docs = splitter.chunk("Hi.", "t");
    assert_eq!(texts(&docs), vec!["Hi."]);
}

#[test]
fn test_punctuation_merges_short_final_chunk() {
    let splitter = PunctuationSplitter::new(5, 8, 0).unwrap();
    let docs = splitter.chunk("Aaaaa. Bb.", "t");
    assert_eq!(texts(&docs), vec!["Aaaaa. Bb."]);
}

#[test]
fn test_punctuation_scan_continues_past_max() {
    let splitter = PunctuationSplitter::new(2, 5, 0).unwrap();
    let docs = splitter.chunk("abcdefghij klmnop.", "t");

    // No punctuation inside the window: the chunk intentionally runs
    // past max_size to the next punctuation mark
    assert_eq!(docs.len(), 1);
    assert!(char_len(&docs[0].text) > 5);
}

#[test]
fn test_punctuation_custom_set() {
    let splitter = PunctuationSplitter::new(2, 5, 0)
        .unwrap()
        .with_punctuation(vec!['|']);
    let docs = splitter.chunk("ab|cd|ef", "t");
    assert_eq!(texts(&docs), vec!["ab|", "cd|", "ef"]);
}

#[test]
fn test_punctuation_rejects_invalid_bounds() {
    assert!(matches!(
        PunctuationSplitter::new(0, 10, 0),
        Err(SplitError::NonPositiveBound)
    ));
    assert!(matches!(
        PunctuationSplitter::new(10, 5, 0),
        Err(SplitError::MinExceedsMax { min: 10, max: 5 })
    ));
    assert!(matches!(
        PunctuationSplitter::new(5, 10, 10),
        Err(SplitError::OverlapTooLarge {
            overlap: 10,
            max: 10
        })
    ));
}

// --- code splitter ---

#[test]
fn test_code_splitter_bounds_and_reconstruction() {
    let code = "class MyClass:\n    def method1(self):\n        print(\"Hello\")\n\n    def method2(self):\n        print(\"World\")\n\ndef standalone_function():\n    print(\"Test\")\n";
    let splitter = CodeSplitter::new(Language::Python, 60).unwrap();
    let docs = splitter.chunk(code, "test.py");

    assert!(docs.len() >= 2);
    for doc in &docs {
        assert!(char_len(&doc.text) < 60, "chunk too long: {:?}", doc.text);
        assert_eq!(
            doc.metadata.get("title").map(String::as_str),
            Some("test.py")
        );
    }
    let rebuilt: String = docs.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(rebuilt, code);
}

#[test]
fn test_language_extension_mapping() {
    assert_eq!(Language::from_extension("py"), Some(Language::Python));
    assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
    assert_eq!(Language::from_extension("txt"), None);
}

// --- markdown splitter ---

#[test]
fn test_markdown_headers_become_metadata() {
    let splitter = MarkdownSplitter::new(default_heading_markers(), true, false, 200).unwrap();
    let records = splitter.split_text("# A\ntext1\n## B\ntext2");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].content, "text1");
    assert_eq!(records[0].metadata.get("h1").map(String::as_str), Some("A"));
    assert_eq!(records[0].metadata.get("h2"), None);
    assert_eq!(records[1].content, "text2");
    assert_eq!(records[1].metadata.get("h1").map(String::as_str), Some("A"));
    assert_eq!(records[1].metadata.get("h2").map(String::as_str), Some("B"));
}

#[test]
fn test_markdown_chunk_orders_title_first() {
    let splitter = MarkdownSplitter::new(default_heading_markers(), true, false, 200).unwrap();
    let docs = splitter.chunk("# A\ntext1\n## B\ntext2", "guide.md");

    let keys: Vec<&str> = docs[1].metadata.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["title", "h1", "h2"]);
}

#[test]
fn test_markdown_sibling_heading_closes_section() {
    let splitter = MarkdownSplitter::new(default_heading_markers(), true, false, 200).unwrap();
    let records = splitter.split_text("## B\nfirst\n## C\nsecond");

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].metadata.get("h2").map(String::as_str), Some("C"));
    assert_eq!(records[1].metadata.len(), 1);
}

#[test]
fn test_markdown_aggregates_same_context_blocks() {
    let splitter = MarkdownSplitter::new(default_heading_markers(), true, false, 200).unwrap();
    let records = splitter.split_text("# H\npara one\n\npara two");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "para one  \npara two");
}

#[test]
fn test_markdown_return_each_line_skips_aggregation() {
    let splitter = MarkdownSplitter::new(default_heading_markers(), true, true, 200).unwrap();
    let records = splitter.split_text("# H\npara one\n\npara two");
    assert_eq!(records.len(), 2);
}

#[test]
fn test_markdown_fence_disables_heading_detection() {
    let splitter = MarkdownSplitter::new(default_heading_markers(), true, false, 200).unwrap();
    let records = splitter.split_text("```\n# not a heading\n```\ntext");

    assert_eq!(records.len(), 1);
    assert!(records[0].metadata.is_empty());
    assert!(records[0].content.contains("# not a heading"));
}

#[test]
fn test_markdown_tilde_fence_tracked_separately() {
    let splitter = MarkdownSplitter::new(default_heading_markers(), true, false, 200).unwrap();
    let records = splitter.split_text("~~~\n## inert\n~~~\nafter");

    assert_eq!(records.len(), 1);
    assert!(records[0].metadata.is_empty());
}

#[test]
fn test_markdown_retained_heading_glues_to_following_block() {
    let splitter = MarkdownSplitter::new(default_heading_markers(), false, false, 200).unwrap();
    let records = splitter.split_text("# A\n## B\ntext");

    // The h1 line would otherwise stand alone with shallower metadata;
    // with headers kept in-line it stays glued to its own content
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "# A  \n## B\ntext");
    assert_eq!(records[0].metadata.get("h1").map(String::as_str), Some("A"));
    assert_eq!(records[0].metadata.get("h2").map(String::as_str), Some("B"));
}

#[test]
fn test_markdown_escalates_oversized_records() {
    let splitter = MarkdownSplitter::new(default_heading_markers(), true, false, 20).unwrap();
    let docs = splitter.chunk("# T\nalpha beta gamma delta epsilon zeta", "doc.md");

    assert!(docs.len() >= 2);
    for doc in &docs {
        assert!(char_len(&doc.text) <= 20);
        // Sub-pieces inherit the record's heading metadata
        assert_eq!(doc.metadata.get("h1").map(String::as_str), Some("T"));
        assert_eq!(
            doc.metadata.keys().next().map(String::as_str),
            Some("title")
        );
    }
}

// --- html splitter ---

#[test]
fn test_html_header_scope_tracking() {
    let html = "<html><body>\
                <h1>Intro</h1><p>alpha</p>\
                <h2>Details</h2><p>beta</p>\
                <h1>Next</h1><p>gamma</p>\
                </body></html>";
    let splitter = HtmlSplitter::new(default_heading_tags());
    let docs = splitter.chunk(html, "page.html");

    assert_eq!(
        texts(&docs),
        vec!["Intro", "alpha", "Details", "beta", "Next", "gamma"]
    );

    // "beta" sits under both headings
    assert_eq!(
        docs[3].metadata.get("h1").map(String::as_str),
        Some("Intro")
    );
    assert_eq!(
        docs[3].metadata.get("h2").map(String::as_str),
        Some("Details")
    );
    // A new h1 closes every deeper section
    assert_eq!(docs[5].metadata.get("h1").map(String::as_str), Some("Next"));
    assert_eq!(docs[5].metadata.get("h2"), None);
}

#[test]
fn test_html_heading_document_includes_itself() {
    let html = "<body><h1>Title</h1><h2>Sub</h2></body>";
    let splitter = HtmlSplitter::new(default_heading_tags());
    let docs = splitter.chunk(html, "t");

    assert_eq!(docs[0].metadata.get("h1").map(String::as_str), Some("Title"));
    assert_eq!(docs[1].metadata.get("h1").map(String::as_str), Some("Title"));
    assert_eq!(docs[1].metadata.get("h2").map(String::as_str), Some("Sub"));
}

#[test]
fn test_html_sibling_heading_replaces_same_level() {
    let html = "<body><h1>A</h1><h2>B</h2><h2>C</h2><p>x</p></body>";
    let splitter = HtmlSplitter::new(default_heading_tags());
    let docs = splitter.chunk(html, "t");

    let last = docs.last().unwrap();
    assert_eq!(last.text, "x");
    assert_eq!(last.metadata.get("h1").map(String::as_str), Some("A"));
    assert_eq!(last.metadata.get("h2").map(String::as_str), Some("C"));
}

#[test]
fn test_html_header_scope_ends_with_its_subtree() {
    let html = "<body><div><h2>Inner</h2><p>inside</p></div><p>outside</p></body>";
    let splitter = HtmlSplitter::new(default_heading_tags()).with_return_each_element(true);
    let docs = splitter.chunk(html, "t");

    assert_eq!(texts(&docs), vec!["Inner", "inside", "outside"]);
    assert_eq!(
        docs[1].metadata.get("h2").map(String::as_str),
        Some("Inner")
    );
    // The div subtree has been exited; its heading no longer applies
    assert_eq!(docs[2].metadata.get("h2"), None);
}

#[test]
fn test_html_empty_title_omitted_from_metadata() {
    let splitter = HtmlSplitter::new(default_heading_tags());
    let docs = splitter.chunk("<body><p>text</p></body>", "");

    assert_eq!(docs.len(), 1);
    assert!(docs[0].metadata.get("title").is_none());
}

#[test]
fn test_html_tolerates_malformed_markup() {
    let splitter = HtmlSplitter::new(default_heading_tags());
    let docs = splitter.chunk("<body><h1>Open<p>text", "t");

    assert!(!docs.is_empty());
}

// --- strategy dispatch ---

#[test]
fn test_strategy_kind_from_name() {
    assert_eq!(
        StrategyKind::from_name("markdown").unwrap(),
        StrategyKind::Markdown
    );
    assert!(matches!(
        StrategyKind::from_name("bogus"),
        Err(SplitError::UnknownStrategy(_))
    ));
}

#[test]
fn test_strategy_kind_for_path() {
    assert_eq!(StrategyKind::for_path("notes/guide.md"), StrategyKind::Markdown);
    assert_eq!(StrategyKind::for_path("index.HTML"), StrategyKind::Html);
    assert_eq!(StrategyKind::for_path("src/main.rs"), StrategyKind::Code);
    assert_eq!(StrategyKind::for_path("plain.txt"), StrategyKind::Recursive);
}

#[test]
fn test_strategy_config_resolves_and_splits() {
    let cfg: StrategyConfig = serde_json::from_str(r#"{"strategy": "markdown"}"#).unwrap();
    let strategy = cfg.resolve().unwrap();

    let docs = strategy.split("# A\ntext1\n## B\ntext2", "guide.md");
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].metadata.get("h1").map(String::as_str), Some("A"));
}

#[test]
fn test_strategy_config_reports_invalid_bounds() {
    let cfg: StrategyConfig =
        serde_json::from_str(r#"{"strategy": "punctuation", "min_size": 10, "max_size": 5}"#)
            .unwrap();
    assert!(matches!(
        cfg.resolve(),
        Err(SplitError::MinExceedsMax { min: 10, max: 5 })
    ));
}

#[test]
fn test_strategy_config_reports_bad_pattern() {
    let cfg: StrategyConfig = serde_json::from_str(
        r#"{"strategy": "recursive", "separators": ["["], "is_separator_regex": true}"#,
    )
    .unwrap();
    assert!(matches!(cfg.resolve(), Err(SplitError::InvalidPattern(_))));
}

#[test]
fn test_strategy_config_code_language() {
    let cfg: StrategyConfig =
        serde_json::from_str(r#"{"strategy": "code", "language": "python", "chunk_size": 80}"#)
            .unwrap();
    let strategy = cfg.resolve().unwrap();
    let docs = strategy.split("def f():\n    pass\n", "f.py");
    assert!(!docs.is_empty());
}
