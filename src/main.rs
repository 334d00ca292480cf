use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use docshard::{
    default_heading_markers, default_heading_tags, CodeSplitter, HtmlSplitter, Language,
    MarkdownSplitter, PunctuationSplitter, RecursiveSplitter, Strategy, StrategyConfig,
    StrategyKind, DEFAULT_CHUNK_LIMIT, DEFAULT_CHUNK_SIZE,
};

/// Split a document into bounded, metadata-tagged chunks
#[derive(Parser)]
#[command(name = "docshard", version, about)]
struct Args {
    /// File to chunk
    path: PathBuf,

    /// Chunking strategy: recursive, punctuation, code, markdown, html.
    /// Inferred from the file extension when omitted
    #[arg(long)]
    strategy: Option<String>,

    /// Maximum chunk size for the recursive, code, and markdown strategies
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Minimum chunk size for the punctuation strategy
    #[arg(long, default_value_t = 100)]
    min_size: usize,

    /// Maximum chunk size for the punctuation strategy
    #[arg(long, default_value_t = 200)]
    max_size: usize,

    /// Characters shared between adjacent chunks
    #[arg(long, default_value_t = 0)]
    overlap: usize,

    /// Keep heading lines inside markdown chunk text
    #[arg(long)]
    keep_headings: bool,

    /// Emit chunks as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// JSON strategy configuration file; overrides the strategy flags
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let text = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let title = args.path.to_string_lossy().into_owned();

    let strategy = match &args.config {
        Some(path) => load_config(path)?,
        None => build_strategy(&args, &title)?,
    };
    let documents = strategy.split(&text, &title);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
        return Ok(());
    }

    println!("{}: {} chunk(s)", title, documents.len());
    for (i, doc) in documents.iter().enumerate() {
        println!(
            "\n--- chunk {} ({} chars) ---",
            i + 1,
            doc.text.chars().count()
        );
        println!("{}", doc.format_chunk());
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<Strategy> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: StrategyConfig = serde_json::from_str(&raw)
        .with_context(|| format!("invalid strategy config {}", path.display()))?;
    Ok(config.resolve()?)
}

fn build_strategy(args: &Args, title: &str) -> Result<Strategy> {
    let kind = match &args.strategy {
        Some(name) => StrategyKind::from_name(name)?,
        None => StrategyKind::for_path(title),
    };

    let strategy = match kind {
        StrategyKind::Recursive => {
            let splitter = RecursiveSplitter::new(args.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE))?
                .with_overlap(args.overlap);
            Strategy::Recursive(splitter)
        }
        StrategyKind::Punctuation => Strategy::Punctuation(PunctuationSplitter::new(
            args.min_size,
            args.max_size,
            args.overlap,
        )?),
        StrategyKind::Code => {
            let language = language_for_path(&args.path)?;
            Strategy::Code(CodeSplitter::new(
                language,
                args.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            )?)
        }
        StrategyKind::Markdown => Strategy::Markdown(MarkdownSplitter::new(
            default_heading_markers(),
            !args.keep_headings,
            false,
            args.chunk_size.unwrap_or(DEFAULT_CHUNK_LIMIT),
        )?),
        StrategyKind::Html => Strategy::Html(HtmlSplitter::new(default_heading_tags())),
    };
    Ok(strategy)
}

fn language_for_path(path: &Path) -> Result<Language> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    Language::from_extension(ext)
        .with_context(|| format!("no language separator table for extension {ext:?}"))
}
