use anyhow::Result;
use clap::{Parser, ValueEnum};
use docseg::{Document, DocumentSegmenter, NewlinePolicy};
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "docseg")]
#[command(about = "Segments raw text into sentences and offset-exact tokens")]
#[command(version)]
struct Args {
    /// Input text file, or "-" to read from stdin
    input: PathBuf,

    /// Newline handling policy
    #[arg(long, value_enum, default_value_t = NewlinePolicy::Discard)]
    newlines: NewlinePolicy,

    /// Language code to use instead of detection (e.g. "en")
    #[arg(long)]
    language: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Print run statistics to stderr as JSON
    #[arg(long)]
    stats: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OutputFormat {
    /// Full document as JSON
    Json,
    /// One line per sentence: index, text, span
    Tsv,
}

/// Per-run statistics
#[derive(Serialize, Debug)]
struct RunStats {
    bytes_processed: u64,
    sentences: u64,
    tokens: u64,
    processing_time_ms: u64,
    bytes_per_sec: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging enables observability and debugging in production
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let text = read_input(&args.input).await?;
    info!("Read {} bytes of input", text.len());

    let segmenter = DocumentSegmenter::builtin()?.with_policy(args.newlines);

    let start_time = std::time::Instant::now();
    let doc = match &args.language {
        Some(lang) => segmenter.segment_with_language(&text, lang.clone()),
        None => segmenter.segment(&text),
    };
    let elapsed = start_time.elapsed();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Tsv => {
            for line in format_tsv(&doc) {
                println!("{line}");
            }
        }
    }

    if args.stats {
        let token_count = doc.token_texts().count() as u64;
        let stats = RunStats {
            bytes_processed: text.len() as u64,
            sentences: doc.len() as u64,
            tokens: token_count,
            processing_time_ms: elapsed.as_millis() as u64,
            bytes_per_sec: if elapsed.as_secs_f64() > 0.0 {
                text.len() as f64 / elapsed.as_secs_f64()
            } else {
                0.0
            },
        };
        eprintln!("{}", serde_json::to_string(&stats)?);
    }

    info!(
        sentences = doc.len(),
        "Segmentation completed in {}ms",
        elapsed.as_millis()
    );
    Ok(())
}

async fn read_input(input: &PathBuf) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }

    // WHY: validate input exists early to fail fast with clear error
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    if !input.is_file() {
        anyhow::bail!("Input path is not a file: {}", input.display());
    }

    Ok(tokio::fs::read_to_string(input).await?)
}

/// Format sentences as index<TAB>joined tokens<TAB>(start,end) lines
fn format_tsv(doc: &Document) -> Vec<String> {
    doc.sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| {
            let joined = sentence.token_texts().collect::<Vec<_>>().join(" ");
            format!(
                "{}\t{}\t({},{})",
                index, joined, sentence.span.start, sentence.span.end
            )
        })
        .collect()
}
