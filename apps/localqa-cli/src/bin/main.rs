use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use localqa_answer::QaEngine;
use localqa_core::config::Config;
use localqa_core::error::Error;
use localqa_core::loader::{list_txt_files, read_document};
use localqa_core::types::{Answer, AnswerTrace, Document};

const TEST_QUERIES: [&str; 5] = [
    "What is the warranty for UltraBlend 3000?",
    "How do I schedule maintenance for UltraBlend 3000?",
    "How many paid leaves do employees get?",
    "How long do returns take to process refunds?",
    "Does SafeGrill have auto-shutoff?",
];

#[derive(Parser)]
#[command(name = "localqa", version, about = "Answer questions from a folder of plain-text documents")]
struct Cli {
    /// Question to answer; without it (and without --test) an interactive prompt starts
    #[arg(long)]
    query: Option<String>,

    /// Show the retrieval and candidate-scoring trace
    #[arg(long)]
    debug: bool,

    /// Run the built-in test queries
    #[arg(long)]
    test: bool,

    /// Documents directory (overrides data.docs_dir)
    #[arg(long)]
    docs_dir: Option<String>,

    /// Number of passages to retrieve (overrides retrieval.k)
    #[arg(short)]
    k: Option<usize>,

    /// Maximum words per passage (overrides passages.max_words)
    #[arg(long)]
    max_words: Option<usize>,

    /// Print answers as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy)]
struct Output {
    debug: bool,
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut settings = config.settings()?;
    if let Some(dir) = &cli.docs_dir { settings.data.docs_dir = dir.clone(); }
    if let Some(max_words) = cli.max_words { settings.passages.max_words = max_words; }
    if let Some(k) = cli.k { settings.retrieval.k = k; }
    settings.validate()?;

    println!("{}", "=".repeat(80));
    println!("INITIALIZING RAG SYSTEM");
    println!("{}", "=".repeat(80));
    let documents = load_with_progress(&settings.docs_dir())?;
    let mut engine = QaEngine::from_settings(&settings);
    engine.ingest(documents)?;
    let stats = engine.build_index();
    println!("Created {} passages from {} documents", stats.passages, stats.documents);
    println!("Indexed {} passages ({} terms)", stats.passages, stats.vocabulary);

    let k = settings.retrieval.k;
    let out = Output { debug: cli.debug, json: cli.json };
    if cli.test {
        run_tests(&engine, k, out)
    } else if let Some(query) = cli.query.as_deref() {
        answer_query(&engine, query, k, out)
    } else {
        interactive(&engine, k, out)
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "localqa_core=debug,localqa_text=debug,localqa_answer=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Reads every document under `dir`. A missing or empty directory is reported
/// and yields an empty corpus instead of aborting.
fn load_with_progress(dir: &Path) -> anyhow::Result<Vec<Document>> {
    let files = match list_txt_files(dir) {
        Ok(files) => files,
        Err(e @ Error::NotFound(_)) => {
            warn!("{e}");
            println!("❌ Error: {e}. Run `localqa-sample-docs --out {}` to create sample documents.", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    if files.is_empty() {
        let e = Error::EmptyCorpus(dir.display().to_string());
        warn!("{e}");
        println!("No .txt files found in '{}'", dir.display());
        return Ok(Vec::new());
    }
    println!("Found {} documents", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents {msg}")?
            .progress_chars("#>-"),
    );
    let mut documents = Vec::with_capacity(files.len());
    for path in &files {
        let document = read_document(dir, path)?;
        pb.set_message(document.name.clone());
        documents.push(document);
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(documents)
}

fn run_tests(engine: &QaEngine, k: usize, out: Output) -> anyhow::Result<()> {
    println!("\n{}", "=".repeat(80));
    println!("RUNNING TEST QUERIES");
    println!("{}", "=".repeat(80));
    for query in TEST_QUERIES {
        answer_query(engine, query, k, out)?;
    }
    Ok(())
}

fn answer_query(engine: &QaEngine, query: &str, k: usize, out: Output) -> anyhow::Result<()> {
    let answer = engine.answer(query, k, out.debug)?;
    if out.json {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "query": query, "answer": answer }))?);
        return Ok(());
    }
    print_answer(query, &answer);
    Ok(())
}

fn print_answer(query: &str, answer: &Answer) {
    println!("\nQuery: {}", query);
    if let Some(trace) = &answer.trace {
        print_trace(query, trace);
    }
    println!("\nAnswer (based on retrieved documents):");
    println!("{}", answer.text);
    let sources: Vec<&str> = answer.sources.iter().map(String::as_str).collect();
    println!("\nSources: {}", sources.join(", "));
    println!("{}", "-".repeat(80));
}

fn print_trace(query: &str, trace: &AnswerTrace) {
    println!("\n--- DEBUG: Preprocessed Query ---");
    println!("Original: {}", query);
    println!("Preprocessed: {}", trace.normalized_query);

    println!("\n--- DEBUG: Top {} Retrieved Passages ---", trace.hits.len());
    for (i, hit) in trace.hits.iter().enumerate() {
        println!("\n{}. Score: {:.4}", i + 1, hit.score);
        println!("   Source: {}", hit.source);
        println!("   ID: {}", hit.id);
        println!("   Text: {}...", hit.preview);
    }

    println!("\n--- DEBUG: Answer Generation ---");
    println!("Keywords extracted: {:?}", trace.keywords);
    println!("\nFound {} candidate sentences", trace.candidates.len());
    for (i, c) in trace.candidates.iter().take(5).enumerate() {
        let preview: String = c.sentence.chars().take(150).collect();
        println!("\n{}. Relevance Score: {}, Passage Score: {:.4}", i + 1, c.relevance, c.passage_score);
        println!("   Source: {}", c.source);
        println!("   Sentence: {}...", preview);
    }
}

fn interactive(engine: &QaEngine, k: usize, out: Output) -> anyhow::Result<()> {
    println!("\n{}", "=".repeat(80));
    println!("INTERACTIVE MODE (type 'exit' to quit, 'test' to run tests)");
    println!("{}", "=".repeat(80));

    loop {
        print!("\nEnter your question: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        match input.to_lowercase().as_str() {
            "exit" => {
                println!("Goodbye!");
                break;
            }
            "test" => run_tests(engine, k, out)?,
            "" => {}
            _ => answer_query(engine, input, k, out)?,
        }
    }
    Ok(())
}
