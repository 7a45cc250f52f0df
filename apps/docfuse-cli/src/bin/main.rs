use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use docfuse_core::config::{Config, EngineConfig};
use docfuse_core::records::RecordLoader;
use docfuse_core::{Record, SearchResult};
use docfuse_hybrid::{FileRecordSource, InMemoryIndex, StoreBackedIndex};

const USAGE: &str = "Usage:\n  docfuse query <path> \"<query>\" [top_n] [--vector]\n  docfuse recent <path> \"<query>\" [top_n]";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{}", USAGE); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

fn positional(args: &[String], n: usize, what: &str) -> String {
    args.iter().filter(|a| !a.starts_with("--")).nth(n).cloned().unwrap_or_else(|| {
        eprintln!("Missing {}\n{}", what, USAGE); std::process::exit(1)
    })
}

fn top_n(args: &[String], engine: &EngineConfig) -> anyhow::Result<usize> {
    match args.iter().filter(|a| !a.starts_with("--")).nth(2) {
        Some(n) => n.parse().map_err(|e| anyhow::anyhow!("invalid top_n '{}': {}", n, e)),
        None => Ok(engine.default_top_n),
    }
}

fn load_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let loader = RecordLoader::new();
    let files = if path.is_file() { vec![path.to_path_buf()] } else { loader.list_record_files(path) };
    if files.is_empty() { anyhow::bail!("no .json/.jsonl files under {}", path.display()); }
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?.progress_chars("#>-"));
    let mut records = Vec::new();
    for file in &files {
        pb.set_message(file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default());
        records.extend(loader.load_file(file)?);
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} records", records.len()));
    Ok(records)
}

fn print_results(results: Vec<SearchResult>) -> anyhow::Result<()> {
    let rows: Vec<Record> = results.into_iter().map(SearchResult::into_record).collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let engine = config.engine()?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "query" => {
            let path = PathBuf::from(positional(&args, 0, "<path>"));
            let query = positional(&args, 1, "<query>");
            let top_n = top_n(&args, &engine)?;
            let use_vector = args.iter().any(|a| a == "--vector");
            let records = load_records(&path)?;
            let index = InMemoryIndex::from_config(records, engine)?;
            info!(docs = index.len(), use_vector, "index ready");
            print_results(index.search_with(&query, top_n, use_vector))?;
        }
        "recent" => {
            let path = PathBuf::from(positional(&args, 0, "<path>"));
            let query = positional(&args, 1, "<query>");
            let top_n = top_n(&args, &engine)?;
            let source = Arc::new(FileRecordSource::new(&path, engine.reload.timestamp_field.clone()));
            let index = StoreBackedIndex::from_config(source, engine)?;
            let kept = index.reload_defaults()?;
            info!(kept, "recent records loaded");
            print_results(index.search(&query, top_n))?;
        }
        _ => { eprintln!("Unknown command: {}\n{}", cmd, USAGE); std::process::exit(1); }
    }
    Ok(())
}
