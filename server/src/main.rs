use anyhow::Result;
use clap::Parser;
use poisk_core::{corpus, persist, Engine};
use poisk_server::build_app;
use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "poisk")]
#[command(about = "In-memory full-text search over an NDJSON corpus", long_about = None)]
struct Args {
    /// Run the HTTP API instead of the interactive prompt
    #[arg(long)]
    serve: bool,
    /// Port for HTTP mode
    #[arg(long, default_value_t = 9090)]
    port: u16,
    /// NDJSON corpus path
    #[arg(long, default_value = "/app/data/corpus.ndjson")]
    input: String,
    /// Snapshot path
    #[arg(long, default_value = "/app/data/index.dump")]
    dump: String,
    /// Ignore an existing snapshot and re-index from the corpus
    #[arg(long)]
    rebuild: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let engine = startup(&args);
    if engine.documents.is_empty() {
        tracing::error!(input = %args.input, "no documents loaded");
        std::process::exit(1);
    }
    let engine = Arc::new(engine);

    if args.serve {
        serve(engine, &args).await
    } else {
        repl(&engine, &args.dump)
    }
}

/// Prefer the snapshot; fall back to ingesting the corpus when it is absent,
/// stale by request (`--rebuild`) or unreadable. A fresh build writes the
/// snapshot back so the next start skips indexing.
fn startup(args: &Args) -> Engine {
    let dump_path = Path::new(&args.dump);
    if !args.rebuild && dump_path.exists() {
        match persist::load(dump_path) {
            Ok(engine) => {
                tracing::info!(
                    snapshot = %args.dump,
                    documents = engine.document_count(),
                    vocabulary = engine.vocabulary_size(),
                    "restored from snapshot"
                );
                return engine;
            }
            Err(err) => {
                tracing::warn!(error = %err, "snapshot unusable, rebuilding from corpus");
            }
        }
    }

    let documents = match corpus::load(Path::new(&args.input)) {
        Ok(documents) => documents,
        Err(err) => {
            tracing::error!(error = %err, "corpus unavailable");
            Vec::new()
        }
    };
    if documents.is_empty() {
        return Engine::build(documents);
    }

    let engine = Engine::build(documents);
    if let Err(err) = persist::save(&engine, dump_path) {
        tracing::warn!(error = %err, "could not write snapshot");
    }
    engine
}

async fn serve(engine: Arc<Engine>, args: &Args) -> Result<()> {
    let app = build_app(engine, PathBuf::from(&args.dump));
    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

const HELP: &str = "\
Commands:
  :help          show this help
  :stats         index statistics
  :zipf [N]      top N terms by frequency (default 20)
  :dump [path]   write a snapshot
  :quit          leave (:exit, quit and exit work too)
Anything else runs as a query: words, AND/OR/NOT (и/или/не), && || !, parentheses.";

fn repl(engine: &Engine, default_dump: &str) -> Result<()> {
    println!(
        "poisk: {} documents, {} terms. Type :help for commands.",
        engine.document_count(),
        engine.vocabulary_size()
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        let mut parts = line.split_whitespace();
        match parts.next() {
            None => continue,
            Some(":quit") | Some(":exit") | Some("quit") | Some("exit") => break,
            Some(":help") => println!("{HELP}"),
            Some(":stats") => print_stats(engine),
            Some(":zipf") => {
                let top = parts.next().and_then(|s| s.parse().ok()).unwrap_or(20);
                print_zipf(engine, top);
            }
            Some(":dump") => {
                let path = parts.next().unwrap_or(default_dump);
                match persist::save(engine, Path::new(path)) {
                    Ok(()) => println!("snapshot written to {path}"),
                    Err(err) => println!("snapshot failed: {err}"),
                }
            }
            Some(_) => run_query(engine, line),
        }
    }
    Ok(())
}

fn print_stats(engine: &Engine) {
    println!("documents:    {}", engine.document_count());
    println!("vocabulary:   {}", engine.vocabulary_size());
    println!("total terms:  {}", engine.zipf.total_terms());
    println!("unique terms: {}", engine.zipf.unique_terms());
    println!(
        "index time:   {:.3}s",
        engine.metadata.index_time_ms as f64 / 1000.0
    );
}

fn print_zipf(engine: &Engine, top: usize) {
    let terms = engine.zipf.get_sorted_terms();
    for tf in terms.iter().take(top) {
        println!("{:>4}. {} - {}", tf.rank, tf.term, tf.frequency);
    }
}

fn run_query(engine: &Engine, query: &str) {
    let started = std::time::Instant::now();
    let hits = engine.search(query, 10);
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;

    println!("{} results ({elapsed:.2} ms)", hits.len());
    for (i, hit) in hits.iter().enumerate() {
        println!("{:>2}. {} (score: {:.4})", i + 1, hit.url, hit.score);
    }
}
