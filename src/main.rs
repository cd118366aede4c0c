//! Domain Prober - find live websites among generated domain names
//!
//! Walks a word list and then every short name combination, probes each
//! candidate over HTTP(S) and keeps the ones that serve real content.

use clap::{ArgAction, Parser};
use domain_prober::{
    config_error,
    domain::parse_tlds,
    types::{DEFAULT_EMPTY_FILE, DEFAULT_HTML_FILE},
    Candidates, Charset, ComboGenerator, DictionaryGenerator, HttpProber, ProbeConfig,
    Result, ResultStore, RunSummary, ScanConfig, Scanner, StoreConfig,
};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Probe generated domain names and list the ones with live content
#[derive(Parser, Debug)]
#[command(name = "domain-prober", version, about, long_about = None)]
struct Cli {
    /// Word list, one word per line
    #[arg(long, value_name = "PATH", env = "DOMAIN_PROBER_DICT")]
    dict: PathBuf,

    /// Length of generated combinations (0 skips the combination phase)
    #[arg(long, default_value_t = 5, env = "DOMAIN_PROBER_COMBO_LENGTH")]
    combo_length: usize,

    /// Comma separated TLDs, or a preset: popular, startup, enterprise, country
    #[arg(long, default_value = "com", env = "DOMAIN_PROBER_TLDS")]
    tlds: String,

    /// HTML viewer page for found domains
    #[arg(long, value_name = "PATH", default_value = DEFAULT_HTML_FILE, env = "DOMAIN_PROBER_HTML")]
    html: PathBuf,

    /// JSON data file read by the viewer [default: domains.json next to --html]
    #[arg(long, value_name = "PATH", env = "DOMAIN_PROBER_DATA")]
    data: Option<PathBuf>,

    /// Known-empty domains, one per line
    #[arg(long, value_name = "PATH", default_value = DEFAULT_EMPTY_FILE, env = "DOMAIN_PROBER_EMPTY_FILE")]
    empty_file: PathBuf,

    /// Concurrent probes
    #[arg(long, default_value_t = 10, env = "DOMAIN_PROBER_WORKERS")]
    workers: usize,

    /// Seconds between cleanup passes (0 disables them)
    #[arg(long, value_name = "SECONDS", default_value_t = 60, env = "DOMAIN_PROBER_CLEANUP_INTERVAL")]
    cleanup_interval: u64,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 5, env = "DOMAIN_PROBER_TIMEOUT")]
    timeout: u64,

    /// Characters used for combinations
    #[arg(long, value_enum, default_value_t = Charset::Alphanumeric)]
    charset: Charset,

    /// Minimum characters of visible text for a page to count as found
    #[arg(long, default_value_t = 1)]
    min_text: usize,

    /// Keep terminal output on cleanup passes
    #[arg(long)]
    no_clear: bool,

    /// Hide the progress spinner
    #[arg(long)]
    no_progress: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the library
    if let Err(e) = domain_prober::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "domain_prober=info",
        1 => "domain_prober=debug",
        _ => "domain_prober=trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Main probing workflow
async fn run(cli: Cli) -> Result<()> {
    if cli.timeout == 0 {
        return Err(config_error!("--timeout must be at least 1 second"));
    }

    let tlds = parse_tlds(&cli.tlds)?;
    let dictionary = DictionaryGenerator::from_file(&cli.dict, tlds.clone())?;
    let combo = (cli.combo_length > 0).then(|| ComboGenerator::new(cli.combo_length, cli.charset, tlds.clone()));
    let candidates = Candidates::new(Some(dictionary), combo);

    let mut store_config = StoreConfig::with_html(&cli.html).empty_path(&cli.empty_file);
    if let Some(data) = &cli.data {
        store_config = store_config.data_path(data);
    }
    let store = ResultStore::open(store_config)?;

    let prober = HttpProber::with_config(ProbeConfig {
        timeout: Duration::from_secs(cli.timeout),
        min_text_len: cli.min_text,
        ..Default::default()
    })?;

    let scanner = Scanner::new(
        Arc::new(prober),
        store.clone(),
        ScanConfig {
            workers: cli.workers,
            cleanup_interval: Duration::from_secs(cli.cleanup_interval),
            clear_terminal: !cli.no_clear,
            show_progress: !cli.no_progress,
            ..Default::default()
        },
    )?;

    let shutdown = scanner.shutdown_flag();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if request_shutdown(&shutdown) {
                eprintln!("⏹️  Second interrupt, exiting without waiting");
                process::exit(130);
            }
            tracing::warn!("Interrupt received, waiting for in-flight probes (Ctrl-C again to quit now)");
        }
    });

    println!("🔎 Domain Prober");
    println!("═══════════════════════════════════");
    println!("   TLDs: {}", tlds.join(", "));
    println!("   Candidates: {}", candidates.total());
    println!("   Workers: {}", cli.workers);
    println!("   Known empty: {}", store.empty_count());
    println!("   Already found: {}", store.found_count());
    println!();

    let total = candidates.total();
    let summary = scanner.run(candidates, Some(total)).await?;
    print_summary(&summary, &store);

    Ok(())
}

/// Set the shutdown flag. Returns `true` if it was already set.
fn request_shutdown(flag: &AtomicBool) -> bool {
    flag.swap(true, Ordering::SeqCst)
}

fn print_summary(summary: &RunSummary, store: &ResultStore) {
    println!();
    if summary.interrupted {
        println!("⏹️  Probing interrupted.");
    } else {
        println!("✅ Probing complete.");
    }
    println!("📈 Summary:");
    println!("   🌐 Found: {}", summary.found);
    println!("   ∅  Empty: {}", summary.empty);
    println!("   ⏭️  Skipped: {}", summary.skipped);
    println!("   📊 Probed: {}", summary.probed);
    println!("   ⏱️  Time: {}s ({:.1}/s)", summary.elapsed().num_seconds(), summary.probes_per_second());
    println!();
    println!("   Results: {} ({} domains)", store.config().html_path.display(), store.found_count());
    println!("   Empty list: {}", store.config().empty_path.display());
}
