//! # Lottie Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Creazione della configurazione e avvio dell'optimizer
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (path, policy, dry-run, config)
//! 2. Configura il logging (RUST_LOG, altrimenti INFO o DEBUG)
//! 3. Carica la configurazione e applica gli override da CLI
//! 4. Istanzia LottieOptimizer e avvia il processo
//!
//! ## Esempio di utilizzo:
//! ```bash
//! lottie-optimizer assets/animations intro.json --on-parse-error skip
//! ```

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lottie_optimizer::{Config, LottieOptimizer, ParseErrorPolicy};

#[derive(Parser)]
#[command(name = "lottie-optimizer", version)]
#[command(about = "Shrink Lottie animations by recompressing their embedded images")]
struct Args {
    /// Lottie files or directories to process in place
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,

    /// What to do with .json files that are not valid JSON
    #[arg(long, value_enum)]
    on_parse_error: Option<ParseErrorPolicy>,

    /// Dry run - don't actually rewrite files
    #[arg(long)]
    dry_run: bool,

    /// JSON configuration file (codec binaries, policy)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match args.config {
        Some(ref path) => {
            if !path.is_file() {
                return Err(anyhow::anyhow!("Config file does not exist: {}", path.display()));
            }
            Config::from_file(path).await?
        }
        None => Config::default(),
    };
    if let Some(policy) = args.on_parse_error {
        config.parse_error_policy = policy;
    }
    config.dry_run |= args.dry_run;

    let mut optimizer = LottieOptimizer::new(config)?.with_progress(std::io::stderr().is_terminal());
    optimizer.run(&args.paths).await?;

    Ok(())
}
