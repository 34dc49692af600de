//! # Lottie Optimizer Orchestrator
//!
//! Orchestratore principale: collega walker, loader, recompressor e writer.
//!
//! ## Flusso per ogni run:
//! 1. Risolve TUTTI i path CLI (un path invalido interrompe prima di scrivere)
//! 2. Controlla la disponibilità di cwebp e pngquant (solo warning)
//! 3. Per ogni file, in ordine: load → recompress → save
//! 4. Stampa le statistiche finali
//!
//! I file sono elaborati uno alla volta; nessuno stato del documento
//! sopravvive tra un file e il successivo.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::codec::CodecRunner;
use crate::config::{Config, ParseErrorPolicy};
use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use crate::lottie::LottieDocument;
use crate::progress::{OptimizationStats, ProgressManager};
use crate::recompressor::{AssetRecompressor, AssetReport};

/// Outcome of processing one candidate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Not `.json`, not a Lottie document, or unparseable under the skip policy
    Skipped,
    /// A Lottie document that was (or, in dry-run, would be) rewritten
    Rewritten {
        original_size: u64,
        new_size: u64,
        report: AssetReport,
    },
}

/// Main orchestrator
pub struct LottieOptimizer {
    config: Config,
    recompressor: AssetRecompressor,
    show_progress: bool,
}

impl LottieOptimizer {
    /// Create a new optimizer instance
    pub fn new(config: Config) -> Result<Self, OptimizeError> {
        config.validate()?;
        let recompressor = AssetRecompressor::new(CodecRunner::new(config.clone()));

        Ok(Self {
            config,
            recompressor,
            show_progress: false,
        })
    }

    /// Draw a progress bar on stderr while running
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run the optimization over files and directories
    pub async fn run(&mut self, paths: &[PathBuf]) -> Result<OptimizationStats, OptimizeError> {
        let start_time = std::time::Instant::now();

        let files = FileManager::collect_files(paths)?;
        self.log_configuration(&files);
        self.recompressor.runner().check_dependencies();

        let progress = if self.show_progress {
            ProgressManager::new(files.len() as u64)
        } else {
            ProgressManager::hidden()
        };

        let mut stats = OptimizationStats::new();
        for file in &files {
            match self.process_file(file).await? {
                FileOutcome::Skipped => stats.add_skipped(),
                FileOutcome::Rewritten {
                    original_size,
                    new_size,
                    report,
                } => stats.add_rewritten(original_size, new_size, &report),
            }
            progress.update(&file.display().to_string());
        }

        progress.finish(&stats.format_summary());
        self.print_final_stats(&stats, start_time.elapsed().as_secs_f64());

        Ok(stats)
    }

    /// Load, recompress and rewrite a single file
    pub async fn process_file(&mut self, path: &Path) -> Result<FileOutcome, OptimizeError> {
        let Some(mut document) = LottieDocument::load(path, self.config.parse_error_policy).await? else {
            return Ok(FileOutcome::Skipped);
        };

        let original_size = tokio::fs::metadata(path).await?.len();
        let report = self.recompressor.recompress(&mut document).await?;

        let new_size = if self.config.dry_run {
            document
                .to_minified()
                .map_err(|source| OptimizeError::Json {
                    path: path.to_path_buf(),
                    source,
                })?
                .len() as u64
        } else {
            document.save(path).await?
        };

        info!(
            "{} {}: {} -> {} ({:.1}% smaller, {}/{} images recompressed)",
            if self.config.dry_run { "Would rewrite" } else { "Rewrote" },
            path.display(),
            FileManager::format_size(original_size),
            FileManager::format_size(new_size),
            FileManager::calculate_reduction(original_size, new_size),
            report.assets_recompressed,
            report.assets_examined,
        );

        Ok(FileOutcome::Rewritten {
            original_size,
            new_size,
            report,
        })
    }

    fn log_configuration(&self, files: &[PathBuf]) {
        debug!("WebP encoder: {}", self.config.webp_encoder);
        debug!("PNG quantizer: {}", self.config.png_quantizer);
        if self.config.parse_error_policy == ParseErrorPolicy::Skip {
            info!("Unparseable JSON files will be skipped");
        }
        if self.config.dry_run {
            info!("Dry run mode: No files will be modified");
        }
        info!("Found {} candidate files", files.len());
    }

    fn print_final_stats(&self, stats: &OptimizationStats, elapsed_secs: f64) {
        info!("{}", stats.format_summary());
        if stats.unavailable_codec_runs > 0 {
            warn!(
                "{} codec invocations could not start; some images were left uncompressed",
                stats.unavailable_codec_runs
            );
        }
        info!("Completed in {:.2}s", elapsed_secs);
    }
}
