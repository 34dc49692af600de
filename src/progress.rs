//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche del run.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Tracking statistiche di ottimizzazione (documenti, asset, byte risparmiati)
//! - Conteggio dei codec non disponibili, così un run "senza tool" è visibile
//! - Report finale con statistiche aggregate
//!
//! ## Statistiche tracciate:
//! - **files_scanned**: File candidati visitati
//! - **documents_rewritten**: Documenti Lottie riscritti (minificati)
//! - **files_skipped**: File non `.json`, non Lottie o non parsabili
//! - **assets_examined / assets_recompressed**: Asset embedded visti / sostituiti
//! - **webp_wins / png_wins**: Quale codec ha vinto
//! - **unavailable_codec_runs**: Invocazioni di codec non avviabili
//! - **image_bytes_before / image_bytes_after**: Byte decodificati delle immagini sostituite
//! - **total_original_size / total_new_size**: Byte dei documenti prima/dopo
//!
//! ## Esempio:
//! ```rust,ignore
//! let progress = ProgressManager::new(total_files);
//! let mut stats = OptimizationStats::new();
//!
//! stats.add_rewritten(original_size, new_size, &report);
//! progress.update("anim.json");
//!
//! progress.finish(&stats.format_summary());
//! ```

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::file_manager::FileManager;
use crate::recompressor::AssetReport;

/// Manages progress reporting over candidate files
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr());

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A manager that never draws
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for optimization results
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OptimizationStats {
    pub files_scanned: usize,
    pub documents_rewritten: usize,
    pub files_skipped: usize,
    pub assets_examined: usize,
    pub assets_recompressed: usize,
    pub webp_wins: usize,
    pub png_wins: usize,
    pub unavailable_codec_runs: usize,
    pub image_bytes_before: u64,
    pub image_bytes_after: u64,
    pub total_original_size: u64,
    pub total_new_size: u64,
}

impl OptimizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rewritten(&mut self, original_size: u64, new_size: u64, report: &AssetReport) {
        self.files_scanned += 1;
        self.documents_rewritten += 1;
        self.total_original_size += original_size;
        self.total_new_size += new_size;
        self.assets_examined += report.assets_examined;
        self.assets_recompressed += report.assets_recompressed;
        self.webp_wins += report.webp_wins;
        self.png_wins += report.png_wins;
        self.unavailable_codec_runs += report.unavailable;
        self.image_bytes_before += report.image_bytes_before;
        self.image_bytes_after += report.image_bytes_after;
    }

    pub fn add_skipped(&mut self) {
        self.files_scanned += 1;
        self.files_skipped += 1;
    }

    pub fn total_bytes_saved(&self) -> u64 {
        self.total_original_size.saturating_sub(self.total_new_size)
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_original_size, self.total_new_size)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Scanned: {} files | Rewritten: {} | Skipped: {} | Assets recompressed: {}/{} (webp {}, png {}, images {} -> {}) | Total saved: {} ({:.2}%)",
            self.files_scanned,
            self.documents_rewritten,
            self.files_skipped,
            self.assets_recompressed,
            self.assets_examined,
            self.webp_wins,
            self.png_wins,
            FileManager::format_size(self.image_bytes_before),
            FileManager::format_size(self.image_bytes_after),
            FileManager::format_size(self.total_bytes_saved()),
            self.overall_reduction_percent()
        )
    }
}
