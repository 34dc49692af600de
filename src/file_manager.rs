//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery dei candidati.
//!
//! ## Responsabilità:
//! - Risoluzione dei path CLI in una lista piatta di file regolari
//! - Discovery ricorsiva (a qualsiasi profondità) nelle directory
//! - Filtro dei documenti candidati per estensione `.json`
//! - Utilità per calcoli dimensioni e percentuali
//!
//! ## Regole di risoluzione:
//! - **File regolare**: incluso direttamente
//! - **Directory**: tutti i file regolari sotto di essa, nessun filtro per estensione
//! - **Altro** (non esiste, file speciale): `OptimizeError::InvalidPath`, fatale
//!
//! Tutti i path vengono risolti PRIMA di elaborare qualsiasi file, così un
//! path invalido interrompe il run senza aver scritto nulla.
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::collect_files(&[PathBuf::from("animations")])?;
//! for file in files.iter().filter(|f| FileManager::is_json(f)) {
//!     // load document
//! }
//! ```

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::OptimizeError;

/// Manages file discovery and size helpers
pub struct FileManager;

impl FileManager {
    /// Resolve CLI paths to the regular files to attempt, in walk order
    pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, OptimizeError> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_file() {
                files.push(path.clone());
            } else if path.is_dir() {
                files.extend(Self::find_files(path)?);
            } else {
                return Err(OptimizeError::InvalidPath(path.clone()));
            }
        }

        Ok(files)
    }

    /// Find every regular file beneath a directory.
    ///
    /// Symlinks to files are included; symlinked directories are not descended.
    pub fn find_files(dir: &Path) -> Result<Vec<PathBuf>, OptimizeError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let message = e.to_string();
                OptimizeError::Io(
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other(message)),
                )
            })?;
            if entry.path().is_file() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Check if a file name carries the `.json` suffix
    pub fn is_json(path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().ends_with(".json"))
            .unwrap_or(false)
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
