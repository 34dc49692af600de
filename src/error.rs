//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare gli errori fatali
//! - Fornisce messaggi di errore descrittivi con il path coinvolto
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (lettura/scrittura documenti)
//! - `InvalidPath`: Path CLI che non è né file né directory
//! - `Json`: Documento `.json` non parsabile (policy `strict`)
//! - `InvalidConfig`: Configurazione non valida
//! - `MissingDependency`: Tool esterno mancante (cwebp, pngquant)
//!
//! Gli errori dei codec esterni NON sono qui: un codec che fallisce
//! produce semplicemente "nessun miglioramento" per quell'asset.
//!
//! ## Esempio:
//! ```rust,ignore
//! if !path.is_file() && !path.is_dir() {
//!     return Err(OptimizeError::InvalidPath(path.to_path_buf()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for Lottie optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path is neither a file nor a directory, or does not exist: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Failed to parse JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),
}
