//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con i parametri del run
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento della configurazione da file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `webp_encoder`: Binario dell'encoder WebP (default: "cwebp")
//! - `png_quantizer`: Binario del quantizzatore PNG (default: "pngquant")
//! - `parse_error_policy`: Cosa fare con JSON non parsabili (default: strict)
//! - `dry_run`: Flag per simulazione senza modifiche (default: false)
//!
//! La qualità dei codec NON è configurabile: gli argomenti di cwebp e
//! pngquant sono costanti in `codec`.
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     parse_error_policy: ParseErrorPolicy::Skip,
//!     dry_run: true,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::OptimizeError;

/// What to do with a `.json` file that is not valid JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Abort the whole run
    #[default]
    Strict,
    /// Log a warning and leave the file untouched
    Skip,
}

/// Configuration for Lottie optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WebP encoder binary (name on PATH or full path)
    pub webp_encoder: String,
    /// PNG quantizer binary (name on PATH or full path)
    pub png_quantizer: String,
    /// Handling of unparseable `.json` files
    pub parse_error_policy: ParseErrorPolicy,
    /// Dry run - don't actually rewrite files
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webp_encoder: "cwebp".to_string(),
            png_quantizer: "pngquant".to_string(),
            parse_error_policy: ParseErrorPolicy::Strict,
            dry_run: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.webp_encoder.trim().is_empty() {
            return Err(OptimizeError::InvalidConfig("WebP encoder binary must not be empty".to_string()));
        }

        if self.png_quantizer.trim().is_empty() {
            return Err(OptimizeError::InvalidConfig("PNG quantizer binary must not be empty".to_string()));
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}
