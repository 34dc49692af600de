//! # Lottie Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom
//! - `file_manager`: Risoluzione path e discovery dei file
//! - `lottie`: Caricamento, validazione e riscrittura dei documenti
//! - `data_uri`: Parsing/encoding dei data URI base64
//! - `codec`: Invocazione di cwebp e pngquant
//! - `recompressor`: Scelta del miglior output per ogni asset embedded
//! - `tool_resolver`: Ricerca dei binari esterni
//! - `optimizer`: Orchestratore principale del processo
//! - `progress`: Progress tracking e statistiche
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use lottie_optimizer::{Config, LottieOptimizer};
//!
//! let mut optimizer = LottieOptimizer::new(Config::default())?;
//! let stats = optimizer.run(&[path]).await?;
//! ```

pub mod codec;
pub mod config;
pub mod data_uri;
pub mod error;
pub mod file_manager;
pub mod lottie;
pub mod optimizer;
pub mod progress;
pub mod recompressor;
pub mod tool_resolver;

pub use config::{Config, ParseErrorPolicy};
pub use error::OptimizeError;
pub use lottie::LottieDocument;
pub use optimizer::LottieOptimizer;
pub use progress::OptimizationStats;
