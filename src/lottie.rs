//! # Lottie Document Module
//!
//! Loading, validation and minified rewriting of Lottie JSON documents.
//!
//! A document is only recognised by the presence of its required top-level
//! fields; values are not type-checked and unknown fields are carried through
//! untouched. Key order survives the round trip (`serde_json` is built with
//! `preserve_order`).

use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};

use crate::config::ParseErrorPolicy;
use crate::error::OptimizeError;
use crate::file_manager::FileManager;

/// Top-level fields every Lottie animation carries
pub const REQUIRED_FIELDS: [&str; 5] = ["v", "fr", "w", "h", "layers"];

/// A parsed Lottie animation
#[derive(Debug, Clone, PartialEq)]
pub struct LottieDocument {
    root: Map<String, Value>,
}

impl LottieDocument {
    /// Wrap a parsed JSON value if it looks like a Lottie animation
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(root) if REQUIRED_FIELDS.iter().all(|field| root.contains_key(*field)) => {
                Some(Self { root })
            }
            _ => None,
        }
    }

    /// Load a document from disk.
    ///
    /// Returns `Ok(None)` for files that are skipped: names without the
    /// `.json` suffix, JSON that is not a Lottie document, and unparseable
    /// JSON under [`ParseErrorPolicy::Skip`].
    pub async fn load(path: &Path, policy: ParseErrorPolicy) -> Result<Option<Self>, OptimizeError> {
        if !FileManager::is_json(path) {
            return Ok(None);
        }

        let bytes = tokio::fs::read(path).await?;
        let value = match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => value,
            Err(source) => match policy {
                ParseErrorPolicy::Strict => {
                    return Err(OptimizeError::Json {
                        path: path.to_path_buf(),
                        source,
                    })
                }
                ParseErrorPolicy::Skip => {
                    warn!("Skipping unparseable JSON {}: {}", path.display(), source);
                    return Ok(None);
                }
            },
        };

        let document = Self::from_value(value);
        if document.is_none() {
            debug!("Not a Lottie document, skipping: {}", path.display());
        }
        Ok(document)
    }

    /// Mutable access to the `assets` array, if present
    pub fn assets_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.root.get_mut("assets").and_then(Value::as_array_mut)
    }

    /// Compact serialization: no whitespace, original key order, non-ASCII kept as is
    pub fn to_minified(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.root)
    }

    /// Overwrite `path` with the minified document, returning the bytes written
    pub async fn save(&self, path: &Path) -> Result<u64, OptimizeError> {
        let content = self.to_minified().map_err(|source| OptimizeError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tokio::fs::write(path, content.as_bytes()).await?;
        Ok(content.len() as u64)
    }
}
