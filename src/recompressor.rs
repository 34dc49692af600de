//! # Asset Recompressor Module
//!
//! Walks the `assets` array of a Lottie document and replaces each embedded
//! image with the smallest successful codec output.
//!
//! ## Regole per asset
//!
//! 1. Solo gli asset con `e == 1` (intero) sono embedded
//! 2. `p` deve essere un data URI `data:image/<format>;base64,<data>`
//! 3. cwebp viene sempre tentato, pngquant solo se `<format>` è `png`
//! 4. Vince l'output più piccolo; a parità vince png
//! 5. Se nessun codec migliora, `p` resta invariato
//!
//! Tutto il resto dell'asset (e del documento) non viene toccato.

use serde_json::Value;
use tracing::{debug, warn};

use crate::codec::{Codec, CodecOutcome, CodecRunner};
use crate::data_uri::{encode_image, DataUri};
use crate::error::OptimizeError;
use crate::lottie::LottieDocument;

/// A successful codec result eligible for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub codec: Codec,
    pub bytes: Vec<u8>,
}

/// Pick the smallest candidate; equal sizes go to the lower tie rank (png)
pub fn select_best(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates
        .into_iter()
        .min_by_key(|c| (c.bytes.len(), c.codec.tie_rank()))
}

/// What happened to the assets of one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReport {
    /// Embedded assets with a decodable image data URI
    pub assets_examined: usize,
    /// Assets whose `p` was rewritten
    pub assets_recompressed: usize,
    /// Decoded bytes of the rewritten assets, before
    pub image_bytes_before: u64,
    /// Decoded bytes of the rewritten assets, after
    pub image_bytes_after: u64,
    pub webp_wins: usize,
    pub png_wins: usize,
    /// Codec invocations that could not start
    pub unavailable: usize,
}

/// Recompresses embedded image assets in place
pub struct AssetRecompressor {
    runner: CodecRunner,
}

impl AssetRecompressor {
    pub fn new(runner: CodecRunner) -> Self {
        Self { runner }
    }

    /// Borrow the codec runner, e.g. for a dependency check
    pub fn runner(&self) -> &CodecRunner {
        &self.runner
    }

    /// Mutate every embedded image asset of `document` in place
    pub async fn recompress(&mut self, document: &mut LottieDocument) -> Result<AssetReport, OptimizeError> {
        let mut report = AssetReport::default();

        let Some(assets) = document.assets_mut() else {
            return Ok(report);
        };

        for (index, asset) in assets.iter_mut().enumerate() {
            self.recompress_asset(index, asset, &mut report).await?;
        }

        Ok(report)
    }

    async fn recompress_asset(
        &mut self,
        index: usize,
        asset: &mut Value,
        report: &mut AssetReport,
    ) -> Result<(), OptimizeError> {
        if !is_embedded(asset) {
            return Ok(());
        }

        let Some(payload) = asset.get("p").and_then(Value::as_str) else {
            return Ok(());
        };
        let Some(uri) = DataUri::parse(payload) else {
            debug!("Asset {} payload is not an image data URI, skipping", index);
            return Ok(());
        };
        let source_format = uri.format.to_string();
        let original = match uri.decode() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Asset {} has an undecodable base64 payload, skipping: {}", index, e);
                return Ok(());
            }
        };
        report.assets_examined += 1;

        let mut candidates = Vec::new();
        for codec in Codec::RUN_ORDER {
            if !codec.applies_to(&source_format) {
                continue;
            }
            match self.runner.run(codec, &original).await? {
                CodecOutcome::Improved(bytes) => candidates.push(Candidate { codec, bytes }),
                CodecOutcome::Unavailable => report.unavailable += 1,
                CodecOutcome::NoImprovement | CodecOutcome::Failed(_) => {}
            }
        }

        let Some(best) = select_best(candidates) else {
            debug!("Asset {} ({}, {} bytes) left unchanged", index, source_format, original.len());
            return Ok(());
        };

        debug!(
            "Asset {} ({}) {} -> {} bytes as {}",
            index,
            source_format,
            original.len(),
            best.bytes.len(),
            best.codec.output_format()
        );

        report.assets_recompressed += 1;
        report.image_bytes_before += original.len() as u64;
        report.image_bytes_after += best.bytes.len() as u64;
        match best.codec {
            Codec::Webp => report.webp_wins += 1,
            Codec::PngQuant => report.png_wins += 1,
        }

        if let Some(object) = asset.as_object_mut() {
            object.insert(
                "p".to_string(),
                Value::String(encode_image(best.codec.output_format(), &best.bytes)),
            );
        }
        Ok(())
    }
}

/// Only the integer `1` marks an inlined payload
fn is_embedded(asset: &Value) -> bool {
    asset.get("e").and_then(Value::as_i64) == Some(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(codec: Codec, len: usize) -> Candidate {
        Candidate {
            codec,
            bytes: vec![0u8; len],
        }
    }

    #[test]
    fn test_select_best_prefers_smaller() {
        let best = select_best(vec![candidate(Codec::Webp, 10), candidate(Codec::PngQuant, 12)]).unwrap();
        assert_eq!(best.codec, Codec::Webp);

        let best = select_best(vec![candidate(Codec::Webp, 12), candidate(Codec::PngQuant, 10)]).unwrap();
        assert_eq!(best.codec, Codec::PngQuant);
    }

    #[test]
    fn test_select_best_tie_goes_to_png() {
        let best = select_best(vec![candidate(Codec::Webp, 10), candidate(Codec::PngQuant, 10)]).unwrap();
        assert_eq!(best.codec, Codec::PngQuant);
    }

    #[test]
    fn test_select_best_single_and_none() {
        assert_eq!(select_best(vec![candidate(Codec::Webp, 3)]).unwrap().codec, Codec::Webp);
        assert!(select_best(Vec::new()).is_none());
    }

    #[test]
    fn test_is_embedded() {
        assert!(is_embedded(&json!({"e": 1})));
        assert!(!is_embedded(&json!({"e": 0})));
        assert!(!is_embedded(&json!({"e": 1.0})));
        assert!(!is_embedded(&json!({"e": true})));
        assert!(!is_embedded(&json!({"e": "1"})));
        assert!(!is_embedded(&json!({"p": "data:image/png;base64,AAAA"})));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use crate::codec::fake_tools;
        use crate::config::Config;
        use std::path::Path;
        use tempfile::TempDir;

        const ORIGINAL: &[u8] = b"0123456789abcdef";

        fn document(assets: Value) -> LottieDocument {
            LottieDocument::from_value(json!({
                "v": "5.5.0", "fr": 30, "w": 100, "h": 100, "layers": [],
                "assets": assets
            }))
            .unwrap()
        }

        fn recompressor(webp: &Path, png: &Path) -> AssetRecompressor {
            AssetRecompressor::new(CodecRunner::new(Config {
                webp_encoder: webp.to_string_lossy().into_owned(),
                png_quantizer: png.to_string_lossy().into_owned(),
                ..Default::default()
            }))
        }

        fn assets_of(document: &LottieDocument) -> Value {
            let root: Value = serde_json::from_str(&document.to_minified().unwrap()).unwrap();
            root["assets"].clone()
        }

        fn payload(document: &LottieDocument, index: usize) -> String {
            assets_of(document)[index]["p"].as_str().unwrap().to_string()
        }

        #[tokio::test]
        async fn test_smaller_codec_wins() {
            let dir = TempDir::new().unwrap();
            let webp = fake_tools::printing(dir.path(), "cwebp", "WEBP", 0);
            let png = fake_tools::printing(dir.path(), "pngquant", "PNG", 0);
            let mut doc = document(json!([{"id": "img", "e": 1, "p": encode_image("png", ORIGINAL)}]));

            let report = recompressor(&webp, &png).recompress(&mut doc).await.unwrap();

            assert_eq!(payload(&doc, 0), encode_image("png", b"PNG"));
            assert_eq!(report.assets_recompressed, 1);
            assert_eq!(report.png_wins, 1);
            assert_eq!(report.image_bytes_before, ORIGINAL.len() as u64);
            assert_eq!(report.image_bytes_after, 3);
        }

        #[tokio::test]
        async fn test_equal_sizes_resolve_to_png() {
            let dir = TempDir::new().unwrap();
            let webp = fake_tools::printing(dir.path(), "cwebp", "WEBP", 0);
            let png = fake_tools::printing(dir.path(), "pngquant", "PNGQ", 0);
            let mut doc = document(json!([{"e": 1, "p": encode_image("png", ORIGINAL)}]));

            recompressor(&webp, &png).recompress(&mut doc).await.unwrap();

            assert_eq!(payload(&doc, 0), encode_image("png", b"PNGQ"));
        }

        #[tokio::test]
        async fn test_non_png_never_runs_quantizer() {
            let dir = TempDir::new().unwrap();
            let marker = dir.path().join("pngquant-ran");
            let webp = fake_tools::printing(dir.path(), "cwebp", "W", 0);
            let png = fake_tools::script(
                dir.path(),
                "pngquant",
                &format!("touch '{}'\nprintf 'P'", marker.display()),
            );
            let mut doc = document(json!([
                {"e": 1, "p": encode_image("jpeg", ORIGINAL)},
                {"e": 1, "p": encode_image("webp", ORIGINAL)}
            ]));

            recompressor(&webp, &png).recompress(&mut doc).await.unwrap();

            assert!(!marker.exists());
            assert_eq!(payload(&doc, 0), encode_image("webp", b"W"));
            assert_eq!(payload(&doc, 1), encode_image("webp", b"W"));
        }

        #[tokio::test]
        async fn test_one_codec_failing_leaves_the_other_eligible() {
            let dir = TempDir::new().unwrap();
            let webp = fake_tools::printing(dir.path(), "cwebp", "W", 2);
            let png = fake_tools::printing(dir.path(), "pngquant", "PNG", 0);
            let mut doc = document(json!([{"e": 1, "p": encode_image("png", ORIGINAL)}]));

            recompressor(&webp, &png).recompress(&mut doc).await.unwrap();
            assert_eq!(payload(&doc, 0), encode_image("png", b"PNG"));

            let missing = dir.path().join("missing-pngquant");
            let webp = fake_tools::printing(dir.path(), "cwebp2", "W", 0);
            let mut doc = document(json!([{"e": 1, "p": encode_image("png", ORIGINAL)}]));

            let report = recompressor(&webp, &missing).recompress(&mut doc).await.unwrap();
            assert_eq!(payload(&doc, 0), encode_image("webp", b"W"));
            assert_eq!(report.unavailable, 1);
        }

        #[tokio::test]
        async fn test_no_improvement_leaves_payload_unchanged() {
            let dir = TempDir::new().unwrap();
            let webp = fake_tools::printing(dir.path(), "cwebp", "0123456789abcdefXX", 0);
            let png = fake_tools::printing(dir.path(), "pngquant", "", 98);
            let original = encode_image("png", ORIGINAL);
            let mut doc = document(json!([{"e": 1, "p": original}]));

            let report = recompressor(&webp, &png).recompress(&mut doc).await.unwrap();

            assert_eq!(payload(&doc, 0), original);
            assert_eq!(report.assets_examined, 1);
            assert_eq!(report.assets_recompressed, 0);
        }

        #[tokio::test]
        async fn test_untouched_assets() {
            let dir = TempDir::new().unwrap();
            let webp = fake_tools::printing(dir.path(), "cwebp", "W", 0);
            let png = fake_tools::printing(dir.path(), "pngquant", "P", 0);
            let assets = json!([
                {"id": "ext", "e": 0, "u": "images/", "p": encode_image("png", ORIGINAL)},
                {"id": "noflag", "p": encode_image("png", ORIGINAL)},
                {"id": "file", "e": 1, "p": "img_0.png"},
                {"id": "bad64", "e": 1, "p": "data:image/png;base64,@@@@"},
                {"id": "nonstr", "e": 1, "p": 42},
                {"id": "comp", "layers": []}
            ]);
            let mut doc = document(assets.clone());

            let report = recompressor(&webp, &png).recompress(&mut doc).await.unwrap();

            assert_eq!(assets_of(&doc), assets);
            assert_eq!(report, AssetReport::default());
        }

        #[tokio::test]
        async fn test_document_without_assets() {
            let dir = TempDir::new().unwrap();
            let webp = fake_tools::printing(dir.path(), "cwebp", "W", 0);
            let mut doc = LottieDocument::from_value(
                json!({"v": "5.5.0", "fr": 30, "w": 1, "h": 1, "layers": []}),
            )
            .unwrap();
            let before = doc.clone();

            recompressor(&webp, &webp).recompress(&mut doc).await.unwrap();
            assert_eq!(doc, before);
        }
    }
}
