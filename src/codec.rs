//! # External Codec Module
//!
//! Questo modulo orchestra i due codec esterni usati per ricomprimere le
//! immagini embedded. Nessuna elaborazione di immagini avviene in memoria:
//! i byte vengono passati ai tool e il loro stdout viene raccolto.
//!
//! ## Codec Supportati
//!
//! | Codec     | Sorgenti | Output | Input          | Argomenti fissi                                  |
//! |-----------|----------|--------|----------------|--------------------------------------------------|
//! | cwebp     | tutte    | webp   | file temporaneo | `-quiet -q 75 -m 6 -o - -- <file>`              |
//! | pngquant  | solo png | png    | stdin          | `--quality=60-80 --speed=1 --strip --skip-if-larger -` |
//!
//! ## Esiti
//!
//! Ogni invocazione produce un [`CodecOutcome`]:
//! - **Improved**: exit 0 e output strettamente più piccolo dell'originale
//! - **NoImprovement**: exit 0 ma output non più piccolo (o vuoto)
//! - **Failed**: exit code diverso da 0 (pngquant esce con 98/99 quando salta)
//! - **Unavailable**: il binario non può essere avviato
//!
//! Solo `Improved` partecipa alla scelta finale. Un codec mancante non
//! interrompe mai il batch, ma viene segnalato nel log (una volta per codec)
//! e conteggiato nelle statistiche.
//!
//! ## File temporaneo
//!
//! cwebp legge da un file: i byte vengono scritti in un `NamedTempFile`
//! che viene rimosso dal suo `Drop` su ogni percorso di uscita
//! (successo, exit code non zero, errore di spawn o di I/O).

use std::collections::HashSet;
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::{Output, Stdio};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::OptimizeError;
use crate::tool_resolver::ToolPathResolver;

/// WebP quality passed to cwebp (`-q`)
pub const WEBP_QUALITY: u8 = 75;
/// WebP compression effort passed to cwebp (`-m`, 0 = fast, 6 = slowest)
pub const WEBP_EFFORT: u8 = 6;
/// Quality range passed to pngquant
pub const PNG_QUALITY_RANGE: &str = "60-80";
/// Speed passed to pngquant (1 = slowest search, smallest output)
pub const PNG_SPEED: u8 = 1;

/// An external image compressor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Webp,
    PngQuant,
}

impl Codec {
    /// All codecs, in the order they run for one asset
    pub const RUN_ORDER: [Codec; 2] = [Codec::Webp, Codec::PngQuant];

    /// Format token written into the rewritten data URI
    pub fn output_format(&self) -> &'static str {
        match self {
            Codec::Webp => "webp",
            Codec::PngQuant => "png",
        }
    }

    /// Whether this codec is attempted for a source format token
    pub fn applies_to(&self, source_format: &str) -> bool {
        match self {
            Codec::Webp => true,
            Codec::PngQuant => source_format == "png",
        }
    }

    /// Lower rank wins when two results have the same size
    pub fn tie_rank(&self) -> u8 {
        match self {
            Codec::PngQuant => 0,
            Codec::Webp => 1,
        }
    }

    /// Configured binary for this codec
    pub fn binary<'a>(&self, config: &'a Config) -> &'a str {
        match self {
            Codec::Webp => &config.webp_encoder,
            Codec::PngQuant => &config.png_quantizer,
        }
    }

    /// Fixed command line; `input` is the file cwebp reads from
    pub fn args(&self, input: &Path) -> Vec<OsString> {
        match self {
            Codec::Webp => {
                let mut args: Vec<OsString> = [
                    "-quiet".to_string(),
                    "-q".to_string(),
                    WEBP_QUALITY.to_string(),
                    "-m".to_string(),
                    WEBP_EFFORT.to_string(),
                    "-o".to_string(),
                    "-".to_string(),
                    "--".to_string(),
                ]
                .into_iter()
                .map(OsString::from)
                .collect();
                args.push(input.as_os_str().to_owned());
                args
            }
            Codec::PngQuant => [
                format!("--quality={}", PNG_QUALITY_RANGE),
                format!("--speed={}", PNG_SPEED),
                "--strip".to_string(),
                "--skip-if-larger".to_string(),
                "-".to_string(),
            ]
            .into_iter()
            .map(OsString::from)
            .collect(),
        }
    }
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Codec::Webp => write!(f, "WebP"),
            Codec::PngQuant => write!(f, "pngquant"),
        }
    }
}

/// Result of one codec invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecOutcome {
    /// Strictly smaller output
    Improved(Vec<u8>),
    /// Ran fine but did not shrink the payload
    NoImprovement,
    /// Non-zero exit code (`None` when killed by a signal)
    Failed(Option<i32>),
    /// The binary could not be started
    Unavailable,
}

impl CodecOutcome {
    fn judge(output: Output, original_len: usize) -> Self {
        if !output.status.success() {
            return CodecOutcome::Failed(output.status.code());
        }
        if !output.stdout.is_empty() && output.stdout.len() < original_len {
            CodecOutcome::Improved(output.stdout)
        } else {
            CodecOutcome::NoImprovement
        }
    }
}

/// Runs the external codecs with the configured binaries
pub struct CodecRunner {
    config: Config,
    reported_unavailable: HashSet<Codec>,
}

impl CodecRunner {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            reported_unavailable: HashSet::new(),
        }
    }

    /// Checks which codec binaries can be found before a run.
    ///
    /// Missing codecs are logged, never fatal: assets they would have
    /// handled are simply left as they are.
    ///
    /// # Returns
    /// * `Vec<Codec>` - The codecs whose binaries were not found
    pub fn check_dependencies(&self) -> Vec<Codec> {
        let resolver = ToolPathResolver::new();
        let mut missing = Vec::new();

        for codec in Codec::RUN_ORDER {
            match resolver.check_tool_with_instructions(codec.binary(&self.config)) {
                Ok(path) => debug!("{} codec available at {:?}", codec, path),
                Err(msg) => {
                    warn!("{}", OptimizeError::MissingDependency(msg));
                    missing.push(codec);
                }
            }
        }

        if missing.len() == Codec::RUN_ORDER.len() {
            error!("No image codec available: embedded images will be left uncompressed");
        }

        missing
    }

    /// Run one codec over raw image bytes
    pub async fn run(&mut self, codec: Codec, input: &[u8]) -> Result<CodecOutcome, OptimizeError> {
        let start_time = std::time::Instant::now();
        let output = match codec {
            Codec::Webp => self.encode_webp(input).await?,
            Codec::PngQuant => self.quantize_png(input).await?,
        };

        let outcome = match output {
            Some(output) => CodecOutcome::judge(output, input.len()),
            None => {
                self.report_unavailable(codec);
                CodecOutcome::Unavailable
            }
        };

        match &outcome {
            CodecOutcome::Improved(bytes) => debug!(
                "{} shrank {} -> {} bytes in {:?}",
                codec,
                input.len(),
                bytes.len(),
                start_time.elapsed()
            ),
            CodecOutcome::NoImprovement => debug!("{} did not shrink {} bytes", codec, input.len()),
            CodecOutcome::Failed(code) => debug!("{} exited with {:?}", codec, code),
            CodecOutcome::Unavailable => {}
        }

        Ok(outcome)
    }

    /// cwebp reads the image from a scoped temporary file
    async fn encode_webp(&self, input: &[u8]) -> Result<Option<Output>, OptimizeError> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(input)?;
        temp.flush()?;

        let binary = Codec::Webp.binary(&self.config);
        let spawned = Command::new(binary)
            .args(Codec::Webp.args(temp.path()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match spawned {
            Ok(child) => child,
            Err(e) => {
                debug!("Failed to start {}: {}", binary, e);
                return Ok(None);
            }
        };

        let output = child.wait_with_output().await?;
        log_stderr(binary, &output);
        // temp is removed here, after cwebp has exited
        drop(temp);
        Ok(Some(output))
    }

    /// pngquant reads the image from stdin
    async fn quantize_png(&self, input: &[u8]) -> Result<Option<Output>, OptimizeError> {
        let binary = Codec::PngQuant.binary(&self.config);
        let spawned = Command::new(binary)
            .args(Codec::PngQuant.args(Path::new("-")))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                debug!("Failed to start {}: {}", binary, e);
                return Ok(None);
            }
        };

        // Feed stdin while stdout is drained so neither pipe can fill up
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        if let Err(e) = fed {
            // pngquant may exit before reading everything; its exit status decides
            debug!("Writing to {} stdin failed: {}", binary, e);
        }
        log_stderr(binary, &output);
        Ok(Some(output))
    }

    fn report_unavailable(&mut self, codec: Codec) {
        if self.reported_unavailable.insert(codec) {
            let binary = codec.binary(&self.config);
            warn!(
                "{} could not be started; {} recompression is disabled for this run ({})",
                binary,
                codec,
                ToolPathResolver::new().install_instructions(binary)
            );
        }
    }
}

fn log_stderr(binary: &str, output: &Output) {
    if !output.stderr.is_empty() {
        debug!("{} stderr: {}", binary, String::from_utf8_lossy(&output.stderr).trim_end());
    }
}
