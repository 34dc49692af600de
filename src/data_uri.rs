//! # Data URI Module
//!
//! Parsing and encoding of the `data:image/<format>;base64,<data>` strings
//! Lottie uses for embedded image assets.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::Engine;
use regex::Regex;
use std::sync::OnceLock;

/// Standard alphabet and padding, but non-zero bits after the last symbol are
/// ignored, as encoders in the wild emit them.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

fn data_uri_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^data:image/(?P<format>\w+);base64,(?P<data>\S+)")
            .expect("data URI regex is valid")
    })
}

/// The two textual parts of an image data URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri<'a> {
    /// Image format token, e.g. `png`
    pub format: &'a str,
    /// Base64 payload, still encoded
    pub data: &'a str,
}

impl<'a> DataUri<'a> {
    /// Match the prefix of `value` against the image data URI shape.
    ///
    /// Only the start is anchored: trailing text after the first whitespace
    /// is ignored, as is any text after a complete match.
    pub fn parse(value: &'a str) -> Option<Self> {
        let captures = data_uri_regex().captures(value)?;
        Some(Self {
            format: captures.name("format")?.as_str(),
            data: captures.name("data")?.as_str(),
        })
    }

    /// Decode the base64 payload
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        LENIENT.decode(self.data)
    }
}

/// Build `data:image/<format>;base64,<data>` for raw image bytes
pub fn encode_image(format: &str, data: &[u8]) -> String {
    format!("data:image/{};base64,{}", format, STANDARD.encode(data))
}
