//! OCR capability used to read page regions.

use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A recognized word and the engine's confidence in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrToken {
    /// Recognized text
    pub text: String,
    /// Confidence on the engine's 0-100 scale (may be negative for non-words)
    pub confidence: i32,
}

impl OcrToken {
    /// Create a new token.
    pub fn new(text: impl Into<String>, confidence: i32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Text recognition over a pixel region.
///
/// Implementations return tokens in the engine's recognition order
/// (left-to-right, top-to-bottom). Positional data is not used.
pub trait OcrEngine: Send + Sync {
    /// Engine name for logging.
    fn name(&self) -> &str;

    /// Recognize the words in `region`.
    fn recognize(&self, region: &RgbImage) -> Result<Vec<OcrToken>>;
}

impl<T: OcrEngine + ?Sized> OcrEngine for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recognize(&self, region: &RgbImage) -> Result<Vec<OcrToken>> {
        (**self).recognize(region)
    }
}

/// Tesseract word level in TSV output.
const WORD_LEVEL: &str = "5";

/// OCR through the `tesseract` command-line program.
///
/// The region is piped in as PNG and `tsv` output is read back. By default
/// only word-level rows are returned; [`TesseractCli::with_all_levels`] also
/// keeps the page, block, paragraph and line rows, whose `-1` confidence then
/// counts towards the mean.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: PathBuf,
    language: Option<String>,
    page_segmentation_mode: Option<u8>,
    all_levels: bool,
}

impl TesseractCli {
    /// Use `tesseract` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: None,
            page_segmentation_mode: None,
            all_levels: false,
        }
    }

    /// Use a specific tesseract binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the recognition language (e.g. `"eng"`).
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set tesseract's `--psm` page segmentation mode.
    pub fn with_psm(mut self, psm: u8) -> Self {
        self.page_segmentation_mode = Some(psm);
        self
    }

    /// Return every TSV row, structural rows included, as a token.
    pub fn with_all_levels(mut self) -> Self {
        self.all_levels = true;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["stdin", "stdout"]);
        if let Some(ref lang) = self.language {
            cmd.arg("-l").arg(lang);
        }
        if let Some(psm) = self.page_segmentation_mode {
            cmd.arg("--psm").arg(psm.to_string());
        }
        cmd.arg("tsv");
        cmd
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, region: &RgbImage) -> Result<Vec<OcrToken>> {
        let mut png = Vec::new();
        region.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ocr_error(format!("failed to start {}: {}", self.binary.display(), e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png)?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(ocr_error(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        Ok(if self.all_levels {
            parse_tsv_all_levels(&tsv)
        } else {
            parse_tsv(&tsv)
        })
    }
}

fn ocr_error(message: String) -> Error {
    Error::Ocr { page: 0, message }
}

/// Parse tesseract TSV output into word tokens.
///
/// Rows other than word level and rows with unparsable confidence are
/// skipped. Fractional confidences are truncated.
pub fn parse_tsv(tsv: &str) -> Vec<OcrToken> {
    parse_rows(tsv, |level| level == WORD_LEVEL)
}

/// Parse every row of tesseract TSV output, structural rows included.
pub fn parse_tsv_all_levels(tsv: &str) -> Vec<OcrToken> {
    parse_rows(tsv, |_| true)
}

fn parse_rows(tsv: &str, keep_level: impl Fn(&str) -> bool) -> Vec<OcrToken> {
    tsv.lines()
        .skip_while(|line| line.starts_with("level"))
        .filter_map(|line| {
            let cols: Vec<&str> = line.split('\t').collect();
            if cols.len() < 11 || !keep_level(cols[0]) {
                return None;
            }
            let confidence = cols[10].trim().parse::<f64>().ok()? as i32;
            let text = cols.get(11).copied().unwrap_or_default();
            Some(OcrToken::new(text, confidence))
        })
        .collect()
}
