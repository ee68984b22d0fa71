// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HEIC/HEIF to PNG conversion through whichever system converter is present,
// and decoding of input photos into memory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use heictext_core::error::{HeicTextError, Result};
use image::DynamicImage;
use tracing::{debug, info, instrument, warn};

use crate::image::processor::ImageProcessor;
use crate::process::run_tool;

/// Extensions treated as HEIC containers.
pub const HEIC_EXTENSIONS: &[&str] = &["heic", "heif"];

/// Extensions decoded directly with the `image` crate.
pub const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// True when `path` exists and carries a `.heic`/`.heif` extension in any case.
pub fn is_heic_path(path: &Path) -> bool {
    path.is_file()
        && extension_of(path).is_some_and(|ext| HEIC_EXTENSIONS.contains(&ext.as_str()))
}

/// True when the extension is one heictext can process, HEIC or raster.
pub fn is_supported_path(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| {
        HEIC_EXTENSIONS.contains(&ext.as_str()) || RASTER_EXTENSIONS.contains(&ext.as_str())
    })
}

/// External programs able to turn HEIC into PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterTool {
    /// macOS `sips`.
    Sips,
    /// libheif's `heif-convert`.
    HeifConvert,
    /// ImageMagick 7.
    Magick,
}

impl ConverterTool {
    pub const DEFAULT_ORDER: [ConverterTool; 3] = [
        ConverterTool::Sips,
        ConverterTool::HeifConvert,
        ConverterTool::Magick,
    ];

    pub fn program(self) -> &'static str {
        match self {
            Self::Sips => "sips",
            Self::HeifConvert => "heif-convert",
            Self::Magick => "magick",
        }
    }

    fn args(self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.display().to_string();
        let output = output.display().to_string();
        match self {
            Self::Sips => vec!["-s".into(), "format".into(), "png".into(), input, "--out".into(), output],
            Self::HeifConvert | Self::Magick => vec![input, output],
        }
    }
}

impl fmt::Display for ConverterTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Converts HEIC files to PNG with the first converter that works.
#[derive(Debug, Clone)]
pub struct HeicConverter {
    tools: Vec<ConverterTool>,
    timeout: Duration,
}

impl Default for HeicConverter {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl HeicConverter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            tools: ConverterTool::DEFAULT_ORDER.to_vec(),
            timeout,
        }
    }

    /// Restrict or reorder the converters tried.
    pub fn with_tools(mut self, tools: Vec<ConverterTool>) -> Self {
        self.tools = tools;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Convert `input` to a PNG at `output`.
    ///
    /// Converters that are not installed are skipped. When none is installed
    /// the error is [`HeicTextError::ToolMissing`]. When at least one ran but
    /// none produced the file the error is [`HeicTextError::Conversion`]
    /// carrying the last failure.
    #[instrument(skip(self), fields(input = %input.display(), output = %output.display()))]
    pub fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let mut last_failure: Option<String> = None;

        for &tool in &self.tools {
            match run_tool(tool.program(), tool.args(input, output), None, self.timeout) {
                Ok(run) if run.success() && output.is_file() => {
                    info!(%tool, "HEIC converted");
                    return Ok(());
                }
                Ok(run) => {
                    warn!(%tool, code = ?run.status.code(), "Converter failed");
                    last_failure = Some(format!("{tool}: {}", run.stderr_lossy()));
                }
                Err(HeicTextError::ToolMissing { .. }) => {
                    debug!(%tool, "Converter not installed");
                }
                Err(err @ HeicTextError::Timeout { .. }) => {
                    warn!(%tool, "Converter timed out");
                    last_failure = Some(err.to_string());
                }
                Err(err) => return Err(err),
            }
        }

        match last_failure {
            Some(detail) => Err(HeicTextError::Conversion(format!(
                "{}: {detail}",
                input.display()
            ))),
            None => Err(HeicTextError::tool_missing(
                self.tools
                    .first()
                    .map(|tool| tool.program())
                    .unwrap_or("heif-convert"),
                "no HEIC converter (sips, heif-convert, magick) is installed",
            )),
        }
    }

    /// Convert into `scratch_dir`, naming the PNG after the input's stem.
    pub fn convert_into(&self, input: &Path, scratch_dir: &Path) -> Result<PathBuf> {
        let stem = input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("converted");
        let output = scratch_dir.join(format!("{stem}.png"));
        self.convert(input, &output)?;
        Ok(output)
    }
}

/// Decode an input photo into memory.
///
/// HEIC inputs go through `converter` into `scratch_dir` first; other raster
/// formats are decoded directly. Unknown extensions are rejected with
/// [`HeicTextError::UnsupportedInput`].
pub fn load_source(path: &Path, scratch_dir: &Path, converter: &HeicConverter) -> Result<DynamicImage> {
    if !path.is_file() {
        return Err(HeicTextError::UnsupportedInput(format!(
            "{} does not exist",
            path.display()
        )));
    }
    if !is_supported_path(path) {
        return Err(HeicTextError::UnsupportedInput(path.display().to_string()));
    }

    let decodable = if is_heic_path(path) {
        converter.convert_into(path, scratch_dir)?
    } else {
        path.to_path_buf()
    };
    Ok(ImageProcessor::open(&decodable)?.into_dynamic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn heic_detection_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let upper = dir.path().join("IMG_0001.HEIC");
        let lower = dir.path().join("scan.heif");
        std::fs::write(&upper, b"x").unwrap();
        std::fs::write(&lower, b"x").unwrap();
        assert!(is_heic_path(&upper));
        assert!(is_heic_path(&lower));
    }

    #[test]
    fn heic_detection_requires_existing_file() {
        assert!(!is_heic_path(Path::new("/nonexistent/photo.heic")));
    }

    #[test]
    fn other_extensions_are_not_heic() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("page.png");
        std::fs::write(&png, b"x").unwrap();
        assert!(!is_heic_path(&png));
        assert!(is_supported_path(&png));
        assert!(!is_supported_path(Path::new("notes.txt")));
    }

    #[test]
    fn sips_arguments() {
        let args = ConverterTool::Sips.args(Path::new("a.heic"), Path::new("b.png"));
        assert_eq!(args, ["-s", "format", "png", "a.heic", "--out", "b.png"]);
    }

    #[test]
    fn no_installed_converter_is_tool_missing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.heic");
        std::fs::write(&input, b"not really heic").unwrap();
        // An empty tool list behaves like a machine with nothing installed.
        let converter = HeicConverter::default().with_tools(Vec::new());
        let err = converter.convert(&input, &dir.path().join("out.png")).unwrap_err();
        assert!(matches!(err, HeicTextError::ToolMissing { .. }));
    }

    #[test]
    fn png_is_loaded_without_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        GrayImage::from_pixel(12, 7, Luma([200u8])).save(&path).unwrap();

        let converter = HeicConverter::default().with_tools(Vec::new());
        let image = load_source(&path, dir.path(), &converter).unwrap();
        assert_eq!((image.width(), image.height()), (12, 7));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();
        let err = load_source(&path, dir.path(), &HeicConverter::default()).unwrap_err();
        assert!(matches!(err, HeicTextError::UnsupportedInput(_)));
    }
}
