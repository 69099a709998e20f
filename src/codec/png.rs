//! PNG decode/encode between encoded bytes and [`PixelBuffer`]s.
//!
//! Compression and filter choices only change the encoded bytes; decoding any of them yields the
//! same pixels.

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use image::codecs::png::{CompressionType, FilterType, PngDecoder, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{BlendError, BlendResult};
use crate::pixels::buffer::PixelBuffer;

/// zlib effort used when writing PNG data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Fastest deflate setting.
    #[default]
    Fast,
    /// Encoder default.
    Default,
    /// Smallest output.
    Best,
    /// Huffman-only coding.
    Huffman,
    /// Run-length coding.
    Rle,
}

impl CompressionLevel {
    /// Every level, in the order reported by the capability descriptor.
    pub const ALL: [Self; 5] = [
        Self::Best,
        Self::Default,
        Self::Fast,
        Self::Huffman,
        Self::Rle,
    ];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Default => "default",
            Self::Best => "best",
            Self::Huffman => "huffman",
            Self::Rle => "rle",
        }
    }

    // The PNG backend has no Huffman-only or RLE strategy; both fall back to its fastest level.
    fn to_image(self) -> CompressionType {
        match self {
            Self::Default => CompressionType::Default,
            Self::Best => CompressionType::Best,
            Self::Fast | Self::Huffman | Self::Rle => CompressionType::Fast,
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionLevel {
    type Err = BlendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| BlendError::invalid_option(format!("unknown compression '{s}'")))
    }
}

/// Per-scanline prediction filter used when writing PNG data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterStrategy {
    /// No prediction.
    #[default]
    NoFilter,
    /// Difference to the pixel on the left.
    Sub,
    /// Difference to the pixel above.
    Up,
    /// Difference to the average of left and above.
    Avg,
    /// Paeth predictor.
    Paeth,
    /// Choose per scanline.
    Adaptive,
}

impl FilterStrategy {
    /// Every filter, in the order reported by the capability descriptor.
    pub const ALL: [Self; 6] = [
        Self::Adaptive,
        Self::Avg,
        Self::NoFilter,
        Self::Paeth,
        Self::Sub,
        Self::Up,
    ];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoFilter => "nofilter",
            Self::Sub => "sub",
            Self::Up => "up",
            Self::Avg => "avg",
            Self::Paeth => "paeth",
            Self::Adaptive => "adaptive",
        }
    }

    fn to_image(self) -> FilterType {
        match self {
            Self::NoFilter => FilterType::NoFilter,
            Self::Sub => FilterType::Sub,
            Self::Up => FilterType::Up,
            Self::Avg => FilterType::Avg,
            Self::Paeth => FilterType::Paeth,
            Self::Adaptive => FilterType::Adaptive,
        }
    }
}

impl fmt::Display for FilterStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterStrategy {
    type Err = BlendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| BlendError::invalid_option(format!("unknown filter '{s}'")))
    }
}

/// Options for [`encode_png`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOpts {
    /// Deflate effort. Default: [`CompressionLevel::Fast`].
    pub compression: CompressionLevel,
    /// Scanline filter. Default: [`FilterStrategy::NoFilter`].
    pub filter: FilterStrategy,
}

impl EncodeOpts {
    /// Options from user-facing strings; `None` keeps the default for that field.
    pub fn parse(compression: Option<&str>, filter: Option<&str>) -> BlendResult<Self> {
        Ok(Self {
            compression: compression
                .map(str::parse::<CompressionLevel>)
                .transpose()?
                .unwrap_or_default(),
            filter: filter
                .map(str::parse::<FilterStrategy>)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Decode PNG bytes into an RGBA8 buffer, converting from any colour type or bit depth.
pub fn decode_png(bytes: &[u8]) -> BlendResult<PixelBuffer> {
    let decoder =
        PngDecoder::new(Cursor::new(bytes)).map_err(|e| BlendError::decode(e.to_string()))?;
    let img = DynamicImage::from_decoder(decoder).map_err(|e| BlendError::decode(e.to_string()))?;
    PixelBuffer::from_image(img.to_rgba8())
}

/// Encode `buf` as an RGBA8 PNG.
pub fn encode_png(buf: &PixelBuffer, opts: EncodeOpts) -> BlendResult<Vec<u8>> {
    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        &mut out,
        opts.compression.to_image(),
        opts.filter.to_image(),
    );
    encoder
        .write_image(
            buf.as_bytes(),
            buf.width(),
            buf.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| BlendError::Other(anyhow::anyhow!("png encode failed: {e}")))?;
    Ok(out)
}

/// Read and decode a PNG file.
pub fn read_png(path: &Path) -> BlendResult<PixelBuffer> {
    let bytes = std::fs::read(path).map_err(|e| BlendError::io(path, e))?;
    decode_png(&bytes)
}

/// Write already encoded bytes to `path`.
///
/// The parent directory must already exist; a missing one is reported as [`BlendError::Io`].
pub fn write_bytes(path: &Path, bytes: &[u8]) -> BlendResult<()> {
    std::fs::write(path, bytes).map_err(|e| BlendError::io(path, e))
}

/// Encode `buf` and write it to `path`.
pub fn write_png(path: &Path, buf: &PixelBuffer, opts: EncodeOpts) -> BlendResult<()> {
    let bytes = encode_png(buf, opts)?;
    write_bytes(path, &bytes)
}

/// Create the parent directory of `path` if it does not exist yet.
///
/// Engine outputs never call this; front-ends that want `mkdir -p` semantics opt in explicitly.
pub fn ensure_parent_dir(path: &Path) -> BlendResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| BlendError::io(parent, e))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/codec/png.rs"]
mod tests;
