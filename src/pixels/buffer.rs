use std::sync::Arc;

use image::RgbaImage;

use crate::foundation::error::{BlendError, BlendResult};
use crate::foundation::math::mul_div255_u8;

/// One straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// A decoded raster image: straight (non-premultiplied) RGBA8, row-major, tightly packed.
///
/// Buffers never change after construction. Every operation that "modifies" pixels returns a new
/// buffer, and `clone` only bumps a reference count, so the same layer can be read from many
/// threads or reused across compositing runs without copying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 samples.
    ///
    /// Fails with [`BlendError::InvalidBuffer`] when either dimension is zero or when
    /// `data.len() != width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> BlendResult<Self> {
        let expected = expected_len(width, height)?;
        if data.len() != expected {
            return Err(BlendError::invalid_buffer(format!(
                "{width}x{height} rgba8 buffer needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: data.into(),
        })
    }

    /// A buffer with every pixel set to `px`.
    pub fn filled(width: u32, height: u32, px: Rgba8) -> BlendResult<Self> {
        let len = expected_len(width, height)?;
        Self::from_rgba8(width, height, px.repeat(len / 4))
    }

    /// Take ownership of an `image` crate RGBA buffer.
    pub fn from_image(img: RgbaImage) -> BlendResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.into_raw())
    }

    /// Copy into an `image` crate RGBA buffer.
    pub fn to_image(&self) -> RgbaImage {
        // Length is validated at construction, so `from_raw` cannot reject it.
        RgbaImage::from_raw(self.width, self.height, self.data.to_vec())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// Raw RGBA8 samples.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copy the samples out into an owned vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.data.to_vec()
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.data[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Whether `other` has the same width and height.
    pub fn same_size(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Return a copy with colour channels multiplied by alpha.
    pub fn premultiplied(&self) -> Self {
        self.map_pixels(premultiply)
    }

    /// Inverse of [`PixelBuffer::premultiplied`] (lossy for low alpha).
    pub fn demultiplied(&self) -> Self {
        self.map_pixels(demultiply)
    }

    fn map_pixels(&self, f: impl Fn(Rgba8) -> Rgba8) -> Self {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&f([px[0], px[1], px[2], px[3]]));
        }
        Self {
            width: self.width,
            height: self.height,
            data: out.into(),
        }
    }
}

/// Multiply colour channels by alpha (rounded).
pub fn premultiply(px: Rgba8) -> Rgba8 {
    let a = u16::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    [
        mul_div255_u8(u16::from(px[0]), a),
        mul_div255_u8(u16::from(px[1]), a),
        mul_div255_u8(u16::from(px[2]), a),
        px[3],
    ]
}

/// Divide colour channels by alpha (rounded, saturating).
pub fn demultiply(px: Rgba8) -> Rgba8 {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| (((u32::from(c) * 255) + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

fn expected_len(width: u32, height: u32) -> BlendResult<usize> {
    if width == 0 || height == 0 {
        return Err(BlendError::invalid_buffer(format!(
            "dimensions must be non-zero, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BlendError::invalid_buffer("buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/pixels/buffer.rs"]
mod tests;
