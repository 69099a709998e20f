//! Where layers come from and where results go.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::codec::png::{EncodeOpts, decode_png, encode_png, read_png, write_bytes};
use crate::foundation::error::BlendResult;
use crate::pixels::buffer::PixelBuffer;

/// An encoded input layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// PNG file on disk.
    Path(PathBuf),
    /// PNG bytes already in memory.
    Bytes(Vec<u8>),
}

impl Source {
    /// Decode this source.
    pub fn decode(&self) -> BlendResult<PixelBuffer> {
        match self {
            Self::Path(path) => read_png(path),
            Self::Bytes(bytes) => decode_png(bytes),
        }
    }

    /// Short description for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Destination of an encoded result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Output {
    /// Write the PNG to this path.
    Path(PathBuf),
    /// Hand the PNG bytes back to the caller.
    #[default]
    Memory,
}

impl From<PathBuf> for Output {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Output {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for Output {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

/// An encoded result: either the path it was written to or the bytes themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Encoded {
    /// Bytes were written here.
    Path(PathBuf),
    /// In-memory PNG bytes.
    Bytes(Vec<u8>),
}

impl Encoded {
    /// Written path, if the result went to disk.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            Self::Bytes(_) => None,
        }
    }

    /// In-memory bytes, if the result was kept in memory.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Path(_) => None,
            Self::Bytes(b) => Some(b),
        }
    }
}

/// Decode every source in parallel; the result keeps the input order.
pub fn decode_all(sources: &[Source]) -> BlendResult<Vec<PixelBuffer>> {
    debug!(count = sources.len(), "decoding layers");
    sources.par_iter().map(Source::decode).collect()
}

/// Encode `buf` and deliver it to `output`.
pub fn deliver(buf: &PixelBuffer, output: &Output, opts: EncodeOpts) -> BlendResult<Encoded> {
    let bytes = encode_png(buf, opts)?;
    match output {
        Output::Path(path) => {
            write_bytes(path, &bytes)?;
            debug!(path = %path.display(), bytes = bytes.len(), "wrote png");
            Ok(Encoded::Path(path.clone()))
        }
        Output::Memory => Ok(Encoded::Bytes(bytes)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/source.rs"]
mod tests;
