//! Non-blocking forms of the IO-bound operations.
//!
//! Each call moves its inputs onto tokio's blocking pool and awaits the result, so a
//! cooperative runtime thread is never held by decoding, compositing or encoding.

use std::path::PathBuf;

use crate::bench::compose::{Background, ComposeOutcome};
use crate::bench::harness::BenchOpts;
use crate::bench::report::BenchmarkReport;
use crate::blend::descriptor::AlgorithmDescriptor;
use crate::codec::png::EncodeOpts;
use crate::codec::source::{Encoded, Output, Source, deliver};
use crate::engine::handle::Engine;
use crate::engine::opts::{BlendOpts, MultipleOpts};
use crate::foundation::error::{BlendError, BlendResult};
use crate::pixels::buffer::PixelBuffer;

async fn blocking<T, F>(f: F) -> BlendResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BlendError::Other(anyhow::anyhow!("blocking task failed: {e}")))
}

impl Engine {
    /// Non-blocking [`Engine::blend_images`].
    pub async fn blend_images_async(
        &self,
        bottom: Source,
        top: Source,
        output: Output,
        opts: BlendOpts,
        encode: EncodeOpts,
    ) -> BlendResult<Encoded> {
        let engine = self.clone();
        blocking(move || engine.blend_images(&bottom, &top, &output, &opts, encode)).await?
    }

    /// Non-blocking [`Engine::blend_multiple`].
    pub async fn blend_multiple_async(
        &self,
        sources: Vec<Source>,
        output: Output,
        opts: MultipleOpts,
        encode: EncodeOpts,
    ) -> BlendResult<Encoded> {
        let engine = self.clone();
        blocking(move || engine.blend_multiple(&sources, &output, &opts, encode)).await?
    }

    /// Decode one source off the runtime thread.
    pub async fn decode_async(&self, source: Source) -> BlendResult<PixelBuffer> {
        blocking(move || source.decode()).await?
    }

    /// Encode `buf` and deliver it off the runtime thread.
    pub async fn encode_async(
        &self,
        buf: PixelBuffer,
        output: Output,
        encode: EncodeOpts,
    ) -> BlendResult<Encoded> {
        blocking(move || deliver(&buf, &output, encode)).await?
    }

    /// Non-blocking [`Engine::blend_images_benchmark_all`].
    pub async fn blend_images_benchmark_all_async(
        &self,
        bottom: Source,
        top: Source,
        opts: BenchOpts,
    ) -> BlendResult<BenchmarkReport> {
        let engine = self.clone();
        blocking(move || engine.blend_images_benchmark_all(&bottom, &top, &opts)).await
    }

    /// Non-blocking [`Engine::blend_multiple_benchmark_all`].
    pub async fn blend_multiple_benchmark_all_async(
        &self,
        sources: Vec<Source>,
        opts: BenchOpts,
    ) -> BlendResult<BenchmarkReport> {
        let engine = self.clone();
        blocking(move || engine.blend_multiple_benchmark_all(&sources, &opts)).await
    }

    /// Non-blocking [`Engine::compose_fixtures`].
    pub async fn compose_fixtures_async(
        &self,
        dir: PathBuf,
        algorithm: AlgorithmDescriptor,
        background: Background,
        encode: EncodeOpts,
    ) -> BlendResult<ComposeOutcome> {
        let engine = self.clone();
        blocking(move || engine.compose_fixtures(&dir, &algorithm, background, encode)).await?
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/asynchronous.rs"]
mod tests;
