//! Public operation surface.

/// Non-blocking variants backed by tokio's blocking pool.
#[cfg(feature = "async")]
pub mod asynchronous;
/// The [`Engine`](handle::Engine) handle.
pub mod handle;
/// Per-operation option structs.
pub mod opts;
