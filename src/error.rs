use crate::draw_data::TextureHandle;

/// Errors surfaced by the backend. A failed frame is reported to the host
/// and never partially presented; the next frame starts clean.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Window, presentation context, or render target could not be created.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// The rasterizer could not allocate a backing image.
    #[error("out of memory allocating a {width}x{height} image")]
    OutOfMemory { width: u32, height: u32 },

    /// Uploaded pixel data does not match the declared dimensions/format.
    #[error("texture data size mismatch: expected {expected} bytes, got {got}")]
    InvalidTextureData { expected: usize, got: usize },

    /// A draw command referenced a handle the registry does not know.
    /// This is a lifecycle bug in the caller, not a recoverable condition.
    #[error("draw command referenced unknown texture {0:?}")]
    UnknownTexture(TextureHandle),

    /// A draw list referenced vertices or indices outside its own buffers.
    #[error("invalid draw list: {0}")]
    InvalidDrawList(String),

    /// The presentation buffer could not be acquired or flushed.
    #[error("presentation failed: {0}")]
    Present(String),
}
