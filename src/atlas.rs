use crate::draw_data::TextureHandle;
use crate::error::RenderError;
use crate::registry::{PixelFormat, TextureRegistry};

/// Owner of the GUI layer's font-atlas texture.
///
/// The atlas is built once at startup and rebuilt only when the GUI layer
/// reports the bitmap changed. A rebuild is a two-phase swap: the new image
/// is registered and recorded as current before the previous handle is
/// released, so there is never a moment where the current handle fails
/// lookup.
#[derive(Default)]
pub struct FontAtlas {
    current: Option<TextureHandle>,
}

impl FontAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload the atlas bitmap and make it current. Returns the new handle;
    /// the GUI layer must be told about it before the next frame is built.
    pub fn build(
        &mut self,
        registry: &mut TextureRegistry,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<TextureHandle, RenderError> {
        let new = registry.register(pixels, width, height, format)?;
        let old = self.current.replace(new);
        if let Some(old) = old {
            registry.unregister(old);
            log::info!("font atlas rebuilt: {old:?} -> {new:?} ({width}x{height})");
        } else {
            log::info!("font atlas built: {new:?} ({width}x{height})");
        }
        Ok(new)
    }

    /// The live atlas handle, if one has been built.
    pub fn handle(&self) -> Option<TextureHandle> {
        self.current
    }

    /// Release the current atlas. Only valid between frames.
    pub fn release(&mut self, registry: &mut TextureRegistry) {
        if let Some(old) = self.current.take() {
            registry.unregister(old);
        }
    }
}
