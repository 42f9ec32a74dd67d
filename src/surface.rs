use std::num::NonZeroU32;
use std::sync::Arc;

use tiny_skia::{Color, Pixmap, PixmapMut};
use winit::window::Window;

use crate::error::RenderError;

/// Owner of the native window, the softbuffer presentation surface, and the
/// tiny-skia render target. The three are created, resized, and destroyed
/// in lockstep: the pixmap's dimensions always match the window client area.
///
/// No other component holds the window; teardown order is render target,
/// presentation surface, then window (reverse of creation).
pub struct SurfaceManager {
    window: Arc<Window>,
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
    pixmap: Pixmap,
}

impl SurfaceManager {
    /// Establish the presentation context and allocate a render target
    /// matching the window's current inner size.
    pub fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let context = softbuffer::Context::new(window.clone())
            .map_err(|err| RenderError::Initialization(format!("display context: {err}")))?;
        let mut surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|err| RenderError::Initialization(format!("window surface: {err}")))?;

        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));
        surface
            .resize(
                NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN),
                NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
            )
            .map_err(|err| RenderError::Initialization(format!("surface resize: {err}")))?;
        let pixmap =
            Pixmap::new(width, height).ok_or(RenderError::OutOfMemory { width, height })?;

        log::info!("surface created: {width}x{height}");
        Ok(Self {
            window,
            surface,
            pixmap,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Reallocate the render target and presentation buffer. Idempotent for
    /// unchanged dimensions. Safe from the event-polling path between
    /// frames, never called mid-draw.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.pixmap.width() && height == self.pixmap.height() {
            return Ok(());
        }
        self.surface
            .resize(
                NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN),
                NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
            )
            .map_err(|err| RenderError::Present(format!("surface resize: {err}")))?;
        self.pixmap =
            Pixmap::new(width, height).ok_or(RenderError::OutOfMemory { width, height })?;
        log::debug!("surface resized: {width}x{height}");
        Ok(())
    }

    /// Clear the render target to an opaque color at frame start.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    /// Mutable view of the render target for the translator.
    pub fn pixmap_mut(&mut self) -> PixmapMut<'_> {
        self.pixmap.as_mut()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Copy the render target into the window's visible buffer and flush.
    /// Called exactly once per frame, after translation finishes.
    pub fn present(&mut self) -> Result<(), RenderError> {
        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|err| RenderError::Present(format!("buffer acquire: {err}")))?;

        // The surface is cleared with an opaque color each frame, so the
        // premultiplied channels equal the straight ones here.
        for (dst, src) in buffer.iter_mut().zip(self.pixmap.pixels()) {
            *dst = (u32::from(src.red()) << 16)
                | (u32::from(src.green()) << 8)
                | u32::from(src.blue());
        }

        buffer
            .present()
            .map_err(|err| RenderError::Present(format!("buffer present: {err}")))?;
        Ok(())
    }
}
