use tiny_skia::{ColorU8, Pixmap, PremultipliedColorU8};

use crate::draw_data::TextureHandle;
use crate::error::RenderError;

/// Layout of pixel data handed to [`TextureRegistry::register`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4 bytes per pixel, straight (non-premultiplied) alpha.
    Rgba8,
    /// 4 bytes per pixel, alpha already premultiplied.
    Rgba8Premultiplied,
    /// 1 byte per pixel coverage, expanded to white-with-alpha on upload.
    /// This is the usual font-atlas format.
    A8,
}

impl PixelFormat {
    fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 | PixelFormat::Rgba8Premultiplied => 4,
            PixelFormat::A8 => 1,
        }
    }
}

struct Slot {
    generation: u32,
    pixmap: Option<Pixmap>,
}

/// Arena of rasterizer-native images keyed by [`TextureHandle`].
///
/// Lookup is a direct indexed access plus a generation check. The handle
/// table is only mutated between frames; while a draw list is being
/// translated the referenced handles are pinned via [`begin_frame`] and a
/// release of a pinned handle is a caller bug.
///
/// [`begin_frame`]: TextureRegistry::begin_frame
#[derive(Default)]
pub struct TextureRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    in_flight: Vec<TextureHandle>,
    frame_active: bool,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload raw pixels and return a handle to the backing image.
    pub fn register(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<TextureHandle, RenderError> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(RenderError::InvalidTextureData {
                expected,
                got: pixels.len(),
            });
        }
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::OutOfMemory { width, height })?;
        upload(&mut pixmap, pixels, format);

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index as usize].pixmap = Some(pixmap);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    pixmap: Some(pixmap),
                });
                (self.slots.len() - 1) as u32
            }
        };
        let handle = TextureHandle::new(index, self.slots[index as usize].generation);
        log::debug!("registered texture {handle:?} ({width}x{height})");
        Ok(handle)
    }

    /// Release a handle. Unknown or stale handles are a no-op. Releasing a
    /// handle pinned by the in-flight draw list is a lifecycle bug and
    /// asserts in debug builds.
    pub fn unregister(&mut self, handle: TextureHandle) {
        if handle.is_none() {
            return;
        }
        if self.frame_active && self.in_flight.contains(&handle) {
            debug_assert!(
                false,
                "texture {handle:?} released while referenced by the in-flight draw list"
            );
            log::error!("ignored release of in-flight texture {handle:?}");
            return;
        }
        let index = handle.index() as usize;
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        if slot.generation != handle.generation() || slot.pixmap.is_none() {
            return;
        }
        slot.pixmap = None;
        // Bumping the generation invalidates any copies of this handle.
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index as u32);
        log::debug!("unregistered texture {handle:?}");
    }

    /// Resolve a handle to its backing image. Hot path: one indexed access
    /// per draw command during translation.
    pub fn lookup(&self, handle: TextureHandle) -> Option<&Pixmap> {
        let slot = self.slots.get(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.pixmap.as_ref()
    }

    /// Pin the handles referenced by the frame's draw list. Called by the
    /// frame driver before translation begins.
    pub fn begin_frame(&mut self, handles: impl IntoIterator<Item = TextureHandle>) {
        self.in_flight.clear();
        self.in_flight.extend(handles);
        self.frame_active = true;
    }

    /// Unpin the frame's handles. Called after translation finishes,
    /// whether it succeeded or failed.
    pub fn end_frame(&mut self) {
        self.in_flight.clear();
        self.frame_active = false;
    }

    /// Number of live images.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.pixmap.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release every live image. Used during shutdown, which only happens
    /// between frames.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.pixmap.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
    }
}

fn upload(pixmap: &mut Pixmap, pixels: &[u8], format: PixelFormat) {
    let data = pixmap.pixels_mut();
    match format {
        PixelFormat::Rgba8 => {
            for (dst, src) in data.iter_mut().zip(pixels.chunks_exact(4)) {
                *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
            }
        }
        PixelFormat::Rgba8Premultiplied => {
            for (dst, src) in data.iter_mut().zip(pixels.chunks_exact(4)) {
                *dst = PremultipliedColorU8::from_rgba(src[0], src[1], src[2], src[3])
                    .unwrap_or_else(|| {
                        // Malformed premultiplied input: clamp channels to alpha.
                        let a = src[3];
                        PremultipliedColorU8::from_rgba(
                            src[0].min(a),
                            src[1].min(a),
                            src[2].min(a),
                            a,
                        )
                        .unwrap_or(PremultipliedColorU8::TRANSPARENT)
                    });
            }
        }
        PixelFormat::A8 => {
            for (dst, &coverage) in data.iter_mut().zip(pixels.iter()) {
                *dst = PremultipliedColorU8::from_rgba(coverage, coverage, coverage, coverage)
                    .unwrap_or(PremultipliedColorU8::TRANSPARENT);
            }
        }
    }
}
