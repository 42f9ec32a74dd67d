use crate::error::RenderError;

/// Opaque identifier for a registry-owned image. The GUI layer treats it as
/// an opaque value and hands it back unchanged inside draw commands.
///
/// Low 32 bits are the arena slot index, high 32 bits the slot generation,
/// so a stale handle fails lookup instead of aliasing a reused slot.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u64);

impl TextureHandle {
    /// Reserved handle meaning "no texture": the command is a solid fill.
    pub const NONE: TextureHandle = TextureHandle(u64::MAX);

    pub(crate) fn new(index: u32, generation: u32) -> Self {
        TextureHandle((u64::from(generation) << 32) | u64::from(index))
    }

    pub(crate) fn index(self) -> u32 {
        (self.0 & 0xFFFF_FFFF) as u32
    }

    pub(crate) fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// One vertex of a GUI draw list: surface-space position, normalized
/// texture coordinate, and straight-alpha RGBA color.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [u8; 4],
}

/// Axis-aligned clip rectangle in surface pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClipRect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl ClipRect {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Full-surface clip for a surface of the given size.
    pub fn surface(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self::new(
            self.min_x + dx,
            self.min_y + dy,
            self.max_x + dx,
            self.max_y + dy,
        )
    }

    /// Clamp to the surface bounds. Returns `None` when the clamped rect is
    /// empty or degenerate, which means the command must be skipped.
    pub fn clamp_to(self, width: u32, height: u32) -> Option<ClipRect> {
        let clamped = ClipRect::new(
            self.min_x.max(0.0),
            self.min_y.max(0.0),
            self.max_x.min(width as f32),
            self.max_y.min(height as f32),
        );
        if clamped.min_x < clamped.max_x && clamped.min_y < clamped.max_y {
            Some(clamped)
        } else {
            None
        }
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }
}

/// One rasterizer dispatch unit: an index subrange, a clip rect, and a
/// texture reference. Many commands compose one [`DrawList`].
#[derive(Copy, Clone, Debug)]
pub struct DrawCommand {
    pub clip_rect: ClipRect,
    pub texture: TextureHandle,
    pub index_offset: u32,
    pub index_count: u32,
}

/// The complete set of drawing instructions for one frame, produced by the
/// GUI layer. Command order is significant: later commands overlay earlier
/// ones (painter's algorithm).
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub commands: Vec<DrawCommand>,
    /// Display origin subtracted from positions and clip rects during
    /// translation. Zero unless the GUI layer renders to an offset viewport.
    pub offset: [f32; 2],
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.commands.clear();
    }

    /// Append a solid-color rectangle as two triangles under one command.
    pub fn push_rect(&mut self, rect: ClipRect, color: [u8; 4], clip: ClipRect) {
        self.push_textured_rect(rect, [0.0, 0.0], [1.0, 1.0], color, TextureHandle::NONE, clip);
    }

    /// Append a textured rectangle mapping `uv_min..uv_max` onto `rect`.
    pub fn push_textured_rect(
        &mut self,
        rect: ClipRect,
        uv_min: [f32; 2],
        uv_max: [f32; 2],
        color: [u8; 4],
        texture: TextureHandle,
        clip: ClipRect,
    ) {
        let base = self.vertices.len() as u32;
        let index_offset = self.indices.len() as u32;
        self.vertices.extend_from_slice(&[
            Vertex {
                pos: [rect.min_x, rect.min_y],
                uv: uv_min,
                color,
            },
            Vertex {
                pos: [rect.max_x, rect.min_y],
                uv: [uv_max[0], uv_min[1]],
                color,
            },
            Vertex {
                pos: [rect.max_x, rect.max_y],
                uv: uv_max,
                color,
            },
            Vertex {
                pos: [rect.min_x, rect.max_y],
                uv: [uv_min[0], uv_max[1]],
                color,
            },
        ]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        self.commands.push(DrawCommand {
            clip_rect: clip,
            texture,
            index_offset,
            index_count: 6,
        });
    }

    /// Handles referenced by this list, deduplicated, excluding
    /// [`TextureHandle::NONE`]. Used to pin textures for the frame.
    pub fn referenced_handles(&self) -> Vec<TextureHandle> {
        let mut handles: Vec<TextureHandle> = self
            .commands
            .iter()
            .map(|cmd| cmd.texture)
            .filter(|handle| !handle.is_none())
            .collect();
        handles.sort_by_key(|handle| handle.0);
        handles.dedup();
        handles
    }

    /// Check that every command's index range lies inside the index buffer
    /// and every referenced index lies inside the vertex buffer.
    pub fn validate(&self) -> Result<(), RenderError> {
        for (slot, cmd) in self.commands.iter().enumerate() {
            if cmd.index_count % 3 != 0 {
                return Err(RenderError::InvalidDrawList(format!(
                    "command {slot} has index count {} (not a multiple of 3)",
                    cmd.index_count
                )));
            }
            let start = cmd.index_offset as usize;
            let end = start + cmd.index_count as usize;
            if end > self.indices.len() {
                return Err(RenderError::InvalidDrawList(format!(
                    "command {slot} indexes {start}..{end} past index buffer of {}",
                    self.indices.len()
                )));
            }
            for &index in &self.indices[start..end] {
                if index as usize >= self.vertices.len() {
                    return Err(RenderError::InvalidDrawList(format!(
                        "command {slot} references vertex {index} past vertex buffer of {}",
                        self.vertices.len()
                    )));
                }
            }
        }
        Ok(())
    }
}
