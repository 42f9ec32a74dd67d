use std::collections::HashMap;

use fontdue::{Font, FontSettings};

use crate::draw_data::{ClipRect, DrawCommand, DrawList, TextureHandle, Vertex};
use crate::error::RenderError;

/// Width the atlas bitmap is packed against. Height grows as needed.
const ATLAS_WIDTH: u32 = 512;

/// Padding between packed glyphs, in pixels.
const GLYPH_PADDING: u32 = 1;

/// One packed glyph: atlas UVs plus the metrics needed to place its quad.
#[derive(Debug, Clone, Copy)]
pub struct GlyphInfo {
    /// Top-left UV in the atlas, normalized to 0..1.
    pub uv_min: [f32; 2],
    /// Bottom-right UV in the atlas, normalized to 0..1.
    pub uv_max: [f32; 2],
    /// Rendered glyph size in pixels.
    pub size: [f32; 2],
    /// Horizontal advance in pixels.
    pub advance: f32,
    /// Offset of the glyph bitmap relative to the pen position
    /// (x from pen, y down from the baseline to the bitmap top).
    pub offset: [f32; 2],
}

/// A coverage (A8) bitmap holding the printable-ASCII glyphs of one font at
/// one pixel size, packed row by row, plus per-glyph placement metrics.
///
/// This is the piece the GUI layer needs to emit text draw commands: upload
/// [`pixels`] through the font-atlas builder, then use [`glyph`] or
/// [`push_text`] to produce quads referencing the returned handle.
///
/// [`pixels`]: GlyphAtlas::pixels
/// [`glyph`]: GlyphAtlas::glyph
#[derive(Debug)]
pub struct GlyphAtlas {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    glyphs: HashMap<char, GlyphInfo>,
    line_height: f32,
    ascent: f32,
}

impl GlyphAtlas {
    /// Rasterize the printable ASCII range of a TTF/OTF at `px` pixels.
    pub fn from_font_bytes(data: &[u8], px: f32) -> Result<Self, RenderError> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|err| RenderError::Initialization(format!("font parse failed: {err}")))?;
        let line = font
            .horizontal_line_metrics(px)
            .ok_or_else(|| RenderError::Initialization("font has no horizontal metrics".into()))?;

        // First pass: rasterize everything and lay out shelf positions.
        let mut rasterized = Vec::new();
        let mut pen_x = 0u32;
        let mut pen_y = 0u32;
        let mut row_height = 0u32;
        for ch in (0x20u8..0x7F).map(char::from) {
            let (metrics, bitmap) = font.rasterize(ch, px);
            let (gw, gh) = (metrics.width as u32, metrics.height as u32);
            if gw + GLYPH_PADDING > ATLAS_WIDTH {
                return Err(RenderError::Initialization(format!(
                    "glyph '{ch}' at {px}px is {gw}px wide, wider than the {ATLAS_WIDTH}px atlas"
                )));
            }
            if pen_x + gw + GLYPH_PADDING > ATLAS_WIDTH {
                pen_x = 0;
                pen_y += row_height + GLYPH_PADDING;
                row_height = 0;
            }
            rasterized.push((ch, metrics, bitmap, pen_x, pen_y));
            pen_x += gw + GLYPH_PADDING;
            row_height = row_height.max(gh);
        }
        let height = (pen_y + row_height + GLYPH_PADDING).max(1);

        // Second pass: blit into the atlas and record UVs.
        let mut pixels = vec![0u8; (ATLAS_WIDTH * height) as usize];
        let mut glyphs = HashMap::new();
        for (ch, metrics, bitmap, gx, gy) in rasterized {
            let (gw, gh) = (metrics.width as u32, metrics.height as u32);
            for row in 0..gh {
                let src = (row * gw) as usize;
                let dst = ((gy + row) * ATLAS_WIDTH + gx) as usize;
                pixels[dst..dst + gw as usize]
                    .copy_from_slice(&bitmap[src..src + gw as usize]);
            }
            glyphs.insert(
                ch,
                GlyphInfo {
                    uv_min: [gx as f32 / ATLAS_WIDTH as f32, gy as f32 / height as f32],
                    uv_max: [
                        (gx + gw) as f32 / ATLAS_WIDTH as f32,
                        (gy + gh) as f32 / height as f32,
                    ],
                    size: [gw as f32, gh as f32],
                    advance: metrics.advance_width,
                    offset: [
                        metrics.xmin as f32,
                        -(metrics.height as f32 + metrics.ymin as f32),
                    ],
                },
            );
        }

        Ok(Self {
            pixels,
            width: ATLAS_WIDTH,
            height,
            glyphs,
            line_height: line.new_line_size,
            ascent: line.ascent,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn glyph(&self, ch: char) -> Option<GlyphInfo> {
        self.glyphs.get(&ch).copied()
    }

    /// Advance width of `text` in pixels.
    pub fn measure(&self, text: &str) -> f32 {
        text.chars()
            .filter_map(|ch| self.glyph(ch))
            .map(|glyph| glyph.advance)
            .sum()
    }

    /// Append the quads for `text` to a draw list as one command referencing
    /// `atlas` (the handle the atlas bitmap was registered under). `(x, y)`
    /// is the top-left of the line.
    pub fn push_text(
        &self,
        list: &mut DrawList,
        atlas: TextureHandle,
        text: &str,
        x: f32,
        y: f32,
        color: [u8; 4],
        clip: ClipRect,
    ) {
        let index_offset = list.indices.len() as u32;
        let baseline = y + self.ascent;
        let mut pen_x = x;
        for ch in text.chars() {
            let Some(glyph) = self.glyph(ch) else {
                continue;
            };
            if glyph.size[0] > 0.0 && glyph.size[1] > 0.0 {
                let gx = pen_x + glyph.offset[0];
                let gy = baseline + glyph.offset[1];
                push_glyph_quad(list, glyph, gx, gy, color);
            }
            pen_x += glyph.advance;
        }
        let index_count = list.indices.len() as u32 - index_offset;
        if index_count > 0 {
            list.commands.push(DrawCommand {
                clip_rect: clip,
                texture: atlas,
                index_offset,
                index_count,
            });
        }
    }
}

fn push_glyph_quad(list: &mut DrawList, glyph: GlyphInfo, x: f32, y: f32, color: [u8; 4]) {
    let base = list.vertices.len() as u32;
    let (x1, y1) = (x + glyph.size[0], y + glyph.size[1]);
    list.vertices.extend_from_slice(&[
        Vertex {
            pos: [x, y],
            uv: glyph.uv_min,
            color,
        },
        Vertex {
            pos: [x1, y],
            uv: [glyph.uv_max[0], glyph.uv_min[1]],
            color,
        },
        Vertex {
            pos: [x1, y1],
            uv: glyph.uv_max,
            color,
        },
        Vertex {
            pos: [x, y1],
            uv: [glyph.uv_min[0], glyph.uv_max[1]],
            color,
        },
    ]);
    list.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}
