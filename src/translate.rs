use tiny_skia::{
    BlendMode, Color, FillRule, FilterQuality, Mask, Paint, Path, PathBuilder, Pattern, Pixmap,
    PixmapMut, PixmapPaint, Rect, SpreadMode, Transform,
};

use crate::draw_data::{DrawCommand, DrawList, Vertex};
use crate::error::RenderError;
use crate::registry::TextureRegistry;

/// Counters for one translated draw list. Backs the observable properties
/// of the translator: one clip change per command that survives clamping,
/// skipped commands issue no rasterizer calls at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct TranslateStats {
    pub commands: usize,
    pub skipped: usize,
    pub clip_changes: usize,
    pub triangles: usize,
}

/// Translate one frame's draw list into rasterizer calls against `target`.
///
/// Commands are processed strictly in list order; later commands overlay
/// earlier ones. A failed texture lookup aborts the whole translation: it
/// indicates a handle-lifecycle bug and is surfaced, never recovered.
pub fn translate(
    list: &DrawList,
    target: &mut PixmapMut,
    registry: &TextureRegistry,
) -> Result<TranslateStats, RenderError> {
    list.validate()?;

    let (width, height) = (target.width(), target.height());
    let mut mask = Mask::new(width, height).ok_or(RenderError::OutOfMemory { width, height })?;
    let mut stats = TranslateStats::default();

    for cmd in &list.commands {
        stats.commands += 1;

        let clip = cmd
            .clip_rect
            .translated(-list.offset[0], -list.offset[1])
            .clamp_to(width, height);
        let Some(clip) = clip else {
            // Empty after clamping: skip without touching clip state.
            stats.skipped += 1;
            continue;
        };

        mask.clear();
        if let Some(rect) = Rect::from_ltrb(clip.min_x, clip.min_y, clip.max_x, clip.max_y) {
            mask.fill_path(
                &PathBuilder::from_rect(rect),
                FillRule::Winding,
                false,
                Transform::identity(),
            );
        }
        stats.clip_changes += 1;

        if cmd.texture.is_none() {
            draw_solid(list, cmd, target, &mask, &mut stats);
        } else {
            let texture = registry
                .lookup(cmd.texture)
                .ok_or(RenderError::UnknownTexture(cmd.texture))?;
            draw_textured(list, cmd, texture, target, &mask, &mut stats)?;
        }
    }

    Ok(stats)
}

fn command_vertices<'a>(
    list: &'a DrawList,
    cmd: &DrawCommand,
) -> impl Iterator<Item = [&'a Vertex; 3]> {
    let start = cmd.index_offset as usize;
    let end = start + cmd.index_count as usize;
    list.indices[start..end].chunks_exact(3).map(|tri| {
        [
            &list.vertices[tri[0] as usize],
            &list.vertices[tri[1] as usize],
            &list.vertices[tri[2] as usize],
        ]
    })
}

fn draw_solid(
    list: &DrawList,
    cmd: &DrawCommand,
    target: &mut PixmapMut,
    mask: &Mask,
    stats: &mut TranslateStats,
) {
    let offset = list.offset;
    let uniform = uniform_color(list, cmd);

    if let Some(color) = uniform {
        // All triangles share one color: merge them into a single fill.
        let mut builder = PathBuilder::new();
        for tri in command_vertices(list, cmd) {
            add_triangle(&mut builder, tri, offset);
            stats.triangles += 1;
        }
        if let Some(path) = builder.finish() {
            fill(target, &path, color, mask);
        }
        return;
    }

    // Mixed vertex colors: flat-fill each triangle with its first vertex.
    for tri in command_vertices(list, cmd) {
        stats.triangles += 1;
        let mut builder = PathBuilder::new();
        add_triangle(&mut builder, tri, offset);
        if let Some(path) = builder.finish() {
            fill(target, &path, tri[0].color, mask);
        }
    }
}

fn draw_textured(
    list: &DrawList,
    cmd: &DrawCommand,
    texture: &Pixmap,
    target: &mut PixmapMut,
    mask: &Mask,
    stats: &mut TranslateStats,
) -> Result<(), RenderError> {
    let offset = list.offset;
    for tri in command_vertices(list, cmd) {
        stats.triangles += 1;
        let mut builder = PathBuilder::new();
        add_triangle(&mut builder, tri, offset);
        let Some(path) = builder.finish() else {
            continue;
        };

        // Map texture pixels onto the surface with the affine transform
        // defined by the triangle's three position/UV pairs.
        let Some(uv_transform) = uv_to_surface(tri, texture, offset) else {
            // Degenerate UV mapping: fall back to a flat fill, matching
            // the solid path a zero-area sample would produce.
            fill(target, &path, tri[0].color, mask);
            continue;
        };

        let tint = tri[0].color;
        if tint == [255, 255, 255, 255] {
            let mut paint = Paint::default();
            paint.anti_alias = false;
            paint.shader = Pattern::new(
                texture.as_ref(),
                SpreadMode::Pad,
                FilterQuality::Nearest,
                1.0,
                uv_transform,
            );
            target.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), Some(mask));
        } else {
            tinted_fill(target, &path, texture, uv_transform, tint, mask)?;
        }
    }
    Ok(())
}

/// Fill a textured path modulated by a vertex tint. tiny-skia patterns have
/// no tint input, so the sample is composed off-surface: pattern fill, then
/// a Modulate fill multiplying every channel by the tint, then a SourceOver
/// blit through the clip mask.
fn tinted_fill(
    target: &mut PixmapMut,
    path: &Path,
    texture: &Pixmap,
    uv_transform: Transform,
    tint: [u8; 4],
    mask: &Mask,
) -> Result<(), RenderError> {
    let bounds = path.bounds();
    let x0 = bounds.left().floor().max(0.0) as i32;
    let y0 = bounds.top().floor().max(0.0) as i32;
    let x1 = (bounds.right().ceil() as i32).min(target.width() as i32);
    let y1 = (bounds.bottom().ceil() as i32).min(target.height() as i32);
    if x1 <= x0 || y1 <= y0 {
        return Ok(());
    }
    let (width, height) = ((x1 - x0) as u32, (y1 - y0) as u32);
    let mut scratch =
        Pixmap::new(width, height).ok_or(RenderError::OutOfMemory { width, height })?;
    let to_scratch = Transform::from_translate(-x0 as f32, -y0 as f32);

    // `fill_path` applies `to_scratch` to the pattern's transform as well as
    // the path, which is exactly the shift into scratch space.
    let mut paint = Paint::default();
    paint.anti_alias = false;
    paint.shader = Pattern::new(
        texture.as_ref(),
        SpreadMode::Pad,
        FilterQuality::Nearest,
        1.0,
        uv_transform,
    );
    scratch
        .as_mut()
        .fill_path(path, &paint, FillRule::Winding, to_scratch, None);

    let mut colorize = Paint::default();
    colorize.anti_alias = false;
    colorize.set_color(straight_color(tint));
    colorize.blend_mode = BlendMode::Modulate;
    scratch
        .as_mut()
        .fill_path(path, &colorize, FillRule::Winding, to_scratch, None);

    target.draw_pixmap(
        x0,
        y0,
        scratch.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        Some(mask),
    );
    Ok(())
}

fn fill(target: &mut PixmapMut, path: &Path, color: [u8; 4], mask: &Mask) {
    let mut paint = Paint::default();
    paint.anti_alias = false;
    paint.set_color(straight_color(color));
    target.fill_path(path, &paint, FillRule::Winding, Transform::identity(), Some(mask));
}

fn straight_color(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn uniform_color(list: &DrawList, cmd: &DrawCommand) -> Option<[u8; 4]> {
    let mut vertices = command_vertices(list, cmd).flatten();
    let first = vertices.next()?.color;
    vertices.all(|vertex| vertex.color == first).then_some(first)
}

fn add_triangle(builder: &mut PathBuilder, tri: [&Vertex; 3], offset: [f32; 2]) {
    builder.move_to(tri[0].pos[0] - offset[0], tri[0].pos[1] - offset[1]);
    builder.line_to(tri[1].pos[0] - offset[0], tri[1].pos[1] - offset[1]);
    builder.line_to(tri[2].pos[0] - offset[0], tri[2].pos[1] - offset[1]);
    builder.close();
}

/// Solve the affine transform taking texture pixel coordinates to surface
/// coordinates from three vertex position/UV pairs. `None` when the UV
/// triangle is degenerate.
fn uv_to_surface(tri: [&Vertex; 3], texture: &Pixmap, offset: [f32; 2]) -> Option<Transform> {
    let (tw, th) = (texture.width() as f32, texture.height() as f32);
    let u: Vec<f32> = tri.iter().map(|v| v.uv[0] * tw).collect();
    let v: Vec<f32> = tri.iter().map(|v| v.uv[1] * th).collect();
    let x: Vec<f32> = tri.iter().map(|vert| vert.pos[0] - offset[0]).collect();
    let y: Vec<f32> = tri.iter().map(|vert| vert.pos[1] - offset[1]).collect();

    let det = (u[1] - u[0]) * (v[2] - v[0]) - (u[2] - u[0]) * (v[1] - v[0]);
    if det.abs() < 1e-6 {
        return None;
    }

    let sx = ((x[1] - x[0]) * (v[2] - v[0]) - (x[2] - x[0]) * (v[1] - v[0])) / det;
    let kx = ((x[2] - x[0]) * (u[1] - u[0]) - (x[1] - x[0]) * (u[2] - u[0])) / det;
    let ky = ((y[1] - y[0]) * (v[2] - v[0]) - (y[2] - y[0]) * (v[1] - v[0])) / det;
    let sy = ((y[2] - y[0]) * (u[1] - u[0]) - (y[1] - y[0]) * (u[2] - u[0])) / det;
    let tx = x[0] - sx * u[0] - kx * v[0];
    let ty = y[0] - ky * u[0] - sy * v[0];
    Some(Transform::from_row(sx, ky, kx, sy, tx, ty))
}
