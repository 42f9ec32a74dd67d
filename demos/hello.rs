use imbrush::{
    run_app, ClipRect, DrawList, GlyphAtlas, PixelFormat, TextureHandle, WindowConfig,
};

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn load_system_font() -> Option<GlyphAtlas> {
    for path in FONT_PATHS {
        if let Ok(bytes) = std::fs::read(path) {
            match GlyphAtlas::from_font_bytes(&bytes, 18.0) {
                Ok(atlas) => return Some(atlas),
                Err(err) => log::warn!("failed to build glyph atlas from {path}: {err}"),
            }
        }
    }
    log::warn!("no system font found, running without text");
    None
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let glyphs = load_system_font();
    let mut atlas_handle: Option<TextureHandle> = None;

    run_app(WindowConfig::default(), move |input, resources| {
        let mut list = DrawList::new();
        let clip = ClipRect::surface(resources.surface_width, resources.surface_height);

        list.push_rect(ClipRect::new(40.0, 40.0, 280.0, 180.0), [40, 90, 200, 255], clip);
        list.push_rect(ClipRect::new(60.0, 60.0, 300.0, 200.0), [240, 180, 40, 200], clip);

        if let Some(glyphs) = &glyphs {
            let handle = *atlas_handle.get_or_insert_with(|| {
                resources
                    .atlas
                    .build(
                        resources.registry,
                        glyphs.pixels(),
                        glyphs.width(),
                        glyphs.height(),
                        PixelFormat::A8,
                    )
                    .expect("font atlas upload")
            });
            glyphs.push_text(
                &mut list,
                handle,
                "hello from imbrush",
                48.0,
                220.0,
                [255, 255, 255, 255],
                clip,
            );
        }

        // A cursor marker shows the input bridge feeding the frame.
        if let Some((x, y)) = input.mouse_pos {
            list.push_rect(
                ClipRect::new(x - 4.0, y - 4.0, x + 4.0, y + 4.0),
                [255, 80, 80, 255],
                clip,
            );
        }

        list
    })
}
