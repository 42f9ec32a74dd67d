use imbrush::{GlyphAtlas, RenderError};

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn load_font() -> Option<Vec<u8>> {
    FONT_PATHS.iter().find_map(|path| std::fs::read(path).ok())
}

#[test]
fn atlas_carries_printable_ascii_metrics() {
    let Some(bytes) = load_font() else { return };
    let atlas = GlyphAtlas::from_font_bytes(&bytes, 16.0).unwrap();
    let glyph = atlas.glyph('A').expect("printable ascii glyph missing");
    assert!(glyph.advance > 0.0);
    assert!(glyph.uv_max[0] > glyph.uv_min[0]);
    assert!(atlas.measure("AB") > atlas.measure("A"));
    assert!(atlas.line_height() > 0.0);
}

#[test]
fn glyphs_wider_than_the_atlas_are_rejected() {
    let Some(bytes) = load_font() else { return };
    let err = GlyphAtlas::from_font_bytes(&bytes, 4000.0).unwrap_err();
    assert!(
        matches!(err, RenderError::Initialization(_)),
        "an unpackable pixel size must fail the build, got {err:?}"
    );
}
