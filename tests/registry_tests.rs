use imbrush::registry::{PixelFormat, TextureRegistry};
use imbrush::RenderError;

fn solid_rgba(color: [u8; 4], pixels: usize) -> Vec<u8> {
    color.iter().copied().cycle().take(pixels * 4).collect()
}

#[test]
fn register_then_lookup_succeeds() {
    let mut registry = TextureRegistry::new();
    let handle = registry
        .register(&solid_rgba([255, 0, 0, 255], 4), 2, 2, PixelFormat::Rgba8)
        .unwrap();
    let image = registry.lookup(handle).expect("fresh handle should resolve");
    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 2);
    assert_eq!(registry.len(), 1);
}

#[test]
fn unregister_is_idempotent() {
    let mut registry = TextureRegistry::new();
    let handle = registry
        .register(&solid_rgba([0, 255, 0, 255], 1), 1, 1, PixelFormat::Rgba8)
        .unwrap();
    registry.unregister(handle);
    assert!(registry.lookup(handle).is_none(), "released handle resolves");
    // Second release of the same handle is a no-op.
    registry.unregister(handle);
    assert!(registry.is_empty());
}

#[test]
fn stale_handle_fails_lookup_after_slot_reuse() {
    let mut registry = TextureRegistry::new();
    let first = registry
        .register(&solid_rgba([1, 2, 3, 255], 1), 1, 1, PixelFormat::Rgba8)
        .unwrap();
    registry.unregister(first);
    let second = registry
        .register(&solid_rgba([4, 5, 6, 255], 1), 1, 1, PixelFormat::Rgba8)
        .unwrap();
    assert_ne!(first, second, "reused slot must issue a new handle");
    assert!(
        registry.lookup(first).is_none(),
        "stale handle must not alias the reused slot"
    );
    assert!(registry.lookup(second).is_some());
}

#[test]
#[should_panic(expected = "released while referenced")]
fn releasing_an_in_flight_handle_asserts_in_debug() {
    let mut registry = TextureRegistry::new();
    let handle = registry
        .register(&solid_rgba([9, 9, 9, 255], 1), 1, 1, PixelFormat::Rgba8)
        .unwrap();
    registry.begin_frame([handle]);
    registry.unregister(handle);
}

#[test]
fn release_between_frames_is_allowed() {
    let mut registry = TextureRegistry::new();
    let handle = registry
        .register(&solid_rgba([9, 9, 9, 255], 1), 1, 1, PixelFormat::Rgba8)
        .unwrap();
    registry.begin_frame([handle]);
    registry.end_frame();
    registry.unregister(handle);
    assert!(registry.is_empty());
}

#[test]
fn mismatched_pixel_data_is_rejected() {
    let mut registry = TextureRegistry::new();
    let err = registry
        .register(&[0u8; 3], 2, 2, PixelFormat::Rgba8)
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::InvalidTextureData {
            expected: 16,
            got: 3
        }
    ));
}

#[test]
fn zero_sized_image_reports_out_of_memory() {
    let mut registry = TextureRegistry::new();
    let err = registry.register(&[], 0, 0, PixelFormat::Rgba8).unwrap_err();
    assert!(matches!(err, RenderError::OutOfMemory { .. }));
}

#[test]
fn a8_upload_expands_to_white_with_alpha() {
    let mut registry = TextureRegistry::new();
    let handle = registry
        .register(&[0, 128, 255, 64], 2, 2, PixelFormat::A8)
        .unwrap();
    let image = registry.lookup(handle).unwrap();
    let texel = image.pixel(0, 1).unwrap();
    assert_eq!(texel.alpha(), 255);
    assert_eq!(texel.red(), 255, "premultiplied white at full coverage");
}
