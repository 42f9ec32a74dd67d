use imbrush::{ClipRect, DrawList, RenderError, TextureHandle};

const WHITE: [u8; 4] = [255, 255, 255, 255];

#[test]
fn clamp_keeps_a_rect_inside_the_surface() {
    let clip = ClipRect::new(-10.0, -10.0, 150.0, 90.0);
    let clamped = clip.clamp_to(100, 80).unwrap();
    assert_eq!(clamped, ClipRect::new(0.0, 0.0, 100.0, 80.0));
}

#[test]
fn clamp_rejects_empty_and_degenerate_rects() {
    assert!(ClipRect::new(10.0, 10.0, 10.0, 40.0).clamp_to(100, 100).is_none());
    assert!(ClipRect::new(40.0, 40.0, 10.0, 10.0).clamp_to(100, 100).is_none());
    assert!(ClipRect::new(200.0, 200.0, 300.0, 300.0).clamp_to(100, 100).is_none());
    assert!(ClipRect::new(-50.0, -50.0, -10.0, -10.0).clamp_to(100, 100).is_none());
}

#[test]
fn push_rect_produces_a_valid_two_triangle_quad() {
    let mut list = DrawList::new();
    let clip = ClipRect::surface(100, 100);
    list.push_rect(ClipRect::new(10.0, 10.0, 20.0, 20.0), WHITE, clip);

    assert_eq!(list.vertices.len(), 4);
    assert_eq!(list.indices.len(), 6);
    assert_eq!(list.commands.len(), 1);
    assert_eq!(list.commands[0].texture, TextureHandle::NONE);
    list.validate().expect("generated quad must validate");
}

#[test]
fn validate_rejects_a_partial_triangle() {
    let mut list = DrawList::new();
    let clip = ClipRect::surface(100, 100);
    list.push_rect(ClipRect::new(0.0, 0.0, 10.0, 10.0), WHITE, clip);
    list.commands[0].index_count = 4;
    assert!(matches!(list.validate(), Err(RenderError::InvalidDrawList(_))));
}

#[test]
fn validate_rejects_an_index_range_past_the_buffer() {
    let mut list = DrawList::new();
    let clip = ClipRect::surface(100, 100);
    list.push_rect(ClipRect::new(0.0, 0.0, 10.0, 10.0), WHITE, clip);
    list.commands[0].index_offset = 3;
    assert!(matches!(list.validate(), Err(RenderError::InvalidDrawList(_))));
}

#[test]
fn validate_rejects_an_out_of_range_vertex_index() {
    let mut list = DrawList::new();
    let clip = ClipRect::surface(100, 100);
    list.push_rect(ClipRect::new(0.0, 0.0, 10.0, 10.0), WHITE, clip);
    list.indices[5] = 17;
    assert!(matches!(list.validate(), Err(RenderError::InvalidDrawList(_))));
}

#[test]
fn referenced_handles_dedup_and_skip_the_none_handle() {
    let mut list = DrawList::new();
    let clip = ClipRect::surface(100, 100);
    list.push_rect(ClipRect::new(0.0, 0.0, 10.0, 10.0), WHITE, clip);
    list.push_rect(ClipRect::new(10.0, 0.0, 20.0, 10.0), WHITE, clip);
    assert!(
        list.referenced_handles().is_empty(),
        "solid-only lists must pin no textures"
    );
}

#[test]
fn clear_resets_the_list_for_the_next_frame() {
    let mut list = DrawList::new();
    let clip = ClipRect::surface(100, 100);
    list.push_rect(ClipRect::new(0.0, 0.0, 10.0, 10.0), WHITE, clip);
    list.clear();
    assert!(list.vertices.is_empty());
    assert!(list.indices.is_empty());
    assert!(list.commands.is_empty());
}
