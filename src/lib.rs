//! A rendering backend for immediate-mode GUIs: per-frame draw lists are
//! translated into tiny-skia rasterizer calls and presented into a winit
//! window through softbuffer.
//!
//! The GUI layer itself (widgets, layout, event semantics) is an external
//! collaborator: it produces a [`DrawList`] each frame and consumes the
//! [`InputSnapshot`] this crate collects from the windowing layer.

pub mod app;
pub mod atlas;
pub mod draw_data;
pub mod error;
pub mod font;
pub mod input;
pub mod registry;
pub mod surface;
pub mod translate;

pub use app::{run_app, Backend, FramePhase, FrameResources, ImbrushApp, WindowConfig};
pub use atlas::FontAtlas;
pub use draw_data::{ClipRect, DrawCommand, DrawList, TextureHandle, Vertex};
pub use error::RenderError;
pub use font::{GlyphAtlas, GlyphInfo};
pub use input::{InputBridge, InputSnapshot};
pub use registry::{PixelFormat, TextureRegistry};
pub use surface::SurfaceManager;
pub use translate::{translate, TranslateStats};
