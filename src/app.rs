use std::sync::Arc;

use tiny_skia::Color;
use winit::{
    application::ApplicationHandler,
    event::{MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::atlas::FontAtlas;
use crate::draw_data::DrawList;
use crate::error::RenderError;
use crate::input::{InputBridge, InputSnapshot, MOUSE_LEFT, MOUSE_MIDDLE, MOUSE_RIGHT};
use crate::registry::TextureRegistry;
use crate::surface::SurfaceManager;
use crate::translate::{translate, TranslateStats};

pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Opaque color the surface is cleared to at frame start.
    pub clear_color: [f32; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "imbrush".to_string(),
            width: 800,
            height: 600,
            clear_color: [0.45, 0.55, 0.60, 1.0],
        }
    }
}

/// The frame loop's explicit state sequence. One full cycle per host call;
/// no frame state is shared across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Idle,
    PollingEvents,
    /// Owned by the external GUI layer; the driver only calls its hooks.
    BuildingFrame,
    Translating,
    Presenting,
}

impl FramePhase {
    /// The phase that follows `self` in a successful frame.
    pub fn next(self) -> FramePhase {
        match self {
            FramePhase::Idle => FramePhase::PollingEvents,
            FramePhase::PollingEvents => FramePhase::BuildingFrame,
            FramePhase::BuildingFrame => FramePhase::Translating,
            FramePhase::Translating => FramePhase::Presenting,
            FramePhase::Presenting => FramePhase::Idle,
        }
    }
}

/// Resource access handed to the GUI layer while it builds a frame.
/// Texture registration here happens before translation begins, so the
/// registry's between-frames mutation contract holds.
pub struct FrameResources<'a> {
    pub registry: &'a mut TextureRegistry,
    pub atlas: &'a mut FontAtlas,
    pub surface_width: u32,
    pub surface_height: u32,
}

/// Composition root: surface, texture registry, and font atlas, driven one
/// frame at a time.
pub struct Backend {
    surface: SurfaceManager,
    registry: TextureRegistry,
    atlas: FontAtlas,
    clear_color: Color,
    phase: FramePhase,
}

impl Backend {
    pub fn initialize(window: Arc<Window>, config: &WindowConfig) -> Result<Self, RenderError> {
        let surface = SurfaceManager::new(window)?;
        let [r, g, b, a] = config.clear_color;
        Ok(Self {
            surface,
            registry: TextureRegistry::new(),
            atlas: FontAtlas::new(),
            clear_color: Color::from_rgba(r, g, b, a)
                .ok_or_else(|| RenderError::Initialization("clear color out of range".into()))?,
            phase: FramePhase::Idle,
        })
    }

    pub fn registry(&mut self) -> &mut TextureRegistry {
        &mut self.registry
    }

    pub fn atlas(&mut self) -> &mut FontAtlas {
        &mut self.atlas
    }

    pub fn surface(&self) -> &SurfaceManager {
        &self.surface
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Mark the start of a loop iteration. Called by the event-handling
    /// front end before the input snapshot is taken.
    pub fn begin_poll(&mut self) {
        debug_assert_eq!(self.phase, FramePhase::Idle, "frame loop re-entered mid-frame");
        self.phase = FramePhase::PollingEvents;
    }

    /// Resize the surface. Runs from the event-polling path only, never
    /// mid-draw.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        debug_assert!(
            matches!(self.phase, FramePhase::Idle | FramePhase::PollingEvents),
            "resize during an active frame"
        );
        self.surface.resize(width, height)
    }

    /// Run one frame: let the GUI layer build its draw list, translate it,
    /// and present. On error the frame is not presented and the next frame
    /// starts clean; partial frames never reach the screen.
    pub fn run_frame<F>(
        &mut self,
        input: &InputSnapshot,
        build: F,
    ) -> Result<TranslateStats, RenderError>
    where
        F: FnOnce(&InputSnapshot, &mut FrameResources) -> DrawList,
    {
        self.phase = FramePhase::BuildingFrame;
        let list = {
            let mut resources = FrameResources {
                surface_width: self.surface.width(),
                surface_height: self.surface.height(),
                registry: &mut self.registry,
                atlas: &mut self.atlas,
            };
            build(input, &mut resources)
        };

        // Pin every handle the list references for the rest of the frame.
        self.registry.begin_frame(list.referenced_handles());
        self.phase = FramePhase::Translating;
        self.surface.clear(self.clear_color);
        let mut target = self.surface.pixmap_mut();
        let stats = match translate(&list, &mut target, &self.registry) {
            Ok(stats) => stats,
            Err(err) => {
                self.registry.end_frame();
                self.phase = FramePhase::Idle;
                return Err(err);
            }
        };

        self.phase = FramePhase::Presenting;
        let presented = self.surface.present();
        self.registry.end_frame();
        self.phase = FramePhase::Idle;
        presented?;
        Ok(stats)
    }

    /// Tear down in reverse creation order: atlas handle, remaining
    /// textures, then the surface and window as `self` drops.
    pub fn shutdown(mut self) {
        self.atlas.release(&mut self.registry);
        self.registry.clear();
        log::info!("backend shut down");
    }
}

type FrameCallback = Box<dyn FnMut(&InputSnapshot, &mut FrameResources) -> DrawList>;

/// winit front end driving the backend: polls events into the input bridge,
/// then runs one frame per redraw.
pub struct ImbrushApp {
    config: WindowConfig,
    backend: Option<Backend>,
    window: Option<Arc<Window>>,
    bridge: InputBridge,
    frame_callback: FrameCallback,
}

impl ImbrushApp {
    pub fn new<F>(config: WindowConfig, frame_callback: F) -> Self
    where
        F: FnMut(&InputSnapshot, &mut FrameResources) -> DrawList + 'static,
    {
        Self {
            config,
            backend: None,
            window: None,
            bridge: InputBridge::new(),
            frame_callback: Box::new(frame_callback),
        }
    }

    pub fn backend(&mut self) -> Option<&mut Backend> {
        self.backend.as_mut()
    }
}

impl ApplicationHandler<()> for ImbrushApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));

        if let Ok(window) = event_loop.create_window(window_attributes) {
            let window = Arc::new(window);
            match Backend::initialize(window.clone(), &self.config) {
                Ok(backend) => {
                    self.backend = Some(backend);
                    window.request_redraw();
                    self.window = Some(window);
                }
                Err(err) => {
                    log::error!("backend initialization failed: {err}");
                    event_loop.exit();
                }
            }
        } else {
            log::error!("window creation failed");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.bridge.pointer_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let index = match button {
                    MouseButton::Left => MOUSE_LEFT,
                    MouseButton::Right => MOUSE_RIGHT,
                    MouseButton::Middle => MOUSE_MIDDLE,
                    _ => return,
                };
                self.bridge.button(index, state.is_pressed());
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(x, y) => self.bridge.scroll(x, y),
                MouseScrollDelta::PixelDelta(pos) => {
                    self.bridge.scroll(pos.x as f32, pos.y as f32);
                }
            },
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let Some(text) = &event.text {
                        self.bridge.text(text);
                    }
                }
                self.bridge.key(event.logical_key, event.state.is_pressed());
            }
            WindowEvent::Focused(focused) => {
                self.bridge.focus(focused);
            }
            WindowEvent::Resized(new_size) => {
                self.bridge.resized(new_size.width, new_size.height);
                if let Some(backend) = &mut self.backend {
                    if let Err(err) = backend.resize(new_size.width, new_size.height) {
                        log::error!("resize failed: {err}");
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(backend) = &mut self.backend {
                    backend.begin_poll();
                    let snapshot = self.bridge.snapshot();
                    let callback = &mut self.frame_callback;
                    if let Err(err) =
                        backend.run_frame(&snapshot, |input, resources| callback(input, resources))
                    {
                        log::error!("frame failed, skipping present: {err}");
                    }
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            WindowEvent::CloseRequested => {
                self.bridge.close_requested();
                event_loop.exit();
            }
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(backend) = self.backend.take() {
            backend.shutdown();
        }
        self.window = None;
    }
}

/// Host entry point: create the event loop and drive frames until the host
/// signals shutdown or the window is closed.
pub fn run_app<F>(config: WindowConfig, frame_callback: F) -> anyhow::Result<()>
where
    F: FnMut(&InputSnapshot, &mut FrameResources) -> DrawList + 'static,
{
    let event_loop = EventLoop::new()?;
    let mut app = ImbrushApp::new(config, frame_callback);
    event_loop.run_app(&mut app)?;
    Ok(())
}
