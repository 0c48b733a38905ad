//! Core application state and lifecycle.

use std::sync::Arc;
use std::time::{Duration, Instant};

use egui::{LayerId, ViewportId};
use gridboard_core::{
    CanvasView, Config, Dimensions, FileStorage, Handle, InteractionController, InteractionMode,
    LayoutPersistence, LayoutStore, MemoryStorage, MouseButton, Outcome, PointerTarget,
    PointerTracker, Storage,
};
use gridboard_render::{RenderContext, Renderer, SceneBuilder};
use kurbo::Point;
use peniko::Color;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::canvas_painter;
use crate::ui::{self, TOOLBAR_HEIGHT, UiAction, UiState};

/// Gap between the canvas and the window edges (points).
const CANVAS_MARGIN: f64 = 20.0;

/// How often timers are checked while a gesture or a deferred write is pending.
const HOUSEKEEPING_INTERVAL: Duration = Duration::from_millis(100);

/// Errors that stop the application shell.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,
}

/// GPU surface and device.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    async fn new(window: Arc<Window>) -> Result<Self, AppError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("gridboard device"),
                ..Default::default()
            })
            .await?;

        // egui writes gamma-space colors, so prefer a non-sRGB target
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(AppError::UnsupportedSurface)?;
        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(AppError::UnsupportedSurface)?;
        config.format = format;
        config.present_mode = wgpu::PresentMode::AutoVsync;
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Clear to `background`, draw the egui primitives and present.
    fn present(
        &mut self,
        renderer: &mut egui_wgpu::Renderer,
        primitives: &[egui::ClippedPrimitive],
        textures: &egui::TexturesDelta,
        pixels_per_point: f32,
        background: Color,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                self.surface.get_current_texture()?
            }
            Err(e) => return Err(e),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        for (id, image_delta) in &textures.set {
            renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point,
        };
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui encoder"),
            });
        let callbacks = renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            primitives,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(background)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static pass
            let mut render_pass = render_pass.forget_lifetime();
            renderer.render(&mut render_pass, primitives, &screen_descriptor);
        }

        self.queue
            .submit(callbacks.into_iter().chain(std::iter::once(encoder.finish())));

        for id in &textures.free {
            renderer.free_texture(id);
        }
        frame.present();
        Ok(())
    }
}

/// Window-bound state, created once the event loop resumes.
struct AppState {
    window: Arc<Window>,
    gpu: Gpu,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

/// Main application.
pub struct App {
    config: Config,
    store: LayoutStore<dyn Storage>,
    controller: InteractionController,
    tracker: PointerTracker,
    renderer: SceneBuilder,
    ui_state: UiState,
    state: Option<AppState>,
    error: Option<AppError>,
}

impl App {
    /// Open the saved layout and set up the controller. No window yet.
    pub fn new(config: Config) -> Self {
        let storage = open_storage(&config);
        let mut store = LayoutStore::new(LayoutPersistence::new(storage), config.write_policy())
            .with_default_geometry(config.default_geometry());
        store.load();

        let controller = InteractionController::new(config.grid_spec(), config.container())
            .with_gesture_timeout(config.gesture_timeout());

        Self {
            config,
            store,
            controller,
            tracker: PointerTracker::new(),
            renderer: SceneBuilder::new(),
            ui_state: UiState::default(),
            state: None,
            error: None,
        }
    }

    /// Run the application until the window closes.
    pub async fn run(config: Config) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let mut app = App::new(config);
        event_loop.run_app(&mut app)?;

        app.store.flush();
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<AppState, AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu = pollster::block_on(Gpu::new(window.clone()))?;

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        self.fit_canvas(window.inner_size().to_logical(window.scale_factor()));
        log::info!(
            "Gridboard initialized - {}x{}, canvas {}x{}, {} widgets",
            gpu.config.width,
            gpu.config.height,
            self.controller.container().width,
            self.controller.container().height,
            self.store.len()
        );

        Ok(AppState {
            window,
            gpu,
            egui_ctx,
            egui_state,
            egui_renderer,
        })
    }

    /// Resize the canvas to the window and pull widgets back inside it.
    fn fit_canvas(&mut self, window: LogicalSize<f64>) {
        let container = canvas_container(&self.config, window);
        self.controller.set_container(container);
        let moved = self.store.fit_to_container(container, self.controller.grid());
        if moved > 0 {
            log::info!(
                "Canvas is now {}x{}, moved {} widgets inside",
                container.width,
                container.height,
                moved
            );
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::AddWidget => {
                let widget = self.store.add_default();
                self.store
                    .fit_to_container(self.controller.container(), self.controller.grid());
                log::debug!("Added widget {}", widget.id);
            }
            UiAction::ClearAll => {
                self.controller.cancel(&mut self.store);
                self.store.clear();
                self.ui_state.storage_debug = None;
            }
            UiAction::DebugStorage => {
                self.store.flush();
                let stored = self.store.stored_count();
                log::info!("Widgets in storage: {}", stored);
                self.ui_state.storage_debug = Some(stored);
            }
            UiAction::CycleGrid => {
                self.ui_state.grid_style = self.ui_state.grid_style.next();
            }
        }
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn redraw(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let view = CanvasView::build(&self.store, &self.controller);
        let hovered = self.tracker.position().map(|p| view.hit_test(p));
        let render_ctx = RenderContext::new(&view)
            .with_scale_factor(state.window.scale_factor())
            .with_grid(self.ui_state.grid_style)
            .with_hovered(hovered);
        self.renderer.build_scene(&render_ctx);
        let background = self.renderer.background_color(&render_ctx);
        let cursor = cursor_icon(hovered, self.controller.mode());
        let widget_count = self.store.len();

        let raw_input = state.egui_state.take_egui_input(&state.window);
        let scene = self.renderer.scene();
        let ui_state = &self.ui_state;
        let mut action = None;
        let egui_output = state.egui_ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(LayerId::background());
            canvas_painter::paint_scene(&painter, scene, canvas_origin());
            action = ui::render_ui(ctx, ui_state, widget_count);
            if !ctx.is_pointer_over_area() {
                ctx.set_cursor_icon(cursor);
            }
        });

        state
            .egui_state
            .handle_platform_output(&state.window, egui_output.platform_output);
        let primitives = state
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        if let Err(e) = state.gpu.present(
            &mut state.egui_renderer,
            &primitives,
            &egui_output.textures_delta,
            egui_output.pixels_per_point,
            background,
        ) {
            log::warn!("Failed to present frame: {:?}", e);
        }

        let repaint = egui_output
            .viewport_output
            .get(&ViewportId::ROOT)
            .is_some_and(|v| v.repaint_delay.is_zero());
        if repaint {
            state.window.request_redraw();
        }

        if let Some(action) = action {
            self.apply(action);
        }
    }

    fn pointer_button(&mut self, button: MouseButton, pressed: bool, egui_wants_pointer: bool) {
        let outcome = if pressed {
            // Presses over the toolbar belong to egui
            if egui_wants_pointer {
                return;
            }
            match self.tracker.pressed(button) {
                Some(event) => self.controller.handle_event(&mut self.store, event),
                None => Outcome::Ignored,
            }
        } else {
            match self.tracker.released(button) {
                Some(event) => self.controller.handle_event(&mut self.store, event),
                // Released outside the window
                None if button.is_primary() => self.controller.pointer_up(&mut self.store),
                None => Outcome::Ignored,
            }
        };
        if outcome != Outcome::Ignored {
            log::debug!("{:?} {:?}: {:?}", button, if pressed { "down" } else { "up" }, outcome);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");
        match self.init(event_loop) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("Failed to initialize: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_pointer = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();
        let egui_wants_keyboard = state.egui_ctx.wants_keyboard_input();
        let window = state.window.clone();
        if egui_response.repaint {
            window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                self.controller.cancel(&mut self.store);
                self.store.flush();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                state.gpu.resize(size.width, size.height);
                if size.width > 0 && size.height > 0 {
                    self.fit_canvas(size.to_logical(window.scale_factor()));
                }
                window.request_redraw();
            }

            WindowEvent::Focused(false) => {
                if let Outcome::Released(id) = self.controller.cancel(&mut self.store) {
                    log::debug!("Window lost focus, released widget {}", id);
                }
                self.tracker.reset_buttons();
                window.request_redraw();
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.tracker.moved(to_canvas(position, window.scale_factor()));
                // A captured gesture sees every move, even over the toolbar
                if self.controller.router().is_captured() {
                    self.controller.handle_event(&mut self.store, event);
                }
                window.request_redraw();
            }

            WindowEvent::CursorLeft { .. } => {
                if !self.controller.router().is_captured() {
                    self.tracker.left();
                }
                window.request_redraw();
            }

            WindowEvent::MouseInput {
                state: element_state,
                button,
                ..
            } => {
                let Some(button) = map_button(button) else {
                    return;
                };
                let pressed = element_state == ElementState::Pressed;
                self.pointer_button(button, pressed, egui_wants_pointer);
                window.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || egui_wants_keyboard {
                    return;
                }
                match event.logical_key {
                    Key::Named(NamedKey::Escape) => {
                        self.controller.cancel(&mut self.store);
                    }
                    Key::Character(ref c) if c.as_str().eq_ignore_ascii_case("g") => {
                        self.apply(UiAction::CycleGrid);
                    }
                    _ => {}
                }
                window.request_redraw();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if let Outcome::Released(_) = self.controller.expire_stale(&mut self.store, now) {
            if let Some(state) = &self.state {
                state.window.request_redraw();
            }
        }
        self.store.maybe_flush(now);

        if self.controller.is_active() || self.store.is_dirty() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(now + HOUSEKEEPING_INTERVAL));
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.store.flush();
    }
}

/// Open the configured layout directory, or fall back to memory.
fn open_storage(config: &Config) -> Arc<dyn Storage> {
    let opened = match &config.persistence.data_dir {
        Some(dir) => FileStorage::new(dir.clone()),
        None => FileStorage::default_location(),
    };
    match opened {
        Ok(storage) => {
            log::info!("Layouts stored in {}", storage.base_path().display());
            Arc::new(storage)
        }
        Err(e) => {
            log::error!("Layout storage unavailable ({}), changes will not persist", e);
            Arc::new(MemoryStorage::new())
        }
    }
}

/// Configured canvas size, shrunk to what the window can show.
fn canvas_container(config: &Config, window: LogicalSize<f64>) -> Dimensions {
    let min = config.grid_spec().min_size();
    let available_width = (window.width - 2.0 * CANVAS_MARGIN).floor() as i32;
    let available_height = (window.height - TOOLBAR_HEIGHT as f64 - CANVAS_MARGIN).floor() as i32;
    Dimensions::new(
        config.canvas.width.min(available_width).max(min.width),
        config.canvas.height.min(available_height).max(min.height),
    )
}

/// Top-left corner of the canvas in window points.
fn canvas_origin() -> egui::Vec2 {
    egui::vec2(CANVAS_MARGIN as f32, TOOLBAR_HEIGHT)
}

/// Window position to canvas coordinates.
fn to_canvas(position: PhysicalPosition<f64>, scale_factor: f64) -> Point {
    let logical = position.to_logical::<f64>(scale_factor);
    Point::new(logical.x - CANVAS_MARGIN, logical.y - TOOLBAR_HEIGHT as f64)
}

fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

fn cursor_icon(hovered: Option<PointerTarget>, mode: InteractionMode) -> egui::CursorIcon {
    let handle_cursor = |handle: Handle| match handle {
        Handle::NorthWest | Handle::SouthEast => egui::CursorIcon::ResizeNwSe,
        Handle::NorthEast | Handle::SouthWest => egui::CursorIcon::ResizeNeSw,
    };
    match mode {
        InteractionMode::Dragging { .. } => return egui::CursorIcon::Grabbing,
        InteractionMode::Resizing { handle, .. } => return handle_cursor(handle),
        InteractionMode::Idle => {}
    }
    match hovered {
        Some(PointerTarget::Handle(_, handle)) => handle_cursor(handle),
        Some(PointerTarget::RemoveButton(_)) => egui::CursorIcon::PointingHand,
        Some(PointerTarget::Body(_)) => egui::CursorIcon::Grab,
        Some(PointerTarget::Canvas) | None => egui::CursorIcon::Default,
    }
}

fn clear_color(color: Color) -> wgpu::Color {
    let [r, g, b, a] = color.components;
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridboard_core::Geometry;
    use kurbo::Vec2;

    fn app_in(dir: &std::path::Path) -> App {
        let mut config = Config::default();
        config.persistence.data_dir = Some(dir.to_path_buf());
        App::new(config)
    }

    #[test]
    fn test_canvas_container_shrinks_to_window() {
        let config = Config::default();
        let roomy = canvas_container(&config, LogicalSize::new(1600.0, 1000.0));
        assert_eq!(roomy, Dimensions::new(1200, 600));

        let small = canvas_container(&config, LogicalSize::new(640.0, 480.0));
        assert_eq!(small, Dimensions::new(600, 396));

        // Never smaller than one minimum-size widget
        let tiny = canvas_container(&config, LogicalSize::new(50.0, 50.0));
        assert_eq!(tiny, Dimensions::new(100, 60));
    }

    #[test]
    fn test_to_canvas_uses_logical_coordinates() {
        let point = to_canvas(PhysicalPosition::new(100.0, 296.0), 2.0);
        assert_eq!(point, Point::new(30.0, 84.0));
    }

    #[test]
    fn test_cursor_icons() {
        assert_eq!(
            cursor_icon(Some(PointerTarget::Handle(0, Handle::NorthEast)), InteractionMode::Idle),
            egui::CursorIcon::ResizeNeSw
        );
        assert_eq!(
            cursor_icon(Some(PointerTarget::Body(0)), InteractionMode::Idle),
            egui::CursorIcon::Grab
        );
        assert_eq!(
            cursor_icon(
                Some(PointerTarget::Canvas),
                InteractionMode::Dragging {
                    widget_id: 0,
                    pointer_offset: Vec2::ZERO
                }
            ),
            egui::CursorIcon::Grabbing
        );
        assert_eq!(cursor_icon(None, InteractionMode::Idle), egui::CursorIcon::Default);
    }

    #[test]
    fn test_map_button() {
        assert_eq!(map_button(winit::event::MouseButton::Left), Some(MouseButton::Left));
        assert_eq!(map_button(winit::event::MouseButton::Back), None);
    }

    #[test]
    fn test_toolbar_actions_update_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        assert!(app.store.is_empty());

        app.apply(UiAction::AddWidget);
        app.apply(UiAction::AddWidget);
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.store.get(0).map(|w| w.geometry()), Some(Geometry::new(20, 20, 200, 120)));

        app.apply(UiAction::DebugStorage);
        assert_eq!(app.ui_state.storage_debug, Some(2));

        // A second app over the same directory sees the saved layout
        assert_eq!(app_in(dir.path()).store.len(), 2);

        app.apply(UiAction::ClearAll);
        assert!(app.store.is_empty());
        assert_eq!(app.ui_state.storage_debug, None);
        assert!(app_in(dir.path()).store.is_empty());
    }

    #[test]
    fn test_pointer_gesture_through_tracker() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.apply(UiAction::AddWidget);

        app.tracker.moved(Point::new(30.0, 30.0));
        app.pointer_button(MouseButton::Left, true, false);
        assert!(app.controller.is_dragging(0));

        let event = app.tracker.moved(Point::new(67.0, 93.0));
        app.controller.handle_event(&mut app.store, event);
        app.tracker.left();
        app.pointer_button(MouseButton::Left, false, false);

        assert!(!app.controller.is_active());
        assert_eq!(app.store.get(0).map(|w| w.geometry()), Some(Geometry::new(60, 80, 200, 120)));
    }

    #[test]
    fn test_press_over_toolbar_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.apply(UiAction::AddWidget);

        app.tracker.moved(Point::new(30.0, 30.0));
        app.pointer_button(MouseButton::Left, true, true);
        assert!(!app.controller.is_active());
    }

    #[test]
    fn test_cycle_grid() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let before = app.ui_state.grid_style;
        app.apply(UiAction::CycleGrid);
        assert_eq!(app.ui_state.grid_style, before.next());
    }

    #[test]
    fn test_clear_color() {
        let c = clear_color(Color::from_rgba8(255, 0, 0, 255));
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 0.0, 0.0, 1.0));
    }
}
