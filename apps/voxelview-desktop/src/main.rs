use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use voxelview_assets::TextureImage;
use voxelview_common::ViewerConfig;
use voxelview_input::{Control, InputController, KeyState, MouseLook, MovementParams};
use voxelview_kernel::VoxelGrid;
use voxelview_render::{
    Camera, DrawRecorder, FrameClock, LoopState, TileAtlas, Viewport, render_frame,
};
use voxelview_render_wgpu::WgpuRenderer;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "voxelview-desktop", about = "First-person voxel world viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file; missing keys use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Texture atlas to load (overrides the config)
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Generate the world, record one frame without a window and exit
    #[arg(long)]
    dry_run: bool,
}

/// Key bound to each control.
fn control_for(key: KeyCode) -> Option<Control> {
    match key {
        KeyCode::KeyW => Some(Control::Forward),
        KeyCode::KeyS => Some(Control::Back),
        KeyCode::KeyA => Some(Control::StrafeLeft),
        KeyCode::KeyD => Some(Control::StrafeRight),
        KeyCode::Space => Some(Control::Ascend),
        KeyCode::ShiftLeft | KeyCode::ControlLeft => Some(Control::Descend),
        KeyCode::Escape => Some(Control::Exit),
        _ => None,
    }
}

/// Everything the frame loop mutates, owned in one place.
struct AppContext {
    grid: VoxelGrid,
    camera: Camera,
    atlas: TileAtlas,
    controller: InputController,
    keys: KeyState,
    keys_down: HashSet<KeyCode>,
    mouse: MouseLook,
    clock: FrameClock,
    loop_state: LoopState,
    /// Raw device motion drives the look when the cursor is locked;
    /// otherwise absolute cursor positions do.
    relative_look: bool,
}

impl AppContext {
    fn new(config: &ViewerConfig) -> Self {
        let grid = VoxelGrid::generate(config.world);
        let controller = InputController::new(MovementParams::from(config));
        let camera = controller.spawn_camera(&grid);
        Self {
            grid,
            camera,
            atlas: TileAtlas::new(config.atlas_dimension),
            controller,
            keys: KeyState::new(),
            keys_down: HashSet::new(),
            mouse: MouseLook::new(),
            clock: FrameClock::new(config.max_frame_dt),
            loop_state: LoopState::default(),
            relative_look: true,
        }
    }

    fn mouse_motion(&mut self, dx: f64, dy: f64) {
        if !self.relative_look {
            return;
        }
        if let Some(look) = self.mouse.motion(dx, dy) {
            self.controller.look(&mut self.camera, look);
        }
    }

    fn cursor_moved(&mut self, x: f64, y: f64) {
        if self.relative_look {
            return;
        }
        if let Some(look) = self.mouse.cursor_moved(x, y) {
            self.controller.look(&mut self.camera, look);
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
        // Several keys may share a control; it stays held while any of them is down.
        if let Some(control) = control_for(key) {
            let held = self
                .keys_down
                .iter()
                .any(|k| control_for(*k) == Some(control));
            self.keys.set(control, held);
        }
    }

    fn release_all(&mut self) {
        self.keys_down.clear();
        self.keys.clear();
    }
}

/// GPU objects, declared in acquisition order.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
}

impl Gpu {
    /// Release in reverse acquisition order.
    fn release(self) {
        let Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
        } = self;
        drop(renderer);
        drop(config);
        drop(queue);
        drop(device);
        drop(surface);
        drop(window);
    }
}

struct GpuApp {
    config: ViewerConfig,
    ctx: AppContext,
    gpu: Option<Gpu>,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: ViewerConfig) -> Self {
        let ctx = AppContext::new(&config);
        Self {
            config,
            ctx,
            gpu: None,
            fatal: None,
        }
    }

    /// Create the window and GPU objects. Also reports whether the cursor
    /// could be locked.
    fn init_gpu(&self, event_loop: &ActiveEventLoop) -> Result<(Gpu, bool)> {
        tracing::info!("creating window");
        let attrs = Window::default_attributes()
            .with_title(self.config.window_title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        let locked = capture_cursor(&window);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("voxelview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create GPU device")?;

        device.on_uncaptured_error(Box::new(|error| {
            tracing::error!("unrecoverable GPU error: {error}");
            std::process::abort();
        }));

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let atlas_image = TextureImage::load(&self.config.texture_path).with_context(|| {
            format!(
                "failed to load texture atlas {}",
                self.config.texture_path.display()
            )
        })?;

        let renderer = WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            config.width,
            config.height,
            &atlas_image,
            self.ctx.grid.dims().volume(),
        )
        .context("failed to create voxel renderer")?;

        tracing::info!(
            "GPU initialized with {} backend, surface format {:?}",
            adapter.get_info().backend.to_str(),
            renderer.surface_format()
        );

        let gpu = Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
        };
        Ok((gpu, locked))
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.fatal = Some(error);
        self.ctx.loop_state.request_close();
        event_loop.exit();
    }

    /// One iteration of the frame loop.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        if !self.ctx.loop_state.is_running() {
            return;
        }

        let dt = self.ctx.clock.tick(Instant::now());
        let ctx = &mut self.ctx;
        let input = ctx
            .controller
            .update(&mut ctx.camera, &ctx.grid, &ctx.keys, dt);

        if let Err(e) = self.draw() {
            self.fail(event_loop, e);
            return;
        }

        if input.exit_requested {
            tracing::info!("exit requested");
            self.ctx.loop_state.request_close();
            event_loop.exit();
        }
    }

    fn draw(&mut self) -> Result<()> {
        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                return match surface_recovery(&e) {
                    SurfaceRecovery::Reconfigure => {
                        tracing::debug!("surface {e}, reconfiguring");
                        gpu.surface.configure(&gpu.device, &gpu.config);
                        Ok(())
                    }
                    SurfaceRecovery::Skip => {
                        tracing::warn!("surface {e}, skipping frame");
                        gpu.window.request_redraw();
                        Ok(())
                    }
                    SurfaceRecovery::Fatal => {
                        Err(e).context("failed to acquire surface texture")
                    }
                };
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let size = gpu.window.inner_size();
        let ctx = &self.ctx;
        render_frame(
            &mut gpu.renderer,
            &ctx.grid,
            &ctx.camera,
            &ctx.atlas,
            Viewport::new(size.width, size.height),
        );
        gpu.renderer
            .submit(&gpu.device, &gpu.queue, &view)
            .context("failed to submit frame")?;

        output.present();
        gpu.window.request_redraw();
        Ok(())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        gpu.config.width = new_size.width.max(1);
        gpu.config.height = new_size.height.max(1);
        gpu.surface.configure(&gpu.device, &gpu.config);
        gpu.renderer
            .resize(&gpu.device, gpu.config.width, gpu.config.height);
        tracing::debug!("resized to {}x{}", new_size.width, new_size.height);
    }
}

/// What the frame loop does when the next surface texture is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceRecovery {
    Reconfigure,
    Skip,
    Fatal,
}

fn surface_recovery(error: &wgpu::SurfaceError) -> SurfaceRecovery {
    match error {
        wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost => SurfaceRecovery::Reconfigure,
        wgpu::SurfaceError::Timeout => SurfaceRecovery::Skip,
        _ => SurfaceRecovery::Fatal,
    }
}

/// Hide the cursor and lock it, falling back to confining it.
///
/// Returns true when the cursor is locked, so raw device motion can drive
/// the look.
fn capture_cursor(window: &Window) -> bool {
    window.set_cursor_visible(false);
    match window.set_cursor_grab(CursorGrabMode::Locked) {
        Ok(()) => true,
        Err(locked_err) => {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined) {
                tracing::warn!("cursor grab unavailable: {e}");
            } else {
                tracing::debug!("cursor lock unavailable ({locked_err}), confining instead");
            }
            false
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() || self.ctx.loop_state.is_terminal() {
            return;
        }

        match self.init_gpu(event_loop) {
            Ok((gpu, locked)) => {
                self.gpu = Some(gpu);
                self.ctx.relative_look = locked;
                self.ctx.clock = FrameClock::new(self.config.max_frame_dt);
                self.ctx.loop_state.start();
                tracing::info!("entering main loop");
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.ctx.loop_state.request_close();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => self.resize(new_size),
            WindowEvent::Focused(focused) => {
                self.ctx.mouse.reset();
                if focused {
                    if let Some(gpu) = &self.gpu {
                        self.ctx.relative_look = capture_cursor(&gpu.window);
                    }
                } else {
                    self.ctx.release_all();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.ctx.handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.ctx.loop_state.is_running() {
                    self.ctx.cursor_moved(position.x, position.y);
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if !self.ctx.loop_state.is_running() {
                return;
            }
            self.ctx.mouse_motion(delta.0, delta.1);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        tracing::info!("exiting main loop");
        if let Some(gpu) = self.gpu.take() {
            gpu.release();
        }
    }
}

/// Record one frame without a window and report what would be drawn.
fn dry_run(config: &ViewerConfig) {
    let ctx = AppContext::new(config);
    let mut recorder = DrawRecorder::new();
    let stats = render_frame(
        &mut recorder,
        &ctx.grid,
        &ctx.camera,
        &ctx.atlas,
        Viewport::new(config.window_width, config.window_height),
    );
    tracing::info!(
        "dry run: {} draws, {} air cells skipped, camera at {}",
        stats.draws,
        stats.skipped_air,
        ctx.camera.position
    );
}

fn load_config(cli: &Cli) -> Result<ViewerConfig> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(texture) = &cli.texture {
        config.texture_path = texture.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("voxelview-desktop starting");
    let config = load_config(&cli).context("invalid configuration")?;

    if cli.dry_run {
        dry_run(&config);
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
