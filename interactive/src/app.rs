use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use thiserror::Error;

use winit::dpi::{PhysicalPosition, PhysicalSize, Size};
use winit::event::{
    ElementState, Event, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use gl_wrapper::geometry::GBError;
use gl_wrapper::program::PBError;
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::texture::TextureError;

use splitview::controls::OrbitControls;
use splitview::layout::FixedLayout;
use splitview::render_loop::{RenderLoop, Surface, ViewGroup};

use splitview_common::image_out::{self, flip_rows};
use splitview_common::Demo;

use crate::args::ArgsInteractive;
use crate::gl_scene::GlScene;
use crate::surface::{GlSurface, GlWindow};

/// Wheel pixels that count as one zoom step on touchpads.
const PIXELS_PER_STEP: f64 = 50.0;

pub struct App {
    event_loop: EventLoop<()>,
    surface: GlSurface,
    gl_scene: GlScene,
    views: ViewGroup,
    layout: FixedLayout,
    controls: Vec<(String, OrbitControls)>,
    screenshot_dir: PathBuf,
}

impl App {
    pub fn new(demo: Demo, args: &ArgsInteractive) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(args.width, args.height)))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_title("Split view");
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new().with_depth_size(24);

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                // find_configs errors out before the picker runs when nothing
                // matches, so there is always at least one config here
                configs
                    .reduce(|best, config| {
                        if config.num_samples() > best.num_samples() {
                            config
                        } else {
                            best
                        }
                    })
                    .expect("find_configs returned no configs")
            })
            .map_err(|e| AppError::Display(e.to_string()))?;

        let window = window.ok_or(AppError::NoWindow)?;
        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| match CString::new(s) {
            Ok(s) => gl_display.get_proc_address(s.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        if let Some(version) = GlRenderer::version() {
            log::info!("using OpenGL {version}");
        }

        let surface = GlSurface::new(gl_context, gl_window);

        if let Err(e) = surface.set_vsync(!args.no_vsync) {
            log::warn!("could not change the swap interval: {e}");
        }

        let Demo {
            scene,
            views,
            layout,
            controls,
        } = demo;

        let gl_scene = GlScene::new(scene)?;

        Ok(Self {
            event_loop,
            surface,
            gl_scene,
            views,
            layout,
            controls,
            screenshot_dir: args.screenshot_dir.clone(),
        })
    }

    pub fn run(self) -> ! {
        let Self {
            event_loop,
            mut surface,
            mut gl_scene,
            mut views,
            mut layout,
            mut controls,
            screenshot_dir,
        } = self;

        let start = Instant::now();
        let mut render_loop = RenderLoop::new();
        render_loop.start(start.elapsed(), &mut surface);

        let mut cursor = PhysicalPosition::new(0.0, 0.0);
        let mut drag: Option<Drag> = None;
        let mut screenshot_requested = false;

        event_loop.run(move |event, _window_target, control_flow| {
            *control_flow = ControlFlow::Wait;
            match event {
                Event::RedrawRequested(_) => {
                    let (width, height) = surface.display_size();
                    layout.set_container_size(width as f64, height as f64);

                    let drawn = render_loop.frame(
                        start.elapsed(),
                        &mut surface,
                        &layout,
                        &mut views,
                        &mut gl_scene,
                    );

                    if drawn.is_none() {
                        return;
                    }

                    if screenshot_requested {
                        screenshot_requested = false;
                        save_screenshot(&surface, &screenshot_dir);
                    }

                    if let Err(e) = surface.present() {
                        log::error!("could not present frame: {e}");
                        control_flow.set_exit();
                    }
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) => {
                        log::debug!("window resized to {}x{}", size.width, size.height);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        if let Some(drag) = &drag {
                            let (dx, dy) = (position.x - cursor.x, position.y - cursor.y);

                            orbit(&mut controls, &mut views, &drag.view, |c| {
                                c.rotate(dx, dy, drag.height)
                            });
                        }

                        cursor = position;
                    }
                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => {
                        drag = match state {
                            ElementState::Pressed => views
                                .view_at(&layout, cursor.x, cursor.y)
                                .map(|(view, region)| Drag {
                                    view: view.to_string(),
                                    height: region.height,
                                }),
                            ElementState::Released => None,
                        };
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let steps = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_STEP) as f32,
                        };

                        let view = views
                            .view_at(&layout, cursor.x, cursor.y)
                            .map(|(view, _)| view.to_string());

                        if let Some(view) = view {
                            orbit(&mut controls, &mut views, &view, |c| c.zoom(steps));
                        }
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.virtual_keycode == Some(VirtualKeyCode::F12)
                            && input.state == ElementState::Pressed
                        {
                            screenshot_requested = true;
                        }
                    }
                    WindowEvent::CloseRequested => {
                        log::info!("closing after {} frames", render_loop.frames());
                        control_flow.set_exit();
                    }
                    _ => (),
                },
                _ => (),
            }
        })
    }
}

struct Drag {
    view: String,
    /// Height of the dragged view when the drag started
    height: f64,
}

/// Applies `f` to the controls of `view` and moves its camera to match.
/// Views without controls ignore input.
fn orbit(
    controls: &mut [(String, OrbitControls)],
    views: &mut ViewGroup,
    view: &str,
    f: impl FnOnce(&mut OrbitControls),
) {
    let Some((_, orbit)) = controls.iter_mut().find(|(id, _)| id == view) else {
        return;
    };

    f(orbit);

    if let Some(camera) = views.camera_mut(view) {
        orbit.update(camera);
    }
}

fn save_screenshot(surface: &GlSurface, dir: &Path) {
    let (width, height, pixels) = surface.read_pixels();

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let path = dir.join(format!("screenshot-{stamp}.png"));

    match image_out::write_rgba(&path, width, height, &flip_rows(&pixels, width)) {
        Ok(()) => log::info!("saved screenshot to {:?}", path),
        Err(e) => log::error!("could not save screenshot: {e}"),
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not create a GL display: {0}")]
    Display(String),
    #[error("the display did not create a window")]
    NoWindow,
    #[error("window has no pixels")]
    EmptyWindow,
    #[error(transparent)]
    Gl(#[from] glutin::error::Error),
    #[error("could not build shaders: {0}")]
    Program(#[from] PBError),
    #[error("could not upload geometry: {0}")]
    Geometry(#[from] GBError),
    #[error("could not upload texture: {0}")]
    Texture(#[from] TextureError),
}
