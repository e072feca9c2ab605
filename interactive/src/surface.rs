use std::num::NonZeroU32;

use glutin::config::Config;
use glutin::context::PossiblyCurrentContext;
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface as _, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};

use raw_window_handle::HasRawWindowHandle;

use winit::window::Window;

use gl_wrapper::renderer::GlRenderer;

use splitview::region::Region;
use splitview::render_loop;

use crate::app::AppError;

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).ok_or(AppError::EmptyWindow)?,
            NonZeroU32::new(height).ok_or(AppError::EmptyWindow)?,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

/// The window as the render loop sees it. Regions map to GL scissor and
/// viewport boxes, redraw requests stand in for display refresh callbacks.
pub struct GlSurface {
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    renderer: GlRenderer,
    buffer_size: (u32, u32),
}

impl GlSurface {
    pub fn new(gl_context: PossiblyCurrentContext, gl_window: GlWindow) -> Self {
        let buffer_size = gl_window.window.inner_size().into();

        Self {
            gl_context,
            gl_window,
            renderer: GlRenderer::new(),
            buffer_size,
        }
    }

    pub fn window(&self) -> &Window {
        &self.gl_window.window
    }

    pub fn set_vsync(&self, enabled: bool) -> Result<(), AppError> {
        let interval = if enabled {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };

        self.gl_window
            .surface
            .set_swap_interval(&self.gl_context, interval)?;

        Ok(())
    }

    /// Shows the finished frame. With vsync on this blocks until the next
    /// display refresh.
    pub fn present(&self) -> Result<(), AppError> {
        self.gl_window.surface.swap_buffers(&self.gl_context)?;

        Ok(())
    }

    /// Full backing buffer, bottom row first.
    pub fn read_pixels(&self) -> (u32, u32, Vec<u8>) {
        let (width, height) = self.buffer_size;
        let pixels = self.renderer.read_pixels(width, height);

        (width, height, pixels)
    }
}

impl render_loop::Surface for GlSurface {
    fn display_size(&self) -> (u32, u32) {
        self.gl_window.window.inner_size().into()
    }

    fn buffer_size(&self) -> (u32, u32) {
        self.buffer_size
    }

    fn resize_buffer(&mut self, width: u32, height: u32) {
        // minimised windows report a zero size, keep the old buffer
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.gl_window.surface.resize(&self.gl_context, w, h);
            log::debug!("backing buffer resized to {width}x{height}");
        }

        self.buffer_size = (width, height);
    }

    fn set_clip(&mut self, region: &Region) {
        let b = region.to_scissor();

        self.renderer.scissor_test(true);
        self.renderer.set_scissor(b.x, b.y, b.width, b.height);
        self.renderer.set_viewport(b.x, b.y, b.width, b.height);
    }

    fn request_frame(&mut self) {
        self.gl_window.window.request_redraw();
    }
}
