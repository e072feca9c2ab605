use std::ffi::{c_void, CStr};
use std::ops::Range;

use crate::geometry::Geometry;
use crate::program::Program;

/// Tracks the bits of GL state that change between views so redundant calls
/// are skipped.
pub struct GlRenderer {
    current_program: u32,
    scissor_test: bool,
    depth_test: bool,
    cull_faces: bool,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self {
            current_program: 0,
            scissor_test: false,
            depth_test: false,
            cull_faces: false,
        }
    }

    /// Version string of the current context.
    pub fn version() -> Option<String> {
        unsafe {
            let ptr = gl::GetString(gl::VERSION);
            if ptr.is_null() {
                return None;
            }

            Some(CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned())
        }
    }

    pub fn use_program(&mut self, program: &Program) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }
    }

    pub fn draw_range(&mut self, geometry: &Geometry, program: &Program, range: Range<usize>) {
        self.use_program(program);

        unsafe {
            gl::BindVertexArray(geometry.vao());
            gl::DrawArrays(gl::TRIANGLES, range.start as i32, range.len() as i32);
        }
    }

    pub fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe {
            gl::Viewport(x, y, width, height);
        }
    }

    pub fn set_scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe {
            gl::Scissor(x, y, width, height);
        }
    }

    pub fn scissor_test(&mut self, enabled: bool) {
        if self.scissor_test != enabled {
            toggle(gl::SCISSOR_TEST, enabled);
            self.scissor_test = enabled;
        }
    }

    pub fn depth_test(&mut self, enabled: bool) {
        if self.depth_test != enabled {
            toggle(gl::DEPTH_TEST, enabled);
            self.depth_test = enabled;
        }
    }

    pub fn cull_faces(&mut self, enabled: bool) {
        if self.cull_faces != enabled {
            toggle(gl::CULL_FACE, enabled);
            self.cull_faces = enabled;
        }
    }

    pub fn srgb_output(&self, enabled: bool) {
        toggle(gl::FRAMEBUFFER_SRGB, enabled);
    }

    /// Clears colour and depth, limited to the scissor box when the test is on.
    pub fn clear(&self, r: f32, g: f32, b: f32) {
        unsafe {
            gl::ClearColor(r, g, b, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    /// Reads RGBA8 pixels of the bound framebuffer, bottom row first.
    pub fn read_pixels(&self, width: u32, height: u32) -> Vec<u8> {
        let mut buf = vec![0_u8; width as usize * height as usize * 4];

        unsafe {
            gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
            gl::ReadPixels(
                0,
                0,
                width as i32,
                height as i32,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                buf.as_mut_ptr() as *mut c_void,
            );
        }

        buf
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn toggle(cap: u32, enabled: bool) {
    unsafe {
        if enabled {
            gl::Enable(cap);
        } else {
            gl::Disable(cap);
        }
    }
}
