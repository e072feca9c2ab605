use std::ffi::{c_char, CString};

use gl::types::{GLenum, GLint, GLuint};
use thiserror::Error;

const LOG_SIZE: usize = 1024;

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    pub fn build(self) -> Result<Program, PBError> {
        let vert = compile(gl::VERTEX_SHADER, self.vert)?;
        let frag = match compile(gl::FRAGMENT_SHADER, self.frag) {
            Ok(frag) => frag,
            Err(e) => {
                unsafe { gl::DeleteShader(vert) };
                return Err(e);
            }
        };

        let mut success: GLint = 0;

        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut GLint);
            if success != 1 {
                let mut buf = [0_u8; LOG_SIZE];
                gl::GetProgramInfoLog(
                    program,
                    LOG_SIZE as i32,
                    std::ptr::null_mut(),
                    buf.as_mut_ptr() as *mut c_char,
                );
                gl::DeleteProgram(program);

                return Err(PBError::Linking(log_to_string(&buf)));
            }

            Ok(Program { id: program })
        }
    }
}

fn compile(kind: GLenum, src: &str) -> Result<GLuint, PBError> {
    let src = CString::new(src).map_err(|_| PBError::InteriorNul)?;
    let mut success: GLint = 0;

    unsafe {
        let shader = gl::CreateShader(kind);

        gl::ShaderSource(
            shader,
            1,
            (&src.as_ptr()) as *const *const c_char,
            std::ptr::null(),
        );
        gl::CompileShader(shader);

        gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut GLint);
        if success != 1 {
            let mut buf = [0_u8; LOG_SIZE];
            gl::GetShaderInfoLog(
                shader,
                LOG_SIZE as i32,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut c_char,
            );
            gl::DeleteShader(shader);

            let stage = if kind == gl::VERTEX_SHADER {
                "vertex"
            } else {
                "fragment"
            };

            return Err(PBError::Compilation(stage, log_to_string(&buf)));
        }

        Ok(shader)
    }
}

fn log_to_string(buf: &[u8]) -> String {
    let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());

    String::from_utf8_lossy(&buf[..end]).trim_end().to_string()
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("{0} shader: {1}")]
    Compilation(&'static str, String),
    #[error("{0}")]
    Linking(String),
    #[error("Shader source contains a NUL byte")]
    InteriorNul,
}

/// Linked shader program. Uniform setters expect the program to be in use.
pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    /// `-1` when the uniform does not exist or was optimised out, which GL
    /// silently ignores on upload.
    pub fn uniform_location(&self, name: &str) -> GLint {
        match CString::new(name) {
            Ok(name) => unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) },
            Err(_) => -1,
        }
    }

    pub fn set_mat4(&self, name: &str, value: &[f32; 16]) {
        unsafe {
            gl::UniformMatrix4fv(self.uniform_location(name), 1, gl::FALSE, value.as_ptr());
        }
    }

    pub fn set_vec3(&self, name: &str, value: [f32; 3]) {
        unsafe { gl::Uniform3f(self.uniform_location(name), value[0], value[1], value[2]) }
    }

    pub fn set_vec2(&self, name: &str, value: [f32; 2]) {
        unsafe { gl::Uniform2f(self.uniform_location(name), value[0], value[1]) }
    }

    pub fn set_f32(&self, name: &str, value: f32) {
        unsafe { gl::Uniform1f(self.uniform_location(name), value) }
    }

    pub fn set_i32(&self, name: &str, value: i32) {
        unsafe { gl::Uniform1i(self.uniform_location(name), value) }
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_i32(name, value as i32);
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}
