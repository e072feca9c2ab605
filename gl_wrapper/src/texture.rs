use std::ffi::c_void;
use thiserror::Error;

pub struct Texture2D {
    id: u32,
}

impl Texture2D {
    /// Uploads tightly packed 8 bit pixels, first row at the bottom as GL
    /// expects, and builds the mip chain.
    pub fn new(
        width: u32,
        height: u32,
        data: &[u8],
        format: TextureFormats,
        options: TextureOptions,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }

        if (width as usize * height as usize * format.channels() as usize) != data.len() {
            return Err(TextureError::InvalidSrcLength);
        }

        let mut id = 0;

        unsafe {
            gl::GenTextures(1, (&mut id) as *mut u32);
            gl::BindTexture(gl::TEXTURE_2D, id);

            let wrap = options.wrap.gl_enum() as i32;
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                gl::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MAG_FILTER,
                options.mag_filter.gl_enum() as i32,
            );

            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format.internal_format() as i32,
                width as i32,
                height as i32,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                data.as_ptr() as *const c_void,
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);

            gl::BindTexture(gl::TEXTURE_2D, 0);
        }

        Ok(Self { id })
    }

    pub fn bind(&self, unit: u8) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as u32);
            gl::BindTexture(gl::TEXTURE_2D, self.id)
        }
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, (&self.id) as *const u32);
        }
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Invalid source data length")]
    InvalidSrcLength,
    #[error("Texture has no pixels")]
    Empty,
}

#[derive(Copy, Clone, Debug)]
pub enum TextureFormats {
    Rgba8,
    /// Colour data that GL linearises when sampling
    Srgba8,
}

impl TextureFormats {
    pub fn channels(&self) -> u8 {
        match self {
            TextureFormats::Rgba8 | TextureFormats::Srgba8 => 4,
        }
    }

    fn internal_format(&self) -> u32 {
        match self {
            TextureFormats::Rgba8 => gl::RGBA8,
            TextureFormats::Srgba8 => gl::SRGB8_ALPHA8,
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct TextureOptions {
    pub wrap: TextureWrap,
    pub mag_filter: TextureFilter,
}

#[derive(Copy, Clone, Debug, Default)]
pub enum TextureWrap {
    #[default]
    ClampToEdge,
    Repeat,
}

impl TextureWrap {
    fn gl_enum(&self) -> u32 {
        match self {
            TextureWrap::ClampToEdge => gl::CLAMP_TO_EDGE,
            TextureWrap::Repeat => gl::REPEAT,
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

impl TextureFilter {
    fn gl_enum(&self) -> u32 {
        match self {
            TextureFilter::Nearest => gl::NEAREST,
            TextureFilter::Linear => gl::LINEAR,
        }
    }
}
