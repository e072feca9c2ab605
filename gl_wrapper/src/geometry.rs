use std::ffi::c_void;
use std::ops::Range;

use thiserror::Error;

/// Uploads interleaved `f32` vertex data into a vertex array object.
///
/// Attributes are bound to locations in the order they are added.
pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    groups: Vec<Range<usize>>,
    data: &'a [f32],
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Marks a range of vertices that is drawn with its own material.
    pub fn with_group(mut self, first: usize, count: usize) -> Self {
        self.groups.push(first..first + count);
        self
    }

    pub fn build(self) -> Result<Geometry, GBError> {
        let stride: usize = self.attributes.iter().map(|a| a.size()).sum();

        if stride == 0 {
            return Err(GBError::NoAttributes);
        }

        if self.data.len() % stride != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let vertices = self.data.len() / stride;

        if let Some(group) = self.groups.iter().find(|g| g.end > vertices) {
            return Err(GBError::GroupOutOfRange(group.clone(), vertices));
        }

        let groups = if self.groups.is_empty() {
            vec![0..vertices]
        } else {
            self.groups
        };

        let mut vao = 0;
        let mut vbo = 0;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(self.data) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            let stride_bytes = (stride * std::mem::size_of::<f32>()) as i32;
            let mut offset = 0;

            for (location, attr) in self.attributes.iter().enumerate() {
                gl::VertexAttribPointer(
                    location as u32,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    stride_bytes,
                    (offset * std::mem::size_of::<f32>()) as *const c_void,
                );
                gl::EnableVertexAttribArray(location as u32);
                offset += attr.size();
            }

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        Ok(Geometry {
            vao,
            vbo,
            groups,
        })
    }
}

#[derive(Debug, Error)]
pub enum GBError {
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Geometry needs at least one attribute")]
    NoAttributes,
    #[error("Group {0:?} is outside of the {1} uploaded vertices")]
    GroupOutOfRange(Range<usize>, usize),
}

pub enum VertexAttribute {
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    groups: Vec<Range<usize>>,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    /// Vertex ranges in upload order, the whole buffer if none were given.
    pub fn groups(&self) -> &[Range<usize>] {
        &self.groups
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}
