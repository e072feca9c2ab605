use crate::scene::Mesh;

/// Meshes spinning on their x and y axes, each one a little faster than the
/// one before it.
#[derive(Clone, Debug, Default)]
pub struct Spinners {
    meshes: Vec<usize>,
}

impl Spinners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mesh: usize) {
        self.meshes.push(mesh);
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Sets the rotation for `seconds` since the animation started. Indices
    /// that do not name a mesh are ignored.
    pub fn advance(&self, seconds: f64, meshes: &mut [Mesh]) {
        for (ndx, &index) in self.meshes.iter().enumerate() {
            let speed = 1.0 + ndx as f64 * 0.1;
            let rot = (seconds * speed) as f32;

            if let Some(mesh) = meshes.get_mut(index) {
                mesh.rotation.x = rot;
                mesh.rotation.y = rot;
            }
        }
    }
}
