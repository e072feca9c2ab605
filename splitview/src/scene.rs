use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, Zero};

use crate::animation::Spinners;
use crate::color::Color;
use crate::render_loop::Animate;
use crate::texture::Texture;

/// Upper bound of directional lights the mesh shader accepts.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// Floats per vertex: position, normal, uv
pub const VERTEX_STRIDE: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Geometry {
    Cube { width: f32, height: f32, depth: f32 },
    /// Lies in the XY plane facing +Z
    Plane { width: f32, height: f32 },
}

/// Interleaved vertices plus draw ranges, one range per material slot.
#[derive(Clone, Debug)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub groups: Vec<DrawRange>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawRange {
    pub first: usize,
    pub count: usize,
}

// normal, u axis, v axis; u x v == normal so the faces wind counter-clockwise
#[rustfmt::skip]
const CUBE_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

const QUAD_CORNERS: [(f32, f32); 6] = [
    (-1.0, -1.0),
    (1.0, -1.0),
    (1.0, 1.0),
    (-1.0, -1.0),
    (1.0, 1.0),
    (-1.0, 1.0),
];

impl Geometry {
    pub fn unit_cube() -> Self {
        Geometry::Cube {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }

    pub fn mesh_data(&self) -> MeshData {
        match *self {
            Geometry::Cube {
                width,
                height,
                depth,
            } => {
                let half = [width / 2.0, height / 2.0, depth / 2.0];
                let mut data = MeshData::with_capacity(CUBE_FACES.len());

                for (normal, u, v) in CUBE_FACES {
                    data.push_face(half, normal, u, v);
                }

                data
            }
            Geometry::Plane { width, height } => {
                let half = [width / 2.0, height / 2.0, 0.0];
                let mut data = MeshData::with_capacity(1);

                data.push_face(
                    half,
                    [0.0, 0.0, 1.0],
                    [1.0, 0.0, 0.0],
                    [0.0, 1.0, 0.0],
                );

                data
            }
        }
    }
}

impl MeshData {
    fn with_capacity(faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(faces * QUAD_CORNERS.len() * VERTEX_STRIDE),
            groups: Vec::with_capacity(faces),
        }
    }

    fn push_face(&mut self, half: [f32; 3], normal: [f32; 3], u: [f32; 3], v: [f32; 3]) {
        let first = self.vertices.len() / VERTEX_STRIDE;

        for (s, t) in QUAD_CORNERS {
            for axis in 0..3 {
                self.vertices
                    .push((normal[axis] + u[axis] * s + v[axis] * t) * half[axis]);
            }
            self.vertices.extend_from_slice(&normal);
            self.vertices.push((s + 1.0) / 2.0);
            self.vertices.push((t + 1.0) / 2.0);
        }

        self.groups.push(DrawRange {
            first,
            count: QUAD_CORNERS.len(),
        });
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shading {
    /// Colour and map only, ignores lights
    Basic,
    Phong,
    Standard,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub color: Color,
    /// Index into [`Scene::textures`]
    pub map: Option<usize>,
    pub double_sided: bool,
}

impl Material {
    pub fn basic(color: Color) -> Self {
        Self {
            shading: Shading::Basic,
            color,
            map: None,
            double_sided: false,
        }
    }

    pub fn phong(color: Color) -> Self {
        Self {
            shading: Shading::Phong,
            ..Self::basic(color)
        }
    }

    pub fn standard(color: Color) -> Self {
        Self {
            shading: Shading::Standard,
            ..Self::basic(color)
        }
    }

    pub fn with_map(mut self, texture: usize) -> Self {
        self.map = Some(texture);
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: Geometry,
    /// One material for the whole mesh or one per draw group
    pub materials: Vec<Material>,
    pub position: Vector3<f32>,
    /// Euler angles in radians, applied in XYZ order
    pub rotation: Vector3<f32>,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self::with_materials(geometry, vec![material])
    }

    pub fn with_materials(geometry: Geometry, materials: Vec<Material>) -> Self {
        Self {
            geometry,
            materials,
            position: Vector3::zero(),
            rotation: Vector3::zero(),
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    /// Material for the draw group at `group`, falling back to the first one.
    pub fn material_for_group(&self, group: usize) -> Option<&Material> {
        self.materials.get(group).or_else(|| self.materials.first())
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
        position: Point3<f32>,
        target: Point3<f32>,
    },
    Hemisphere {
        sky: Color,
        ground: Color,
        intensity: f32,
    },
}

/// Lights folded into the handful of values the mesh shader reads, in linear
/// colour space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightUniforms {
    pub ambient: [f32; 3],
    pub hemisphere_sky: [f32; 3],
    pub hemisphere_ground: [f32; 3],
    /// Direction towards the light and its colour
    pub directional: Vec<([f32; 3], [f32; 3])>,
}

impl LightUniforms {
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut uniforms = Self::default();

        for light in lights {
            match light {
                Light::Ambient { color, intensity } => {
                    add(&mut uniforms.ambient, color.to_linear().scale(*intensity));
                }
                Light::Hemisphere {
                    sky,
                    ground,
                    intensity,
                } => {
                    add(&mut uniforms.hemisphere_sky, sky.to_linear().scale(*intensity));
                    add(
                        &mut uniforms.hemisphere_ground,
                        ground.to_linear().scale(*intensity),
                    );
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                    target,
                } => {
                    if uniforms.directional.len() == MAX_DIRECTIONAL_LIGHTS {
                        log::warn!("ignoring directional light over the limit of {MAX_DIRECTIONAL_LIGHTS}");
                        continue;
                    }

                    let dir = position - target;
                    if dir.magnitude2() == 0.0 {
                        continue;
                    }

                    let dir = dir.normalize();
                    uniforms.directional.push((
                        [dir.x, dir.y, dir.z],
                        color.to_linear().scale(*intensity).to_array(),
                    ));
                }
            }
        }

        uniforms
    }
}

fn add(acc: &mut [f32; 3], color: Color) {
    acc[0] += color.r;
    acc[1] += color.g;
    acc[2] += color.b;
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub background: Color,
    pub textures: Vec<Texture>,
    pub meshes: Vec<Mesh>,
    pub lights: Vec<Light>,
    pub spinners: Spinners,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            textures: Vec::new(),
            meshes: Vec::new(),
            lights: Vec::new(),
            spinners: Spinners::new(),
        }
    }

    /// Returns the index to reference the texture from materials.
    pub fn push_texture(&mut self, texture: Texture) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    pub fn push_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn push_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn spin(&mut self, mesh: usize) {
        self.spinners.push(mesh);
    }

    pub fn light_uniforms(&self) -> LightUniforms {
        LightUniforms::from_lights(&self.lights)
    }
}

impl Animate for Scene {
    fn advance(&mut self, seconds: f64) {
        self.spinners.advance(seconds, &mut self.meshes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn cube_has_six_groups() {
        let data = Geometry::Cube {
            width: 2.0,
            height: 4.0,
            depth: 6.0,
        }
        .mesh_data();

        assert_eq!(data.vertex_count(), 36);
        assert_eq!(data.groups.len(), 6);
        assert_eq!(data.groups[5], DrawRange { first: 30, count: 6 });

        for vertex in data.vertices.chunks(VERTEX_STRIDE) {
            assert_eq!(vertex[0].abs(), 1.0);
            assert_eq!(vertex[1].abs(), 2.0);
            assert_eq!(vertex[2].abs(), 3.0);
            assert!((0.0..=1.0).contains(&vertex[6]));
            assert!((0.0..=1.0).contains(&vertex[7]));
        }
    }

    #[test]
    fn cube_faces_wind_outwards() {
        let data = Geometry::unit_cube().mesh_data();

        for tri in data.vertices.chunks(VERTEX_STRIDE * 3) {
            let p = |i: usize| {
                Vector3::new(
                    tri[i * VERTEX_STRIDE],
                    tri[i * VERTEX_STRIDE + 1],
                    tri[i * VERTEX_STRIDE + 2],
                )
            };
            let normal = Vector3::new(tri[3], tri[4], tri[5]);
            let winding = (p(1) - p(0)).cross(p(2) - p(0));

            assert!(winding.dot(normal) > 0.0);
        }
    }

    #[test]
    fn plane_faces_up_when_rotated() {
        let data = Geometry::Plane {
            width: 40.0,
            height: 40.0,
        }
        .mesh_data();
        assert_eq!(data.groups.len(), 1);
        assert_eq!(&data.vertices[3..6], &[0.0, 0.0, 1.0]);

        let mesh = Mesh::new(
            Geometry::Plane {
                width: 40.0,
                height: 40.0,
            },
            Material::phong(Color::WHITE),
        )
        .rotated(-std::f32::consts::FRAC_PI_2, 0.0, 0.0);

        let normal = mesh.model_matrix() * Vector4::new(0.0, 0.0, 1.0, 0.0);
        assert!((normal.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn material_fallback() {
        let mesh = Mesh::new(Geometry::unit_cube(), Material::basic(Color::WHITE));
        assert_eq!(mesh.material_for_group(3), mesh.materials.first());

        let faces = (0..6)
            .map(|i| Material::basic(Color::WHITE).with_map(i))
            .collect();
        let mesh = Mesh::with_materials(Geometry::unit_cube(), faces);
        assert_eq!(mesh.material_for_group(4).and_then(|m| m.map), Some(4));
    }

    #[test]
    fn light_folding() {
        let lights = vec![
            Light::Ambient {
                color: Color::WHITE,
                intensity: 0.2,
            },
            Light::Directional {
                color: Color::WHITE,
                intensity: 1.0,
                position: Point3::new(0.0, 10.0, 0.0),
                target: Point3::new(0.0, 0.0, 0.0),
            },
            Light::Hemisphere {
                sky: Color::WHITE,
                ground: Color::BLACK,
                intensity: 1.0,
            },
        ];

        let uniforms = LightUniforms::from_lights(&lights);

        assert!((uniforms.ambient[0] - 0.2).abs() < 1e-6);
        assert_eq!(uniforms.hemisphere_ground, [0.0; 3]);
        assert_eq!(uniforms.directional.len(), 1);
        assert_eq!(uniforms.directional[0].0, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn directional_limit() {
        let light = Light::Directional {
            color: Color::WHITE,
            intensity: 1.0,
            position: Point3::new(1.0, 2.0, 4.0),
            target: Point3::new(0.0, 0.0, 0.0),
        };
        let lights = vec![light; MAX_DIRECTIONAL_LIGHTS + 2];

        assert_eq!(
            LightUniforms::from_lights(&lights).directional.len(),
            MAX_DIRECTIONAL_LIGHTS
        );
    }

    #[test]
    fn scene_animates_spinners() {
        let mut scene = Scene::new(Color::BLACK);
        let floor = scene.push_mesh(Mesh::new(
            Geometry::Plane {
                width: 1.0,
                height: 1.0,
            },
            Material::phong(Color::WHITE),
        ));
        let cube = scene.push_mesh(Mesh::new(
            Geometry::unit_cube(),
            Material::phong(Color::WHITE),
        ));
        scene.spin(cube);

        scene.advance(0.5);

        assert_eq!(scene.meshes[cube].rotation.x, 0.5);
        assert_eq!(scene.meshes[floor].rotation.x, 0.0);
    }
}
