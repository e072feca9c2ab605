use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use cgmath::Point3;

use serde::Deserialize;

use thiserror::Error;

use splitview::camera::PerspectiveCamera;
use splitview::controls::OrbitControls;
use splitview::layout::{Anchor, FixedLayout};
use splitview::render_loop::{CameraBinding, ViewGroup};
use splitview::scene::{Geometry, Light, Material, Mesh, Scene};
use splitview::texture::{Filter, Texture, TextureSource, Wrap, MAX_TEXTURE_SIZE};
use splitview::Color;

use crate::presets::{named_texture, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::Demo;

const DEFAULT_TEXTURE_SIZE: u32 = 256;

/// Reads json5 scene descriptions.
///
/// ```json5
/// {
///   background: "#aaaaaa",
///   textures: { floor: { source: { kind: "named", name: "checker" }, wrap: "repeat", repeat: 20 } },
///   materials: { ground: { shading: "phong", map: "floor", double_sided: true } },
///   meshes: [{ geometry: { kind: "plane", width: 40, height: 40 }, materials: ["ground"], rotation: [-1.5708, 0, 0] }],
///   lights: [{ kind: "ambient", color: "#ffffff", intensity: 0.2 }],
///   views: [{ id: "view1", anchor: [0, 0, 0.5, 1], camera: { fov: 45, position: [0, 5, 10], target: [0, 5, 0] }, orbit: true }],
/// }
/// ```
pub struct SceneLoader {}

impl SceneLoader {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Demo, LoaderError> {
        let scene_str = std::fs::read_to_string(path).map_err(LoaderError::InputError)?;

        Self::load_from_str(&scene_str)
    }

    pub fn load_from_str(src: &str) -> Result<Demo, LoaderError> {
        let file: SceneFile = json5::from_str(src).map_err(LoaderError::FormatError)?;

        let background = match &file.background {
            Some(bg) => parse_color(bg)?,
            None => Color::BLACK,
        };

        let mut scene = Scene::new(background);

        let mut texture_ids = HashMap::new();
        for (name, stub) in &file.textures {
            let texture = build_texture(stub)?;
            texture_ids.insert(name.as_str(), scene.push_texture(texture));
        }

        let mut materials = HashMap::new();
        for (name, stub) in &file.materials {
            materials.insert(name.as_str(), build_material(stub, &texture_ids)?);
        }

        for stub in &file.meshes {
            if stub.materials.is_empty() {
                return Err(LoaderError::KeyError("materials"));
            }

            let mesh_materials = stub
                .materials
                .iter()
                .map(|name| {
                    materials
                        .get(name.as_str())
                        .cloned()
                        .ok_or_else(|| LoaderError::IndexError(name.clone(), "materials"))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let mut mesh = Mesh::with_materials(build_geometry(&stub.geometry)?, mesh_materials);
            if let Some([x, y, z]) = stub.position {
                mesh = mesh.at(x, y, z);
            }
            if let Some([x, y, z]) = stub.rotation {
                mesh = mesh.rotated(x, y, z);
            }

            let index = scene.push_mesh(mesh);
            if stub.spin {
                scene.spin(index);
            }
        }

        for stub in &file.lights {
            scene.push_light(build_light(stub)?);
        }

        if file.views.is_empty() {
            return Err(LoaderError::KeyError("views"));
        }

        let mut views = ViewGroup::new();
        let mut layout = FixedLayout::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        let mut controls = Vec::new();

        for stub in &file.views {
            if views.bindings().iter().any(|b| b.view == stub.id) {
                return Err(LoaderError::Other(format!("duplicate view {}", stub.id)));
            }

            let [left, top, width, height] = stub.anchor;
            layout.set_view(stub.id.clone(), Anchor::new(left, top, width, height));

            let mut camera = build_camera(&stub.camera)?;

            if stub.orbit {
                let orbit = OrbitControls::new(&camera, camera.target);
                orbit.update(&mut camera);
                controls.push((stub.id.clone(), orbit));
            }

            if !camera.has_view_basis() {
                return Err(LoaderError::Other(format!(
                    "camera of view {} sits on its target or looks straight along up",
                    stub.id
                )));
            }

            let mut binding = CameraBinding::new(stub.id.clone(), camera);
            if let Some(bg) = &stub.background {
                binding = binding.with_background(parse_color(bg)?);
            }

            views.push(binding);
        }

        log::debug!(
            "loaded scene with {} meshes, {} lights and {} views",
            scene.meshes.len(),
            scene.lights.len(),
            views.len()
        );

        Ok(Demo {
            scene,
            views,
            layout,
            controls,
        })
    }
}

fn parse_color(src: &str) -> Result<Color, LoaderError> {
    Color::parse(src).ok_or_else(|| LoaderError::Other(format!("invalid colour {src:?}")))
}

fn parse_opt_color(src: &Option<String>, default: Color) -> Result<Color, LoaderError> {
    match src {
        Some(s) => parse_color(s),
        None => Ok(default),
    }
}

fn build_texture(stub: &TextureStub) -> Result<Texture, LoaderError> {
    let source = match &stub.source {
        SourceStub::Named { name } => named_texture(name)
            .ok_or_else(|| LoaderError::IndexError(name.clone(), "named textures"))?,
        SourceStub::Checker { cells, light, dark } => TextureSource::Checker {
            cells: *cells,
            light: parse_opt_color(light, Color::WHITE)?,
            dark: parse_opt_color(dark, Color::BLACK)?,
        },
        SourceStub::Bricks {
            rows,
            columns,
            brick,
            mortar,
        } => TextureSource::Bricks {
            rows: *rows,
            columns: *columns,
            brick: parse_opt_color(brick, Color::from_hex(0x9c4a2f))?,
            mortar: parse_opt_color(mortar, Color::from_hex(0xd8d0c0))?,
        },
        SourceStub::Petals {
            count,
            petal,
            center,
            background,
        } => TextureSource::Petals {
            count: *count,
            petal: parse_opt_color(petal, Color::WHITE)?,
            center: parse_opt_color(center, Color::from_hex(0xffd23f))?,
            background: parse_opt_color(background, Color::BLACK)?,
        },
        SourceStub::Worley { scale, seed, tint } => TextureSource::Worley {
            scale: *scale,
            seed: *seed,
            tint: parse_opt_color(tint, Color::WHITE)?,
        },
    };

    let size = stub.size.unwrap_or(DEFAULT_TEXTURE_SIZE);
    if size == 0 || size > MAX_TEXTURE_SIZE {
        return Err(LoaderError::Other(format!(
            "texture size {size} is outside 1..={MAX_TEXTURE_SIZE}"
        )));
    }

    let mut texture = Texture::new(source, size);
    texture.wrap = match stub.wrap {
        WrapStub::Clamp => Wrap::Clamp,
        WrapStub::Repeat => Wrap::Repeat,
    };
    texture.mag_filter = match stub.mag_filter {
        FilterStub::Nearest => Filter::Nearest,
        FilterStub::Linear => Filter::Linear,
    };
    if let Some(r) = stub.repeat {
        texture.repeat = (r, r);
    }
    texture.srgb = stub.srgb;

    Ok(texture)
}

fn build_material(
    stub: &MaterialStub,
    textures: &HashMap<&str, usize>,
) -> Result<Material, LoaderError> {
    let color = parse_opt_color(&stub.color, Color::WHITE)?;

    let mut material = match stub.shading {
        ShadingStub::Basic => Material::basic(color),
        ShadingStub::Phong => Material::phong(color),
        ShadingStub::Standard => Material::standard(color),
    };

    if let Some(map) = &stub.map {
        let id = textures
            .get(map.as_str())
            .ok_or_else(|| LoaderError::IndexError(map.clone(), "textures"))?;
        material = material.with_map(*id);
    }

    if stub.double_sided {
        material = material.double_sided();
    }

    Ok(material)
}

fn build_geometry(stub: &GeometryStub) -> Result<Geometry, LoaderError> {
    let geometry = match *stub {
        GeometryStub::Cube {
            width,
            height,
            depth,
        } => Geometry::Cube {
            width,
            height,
            depth,
        },
        GeometryStub::Plane { width, height } => Geometry::Plane { width, height },
    };

    let positive = match geometry {
        Geometry::Cube {
            width,
            height,
            depth,
        } => width > 0.0 && height > 0.0 && depth > 0.0,
        Geometry::Plane { width, height } => width > 0.0 && height > 0.0,
    };

    if !positive {
        return Err(LoaderError::Other("geometry sizes must be positive".into()));
    }

    Ok(geometry)
}

fn build_light(stub: &LightStub) -> Result<Light, LoaderError> {
    let light = match stub {
        LightStub::Ambient { color, intensity } => Light::Ambient {
            color: parse_opt_color(color, Color::WHITE)?,
            intensity: *intensity,
        },
        LightStub::Directional {
            color,
            intensity,
            position,
            target,
        } => Light::Directional {
            color: parse_opt_color(color, Color::WHITE)?,
            intensity: *intensity,
            position: Point3::from(*position),
            target: Point3::from(target.unwrap_or([0.0; 3])),
        },
        LightStub::Hemisphere {
            sky,
            ground,
            intensity,
        } => Light::Hemisphere {
            sky: parse_color(sky)?,
            ground: parse_color(ground)?,
            intensity: *intensity,
        },
    };

    Ok(light)
}

fn build_camera(stub: &CameraStub) -> Result<PerspectiveCamera, LoaderError> {
    if !(stub.fov > 0.0 && stub.fov < 180.0) {
        return Err(LoaderError::Other(format!("invalid fov {}", stub.fov)));
    }

    if !(stub.near > 0.0 && stub.far > stub.near) {
        return Err(LoaderError::Other(format!(
            "invalid clip planes {}..{}",
            stub.near, stub.far
        )));
    }

    let mut camera = PerspectiveCamera::new(stub.fov, 2.0, stub.near, stub.far);
    camera.position = Point3::from(stub.position);

    if let Some(target) = stub.target {
        camera.look_at(Point3::from(target));
    }

    Ok(camera)
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("{0}")]
    InputError(#[source] std::io::Error),
    #[error("{0}")]
    FormatError(#[source] json5::Error),
    #[error("no index {0} found in {1}")]
    IndexError(String, &'static str),
    #[error("no key '{0}' found")]
    KeyError(&'static str),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Deserialize)]
struct SceneFile {
    background: Option<String>,
    #[serde(default)]
    textures: BTreeMap<String, TextureStub>,
    #[serde(default)]
    materials: BTreeMap<String, MaterialStub>,
    #[serde(default)]
    meshes: Vec<MeshStub>,
    #[serde(default)]
    lights: Vec<LightStub>,
    #[serde(default)]
    views: Vec<ViewStub>,
}

#[derive(Debug, Deserialize)]
struct TextureStub {
    source: SourceStub,
    size: Option<u32>,
    #[serde(default)]
    wrap: WrapStub,
    #[serde(default)]
    mag_filter: FilterStub,
    repeat: Option<f32>,
    #[serde(default = "default_true")]
    srgb: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SourceStub {
    Named {
        name: String,
    },
    Checker {
        cells: u32,
        light: Option<String>,
        dark: Option<String>,
    },
    Bricks {
        rows: u32,
        columns: u32,
        brick: Option<String>,
        mortar: Option<String>,
    },
    Petals {
        count: u32,
        petal: Option<String>,
        center: Option<String>,
        background: Option<String>,
    },
    Worley {
        scale: f64,
        #[serde(default)]
        seed: u64,
        tint: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum WrapStub {
    #[default]
    Clamp,
    Repeat,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FilterStub {
    Nearest,
    #[default]
    Linear,
}

#[derive(Debug, Deserialize)]
struct MaterialStub {
    shading: ShadingStub,
    color: Option<String>,
    map: Option<String>,
    #[serde(default)]
    double_sided: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ShadingStub {
    Basic,
    Phong,
    Standard,
}

#[derive(Debug, Deserialize)]
struct MeshStub {
    geometry: GeometryStub,
    materials: Vec<String>,
    position: Option<[f32; 3]>,
    rotation: Option<[f32; 3]>,
    #[serde(default)]
    spin: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum GeometryStub {
    Cube { width: f32, height: f32, depth: f32 },
    Plane { width: f32, height: f32 },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum LightStub {
    Ambient {
        color: Option<String>,
        intensity: f32,
    },
    Directional {
        color: Option<String>,
        intensity: f32,
        position: [f32; 3],
        target: Option<[f32; 3]>,
    },
    Hemisphere {
        sky: String,
        ground: String,
        intensity: f32,
    },
}

#[derive(Debug, Deserialize)]
struct ViewStub {
    id: String,
    anchor: [f64; 4],
    camera: CameraStub,
    background: Option<String>,
    #[serde(default)]
    orbit: bool,
}

#[derive(Debug, Deserialize)]
struct CameraStub {
    fov: f32,
    #[serde(default = "default_near")]
    near: f32,
    #[serde(default = "default_far")]
    far: f32,
    position: [f32; 3],
    target: Option<[f32; 3]>,
}

fn default_true() -> bool {
    true
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitview::layout::Layout;

    const SPLIT: &str = include_str!("../scenes/split.json5");

    #[test]
    fn loads_split_scene() {
        let demo = SceneLoader::load_from_str(SPLIT).unwrap();

        assert_eq!(demo.views.len(), 2);
        assert_eq!(demo.controls.len(), 2);
        assert_eq!(demo.scene.meshes.len(), 4);
        assert_eq!(demo.scene.spinners.len(), 3);
        assert_eq!(demo.scene.lights.len(), 2);
        assert_eq!(demo.scene.meshes[2].materials.len(), 6);

        let view2 = demo.layout.view_rect("view2").unwrap();
        assert_eq!(view2.left, DEFAULT_WIDTH / 2.0);

        let binding = &demo.views.bindings()[1];
        assert_eq!(binding.camera.fov, 60.0);
        assert_eq!(binding.camera.far, 500.0);
        assert_eq!(binding.background, Some(Color::from_hex(0x000040)));
    }

    #[test]
    fn unknown_material() {
        let src = r#"{
            meshes: [{ geometry: { kind: "cube", width: 1, height: 1, depth: 1 }, materials: ["missing"] }],
            views: [{ id: "main", anchor: [0, 0, 1, 1], camera: { fov: 75, position: [0, 0, 2] } }],
        }"#;

        match SceneLoader::load_from_str(src) {
            Err(LoaderError::IndexError(name, "materials")) => assert_eq!(name, "missing"),
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("scene should not load"),
        }
    }

    #[test]
    fn needs_a_view() {
        let src = r##"{ background: "#000000" }"##;

        assert!(matches!(
            SceneLoader::load_from_str(src),
            Err(LoaderError::KeyError("views"))
        ));
    }

    #[test]
    fn rejects_bad_values() {
        let bad_color = r#"{
            background: "grey",
            views: [{ id: "main", anchor: [0, 0, 1, 1], camera: { fov: 75, position: [0, 0, 2] } }],
        }"#;
        assert!(matches!(
            SceneLoader::load_from_str(bad_color),
            Err(LoaderError::Other(_))
        ));

        let bad_fov = r#"{
            views: [{ id: "main", anchor: [0, 0, 1, 1], camera: { fov: 0, position: [0, 0, 2] } }],
        }"#;
        assert!(matches!(
            SceneLoader::load_from_str(bad_fov),
            Err(LoaderError::Other(_))
        ));

        let duplicate = r#"{
            views: [
                { id: "main", anchor: [0, 0, 1, 1], camera: { fov: 75, position: [0, 0, 2] } },
                { id: "main", anchor: [0, 0, 1, 1], camera: { fov: 75, position: [0, 0, 2] } },
            ],
        }"#;
        assert!(matches!(
            SceneLoader::load_from_str(duplicate),
            Err(LoaderError::Other(_))
        ));
    }

    #[test]
    fn syntax_errors_are_format_errors() {
        assert!(matches!(
            SceneLoader::load_from_str("{ views: [ }"),
            Err(LoaderError::FormatError(_))
        ));
    }

    #[test]
    fn texture_size_is_bounded() {
        for size in [0, MAX_TEXTURE_SIZE + 1, 32768] {
            let src = format!(
                r#"{{
                    textures: {{ big: {{ source: {{ kind: "named", name: "checker" }}, size: {size} }} }},
                    views: [{{ id: "main", anchor: [0, 0, 1, 1], camera: {{ fov: 75, position: [0, 0, 2] }} }}],
                }}"#
            );

            assert!(
                matches!(SceneLoader::load_from_str(&src), Err(LoaderError::Other(_))),
                "{size}"
            );
        }
    }

    #[test]
    fn degenerate_cameras() {
        let looking_down = r#"{
            views: [{ id: "top", anchor: [0, 0, 1, 1], camera: { fov: 45, position: [0, 10, 0], target: [0, 0, 0] } }],
        }"#;
        assert!(matches!(
            SceneLoader::load_from_str(looking_down),
            Err(LoaderError::Other(_))
        ));

        let on_target = r#"{
            views: [{ id: "main", anchor: [0, 0, 1, 1], camera: { fov: 45, position: [1, 1, 1], target: [1, 1, 1] } }],
        }"#;
        assert!(matches!(
            SceneLoader::load_from_str(on_target),
            Err(LoaderError::Other(_))
        ));

        // orbit controls keep the camera off the pole
        let orbiting = r#"{
            views: [{ id: "top", anchor: [0, 0, 1, 1], camera: { fov: 45, position: [0, 10, 0], target: [0, 0, 0] }, orbit: true }],
        }"#;
        let demo = SceneLoader::load_from_str(orbiting).unwrap();
        assert!(demo.views.bindings()[0].camera.has_view_basis());
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            SceneLoader::load_from_path("does/not/exist.json5"),
            Err(LoaderError::InputError(_))
        ));
    }
}
