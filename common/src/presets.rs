//! The three built-in demos: spinning cubes, a lit floor, and a split screen
//! with a second camera.

use std::f32::consts::FRAC_PI_2;

use cgmath::Point3;

use splitview::camera::PerspectiveCamera;
use splitview::controls::OrbitControls;
use splitview::layout::{Anchor, FixedLayout};
use splitview::render_loop::{CameraBinding, ViewGroup};
use splitview::scene::{Geometry, Light, Material, Mesh, Scene};
use splitview::texture::{Filter, Texture, TextureSource, Wrap};
use splitview::Color;

use crate::Demo;

pub const DEFAULT_WIDTH: f64 = 1280.0;
pub const DEFAULT_HEIGHT: f64 = 720.0;

const TEXTURE_SIZE: u32 = 256;
const FLOOR_SIZE: f32 = 40.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Three cubes under a directional light
    Basic,
    /// Cubes on a checkered floor under a hemisphere light
    Light,
    /// The light scene seen by two cameras side by side
    Camera,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Basic, Preset::Light, Preset::Camera];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Basic => "basic",
            Preset::Light => "light",
            Preset::Camera => "camera",
        }
    }

    pub fn build(&self) -> Demo {
        match self {
            Preset::Basic => basic(),
            Preset::Light => light(),
            Preset::Camera => camera(),
        }
    }
}

/// Procedural stand-ins for the demo images: `checker`, `wall`,
/// `flower-1` to `flower-6` and `worley`.
pub fn named_texture(name: &str) -> Option<TextureSource> {
    let source = match name {
        "checker" => TextureSource::Checker {
            cells: 2,
            light: Color::from_hex(0xc0c0c0),
            dark: Color::from_hex(0x808080),
        },
        "wall" => TextureSource::Bricks {
            rows: 8,
            columns: 4,
            brick: Color::from_hex(0x9c4a2f),
            mortar: Color::from_hex(0xd8d0c0),
        },
        "worley" => TextureSource::Worley {
            scale: 8.0,
            seed: 0,
            tint: Color::from_hex(0x88ccff),
        },
        _ => {
            let n: u32 = name.strip_prefix("flower-")?.parse().ok()?;
            if !(1..=6).contains(&n) {
                return None;
            }

            TextureSource::Petals {
                count: n + 2,
                petal: FLOWER_COLORS[(n - 1) as usize],
                center: Color::from_hex(0xffd23f),
                background: Color::from_hex(0x2e5e2e),
            }
        }
    };

    Some(source)
}

const FLOWER_COLORS: [Color; 6] = [
    Color::new(0.95, 0.35, 0.55),
    Color::new(0.55, 0.35, 0.95),
    Color::new(0.98, 0.98, 0.98),
    Color::new(0.95, 0.55, 0.15),
    Color::new(0.35, 0.65, 0.98),
    Color::new(0.90, 0.15, 0.15),
];

fn named(name: &str) -> Texture {
    let source = named_texture(name).unwrap_or(TextureSource::Checker {
        cells: 8,
        light: Color::WHITE,
        dark: Color::BLACK,
    });

    Texture::new(source, TEXTURE_SIZE)
}

/// The three spinning cubes every demo shares, at height `y`.
fn push_cubes(scene: &mut Scene, first_color: Color, first: Material, y: f32) {
    let geometry = Geometry::unit_cube();

    let wall = scene.push_texture(named("wall"));
    let flowers: Vec<Material> = (1..=6)
        .map(|i| {
            let texture = scene.push_texture(named(&format!("flower-{i}")));
            Material::basic(Color::WHITE).with_map(texture)
        })
        .collect();

    let cubes = [
        Mesh::new(geometry, Material { color: first_color, ..first }).at(0.0, y, 0.0),
        Mesh::new(geometry, Material::basic(Color::WHITE).with_map(wall)).at(-2.0, y, 0.0),
        Mesh::with_materials(geometry, flowers).at(2.0, y, 0.0),
    ];

    for cube in cubes {
        let index = scene.push_mesh(cube);
        scene.spin(index);
    }
}

fn push_floor(scene: &mut Scene, material: fn(Color) -> Material) {
    let repeats = FLOOR_SIZE / 2.0;

    let mut checker = Texture::new(
        named_texture("checker").unwrap_or(TextureSource::Checker {
            cells: 2,
            light: Color::WHITE,
            dark: Color::BLACK,
        }),
        2,
    );
    checker.wrap = Wrap::Repeat;
    checker.mag_filter = Filter::Nearest;
    checker.repeat = (repeats, repeats);

    let texture = scene.push_texture(checker);

    scene.push_mesh(
        Mesh::new(
            Geometry::Plane {
                width: FLOOR_SIZE,
                height: FLOOR_SIZE,
            },
            material(Color::WHITE).with_map(texture).double_sided(),
        )
        .rotated(-FRAC_PI_2, 0.0, 0.0),
    );
}

fn orbiting(
    fov: f32,
    near: f32,
    far: f32,
    position: Point3<f32>,
    target: Point3<f32>,
) -> (PerspectiveCamera, OrbitControls) {
    let mut camera = PerspectiveCamera::new(fov, 2.0, near, far);
    camera.position = position;

    let controls = OrbitControls::new(&camera, target);
    controls.update(&mut camera);

    (camera, controls)
}

fn basic() -> Demo {
    let mut scene = Scene::new(Color::BLACK);

    push_cubes(
        &mut scene,
        Color::from_hex(0x44aa88),
        Material::phong(Color::WHITE),
        0.0,
    );

    scene.push_light(Light::Directional {
        color: Color::WHITE,
        intensity: 3.0,
        position: Point3::new(-1.0, 2.0, 4.0),
        target: Point3::new(0.0, 0.0, 0.0),
    });

    let mut camera = PerspectiveCamera::new(75.0, 2.0, 0.1, 5.0);
    camera.position = Point3::new(0.0, 0.0, 2.0);
    camera.look_at(Point3::new(0.0, 0.0, 0.0));

    let mut views = ViewGroup::new();
    views.push(CameraBinding::new("main", camera));

    Demo {
        scene,
        views,
        layout: FixedLayout::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).with_view("main", Anchor::FULL),
        controls: Vec::new(),
    }
}

fn light() -> Demo {
    let mut scene = Scene::new(Color::BLACK);

    push_cubes(&mut scene, Color::WHITE, Material::phong(Color::WHITE), 2.0);
    push_floor(&mut scene, Material::phong);

    scene.push_light(Light::Hemisphere {
        sky: Color::from_hex(0xb1e1ff),
        ground: Color::from_hex(0xb97a20),
        intensity: 1.0,
    });

    let target = Point3::new(0.0, 5.0, 0.0);
    let (camera, controls) = orbiting(45.0, 0.1, 100.0, Point3::new(0.0, 5.0, 10.0), target);

    let mut views = ViewGroup::new();
    views.push(CameraBinding::new("main", camera));

    Demo {
        scene,
        views,
        layout: FixedLayout::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).with_view("main", Anchor::FULL),
        controls: vec![("main".to_string(), controls)],
    }
}

fn camera() -> Demo {
    let mut scene = Scene::new(Color::from_hex(0xaaaaaa));

    push_cubes(&mut scene, Color::WHITE, Material::standard(Color::WHITE), 2.0);
    push_floor(&mut scene, Material::standard);

    scene.push_light(Light::Ambient {
        color: Color::WHITE,
        intensity: 0.2,
    });
    scene.push_light(Light::Directional {
        color: Color::WHITE,
        intensity: 1.0,
        position: Point3::new(0.0, 10.0, 0.0),
        target: Point3::new(-5.0, 0.0, 0.0),
    });

    let target = Point3::new(0.0, 5.0, 0.0);
    let (first, first_controls) =
        orbiting(45.0, 0.1, 100.0, Point3::new(0.0, 5.0, 10.0), target);
    let (second, second_controls) =
        orbiting(60.0, 0.1, 500.0, Point3::new(40.0, 10.0, 30.0), target);

    let mut views = ViewGroup::new();
    views.push(CameraBinding::new("view1", first).with_background(Color::BLACK));
    views.push(CameraBinding::new("view2", second).with_background(Color::from_hex(0x000040)));

    Demo {
        scene,
        views,
        layout: FixedLayout::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
            .with_view("view1", Anchor::LEFT_HALF)
            .with_view("view2", Anchor::RIGHT_HALF),
        controls: vec![
            ("view1".to_string(), first_controls),
            ("view2".to_string(), second_controls),
        ],
    }
}
