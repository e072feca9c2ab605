use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{Program, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::texture::{
    Texture2D, TextureError, TextureFilter, TextureFormats, TextureOptions, TextureWrap,
};

use splitview::camera::PerspectiveCamera;
use splitview::region::Region;
use splitview::render_loop::{Animate, Drawable};
use splitview::scene::{self, LightUniforms, Scene, Shading};
use splitview::texture::{Filter, Texture, Wrap};
use splitview::Color;

use splitview_common::image_out::flip_rows;

use crate::app::AppError;

/// A [`Scene`] with its meshes and textures uploaded to the current GL
/// context.
pub struct GlScene {
    scene: Scene,
    program: Program,
    meshes: Vec<Geometry>,
    textures: Vec<Texture2D>,
    lights: LightUniforms,
    renderer: GlRenderer,
    background: Option<Color>,
}

impl GlScene {
    pub fn new(scene: Scene) -> Result<Self, AppError> {
        let program = ProgramBuilder::new(
            include_str!("gl_shaders/mesh_vert.glsl"),
            include_str!("gl_shaders/mesh_frag.glsl"),
        )
        .build()?;

        let textures = scene
            .textures
            .iter()
            .map(upload_texture)
            .collect::<Result<Vec<_>, _>>()?;

        let meshes = scene
            .meshes
            .iter()
            .map(|mesh| upload_geometry(&mesh.geometry))
            .collect::<Result<Vec<_>, _>>()?;

        let lights = scene.light_uniforms();

        let renderer = GlRenderer::new();
        // shaders write linear colour
        renderer.srgb_output(true);

        log::info!(
            "uploaded {} meshes and {} textures",
            meshes.len(),
            textures.len()
        );

        Ok(Self {
            scene,
            program,
            meshes,
            textures,
            lights,
            renderer,
            background: None,
        })
    }

    fn set_lights(&self) {
        let program = &self.program;

        program.set_vec3("u_ambient", self.lights.ambient);
        program.set_vec3("u_hemi_sky", self.lights.hemisphere_sky);
        program.set_vec3("u_hemi_ground", self.lights.hemisphere_ground);
        program.set_i32("u_dir_count", self.lights.directional.len() as i32);

        for (i, (direction, color)) in self.lights.directional.iter().enumerate() {
            program.set_vec3(&format!("u_dir_direction[{i}]"), *direction);
            program.set_vec3(&format!("u_dir_color[{i}]"), *color);
        }
    }
}

impl Drawable for GlScene {
    fn set_background(&mut self, color: Color) {
        self.background = Some(color);
    }

    fn draw(&mut self, camera: &PerspectiveCamera, _region: &Region) {
        // a view background only lasts for the view that set it
        let bg = self
            .background
            .take()
            .unwrap_or(self.scene.background)
            .to_linear();

        self.renderer.clear(bg.r, bg.g, bg.b);
        self.renderer.depth_test(true);
        self.renderer.use_program(&self.program);

        self.program.set_mat4("u_view", camera.view().as_ref());
        self.program
            .set_mat4("u_projection", camera.projection().as_ref());
        self.program.set_vec3("u_eye", camera.position.into());
        self.program.set_i32("u_map", 0);
        self.set_lights();

        for (mesh, geometry) in self.scene.meshes.iter().zip(&self.meshes) {
            self.program
                .set_mat4("u_model", mesh.model_matrix().as_ref());

            for (group, range) in geometry.groups().iter().enumerate() {
                let material = match mesh.material_for_group(group) {
                    Some(m) => m,
                    None => continue,
                };

                let shading = match material.shading {
                    Shading::Basic => 0,
                    Shading::Phong => 1,
                    Shading::Standard => 2,
                };
                self.program.set_i32("u_shading", shading);
                self.program
                    .set_vec3("u_base_color", material.color.to_linear().to_array());

                let map = material
                    .map
                    .and_then(|id| Some((self.textures.get(id)?, self.scene.textures.get(id)?)));

                match map {
                    Some((texture, source)) => {
                        texture.bind(0);
                        self.program.set_bool("u_use_map", true);
                        self.program
                            .set_vec2("u_uv_repeat", [source.repeat.0, source.repeat.1]);
                    }
                    None => {
                        self.program.set_bool("u_use_map", false);
                        self.program.set_vec2("u_uv_repeat", [1.0, 1.0]);
                    }
                }

                self.renderer.cull_faces(!material.double_sided);
                self.renderer
                    .draw_range(geometry, &self.program, range.clone());
            }
        }
    }
}

impl Animate for GlScene {
    fn advance(&mut self, seconds: f64) {
        self.scene.advance(seconds);
    }
}

fn upload_geometry(geometry: &scene::Geometry) -> Result<Geometry, GBError> {
    let data = geometry.mesh_data();

    let mut builder = GeometryBuilder::new(&data.vertices)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec2);

    for group in &data.groups {
        builder = builder.with_group(group.first, group.count);
    }

    builder.build()
}

fn upload_texture(texture: &Texture) -> Result<Texture2D, TextureError> {
    let image = texture.generate();
    let pixels = flip_rows(&image.pixels, image.width);

    let format = if texture.srgb {
        TextureFormats::Srgba8
    } else {
        TextureFormats::Rgba8
    };

    let options = TextureOptions {
        wrap: match texture.wrap {
            Wrap::Clamp => TextureWrap::ClampToEdge,
            Wrap::Repeat => TextureWrap::Repeat,
        },
        mag_filter: match texture.mag_filter {
            Filter::Nearest => TextureFilter::Nearest,
            Filter::Linear => TextureFilter::Linear,
        },
    };

    Texture2D::new(image.width, image.height, &pixels, format, options)
}
