use crate::color::Color;
use crate::math::{smoothstep, Lerpable};

mod worley;

pub use worley::WorleyTexture2D;

/// Largest edge length a texture may be generated at.
pub const MAX_TEXTURE_SIZE: u32 = 8192;

/// Where the pixels of a texture come from. Every source is generated on the
/// CPU, nothing is read from disk.
#[derive(Clone, Debug, PartialEq)]
pub enum TextureSource {
    Checker {
        cells: u32,
        light: Color,
        dark: Color,
    },
    Bricks {
        rows: u32,
        columns: u32,
        brick: Color,
        mortar: Color,
    },
    Petals {
        count: u32,
        petal: Color,
        center: Color,
        background: Color,
    },
    Worley {
        scale: f64,
        seed: u64,
        tint: Color,
    },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Wrap {
    #[default]
    Clamp,
    Repeat,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub source: TextureSource,
    /// Edge length of the generated square image
    pub size: u32,
    pub wrap: Wrap,
    pub mag_filter: Filter,
    pub repeat: (f32, f32),
    pub srgb: bool,
}

impl Texture {
    pub fn new(source: TextureSource, size: u32) -> Self {
        Self {
            source,
            size,
            wrap: Wrap::Clamp,
            mag_filter: Filter::Linear,
            repeat: (1.0, 1.0),
            srgb: true,
        }
    }

    pub fn generate(&self) -> Image {
        self.source.generate(self.size)
    }
}

/// Tightly packed RGBA8 pixels, first row on top.
#[derive(Clone, Debug)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Image {
    fn from_fn(size: u32, f: impl Fn(f64, f64) -> Color) -> Self {
        let size = size.max(1);
        let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);

        for y in 0..size {
            for x in 0..size {
                let u = (x as f64 + 0.5) / size as f64;
                let v = (y as f64 + 0.5) / size as f64;

                pixels.extend_from_slice(&f(u, v).to_rgba8());
            }
        }

        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let i = ((x + y * self.width) * 4) as usize;

        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }
}

impl TextureSource {
    pub fn generate(&self, size: u32) -> Image {
        match self {
            TextureSource::Checker { cells, light, dark } => {
                let cells = (*cells).max(1) as f64;

                Image::from_fn(size, |u, v| {
                    let cx = (u * cells).floor() as u64;
                    let cy = (v * cells).floor() as u64;

                    if (cx + cy) % 2 == 0 {
                        *light
                    } else {
                        *dark
                    }
                })
            }
            TextureSource::Bricks {
                rows,
                columns,
                brick,
                mortar,
            } => {
                let rows = (*rows).max(1) as f64;
                let columns = (*columns).max(1) as f64;
                let joint = 0.06;

                Image::from_fn(size, |u, v| {
                    let row = (v * rows).floor();
                    // every other row is offset by half a brick
                    let shift = if row as u64 % 2 == 1 { 0.5 } else { 0.0 };

                    let bu = (u * columns + shift).fract();
                    let bv = (v * rows).fract();

                    let edge = bu.min(1.0 - bu).min(bv.min(1.0 - bv) * columns / rows);

                    if edge < joint {
                        *mortar
                    } else {
                        // darken towards the joints a little
                        let shade = 0.8 + 0.2 * smoothstep(joint, 0.3, edge);
                        brick.scale(shade as f32)
                    }
                })
            }
            TextureSource::Petals {
                count,
                petal,
                center,
                background,
            } => {
                let count = (*count).max(1) as f64;

                Image::from_fn(size, |u, v| {
                    let x = u * 2.0 - 1.0;
                    let y = v * 2.0 - 1.0;

                    let r = (x * x + y * y).sqrt();
                    let angle = y.atan2(x);

                    let outline = 0.55 + 0.35 * (angle * count).cos().abs();

                    if r < 0.18 {
                        *center
                    } else if r < outline {
                        let t = smoothstep(0.18, outline, r);
                        petal.lerp(&petal.scale(0.6), t)
                    } else {
                        *background
                    }
                })
            }
            TextureSource::Worley { scale, seed, tint } => {
                let noise = WorleyTexture2D::new(*scale, *seed);

                Image::from_fn(size, |u, v| {
                    let d = noise.sample(u, v).clamp(0.0, 1.0);

                    tint.scale(1.0 - d as f32)
                })
            }
        }
    }
}
