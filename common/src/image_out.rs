use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

use splitview::texture::Image;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("could not create {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode png: {0}")]
    Encoding(#[from] png::EncodingError),
    #[error("expected {expected} bytes of pixels, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

/// Writes tightly packed RGBA8 pixels, first row on top.
pub fn write_rgba<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<(), ImageError> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(ImageError::InvalidLength {
            expected,
            got: pixels.len(),
        });
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;

    Ok(())
}

pub fn write_image<P: AsRef<Path>>(path: P, image: &Image) -> Result<(), ImageError> {
    write_rgba(path, image.width, image.height, &image.pixels)
}

/// Turns RGBA8 rows upside down, between GL's bottom-up order and the
/// top-down order of image files.
pub fn flip_rows(pixels: &[u8], width: u32) -> Vec<u8> {
    let row = width as usize * 4;
    if row == 0 {
        return Vec::new();
    }

    pixels.chunks_exact(row).rev().flatten().copied().collect()
}
