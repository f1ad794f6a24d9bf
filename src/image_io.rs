//! PNG decoding and encoding.
//!
//! Decodes arbitrary PNG files (any color type / bit depth) to RGBA8 for the
//! converter, and encodes the two preview artifacts: the resized grid image
//! and the palette atlas texture.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use palette_map::{Palette, Rgba, ATLAS_WIDTH};

use crate::error::{ConvertError, PersistError};

/// Decode a PNG file into RGBA8 pixels.
///
/// Grayscale, indexed, and RGB inputs are expanded; missing alpha becomes
/// fully opaque. 16-bit channels are reduced to 8 bits.
///
/// # Errors
///
/// - [`ConvertError::InputNotFound`] if `path` does not exist
/// - [`ConvertError::Decode`] if the file is not a decodable PNG
pub fn load_rgba(path: &Path) -> Result<(Vec<Rgba>, usize, usize), ConvertError> {
    if !path.exists() {
        return Err(ConvertError::InputNotFound(path.to_path_buf()));
    }

    let mut decoder = png::Decoder::new(File::open(path)?);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];

    let width = info.width as usize;
    let height = info.height as usize;
    let pixels = match info.color_type {
        png::ColorType::Rgba => bytes
            .chunks_exact(4)
            .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
            .collect(),
        png::ColorType::Rgb => bytes
            .chunks_exact(3)
            .map(|c| Rgba::new(c[0], c[1], c[2], 255))
            .collect(),
        png::ColorType::GrayscaleAlpha => bytes
            .chunks_exact(2)
            .map(|c| Rgba::new(c[0], c[0], c[0], c[1]))
            .collect(),
        png::ColorType::Grayscale => bytes.iter().map(|&v| Rgba::new(v, v, v, 255)).collect(),
        // normalize_to_color8 expands indexed PNGs to RGB/RGBA
        png::ColorType::Indexed => bytes
            .chunks_exact(3)
            .map(|c| Rgba::new(c[0], c[1], c[2], 255))
            .collect(),
    };

    Ok((pixels, width, height))
}

/// Encode RGBA8 pixels to a PNG file.
///
/// # Errors
///
/// [`PersistError`] on filesystem or encoding failure; the caller treats
/// this as recoverable.
pub fn write_rgba_png(
    path: &Path,
    pixels: &[Rgba],
    width: usize,
    height: usize,
) -> Result<(), PersistError> {
    let artifact = path.display().to_string();
    let file = File::create(path).map_err(|source| PersistError::Write {
        artifact: artifact.clone(),
        source,
    })?;

    let mut encoder = png::Encoder::new(BufWriter::new(file), width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut data = Vec::with_capacity(pixels.len() * 4);
    for px in pixels {
        data.extend_from_slice(&[px.r, px.g, px.b, px.a]);
    }

    let mut writer = encoder
        .write_header()
        .map_err(|source| PersistError::PngEncode {
            artifact: artifact.clone(),
            source,
        })?;
    writer
        .write_image_data(&data)
        .map_err(|source| PersistError::PngEncode { artifact, source })?;
    Ok(())
}

/// Render the palette atlas texture: entry `i` at column `i % 16`,
/// row `i / 16`, unused cells fully transparent.
///
/// This is the texture the renderer samples with the emitted `u:v` tokens.
pub fn palette_atlas(palette: &Palette) -> (Vec<Rgba>, usize, usize) {
    let rows = palette.len().div_ceil(ATLAS_WIDTH);
    let mut pixels = vec![Rgba::new(0, 0, 0, 0); ATLAS_WIDTH * rows];
    for (i, entry) in palette.entries().enumerate() {
        pixels[i] = Rgba::opaque(entry.key);
    }
    (pixels, ATLAS_WIDTH, rows)
}
