//! PNG decode/encode at the pipeline edges.
//!
//! Source images enter as PNG files and previews leave as PNG files; the
//! core algorithms only ever see [`Pixmap`]s. Anything the `png` crate can
//! normalize to 8-bit is accepted and widened to RGBA.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use argb_dither::Pixmap;

use crate::error::PackError;

/// Load a PNG file into an RGBA pixmap.
pub fn load_png(path: &Path) -> Result<Pixmap, PackError> {
    let mut decoder = png::Decoder::new(File::open(path)?);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        other => {
            return Err(PackError::UnsupportedPng(format!(
                "color type {:?} after normalization",
                other
            )))
        }
    };

    Pixmap::from_rgba8(info.width, info.height, rgba).ok_or_else(|| {
        PackError::UnsupportedPng(format!(
            "decoded buffer does not match {}x{}",
            info.width, info.height
        ))
    })
}

/// Write a pixmap as an RGBA8 PNG file.
pub fn save_png(path: &Path, pixmap: &Pixmap) -> Result<(), PackError> {
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixmap.data())?;
    Ok(())
}
