//! Batch pipeline: source PNGs in, blob + header + previews out.
//!
//! Two independent paths consume the same source pixels, mirroring the two
//! halves of the toolchain:
//!
//! - the dithering path quantizes to display levels with per-image kernel
//!   selection and writes preview/final PNGs;
//! - the packing path pack-quantizes to one byte per pixel, encodes, and
//!   assembles the resource blob plus its symbol table.
//!
//! One bad image never aborts a batch: per-image failures are logged and
//! skipped, and the blob is laid out from whatever encoded successfully.

use std::fs;
use std::path::{Path, PathBuf};

use argb_dither::{dither_image, pack_pixel, select_best, Kernel, KernelCatalog, Pixmap, Rgba};

use crate::blob::BlobWriter;
use crate::encode::{encode_image, EncodedImage};
use crate::error::PackError;
use crate::png_io::{load_png, save_png};
use crate::symbols::PackageSymbols;

/// A fully assembled resource package.
#[derive(Debug)]
pub struct BuiltPackage {
    pub blob: Vec<u8>,
    pub symbols: PackageSymbols,
    /// Source files that failed and were skipped.
    pub skipped: Vec<PathBuf>,
}

/// Pack-quantize every pixel of an image into one byte per pixel.
pub fn pack_pixmap(pixmap: &Pixmap) -> Vec<u8> {
    let mut packed = Vec::with_capacity(pixmap.width() as usize * pixmap.height() as usize);
    for y in 0..pixmap.height() {
        for x in 0..pixmap.width() {
            // Raster scan over the pixmap's own dimensions is in bounds.
            let pixel = pixmap.get(x, y).unwrap_or_default();
            packed.push(pack_pixel(pixel));
        }
    }
    packed
}

/// Quantize and encode one named image.
pub fn encode_pixmap(name: &str, pixmap: &Pixmap) -> Result<EncodedImage, PackError> {
    encode_image(name, pixmap.width(), pixmap.height(), &pack_pixmap(pixmap))
}

/// PNG files directly inside `dir`, sorted by name for deterministic
/// blob order.
fn png_files(dir: &Path) -> Result<Vec<PathBuf>, PackError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .map(|e| e.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Stem of a source file, used as the image's symbolic name.
fn image_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "UNNAMED".to_string())
}

/// Encode every PNG in a directory into a resource package.
///
/// Fails only if the directory itself cannot be read; individual image
/// failures are logged and the file is skipped.
pub fn build_package(
    dir: &Path,
    package: &str,
    writer: &BlobWriter,
) -> Result<BuiltPackage, PackError> {
    tracing::info!(package, dir = %dir.display(), "packing resource package");

    let mut images = Vec::new();
    let mut skipped = Vec::new();

    for path in png_files(dir)? {
        let name = image_name(&path);
        match load_png(&path).and_then(|pixmap| {
            let encoded = encode_pixmap(&name, &pixmap)?;
            tracing::info!(
                image = %name,
                width = encoded.width,
                height = encoded.height,
                colors = encoded.palette.as_ref().map_or(256, |p| p.len()),
                format = ?encoded.format,
                "encoded"
            );
            Ok(encoded)
        }) {
            Ok(encoded) => images.push(encoded),
            Err(err) => {
                tracing::warn!(image = %name, error = %err, "skipping image");
                skipped.push(path);
            }
        }
    }

    let blob = writer.write(&images);
    let symbols = PackageSymbols::new(package, writer.checksum(), &images);
    tracing::info!(
        package,
        resources = symbols.records().len(),
        bytes = blob.len(),
        "package assembled"
    );

    Ok(BuiltPackage {
        blob,
        symbols,
        skipped,
    })
}

/// Dither one PNG and write the winning quantized image.
///
/// With `kernel` set, only that catalog kernel runs; otherwise every
/// kernel is tried and the lowest-error result wins. With `preview_dir`
/// set, each trial's output is also written there for inspection.
/// Returns the name of the kernel that produced the output.
pub fn dither_file(
    input: &Path,
    output: &Path,
    catalog: &KernelCatalog,
    kernel: Option<&Kernel>,
    transparent_key: Rgba,
    preview_dir: Option<&Path>,
) -> Result<String, PackError> {
    let source = load_png(input)?;
    let name = image_name(input);

    let best = match kernel {
        Some(k) => dither_image(&source, k, transparent_key),
        None => {
            if let Some(dir) = preview_dir {
                fs::create_dir_all(dir)?;
                for k in catalog.iter() {
                    let trial = dither_image(&source, k, transparent_key);
                    tracing::info!(
                        image = %name,
                        kernel = %trial.kernel_name,
                        mse = trial.mean_squared_error,
                        "dither trial"
                    );
                    let preview = dir.join(format!("{} ({}).png", name, trial.kernel_name));
                    save_png(&preview, &trial.image)?;
                }
            }
            select_best(&source, catalog, transparent_key).ok_or_else(|| {
                PackError::UnsupportedPng("kernel catalog is empty".to_string())
            })?
        }
    };

    tracing::info!(
        image = %name,
        kernel = %best.kernel_name,
        mse = best.mean_squared_error,
        "dithered"
    );
    save_png(output, &best.image)?;
    Ok(best.kernel_name)
}

/// Dither every PNG in a directory, writing one output PNG per source.
///
/// Outputs keep their source file names under `output_dir`. Per-image
/// failures are logged and skipped, same as the packing batch. Returns the
/// paths of the files that were skipped.
pub fn dither_directory(
    input: &Path,
    output_dir: &Path,
    catalog: &KernelCatalog,
    kernel: Option<&Kernel>,
    transparent_key: Rgba,
    preview_dir: Option<&Path>,
) -> Result<Vec<PathBuf>, PackError> {
    fs::create_dir_all(output_dir)?;
    let mut skipped = Vec::new();

    for path in png_files(input)? {
        let output = output_dir.join(path.file_name().unwrap_or_default());
        if let Err(err) = dither_file(&path, &output, catalog, kernel, transparent_key, preview_dir)
        {
            tracing::warn!(image = %image_name(&path), error = %err, "skipping image");
            skipped.push(path);
        }
    }

    Ok(skipped)
}
