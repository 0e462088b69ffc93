//! Whole-image dithering and best-kernel selection.
//!
//! [`dither_image`] runs one (image, kernel) trial; [`select_best`] runs
//! the full catalog and keeps the lowest-error result. Trials are
//! independent of each other -- each owns its own error grid -- and the
//! whole process is deterministic: the same image and catalog always yield
//! the same selected kernel and identical output bytes.

use crate::diffuser::ErrorDiffuser;
use crate::kernel::{Kernel, KernelCatalog};
use crate::pixel::Rgba;
use crate::pixmap::Pixmap;

/// The result of dithering one image with one kernel.
#[derive(Debug, Clone)]
pub struct DitherTrial {
    /// Name of the kernel that produced this image.
    pub kernel_name: String,
    /// The display-quantized output image.
    pub image: Pixmap,
    /// Mean luminance-weighted squared error across the image.
    pub mean_squared_error: f64,
}

/// Dither a whole image with a single kernel.
///
/// Pixels are processed in raster order: each row left to right, rows top
/// to bottom. Pixels equal to `transparent_key`, or with zero alpha,
/// bypass dithering entirely -- they are emitted fully transparent and
/// contribute nothing to the error grid or the score.
pub fn dither_image(source: &Pixmap, kernel: &Kernel, transparent_key: Rgba) -> DitherTrial {
    let width = source.width();
    let height = source.height();
    let mut diffuser = ErrorDiffuser::new(width, height);
    let mut output = Pixmap::new(width, height);

    for y in 0..height {
        for x in 0..width {
            // Raster order guarantees get() is in bounds.
            let Some(pixel) = source.get(x, y) else {
                continue;
            };
            if pixel == transparent_key || pixel.a == 0 {
                output.set(x, y, Rgba::TRANSPARENT);
            } else {
                output.set(x, y, diffuser.dither(x, y, pixel, kernel));
            }
        }
    }

    DitherTrial {
        kernel_name: kernel.name().to_string(),
        image: output,
        mean_squared_error: diffuser.mean_squared_error(),
    }
}

/// Dither an image once per catalog kernel and keep the best trial.
///
/// "Best" is the lowest mean squared error; ties keep the first kernel in
/// catalog order. Returns `None` for an empty catalog.
pub fn select_best(
    source: &Pixmap,
    catalog: &KernelCatalog,
    transparent_key: Rgba,
) -> Option<DitherTrial> {
    let mut best: Option<DitherTrial> = None;

    for kernel in catalog.iter() {
        let trial = dither_image(source, kernel, transparent_key);
        tracing::debug!(
            kernel = %trial.kernel_name,
            mse = trial.mean_squared_error,
            "dither trial"
        );
        match &best {
            Some(b) if trial.mean_squared_error >= b.mean_squared_error => {}
            _ => best = Some(trial),
        }
    }

    if let Some(b) = &best {
        tracing::debug!(
            kernel = %b.kernel_name,
            mse = b.mean_squared_error,
            "selected kernel"
        );
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantize::quantize_pixel;
    use crate::pixel::SignedColor;

    /// Default color key: opaque cyan.
    const KEY: Rgba = Rgba::new(0, 255, 255, 255);

    fn gradient(width: u32, height: u32) -> Pixmap {
        let mut pm = Pixmap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 255) / width.max(1)) as u8;
                pm.set(x, y, Rgba::new(v, v.wrapping_add(37), 255 - v, 255));
            }
        }
        pm
    }

    #[test]
    fn test_identity_kernel_is_pure_quantization() {
        let src = gradient(16, 8);
        let trial = dither_image(&src, &Kernel::identity(), KEY);
        for y in 0..8 {
            for x in 0..16 {
                let expected = quantize_pixel(src.get(x, y).unwrap(), SignedColor::ZERO);
                assert_eq!(trial.image.get(x, y), Some(expected));
            }
        }
    }

    #[test]
    fn test_transparent_key_and_zero_alpha_pass_through() {
        let catalog = KernelCatalog::standard().unwrap();
        let mut src = gradient(8, 4);
        src.set(2, 1, KEY);
        src.set(5, 3, Rgba::new(40, 40, 40, 0));

        for kernel in catalog.iter() {
            let trial = dither_image(&src, kernel, KEY);
            assert_eq!(
                trial.image.get(2, 1),
                Some(Rgba::TRANSPARENT),
                "key pixel must decode transparent under {}",
                kernel.name()
            );
            assert_eq!(
                trial.image.get(5, 3),
                Some(Rgba::TRANSPARENT),
                "alpha-0 pixel must decode transparent under {}",
                kernel.name()
            );
        }
    }

    #[test]
    fn test_transparent_pixels_contribute_no_error() {
        // An image of exact display levels plus one key pixel scores zero:
        // the key pixel must not leak its (large) distance into the score.
        let mut src = Pixmap::new(3, 1);
        src.set(0, 0, Rgba::new(85, 85, 85, 255));
        src.set(1, 0, KEY);
        src.set(2, 0, Rgba::new(170, 170, 170, 255));

        let catalog = KernelCatalog::standard().unwrap();
        for kernel in catalog.iter() {
            let trial = dither_image(&src, kernel, KEY);
            assert_eq!(trial.mean_squared_error, 0.0, "kernel {}", kernel.name());
        }
    }

    #[test]
    fn test_select_best_deterministic() {
        let src = gradient(24, 16);
        let catalog = KernelCatalog::standard().unwrap();

        let first = select_best(&src, &catalog, KEY).unwrap();
        let second = select_best(&src, &catalog, KEY).unwrap();

        assert_eq!(first.kernel_name, second.kernel_name);
        assert_eq!(first.image, second.image, "output bytes must be identical");
        assert_eq!(first.mean_squared_error, second.mean_squared_error);
    }

    #[test]
    fn test_select_best_prefers_lower_error() {
        let src = gradient(24, 16);
        let catalog = KernelCatalog::standard().unwrap();
        let best = select_best(&src, &catalog, KEY).unwrap();

        for kernel in catalog.iter() {
            let trial = dither_image(&src, kernel, KEY);
            assert!(
                best.mean_squared_error <= trial.mean_squared_error,
                "{} beat the selected {}",
                kernel.name(),
                best.kernel_name
            );
        }
    }

    #[test]
    fn test_tie_keeps_first_kernel() {
        // An image of exact display levels gives every kernel a zero score;
        // the first catalog entry must win.
        let mut src = Pixmap::new(4, 1);
        for x in 0..4 {
            let v = x as u8 * 85;
            src.set(x, 0, Rgba::new(v, v, v, 255));
        }
        let catalog = KernelCatalog::standard().unwrap();
        let best = select_best(&src, &catalog, KEY).unwrap();
        assert_eq!(best.kernel_name, catalog.iter().next().unwrap().name());
    }

    #[test]
    fn test_empty_catalog_yields_none() {
        let src = gradient(4, 4);
        assert!(select_best(&src, &KernelCatalog::empty(), KEY).is_none());
    }
}
