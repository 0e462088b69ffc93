//! Error diffusion over a per-image signed error grid.
//!
//! [`ErrorDiffuser`] owns one error grid for the lifetime of one
//! (image, kernel) trial. Pixels must be visited in raster order: every
//! pixel of row `y`, left to right, before row `y + 1` begins. The kernel
//! only ever references not-yet-visited neighbors (right of the current
//! pixel on the current row, and rows below), so each pixel's accumulated
//! error is final by the time it is read.

use crate::kernel::Kernel;
use crate::pixel::{Rgba, SignedColor};
use crate::quantize::quantize_pixel;

/// Per-trial error diffusion state.
///
/// The grid is sized exactly to the image and zero-initialized.
/// Out-of-bounds reads return [`SignedColor::ZERO`]; out-of-bounds writes
/// are silently dropped -- kernel taps near the canvas edge simply spill
/// off and are lost, never wrapped or clamped into valid coordinates.
#[derive(Debug)]
pub struct ErrorDiffuser {
    width: u32,
    height: u32,
    grid: Vec<SignedColor>,
    total_error: f64,
}

impl ErrorDiffuser {
    /// Create a diffuser with a zeroed error grid for a width x height image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            grid: vec![SignedColor::ZERO; width as usize * height as usize],
            total_error: 0.0,
        }
    }

    /// Accumulated error at (x, y); zero outside the canvas.
    fn error_at(&self, x: i64, y: i64) -> SignedColor {
        if x >= 0 && x < self.width as i64 && y >= 0 && y < self.height as i64 {
            self.grid[y as usize * self.width as usize + x as usize]
        } else {
            SignedColor::ZERO
        }
    }

    /// Add an error share at (x, y); no-op outside the canvas.
    fn add_error(&mut self, x: i64, y: i64, share: SignedColor) {
        if x >= 0 && x < self.width as i64 && y >= 0 && y < self.height as i64 {
            self.grid[y as usize * self.width as usize + x as usize].add(share);
        }
    }

    /// Quantize one pixel, diffusing its residual to forward neighbors.
    ///
    /// Returns the display-quantized output pixel. The residual
    /// (source minus output, per channel) is spread to row-0 taps at
    /// `x+1 ..= x+hw` and to rows `y+1 ..` across `x-hw ..= x+hw`, each
    /// share computed as `residual * weight / divisor` with truncating
    /// integer division. The pixel's luminance-weighted squared residual is
    /// added to the trial score.
    pub fn dither(&mut self, x: u32, y: u32, pixel: Rgba, kernel: &Kernel) -> Rgba {
        let accumulated = self.error_at(x as i64, y as i64);
        let output = quantize_pixel(pixel, accumulated);
        let delta = pixel.diff(output);

        if kernel.row_count() > 0 {
            let divisor = kernel.divisor();
            let hw = kernel.half_width();

            // Current row: taps strictly to the right of the pixel.
            for i in 1..=hw {
                let weight = kernel.current_row_weight(i);
                if weight != 0 {
                    self.add_error(x as i64 + i as i64, y as i64, delta.weighted(weight, divisor));
                }
            }

            // Rows below: full window around the pixel column.
            for j in 1..kernel.row_count() {
                for i in -(hw as isize)..=(hw as isize) {
                    let weight = kernel.row_weight(j, i);
                    if weight != 0 {
                        self.add_error(
                            x as i64 + i as i64,
                            y as i64 + j as i64,
                            delta.weighted(weight, divisor),
                        );
                    }
                }
            }
        }

        self.total_error += delta.weighted_squared_error();

        output
    }

    /// Mean luminance-weighted squared error over the whole image.
    ///
    /// The mean is taken over every canvas pixel, transparent-key pixels
    /// included (they contribute zero), so scores are comparable across
    /// kernels on the same image.
    pub fn mean_squared_error(&self) -> f64 {
        let pixels = self.width as f64 * self.height as f64;
        if pixels == 0.0 {
            0.0
        } else {
            self.total_error / pixels
        }
    }
}
