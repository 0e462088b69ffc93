//! Channel quantization to the 2-bit-per-channel target.
//!
//! Two variants share the same coarse structure but serve different
//! consumers:
//!
//! - [`display_quantize`] maps a channel to one of the four evenly spaced
//!   *display* values {0, 85, 170, 255}. The thresholds (42 / 128 / 213)
//!   are placed halfway between neighboring output levels, not at bin
//!   midpoints of the input range -- in particular the first threshold is
//!   42, not 32. The dithering engine depends on this exact placement.
//! - [`pack_quantize`] maps a channel to a 2-bit index {0..3} with
//!   thresholds 85 / 170 / 255, and [`pack_pixel`] packs all four channel
//!   indices into one byte for the palette encoder.
//!
//! Both are pure, total functions: every `i32` input maps to exactly one
//! output. The extended domain matters because the error diffuser feeds in
//! channel values pushed outside `[0, 255]` by accumulated error.

use crate::pixel::{Rgba, SignedColor};

/// Quantize a channel value to a display level in {0, 85, 170, 255}.
#[inline]
pub fn display_quantize(value: i32) -> u8 {
    if value < 42 {
        0
    } else if value < 128 {
        85
    } else if value < 213 {
        170
    } else {
        255
    }
}

/// Quantize a channel value to a 2-bit index in {0, 1, 2, 3}.
#[inline]
pub fn pack_quantize(value: i32) -> u8 {
    if value < 85 {
        0
    } else if value < 170 {
        1
    } else if value < 255 {
        2
    } else {
        3
    }
}

/// Display-quantize a pixel with accumulated error applied per channel.
///
/// All four channels go through [`display_quantize`], alpha included.
#[inline]
pub fn quantize_pixel(pixel: Rgba, error: SignedColor) -> Rgba {
    Rgba {
        r: display_quantize(pixel.r as i32 + error.r),
        g: display_quantize(pixel.g as i32 + error.g),
        b: display_quantize(pixel.b as i32 + error.b),
        a: display_quantize(pixel.a as i32 + error.a),
    }
}

/// Pack a pixel into one byte of 2-bit channel indices.
///
/// Bit layout, most significant first: alpha, red, green, blue. This is the
/// byte value the palette encoder deduplicates and the embedded runtime's
/// 8-bit format stores verbatim.
#[inline]
pub fn pack_pixel(pixel: Rgba) -> u8 {
    (pack_quantize(pixel.a as i32) << 6)
        | (pack_quantize(pixel.r as i32) << 4)
        | (pack_quantize(pixel.g as i32) << 2)
        | pack_quantize(pixel.b as i32)
}
