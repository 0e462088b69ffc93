//! Pixel value types.
//!
//! [`Rgba`] is the ephemeral 8-bit source/output pixel. [`SignedColor`] is
//! the signed per-channel accumulator used for diffused error and residual
//! deltas; it deliberately mirrors the channel set of `Rgba` (alpha
//! included, since alpha participates in quantization and diffusion).

/// An 8-bit RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Compute the signed per-channel difference `self - other`.
    pub fn diff(self, other: Rgba) -> SignedColor {
        SignedColor {
            a: self.a as i32 - other.a as i32,
            r: self.r as i32 - other.r as i32,
            g: self.g as i32 - other.g as i32,
            b: self.b as i32 - other.b as i32,
        }
    }
}

/// Signed per-channel color accumulator.
///
/// Used both as the accumulated diffusion error at a pixel and as the
/// quantization residual being spread to neighbors. Values routinely fall
/// outside `[0, 255]`; the quantizer is total over the extended range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignedColor {
    pub a: i32,
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl SignedColor {
    pub const ZERO: SignedColor = SignedColor {
        a: 0,
        r: 0,
        g: 0,
        b: 0,
    };

    pub const fn new(a: i32, r: i32, g: i32, b: i32) -> Self {
        Self { a, r, g, b }
    }

    /// Accumulate another error value into this one.
    pub fn add(&mut self, other: SignedColor) {
        self.a += other.a;
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
    }

    /// Scale every channel by `weight / divisor` with truncating integer
    /// division. This is the weighted share a kernel tap hands to one
    /// neighbor.
    pub fn weighted(self, weight: i32, divisor: i32) -> SignedColor {
        SignedColor {
            a: self.a * weight / divisor,
            r: self.r * weight / divisor,
            g: self.g * weight / divisor,
            b: self.b * weight / divisor,
        }
    }

    /// Luminance-weighted squared magnitude of the RGB residual
    /// (Rec. 709 weights, alpha excluded).
    ///
    /// This is the per-pixel term of the selector's quality score. It is
    /// monotonic in each channel's residual magnitude, so smaller residuals
    /// always score better.
    pub fn weighted_squared_error(self) -> f64 {
        let r = self.r as f64;
        let g = self.g as f64;
        let b = self.b as f64;
        0.2126 * r * r + 0.7152 * g * g + 0.0722 * b * b
    }
}
