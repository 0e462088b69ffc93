use thiserror::Error;

use crate::encode::PixelFormat;

/// Errors surfaced by the resource compiler.
///
/// Three families: configuration errors (malformed kernels, caught before
/// any image is processed), invariant violations (palette overflow, caught
/// before any blob bytes are written), and per-image I/O failures (the
/// batch pipeline logs these and carries on).
#[derive(Debug, Error)]
pub enum PackError {
    #[error("kernel configuration error: {0}")]
    Kernel(#[from] argb_dither::KernelError),

    /// The measured palette does not fit the chosen bit depth. This is a
    /// logic defect in depth selection, never a property of the input
    /// image; encoding the affected image aborts rather than truncating
    /// indices.
    #[error("palette overflow: {count} colors exceed capacity {capacity} of {format:?}")]
    PaletteOverflow {
        format: PixelFormat,
        count: usize,
        capacity: usize,
    },

    /// Pixel data length does not match the declared dimensions.
    #[error("pixel buffer has {len} bytes, expected {expected} for {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        len: usize,
        expected: usize,
    },

    /// Zero-area images have no rows to pack and nothing to address.
    #[error("image '{name}' has zero dimension ({width}x{height})")]
    EmptyImage {
        name: String,
        width: u32,
        height: u32,
    },

    /// An image exceeds the u16 dimension fields of the resource header.
    #[error("image '{name}' is {width}x{height}, limit is 65535 per axis")]
    ImageTooLarge {
        name: String,
        width: u32,
        height: u32,
    },

    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("unsupported PNG layout: {0}")]
    UnsupportedPng(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
