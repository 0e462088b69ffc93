//! Respack - resource compiler for 2-bit-per-channel displays
//!
//! Turns directories of PNG images into palettized resource blobs plus
//! generated C headers. This library exposes modules for integration
//! testing; the dithering engine lives in the `argb-dither` crate.

pub mod blob;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod png_io;
pub mod symbols;
