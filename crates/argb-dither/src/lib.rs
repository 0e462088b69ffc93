//! argb-dither: error diffusion dithering to 2-bit-per-channel ARGB.
//!
//! This library quantizes 32-bit RGBA images down to the four display
//! levels per channel {0, 85, 170, 255} that a 2-bit-per-channel embedded
//! display can show, using error diffusion to keep banding invisible.
//! Instead of committing to one diffusion kernel, it tries every kernel in
//! a catalog and keeps the result with the lowest error score.
//!
//! # Quick Start
//!
//! ```
//! use argb_dither::{select_best, KernelCatalog, Pixmap, Rgba};
//!
//! let key = Rgba::new(0, 255, 255, 255); // transparent color key
//! let catalog = KernelCatalog::standard().unwrap();
//!
//! let mut image = Pixmap::new(2, 2);
//! image.set(0, 0, Rgba::new(120, 64, 200, 255));
//!
//! let best = select_best(&image, &catalog, key).unwrap();
//! assert_eq!(best.image.width(), 2);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! Rgba pixel + accumulated error (SignedColor)
//!     |
//!     v
//! display_quantize per channel          -> output pixel
//!     |
//! residual = source - output            (signed, per channel)
//!     |
//! residual * weight / divisor           -> forward neighbors (ErrorGrid)
//!     |
//! luminance-weighted squared residual   -> trial score
//! ```
//!
//! # Kernels are data
//!
//! A [`Kernel`] is a divisor plus rows of integer weights, validated at
//! construction. The diffusion loop is shape-agnostic, so new kernels can
//! be added to a [`KernelCatalog`] without touching the algorithm. The
//! standard catalog carries the eight classic kernels from
//! FalseFloydSteinberg to SierraLite.
//!
//! # Error scoring
//!
//! Trials are ranked by mean luminance-weighted squared residual
//! (Rec. 709 weights, alpha excluded), accumulated in `f64` over every
//! canvas pixel. The metric is monotonic in residual magnitude, so a
//! smaller residual always ranks better; ties keep catalog order.
//!
//! # Transparency
//!
//! Pixels equal to the caller's transparent color key, or with zero alpha,
//! bypass quantization and diffusion entirely: they come out fully
//! transparent and contribute nothing to the error grid or the score.

pub mod diffuser;
pub mod error;
pub mod kernel;
pub mod pixel;
pub mod pixmap;
pub mod quantize;
pub mod selector;

pub use diffuser::ErrorDiffuser;
pub use error::KernelError;
pub use kernel::{Kernel, KernelCatalog};
pub use pixel::{Rgba, SignedColor};
pub use pixmap::Pixmap;
pub use quantize::{display_quantize, pack_pixel, pack_quantize, quantize_pixel};
pub use selector::{dither_image, select_best, DitherTrial};
