//! Owned RGBA pixel buffer with bounds-checked access.
//!
//! All core algorithms read and write pixels through [`Pixmap`]; nothing in
//! this crate touches raw pointers or assumes a stride beyond
//! `width * 4` bytes per row.

use crate::pixel::Rgba;

/// An owned, contiguous RGBA8 image buffer.
///
/// Pixels are stored row-major, 4 bytes per pixel (r, g, b, a). Reads and
/// writes are bounds-checked; `get`/`set` with out-of-range coordinates
/// return `None` / are ignored rather than panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    /// Create a fully transparent pixmap of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wrap an existing RGBA8 buffer.
    ///
    /// Returns `None` if `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize * self.width as usize + x as usize) * 4)
        } else {
            None
        }
    }

    /// Read the pixel at (x, y). `None` outside the canvas.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.offset(x, y).map(|i| Rgba {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        })
    }

    /// Write the pixel at (x, y). Out-of-canvas writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, pixel: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.data[i] = pixel.r;
            self.data[i + 1] = pixel.g;
            self.data[i + 2] = pixel.b;
            self.data[i + 3] = pixel.a;
        }
    }
}
