//! Palette/bit-depth resource encoding.
//!
//! Takes one packed byte per pixel (the 2-bit-per-channel ARGB byte from
//! [`argb_dither::pack_pixel`]), deduplicates the observed values into a
//! palette, chooses the smallest adequate bit depth, and bit-packs pixel
//! indices row by row. Rows are packed independently: a row's trailing
//! bits never spill into the next row, so every row occupies exactly
//! `ceil(width / pixels_per_byte)` bytes.

mod palette;

pub use palette::PaletteIndexMap;

use crate::error::PackError;

/// Pixel storage formats understood by the embedded runtime.
///
/// The discriminants are the runtime's format codes and are serialized
/// into the per-image header as `(version << 12) | (code << 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PixelFormat {
    /// One packed ARGB byte per pixel, no palette.
    Bit8 = 1,
    /// 1-bit palette indices, up to 2 colors.
    Bit1Palettized = 2,
    /// 2-bit palette indices, up to 4 colors.
    Bit2Palettized = 3,
    /// 4-bit palette indices, up to 16 colors.
    Bit4Palettized = 4,
}

impl PixelFormat {
    /// The runtime's numeric format code.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Bits used to store one pixel.
    pub fn bits_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bit8 => 8,
            PixelFormat::Bit1Palettized => 1,
            PixelFormat::Bit2Palettized => 2,
            PixelFormat::Bit4Palettized => 4,
        }
    }

    /// Pixels stored per packed byte.
    pub fn pixels_per_byte(self) -> usize {
        8 / self.bits_per_pixel()
    }

    /// Maximum palette size this format can index.
    ///
    /// `Bit8` stores raw packed bytes, so its capacity is the full value
    /// range rather than a palette limit.
    pub fn capacity(self) -> usize {
        match self {
            PixelFormat::Bit8 => 256,
            PixelFormat::Bit1Palettized => 2,
            PixelFormat::Bit2Palettized => 4,
            PixelFormat::Bit4Palettized => 16,
        }
    }

    /// Whether this format carries a palette table in the blob.
    pub fn is_palettized(self) -> bool {
        !matches!(self, PixelFormat::Bit8)
    }

    /// Smallest adequate format for a measured palette size.
    pub fn for_palette_size(count: usize) -> PixelFormat {
        if count <= 2 {
            PixelFormat::Bit1Palettized
        } else if count <= 4 {
            PixelFormat::Bit2Palettized
        } else if count <= 16 {
            PixelFormat::Bit4Palettized
        } else {
            PixelFormat::Bit8
        }
    }

    /// Packed bytes per image row at the given pixel width.
    pub fn row_stride(self, width: u32) -> usize {
        (width as usize).div_ceil(self.pixels_per_byte())
    }
}

/// One image ready for blob serialization.
///
/// Produced by [`encode_image`]; the byte offset within the blob is not
/// known here -- it is assigned by the blob writer's layout pass once
/// every image's encoded size is known.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Symbolic name, used for the generated enum table.
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Bit-packed indices (palettized formats) or raw packed bytes (Bit8).
    pub pixels: Vec<u8>,
    /// Palette table ordered by index; `None` for Bit8.
    pub palette: Option<Vec<u8>>,
}

impl EncodedImage {
    /// Size of this image's body in the blob: pixel bytes plus palette
    /// bytes (the fixed per-image header is not included).
    pub fn body_len(&self) -> usize {
        self.pixels.len() + self.palette.as_ref().map_or(0, |p| p.len())
    }
}

/// Encode one image's packed bytes, choosing the smallest adequate format.
///
/// `packed` holds one byte per pixel in row-major order.
///
/// # Errors
///
/// - [`PackError::DimensionMismatch`] if `packed.len() != width * height`
/// - [`PackError::EmptyImage`] if either dimension is zero
/// - [`PackError::ImageTooLarge`] if either dimension exceeds `u16`
/// - [`PackError::PaletteOverflow`] if the measured palette exceeds the
///   chosen format's capacity (a depth-selection logic defect; encoding
///   aborts rather than truncating indices)
pub fn encode_image(
    name: impl Into<String>,
    width: u32,
    height: u32,
    packed: &[u8],
) -> Result<EncodedImage, PackError> {
    let map = PaletteIndexMap::build(packed);
    let format = PixelFormat::for_palette_size(map.len());
    encode_image_as(name, width, height, packed, format)
}

/// Encode with an explicit format instead of auto-selection.
///
/// Used by [`encode_image`] after depth selection; exposed so callers can
/// force a format (and so the palette-capacity guard is testable).
pub fn encode_image_as(
    name: impl Into<String>,
    width: u32,
    height: u32,
    packed: &[u8],
    format: PixelFormat,
) -> Result<EncodedImage, PackError> {
    let name = name.into();
    let expected = width as usize * height as usize;
    if packed.len() != expected {
        return Err(PackError::DimensionMismatch {
            width,
            height,
            len: packed.len(),
            expected,
        });
    }
    if width == 0 || height == 0 {
        return Err(PackError::EmptyImage {
            name,
            width,
            height,
        });
    }
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(PackError::ImageTooLarge {
            name,
            width,
            height,
        });
    }

    if !format.is_palettized() {
        return Ok(EncodedImage {
            name,
            width,
            height,
            format,
            pixels: packed.to_vec(),
            palette: None,
        });
    }

    let (map, indices) = PaletteIndexMap::build_indexed(packed);
    if map.len() > format.capacity() {
        return Err(PackError::PaletteOverflow {
            format,
            count: map.len(),
            capacity: format.capacity(),
        });
    }

    let pixels = pack_rows(&indices, width, height, format);

    Ok(EncodedImage {
        name,
        width,
        height,
        format,
        pixels,
        palette: Some(map.palette().to_vec()),
    })
}

/// Bit-pack palette indices row by row, most significant bits first.
///
/// Each row is padded to a byte boundary; the pad bits are zero.
fn pack_rows(indices: &[u8], width: u32, height: u32, format: PixelFormat) -> Vec<u8> {
    let bits = format.bits_per_pixel();
    let per_byte = format.pixels_per_byte();
    let stride = format.row_stride(width);
    let mut out = Vec::with_capacity(stride * height as usize);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        let mut filled = 0;
        for &index in row {
            byte |= index << (8 - bits * (filled + 1));
            filled += 1;
            if filled == per_byte {
                out.push(byte);
                byte = 0;
                filled = 0;
            }
        }
        if filled > 0 {
            out.push(byte);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Decode packed pixel bytes back to the original packed-byte stream
    /// using the emitted palette and format. Test-only inverse of
    /// `encode_image`.
    fn unpack(encoded: &EncodedImage) -> Vec<u8> {
        let format = encoded.format;
        if !format.is_palettized() {
            return encoded.pixels.clone();
        }
        let palette = encoded.palette.as_ref().expect("palettized image");
        let bits = format.bits_per_pixel();
        let per_byte = format.pixels_per_byte();
        let stride = format.row_stride(encoded.width);
        let mask = (1u16 << bits) as u8 - 1;

        let mut out = Vec::with_capacity((encoded.width * encoded.height) as usize);
        for y in 0..encoded.height as usize {
            let row = &encoded.pixels[y * stride..(y + 1) * stride];
            for x in 0..encoded.width as usize {
                let byte = row[x / per_byte];
                let shift = 8 - bits * (x % per_byte + 1);
                let index = (byte >> shift) & mask;
                out.push(palette[index as usize]);
            }
        }
        out
    }

    /// Row-major packed bytes drawing from `colors` cyclically.
    fn synthetic(width: u32, height: u32, colors: &[u8]) -> Vec<u8> {
        (0..width as usize * height as usize)
            .map(|i| colors[i % colors.len()])
            .collect()
    }

    #[test]
    fn test_depth_selection_boundaries() {
        assert_eq!(PixelFormat::for_palette_size(1), PixelFormat::Bit1Palettized);
        assert_eq!(PixelFormat::for_palette_size(2), PixelFormat::Bit1Palettized);
        assert_eq!(PixelFormat::for_palette_size(3), PixelFormat::Bit2Palettized);
        assert_eq!(PixelFormat::for_palette_size(4), PixelFormat::Bit2Palettized);
        assert_eq!(PixelFormat::for_palette_size(5), PixelFormat::Bit4Palettized);
        assert_eq!(PixelFormat::for_palette_size(16), PixelFormat::Bit4Palettized);
        assert_eq!(PixelFormat::for_palette_size(17), PixelFormat::Bit8);
    }

    #[test]
    fn test_roundtrip_boundary_palette_sizes() {
        // Exactly 1, 2, 4, 16 and 17 distinct colors; 17 exercises Bit8.
        for count in [1usize, 2, 4, 16, 17] {
            let colors: Vec<u8> = (0..count as u8).map(|i| i.wrapping_mul(13)).collect();
            let packed = synthetic(10, 7, &colors);
            let encoded = encode_image("t", 10, 7, &packed).unwrap();

            let expected = PixelFormat::for_palette_size(count);
            assert_eq!(encoded.format, expected, "{} colors", count);
            assert_eq!(unpack(&encoded), packed, "{} colors", count);
        }
    }

    #[test]
    fn test_palette_is_first_occurrence_order() {
        let packed = [0x30, 0x10, 0x30, 0x20];
        let encoded = encode_image("t", 4, 1, &packed).unwrap();
        assert_eq!(encoded.palette.as_deref(), Some(&[0x30, 0x10, 0x20][..]));
    }

    #[test]
    fn test_rows_pack_independently() {
        // Width 5 at 2 bpp: 4 pixels fill a byte, the 5th starts a new one,
        // and the next row starts on its own byte. 3 distinct colors force
        // Bit2Palettized.
        let packed = synthetic(5, 3, &[0x00, 0x11, 0x22]);
        let encoded = encode_image("t", 5, 3, &packed).unwrap();
        assert_eq!(encoded.format, PixelFormat::Bit2Palettized);
        assert_eq!(
            encoded.pixels.len(),
            encoded.format.row_stride(5) * 3,
            "each row must occupy ceil(5/4) = 2 bytes"
        );
        assert_eq!(unpack(&encoded), packed);

        // Row 0 is colors 0,1,2,0,1 -> indices 0,1,2,0 | 1,pad. The second
        // byte's low 6 bits must be zero pad, not row 1's first pixels.
        assert_eq!(encoded.pixels[0], 0b00_01_10_00);
        assert_eq!(encoded.pixels[1], 0b01_00_00_00);
    }

    #[test]
    fn test_one_bit_rows_msb_first() {
        // Width 9 at 1 bpp: 9 pixels need 2 bytes per row.
        let packed: Vec<u8> = (0..9).map(|i| if i % 2 == 0 { 0xAA } else { 0x55 }).collect();
        let encoded = encode_image("t", 9, 1, &packed).unwrap();
        assert_eq!(encoded.format, PixelFormat::Bit1Palettized);
        // Indices alternate 0,1,0,1,... MSB-first: 0b01010101, 0b0_0000000
        assert_eq!(encoded.pixels, vec![0b0101_0101, 0b0000_0000]);
        assert_eq!(unpack(&encoded), packed);
    }

    #[test]
    fn test_bit8_carries_no_palette() {
        let colors: Vec<u8> = (0..20).collect();
        let packed = synthetic(20, 2, &colors);
        let encoded = encode_image("t", 20, 2, &packed).unwrap();
        assert_eq!(encoded.format, PixelFormat::Bit8);
        assert!(encoded.palette.is_none());
        assert_eq!(encoded.pixels, packed);
        assert_eq!(encoded.body_len(), 40);
    }

    #[test]
    fn test_palette_overflow_fails_loudly() {
        // Force 1-bit packing of a 3-color image: must error, not truncate.
        let packed = [0x00, 0x11, 0x22, 0x00];
        let result = encode_image_as("t", 4, 1, &packed, PixelFormat::Bit1Palettized);
        assert!(matches!(
            result,
            Err(PackError::PaletteOverflow {
                format: PixelFormat::Bit1Palettized,
                count: 3,
                capacity: 2,
            })
        ));
    }

    #[test]
    fn test_zero_dimension_images_rejected() {
        // 0 == 0 satisfies the length check, so these need their own guard
        // before row packing.
        for (w, h) in [(0u32, 0u32), (4, 0), (0, 3)] {
            assert!(
                matches!(
                    encode_image("empty", w, h, &[]),
                    Err(PackError::EmptyImage { width, height, .. }) if width == w && height == h
                ),
                "{}x{} must be rejected",
                w,
                h
            );
        }
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = encode_image("t", 3, 2, &[0u8; 5]);
        assert!(matches!(
            result,
            Err(PackError::DimensionMismatch { expected: 6, len: 5, .. })
        ));
    }

    #[test]
    fn test_worked_two_pixel_example() {
        // Opaque red and opaque green pack to 0xF0 and 0xCC; two distinct
        // colors select the 1-bit format with indices 0,1 -> 0b0100_0000.
        let packed = [0b1111_0000, 0b1100_1100];
        let encoded = encode_image("example", 2, 1, &packed).unwrap();
        assert_eq!(encoded.format, PixelFormat::Bit1Palettized);
        assert_eq!(encoded.palette.as_deref(), Some(&packed[..]));
        assert_eq!(encoded.pixels, vec![0b0100_0000]);
    }

    #[test]
    fn test_row_stride_per_format() {
        assert_eq!(PixelFormat::Bit1Palettized.row_stride(9), 2);
        assert_eq!(PixelFormat::Bit2Palettized.row_stride(5), 2);
        assert_eq!(PixelFormat::Bit4Palettized.row_stride(5), 3);
        assert_eq!(PixelFormat::Bit8.row_stride(5), 5);
    }
}
