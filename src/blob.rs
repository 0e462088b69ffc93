//! Binary resource blob assembly.
//!
//! The blob is the single artifact the embedded runtime loads at startup.
//! Layout, all integers little-endian (the target runtime is little-endian
//! ARM and reads these structs raw):
//!
//! ```text
//! offset  size  field
//! ------  ----  ------------------------------
//! 0       4     checksum (u32)           build timestamp, validated on load
//! 4       4     num_resources (u32)
//! 8       8*N   summary table            { width: u16, height: u16, offset: u32 }
//! ...           image bodies, back to back:
//!   +0    2       row_stride (u16)
//!   +2    2       version_format (u16)   (version << 12) | (format_code << 1)
//!   +4    2       x (u16, always 0)
//!   +6    2       y (u16, always 0)
//!   +8    2       width (u16)
//!   +10   2       height (u16)
//!   +12   *       packed pixel bytes
//!   +*    *       palette bytes          (palettized formats only)
//! ```
//!
//! Summary-table offsets are absolute from the start of the blob and point
//! at each body's 12-byte header. The layout pass can only run once every
//! image is encoded, since each offset is the cumulative size of everything
//! before it.

use chrono::Utc;

use crate::encode::EncodedImage;

/// Resource format version stored in the high nibble of `version_format`.
const FORMAT_VERSION: u16 = 1;

/// Size of the blob-level header: checksum + resource count.
pub const PACK_HEADER_SIZE: usize = 8;

/// Size of one summary-table entry: width, height, offset.
pub const SUMMARY_ENTRY_SIZE: usize = 8;

/// Size of the fixed per-image body header.
pub const IMAGE_HEADER_SIZE: usize = 12;

/// Assembles encoded images into a serialized resource blob.
#[derive(Debug)]
pub struct BlobWriter {
    checksum: u32,
}

impl BlobWriter {
    /// Writer stamped with the current build time.
    ///
    /// The checksum is the low 32 bits of the Unix timestamp; the runtime
    /// compares it against the value baked into the generated header to
    /// detect stale blobs.
    pub fn new() -> Self {
        Self {
            checksum: Utc::now().timestamp() as u32,
        }
    }

    /// Writer with a fixed checksum (deterministic output).
    pub fn with_checksum(checksum: u32) -> Self {
        Self { checksum }
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Absolute byte offsets of each image body, in order.
    ///
    /// The first body starts right after the header section; each
    /// subsequent offset adds the previous body's header + pixels +
    /// palette.
    pub fn layout(&self, images: &[EncodedImage]) -> Vec<u32> {
        let mut offsets = Vec::with_capacity(images.len());
        let mut position = PACK_HEADER_SIZE + SUMMARY_ENTRY_SIZE * images.len();
        for image in images {
            offsets.push(position as u32);
            position += IMAGE_HEADER_SIZE + image.body_len();
        }
        offsets
    }

    /// Declared total size of the blob for these images.
    pub fn total_size(&self, images: &[EncodedImage]) -> usize {
        PACK_HEADER_SIZE
            + images
                .iter()
                .map(|i| SUMMARY_ENTRY_SIZE + IMAGE_HEADER_SIZE + i.body_len())
                .sum::<usize>()
    }

    /// Serialize the blob: pack header, summary table, then image bodies.
    pub fn write(&self, images: &[EncodedImage]) -> Vec<u8> {
        let offsets = self.layout(images);
        let mut blob = Vec::with_capacity(self.total_size(images));

        blob.extend_from_slice(&self.checksum.to_le_bytes());
        blob.extend_from_slice(&(images.len() as u32).to_le_bytes());

        for (image, &offset) in images.iter().zip(&offsets) {
            blob.extend_from_slice(&(image.width as u16).to_le_bytes());
            blob.extend_from_slice(&(image.height as u16).to_le_bytes());
            blob.extend_from_slice(&offset.to_le_bytes());
        }

        for image in images {
            let row_stride = image.format.row_stride(image.width) as u16;
            let version_format = (FORMAT_VERSION << 12) | (image.format.code() << 1);

            blob.extend_from_slice(&row_stride.to_le_bytes());
            blob.extend_from_slice(&version_format.to_le_bytes());
            blob.extend_from_slice(&0u16.to_le_bytes()); // origin x
            blob.extend_from_slice(&0u16.to_le_bytes()); // origin y
            blob.extend_from_slice(&(image.width as u16).to_le_bytes());
            blob.extend_from_slice(&(image.height as u16).to_le_bytes());

            blob.extend_from_slice(&image.pixels);
            if let Some(palette) = &image.palette {
                blob.extend_from_slice(palette);
            }
        }

        blob
    }
}

impl Default for BlobWriter {
    fn default() -> Self {
        Self::new()
    }
}
