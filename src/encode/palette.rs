//! First-occurrence palette index map.

use std::collections::HashMap;

/// Deduplicated palette of packed byte values, indexed in first-seen order.
///
/// Built with one scan over an image's packed bytes: the first distinct
/// value gets index 0, the second index 1, and so on. The index order is
/// what the blob stores as the palette table, so `palette()[i]` is the
/// packed byte that index `i` decodes to.
#[derive(Debug, Default)]
pub struct PaletteIndexMap {
    indices: HashMap<u8, u8>,
    values: Vec<u8>,
}

impl PaletteIndexMap {
    /// Scan packed pixel bytes and build the map.
    pub fn build(pixels: &[u8]) -> Self {
        let mut map = Self::default();
        for &value in pixels {
            if !map.indices.contains_key(&value) {
                // 256 distinct u8 values at most, so the index fits u8.
                let index = map.values.len() as u8;
                map.indices.insert(value, index);
                map.values.push(value);
            }
        }
        map
    }

    /// Scan packed pixel bytes, building the map and the per-pixel index
    /// stream in one pass.
    pub fn build_indexed(pixels: &[u8]) -> (Self, Vec<u8>) {
        let mut map = Self::default();
        let mut indices = Vec::with_capacity(pixels.len());
        for &value in pixels {
            let index = match map.indices.get(&value) {
                Some(&i) => i,
                None => {
                    let i = map.values.len() as u8;
                    map.indices.insert(value, i);
                    map.values.push(value);
                    i
                }
            };
            indices.push(index);
        }
        (map, indices)
    }

    /// Number of distinct packed byte values observed.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dense index assigned to a packed byte value.
    ///
    /// `None` only for values that never occurred in the scanned pixels.
    pub fn index_of(&self, value: u8) -> Option<u8> {
        self.indices.get(&value).copied()
    }

    /// Palette table ordered by index: `palette()[i]` is the packed byte
    /// value mapped to index `i`.
    pub fn palette(&self) -> &[u8] {
        &self.values
    }
}
