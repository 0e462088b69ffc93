//! Error diffusion kernel definitions.
//!
//! A kernel is data, not code: a divisor plus ordered rows of integer
//! weights. Row 0 is the current scanline and holds only taps to the right
//! of the pixel being processed; its length defines the kernel's
//! horizontal half-width `hw`. Every following row spans the full window
//! `-hw ..= +hw` and therefore must have exactly `2 * hw + 1` weights.
//! A kernel with zero rows is the identity: no error is diffused and the
//! image passes through pure per-pixel quantization.
//!
//! The diffusion loop never inspects kernel names or shapes beyond this
//! contract, so the catalog can grow without touching the algorithm.

use crate::error::KernelError;

/// A validated error diffusion kernel.
///
/// Each neighbor receives `residual * weight / divisor` (truncating integer
/// division). Weights of zero are legal placeholders that keep rows
/// rectangular; they diffuse nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    name: String,
    divisor: i32,
    rows: Vec<Vec<i32>>,
    half_width: usize,
}

impl Kernel {
    /// Build and validate a kernel.
    ///
    /// # Errors
    ///
    /// - [`KernelError::InvalidDivisor`] if `divisor < 1`
    /// - [`KernelError::InconsistentRowWidth`] if any row after the first
    ///   does not have `2 * rows[0].len() + 1` weights
    pub fn new(
        name: impl Into<String>,
        divisor: i32,
        rows: Vec<Vec<i32>>,
    ) -> Result<Self, KernelError> {
        let name = name.into();

        if divisor < 1 {
            return Err(KernelError::InvalidDivisor { name, divisor });
        }

        let half_width = rows.first().map(|r| r.len()).unwrap_or(0);
        let full_width = 2 * half_width + 1;
        for (i, row) in rows.iter().enumerate().skip(1) {
            if row.len() != full_width {
                return Err(KernelError::InconsistentRowWidth {
                    name,
                    row: i,
                    len: row.len(),
                    expected: full_width,
                });
            }
        }

        Ok(Self {
            name,
            divisor,
            rows,
            half_width,
        })
    }

    /// The identity kernel: quantization with no error diffusion.
    pub fn identity() -> Self {
        Self {
            name: "NoDither".to_string(),
            divisor: 1,
            rows: Vec::new(),
            half_width: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    /// Horizontal half-width `hw`: row 0 taps reach `x+1 ..= x+hw`, later
    /// rows reach `x-hw ..= x+hw`.
    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Number of rows, including row 0. Zero for the identity kernel.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Weight for a row-0 tap at horizontal offset `i` (1-based, `1..=hw`).
    #[inline]
    pub fn current_row_weight(&self, i: usize) -> i32 {
        self.rows[0][i - 1]
    }

    /// Weight for a tap in row `j >= 1` at horizontal offset `i` in
    /// `-hw ..= +hw`.
    #[inline]
    pub fn row_weight(&self, j: usize, i: isize) -> i32 {
        self.rows[j][(i + self.half_width as isize) as usize]
    }
}

/// Standard kernel definitions: (name, divisor, rows).
///
/// Weights follow the published formulations; Fan and the Sierra variants
/// carry explicit zero placeholders to keep their rows rectangular.
const STANDARD_KERNELS: &[(&str, i32, &[&[i32]])] = &[
    ("FalseFloydSteinberg", 8, &[&[3], &[0, 3, 2]]),
    ("FloydSteinberg", 16, &[&[7], &[3, 5, 1]]),
    ("Fan", 16, &[&[7, 0], &[1, 3, 5, 0, 0]]),
    (
        "JarvisJudiceNinke",
        48,
        &[&[7, 5], &[3, 5, 7, 5, 3], &[1, 3, 5, 3, 1]],
    ),
    (
        "Atkinson",
        8,
        &[&[1, 1], &[0, 1, 1, 1, 0], &[0, 0, 1, 0, 0]],
    ),
    (
        "TwoRowSierra",
        32,
        &[&[5, 3], &[2, 4, 5, 4, 2], &[0, 2, 3, 2, 0]],
    ),
    ("Sierra", 16, &[&[4, 3], &[1, 2, 3, 2, 1]]),
    ("SierraLite", 16, &[&[2], &[1, 1, 0]]),
];

/// An ordered collection of diffusion kernels for trial selection.
///
/// Catalog order is significant: when two kernels tie on the error score,
/// the selector keeps the one that appears first.
#[derive(Debug, Clone)]
pub struct KernelCatalog {
    kernels: Vec<Kernel>,
}

impl KernelCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            kernels: Vec::new(),
        }
    }

    /// The standard catalog of eight error diffusion kernels.
    ///
    /// Construction validates every definition; a malformed entry fails
    /// here, before any image is processed.
    pub fn standard() -> Result<Self, KernelError> {
        let kernels = STANDARD_KERNELS
            .iter()
            .map(|&(name, divisor, rows)| {
                Kernel::new(name, divisor, rows.iter().map(|r| r.to_vec()).collect())
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { kernels })
    }

    /// Append a kernel to the catalog.
    pub fn push(&mut self, kernel: Kernel) {
        self.kernels.push(kernel);
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Kernel> {
        self.kernels.iter()
    }

    /// Look up a kernel by name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&Kernel> {
        self.kernels
            .iter()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = KernelCatalog::standard().expect("standard kernels must validate");
        assert_eq!(catalog.len(), 8);
        assert!(catalog.find("FloydSteinberg").is_some());
        assert!(catalog.find("floydsteinberg").is_some(), "lookup ignores case");
        assert!(catalog.find("Ostromoukhov").is_none());
    }

    #[test]
    fn test_half_width_from_first_row() {
        let k = Kernel::new("fs", 16, vec![vec![7], vec![3, 5, 1]]).unwrap();
        assert_eq!(k.half_width(), 1);
        assert_eq!(k.row_count(), 2);
        assert_eq!(k.current_row_weight(1), 7);
        assert_eq!(k.row_weight(1, -1), 3);
        assert_eq!(k.row_weight(1, 0), 5);
        assert_eq!(k.row_weight(1, 1), 1);
    }

    #[test]
    fn test_inconsistent_row_width_rejected() {
        let result = Kernel::new("bad", 16, vec![vec![7], vec![3, 5]]);
        assert!(matches!(
            result,
            Err(KernelError::InconsistentRowWidth {
                row: 1,
                len: 2,
                expected: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_wide_kernel_row_width() {
        // hw = 2 -> later rows need 5 weights
        let ok = Kernel::new("jjn", 48, vec![vec![7, 5], vec![3, 5, 7, 5, 3]]);
        assert!(ok.is_ok());
        let bad = Kernel::new("jjn", 48, vec![vec![7, 5], vec![3, 5, 7]]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_non_positive_divisor_rejected() {
        assert!(matches!(
            Kernel::new("zero", 0, vec![vec![1]]),
            Err(KernelError::InvalidDivisor { divisor: 0, .. })
        ));
        assert!(Kernel::new("neg", -4, vec![vec![1]]).is_err());
    }

    #[test]
    fn test_identity_kernel_shape() {
        let id = Kernel::identity();
        assert_eq!(id.row_count(), 0);
        assert_eq!(id.half_width(), 0);
    }

    #[test]
    fn test_catalog_extensible() {
        let mut catalog = KernelCatalog::standard().unwrap();
        catalog.push(Kernel::identity());
        assert_eq!(catalog.len(), 9);
        assert!(catalog.find("NoDither").is_some());
    }
}
