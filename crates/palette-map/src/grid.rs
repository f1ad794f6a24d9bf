//! Canonical grid: nearest-neighbor resampling and wire-order traversal.
//!
//! Every source image is reduced to a fixed-size RGBA grid before matching.
//! The order in which grid cells are visited is part of the wire format
//! (see [`crate::WIRE_FORMAT_VERSION`]): token `N` of the serialized stream
//! corresponds to cell `(x = N / H, y = H - 1 - N % H)`: columns left to
//! right, rows bottom to top within each column.

use std::fmt;

use crate::color::Rgba;

/// Error raised when a source buffer cannot be resampled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Source or target dimensions contain a zero.
    ZeroDimension,
    /// Pixel buffer length does not match the claimed dimensions.
    DimensionMismatch {
        /// Claimed width x height.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::ZeroDimension => write!(f, "image dimensions must be non-zero"),
            GridError::DimensionMismatch { expected, actual } => write!(
                f,
                "pixel buffer length {} does not match dimensions (expected {})",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// A fixed-size RGBA raster produced by nearest-neighbor resampling.
///
/// Pixels are stored row-major internally; the wire-order traversal is
/// exposed through [`cells()`](CanonicalGrid::cells) and must not be
/// confused with storage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalGrid {
    pixels: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl CanonicalGrid {
    /// Resample `pixels` (row-major, `src_width` x `src_height`) to a
    /// `width` x `height` grid using nearest-neighbor sampling.
    ///
    /// Sampling picks the source pixel under the center of each target cell.
    /// No smoothing, no alpha premultiplication: each grid cell is an exact
    /// copy of one source pixel.
    ///
    /// # Errors
    ///
    /// - [`GridError::ZeroDimension`] for zero source or target dimensions
    /// - [`GridError::DimensionMismatch`] if `pixels.len()` is not
    ///   `src_width * src_height`
    pub fn resample(
        pixels: &[Rgba],
        src_width: usize,
        src_height: usize,
        width: usize,
        height: usize,
    ) -> Result<Self, GridError> {
        if src_width == 0 || src_height == 0 || width == 0 || height == 0 {
            return Err(GridError::ZeroDimension);
        }
        let expected = src_width * src_height;
        if pixels.len() != expected {
            return Err(GridError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let mut out = Vec::with_capacity(width * height);
        for y in 0..height {
            // Center sampling: source index under the middle of the cell.
            let sy = (((y as f64 + 0.5) * src_height as f64 / height as f64) as usize)
                .min(src_height - 1);
            for x in 0..width {
                let sx = (((x as f64 + 0.5) * src_width as f64 / width as f64) as usize)
                    .min(src_width - 1);
                out.push(pixels[sy * src_width + sx]);
            }
        }

        Ok(Self {
            pixels: out,
            width,
            height,
        })
    }

    /// Wrap an existing buffer that is already at grid size.
    ///
    /// # Errors
    ///
    /// Same validation as [`resample`](Self::resample).
    pub fn from_pixels(
        pixels: Vec<Rgba>,
        width: usize,
        height: usize,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension);
        }
        if pixels.len() != width * height {
            return Err(GridError::DimensionMismatch {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The pixel at cell `(x, y)`, row-major addressing, `(0, 0)` top-left.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    /// Overwrite the pixel at cell `(x, y)`.
    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, pixel: Rgba) {
        self.pixels[y * self.width + x] = pixel;
    }

    /// Raw row-major pixel buffer (for image encoding).
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Iterate cell coordinates in wire order: for each column x from left
    /// to right, rows from bottom (`y = H-1`) up to top (`y = 0`).
    ///
    /// This traversal is a wire-format contract; the consuming renderer
    /// addresses token `N` as cell `(N / H, H - 1 - N % H)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).rev().map(move |y| (x, y)))
    }
}
