//! GridConverter -- the primary ergonomic entry point for the crate.
//!
//! [`GridConverter`] wraps the full pipeline (resample, match, serialize,
//! optional recolor) behind a builder API with the renderer's canonical
//! grid size as the default.

use crate::color::Rgba;
use crate::grid::{CanonicalGrid, GridError};
use crate::palette::Palette;
use crate::serialize::serialize_tokens;

/// Default canonical grid width consumed by the flag renderer.
pub const DEFAULT_GRID_WIDTH: usize = 100;
/// Default canonical grid height consumed by the flag renderer.
pub const DEFAULT_GRID_HEIGHT: usize = 66;

/// The ordered token sequence for one converted grid.
///
/// Exactly `width * height` tokens, in wire traversal order (see
/// [`CanonicalGrid::cells`]). The serialized form is the comma-joined
/// stream the renderer stores and parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridData {
    tokens: Vec<String>,
    width: usize,
    height: usize,
}

impl GridData {
    /// Tokens in wire order.
    #[inline]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
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

    /// Serialize to the comma-delimited wire string.
    pub fn serialize(&self) -> String {
        serialize_tokens(&self.tokens)
    }
}

/// Result of one conversion: the canonical grid (recolored when requested)
/// and its token stream. The two never disagree: each recolored cell holds
/// the key color of the entry whose token was emitted for that cell.
#[derive(Debug, Clone)]
pub struct GridConversion {
    /// The resampled grid; quantized to palette colors unless the converter
    /// was configured to preserve original colors.
    pub grid: CanonicalGrid,
    /// Per-cell tokens in wire order.
    pub data: GridData,
}

/// Converter from RGBA rasters to palette token grids.
///
/// # Design
///
/// - Constructor requires a [`Palette`] (no invalid states; empty or
///   malformed tables are rejected when the palette is built)
/// - Configuration methods consume and return `self` (builder pattern)
/// - [`convert()`](Self::convert) takes `&self`, so one converter is
///   reusable across images and safely shareable across threads
///
/// # Example
///
/// ```
/// use palette_map::{flag_palette, GridConverter, Rgba};
///
/// let converter = GridConverter::new(flag_palette().unwrap())
///     .grid_size(2, 2);
///
/// // A 1x1 pure red source fills the whole grid
/// let result = converter.convert(&[Rgba::new(255, 0, 0, 255)], 1, 1).unwrap();
/// assert_eq!(result.data.tokens().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct GridConverter {
    palette: Palette,
    width: usize,
    height: usize,
    recolor: bool,
}

impl GridConverter {
    /// Create a converter with the canonical 100x66 grid and recoloring
    /// enabled (the quantized preview matches what the renderer will show).
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            recolor: true,
        }
    }

    /// Set the target grid dimensions.
    #[inline]
    pub fn grid_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enable or disable recoloring of the output grid.
    ///
    /// When disabled the returned grid keeps the original sampled colors
    /// (the "preserve original colors" mode); the token stream is unaffected.
    #[inline]
    pub fn recolor(mut self, enabled: bool) -> Self {
        self.recolor = enabled;
        self
    }

    /// The palette this converter matches against.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Configured grid width.
    #[inline]
    pub fn grid_width(&self) -> usize {
        self.width
    }

    /// Configured grid height.
    #[inline]
    pub fn grid_height(&self) -> usize {
        self.height
    }

    /// Convert a decoded RGBA raster into a token grid.
    ///
    /// Single deterministic pass: resample to the canonical grid, match
    /// every cell in wire traversal order, then (unless disabled) overwrite
    /// each cell with its matched entry's key color. No retries, no partial
    /// results: any failure discards all intermediate state.
    ///
    /// # Errors
    ///
    /// [`GridError`] if the source dimensions are invalid.
    pub fn convert(
        &self,
        pixels: &[Rgba],
        src_width: usize,
        src_height: usize,
    ) -> Result<GridConversion, GridError> {
        let grid = CanonicalGrid::resample(pixels, src_width, src_height, self.width, self.height)?;
        Ok(self.convert_grid(grid))
    }

    /// Convert a buffer that is already at grid size (skips resampling).
    ///
    /// # Errors
    ///
    /// [`GridError`] if `pixels.len()` does not match the configured grid.
    pub fn convert_resampled(&self, pixels: Vec<Rgba>) -> Result<GridConversion, GridError> {
        let grid = CanonicalGrid::from_pixels(pixels, self.width, self.height)?;
        Ok(self.convert_grid(grid))
    }

    fn convert_grid(&self, mut grid: CanonicalGrid) -> GridConversion {
        let mut tokens = Vec::with_capacity(self.width * self.height);
        // One matching decision per cell drives both the token stream and
        // the recolored preview, so the two cannot diverge.
        for (x, y) in grid.cells() {
            let idx = self.palette.match_index(grid.get(x, y));
            tokens.push(self.palette.token(idx).to_string());
            if self.recolor {
                grid.set(x, y, Rgba::opaque(self.palette.key(idx)));
            }
        }

        GridConversion {
            grid,
            data: GridData {
                tokens,
                width: self.width,
                height: self.height,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::palette::Palette;

    fn rgb_palette() -> Palette {
        Palette::from_table(&[
            ("#FF0000", "0.0:0.0"),
            ("#00FF00", "0.0625:0.0"),
            ("#0000FF", "0.125:0.0"),
            ("#FFFFFF", "0.1875:0.0"),
        ])
        .unwrap()
    }

    #[test]
    fn test_solid_red_fills_grid() {
        let converter = GridConverter::new(rgb_palette()).grid_size(2, 2);
        let result = converter
            .convert(&[Rgba::new(255, 0, 0, 255)], 1, 1)
            .unwrap();

        assert_eq!(result.data.tokens().len(), 4);
        for token in result.data.tokens() {
            assert_eq!(token, "0.0:0.0");
        }
        assert_eq!(result.data.serialize(), "0.0:0.0,0.0:0.0,0.0:0.0,0.0:0.0");
    }

    #[test]
    fn test_token_count_matches_grid() {
        let converter = GridConverter::new(rgb_palette());
        let result = converter
            .convert(&[Rgba::new(10, 200, 30, 255)], 1, 1)
            .unwrap();
        assert_eq!(
            result.data.tokens().len(),
            DEFAULT_GRID_WIDTH * DEFAULT_GRID_HEIGHT
        );
    }

    #[test]
    fn test_recolor_quantizes_grid() {
        let converter = GridConverter::new(rgb_palette()).grid_size(1, 1);
        // A dark red pixel quantizes to pure red
        let result = converter
            .convert(&[Rgba::new(180, 20, 10, 255)], 1, 1)
            .unwrap();
        assert_eq!(result.grid.get(0, 0), Rgba::opaque(Rgb::new(255, 0, 0)));
        assert_eq!(result.data.tokens()[0], "0.0:0.0");
    }

    #[test]
    fn test_preserve_colors_keeps_grid() {
        let converter = GridConverter::new(rgb_palette())
            .grid_size(1, 1)
            .recolor(false);
        let original = Rgba::new(180, 20, 10, 255);
        let result = converter.convert(&[original], 1, 1).unwrap();
        // Grid untouched, token still quantized
        assert_eq!(result.grid.get(0, 0), original);
        assert_eq!(result.data.tokens()[0], "0.0:0.0");
    }

    #[test]
    fn test_preview_and_tokens_agree() {
        let converter = GridConverter::new(rgb_palette()).grid_size(4, 3);
        let pixels: Vec<Rgba> = (0..12)
            .map(|i| Rgba::new((i * 20) as u8, 255 - (i * 15) as u8, 40, 255))
            .collect();
        let result = converter.convert(&pixels, 4, 3).unwrap();

        let palette = converter.palette();
        let h = result.grid.height();
        for (n, token) in result.data.tokens().iter().enumerate() {
            let (x, y) = (n / h, h - 1 - n % h);
            let cell = result.grid.get(x, y);
            // The recolored cell is an exact palette key, so matching it
            // again must return the same token.
            assert_eq!(palette.match_token(cell), token);
        }
    }

    #[test]
    fn test_determinism() {
        let converter = GridConverter::new(rgb_palette()).grid_size(8, 8);
        let pixels: Vec<Rgba> = (0..64)
            .map(|i| Rgba::new((i * 4) as u8, (i * 7) as u8, (i * 3) as u8, 255))
            .collect();
        let a = converter.convert(&pixels, 8, 8).unwrap();
        let b = converter.convert(&pixels, 8, 8).unwrap();
        assert_eq!(a.data.serialize(), b.data.serialize());
        assert_eq!(a.grid, b.grid);
    }

    #[test]
    fn test_invalid_source_rejected() {
        let converter = GridConverter::new(rgb_palette()).grid_size(2, 2);
        assert!(converter.convert(&[], 0, 0).is_err());
        assert!(converter
            .convert(&[Rgba::new(0, 0, 0, 255)], 2, 2)
            .is_err());
    }
}
