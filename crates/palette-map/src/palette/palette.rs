//! Palette table with precomputed Lab references and nearest-entry matching.
//!
//! This module provides the core `Palette` type: an immutable, ordered table
//! mapping RGB color keys to renderer tokens, with perceptual (CIE Lab)
//! nearest-entry search, a byte-exact fast path, and a fixed fallback entry
//! for transparent pixels.

use std::collections::HashMap;
use std::str::FromStr;

use super::error::PaletteError;
use crate::color::{Lab, Rgb, Rgba};

/// Atlas width used when assigning tokens to dynamically built palettes.
///
/// Matches the fixed-format atlas layout: entry `i` sits at column `i % 16`,
/// row `i / 16` of the palette texture.
pub const ATLAS_WIDTH: usize = 16;

#[cfg(test)]
thread_local! {
    /// Counts invocations of the nearest-entry Lab scan. Lets tests assert
    /// that the exact-match and alpha fast paths never touch the distance
    /// computation.
    pub(crate) static NEAREST_SCANS: std::cell::Cell<usize> =
        const { std::cell::Cell::new(0) };
}

/// One palette table row: an RGB color key and the token the renderer
/// resolves it to.
///
/// The token is an atlas lookup coordinate in `"u:v"` form; this crate
/// treats it as an opaque string so the wire format is byte-stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    /// 24-bit RGB color key, unique within the table.
    pub key: Rgb,
    /// Renderer token emitted for cells matched to this entry.
    pub token: String,
}

/// An immutable color palette with perceptual matching.
///
/// `Palette` is populated once at construction and never mutated. Entry
/// order is significant twice over: it is the iteration order for
/// nearest-entry search (and therefore the deterministic tie-break order),
/// and it is the atlas ordinal for dynamically built tables.
///
/// # Precomputation
///
/// Construction eagerly computes, exactly once per entry:
///
/// - the CIE Lab reference used for perceptual distance,
/// - a byte-exact key index for the fast path,
/// - the fallback entry (nearest to opaque white) used for every pixel
///   with alpha below 255.
///
/// This makes per-pixel matching cheap and keeps a converter instance
/// safely shareable across concurrent conversions (all methods take
/// `&self`).
///
/// # Example
///
/// ```
/// use palette_map::Palette;
///
/// let palette = Palette::from_table(&[
///     ("#000000", "0.0:0.0"),
///     ("#FFFFFF", "0.0625:0.0"),
/// ]).unwrap();
///
/// assert_eq!(palette.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
    /// Lab reference per entry, same order as `entries`.
    labs: Vec<Lab>,
    /// Byte-exact key lookup for the fast path.
    exact: HashMap<[u8; 3], usize>,
    /// Entry every non-opaque pixel maps to (nearest to white).
    fallback: usize,
}

impl Palette {
    /// Create a palette from owned entries.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyTable`] if `entries` is empty
    /// - [`PaletteError::DuplicateKey`] if two entries share an RGB key
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        if entries.is_empty() {
            return Err(PaletteError::EmptyTable);
        }

        let mut exact = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if exact.insert(entry.key.to_bytes(), i).is_some() {
                return Err(PaletteError::DuplicateKey { index: i });
            }
        }

        let labs: Vec<Lab> = entries.iter().map(|e| Lab::from(e.key)).collect();

        let mut palette = Self {
            entries,
            labs,
            exact,
            fallback: 0,
        };
        // Transparent pixels map to the entry nearest to the white background.
        palette.fallback = palette.nearest(Lab::from(Rgb::new(255, 255, 255)));
        Ok(palette)
    }

    /// Create a palette from `(hex key, token)` table rows.
    ///
    /// This is the constructor used for the built-in wire-format table and
    /// for test fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] for invalid hex strings, plus
    /// the validation errors of [`Palette::new`].
    ///
    /// # Example
    ///
    /// ```
    /// use palette_map::Palette;
    ///
    /// let palette = Palette::from_table(&[
    ///     ("ff0000", "0.0:0.0"),
    ///     ("00ff00", "0.0625:0.0"),
    /// ]).unwrap();
    /// assert_eq!(palette.token(0), "0.0:0.0");
    /// ```
    pub fn from_table(rows: &[(&str, &str)]) -> Result<Self, PaletteError> {
        let entries = rows
            .iter()
            .map(|&(hex, token)| {
                Ok(PaletteEntry {
                    key: Rgb::from_str(hex)?,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, PaletteError>>()?;
        Self::new(entries)
    }

    /// Build a palette from the unique opaque colors of an already-resampled
    /// pixel buffer (legacy dynamic-palette path).
    ///
    /// Colors are collected in first-encountered scan order and assigned
    /// atlas tokens by ordinal in a [`ATLAS_WIDTH`]-column texture, the way
    /// the renderer's generated palette textures are laid out. The resulting
    /// token set is only meaningful together with that generated texture;
    /// the fixed wire-format table is the primary path.
    ///
    /// # Errors
    ///
    /// [`PaletteError::EmptyTable`] if `pixels` contains no opaque pixel.
    pub fn from_image_colors(pixels: &[Rgba]) -> Result<Self, PaletteError> {
        let mut seen = HashMap::new();
        let mut colors: Vec<Rgb> = Vec::new();
        for px in pixels.iter().filter(|p| p.is_opaque()) {
            let rgb = px.rgb();
            if seen.insert(rgb.to_bytes(), ()).is_none() {
                colors.push(rgb);
            }
        }

        let rows = colors.len().div_ceil(ATLAS_WIDTH);
        let entries = colors
            .into_iter()
            .enumerate()
            .map(|(i, key)| PaletteEntry {
                key,
                token: atlas_token(i % ATLAS_WIDTH, i / ATLAS_WIDTH, ATLAS_WIDTH, rows),
            })
            .collect();
        Self::new(entries)
    }

    /// Returns the number of entries in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the palette is empty.
    ///
    /// Note: always `false` since empty tables are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The RGB key of the entry at `idx`.
    #[inline]
    pub fn key(&self, idx: usize) -> Rgb {
        self.entries[idx].key
    }

    /// The renderer token of the entry at `idx`.
    #[inline]
    pub fn token(&self, idx: usize) -> &str {
        &self.entries[idx].token
    }

    /// The Lab reference of the entry at `idx`.
    #[inline]
    pub fn lab(&self, idx: usize) -> Lab {
        self.labs[idx]
    }

    /// Index of the fallback entry used for non-opaque pixels.
    #[inline]
    pub fn fallback_index(&self) -> usize {
        self.fallback
    }

    /// Iterate over entries in canonical (construction) order.
    pub fn entries(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.iter()
    }

    /// Match one pixel to a palette entry, returning the entry index.
    ///
    /// Decision order:
    ///
    /// 1. **Alpha policy**: any pixel with alpha below 255 maps to the fixed
    ///    fallback entry; its RGB value is never inspected.
    /// 2. **Exact-match fast path**: a pixel whose RGB triplet equals a key
    ///    bit-for-bit returns that entry with no Lab conversion or distance
    ///    computation. Pure optimization: the general path would pick the
    ///    same entry at distance zero.
    /// 3. **Nearest perceptual match**: convert to Lab and linear-scan all
    ///    references. Ties break to the first entry in construction order.
    ///
    /// # Example
    ///
    /// ```
    /// use palette_map::{Palette, Rgba};
    ///
    /// let palette = Palette::from_table(&[
    ///     ("#000000", "0.0:0.0"),
    ///     ("#FFFFFF", "0.5:0.0"),
    /// ]).unwrap();
    ///
    /// // Near-black opaque pixel matches black
    /// assert_eq!(palette.match_index(Rgba::new(10, 5, 12, 255)), 0);
    /// // Transparent pixel takes the fallback (white here), RGB ignored
    /// assert_eq!(palette.match_index(Rgba::new(10, 5, 12, 0)), 1);
    /// ```
    #[inline]
    pub fn match_index(&self, pixel: Rgba) -> usize {
        if !pixel.is_opaque() {
            return self.fallback;
        }
        if let Some(&idx) = self.exact.get(&pixel.rgb().to_bytes()) {
            return idx;
        }
        self.nearest(Lab::from(pixel.rgb()))
    }

    /// Match one pixel and return the winning entry's token.
    #[inline]
    pub fn match_token(&self, pixel: Rgba) -> &str {
        self.token(self.match_index(pixel))
    }

    /// Nearest entry to `lab` by squared Euclidean Lab distance.
    ///
    /// Strict `<` comparison over construction order: the first entry at the
    /// minimum distance wins, deterministically.
    fn nearest(&self, lab: Lab) -> usize {
        #[cfg(test)]
        NEAREST_SCANS.with(|c| c.set(c.get() + 1));

        let mut best_idx = 0;
        let mut best_dist = f32::MAX;
        for (i, &reference) in self.labs.iter().enumerate() {
            let dist = lab.distance_squared(reference);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        best_idx
    }
}

/// Format an atlas coordinate token for column `x`, row `y` of a
/// `cols` x `rows` palette texture.
///
/// Tokens always carry a decimal point (`"0.0:0.5"`, never `"0:0.5"`) to
/// stay byte-compatible with the renderer's float formatting.
pub(crate) fn atlas_token(x: usize, y: usize, cols: usize, rows: usize) -> String {
    let u = x as f64 / cols as f64;
    let v = y as f64 / rows.max(1) as f64;
    format!("{}:{}", format_uv(u), format_uv(v))
}

fn format_uv(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
