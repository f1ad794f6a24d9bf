//! palette-map: fixed-palette pixel grid mapping for flag renderers
//!
//! This library converts an RGBA raster into a fixed-size grid of palette
//! tokens: each cell of the grid is matched to the perceptually nearest
//! entry of a fixed color table and re-expressed as that entry's atlas
//! coordinate token, ready for a renderer that paints the grid from a
//! palette texture.
//!
//! # Quick Start
//!
//! The [`GridConverter`] builder is the primary entry point:
//!
//! ```
//! use palette_map::{flag_palette, GridConverter, Rgba};
//!
//! let converter = GridConverter::new(flag_palette().unwrap());
//! let result = converter.convert(&[Rgba::new(255, 0, 0, 255)], 1, 1).unwrap();
//!
//! assert_eq!(result.data.tokens().len(), 100 * 66);
//! let wire = result.data.serialize();
//! assert!(!wire.ends_with(','));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RGBA raster                     (decoded by the caller)
//!     |
//!     v
//! CanonicalGrid                   (nearest-neighbor resample to W x H)
//!     |
//!     v  per cell, in wire traversal order
//! Palette::match_index()
//!     |   1. alpha < 255  -> fixed fallback entry (nearest to white)
//!     |   2. exact RGB key -> that entry, no distance math
//!     |   3. else          -> nearest CIE Lab reference, first entry
//!     |                       wins ties
//!     v
//! GridData                        (W*H tokens, comma-joined wire string)
//!     +-- optional recolor: cell := matched entry's key color
//! ```
//!
//! # Color Science
//!
//! Matching happens in CIE L\*a\*b\* (D65), where Euclidean distance
//! approximates perceived color difference. Lab is used **only** for
//! matching: tokens and recolored pixels always come from the palette's
//! raw RGB keys, so the wire output is byte-stable regardless of any
//! floating-point drift in the conversion matrices.
//!
//! All palette Lab references are precomputed once at construction; a
//! conversion is a single synchronous pass over `W*H` cells with a linear
//! palette scan per non-trivial cell. The palette and converter are
//! immutable after construction and can be shared across threads.
//!
//! # Wire Format
//!
//! The serialized stream is versioned by convention, not by an embedded
//! tag: [`WIRE_FORMAT_VERSION`] pins the (palette table, traversal order)
//! combination. Token `N` corresponds to grid cell
//! `(x = N / H, y = H - 1 - N % H)`.

pub mod color;
pub mod convert;
pub mod grid;
pub mod palette;
pub mod serialize;

#[cfg(test)]
mod domain_tests;

pub use color::{Lab, Rgb, Rgba};
pub use convert::{
    GridConversion, GridConverter, GridData, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH,
};
pub use grid::{CanonicalGrid, GridError};
pub use palette::{
    flag_palette, Palette, PaletteEntry, PaletteError, ParseColorError, ATLAS_WIDTH,
    FLAG_PALETTE_V1, WIRE_FORMAT_VERSION,
};
pub use serialize::{serialize_tokens, split_tokens};
