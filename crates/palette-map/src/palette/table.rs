//! Built-in wire-format palette table.
//!
//! One fixed palette plus one fixed cell traversal order together form the
//! wire format the flag renderer consumes. Several mutually incompatible
//! tables and traversal orders have existed historically with no version
//! tag in the stream itself, so this crate pins exactly one combination and
//! labels it [`WIRE_FORMAT_VERSION`]. Changing either the table below or
//! the traversal in [`crate::grid`] is a breaking wire-format change.

use super::error::PaletteError;
use super::palette::Palette;

/// Version of the (palette table, traversal order) combination produced by
/// this crate. Consumers keyed to a different version will misrender.
pub const WIRE_FORMAT_VERSION: u32 = 1;

/// The fixed v1 palette: 64 colors laid out in a 16-column, 4-row atlas
/// texture. Tokens are the `u:v` texture coordinates of each cell
/// (`u = column / 16`, `v = row / 4`), formatted exactly as the renderer's
/// atlas generator emits them.
///
/// Row 0: greyscale ramp and browns. Row 1: reds through yellows.
/// Row 2: greens and cyans. Row 3: blues through pinks.
pub const FLAG_PALETTE_V1: &[(&str, &str)] = &[
    // Row 0 (v = 0.0): greys and browns
    ("000000", "0.0:0.0"),
    ("1a1a1a", "0.0625:0.0"),
    ("333333", "0.125:0.0"),
    ("4d4d4d", "0.1875:0.0"),
    ("666666", "0.25:0.0"),
    ("808080", "0.3125:0.0"),
    ("999999", "0.375:0.0"),
    ("b3b3b3", "0.4375:0.0"),
    ("cccccc", "0.5:0.0"),
    ("e6e6e6", "0.5625:0.0"),
    ("ffffff", "0.625:0.0"),
    ("5c4033", "0.6875:0.0"),
    ("7b5b3a", "0.75:0.0"),
    ("9c7a50", "0.8125:0.0"),
    ("c8a165", "0.875:0.0"),
    ("e8d0a9", "0.9375:0.0"),
    // Row 1 (v = 0.25): reds, oranges, yellows
    ("660000", "0.0:0.25"),
    ("990000", "0.0625:0.25"),
    ("cc0000", "0.125:0.25"),
    ("ff0000", "0.1875:0.25"),
    ("ff4040", "0.25:0.25"),
    ("ff8080", "0.3125:0.25"),
    ("ff6600", "0.375:0.25"),
    ("ff944d", "0.4375:0.25"),
    ("ffa500", "0.5:0.25"),
    ("ffc04d", "0.5625:0.25"),
    ("ffd700", "0.625:0.25"),
    ("ffe680", "0.6875:0.25"),
    ("ffff00", "0.75:0.25"),
    ("ffffb3", "0.8125:0.25"),
    ("cc6600", "0.875:0.25"),
    ("803300", "0.9375:0.25"),
    // Row 2 (v = 0.5): greens and cyans
    ("003300", "0.0:0.5"),
    ("006600", "0.0625:0.5"),
    ("009900", "0.125:0.5"),
    ("00cc00", "0.1875:0.5"),
    ("00ff00", "0.25:0.5"),
    ("66ff66", "0.3125:0.5"),
    ("99ff99", "0.375:0.5"),
    ("004d40", "0.4375:0.5"),
    ("008066", "0.5:0.5"),
    ("00b38f", "0.5625:0.5"),
    ("00e6b8", "0.625:0.5"),
    ("00ffff", "0.6875:0.5"),
    ("66ffff", "0.75:0.5"),
    ("006666", "0.8125:0.5"),
    ("009999", "0.875:0.5"),
    ("00cccc", "0.9375:0.5"),
    // Row 3 (v = 0.75): blues, purples, pinks
    ("000066", "0.0:0.75"),
    ("0000b3", "0.0625:0.75"),
    ("0000ff", "0.125:0.75"),
    ("4d4dff", "0.1875:0.75"),
    ("8080ff", "0.25:0.75"),
    ("b3b3ff", "0.3125:0.75"),
    ("330066", "0.375:0.75"),
    ("660099", "0.4375:0.75"),
    ("9900cc", "0.5:0.75"),
    ("cc00ff", "0.5625:0.75"),
    ("ff00ff", "0.625:0.75"),
    ("ff66ff", "0.6875:0.75"),
    ("ff99cc", "0.75:0.75"),
    ("ff3399", "0.8125:0.75"),
    ("cc0066", "0.875:0.75"),
    ("800040", "0.9375:0.75"),
];

/// Build the v1 wire-format palette.
///
/// # Errors
///
/// Propagates [`PaletteError`] if the built-in table were ever malformed;
/// a test pins it as valid.
pub fn flag_palette() -> Result<Palette, PaletteError> {
    Palette::from_table(FLAG_PALETTE_V1)
}
