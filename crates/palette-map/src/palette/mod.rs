//! Palette table, matching, and the built-in wire-format table.

mod error;
#[allow(clippy::module_inception)]
pub(crate) mod palette;
mod table;

pub use error::{PaletteError, ParseColorError};
pub use palette::{Palette, PaletteEntry, ATLAS_WIDTH};
pub use table::{flag_palette, FLAG_PALETTE_V1, WIRE_FORMAT_VERSION};
