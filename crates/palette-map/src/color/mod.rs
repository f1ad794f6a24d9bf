//! Color types and conversions
//!
//! Raw 8-bit pixel types ([`Rgb`], [`Rgba`]) and the CIE [`Lab`] perceptual
//! space used for palette matching.

mod lab;
mod rgb;

pub use lab::Lab;
pub use rgb::{Rgb, Rgba};

// Hex parsing error lives with the palette validation errors.
pub use crate::palette::ParseColorError;
