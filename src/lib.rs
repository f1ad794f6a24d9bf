//! Flagpix - image to flag-grid converter
//!
//! CLI collaborators around the `palette-map` core engine: PNG decode and
//! encode, file and slot-store persistence.
//! This library exposes modules for integration testing.

pub mod error;
pub mod image_io;
pub mod store;
