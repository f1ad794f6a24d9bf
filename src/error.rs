use std::path::PathBuf;

use thiserror::Error;

/// Fatal conversion errors: no token stream is produced.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("failed to decode image: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("invalid palette configuration: {0}")]
    Palette(#[from] palette_map::PaletteError),

    #[error("grid conversion failed: {0}")]
    Grid(#[from] palette_map::GridError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recoverable persistence errors: the computed token stream remains valid,
/// the failure is reported separately and never invalidates the result.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {artifact}: {source}")]
    Write {
        artifact: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PNG encode error for {artifact}: {source}")]
    PngEncode {
        artifact: String,
        #[source]
        source: png::EncodingError,
    },
}
