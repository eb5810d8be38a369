use super::buffer::Rect;
use std::io;
use thiserror::Error;

/// Errors reported by the encoder entry points.
///
/// All of them are raised before a single byte is written, except for
/// `Io`, which comes from the output sink.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The pixel format uses a storage size the codec does not handle.
    #[error("unsupported bits per pixel: {0}")]
    UnsupportedBitsPerPixel(u8),
    /// The pixel format is internally inconsistent.
    #[error("invalid pixel format: {0}")]
    InvalidPixelFormat(&'static str),
    /// Pixels of the source format cannot be expressed in the target format.
    #[error("cannot convert indexed pixels to a different pixel format")]
    UnsupportedConversion,
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("rectangle {rect:?} lies outside the {width}x{height} buffer")]
    RectOutOfBounds {
        rect: Rect,
        width: usize,
        height: usize,
    },
    #[error("buffer too small: expected at least {expected} bytes, got {got}")]
    BufferTooSmall { expected: usize, got: usize },
}

/// Configuration values outside the ranges the codec supports.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("wavelet level {0} is not in 0..=3")]
    WaveletLevel(u8),
    #[error("palette capacity {0} is not in 1..=128")]
    PaletteCapacity(usize),
    #[error("packed mode capacity {0} is not in 1..=16")]
    PackedModeCapacity(usize),
    #[error("tile size {width}x{height} is empty")]
    TileSize { width: usize, height: usize },
}
