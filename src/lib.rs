//! Tile-based remote-framebuffer encoder implementing ZRLE and its ZYWRLE
//! wavelet pre-filter.
//!
//! A rectangle of a [`PixelBuffer`] is split into tiles (64x64 by default).
//! Every tile is converted to the wire pixel format, scanned once for runs
//! and distinct colours, and written with the cheapest of five sub-encodings:
//! solid, raw, plain RLE, packed palette or palette RLE. When a wavelet level
//! is configured, tiles that would be sent raw are first run through a
//! reversible colour transform and a piecewise-linear Haar transform, and the
//! resulting coefficients are encoded as a nested tile.
//!
//! ```no_run
//! use zrle::{Encoder, EncoderConfig, PixelBuffer, PixelFormat};
//!
//! # fn main() -> Result<(), zrle::EncodeError> {
//! let pixels = vec![0u8; 128 * 128 * 4];
//! let buffer = PixelBuffer::packed(&pixels, 128, 128, PixelFormat::rgbx8888())?;
//! let encoder = Encoder::new(EncoderConfig::default(), PixelFormat::rgb565())?;
//!
//! let mut out = Vec::new();
//! let stats = encoder.encode_rect(&buffer, buffer.bounds(), &mut out)?;
//! assert_eq!(stats.tiles, 4);
//! # Ok(())
//! # }
//! ```

pub mod coding;
pub mod encoding;
pub mod wavelet;

pub use encoding::{
    analysis::RunStatistics,
    buffer::{PixelBuffer, Rect, Tile},
    config::{EncoderConfig, QuantizationVariant, WaveletLevel},
    error::{ConfigError, EncodeError},
    format::{CompactPixel, PixelFormat},
    mode_selection::TileMode,
    palette::Palette,
    tile::TileOutcome,
    traits::PixelWord,
    EncodeStats, Encoder,
};
