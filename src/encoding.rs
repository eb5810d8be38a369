use buffer::{read_tile, PixelBuffer, Rect, Tile};
use config::EncoderConfig;
use error::EncodeError;
use format::PixelFormat;
use log::debug;
use mode_selection::TileMode;
use std::io::Write;
use tile::{TileEncoder, TileOutcome, TileScratch};
use traits::PixelWord;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

pub mod analysis;
pub mod buffer;
pub mod config;
pub mod error;
pub mod format;
pub mod mode_selection;
pub mod palette;
pub mod tile;
pub mod traits;

/// Counters describing one call to `Encoder::encode_rect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeStats {
    pub tiles: usize,
    pub bytes: usize,
    /// Tiles sent through the wavelet pre-filter.
    pub transformed_tiles: usize,
    /// Tiles per header mode, indexed like `TileMode::ALL`.
    pub modes: [usize; 5],
}

impl EncodeStats {
    /// Returns the number of tiles whose header announced `mode`.
    pub fn count(&self, mode: TileMode) -> usize {
        self.modes[mode as usize]
    }

    fn record(&mut self, outcome: TileOutcome, bytes: usize) {
        self.tiles += 1;
        self.bytes += bytes;
        self.modes[outcome.mode as usize] += 1;
        if outcome.is_transformed() {
            self.transformed_tiles += 1;
        }
    }
}

/// Encodes rectangles of a framebuffer as a sequence of tiles in a fixed
/// wire pixel format.
#[derive(Debug, Clone)]
pub struct Encoder {
    config: EncoderConfig,
    format: PixelFormat,
}

impl Encoder {
    /// Creates an encoder writing pixels in the wire `format`.
    pub fn new(config: EncoderConfig, format: PixelFormat) -> Result<Encoder, EncodeError> {
        config.validate()?;
        format.validate_target()?;
        Ok(Encoder { config, format })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    /// Encodes `rect` of `buffer` and writes the tiles, in row-major order,
    /// to the given `Write`.
    ///
    /// The rectangle and the pixel formats are checked before anything is written.
    pub fn encode_rect<W>(
        &self,
        buffer: &PixelBuffer,
        rect: Rect,
        to: &mut W,
    ) -> Result<EncodeStats, EncodeError>
    where
        W: Write,
    {
        if rect.is_empty() {
            return Err(EncodeError::InvalidDimensions {
                width: rect.width,
                height: rect.height,
            });
        }
        if !rect.fits_in(buffer.width(), buffer.height()) {
            return Err(EncodeError::RectOutOfBounds {
                rect,
                width: buffer.width(),
                height: buffer.height(),
            });
        }
        self.format.validate_conversion(buffer.format())?;

        let stats = match self.format.bits_per_pixel {
            8 => self.encode_tiles::<u8, W>(buffer, rect, to)?,
            16 => self.encode_tiles::<u16, W>(buffer, rect, to)?,
            _ => self.encode_tiles::<u32, W>(buffer, rect, to)?,
        };

        debug!(
            "Encoded {}x{} at ({}, {}): {} tiles ({} transformed), {} bytes, modes {:?}",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            stats.tiles,
            stats.transformed_tiles,
            stats.bytes,
            stats.modes,
        );
        Ok(stats)
    }

    /// Encodes a single tile of working pixels already in the wire format.
    pub fn encode_tile<P, W>(&self, tile: &Tile<P>, to: &mut W) -> Result<TileOutcome, EncodeError>
    where
        P: PixelWord,
        W: Write,
    {
        if P::BITS != u32::from(self.format.bits_per_pixel) {
            return Err(EncodeError::UnsupportedBitsPerPixel(self.format.bits_per_pixel));
        }
        if tile.is_empty() {
            return Err(EncodeError::InvalidDimensions {
                width: tile.width(),
                height: tile.height(),
            });
        }

        let encoder = TileEncoder::new(&self.config, self.format);
        let mut scratch = TileScratch::new(&self.config);
        Ok(encoder.encode(tile, &mut scratch, to)?)
    }

    #[cfg(not(feature = "rayon"))]
    fn encode_tiles<P, W>(
        &self,
        buffer: &PixelBuffer,
        rect: Rect,
        to: &mut W,
    ) -> Result<EncodeStats, EncodeError>
    where
        P: PixelWord,
        W: Write,
    {
        let encoder = TileEncoder::new(&self.config, self.format);
        let mut scratch = TileScratch::new(&self.config);
        let mut stats = EncodeStats::default();
        let mut bytes = Vec::new();

        for tile_rect in rect.tiles(self.config.tile_width, self.config.tile_height) {
            let tile: Tile<P> = read_tile(buffer, tile_rect, &self.format);
            bytes.clear();
            let outcome = encoder.encode(&tile, &mut scratch, &mut bytes)?;
            to.write_all(&bytes)?;
            stats.record(outcome, bytes.len());
        }
        Ok(stats)
    }

    /// Tiles are encoded in parallel, each worker with its own scratch, and
    /// written in order once all of them are done.
    #[cfg(feature = "rayon")]
    fn encode_tiles<P, W>(
        &self,
        buffer: &PixelBuffer,
        rect: Rect,
        to: &mut W,
    ) -> Result<EncodeStats, EncodeError>
    where
        P: PixelWord,
        W: Write,
    {
        let encoder = TileEncoder::new(&self.config, self.format);
        let tiles: Vec<Rect> = rect
            .tiles(self.config.tile_width, self.config.tile_height)
            .collect();

        let encoded: Vec<_> = tiles
            .par_iter()
            .map_init(
                || TileScratch::<P>::new(&self.config),
                |scratch, &tile_rect| {
                    let tile: Tile<P> = read_tile(buffer, tile_rect, &self.format);
                    let mut bytes = Vec::new();
                    encoder
                        .encode(&tile, scratch, &mut bytes)
                        .map(|outcome| (outcome, bytes))
                },
            )
            .collect();

        let mut stats = EncodeStats::default();
        for result in encoded {
            let (outcome, bytes) = result?;
            to.write_all(&bytes)?;
            stats.record(outcome, bytes.len());
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rgbx(width: usize, height: usize, pixel: impl Fn(usize, usize) -> [u8; 3]) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend(pixel(x, y));
                data.push(0);
            }
        }
        data
    }

    #[test]
    fn test_rejects_bad_rectangles() {
        let data = rgbx(10, 10, |_, _| [0, 0, 0]);
        let buffer = PixelBuffer::packed(&data, 10, 10, PixelFormat::rgbx8888()).unwrap();
        let encoder = Encoder::new(EncoderConfig::default(), PixelFormat::rgb565()).unwrap();

        let mut out = Vec::new();
        assert!(matches!(
            encoder.encode_rect(&buffer, Rect::new(0, 0, 0, 5), &mut out),
            Err(EncodeError::InvalidDimensions { width: 0, height: 5 })
        ));
        assert!(matches!(
            encoder.encode_rect(&buffer, Rect::new(5, 5, 6, 5), &mut out),
            Err(EncodeError::RectOutOfBounds { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_rejects_bad_configuration() {
        let config = EncoderConfig {
            packed_mode_capacity: 0,
            ..EncoderConfig::default()
        };
        assert!(matches!(
            Encoder::new(config, PixelFormat::rgb565()),
            Err(EncodeError::Config(_))
        ));
        assert!(matches!(
            Encoder::new(EncoderConfig::default(), PixelFormat::rgb24()),
            Err(EncodeError::UnsupportedBitsPerPixel(24))
        ));
    }

    #[test]
    fn test_rejects_indexed_conversion() {
        let data = vec![0u8; 16];
        let buffer = PixelBuffer::packed(&data, 4, 4, PixelFormat::indexed8()).unwrap();
        let encoder = Encoder::new(EncoderConfig::default(), PixelFormat::rgb565()).unwrap();
        assert!(matches!(
            encoder.encode_rect(&buffer, buffer.bounds(), &mut Vec::new()),
            Err(EncodeError::UnsupportedConversion)
        ));

        let encoder = Encoder::new(EncoderConfig::default(), PixelFormat::indexed8()).unwrap();
        let stats = encoder
            .encode_rect(&buffer, buffer.bounds(), &mut Vec::new())
            .unwrap();
        assert_eq!(stats.count(TileMode::Solid), 1);
    }

    #[test]
    fn test_statistics() {
        let data = rgbx(130, 70, |x, _| if x < 64 { [255, 0, 0] } else { [0, 0, 255] });
        let buffer = PixelBuffer::packed(&data, 130, 70, PixelFormat::rgbx8888()).unwrap();
        let encoder = Encoder::new(EncoderConfig::default(), PixelFormat::rgb565()).unwrap();

        let mut out = Vec::new();
        let stats = encoder.encode_rect(&buffer, buffer.bounds(), &mut out).unwrap();
        assert_eq!(stats.tiles, 6);
        assert_eq!(stats.count(TileMode::Solid), 6);
        assert_eq!(stats.bytes, out.len());
        assert_eq!(out.len(), 6 * 3);
        assert_eq!(&out[..3], &[1, 0x00, 0xF8]);
        assert_eq!(&out[3..6], &[1, 0x1F, 0x00]);
    }

    #[test]
    fn test_encode_tile_checks_width() {
        let encoder = Encoder::new(EncoderConfig::default(), PixelFormat::rgb565()).unwrap();
        let tile = Tile::new(2, 1, vec![1u8, 2]);
        assert!(matches!(
            encoder.encode_tile(&tile, &mut Vec::new()),
            Err(EncodeError::UnsupportedBitsPerPixel(16))
        ));

        let tile = Tile::new(2, 1, vec![1u16, 1]);
        let mut out = Vec::new();
        let outcome = encoder.encode_tile(&tile, &mut out).unwrap();
        assert_eq!(outcome.mode, TileMode::Solid);
        assert_eq!(out, vec![1, 1, 0]);
    }
}
