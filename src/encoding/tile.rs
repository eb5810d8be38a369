use super::analysis::{analyze, RunStatistics, Runs};
use super::buffer::Tile;
use super::config::{EncoderConfig, QuantizationVariant, WaveletLevel};
use super::format::{CompactPixel, PixelFormat};
use super::mode_selection::{ModeSelector, TileMode};
use super::palette::Palette;
use super::traits::PixelWord;
use crate::coding::packed_index::PackedIndexCoder;
use crate::coding::run_length::encode_run_length;
use crate::wavelet::{self, coefficients::CoefficientBuffer};
use bitstream_io::{BigEndian, BitWriter};
use byteorder::WriteBytesExt;
use log::trace;
use std::io::{self, Write};

const RAW: u8 = 0;
const SOLID: u8 = 1;
const RLE: u8 = 0x80;

/// Per-worker state reused from one tile to the next.
pub struct TileScratch<P> {
    palette: Palette<P>,
    coefficients: CoefficientBuffer,
}

impl<P> TileScratch<P>
where
    P: PixelWord,
{
    pub fn new(config: &EncoderConfig) -> TileScratch<P> {
        TileScratch {
            palette: Palette::new(config.max_palette_capacity),
            coefficients: CoefficientBuffer::new(),
        }
    }
}

/// What was written for a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileOutcome {
    /// The mode announced by the tile header.
    pub mode: TileMode,
    /// The mode of the nested coefficient tile, if the wavelet pre-filter ran.
    pub nested: Option<TileMode>,
}

impl TileOutcome {
    pub fn is_transformed(&self) -> bool {
        self.nested.is_some()
    }
}

/// The first phase of encoding a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TilePlan {
    Direct(TileMode),
    /// Send a raw header followed by the encoded coefficient tile.
    Transform,
}

/// Writes tiles of working pixels with the cheapest sub-encoding.
pub struct TileEncoder {
    format: PixelFormat,
    compact: CompactPixel,
    selector: ModeSelector,
    wavelet: Option<(WaveletLevel, QuantizationVariant)>,
}

impl TileEncoder {
    /// Creates an encoder writing pixels of the wire `format`.
    ///
    /// The wavelet pre-filter is only used for true colour formats wider
    /// than 8 bits.
    pub fn new(config: &EncoderConfig, format: PixelFormat) -> TileEncoder {
        let compact = format.compact_pixel();
        let wavelet = (config.wavelet_level.is_enabled()
            && format.true_colour
            && format.bits_per_pixel != 8)
            .then_some((config.wavelet_level, config.quantization));

        TileEncoder {
            format,
            compact,
            selector: ModeSelector::new(compact.bytes(), config.packed_mode_capacity),
            wavelet,
        }
    }

    pub fn compact_pixel(&self) -> CompactPixel {
        self.compact
    }

    /// Encodes a tile and writes it to the given `Write`.
    pub fn encode<P, W>(
        &self,
        tile: &Tile<P>,
        scratch: &mut TileScratch<P>,
        to: &mut W,
    ) -> io::Result<TileOutcome>
    where
        P: PixelWord,
        W: Write,
    {
        let stats = analyze(tile.pixels(), &mut scratch.palette);
        // The transform reuses the palette for the nested tile.
        let colours = scratch.palette.len();
        let overflowed = scratch.palette.is_overflowed();
        let outcome = match self.plan(tile, &scratch.palette, &stats) {
            TilePlan::Direct(mode) => {
                self.emit(mode, tile, &scratch.palette, to)?;
                TileOutcome { mode, nested: None }
            }
            TilePlan::Transform => {
                let nested = self.transform(tile, scratch, to)?;
                TileOutcome {
                    mode: TileMode::Raw,
                    nested: Some(nested),
                }
            }
        };

        trace!(
            "{}x{} tile: {:?}, {} colours{}, {} runs, {} singles",
            tile.width(),
            tile.height(),
            outcome,
            colours,
            if overflowed { "+" } else { "" },
            stats.runs,
            stats.singles,
        );
        Ok(outcome)
    }

    fn plan<P>(&self, tile: &Tile<P>, palette: &Palette<P>, stats: &RunStatistics) -> TilePlan
    where
        P: PixelWord,
    {
        let pending = self.wavelet.map_or(0, |(level, _)| level.get());
        let mode = self
            .selector
            .select(tile.width(), tile.height(), palette, stats, pending);

        match mode {
            TileMode::Raw if self.wavelet.is_some() => TilePlan::Transform,
            mode => TilePlan::Direct(mode),
        }
    }

    /// Writes the raw header and the coefficient tile, encoded with the
    /// pre-filter switched off. Tiles too small to transform are nested as is.
    fn transform<P, W>(
        &self,
        tile: &Tile<P>,
        scratch: &mut TileScratch<P>,
        to: &mut W,
    ) -> io::Result<TileMode>
    where
        P: PixelWord,
        W: Write,
    {
        to.write_u8(RAW)?;

        let transformed = match self.wavelet {
            Some((level, variant)) => {
                wavelet::analyze(tile, &self.format, level, variant, &mut scratch.coefficients)
            }
            None => None,
        };
        let nested = transformed.as_ref().unwrap_or(tile);

        let stats = analyze(nested.pixels(), &mut scratch.palette);
        let mode = self.selector.select(
            nested.width(),
            nested.height(),
            &scratch.palette,
            &stats,
            0,
        );
        self.emit(mode, nested, &scratch.palette, to)?;
        Ok(mode)
    }

    /// Writes the header and payload of a tile in the given mode.
    ///
    /// `palette` must hold the tile's colours if the mode uses a palette.
    fn emit<P, W>(
        &self,
        mode: TileMode,
        tile: &Tile<P>,
        palette: &Palette<P>,
        to: &mut W,
    ) -> io::Result<()>
    where
        P: PixelWord,
        W: Write,
    {
        let pixels = tile.pixels();
        match mode {
            TileMode::Solid => {
                to.write_u8(SOLID)?;
                if let Some(&pixel) = pixels.first() {
                    self.write_pixel(to, pixel)?;
                }
            }
            TileMode::Raw => {
                to.write_u8(RAW)?;
                for &pixel in pixels {
                    self.write_pixel(to, pixel)?;
                }
            }
            TileMode::RawRle => {
                to.write_u8(RLE)?;
                for run in Runs::new(pixels) {
                    self.write_pixel(to, run.value)?;
                    encode_run_length(to, run.length)?;
                }
            }
            TileMode::PalettePacked => {
                to.write_u8(palette.len() as u8)?;
                self.write_palette(to, palette)?;

                let coder = PackedIndexCoder::new(palette.len());
                let mut bitwriter = BitWriter::<_, BigEndian>::new(&mut *to);
                let mut row = Vec::with_capacity(tile.width());
                for line in pixels.chunks(tile.width()) {
                    row.clear();
                    for &pixel in line {
                        row.push(palette_index(palette, pixel)?);
                    }
                    coder.encode_row(&mut bitwriter, row.iter().copied())?;
                }
            }
            TileMode::PaletteRle => {
                to.write_u8(RLE | palette.len() as u8)?;
                self.write_palette(to, palette)?;

                for run in Runs::new(pixels) {
                    let index = palette_index(palette, run.value)?;
                    if run.length <= 2 {
                        for _ in 0..run.length {
                            to.write_u8(index)?;
                        }
                    } else {
                        to.write_u8(index | RLE)?;
                        encode_run_length(to, run.length)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn write_pixel<P, W>(&self, to: &mut W, pixel: P) -> io::Result<()>
    where
        P: PixelWord,
        W: Write,
    {
        self.compact.write(to, pixel.into())
    }

    fn write_palette<P, W>(&self, to: &mut W, palette: &Palette<P>) -> io::Result<()>
    where
        P: PixelWord,
        W: Write,
    {
        for &colour in palette.values() {
            self.write_pixel(to, colour)?;
        }
        Ok(())
    }
}

fn palette_index<P>(palette: &Palette<P>, pixel: P) -> io::Result<u8>
where
    P: PixelWord,
{
    palette
        .index_of(pixel)
        .map(|index| index as u8)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "pixel missing from the palette"))
}
