//! A minimal tile stream decoder used to check what the encoder writes.

use bitstream_io::{BigEndian, BitReader};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read};
use zrle::coding::packed_index::PackedIndexCoder;
use zrle::coding::run_length::decode_run_length;
use zrle::{CompactPixel, Rect, TileMode};

#[derive(Debug)]
pub struct DecodedTile {
    pub rect: Rect,
    pub mode: TileMode,
    /// For transformed tiles, the coefficient pixels of the nested tile.
    pub pixels: Vec<u32>,
    pub nested: Option<TileMode>,
}

fn invalid(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}

pub fn read_pixel<R: Read>(from: &mut R, compact: CompactPixel) -> io::Result<u32> {
    use byteorder::BigEndian as Be;
    match compact {
        CompactPixel::One => from.read_u8().map(u32::from),
        CompactPixel::Two { big_endian: true } => from.read_u16::<Be>().map(u32::from),
        CompactPixel::Two { big_endian: false } => from.read_u16::<LittleEndian>().map(u32::from),
        CompactPixel::Three { big_endian, upper } => {
            let value = if big_endian {
                from.read_u24::<Be>()?
            } else {
                from.read_u24::<LittleEndian>()?
            };
            Ok(if upper { value << 8 } else { value })
        }
        CompactPixel::Four { big_endian: true } => from.read_u32::<Be>(),
        CompactPixel::Four { big_endian: false } => from.read_u32::<LittleEndian>(),
    }
}

fn read_palette<R: Read>(from: &mut R, size: usize, compact: CompactPixel) -> io::Result<Vec<u32>> {
    (0..size).map(|_| read_pixel(from, compact)).collect()
}

fn lookup(palette: &[u32], index: u8) -> io::Result<u32> {
    palette
        .get(index as usize)
        .copied()
        .ok_or_else(|| invalid("palette index out of range"))
}

/// Decodes one tile. With `wavelet` set, a raw header announces a nested tile.
pub fn decode_tile<R: Read>(
    from: &mut R,
    rect: Rect,
    compact: CompactPixel,
    wavelet: bool,
) -> io::Result<DecodedTile> {
    let count = rect.width * rect.height;
    let header = from.read_u8()?;

    let (mode, pixels) = match header {
        0 if wavelet => {
            let nested = decode_tile(from, rect, compact, false)?;
            return Ok(DecodedTile {
                rect,
                mode: TileMode::Raw,
                pixels: nested.pixels,
                nested: Some(nested.mode),
            });
        }
        0 => {
            let pixels = (0..count)
                .map(|_| read_pixel(from, compact))
                .collect::<io::Result<Vec<u32>>>()?;
            (TileMode::Raw, pixels)
        }
        1 => (TileMode::Solid, vec![read_pixel(from, compact)?; count]),
        2..=16 => {
            let palette = read_palette(from, header as usize, compact)?;
            let coder = PackedIndexCoder::new(palette.len());
            let mut bitreader = BitReader::<_, BigEndian>::new(&mut *from);
            let mut pixels = Vec::with_capacity(count);
            for _ in 0..rect.height {
                for index in coder.decode_row(&mut bitreader, rect.width)? {
                    pixels.push(lookup(&palette, index)?);
                }
            }
            (TileMode::PalettePacked, pixels)
        }
        128 => {
            let mut pixels = Vec::with_capacity(count);
            while pixels.len() < count {
                let value = read_pixel(from, compact)?;
                let length = decode_run_length(from)?;
                pixels.extend(std::iter::repeat(value).take(length));
            }
            (TileMode::RawRle, pixels)
        }
        129..=255 => {
            let palette = read_palette(from, (header & 0x7F) as usize, compact)?;
            let mut pixels = Vec::with_capacity(count);
            while pixels.len() < count {
                let byte = from.read_u8()?;
                let value = lookup(&palette, byte & 0x7F)?;
                let length = if byte & 0x80 != 0 {
                    decode_run_length(from)?
                } else {
                    1
                };
                pixels.extend(std::iter::repeat(value).take(length));
            }
            (TileMode::PaletteRle, pixels)
        }
        _ => return Err(invalid("unknown tile header")),
    };

    if pixels.len() != count {
        return Err(invalid("run overflows the tile"));
    }
    Ok(DecodedTile {
        rect,
        mode,
        pixels,
        nested: None,
    })
}

/// Decodes every tile of a rectangle, in row-major order.
pub fn decode_rect<R: Read>(
    from: &mut R,
    rect: Rect,
    tile_size: usize,
    compact: CompactPixel,
    wavelet: bool,
) -> io::Result<Vec<DecodedTile>> {
    rect.tiles(tile_size, tile_size)
        .map(|tile| decode_tile(from, tile, compact, wavelet))
        .collect()
}

/// Places decoded tiles into a `rect`-sized, row-major pixel array.
pub fn assemble(rect: Rect, tiles: &[DecodedTile]) -> Vec<u32> {
    let mut pixels = vec![0; rect.area()];
    for tile in tiles {
        for (i, &pixel) in tile.pixels.iter().enumerate() {
            let x = tile.rect.x - rect.x + i % tile.rect.width;
            let y = tile.rect.y - rect.y + i / tile.rect.width;
            pixels[y * rect.width + x] = pixel;
        }
    }
    pixels
}
