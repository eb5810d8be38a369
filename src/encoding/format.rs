use super::error::EncodeError;
use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use std::io::{self, Write};

/// Describes how the colour of a pixel is laid out in an integer, in the
/// style of the remote-framebuffer protocol.
///
/// `*_max` is `2^bits - 1` for each channel and `*_shift` is the position of
/// the channel's least significant bit. Indexed formats (`true_colour ==
/// false`) ignore the channel fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    pub bits_per_pixel: u8,
    pub depth: u8,
    pub big_endian: bool,
    pub true_colour: bool,
    pub red_max: u16,
    pub green_max: u16,
    pub blue_max: u16,
    pub red_shift: u8,
    pub green_shift: u8,
    pub blue_shift: u8,
}

impl PixelFormat {
    /// 32 bits per pixel, 8 bits per channel, red in bits 16..24.
    pub const fn rgb888() -> PixelFormat {
        PixelFormat {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
            true_colour: true,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
        }
    }

    /// 32 bits per pixel stored as the bytes `R, G, B, X` in memory, the
    /// layout of an RGBA8 image buffer.
    pub const fn rgbx8888() -> PixelFormat {
        PixelFormat {
            red_shift: 0,
            green_shift: 8,
            blue_shift: 16,
            ..PixelFormat::rgb888()
        }
    }

    /// 24 bits per pixel stored as the bytes `R, G, B` in memory.
    pub const fn rgb24() -> PixelFormat {
        PixelFormat {
            bits_per_pixel: 24,
            ..PixelFormat::rgbx8888()
        }
    }

    /// 16 bits per pixel, 5 bits of red and blue and 6 bits of green.
    pub const fn rgb565() -> PixelFormat {
        PixelFormat {
            bits_per_pixel: 16,
            depth: 16,
            big_endian: false,
            true_colour: true,
            red_max: 31,
            green_max: 63,
            blue_max: 31,
            red_shift: 11,
            green_shift: 5,
            blue_shift: 0,
        }
    }

    /// 16 bits per pixel, 5 bits for every channel.
    pub const fn rgb555() -> PixelFormat {
        PixelFormat {
            depth: 15,
            green_max: 31,
            red_shift: 10,
            ..PixelFormat::rgb565()
        }
    }

    /// 8 bits per pixel, 3 bits of red and green and 2 bits of blue.
    pub const fn bgr233() -> PixelFormat {
        PixelFormat {
            bits_per_pixel: 8,
            depth: 8,
            big_endian: false,
            true_colour: true,
            red_max: 7,
            green_max: 7,
            blue_max: 3,
            red_shift: 0,
            green_shift: 3,
            blue_shift: 6,
        }
    }

    /// 8 bits per pixel indexing an external colour map.
    pub const fn indexed8() -> PixelFormat {
        PixelFormat {
            bits_per_pixel: 8,
            depth: 8,
            big_endian: false,
            true_colour: false,
            red_max: 0,
            green_max: 0,
            blue_max: 0,
            red_shift: 0,
            green_shift: 0,
            blue_shift: 0,
        }
    }

    /// Returns the same format with the given byte order.
    pub const fn with_big_endian(self, big_endian: bool) -> PixelFormat {
        PixelFormat { big_endian, ..self }
    }

    /// Returns the smallest standard wire format that keeps every bit of
    /// channel precision of `source`.
    pub fn working_for(source: &PixelFormat) -> PixelFormat {
        if !source.true_colour || source.bits_per_pixel == 8 {
            return *source;
        }

        let [red, green, blue] = source.channel_bits();
        let format = if red <= 5 && green <= 5 && blue <= 5 {
            PixelFormat::rgb555()
        } else if red <= 5 && green <= 6 && blue <= 5 {
            PixelFormat::rgb565()
        } else {
            PixelFormat::rgb888()
        };
        format.with_big_endian(source.big_endian)
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel as usize / 8
    }

    /// Checks that the format describes pixels the codec can read.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if !matches!(self.bits_per_pixel, 8 | 16 | 24 | 32) {
            return Err(EncodeError::UnsupportedBitsPerPixel(self.bits_per_pixel));
        }
        if self.depth == 0 || self.depth > self.bits_per_pixel {
            return Err(EncodeError::InvalidPixelFormat(
                "depth must be in 1..=bits_per_pixel",
            ));
        }
        if !self.true_colour {
            if self.bits_per_pixel != 8 {
                return Err(EncodeError::InvalidPixelFormat(
                    "indexed formats must use 8 bits per pixel",
                ));
            }
            return Ok(());
        }

        for (max, shift) in self.channels() {
            let max = u32::from(max);
            if max == 0 || (max & (max + 1)) != 0 {
                return Err(EncodeError::InvalidPixelFormat(
                    "channel maximum must be 2^n - 1",
                ));
            }
            if shift >= self.bits_per_pixel
                || (u64::from(max) << shift) >= (1u64 << self.bits_per_pixel)
            {
                return Err(EncodeError::InvalidPixelFormat(
                    "channel does not fit in the pixel",
                ));
            }
        }
        Ok(())
    }

    /// Checks that the format can be sent on the wire.
    pub fn validate_target(&self) -> Result<(), EncodeError> {
        self.validate()?;
        if self.bits_per_pixel == 24 {
            return Err(EncodeError::UnsupportedBitsPerPixel(self.bits_per_pixel));
        }
        Ok(())
    }

    /// Checks that pixels in `source` can be converted to this format.
    pub fn validate_conversion(&self, source: &PixelFormat) -> Result<(), EncodeError> {
        if self.true_colour != source.true_colour {
            return Err(EncodeError::UnsupportedConversion);
        }
        Ok(())
    }

    /// Returns the `(max, shift)` pair of the red, green and blue channels.
    fn channels(&self) -> [(u16, u8); 3] {
        [
            (self.red_max, self.red_shift),
            (self.green_max, self.green_shift),
            (self.blue_max, self.blue_shift),
        ]
    }

    /// Returns the precision, in bits, of the red, green and blue channels.
    pub fn channel_bits(&self) -> [u32; 3] {
        self.channels().map(|(max, _)| max.count_ones())
    }

    /// Reads one pixel stored in this format from the start of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than `bytes_per_pixel`.
    pub fn read_pixel(&self, bytes: &[u8]) -> u32 {
        match (self.bits_per_pixel, self.big_endian) {
            (8, _) => u32::from(bytes[0]),
            (16, true) => u32::from(BigEndian::read_u16(bytes)),
            (16, false) => u32::from(LittleEndian::read_u16(bytes)),
            (24, true) => BigEndian::read_u24(bytes),
            (24, false) => LittleEndian::read_u24(bytes),
            (_, true) => BigEndian::read_u32(bytes),
            (_, false) => LittleEndian::read_u32(bytes),
        }
    }

    /// Converts a pixel value of the `source` format to this format by
    /// rescaling every channel to this format's precision.
    ///
    /// Formats with the same channel layout pass the value through unchanged.
    pub fn convert_from(&self, source: &PixelFormat, value: u32) -> u32 {
        if !source.true_colour || self.channels() == source.channels() {
            return value;
        }

        let mut converted = 0;
        for ((from_max, from_shift), (to_max, to_shift)) in
            source.channels().into_iter().zip(self.channels())
        {
            let channel = (value >> from_shift) & u32::from(from_max);
            let channel = rescale(channel, from_max.count_ones(), to_max.count_ones());
            converted |= channel << to_shift;
        }
        converted
    }

    /// Splits a pixel into red, green and blue bytes, each channel left
    /// justified so that its most significant bit is bit 7.
    pub fn split_channels(&self, pixel: u32) -> [u8; 3] {
        self.channels().map(|(max, shift)| {
            let channel = (pixel >> shift) & u32::from(max);
            rescale(channel, max.count_ones(), 8) as u8
        })
    }

    /// The opposite of `split_channels`. Bits below the channel precision are dropped.
    pub fn join_channels(&self, channels: [u8; 3]) -> u32 {
        self.channels()
            .into_iter()
            .zip(channels)
            .map(|((max, shift), byte)| rescale(u32::from(byte), 8, max.count_ones()) << shift)
            .fold(0, |pixel, channel| pixel | channel)
    }

    /// Returns how pixels of this format are written on the wire.
    pub fn compact_pixel(&self) -> CompactPixel {
        let big_endian = self.big_endian;
        match self.bits_per_pixel {
            8 => CompactPixel::One,
            16 => CompactPixel::Two { big_endian },
            _ => {
                if self.true_colour && self.depth <= 24 {
                    let fits_low = self
                        .channels()
                        .iter()
                        .all(|&(max, shift)| (u64::from(max) << shift) < (1 << 24));
                    let fits_high = self.channels().iter().all(|&(_, shift)| shift > 7);

                    if fits_low || fits_high {
                        let upper = if big_endian { fits_high } else { !fits_low };
                        return CompactPixel::Three { big_endian, upper };
                    }
                }
                CompactPixel::Four { big_endian }
            }
        }
    }
}

/// Moves a channel value from one bit precision to another, dropping or
/// appending low-order bits.
fn rescale(value: u32, from_bits: u32, to_bits: u32) -> u32 {
    if from_bits >= to_bits {
        value >> (from_bits - to_bits)
    } else {
        value << (to_bits - from_bits)
    }
}

/// The byte layout of a pixel value in the encoded stream.
///
/// 32-bit true colour formats whose channels all live in three of the four
/// bytes are sent as 3-byte compact pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompactPixel {
    One,
    Two { big_endian: bool },
    /// `upper` selects the three most significant bytes of the pixel.
    Three { big_endian: bool, upper: bool },
    Four { big_endian: bool },
}

impl CompactPixel {
    /// Returns the width of a written pixel, in bytes.
    pub fn bytes(&self) -> usize {
        match self {
            CompactPixel::One => 1,
            CompactPixel::Two { .. } => 2,
            CompactPixel::Three { .. } => 3,
            CompactPixel::Four { .. } => 4,
        }
    }

    /// Returns the width of a written pixel, in bits.
    pub fn bits(&self) -> u32 {
        self.bytes() as u32 * 8
    }

    /// Writes a pixel value to the given `Write`.
    pub fn write<W>(&self, to: &mut W, pixel: u32) -> io::Result<()>
    where
        W: Write,
    {
        match *self {
            CompactPixel::One => to.write_u8(pixel as u8),
            CompactPixel::Two { big_endian: true } => to.write_u16::<BigEndian>(pixel as u16),
            CompactPixel::Two { big_endian: false } => to.write_u16::<LittleEndian>(pixel as u16),
            CompactPixel::Three { big_endian, upper } => {
                let pixel = if upper { pixel >> 8 } else { pixel & 0x00FF_FFFF };
                if big_endian {
                    to.write_u24::<BigEndian>(pixel)
                } else {
                    to.write_u24::<LittleEndian>(pixel)
                }
            }
            CompactPixel::Four { big_endian: true } => to.write_u32::<BigEndian>(pixel),
            CompactPixel::Four { big_endian: false } => to.write_u32::<LittleEndian>(pixel),
        }
    }
}
