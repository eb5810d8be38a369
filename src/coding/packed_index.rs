use bitstream_io::{BitRead, BitWrite};
use std::io;

/// The largest palette that can be sent with packed indices.
pub const MAX_PACKED_PALETTE_SIZE: usize = 16;

/// Width of a packed index, indexed by `palette_size - 1`.
///
/// The wire format only knows 1, 2 and 4 bit indices, so palettes of 5 to 8
/// colours use 4 bits even though 3 would be enough.
const BITS_PER_PACKED_INDEX: [u32; MAX_PACKED_PALETTE_SIZE] =
    [0, 1, 2, 2, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4];

/// A struct that is used to encode and decode one tile row of palette indices
/// packed at a fixed number of bits per index.
///
/// Indices are written most significant bit first. Every row starts on a byte
/// boundary, so a partial trailing byte is padded with zero low-order bits.
pub struct PackedIndexCoder {
    bits: u32,
}

impl PackedIndexCoder {
    /// Constructs a coder for a palette of the given size.
    ///
    /// # Panics
    ///
    /// Panics if `palette_size` is not in `2..=16`. A single colour tile is
    /// always sent as a solid tile and never reaches packed mode.
    pub fn new(palette_size: usize) -> PackedIndexCoder {
        assert!(
            (2..=MAX_PACKED_PALETTE_SIZE).contains(&palette_size),
            "Palette size {} cannot be packed!",
            palette_size
        );
        PackedIndexCoder {
            bits: BITS_PER_PACKED_INDEX[palette_size - 1],
        }
    }

    /// Returns the number of bits used by each index.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns the number of bytes a row of `width` indices occupies.
    pub fn row_length(&self, width: usize) -> usize {
        (width * self.bits as usize + 7) / 8
    }

    /// Writes a row of indices to the given `BitWrite` and pads it to a whole byte.
    pub fn encode_row<T, I>(&self, bitwrite: &mut T, indices: I) -> io::Result<()>
    where
        T: BitWrite,
        I: IntoIterator<Item = u8>,
    {
        for index in indices {
            debug_assert!(u32::from(index) < (1 << self.bits));
            bitwrite.write(self.bits, index)?;
        }
        bitwrite.byte_align()
    }

    /// Reads a row of `width` indices from the given `BitRead`, skipping the row padding.
    pub fn decode_row<T>(&self, bitread: &mut T, width: usize) -> io::Result<Vec<u8>>
    where
        T: BitRead,
    {
        let mut row = Vec::with_capacity(width);
        for _ in 0..width {
            row.push(bitread.read(self.bits)?);
        }
        bitread.byte_align();
        Ok(row)
    }
}
