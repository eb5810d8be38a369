use std::fmt::Debug;
use std::hash::Hash;

/// This trait is implemented by all types that can
/// hold one working pixel of a tile.
///
/// The working pixel is the value of a pixel in the wire pixel format. Its
/// width is the smallest unsigned integer that holds `bits_per_pixel` bits,
/// so 24-bit compact pixels travel in a `u32`.
pub trait PixelWord:
    Into<u32> + Copy + Clone + Eq + Hash + Default + Debug + Send + Sync + 'static
{
    /// The number of bits in the word.
    const BITS: u32;

    /// Narrows a pixel value to this word, dropping any bits above `BITS`.
    fn from_u32(value: u32) -> Self;
}

impl PixelWord for u8 {
    const BITS: u32 = 8;

    fn from_u32(value: u32) -> Self {
        value as u8
    }
}

impl PixelWord for u16 {
    const BITS: u32 = 16;

    fn from_u32(value: u32) -> Self {
        value as u16
    }
}

impl PixelWord for u32 {
    const BITS: u32 = 32;

    fn from_u32(value: u32) -> Self {
        value
    }
}
