//! Wavelet pre-filter for tiles that would otherwise be sent raw.
//!
//! A tile is converted to luma/chroma coefficients, decomposed by up to three
//! levels of a piecewise-linear Haar transform, quantized, and written back as
//! a tile of coefficient pixels that the regular tile encoder compresses.

pub mod coefficients;
pub mod color_transform;
pub mod lifting;
pub mod quantization;

use crate::encoding::buffer::Tile;
use crate::encoding::config::{QuantizationVariant, WaveletLevel};
use crate::encoding::format::PixelFormat;
use crate::encoding::traits::PixelWord;
use coefficients::{Channel, CoefficientBuffer, Orientation};
use color_transform::{coefficient_channels, to_coefficients};

/// Returns the largest `width`x`height` area whose sides are multiples of `2^level`.
pub fn aligned_size(width: usize, height: usize, level: WaveletLevel) -> (usize, usize) {
    let mask = !((1usize << level.get()) - 1);
    (width & mask, height & mask)
}

/// Transforms a tile of working pixels in `format` into a tile of the same
/// size holding quantized wavelet coefficients.
///
/// The output lists the detail sub-bands of every level, finest first and
/// each as diagonal, vertical and horizontal, then the coarsest
/// approximation, then the pixels outside the aligned area unchanged: the
/// right strip, the bottom strip and the bottom right corner, row by row.
///
/// Returns `None` if the level is 0 or the aligned area is empty.
pub fn analyze<P>(
    tile: &Tile<P>,
    format: &PixelFormat,
    level: WaveletLevel,
    variant: QuantizationVariant,
    coefficients: &mut CoefficientBuffer,
) -> Option<Tile<P>>
where
    P: PixelWord,
{
    let (width, height) = aligned_size(tile.width(), tile.height(), level);
    if !level.is_enabled() || width == 0 || height == 0 {
        return None;
    }

    coefficients.reset(width, height);
    let bits = format.channel_bits();
    for y in 0..height {
        for x in 0..width {
            let rgb = format.split_channels(tile.pixel(x, y).into());
            let index = y * width + x;
            for (channel, value) in Channel::ALL.into_iter().zip(to_coefficients(rgb, bits)) {
                coefficients.set(channel, index, value);
            }
        }
    }

    for l in 0..level.get() {
        lifting::transform_level(coefficients, l);
        quantization::filter_level(coefficients, level, l, variant);
    }

    let mut pixels = Vec::with_capacity(tile.len());
    pack_coefficients(coefficients, format, level, &mut pixels);
    copy_fringe(tile, width, height, &mut pixels);
    Some(Tile::new(tile.width(), tile.height(), pixels))
}

/// Appends the sub-bands of `coefficients` as pixels of `format`.
fn pack_coefficients<P>(
    coefficients: &CoefficientBuffer,
    format: &PixelFormat,
    level: WaveletLevel,
    to: &mut Vec<P>,
) where
    P: PixelWord,
{
    let pixel = |index: usize| {
        let values = Channel::ALL.map(|channel| coefficients.get(channel, index));
        P::from_u32(format.join_channels(coefficient_channels(values)))
    };

    for l in 0..level.get() {
        for orientation in [
            Orientation::Diagonal,
            Orientation::Vertical,
            Orientation::Horizontal,
        ] {
            to.extend(coefficients.subband_positions(l, orientation).map(pixel));
        }
    }
    let coarsest = level.get() - 1;
    to.extend(
        coefficients
            .subband_positions(coarsest, Orientation::Approximation)
            .map(pixel),
    );
}

/// Appends the pixels of `tile` outside its `width`x`height` aligned area.
fn copy_fringe<P>(tile: &Tile<P>, width: usize, height: usize, to: &mut Vec<P>)
where
    P: PixelWord,
{
    for y in 0..height {
        to.extend((width..tile.width()).map(|x| tile.pixel(x, y)));
    }
    for y in height..tile.height() {
        to.extend((0..width).map(|x| tile.pixel(x, y)));
    }
    for y in height..tile.height() {
        to.extend((width..tile.width()).map(|x| tile.pixel(x, y)));
    }
}
