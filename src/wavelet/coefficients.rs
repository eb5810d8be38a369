/// A colour plane of the coefficient buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Blue minus green.
    U = 0,
    /// Luma.
    Y = 1,
    /// Red minus green.
    V = 2,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::U, Channel::Y, Channel::V];
}

/// One of the four sub-bands produced by a decomposition level.
///
/// The discriminant is the position of the sub-band inside a
/// `2^(l+1)` square: bit 0 selects the right half and bit 1 the bottom half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Approximation = 0,
    Horizontal = 1,
    Vertical = 2,
    Diagonal = 3,
}

impl Orientation {
    pub const DETAILS: [Orientation; 3] = [
        Orientation::Horizontal,
        Orientation::Vertical,
        Orientation::Diagonal,
    ];
}

/// Signed 8-bit wavelet coefficients for the aligned part of a tile, one plane
/// per channel.
///
/// Sub-bands are interleaved: every level keeps its low values at even
/// positions of the previous level's grid and its high values at odd ones,
/// so a coefficient never moves once computed.
#[derive(Debug, Clone, Default)]
pub struct CoefficientBuffer {
    width: usize,
    height: usize,
    planes: [Vec<i8>; 3],
}

impl CoefficientBuffer {
    pub fn new() -> CoefficientBuffer {
        CoefficientBuffer::default()
    }

    /// Resizes the buffer to `width`x`height` and zeroes every coefficient.
    /// Allocations are kept between tiles.
    pub fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        for plane in &mut self.planes {
            plane.clear();
            plane.resize(width * height, 0);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, channel: Channel, index: usize) -> i8 {
        self.planes[channel as usize][index]
    }

    pub fn set(&mut self, channel: Channel, index: usize, value: i8) {
        self.planes[channel as usize][index] = value;
    }

    pub fn plane(&self, channel: Channel) -> &[i8] {
        &self.planes[channel as usize]
    }

    pub fn plane_mut(&mut self, channel: Channel) -> &mut [i8] {
        &mut self.planes[channel as usize]
    }

    /// Returns the buffer indices of a sub-band of level `l` (0 is the
    /// finest), row by row.
    ///
    /// The approximation of level `l` is the grid the next level decomposes.
    pub fn subband_positions(
        &self,
        l: u8,
        orientation: Orientation,
    ) -> impl Iterator<Item = usize> {
        let width = self.width;
        let step = 2usize << l;
        let x0 = if orientation as u8 & 1 != 0 { step / 2 } else { 0 };
        let y0 = if orientation as u8 & 2 != 0 { step / 2 } else { 0 };
        let columns = self.width / step;

        (0..self.height / step).flat_map(move |j| {
            (0..columns).map(move |i| (y0 + j * step) * width + x0 + i * step)
        })
    }

    /// Returns the number of coefficients in each sub-band of level `l`.
    pub fn subband_len(&self, l: u8) -> usize {
        let step = 2usize << l;
        (self.width / step) * (self.height / step)
    }
}

#[cfg(test)]
mod test {
    use super::{Channel, CoefficientBuffer, Orientation};
    use std::collections::HashSet;

    #[test]
    fn test_subband_positions() {
        let mut buffer = CoefficientBuffer::new();
        buffer.reset(8, 4);

        let positions: Vec<usize> = buffer
            .subband_positions(0, Orientation::Horizontal)
            .collect();
        assert_eq!(positions, vec![1, 3, 5, 7, 17, 19, 21, 23]);

        let positions: Vec<usize> = buffer.subband_positions(0, Orientation::Vertical).collect();
        assert_eq!(positions, vec![8, 10, 12, 14, 24, 26, 28, 30]);

        let positions: Vec<usize> = buffer.subband_positions(1, Orientation::Diagonal).collect();
        assert_eq!(positions, vec![18, 22]);

        let positions: Vec<usize> = buffer
            .subband_positions(1, Orientation::Approximation)
            .collect();
        assert_eq!(positions, vec![0, 4]);
        assert_eq!(buffer.subband_len(1), 2);
    }

    #[test]
    fn test_subbands_partition_the_buffer() {
        let mut buffer = CoefficientBuffer::new();
        for level in 1..=3u8 {
            buffer.reset(64, 56);
            let mut seen = HashSet::new();
            for l in 0..level {
                for orientation in Orientation::DETAILS {
                    assert_eq!(buffer.subband_positions(l, orientation).count(), buffer.subband_len(l));
                    seen.extend(buffer.subband_positions(l, orientation));
                }
            }
            seen.extend(buffer.subband_positions(level - 1, Orientation::Approximation));
            assert_eq!(seen.len(), 64 * 56);
        }
    }

    #[test]
    fn test_reset() {
        let mut buffer = CoefficientBuffer::new();
        buffer.reset(4, 4);
        buffer.set(Channel::V, 5, -3);
        assert_eq!(buffer.get(Channel::V, 5), -3);
        assert_eq!(buffer.plane(Channel::U), &[0; 16]);

        buffer.reset(2, 2);
        assert_eq!(buffer.plane(Channel::V), &[0; 4]);
        assert_eq!((buffer.width(), buffer.height()), (2, 2));
    }
}
