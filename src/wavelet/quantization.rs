use super::coefficients::{Channel, CoefficientBuffer, Orientation};
use crate::encoding::config::{QuantizationVariant, WaveletLevel};

/// Non-linear requantization curves for 8-bit coefficients, indexed by the
/// coefficient reinterpreted as an unsigned byte.
///
/// Curve 0 clears everything. Curves 1 to 3 keep progressively fewer output
/// levels. Every curve is odd: `t[-c] == -t[c]`.
const CURVES: [[i8; 256]; 4] = [
    [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 32, 32, 32, 32, 32, 32, 32, 32, 32,
        32, 32, 32, 32, 32, 32, 32, 32, 48, 48, 48, 48, 48, 48, 48, 48,
        48, 48, 48, 56, 56, 56, 56, 56, 56, 56, 56, 56, 64, 64, 64, 64,
        64, 64, 64, 64, 72, 72, 72, 72, 72, 72, 72, 72, 80, 80, 80, 80,
        80, 80, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 96, 96,
        96, 96, 96, 104, 104, 104, 104, 104, 104, 104, 104, 104, 104, 112, 112, 112,
        112, 112, 112, 112, 112, 112, 120, 120, 120, 120, 120, 120, 120, 120, 120, 120,
        0, -120, -120, -120, -120, -120, -120, -120, -120, -120, -120, -112, -112, -112, -112, -112,
        -112, -112, -112, -112, -104, -104, -104, -104, -104, -104, -104, -104, -104, -104, -96, -96,
        -96, -96, -96, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -80,
        -80, -80, -80, -80, -80, -72, -72, -72, -72, -72, -72, -72, -72, -64, -64, -64,
        -64, -64, -64, -64, -64, -56, -56, -56, -56, -56, -56, -56, -56, -56, -48, -48,
        -48, -48, -48, -48, -48, -48, -48, -48, -48, -32, -32, -32, -32, -32, -32, -32,
        -32, -32, -32, -32, -32, -32, -32, -32, -32, -32, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        48, 48, 48, 48, 48, 48, 48, 48, 48, 48, 48, 48, 48, 48, 48, 48,
        48, 48, 48, 48, 48, 48, 48, 48, 64, 64, 64, 64, 64, 64, 64, 64,
        64, 64, 64, 64, 64, 64, 64, 64, 80, 80, 80, 80, 80, 80, 80, 80,
        80, 80, 80, 80, 80, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88,
        104, 104, 104, 104, 104, 104, 104, 104, 104, 104, 104, 112, 112, 112, 112, 112,
        112, 112, 112, 112, 120, 120, 120, 120, 120, 120, 120, 120, 120, 120, 120, 120,
        0, -120, -120, -120, -120, -120, -120, -120, -120, -120, -120, -120, -120, -112, -112, -112,
        -112, -112, -112, -112, -112, -112, -104, -104, -104, -104, -104, -104, -104, -104, -104, -104,
        -104, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -80, -80, -80, -80,
        -80, -80, -80, -80, -80, -80, -80, -80, -80, -64, -64, -64, -64, -64, -64, -64,
        -64, -64, -64, -64, -64, -64, -64, -64, -64, -48, -48, -48, -48, -48, -48, -48,
        -48, -48, -48, -48, -48, -48, -48, -48, -48, -48, -48, -48, -48, -48, -48, -48,
        -48, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88,
        88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88,
        88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88,
        88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88, 88,
        0, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88,
        -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88,
        -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88,
        -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88, -88,
        -88, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
];

/// Curve used by the non-linear variant, by `[level - 1][l][channel]`.
const CURVE_PARAMETERS: [[[usize; 3]; 3]; 3] = [
    [[0, 2, 0], [0, 0, 0], [0, 0, 0]],
    [[0, 3, 0], [1, 1, 1], [0, 0, 0]],
    [[0, 3, 0], [2, 2, 2], [1, 1, 1]],
];

/// Bits kept by the mask variant, by `[level - 1][l][channel]`.
const MASK_PARAMETERS: [[[u8; 3]; 3]; 3] = [
    [[0x00, 0xF0, 0x00], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00]],
    [[0x00, 0xC0, 0x00], [0xF0, 0xF0, 0xF0], [0x00, 0x00, 0x00]],
    [[0x00, 0xC0, 0x00], [0xC0, 0xC0, 0xC0], [0xF0, 0xF0, 0xF0]],
];

/// Clears the bits of `coefficient` outside `mask`, rounding toward zero.
pub fn mask_coefficient(coefficient: i8, mask: u8) -> i8 {
    let mut coefficient = coefficient;
    if coefficient < 0 {
        coefficient = coefficient.wrapping_add(!mask as i8);
    }
    (coefficient as u8 & mask) as i8
}

/// Requantizes the detail coefficients of one decomposition level.
#[derive(Debug, Clone, Copy)]
pub enum Quantizer {
    Mask([u8; 3]),
    Curve([&'static [i8; 256]; 3]),
}

impl Quantizer {
    /// Returns the quantizer for decomposition level `l` of a transform
    /// with `level` levels.
    ///
    /// # Panics
    ///
    /// Panics if `level` is 0 or `l` is not below `level`.
    pub fn new(variant: QuantizationVariant, level: WaveletLevel, l: u8) -> Quantizer {
        assert!(l < level.get(), "Level {} is not part of the transform!", l);
        let (level, l) = (level.get() as usize - 1, l as usize);
        match variant {
            QuantizationVariant::Mask => Quantizer::Mask(MASK_PARAMETERS[level][l]),
            QuantizationVariant::NonlinearTable => {
                Quantizer::Curve(CURVE_PARAMETERS[level][l].map(|curve| &CURVES[curve]))
            }
        }
    }

    pub fn apply(&self, channel: Channel, coefficient: i8) -> i8 {
        match self {
            Quantizer::Mask(masks) => mask_coefficient(coefficient, masks[channel as usize]),
            Quantizer::Curve(curves) => curves[channel as usize][coefficient as u8 as usize],
        }
    }
}

/// Quantizes the three detail sub-bands of level `l` in place.
/// The approximation is left untouched.
pub fn filter_level(
    coefficients: &mut CoefficientBuffer,
    level: WaveletLevel,
    l: u8,
    variant: QuantizationVariant,
) {
    let quantizer = Quantizer::new(variant, level, l);
    for orientation in Orientation::DETAILS {
        let positions: Vec<usize> = coefficients.subband_positions(l, orientation).collect();
        for channel in Channel::ALL {
            let plane = coefficients.plane_mut(channel);
            for &index in &positions {
                plane[index] = quantizer.apply(channel, plane[index]);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn level(level: u8) -> WaveletLevel {
        WaveletLevel::new(level).unwrap()
    }

    #[test]
    fn test_curves_are_odd() {
        for curve in &CURVES {
            assert_eq!(curve[0], 0);
            for c in 1..=i8::MAX {
                assert_eq!(curve[(-c) as u8 as usize], -curve[c as u8 as usize]);
            }
        }
    }

    #[test]
    fn test_mask_rounds_toward_zero() {
        assert_eq!(mask_coefficient(17, 0xF0), 16);
        assert_eq!(mask_coefficient(-17, 0xF0), -16);
        assert_eq!(mask_coefficient(-16, 0xF0), -16);
        assert_eq!(mask_coefficient(-15, 0xF0), 0);
        assert_eq!(mask_coefficient(100, 0xC0), 64);
        assert_eq!(mask_coefficient(-100, 0xC0), -64);
        assert_eq!(mask_coefficient(-5, 0x00), 0);
        assert_eq!(mask_coefficient(127, 0x00), 0);
        for c in -127..=i8::MAX {
            assert_eq!(mask_coefficient(c, 0xFF), c);
            assert!(mask_coefficient(c, 0xF0).unsigned_abs() <= c.unsigned_abs());
        }
    }

    #[test]
    fn test_quantizer_selection() {
        let quantizer = Quantizer::new(QuantizationVariant::Mask, level(3), 2);
        assert_eq!(quantizer.apply(Channel::U, 0x35), 0x30);

        // One level keeps only the luma details.
        let quantizer = Quantizer::new(QuantizationVariant::Mask, level(1), 0);
        assert_eq!(quantizer.apply(Channel::Y, 0x35), 0x30);
        assert_eq!(quantizer.apply(Channel::U, 0x35), 0);
        assert_eq!(quantizer.apply(Channel::V, -0x35), 0);

        let quantizer = Quantizer::new(QuantizationVariant::NonlinearTable, level(1), 0);
        assert_eq!(quantizer.apply(Channel::Y, 40), 48);
        assert_eq!(quantizer.apply(Channel::Y, -40), -48);
        assert_eq!(quantizer.apply(Channel::Y, 20), 0);
        assert_eq!(quantizer.apply(Channel::V, 100), 0);
    }

    #[test]
    #[should_panic]
    fn test_level_outside_transform() {
        Quantizer::new(QuantizationVariant::Mask, level(2), 2);
    }

    #[test]
    fn test_filter_keeps_approximation() {
        let mut coefficients = CoefficientBuffer::new();
        coefficients.reset(4, 4);
        for channel in Channel::ALL {
            coefficients.plane_mut(channel).fill(100);
        }
        filter_level(
            &mut coefficients,
            level(1),
            0,
            QuantizationVariant::Mask,
        );

        let expected_y = [
            100, 96, 100, 96, //
            96, 96, 96, 96, //
            100, 96, 100, 96, //
            96, 96, 96, 96,
        ];
        assert_eq!(coefficients.plane(Channel::Y), &expected_y);

        let expected_u = [
            100, 0, 100, 0, //
            0, 0, 0, 0, //
            100, 0, 100, 0, //
            0, 0, 0, 0,
        ];
        assert_eq!(coefficients.plane(Channel::U), &expected_u);
    }
}
