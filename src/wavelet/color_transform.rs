/// Losslessly convert from RGB to the integer luma/chroma space of the wavelet.
///
/// `Y = (R + 2G + B) >> 2`, `U = B - G` and `V = R - G`. For 8-bit channels
/// Y keeps 8 bits while U and V need 9 signed bits, so the computation is
/// done in i32.
pub fn rgb_to_yuv(r: i32, g: i32, b: i32) -> (i32, i32, i32) {
    let y = (r + 2 * g + b) >> 2;
    let u = b - g;
    let v = r - g;
    (y, u, v)
}

/// The opposite of `rgb_to_yuv`.
pub fn yuv_to_rgb(y: i32, u: i32, v: i32) -> (i32, i32, i32) {
    let g = y - ((u + v) >> 2);
    let r = v + g;
    let b = u + g;
    (r, g, b)
}

/// Returns the mask that clears the bits below a precision of `bits`.
fn precision_mask(bits: u32) -> i32 {
    !((1 << (8 - bits.min(8))) - 1)
}

/// Narrows a centred coefficient to a signed byte of `bits` precision.
///
/// The low bits are cleared and -128 is moved up by one quantum, because
/// the lifting step cannot represent it.
pub fn narrow(value: i32, bits: u32) -> i8 {
    let bits = bits.min(8);
    let mut value = value & precision_mask(bits);
    if value == -128 {
        value += 1 << (8 - bits);
    }
    value as i8
}

/// Converts a pixel's left-justified red, green and blue bytes to its three
/// coefficients, in `Channel` order (U, Y, V).
///
/// `bits` holds the red, green and blue precisions of the wire format. Y is
/// narrowed to the green precision, U to the blue one and V to the red one.
pub fn to_coefficients(rgb: [u8; 3], bits: [u32; 3]) -> [i8; 3] {
    let [r, g, b] = rgb.map(i32::from);
    let [red_bits, green_bits, blue_bits] = bits;
    let (y, u, v) = rgb_to_yuv(r, g, b);

    [
        narrow(u >> 1, blue_bits),
        narrow(y - 128, green_bits),
        narrow(v >> 1, red_bits),
    ]
}

/// Returns the left-justified red, green and blue bytes of a coefficient
/// pixel: V travels in red, Y in green and U in blue.
pub fn coefficient_channels(coefficients: [i8; 3]) -> [u8; 3] {
    let [u, y, v] = coefficients;
    [v as u8, y as u8, u as u8]
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_round_trip(r: u8, g: u8, b: u8) {
        let (y, u, v) = rgb_to_yuv(r.into(), g.into(), b.into());
        assert!((0..=255).contains(&y));
        assert!((-255..=255).contains(&u));
        assert!((-255..=255).contains(&v));

        let (rn, gn, bn) = yuv_to_rgb(y, u, v);
        let rn: u8 = rn.try_into().unwrap();
        let gn: u8 = gn.try_into().unwrap();
        let bn: u8 = bn.try_into().unwrap();

        assert_eq!((rn, gn, bn), (r, g, b));
    }

    #[test]
    #[ignore = "walks every 8-bit colour"]
    fn test_color_transform8() {
        for r in 0..=u8::MAX {
            for g in 0..=u8::MAX {
                for b in 0..=u8::MAX {
                    assert_round_trip(r, g, b);
                }
            }
        }
    }

    #[test]
    fn test_color_transform_strided() {
        // Every step divides 255, so both ends of each channel are covered.
        for r in (0..=u8::MAX).step_by(3) {
            for g in (0..=u8::MAX).step_by(5) {
                for b in (0..=u8::MAX).step_by(17) {
                    assert_round_trip(r, g, b);
                }
            }
        }
    }

    #[test]
    fn test_color_transform_samples() {
        let values = [
            (0, 0, 0),
            (255, 255, 255),
            (255, 0, 0),
            (0, 255, 0),
            (0, 0, 255),
            (17, 200, 93),
            (128, 64, 250),
        ];

        for (r, g, b) in values {
            let (y, u, v) = rgb_to_yuv(r, g, b);
            assert_eq!(yuv_to_rgb(y, u, v), (r, g, b));
        }
        assert_eq!(rgb_to_yuv(255, 0, 0), (63, 0, 255));
    }

    #[test]
    fn test_narrow() {
        assert_eq!(narrow(-128, 8), -127);
        assert_eq!(narrow(-128, 5), -120);
        assert_eq!(narrow(-128, 6), -124);
        assert_eq!(narrow(127, 8), 127);
        assert_eq!(narrow(127, 5), 120);
        assert_eq!(narrow(-1, 5), -8);
        assert_eq!(narrow(-9, 6), -12);
        assert_eq!(narrow(42, 12), 42);
    }

    #[test]
    fn test_coefficients_avoid_minimum() {
        for bits in [5, 6, 8] {
            for r in (0..=255u8).step_by(3) {
                for g in (0..=255u8).step_by(5) {
                    for b in (0..=255u8).step_by(7) {
                        let coefficients = to_coefficients([r, g, b], [bits, bits, bits]);
                        assert!(!coefficients.contains(&i8::MIN));
                    }
                }
            }
        }
    }

    #[test]
    fn test_channel_layout() {
        // Pure blue: U is positive, V is zero.
        let coefficients = to_coefficients([0, 0, 0xF8], [5, 6, 5]);
        assert_eq!(coefficients, [120, -68, 0]);
        assert_eq!(coefficient_channels(coefficients), [0, (-68i8) as u8, 120]);
    }
}
