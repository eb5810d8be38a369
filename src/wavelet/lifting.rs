use super::coefficients::{Channel, CoefficientBuffer};

/// Piecewise-linear Haar step on a pair of signed bytes.
///
/// Returns `(low, high)`. The step is its own inverse: applying it to
/// `(low, high)` gives back the original pair, as long as neither component
/// of the original pair is -128.
pub fn plharr(x0: i8, x1: i8) -> (i8, i8) {
    let (orig0, orig1) = (i32::from(x0), i32::from(x1));
    let (mut x0, mut x1) = (orig0, orig1);

    if (x0 ^ x1) & 0x80 != 0 {
        // Different signs.
        x1 += x0;
        if (x1 ^ orig1) & 0x80 == 0 {
            x0 -= x1;
        }
    } else {
        x0 -= x1;
        if (x0 ^ orig0) & 0x80 == 0 {
            x1 += x0;
        }
    }
    (x1 as i8, x0 as i8)
}

/// Applies `plharr` to the pairs of one row or column of a plane at level `l`.
///
/// The line starts at `start` and its `length` elements are `pitch` apart.
/// Pairs are `2^(l+1)` elements apart and their members `2^l` apart.
pub fn lift_line(plane: &mut [i8], start: usize, pitch: usize, length: usize, l: u8) {
    let half = (1usize << l) * pitch;
    for k in 0..(length >> (l + 1)) {
        let first = start + (k << (l + 1)) * pitch;
        let second = first + half;
        let (low, high) = plharr(plane[first], plane[second]);
        plane[first] = low;
        plane[second] = high;
    }
}

/// Runs decomposition level `l` over every plane: first along the rows of
/// the level's grid, then along its columns.
pub fn transform_level(coefficients: &mut CoefficientBuffer, l: u8) {
    let (width, height) = (coefficients.width(), coefficients.height());
    let step = 1usize << l;

    for channel in Channel::ALL {
        let plane = coefficients.plane_mut(channel);
        for y in (0..height).step_by(step) {
            lift_line(plane, y * width, 1, width, l);
        }
        for x in (0..width).step_by(step) {
            lift_line(plane, x, width, height, l);
        }
    }
}

/// The opposite of `transform_level`.
pub fn inverse_transform_level(coefficients: &mut CoefficientBuffer, l: u8) {
    let (width, height) = (coefficients.width(), coefficients.height());
    let step = 1usize << l;

    for channel in Channel::ALL {
        let plane = coefficients.plane_mut(channel);
        for x in (0..width).step_by(step) {
            lift_line(plane, x, width, height, l);
        }
        for y in (0..height).step_by(step) {
            lift_line(plane, y * width, 1, width, l);
        }
    }
}
