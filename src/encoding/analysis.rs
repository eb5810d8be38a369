use super::palette::Palette;
use crate::coding::run_length::code_length;

/// A maximal sequence of equal pixels in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<P> {
    pub value: P,
    pub length: usize,
}

/// An iterator over the maximal runs of a flat pixel sequence.
///
/// Tiles are scanned as one sequence, so runs continue across row boundaries.
pub struct Runs<'a, P> {
    pixels: &'a [P],
}

impl<'a, P> Runs<'a, P> {
    pub fn new(pixels: &'a [P]) -> Runs<'a, P> {
        Runs { pixels }
    }
}

impl<'a, P> Iterator for Runs<'a, P>
where
    P: Copy + PartialEq,
{
    type Item = Run<P>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&value, rest) = self.pixels.split_first()?;
        let length = 1 + rest.iter().take_while(|&&pixel| pixel == value).count();
        self.pixels = &self.pixels[length..];
        Some(Run { value, length })
    }
}

/// Counters gathered by a single scan of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStatistics {
    /// Maximal runs of length 2 or more.
    pub runs: usize,
    /// Runs of length 1.
    pub singles: usize,
    /// Length field bytes needed by the runs of length 2 or more.
    pub run_length_bytes: usize,
}

/// Scans the pixels once, counting runs and recording every distinct value
/// in `palette`. The palette is cleared first.
pub fn analyze<P>(pixels: &[P], palette: &mut Palette<P>) -> RunStatistics
where
    P: Copy + PartialEq,
{
    palette.clear();
    let mut stats = RunStatistics::default();

    for run in Runs::new(pixels) {
        palette.put(run.value);
        if run.length == 1 {
            stats.singles += 1;
        } else {
            stats.runs += 1;
            stats.run_length_bytes += code_length(run.length);
        }
    }
    stats
}
