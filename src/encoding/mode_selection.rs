use super::analysis::RunStatistics;
use super::palette::Palette;
use crate::coding::packed_index::PackedIndexCoder;

/// The largest palette size the header byte can carry.
pub const MAX_PALETTE_HEADER_SIZE: usize = 127;

/// The sub-encoding of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileMode {
    Solid,
    Raw,
    RawRle,
    PalettePacked,
    PaletteRle,
}

impl TileMode {
    pub const ALL: [TileMode; 5] = [
        TileMode::Solid,
        TileMode::Raw,
        TileMode::RawRle,
        TileMode::PalettePacked,
        TileMode::PaletteRle,
    ];

    pub fn uses_rle(self) -> bool {
        matches!(self, TileMode::RawRle | TileMode::PaletteRle)
    }

    pub fn uses_palette(self) -> bool {
        matches!(
            self,
            TileMode::Solid | TileMode::PalettePacked | TileMode::PaletteRle
        )
    }
}

/// This struct is used to pick the cheapest sub-encoding for a tile from the
/// statistics gathered by the analyzer.
pub struct ModeSelector {
    pixel_bytes: usize,
    packed_mode_capacity: usize,
}

impl ModeSelector {
    /// Creates a selector for pixels written with `pixel_bytes` bytes each.
    pub fn new(pixel_bytes: usize, packed_mode_capacity: usize) -> ModeSelector {
        ModeSelector {
            pixel_bytes,
            packed_mode_capacity,
        }
    }

    /// Returns the mode to use for a `width`x`height` tile.
    ///
    /// `pending_level` is the wavelet level that will be applied if the tile
    /// is sent raw; the raw estimate is divided by `2^pending_level`.
    ///
    /// Candidates are tried in the order raw, raw RLE, palette RLE, packed
    /// palette and a later one wins only if it is strictly cheaper.
    pub fn select<P>(
        &self,
        width: usize,
        height: usize,
        palette: &Palette<P>,
        stats: &RunStatistics,
        pending_level: u8,
    ) -> TileMode
    where
        P: Copy + PartialEq,
    {
        if !palette.is_overflowed() && palette.len() == 1 {
            return TileMode::Solid;
        }

        let mut best = TileMode::Raw;
        let mut best_cost = usize::MAX;
        for mode in [
            TileMode::Raw,
            TileMode::RawRle,
            TileMode::PaletteRle,
            TileMode::PalettePacked,
        ] {
            if let Some(cost) = self.estimate(mode, width, height, palette, stats, pending_level) {
                if cost < best_cost {
                    best = mode;
                    best_cost = cost;
                }
            }
        }
        best
    }

    /// Returns the estimated payload size of a mode in bytes, or `None` if
    /// the mode cannot encode the tile.
    ///
    /// Palette modes are charged for their colour table.
    pub fn estimate<P>(
        &self,
        mode: TileMode,
        width: usize,
        height: usize,
        palette: &Palette<P>,
        stats: &RunStatistics,
        pending_level: u8,
    ) -> Option<usize>
    where
        P: Copy + PartialEq,
    {
        let palette_fits =
            !palette.is_overflowed() && palette.len() <= MAX_PALETTE_HEADER_SIZE;
        let table = palette.len() * self.pixel_bytes;

        match mode {
            TileMode::Solid => {
                (!palette.is_overflowed() && palette.len() == 1).then_some(self.pixel_bytes)
            }
            TileMode::Raw => Some((width * height * self.pixel_bytes) >> pending_level),
            TileMode::RawRle => Some(
                (stats.runs + stats.singles) * self.pixel_bytes
                    + stats.run_length_bytes
                    + stats.singles,
            ),
            TileMode::PaletteRle => {
                palette_fits.then_some(table + stats.runs + stats.run_length_bytes + stats.singles)
            }
            TileMode::PalettePacked => {
                let size = palette.len();
                (palette_fits && (2..=self.packed_mode_capacity).contains(&size))
                    .then(|| table + height * PackedIndexCoder::new(size).row_length(width))
            }
        }
    }
}
