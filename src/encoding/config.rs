use super::error::ConfigError;

/// Default tile side, in pixels.
pub const TILE_SIZE: usize = 64;

/// Default number of distinct colours the per-tile palette table records.
pub const MAX_PALETTE_CAPACITY: usize = 128;

/// Default (and largest) palette size that may use packed indices.
pub const PACKED_MODE_CAPACITY: usize = 16;

/// Number of wavelet decomposition levels applied before raw tiles are sent.
///
/// Level 0 disables the wavelet pre-filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WaveletLevel(u8);

impl WaveletLevel {
    pub const DISABLED: WaveletLevel = WaveletLevel(0);
    pub const MAX: u8 = 3;

    pub fn new(level: u8) -> Result<WaveletLevel, ConfigError> {
        if level > Self::MAX {
            return Err(ConfigError::WaveletLevel(level));
        }
        Ok(WaveletLevel(level))
    }

    /// Maps a 0-9 quality hint to a wavelet level.
    ///
    /// Lower quality means more decomposition levels and coarser
    /// quantization. Quality 9 (and anything above) is lossless.
    pub fn from_quality(quality: u8) -> WaveletLevel {
        match quality {
            0..=2 => WaveletLevel(3),
            3..=5 => WaveletLevel(2),
            6..=8 => WaveletLevel(1),
            _ => WaveletLevel::DISABLED,
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_enabled(self) -> bool {
        self.0 > 0
    }
}

/// How wavelet detail coefficients are quantized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuantizationVariant {
    /// Clear a level- and channel-dependent number of low bits, rounding toward zero.
    Mask,
    /// Look every coefficient up in a 256-entry non-linear table.
    #[default]
    NonlinearTable,
}

/// Encoder options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    pub wavelet_level: WaveletLevel,
    pub quantization: QuantizationVariant,
    /// Number of distinct colours recorded per tile before the palette overflows.
    pub max_palette_capacity: usize,
    /// Largest palette that may be sent with packed indices.
    pub packed_mode_capacity: usize,
    pub tile_width: usize,
    pub tile_height: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            wavelet_level: WaveletLevel::DISABLED,
            quantization: QuantizationVariant::default(),
            max_palette_capacity: MAX_PALETTE_CAPACITY,
            packed_mode_capacity: PACKED_MODE_CAPACITY,
            tile_width: TILE_SIZE,
            tile_height: TILE_SIZE,
        }
    }
}

impl EncoderConfig {
    /// Checks that every option is within the range the wire format can carry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wavelet_level.get() > WaveletLevel::MAX {
            return Err(ConfigError::WaveletLevel(self.wavelet_level.get()));
        }
        if !(1..=MAX_PALETTE_CAPACITY).contains(&self.max_palette_capacity) {
            return Err(ConfigError::PaletteCapacity(self.max_palette_capacity));
        }
        if !(1..=PACKED_MODE_CAPACITY).contains(&self.packed_mode_capacity) {
            return Err(ConfigError::PackedModeCapacity(self.packed_mode_capacity));
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(ConfigError::TileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wavelet_level_range() {
        for level in 0..=3 {
            assert_eq!(WaveletLevel::new(level).unwrap().get(), level);
        }
        assert_eq!(WaveletLevel::new(4), Err(ConfigError::WaveletLevel(4)));
        assert!(!WaveletLevel::DISABLED.is_enabled());
    }

    #[test]
    fn test_level_from_quality() {
        let levels: Vec<u8> = (0..=10)
            .map(|quality| WaveletLevel::from_quality(quality).get())
            .collect();
        assert_eq!(levels, vec![3, 3, 3, 2, 2, 2, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_default_is_valid() {
        let config = EncoderConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.tile_width, 64);
        assert_eq!(config.max_palette_capacity, 128);
        assert_eq!(config.packed_mode_capacity, 16);
        assert_eq!(config.quantization, QuantizationVariant::NonlinearTable);
    }

    #[test]
    fn test_validation() {
        let config = EncoderConfig {
            max_palette_capacity: 0,
            ..EncoderConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PaletteCapacity(0)));

        let config = EncoderConfig {
            max_palette_capacity: 129,
            ..EncoderConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PaletteCapacity(129)));

        let config = EncoderConfig {
            packed_mode_capacity: 17,
            ..EncoderConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PackedModeCapacity(17)));

        let config = EncoderConfig {
            tile_height: 0,
            ..EncoderConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TileSize {
                width: 64,
                height: 0
            })
        );
    }
}
