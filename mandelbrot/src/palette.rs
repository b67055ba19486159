//! ANSI 256-colour palettes and the mapping from iteration counts onto them.

use std::str::FromStr;

use crate::error::ConfigError;

pub const MIN_PALETTE_LEN: usize = 8;

/// Built-in palette. Entry 0 colours the interior of the set.
pub const DEFAULT_PALETTE: [u8; 12] = [
    0x32, 0xA8, 0xB2, 0xC0, 0x6D, 0x80, 0x82, 0xE8, 0xF0, 0xF2, 0xFA, 0xFD,
];

/// Ordered colour bytes of the xterm 256-colour table. Always holds at
/// least [`MIN_PALETTE_LEN`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colours: Vec<u8>,
}

impl Palette {
    pub fn new(colours: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let colours = colours.into();
        if colours.len() < MIN_PALETTE_LEN {
            return Err(ConfigError::PaletteTooShort {
                len: colours.len(),
                min: MIN_PALETTE_LEN,
            });
        }
        Ok(Self { colours })
    }

    /// Every colour of the 256-colour table, black first.
    pub fn full_colours() -> Self {
        Self {
            colours: (0..=u8::MAX).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn colours(&self) -> &[u8] {
        &self.colours
    }

    /// Interior points (`count >= max_iter`) get entry 0. Escaped points cycle
    /// through the remaining entries so that consecutive counts form bands,
    /// starting at entry 1 for a count of 0.
    pub fn index_for(&self, count: u32, max_iter: u32) -> usize {
        if count >= max_iter {
            return 0;
        }
        1 + count as usize % (self.colours.len() - 1)
    }

    pub fn colour_for(&self, count: u32, max_iter: u32) -> u8 {
        self.colours[self.index_for(count, max_iter)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colours: DEFAULT_PALETTE.to_vec(),
        }
    }
}

/// Parses a comma separated list such as `0x32,168,0xB2`.
impl FromStr for Palette {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let colours = s
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(parse_byte)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colours)
    }
}

fn parse_byte(entry: &str) -> Result<u8, ConfigError> {
    let parsed = match entry
        .strip_prefix("0x")
        .or_else(|| entry.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => entry.parse(),
    };
    parsed.map_err(|_| ConfigError::InvalidPaletteEntry(entry.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn short_palettes_are_rejected() {
        assert_eq!(
            Palette::new(vec![1u8, 2, 3, 4, 5, 6, 7]),
            Err(ConfigError::PaletteTooShort { len: 7, min: 8 })
        );
        assert!(Palette::new(Vec::<u8>::new()).is_err());
        assert!(Palette::new(vec![0u8; MIN_PALETTE_LEN]).is_ok());
    }

    #[test]
    fn presets() {
        assert_eq!(Palette::default().colours(), &DEFAULT_PALETTE);
        let full = Palette::full_colours();
        assert_eq!(full.len(), 256);
        assert_eq!(full.colours()[0], 0);
        assert_eq!(full.colours()[255], 255);
    }

    #[test]
    fn index_is_always_in_bounds() {
        for palette in [Palette::default(), Palette::full_colours()] {
            for max_iter in [1, 7, 11, 12, 300] {
                for count in 0..=max_iter + 2 {
                    assert!(palette.index_for(count, max_iter) < palette.len());
                }
            }
            assert!(palette.index_for(u32::MAX, u32::MAX) < palette.len());
            assert!(palette.index_for(u32::MAX - 1, u32::MAX) < palette.len());
        }
    }

    #[test]
    fn interior_and_fast_escape_are_distinct() {
        let palette = Palette::default();
        let max_iter = 10_000;

        assert_eq!(palette.index_for(max_iter, max_iter), 0);
        assert_eq!(palette.index_for(0, max_iter), 1);
        assert_eq!(palette.colour_for(max_iter, max_iter), 0x32);
        assert_eq!(palette.colour_for(0, max_iter), 0xA8);
    }

    #[test]
    fn escaped_counts_cycle_through_the_bands() {
        let palette = Palette::default();
        let bands: Vec<usize> = (0..13).map(|n| palette.index_for(n, 100)).collect();
        assert_eq!(bands, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 1, 2]);
    }

    #[test]
    fn parses_mixed_hex_and_decimal() {
        let palette: Palette = "0x32, 168,0xb2,192,0X6D,128,130,232".parse().unwrap();
        assert_eq!(palette.colours(), &[0x32, 168, 0xB2, 192, 0x6D, 128, 130, 232]);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "1,2,3".parse::<Palette>(),
            Err(ConfigError::PaletteTooShort { len: 3, min: 8 })
        );
        assert_eq!(
            "1,2,3,4,5,6,7,256".parse::<Palette>(),
            Err(ConfigError::InvalidPaletteEntry("256".into()))
        );
        assert_eq!(
            "1,2,3,4,5,6,7,0xZZ".parse::<Palette>(),
            Err(ConfigError::InvalidPaletteEntry("0xZZ".into()))
        );
    }
}
