use crate::common::error::{SymbolError, SymbolResult};
use crate::validate::EncMode;

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub fn from_option(value: Option<i32>) -> SymbolResult<Self> {
        match value {
            None => Ok(Self::M),
            Some(1) => Ok(Self::L),
            Some(2) => Ok(Self::M),
            Some(3) => Ok(Self::Q),
            Some(4) => Ok(Self::H),
            Some(v) => Err(SymbolError::InvalidOption { name: "option1", value: v }),
        }
    }

    // Bit pair used in the format info
    pub fn format_bits(self) -> u16 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct Version(u8);

pub const VERSION_MIN: u8 = 1;
pub const VERSION_MAX: u8 = 40;

impl Version {
    pub fn new(v: u8) -> SymbolResult<Self> {
        if (VERSION_MIN..=VERSION_MAX).contains(&v) {
            Ok(Self(v))
        } else {
            Err(SymbolError::InvalidOption { name: "option2", value: v as i32 })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub const fn width(self) -> usize {
        self.0 as usize * 4 + 17
    }

    // Modules available for codewords once function patterns are placed
    pub fn data_region_bits(self) -> usize {
        let v = self.0 as usize;
        let mut bits = (16 * v + 128) * v + 64;
        if v >= 2 {
            let na = v / 7 + 2;
            bits -= (25 * na - 10) * na - 55;
            if v >= 7 {
                bits -= 36;
            }
        }
        bits
    }

    pub fn total_codewords(self) -> usize {
        self.data_region_bits() / 8
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl as usize][self.0 as usize] as usize
    }

    pub fn block_count(self, ecl: ECLevel) -> usize {
        BLOCK_COUNT[ecl as usize][self.0 as usize] as usize
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ecl) * self.block_count(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) * 8
    }

    /// Block structure as (short size, short count, long size, long count);
    /// short blocks come first in the payload.
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let blocks = self.block_count(ecl);
        let data = self.data_codewords(ecl);
        let short_size = data / blocks;
        let long_count = data % blocks;
        (short_size, blocks - long_count, short_size + 1, long_count)
    }

    pub fn char_cnt_bits(self, mode: EncMode) -> usize {
        let band = match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match mode {
            EncMode::Numeric => [10, 12, 14][band],
            EncMode::Alphanumeric => [9, 11, 13][band],
            EncMode::FullAscii | EncMode::Binary => [8, 16, 16][band],
        }
    }

    pub fn alignment_positions(self) -> Vec<usize> {
        let v = self.0 as usize;
        if v == 1 {
            return vec![];
        }
        let na = v / 7 + 2;
        let step = (v * 8 + na * 3 + 5) / (na * 4 - 4) * 2;
        let mut res: Vec<usize> = (0..na - 1).map(|i| self.width() - 7 - i * step).collect();
        res.push(6);
        res.reverse();
        res
    }
}

// Error correction tables, indexed [ec level][version]
//------------------------------------------------------------------------------

static ECC_PER_BLOCK: [[u8; 41]; 4] = [
    // L
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    // M
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    // Q
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    // H
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

static BLOCK_COUNT: [[u8; 41]; 4] = [
    // L
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    // M
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    // Q
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    // H
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

#[cfg(test)]
mod metadata_tests {
    use test_case::test_case;

    use super::{ECLevel, Version};
    use crate::validate::EncMode;

    #[test_case(1, 21)]
    #[test_case(7, 45)]
    #[test_case(40, 177)]
    fn test_width(v: u8, exp: usize) {
        assert_eq!(Version::new(v).unwrap().width(), exp);
    }

    #[test_case(1, 26)]
    #[test_case(2, 44)]
    #[test_case(7, 196)]
    #[test_case(40, 3706)]
    fn test_total_codewords(v: u8, exp: usize) {
        assert_eq!(Version::new(v).unwrap().total_codewords(), exp);
    }

    #[test_case(1, ECLevel::L, 19)]
    #[test_case(1, ECLevel::M, 16)]
    #[test_case(1, ECLevel::Q, 13)]
    #[test_case(1, ECLevel::H, 9)]
    #[test_case(5, ECLevel::Q, 62)]
    #[test_case(40, ECLevel::L, 2956)]
    #[test_case(40, ECLevel::H, 1276)]
    fn test_data_codewords(v: u8, ecl: ECLevel, exp: usize) {
        assert_eq!(Version::new(v).unwrap().data_codewords(ecl), exp);
    }

    #[test]
    fn test_block_structure() {
        // Version 5-Q: 2 blocks of 15 and 2 blocks of 16 data codewords
        let ver = Version::new(5).unwrap();
        assert_eq!(ver.data_codewords_per_block(ECLevel::Q), (15, 2, 16, 2));
        // Version 1 is always a single block
        let ver = Version::new(1).unwrap();
        assert_eq!(ver.data_codewords_per_block(ECLevel::M), (16, 1, 17, 0));
    }

    #[test_case(1, vec![])]
    #[test_case(2, vec![6, 18])]
    #[test_case(7, vec![6, 22, 38])]
    #[test_case(32, vec![6, 34, 60, 86, 112, 138])]
    #[test_case(40, vec![6, 30, 58, 86, 114, 142, 170])]
    fn test_alignment_positions(v: u8, exp: Vec<usize>) {
        assert_eq!(Version::new(v).unwrap().alignment_positions(), exp);
    }

    #[test]
    fn test_char_cnt_bits() {
        let v1 = Version::new(1).unwrap();
        let v10 = Version::new(10).unwrap();
        let v27 = Version::new(27).unwrap();
        assert_eq!(v1.char_cnt_bits(EncMode::Numeric), 10);
        assert_eq!(v10.char_cnt_bits(EncMode::Numeric), 12);
        assert_eq!(v27.char_cnt_bits(EncMode::Numeric), 14);
        assert_eq!(v1.char_cnt_bits(EncMode::Alphanumeric), 9);
        assert_eq!(v1.char_cnt_bits(EncMode::Binary), 8);
        assert_eq!(v10.char_cnt_bits(EncMode::FullAscii), 16);
    }

    #[test]
    fn test_invalid_version() {
        assert!(Version::new(0).is_err());
        assert!(Version::new(41).is_err());
    }
}
