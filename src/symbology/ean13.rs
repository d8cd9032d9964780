use crate::builder::SymbolOptions;
use crate::common::error::SymbolResult;
use crate::common::grid::{Color, ModuleGrid};
use crate::registry::{Charset, ChecksumKind, LengthRule, SymbologySpec, EAN13};
use crate::symbology::{Encode, Encoded};
use crate::validate::NormalizedInput;

// EAN-13
//------------------------------------------------------------------------------

pub fn spec() -> SymbologySpec {
    SymbologySpec {
        id: EAN13,
        name: "EAN-13",
        charset: Charset::Numeric,
        length: LengthRule::Fixed(12),
        checksum: ChecksumKind::Mod10,
        two_dimensional: false,
        min_quiet_zone: 11,
        default_height: 50,
    }
}

pub struct Ean13;

impl Encode for Ean13 {
    fn encode(&self, input: &NormalizedInput, _opts: &SymbolOptions) -> SymbolResult<Encoded> {
        let digits: Vec<u8> = input.data.iter().map(|&b| b - b'0').collect();
        debug_assert!(digits.len() == 12, "Fixed length enforced by validator");

        let check = check_digit(&digits);
        let parity = PARITY[digits[0] as usize];

        let mut grid = ModuleGrid::new(SYMBOL_WIDTH, 1);
        let mut c = 0;
        draw_pattern(&mut grid, &mut c, GUARD, 3);
        for (i, &d) in digits[1..7].iter().enumerate() {
            let pat = if parity >> (5 - i) & 1 == 1 { g_code(d) } else { L_CODES[d as usize] };
            draw_pattern(&mut grid, &mut c, pat as u16, 7);
        }
        draw_pattern(&mut grid, &mut c, CENTER, 5);
        for &d in &digits[7..12] {
            draw_pattern(&mut grid, &mut c, r_code(d) as u16, 7);
        }
        draw_pattern(&mut grid, &mut c, r_code(check) as u16, 7);
        draw_pattern(&mut grid, &mut c, GUARD, 3);
        debug_assert!(c == SYMBOL_WIDTH, "Symbol width mismatch: drew {c}");

        let mut hrt = String::with_capacity(13);
        for &d in &digits {
            hrt.push((d + b'0') as char);
        }
        hrt.push((check + b'0') as char);
        Ok(Encoded { grid, hrt: Some(hrt) })
    }
}

/// EAN-13 symbols are always 95 modules wide.
pub const SYMBOL_WIDTH: usize = 95;

/// Weighted mod-10 check over the 12 data digits, weights 1 and 3
/// alternating from the left.
pub fn check_digit(digits: &[u8]) -> u8 {
    let sum: u32 =
        digits.iter().enumerate().map(|(i, &d)| d as u32 * if i % 2 == 0 { 1 } else { 3 }).sum();
    ((10 - sum % 10) % 10) as u8
}

fn draw_pattern(grid: &mut ModuleGrid, c: &mut usize, pattern: u16, len: usize) {
    for i in (0..len).rev() {
        if pattern >> i & 1 == 1 {
            grid.set(0, *c, Color::Dark);
        }
        *c += 1;
    }
}

// Right-half codes are the bitwise complement of the left odd-parity codes,
// even-parity codes their mirror image.
fn r_code(d: u8) -> u8 {
    !L_CODES[d as usize] & 0x7f
}

fn g_code(d: u8) -> u8 {
    let r = r_code(d);
    (0..7).fold(0, |acc, i| acc << 1 | (r >> i & 1))
}

const GUARD: u16 = 0b101;
const CENTER: u16 = 0b01010;

// Odd-parity (L) 7-module digit patterns for the left half.
const L_CODES: [u8; 10] = [
    0b0001101, 0b0011001, 0b0010011, 0b0111101, 0b0100011, 0b0110001, 0b0101111, 0b0111011,
    0b0110111, 0b0001011,
];

// Parity of the six left-half digits, selected by the leading digit;
// set bit = even parity (G code).
const PARITY: [u8; 10] = [
    0b000000, 0b001011, 0b001101, 0b001110, 0b010011, 0b011001, 0b011100, 0b010101, 0b010110,
    0b011010,
];

#[cfg(test)]
mod ean13_tests {
    use test_case::test_case;

    use super::*;
    use crate::validate::EncMode;

    fn encode(data: &[u8]) -> Encoded {
        let input = NormalizedInput { data: data.to_vec(), mode: EncMode::Numeric, eci: None };
        Ean13.encode(&input, &SymbolOptions::default()).unwrap()
    }

    #[test_case(b"590123412345", 7; "gs1 example")]
    #[test_case(b"400638133393", 1; "isbn style")]
    #[test_case(b"000000000000", 0; "zeros")]
    fn test_check_digit(digits: &[u8], exp: u8) {
        let digits: Vec<u8> = digits.iter().map(|&b| b - b'0').collect();
        assert_eq!(check_digit(&digits), exp);
    }

    #[test]
    fn test_symbol_width_fixed() {
        let enc = encode(b"590123412345");
        assert_eq!(enc.grid.width(), SYMBOL_WIDTH);
        assert_eq!(enc.grid.height(), 1);
    }

    #[test]
    fn test_guards() {
        let enc = encode(b"590123412345");
        let g = |c: usize| enc.grid.get(0, c);
        // End guards 101
        for (c, exp) in [(0, Color::Dark), (1, Color::Light), (2, Color::Dark)] {
            assert_eq!(g(c), exp);
            assert_eq!(g(SYMBOL_WIDTH - 3 + c), exp);
        }
        // Center guard 01010 at modules 45..50
        let exp = [Color::Light, Color::Dark, Color::Light, Color::Dark, Color::Light];
        let center: Vec<_> = (45..50).map(g).collect();
        assert_eq!(center, exp);
    }

    #[test]
    fn test_hrt_includes_check_digit() {
        let enc = encode(b"590123412345");
        assert_eq!(enc.hrt.as_deref(), Some("5901234123457"));
    }

    #[test]
    fn test_g_code_is_mirrored_r_code() {
        // G(0) = reverse of R(0) = reverse of 1110010 = 0100111
        assert_eq!(g_code(0), 0b0100111);
    }

    #[test]
    fn test_first_digit_zero_uses_all_l_codes() {
        // With leading 0 the left half is all odd parity: digit 1 of
        // "012345..." encodes as L(1) = 0011001 right after the guard
        let enc = encode(b"012345678901");
        let exp = [
            Color::Light,
            Color::Light,
            Color::Dark,
            Color::Dark,
            Color::Light,
            Color::Light,
            Color::Dark,
        ];
        let got: Vec<_> = (3..10).map(|c| enc.grid.get(0, c)).collect();
        assert_eq!(got, exp);
    }
}
