use crate::builder::SymbolOptions;
use crate::common::error::{SymbolError, SymbolResult};
use crate::common::grid::{Color, ModuleGrid};
use crate::registry::{Charset, ChecksumKind, LengthRule, SymbologySpec, CODE39};
use crate::symbology::{Encode, Encoded};
use crate::validate::NormalizedInput;

// Code 39
//------------------------------------------------------------------------------

pub fn spec() -> SymbologySpec {
    SymbologySpec {
        id: CODE39,
        name: "Code 39",
        charset: Charset::Alphanumeric,
        length: LengthRule::UpTo(MAX_LEN),
        checksum: ChecksumKind::Mod43,
        two_dimensional: false,
        min_quiet_zone: 10,
        default_height: 50,
    }
}

pub struct Code39;

impl Encode for Code39 {
    fn encode(&self, input: &NormalizedInput, opts: &SymbolOptions) -> SymbolResult<Encoded> {
        let with_check = match opts.option2 {
            None | Some(0) => false,
            Some(1) => true,
            Some(v) => return Err(SymbolError::InvalidOption { name: "option2", value: v }),
        };

        let mut values = Vec::with_capacity(input.data.len() + 1);
        for &b in &input.data {
            values.push(char_value(b));
        }
        if with_check {
            let sum: usize = values.iter().sum();
            values.push(sum % 43);
        }

        let width = symbol_width(values.len());
        let mut grid = ModuleGrid::new(width, 1);
        let mut c = 0;
        draw_char(&mut grid, &mut c, START_STOP);
        for &v in &values {
            c += 1; // narrow inter-character gap
            draw_char(&mut grid, &mut c, CHARSET[v].1);
        }
        c += 1;
        draw_char(&mut grid, &mut c, START_STOP);
        debug_assert!(c == width, "Symbol width mismatch: drew {c}, expected {width}");

        // Input is validated Code 39 charset, hence ASCII
        let hrt = String::from_utf8(input.data.clone()).expect("Charset is ASCII");
        Ok(Encoded { grid, hrt: Some(hrt) })
    }
}

/// Module count for `n` encoded characters (data plus optional check char):
/// every character is 12 modules at 2:1 wide/narrow ratio, one narrow gap
/// between characters, start and stop sentinels included.
pub fn symbol_width(n: usize) -> usize {
    13 * (n + 2) - 1
}

// Nine elements per character, bars and spaces alternating, bar first.
// Wide elements are two modules, narrow one.
fn draw_char(grid: &mut ModuleGrid, c: &mut usize, pattern: (u8, u8)) {
    let (bars, spaces) = pattern;
    for i in 0..9 {
        let bar = i % 2 == 0;
        let wide = if bar { bars >> (4 - i / 2) & 1 == 1 } else { spaces >> (3 - i / 2) & 1 == 1 };
        let width = if wide { 2 } else { 1 };
        if bar {
            for _ in 0..width {
                grid.set(0, *c, Color::Dark);
                *c += 1;
            }
        } else {
            *c += width;
        }
    }
}

fn char_value(byte: u8) -> usize {
    CHARSET
        .iter()
        .position(|&(ch, _)| ch == byte)
        .expect("Byte outside Code 39 charset survived validation")
}

const MAX_LEN: usize = 86;

// (bars, spaces) per character: five bar bits, four space bits, set = wide.
// Table order is the mod-43 value order.
const CHARSET: [(u8, (u8, u8)); 43] = [
    (b'0', (0b00110, 0b0100)),
    (b'1', (0b10001, 0b0100)),
    (b'2', (0b01001, 0b0100)),
    (b'3', (0b11000, 0b0100)),
    (b'4', (0b00101, 0b0100)),
    (b'5', (0b10100, 0b0100)),
    (b'6', (0b01100, 0b0100)),
    (b'7', (0b00011, 0b0100)),
    (b'8', (0b10010, 0b0100)),
    (b'9', (0b01010, 0b0100)),
    (b'A', (0b10001, 0b0010)),
    (b'B', (0b01001, 0b0010)),
    (b'C', (0b11000, 0b0010)),
    (b'D', (0b00101, 0b0010)),
    (b'E', (0b10100, 0b0010)),
    (b'F', (0b01100, 0b0010)),
    (b'G', (0b00011, 0b0010)),
    (b'H', (0b10010, 0b0010)),
    (b'I', (0b01010, 0b0010)),
    (b'J', (0b00110, 0b0010)),
    (b'K', (0b10001, 0b0001)),
    (b'L', (0b01001, 0b0001)),
    (b'M', (0b11000, 0b0001)),
    (b'N', (0b00101, 0b0001)),
    (b'O', (0b10100, 0b0001)),
    (b'P', (0b01100, 0b0001)),
    (b'Q', (0b00011, 0b0001)),
    (b'R', (0b10010, 0b0001)),
    (b'S', (0b01010, 0b0001)),
    (b'T', (0b00110, 0b0001)),
    (b'U', (0b10001, 0b1000)),
    (b'V', (0b01001, 0b1000)),
    (b'W', (0b11000, 0b1000)),
    (b'X', (0b00101, 0b1000)),
    (b'Y', (0b10100, 0b1000)),
    (b'Z', (0b01100, 0b1000)),
    (b'-', (0b00011, 0b1000)),
    (b'.', (0b10010, 0b1000)),
    (b' ', (0b01010, 0b1000)),
    (b'$', (0b00000, 0b1110)),
    (b'/', (0b00000, 0b1101)),
    (b'+', (0b00000, 0b1011)),
    (b'%', (0b00000, 0b0111)),
];

// '*' start/stop sentinel
const START_STOP: (u8, u8) = (0b00110, 0b1000);
