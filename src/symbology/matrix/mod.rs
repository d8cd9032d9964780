pub mod codec;
pub mod ec;
pub mod mask;
pub mod metadata;

use std::ops::Deref;

use log::trace;

pub use mask::MaskPattern;
pub use metadata::{ECLevel, Version};

use crate::builder::SymbolOptions;
use crate::common::error::{SymbolError, SymbolResult};
use crate::common::grid::{Color, ModuleGrid};
use crate::registry::{Charset, ChecksumKind, LengthRule, SymbologySpec, QRCODE};
use crate::symbology::{Encode, Encoded};
use crate::validate::NormalizedInput;

// QR-style matrix symbology
//------------------------------------------------------------------------------

pub fn spec() -> SymbologySpec {
    SymbologySpec {
        id: QRCODE,
        name: "QR Code",
        charset: Charset::Binary,
        length: LengthRule::UpTo(MAX_DATA_LEN),
        checksum: ChecksumKind::ReedSolomon,
        two_dimensional: true,
        min_quiet_zone: 4,
        default_height: 0,
    }
}

// Byte capacity of version 40 at the lowest error correction level
const MAX_DATA_LEN: usize = 2953;

pub struct Matrix;

impl Encode for Matrix {
    fn encode(&self, input: &NormalizedInput, opts: &SymbolOptions) -> SymbolResult<Encoded> {
        let ecl = ECLevel::from_option(opts.option1)?;
        let forced_ver = match opts.option2 {
            None | Some(0) => None,
            Some(v @ 1..=40) => Some(Version::new(v as u8)?),
            Some(v) => return Err(SymbolError::InvalidOption { name: "option2", value: v }),
        };
        let forced_mask = match opts.option3 {
            None => None,
            Some(m @ 0..=7) => Some(MaskPattern::new(m as u8)),
            Some(v) => return Err(SymbolError::InvalidOption { name: "option3", value: v }),
        };

        let ver = match forced_ver {
            Some(v) => v,
            None => find_version(input, ecl)?,
        };
        trace!("Encoding {} bytes at version {} {ecl:?}", input.data.len(), ver.value());

        let payload = codec::encode_payload(input, ver, ecl)?;

        // Compute error correction per block, then interleave data and ecc
        let (data_blocks, ecc_blocks) = ec::ecc(payload.data(), ver, ecl);
        let mut codewords = ec::interleave(&data_blocks);
        codewords.extend(ec::interleave(&ecc_blocks));
        debug_assert!(
            codewords.len() == ver.total_codewords(),
            "Codeword count mismatch: {} != {}",
            codewords.len(),
            ver.total_codewords()
        );

        let mut sym = MatrixSymbol::new(ver, ecl);
        sym.draw_all_function_patterns();
        sym.draw_payload(&codewords);

        let mask = match forced_mask {
            Some(m) => {
                sym.apply_mask(m);
                m
            }
            None => mask::apply_best_mask(&mut sym),
        };
        sym.draw_format_info(mask);
        trace!("Applied mask {}", *mask);

        Ok(Encoded { grid: sym.into_grid(), hrt: None })
    }
}

/// Smallest version whose data capacity fits the input at the requested
/// error correction level. Data is never truncated to fit.
fn find_version(input: &NormalizedInput, ecl: ECLevel) -> SymbolResult<Version> {
    for v in metadata::VERSION_MIN..=metadata::VERSION_MAX {
        let ver = Version::new(v).expect("Version range is valid");
        if codec::bit_len(input, ver) <= ver.data_bit_capacity(ecl) {
            return Ok(ver);
        }
    }
    let max_ver = Version::new(metadata::VERSION_MAX).expect("Version range is valid");
    Err(SymbolError::EncodingImpossible {
        got: codec::bit_len(input, max_ver).div_ceil(8),
        max: max_ver.data_codewords(ecl),
    })
}

// Matrix symbol
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatrixSymbol {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
}

impl MatrixSymbol {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    fn coord_to_index(&self, r: i32, c: i32) -> usize {
        let w = self.w as i32;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to -w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to -w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i32, c: i32) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn set(&mut self, r: i32, c: i32, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }

    pub fn into_grid(self) -> ModuleGrid {
        let cells = self.grid.iter().map(|m| **m).collect();
        ModuleGrid::from_cells(self.w, self.w, cells)
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i32;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }
}

// Function patterns
//------------------------------------------------------------------------------

impl MatrixSymbol {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_patterns();
        self.draw_alignment_patterns();
        self.reserve_format_info();
        self.draw_version_info();
    }

    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // 7x7 finder with its separator, drawn as concentric rings around the
    // center. The 8th ring falls outside the symbol on two sides.
    fn draw_finder_pattern_at(&mut self, r: i32, c: i32) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }

    fn draw_timing_patterns(&mut self) {
        let w = self.w as i32;
        for i in 8..w - 8 {
            let color = if i & 1 == 0 { Color::Dark } else { Color::Light };
            self.set(6, i, Module::Func(color));
            self.set(i, 6, Module::Func(color));
        }
    }

    fn draw_alignment_patterns(&mut self) {
        let positions = self.ver.alignment_positions();
        let last = positions.len().wrapping_sub(1);
        for (i, &r) in positions.iter().enumerate() {
            for (j, &c) in positions.iter().enumerate() {
                // Corners occupied by finder patterns
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                self.draw_alignment_pattern_at(r as i32, c as i32);
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i32, c: i32) {
        for i in -2..=2i32 {
            for j in -2..=2i32 {
                let color =
                    if i.abs().max(j.abs()) == 1 { Color::Light } else { Color::Dark };
                self.set(r + i, c + j, Module::Func(color));
            }
        }
    }

    // Format cells must be occupied before data placement; actual bits are
    // drawn once the mask is chosen
    fn reserve_format_info(&mut self) {
        self.format_info_coords()
            .into_iter()
            .for_each(|(r, c)| self.set(r, c, Module::Format(Color::Light)));
        // Dark module above the bottom-left finder
        self.set(-8, 8, Module::Func(Color::Dark));
    }

    // Both copies, bit index 0..15 each
    fn format_info_coords(&self) -> Vec<(i32, i32)> {
        let mut coords = Vec::with_capacity(30);
        // Around the top-left finder
        for i in 0..6 {
            coords.push((i, 8));
        }
        coords.push((7, 8));
        coords.push((8, 8));
        coords.push((8, 7));
        for i in 9..15 {
            coords.push((8, 14 - i));
        }
        // Split between the top-right and bottom-left finders
        for i in 0..8 {
            coords.push((8, -1 - i));
        }
        for i in 8..15 {
            coords.push((-15 + i, 8));
        }
        coords
    }

    pub fn draw_format_info(&mut self, mask: MaskPattern) {
        let bits = format_info_bits(self.ecl, mask);
        let coords = self.format_info_coords();
        for (i, &(r, c)) in coords.iter().enumerate() {
            let bit = bits >> (i % 15) & 1 == 1;
            let color = if bit { Color::Dark } else { Color::Light };
            self.set(r, c, Module::Format(color));
        }
    }

    fn draw_version_info(&mut self) {
        if self.ver.value() < 7 {
            return;
        }
        let bits = version_info_bits(self.ver);
        let w = self.w as i32;
        for i in 0..18i32 {
            let bit = bits >> i & 1 == 1;
            let color = if bit { Color::Dark } else { Color::Light };
            let a = w - 11 + i % 3;
            let b = i / 3;
            self.set(b, a, Module::Version(color));
            self.set(a, b, Module::Version(color));
        }
    }
}

// BCH(15, 5) over the format data, masked with the fixed pattern
fn format_info_bits(ecl: ECLevel, mask: MaskPattern) -> u16 {
    let data = (ecl.format_bits() << 3 | *mask as u16) as u32;
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) & 1) * 0x537;
    }
    ((data << 10 | rem) ^ 0x5412) as u16
}

// BCH(18, 6) over the version number
fn version_info_bits(ver: Version) -> u32 {
    let v = ver.value() as u32;
    let mut rem = v;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) & 1) * 0x1f25;
    }
    v << 12 | rem
}

// Data placement
//------------------------------------------------------------------------------

// Iterator over the encoding region in placement order: two-module columns
// walked boustrophedon from the bottom-right corner, skipping the vertical
// timing column.
struct EncRegionIter {
    r: i32,
    c: i32,
    width: i32,
}

impl EncRegionIter {
    fn new(width: usize) -> Self {
        let w = width as i32;
        Self { r: w - 1, c: w - 1, width: w }
    }
}

const VERT_TIMING_COL: i32 = 6;

impl Iterator for EncRegionIter {
    type Item = (i32, i32);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }
        let res = (self.r, self.c);
        let adjusted_col = if self.c <= VERT_TIMING_COL { self.c + 1 } else { self.c };
        let col_type = (self.width - adjusted_col) % 4;
        match col_type {
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            0 | 2 if self.c == VERT_TIMING_COL + 1 => {
                self.c -= 2;
            }
            _ => {
                self.c -= 1;
            }
        }
        Some(res)
    }
}

impl MatrixSymbol {
    /// Places interleaved codewords into the encoding region, most
    /// significant bit first. Remainder cells stay light.
    pub fn draw_payload(&mut self, codewords: &[u8]) {
        let mut bits =
            codewords.iter().flat_map(|cw| (0..8).rev().map(move |b| cw >> b & 1 == 1));
        let coords: Vec<_> = EncRegionIter::new(self.w).collect();
        for (r, c) in coords {
            if !matches!(self.get(r, c), Module::Empty) {
                continue;
            }
            let color = match bits.next() {
                Some(true) => Color::Dark,
                _ => Color::Light,
            };
            self.set(r, c, Module::Data(color));
        }
        debug_assert!(bits.next().is_none(), "Payload exceeds encoding region");
    }

    pub fn apply_mask(&mut self, mask: MaskPattern) {
        let f = mask.mask_function();
        let w = self.w as i32;
        for r in 0..w {
            for c in 0..w {
                if let Module::Data(color) = self.get(r, c) {
                    if f(r, c) {
                        let flipped =
                            if color == Color::Dark { Color::Light } else { Color::Dark };
                        self.set(r, c, Module::Data(flipped));
                    }
                }
            }
        }
    }
}
