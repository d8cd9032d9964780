use std::ops::Deref;

use super::MatrixSymbol;
use crate::common::grid::Color;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern");
        Self(pattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i32, c: i32) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i32, _: i32) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i32, c: i32) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i32, c: i32) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i32, c: i32) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i32, c: i32) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i32, c: i32) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i32, c: i32) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(i32, i32) -> bool {
        match self.0 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid pattern"),
        }
    }
}

// Mask selection
//------------------------------------------------------------------------------

/// Tries all eight patterns and applies the one with the lowest penalty.
pub fn apply_best_mask(sym: &mut MatrixSymbol) -> MaskPattern {
    let best_mask = (0..8)
        .min_by_key(|m| {
            let mut candidate = sym.clone();
            let mask = MaskPattern(*m);
            candidate.apply_mask(mask);
            candidate.draw_format_info(mask);
            compute_total_penalty(&candidate)
        })
        .expect("Should return atleast 1 mask");
    let best_mask = MaskPattern(best_mask);
    sym.apply_mask(best_mask);
    best_mask
}

pub fn compute_total_penalty(sym: &MatrixSymbol) -> u32 {
    compute_run_penalty(sym) + compute_block_penalty(sym) + compute_finder_penalty(sym)
        + compute_balance_penalty(sym)
}

// Rows or columns of 5+ same-colored modules
fn compute_run_penalty(sym: &MatrixSymbol) -> u32 {
    let mut pen = 0;
    let w = sym.width() as i32;
    for i in 0..w {
        let mut row_run = (Color::Light, 0u32);
        let mut col_run = (Color::Light, 0u32);
        for j in 0..w {
            for (run, clr) in
                [(&mut row_run, *sym.get(i, j)), (&mut col_run, *sym.get(j, i))]
            {
                if run.0 == clr {
                    run.1 += 1;
                    if run.1 == 5 {
                        pen += 3;
                    } else if run.1 > 5 {
                        pen += 1;
                    }
                } else {
                    *run = (clr, 1);
                }
            }
        }
    }
    pen
}

// 2x2 blocks of a single color
fn compute_block_penalty(sym: &MatrixSymbol) -> u32 {
    let mut pen = 0;
    let w = sym.width() as i32;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *sym.get(r, c);
            if clr == *sym.get(r + 1, c)
                && clr == *sym.get(r, c + 1)
                && clr == *sym.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// Finder-like 1:1:3:1:1 sequences with a 4-module light margin
fn compute_finder_penalty(sym: &MatrixSymbol) -> u32 {
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];

    let mut pen = 0;
    let w = sym.width() as i32;
    // Horizontal and vertical sweeps share the window logic via transpose
    for hor in [true, false] {
        let get = |i: i32, j: i32| if hor { *sym.get(i, j) } else { *sym.get(j, i) };
        for i in 0..w {
            for j in 0..w - 6 {
                if (0..7).all(|k| get(i, j + k) == PATTERN[k as usize]) {
                    let light = |x: i32| x < 0 || x >= w || get(i, x) == Color::Light;
                    if (j - 4..j).all(&light) || (j + 7..j + 11).all(&light) {
                        pen += 40;
                    }
                }
            }
        }
    }
    pen
}

// Deviation of the dark-module share from 50%, in 5% steps
fn compute_balance_penalty(sym: &MatrixSymbol) -> u32 {
    let dark = sym.count_dark_modules();
    let total = sym.width() * sym.width();
    let ratio = dark * 100 / total;
    (ratio.abs_diff(50) / 5) as u32 * 10
}
