use log::debug;

use crate::builder::SymbolOptions;
use crate::common::error::Warning;
use crate::common::grid::ModuleGrid;
use crate::registry::SymbologySpec;

// Color
//------------------------------------------------------------------------------

/// 24-bit RGB, passed through to the renderer verbatim.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

// Symbol layout
//------------------------------------------------------------------------------

/// Height of the human-readable text band in modules, scaled like the rest
/// of the symbol.
pub const TEXT_BAND_MODULES: u32 = 10;

// Approximate glyph advance used only to decide whether the text fits
const GLYPH_WIDTH_MODULES: u32 = 6;

/// The composed symbol: module grid plus all geometry the renderer needs.
/// Same grid and options always compose to a bit-identical layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolLayout {
    pub grid: ModuleGrid,
    /// Module-to-pixel scale factor.
    pub scale: f32,
    /// Quiet zone width in modules; both horizontal sides, and vertically
    /// too for 2D symbologies.
    pub quiet_zone: u32,
    /// Border width in modules, all four sides.
    pub border: u32,
    /// Height of one grid row in modules. Linear symbols stretch their
    /// single row to the requested bar height; matrix rows are square.
    pub row_height: u32,
    pub hrt: Option<String>,
    pub fg: Rgb,
    pub bg: Rgb,
    two_dimensional: bool,
}

/// Composes the full symbol geometry. Quiet zones below the symbology
/// minimum are clamped up and reported; layout never fails.
pub fn compose(
    grid: ModuleGrid,
    spec: &SymbologySpec,
    opts: &SymbolOptions,
    hrt: Option<String>,
) -> (SymbolLayout, Vec<Warning>) {
    let mut warnings = Vec::new();

    let min_qz = spec.min_quiet_zone;
    let quiet_zone = match opts.quiet_zone {
        None => min_qz,
        Some(q) if q < min_qz => {
            warnings.push(Warning::QuietZoneClamped { requested: q, min: min_qz });
            min_qz
        }
        Some(q) => q,
    };

    let border = opts.border.unwrap_or(0);
    let row_height = if spec.two_dimensional {
        1
    } else {
        opts.height.unwrap_or(spec.default_height).max(1)
    };

    let hrt = match hrt {
        Some(text) if opts.show_hrt && !spec.two_dimensional => {
            let total_w = grid.width() as u32 + 2 * (quiet_zone + border);
            let max_chars = (total_w / GLYPH_WIDTH_MODULES) as usize;
            if text.chars().count() > max_chars {
                warnings.push(Warning::TextTruncated { shown: max_chars });
                Some(text.chars().take(max_chars).collect())
            } else {
                Some(text)
            }
        }
        _ => None,
    };

    debug!(
        "Layout for {}: quiet zone {quiet_zone}, border {border}, row height {row_height}",
        spec.name
    );

    let layout = SymbolLayout {
        grid,
        scale: opts.scale,
        quiet_zone,
        border,
        row_height,
        hrt,
        fg: opts.fg,
        bg: opts.bg,
        two_dimensional: spec.two_dimensional,
    };
    (layout, warnings)
}

impl SymbolLayout {
    /// Module offset to pixel offset, rounded half-up. All edges go through
    /// this mapping so adjacent regions never leave seams.
    pub fn px(&self, modules: u32) -> u32 {
        (modules as f64 * self.scale as f64 + 0.5).floor() as u32
    }

    /// Horizontal margin either side, in modules.
    pub fn h_margin(&self) -> u32 {
        self.border + self.quiet_zone
    }

    /// Vertical margin top and bottom, in modules. Linear symbols keep
    /// their quiet zone horizontal only.
    pub fn v_margin(&self) -> u32 {
        self.border + if self.two_dimensional { self.quiet_zone } else { 0 }
    }

    pub fn width_modules(&self) -> u32 {
        self.grid.width() as u32 + 2 * self.h_margin()
    }

    pub fn height_modules(&self) -> u32 {
        self.grid.height() as u32 * self.row_height + 2 * self.v_margin()
    }

    pub fn width_px(&self) -> u32 {
        self.px(self.width_modules())
    }

    /// Symbol height excluding the text band.
    pub fn symbol_height_px(&self) -> u32 {
        self.px(self.height_modules())
    }

    pub fn text_band_px(&self) -> u32 {
        if self.hrt.is_some() {
            self.px(TEXT_BAND_MODULES)
        } else {
            0
        }
    }

    pub fn height_px(&self) -> u32 {
        self.symbol_height_px() + self.text_band_px()
    }
}
