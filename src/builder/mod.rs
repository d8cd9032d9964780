use log::debug;

use crate::common::error::{SymbolError, SymbolResult, Warning};
use crate::layout::{self, Rgb, SymbolLayout, BLACK, WHITE};
use crate::registry::SymbolRegistry;
use crate::render::{self, RasterImage, VectorPage};
use crate::validate::{validate, ModeOverride};

// Options
//------------------------------------------------------------------------------

/// Per-call rendering and tuning options. Immutable once the pipeline
/// starts; there are no process-wide defaults beyond the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolOptions {
    /// Module-to-pixel scale factor.
    pub scale: f32,
    /// Bar height in modules, linear symbologies only.
    pub height: Option<u32>,
    /// Quiet zone width in modules; clamped up to the symbology minimum.
    pub quiet_zone: Option<u32>,
    /// Border width in modules, all four sides.
    pub border: Option<u32>,
    pub fg: Rgb,
    pub bg: Rgb,
    pub show_hrt: bool,
    pub mode: ModeOverride,
    pub eci: Option<u32>,
    /// Composite-symbology linkage message; none of the built-in
    /// symbologies accept one.
    pub primary: Option<String>,
    /// Symbology-specific tuning, e.g. error correction level.
    pub option1: Option<i32>,
    /// Symbology-specific tuning, e.g. version forcing or check character.
    pub option2: Option<i32>,
    /// Symbology-specific tuning, e.g. mask pattern forcing.
    pub option3: Option<i32>,
}

impl Default for SymbolOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            height: None,
            quiet_zone: None,
            border: None,
            fg: BLACK,
            bg: WHITE,
            show_hrt: false,
            mode: ModeOverride::Auto,
            eci: None,
            primary: None,
            option1: None,
            option2: None,
            option3: None,
        }
    }
}

// Builder
//------------------------------------------------------------------------------

pub struct SymbolBuilder<'a> {
    data: &'a [u8],
    symbology: u16,
    opts: SymbolOptions,
}

impl<'a> SymbolBuilder<'a> {
    pub fn new(symbology: u16, data: &'a [u8]) -> Self {
        Self { data, symbology, opts: SymbolOptions::default() }
    }

    pub fn options(&mut self, opts: SymbolOptions) -> &mut Self {
        self.opts = opts;
        self
    }

    pub fn scale(&mut self, scale: f32) -> &mut Self {
        self.opts.scale = scale;
        self
    }

    pub fn height(&mut self, height: u32) -> &mut Self {
        self.opts.height = Some(height);
        self
    }

    pub fn quiet_zone(&mut self, quiet_zone: u32) -> &mut Self {
        self.opts.quiet_zone = Some(quiet_zone);
        self
    }

    pub fn border(&mut self, border: u32) -> &mut Self {
        self.opts.border = Some(border);
        self
    }

    pub fn colors(&mut self, fg: Rgb, bg: Rgb) -> &mut Self {
        self.opts.fg = fg;
        self.opts.bg = bg;
        self
    }

    pub fn show_hrt(&mut self, show: bool) -> &mut Self {
        self.opts.show_hrt = show;
        self
    }

    pub fn mode(&mut self, mode: ModeOverride) -> &mut Self {
        self.opts.mode = mode;
        self
    }

    pub fn eci(&mut self, eci: u32) -> &mut Self {
        self.opts.eci = Some(eci);
        self
    }

    pub fn option1(&mut self, value: i32) -> &mut Self {
        self.opts.option1 = Some(value);
        self
    }

    pub fn option2(&mut self, value: i32) -> &mut Self {
        self.opts.option2 = Some(value);
        self
    }

    pub fn option3(&mut self, value: i32) -> &mut Self {
        self.opts.option3 = Some(value);
        self
    }

    /// Runs validate, encode and layout. Warnings ride along with the
    /// usable symbol; errors abort with no partial output.
    pub fn build(&self) -> SymbolResult<Symbol> {
        if !(self.opts.scale.is_finite() && self.opts.scale >= 0.0) {
            return Err(SymbolError::InvalidScale);
        }
        if self.opts.primary.is_some() {
            return Err(SymbolError::PrimaryNotSupported);
        }

        let (spec, encoder) = SymbolRegistry::global().resolve(self.symbology)?;
        debug!("Encoding {} bytes as {}", self.data.len(), spec.name);

        let input = validate(self.data, spec, self.opts.mode, self.opts.eci)?;
        let encoded = encoder.encode(&input, &self.opts)?;
        debug!(
            "Encoded {}x{} module grid",
            encoded.grid.width(),
            encoded.grid.height()
        );

        let (layout, warnings) = layout::compose(encoded.grid, spec, &self.opts, encoded.hrt);
        Ok(Symbol { layout, warnings })
    }
}

// Symbol
//------------------------------------------------------------------------------

/// A successfully composed symbol, ready for rendering.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub layout: SymbolLayout,
    pub warnings: Vec<Warning>,
}

impl Symbol {
    pub fn width(&self) -> u32 {
        self.layout.width_px()
    }

    pub fn height(&self) -> u32 {
        self.layout.height_px()
    }

    pub fn to_raster(&self) -> RasterImage {
        render::render_raster(&self.layout)
    }

    pub fn to_vector(&self) -> VectorPage {
        render::render_vector(&self.layout)
    }

    pub fn to_image(&self) -> image::RgbImage {
        self.to_raster().to_image()
    }
}
