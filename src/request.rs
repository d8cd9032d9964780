use crate::builder::{SymbolBuilder, SymbolOptions};
use crate::common::error::{SymbolError, SymbolResult};
use crate::layout::Rgb;
use crate::report::{self, RenderPayload, RenderResult};
use crate::validate::ModeOverride;

// External call contract
//------------------------------------------------------------------------------

/// Which abstract output the caller's serializer consumes.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum OutputKind {
    Raster,
    Vector,
}

/// Wire-shaped option bag kept compatible with existing callers: -1 means
/// unset for the numeric options, 0 for eci, an empty string for primary.
/// Inside the engine all of these become explicit optional fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeRequest {
    pub symbology: u16,
    pub data: Vec<u8>,
    /// Bar height in modules, -1 = symbology default.
    pub height: i32,
    /// Quiet zone width in modules, -1 = symbology minimum.
    pub whitespace_width: i32,
    /// Border width in modules, -1 = none.
    pub border_width: i32,
    /// 6 hex digits, case-insensitive.
    pub fg_color: String,
    /// 6 hex digits, case-insensitive.
    pub bg_color: String,
    /// Module-to-pixel scale, 0 = default of 1.0.
    pub scale: f32,
    pub option1: i32,
    pub option2: i32,
    pub option3: i32,
    pub show_hrt: bool,
    pub input_mode: ModeOverride,
    /// Extended Channel Interpretation value, 0 = none.
    pub eci: i32,
    /// Composite linkage message, empty = none.
    pub primary: String,
}

impl Default for EncodeRequest {
    fn default() -> Self {
        Self {
            symbology: 0,
            data: Vec::new(),
            height: -1,
            whitespace_width: -1,
            border_width: -1,
            fg_color: "000000".into(),
            bg_color: "FFFFFF".into(),
            scale: 0.0,
            option1: -1,
            option2: -1,
            option3: -1,
            show_hrt: false,
            input_mode: ModeOverride::Auto,
            eci: 0,
            primary: String::new(),
        }
    }
}

/// Runs the whole pipeline for a wire-shaped request. Never panics on bad
/// input; every failure comes back as a result record with code >= 3.
pub fn encode(req: &EncodeRequest, output: OutputKind) -> RenderResult {
    match encode_inner(req, output) {
        Ok(res) => res,
        Err(e) => report::failure(&e),
    }
}

fn encode_inner(req: &EncodeRequest, output: OutputKind) -> SymbolResult<RenderResult> {
    if req.eci < 0 {
        return Err(SymbolError::InvalidOption { name: "eci", value: req.eci });
    }
    let opts = SymbolOptions {
        scale: if req.scale == 0.0 { 1.0 } else { req.scale },
        height: unset(req.height)?,
        quiet_zone: unset(req.whitespace_width)?,
        border: unset(req.border_width)?,
        fg: parse_color(&req.fg_color)?,
        bg: parse_color(&req.bg_color)?,
        show_hrt: req.show_hrt,
        mode: req.input_mode,
        eci: if req.eci == 0 { None } else { Some(req.eci as u32) },
        primary: if req.primary.is_empty() { None } else { Some(req.primary.clone()) },
        option1: if req.option1 == -1 { None } else { Some(req.option1) },
        option2: if req.option2 == -1 { None } else { Some(req.option2) },
        option3: if req.option3 == -1 { None } else { Some(req.option3) },
    };

    let mut builder = SymbolBuilder::new(req.symbology, &req.data);
    let symbol = builder.options(opts).build()?;
    let payload = match output {
        OutputKind::Raster => RenderPayload::Raster(symbol.to_raster()),
        OutputKind::Vector => RenderPayload::Vector(symbol.to_vector()),
    };
    Ok(report::success(payload, &symbol.warnings))
}

// Sentinel -1 becomes absence; anything else must be non-negative
fn unset(value: i32) -> SymbolResult<Option<u32>> {
    match value {
        -1 => Ok(None),
        v if v >= 0 => Ok(Some(v as u32)),
        v => Err(SymbolError::InvalidOption { name: "dimension", value: v }),
    }
}

/// Case-insensitive 6-hex-digit RGB string, validated at this boundary.
pub fn parse_color(s: &str) -> SymbolResult<Rgb> {
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SymbolError::InvalidColor);
    }
    let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).expect("Checked hex digits");
    Ok(Rgb(channel(0), channel(2), channel(4)))
}
