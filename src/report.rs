use crate::common::error::{SymbolError, Warning};
use crate::render::{RasterImage, VectorPage};

// Result codes
//------------------------------------------------------------------------------

/// Numeric result codes of the external contract. Codes up to 2 pair with
/// usable output; codes from 3 up mean no output was produced.
pub mod codes {
    pub const SUCCESS: u8 = 0;
    pub const WARN_QUIET_ZONE_CLAMPED: u8 = 1;
    pub const WARN_TEXT_TRUNCATED: u8 = 2;
    pub const ERROR_INVALID_DATA: u8 = 3;
    pub const ERROR_TOO_LONG: u8 = 4;
    pub const ERROR_ENCODING_IMPOSSIBLE: u8 = 5;
    pub const ERROR_UNKNOWN_SYMBOLOGY: u8 = 6;
    pub const ERROR_INVALID_OPTION: u8 = 7;
}

pub fn warning_code(warning: &Warning) -> u8 {
    match warning {
        Warning::QuietZoneClamped { .. } => codes::WARN_QUIET_ZONE_CLAMPED,
        Warning::TextTruncated { .. } => codes::WARN_TEXT_TRUNCATED,
    }
}

pub fn error_code(err: &SymbolError) -> u8 {
    match err {
        SymbolError::EmptyData
        | SymbolError::InvalidChar { .. }
        | SymbolError::WrongLength { .. } => codes::ERROR_INVALID_DATA,
        SymbolError::TooLong { .. } => codes::ERROR_TOO_LONG,
        SymbolError::EncodingImpossible { .. } => codes::ERROR_ENCODING_IMPOSSIBLE,
        SymbolError::UnknownSymbology(_) => codes::ERROR_UNKNOWN_SYMBOLOGY,
        SymbolError::InvalidEci(_)
        | SymbolError::InvalidColor
        | SymbolError::InvalidScale
        | SymbolError::InvalidOption { .. }
        | SymbolError::PrimaryNotSupported => codes::ERROR_INVALID_OPTION,
    }
}

// Render result
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum RenderPayload {
    Raster(RasterImage),
    Vector(VectorPage),
}

/// Terminal artifact of the pipeline: outcome code, message and, for codes
/// up to 2, the rendered output.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    pub code: u8,
    pub message: String,
    pub width: u32,
    pub height: u32,
    pub payload: Option<RenderPayload>,
}

impl RenderResult {
    pub fn is_usable(&self) -> bool {
        self.code <= 2
    }
}

/// Packages usable output. With warnings present the highest warning code
/// wins and the message joins their descriptions.
pub fn success(payload: RenderPayload, warnings: &[Warning]) -> RenderResult {
    let (width, height) = match &payload {
        RenderPayload::Raster(img) => (img.width, img.height),
        RenderPayload::Vector(page) => (page.width, page.height),
    };
    let code = warnings.iter().map(warning_code).max().unwrap_or(codes::SUCCESS);
    let message =
        warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>().join("; ");
    RenderResult { code, message, width, height, payload: Some(payload) }
}

/// Packages a failure: no payload, message naming the violated constraint.
pub fn failure(err: &SymbolError) -> RenderResult {
    RenderResult {
        code: error_code(err),
        message: err.to_string(),
        width: 0,
        height: 0,
        payload: None,
    }
}
