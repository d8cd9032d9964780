use crate::common::error::{SymbolError, SymbolResult};
use crate::registry::{LengthRule, SymbologySpec};

// Encodation mode
//------------------------------------------------------------------------------

/// Resolved encodation mode, in auto-detection preference order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub enum EncMode {
    Numeric,
    Alphanumeric,
    /// Text representable in Latin-1; data is carried as Latin-1 bytes.
    FullAscii,
    Binary,
}

impl EncMode {
    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::FullAscii | Self::Binary => true,
        }
    }
}

/// Caller-requested encodation override. `Auto` lets the validator pick.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum ModeOverride {
    #[default]
    Auto,
    Latin1,
    Binary,
}

// Normalized input
//------------------------------------------------------------------------------

/// Validated, mode-resolved input handed to the encoder. Immutable after
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    pub data: Vec<u8>,
    pub mode: EncMode,
    pub eci: Option<u32>,
}

// Validator
//------------------------------------------------------------------------------

const ECI_MAX: u32 = 999_999;

/// Checks the input against the symbology's charset and length rules and
/// resolves the encodation mode. Pure function over its inputs.
pub fn validate(
    data: &[u8],
    spec: &SymbologySpec,
    over: ModeOverride,
    eci: Option<u32>,
) -> SymbolResult<NormalizedInput> {
    if data.is_empty() {
        return Err(SymbolError::EmptyData);
    }

    match spec.length {
        LengthRule::Fixed(n) if data.len() != n => {
            return Err(SymbolError::WrongLength { expected: n, got: data.len() })
        }
        LengthRule::UpTo(n) if data.len() > n => {
            return Err(SymbolError::TooLong { max: n, got: data.len() })
        }
        _ => {}
    }

    if let Some(pos) = data.iter().position(|&b| !spec.charset.contains(b)) {
        return Err(SymbolError::InvalidChar { byte: data[pos], pos });
    }

    if let Some(e) = eci {
        if e > ECI_MAX {
            return Err(SymbolError::InvalidEci(e));
        }
    }

    let (mode, data) = match over {
        ModeOverride::Binary => (EncMode::Binary, data.to_vec()),
        ModeOverride::Latin1 => (EncMode::FullAscii, to_latin1(data)?),
        ModeOverride::Auto => resolve_mode(data),
    };

    Ok(NormalizedInput { data, mode, eci })
}

// Prefer the densest mode that round-trips losslessly.
fn resolve_mode(data: &[u8]) -> (EncMode, Vec<u8>) {
    if data.iter().all(|&b| EncMode::Numeric.contains(b)) {
        return (EncMode::Numeric, data.to_vec());
    }
    if data.iter().all(|&b| EncMode::Alphanumeric.contains(b)) {
        return (EncMode::Alphanumeric, data.to_vec());
    }
    match to_latin1(data) {
        Ok(converted) => (EncMode::FullAscii, converted),
        Err(_) => (EncMode::Binary, data.to_vec()),
    }
}

// UTF-8 input whose every scalar fits in Latin-1 converts losslessly;
// anything else is reported at the first offending position.
fn to_latin1(data: &[u8]) -> SymbolResult<Vec<u8>> {
    let s = std::str::from_utf8(data)
        .map_err(|e| SymbolError::InvalidChar { byte: data[e.valid_up_to()], pos: e.valid_up_to() })?;
    if !encoding_rs::mem::is_utf8_latin1(data) {
        let (pos, _) = s
            .char_indices()
            .find(|(_, c)| (*c as u32) > 0xff)
            .expect("Non-latin1 scalar must exist");
        return Err(SymbolError::InvalidChar { byte: data[pos], pos });
    }
    let mut out = vec![0u8; data.len()];
    let n = encoding_rs::mem::convert_utf8_to_latin1_lossy(data, &mut out);
    out.truncate(n);
    Ok(out)
}
