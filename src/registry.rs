use std::collections::HashMap;
use std::sync::OnceLock;

use crate::common::error::{SymbolError, SymbolResult};
use crate::symbology::{self, Encode};

// Symbology identifiers
//------------------------------------------------------------------------------

// Stable small integers matching the published symbology enumeration,
// kept for backward compatibility with existing callers.
pub const CODE39: u16 = 8;
pub const EAN13: u16 = 13;
pub const QRCODE: u16 = 58;

// Symbology spec
//------------------------------------------------------------------------------

/// Input charset a symbology accepts.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Charset {
    /// ASCII digits only.
    Numeric,
    /// Digits, uppercase letters and `- . space $ / + %`.
    Alphanumeric,
    /// Any 7-bit ASCII byte.
    FullAscii,
    /// Arbitrary bytes.
    Binary,
}

impl Charset {
    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b'-' | b'.' | b' ' | b'$' | b'/' | b'+' | b'%')
            }
            Self::FullAscii => byte < 0x80,
            Self::Binary => true,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum LengthRule {
    Fixed(usize),
    UpTo(usize),
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ChecksumKind {
    None,
    /// Weighted mod-10 digit, always appended.
    Mod10,
    /// Mod-43 character, appended on request.
    Mod43,
    ReedSolomon,
}

/// Immutable metadata for one registered symbology. Registered once at
/// startup, never mutated thereafter.
#[derive(Debug, Clone)]
pub struct SymbologySpec {
    pub id: u16,
    pub name: &'static str,
    pub charset: Charset,
    pub length: LengthRule,
    pub checksum: ChecksumKind,
    pub two_dimensional: bool,
    /// Minimum quiet zone either side, in modules.
    pub min_quiet_zone: u32,
    /// Default bar height in modules, linear symbologies only.
    pub default_height: u32,
}

// Registry
//------------------------------------------------------------------------------

pub type EncoderFactory = fn() -> Box<dyn Encode>;

/// Maps symbology identifiers to their spec and encoder factory. Built once
/// at process start; read-only afterwards, so concurrent readers need no
/// locking.
pub struct SymbolRegistry {
    entries: HashMap<u16, (SymbologySpec, EncoderFactory)>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Registers a symbology. Duplicate registration of the same identifier
    /// is a programming error and panics.
    pub fn register(&mut self, spec: SymbologySpec, factory: EncoderFactory) {
        let id = spec.id;
        if self.entries.insert(id, (spec, factory)).is_some() {
            panic!("Duplicate registration of symbology {id}");
        }
    }

    pub fn resolve(&self, id: u16) -> SymbolResult<(&SymbologySpec, Box<dyn Encode>)> {
        match self.entries.get(&id) {
            Some((spec, factory)) => Ok((spec, factory())),
            None => Err(SymbolError::UnknownSymbology(id)),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries.keys().copied()
    }

    /// The process-wide registry with all built-in symbologies, initialized
    /// on first use.
    pub fn global() -> &'static SymbolRegistry {
        static REGISTRY: OnceLock<SymbolRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut reg = SymbolRegistry::new();
            symbology::register_builtin(&mut reg);
            reg
        })
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
