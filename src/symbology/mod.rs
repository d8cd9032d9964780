pub mod code39;
pub mod ean13;
pub mod matrix;

use crate::builder::SymbolOptions;
use crate::common::error::SymbolResult;
use crate::common::grid::ModuleGrid;
use crate::registry::SymbolRegistry;
use crate::validate::NormalizedInput;

// Encoder contract
//------------------------------------------------------------------------------

/// Encoder output: the module grid plus the human-readable text the
/// symbology prescribes (checksum digits included where the standard shows
/// them).
#[derive(Debug, Clone)]
pub struct Encoded {
    pub grid: ModuleGrid,
    pub hrt: Option<String>,
}

/// One encoder per symbology family, selected through the registry. Input
/// is assumed validated; encoders never re-check charset membership.
pub trait Encode {
    fn encode(&self, input: &NormalizedInput, opts: &SymbolOptions) -> SymbolResult<Encoded>;
}

pub fn register_builtin(reg: &mut SymbolRegistry) {
    reg.register(code39::spec(), || Box::new(code39::Code39));
    reg.register(ean13::spec(), || Box::new(ean13::Ean13));
    reg.register(matrix::spec(), || Box::new(matrix::Matrix));
}
