//! # gridcode
//!
//! A barcode and 2D symbol encoding engine. Data plus a symbology selector
//! and render options go in; a monochrome module grid with quiet-zone,
//! border and text-band geometry comes out, rendered to an abstract RGB
//! raster or a rectangle-primitive list ready for an external PNG/SVG/EPS
//! serializer.
//!
//! ## Features
//!
//! - **Linear symbologies**: Code 39 with optional mod-43 check character,
//!   EAN-13 with its mod-10 check digit
//! - **Matrix symbology**: QR-style 2D codes, versions 1-40, four Reed-Solomon
//!   error correction levels, automatic version and mask selection
//! - **Validation first**: charset, length and encodation mode are resolved
//!   before any encoder runs, with errors naming the offending character
//! - **Scanner-safe layout**: quiet zones never drop below the symbology
//!   minimum; requests that try are clamped and reported as warnings
//!
//! ## Quick Start
//!
//! ```rust
//! use gridcode::{SymbolBuilder, CODE39};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let symbol = SymbolBuilder::new(CODE39, b"HELLO")
//!     .scale(2.0)
//!     .show_hrt(true)
//!     .build()?;
//!
//! let img = symbol.to_image();
//! img.save("code39.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Matrix symbols
//!
//! ```rust
//! use gridcode::{SymbolBuilder, QRCODE};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let symbol = SymbolBuilder::new(QRCODE, "https://example.com".as_bytes())
//!     .option1(3)  // error correction level Q
//!     .scale(4.0)
//!     .build()?;
//!
//! let raster = symbol.to_raster();
//! assert_eq!(raster.pixels.len(), (raster.width * raster.height * 3) as usize);
//! # Ok(())
//! # }
//! ```
//!
//! ### The wire-shaped surface
//!
//! Existing callers that speak the integer-enum-and-sentinel contract go
//! through [`EncodeRequest`]:
//!
//! ```rust
//! use gridcode::{encode, codes, EncodeRequest, OutputKind, QRCODE};
//!
//! let req = EncodeRequest {
//!     symbology: QRCODE,
//!     data: b"HELLO".to_vec(),
//!     ..EncodeRequest::default()
//! };
//! let res = encode(&req, OutputKind::Raster);
//! assert_eq!(res.code, codes::SUCCESS);
//! ```
//!
//! ## Pipeline
//!
//! Every call runs validate, encode, layout, render, report, each stage a
//! pure function of its inputs. The only shared state is the read-only
//! symbology registry built on first use, so arbitrarily many encodes may
//! run in parallel.

pub mod builder;
pub(crate) mod common;
pub mod layout;
pub mod registry;
pub mod render;
pub mod report;
pub mod request;
pub mod symbology;
pub mod validate;

pub use builder::{Symbol, SymbolBuilder, SymbolOptions};
pub use common::error::{SymbolError, SymbolResult, Warning};
pub use common::grid::{Color, ModuleGrid};
pub use layout::{Rgb, SymbolLayout};
pub use registry::{
    Charset, ChecksumKind, LengthRule, SymbolRegistry, SymbologySpec, CODE39, EAN13, QRCODE,
};
pub use render::{RasterImage, VectorPage, VectorPrimitive};
pub use report::{codes, RenderPayload, RenderResult};
pub use request::{encode, EncodeRequest, OutputKind};
pub use validate::{EncMode, ModeOverride, NormalizedInput};
