//! Generator for rich C++ enumeration types.
//!
//! Pipeline per definition: [`normalize`] raw values, [`validate`] them,
//! build [`tables`], render with [`codegen`]. [`batch`] runs that for many
//! definitions at once, [`definitions`] loads them from JSON and [`sink`]
//! writes the results.
pub mod batch;
pub mod cli;
pub mod codegen;
pub mod definitions;
pub mod ir;
pub mod logging;
pub mod normalize;
pub mod path_de;
pub mod sink;
pub mod tables;
pub mod validate;

pub use batch::{generate_one, Batch, BatchError, BatchMode, BatchReport, GenerateError, GenerateErrorKind};
pub use codegen::{render, Artifacts, RenderError, RenderOptions};
pub use ir::{EnumDefinition, EnumValue, NormalizedValue, RawValue, RawValues, ValueKind};
pub use tables::LookupTables;
pub use validate::{validate, ValidatedEnum, ValidationError};
