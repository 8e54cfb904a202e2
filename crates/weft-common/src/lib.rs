//! Common utilities for the weft parser.
//!
//! This crate provides shared infrastructure used by the parser crates:
//! - **Diagnostics** - the bounded parse-error sink
//! - **URL resolution** - `<base href>` handling

pub mod diagnostics;
pub mod url;

pub use diagnostics::{ParseError, ParseErrors};
