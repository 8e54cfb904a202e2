//! HTML tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)

/// The list of active formatting elements.
pub mod active_formatting;
mod adoption_agency;
mod after_modes;
/// Parser state, the dispatcher, and node insertion.
pub mod core;
/// SVG and MathML adjustments.
pub mod foreign_content;
/// Fragment parsing entry point.
pub mod fragment;
mod head_modes;
mod in_body;
mod in_foreign_content;
mod in_template;
/// The stack of open elements and its scope queries.
pub mod open_elements;
mod quirks;
mod select_modes;
mod table_modes;
mod tags;

pub use self::core::{HTMLParser, InsertionMode, TreeBuilderOutput, dump_tree, print_tree};
pub use active_formatting::{ActiveFormattingElement, ActiveFormattingElements};
pub use fragment::FragmentContext;
pub use open_elements::StackOfOpenElements;
