//! COLLADA document reading.
//!
//! [`ColladaDocument::open`] parses a `.dae` file into the resolved model in
//! [`types`]; the importer only ever sees that model.

mod reader;
mod types;

#[cfg(test)]
pub(crate) mod test_documents;

pub use reader::{parse_collada, ParseError, ParseResult};
pub use types::*;
