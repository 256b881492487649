//! Document layer for mattersync.
//!
//! Splits content files into a metadata tree and a body, writes them back in
//! their original front matter syntax, and computes the auxiliary data the
//! metadata panel shows next to the tree:
//! - [`ParsedDocument`]: front matter (YAML, TOML or JSON) plus body
//! - [`ArticleDetails`]: heading, paragraph, word and link counts
//! - [`DataFileCatalog`]: entries of JSON/YAML data files

mod data_file;
mod details;
mod error;
mod front_matter;

pub use data_file::{DataFile, DataFileCatalog, DataFileKind, WORKSPACE_PLACEHOLDER};
pub use details::{ArticleDetails, WORDS_PER_MINUTE};
pub use error::{DocumentError, DocumentResult};
pub use front_matter::{FrontMatterSyntax, ParsedDocument, SUPPORTED_EXTENSIONS, is_supported};
