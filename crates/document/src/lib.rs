//! # Specforge Document
//!
//! Read access to the live specification documents that changes are resolved against.
//!
//! The resolution pipeline only needs two things from a document store: the raw Markdown of a
//! document (to index it) and its flat section structure (to match titles). [`DocumentStore`]
//! is that seam; [`MemoryDocumentStore`] and [`FileDocumentStore`] are the two stores shipped
//! with the workspace.

mod error;
mod file_store;
mod store;
mod structure;

pub use error::{DocumentError, Result};
pub use file_store::{safe_document_name, FileDocumentStore, InitOutcome, DEFAULT_DOCUMENT};
pub use store::{DocumentStore, MemoryDocumentStore};
pub use structure::{parse_structure, Section, INTRODUCTION_TITLE};
