//! # Specforge Protocol
//!
//! Wire formats shared by the update resolution pipeline:
//!
//! - the change protocol emitted by the authoring model (`<<<SPEC_START>>>` blocks),
//! - the resolution results consumed by the downstream merge step,
//! - the process response envelope wrapping both outcomes of a resolution request.
//!
//! ## Example
//!
//! ```rust
//! use specforge_protocol::parse_batch;
//!
//! let text = "<<<SPEC_START>>>
//! Target-Section: Auth
//! Change-Summary: Added login
//!
//! ### Login
//! User logs in here.
//! <<<SPEC_END>>>";
//!
//! let intents = parse_batch(text).unwrap();
//! assert_eq!(intents[0].target_path, "Auth");
//! assert!(intents[0].raw_body.starts_with("### Login"));
//! ```

use anyhow::Result;
use serde::Serialize;

mod error;
mod parser;
mod types;

pub use error::{ProtocolError, Result as ProtocolResult};
pub use parser::{parse_batch, render_block, END_MARKER, START_MARKER};
pub use types::{
    OriginalText, ProcessResponse, ResolutionResult, ResolutionStrategy, UpdateIntent,
    NEW_SECTION_SENTINEL, NO_PROTOCOL_MESSAGE, UNMATCHED_SENTINEL,
};

pub const RESPONSE_SCHEMA_VERSION: u32 = 1;

/// JSON schema of [`ProcessResponse`], for consumers of the resolution output.
pub fn response_schema_json() -> Result<String> {
    let schema = schemars::schema_for!(ProcessResponse);
    serde_json::to_string_pretty(&schema).map_err(Into::into)
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
