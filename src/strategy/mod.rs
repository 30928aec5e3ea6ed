//! Parsing Strategy Module
//!
//! - One-shot: the whole input is tokenized from a slice (see `crate::parse_with_options`)
//! - Streaming: input arrives in chunks from a reader, blocking or async

pub mod streaming;

#[cfg(feature = "async")]
pub use streaming::parse_async;
pub use streaming::{parse_reader, StreamingParser};
