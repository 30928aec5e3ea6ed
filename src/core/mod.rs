//! Core XML parsing primitives
//!
//! This module contains the fundamental building blocks for XML parsing:
//! - Span: source positions and ranges
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: push-based state machine producing lexical events
//! - Entities: predefined, character and caller-supplied references
//! - Attributes: normalized attribute records and name splitting
//! - Encoding: UTF-16 detection and conversion to UTF-8
//! - DTD: doctype name and external identifier extraction

pub mod attributes;
pub mod dtd;
pub mod encoding;
pub mod entities;
pub mod scanner;
pub mod span;
pub mod tokenizer;
