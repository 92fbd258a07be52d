//! # Binson
//!
//! A bounded, zero-copy, allocation-free codec for [Binson](https://binson.org),
//! a compact, canonically-ordered binary object notation.
//!
//! ## Philosophy
//!
//! - **Bounded**: writer and parser operate against caller-supplied buffers.
//!   Nothing is ever allocated; nesting depth is a compile-time constant.
//! - **Canonical**: the parser enforces the one true encoding of every
//!   document — strictly increasing field names, minimum-width integers —
//!   and rejects anything else.
//! - **Zero-copy**: strings and byte blobs the parser yields are slices
//!   into the caller's own buffer.
//! - **Non-recursive**: the parser is an explicit state machine over a
//!   fixed-size depth stack, never the native call stack.
//!
//! ## Format
//!
//! ```text
//! Object:  0x40 ... 0x41
//! Array:   0x42 ... 0x43
//! Bool:    0x44 (true) | 0x45 (false)
//! Double:  0x46 + 8 bytes LE
//! Integer: 0x10/11/12/13 (width 1/2/4/8) + LE two's complement
//! String:  0x14/15/16 (length width 1/2/4) + UTF-8 bytes
//! Bytes:   0x18/19/1A (length width 1/2/4) + raw bytes
//! ```
//!
//! All multi-byte values are little-endian.

#![cfg_attr(not(test), no_std)]

pub mod error;
mod int;
mod io;
pub mod parser;
pub mod tag;
pub mod visitor;
pub mod writer;

pub use error::{Error, Result};
pub use parser::{NoCallback, Parser, ParserCallback, State};
pub use tag::{Tag, ValueType};
pub use visitor::to_json;
pub use writer::Writer;

#[cfg(test)]
mod tests;
