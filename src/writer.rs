//! Typed, total writer for canonical Binson documents.
//!
//! Every method returns `&mut Self` for chaining. None of them return
//! `Result`: on the first error the writer records it in a sticky field and
//! silently no-ops every call after. Callers check [`Writer::error`] once,
//! at the end, rather than after every call — the same contract
//! `binson_light.c`'s writer gives its C callers.
//!
//! The writer does not enforce structural correctness (balanced
//! begin/end pairs, increasing field names): that is the parser's job on
//! the way back in. A caller that emits a malformed document will simply
//! get a document the parser rejects.

use crate::error::Error;
use crate::int;
use crate::io::WriteBuffer;
use crate::tag::{bytes_tag_for_width, integer_tag_for_width, string_tag_for_width, Tag};

/// Binson documents cannot legally exceed this length prefix (2^31 - 1).
const MAX_LEN: usize = i32::MAX as usize;

pub struct Writer<'a> {
    io: WriteBuffer<'a>,
    error: Option<Error>,
}

impl<'a> Writer<'a> {
    /// A writer backed by a real, caller-owned output buffer.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { io: WriteBuffer::new(buf), error: None }
    }

    /// A dry-run writer: no bytes are stored, but [`Writer::len`] tracks the
    /// exact count a real buffer of `capacity` bytes would have received.
    pub fn sizing(capacity: usize) -> Self {
        Self { io: WriteBuffer::sizing(capacity), error: None }
    }

    /// Clears the sticky error and rewinds to an empty document.
    pub fn reset(&mut self) -> &mut Self {
        self.io.reset();
        self.error = None;
        self
    }

    /// The error set by the first failing call since construction or the
    /// last [`Writer::reset`], if any.
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// Bytes written so far (accurate in dry-run mode too).
    pub fn len(&self) -> usize {
        self.io.used()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The document bytes written so far. `None` in dry-run mode.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.io.as_slice()
    }

    fn fail(&mut self, e: Error) -> &mut Self {
        if self.error.is_none() {
            self.error = Some(e);
        }
        self
    }

    fn write_tag(&mut self, tag: Tag) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if let Err(e) = self.io.write_byte(tag as u8) {
            return self.fail(e);
        }
        self
    }

    fn write_len_prefixed(&mut self, tag_for_width: fn(usize) -> Tag, payload: &[u8]) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if payload.len() > MAX_LEN {
            return self.fail(Error::InvalidArg);
        }
        let width = int::min_width(payload.len() as i64);
        let tag = tag_for_width(width);
        if self.io.write_byte(tag as u8).is_err() {
            return self.fail(Error::BufFull);
        }
        let len_bytes = int::pack(payload.len() as i64, width);
        if self.io.write(&len_bytes[..width]).is_err() {
            return self.fail(Error::BufFull);
        }
        if self.io.write(payload).is_err() {
            return self.fail(Error::BufFull);
        }
        self
    }

    pub fn object_begin(&mut self) -> &mut Self {
        self.write_tag(Tag::ObjBegin)
    }

    pub fn object_end(&mut self) -> &mut Self {
        self.write_tag(Tag::ObjEnd)
    }

    pub fn array_begin(&mut self) -> &mut Self {
        self.write_tag(Tag::ArrayBegin)
    }

    pub fn array_end(&mut self) -> &mut Self {
        self.write_tag(Tag::ArrayEnd)
    }

    pub fn boolean(&mut self, value: bool) -> &mut Self {
        self.write_tag(if value { Tag::True } else { Tag::False })
    }

    pub fn integer(&mut self, value: i64) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        let width = int::min_width(value);
        let tag = integer_tag_for_width(width);
        if self.io.write_byte(tag as u8).is_err() {
            return self.fail(Error::BufFull);
        }
        let bytes = int::pack(value, width);
        if self.io.write(&bytes[..width]).is_err() {
            return self.fail(Error::BufFull);
        }
        self
    }

    pub fn double(&mut self, value: f64) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.io.write_byte(Tag::Double as u8).is_err() {
            return self.fail(Error::BufFull);
        }
        if self.io.write(&int::pack_double(value)).is_err() {
            return self.fail(Error::BufFull);
        }
        self
    }

    /// Writes a UTF-8 field name. Wire-identical to [`Writer::string`]; kept
    /// as a distinct method so call sites read as "this is a key".
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name_with_len(name.as_bytes())
    }

    pub fn name_with_len(&mut self, name: &[u8]) -> &mut Self {
        self.write_len_prefixed(string_tag_for_width, name)
    }

    pub fn string(&mut self, value: &str) -> &mut Self {
        self.string_with_len(value.as_bytes())
    }

    pub fn string_with_len(&mut self, value: &[u8]) -> &mut Self {
        self.write_len_prefixed(string_tag_for_width, value)
    }

    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.write_len_prefixed(bytes_tag_for_width, value)
    }

    /// Injects an already-encoded subtree verbatim (no tag is synthesized).
    /// Used by [`crate::parser::Parser::to_writer`] to copy a parsed
    /// subtree into a new document without re-encoding it.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.io.write(bytes).is_err() {
            return self.fail(Error::BufFull);
        }
        self
    }
}
