//! Positioned, bounds-checked byte windows shared by the writer and the
//! parser. Neither ever grows or reallocates a buffer; both only ever
//! advance a cursor against a fixed capacity.

use crate::error::{Error, Result};

/// The writer's output side.
///
/// `buf` is `None` in dry-run sizing mode: no bytes are ever written, but
/// `used` still advances exactly as it would against a real buffer of
/// `capacity` bytes, so [`WriteBuffer::used`] reports the exact size a real
/// write would have produced.
pub(crate) struct WriteBuffer<'a> {
    buf: Option<&'a mut [u8]>,
    capacity: usize,
    used: usize,
}

impl<'a> WriteBuffer<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        let capacity = buf.len();
        Self { buf: Some(buf), capacity, used: 0 }
    }

    pub(crate) fn sizing(capacity: usize) -> Self {
        Self { buf: None, capacity, used: 0 }
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }

    pub(crate) fn reset(&mut self) {
        self.used = 0;
    }

    pub(crate) fn write(&mut self, src: &[u8]) -> Result<()> {
        let new_used = self.used.checked_add(src.len()).ok_or(Error::BufFull)?;
        if new_used > self.capacity {
            return Err(Error::BufFull);
        }
        if let Some(buf) = self.buf.as_deref_mut() {
            buf[self.used..new_used].copy_from_slice(src);
        }
        self.used = new_used;
        Ok(())
    }

    pub(crate) fn write_byte(&mut self, b: u8) -> Result<()> {
        self.write(&[b])
    }

    /// The bytes written so far, or `None` in dry-run mode.
    pub(crate) fn as_slice(&self) -> Option<&[u8]> {
        self.buf.as_deref().map(|b| &b[..self.used])
    }
}

/// The parser's input side: a bounds-checked cursor over a caller-owned
/// slice, never copying except when the caller asks for a byte out.
#[derive(Clone)]
pub(crate) struct ReadBuffer<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ReadBuffer<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn set_pos(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(Error::EndOfBuffer);
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn read_byte(&mut self) -> Result<u8> {
        let b = *self.buf.get(self.pos).ok_or(Error::EndOfBuffer)?;
        self.pos += 1;
        Ok(b)
    }

    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(Error::EndOfBuffer)?;
        if end > self.buf.len() {
            return Err(Error::EndOfBuffer);
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn full(&self) -> &'a [u8] {
        self.buf
    }
}
