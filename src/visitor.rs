//! Optional to-JSON rendering, driven by walking the parser.
//!
//! Mirrors `binson_light.c`'s `WITH_TO_STRING` visitor: output is compact
//! (no whitespace), byte blobs render as the literal text `<data>` rather
//! than being escaped or base64-encoded, and the whole thing writes into a
//! caller-supplied buffer through the same bounds-checked discipline the
//! writer uses — no allocation.

use core::fmt::Write as _;

use crate::error::{Error, Result};
use crate::io::WriteBuffer;
use crate::parser::{Parser, ParserCallback};
use crate::tag::ValueType;

struct JsonSink<'a> {
    io: WriteBuffer<'a>,
}

impl<'a> JsonSink<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { io: WriteBuffer::new(buf) }
    }

    fn raw(&mut self, s: &str) -> Result<()> {
        self.io.write(s.as_bytes()).map_err(|_| Error::BufFull)
    }

    fn escaped_string(&mut self, bytes: &[u8]) -> Result<()> {
        self.raw("\"")?;
        let s = core::str::from_utf8(bytes).map_err(|_| Error::WrongType)?;
        for c in s.chars() {
            match c {
                '"' => self.raw("\\\"")?,
                '\\' => self.raw("\\\\")?,
                '\n' => self.raw("\\n")?,
                '\t' => self.raw("\\t")?,
                '\r' => self.raw("\\r")?,
                c => {
                    let mut tmp = [0u8; 4];
                    self.raw(c.encode_utf8(&mut tmp))?;
                }
            }
        }
        self.raw("\"")
    }
}

impl core::fmt::Write for JsonSink<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.raw(s).map_err(|_| core::fmt::Error)
    }
}

/// Renders the document `parser` is positioned at the root of into `out`
/// as compact JSON, returning the number of bytes written.
///
/// `parser` must be freshly constructed (or reset) so it sits at the root
/// `Block` state; this function drives it to completion.
pub fn to_json<'a, 'b, const MAX_DEPTH: usize, C: ParserCallback<'a>>(
    parser: &mut Parser<'a, MAX_DEPTH, C>,
    out: &'b mut [u8],
) -> Result<usize> {
    let mut sink = JsonSink::new(out);
    if let Some(e) = parser.error() {
        return Err(e);
    }
    emit_value(parser, &mut sink)?;
    Ok(sink.io.used())
}

fn emit_value<'a, const MAX_DEPTH: usize, C: ParserCallback<'a>>(
    parser: &mut Parser<'a, MAX_DEPTH, C>,
    sink: &mut JsonSink<'_>,
) -> Result<()> {
    match parser.value_type() {
        ValueType::Object => emit_object(parser, sink),
        ValueType::Array => emit_array(parser, sink),
        ValueType::Boolean => sink.raw(if parser.get_boolean()? { "true" } else { "false" }),
        ValueType::Integer => write!(sink, "{}", parser.get_integer()?).map_err(|_| Error::BufFull),
        ValueType::Double => write!(sink, "{}", parser.get_double()?).map_err(|_| Error::BufFull),
        ValueType::String => sink.escaped_string(parser.get_string()?.as_bytes()),
        ValueType::Bytes => sink.raw("<data>"),
        ValueType::Unknown => Err(Error::WrongType),
    }
}

fn emit_object<'a, const MAX_DEPTH: usize, C: ParserCallback<'a>>(
    parser: &mut Parser<'a, MAX_DEPTH, C>,
    sink: &mut JsonSink<'_>,
) -> Result<()> {
    sink.raw("{")?;
    if !parser.go_into_object() {
        return Err(parser.error().unwrap_or(Error::WrongState));
    }
    let mut first = true;
    loop {
        if !parser.next() {
            break;
        }
        // landed on Name
        if !first {
            sink.raw(",")?;
        }
        first = false;
        let name = parser.name().unwrap_or(&[]);
        sink.escaped_string(name)?;
        sink.raw(":")?;
        if !parser.next() {
            return Err(parser.error().unwrap_or(Error::WrongState));
        }
        emit_value(parser, sink)?;
    }
    if let Some(e) = parser.error() {
        return Err(e);
    }
    if !parser.go_up() {
        return Err(parser.error().unwrap_or(Error::WrongState));
    }
    sink.raw("}")
}

fn emit_array<'a, const MAX_DEPTH: usize, C: ParserCallback<'a>>(
    parser: &mut Parser<'a, MAX_DEPTH, C>,
    sink: &mut JsonSink<'_>,
) -> Result<()> {
    sink.raw("[")?;
    if !parser.go_into_array() {
        return Err(parser.error().unwrap_or(Error::WrongState));
    }
    let mut first = true;
    loop {
        if !parser.next() {
            break;
        }
        if !first {
            sink.raw(",")?;
        }
        first = false;
        emit_value(parser, sink)?;
    }
    if let Some(e) = parser.error() {
        return Err(e);
    }
    if !parser.go_up() {
        return Err(parser.error().unwrap_or(Error::WrongState));
    }
    sink.raw("]")
}
