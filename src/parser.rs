//! Non-recursive, bounded-depth parser for canonical Binson documents.
//!
//! Everything funnels through [`Parser::read_token`], which consumes
//! exactly one wire tag and applies the matching state transition. Higher
//! level navigation (`next`, `go_into`, `field_ensure`, ...) is built by
//! composing that primitive with two depth-stack helpers
//! ([`Parser::push_into_block`], [`Parser::pop_block_end`]); none of them
//! ever recurse through the Rust call stack, so nesting depth is bounded by
//! `MAX_DEPTH` rather than by the native stack.

use crate::error::{Error, Result};
use crate::io::ReadBuffer;
use crate::int;
use crate::tag::{Tag, ValueType};

const MAX_LEN: usize = i32::MAX as usize;

/// One of the seven positions the parser can occupy mid-document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Undefined,
    /// Just consumed a container-begin tag; not yet descended.
    Block,
    /// Descended into a container, about to read its first item.
    InBlock,
    /// Just consumed a container-end tag; still counted as inside.
    InBlockEnd,
    /// Popped back out of a container.
    BlockEnd,
    /// Just consumed a field name; its value is pending.
    Name,
    /// Just consumed a scalar value.
    Val,
}

#[derive(Clone, Copy)]
struct Frame<'a> {
    kind: ValueType,
    last_name: Option<&'a [u8]>,
}

impl<'a> Frame<'a> {
    fn empty() -> Self {
        Frame { kind: ValueType::Unknown, last_name: None }
    }
}

/// Receives one event per parser transition, in document order.
///
/// Parameterized rather than boxed so an optional callback costs nothing
/// when unused: [`NoCallback`] is the zero-sized default implementation.
pub trait ParserCallback<'a> {
    fn on_event(&mut self, state: State, depth: usize, val_type: ValueType, name: Option<&'a [u8]>);
}

/// The default, no-op callback.
#[derive(Default)]
pub struct NoCallback;

impl<'a> ParserCallback<'a> for NoCallback {
    fn on_event(&mut self, _state: State, _depth: usize, _val_type: ValueType, _name: Option<&'a [u8]>) {}
}

pub struct Parser<'a, const MAX_DEPTH: usize = 16, C: ParserCallback<'a> = NoCallback> {
    io: ReadBuffer<'a>,
    state: State,
    depth: usize,
    stack: [Frame<'a>; MAX_DEPTH],
    val_type: ValueType,
    val_bool: bool,
    val_int: i64,
    val_double: f64,
    val_bytes: Option<&'a [u8]>,
    name: Option<&'a [u8]>,
    error: Option<Error>,
    callback: C,
}

impl<'a, const MAX_DEPTH: usize> Parser<'a, MAX_DEPTH, NoCallback> {
    /// A parser over `buf` with no callback. The root object's begin tag
    /// is consumed immediately so the very first call a caller makes can
    /// be [`Parser::go_into_object`].
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_callback(buf, NoCallback)
    }
}

impl<'a, const MAX_DEPTH: usize, C: ParserCallback<'a>> Parser<'a, MAX_DEPTH, C> {
    pub fn with_callback(buf: &'a [u8], callback: C) -> Self {
        let mut p = Parser {
            io: ReadBuffer::new(buf),
            state: State::Undefined,
            depth: 0,
            stack: [Frame::empty(); MAX_DEPTH],
            val_type: ValueType::Unknown,
            val_bool: false,
            val_int: 0,
            val_double: 0.0,
            val_bytes: None,
            name: None,
            error: None,
            callback,
        };
        if let Err(e) = p.read_token() {
            p.error = Some(e);
        }
        p
    }

    /// Rewinds to the start of the buffer and clears the sticky error.
    pub fn reset(&mut self) {
        let _ = self.io.set_pos(0);
        self.state = State::Undefined;
        self.depth = 0;
        self.val_type = ValueType::Unknown;
        self.name = None;
        self.error = None;
        if let Err(e) = self.read_token() {
            self.error = Some(e);
        }
    }

    pub fn error(&self) -> Option<Error> {
        self.error
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn value_type(&self) -> ValueType {
        self.val_type
    }

    pub fn name(&self) -> Option<&'a [u8]> {
        self.name
    }

    pub fn cmp_name(&self, name: &str) -> Option<core::cmp::Ordering> {
        self.name.map(|n| n.cmp(name.as_bytes()))
    }

    pub fn string_equals(&self, s: &str) -> bool {
        self.val_type == ValueType::String && self.val_bytes == Some(s.as_bytes())
    }

    pub fn get_boolean(&self) -> Result<bool> {
        if self.val_type == ValueType::Boolean { Ok(self.val_bool) } else { Err(Error::WrongType) }
    }

    pub fn get_integer(&self) -> Result<i64> {
        if self.val_type == ValueType::Integer { Ok(self.val_int) } else { Err(Error::WrongType) }
    }

    pub fn get_double(&self) -> Result<f64> {
        if self.val_type == ValueType::Double { Ok(self.val_double) } else { Err(Error::WrongType) }
    }

    pub fn get_string(&self) -> Result<&'a str> {
        if self.val_type != ValueType::String {
            return Err(Error::WrongType);
        }
        core::str::from_utf8(self.val_bytes.unwrap_or(&[])).map_err(|_| Error::WrongType)
    }

    pub fn get_bytes(&self) -> Result<&'a [u8]> {
        if self.val_type != ValueType::Bytes {
            return Err(Error::WrongType);
        }
        Ok(self.val_bytes.unwrap_or(&[]))
    }

    // -- low-level single-token step -------------------------------------

    /// Reads exactly one wire tag and applies its state transition. Must
    /// only be called while positioned to read a byte (never in `Block` or
    /// `InBlockEnd`, which are resolved by [`Parser::push_into_block`] and
    /// [`Parser::pop_block_end`] instead).
    fn read_token(&mut self) -> Result<()> {
        let tag_byte = self.io.read_byte()?;
        let tag = Tag::from_u8(tag_byte).ok_or(Error::WrongType)?;

        let prev_state = self.state;
        let in_object = self.depth > 0 && self.stack[self.depth - 1].kind == ValueType::Object;
        let expecting_name = in_object && prev_state != State::Name;

        let req_state = match tag {
            Tag::ObjBegin | Tag::ArrayBegin => State::Block,
            Tag::ObjEnd | Tag::ArrayEnd => State::InBlockEnd,
            Tag::True
            | Tag::False
            | Tag::Double
            | Tag::Integer8
            | Tag::Integer16
            | Tag::Integer32
            | Tag::Integer64
            | Tag::Bytes8
            | Tag::Bytes16
            | Tag::Bytes32 => State::Val,
            Tag::String8 | Tag::String16 | Tag::String32 => {
                if expecting_name { State::Name } else { State::Val }
            }
        };

        // The value half of a name:val pair must itself be a value or a
        // nested block; anything else reaching here from `Name` (e.g. a
        // container-end tag right after a field name) is a dangling name.
        if prev_state == State::Name && !matches!(req_state, State::Val | State::Block) {
            return Err(Error::WrongType);
        }
        Self::validate_transition(prev_state, req_state)?;

        match tag {
            Tag::ObjBegin | Tag::ArrayBegin => {
                if expecting_name {
                    return Err(Error::WrongType);
                }
                if self.depth == 0 && tag == Tag::ArrayBegin {
                    return Err(Error::WrongType);
                }
                self.val_type = if tag == Tag::ObjBegin { ValueType::Object } else { ValueType::Array };
                self.name = None;
                self.state = State::Block;
            }
            Tag::ObjEnd | Tag::ArrayEnd => {
                if self.depth == 0 {
                    return Err(Error::WrongState);
                }
                let expected = if tag == Tag::ObjEnd { ValueType::Object } else { ValueType::Array };
                if self.stack[self.depth - 1].kind != expected {
                    return Err(Error::WrongType);
                }
                self.val_type = expected;
                self.name = None;
                self.state = State::InBlockEnd;
            }
            Tag::True | Tag::False => {
                if expecting_name {
                    return Err(Error::WrongType);
                }
                self.val_type = ValueType::Boolean;
                self.val_bool = tag == Tag::True;
                self.name = None;
                self.state = State::Val;
            }
            Tag::Double => {
                if expecting_name {
                    return Err(Error::WrongType);
                }
                let bytes = self.io.read_bytes(8)?;
                self.val_double = int::unpack_double(bytes)?;
                self.val_type = ValueType::Double;
                self.name = None;
                self.state = State::Val;
            }
            Tag::Integer8 | Tag::Integer16 | Tag::Integer32 | Tag::Integer64 => {
                if expecting_name {
                    return Err(Error::WrongType);
                }
                let width = tag.width();
                let bytes = self.io.read_bytes(width)?;
                self.val_int = int::unpack(bytes, width)?;
                self.val_type = ValueType::Integer;
                self.name = None;
                self.state = State::Val;
            }
            Tag::Bytes8 | Tag::Bytes16 | Tag::Bytes32 => {
                if expecting_name {
                    return Err(Error::WrongType);
                }
                let slice = self.read_len_prefixed(tag.width())?;
                self.val_bytes = Some(slice);
                self.val_type = ValueType::Bytes;
                self.name = None;
                self.state = State::Val;
            }
            Tag::String8 | Tag::String16 | Tag::String32 => {
                let slice = self.read_len_prefixed(tag.width())?;
                if expecting_name {
                    let frame = &mut self.stack[self.depth - 1];
                    if let Some(prev) = frame.last_name {
                        if slice <= prev {
                            return Err(Error::WrongType);
                        }
                    }
                    frame.last_name = Some(slice);
                    self.name = Some(slice);
                    self.val_type = ValueType::String;
                    self.state = State::Name;
                } else {
                    self.val_bytes = Some(slice);
                    self.val_type = ValueType::String;
                    self.name = None;
                    self.state = State::Val;
                }
            }
        }

        self.callback.on_event(self.state, self.depth, self.val_type, self.name);
        Ok(())
    }

    /// The legal-transition table from spec §4.4: which `state` a token may
    /// be read from, given the `req_state` its tag produces. `Block` and
    /// `InBlockEnd` never appear as `prev` here since those states are
    /// resolved by [`Parser::push_into_block`]/[`Parser::pop_block_end`]
    /// without ever calling this routine.
    fn validate_transition(prev: State, req: State) -> Result<()> {
        use State::*;
        let ok = matches!(
            (prev, req),
            (Undefined, Block)
                | (InBlock, Name)
                | (InBlock, Val)
                | (InBlock, InBlockEnd)
                | (InBlock, Block)
                | (Val, Name)
                | (Val, Val)
                | (Val, Block)
                | (Val, InBlockEnd)
                | (Name, Val)
                | (Name, Block)
                | (BlockEnd, Name)
                | (BlockEnd, Val)
                | (BlockEnd, Block)
                | (BlockEnd, InBlockEnd)
        );
        if ok { Ok(()) } else { Err(Error::WrongState) }
    }

    fn read_len_prefixed(&mut self, width: usize) -> Result<&'a [u8]> {
        let len_bytes = self.io.read_bytes(width)?;
        let raw = int::unpack(len_bytes, width)?;
        if raw < 0 || raw as usize > MAX_LEN {
            return Err(Error::BadLen);
        }
        self.io.read_bytes(raw as usize)
    }

    // -- depth-stack transitions (no byte consumed) ----------------------

    fn push_into_block(&mut self) -> Result<()> {
        if self.depth + 1 >= MAX_DEPTH {
            return Err(Error::MaxDepthReached);
        }
        let kind = self.val_type;
        self.stack[self.depth] = Frame { kind, last_name: None };
        self.depth += 1;
        self.state = State::InBlock;
        self.callback.on_event(self.state, self.depth, self.val_type, None);
        Ok(())
    }

    fn pop_block_end(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::WrongState);
        }
        self.depth -= 1;
        self.state = State::BlockEnd;
        self.callback.on_event(self.state, self.depth, self.val_type, None);
        Ok(())
    }

    /// Consumes the value at the current `Name` position, transparently
    /// walking past an arbitrarily nested container if that's what it is.
    fn skip_value(&mut self) -> Result<()> {
        self.read_token()?;
        if self.state == State::Block {
            self.skip_block()?;
        }
        Ok(())
    }

    /// Consumes a whole container starting from `Block`, landing back at
    /// the depth we started from with `state == BlockEnd`. Bounded by
    /// `MAX_DEPTH` even though the depth excursion is invisible to the
    /// caller.
    fn skip_block(&mut self) -> Result<()> {
        let mut local_depth: i64 = 0;
        self.push_into_block()?;
        local_depth += 1;
        loop {
            self.read_token()?;
            match self.state {
                State::Block => {
                    self.push_into_block()?;
                    local_depth += 1;
                }
                State::InBlockEnd => {
                    self.pop_block_end()?;
                    local_depth -= 1;
                    if local_depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn read_next_sibling(&mut self) -> Result<bool> {
        self.read_token()?;
        match self.state {
            State::Name | State::Val | State::Block => Ok(true),
            State::InBlockEnd => Ok(false),
            _ => Err(Error::WrongState),
        }
    }

    // -- public navigation ------------------------------------------------

    /// Descends into the container whose begin tag was just read. Only
    /// legal while `state == Block`.
    pub fn go_into(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        if self.state != State::Block {
            self.error = Some(Error::WrongState);
            return false;
        }
        match self.push_into_block() {
            Ok(()) => true,
            Err(e) => { self.error = Some(e); false }
        }
    }

    pub fn go_into_object(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        if self.val_type != ValueType::Object {
            self.error = Some(Error::WrongType);
            return false;
        }
        self.go_into()
    }

    pub fn go_into_array(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        if self.val_type != ValueType::Array {
            self.error = Some(Error::WrongType);
            return false;
        }
        self.go_into()
    }

    /// Ascends out of the current container. Callable from any position
    /// inside it — remaining siblings are skipped first.
    pub fn go_up(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        let res = (|| -> Result<()> {
            loop {
                match self.state {
                    State::InBlockEnd => return self.pop_block_end(),
                    State::Name => self.skip_value()?,
                    State::Block => self.skip_block()?,
                    State::BlockEnd if self.depth == 0 => return Err(Error::BlockEnded),
                    State::InBlock | State::Val | State::BlockEnd => { self.read_token()?; }
                    _ => return Err(Error::WrongState),
                }
            }
        })();
        match res {
            Ok(()) => true,
            Err(e) => { self.error = Some(e); false }
        }
    }

    fn go_upto(&mut self, kind: ValueType) -> bool {
        loop {
            if !self.go_up() {
                return false;
            }
            if self.val_type == kind {
                return true;
            }
            if self.depth == 0 {
                self.error = Some(Error::WrongState);
                return false;
            }
        }
    }

    pub fn go_upto_object(&mut self) -> bool {
        self.go_upto(ValueType::Object)
    }

    pub fn go_upto_array(&mut self) -> bool {
        self.go_upto(ValueType::Array)
    }

    /// Moves to the next sibling at the current depth. Returns `false`
    /// (without setting an error) once the container is exhausted.
    /// Reads exactly one more token. Landing on `Name` is a real stop (the
    /// field's key, value not yet read); a second `next()` call then reads
    /// the value. Landing on `Block` (a nested container met as a value we
    /// did not descend into) skips the whole subtree so the following
    /// `next()` lands on its sibling rather than its insides — unless that
    /// subtree was the root object itself (`state == Block` at `depth == 0`,
    /// true on a freshly-constructed parser), in which case closing it
    /// lands back at `depth == 0` with nothing further to read: there is no
    /// sibling to look ahead for, so this stops cleanly instead of falling
    /// through to another read.
    pub fn next(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        let res = (|| -> Result<bool> {
            match self.state {
                State::Block => {
                    self.skip_block()?;
                    if self.depth == 0 {
                        return Ok(false);
                    }
                }
                State::BlockEnd if self.depth == 0 => return Err(Error::BlockEnded),
                State::InBlock | State::Val | State::BlockEnd | State::Name => {}
                _ => return Err(Error::WrongState),
            }
            self.read_next_sibling()
        })();
        match res {
            Ok(v) => v,
            Err(e) => { self.error = Some(e); false }
        }
    }

    pub fn next_ensure(&mut self, expected: ValueType) -> bool {
        if !self.next() {
            return false;
        }
        if self.val_type != expected {
            self.error = Some(Error::WrongType);
            return false;
        }
        true
    }

    /// Scans forward through the current object (whose keys must already
    /// be in ascending order) looking for `name`. `NoFieldName` is cleared
    /// automatically on entry so callers may probe successive keys in
    /// ascending order without an explicit reset between calls.
    pub fn field_ensure(&mut self, name: &str, expected: ValueType) -> bool {
        self.field_ensure_bytes(name.as_bytes(), expected)
    }

    pub fn field_ensure_bytes(&mut self, name: &[u8], expected: ValueType) -> bool {
        match self.error {
            Some(Error::NoFieldName) => self.error = None,
            Some(_) => return false,
            None => {}
        }
        if !(self.depth > 0 && self.stack[self.depth - 1].kind == ValueType::Object) {
            self.error = Some(Error::WrongType);
            return false;
        }
        let res = (|| -> Result<()> {
            loop {
                match self.state {
                    State::InBlock | State::Val | State::BlockEnd => {
                        self.read_token()?;
                    }
                    State::Name => {
                        let cur = self.name.ok_or(Error::WrongState)?;
                        match cur.cmp(name) {
                            core::cmp::Ordering::Equal => {
                                self.read_token()?;
                                return Ok(());
                            }
                            core::cmp::Ordering::Greater => return Err(Error::NoFieldName),
                            core::cmp::Ordering::Less => {
                                self.skip_value()?;
                                self.read_token()?;
                            }
                        }
                    }
                    State::InBlockEnd => return Err(Error::NoFieldName),
                    _ => return Err(Error::WrongState),
                }
            }
        })();
        match res {
            Ok(()) => {
                if self.val_type != expected {
                    self.error = Some(Error::WrongType);
                    return false;
                }
                true
            }
            Err(e) => { self.error = Some(e); false }
        }
    }

    /// Captures the byte range of the container whose begin tag was just
    /// read (`state == Block`), consuming it in the process.
    pub fn get_raw(&mut self) -> Option<&'a [u8]> {
        if self.error.is_some() {
            return None;
        }
        if self.state != State::Block {
            self.error = Some(Error::WrongState);
            return None;
        }
        let start = self.io.pos() - 1;
        if let Err(e) = self.skip_block() {
            self.error = Some(e);
            return None;
        }
        let end = self.io.pos();
        Some(&self.io.full()[start..end])
    }

    /// Copies the subtree at the current `Block` position into `writer`
    /// without re-encoding it.
    pub fn to_writer(&mut self, writer: &mut crate::writer::Writer<'_>) -> bool {
        match self.get_raw() {
            Some(bytes) => {
                writer.raw(bytes);
                writer.error().is_none()
            }
            None => false,
        }
    }

    /// Validates every remaining sibling (and everything nested under
    /// them) from the current position to the end of the current
    /// container, walking nested containers via the explicit depth stack.
    ///
    /// Non-destructive: the parser's position, state and depth are restored
    /// to exactly where they were before the call, whether verification
    /// succeeds or fails, so `verify()` can be called right after
    /// construction — before any `go_into`/`go_into_object` — and the
    /// caller can still descend into the root afterward. (Registered
    /// callback side effects from the walk itself are not undone, matching
    /// the real transitions a callback would otherwise see.)
    pub fn verify(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }

        let io = self.io.clone();
        let state = self.state;
        let depth = self.depth;
        let stack = self.stack;
        let val_type = self.val_type;
        let val_bool = self.val_bool;
        let val_int = self.val_int;
        let val_double = self.val_double;
        let val_bytes = self.val_bytes;
        let name = self.name;

        let res = loop {
            if !self.next() {
                break self.error;
            }
        };

        self.io = io;
        self.state = state;
        self.depth = depth;
        self.stack = stack;
        self.val_type = val_type;
        self.val_bool = val_bool;
        self.val_int = val_int;
        self.val_double = val_double;
        self.val_bytes = val_bytes;
        self.name = name;

        match res {
            None => {
                self.error = None;
                true
            }
            Some(e) => {
                self.error = Some(e);
                false
            }
        }
    }
}
