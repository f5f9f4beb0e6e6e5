// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read cursor for JSON text.
//!
//! Bounds-checked and zero-copy. Every error carries the absolute byte offset
//! into the buffer the cursor was created over, so a cursor forked for a
//! lookahead reports the same offsets as the primary one.

use crate::config::MAX_NESTING_DEPTH;
use crate::error::{Error, Result};

/// Immutable cursor over a JSON document.
#[derive(Debug, Clone)]
pub struct JsonCursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> JsonCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Cursor positioned at `offset`.
    pub fn at(buffer: &'a [u8], offset: usize) -> Self {
        Self { buffer, offset }
    }

    /// Independent copy for lookahead. Advancing the fork never moves `self`.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.buffer.get(self.offset) {
            self.offset += 1;
        }
    }

    /// Next significant byte, without consuming it.
    pub fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.buffer.get(self.offset).copied()
    }

    /// True once only whitespace is left.
    pub fn is_eof(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Consume `byte` if it is the next significant byte.
    pub fn consume_if(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    /// Consume `byte` or fail.
    pub fn expect(&mut self, byte: u8) -> Result<()> {
        match self.peek() {
            Some(b) if b == byte => {
                self.offset += 1;
                Ok(())
            }
            Some(b) => Err(self.syntax(format!(
                "invalid character {:?}, expected {:?}",
                b as char, byte as char
            ))),
            None => Err(self.unexpected_eof()),
        }
    }

    /// Read and unescape a string literal.
    pub fn read_string(&mut self) -> Result<String> {
        match self.peek() {
            Some(b'"') => {}
            Some(b) => {
                return Err(self.syntax(format!(
                    "invalid character {:?} looking for beginning of string",
                    b as char
                )))
            }
            None => return Err(self.unexpected_eof()),
        }

        let start = self.offset;
        let mut pos = start + 1;
        loop {
            match self.buffer.get(pos) {
                Some(b'"') => break,
                Some(b'\\') => pos += 2,
                Some(_) => pos += 1,
                None => {
                    self.offset = self.buffer.len();
                    return Err(self.unexpected_eof());
                }
            }
        }

        let literal = &self.buffer[start..=pos];
        let value = serde_json::from_slice::<String>(literal).map_err(|e| Error::Syntax {
            offset: start,
            reason: e.to_string(),
        })?;
        self.offset = pos + 1;
        Ok(value)
    }

    /// Read a number literal, validated against the JSON number grammar.
    pub fn read_number(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let start = self.offset;
        let buf = self.buffer;
        let mut pos = start;

        let digits = |pos: &mut usize| {
            let begin = *pos;
            while buf.get(*pos).is_some_and(u8::is_ascii_digit) {
                *pos += 1;
            }
            *pos - begin
        };

        if buf.get(pos) == Some(&b'-') {
            pos += 1;
        }
        match buf.get(pos) {
            Some(b'0') => pos += 1,
            Some(b'1'..=b'9') => {
                digits(&mut pos);
            }
            _ => return Err(self.invalid_number(pos)),
        }
        if buf.get(pos) == Some(&b'.') {
            pos += 1;
            if digits(&mut pos) == 0 {
                return Err(self.invalid_number(pos));
            }
        }
        if let Some(b'e' | b'E') = buf.get(pos) {
            pos += 1;
            if let Some(b'+' | b'-') = buf.get(pos) {
                pos += 1;
            }
            if digits(&mut pos) == 0 {
                return Err(self.invalid_number(pos));
            }
        }

        let literal = std::str::from_utf8(&buf[start..pos]).map_err(|e| Error::Syntax {
            offset: start,
            reason: e.to_string(),
        })?;
        self.offset = pos;
        Ok(literal)
    }

    /// Consume one of the `true`, `false` or `null` keywords.
    pub fn read_literal(&mut self, word: &'static str) -> Result<()> {
        self.skip_whitespace();
        let end = self.offset + word.len();
        if self.buffer.get(self.offset..end) == Some(word.as_bytes()) {
            self.offset = end;
            Ok(())
        } else if end > self.buffer.len()
            && self.buffer[self.offset..] == word.as_bytes()[..self.remaining()]
        {
            self.offset = self.buffer.len();
            Err(self.unexpected_eof())
        } else {
            Err(self.syntax(format!("invalid literal, expected {}", word)))
        }
    }

    /// Scan and discard the next value.
    pub fn skip_value(&mut self, depth: usize) -> Result<()> {
        if depth > MAX_NESTING_DEPTH {
            return Err(self.syntax("exceeded max depth".to_string()));
        }
        match self.peek() {
            Some(b'{') => {
                self.offset += 1;
                if self.consume_if(b'}') {
                    return Ok(());
                }
                loop {
                    self.read_string()?;
                    self.expect(b':')?;
                    self.skip_value(depth + 1)?;
                    if !self.consume_if(b',') {
                        return self.expect(b'}');
                    }
                }
            }
            Some(b'[') => {
                self.offset += 1;
                if self.consume_if(b']') {
                    return Ok(());
                }
                loop {
                    self.skip_value(depth + 1)?;
                    if !self.consume_if(b',') {
                        return self.expect(b']');
                    }
                }
            }
            Some(b'"') => self.read_string().map(drop),
            Some(b't') => self.read_literal("true"),
            Some(b'f') => self.read_literal("false"),
            Some(b'n') => self.read_literal("null"),
            Some(b'-' | b'0'..=b'9') => self.read_number().map(drop),
            Some(b) => Err(self.invalid_value_start(b)),
            None => Err(self.unexpected_eof()),
        }
    }

    /// Syntax error at the current offset.
    pub fn syntax(&self, reason: String) -> Error {
        Error::Syntax {
            offset: self.offset,
            reason,
        }
    }

    pub fn unexpected_eof(&self) -> Error {
        self.syntax("unexpected end of JSON input".to_string())
    }

    pub fn invalid_value_start(&self, byte: u8) -> Error {
        self.syntax(format!(
            "invalid character {:?} looking for beginning of value",
            byte as char
        ))
    }

    fn invalid_number(&self, pos: usize) -> Error {
        if pos >= self.buffer.len() {
            return Error::Syntax {
                offset: pos,
                reason: "unexpected end of JSON input".to_string(),
            };
        }
        Error::Syntax {
            offset: pos,
            reason: format!("invalid character {:?} in numeric literal", self.buffer[pos] as char),
        }
    }
}
