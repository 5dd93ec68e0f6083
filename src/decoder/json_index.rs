//! Structural indexer for the JSON payload of arbitrary-data requests
//!
//! This is not a JSON parser. It records where each object, array, string and
//! primitive starts and ends so the top-level members can be paged on screen
//! as raw text. Values are never converted or re-serialised.
//!
//! Tokens are stored in document order with a parent link. For an object the
//! parent of a key is the object and the parent of a value is its key, so a
//! member's value always follows its key directly.

use super::error::{ParserError, ParserResult};
use arrayvec::ArrayVec;

/// Upper bound on tokens in one document
pub const MAX_JSON_TOKENS: usize = 128;

/// Deepest nesting accepted
pub const MAX_JSON_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Object,
    Array,
    String,
    Primitive,
}

/// Location of one token in the source text
///
/// For strings `start..end` excludes the quotes; containers include their
/// brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonToken {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// Members for objects, elements for arrays, 1 for an object key
    pub size: u16,
    pub parent: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonIndex {
    tokens: ArrayVec<JsonToken, MAX_JSON_TOKENS>,
}

impl JsonIndex {
    /// Tokenize `text`; the top level must be a single object
    pub fn parse(text: &[u8]) -> ParserResult<Self> {
        let mut tokenizer = Tokenizer {
            text,
            pos: 0,
            tokens: ArrayVec::new(),
        };
        let root = tokenizer.value(None, 0)?;
        tokenizer.skip_whitespace();
        if tokenizer.pos != text.len() {
            return Err(ParserError::BadJson);
        }
        if tokenizer.tokens[root].kind != TokenKind::Object {
            return Err(ParserError::BadJson);
        }
        Ok(Self {
            tokens: tokenizer.tokens,
        })
    }

    pub fn tokens(&self) -> &[JsonToken] {
        &self.tokens
    }

    /// Number of top-level object members
    pub fn member_count(&self) -> usize {
        self.tokens.first().map_or(0, |root| usize::from(root.size))
    }

    /// Key and value tokens of the `n`th top-level member
    pub fn member(&self, n: usize) -> ParserResult<(JsonToken, JsonToken)> {
        let (key_idx, key) = self
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, tok)| tok.parent == Some(0))
            .nth(n)
            .ok_or(ParserError::NoData)?;
        let value = self
            .tokens
            .get(key_idx + 1)
            .copied()
            .ok_or(ParserError::UnexpectedError)?;
        Ok((*key, value))
    }
}

/// Raw source text covered by a token
pub fn token_text<'a>(token: &JsonToken, text: &'a [u8]) -> &'a [u8] {
    text.get(token.start..token.end).unwrap_or_default()
}

/// Remove every backslash, keeping the character it escaped
pub fn strip_backslashes(raw: &[u8]) -> String {
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter();
    while let Some(&b) = bytes.next() {
        if b == b'\\' {
            if let Some(&escaped) = bytes.next() {
                out.push(escaped);
            }
        } else {
            out.push(b);
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

struct Tokenizer<'a> {
    text: &'a [u8],
    pos: usize,
    tokens: ArrayVec<JsonToken, MAX_JSON_TOKENS>,
}

impl<'a> Tokenizer<'a> {
    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> ParserResult<()> {
        if self.peek() != Some(byte) {
            return Err(ParserError::BadJson);
        }
        self.pos += 1;
        Ok(())
    }

    fn push(&mut self, kind: TokenKind, start: usize, parent: Option<usize>) -> ParserResult<usize> {
        let parent = parent
            .map(|p| u16::try_from(p).map_err(|_| ParserError::BadJson))
            .transpose()?;
        let idx = self.tokens.len();
        self.tokens
            .try_push(JsonToken {
                kind,
                start,
                end: start,
                size: 0,
                parent,
            })
            .map_err(|_| ParserError::BadJson)?;
        Ok(idx)
    }

    fn value(&mut self, parent: Option<usize>, depth: usize) -> ParserResult<usize> {
        if depth > MAX_JSON_DEPTH {
            return Err(ParserError::BadJson);
        }
        self.skip_whitespace();
        match self.peek().ok_or(ParserError::BadJson)? {
            b'{' => self.object(parent, depth),
            b'[' => self.array(parent, depth),
            b'"' => self.string(parent),
            b'-' | b'0'..=b'9' | b't' | b'f' | b'n' => self.primitive(parent),
            _ => Err(ParserError::BadJson),
        }
    }

    fn object(&mut self, parent: Option<usize>, depth: usize) -> ParserResult<usize> {
        let idx = self.push(TokenKind::Object, self.pos, parent)?;
        self.expect(b'{')?;
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.tokens[idx].end = self.pos;
            return Ok(idx);
        }
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(ParserError::BadJson);
            }
            let key = self.string(Some(idx))?;
            self.skip_whitespace();
            self.expect(b':')?;
            self.value(Some(key), depth + 1)?;
            self.tokens[key].size = 1;
            self.tokens[idx].size = self.tokens[idx]
                .size
                .checked_add(1)
                .ok_or(ParserError::BadJson)?;
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    self.tokens[idx].end = self.pos;
                    return Ok(idx);
                }
                _ => return Err(ParserError::BadJson),
            }
        }
    }

    fn array(&mut self, parent: Option<usize>, depth: usize) -> ParserResult<usize> {
        let idx = self.push(TokenKind::Array, self.pos, parent)?;
        self.expect(b'[')?;
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.tokens[idx].end = self.pos;
            return Ok(idx);
        }
        loop {
            self.value(Some(idx), depth + 1)?;
            self.tokens[idx].size = self.tokens[idx]
                .size
                .checked_add(1)
                .ok_or(ParserError::BadJson)?;
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    self.tokens[idx].end = self.pos;
                    return Ok(idx);
                }
                _ => return Err(ParserError::BadJson),
            }
        }
    }

    fn string(&mut self, parent: Option<usize>) -> ParserResult<usize> {
        self.expect(b'"')?;
        let start = self.pos;
        loop {
            match self.peek().ok_or(ParserError::BadJson)? {
                b'"' => {
                    let idx = self.push(TokenKind::String, start, parent)?;
                    self.tokens[idx].end = self.pos;
                    self.pos += 1;
                    return Ok(idx);
                }
                b'\\' => {
                    self.pos += 1;
                    match self.peek().ok_or(ParserError::BadJson)? {
                        b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => self.pos += 1,
                        b'u' => {
                            self.pos += 1;
                            for _ in 0..4 {
                                match self.peek() {
                                    Some(c) if c.is_ascii_hexdigit() => self.pos += 1,
                                    _ => return Err(ParserError::BadJson),
                                }
                            }
                        }
                        _ => return Err(ParserError::BadJson),
                    }
                }
                0x00..=0x1f => return Err(ParserError::BadJson),
                _ => self.pos += 1,
            }
        }
    }

    fn primitive(&mut self, parent: Option<usize>) -> ParserResult<usize> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, b' ' | b'\t' | b'\n' | b'\r' | b',' | b']' | b'}' | b':') {
                break;
            }
            if !(0x20..0x7f).contains(&c) {
                return Err(ParserError::BadJson);
            }
            self.pos += 1;
        }
        let literal = &self.text[start..self.pos];
        let valid = match literal {
            b"true" | b"false" | b"null" => true,
            number => {
                // A sign alone is not a number
                let digits = number.strip_prefix(b"-").unwrap_or(number);
                digits.first().is_some_and(u8::is_ascii_digit)
                    && digits
                        .iter()
                        .all(|c| c.is_ascii_digit() || matches!(*c, b'.' | b'e' | b'E' | b'+' | b'-'))
            }
        };
        if !valid {
            return Err(ParserError::BadJson);
        }
        let idx = self.push(TokenKind::Primitive, start, parent)?;
        self.tokens[idx].end = self.pos;
        Ok(idx)
    }
}
