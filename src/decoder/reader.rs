//! Primitive reader for the msgpack subset used by Algorand transactions
//!
//! The reader is a cursor over an immutable byte slice. Every read checks the
//! remaining length before touching the buffer; a failed read leaves the
//! cursor where it was.
//!
//! Supported wire forms:
//! - integers: positive fixint, uint8/16/32/64 (big-endian)
//! - strings: fixstr, str8
//! - binaries: bin8, bin16
//! - maps: fixmap, map16
//! - arrays: fixarray, array16
//! - booleans
//!
//! The 32-bit length forms (and str16/str32) are rejected with a dedicated
//! "not supported" error so an unexpected producer is easy to diagnose.

use super::error::{ParserError, ParserResult};
use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

// Msgpack tag bytes
pub const FIXINT_0: u8 = 0x00;
pub const FIXINT_127: u8 = 0x7f;
pub const FIXMAP_0: u8 = 0x80;
pub const FIXMAP_15: u8 = 0x8f;
pub const FIXARR_0: u8 = 0x90;
pub const FIXARR_15: u8 = 0x9f;
pub const FIXSTR_0: u8 = 0xa0;
pub const FIXSTR_31: u8 = 0xbf;
pub const BOOL_FALSE: u8 = 0xc2;
pub const BOOL_TRUE: u8 = 0xc3;
pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;
pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;
pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;
pub const ARR16: u8 = 0xdc;
pub const ARR32: u8 = 0xdd;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

/// Longest top-level key name accepted while seeking (exclusive)
pub const MAX_KEY_LEN: usize = 20;

/// Nested containers deeper than this are refused by [`Reader::skip_value`]
pub const MAX_NESTING_DEPTH: usize = 8;

/// Cursor over an immutable msgpack buffer
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    /// True when the whole input is empty, regardless of the cursor
    pub fn is_buffer_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True once every byte has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Move the cursor back to the start of the buffer
    pub fn rewind(&mut self) {
        self.offset = 0;
    }

    /// Run a compound read, restoring the cursor if any step fails
    fn atomic<T>(&mut self, f: impl FnOnce(&mut Self) -> ParserResult<T>) -> ParserResult<T> {
        let start = self.offset;
        let result = f(self);
        if result.is_err() {
            self.offset = start;
        }
        result
    }

    fn take(&mut self, len: usize) -> ParserResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(ParserError::UnexpectedBufferEnd);
        }
        let bytes = &self.buf[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn peek_u8(&self) -> ParserResult<u8> {
        self.buf
            .get(self.offset)
            .copied()
            .ok_or(ParserError::UnexpectedBufferEnd)
    }

    pub fn read_u8(&mut self) -> ParserResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> ParserResult<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> ParserResult<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> ParserResult<u64> {
        Ok(BigEndian::read_u64(self.take(8)?))
    }

    /// Read `len` raw bytes with no tag
    pub fn read_bytes(&mut self, len: usize) -> ParserResult<&'a [u8]> {
        self.take(len)
    }

    /// Read exactly `N` raw bytes with no tag
    pub fn read_array<const N: usize>(&mut self) -> ParserResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read an unsigned integer in any of its tagged widths
    pub fn read_integer(&mut self) -> ParserResult<u64> {
        self.atomic(|r| {
            let tag = r.read_u8()?;
            match tag {
                FIXINT_0..=FIXINT_127 => Ok(u64::from(tag)),
                UINT8 => Ok(u64::from(r.read_u8()?)),
                UINT16 => Ok(u64::from(r.read_u16()?)),
                UINT32 => Ok(u64::from(r.read_u32()?)),
                UINT64 => r.read_u64(),
                _ => Err(ParserError::IntTypeExpected),
            }
        })
    }

    pub fn read_bool(&mut self) -> ParserResult<bool> {
        self.atomic(|r| match r.read_u8()? {
            BOOL_TRUE => Ok(true),
            BOOL_FALSE => Ok(false),
            _ => Err(ParserError::BoolTypeExpected),
        })
    }

    /// Read a string of fewer than `max_len` bytes
    ///
    /// Only fixstr and str8 are accepted.
    pub fn read_string(&mut self, max_len: usize) -> ParserResult<&'a [u8]> {
        self.atomic(|r| {
            let len = match r.read_u8()? {
                tag @ FIXSTR_0..=FIXSTR_31 => usize::from(tag - FIXSTR_0),
                STR8 => usize::from(r.read_u8()?),
                STR16 | STR32 => return Err(ParserError::StrTypeNotSupported),
                _ => return Err(ParserError::StrTypeExpected),
            };
            if len >= max_len {
                return Err(ParserError::StrTooBig);
            }
            r.take(len)
        })
    }

    /// Read a binary header and return the declared length
    pub fn read_bin_header(&mut self) -> ParserResult<usize> {
        self.atomic(|r| match r.read_u8()? {
            BIN8 => Ok(usize::from(r.read_u8()?)),
            BIN16 => Ok(usize::from(r.read_u16()?)),
            BIN32 => Err(ParserError::BinTypeNotSupported),
            _ => Err(ParserError::BinTypeExpected),
        })
    }

    /// Read a variable binary blob of at most `max_len` bytes
    pub fn read_bin(&mut self, max_len: usize) -> ParserResult<&'a [u8]> {
        self.atomic(|r| {
            let len = r.read_bin_header()?;
            if len > max_len {
                return Err(ParserError::BinUnexpectedSize);
            }
            r.take(len)
        })
    }

    /// Read a bin8 blob whose length must be exactly `N`
    pub fn read_bin_fixed<const N: usize>(&mut self) -> ParserResult<[u8; N]> {
        self.atomic(|r| {
            let len = match r.read_u8()? {
                BIN8 => usize::from(r.read_u8()?),
                BIN16 | BIN32 => return Err(ParserError::BinTypeNotSupported),
                _ => return Err(ParserError::BinTypeExpected),
            };
            if len != N {
                return Err(ParserError::BinUnexpectedSize);
            }
            r.read_array::<N>()
        })
    }

    pub fn read_map_size(&mut self) -> ParserResult<u16> {
        self.atomic(|r| match r.read_u8()? {
            tag @ FIXMAP_0..=FIXMAP_15 => Ok(u16::from(tag - FIXMAP_0)),
            MAP16 => r.read_u16(),
            MAP32 => Err(ParserError::MapTypeNotSupported),
            _ => Err(ParserError::MapTypeExpected),
        })
    }

    /// Read an array header; counts above 255 are refused
    pub fn read_array_size(&mut self) -> ParserResult<u8> {
        self.atomic(|r| match r.read_u8()? {
            tag @ FIXARR_0..=FIXARR_15 => Ok(tag - FIXARR_0),
            ARR16 => {
                let size = r.read_u16()?;
                u8::try_from(size).map_err(|_| ParserError::UnexpectedNumberItems)
            }
            ARR32 => Err(ParserError::ArrayTypeNotSupported),
            _ => Err(ParserError::ArrayTypeExpected),
        })
    }

    /// Position the cursor at the value of top-level `key`
    ///
    /// Scans the top-level map from the start of the buffer, skipping the
    /// values of every other key. Returns [`ParserError::NoData`] when the key
    /// is absent.
    pub fn find_key(&mut self, key: &str) -> ParserResult<()> {
        self.rewind();
        let entries = self.read_map_size()?;
        for _ in 0..entries {
            let name = self.read_string(MAX_KEY_LEN)?;
            if name == key.as_bytes() {
                return Ok(());
            }
            self.skip_value()?;
        }
        Err(ParserError::NoData)
    }

    /// Skip over one value of any supported type without interpreting it
    pub fn skip_value(&mut self) -> ParserResult<()> {
        self.atomic(|r| r.skip_nested(0))
    }

    fn skip_nested(&mut self, depth: usize) -> ParserResult<()> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(ParserError::NestingTooDeep);
        }
        match self.peek_u8()? {
            FIXINT_0..=FIXINT_127 | UINT8..=UINT64 => {
                self.read_integer()?;
            }
            FIXMAP_0..=FIXMAP_15 | MAP16 | MAP32 => {
                let entries = self.read_map_size()?;
                for _ in 0..entries {
                    self.skip_nested(depth + 1)?;
                    self.skip_nested(depth + 1)?;
                }
            }
            FIXARR_0..=FIXARR_15 | ARR16 | ARR32 => {
                let items = self.read_array_size()?;
                for _ in 0..items {
                    self.skip_nested(depth + 1)?;
                }
            }
            FIXSTR_0..=FIXSTR_31 | STR8 | STR16 | STR32 => {
                // Longest str8 is 255 bytes
                self.read_string(usize::from(u8::MAX) + 1)?;
            }
            BOOL_FALSE | BOOL_TRUE => {
                self.read_bool()?;
            }
            BIN8 | BIN16 | BIN32 => {
                let len = self.read_bin_header()?;
                self.take(len)?;
            }
            tag => {
                debug!("Cannot skip msgpack value with tag 0x{:02x}", tag);
                return Err(ParserError::UnexpectedValue);
            }
        }
        Ok(())
    }
}
