//! Panic free primitives to take milter packets apart.
//!
//! Every method returns `None` instead of panicking if the buffer is too
//! short or a terminator is missing. Callers turn that into a proper error.

use std::mem::size_of;

use bytes::{Buf, BytesMut};

/// Checked reads on a byte buffer
pub trait ByteParsing {
    /// Split off everything up to `delimiter` and consume the delimiter.
    fn delimited(&mut self, delimiter: u8) -> Option<BytesMut>;
    /// Split off exactly `at` bytes from the front.
    fn safe_split_to(&mut self, at: usize) -> Option<BytesMut>;
    /// Read a single byte.
    fn safe_get_u8(&mut self) -> Option<u8>;
    /// Read a big endian `u16`.
    fn safe_get_u16(&mut self) -> Option<u16>;
    /// Read a big endian `u32`.
    fn safe_get_u32(&mut self) -> Option<u32>;
    /// Split the whole buffer into null terminated strings.
    ///
    /// Returns `None` if anything is left after the last null byte.
    fn c_strings(&mut self) -> Option<Vec<BytesMut>>;
}

impl ByteParsing for BytesMut {
    fn delimited(&mut self, delimiter: u8) -> Option<BytesMut> {
        let index = self.iter().position(|&b| b == delimiter)?;

        let off = self.split_to(index);
        self.advance(1);

        Some(off)
    }

    fn safe_split_to(&mut self, at: usize) -> Option<Self> {
        if at > self.len() {
            return None;
        }
        Some(self.split_to(at))
    }

    fn safe_get_u8(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        Some(self.get_u8())
    }

    fn safe_get_u16(&mut self) -> Option<u16> {
        if self.len() < size_of::<u16>() {
            return None;
        }
        Some(self.get_u16())
    }

    fn safe_get_u32(&mut self) -> Option<u32> {
        if self.len() < size_of::<u32>() {
            return None;
        }
        Some(self.get_u32())
    }

    fn c_strings(&mut self) -> Option<Vec<BytesMut>> {
        if self.last().is_some_and(|&b| b != 0) {
            return None;
        }

        let mut strings = Vec::with_capacity(bytecount::count(self, 0));
        while !self.is_empty() {
            strings.push(self.delimited(0)?);
        }
        Some(strings)
    }
}
