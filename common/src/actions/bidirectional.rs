use bytes::BytesMut;

use crate::decoding::Parsable;
use crate::encoding::Writable;
use crate::ProtocolError;

/// Abort processing of the current mail.
///
/// The connection stays open, the MTA may start the next mail with a new
/// sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abort;

impl Parsable for Abort {
    const CODE: u8 = b'A';

    fn parse(_buffer: BytesMut) -> Result<Self, ProtocolError> {
        Ok(Self)
    }
}

/// Continue with the next step in the milter protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continue;

impl Continue {
    const CODE: u8 = b'c';
}

impl Writable for Continue {
    fn write(&self, _buffer: &mut BytesMut) {}

    fn len(&self) -> usize {
        0
    }

    fn code(&self) -> u8 {
        Self::CODE
    }

    fn is_empty(&self) -> bool {
        true
    }
}
