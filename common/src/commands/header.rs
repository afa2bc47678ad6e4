use std::borrow::Cow;

use bytes::BytesMut;

use crate::decoding::Parsable;
use crate::InvalidData;
use crate::ProtocolError;
use smfi_utils::ByteParsing;

/// A single message header, name and value as received
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Header {
    name: BytesMut,
    value: BytesMut,
}

impl Header {
    const ITEM: &'static str = "Header";

    /// The name of the received header
    #[must_use]
    pub fn name(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.name)
    }

    /// The value of the received header
    #[must_use]
    pub fn value(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.value)
    }
}

impl Parsable for Header {
    const CODE: u8 = b'L';

    fn parse(mut buffer: BytesMut) -> Result<Self, ProtocolError> {
        let Some(name) = buffer.delimited(0) else {
            return Err(InvalidData::new(
                Self::ITEM,
                "name not terminated by null byte",
                buffer,
            )
            .into());
        };

        let Some(value) = buffer.delimited(0) else {
            return Err(InvalidData::new(
                Self::ITEM,
                "value not terminated by null byte",
                buffer,
            )
            .into());
        };

        if !buffer.is_empty() {
            return Err(InvalidData::trailing(Self::ITEM, buffer).into());
        }

        Ok(Self { name, value })
    }
}

/// After all headers have been sent, end of header is sent
#[derive(Clone, PartialEq, Debug, Default)]
pub struct EndOfHeader;

impl Parsable for EndOfHeader {
    const CODE: u8 = b'N';

    fn parse(_buffer: BytesMut) -> Result<Self, ProtocolError> {
        Ok(Self)
    }
}
