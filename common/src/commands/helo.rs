use std::borrow::Cow;

use bytes::BytesMut;

use crate::decoding::Parsable;
use crate::{InvalidData, ProtocolError};
use smfi_utils::ByteParsing;

/// Helo information sent by the smtp client
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Helo {
    buffer: BytesMut,
}

impl Helo {
    const ITEM: &'static str = "Helo";

    /// The helo greeting sent by the client
    #[must_use]
    pub fn helo(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.buffer[..])
    }
}

impl Parsable for Helo {
    const CODE: u8 = b'H';

    fn parse(mut buffer: BytesMut) -> Result<Self, ProtocolError> {
        let Some(helo) = buffer.delimited(0) else {
            return Err(InvalidData::new(
                Self::ITEM,
                "missing null byte termination",
                buffer,
            )
            .into());
        };

        if !buffer.is_empty() {
            return Err(InvalidData::trailing(Self::ITEM, buffer).into());
        }

        Ok(Self { buffer: helo })
    }
}
