use std::borrow::Cow;

use bytes::BytesMut;

use crate::decoding::Parsable;
use crate::{InvalidData, ProtocolError};
use smfi_utils::ByteParsing;

/// Split `buffer` into the envelope address and its esmtp arguments.
///
/// Both the address and every argument must be null terminated.
pub(crate) fn parse_envelope(
    item: &'static str,
    mut buffer: BytesMut,
) -> Result<(BytesMut, Vec<BytesMut>), ProtocolError> {
    let Some(address) = buffer.delimited(0) else {
        return Err(InvalidData::new(item, "address not terminated by null byte", buffer).into());
    };

    let Some(esmtp_args) = buffer.c_strings() else {
        return Err(InvalidData::trailing(item, buffer).into());
    };

    Ok((address, esmtp_args))
}

pub(crate) fn lossy_args(args: &[BytesMut]) -> Vec<Cow<str>> {
    args.iter().map(|a| String::from_utf8_lossy(a)).collect()
}

/// The envelope sender of a mail, `MAIL FROM`
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Mail {
    sender: BytesMut,
    esmtp_args: Vec<BytesMut>,
}

impl Mail {
    /// The sender of this email
    #[must_use]
    pub fn sender(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.sender)
    }

    /// Additional esmtp args, empty if none were sent.
    #[must_use]
    pub fn esmtp_args(&self) -> Vec<Cow<str>> {
        lossy_args(&self.esmtp_args)
    }
}

impl Parsable for Mail {
    const CODE: u8 = b'M';

    fn parse(buffer: BytesMut) -> Result<Self, ProtocolError> {
        let (sender, esmtp_args) = parse_envelope("Mail", buffer)?;

        Ok(Self { sender, esmtp_args })
    }
}

/// Sent before headers and body, after all recipients
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Data;

impl Parsable for Data {
    const CODE: u8 = b'T';

    fn parse(_buffer: BytesMut) -> Result<Self, ProtocolError> {
        Ok(Self)
    }
}
