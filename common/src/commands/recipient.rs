use std::borrow::Cow;

use bytes::BytesMut;

use super::mail::{lossy_args, parse_envelope};
use crate::decoding::Parsable;
use crate::ProtocolError;

/// An envelope recipient, `RCPT TO`
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Recipient {
    recipient: BytesMut,
    esmtp_args: Vec<BytesMut>,
}

impl Recipient {
    /// The recipient as received from the MTA
    #[must_use]
    pub fn recipient(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.recipient)
    }

    /// Optional esmtp arguments regarding the recipient.
    ///
    /// Returns an empty `Vec` if no esmtp args where received
    #[must_use]
    pub fn esmtp_args(&self) -> Vec<Cow<str>> {
        lossy_args(&self.esmtp_args)
    }
}

impl Parsable for Recipient {
    const CODE: u8 = b'R';

    fn parse(buffer: BytesMut) -> Result<Self, ProtocolError> {
        let (recipient, esmtp_args) = parse_envelope("Recipient", buffer)?;

        Ok(Self {
            recipient,
            esmtp_args,
        })
    }
}
