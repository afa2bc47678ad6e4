use bytes::BytesMut;

use crate::decoding::Parsable;
use crate::ProtocolError;

/// An SMTP command the MTA did not recognise, passed on as is.
#[derive(Clone, PartialEq, Debug)]
pub struct Unknown {
    data: BytesMut,
}

impl Unknown {
    /// The raw command line.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Parsable for Unknown {
    const CODE: u8 = b'U';

    fn parse(mut data: BytesMut) -> Result<Self, ProtocolError> {
        if data.last() == Some(&0) {
            data.truncate(data.len() - 1);
        }
        Ok(Self { data })
    }
}
