use bytes::BytesMut;

use crate::decoding::Parsable;
use crate::ProtocolError;

/// The MTA closes this connection
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Quit;

impl Parsable for Quit {
    const CODE: u8 = b'Q';

    fn parse(_buffer: BytesMut) -> Result<Self, ProtocolError> {
        Ok(Self)
    }
}
