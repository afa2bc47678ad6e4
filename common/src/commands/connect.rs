use std::borrow::Cow;

use bytes::BytesMut;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::decoding::Parsable;
use crate::{InvalidData, NotEnoughData, ProtocolError};
use smfi_utils::ByteParsing;

/// A marker for the connection family
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Family {
    Unknown = b'U',
    Unix = b'L',
    Inet = b'4',
    Inet6 = b'6',
}

impl Family {
    fn parse(code: u8) -> Result<Self, ProtocolError> {
        Family::try_from(code).map_err(|_| {
            InvalidData::new(
                Connect::ITEM,
                "unknown protocol family",
                BytesMut::from_iter([code]),
            )
            .into()
        })
    }

    /// Whether a port is meaningful for this family
    #[must_use]
    pub fn has_port(self) -> bool {
        matches!(self, Family::Inet | Family::Inet6)
    }
}

/// Connect information about the smtp client
///
/// Layout: `hostname\0 family [port:u16 address\0]`. The port and address
/// are absent for [`Family::Unknown`].
#[derive(Clone, PartialEq, Debug)]
pub struct Connect {
    hostname: BytesMut,
    /// The connection type of the smtp client
    pub family: Family,
    /// On an IP connection, the port of the connection
    pub port: Option<u16>,
    address: BytesMut,
}

impl Connect {
    const ITEM: &'static str = "Connect";

    /// Get the received hostname as as string-like type.
    #[must_use]
    pub fn hostname(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.hostname)
    }

    /// Get the received address as a string-like type.
    ///
    /// Remember, this can contain an IP-Address or a unix socket path.
    #[must_use]
    pub fn address(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.address)
    }
}

impl Parsable for Connect {
    const CODE: u8 = b'C';

    fn parse(mut buffer: BytesMut) -> Result<Self, ProtocolError> {
        let Some(hostname) = buffer.delimited(0) else {
            return Err(InvalidData::new(
                Self::ITEM,
                "null byte missing to delimit hostname",
                buffer,
            )
            .into());
        };

        let Some(family) = buffer.safe_get_u8() else {
            return Err(NotEnoughData::new(Self::ITEM, "family missing", 1, buffer).into());
        };
        let family = Family::parse(family)?;

        if family == Family::Unknown {
            if !buffer.is_empty() {
                return Err(InvalidData::trailing(Self::ITEM, buffer).into());
            }
            return Ok(Self {
                hostname,
                family,
                port: None,
                address: BytesMut::new(),
            });
        }

        let Some(port) = buffer.safe_get_u16() else {
            return Err(NotEnoughData::new(Self::ITEM, "port missing", 2, buffer).into());
        };

        let Some(address) = buffer.delimited(0) else {
            return Err(InvalidData::new(
                Self::ITEM,
                "null byte missing to terminate address",
                buffer,
            )
            .into());
        };

        if !buffer.is_empty() {
            return Err(InvalidData::trailing(Self::ITEM, buffer).into());
        }

        Ok(Self {
            hostname,
            family,
            port: family.has_port().then_some(port),
            address,
        })
    }
}
