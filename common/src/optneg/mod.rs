//! Contains anything related to option negotiation between MTA and filter

mod capability;
mod protocol;

use bytes::BytesMut;
use thiserror::Error;

use crate::decoding::Parsable;
use crate::encoding::Writable;
use crate::{InvalidData, NotEnoughData, ProtocolError};
use smfi_utils::ByteParsing;

pub use capability::Capability;
pub use protocol::Protocol;

/// `SMFIC_OPTNEG`, sent by the MTA and answered by the filter
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OptNeg {
    /// The milter protocol version
    pub version: u32,
    /// Which modifications the filter may send back
    pub capabilities: Capability,
    /// How the MTA should behave using this protocol
    pub protocol: Protocol,
}

impl Default for OptNeg {
    fn default() -> Self {
        Self {
            version: Self::VERSION,
            capabilities: Capability::default(),
            protocol: Protocol::default(),
        }
    }
}

/// Raised when MTA and filter can not agree on how to talk to each other.
#[derive(Debug, Error)]
pub enum CompatibilityError {
    /// The MTA speaks a version too old for this library
    #[error("received version {received}, at least {minimum} is required")]
    UnsupportedVersion {
        /// The version received
        received: u32,
        /// The lowest version supported
        minimum: u32,
    },
    /// A negotiate hook asked for more than was offered to it
    #[error("{field} 0x{requested:08x} exceed the offered 0x{offered:08x}")]
    ExceedsOffer {
        /// Which flag word was too wide
        field: &'static str,
        /// What the hook returned
        requested: u32,
        /// What it had been offered
        offered: u32,
    },
    /// The filter declared actions the MTA does not support
    #[error("declared actions 0x{declared:08x} not covered by the mta's 0x{offered:08x}")]
    MissingActions {
        /// What the filter declared
        declared: u32,
        /// What the MTA supports
        offered: u32,
    },
}

impl OptNeg {
    /// Highest protocol version this library speaks
    pub const VERSION: u32 = 6;
    /// Lowest protocol version this library accepts
    pub const MIN_VERSION: u32 = 2;
    /// Version from which on a filter may override the offered flags
    pub const NEGOTIATE_VERSION: u32 = 6;

    const DATA_SIZE: usize = 4 + 4 + 4;
    const ITEM: &'static str = "OptNeg";

    /// Fill in empty flag words the way a version 1 MTA means them.
    #[must_use]
    pub fn with_legacy_defaults(mut self) -> Self {
        if self.capabilities.is_empty() {
            self.capabilities = Capability::V1;
        }
        if self.protocol.is_empty() {
            self.protocol = Protocol::V1;
        }
        self
    }

    /// The version both sides can speak.
    ///
    /// # Errors
    /// If the received version is below [`OptNeg::MIN_VERSION`].
    pub fn common_version(&self) -> Result<u32, CompatibilityError> {
        if self.version < Self::MIN_VERSION {
            return Err(CompatibilityError::UnsupportedVersion {
                received: self.version,
                minimum: Self::MIN_VERSION,
            });
        }
        Ok(self.version.min(Self::VERSION))
    }

    /// Actions both the MTA and this library support.
    #[must_use]
    pub fn supported_capabilities(&self) -> Capability {
        self.capabilities & Capability::all()
    }

    /// Protocol flags both the MTA and this library support.
    #[must_use]
    pub fn supported_protocol(&self) -> Protocol {
        self.protocol & Protocol::all()
    }

    /// Protocol flags a filter may pick from.
    ///
    /// Includes all "no reply" flags, the library answers for the filter if
    /// the MTA does not know one.
    #[must_use]
    pub fn offered_protocol(&self) -> Protocol {
        self.supported_protocol() | Protocol::NO_REPLY_MASK
    }
}

impl Parsable for OptNeg {
    const CODE: u8 = b'O';

    fn parse(mut buffer: BytesMut) -> Result<Self, ProtocolError> {
        if buffer.len() < Self::DATA_SIZE {
            return Err(NotEnoughData::new(
                Self::ITEM,
                "version and flags missing",
                Self::DATA_SIZE,
                buffer,
            )
            .into());
        }

        let (Some(version), Some(capabilities), Some(protocol)) = (
            buffer.safe_get_u32(),
            buffer.safe_get_u32(),
            buffer.safe_get_u32(),
        ) else {
            return Err(NotEnoughData::new(
                Self::ITEM,
                "version and flags missing",
                Self::DATA_SIZE,
                buffer,
            )
            .into());
        };

        if !buffer.is_empty() {
            return Err(InvalidData::trailing(Self::ITEM, buffer).into());
        }

        Ok(Self {
            version,
            capabilities: Capability::from_bits_retain(capabilities),
            protocol: Protocol::from_bits_retain(protocol),
        })
    }
}

impl Writable for OptNeg {
    fn write(&self, buffer: &mut BytesMut) {
        buffer.extend_from_slice(&self.version.to_be_bytes());
        buffer.extend_from_slice(&self.capabilities.bits().to_be_bytes());
        buffer.extend_from_slice(&self.protocol.bits().to_be_bytes());
    }

    fn len(&self) -> usize {
        Self::DATA_SIZE
    }

    fn code(&self) -> u8 {
        <Self as Parsable>::CODE
    }

    fn is_empty(&self) -> bool {
        false
    }
}
