//! Implement what components may be parsed from the wire

use bytes::{Buf, BytesMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::actions::{Abort, Quit};
use crate::commands::{
    Body, Connect, Data, EndOfBody, EndOfHeader, Header, Helo, Macro, Mail, Recipient, Unknown,
};
use crate::optneg::OptNeg;
use crate::{InvalidData, NotEnoughData, ProtocolError};

/// Parse something 'from the wire'.
pub trait Parsable: Sized {
    /// The unique id code for this item
    const CODE: u8;

    /// Parse a `Self` from the given `BytesMut` buffer.
    ///
    /// # Errors
    /// This can fail to parse, returning a [`ProtocolError`].
    fn parse(buffer: BytesMut) -> Result<Self, ProtocolError>;
}

/// The commands an MTA may send, by their wire code.
#[allow(missing_docs)]
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, strum::Display,
)]
#[repr(u8)]
pub enum Stage {
    Abort = b'A',
    Body = b'B',
    Connect = b'C',
    Macro = b'D',
    EndOfBody = b'E',
    Helo = b'H',
    Header = b'L',
    Mail = b'M',
    EndOfHeader = b'N',
    OptNeg = b'O',
    Quit = b'Q',
    Recipient = b'R',
    Data = b'T',
    Unknown = b'U',
}

impl Stage {
    /// Every stage, ordered by wire code.
    pub const ALL: [Stage; 14] = [
        Self::Abort,
        Self::Body,
        Self::Connect,
        Self::Macro,
        Self::EndOfBody,
        Self::Helo,
        Self::Header,
        Self::Mail,
        Self::EndOfHeader,
        Self::OptNeg,
        Self::Quit,
        Self::Recipient,
        Self::Data,
        Self::Unknown,
    ];

    /// Look up the stage for a wire code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::try_from(code).ok()
    }

    /// The wire code of this stage.
    #[must_use]
    pub fn code(self) -> u8 {
        self.into()
    }
}

macro_rules! parse_command {
    ($container_name:ident, $($variant:ident),+$(,)?) => {
        /// See the contained variants for more.
        #[allow(missing_docs)]
        #[derive(Debug, Clone)]
        pub enum $container_name {
            $($variant($variant),)+
        }

        impl $container_name {
            /// Parse a frame, code first, into this structured data
            ///
            /// # Errors
            /// This fn may return errors if the received data did not match
            /// valid data for this command.
            pub fn parse(mut buffer: BytesMut) -> Result<Self, ProtocolError> {
                if buffer.is_empty() {
                    return Err(NotEnoughData::new(
                        "Command",
                        "code missing to detect which command it is",
                        1,
                        buffer,
                    )
                    .into());
                }
                let code = buffer.get_u8();
                let Some(stage) = Stage::from_code(code) else {
                    return Err(InvalidData::new(
                        "Command",
                        "unknown command code",
                        BytesMut::from_iter([code]),
                    )
                    .into());
                };
                Self::parse_payload(stage, buffer)
            }

            /// Parse the payload of a frame already known to be `stage`.
            ///
            /// # Errors
            /// If the payload is not valid for `stage`.
            pub fn parse_payload(stage: Stage, payload: BytesMut) -> Result<Self, ProtocolError> {
                match stage {
                    $(Stage::$variant => Ok($variant::parse(payload)?.into()),)+
                }
            }

            /// The stage this command belongs to.
            #[must_use]
            pub fn stage(&self) -> Stage {
                match self {
                    $(Self::$variant(_) => Stage::$variant,)+
                }
            }
        }

        $(impl From<$variant> for $container_name {
            fn from(value: $variant) -> Self {
                Self::$variant(value)
            }
        })+
    }
}

// Parse a command sent by the MTA.
parse_command!(
    // The name of this enum
    StageCommand,
    // Milter control
    Abort,
    OptNeg,
    Quit,
    // Special info
    Macro,
    Unknown,
    // SMTP opening
    Connect,
    Helo,
    // Envelope
    Mail,
    Recipient,
    // Header
    Data,
    Header,
    EndOfHeader,
    // Body
    Body,
    EndOfBody,
);
