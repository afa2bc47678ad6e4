use smfi_common::{decoding::Stage, ProtocolError};
use thiserror::Error;

use crate::{Phase, Status};

/// Why a command could not be processed.
///
/// Any of these end the connection, the dispatcher answers
/// [`Outcome::Fail`](crate::Outcome::Fail) or
/// [`Outcome::Abort`](crate::Outcome::Abort).
#[derive(Debug, Error)]
pub enum Error {
    /// The payload could not be decoded or negotiation failed
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// The command is not allowed at this point of the session
    #[error("'{stage}' is not allowed in phase {phase:?}")]
    OutOfSequence {
        /// The command received
        stage: Stage,
        /// Where the session was at
        phase: Phase,
    },
    /// The filter refused the offered options
    #[error("negotiation refused by the filter with {status:?}")]
    Refused {
        /// What the filter answered
        status: Status,
    },
    /// A command code that does not exist in the protocol
    #[error("unknown command code {code:#04x}")]
    UnknownCommand {
        /// The code received
        code: u8,
    },
}
