//! Implement what components may write to the wire

use bytes::BytesMut;
use enum_dispatch::enum_dispatch;

use super::actions::{Accept, Action, Continue, Discard, Reject, Skip, Tempfail};
use super::optneg::OptNeg;

/// Write something 'to the wire'.
///
/// Only the payload is written, the transport prepends length and code.
#[enum_dispatch(ServerMessage)]
#[enum_dispatch(Action)]
pub trait Writable {
    /// Write self to the buffer
    fn write(&self, buffer: &mut BytesMut);

    /// Byte-length that would be written if [`Self::write`] is called
    fn len(&self) -> usize;

    /// The (unique) id code of this item
    fn code(&self) -> u8;

    /// Whether a call to [`Self::write`] would write nothing
    fn is_empty(&self) -> bool;
}

/// Messages sent by the filter to the MTA
#[enum_dispatch]
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// The negotiated options
    Optneg(OptNeg),
    /// Control flow answer to the last command
    Action,
}
