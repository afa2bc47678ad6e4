use async_trait::async_trait;

use smfi_common::{
    commands::{Body, Connect, Header, Helo, Mail, Recipient, Unknown},
    optneg::{Capability, Protocol},
};

use crate::SessionContext;

bitflags::bitflags! {
    /// The stages a [`Milter`] wants to be called for.
    ///
    /// Stages not in this set are answered by the dispatcher with their
    /// default, without decoding the payload.
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
    pub struct Stages: u16 {
        /// [`Milter::negotiate`]
        const NEGOTIATE = 1 << 0;
        /// [`Milter::connect`]
        const CONNECT = 1 << 1;
        /// [`Milter::helo`]
        const HELO = 1 << 2;
        /// [`Milter::mail`]
        const MAIL = 1 << 3;
        /// [`Milter::rcpt`]
        const RCPT = 1 << 4;
        /// [`Milter::data`]
        const DATA = 1 << 5;
        /// [`Milter::header`]
        const HEADER = 1 << 6;
        /// [`Milter::end_of_header`]
        const END_OF_HEADER = 1 << 7;
        /// [`Milter::body`]
        const BODY = 1 << 8;
        /// [`Milter::end_of_body`]
        const END_OF_BODY = 1 << 9;
        /// [`Milter::unknown`]
        const UNKNOWN = 1 << 10;
        /// [`Milter::abort`]
        const ABORT = 1 << 11;
        /// [`Milter::close`]
        const CLOSE = 1 << 12;
    }
}

/// What a handler decided about the current mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Go on with the next stage
    #[doc(alias = "SMFIS_CONTINUE")]
    Continue,
    /// Reject the command or mail
    #[doc(alias = "SMFIS_REJECT")]
    Reject,
    /// Accept the mail but silently drop it
    #[doc(alias = "SMFIS_DISCARD")]
    Discard,
    /// Accept the mail without calling the filter again
    #[doc(alias = "SMFIS_ACCEPT")]
    Accept,
    /// Ask the smtp client to try again later
    #[doc(alias = "SMFIS_TEMPFAIL")]
    Tempfail,
    /// Nothing to answer, the "no reply" protocol flag was negotiated
    #[doc(alias = "SMFIS_NOREPLY")]
    NoReply,
    /// Skip further calls of the same kind for this mail
    #[doc(alias = "SMFIS_SKIP")]
    Skip,
}

/// The answer of [`Milter::negotiate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiateReply {
    /// Take everything that was offered
    #[doc(alias = "SMFIS_ALL_OPTS")]
    AllOptions,
    /// Take exactly these flags.
    ///
    /// Each word must be a subset of what was offered, otherwise the
    /// connection is aborted.
    Replace {
        /// The actions this filter may perform
        actions: Capability,
        /// The protocol flags to use
        protocol: Protocol,
    },
    /// Refuse to work with this MTA, the connection is aborted.
    Refuse(Status),
}

/// A trait to implement a mail filter.
///
/// Every stage has a default, but it is only called if the stage is
/// included in [`Milter::stages`].
///
/// See the examples on how to implement this.
#[async_trait]
pub trait Milter: Send {
    /// The stages this filter handles.
    fn stages(&self) -> Stages;

    /// Pick the actions and protocol flags for this connection.
    ///
    /// Only called if MTA and filter both speak protocol version 6 or later.
    #[doc(alias = "SMFIC_OPTNEG")]
    #[doc(alias = "xxfi_negotiate")]
    async fn negotiate(
        &mut self,
        _ctx: &SessionContext,
        _actions: Capability,
        _protocol: Protocol,
    ) -> NegotiateReply {
        NegotiateReply::AllOptions
    }

    /// Connection information about the smtp connection.
    #[doc(alias = "SMFIC_CONNECT")]
    #[doc(alias = "xxfi_connect")]
    async fn connect(&mut self, _ctx: &SessionContext, _connect: Connect) -> Status {
        Status::Continue
    }

    /// The helo name sent by the smtp client.
    #[doc(alias = "SMFIC_HELO")]
    #[doc(alias = "xxfi_helo")]
    async fn helo(&mut self, _ctx: &SessionContext, _helo: Helo) -> Status {
        Status::Continue
    }

    /// The sender this email is from.
    #[doc(alias = "SMFIC_MAIL")]
    #[doc(alias = "xxfi_envfrom")]
    async fn mail(&mut self, _ctx: &SessionContext, _mail: Mail) -> Status {
        Status::Continue
    }

    /// A recipient to which this mail is to be transmitted to.
    #[doc(alias = "SMFIC_RCPT")]
    #[doc(alias = "xxfi_envrcpt")]
    async fn rcpt(&mut self, _ctx: &SessionContext, _recipient: Recipient) -> Status {
        Status::Continue
    }

    /// Called before data (=body + headers) is sent.
    #[doc(alias = "SMFIC_DATA")]
    #[doc(alias = "xxfi_data")]
    async fn data(&mut self, _ctx: &SessionContext) -> Status {
        Status::Continue
    }

    /// A single header with it's name and value.
    ///
    /// Header names are not unique and might be received multiple times.
    #[doc(alias = "SMFIC_HEADER")]
    #[doc(alias = "xxfi_header")]
    async fn header(&mut self, _ctx: &SessionContext, _header: Header) -> Status {
        Status::Continue
    }

    /// Called after all headers have been sent.
    #[doc(alias = "SMFIC_EOH")]
    #[doc(alias = "xxfi_eoh")]
    async fn end_of_header(&mut self, _ctx: &SessionContext) -> Status {
        Status::Continue
    }

    /// A body part was received.
    ///
    /// This may be called multiple times until the whole body was transmitted.
    #[doc(alias = "SMFIC_BODY")]
    #[doc(alias = "xxfi_body")]
    async fn body(&mut self, _ctx: &SessionContext, _body: Body) -> Status {
        Status::Continue
    }

    /// Called after all body parts have been received.
    #[doc(alias = "SMFIC_BODYEOB")]
    #[doc(alias = "xxfi_eom")]
    async fn end_of_body(&mut self, _ctx: &SessionContext) -> Status {
        Status::Continue
    }

    /// An smtp command the MTA did not recognize.
    #[doc(alias = "SMFIC_UNKNOWN")]
    #[doc(alias = "xxfi_unknown")]
    async fn unknown(&mut self, _ctx: &SessionContext, _cmd: Unknown) -> Status {
        Status::Continue
    }

    /// The current mail is aborted.
    ///
    /// The connection stays open for the next mail.
    #[doc(alias = "SMFIC_ABORT")]
    #[doc(alias = "xxfi_abort")]
    async fn abort(&mut self, _ctx: &SessionContext) -> Status {
        Status::Continue
    }

    /// The MTA closes this connection. The answer is ignored.
    #[doc(alias = "SMFIC_QUIT")]
    #[doc(alias = "xxfi_close")]
    async fn close(&mut self, _ctx: &SessionContext) {}
}
