use smfi_common::{
    actions::{Accept, Action, Continue, Discard, Reject, Skip, Tempfail},
    decoding::Stage,
    encoding::ServerMessage,
};

use crate::{SessionContext, Status};

/// What a dispatched command resulted in.
///
/// The transport turns this into a reply with [`Outcome::reply`] and closes
/// the connection on a [terminal](Outcome::is_terminal) one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Go on with the next stage
    #[doc(alias = "SMFIS_CONTINUE")]
    Continue,
    /// Reject the command or mail
    #[doc(alias = "SMFIS_REJECT")]
    Reject,
    /// Accept the mail but silently drop it
    #[doc(alias = "SMFIS_DISCARD")]
    Discard,
    /// Accept the mail
    #[doc(alias = "SMFIS_ACCEPT")]
    Accept,
    /// Ask the smtp client to try again later
    #[doc(alias = "SMFIS_TEMPFAIL")]
    Tempfail,
    /// Nothing to answer
    #[doc(alias = "SMFIS_NOREPLY")]
    NoReply,
    /// Skip further calls of the same kind
    #[doc(alias = "SMFIS_SKIP")]
    Skip,
    /// Option negotiation completed, answer with the negotiated options
    #[doc(alias = "_SMFIS_OPTIONS")]
    Options,
    /// The command was stored, nothing to answer
    #[doc(alias = "_SMFIS_KEEP")]
    Keep,
    /// A structurally broken payload was received
    #[doc(alias = "_SMFIS_FAIL")]
    Fail,
    /// Decoding, negotiation or sequencing failed
    #[doc(alias = "_SMFIS_ABORT")]
    Abort,
    /// The MTA quit the connection
    Close,
}

impl From<Status> for Outcome {
    fn from(status: Status) -> Self {
        match status {
            Status::Continue => Self::Continue,
            Status::Reject => Self::Reject,
            Status::Discard => Self::Discard,
            Status::Accept => Self::Accept,
            Status::Tempfail => Self::Tempfail,
            Status::NoReply => Self::NoReply,
            Status::Skip => Self::Skip,
        }
    }
}

impl Outcome {
    /// Whether the connection has to be closed.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Fail | Self::Abort | Self::Close)
    }

    /// The message to send to the MTA after `stage` resulted in `self`.
    ///
    /// A [`Outcome::NoReply`] is answered with continue if the MTA was not
    /// told to skip the reply for this stage.
    #[must_use]
    pub fn reply(self, stage: Stage, ctx: &SessionContext) -> Option<ServerMessage> {
        let action: Action = match self {
            Self::Continue => Continue.into(),
            Self::Reject => Reject.into(),
            Self::Discard => Discard.into(),
            Self::Accept => Accept.into(),
            Self::Tempfail => Tempfail.into(),
            Self::Skip => Skip.into(),
            Self::NoReply if ctx.expects_reply(stage) => Continue.into(),
            Self::Options => return ctx.negotiation_reply().map(ServerMessage::from),
            Self::NoReply | Self::Keep | Self::Fail | Self::Abort | Self::Close => return None,
        };
        Some(action.into())
    }
}
