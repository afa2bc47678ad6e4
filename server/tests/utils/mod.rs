use std::collections::HashMap;

use async_trait::async_trait;
use bytes::BytesMut;
use smfi_common::{
    commands::{Body, Connect, Header, Helo, Mail, Recipient, Unknown},
    macros::MacroStage,
    optneg::{Capability, Protocol},
};
use smfi_server::{
    Config, Dispatcher, Milter, NegotiateReply, SequencePolicy, SessionContext, Stages, Status,
};
use tracing_subscriber::EnvFilter;

/// A handler call, with the arguments it received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Negotiate(u32, u32),
    Connect {
        hostname: String,
        address: String,
        port: Option<u16>,
    },
    Helo(String),
    Mail(String, Vec<String>),
    Rcpt(String, Vec<String>),
    Data,
    Header(String, String),
    EndOfHeader,
    Body(Vec<u8>),
    EndOfBody,
    Unknown(Vec<u8>),
    Abort,
    Close,
}

/// Records every call and answers with what it was told to.
#[derive(Debug, Default)]
pub struct RecordingMilter {
    answers: HashMap<Stages, Status>,
    negotiate: Option<NegotiateReply>,
    pub calls: Vec<Call>,
}

impl RecordingMilter {
    /// Handle `stage`, answering `status`.
    pub fn answer(mut self, stage: Stages, status: Status) -> Self {
        self.answers.insert(stage, status);
        self
    }

    /// Handle negotiation with `reply`.
    ///
    /// Without a reply, the offered flags are echoed back.
    pub fn negotiate_with(mut self, reply: Option<NegotiateReply>) -> Self {
        self.negotiate = reply;
        self.answers.insert(Stages::NEGOTIATE, Status::Continue);
        self
    }

    fn status(&self, stage: Stages) -> Status {
        self.answers.get(&stage).copied().unwrap_or(Status::Continue)
    }
}

#[async_trait]
impl Milter for RecordingMilter {
    fn stages(&self) -> Stages {
        self.answers
            .keys()
            .fold(Stages::empty(), |all, &stage| all | stage)
    }

    async fn negotiate(
        &mut self,
        _ctx: &SessionContext,
        actions: Capability,
        protocol: Protocol,
    ) -> NegotiateReply {
        self.calls
            .push(Call::Negotiate(actions.bits(), protocol.bits()));
        self.negotiate
            .unwrap_or(NegotiateReply::Replace { actions, protocol })
    }

    async fn connect(&mut self, _ctx: &SessionContext, connect: Connect) -> Status {
        self.calls.push(Call::Connect {
            hostname: connect.hostname().to_string(),
            address: connect.address().to_string(),
            port: connect.port,
        });
        self.status(Stages::CONNECT)
    }

    async fn helo(&mut self, _ctx: &SessionContext, helo: Helo) -> Status {
        self.calls.push(Call::Helo(helo.helo().to_string()));
        self.status(Stages::HELO)
    }

    async fn mail(&mut self, _ctx: &SessionContext, mail: Mail) -> Status {
        let args = mail.esmtp_args().iter().map(ToString::to_string).collect();
        self.calls.push(Call::Mail(mail.sender().to_string(), args));
        self.status(Stages::MAIL)
    }

    async fn rcpt(&mut self, _ctx: &SessionContext, recipient: Recipient) -> Status {
        let args = recipient
            .esmtp_args()
            .iter()
            .map(ToString::to_string)
            .collect();
        self.calls
            .push(Call::Rcpt(recipient.recipient().to_string(), args));
        self.status(Stages::RCPT)
    }

    async fn data(&mut self, _ctx: &SessionContext) -> Status {
        self.calls.push(Call::Data);
        self.status(Stages::DATA)
    }

    async fn header(&mut self, _ctx: &SessionContext, header: Header) -> Status {
        self.calls.push(Call::Header(
            header.name().to_string(),
            header.value().to_string(),
        ));
        self.status(Stages::HEADER)
    }

    async fn end_of_header(&mut self, _ctx: &SessionContext) -> Status {
        self.calls.push(Call::EndOfHeader);
        self.status(Stages::END_OF_HEADER)
    }

    async fn body(&mut self, _ctx: &SessionContext, body: Body) -> Status {
        self.calls.push(Call::Body(body.to_vec()));
        self.status(Stages::BODY)
    }

    async fn end_of_body(&mut self, _ctx: &SessionContext) -> Status {
        self.calls.push(Call::EndOfBody);
        self.status(Stages::END_OF_BODY)
    }

    async fn unknown(&mut self, _ctx: &SessionContext, cmd: Unknown) -> Status {
        self.calls.push(Call::Unknown(cmd.as_bytes().to_vec()));
        self.status(Stages::UNKNOWN)
    }

    async fn abort(&mut self, _ctx: &SessionContext) -> Status {
        self.calls.push(Call::Abort);
        self.status(Stages::ABORT)
    }

    async fn close(&mut self, _ctx: &SessionContext) {
        self.calls.push(Call::Close);
    }
}

/// Install a subscriber, `RUST_LOG=debug` shows what the dispatcher does.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A dispatcher checking no command order, as every stage is tested alone.
pub fn unordered(milter: RecordingMilter) -> Dispatcher<RecordingMilter> {
    init_tracing();
    Dispatcher::with_policy(milter, Config::new("test"), SequencePolicy::unrestricted())
}

/// Concatenate payload parts.
pub fn payload(parts: &[&[u8]]) -> BytesMut {
    parts.iter().flat_map(|p| p.iter().copied()).collect()
}

/// An option negotiation payload.
pub fn optneg(version: u32, actions: u32, protocol: u32) -> BytesMut {
    let mut buffer = BytesMut::new();
    buffer.extend_from_slice(&version.to_be_bytes());
    buffer.extend_from_slice(&actions.to_be_bytes());
    buffer.extend_from_slice(&protocol.to_be_bytes());
    buffer
}

/// Store a macro in every slot.
pub async fn fill_macros(dispatcher: &mut Dispatcher<RecordingMilter>) {
    for code in *b"CHMRTNE" {
        dispatcher
            .macro_(payload(&[&[code], b"{name}\0value\0"]))
            .await;
    }
    for stage in MacroStage::ALL {
        assert!(dispatcher.context().macros()[stage].is_some());
    }
}

/// Assert exactly the slots in `cleared` are unset.
pub fn assert_cleared(dispatcher: &Dispatcher<RecordingMilter>, cleared: &[MacroStage]) {
    for stage in MacroStage::ALL {
        let slot = &dispatcher.context().macros()[stage];
        assert_eq!(
            slot.is_none(),
            cleared.contains(&stage),
            "unexpected state of the {stage} macros"
        );
    }
}
