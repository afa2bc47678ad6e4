//! Route the commands of one connection to a [`Milter`].

use bytes::BytesMut;
use smfi_common::{
    commands::{Body, Connect, EndOfBody, Header, Helo, Macro, Mail, Recipient, Unknown},
    decoding::{Parsable, Stage},
    macros::MacroStage,
    optneg::OptNeg,
};
use tracing::{debug, instrument, warn};

use crate::{
    negotiation, Config, Error, Milter, Outcome, Phase, SequencePolicy, SessionContext, Stages,
    Status,
};

/// Dispatches the commands of a single connection.
///
/// Each stage method takes the command payload, tag and length prefix
/// already stripped, and resolves to exactly one [`Outcome`].
#[derive(Debug)]
pub struct Dispatcher<M: Milter> {
    milter: M,
    config: Config,
    context: SessionContext,
    policy: SequencePolicy,
    phase: Phase,
    last_error: Option<Error>,
}

impl<M: Milter> Dispatcher<M> {
    /// Dispatch to `milter`, described by `config`.
    #[must_use]
    pub fn new(milter: M, config: Config) -> Self {
        Self::with_policy(milter, config, SequencePolicy::default())
    }

    /// Like [`Dispatcher::new`], checking the command order with `policy`.
    #[must_use]
    pub fn with_policy(milter: M, config: Config, policy: SequencePolicy) -> Self {
        let context = SessionContext::new(&config);
        Self {
            milter,
            config,
            context,
            policy,
            phase: Phase::default(),
            last_error: None,
        }
    }

    /// The state of this connection.
    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// The filter config.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Where the session is at.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The last error that ended this connection.
    #[must_use]
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// The filter.
    #[must_use]
    pub fn milter(&self) -> &M {
        &self.milter
    }

    /// The filter, mutably.
    pub fn milter_mut(&mut self) -> &mut M {
        &mut self.milter
    }

    /// Take the filter back out.
    #[must_use]
    pub fn into_milter(self) -> M {
        self.milter
    }

    /// Dispatch a command by its wire `code`.
    ///
    /// An unknown code aborts the connection.
    #[instrument(skip(self, payload), fields(len = payload.len()))]
    pub async fn dispatch(&mut self, code: u8, payload: BytesMut) -> Outcome {
        match Stage::from_code(code) {
            Some(stage) => self.run(stage, payload).await,
            None => self.fail(None, Error::UnknownCommand { code }),
        }
    }

    /// `SMFIC_ABORT`
    pub async fn abort(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::Abort, payload).await
    }

    /// `SMFIC_MACRO`
    pub async fn macro_(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::Macro, payload).await
    }

    /// `SMFIC_BODY`
    pub async fn body(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::Body, payload).await
    }

    /// `SMFIC_CONNECT`
    pub async fn connect(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::Connect, payload).await
    }

    /// `SMFIC_BODYEOB`
    pub async fn end_of_body(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::EndOfBody, payload).await
    }

    /// `SMFIC_HELO`
    pub async fn helo(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::Helo, payload).await
    }

    /// `SMFIC_HEADER`
    pub async fn header(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::Header, payload).await
    }

    /// `SMFIC_MAIL`
    pub async fn mail(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::Mail, payload).await
    }

    /// `SMFIC_OPTNEG`
    pub async fn option_negotiation(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::OptNeg, payload).await
    }

    /// `SMFIC_EOH`
    pub async fn end_of_header(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::EndOfHeader, payload).await
    }

    /// `SMFIC_QUIT`
    pub async fn quit(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::Quit, payload).await
    }

    /// `SMFIC_DATA`
    pub async fn data(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::Data, payload).await
    }

    /// `SMFIC_RCPT`
    pub async fn recipient(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::Recipient, payload).await
    }

    /// `SMFIC_UNKNOWN`
    pub async fn unknown(&mut self, payload: BytesMut) -> Outcome {
        self.run(Stage::Unknown, payload).await
    }

    #[instrument(skip(self, payload), fields(phase = ?self.phase, len = payload.len()))]
    async fn run(&mut self, stage: Stage, payload: BytesMut) -> Outcome {
        let Some(next) = self.policy.next(self.phase, stage) else {
            let phase = self.phase;
            return self.fail(Some(stage), Error::OutOfSequence { stage, phase });
        };

        match self.handle(stage, payload).await {
            Ok(outcome) => {
                debug!(?outcome, ?next, "dispatched");
                self.phase = next;
                outcome
            }
            Err(error) => self.fail(Some(stage), error),
        }
    }

    /// Record `error` and close the session.
    fn fail(&mut self, stage: Option<Stage>, error: Error) -> Outcome {
        let outcome = match (&error, stage) {
            (Error::Protocol(_), Some(Stage::Macro | Stage::Helo)) => Outcome::Fail,
            _ => Outcome::Abort,
        };
        warn!(%error, ?outcome, "failed to process command");

        self.phase = Phase::Closed;
        self.last_error = Some(error);
        outcome
    }

    fn handles(&self, stages: Stages) -> bool {
        self.milter.stages().contains(stages)
    }

    async fn handle(&mut self, stage: Stage, payload: BytesMut) -> Result<Outcome, Error> {
        let outcome = match stage {
            Stage::OptNeg => {
                let received = OptNeg::parse(payload)?;
                let negotiated = negotiation::negotiate(
                    &mut self.milter,
                    &self.config,
                    &self.context,
                    received,
                )
                .await?;
                self.context.set_negotiated(negotiated);
                Outcome::Options
            }
            Stage::Macro => {
                let macro_ = Macro::parse(payload)?;
                let slot = macro_.stage;
                self.context.macros.set(slot, macro_.into_values());
                Outcome::Keep
            }
            Stage::Connect => {
                if !self.handles(Stages::CONNECT) {
                    self.clear_downstream(MacroStage::Connect);
                    return Ok(Outcome::Continue);
                }
                let connect = Connect::parse(payload)?;
                self.clear_downstream(MacroStage::Connect);
                self.milter.connect(&self.context, connect).await.into()
            }
            Stage::Helo => {
                if !self.handles(Stages::HELO) {
                    self.clear_downstream(MacroStage::Helo);
                    return Ok(Outcome::Continue);
                }
                let helo = Helo::parse(payload)?;
                self.clear_downstream(MacroStage::Helo);
                self.milter.helo(&self.context, helo).await.into()
            }
            Stage::Mail => {
                if !self.handles(Stages::MAIL) {
                    self.clear_downstream(MacroStage::MailFrom);
                    return Ok(Outcome::Continue);
                }
                let mail = Mail::parse(payload)?;
                self.clear_downstream(MacroStage::MailFrom);
                self.milter.mail(&self.context, mail).await.into()
            }
            Stage::Recipient => {
                if !self.handles(Stages::RCPT) {
                    self.clear_downstream(MacroStage::RcptTo);
                    return Ok(Outcome::Continue);
                }
                let recipient = Recipient::parse(payload)?;
                self.clear_downstream(MacroStage::RcptTo);
                self.milter.rcpt(&self.context, recipient).await.into()
            }
            Stage::Header if self.handles(Stages::HEADER) => {
                let header = Header::parse(payload)?;
                self.milter.header(&self.context, header).await.into()
            }
            Stage::Body if self.handles(Stages::BODY) => {
                let body = Body::parse(payload)?;
                self.milter.body(&self.context, body).await.into()
            }
            Stage::EndOfBody => {
                let end = EndOfBody::parse(payload)?;
                self.end_of_message(end).await
            }
            Stage::Data if self.handles(Stages::DATA) => self.milter.data(&self.context).await.into(),
            Stage::EndOfHeader if self.handles(Stages::END_OF_HEADER) => {
                self.milter.end_of_header(&self.context).await.into()
            }
            Stage::Unknown if self.config.version() > 2 && self.handles(Stages::UNKNOWN) => {
                let unknown = Unknown::parse(payload)?;
                self.milter.unknown(&self.context, unknown).await.into()
            }
            Stage::Abort if self.handles(Stages::ABORT) => self.milter.abort(&self.context).await.into(),
            Stage::Abort => Outcome::NoReply,
            Stage::Quit => {
                if self.handles(Stages::CLOSE) {
                    self.milter.close(&self.context).await;
                }
                self.context.macros.clear_all();
                Outcome::Close
            }
            Stage::Header | Stage::Body | Stage::Data | Stage::EndOfHeader | Stage::Unknown => {
                Outcome::Continue
            }
        };
        Ok(outcome)
    }

    /// The last body chunk goes to the body handler first, end of message
    /// is only called if that one continues.
    async fn end_of_message(&mut self, end: EndOfBody) -> Outcome {
        if self.handles(Stages::BODY) {
            if let Some(body) = end.body() {
                let status = self.milter.body(&self.context, body).await;
                if status != Status::Continue {
                    return status.into();
                }
            }
        }

        if self.handles(Stages::END_OF_BODY) {
            self.milter.end_of_body(&self.context).await.into()
        } else {
            Outcome::Continue
        }
    }

    fn clear_downstream(&mut self, stage: MacroStage) {
        self.context.macros.clear_downstream(stage);
    }
}
