use smfi_common::{
    decoding::Stage,
    macros::Macros,
    optneg::{Capability, OptNeg, Protocol},
};

use crate::{Config, Negotiated};

/// The state of one connection, handed to every [`Milter`](crate::Milter)
/// call.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    version: u32,
    actions: Capability,
    negotiated: Option<Negotiated>,
    pub(crate) macros: Macros,
}

impl SessionContext {
    /// A fresh context for a filter described by `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            version: config.version(),
            actions: config.actions(),
            negotiated: None,
            macros: Macros::default(),
        }
    }

    /// The api version the filter declared.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The actions the filter declared.
    #[must_use]
    pub fn declared_actions(&self) -> Capability {
        self.actions
    }

    /// The outcome of option negotiation, once it happened.
    #[must_use]
    pub fn negotiated(&self) -> Option<&Negotiated> {
        self.negotiated.as_ref()
    }

    /// The version MTA and filter agreed on.
    #[must_use]
    pub fn negotiated_version(&self) -> Option<u32> {
        self.negotiated.as_ref().map(|n| n.version)
    }

    /// The version the MTA advertised.
    #[must_use]
    pub fn mta_version(&self) -> Option<u32> {
        self.negotiated.as_ref().map(|n| n.mta.version)
    }

    /// The actions the filter may perform, empty before negotiation.
    #[must_use]
    pub fn actions(&self) -> Capability {
        self.negotiated
            .as_ref()
            .map_or(Capability::empty(), |n| n.actions)
    }

    /// The protocol flags in effect, empty before negotiation.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.negotiated
            .as_ref()
            .map_or(Protocol::empty(), |n| n.protocol)
    }

    /// The answer to send to the MTA's option negotiation.
    #[must_use]
    pub fn negotiation_reply(&self) -> Option<OptNeg> {
        self.negotiated.as_ref().map(Negotiated::reply)
    }

    /// All macros received so far.
    #[must_use]
    pub fn macros(&self) -> &Macros {
        &self.macros
    }

    /// The value of macro `name`, e.g. `i` or `{mail_addr}`.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<&[u8]> {
        self.macros.symbol(name.as_bytes())
    }

    /// Whether the MTA waits for an answer to `stage`.
    #[must_use]
    pub fn expects_reply(&self, stage: Stage) -> bool {
        match stage {
            Stage::Abort | Stage::Macro | Stage::OptNeg | Stage::Quit => false,
            other => Protocol::no_reply_flag(other).map_or(true, |flag| {
                !self
                    .negotiated
                    .as_ref()
                    .is_some_and(|n| n.protocol_to_mta.contains(flag))
            }),
        }
    }

    pub(crate) fn set_negotiated(&mut self, negotiated: Negotiated) {
        self.negotiated = Some(negotiated);
        self.macros.clear_all();
    }
}
