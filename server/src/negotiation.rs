//! Agree with the MTA on version, actions and protocol flags.

use smfi_common::optneg::{Capability, CompatibilityError, OptNeg, Protocol};
use smfi_common::ProtocolError;
use tracing::debug;

use crate::{Config, Error, Milter, NegotiateReply, SessionContext, Stages};

/// The result of a successful option negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    /// What the MTA advertised, with legacy defaults applied
    pub mta: OptNeg,
    /// The version both sides speak
    pub version: u32,
    /// The actions the filter may perform
    pub actions: Capability,
    /// The protocol flags the filter chose
    pub protocol: Protocol,
    /// The protocol flags as sent back to the MTA
    pub protocol_to_mta: Protocol,
}

impl Negotiated {
    /// The packet answering the MTA's option negotiation.
    #[must_use]
    pub fn reply(&self) -> OptNeg {
        OptNeg {
            version: self.version,
            capabilities: self.actions,
            protocol: self.protocol_to_mta,
        }
    }
}

fn ensure_subset(field: &'static str, requested: u32, offered: u32) -> Result<(), Error> {
    if requested & offered != requested {
        return Err(ProtocolError::from(CompatibilityError::ExceedsOffer {
            field,
            requested,
            offered,
        })
        .into());
    }
    Ok(())
}

/// Negotiate with the MTA that sent `received`.
///
/// The filter's [`Milter::negotiate`] is asked if both sides are recent
/// enough, otherwise the actions declared in `config` are used.
pub(crate) async fn negotiate<M: Milter>(
    milter: &mut M,
    config: &Config,
    ctx: &SessionContext,
    received: OptNeg,
) -> Result<Negotiated, Error> {
    let mta = received.with_legacy_defaults();
    let version = mta.common_version().map_err(ProtocolError::from)?;

    let offered_actions = mta.supported_capabilities();
    let offered_protocol = mta.offered_protocol();

    let hook = version >= OptNeg::NEGOTIATE_VERSION
        && config.version() > 4
        && milter.stages().contains(Stages::NEGOTIATE);

    let (actions, protocol) = if hook {
        match milter.negotiate(ctx, offered_actions, offered_protocol).await {
            NegotiateReply::AllOptions => (offered_actions, offered_protocol),
            NegotiateReply::Replace { actions, protocol } => {
                ensure_subset("actions", actions.bits(), offered_actions.bits())?;
                ensure_subset("protocol flags", protocol.bits(), offered_protocol.bits())?;
                (actions, protocol)
            }
            NegotiateReply::Refuse(status) => return Err(Error::Refused { status }),
        }
    } else {
        let declared = config.actions();
        if !mta.capabilities.contains(declared) {
            return Err(ProtocolError::from(CompatibilityError::MissingActions {
                declared: declared.bits(),
                offered: mta.capabilities.bits(),
            })
            .into());
        }
        (declared, mta.supported_protocol())
    };

    let protocol_to_mta = protocol.for_mta(mta.protocol);
    debug!(
        version,
        actions = actions.bits(),
        protocol = protocol.bits(),
        protocol_to_mta = protocol_to_mta.bits(),
        "negotiated"
    );

    Ok(Negotiated {
        mta,
        version,
        actions,
        protocol,
        protocol_to_mta,
    })
}
