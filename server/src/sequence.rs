//! Which commands may follow each other.

use std::collections::HashMap;

use smfi_common::decoding::Stage;

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Waiting for option negotiation
    #[default]
    PreNegotiation,
    /// Between mails, connect and helo info may arrive
    Connection,
    /// Sender known, recipients arriving
    Envelope,
    /// Headers and body arriving
    Data,
    /// End of message was sent
    PostData,
    /// Nothing is accepted anymore
    Closed,
}

impl Phase {
    /// All phases a command may be accepted in.
    pub const OPEN: [Phase; 5] = [
        Self::PreNegotiation,
        Self::Connection,
        Self::Envelope,
        Self::Data,
        Self::PostData,
    ];
}

/// The legal transitions between phases.
///
/// Anything not in the table is out of sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePolicy {
    transitions: HashMap<(Phase, Stage), Phase>,
}

impl Default for SequencePolicy {
    /// The order an MTA sends commands in.
    fn default() -> Self {
        use Phase::{Closed, Connection, Data, Envelope, PostData, PreNegotiation};
        use Stage::{
            Abort, Body, Connect, EndOfBody, EndOfHeader, Header, Helo, Macro, Mail, OptNeg, Quit,
            Recipient, Unknown,
        };

        let table: &[(Phase, &[Stage], Phase)] = &[
            (PreNegotiation, &[OptNeg], Connection),
            (Connection, &[Connect, Helo, Unknown, Macro, Abort], Connection),
            (Connection, &[Mail], Envelope),
            (Envelope, &[Recipient, Unknown, Macro], Envelope),
            (Envelope, &[Stage::Data, Header, EndOfHeader, Body], Data),
            (Envelope, &[EndOfBody], PostData),
            (Envelope, &[Abort], Connection),
            (Data, &[Header, EndOfHeader, Body, Macro], Data),
            (Data, &[EndOfBody], PostData),
            (Data, &[Abort], Connection),
            (PostData, &[Macro, Unknown], PostData),
            (PostData, &[Abort, Helo], Connection),
            (PostData, &[Mail], Envelope),
        ];

        let mut policy = Self::empty();
        for &(phase, stages, next) in table {
            for &stage in stages {
                policy = policy.allow(phase, stage, next);
            }
        }
        for phase in Phase::OPEN {
            policy = policy.allow(phase, Quit, Closed);
        }
        policy
    }
}

impl SequencePolicy {
    /// A policy rejecting everything.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            transitions: HashMap::new(),
        }
    }

    /// A policy accepting any command in any open phase.
    ///
    /// Only quit changes the phase. For embedders checking the order
    /// elsewhere.
    #[must_use]
    pub fn unrestricted() -> Self {
        let mut policy = Self::empty();
        for phase in Phase::OPEN {
            for stage in Stage::ALL {
                policy = policy.allow(phase, stage, phase);
            }
            policy = policy.allow(phase, Stage::Quit, Phase::Closed);
        }
        policy
    }

    /// Accept `stage` in `phase`, moving on to `next`.
    #[must_use]
    pub fn allow(mut self, phase: Phase, stage: Stage, next: Phase) -> Self {
        self.transitions.insert((phase, stage), next);
        self
    }

    /// Do not accept `stage` in `phase`.
    #[must_use]
    pub fn forbid(mut self, phase: Phase, stage: Stage) -> Self {
        self.transitions.remove(&(phase, stage));
        self
    }

    /// The phase after `stage` was received in `phase`.
    ///
    /// `None` if `stage` is not allowed there.
    #[must_use]
    pub fn next(&self, phase: Phase, stage: Stage) -> Option<Phase> {
        self.transitions.get(&(phase, stage)).copied()
    }
}
