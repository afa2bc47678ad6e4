#![doc = include_str!("../Readme.md")]

mod config;
mod context;
mod dispatcher;
mod error;
mod milter;
mod negotiation;
mod outcome;
mod sequence;

#[cfg(feature = "_fuzzing")]
pub mod fuzzing;

pub use config::Config;
pub use context::SessionContext;
pub use dispatcher::Dispatcher;
pub use error::Error;
pub use milter::{Milter, NegotiateReply, Stages, Status};
pub use negotiation::Negotiated;
pub use outcome::Outcome;
pub use sequence::{Phase, SequencePolicy};
