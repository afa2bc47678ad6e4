//! Payloads of the commands the MTA sends to the filter.
//!
//! Each type decodes exactly one command payload, tag and length prefix
//! already stripped.

mod body;
mod connect;
mod header;
mod helo;
mod mail;
mod mmacro;
mod recipient;
mod unknown;

pub use self::body::{Body, EndOfBody};
pub use self::connect::{Connect, Family};
pub use self::header::{EndOfHeader, Header};
pub use self::helo::Helo;
pub use self::mail::{Data, Mail};
pub use self::mmacro::Macro;
pub use self::recipient::Recipient;
pub use self::unknown::Unknown;
