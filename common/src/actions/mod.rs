//! Control flow commands and the replies answering them.
//!
//! [`Abort`] and [`Quit`] are received from the MTA, everything in
//! [`Action`] is sent back to it.

mod bidirectional;
mod quit;
mod to_mta_only;

use enum_dispatch::enum_dispatch;

pub use self::bidirectional::{Abort, Continue};
pub use self::quit::Quit;
pub use self::to_mta_only::{Accept, Discard, Reject, Skip, Tempfail};

/// All reply actions combined
///
/// See the contained variants for more.
#[allow(missing_docs)]
#[enum_dispatch]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Continue,
    Accept,
    Discard,
    Reject,
    Tempfail,
    Skip,
}
