use bytes::BytesMut;

use crate::encoding::Writable;

/// Declare a reply without payload, identified by its code only.
macro_rules! empty_reply {
    ($(#[$doc:meta])* $name:ident, $code:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name;

        impl Writable for $name {
            fn write(&self, _buffer: &mut BytesMut) {}

            fn len(&self) -> usize {
                0
            }

            fn code(&self) -> u8 {
                $code
            }

            fn is_empty(&self) -> bool {
                true
            }
        }
    };
}

empty_reply!(
    /// Accept this mail, the filter does not want to see more of it
    Accept,
    b'a'
);

empty_reply!(
    /// (Silently) discard this mail without forwarding it
    Discard,
    b'd'
);

empty_reply!(
    /// Reject this mail, informing the smtp client about it
    Reject,
    b'r'
);

empty_reply!(
    /// Reject this mail temporarily, the smtp client may retry
    Tempfail,
    b't'
);

empty_reply!(
    /// Skip the remaining body chunks of this mail
    Skip,
    b's'
);
