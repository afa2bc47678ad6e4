use bytes::BytesMut;

use crate::decoding::Parsable;
use crate::ProtocolError;

/// A chunk of the message body
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Body {
    body: BytesMut,
}

impl From<Body> for Vec<u8> {
    fn from(value: Body) -> Self {
        value.body.to_vec()
    }
}

impl Body {
    /// Access the contained body bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Convert this body to a `Vec<u8>`
    #[must_use]
    pub fn to_vec(self) -> Vec<u8> {
        self.into()
    }
}

impl Parsable for Body {
    const CODE: u8 = b'B';

    fn parse(buffer: BytesMut) -> Result<Self, ProtocolError> {
        Ok(Self { body: buffer })
    }
}

/// End of the message, optionally carrying a last body chunk
#[derive(Clone, PartialEq, Debug, Default)]
pub struct EndOfBody {
    trailing: BytesMut,
}

impl EndOfBody {
    /// The last body chunk sent along with end of message, if any.
    #[must_use]
    pub fn body(&self) -> Option<Body> {
        if self.trailing.is_empty() {
            return None;
        }
        Some(Body {
            body: self.trailing.clone(),
        })
    }
}

impl Parsable for EndOfBody {
    const CODE: u8 = b'E';

    fn parse(buffer: BytesMut) -> Result<Self, ProtocolError> {
        Ok(Self { trailing: buffer })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_end_of_body_chunk() {
        let eob = EndOfBody::parse(BytesMut::from("abc")).expect("infallible");
        let body = eob.body().expect("trailing chunk present");

        assert_eq!(body.as_bytes(), b"abc");

        let eob = EndOfBody::parse(BytesMut::new()).expect("infallible");
        assert_eq!(eob.body(), None);
    }

    #[cfg(feature = "count-allocations")]
    #[test]
    fn test_parse_body_allocations() {
        let buffer = BytesMut::from("Random body...");
        let info = allocation_counter::measure(|| {
            let res = Body::parse(buffer);
            allocation_counter::opt_out(|| {
                assert!(res.is_ok());
            });
        });
        // Verify that no memory allocations are made:
        assert_eq!(info.count_total, 0);
    }
}
