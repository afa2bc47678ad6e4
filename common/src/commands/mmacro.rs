use bytes::BytesMut;

use crate::decoding::Parsable;
use crate::macros::MacroStage;
use crate::{InvalidData, NotEnoughData, ProtocolError};
use smfi_utils::ByteParsing;

/// Macros defined by the MTA for the stage identified by `Macro.stage`.
///
/// The values alternate between name and value. They are kept flat, as the
/// MTA does not guarantee an even count.
#[derive(Clone, PartialEq, Debug)]
pub struct Macro {
    /// The stage this macro belongs to.
    pub stage: MacroStage,
    values: Vec<BytesMut>,
}

impl Macro {
    const ITEM: &'static str = "Macro";

    /// The received strings, names and values alternating.
    #[must_use]
    pub fn values(&self) -> &[BytesMut] {
        &self.values
    }

    /// An iterator over received macros in (name, value) format.
    ///
    /// A dangling name without value is skipped.
    pub fn macros(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.values
            .chunks_exact(2)
            .map(|pair| (&pair[0][..], &pair[1][..]))
    }

    /// Take the received strings out.
    #[must_use]
    pub fn into_values(self) -> Vec<BytesMut> {
        self.values
    }
}

impl Parsable for Macro {
    const CODE: u8 = b'D';

    fn parse(mut buffer: BytesMut) -> Result<Self, ProtocolError> {
        let Some(code) = buffer.safe_get_u8() else {
            return Err(NotEnoughData::new(Self::ITEM, "stage code missing", 1, buffer).into());
        };

        let Some(stage) = MacroStage::from_code(code) else {
            return Err(InvalidData::new(
                Self::ITEM,
                "unknown stage code",
                BytesMut::from_iter([code]),
            )
            .into());
        };

        let Some(values) = buffer.c_strings() else {
            return Err(InvalidData::new(
                Self::ITEM,
                "missing null byte delimiter after last value",
                buffer,
            )
            .into());
        };

        Ok(Self { stage, values })
    }
}
