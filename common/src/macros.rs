//! Storage for macros the MTA sends ahead of each stage.

use std::ops::Index;

use bytes::BytesMut;
use num_enum::IntoPrimitive;

const MACRO_STAGE_COUNT: usize = 7;

/// The stage a macro set is attached to.
///
/// The discriminants are the slot indices, ordered like the smtp session.
#[derive(Debug, Copy, Clone, IntoPrimitive, PartialEq, Eq, Hash, strum::Display)]
#[repr(u8)]
pub enum MacroStage {
    /// `SMFIM_CONNECT`
    Connect = 0,
    /// `SMFIM_HELO`
    Helo = 1,
    /// `SMFIM_ENVFROM`
    MailFrom = 2,
    /// `SMFIM_ENVRCPT`
    RcptTo = 3,
    /// `SMFIM_DATA`
    Data = 4,
    /// `SMFIM_EOM`
    EndOfBody = 5,
    /// `SMFIM_EOH`
    EndOfHeaders = 6,
}

impl MacroStage {
    /// All stages, in slot order.
    pub const ALL: [MacroStage; MACRO_STAGE_COUNT] = [
        Self::Connect,
        Self::Helo,
        Self::MailFrom,
        Self::RcptTo,
        Self::Data,
        Self::EndOfBody,
        Self::EndOfHeaders,
    ];

    /// Symbol lookup order, most recent stage first.
    const LOOKUP_ORDER: [MacroStage; MACRO_STAGE_COUNT] = [
        Self::EndOfBody,
        Self::EndOfHeaders,
        Self::Data,
        Self::RcptTo,
        Self::MailFrom,
        Self::Helo,
        Self::Connect,
    ];

    /// Map the command code sent in a macro packet to its stage.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        let stage = match code {
            b'C' => Self::Connect,
            b'H' => Self::Helo,
            b'M' => Self::MailFrom,
            b'R' => Self::RcptTo,
            b'T' => Self::Data,
            b'E' => Self::EndOfBody,
            b'N' => Self::EndOfHeaders,
            _ => return None,
        };
        Some(stage)
    }

    /// The slots whose macros become stale once this stage is entered.
    ///
    /// A new connect invalidates everything said about the previous
    /// session, a new sender everything about the previous envelope.
    #[must_use]
    pub fn downstream(self) -> &'static [MacroStage] {
        match self {
            Self::Connect => &[
                Self::Helo,
                Self::MailFrom,
                Self::RcptTo,
                Self::Data,
                Self::EndOfHeaders,
                Self::EndOfBody,
            ],
            Self::Helo => &[
                Self::MailFrom,
                Self::RcptTo,
                Self::Data,
                Self::EndOfHeaders,
                Self::EndOfBody,
            ],
            Self::MailFrom => &[
                Self::RcptTo,
                Self::Data,
                Self::EndOfHeaders,
                Self::EndOfBody,
            ],
            Self::RcptTo => &[Self::Data, Self::EndOfHeaders, Self::EndOfBody],
            Self::Data => &[Self::EndOfHeaders, Self::EndOfBody],
            Self::EndOfHeaders => &[Self::EndOfBody],
            Self::EndOfBody => &[],
        }
    }

    fn as_usize(self) -> usize {
        u8::from(self) as usize
    }
}

/// Received macros, one optional list per [`MacroStage`].
///
/// `None` means the MTA did not send anything for that stage (or it was
/// cleared since), which is different from an empty list.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Macros {
    slots: [Option<Vec<BytesMut>>; MACRO_STAGE_COUNT],
}

impl Index<MacroStage> for Macros {
    type Output = Option<Vec<BytesMut>>;

    fn index(&self, index: MacroStage) -> &Self::Output {
        &self.slots[index.as_usize()]
    }
}

impl Macros {
    /// The macros stored for `stage`, if any.
    #[must_use]
    pub fn get(&self, stage: MacroStage) -> Option<&[BytesMut]> {
        self[stage].as_deref()
    }

    /// Replace the macros stored for `stage`.
    pub fn set(&mut self, stage: MacroStage, values: Vec<BytesMut>) {
        self.slots[stage.as_usize()] = Some(values);
    }

    /// Forget the macros of `stage`.
    pub fn clear(&mut self, stage: MacroStage) {
        self.slots[stage.as_usize()] = None;
    }

    /// Forget all macros of the stages after `stage`.
    pub fn clear_downstream(&mut self, stage: MacroStage) {
        for &later in stage.downstream() {
            self.clear(later);
        }
    }

    /// Forget everything.
    pub fn clear_all(&mut self) {
        self.slots = Default::default();
    }

    /// Look up the value of the macro `name`.
    ///
    /// Later stages shadow earlier ones. `i` and `{i}` name the same macro.
    #[must_use]
    pub fn symbol(&self, name: &[u8]) -> Option<&[u8]> {
        let name = strip_braces(name);

        MacroStage::LOOKUP_ORDER.iter().find_map(|&stage| {
            self.get(stage)?
                .chunks_exact(2)
                .find(|pair| strip_braces(&pair[0]) == name)
                .map(|pair| &pair[1][..])
        })
    }
}

fn strip_braces(name: &[u8]) -> &[u8] {
    match name {
        [b'{', inner @ .., b'}'] => inner,
        other => other,
    }
}
