use crate::decoding::Stage;

bitflags::bitflags! {
    /// Protocol flags configuring communications behavior
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct Protocol: u32 {
        /// MTA should not send connect info
        #[doc(alias="SMFIP_NOCONNECT")]
        const NO_CONNECT = 0x0000_0001;
        /// MTA should not send HELO info
        #[doc(alias="SMFIP_NOHELO")]
        const NO_HELO = 0x0000_0002;
        /// MTA should not send MAIL info
        #[doc(alias="SMFIP_NOMAIL")]
        const NO_MAIL = 0x0000_0004;
        /// MTA should not send RCPT info
        #[doc(alias="SMFIP_NORCPT")]
        const NO_RECIPIENT = 0x0000_0008;
        /// MTA should not send body
        #[doc(alias="SMFIP_NOBODY")]
        const NO_BODY = 0x0000_0010;
        /// MTA should not send headers
        #[doc(alias="SMFIP_NOHDRS")]
        const NO_HEADER = 0x0000_0020;
        /// MTA should not send EOH
        #[doc(alias="SMFIP_NOEOH")]
        const NO_END_OF_HEADER = 0x0000_0040;
        /// No reply for headers
        #[doc(alias="SMFIP_NR_HDR")]
        const NR_HEADER = 0x0000_0080;
        /// MTA should not send unknown commands
        #[doc(alias="SMFIP_NOUNKNOWN")]
        const NO_UNKNOWN = 0x0000_0100;
        /// MTA should not send DATA
        #[doc(alias="SMFIP_NODATA")]
        const NO_DATA = 0x0000_0200;
        /// MTA understands `SMFIS_SKIP`
        #[doc(alias="SMFIP_SKIP")]
        const SKIP = 0x0000_0400;
        /// MTA should also send rejected RCPTs
        #[doc(alias="SMFIP_RCPT_REJ")]
        const RCPT_REJ = 0x0000_0800;
        /// No reply for connect
        #[doc(alias="SMFIP_NR_CONN")]
        const NR_CONNECT = 0x0000_1000;
        /// No reply for HELO
        #[doc(alias="SMFIP_NR_HELO")]
        const NR_HELO = 0x0000_2000;
        /// No reply for MAIL
        #[doc(alias="SMFIP_NR_MAIL")]
        const NR_MAIL = 0x0000_4000;
        /// No reply for RCPT
        #[doc(alias="SMFIP_NR_RCPT")]
        const NR_RECIPIENT = 0x0000_8000;
        /// No reply for DATA
        #[doc(alias="SMFIP_NR_DATA")]
        const NR_DATA = 0x0001_0000;
        /// No reply for UNKN
        #[doc(alias="SMFIP_NR_UNKN")]
        const NR_UNKNOWN = 0x0002_0000;
        /// No reply for eoh
        #[doc(alias="SMFIP_NR_EOH")]
        const NR_END_OF_HEADER = 0x0004_0000;
        /// No reply for body chunk
        #[doc(alias="SMFIP_NR_BODY")]
        const NR_BODY = 0x0008_0000;
        /// header value leading space
        #[doc(alias="SMFIP_HDR_LEADSPC")]
        const HDR_LEADSPC = 0x0010_0000;
        /// MTA may send body chunks up to 256K
        #[doc(alias="SMFIP_MDS_256K")]
        const MDS_256K = 0x1000_0000;
        /// MTA may send body chunks up to 1M
        #[doc(alias="SMFIP_MDS_1M")]
        const MDS_1M = 0x2000_0000;
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Self::empty()
    }
}

impl Protocol {
    /// Assumed if an MTA advertises no protocol flags at all.
    pub const V1: Self = Self::NO_CONNECT
        .union(Self::NO_HELO)
        .union(Self::NO_MAIL)
        .union(Self::NO_RECIPIENT)
        .union(Self::NO_BODY)
        .union(Self::NO_HEADER);

    /// The "no reply" flags.
    ///
    /// These are always offered to a filter: if the MTA does not support
    /// one, the library answers in place of the filter.
    pub const NO_REPLY_MASK: Self = Self::NR_HEADER
        .union(Self::NR_CONNECT)
        .union(Self::NR_HELO)
        .union(Self::NR_MAIL)
        .union(Self::NR_RECIPIENT)
        .union(Self::NR_DATA)
        .union(Self::NR_UNKNOWN)
        .union(Self::NR_END_OF_HEADER)
        .union(Self::NR_BODY);

    /// The flag telling the MTA not to wait for a reply to `stage`.
    ///
    /// `None` for stages where this can not be negotiated.
    #[must_use]
    pub fn no_reply_flag(stage: Stage) -> Option<Self> {
        let flag = match stage {
            Stage::Connect => Self::NR_CONNECT,
            Stage::Helo => Self::NR_HELO,
            Stage::Mail => Self::NR_MAIL,
            Stage::Recipient => Self::NR_RECIPIENT,
            Stage::Data => Self::NR_DATA,
            Stage::Header => Self::NR_HEADER,
            Stage::EndOfHeader => Self::NR_END_OF_HEADER,
            Stage::Body => Self::NR_BODY,
            Stage::Unknown => Self::NR_UNKNOWN,
            Stage::Abort
            | Stage::Macro
            | Stage::EndOfBody
            | Stage::OptNeg
            | Stage::Quit => return None,
        };
        Some(flag)
    }

    /// Drop "no reply" flags the MTA did not advertise in `mta`.
    ///
    /// What remains is what may be sent back to the MTA.
    #[must_use]
    pub fn for_mta(self, mta: Self) -> Self {
        self.difference(Self::NO_REPLY_MASK.difference(mta))
    }
}
