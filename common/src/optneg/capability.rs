bitflags::bitflags! {
    /// What this filter may ask the MTA to do with a mail.
    ///
    /// Some sendmail docs call this an 'action'.
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct Capability: u32 {
        /// Add headers (`SMFIR_ADDHEADER`)
        const SMFIF_ADDHDRS = 0x0000_0001;
        /// Change body chunks (`SMFIR_REPLBODY`)
        const SMFIF_CHGBODY = 0x0000_0002;
        /// Add recipients (`SMFIR_ADDRCPT`)
        const SMFIF_ADDRCPT = 0x0000_0004;
        /// Remove recipients (`SMFIR_DELRCPT`)
        const SMFIF_DELRCPT = 0x0000_0008;
        /// Change or delete headers (`SMFIR_CHGHEADER`)
        const SMFIF_CHGHDRS = 0x0000_0010;
        /// Quarantine message (`SMFIR_QUARANTINE`)
        const SMFIF_QUARANTINE = 0x0000_0020;
        /// Change the from address
        const SMFIF_CHGFROM = 0x0000_0040;
        /// Add a recipient with esmtp arguments
        const SMFIF_ADDRCPT_PAR = 0x0000_0080;
        // SMFIF_SETSYMLIST currently not supported
    }
}

impl Default for Capability {
    /// A filter declares no actions unless told otherwise
    fn default() -> Self {
        Capability::empty()
    }
}

impl Capability {
    /// Assumed if an MTA advertises no actions at all.
    pub const V1: Self = Self::SMFIF_ADDHDRS
        .union(Self::SMFIF_CHGBODY)
        .union(Self::SMFIF_ADDRCPT)
        .union(Self::SMFIF_DELRCPT);
}
