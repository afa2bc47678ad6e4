use smfi_common::optneg::{Capability, OptNeg};

/// Describes a filter to the dispatcher.
///
/// Corresponds to libmilter's `smfiDesc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    name: String,
    version: u32,
    actions: Capability,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: OptNeg::VERSION,
            actions: Capability::empty(),
        }
    }
}

impl Config {
    /// A config for the filter called `name`, with defaults otherwise.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the name used in logs.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the api version the filter was written for.
    ///
    /// Below 3 unknown commands are not passed on, up to 4 the filter can
    /// not override the negotiated flags.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set the actions the filter needs if it does not negotiate itself.
    #[must_use]
    pub fn with_actions(mut self, actions: Capability) -> Self {
        self.actions = actions;
        self
    }

    /// The name of the filter.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The api version the filter was written for.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The actions the filter declared.
    #[must_use]
    pub fn actions(&self) -> Capability {
        self.actions
    }
}
