//! crates/logging/src/config.rs
//! Verbosity configuration for the workspace tracing targets.

/// Environment variable that overrides the computed filter directive.
pub const LOG_ENV_VAR: &str = "OC_SCP_LOG";

/// Verbosity selected on the command line.
///
/// Level 0 shows warnings only, 1 adds transfer summaries, 2 adds protocol
/// and session debugging, 3 and above add chunk-level I/O traces.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    level: u8,
}

impl VerbosityConfig {
    /// Creates a configuration from a `-v` count.
    #[must_use]
    pub const fn from_verbose_level(level: u8) -> Self {
        Self { level }
    }

    /// Returns the `-v` count this configuration was built from.
    #[must_use]
    pub const fn level(self) -> u8 {
        self.level
    }

    /// Renders the `EnvFilter` directive for this verbosity.
    #[must_use]
    pub const fn filter_directive(self) -> &'static str {
        match self.level {
            0 => "warn",
            1 => "warn,scp=info",
            2 => "warn,scp=debug",
            _ => "warn,scp=trace",
        }
    }
}
