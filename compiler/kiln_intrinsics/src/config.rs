//! Resolution configuration.

use std::env;
use std::fmt;

/// Environment variable selecting [`OverloadPolicy::Reject`] when set to `1`.
pub const STRICT_OVERLOADS_ENV: &str = "KILN_STRICT_OVERLOADS";

/// Environment variable forcing argument checking on (`1`) or off (`0`).
pub const CHECK_ARGUMENTS_ENV: &str = "KILN_CHECK_INTRINSIC_ARGS";

/// What to do when more than one family member accepts the arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverloadPolicy {
    /// Take the first match in table order and log a warning.
    #[default]
    FirstMatch,
    /// Fail with [`ResolveError::AmbiguousOverload`](crate::ResolveError::AmbiguousOverload).
    Reject,
}

impl fmt::Display for OverloadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstMatch => write!(f, "first-match"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Configuration for intrinsic resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveConfig {
    /// Overload ambiguity handling.
    pub policy: OverloadPolicy,
    /// Type-check arguments against a single template before emitting.
    /// When off, holes are captured positionally and the instantiated
    /// parameters are compared against the arguments afterwards.
    pub check_arguments: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            policy: OverloadPolicy::FirstMatch,
            check_arguments: cfg!(debug_assertions),
        }
    }
}

impl ResolveConfig {
    /// Reject ambiguity and always check arguments.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            policy: OverloadPolicy::Reject,
            check_arguments: true,
        }
    }

    /// Defaults, overridden by `KILN_STRICT_OVERLOADS` and
    /// `KILN_CHECK_INTRINSIC_ARGS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) over an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(strict) = lookup(STRICT_OVERLOADS_ENV).as_deref().and_then(parse_flag) {
            config.policy = if strict {
                OverloadPolicy::Reject
            } else {
                OverloadPolicy::FirstMatch
            };
        }
        if let Some(check) = lookup(CHECK_ARGUMENTS_ENV).as_deref().and_then(parse_flag) {
            config.check_arguments = check;
        }
        config
    }

    #[must_use]
    pub fn with_policy(mut self, policy: OverloadPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_check_arguments(mut self, check: bool) -> Self {
        self.check_arguments = check;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            tracing::warn!(value = other, "ignoring unrecognised flag value");
            None
        }
    }
}
