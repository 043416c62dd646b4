//! Opaque handle for secret attribute values.
//!
//! Passwords and API tokens travel through the connector as [`GuardedString`].
//! The clear text is only reachable through [`GuardedString::access`] or
//! [`GuardedString::reveal`], which keeps every unwrap greppable, and the
//! `Debug`/`Display` implementations never print it.

use serde::{Deserialize, Deserializer};
use std::fmt;

const REDACTED: &str = "********";

/// A secret string value.
#[derive(Clone, PartialEq, Eq)]
pub struct GuardedString(String);

impl GuardedString {
    /// Wrap a clear-text secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Run `accessor` against the clear text without copying it out.
    pub fn access<R>(&self, accessor: impl FnOnce(&str) -> R) -> R {
        accessor(&self.0)
    }

    /// Copy the clear text out of the guard.
    ///
    /// Callers own the returned value and must keep it out of log output.
    pub fn reveal(&self) -> String {
        self.0.clone()
    }

    /// Whether the secret is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for GuardedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GuardedString").field(&REDACTED).finish()
    }
}

impl fmt::Display for GuardedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for GuardedString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self)
    }
}
