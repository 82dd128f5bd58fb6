//! Version tags carried by serialized networks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, FlowError};

/// `major.minor.patch` tag of a serialized payload layout.
///
/// A reader understands every payload with its own major version and a minor
/// version no newer than its own; the patch level never matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Incompatible layout changes.
    pub major: u32,
    /// Additive layout changes.
    pub minor: u32,
    /// Fixes that leave the layout alone.
    pub patch: u32,
}

impl SchemaVersion {
    /// Builds a version tag.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether a payload tagged `found` can be read by a reader at `self`.
    pub fn accepts(&self, found: &SchemaVersion) -> bool {
        self.major == found.major && found.minor <= self.minor
    }

    /// Like [`accepts`](Self::accepts), reporting a `schema-mismatch` error.
    pub fn check(&self, found: &SchemaVersion) -> Result<(), FlowError> {
        if self.accepts(found) {
            return Ok(());
        }
        Err(FlowError::Serde(
            ErrorInfo::new("schema-mismatch", "unsupported schema version")
                .with_context("found", found)
                .with_context("supported", self)
                .with_hint("re-export the payload with a matching pflow version"),
        ))
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SchemaVersion {
    type Err = FlowError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            FlowError::Serde(
                ErrorInfo::new("invalid-schema-version", "expected major.minor.patch")
                    .with_context("text", text),
            )
        };
        let mut parts = text.trim().split('.').map(str::parse::<u32>);
        let mut next = || parts.next().and_then(Result::ok).ok_or_else(invalid);
        let version = SchemaVersion::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}
