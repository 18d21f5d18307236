//! Identifier and validation newtypes shared across the crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The start hour was outside the valid range.
    #[error("start hour must be between 0 and 23, got {value}")]
    StartHourOutOfRange { value: u8 },
}

/// Generates an integer ID newtype with common trait implementations.
///
/// Toggl identifiers are opaque integers; the newtypes keep a workspace ID
/// from being passed where a project ID is expected.
macro_rules! define_numeric_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw identifier.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Forward to i64 so width and alignment flags apply.
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_numeric_id!(
    /// A Toggl workspace identifier.
    WorkspaceId
);

define_numeric_id!(
    /// A Toggl project identifier.
    ProjectId
);

define_numeric_id!(
    /// A Toggl task identifier.
    TaskId
);

/// The hour of day an entry is timestamped as starting, in \[0, 23\].
///
/// Validated on construction and on deserialization, so a schedule in hand
/// always carries a usable hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StartHour(u8);

impl StartHour {
    /// Creates a start hour after range validation.
    pub const fn new(hour: u8) -> Result<Self, ValidationError> {
        if hour > 23 {
            return Err(ValidationError::StartHourOutOfRange { value: hour });
        }
        Ok(Self(hour))
    }

    /// Returns the hour as an integer.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for StartHour {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StartHour> for u8 {
    fn from(hour: StartHour) -> Self {
        hour.0
    }
}

impl fmt::Display for StartHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}
