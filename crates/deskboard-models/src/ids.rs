//! Record and user identifiers.
//!
//! Ids come from the store as opaque strings. Locally generated ids carry
//! a kind prefix so fixtures and logs stay readable.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix of generated ids.
            pub const PREFIX: &'static str = $prefix;

            /// Generates a fresh `<prefix>-<uuid>` id for records built locally.
            pub fn generate() -> Self {
                Self(format!("{}-{}", Self::PREFIX, Uuid::new_v4()))
            }

            /// Wraps an id read from a row or a selector value.
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the id was generated locally.
            pub fn is_generated(&self) -> bool {
                self.0
                    .strip_prefix(Self::PREFIX)
                    .and_then(|rest| rest.strip_prefix('-'))
                    .is_some_and(|rest| Uuid::parse_str(rest).is_ok())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(TaskId, "task");
define_id!(RoomId, "room");
define_id!(UserId, "user");
