//! Newtype wrappers around opaque registry identifiers.
//!
//! The asset and organizational registries hand out opaque string document
//! ids (e.g. `"S1"` for a substation). Using distinct types prevents
//! accidentally passing a `UserId` where a `SubstationId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around an opaque registry string.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from a registry string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner string value.
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Identifier of a substation record in the org registry.
    SubstationId
}

define_id! {
    /// Identifier of a subdivision record in the org registry.
    SubdivisionId
}

define_id! {
    /// Identifier of a division record in the org registry.
    DivisionId
}

define_id! {
    /// Identifier of a circle record in the org registry.
    CircleId
}

define_id! {
    /// Identifier of a zone record in the org registry.
    ZoneId
}

define_id! {
    /// Identifier of a user record.
    UserId
}

define_id! {
    /// Identifier of an asset (bay) record in the asset registry.
    AssetId
}

define_id! {
    /// Identifier of a grid-event record.
    EventId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_as_str() {
        let id = SubstationId::new("S1");
        assert_eq!(id.as_str(), "S1");
        assert_eq!(id.to_string(), "S1");
    }

    #[test]
    fn serde_transparent() {
        let id = UserId::new("user-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"user-42\"");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
