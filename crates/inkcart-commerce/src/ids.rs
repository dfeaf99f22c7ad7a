//! Newtype IDs for type-safe identifiers.
//!
//! All identifiers are catalog-backed integers assigned by the persisted
//! store. Newtypes prevent accidentally mixing them up, e.g. passing a
//! ProductId where a VariantValueId is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate integer newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A store-assigned integer identifier.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw identifier.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw identifier.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }

            /// Whether the identifier refers to a persisted row.
            ///
            /// Zero and negative values are placeholders used for optimistic
            /// local state that has not been confirmed by the store yet.
            pub const fn is_persisted(&self) -> bool {
                self.0 > 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(ProductId);
define_id!(UserId);
define_id!(CartId);
define_id!(VariantGroupId);
define_id!(VariantValueId);
