//! Newtype wrappers around [`uuid::Uuid`] for entity and upload identifiers.
//!
//! Using distinct types prevents accidentally passing a `FolderId` where a
//! `FileId` is expected. On the wire every identifier is the hyphenated
//! string form stored in a record's `Id` field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a newtype ID wrapper around `Uuid`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Return the inner UUID value.
            pub fn into_uuid(self) -> Uuid {
                self.0
            }

            /// Return a reference to the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a file record.
    FileId
);

define_id!(
    /// Unique identifier for a folder record.
    FolderId
);

define_id!(
    /// Identifier of an in-flight simulated upload. Never persisted.
    UploadId
);

/// One or more identifiers, normalized for batch backend calls.
///
/// Lets `delete` accept either a single id or a collection of them while
/// always issuing exactly one batched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdBatch<T>(Vec<T>);

impl<T> IdBatch<T> {
    /// The identifiers in call order.
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Consume the batch.
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    /// Number of identifiers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<FileId> for IdBatch<FileId> {
    fn from(id: FileId) -> Self {
        Self(vec![id])
    }
}

impl From<FolderId> for IdBatch<FolderId> {
    fn from(id: FolderId) -> Self {
        Self(vec![id])
    }
}

impl<T> From<Vec<T>> for IdBatch<T> {
    fn from(ids: Vec<T>) -> Self {
        Self(ids)
    }
}

impl<T: Clone> From<&[T]> for IdBatch<T> {
    fn from(ids: &[T]) -> Self {
        Self(ids.to_vec())
    }
}
