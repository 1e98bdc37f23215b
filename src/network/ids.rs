//! Integer identities for domain objects.
//!
//! Ids are issued by an explicit [`IdSequence`] owned by whatever builds
//! the objects, so two builders never share a counter and tests never see
//! ids leak in from one another. Equality and hashing go through the
//! integer key only.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub usize);

        impl $name {
            /// Returns the raw index.
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<usize> for $name {
            fn from(raw: usize) -> Self {
                Self(raw)
            }
        }
    };
}

define_id!(
    /// Identity of a city. Cities in a [`Network`](super::Network) are
    /// numbered densely from zero, so the id doubles as a table index.
    CityId,
    "city#"
);
define_id!(
    /// Identity of a physical track.
    TrackId,
    "track#"
);
define_id!(
    /// Identity of a traveller.
    TravellerId,
    "traveller#"
);
define_id!(
    /// Identity of an event node in a time-expanded graph.
    NodeId,
    "node#"
);

/// Monotonic id issuer.
///
/// Never reuses a value. Each builder owns its own sequence.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    next: usize,
}

impl IdSequence {
    /// Creates a sequence starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next raw id.
    pub fn issue(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> usize {
        self.next
    }
}
