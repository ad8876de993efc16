//! Strongly typed identifier wrappers.
//!
//! Both IDs wrap a `Uuid`: shipments live in a sparse persisted store keyed
//! by stable identity, not a dense index space, so a random 128-bit id is
//! the right shape (and matches what the surrounding e-commerce platform
//! uses for orders).

use std::fmt;

use uuid::Uuid;

/// Generate a typed ID wrapper around a `Uuid`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug,
                 serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub Uuid);

        impl $name {
            /// Mint a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
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

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

typed_id! {
    /// Identity of one shipment record.
    pub struct ShipmentId;
}

typed_id! {
    /// Identity of the order a shipment belongs to.  Exactly one active
    /// shipment may exist per order — the store enforces this on create.
    pub struct OrderId;
}
