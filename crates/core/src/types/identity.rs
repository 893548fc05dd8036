//! Shopper identity for cart ownership.
//!
//! A cart belongs to exactly one shopper, identified either by a stable
//! customer id or by a browser-generated anonymous id. The two are mutually
//! exclusive; requests that present both (or neither) are rejected before
//! any cart work happens.

use serde::{Deserialize, Serialize};

use crate::types::id::{AnonymousId, CustomerId};

/// The resolved owner of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum ShopperIdentity {
    /// A signed-in customer.
    Customer(CustomerId),
    /// A guest identified by a browser-generated UUID.
    Anonymous(AnonymousId),
}

impl ShopperIdentity {
    /// The customer id, when this shopper is signed in.
    #[must_use]
    pub const fn customer_id(&self) -> Option<CustomerId> {
        match self {
            Self::Customer(id) => Some(*id),
            Self::Anonymous(_) => None,
        }
    }

    /// The anonymous id, when this shopper is a guest.
    #[must_use]
    pub const fn anonymous_id(&self) -> Option<AnonymousId> {
        match self {
            Self::Customer(_) => None,
            Self::Anonymous(id) => Some(*id),
        }
    }
}

impl std::fmt::Display for ShopperIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer(id) => write!(f, "customer:{id}"),
            Self::Anonymous(id) => write!(f, "anonymous:{id}"),
        }
    }
}

/// Why a request's identity headers could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Neither identity header was present.
    #[error("no shopper identity provided")]
    Missing,
    /// Both identity headers were present.
    #[error("customer and anonymous identities are mutually exclusive")]
    Ambiguous,
    /// A header was present but was not a valid UUID.
    #[error("malformed shopper identity: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_exclusive_accessors() {
        let customer = ShopperIdentity::Customer(CustomerId::new(Uuid::nil()));
        assert!(customer.customer_id().is_some());
        assert!(customer.anonymous_id().is_none());

        let guest = ShopperIdentity::Anonymous(AnonymousId::new(Uuid::nil()));
        assert!(guest.customer_id().is_none());
        assert!(guest.anonymous_id().is_some());
    }

    #[test]
    fn test_display_prefixes_kind() {
        let id = Uuid::nil();
        let guest = ShopperIdentity::Anonymous(AnonymousId::new(id));
        assert_eq!(guest.to_string(), format!("anonymous:{id}"));
    }
}
