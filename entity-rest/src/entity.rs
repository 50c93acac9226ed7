//! Entity kinds served by a resource handler
//!
//! An entity is a plain serde record plus a small static declaration: its
//! kind name, its attributes in declaration order, and which of them are
//! indexed. The declaration drives field projection and the
//! `indexAttributes` listing; nothing is discovered by reflection.
//!
//! # Example
//!
//! ```rust
//! use entity_rest::codec::KeyId;
//! use entity_rest::entity::{Attribute, Entity};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Customer {
//!     #[serde(rename = "_id", default)]
//!     id: i64,
//!     name: String,
//!     surname: Option<String>,
//! }
//!
//! impl Entity for Customer {
//!     const KIND: &'static str = "Customer";
//!
//!     fn attributes() -> &'static [Attribute] {
//!         const ATTRIBUTES: &[Attribute] = &[
//!             Attribute::new("_id"),
//!             Attribute::indexed("name"),
//!             Attribute::new("surname"),
//!         ];
//!         ATTRIBUTES
//!     }
//!
//!     fn key(&self) -> Option<KeyId> {
//!         (self.id > 0).then_some(KeyId::Id(self.id))
//!     }
//!
//!     fn set_key(&mut self, key: KeyId) {
//!         if let KeyId::Id(id) = key {
//!             self.id = id;
//!         }
//!     }
//! }
//!
//! assert_eq!(Customer::indexed_attributes(), vec!["name"]);
//! ```

use serde::{de::DeserializeOwned, Serialize};

use crate::codec::{EntityKey, KeyId};

/// One declared attribute of an entity kind
///
/// `name` is the attribute's wire name, i.e. the key it has in the entity's
/// serialized JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    /// Wire name of the attribute
    pub name: &'static str,
    /// Whether the store keeps an index on this attribute
    pub indexed: bool,
}

impl Attribute {
    /// Declare an unindexed attribute
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            indexed: false,
        }
    }

    /// Declare an indexed attribute
    #[must_use]
    pub const fn indexed(name: &'static str) -> Self {
        Self {
            name,
            indexed: true,
        }
    }
}

/// A record type that can be bound to a [`ResourceHandler`](crate::handlers::ResourceHandler)
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Kind name, used in logs and error bodies
    const KIND: &'static str;

    /// Attributes in declaration order
    fn attributes() -> &'static [Attribute];

    /// Current key, or `None` when the entity has not been persisted yet
    fn key(&self) -> Option<KeyId>;

    /// Store the key assigned by the store
    fn set_key(&mut self, key: KeyId);

    /// Attribute the store should order list queries by
    ///
    /// `None` leaves the store's natural (key) order.
    fn default_ordering() -> Option<&'static str> {
        None
    }

    /// Names of the indexed attributes, in declaration order
    fn indexed_attributes() -> Vec<&'static str> {
        Self::attributes()
            .iter()
            .filter(|attribute| attribute.indexed)
            .map(|attribute| attribute.name)
            .collect()
    }

    /// Typed key of this entity, if it has one
    fn entity_key(&self) -> Option<EntityKey<Self>> {
        self.key().map(EntityKey::new)
    }
}
