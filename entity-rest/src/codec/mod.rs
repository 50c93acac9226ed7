//! Wire codec for entity payloads
//!
//! Everything that crosses the HTTP boundary as JSON goes through this module.
//! Most attribute types use serde's structural mapping unchanged; two value
//! families need a fixed wire shape and get dedicated helpers:
//!
//! - **Date/time values** ([`zoned`], [`local`], [`utc`]): ISO-8601 strings
//!   with millisecond digits, usable as `#[serde(with = "...")]` modules.
//! - **Entity keys** ([`KeyId`], [`EntityKey`]): a single JSON scalar, a number
//!   for store-assigned ids and a string for caller-assigned names.
//!
//! # Example
//!
//! ```rust
//! use chrono::{DateTime, Utc};
//! use entity_rest::codec::{self, EntityKey, KeyId};
//! use entity_rest::entity::{Attribute, Entity};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Invoice {
//!     #[serde(default)]
//!     id: Option<i64>,
//!     #[serde(with = "codec::utc")]
//!     issued: DateTime<Utc>,
//! }
//!
//! impl Entity for Invoice {
//!     const KIND: &'static str = "Invoice";
//!
//!     fn attributes() -> &'static [Attribute] {
//!         const ATTRIBUTES: &[Attribute] = &[Attribute::new("id"), Attribute::new("issued")];
//!         ATTRIBUTES
//!     }
//!
//!     fn key(&self) -> Option<KeyId> {
//!         self.id.filter(|id| *id > 0).map(KeyId::Id)
//!     }
//!
//!     fn set_key(&mut self, key: KeyId) {
//!         if let KeyId::Id(id) = key {
//!             self.id = Some(id);
//!         }
//!     }
//! }
//!
//! let invoice: Invoice = codec::from_json(br#"{"issued":"2014-06-14T16:42:33.970Z"}"#).unwrap();
//! assert_eq!(codec::to_json(&invoice).unwrap(), r#"{"id":null,"issued":"2014-06-14T16:42:33.970Z"}"#);
//!
//! let key: EntityKey<Invoice> = serde_json::from_str("42").unwrap();
//! assert_eq!(key.id(), &KeyId::Id(42));
//! ```

mod datetime;
mod error;
mod key;

pub use datetime::{
    format_local, format_utc, format_zoned, local, parse_local, parse_utc, parse_zoned, utc, zoned,
};
pub use error::CodecError;
pub use key::{EntityKey, KeyCodec, KeyId, ScalarKeyCodec};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Decode a JSON document into a value
///
/// Errors raised by the timestamp and key codecs keep their typed variant,
/// so callers can tell a malformed date from a malformed document.
pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::from_json)
}

/// Encode a value as a JSON document
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(CodecError::Json)
}

/// Encode a value as an in-memory JSON tree
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, CodecError> {
    serde_json::to_value(value).map_err(CodecError::Json)
}
