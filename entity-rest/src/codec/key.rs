//! Entity key encoding
//!
//! A key travels as one JSON scalar: a number when the store assigned a
//! numeric id, a string when the caller assigned a name. The entity kind is
//! never written to the wire; it is recovered from the declared field type,
//! so `EntityKey<Customer>` always decodes to a `Customer` key.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::error::CodecError;
use crate::entity::Entity;

/// The scalar part of an entity key
///
/// Exactly one representation is populated. Numeric ids are strictly
/// positive; names are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyId {
    /// Store-assigned numeric surrogate id
    Id(i64),
    /// Caller-assigned name
    Name(String),
}

impl KeyId {
    /// Parse a decimal path segment into a numeric id
    ///
    /// # Example
    ///
    /// ```rust
    /// use entity_rest::codec::KeyId;
    ///
    /// assert_eq!(KeyId::parse_id("42").unwrap(), KeyId::Id(42));
    /// assert!(KeyId::parse_id("abc").is_err());
    /// assert!(KeyId::parse_id("0").is_err());
    /// ```
    pub fn parse_id(raw: &str) -> Result<Self, CodecError> {
        match raw.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self::Id(id)),
            _ => Err(CodecError::identifier(raw)),
        }
    }

    /// The numeric id, if this is a store-assigned key
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Name(_) => None,
        }
    }

    /// The name, if this is a caller-assigned key
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Name(name) => Some(name),
        }
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<i64> for KeyId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for KeyId {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Strategy for moving keys on and off the wire
///
/// The crate ships a single implementation, [`ScalarKeyCodec`]; the trait
/// marks the seam where the wire format is decided.
pub trait KeyCodec {
    /// Encode a key as a JSON value
    fn encode(&self, key: &KeyId) -> Value;

    /// Decode a key of the given kind from a JSON value
    fn decode(&self, kind: &str, value: &Value) -> Result<KeyId, CodecError>;
}

/// Numbers for ids, strings for names
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarKeyCodec;

impl KeyCodec for ScalarKeyCodec {
    fn encode(&self, key: &KeyId) -> Value {
        match key {
            KeyId::Id(id) => Value::from(*id),
            KeyId::Name(name) => Value::from(name.as_str()),
        }
    }

    fn decode(&self, kind: &str, value: &Value) -> Result<KeyId, CodecError> {
        let decoded = match value {
            Value::Number(number) => number.as_i64().filter(|id| *id > 0).map(KeyId::Id),
            Value::String(name) if !name.is_empty() => Some(KeyId::Name(name.clone())),
            _ => None,
        };
        decoded.ok_or_else(|| {
            tracing::debug!(kind, raw = %value, "rejected entity key");
            CodecError::identifier(value.to_string())
        })
    }
}

impl Serialize for KeyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Id(id) => serializer.serialize_i64(*id),
            Self::Name(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for KeyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ScalarKeyCodec
            .decode("unknown", &value)
            .map_err(de::Error::custom)
    }
}

/// A typed reference to an entity of kind `E`
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct Order {
///     customer: EntityKey<Customer>,
/// }
/// ```
pub struct EntityKey<E> {
    id: KeyId,
    kind: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityKey<E> {
    /// Build a key for an entity of kind `E`
    pub fn new(id: impl Into<KeyId>) -> Self {
        Self {
            id: id.into(),
            kind: PhantomData,
        }
    }

    /// The kind name declared by `E`
    #[must_use]
    pub fn kind(&self) -> &'static str {
        E::KIND
    }

    /// The scalar identifier
    #[must_use]
    pub fn id(&self) -> &KeyId {
        &self.id
    }

    /// Consume the key and return its identifier
    #[must_use]
    pub fn into_id(self) -> KeyId {
        self.id
    }
}

impl<E> Clone for EntityKey<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            kind: PhantomData,
        }
    }
}

impl<E> PartialEq for EntityKey<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E> Eq for EntityKey<E> {}

impl<E> PartialOrd for EntityKey<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for EntityKey<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl<E> Hash for EntityKey<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<E: Entity> fmt::Debug for EntityKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityKey")
            .field("kind", &E::KIND)
            .field("id", &self.id)
            .finish()
    }
}

impl<E: Entity> fmt::Display for EntityKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", E::KIND, self.id)
    }
}

impl<E> Serialize for EntityKey<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

impl<'de, E: Entity> Deserialize<'de> for EntityKey<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let id = ScalarKeyCodec
            .decode(E::KIND, &value)
            .map_err(de::Error::custom)?;
        Ok(Self::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Attribute;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Account {
        id: Option<i64>,
    }

    impl Entity for Account {
        const KIND: &'static str = "Account";

        fn attributes() -> &'static [Attribute] {
            &[]
        }

        fn key(&self) -> Option<KeyId> {
            self.id.map(KeyId::Id)
        }

        fn set_key(&mut self, key: KeyId) {
            self.id = key.id();
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Transfer {
        from: EntityKey<Account>,
        to: Option<EntityKey<Account>>,
    }

    #[test]
    fn test_numeric_id_encodes_as_number() {
        let key = EntityKey::<Account>::new(42);
        assert_eq!(serde_json::to_string(&key).unwrap(), "42");
    }

    #[test]
    fn test_name_encodes_as_string() {
        let key = EntityKey::<Account>::new("savings");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"savings\"");
    }

    #[test]
    fn test_kind_recovered_from_field_type() {
        let transfer: Transfer = serde_json::from_str(r#"{"from":7,"to":"savings"}"#).unwrap();
        assert_eq!(transfer.from.kind(), "Account");
        assert_eq!(transfer.from.id(), &KeyId::Id(7));
        assert_eq!(transfer.to.unwrap().id(), &KeyId::Name("savings".to_string()));
    }

    #[test]
    fn test_rejects_non_scalar_and_empty_keys() {
        for raw in ["0", "-3", "\"\"", "true", "[1]", "1.5"] {
            let json = format!(r#"{{"from":{raw}}}"#);
            let err = crate::codec::from_json::<Transfer>(json.as_bytes()).unwrap_err();
            assert!(
                matches!(err, CodecError::MalformedIdentifier { .. }),
                "{raw} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_codec_round_trip() {
        let codec = ScalarKeyCodec;
        for key in [KeyId::Id(9), KeyId::Name("north".to_string())] {
            let encoded = codec.encode(&key);
            assert_eq!(codec.decode("Account", &encoded).unwrap(), key);
        }
    }

    #[test]
    fn test_keys_compare_by_identifier() {
        assert_eq!(EntityKey::<Account>::new(3), EntityKey::<Account>::new(3));
        assert!(EntityKey::<Account>::new(3) < EntityKey::<Account>::new(4));
        assert!(KeyId::Id(i64::MAX) < KeyId::Name("a".to_string()));
    }

    #[test]
    fn test_parse_id_path_segment() {
        assert_eq!(KeyId::parse_id("17").unwrap(), KeyId::Id(17));
        assert!(matches!(
            KeyId::parse_id("17a"),
            Err(CodecError::MalformedIdentifier { raw }) if raw == "17a"
        ));
    }
}
