//! In-memory entity store
//!
//! A key-ordered map behind a `tokio::sync::RwLock`, suitable for tests and
//! demos. Predicates are evaluated against each entity's serialized JSON
//! attributes: strings compare lexically, numbers numerically, booleans by
//! value. Any other attribute type never matches a predicate.
//!
//! Cursors record the position of the last returned entity (its ordering
//! value and key) together with a fingerprint of the query that produced
//! them. Resuming continues strictly after that position, so entities
//! inserted or deleted between pages neither shift nor repeat the walk, and
//! a cursor replayed against a different filter or ordering is rejected.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::ops::Bound;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use super::error::{RepositoryError, RepositoryOperation};
use super::query::{FilterCondition, FilterOperator, QueryBatch, StoreQuery};
use super::traits::{EntityStore, RepositoryResult};
use crate::codec::{self, KeyId};
use crate::entity::Entity;
use crate::pagination::Cursor;

/// Key-ordered in-memory store for one entity kind
///
/// # Example
///
/// ```rust,ignore
/// let store = Arc::new(MemoryStore::<Customer>::new());
/// let saved = store.save(customer).await?;
/// assert!(saved.key().is_some());
/// ```
#[derive(Debug)]
pub struct MemoryStore<E> {
    entities: RwLock<BTreeMap<KeyId, E>>,
    next_id: AtomicI64,
}

impl<E: Entity> MemoryStore<E> {
    /// Create an empty store; the first assigned id is 1
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored entities
    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }

    fn assign_id(&self) -> KeyId {
        KeyId::Id(self.next_id.fetch_add(1, AtomicOrdering::SeqCst))
    }
}

impl<E: Entity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    async fn query(&self, query: &StoreQuery) -> RepositoryResult<QueryBatch<E>> {
        let fingerprint = fingerprint(query);
        let resume = match &query.cursor {
            Some(cursor) => Some(decode_cursor(cursor, &fingerprint)?),
            None => None,
        };
        let order_by = query.order_by.as_deref();

        let entities = self.entities.read().await;
        let candidates: Box<dyn Iterator<Item = (&KeyId, &E)> + '_> = match (&resume, order_by) {
            (Some(resume), None) => Box::new(
                entities.range((Bound::Excluded(&resume.after_key), Bound::Unbounded)),
            ),
            _ => Box::new(entities.iter()),
        };

        let mut matched = Vec::new();
        for (key, entity) in candidates {
            let value = codec::to_value(entity).map_err(|err| {
                RepositoryError::serialization_error(RepositoryOperation::Query, err.to_string())
                    .with_entity(E::KIND, key.to_string())
            })?;
            if query
                .conditions
                .iter()
                .all(|condition| satisfies(&value, condition))
            {
                matched.push((value, key, entity));
            }
        }

        if let Some(order_by) = order_by {
            matched.sort_by(|(a, a_key, _), (b, b_key, _)| {
                compare_values(a.get(order_by), b.get(order_by)).then_with(|| a_key.cmp(b_key))
            });
            if let Some(resume) = &resume {
                matched.retain(|(value, key, _)| {
                    compare_values(value.get(order_by), resume.after_value.as_ref())
                        .then_with(|| (*key).cmp(&resume.after_key))
                        == Ordering::Greater
                });
            }
        }

        let total = matched.len();
        matched.truncate(query.limit);
        let cursor = match matched.last() {
            Some((value, key, _)) => Some(encode_cursor(
                &CursorToken {
                    fingerprint,
                    after_key: (*key).clone(),
                    after_value: order_by.and_then(|field| value.get(field).cloned()),
                },
            )?),
            None => None,
        };
        let page: Vec<E> = matched
            .into_iter()
            .map(|(_, _, entity)| entity.clone())
            .collect();

        debug!(
            kind = E::KIND,
            resumed = resume.is_some(),
            remaining = total,
            count = page.len(),
            "memory store query"
        );
        Ok(QueryBatch::new(page, cursor))
    }

    async fn find(&self, id: &KeyId) -> RepositoryResult<Option<E>> {
        Ok(self.entities.read().await.get(id).cloned())
    }

    async fn find_many(&self, ids: &[KeyId]) -> RepositoryResult<Vec<E>> {
        let entities = self.entities.read().await;
        Ok(ids.iter().filter_map(|id| entities.get(id).cloned()).collect())
    }

    async fn save(&self, mut entity: E) -> RepositoryResult<E> {
        let key = match entity.key() {
            Some(key) => {
                if let KeyId::Id(id) = &key {
                    self.next_id
                        .fetch_max(id.saturating_add(1), AtomicOrdering::SeqCst);
                }
                key
            }
            None => {
                let key = self.assign_id();
                entity.set_key(key.clone());
                key
            }
        };
        trace!(kind = E::KIND, id = %key, "memory store save");
        self.entities.write().await.insert(key, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: &KeyId) -> RepositoryResult<bool> {
        Ok(self.entities.write().await.remove(id).is_some())
    }
}

fn satisfies(entity: &Value, condition: &FilterCondition) -> bool {
    let Some(ordering) = entity
        .get(&condition.field)
        .and_then(|attribute| compare_literal(attribute, &condition.value))
    else {
        return false;
    };
    match condition.operator {
        FilterOperator::Equal => ordering == Ordering::Equal,
        FilterOperator::GreaterThanOrEqual => ordering != Ordering::Less,
        FilterOperator::LessThan => ordering == Ordering::Less,
    }
}

fn compare_literal(attribute: &Value, literal: &str) -> Option<Ordering> {
    match attribute {
        Value::String(text) => Some(text.as_str().cmp(literal)),
        Value::Number(number) => {
            let literal = literal.parse::<f64>().ok()?;
            number.as_f64()?.partial_cmp(&literal)
        }
        Value::Bool(flag) => Some(flag.cmp(&literal.parse::<bool>().ok()?)),
        _ => None,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (a, b) => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

fn fingerprint(query: &StoreQuery) -> String {
    let mut hasher = DefaultHasher::new();
    for condition in &query.conditions {
        condition.to_string().hash(&mut hasher);
    }
    query.order_by.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Resume point: the last entity returned, in query order
#[derive(Debug, Serialize, Deserialize)]
struct CursorToken {
    #[serde(rename = "q")]
    fingerprint: String,
    #[serde(rename = "k")]
    after_key: KeyId,
    #[serde(rename = "v", default, skip_serializing_if = "Option::is_none")]
    after_value: Option<Value>,
}

fn encode_cursor(token: &CursorToken) -> RepositoryResult<Cursor> {
    let bytes = serde_json::to_vec(token).map_err(|err| {
        RepositoryError::serialization_error(RepositoryOperation::Query, err.to_string())
    })?;
    Ok(Cursor::new(URL_SAFE_NO_PAD.encode(bytes)))
}

fn decode_cursor(cursor: &Cursor, fingerprint: &str) -> RepositoryResult<CursorToken> {
    let invalid = |reason: &str| {
        RepositoryError::invalid_cursor(
            RepositoryOperation::Query,
            format!("cursor `{}` {}", cursor, reason),
        )
    };
    let token: CursorToken = URL_SAFE_NO_PAD
        .decode(cursor.as_str())
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or_else(|| invalid("is not a valid token"))?;
    if token.fingerprint != fingerprint {
        return Err(invalid("was issued for a different query"));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Attribute;
    use crate::repository::RepositoryErrorKind;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        #[serde(rename = "_id", default)]
        id: i64,
        name: String,
        stock: i64,
        active: bool,
    }

    impl Entity for Item {
        const KIND: &'static str = "Item";

        fn attributes() -> &'static [Attribute] {
            const ATTRIBUTES: &[Attribute] = &[
                Attribute::new("_id"),
                Attribute::indexed("name"),
                Attribute::new("stock"),
                Attribute::new("active"),
            ];
            ATTRIBUTES
        }

        fn key(&self) -> Option<KeyId> {
            (self.id > 0).then_some(KeyId::Id(self.id))
        }

        fn set_key(&mut self, key: KeyId) {
            if let KeyId::Id(id) = key {
                self.id = id;
            }
        }
    }

    fn item(name: &str, stock: i64) -> Item {
        Item {
            id: 0,
            name: name.to_string(),
            stock,
            active: stock > 0,
        }
    }

    async fn seeded(names: &[&str]) -> MemoryStore<Item> {
        let store = MemoryStore::new();
        for (index, name) in names.iter().enumerate() {
            store.save(item(name, index as i64)).await.unwrap();
        }
        store
    }

    fn names(batch: &QueryBatch<Item>) -> Vec<&str> {
        batch.entities.iter().map(|item| item.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let first = store.save(item("a", 1)).await.unwrap();
        let second = store.save(item("b", 1)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_explicit_id_advances_counter() {
        let store = MemoryStore::new();
        let mut explicit = item("a", 1);
        explicit.id = 10;
        store.save(explicit).await.unwrap();
        let assigned = store.save(item("b", 1)).await.unwrap();
        assert_eq!(assigned.id, 11);
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let store = MemoryStore::new();
        let mut saved = store.save(item("a", 1)).await.unwrap();
        saved.name = "renamed".to_string();
        store.save(saved.clone()).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.find(&KeyId::Id(saved.id)).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_find_many_keeps_request_order_and_skips_missing() {
        let store = seeded(&["a", "b", "c"]).await;
        let found = store
            .find_many(&[KeyId::Id(3), KeyId::Id(99), KeyId::Id(1)])
            .await
            .unwrap();
        let names: Vec<_> = found.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = seeded(&["a"]).await;
        assert!(store.delete(&KeyId::Id(1)).await.unwrap());
        assert!(!store.delete(&KeyId::Id(1)).await.unwrap());
        assert!(store.find(&KeyId::Id(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_range_conditions_on_strings() {
        let store = seeded(&["ABC", "ABD", "AB", "ABCD"]).await;
        let query = StoreQuery::new(10).with_conditions(vec![
            FilterCondition::gte("name", "ABC"),
            FilterCondition::lt("name", "ABD"),
        ]);
        let batch = store.query(&query).await.unwrap();
        assert_eq!(names(&batch), vec!["ABC", "ABCD"]);
    }

    #[tokio::test]
    async fn test_numeric_and_boolean_conditions() {
        let store = seeded(&["a", "b", "c", "d"]).await;
        let query = StoreQuery::new(10).with_conditions(vec![FilterCondition::gte("stock", "2")]);
        assert_eq!(names(&store.query(&query).await.unwrap()), vec!["c", "d"]);

        let query = StoreQuery::new(10).with_conditions(vec![FilterCondition::eq("active", "false")]);
        assert_eq!(names(&store.query(&query).await.unwrap()), vec!["a"]);

        let query = StoreQuery::new(10).with_conditions(vec![FilterCondition::eq("stock", "many")]);
        assert!(store.query(&query).await.unwrap().entities.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_attribute_never_matches() {
        let store = seeded(&["a"]).await;
        let query = StoreQuery::new(10).with_conditions(vec![FilterCondition::eq("colour", "red")]);
        assert!(store.query(&query).await.unwrap().entities.is_empty());
    }

    #[tokio::test]
    async fn test_cursor_walk_visits_each_entity_once() {
        let store = seeded(&["a", "b", "c", "d", "e", "f", "g"]).await;
        let mut query = StoreQuery::new(3);
        let mut seen = Vec::new();
        loop {
            let batch = store.query(&query).await.unwrap();
            if batch.entities.is_empty() {
                break;
            }
            seen.extend(batch.entities.iter().map(|item| item.name.clone()));
            query = query.with_cursor(batch.cursor);
        }
        assert_eq!(seen, vec!["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[tokio::test]
    async fn test_order_by_attribute() {
        let store = seeded(&["c", "a", "b"]).await;
        let query = StoreQuery::new(10).with_order_by(Some("name"));
        assert_eq!(names(&store.query(&query).await.unwrap()), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_cursor_from_other_query_is_rejected() {
        let store = seeded(&["a", "b", "c"]).await;
        let first = store.query(&StoreQuery::new(1)).await.unwrap();
        let other = StoreQuery::new(1)
            .with_conditions(vec![FilterCondition::eq("name", "b")])
            .with_cursor(first.cursor);
        let err = store.query(&other).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::InvalidCursor);
    }

    #[tokio::test]
    async fn test_resume_survives_delete_between_pages() {
        let store = seeded(&["a", "b", "c", "d"]).await;
        let first = store.query(&StoreQuery::new(2)).await.unwrap();
        assert_eq!(names(&first), vec!["a", "b"]);

        store.delete(&KeyId::Id(1)).await.unwrap();
        let second = store
            .query(&StoreQuery::new(2).with_cursor(first.cursor))
            .await
            .unwrap();
        assert_eq!(names(&second), vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_ordered_resume_survives_insert_between_pages() {
        let store = seeded(&["d", "b", "a", "c"]).await;
        let ordered = StoreQuery::new(2).with_order_by(Some("name"));
        let first = store.query(&ordered).await.unwrap();
        assert_eq!(names(&first), vec!["a", "b"]);

        store.save(item("aa", 0)).await.unwrap();
        store.delete(&KeyId::Id(3)).await.unwrap();
        let second = store
            .query(&ordered.clone().with_cursor(first.cursor))
            .await
            .unwrap();
        assert_eq!(names(&second), vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_ordered_resume_breaks_ties_by_key() {
        let store = seeded(&["x", "x", "x"]).await;
        let ordered = StoreQuery::new(1).with_order_by(Some("name"));
        let mut query = ordered.clone();
        let mut ids = Vec::new();
        loop {
            let batch = store.query(&query).await.unwrap();
            if batch.entities.is_empty() {
                break;
            }
            ids.extend(batch.entities.iter().map(|item| item.id));
            query = ordered.clone().with_cursor(batch.cursor);
        }
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_garbage_cursor_is_rejected() {
        let store = seeded(&["a"]).await;
        let query = StoreQuery::new(1).with_cursor(Some(Cursor::new("%%%")));
        let err = store.query(&query).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::InvalidCursor);
    }
}
