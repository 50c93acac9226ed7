//! Customer API Example
//!
//! Serves a `Customer` collection from the in-memory store under
//! `/customers`, seeded with a few records.
//!
//! Run with:
//! ```bash
//! cargo run --example customer-api
//! ```
//!
//! Then try:
//! ```bash
//! curl 'http://localhost:8080/customers'
//! curl 'http://localhost:8080/customers?filter=name:Fel,name_option:&fields=name,surname'
//! curl 'http://localhost:8080/customers?set=1,3'
//! curl 'http://localhost:8080/customers?indexAttributes'
//! curl -X POST -d '{"name":"Ada","address":"Main St"}' 'http://localhost:8080/customers'
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use entity_rest::codec;
use entity_rest::prelude::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Customer {
    #[serde(rename = "_id", default)]
    id: i64,
    name: String,
    #[serde(default)]
    surname: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(with = "codec::utc::option", default)]
    date: Option<DateTime<Utc>>,
    #[serde(with = "codec::local::option", default)]
    date1: Option<NaiveDateTime>,
}

impl Customer {
    fn new(name: &str, surname: &str, address: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            surname: Some(surname.to_string()),
            address: Some(address.to_string()),
            date: Some(Utc::now()),
            date1: Some(chrono::Local::now().naive_local()),
        }
    }
}

impl Entity for Customer {
    const KIND: &'static str = "Customer";

    fn attributes() -> &'static [Attribute] {
        const ATTRIBUTES: &[Attribute] = &[
            Attribute::new("_id"),
            Attribute::indexed("name"),
            Attribute::new("surname"),
            Attribute::new("address"),
            Attribute::new("date"),
            Attribute::new("date1"),
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

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let store = Arc::new(MemoryStore::<Customer>::new());
    for (name, surname, address) in [
        ("Felix", "Test", "Test"),
        ("Felicia", "Sample", "Elm Road"),
        ("Bruno", "Example", "Harbour Lane"),
    ] {
        store.save(Customer::new(name, surname, address)).await?;
    }
    info!("Seeded {} customers", store.len().await);

    let customers = ResourceHandler::new(store, &config.resource);
    let app = Router::new().nest("/customers", customers.router());

    Server::new(config).serve(app).await?;

    Ok(())
}
