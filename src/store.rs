use std::fmt;
use std::sync::RwLock;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::db::{self, DbPool};
use crate::errors::{Error, Result, StorageError};
use crate::models::Payload;
use crate::schema::{records, store_collections, store_meta};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Logical schema version stamped into `store_meta`
///
/// Version 1 introduced the subjects through events collections;
/// version 2 added chats. Opening a store whose stored version is older
/// registers any missing collections and restamps. Purely additive, no
/// data migration.
pub const SCHEMA_VERSION: i32 = 2;

const META_ROW_ID: i32 = 1;

/// The named record collections held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Subjects,
    Tasks,
    Exams,
    Notes,
    Goals,
    Events,
    Chats,
}

impl Collection {
    /// Every collection, in registration order
    pub const ALL: [Collection; 7] = [
        Collection::Subjects,
        Collection::Tasks,
        Collection::Exams,
        Collection::Notes,
        Collection::Goals,
        Collection::Events,
        Collection::Chats,
    ];

    /// The collection's persisted name
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Subjects => "subjects",
            Collection::Tasks => "tasks",
            Collection::Exams => "exams",
            Collection::Notes => "notes",
            Collection::Goals => "goals",
            Collection::Events => "events",
            Collection::Chats => "chats",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored record: a collection name, an id, and a JSON payload
///
/// The store does not know which entity type a payload holds; decoding
/// is the repository's job.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StoredRecord {
    collection: String,
    id: String,
    payload: Payload,
}

impl StoredRecord {
    fn new(collection: Collection, id: &str, payload: serde_json::Value) -> Self {
        Self {
            collection: collection.as_str().to_string(),
            id: id.to_string(),
            payload: Payload(payload),
        }
    }

    /// Gets the record's id
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets a copy of the JSON payload
    pub fn get_payload(&self) -> serde_json::Value {
        self.payload.0.clone()
    }

    /// Consumes the record, returning its JSON payload
    pub fn into_payload(self) -> serde_json::Value {
        self.payload.into_inner()
    }
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = crate::schema::store_collections)]
struct CollectionRow {
    name: String,
    created_at: NaiveDateTime,
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = crate::schema::store_meta)]
struct MetaRow {
    id: i32,
    schema_version: i32,
}

/// The persistent store: a durable key-value layer over named collections
///
/// A `LocalStore` is constructed unopened and performs no I/O until
/// [`open`](LocalStore::open) succeeds; every data operation before that
/// fails fast with [`Error::NotReady`]. The handle is cheap to share
/// behind an `Arc` and is opened once per process lifetime.
///
/// The store is deliberately thin: it never caches, never retries, and
/// never interprets payloads. Consistency policies (read-after-write
/// refresh, cascades, defaults) live in the repository layer.
pub struct LocalStore {
    database_url: String,
    busy_timeout: Duration,
    pool: RwLock<Option<DbPool>>,
}

impl LocalStore {
    /// Creates an unopened store handle from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            database_url: config.database_url.clone(),
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
            pool: RwLock::new(None),
        }
    }

    /// Creates an unopened store over a private in-memory database
    ///
    /// Each call names a distinct shared-cache database, so concurrent
    /// tests never see each other's data. The data lives as long as the
    /// pool holds connections.
    pub fn in_memory() -> Self {
        Self {
            database_url: format!("file:store_{}?mode=memory&cache=shared", Uuid::new_v4()),
            busy_timeout: Duration::from_millis(100),
            pool: RwLock::new(None),
        }
    }

    /// Opens the store: pool, migrations, collection registration
    ///
    /// Idempotent: calling `open` on an already-open store returns
    /// immediately. On first success the handle becomes ready and stays
    /// ready for the life of the process.
    ///
    /// ### Errors
    ///
    /// Returns `Error::Storage` when the database cannot be opened, a
    /// migration fails, or collection registration fails.
    #[instrument(skip(self), fields(database_url = %self.database_url))]
    pub async fn open(&self) -> Result<()> {
        if self.pool.read().expect("store lock poisoned").is_some() {
            debug!("Store already open");
            return Ok(());
        }

        info!("Opening local store");
        let pool = db::init_pool(&self.database_url, self.busy_timeout)?;
        let mut conn = pool.get()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        register_collections(&mut conn)?;

        let mut slot = self.pool.write().expect("store lock poisoned");
        // A concurrent open may have won the race; the spare pool is dropped.
        if slot.is_none() {
            *slot = Some(pool);
        }
        Ok(())
    }

    /// True once `open` has succeeded
    pub fn is_open(&self) -> bool {
        self.pool.read().expect("store lock poisoned").is_some()
    }

    fn pool(&self) -> Result<DbPool> {
        self.pool
            .read()
            .expect("store lock poisoned")
            .clone()
            .ok_or(Error::NotReady)
    }

    /// Returns every record in the named collection
    ///
    /// Order is unspecified; callers must not rely on storage order.
    #[instrument(skip(self))]
    pub async fn get_all(&self, collection: Collection) -> Result<Vec<StoredRecord>> {
        let pool = self.pool()?;
        let mut conn = pool.get()?;

        let rows = records::table
            .filter(records::collection.eq(collection.as_str()))
            .select(StoredRecord::as_select())
            .load(&mut conn)?;

        debug!(collection = %collection, count = rows.len(), "Loaded collection");
        Ok(rows)
    }

    /// Inserts a new record
    ///
    /// ### Errors
    ///
    /// Returns `Error::DuplicateKey` when the id already exists in the
    /// collection, `Error::NotReady` before `open`, and `Error::Storage`
    /// for engine failures.
    #[instrument(skip(self, payload), fields(collection = %collection, id = %id))]
    pub async fn add(
        &self,
        collection: Collection,
        id: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        let pool = self.pool()?;
        let mut conn = pool.get()?;

        let record = StoredRecord::new(collection, id, payload);
        let result = diesel::insert_into(records::table)
            .values(&record)
            .execute(&mut conn);

        match result {
            Ok(_) => {
                debug!("Added record");
                Ok(())
            }
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            )) => Err(Error::DuplicateKey {
                collection,
                id: id.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Upserts a record: inserts if absent, fully overwrites if present
    #[instrument(skip(self, payload), fields(collection = %collection, id = %id))]
    pub async fn put(
        &self,
        collection: Collection,
        id: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        let pool = self.pool()?;
        let mut conn = pool.get()?;

        let record = StoredRecord::new(collection, id, payload);
        diesel::replace_into(records::table)
            .values(&record)
            .execute(&mut conn)?;

        debug!("Put record");
        Ok(())
    }

    /// Deletes a record by id; deleting an unknown id is a no-op
    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    pub async fn remove(&self, collection: Collection, id: &str) -> Result<()> {
        let pool = self.pool()?;
        let mut conn = pool.get()?;

        let deleted = diesel::delete(
            records::table
                .filter(records::collection.eq(collection.as_str()))
                .filter(records::id.eq(id)),
        )
        .execute(&mut conn)?;

        debug!(deleted, "Removed record");
        Ok(())
    }

    /// Removes every record in a collection
    ///
    /// Used only by the restore and import flows.
    #[instrument(skip(self))]
    pub async fn clear(&self, collection: Collection) -> Result<()> {
        let pool = self.pool()?;
        let mut conn = pool.get()?;

        let deleted =
            diesel::delete(records::table.filter(records::collection.eq(collection.as_str())))
                .execute(&mut conn)?;

        debug!(collection = %collection, deleted, "Cleared collection");
        Ok(())
    }

    /// Lists the registered collection names
    pub async fn collections(&self) -> Result<Vec<String>> {
        let pool = self.pool()?;
        let mut conn = pool.get()?;

        let names = store_collections::table
            .select(store_collections::name)
            .order(store_collections::name.asc())
            .load(&mut conn)?;
        Ok(names)
    }
}

/// Registers any collection missing from `store_collections`
///
/// Runs only when the stored schema version is older than
/// [`SCHEMA_VERSION`]; the registration is additive and existing rows are
/// left untouched.
fn register_collections(conn: &mut SqliteConnection) -> Result<()> {
    let stored: i32 = store_meta::table
        .select(store_meta::schema_version)
        .filter(store_meta::id.eq(META_ROW_ID))
        .first(conn)
        .optional()?
        .unwrap_or(0);

    if stored >= SCHEMA_VERSION {
        debug!(version = stored, "Schema already current");
        return Ok(());
    }

    let existing: Vec<String> = store_collections::table
        .select(store_collections::name)
        .load(conn)?;

    for collection in Collection::ALL {
        if existing.iter().any(|name| name == collection.as_str()) {
            continue;
        }
        diesel::insert_into(store_collections::table)
            .values(&CollectionRow {
                name: collection.as_str().to_string(),
                created_at: Utc::now().naive_utc(),
            })
            .execute(conn)?;
        info!(collection = %collection, "Created collection");
    }

    diesel::replace_into(store_meta::table)
        .values(&MetaRow {
            id: META_ROW_ID,
            schema_version: SCHEMA_VERSION,
        })
        .execute(conn)?;

    info!(from = stored, to = SCHEMA_VERSION, "Schema version stamped");
    Ok(())
}
