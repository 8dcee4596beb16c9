use async_trait::async_trait;
use geozero::wkb;
use rand::{distributions::Alphanumeric, Rng};
use sqlx::{postgres::PgPoolOptions, types::Json, Executor, Pool, Postgres};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{api::BookingStoreAPI, entities::BookingRecord, error::Error};

/// Length of the ids handed out by the in-memory store.
const DOCUMENT_ID_LEN: usize = 20;

/// Booking documents kept in Postgres, with the pickup and drop-off also stored
/// as PostGIS points.
#[derive(Clone, Debug)]
pub struct PgBookingStore {
    pool: Pool<Postgres>,
}

impl PgBookingStore {
    #[tracing::instrument(name = "PgBookingStore::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        // booking service (KV store)
        pool.execute("CREATE TABLE IF NOT EXISTS bookings (id VARCHAR PRIMARY KEY, origin geometry(Point), destination geometry(Point), data JSONB NOT NULL)")
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl BookingStoreAPI for PgBookingStore {
    fn generate_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    #[tracing::instrument(skip(self))]
    async fn create(&self, record: &BookingRecord) -> Result<String, Error> {
        let origin: geo_types::Geometry<f64> = record.from.into();
        let destination: geo_types::Geometry<f64> = record.to.into();

        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO bookings (id, origin, destination, data) VALUES ($1, ST_SetSRID($2, 4326), ST_SetSRID($3, 4326), $4) ON CONFLICT (id) DO NOTHING",
            )
            .bind(&record.id)
            .bind(wkb::Encode(origin))
            .bind(wkb::Encode(destination))
            .bind(Json(record)),
        )
        .await?;

        Ok(record.id.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        let result = conn
            .execute(sqlx::query("DELETE FROM bookings WHERE id = $1").bind(id))
            .await?;

        if result.rows_affected() == 0 {
            tracing::info!("booking was already gone");
        }

        Ok(())
    }
}

/// Process-local booking store, used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryBookingStore {
    records: Mutex<HashMap<String, BookingRecord>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<BookingRecord> {
        self.records.lock().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl BookingStoreAPI for MemoryBookingStore {
    fn generate_id(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(DOCUMENT_ID_LEN)
            .map(char::from)
            .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn create(&self, record: &BookingRecord) -> Result<String, Error> {
        self.records
            .lock()
            .await
            .entry(record.id.clone())
            .or_insert_with(|| record.clone());

        Ok(record.id.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.records.lock().await.remove(id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Coordinate;
    use tokio_test::block_on;

    fn record(id: &str) -> BookingRecord {
        BookingRecord::new(
            id.into(),
            "UberClone".into(),
            Coordinate::new(33.89, 35.50),
            Coordinate::new(33.90, 35.48),
            "3.0".into(),
        )
    }

    #[test]
    fn memory_ids_look_like_document_ids() {
        let store = MemoryBookingStore::new();
        let id = store.generate_id();

        assert_eq!(id.len(), DOCUMENT_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, store.generate_id());
    }

    #[test]
    fn memory_create_is_idempotent_and_delete_removes() {
        let store = MemoryBookingStore::new();

        assert_eq!(block_on(store.create(&record("b1"))).unwrap(), "b1");
        assert_eq!(block_on(store.create(&record("b1"))).unwrap(), "b1");
        assert_eq!(block_on(store.len()), 1);

        block_on(store.delete("b1")).unwrap();
        block_on(store.delete("b1")).unwrap();
        assert!(block_on(store.get("b1")).is_none());
    }
}
