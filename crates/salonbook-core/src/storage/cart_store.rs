//! Durable cart snapshot persistence
//!
//! One JSON row: the in-progress selection survives an app reload until
//! it is submitted or explicitly cancelled.

use sqlx::SqlitePool;
use tracing::debug;

use crate::cart::CartSnapshot;
use crate::error::Result;

/// Store for the single durable cart snapshot
#[derive(Debug, Clone)]
pub struct CartStore {
    pool: SqlitePool,
}

impl CartStore {
    /// Create a cart store backed by the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist the snapshot, replacing any previous one
    pub async fn save(&self, snapshot: &CartSnapshot) -> Result<()> {
        let payload = serde_json::to_string(snapshot)?;

        sqlx::query(
            r#"
            INSERT INTO cart_snapshot (id, payload, updated_at)
            VALUES (1, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&payload)
        .execute(&self.pool)
        .await?;

        debug!(services = snapshot.services.len(), "Cart snapshot saved");
        Ok(())
    }

    /// Load the persisted snapshot, if one exists
    pub async fn load(&self) -> Result<Option<CartSnapshot>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM cart_snapshot WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        match payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Drop the persisted snapshot (successful submission or explicit
    /// cancellation)
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM cart_snapshot WHERE id = 1")
            .execute(&self.pool)
            .await?;
        debug!("Cart snapshot cleared");
        Ok(())
    }
}
