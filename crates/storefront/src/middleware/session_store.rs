//! In-memory session store backed by a `moka` cache.
//!
//! Records idle longer than the session expiry are evicted by the cache, so
//! abandoned sessions don't accumulate. A record whose own expiry date has
//! passed is treated as missing even if the cache still holds it.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};

/// Session store that forgets sessions after a period of inactivity.
#[derive(Debug, Clone)]
pub struct MokaSessionStore {
    records: Cache<Id, Record>,
}

impl MokaSessionStore {
    /// Create a store that evicts records untouched for `idle`.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self {
            records: Cache::builder().time_to_idle(idle).build(),
        }
    }

    /// Number of records currently held (after pending evictions run).
    pub async fn len(&self) -> u64 {
        self.records.run_pending_tasks().await;
        self.records.entry_count()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let Some(record) = self.records.get(session_id).await else {
            return Ok(None);
        };

        if record.expiry_date <= OffsetDateTime::now_utc() {
            self.records.invalidate(session_id).await;
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}
