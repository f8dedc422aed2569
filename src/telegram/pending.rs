//! Registry of format pickers awaiting a user's choice.
//!
//! Keyed by (chat id, picker message id) so callback data only has to
//! carry the chosen format id, well inside Telegram's 64-byte callback
//! limit. Entries expire after a TTL; expired selections get an alert
//! instead of a download.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::time::{Duration, Instant};
use url::Url;

/// A picker waiting for a format choice.
#[derive(Clone)]
pub struct PendingDownload {
    pub url: Url,
    pub title: String,
    pub requested_by: i64,
    created_at: Instant,
}

pub struct PendingRegistry {
    map: DashMap<(i64, i32), PendingDownload>,
    ttl: Duration,
}

impl PendingRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            map: DashMap::new(),
            ttl,
        }
    }

    pub fn insert(&self, chat_id: i64, message_id: i32, url: Url, title: String, requested_by: i64) {
        self.prune();
        self.map.insert(
            (chat_id, message_id),
            PendingDownload {
                url,
                title,
                requested_by,
                created_at: Instant::now(),
            },
        );
    }

    /// Looks up a pending picker; expired entries are dropped.
    pub fn get(&self, chat_id: i64, message_id: i32) -> Option<PendingDownload> {
        let key = (chat_id, message_id);
        if let Some(entry) = self.map.get(&key) {
            if entry.created_at.elapsed() < self.ttl {
                return Some(entry.clone());
            }
        }
        self.map.remove(&key);
        None
    }

    pub fn remove(&self, chat_id: i64, message_id: i32) {
        self.map.remove(&(chat_id, message_id));
    }

    fn prune(&self) {
        let ttl = self.ttl;
        self.map.retain(|_, entry| entry.created_at.elapsed() < ttl);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Global pending picker registry (entries live for an hour, plenty
/// for a user session).
pub static PENDING: Lazy<PendingRegistry> = Lazy::new(|| PendingRegistry::new(Duration::from_secs(3600)));
