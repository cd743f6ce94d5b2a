use super::model::{Session, SessionStatus, SessionSummary};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Filters and pagination for history queries. Pages are 1-indexed.
#[derive(Debug, Clone)]
pub struct SessionQuery {
    /// Case-insensitive substring matched against title and transcript.
    pub search: Option<String>,
    pub status: Option<SessionStatus>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for SessionQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            page: 1,
            page_size: 20,
        }
    }
}

/// One page of history, newest sessions first.
#[derive(Debug, Clone, Serialize)]
pub struct SessionPage {
    pub sessions: Vec<SessionSummary>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Row store for sessions. The pipeline owns all writes during processing;
/// reads may interleave freely with writes to other sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: Session);

    async fn get(&self, id: &str) -> Option<Session>;

    /// Replace the stored row. Returns false if the session no longer exists.
    async fn update(&self, session: Session) -> bool;

    /// Returns false if the session did not exist.
    async fn delete(&self, id: &str) -> bool;

    async fn list(&self, query: &SessionQuery) -> SessionPage;
}

/// In-memory store implementation.
///
/// Rows carry an insertion sequence so ordering stays stable even when two
/// sessions share a `created_at` timestamp.
#[derive(Default)]
pub struct MemorySessionStore {
    rows: RwLock<HashMap<String, StoredRow>>,
    seq: AtomicU64,
}

struct StoredRow {
    seq: u64,
    session: Session,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: Session) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.write().await;
        rows.insert(session.id.clone(), StoredRow { seq, session });
    }

    async fn get(&self, id: &str) -> Option<Session> {
        let rows = self.rows.read().await;
        rows.get(id).map(|row| row.session.clone())
    }

    async fn update(&self, session: Session) -> bool {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&session.id) {
            Some(row) => {
                row.session = session;
                true
            }
            None => false,
        }
    }

    async fn delete(&self, id: &str) -> bool {
        let mut rows = self.rows.write().await;
        rows.remove(id).is_some()
    }

    async fn list(&self, query: &SessionQuery) -> SessionPage {
        let rows = self.rows.read().await;

        let needle = query.search.as_deref().map(|s| s.to_lowercase());
        let mut matches: Vec<&StoredRow> = rows
            .values()
            .filter(|row| match &needle {
                Some(needle) => {
                    let session = &row.session;
                    session.title.to_lowercase().contains(needle.as_str())
                        || session
                            .transcript
                            .as_deref()
                            .map(|t| t.to_lowercase().contains(needle.as_str()))
                            .unwrap_or(false)
                }
                None => true,
            })
            .filter(|row| match query.status {
                Some(status) => row.session.status == status,
                None => true,
            })
            .collect();

        // Newest first; insertion sequence breaks created_at ties.
        matches.sort_by(|a, b| {
            b.session
                .created_at
                .cmp(&a.session.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        let total = matches.len();
        let page = query.page.max(1);
        let sessions = matches
            .into_iter()
            .skip((page - 1) * query.page_size)
            .take(query.page_size)
            .map(|row| SessionSummary::from(&row.session))
            .collect();

        SessionPage {
            sessions,
            total,
            page,
            page_size: query.page_size,
        }
    }
}
