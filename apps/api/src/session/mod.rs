//! Explicit per-user session context.
//!
//! Replaces ambient cross-interaction state with a context object owned by
//! the store and mutated through it. `reset` clears everything except the
//! long-lived identity fields.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::analysis::AnalysisReport;
use crate::extract::ExtractedDocument;

pub mod handlers;

/// One user's working state: extracted documents and the latest results.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub id: Uuid,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resume: Option<ExtractedDocument>,
    pub job: Option<ExtractedDocument>,
    pub last_report: Option<AnalysisReport>,
    pub last_question: Option<String>,
}

impl SessionContext {
    fn new(username: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            created_at: Utc::now(),
            resume: None,
            job: None,
            last_report: None,
            last_question: None,
        }
    }

    /// Clears all working state. Identity fields (id, username, created_at)
    /// survive a reset.
    pub fn reset(&mut self) {
        self.resume = None;
        self.job = None;
        self.last_report = None;
        self.last_question = None;
    }
}

/// In-process session store. Sessions are not persisted; the credential
/// table is the only durable state in the system.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, username: Option<String>) -> SessionContext {
        let session = SessionContext::new(username);
        self.inner
            .write()
            .await
            .insert(session.id, session.clone());
        session
    }

    pub async fn snapshot(&self, id: Uuid) -> Option<SessionContext> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Applies `f` to the session, returning its result; `None` if the
    /// session does not exist.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionContext) -> R,
    ) -> Option<R> {
        self.inner.write().await.get_mut(&id).map(f)
    }
}
