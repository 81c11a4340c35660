//! Append-only study session log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::SubjectService;
use crate::error::Result;
use crate::model::{NewSession, StudySession};
use crate::storage::{keys, KeyValueStore};

/// Append-only log of study sessions.
///
/// Saving a session credits its duration to the owning subject; sessions
/// themselves are never mutated or deleted.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
    subjects: SubjectService,
}

impl SessionService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            subjects: SubjectService::new(store.clone()),
            store,
        }
    }

    /// All sessions, in insertion order. Fails soft like
    /// [`SubjectService::list`].
    pub async fn list(&self) -> Vec<StudySession> {
        match self.load().await {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!("failed to read sessions, returning empty list: {e}");
                Vec::new()
            }
        }
    }

    /// Append a session and credit its duration to the owning subject.
    ///
    /// Input is stored as given; validating duration and subject is the
    /// caller's job. A session whose subject no longer exists is persisted
    /// anyway and credits nobody.
    pub async fn save(&self, input: NewSession) -> Result<StudySession> {
        let mut sessions = self.list().await;
        let session = StudySession::from_input(input);
        sessions.push(session.clone());
        self.persist(&sessions).await?;

        self.subjects
            .add_progress(&session.subject_id, session.duration)
            .await?;

        Ok(session)
    }

    /// Sessions whose date falls within `[start, end]`, bounds inclusive.
    pub async fn in_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<StudySession> {
        self.list()
            .await
            .into_iter()
            .filter(|s| s.date >= start && s.date <= end)
            .collect()
    }

    async fn load(&self) -> Result<Vec<StudySession>> {
        match self.store.get(keys::SESSIONS).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, sessions: &[StudySession]) -> Result<()> {
        let raw = serde_json::to_string(sessions)?;
        self.store.set(keys::SESSIONS, &raw).await?;
        Ok(())
    }
}
