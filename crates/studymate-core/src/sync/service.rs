//! Best-effort synchronization between local data and the events backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::event_api::EventApi;
use super::types::{ConnectionStatus, EventPayload, FullSyncOutcome, RemoteEvent, SyncOutcome};
use crate::error::Result;
use crate::model::StudySession;
use crate::services::{SessionService, SubjectService};
use crate::storage::{keys, KeyValueStore};

/// Orchestrates sync between local sessions/subjects and the remote
/// events API.
///
/// Sync is best-effort and non-transactional: uploads are sequential with
/// per-item failure tolerance, downloads fall back to the last cached
/// list. Overlapping calls race on the cache key; last write wins.
#[derive(Clone)]
pub struct SyncService {
    store: Arc<dyn KeyValueStore>,
    subjects: SubjectService,
    sessions: SessionService,
    api: EventApi,
}

impl SyncService {
    pub fn new(store: Arc<dyn KeyValueStore>, api: EventApi) -> Self {
        Self {
            subjects: SubjectService::new(store.clone()),
            sessions: SessionService::new(store.clone()),
            store,
            api,
        }
    }

    /// Probe the backend, recording the sync timestamp on success only.
    pub async fn probe_backend(&self) -> ConnectionStatus {
        let timestamp = Utc::now();
        match self.api.hello().await {
            Ok(detail) => {
                self.record_last_sync(timestamp).await;
                ConnectionStatus {
                    connected: true,
                    detail: Some(detail),
                    error: None,
                    timestamp,
                }
            }
            Err(e) => ConnectionStatus {
                connected: false,
                detail: None,
                error: Some(format!("Backend connection failed: {e}")),
                timestamp,
            },
        }
    }

    /// Timestamp of the last successful backend interaction, if any.
    pub async fn last_sync(&self) -> Option<DateTime<Utc>> {
        let raw = self.store.get(keys::LAST_SYNC).await.ok().flatten()?;
        DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Upload every local session to the backend as a study event.
    ///
    /// Sessions are sent one at a time; an individual failure is logged
    /// and skipped so the remaining sessions still get their attempt. No
    /// retry, no rollback.
    pub async fn push_sessions(&self) -> Result<SyncOutcome> {
        let sessions = self.sessions.list().await;
        let subjects = self.subjects.list().await;
        info!("syncing {} sessions to backend", sessions.len());

        let mut synced = 0;
        for session in &sessions {
            let subject = subjects.iter().find(|s| s.id == session.subject_id);
            let payload = session_payload(session, subject.map(|s| s.name.as_str()));
            match self.api.create_event(&payload).await {
                Ok(_) => {
                    debug!("synced session as event: {}", payload.name);
                    synced += 1;
                }
                Err(e) => warn!("failed to sync session {}: {e}", session.id),
            }
        }

        self.store
            .set(keys::LAST_SYNC, &Utc::now().to_rfc3339())
            .await?;
        Ok(SyncOutcome {
            success: true,
            synced,
        })
    }

    /// Fetch the full remote event list, refreshing the offline cache.
    ///
    /// Any failure, fetch or cache write, falls back to the last cached
    /// list (empty when nothing was ever cached). This call never errors.
    pub async fn pull_events(&self) -> Vec<RemoteEvent> {
        match self.fetch_and_cache().await {
            Ok(events) => events,
            Err(e) => {
                warn!("event fetch failed, serving cached events: {e}");
                self.cached_events().await
            }
        }
    }

    /// Create one event remotely, then refresh the cache best-effort.
    pub async fn create_event(&self, payload: &EventPayload) -> Result<RemoteEvent> {
        let event = self.api.create_event(payload).await?;
        debug!("created event in backend: {}", event.name);
        // Refresh failures already degrade to the cached list inside
        // pull_events.
        self.pull_events().await;
        Ok(event)
    }

    /// Push local sessions, then pull the remote list. Sequential and
    /// non-atomic: a pull failure leaves the pushed events in place.
    pub async fn full_sync(&self) -> Result<FullSyncOutcome> {
        info!("starting full sync");
        let outcome = self.push_sessions().await?;
        let events = self.pull_events().await;
        info!("full sync completed");
        Ok(FullSyncOutcome {
            success: true,
            sessions_synced: outcome.synced,
            events_received: events.len(),
            timestamp: Utc::now(),
        })
    }

    /// Last cached remote list, empty when absent or unreadable.
    pub async fn cached_events(&self) -> Vec<RemoteEvent> {
        let raw = match self.store.get(keys::BACKEND_EVENTS).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("failed to read cached events: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(events) => events,
            Err(e) => {
                warn!("cached events are unreadable: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch_and_cache(&self) -> Result<Vec<RemoteEvent>> {
        let events = self.api.list_events().await?;
        debug!("fetched {} events from backend", events.len());
        let raw = serde_json::to_string(&events)?;
        self.store.set(keys::BACKEND_EVENTS, &raw).await?;
        self.store
            .set(keys::LAST_SYNC, &Utc::now().to_rfc3339())
            .await?;
        Ok(events)
    }

    async fn record_last_sync(&self, at: DateTime<Utc>) {
        if let Err(e) = self.store.set(keys::LAST_SYNC, &at.to_rfc3339()).await {
            warn!("failed to record last-sync timestamp: {e}");
        }
    }
}

/// Shape a local session as a backend event payload.
///
/// A deleted subject leaves placeholder labels rather than failing the
/// upload.
pub fn session_payload(session: &StudySession, subject_name: Option<&str>) -> EventPayload {
    let description = if session.notes.is_empty() {
        format!("Studied {} minutes", session.duration)
    } else {
        session.notes.clone()
    };
    EventPayload {
        name: format!("Study: {}", subject_name.unwrap_or("Unknown Subject")),
        event_date: session.date,
        description,
        subject: subject_name.unwrap_or("General").to_string(),
        event_type: "STUDY".to_string(),
        duration: session.duration,
        priority: 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewSession, StudySession};

    fn session(notes: &str) -> StudySession {
        StudySession::from_input(NewSession {
            subject_id: "1700000000000".to_string(),
            duration: 45,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            subject_name: None,
        })
    }

    #[test]
    fn test_session_payload_with_subject() {
        let payload = session_payload(&session("reviewed chapter 3"), Some("Math"));
        assert_eq!(payload.name, "Study: Math");
        assert_eq!(payload.subject, "Math");
        assert_eq!(payload.description, "reviewed chapter 3");
        assert_eq!(payload.event_type, "STUDY");
        assert_eq!(payload.duration, 45);
        assert_eq!(payload.priority, 2);
    }

    #[test]
    fn test_session_payload_without_subject_uses_placeholders() {
        let payload = session_payload(&session(""), None);
        assert_eq!(payload.name, "Study: Unknown Subject");
        assert_eq!(payload.subject, "General");
    }

    #[test]
    fn test_session_payload_describes_duration_when_no_notes() {
        let payload = session_payload(&session(""), Some("Math"));
        assert_eq!(payload.description, "Studied 45 minutes");
    }
}
