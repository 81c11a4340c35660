//! Remote events API client and best-effort synchronization.
//!
//! Local sessions are mirrored to the backend as study events; the remote
//! event list is cached locally so screens keep data while offline.

pub mod event_api;
pub mod service;
pub mod types;

pub use event_api::EventApi;
pub use service::{session_payload, SyncService};
pub use types::{
    ApiError, ConnectionStatus, EventPayload, FullSyncOutcome, RemoteEvent, SyncOutcome,
};
