//! # StudyMate Core Library
//!
//! This library provides the core business logic for the StudyMate
//! study-tracking client. UI screens are a thin layer over the services
//! here: local state lives behind [`SubjectService`], [`SessionService`],
//! and [`GoalService`]; remote interaction goes through [`SyncService`].
//!
//! ## Architecture
//!
//! - **Storage**: a string-keyed [`KeyValueStore`] port holding
//!   JSON-serialized lists, backed by SQLite in the app and an in-memory
//!   fake in tests, plus TOML-based configuration
//! - **Services**: read-modify-write CRUD over whole lists; read failures
//!   degrade to empty lists rather than surfacing
//! - **Sync**: best-effort, non-transactional reconciliation with the
//!   remote events API, with an offline cache fallback
//!
//! ## Key Components
//!
//! - [`SubjectService`] / [`SessionService`] / [`GoalService`]: local CRUD
//! - [`EventApi`]: HTTP client for the events backend
//! - [`SyncService`]: push/pull orchestration over the two
//! - [`Config`]: application configuration management

pub mod error;
pub mod model;
pub mod services;
pub mod storage;
pub mod sync;

pub use error::{ConfigError, CoreError, Result, StorageError};
pub use model::{
    Goal, GoalStatus, NewGoal, NewSession, NewSubject, StudySession, Subject,
};
pub use services::{GoalService, SessionService, SubjectService};
pub use storage::{
    clear_all_data, ApiConfig, Config, KeyValueStore, MemoryStore, SqliteStore,
};
pub use sync::{
    ApiError, ConnectionStatus, EventApi, EventPayload, FullSyncOutcome, RemoteEvent, SyncOutcome,
    SyncService,
};
