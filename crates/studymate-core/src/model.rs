//! Local data model: subjects, study sessions, and goals.
//!
//! Entities serialize with camelCase field names so the persisted JSON
//! blobs stay interchangeable with the ones the mobile client already
//! wrote. Each entity has one factory that applies defaults to user input;
//! services never fill fields ad hoc.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Fixed palette used when a new subject has no explicit color.
pub const COLOR_PALETTE: [&str; 15] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD",
    "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E9", "#F8C471", "#82E0AA",
    "#F1948A", "#85C1E9", "#D7BDE2",
];

/// Pick a palette color at random.
pub fn random_color() -> String {
    COLOR_PALETTE
        .choose(&mut rand::thread_rng())
        .unwrap_or(&COLOR_PALETTE[0])
        .to_string()
}

/// Generate an opaque entity id from the current wall clock, in epoch
/// milliseconds. Millisecond resolution is unique enough for a single-user
/// interactive client; there is no collision check.
pub(crate) fn generate_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// A user-defined study topic with an accumulated-hours target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Hex color used by the UI.
    pub color: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub target_hours: f64,
    /// Accumulated studied time. Mutated only by the session-save path.
    #[serde(default)]
    pub completed_hours: f64,
}

/// Input for creating a [`Subject`].
#[derive(Debug, Clone, Default)]
pub struct NewSubject {
    pub name: String,
    /// Hex color; a random palette color is picked when `None`.
    pub color: Option<String>,
    pub target_hours: f64,
    pub completed_hours: f64,
}

impl Subject {
    /// Build a persistable subject from user input, stamping id and
    /// creation time and applying defaults.
    pub fn from_input(input: NewSubject) -> Self {
        Self {
            id: generate_id(),
            name: input.name,
            color: input.color.unwrap_or_else(random_color),
            created_at: Utc::now(),
            target_hours: input.target_hours,
            completed_hours: input.completed_hours,
        }
    }
}

/// One logged instance of studying a subject for a duration.
///
/// Sessions are append-only; they are never mutated or deleted. The
/// `subject_id` reference is not enforced, so a session may outlive its
/// subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub subject_id: String,
    /// Duration in minutes. Stored as given; validation is the caller's
    /// responsibility.
    pub duration: u32,
    #[serde(default)]
    pub notes: String,
    pub date: DateTime<Utc>,
    /// Denormalized subject label captured at save time.
    #[serde(default)]
    pub subject_name: String,
}

/// Input for logging a [`StudySession`].
#[derive(Debug, Clone, Default)]
pub struct NewSession {
    pub subject_id: String,
    /// Minutes.
    pub duration: u32,
    pub notes: Option<String>,
    pub subject_name: Option<String>,
}

impl StudySession {
    /// Build a persistable session from user input, stamping id and the
    /// current time.
    pub fn from_input(input: NewSession) -> Self {
        Self {
            id: generate_id(),
            subject_id: input.subject_id,
            duration: input.duration,
            notes: input.notes.unwrap_or_default(),
            date: Utc::now(),
            subject_name: input.subject_name.unwrap_or_default(),
        }
    }
}

/// Goal completion state. The transition is one-way: progress updates may
/// flip `Active` to `Completed`, nothing flips it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
}

/// A target (hours by a date), optionally tied to a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub target_date: DateTime<Utc>,
    #[serde(default)]
    pub target_hours: f64,
    #[serde(default)]
    pub completed_hours: f64,
    /// Optional subject reference, not enforced.
    pub subject_id: Option<String>,
    /// 1 (high) to 3 (low).
    #[serde(default = "default_priority")]
    pub priority: u8,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

fn default_priority() -> u8 {
    3
}

/// Input for creating a [`Goal`].
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    pub target_date: DateTime<Utc>,
    pub target_hours: f64,
    pub completed_hours: f64,
    pub subject_id: Option<String>,
    pub priority: Option<u8>,
}

impl Goal {
    /// Build a persistable goal from user input: fresh id, `Active`
    /// status, priority defaulting to 3.
    pub fn from_input(input: NewGoal) -> Self {
        Self {
            id: generate_id(),
            title: input.title,
            description: input.description.unwrap_or_default(),
            target_date: input.target_date,
            target_hours: input.target_hours,
            completed_hours: input.completed_hours,
            subject_id: input.subject_id,
            priority: input.priority.unwrap_or_else(default_priority),
            status: GoalStatus::Active,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Apply additional completed hours, flipping status to `Completed`
    /// and stamping `completed_at` once the target is reached.
    ///
    /// Hours are not clamped to the target; progress may exceed 100%.
    pub fn record_progress(&mut self, additional_hours: f64, now: DateTime<Utc>) {
        self.completed_hours += additional_hours;
        if self.completed_hours >= self.target_hours {
            self.status = GoalStatus::Completed;
            self.completed_at = Some(now);
        }
    }
}
