//! Goal CRUD and progress tracking.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::error::Result;
use crate::model::{Goal, NewGoal};
use crate::storage::{keys, KeyValueStore};

/// CRUD over the persisted goal list.
#[derive(Clone)]
pub struct GoalService {
    store: Arc<dyn KeyValueStore>,
}

impl GoalService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All goals, in insertion order. Fails soft like
    /// [`SubjectService::list`](super::SubjectService::list).
    pub async fn list(&self) -> Vec<Goal> {
        match self.load().await {
            Ok(goals) => goals,
            Err(e) => {
                warn!("failed to read goals, returning empty list: {e}");
                Vec::new()
            }
        }
    }

    /// Append a new goal and persist the full list.
    pub async fn save(&self, input: NewGoal) -> Result<Goal> {
        let mut goals = self.list().await;
        let goal = Goal::from_input(input);
        goals.push(goal.clone());
        self.persist(&goals).await?;
        Ok(goal)
    }

    /// Add studied hours to a goal, completing it once the target is met.
    ///
    /// An unknown id leaves the list unchanged.
    pub async fn add_progress(&self, id: &str, additional_hours: f64) -> Result<()> {
        let mut goals = self.list().await;
        let now = Utc::now();
        for goal in goals.iter_mut().filter(|g| g.id == id) {
            goal.record_progress(additional_hours, now);
        }
        self.persist(&goals).await
    }

    async fn load(&self) -> Result<Vec<Goal>> {
        match self.store.get(keys::GOALS).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, goals: &[Goal]) -> Result<()> {
        let raw = serde_json::to_string(goals)?;
        self.store.set(keys::GOALS, &raw).await?;
        Ok(())
    }
}
