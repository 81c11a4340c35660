//! Subject CRUD and progress accounting.

use std::sync::Arc;

use tracing::warn;

use crate::error::Result;
use crate::model::{NewSubject, Subject};
use crate::storage::{keys, KeyValueStore};

/// CRUD over the persisted subject list.
#[derive(Clone)]
pub struct SubjectService {
    store: Arc<dyn KeyValueStore>,
}

impl SubjectService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All subjects, in insertion order.
    ///
    /// Missing or unreadable data yields an empty list; the failure is
    /// logged, never surfaced.
    pub async fn list(&self) -> Vec<Subject> {
        match self.load().await {
            Ok(subjects) => subjects,
            Err(e) => {
                warn!("failed to read subjects, returning empty list: {e}");
                Vec::new()
            }
        }
    }

    /// Look up one subject by id.
    pub async fn get(&self, id: &str) -> Option<Subject> {
        self.list().await.into_iter().find(|s| s.id == id)
    }

    /// Append a new subject and persist the full list.
    pub async fn save(&self, input: NewSubject) -> Result<Subject> {
        let mut subjects = self.list().await;
        let subject = Subject::from_input(input);
        subjects.push(subject.clone());
        self.persist(&subjects).await?;
        Ok(subject)
    }

    /// Delete a subject by id.
    ///
    /// Removes every matching entry; deleting an unknown id succeeds as a
    /// no-op. Sessions and goals referencing the subject are left in
    /// place.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut subjects = self.list().await;
        subjects.retain(|s| s.id != id);
        self.persist(&subjects).await
    }

    /// Add `minutes` of studied time to a subject's completed hours.
    ///
    /// An unknown id leaves the list unchanged; the owning subject may
    /// have been deleted after sessions were logged against it.
    pub async fn add_progress(&self, id: &str, minutes: u32) -> Result<()> {
        let mut subjects = self.list().await;
        for subject in subjects.iter_mut().filter(|s| s.id == id) {
            subject.completed_hours += f64::from(minutes) / 60.0;
        }
        self.persist(&subjects).await
    }

    async fn load(&self) -> Result<Vec<Subject>> {
        match self.store.get(keys::SUBJECTS).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, subjects: &[Subject]) -> Result<()> {
        let raw = serde_json::to_string(subjects)?;
        self.store.set(keys::SUBJECTS, &raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service() -> SubjectService {
        SubjectService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_save_then_list_includes_subject() {
        let subjects = service();
        let saved = subjects
            .save(NewSubject {
                name: "Mathematics".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let listed = subjects.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], saved);
        assert_eq!(listed[0].name, "Mathematics");
        assert!(!listed[0].id.is_empty());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let subjects = service();
        for name in ["a", "b", "c"] {
            subjects
                .save(NewSubject {
                    name: name.to_string(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        let names: Vec<_> = subjects.list().await.into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let subjects = service();
        let saved = subjects
            .save(NewSubject {
                name: "Physics".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(subjects.get(&saved.id).await, Some(saved));
        assert_eq!(subjects.get("nope").await, None);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let subjects = service();
        let a = subjects
            .save(NewSubject {
                name: "a".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let b = subjects
            .save(NewSubject {
                name: "b".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        subjects.delete(&a.id).await.unwrap();

        let remaining = subjects.list().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let subjects = service();
        subjects
            .save(NewSubject {
                name: "kept".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        subjects.delete("1234").await.unwrap();
        assert_eq!(subjects.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_progress_converts_minutes_to_hours() {
        let subjects = service();
        let saved = subjects
            .save(NewSubject {
                name: "Chemistry".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        subjects.add_progress(&saved.id, 45).await.unwrap();

        let updated = subjects.get(&saved.id).await.unwrap();
        assert_eq!(updated.completed_hours, 0.75);
    }

    #[tokio::test]
    async fn test_add_progress_unknown_id_changes_nothing() {
        let subjects = service();
        let saved = subjects
            .save(NewSubject {
                name: "Chemistry".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        subjects.add_progress("gone", 60).await.unwrap();

        let unchanged = subjects.get(&saved.id).await.unwrap();
        assert_eq!(unchanged.completed_hours, 0.0);
    }

    #[tokio::test]
    async fn test_corrupt_data_reads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SUBJECTS, "not json").await.unwrap();

        let subjects = SubjectService::new(store);
        assert!(subjects.list().await.is_empty());
    }
}
