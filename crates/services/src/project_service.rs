use std::collections::BTreeMap;

use tokio::sync::Mutex;

use lab_core::model::{Project, ProjectId, ProjectParticipation, ProjectStatus};
use storage::{PersistentStore, keys};

use crate::Clock;
use crate::error::ProjectServiceError;

/// Participation counts for one project, shown to administrators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticipationStats {
    pub participants: u32,
    pub completed: u32,
}

/// Project catalog plus the learner's participation records.
pub struct ProjectService {
    clock: Clock,
    projects: Vec<Project>,
    store: PersistentStore,
    participation: Mutex<BTreeMap<ProjectId, ProjectParticipation>>,
}

impl ProjectService {
    pub async fn load(clock: Clock, projects: Vec<Project>, store: PersistentStore) -> Self {
        let persisted: Vec<ProjectParticipation> =
            store.load(keys::PROJECT_PARTICIPATION, Vec::new()).await;
        let participation = persisted
            .into_iter()
            .map(|record| (record.project_id.clone(), record))
            .collect();

        Self {
            clock,
            projects,
            store,
            participation: Mutex::new(participation),
        }
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    #[must_use]
    pub fn project(&self, project_id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == *project_id)
    }

    pub async fn participation(&self) -> Vec<ProjectParticipation> {
        self.participation.lock().await.values().cloned().collect()
    }

    pub async fn get_participation_for(
        &self,
        project_id: &ProjectId,
    ) -> Option<ProjectParticipation> {
        self.participation.lock().await.get(project_id).cloned()
    }

    /// Status including the derived `NotJoined` for projects with no record.
    pub async fn status_of(&self, project_id: &ProjectId) -> ProjectStatus {
        self.participation
            .lock()
            .await
            .get(project_id)
            .map_or(ProjectStatus::NotJoined, |record| record.status.into())
    }

    /// Join a project. Joining again is a no-op and never resets a completed project.
    pub async fn join_project(&self, project_id: ProjectId) {
        let mut participation = self.participation.lock().await;
        if participation.contains_key(&project_id) {
            tracing::debug!(project_id = %project_id, "already joined");
            return;
        }

        let now = self.clock.now();
        participation.insert(
            project_id.clone(),
            ProjectParticipation::joined(project_id.clone(), now),
        );
        tracing::debug!(project_id = %project_id, "project joined");

        self.persist(&participation).await;
    }

    /// Submit proof of completion, joining implicitly if needed.
    ///
    /// Resubmitting replaces the earlier proof and completion time.
    ///
    /// # Errors
    ///
    /// Returns `ProjectServiceError::EmptyProof` if `content` is blank; nothing
    /// is recorded in that case.
    pub async fn submit_project_proof(
        &self,
        project_id: ProjectId,
        content: &str,
    ) -> Result<(), ProjectServiceError> {
        let proof = content.trim();
        if proof.is_empty() {
            return Err(ProjectServiceError::EmptyProof);
        }

        let now = self.clock.now();
        let mut participation = self.participation.lock().await;
        match participation.get_mut(&project_id) {
            Some(record) => record.complete(proof.to_owned(), now),
            None => {
                participation.insert(
                    project_id.clone(),
                    ProjectParticipation::completed_directly(
                        project_id.clone(),
                        proof.to_owned(),
                        now,
                    ),
                );
            }
        }
        tracing::debug!(project_id = %project_id, "project proof submitted");

        self.persist(&participation).await;
        Ok(())
    }

    pub async fn participation_stats(&self, project_id: &ProjectId) -> ParticipationStats {
        let participation = self.participation.lock().await;
        match participation.get(project_id) {
            Some(record) => ParticipationStats {
                participants: 1,
                completed: u32::from(record.is_completed()),
            },
            None => ParticipationStats::default(),
        }
    }

    async fn persist(&self, participation: &BTreeMap<ProjectId, ProjectParticipation>) {
        let snapshot: Vec<&ProjectParticipation> = participation.values().collect();
        self.store
            .save(keys::PROJECT_PARTICIPATION, &snapshot)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use lab_core::model::ParticipationStatus;
    use lab_core::seed;
    use lab_core::time::{fixed_clock, fixed_now};
    use storage::{KeyValueStore, Storage};

    async fn build(storage: &Storage, clock: Clock) -> ProjectService {
        ProjectService::load(clock, seed::projects(), storage.persistent()).await
    }

    fn compost() -> ProjectId {
        ProjectId::new("project-compost")
    }

    #[tokio::test]
    async fn join_twice_keeps_single_record() {
        let storage = Storage::in_memory();
        let service = build(&storage, fixed_clock()).await;

        service.join_project(compost()).await;
        service.join_project(compost()).await;

        assert_eq!(service.participation().await.len(), 1);
        let record = service.get_participation_for(&compost()).await.unwrap();
        assert_eq!(record.status, ParticipationStatus::InProgress);
        assert_eq!(record.joined_at, fixed_now());
    }

    #[tokio::test]
    async fn join_after_completion_is_noop() {
        let storage = Storage::in_memory();
        let service = build(&storage, fixed_clock()).await;

        service.join_project(compost()).await;
        service
            .submit_project_proof(compost(), "Bin is running")
            .await
            .unwrap();
        service.join_project(compost()).await;

        assert_eq!(service.status_of(&compost()).await, ProjectStatus::Completed);
    }

    #[tokio::test]
    async fn proof_without_join_creates_completed_record() {
        let storage = Storage::in_memory();
        let service = build(&storage, fixed_clock()).await;

        service
            .submit_project_proof(compost(), "x")
            .await
            .unwrap();

        let record = service.get_participation_for(&compost()).await.unwrap();
        assert_eq!(record.status, ParticipationStatus::Completed);
        assert_eq!(record.completed_at, Some(record.joined_at));
        assert_eq!(record.submitted_proof.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn proof_after_join_keeps_join_time_and_resubmission_overwrites() {
        let storage = Storage::in_memory();
        let joined = build(&storage, fixed_clock()).await;
        joined.join_project(compost()).await;
        drop(joined);

        let later = fixed_now() + Duration::days(14);
        let service = build(&storage, Clock::fixed(later)).await;
        service
            .submit_project_proof(compost(), "  First reflection  ")
            .await
            .unwrap();
        service
            .submit_project_proof(compost(), "Updated reflection")
            .await
            .unwrap();

        let record = service.get_participation_for(&compost()).await.unwrap();
        assert_eq!(record.joined_at, fixed_now());
        assert_eq!(record.completed_at, Some(later));
        assert_eq!(record.submitted_proof.as_deref(), Some("Updated reflection"));
        assert_eq!(service.participation().await.len(), 1);
    }

    #[tokio::test]
    async fn blank_proof_is_rejected_without_writing() {
        let storage = Storage::in_memory();
        let service = build(&storage, fixed_clock()).await;

        let err = service
            .submit_project_proof(compost(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectServiceError::EmptyProof));
        assert_eq!(service.status_of(&compost()).await, ProjectStatus::NotJoined);
    }

    #[tokio::test]
    async fn stats_reflect_local_participation() {
        let storage = Storage::in_memory();
        let service = build(&storage, fixed_clock()).await;
        let audit = ProjectId::new("project-energy-audit");

        service.join_project(compost()).await;
        service.submit_project_proof(audit.clone(), "done").await.unwrap();

        assert_eq!(
            service.participation_stats(&compost()).await,
            ParticipationStats {
                participants: 1,
                completed: 0
            }
        );
        assert_eq!(
            service.participation_stats(&audit).await,
            ParticipationStats {
                participants: 1,
                completed: 1
            }
        );
        assert_eq!(
            service
                .participation_stats(&ProjectId::new("project-plastic-free"))
                .await,
            ParticipationStats::default()
        );
    }

    #[tokio::test]
    async fn participation_is_stored_as_camel_case_list() {
        let storage = Storage::in_memory();
        let service = build(&storage, fixed_clock()).await;
        service.join_project(compost()).await;

        let raw = storage
            .slots
            .get(keys::PROJECT_PARTICIPATION)
            .await
            .unwrap()
            .unwrap();
        let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &stored[0];
        assert_eq!(entry["projectId"], "project-compost");
        assert_eq!(entry["status"], "in-progress");
        assert!(entry.get("joinedAt").is_some());
        assert!(entry.get("submittedProof").is_none());
        assert!(entry.get("completedAt").is_none());
    }

    #[tokio::test]
    async fn project_lookup_by_id() {
        let storage = Storage::in_memory();
        let service = build(&storage, fixed_clock()).await;

        let project = service.project(&compost()).unwrap();
        assert_eq!(project.title, "Start a Home Compost System");
        assert!(service.project(&ProjectId::new("project-unknown")).is_none());
    }
}
