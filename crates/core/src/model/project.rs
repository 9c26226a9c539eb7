use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::ProjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for ProjectDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectDifficulty::Beginner => "Beginner",
            ProjectDifficulty::Intermediate => "Intermediate",
            ProjectDifficulty::Advanced => "Advanced",
        };
        f.pad(label)
    }
}

/// Read-only hands-on project from the seed catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub difficulty: ProjectDifficulty,
    pub estimated_duration: String,
}

/// Persisted participation state. Absence of a record means "not joined".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipationStatus {
    InProgress,
    Completed,
}

/// Status shown for a project, including the derived `NotJoined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    NotJoined,
    InProgress,
    Completed,
}

impl From<ParticipationStatus> for ProjectStatus {
    fn from(status: ParticipationStatus) -> Self {
        match status {
            ParticipationStatus::InProgress => ProjectStatus::InProgress,
            ParticipationStatus::Completed => ProjectStatus::Completed,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectStatus::NotJoined => "not-joined",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
        };
        f.pad(label)
    }
}

/// A learner's participation in one project; at most one per project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectParticipation {
    pub project_id: ProjectId,
    pub status: ParticipationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_proof: Option<String>,
    pub joined_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProjectParticipation {
    #[must_use]
    pub fn joined(project_id: ProjectId, now: DateTime<Utc>) -> Self {
        Self {
            project_id,
            status: ParticipationStatus::InProgress,
            submitted_proof: None,
            joined_at: now,
            completed_at: None,
        }
    }

    /// Record for a proof submitted without joining first.
    #[must_use]
    pub fn completed_directly(project_id: ProjectId, proof: String, now: DateTime<Utc>) -> Self {
        Self {
            project_id,
            status: ParticipationStatus::Completed,
            submitted_proof: Some(proof),
            joined_at: now,
            completed_at: Some(now),
        }
    }

    /// Mark completed with the given proof; `joined_at` is left as is.
    pub fn complete(&mut self, proof: String, now: DateTime<Utc>) {
        self.status = ParticipationStatus::Completed;
        self.submitted_proof = Some(proof);
        self.completed_at = Some(now);
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == ParticipationStatus::Completed
    }
}
