//! Sustainability score, milestone badges, and completion reports.
//!
//! Nothing here is persisted; callers recompute from the progress and
//! participation collections whenever they need a fresh view.

use std::fmt;

use crate::model::{LessonProgress, ProjectParticipation};

pub const POINTS_PER_LESSON: u32 = 10;
pub const POINTS_PER_PROJECT: u32 = 25;

/// `lessons * 10 + projects * 25`.
#[must_use]
pub fn sustainability_score(lessons_completed: u32, projects_completed: u32) -> u32 {
    lessons_completed
        .saturating_mul(POINTS_PER_LESSON)
        .saturating_add(projects_completed.saturating_mul(POINTS_PER_PROJECT))
}

/// Milestone badges. Tiers are cumulative: a score of 100 holds all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Badge {
    EcoExplorer,
    HabitBuilder,
    CommunityChampion,
}

impl Badge {
    pub const ALL: [Badge; 3] = [
        Badge::EcoExplorer,
        Badge::HabitBuilder,
        Badge::CommunityChampion,
    ];

    #[must_use]
    pub fn threshold(self) -> u32 {
        match self {
            Badge::EcoExplorer => 25,
            Badge::HabitBuilder => 50,
            Badge::CommunityChampion => 100,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Badge::EcoExplorer => "Eco Explorer",
            Badge::HabitBuilder => "Habit Builder",
            Badge::CommunityChampion => "Community Champion",
        }
    }

    /// Badges unlocked at `score`, lowest threshold first.
    #[must_use]
    pub fn earned(score: u32) -> Vec<Badge> {
        Self::ALL
            .into_iter()
            .filter(|badge| score >= badge.threshold())
            .collect()
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `round(done / total * 100)`, or 0 for an empty total.
#[must_use]
pub fn completion_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total) as u128;
    let total = total as u128;
    u8::try_from((done * 200 + total) / (2 * total)).unwrap_or(100)
}

/// Snapshot shown on the learner dashboard and progress page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub lessons_completed: u32,
    pub lessons_total: u32,
    pub projects_completed: u32,
    pub projects_total: u32,
    pub score: u32,
    pub badges: Vec<Badge>,
    pub lesson_completion_percent: u8,
    pub project_completion_percent: u8,
    pub overall_percent: u8,
}

impl ProgressReport {
    /// Counts completed lessons and projects against the catalog sizes.
    #[must_use]
    pub fn compute<'a>(
        lessons_total: usize,
        projects_total: usize,
        progress: impl IntoIterator<Item = &'a LessonProgress>,
        participation: impl IntoIterator<Item = &'a ProjectParticipation>,
    ) -> Self {
        let lessons_done = progress.into_iter().filter(|p| p.completed).count();
        let projects_done = participation
            .into_iter()
            .filter(|p| p.is_completed())
            .count();

        let lessons_completed = saturating_u32(lessons_done);
        let projects_completed = saturating_u32(projects_done);
        let score = sustainability_score(lessons_completed, projects_completed);

        Self {
            lessons_completed,
            lessons_total: saturating_u32(lessons_total),
            projects_completed,
            projects_total: saturating_u32(projects_total),
            score,
            badges: Badge::earned(score),
            lesson_completion_percent: completion_percent(lessons_done, lessons_total),
            project_completion_percent: completion_percent(projects_done, projects_total),
            overall_percent: completion_percent(
                lessons_done + projects_done,
                lessons_total + projects_total,
            ),
        }
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
