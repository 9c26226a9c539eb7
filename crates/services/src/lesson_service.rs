use std::collections::BTreeMap;

use tokio::sync::Mutex;

use lab_core::model::{
    CategoryFilter, Lesson, LessonCategory, LessonId, LessonProgress, QuizAnswers, QuizResult,
    QuizScore,
};
use storage::{PersistentStore, keys};

use crate::error::LessonServiceError;

/// Search and category filter for the lesson library.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LessonFilters {
    pub search: String,
    pub category: CategoryFilter<LessonCategory>,
}

/// Lesson catalog plus the learner's per-lesson progress.
///
/// Progress is loaded once at construction and written back after every change.
pub struct LessonService {
    lessons: Vec<Lesson>,
    store: PersistentStore,
    progress: Mutex<BTreeMap<LessonId, LessonProgress>>,
}

impl LessonService {
    /// Load persisted progress (or start empty) for the given catalog.
    pub async fn load(lessons: Vec<Lesson>, store: PersistentStore) -> Self {
        let persisted: Vec<LessonProgress> = store.load(keys::LESSON_PROGRESS, Vec::new()).await;
        // A duplicated id in stored data resolves to its last entry.
        let progress = persisted
            .into_iter()
            .map(|record| (record.lesson_id.clone(), record))
            .collect();

        Self {
            lessons,
            store,
            progress: Mutex::new(progress),
        }
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, lesson_id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == lesson_id)
    }

    #[must_use]
    pub fn categories(&self) -> &'static [LessonCategory] {
        &LessonCategory::ALL
    }

    /// Lessons matching the category and a trimmed, case-insensitive search
    /// over title and short description.
    #[must_use]
    pub fn search_lessons(&self, filters: &LessonFilters) -> Vec<&Lesson> {
        let needle = filters.search.trim().to_lowercase();
        self.lessons
            .iter()
            .filter(|lesson| filters.category.admits(lesson.category()))
            .filter(|lesson| lesson.matches_search(&needle))
            .collect()
    }

    /// All progress records, ordered by lesson id.
    pub async fn progress(&self) -> Vec<LessonProgress> {
        self.progress.lock().await.values().cloned().collect()
    }

    pub async fn get_lesson_progress(&self, lesson_id: &LessonId) -> Option<LessonProgress> {
        self.progress.lock().await.get(lesson_id).cloned()
    }

    /// Record a completed attempt. An existing record keeps one entry and takes
    /// the new score even if it is lower.
    pub async fn mark_lesson_completed(&self, lesson_id: LessonId, score: QuizScore) {
        let mut progress = self.progress.lock().await;
        progress
            .entry(lesson_id.clone())
            .and_modify(|record| record.record_submission(score))
            .or_insert_with(|| LessonProgress::completed(lesson_id.clone(), score));

        tracing::debug!(lesson_id = %lesson_id, score = score.value(), "lesson progress recorded");

        let snapshot: Vec<&LessonProgress> = progress.values().collect();
        self.store.save(keys::LESSON_PROGRESS, &snapshot).await;
    }

    /// Grade an attempt for a catalog lesson and record the result.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::NotFound` if the lesson is not in the catalog.
    pub async fn submit_quiz(
        &self,
        lesson_id: &LessonId,
        answers: &QuizAnswers,
    ) -> Result<QuizResult, LessonServiceError> {
        let lesson = self
            .lesson(lesson_id)
            .ok_or_else(|| LessonServiceError::NotFound(lesson_id.clone()))?;

        let result = lesson.grade(answers);
        self.mark_lesson_completed(lesson_id.clone(), result.score)
            .await;
        Ok(result)
    }
}
