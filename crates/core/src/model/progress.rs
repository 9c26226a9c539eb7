use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::LessonId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("quiz score must be between 0 and 100, got {0}")]
    ScoreOutOfRange(u32),
}

/// Percentage of quiz questions answered correctly (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct QuizScore(u8);

impl QuizScore {
    /// # Errors
    ///
    /// Returns `ProgressError::ScoreOutOfRange` if `value` exceeds 100.
    pub fn new(value: u32) -> Result<Self, ProgressError> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= 100)
            .map(Self)
            .ok_or(ProgressError::ScoreOutOfRange(value))
    }

    /// `round(correct / total * 100)` with halves rounding up.
    ///
    /// A zero `total` yields 0; lesson validation keeps that path unreachable.
    #[must_use]
    pub fn from_ratio(correct: u32, total: u32) -> Self {
        if total == 0 {
            return Self(0);
        }
        let correct = u64::from(correct.min(total));
        let total = u64::from(total);
        let rounded = (correct * 200 + total) / (2 * total);
        Self(u8::try_from(rounded.min(100)).unwrap_or(100))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for QuizScore {
    type Error = ProgressError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuizScore> for u32 {
    fn from(score: QuizScore) -> Self {
        u32::from(score.0)
    }
}

impl std::fmt::Display for QuizScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Per-lesson completion record, one per lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub lesson_id: LessonId,
    pub completed: bool,
    pub score: QuizScore,
}

impl LessonProgress {
    #[must_use]
    pub fn completed(lesson_id: LessonId, score: QuizScore) -> Self {
        Self {
            lesson_id,
            completed: true,
            score,
        }
    }

    /// Record a new submission. The latest score wins, even when lower.
    pub fn record_submission(&mut self, score: QuizScore) {
        self.completed = true;
        self.score = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_rejects_values_above_hundred() {
        assert!(QuizScore::new(100).is_ok());
        assert_eq!(
            QuizScore::new(101).unwrap_err(),
            ProgressError::ScoreOutOfRange(101)
        );
    }

    #[test]
    fn ratio_rounds_half_up() {
        assert_eq!(QuizScore::from_ratio(1, 2).value(), 50);
        assert_eq!(QuizScore::from_ratio(1, 3).value(), 33);
        assert_eq!(QuizScore::from_ratio(2, 3).value(), 67);
        assert_eq!(QuizScore::from_ratio(1, 8).value(), 13);
        assert_eq!(QuizScore::from_ratio(0, 0).value(), 0);
    }

    #[test]
    fn progress_uses_camel_case_layout() {
        let progress = LessonProgress::completed(LessonId::new("l-1"), QuizScore::new(80).unwrap());
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "lessonId": "l-1", "completed": true, "score": 80 })
        );
    }

    #[test]
    fn out_of_range_score_fails_to_deserialize() {
        let raw = r#"{ "lessonId": "l-1", "completed": true, "score": 250 }"#;
        assert!(serde_json::from_str::<LessonProgress>(raw).is_err());
    }

    #[test]
    fn later_submission_overwrites_score() {
        let mut progress =
            LessonProgress::completed(LessonId::new("l-1"), QuizScore::new(90).unwrap());
        progress.record_submission(QuizScore::new(40).unwrap());
        assert_eq!(progress.score.value(), 40);
        assert!(progress.completed);
    }
}
