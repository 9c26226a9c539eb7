use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::ids::{LessonId, OptionId, QuestionId};
use crate::model::progress::QuizScore;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson quiz must contain at least one question")]
    EmptyQuiz,

    #[error("question {0} has no options")]
    NoOptions(QuestionId),

    #[error("question {0} has no correct option")]
    NoCorrectOption(QuestionId),

    #[error("question id {0} appears more than once")]
    DuplicateQuestion(QuestionId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryParseError {
    #[error("unknown lesson category: {0}")]
    Lesson(String),

    #[error("unknown resource category: {0}")]
    Resource(String),
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LessonCategory {
    RenewableEnergy,
    WasteReduction,
    EcoFriendlyLifestyle,
}

impl LessonCategory {
    pub const ALL: [LessonCategory; 3] = [
        LessonCategory::RenewableEnergy,
        LessonCategory::WasteReduction,
        LessonCategory::EcoFriendlyLifestyle,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LessonCategory::RenewableEnergy => "Renewable Energy",
            LessonCategory::WasteReduction => "Waste Reduction",
            LessonCategory::EcoFriendlyLifestyle => "Eco-Friendly Lifestyle",
        }
    }
}

impl fmt::Display for LessonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for LessonCategory {
    type Err = CategoryParseError;

    /// Accepts the display label or a kebab-case slug, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', " ");
        Self::ALL
            .into_iter()
            .find(|category| category.label().to_lowercase().replace('-', " ") == wanted)
            .ok_or_else(|| CategoryParseError::Lesson(s.to_owned()))
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    pub id: OptionId,
    pub label: String,
    pub is_correct: bool,
}

impl QuizOption {
    #[must_use]
    pub fn new(id: impl Into<OptionId>, label: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            is_correct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<QuizOption>,
}

impl QuizQuestion {
    #[must_use]
    pub fn new(
        id: impl Into<QuestionId>,
        question: impl Into<String>,
        options: Vec<QuizOption>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            options,
        }
    }

    /// The first option flagged correct. Lesson validation guarantees one exists.
    #[must_use]
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|opt| opt.is_correct)
    }
}

/// Selected option per question for one quiz attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizAnswers(BTreeMap<QuestionId, OptionId>);

impl QuizAnswers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an option, replacing any earlier choice for the same question.
    pub fn select(&mut self, question: impl Into<QuestionId>, option: impl Into<OptionId>) {
        self.0.insert(question.into(), option.into());
    }

    #[must_use]
    pub fn selected(&self, question: &QuestionId) -> Option<&OptionId> {
        self.0.get(question)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<Q: Into<QuestionId>, O: Into<OptionId>> FromIterator<(Q, O)> for QuizAnswers {
    fn from_iter<I: IntoIterator<Item = (Q, O)>>(iter: I) -> Self {
        let mut answers = Self::new();
        for (question, option) in iter {
            answers.select(question, option);
        }
        answers
    }
}

/// How an attempt is acknowledged to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizOutcome {
    /// Every question answered correctly.
    Perfect,
    /// At least 60%.
    Passed,
    KeepGoing,
}

impl QuizOutcome {
    pub const PASS_MARK: u8 = 60;

    #[must_use]
    pub fn for_score(score: QuizScore) -> Self {
        match score.value() {
            100 => Self::Perfect,
            s if s >= Self::PASS_MARK => Self::Passed,
            _ => Self::KeepGoing,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            QuizOutcome::Perfect => "Perfect score! You completed this lesson.",
            QuizOutcome::Passed => "Nice work! You passed this lesson quiz.",
            QuizOutcome::KeepGoing => "Keep going. Review the lesson and try the quiz again.",
        }
    }
}

/// Graded quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub correct: u32,
    pub total: u32,
    pub score: QuizScore,
    pub outcome: QuizOutcome,
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// Read-only lesson from the seed catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    category: LessonCategory,
    short_description: String,
    content: String,
    quiz: Vec<QuizQuestion>,
}

impl Lesson {
    /// Build a lesson and validate its quiz.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyQuiz` when the quiz has no questions, so grading
    /// never divides by zero. Also rejects blank titles, option-less questions,
    /// questions without a correct option, and duplicate question ids.
    pub fn new(
        id: impl Into<LessonId>,
        title: impl Into<String>,
        category: LessonCategory,
        short_description: impl Into<String>,
        content: impl Into<String>,
        quiz: Vec<QuizQuestion>,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        if quiz.is_empty() {
            return Err(LessonError::EmptyQuiz);
        }

        let mut seen = HashSet::new();
        for question in &quiz {
            if !seen.insert(question.id.clone()) {
                return Err(LessonError::DuplicateQuestion(question.id.clone()));
            }
            if question.options.is_empty() {
                return Err(LessonError::NoOptions(question.id.clone()));
            }
            if question.correct_option().is_none() {
                return Err(LessonError::NoCorrectOption(question.id.clone()));
            }
        }

        Ok(Self {
            id: id.into(),
            title,
            category,
            short_description: short_description.into(),
            content: content.into(),
            quiz,
        })
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn category(&self) -> LessonCategory {
        self.category
    }

    #[must_use]
    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn quiz(&self) -> &[QuizQuestion] {
        &self.quiz
    }

    /// Grade an attempt. Unanswered questions and unknown options count as wrong.
    #[must_use]
    pub fn grade(&self, answers: &QuizAnswers) -> QuizResult {
        let correct = self
            .quiz
            .iter()
            .filter(|question| {
                match (answers.selected(&question.id), question.correct_option()) {
                    (Some(selected), Some(correct)) => *selected == correct.id,
                    _ => false,
                }
            })
            .count();

        let correct = u32::try_from(correct).unwrap_or(u32::MAX);
        let total = u32::try_from(self.quiz.len()).unwrap_or(u32::MAX);
        let score = QuizScore::from_ratio(correct, total);

        QuizResult {
            correct,
            total,
            score,
            outcome: QuizOutcome::for_score(score),
        }
    }

    /// True when title or short description contains `needle` (already lowercased).
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.short_description.to_lowercase().contains(needle)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, correct: &str) -> QuizQuestion {
        QuizQuestion::new(
            id,
            format!("Question {id}?"),
            ["a", "b", "c"]
                .into_iter()
                .map(|opt| QuizOption::new(opt, opt.to_uppercase(), opt == correct))
                .collect(),
        )
    }

    fn lesson(quiz: Vec<QuizQuestion>) -> Result<Lesson, LessonError> {
        Lesson::new(
            "lesson-1",
            "Solar basics",
            LessonCategory::RenewableEnergy,
            "Why the sun matters",
            "Body",
            quiz,
        )
    }

    #[test]
    fn lesson_without_questions_is_rejected() {
        assert_eq!(lesson(Vec::new()).unwrap_err(), LessonError::EmptyQuiz);
    }

    #[test]
    fn question_without_correct_option_is_rejected() {
        let broken = question("q1", "z");
        let err = lesson(vec![broken]).unwrap_err();
        assert_eq!(err, LessonError::NoCorrectOption(QuestionId::new("q1")));
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let err = lesson(vec![question("q1", "a"), question("q1", "b")]).unwrap_err();
        assert!(matches!(err, LessonError::DuplicateQuestion(_)));
    }

    #[test]
    fn grading_rounds_to_nearest_percent() {
        let lesson = lesson(vec![
            question("q1", "a"),
            question("q2", "b"),
            question("q3", "c"),
        ])
        .unwrap();
        let answers: QuizAnswers = [("q1", "a"), ("q2", "b"), ("q3", "a")].into_iter().collect();

        let result = lesson.grade(&answers);
        assert_eq!(result.correct, 2);
        assert_eq!(result.total, 3);
        assert_eq!(result.score.value(), 67);
        assert_eq!(result.outcome, QuizOutcome::Passed);
    }

    #[test]
    fn unanswered_questions_count_as_wrong() {
        let lesson = lesson(vec![question("q1", "a"), question("q2", "b")]).unwrap();
        let result = lesson.grade(&QuizAnswers::new());
        assert_eq!(result.score.value(), 0);
        assert_eq!(result.outcome, QuizOutcome::KeepGoing);
    }

    #[test]
    fn perfect_attempt() {
        let lesson = lesson(vec![question("q1", "c")]).unwrap();
        let answers: QuizAnswers = [("q1", "c")].into_iter().collect();
        let result = lesson.grade(&answers);
        assert_eq!(result.score.value(), 100);
        assert_eq!(result.outcome, QuizOutcome::Perfect);
    }

    #[test]
    fn category_parses_labels_and_slugs() {
        assert_eq!(
            "renewable-energy".parse::<LessonCategory>().unwrap(),
            LessonCategory::RenewableEnergy
        );
        assert_eq!(
            "Eco-Friendly Lifestyle".parse::<LessonCategory>().unwrap(),
            LessonCategory::EcoFriendlyLifestyle
        );
        assert!("plastics".parse::<LessonCategory>().is_err());
    }
}
