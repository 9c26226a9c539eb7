mod ids;
mod lesson;
mod progress;
mod project;
mod resource;
mod theme;
mod user;

pub use ids::{LessonId, OptionId, ParseIdError, ProjectId, QuestionId, ResourceId, UserId};

pub use lesson::{
    CategoryParseError, Lesson, LessonCategory, LessonError, QuizAnswers, QuizOption,
    QuizOutcome, QuizQuestion, QuizResult,
};
pub use progress::{LessonProgress, ProgressError, QuizScore};
pub use project::{
    ParticipationStatus, Project, ProjectDifficulty, ProjectParticipation, ProjectStatus,
};
pub use resource::{CategoryFilter, Resource, ResourceCategory};
pub use theme::Theme;
pub use user::{AuthUser, RoleParseError, User, UserRole};
