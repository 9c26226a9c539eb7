//! Slot names for persisted application state.
//!
//! Each slot is independent; nothing writes two slots atomically.

/// Light/dark preference.
pub const THEME: &str = "sustainable-theme";

/// Resident user snapshot (`null` when signed out).
pub const AUTH_USER: &str = "sustainable-auth-user";

/// List of per-lesson progress records.
pub const LESSON_PROGRESS: &str = "sustainable-lessons-progress";

/// List of per-project participation records.
pub const PROJECT_PARTICIPATION: &str = "sustainable-projects-participation";
