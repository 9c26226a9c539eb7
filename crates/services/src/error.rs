//! Shared error types for the services crate.

use thiserror::Error;

use lab_core::model::LessonId;
use lab_core::seed::SeedError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `LessonService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonServiceError {
    #[error("lesson not found: {0}")]
    NotFound(LessonId),
}

/// Errors emitted by `ProjectService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProjectServiceError {
    #[error("please describe what you did before submitting")]
    EmptyProof,
}

/// Errors emitted by `AuthService`. Messages are shown to the user as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    #[error("Please enter your email address.")]
    EmptyEmail,
    #[error("Please enter your password.")]
    MissingPassword,
    #[error("Please enter your name.")]
    EmptyName,
    #[error("No account found with that email address.")]
    NotFound,
    #[error("An account with this email already exists on this device.")]
    Conflict,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Seed(#[from] SeedError),
}
