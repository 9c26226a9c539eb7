#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod error;
pub mod lesson_service;
pub mod project_service;
pub mod resource_service;
pub mod routes;
pub mod theme_service;

pub use lab_core::Clock;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use error::{AppServicesError, AuthError, LessonServiceError, ProjectServiceError};
pub use lesson_service::{LessonFilters, LessonService};
pub use project_service::{ParticipationStats, ProjectService};
pub use resource_service::{ResourceFilters, ResourceService};
pub use routes::{Access, Route, RouteDecision};
pub use theme_service::ThemeService;
