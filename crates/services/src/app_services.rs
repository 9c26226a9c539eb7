use std::sync::Arc;

use lab_core::scoring::ProgressReport;
use lab_core::seed::Catalog;
use storage::Storage;

use crate::Clock;
use crate::auth_service::AuthService;
use crate::error::AppServicesError;
use crate::lesson_service::LessonService;
use crate::project_service::ProjectService;
use crate::resource_service::ResourceService;
use crate::theme_service::ThemeService;

/// Assembles app-facing services over one storage backend.
///
/// Each instance owns its own state, so tests can build isolated copies.
#[derive(Clone)]
pub struct AppServices {
    lessons: Arc<LessonService>,
    projects: Arc<ProjectService>,
    resources: Arc<ResourceService>,
    auth: Arc<AuthService>,
    theme: Arc<ThemeService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the seed catalog fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock).await
    }

    /// Build services over an existing backend with the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Seed` if the built-in catalog fails validation.
    pub async fn from_storage(storage: &Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let catalog = Catalog::builtin(clock.now())?;
        Ok(Self::with_catalog(storage, clock, catalog).await)
    }

    pub async fn with_catalog(storage: &Storage, clock: Clock, catalog: Catalog) -> Self {
        let store = storage.persistent();
        let Catalog {
            lessons,
            projects,
            resources,
            users,
        } = catalog;

        let lessons = Arc::new(LessonService::load(lessons, store.clone()).await);
        let projects = Arc::new(ProjectService::load(clock, projects, store.clone()).await);
        let resources = Arc::new(ResourceService::new(resources));
        let auth = Arc::new(AuthService::load(clock, users, store.clone()).await);
        let theme = Arc::new(ThemeService::load(store).await);

        Self {
            lessons,
            projects,
            resources,
            auth,
            theme,
        }
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    #[must_use]
    pub fn projects(&self) -> Arc<ProjectService> {
        Arc::clone(&self.projects)
    }

    #[must_use]
    pub fn resources(&self) -> Arc<ResourceService> {
        Arc::clone(&self.resources)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn theme(&self) -> Arc<ThemeService> {
        Arc::clone(&self.theme)
    }

    /// Score, badges, and completion rates from current progress.
    pub async fn progress_report(&self) -> ProgressReport {
        let progress = self.lessons.progress().await;
        let participation = self.projects.participation().await;
        ProgressReport::compute(
            self.lessons.lessons().len(),
            self.projects.projects().len(),
            &progress,
            &participation,
        )
    }
}
