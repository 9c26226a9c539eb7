//! Route table and role-based access decisions.
//!
//! Students and administrators never share dashboard routes: each role is
//! sent to its own home when it strays into the other's subtree.

use std::fmt;

use lab_core::model::{AuthUser, LessonId, UserRole};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    Lessons,
    LessonDetail(LessonId),
    Projects,
    Resources,
    Progress,
    Admin,
    AdminLessons,
    AdminProjects,
    AdminResources,
}

/// Who may render a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    StudentOnly,
    AdminOnly,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    Redirect(Route),
}

impl Route {
    /// Parse a path; anything unrecognised falls back to the landing page.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .split('?')
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Landing,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard,
            ["lessons"] => Route::Lessons,
            ["lessons", id] => Route::LessonDetail(LessonId::new(*id)),
            ["projects"] => Route::Projects,
            ["resources"] => Route::Resources,
            ["progress"] => Route::Progress,
            ["admin"] => Route::Admin,
            ["admin", "lessons"] => Route::AdminLessons,
            ["admin", "projects"] => Route::AdminProjects,
            ["admin", "resources"] => Route::AdminResources,
            _ => Route::Landing,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".into(),
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::Dashboard => "/dashboard".into(),
            Route::Lessons => "/lessons".into(),
            Route::LessonDetail(id) => format!("/lessons/{id}"),
            Route::Projects => "/projects".into(),
            Route::Resources => "/resources".into(),
            Route::Progress => "/progress".into(),
            Route::Admin => "/admin".into(),
            Route::AdminLessons => "/admin/lessons".into(),
            Route::AdminProjects => "/admin/projects".into(),
            Route::AdminResources => "/admin/resources".into(),
        }
    }

    #[must_use]
    pub fn access(&self) -> Access {
        match self {
            Route::Landing | Route::Login | Route::Register => Access::Public,
            Route::Dashboard
            | Route::Lessons
            | Route::LessonDetail(_)
            | Route::Projects
            | Route::Resources
            | Route::Progress => Access::StudentOnly,
            Route::Admin | Route::AdminLessons | Route::AdminProjects | Route::AdminResources => {
                Access::AdminOnly
            }
        }
    }

    #[must_use]
    pub fn home_for(role: UserRole) -> Self {
        match role {
            UserRole::Student => Route::Dashboard,
            UserRole::Admin => Route::Admin,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decide whether `user` may see `route`, or where to send them instead.
#[must_use]
pub fn resolve(route: Route, user: Option<&AuthUser>) -> RouteDecision {
    let access = route.access();
    if access == Access::Public {
        return RouteDecision::Render(route);
    }

    let Some(user) = user else {
        return RouteDecision::Redirect(Route::Login);
    };

    match (access, user.role()) {
        (Access::AdminOnly, UserRole::Student) | (Access::StudentOnly, UserRole::Admin) => {
            RouteDecision::Redirect(Route::home_for(user.role()))
        }
        _ => RouteDecision::Render(route),
    }
}
