use std::fmt;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use lab_core::model::{
    AuthUser, CategoryFilter, LessonCategory, LessonId, ProjectId, QuizAnswers,
    ResourceCategory, Theme, UserRole,
};
use services::routes::resolve;
use services::{
    AppServices, AuthError, Clock, LessonFilters, LessonServiceError, ProjectServiceError,
    ResourceFilters, Route, RouteDecision,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eco-lab")]
#[command(about = "Sustainable Living Lab: lessons, projects, and resources", long_about = None)]
#[command(version)]
struct Cli {
    /// `SQLite` database holding this profile's saved state.
    #[arg(long = "db", env = "LAB_DB_URL", default_value = "sqlite://lab.sqlite3", global = true)]
    db_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with a known email address
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a local account and sign in as it
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "student")]
        role: UserRole,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List lessons, optionally filtered
    Lessons {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        category: CategoryFilter<LessonCategory>,
    },
    /// Show one lesson and its quiz
    Lesson { id: LessonId },
    /// Answer a lesson quiz, e.g. `quiz lesson-waste-1 q1=b`
    Quiz {
        id: LessonId,
        answers: Vec<String>,
    },
    /// List projects with your status
    Projects,
    Join { id: ProjectId },
    /// Complete a project by describing what you did
    SubmitProof { id: ProjectId, text: String },
    /// List resources, optionally filtered
    Resources {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        category: CategoryFilter<ResourceCategory>,
    },
    /// Sustainability score, badges, and completion
    Progress,
    /// Catalog and participation overview for administrators
    Admin { section: Option<AdminSection> },
    /// Show or change the colour theme
    Theme { mode: Option<ThemeMode> },
    /// Explain where a path leads for the current user
    Route { path: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AdminSection {
    Lessons,
    Projects,
    Resources,
}

impl AdminSection {
    fn route(self) -> Route {
        match self {
            AdminSection::Lessons => Route::AdminLessons,
            AdminSection::Projects => Route::AdminProjects,
            AdminSection::Resources => Route::AdminResources,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    Toggle,
    Light,
    Dark,
}

/// Failures reported to the user as-is.
#[derive(Debug)]
enum CliError {
    Auth(AuthError),
    Lesson(LessonServiceError),
    Project(ProjectServiceError),
    BadAnswer(String),
    Redirected { wanted: Route, to: Route },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Auth(err) => write!(f, "{err}"),
            CliError::Lesson(err) => write!(f, "{err}"),
            CliError::Project(err) => write!(f, "{err}"),
            CliError::BadAnswer(raw) => {
                write!(f, "answers look like question=option, got: {raw}")
            }
            CliError::Redirected { wanted, to } if *to == Route::Login => {
                write!(f, "{wanted} requires signing in first (see `eco-lab login`)")
            }
            CliError::Redirected { wanted, to } => {
                write!(f, "{wanted} is not available for your role; your home is {to}")
            }
        }
    }
}

impl std::error::Error for CliError {}

impl From<AuthError> for CliError {
    fn from(err: AuthError) -> Self {
        CliError::Auth(err)
    }
}

impl From<LessonServiceError> for CliError {
    fn from(err: LessonServiceError) -> Self {
        CliError::Lesson(err)
    }
}

impl From<ProjectServiceError> for CliError {
    fn from(err: ProjectServiceError) -> Self {
        CliError::Project(err)
    }
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("sqlite::memory:") || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }
    let path = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    format!("sqlite://{path}")
}

fn prepare_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = std::path::Path::new(path.split('?').next().unwrap_or(path));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Apply the role guard for the route a command stands for.
async fn guard(app: &AppServices, route: Route) -> Result<Option<AuthUser>, CliError> {
    let user = app.auth().current_user().await;
    match resolve(route.clone(), user.as_ref()) {
        RouteDecision::Render(_) => Ok(user),
        RouteDecision::Redirect(to) => Err(CliError::Redirected { wanted: route, to }),
    }
}

fn parse_answers(raw: &[String]) -> Result<QuizAnswers, CliError> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(q, o)| (q.trim().to_owned(), o.trim().to_owned()))
                .filter(|(q, o)| !q.is_empty() && !o.is_empty())
                .ok_or_else(|| CliError::BadAnswer(pair.clone()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|pairs| pairs.into_iter().collect())
}

async fn admin_overview(app: &AppServices) {
    let report = app.progress_report().await;
    println!(
        "Catalog: {} lessons, {} projects, {} resources",
        report.lessons_total,
        report.projects_total,
        app.resources().resources().len()
    );
    println!(
        "Completion on this device: lessons {}%, projects {}%",
        report.lesson_completion_percent, report.project_completion_percent
    );
}

fn admin_lessons(app: &AppServices) {
    let lessons = app.lessons();
    for category in lessons.categories() {
        let filters = LessonFilters {
            category: CategoryFilter::Only(*category),
            ..LessonFilters::default()
        };
        let in_category = lessons.search_lessons(&filters);
        println!("{category} ({})", in_category.len());
        for lesson in in_category {
            println!(
                "  {:<22} {}  [{} questions]",
                lesson.id(),
                lesson.title(),
                lesson.quiz().len()
            );
        }
    }
}

async fn admin_projects(app: &AppServices) {
    let projects = app.projects();
    for project in projects.projects() {
        let stats = projects.participation_stats(&project.id).await;
        println!(
            "{:<22} {:<13} participants: {}, completed: {}",
            project.id, project.difficulty, stats.participants, stats.completed
        );
    }
}

fn admin_resources(app: &AppServices) {
    for resource in app.resources().resources() {
        println!(
            "{:<20} {:<8} {}\n{:<29} {}",
            resource.id, resource.category, resource.title, "", resource.url
        );
    }
}

#[allow(clippy::too_many_lines)]
async fn execute(app: &AppServices, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            let user = app.auth().login(&email, &password).await?;
            println!("Welcome back, {}! Your sustainability journey continues.", user.user.name);
        }
        Command::Register {
            name,
            email,
            role,
            password,
        } => {
            let user = app.auth().register(&name, &email, role, &password).await?;
            println!(
                "Account created for {} ({}). Start at {}.",
                user.user.email,
                user.role(),
                Route::home_for(user.role())
            );
        }
        Command::Logout => {
            app.auth().logout().await;
            println!("Signed out.");
        }
        Command::Whoami => match app.auth().current_user().await {
            Some(user) => println!("{} <{}> ({})", user.user.name, user.user.email, user.role()),
            None => println!("Not signed in."),
        },
        Command::Lessons { search, category } => {
            guard(app, Route::Lessons).await?;
            let lessons = app.lessons();
            let matches = lessons.search_lessons(&LessonFilters { search, category });
            if matches.is_empty() {
                println!("No lessons match your search and filter.");
            }
            for lesson in matches {
                let status = match lessons.get_lesson_progress(lesson.id()).await {
                    Some(progress) if progress.completed => format!("completed ({})", progress.score),
                    _ => "not started".to_owned(),
                };
                println!("{:<22} {:<24} {}  [{status}]", lesson.id(), lesson.category(), lesson.title());
            }
        }
        Command::Lesson { id } => {
            guard(app, Route::LessonDetail(id.clone())).await?;
            let lessons = app.lessons();
            let lesson = lessons
                .lesson(&id)
                .ok_or_else(|| LessonServiceError::NotFound(id.clone()))?;
            println!("{} ({})\n\n{}\n", lesson.title(), lesson.category(), lesson.content());
            for question in lesson.quiz() {
                println!("{}: {}", question.id, question.question);
                for option in &question.options {
                    println!("    {}) {}", option.id, option.label);
                }
            }
        }
        Command::Quiz { id, answers } => {
            guard(app, Route::LessonDetail(id.clone())).await?;
            let answers = parse_answers(&answers)?;
            let result = app.lessons().submit_quiz(&id, &answers).await?;
            println!(
                "{}/{} correct, score {}. {}",
                result.correct,
                result.total,
                result.score,
                result.outcome.message()
            );
        }
        Command::Projects => {
            guard(app, Route::Projects).await?;
            let projects = app.projects();
            for project in projects.projects() {
                let status = projects.status_of(&project.id).await;
                println!(
                    "{:<22} {:<13} {:<11} {}  [{status}]",
                    project.id, project.difficulty, project.estimated_duration, project.title
                );
            }
        }
        Command::Join { id } => {
            guard(app, Route::Projects).await?;
            app.projects().join_project(id).await;
            println!("Project added to your sustainability journey.");
        }
        Command::SubmitProof { id, text } => {
            guard(app, Route::Projects).await?;
            app.projects().submit_project_proof(id, &text).await?;
            println!("Thank you for completing this project and sharing your reflection.");
        }
        Command::Resources { search, category } => {
            guard(app, Route::Resources).await?;
            let resources = app.resources();
            resources.set_filters(ResourceFilters { search, category });
            for resource in resources.filtered_resources() {
                println!(
                    "{:<8} {}  ({})\n         {}",
                    resource.category, resource.title, resource.source, resource.url
                );
            }
        }
        Command::Progress => {
            guard(app, Route::Progress).await?;
            let report = app.progress_report().await;
            println!("Sustainability score: {}", report.score);
            println!(
                "Lessons:  {}/{} ({}%)",
                report.lessons_completed, report.lessons_total, report.lesson_completion_percent
            );
            println!(
                "Projects: {}/{} ({}%)",
                report.projects_completed, report.projects_total, report.project_completion_percent
            );
            println!("Overall:  {}%", report.overall_percent);
            if report.badges.is_empty() {
                println!("Badges:   none yet");
            } else {
                let labels: Vec<&str> = report.badges.iter().map(|b| b.label()).collect();
                println!("Badges:   {}", labels.join(", "));
            }
        }
        Command::Admin { section } => {
            let route = section.map_or(Route::Admin, AdminSection::route);
            guard(app, route).await?;
            match section {
                None => admin_overview(app).await,
                Some(AdminSection::Lessons) => admin_lessons(app),
                Some(AdminSection::Projects) => admin_projects(app).await,
                Some(AdminSection::Resources) => admin_resources(app),
            }
        }
        Command::Theme { mode } => {
            let themes = app.theme();
            let theme = match mode {
                None => themes.theme().await,
                Some(ThemeMode::Toggle) => themes.toggle().await,
                Some(ThemeMode::Light) => {
                    themes.set(Theme::Light).await;
                    Theme::Light
                }
                Some(ThemeMode::Dark) => {
                    themes.set(Theme::Dark).await;
                    Theme::Dark
                }
            };
            println!("Theme: {theme}");
        }
        Command::Route { path } => {
            let user = app.auth().current_user().await;
            match resolve(Route::parse(&path), user.as_ref()) {
                RouteDecision::Render(route) => println!("render {route}"),
                RouteDecision::Redirect(route) => println!("redirect to {route}"),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_url = normalize_sqlite_url(&cli.db_url);

    if let Err(err) = prepare_sqlite_dir(&db_url) {
        tracing::error!(error = %err, db_url, "could not prepare database directory");
        eprintln!("Something went wrong. Please try again.");
        return ExitCode::from(2);
    }

    let app = match AppServices::new_sqlite(&db_url, Clock::System).await {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(error = %err, db_url, "failed to start services");
            eprintln!("Something went wrong. Please try again.");
            return ExitCode::from(2);
        }
    };

    match execute(&app, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lab_core::model::{OptionId, QuestionId};
    use lab_core::time::fixed_clock;
    use storage::Storage;

    async fn app() -> AppServices {
        AppServices::from_storage(&Storage::in_memory(), fixed_clock())
            .await
            .unwrap()
    }

    fn redirect_target(result: Result<(), CliError>) -> Route {
        match result {
            Err(CliError::Redirected { to, .. }) => to,
            other => panic!("expected a redirect, got {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn sqlite_urls_are_normalized() {
        assert_eq!(normalize_sqlite_url("lab.sqlite3"), "sqlite://lab.sqlite3");
        assert_eq!(normalize_sqlite_url("sqlite:data/lab.db"), "sqlite://data/lab.db");
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url(" sqlite:///tmp/lab.db "),
            "sqlite:///tmp/lab.db"
        );
    }

    #[test]
    fn answers_parse_pairs() {
        let answers = parse_answers(&["q1=b".into(), " q2 = a ".into()]).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(
            answers.selected(&QuestionId::new("q2")),
            Some(&OptionId::new("a"))
        );
        assert!(parse_answers(&["q1".into()]).is_err());
        assert!(parse_answers(&["=b".into()]).is_err());
    }

    #[test]
    fn quiz_command_parses() {
        let cli = Cli::try_parse_from(["eco-lab", "quiz", "lesson-waste-1", "q1=b"]).unwrap();
        match cli.command {
            Command::Quiz { id, answers } => {
                assert_eq!(id, LessonId::new("lesson-waste-1"));
                assert_eq!(answers, vec!["q1=b".to_owned()]);
            }
            _ => panic!("expected quiz command"),
        }
    }

    #[test]
    fn category_filters_parse() {
        let cli = Cli::try_parse_from(["eco-lab", "resources", "--category", "pdf"]).unwrap();
        match cli.command {
            Command::Resources { category, .. } => {
                assert_eq!(category, CategoryFilter::Only(ResourceCategory::Pdf));
            }
            _ => panic!("expected resources command"),
        }
    }

    #[test]
    fn admin_sections_parse() {
        let cli = Cli::try_parse_from(["eco-lab", "admin", "resources"]).unwrap();
        match cli.command {
            Command::Admin { section } => assert_eq!(section, Some(AdminSection::Resources)),
            _ => panic!("expected admin command"),
        }
        let cli = Cli::try_parse_from(["eco-lab", "admin"]).unwrap();
        assert!(matches!(cli.command, Command::Admin { section: None }));
    }

    #[tokio::test]
    async fn guest_is_sent_to_login() {
        let app = app().await;
        let to = redirect_target(execute(&app, Command::Progress).await);
        assert_eq!(to, Route::Login);
    }

    #[tokio::test]
    async fn student_cannot_open_admin_views() {
        let app = app().await;
        app.auth()
            .register("Robin", "robin@example.org", UserRole::Student, "pw")
            .await
            .unwrap();

        let to = redirect_target(execute(&app, Command::Admin { section: None }).await);
        assert_eq!(to.path(), "/dashboard");
        let to = redirect_target(
            execute(
                &app,
                Command::Admin {
                    section: Some(AdminSection::Lessons),
                },
            )
            .await,
        );
        assert_eq!(to, Route::Dashboard);
    }

    #[tokio::test]
    async fn admin_cannot_open_student_views() {
        let app = app().await;
        app.auth()
            .login("admin@sustainability.edu", "pw")
            .await
            .unwrap();

        let to = redirect_target(execute(&app, Command::Projects).await);
        assert_eq!(to.path(), "/admin");
        execute(
            &app,
            Command::Admin {
                section: Some(AdminSection::Resources),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn quiz_command_records_progress_for_student() {
        let app = app().await;
        app.auth()
            .register("Robin", "robin@example.org", UserRole::Student, "pw")
            .await
            .unwrap();

        execute(
            &app,
            Command::Quiz {
                id: LessonId::new("lesson-waste-1"),
                answers: vec!["q1=b".into()],
            },
        )
        .await
        .unwrap();

        let progress = app
            .lessons()
            .get_lesson_progress(&LessonId::new("lesson-waste-1"))
            .await
            .unwrap();
        assert_eq!(progress.score.value(), 100);
    }
}
