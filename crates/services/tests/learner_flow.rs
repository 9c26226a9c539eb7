use lab_core::model::{
    LessonId, ProjectId, ProjectStatus, QuizAnswers, QuizOutcome, Theme, UserRole,
};
use lab_core::scoring::Badge;
use lab_core::time::fixed_clock;
use services::routes::resolve;
use services::{AppServices, AuthError, Route, RouteDecision};
use storage::repository::Storage;

#[tokio::test]
async fn learner_flow_register_learn_build_and_score() {
    let storage = Storage::sqlite("sqlite:file:memdb_learner_flow?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let app = AppServices::from_storage(&storage, fixed_clock())
        .await
        .expect("build services");

    let auth = app.auth();
    let student = auth
        .register("Robin", "robin@example.org", UserRole::Student, "secret")
        .await
        .expect("register");
    assert_eq!(
        resolve(Route::Lessons, Some(&student)),
        RouteDecision::Render(Route::Lessons)
    );
    assert_eq!(
        resolve(Route::Admin, Some(&student)),
        RouteDecision::Redirect(Route::Dashboard)
    );

    let lessons = app.lessons();
    let perfect: QuizAnswers = [("q1", "b")].into_iter().collect();
    let result = lessons
        .submit_quiz(&LessonId::new("lesson-waste-1"), &perfect)
        .await
        .expect("submit quiz");
    assert_eq!(result.outcome, QuizOutcome::Perfect);

    let partial: QuizAnswers = [("q1", "c")].into_iter().collect();
    lessons
        .submit_quiz(&LessonId::new("lesson-renewable-1"), &partial)
        .await
        .expect("submit quiz");

    let projects = app.projects();
    let compost = ProjectId::new("project-compost");
    projects.join_project(compost.clone()).await;
    assert_eq!(projects.status_of(&compost).await, ProjectStatus::InProgress);
    projects
        .submit_project_proof(compost.clone(), "Three bins and a worm farm.")
        .await
        .expect("submit proof");

    let report = app.progress_report().await;
    assert_eq!(report.lessons_completed, 2);
    assert_eq!(report.projects_completed, 1);
    assert_eq!(report.score, 45);
    assert_eq!(report.badges, vec![Badge::EcoExplorer]);
    assert_eq!(report.overall_percent, 50);

    app.theme().toggle().await;

    // A fresh set of services over the same store sees the same state.
    let reopened = AppServices::from_storage(&storage, fixed_clock())
        .await
        .expect("rebuild services");
    assert_eq!(reopened.auth().current_user().await, Some(student));
    assert_eq!(reopened.progress_report().await, report);
    assert_eq!(reopened.theme().theme().await, Theme::Dark);
    let renewable = reopened
        .lessons()
        .get_lesson_progress(&LessonId::new("lesson-renewable-1"))
        .await
        .expect("renewable progress");
    assert_eq!(renewable.score.value(), 50);
}

#[tokio::test]
async fn admin_login_and_failed_login_leave_resident_alone() {
    let storage = Storage::in_memory();
    let app = AppServices::from_storage(&storage, fixed_clock())
        .await
        .expect("build services");
    let auth = app.auth();

    let err = auth
        .login("ghost@example.org", "pw")
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::NotFound);
    assert!(auth.current_user().await.is_none());

    let admin = auth
        .login("admin@sustainability.edu", "anything")
        .await
        .expect("admin login");
    assert_eq!(admin.role(), UserRole::Admin);
    assert_eq!(
        resolve(Route::Progress, Some(&admin)),
        RouteDecision::Redirect(Route::Admin)
    );

    let stats = app
        .projects()
        .participation_stats(&ProjectId::new("project-compost"))
        .await;
    assert_eq!(stats.participants, 0);
}

#[tokio::test]
async fn services_run_without_working_storage() {
    let storage = Storage::from_backend(storage::InMemoryStore::unavailable());
    let app = AppServices::from_storage(&storage, fixed_clock())
        .await
        .expect("build services");

    app.lessons()
        .mark_lesson_completed(
            LessonId::new("lesson-lifestyle-1"),
            lab_core::model::QuizScore::new(100).unwrap(),
        )
        .await;
    app.projects()
        .join_project(ProjectId::new("project-plastic-free"))
        .await;

    let report = app.progress_report().await;
    assert_eq!(report.lessons_completed, 1);
    assert_eq!(report.score, 10);
}
