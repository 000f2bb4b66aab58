mod config;
mod error;
mod state;
mod telemetry;
pub mod routes {
    pub mod conflicts;
    pub mod evaluate;
    pub mod health;
    pub mod sessions;
}

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::conflicts::check,
            routes::conflicts::check_sessions,
            routes::evaluate::evaluate_grid,
            routes::sessions::open,
            routes::sessions::view,
            routes::sessions::close,
            routes::sessions::assign,
            routes::sessions::clear,
            routes::sessions::lock,
            routes::sessions::generate,
            routes::sessions::save,
        ),
        components(schemas(
            types::TeacherId, types::ClassId, types::SubjectId, types::TermId,
            types::MappingId, types::LessonId, types::SlotId, types::SlotStatus,
            types::TeacherPreference, types::ClassSubjectMapping, types::ScheduleSlot,
            types::LessonRecord, types::LessonConflict, types::FairnessEntry,
            types::GenerateSummary, types::GenerateRequest, types::GenerateResponse,
            types::SaveRequest,
            sessions::SessionId, sessions::OpenSession, sessions::GridView,
            routes::health::Health,
            routes::conflicts::ConflictCheckIn,
            routes::conflicts::ConflictReport,
            routes::conflicts::SessionConflictsIn,
            routes::evaluate::EvaluateIn,
            routes::evaluate::EvaluateOut,
            routes::sessions::SessionCreated,
            routes::sessions::AssignIn,
            routes::sessions::CellIn
        )),
        tags(
            (name = "timetable", description = "Timetable conflict detection and slot evaluation")
        )
    )]
struct ApiDoc;

fn app(app_state: state::AppState) -> Router {
    Router::new()
        .route("/v1/health", get(routes::health::health))
        .route("/v1/conflicts", post(routes::conflicts::check))
        .route("/v1/evaluate", post(routes::evaluate::evaluate_grid))
        .route("/v1/sessions", post(routes::sessions::open))
        .route(
            "/v1/sessions/conflicts",
            post(routes::conflicts::check_sessions),
        )
        .route(
            "/v1/sessions/:id",
            get(routes::sessions::view).delete(routes::sessions::close),
        )
        .route("/v1/sessions/:id/assign", post(routes::sessions::assign))
        .route("/v1/sessions/:id/clear", post(routes::sessions::clear))
        .route("/v1/sessions/:id/lock", post(routes::sessions::lock))
        .route("/v1/sessions/:id/generate", post(routes::sessions::generate))
        .route("/v1/sessions/:id/save", post(routes::sessions::save))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(telemetry::stack())
        .with_state(app_state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(?e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let cfg = config::Config::from_env()?;
    let app_state = state::AppState::new(&cfg)?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
