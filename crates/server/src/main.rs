// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::State as AxumState,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use capplan::{Clock, IdSource, PlanningSession, SequentialIdSource, SystemClock};
use capplan_api::{
    AddMemberRequest, ApiError, ApplyRoleChangeRequest, ApplyRoleChangeResponse,
    AuditTimelineResponse, ComputeMetricsRequest, CreateSubmissionRequest, DecisionRequest,
    ListSubmissionsRequest, ListSubmissionsResponse, MemberEditResponse, MetricsResponse,
    RosterResponse, SubmissionResponse, SubmitSessionRequest, UpdateCompletedRequest,
    UpdateFieldRequest, UpdateRoleRequest, ValidateMemberRequest, ValidateMemberResponse,
};
use capplan_domain::{
    MemberId, MetricsWeights, RosterErrors, SubmissionRecord, TeamMember, sample_roster,
};
use capplan_persistence::{Persistence, PersistenceError};
use clap::Parser;
use extract::{ApiJson, ApiPath, ApiQuery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

mod extract;

/// Capacity Planner Server - HTTP server for team capacity planning and plan review
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Team used for session submissions that do not name one
    #[arg(short, long, default_value = "Default Team")]
    team_name: String,

    /// Multiplier applied to coding tasks in the productivity score
    #[arg(long, default_value_t = capplan_domain::DEFAULT_CODING_WEIGHT)]
    coding_weight: u32,

    /// Start the planning session with the five-member sample roster
    #[arg(long)]
    seed_roster: bool,

    /// JSON store snapshot, loaded at startup if present and written on shutdown
    #[arg(short, long)]
    snapshot: Option<PathBuf>,
}

/// Application state shared across handlers.
///
/// The store synchronises internally. The planning session is a single
/// shared draft, so edits are serialised through a `Mutex`.
#[derive(Clone)]
struct AppState {
    /// Submission records and the audit log.
    persistence: Arc<Persistence>,
    /// The team's live roster and edit state.
    session: Arc<Mutex<PlanningSession>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
    weights: MetricsWeights,
    /// Default team for session submissions.
    team_name: Arc<str>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    /// Machine-readable error kind.
    error: String,
    /// Human-readable message.
    message: String,
    /// Field errors keyed by member, present only for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validation_errors: Option<RosterErrors>,
}

/// An error that can be returned as an HTTP response.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// Machine-readable error kind.
    kind: &'static str,
    /// The error message.
    message: String,
    validation_errors: Option<RosterErrors>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.kind.to_string(),
            message: self.message,
            validation_errors: self.validation_errors,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let message: String = err.to_string();
        match err {
            ApiError::ValidationFailed { errors } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                kind: "validation_failed",
                message,
                validation_errors: Some(errors),
            },
            ApiError::InvalidTransition { .. } => Self {
                status: StatusCode::CONFLICT,
                kind: "invalid_transition",
                message,
                validation_errors: None,
            },
            ApiError::DomainRuleViolation { .. } => Self {
                status: StatusCode::CONFLICT,
                kind: "domain_rule_violation",
                message,
                validation_errors: None,
            },
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                kind: "invalid_input",
                message,
                validation_errors: None,
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                kind: "not_found",
                message,
                validation_errors: None,
            },
            ApiError::Internal { .. } => {
                error!(error = %message, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    kind: "internal",
                    message,
                    validation_errors: None,
                }
            }
        }
    }
}

// ============================================================================
// Stateless operations
// ============================================================================

/// Handler for POST `/metrics` requests.
async fn handle_compute_metrics(
    AxumState(app_state): AxumState<AppState>,
    ApiJson(req): ApiJson<ComputeMetricsRequest>,
) -> Json<MetricsResponse> {
    Json(capplan_api::compute_metrics(&req, app_state.weights))
}

/// Handler for POST `/validate` requests.
async fn handle_validate_member(
    ApiJson(req): ApiJson<ValidateMemberRequest>,
) -> Json<ValidateMemberResponse> {
    Json(capplan_api::validate_member(&req))
}

/// Handler for POST `/role-change` requests.
async fn handle_apply_role_change(
    ApiJson(req): ApiJson<ApplyRoleChangeRequest>,
) -> Result<Json<ApplyRoleChangeResponse>, HttpError> {
    Ok(Json(capplan_api::apply_role_change(req)?))
}

// ============================================================================
// Submissions
// ============================================================================

/// Handler for POST `/submissions` requests.
async fn handle_create_submission(
    AxumState(app_state): AxumState<AppState>,
    ApiJson(req): ApiJson<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), HttpError> {
    info!(
        team = %req.team_name,
        raised_by = %req.raised_by,
        members = req.members.len(),
        "Handling create_submission request"
    );
    let response: SubmissionResponse = capplan_api::create_submission(
        &app_state.persistence,
        req,
        app_state.weights,
        app_state.ids.as_ref(),
        app_state.clock.as_ref(),
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/submissions` requests.
async fn handle_list_submissions(
    AxumState(app_state): AxumState<AppState>,
    ApiQuery(query): ApiQuery<ListSubmissionsRequest>,
) -> Result<Json<ListSubmissionsResponse>, HttpError> {
    Ok(Json(capplan_api::list_submissions(
        &app_state.persistence,
        &query,
    )?))
}

/// Handler for GET `/submissions/{id}` requests.
async fn handle_get_submission(
    AxumState(app_state): AxumState<AppState>,
    ApiPath(submission_id): ApiPath<String>,
) -> Result<Json<SubmissionRecord>, HttpError> {
    Ok(Json(capplan_api::get_submission(
        &app_state.persistence,
        &submission_id,
    )?))
}

/// Handler for POST `/submissions/{id}/approve` requests.
async fn handle_approve_submission(
    AxumState(app_state): AxumState<AppState>,
    ApiPath(submission_id): ApiPath<String>,
    ApiJson(req): ApiJson<DecisionRequest>,
) -> Result<Json<SubmissionResponse>, HttpError> {
    info!(
        submission_id = %submission_id,
        approver_id = %req.approver_id,
        "Handling approve request"
    );
    Ok(Json(capplan_api::approve_submission(
        &app_state.persistence,
        &submission_id,
        req,
        app_state.clock.as_ref(),
    )?))
}

/// Handler for POST `/submissions/{id}/reject` requests.
async fn handle_reject_submission(
    AxumState(app_state): AxumState<AppState>,
    ApiPath(submission_id): ApiPath<String>,
    ApiJson(req): ApiJson<DecisionRequest>,
) -> Result<Json<SubmissionResponse>, HttpError> {
    info!(
        submission_id = %submission_id,
        approver_id = %req.approver_id,
        "Handling reject request"
    );
    Ok(Json(capplan_api::reject_submission(
        &app_state.persistence,
        &submission_id,
        req,
        app_state.clock.as_ref(),
    )?))
}

/// Handler for GET `/submissions/{id}/audit` requests.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    ApiPath(submission_id): ApiPath<String>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    Ok(Json(capplan_api::get_audit_timeline(
        &app_state.persistence,
        &submission_id,
    )?))
}

// ============================================================================
// Planning session
// ============================================================================

/// Handler for GET `/roster` requests.
async fn handle_get_roster(AxumState(app_state): AxumState<AppState>) -> Json<RosterResponse> {
    let session = app_state.session.lock().await;
    Json(capplan_api::get_roster(&session))
}

/// Handler for POST `/roster/edit` requests.
async fn handle_enter_edit(AxumState(app_state): AxumState<AppState>) -> Json<RosterResponse> {
    let mut session = app_state.session.lock().await;
    Json(capplan_api::enter_edit(&mut session))
}

/// Handler for POST `/roster/edit/cancel` requests.
async fn handle_cancel_edit(AxumState(app_state): AxumState<AppState>) -> Json<RosterResponse> {
    let mut session = app_state.session.lock().await;
    Json(capplan_api::cancel_edit(&mut session))
}

/// Handler for POST `/roster/members` requests.
async fn handle_add_member(
    AxumState(app_state): AxumState<AppState>,
    ApiJson(req): ApiJson<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberEditResponse>), HttpError> {
    let response: MemberEditResponse =
        capplan_api::add_member(&mut *app_state.session.lock().await, &req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for DELETE `/roster/members/{id}` requests.
async fn handle_remove_member(
    AxumState(app_state): AxumState<AppState>,
    ApiPath(member_id): ApiPath<u32>,
) -> Result<Json<TeamMember>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(capplan_api::remove_member(
        &mut session,
        MemberId::new(member_id),
    )?))
}

/// Handler for POST `/roster/members/{id}/field` requests.
async fn handle_update_field(
    AxumState(app_state): AxumState<AppState>,
    ApiPath(member_id): ApiPath<u32>,
    ApiJson(req): ApiJson<UpdateFieldRequest>,
) -> Result<Json<MemberEditResponse>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(capplan_api::update_field(
        &mut session,
        MemberId::new(member_id),
        req,
    )?))
}

/// Handler for POST `/roster/members/{id}/role` requests.
async fn handle_update_role(
    AxumState(app_state): AxumState<AppState>,
    ApiPath(member_id): ApiPath<u32>,
    ApiJson(req): ApiJson<UpdateRoleRequest>,
) -> Result<Json<MemberEditResponse>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(capplan_api::update_role(
        &mut session,
        MemberId::new(member_id),
        &req,
    )?))
}

/// Handler for POST `/roster/members/{id}/completed` requests.
async fn handle_update_completed(
    AxumState(app_state): AxumState<AppState>,
    ApiPath(member_id): ApiPath<u32>,
    ApiJson(req): ApiJson<UpdateCompletedRequest>,
) -> Result<Json<MemberEditResponse>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(capplan_api::update_completed(
        &mut session,
        MemberId::new(member_id),
        &req,
    )?))
}

/// Handler for POST `/roster/save` requests.
async fn handle_save_draft(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<RosterResponse>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(capplan_api::save_draft(&mut session)?))
}

/// Handler for POST `/roster/submit` requests.
async fn handle_submit_session(
    AxumState(app_state): AxumState<AppState>,
    ApiJson(req): ApiJson<SubmitSessionRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), HttpError> {
    info!(raised_by = %req.raised_by, "Handling session submit request");
    let response: SubmissionResponse = capplan_api::submit_session(
        &mut *app_state.session.lock().await,
        &app_state.persistence,
        req,
        &app_state.team_name,
        app_state.ids.as_ref(),
        app_state.clock.as_ref(),
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/metrics", post(handle_compute_metrics))
        .route("/validate", post(handle_validate_member))
        .route("/role-change", post(handle_apply_role_change))
        .route(
            "/submissions",
            post(handle_create_submission).get(handle_list_submissions),
        )
        .route("/submissions/{id}", get(handle_get_submission))
        .route("/submissions/{id}/approve", post(handle_approve_submission))
        .route("/submissions/{id}/reject", post(handle_reject_submission))
        .route("/submissions/{id}/audit", get(handle_get_audit_timeline))
        .route("/roster", get(handle_get_roster))
        .route("/roster/edit", post(handle_enter_edit))
        .route("/roster/edit/cancel", post(handle_cancel_edit))
        .route("/roster/members", post(handle_add_member))
        .route("/roster/members/{id}", delete(handle_remove_member))
        .route("/roster/members/{id}/field", post(handle_update_field))
        .route("/roster/members/{id}/role", post(handle_update_role))
        .route("/roster/members/{id}/completed", post(handle_update_completed))
        .route("/roster/save", post(handle_save_draft))
        .route("/roster/submit", post(handle_submit_session))
        .with_state(app_state)
}

/// Loads the store from `path` if it exists, else starts empty.
fn open_store(path: Option<&PathBuf>) -> Result<Persistence, PersistenceError> {
    match path {
        Some(path) if path.exists() => {
            info!("Loading store snapshot from: {}", path.display());
            Persistence::load_snapshot_file(path)
        }
        Some(path) => {
            info!(
                "No snapshot at {}, starting with an empty store",
                path.display()
            );
            Ok(Persistence::new_in_memory())
        }
        None => {
            info!("Using in-memory store");
            Ok(Persistence::new_in_memory())
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Capacity Planner Server");

    let persistence: Arc<Persistence> = Arc::new(open_store(args.snapshot.as_ref())?);
    let next_id: u64 = u64::try_from(persistence.submission_count()?)?.saturating_add(1);

    let roster: Vec<TeamMember> = if args.seed_roster {
        info!("Seeding planning session with the sample roster");
        sample_roster()
    } else {
        Vec::new()
    };

    let app_state: AppState = AppState {
        persistence: Arc::clone(&persistence),
        session: Arc::new(Mutex::new(PlanningSession::with_weights(
            roster,
            MetricsWeights::new(args.coding_weight),
        ))),
        clock: Arc::new(SystemClock),
        ids: Arc::new(SequentialIdSource::starting_at("SUB", next_id)),
        weights: MetricsWeights::new(args.coding_weight),
        team_name: Arc::from(args.team_name.as_str()),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(path) = &args.snapshot {
        persistence.save_snapshot_file(path)?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use capplan::FixedClock;
    use serde_json::{Value, json};
    use time::macros::datetime;
    use tower::ServiceExt;

    /// Helper to create test app state with a fixed clock and the sample roster.
    fn create_test_app_state() -> AppState {
        AppState {
            persistence: Arc::new(Persistence::new_in_memory()),
            session: Arc::new(Mutex::new(PlanningSession::new(sample_roster()))),
            clock: Arc::new(FixedClock(datetime!(2026-07-06 09:30 UTC))),
            ids: Arc::new(SequentialIdSource::new("SUB")),
            weights: MetricsWeights::default(),
            team_name: Arc::from("Payments"),
        }
    }

    /// Sends one request and returns the status and the parsed JSON body.
    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let request: Request<Body> = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |value| Body::from(value.to_string())))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status: HttpStatusCode = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };
        (status, value)
    }

    fn create_test_submission_body(team_name: &str) -> Value {
        json!({
            "teamName": team_name,
            "raisedBy": "lead-7",
            "members": serde_json::to_value(sample_roster()).unwrap(),
        })
    }

    // ========================================================================
    // Submissions
    // ========================================================================

    #[tokio::test]
    async fn test_create_submission_returns_created_pending_record() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/submissions",
            Some(create_test_submission_body("Alpha")),
        )
        .await;

        assert_eq!(status, HttpStatusCode::CREATED);
        assert_eq!(body["submission"]["id"], "SUB-1");
        assert_eq!(body["submission"]["status"], "pending");
        assert_eq!(body["submission"]["timestamp"], "2026-07-06T09:30:00Z");
        assert!(body["eventId"].as_i64().unwrap() > 0);

        let (status, body) = send(&app, "GET", "/submissions/SUB-1", None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["teamName"], "Alpha");
    }

    #[tokio::test]
    async fn test_create_submission_with_invalid_member_returns_validation_errors() {
        let app: Router = build_router(create_test_app_state());
        let mut members: Vec<TeamMember> = sample_roster();
        members[0].target = 99;

        let (status, body) = send(
            &app,
            "POST",
            "/submissions",
            Some(json!({
                "teamName": "Alpha",
                "raisedBy": "lead-7",
                "members": serde_json::to_value(members).unwrap(),
            })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_failed");
        assert_eq!(
            body["validationErrors"]["1"]["target"],
            "Target cannot exceed 8 (coding + QA capacity)"
        );

        let (_, body) = send(&app, "GET", "/submissions", None).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_second_decision_is_a_conflict() {
        let app: Router = build_router(create_test_app_state());
        send(
            &app,
            "POST",
            "/submissions",
            Some(create_test_submission_body("Alpha")),
        )
        .await;

        let (status, body) = send(
            &app,
            "POST",
            "/submissions/SUB-1/approve",
            Some(json!({ "approverId": "admin-1", "comments": "Looks balanced" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["submission"]["status"], "approved");

        let (status, body) = send(
            &app,
            "POST",
            "/submissions/SUB-1/reject",
            Some(json!({ "approverId": "admin-2" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(body["error"], "invalid_transition");
    }

    #[tokio::test]
    async fn test_unknown_submission_returns_not_found() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(&app, "GET", "/submissions/SUB-404", None).await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");

        let (status, _) = send(
            &app,
            "POST",
            "/submissions/SUB-404/approve",
            Some(json!({ "approverId": "admin-1" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_team() {
        let app: Router = build_router(create_test_app_state());
        for team in ["Alpha", "Beta", "alpha"] {
            send(
                &app,
                "POST",
                "/submissions",
                Some(create_test_submission_body(team)),
            )
            .await;
        }
        send(
            &app,
            "POST",
            "/submissions/SUB-2/reject",
            Some(json!({ "approverId": "admin-1" })),
        )
        .await;

        let (status, body) = send(&app, "GET", "/submissions?status=pending", None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["count"], 2);

        let (_, body) = send(&app, "GET", "/submissions?teamName=ALPHA", None).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["submissions"][0]["id"], "SUB-3");
    }

    #[tokio::test]
    async fn test_list_rejects_inverted_date_range() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "GET",
            "/submissions?from=2026-08-01T00:00:00Z&to=2026-07-01T00:00:00Z",
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_audit_timeline_follows_lifecycle() {
        let app: Router = build_router(create_test_app_state());
        send(
            &app,
            "POST",
            "/submissions",
            Some(create_test_submission_body("Alpha")),
        )
        .await;
        send(
            &app,
            "POST",
            "/submissions/SUB-1/approve",
            Some(json!({ "approverId": "admin-1" })),
        )
        .await;

        let (status, body) = send(&app, "GET", "/submissions/SUB-1/audit", None).await;
        assert_eq!(status, HttpStatusCode::OK);
        let events: &Vec<Value> = body["events"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0]["event_id"].as_i64() < events[1]["event_id"].as_i64());
    }

    #[tokio::test]
    async fn test_create_submission_clamps_negative_counts() {
        let app: Router = build_router(create_test_app_state());
        let mut body: Value = create_test_submission_body("Alpha");
        body["members"][0]["completed"] = json!(-2);
        body["members"][2]["coding"] = json!(-3);

        let (status, body) = send(&app, "POST", "/submissions", Some(body)).await;

        assert_eq!(status, HttpStatusCode::CREATED);
        assert_eq!(body["submission"]["teamMembers"][0]["completed"], 0);
        assert_eq!(body["submission"]["teamMembers"][2]["coding"], 0);
        assert_eq!(body["submission"]["metrics"]["totalCompleted"], 60);
    }

    // ========================================================================
    // Stateless operations
    // ========================================================================

    #[tokio::test]
    async fn test_metrics_for_sample_roster() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/metrics",
            Some(json!({ "members": serde_json::to_value(sample_roster()).unwrap() })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["metrics"]["totalCodingTasks"], 24);
        assert_eq!(body["metrics"]["totalQACapacity"], 35);
        assert_eq!(body["memberMetrics"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_metrics_clamp_negative_counts() {
        let app: Router = build_router(create_test_app_state());
        let mut members: Value = serde_json::to_value(sample_roster()).unwrap();
        members[0]["completed"] = json!(-9);
        members[2]["coding"] = json!(-3);

        let (status, body) =
            send(&app, "POST", "/metrics", Some(json!({ "members": members }))).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["metrics"]["totalCodingTasks"], 24);
        assert_eq!(body["metrics"]["totalCompleted"], 60);
    }

    #[tokio::test]
    async fn test_malformed_body_returns_json_error() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/metrics",
            Some(json!({
                "members": [{ "id": 1, "name": "John", "role": "Coder", "coding": "eight" }]
            })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");
        assert!(body["message"].as_str().unwrap().contains("'body'"));
    }

    #[tokio::test]
    async fn test_malformed_path_returns_json_error() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(&app, "DELETE", "/roster/members/not-a-number", None).await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");
        assert!(body["message"].as_str().unwrap().contains("'path'"));
    }

    #[tokio::test]
    async fn test_role_change_with_unknown_role_is_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/role-change",
            Some(json!({ "memberId": 1, "role": "Manager" })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Invalid input for field 'role': Invalid role: 'Manager'. Must be 'Coder', 'QA' or 'CoderQA'"
        );
    }

    // ========================================================================
    // Planning session
    // ========================================================================

    #[tokio::test]
    async fn test_field_edit_requires_edit_mode() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/roster/members/1/field",
            Some(json!({ "field": "coding", "value": 9 })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(body["error"], "domain_rule_violation");
    }

    #[tokio::test]
    async fn test_edit_save_and_submit_session() {
        let app: Router = build_router(create_test_app_state());

        let (_, body) = send(&app, "POST", "/roster/edit", None).await;
        assert_eq!(body["editing"], true);

        let (status, body) = send(
            &app,
            "POST",
            "/roster/members/1/field",
            Some(json!({ "field": "coding", "value": 9 })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["member"]["coding"], 9);

        let (status, body) = send(&app, "POST", "/roster/save", None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["editing"], false);
        assert_eq!(body["members"][0]["coding"], 9);

        let (status, body) = send(
            &app,
            "POST",
            "/roster/submit",
            Some(json!({ "raisedBy": "lead-7" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CREATED);
        assert_eq!(body["submission"]["teamName"], "Payments");
        assert_eq!(body["submission"]["teamMembers"][0]["coding"], 9);
    }

    #[tokio::test]
    async fn test_invalid_draft_cannot_be_saved() {
        let app: Router = build_router(create_test_app_state());
        send(&app, "POST", "/roster/edit", None).await;

        let (status, body) = send(
            &app,
            "POST",
            "/roster/members/1/field",
            Some(json!({ "field": "target", "value": 50 })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert!(body["errors"]["target"].is_string());

        let (status, body) = send(&app, "POST", "/roster/save", None).await;
        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["validationErrors"]["1"]["target"].is_string());

        let (_, body) = send(&app, "POST", "/roster/edit/cancel", None).await;
        assert_eq!(body["editing"], false);
        assert_eq!(body["members"][0]["target"], 8);
    }

    #[tokio::test]
    async fn test_add_and_remove_member() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/roster/members",
            Some(json!({ "name": "Priya", "role": "QA" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CREATED);
        assert_eq!(body["member"]["id"], 6);

        let (status, body) = send(&app, "DELETE", "/roster/members/6", None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["name"], "Priya");

        let (status, _) = send(&app, "DELETE", "/roster/members/6", None).await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }
}
