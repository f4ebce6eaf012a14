use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{
    CreateSessionRequest, CreateSessionResponse, ProblemSummary, SubmitAnswerRequest,
};
use crate::services::AppState;

/// Create a session for a team and reconcile every catalog problem once,
/// so the response already carries decorated titles for the problem list.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    tracing::info!("Creating session for team_id={}", req.team_id);

    let summary = state.sessions.create_session(&req.team_id).await;

    let mut sessions = state.sessions.lock().await;
    let ctx = sessions
        .get_mut(&summary.session_id)
        .ok_or_else(|| ApiError::SessionNotFound(summary.session_id.clone()))?;

    let mut problems = Vec::with_capacity(state.catalog.len());
    for problem in state.catalog.iter() {
        state.progress.reconcile(ctx, problem).await;
        problems.push(ProblemSummary {
            id: problem.id.clone(),
            title: ctx.title(&problem.id).unwrap_or(&problem.title).to_string(),
        });
    }

    let response = CreateSessionResponse {
        session_id: summary.session_id,
        team_id: summary.team_id,
        started_at: summary.started_at,
        problems,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if state.sessions.end_session(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(session_id))
    }
}

/// The problem list as the front-end's tab strip renders it: decorated
/// titles only, in catalog order.
pub async fn list_problems(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let ctx = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))?;

    let mut problems = Vec::with_capacity(state.catalog.len());
    for problem in state.catalog.iter() {
        state.progress.reconcile(ctx, problem).await;
        problems.push(ProblemSummary {
            id: problem.id.clone(),
            title: ctx.title(&problem.id).unwrap_or(&problem.title).to_string(),
        });
    }

    Ok((StatusCode::OK, Json(problems)))
}

pub async fn get_problem(
    State(state): State<Arc<AppState>>,
    Path((session_id, problem_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let problem = state
        .catalog
        .get(&problem_id)
        .ok_or_else(|| ApiError::ProblemNotFound(problem_id.clone()))?;

    let mut sessions = state.sessions.lock().await;
    let ctx = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))?;

    let view = state.progress.view(ctx, problem).await;
    Ok((StatusCode::OK, Json(view)))
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path((session_id, problem_id)): Path<(String, String)>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    let problem = state
        .catalog
        .get(&problem_id)
        .ok_or_else(|| ApiError::ProblemNotFound(problem_id.clone()))?;

    tracing::info!(
        "Submitting answer for session={} problem={}",
        session_id,
        problem_id
    );

    let mut sessions = state.sessions.lock().await;
    let ctx = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))?;

    let response = state.progress.submit(ctx, problem, &req.answer).await?;
    Ok((StatusCode::OK, Json(response)))
}
