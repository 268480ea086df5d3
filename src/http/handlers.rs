//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for the scheduling logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    AutoScheduleRequest, AutoScheduleResponse, ConflictCheckQuery, ConflictCheckResponse,
    ConfirmRequest, ConfirmOutcome, HealthResponse, LectureListResponse, LectureRequest,
    LectureSaveResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{CourseId, FacultyId, LectureId, ModuleId};
use crate::models::LecturePlacement;
use crate::services;
use crate::services::{LectureDraft, SaveOutcome};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Conflict Checking
// =============================================================================

/// GET /v1/courses/{course_id}/conflict-check
///
/// Run every conflict rule against a proposed placement. When blocking
/// conflicts exist, open same-day alternatives are attached as suggestions.
pub async fn check_conflicts(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Query(query): Query<ConflictCheckQuery>,
) -> HandlerResult<ConflictCheckResponse> {
    let course_id = CourseId::new(course_id);
    let faculty_id = FacultyId::new(query.faculty_id);
    let placement = LecturePlacement {
        course_id,
        faculty_id,
        date: query.date,
        start_time: query.start().map_err(AppError::BadRequest)?,
        end_time: query.end().map_err(AppError::BadRequest)?,
        mode: query.mode,
        location: query.location.clone(),
    };
    let exclude = query.exclude_lecture_id.map(LectureId::new);

    let report = services::detect_conflicts(state.repository.as_ref(), &placement, exclude).await?;

    let suggestions = if report.blocking_count() > 0 {
        services::suggest_alternatives(
            state.repository.as_ref(),
            query.date,
            faculty_id,
            course_id,
            query.location.as_deref(),
            exclude,
        )
        .await?
    } else {
        Vec::new()
    };

    Ok(Json(ConflictCheckResponse {
        has_conflicts: report.has_conflicts(),
        blocking_conflicts: report.blocking_count(),
        warning_conflicts: report.warning_count(),
        conflicts: report.conflicts,
        suggestions,
    }))
}

// =============================================================================
// Auto-Scheduling
// =============================================================================

/// POST /v1/courses/{course_id}/auto-schedule
///
/// Generate a full-term schedule preview for a course. Performs no writes.
pub async fn propose_schedule(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(request): Json<AutoScheduleRequest>,
) -> HandlerResult<AutoScheduleResponse> {
    let preferences = request
        .preferences
        .into_preferences()
        .map_err(AppError::BadRequest)?;

    let plan = services::propose_schedule(
        state.repository.as_ref(),
        CourseId::new(course_id),
        FacultyId::new(request.faculty_id),
        &preferences,
    )
    .await?;

    let next_steps = if plan.is_fully_resolved() {
        "Review the proposed schedule, then confirm it to create the lectures.".to_string()
    } else {
        format!(
            "{} module week(s) could not be placed. Adjust preferences or place them manually, \
             then confirm the remaining schedule.",
            plan.unresolved.len()
        )
    };

    Ok(Json(AutoScheduleResponse {
        placements: plan.placements,
        unresolved: plan.unresolved,
        next_steps,
    }))
}

/// PUT /v1/courses/{course_id}/auto-schedule/confirm
///
/// Write a reviewed schedule transactionally. Returns 409 with the conflict
/// list when re-validation finds blocking conflicts.
///
/// On success `lectures_created` carries the ids of the inserted rows rather
/// than a bare count: the length is the count, and the ids let callers fetch
/// the new lectures back without a second listing call.
pub async fn confirm_schedule(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(request): Json<ConfirmRequest>,
) -> Result<(StatusCode, Json<ConfirmOutcome>), AppError> {
    let outcome = services::confirm_schedule(
        state.repository.as_ref(),
        CourseId::new(course_id),
        FacultyId::new(request.faculty_id),
        &request.schedule,
        request.force,
    )
    .await?;

    let status = if outcome.success {
        StatusCode::CREATED
    } else {
        StatusCode::CONFLICT
    };
    Ok((status, Json(outcome)))
}

// =============================================================================
// Lecture CRUD
// =============================================================================

fn draft_from_request(request: &LectureRequest) -> LectureDraft {
    LectureDraft {
        course_id: CourseId::new(request.course_id),
        module_id: request.module_id.map(ModuleId::new),
        date: request.date,
        start_time: request.start_time,
        end_time: request.end_time,
        mode: request.mode,
        location: request.location.clone(),
        meeting_link: request.meeting_link.clone(),
        topic: request.topic.clone(),
        faculty_id: FacultyId::new(request.faculty_id),
    }
}

/// Attach same-day alternatives to a blocked save.
async fn blocked_response(
    state: &AppState,
    request: &LectureRequest,
    exclude: Option<LectureId>,
    conflicts: Vec<crate::api::Conflict>,
) -> Result<LectureSaveResponse, AppError> {
    let suggestions = services::suggest_alternatives(
        state.repository.as_ref(),
        request.date,
        FacultyId::new(request.faculty_id),
        CourseId::new(request.course_id),
        request.location.as_deref(),
        exclude,
    )
    .await?;
    Ok(LectureSaveResponse {
        success: false,
        lecture: None,
        conflicts,
        suggestions,
    })
}

/// POST /v1/lectures
///
/// Create a lecture. Blocking conflicts withhold the save and come back as a
/// 409 with the conflict list and same-day alternatives.
pub async fn create_lecture(
    State(state): State<AppState>,
    Json(request): Json<LectureRequest>,
) -> Result<(StatusCode, Json<LectureSaveResponse>), AppError> {
    let draft = draft_from_request(&request);
    match services::create_lecture(state.repository.as_ref(), &draft, request.force).await? {
        SaveOutcome::Saved(lecture) => Ok((
            StatusCode::CREATED,
            Json(LectureSaveResponse {
                success: true,
                lecture: Some(lecture),
                conflicts: Vec::new(),
                suggestions: Vec::new(),
            }),
        )),
        SaveOutcome::Blocked(report) => {
            let body = blocked_response(&state, &request, None, report.conflicts).await?;
            Ok((StatusCode::CONFLICT, Json(body)))
        }
    }
}

/// PUT /v1/lectures/{lecture_id}
///
/// Reschedule a lecture; date/time/location changes re-trigger the conflict
/// check, excluding the lecture's own stored row.
pub async fn update_lecture(
    State(state): State<AppState>,
    Path(lecture_id): Path<i64>,
    Json(request): Json<LectureRequest>,
) -> Result<(StatusCode, Json<LectureSaveResponse>), AppError> {
    let id = LectureId::new(lecture_id);
    let draft = draft_from_request(&request);
    match services::update_lecture(state.repository.as_ref(), id, &draft, request.force).await? {
        SaveOutcome::Saved(lecture) => Ok((
            StatusCode::OK,
            Json(LectureSaveResponse {
                success: true,
                lecture: Some(lecture),
                conflicts: Vec::new(),
                suggestions: Vec::new(),
            }),
        )),
        SaveOutcome::Blocked(report) => {
            let body = blocked_response(&state, &request, Some(id), report.conflicts).await?;
            Ok((StatusCode::CONFLICT, Json(body)))
        }
    }
}

/// GET /v1/lectures/{lecture_id}
pub async fn get_lecture(
    State(state): State<AppState>,
    Path(lecture_id): Path<i64>,
) -> HandlerResult<crate::models::Lecture> {
    let lecture =
        services::get_lecture(state.repository.as_ref(), LectureId::new(lecture_id)).await?;
    Ok(Json(lecture))
}

/// DELETE /v1/lectures/{lecture_id}
///
/// Cancel a lecture. The row is preserved; only the status changes.
pub async fn cancel_lecture(
    State(state): State<AppState>,
    Path(lecture_id): Path<i64>,
) -> HandlerResult<crate::models::Lecture> {
    let lecture =
        services::cancel_lecture(state.repository.as_ref(), LectureId::new(lecture_id)).await?;
    Ok(Json(lecture))
}

/// GET /v1/courses/{course_id}/lectures
///
/// All lectures of a course, any status, ordered by date and start time.
pub async fn list_lectures(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> HandlerResult<LectureListResponse> {
    let lectures =
        services::list_lectures(state.repository.as_ref(), CourseId::new(course_id)).await?;
    let total = lectures.len();
    Ok(Json(LectureListResponse { lectures, total }))
}
