use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use gradebook_auth_types::identity::IdentityHeaders;

use crate::error::GradesServiceError;
use crate::handlers::{RecordResponse, actor, record_response};
use crate::state::AppState;
use crate::usecase::feedback::{
    DeleteFeedbackUseCase, FeedbackInput, GiveTeacherFeedbackUseCase,
    SubmitStudentFeedbackUseCase,
};

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub text: String,
    pub version: Option<i32>,
}

// ── PUT /enrollments/{code}/{student_id}/feedback/teacher ────────────────────

pub async fn put_teacher_feedback(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((code, student_id)): Path<(String, Uuid)>,
    Json(body): Json<FeedbackRequest>,
) -> Result<Json<RecordResponse>, GradesServiceError> {
    let usecase = GiveTeacherFeedbackUseCase {
        gateway: state.gateway(),
    };
    let record = usecase
        .execute(
            &actor(identity),
            FeedbackInput {
                student_id,
                course_code: code,
                text: body.text,
                expected_version: body.version,
            },
        )
        .await?;
    Ok(Json(record_response(record)))
}

// ── PUT /enrollments/{code}/{student_id}/feedback/student ────────────────────

pub async fn put_student_feedback(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((code, student_id)): Path<(String, Uuid)>,
    Json(body): Json<FeedbackRequest>,
) -> Result<Json<RecordResponse>, GradesServiceError> {
    let usecase = SubmitStudentFeedbackUseCase {
        gateway: state.gateway(),
    };
    let record = usecase
        .execute(
            &actor(identity),
            FeedbackInput {
                student_id,
                course_code: code,
                text: body.text,
                expected_version: body.version,
            },
        )
        .await?;
    Ok(Json(record_response(record)))
}

// ── DELETE /enrollments/{code}/{student_id}/feedback ─────────────────────────

pub async fn delete_feedback(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((code, student_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, GradesServiceError> {
    let usecase = DeleteFeedbackUseCase {
        gateway: state.gateway(),
    };
    usecase.execute(&actor(identity), student_id, &code).await?;
    Ok(StatusCode::NO_CONTENT)
}
