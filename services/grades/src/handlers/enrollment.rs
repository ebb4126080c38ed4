use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gradebook_auth_types::identity::IdentityHeaders;

use crate::domain::types::Enrollment;
use crate::error::GradesServiceError;
use crate::handlers::{RecordResponse, actor, parse_list_query, record_response};
use crate::state::AppState;
use crate::usecase::enrollment::{EnrollUseCase, UnenrollUseCase};
use crate::usecase::grade::{SetGradeInput, SetGradeUseCase};
use crate::usecase::view::{ListByStudentUseCase, ViewRecordUseCase};

#[derive(Serialize)]
pub struct EnrollmentResponse {
    pub id: String,
    pub student_id: String,
    pub course_code: String,
    pub grade: Option<u8>,
    pub version: i32,
    #[serde(serialize_with = "gradebook_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "gradebook_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

fn enrollment_response(enrollment: Enrollment) -> EnrollmentResponse {
    EnrollmentResponse {
        id: enrollment.id.to_string(),
        student_id: enrollment.student_id.to_string(),
        course_code: enrollment.course_code,
        grade: enrollment.grade.map(|g| g.value()),
        version: enrollment.version,
        created_at: enrollment.created_at,
        updated_at: enrollment.updated_at,
    }
}

// ── POST /enrollments ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct EnrollRequest {
    pub student_id: Uuid,
    pub course_code: String,
}

pub async fn enroll(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), GradesServiceError> {
    let usecase = EnrollUseCase {
        gateway: state.gateway(),
    };
    let enrollment = usecase
        .execute(&actor(identity), body.student_id, &body.course_code)
        .await?;
    Ok((StatusCode::CREATED, Json(enrollment_response(enrollment))))
}

// ── DELETE /enrollments/{code}/{student_id} ──────────────────────────────────

pub async fn unenroll(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((code, student_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, GradesServiceError> {
    let usecase = UnenrollUseCase {
        gateway: state.gateway(),
    };
    usecase.execute(&actor(identity), student_id, &code).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /enrollments/{code}/{student_id}/grade ───────────────────────────────

#[derive(Deserialize)]
pub struct SetGradeRequest {
    pub grade: i64,
    pub version: Option<i32>,
}

pub async fn set_grade(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((code, student_id)): Path<(String, Uuid)>,
    Json(body): Json<SetGradeRequest>,
) -> Result<StatusCode, GradesServiceError> {
    let usecase = SetGradeUseCase {
        gateway: state.gateway(),
    };
    usecase
        .execute(
            &actor(identity),
            SetGradeInput {
                student_id,
                course_code: code,
                grade: body.grade,
                expected_version: body.version,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /enrollments/{code}/{student_id} ─────────────────────────────────────

pub async fn get_record(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((code, student_id)): Path<(String, Uuid)>,
) -> Result<Json<RecordResponse>, GradesServiceError> {
    let usecase = ViewRecordUseCase {
        gateway: state.gateway(),
    };
    let record = usecase.execute(&actor(identity), student_id, &code).await?;
    Ok(Json(record_response(record)))
}

// ── GET /users/{student_id}/enrollments ──────────────────────────────────────

pub async fn get_student_enrollments(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<RecordResponse>>, GradesServiceError> {
    let (sort, page) = parse_list_query(raw_query.as_deref())?;
    let usecase = ListByStudentUseCase {
        gateway: state.gateway(),
    };
    let records = usecase
        .execute(&actor(identity), student_id, sort, page)
        .await?;
    Ok(Json(records.into_iter().map(record_response).collect()))
}
