use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gradebook_auth_types::identity::IdentityHeaders;

use crate::domain::types::Course;
use crate::error::GradesServiceError;
use crate::handlers::{RecordResponse, actor, parse_list_query, record_response};
use crate::state::AppState;
use crate::usecase::directory::{
    AssignTeacherUseCase, CreateCourseInput, CreateCourseUseCase, GetCourseUseCase,
    ListOwnedCoursesUseCase,
};
use crate::usecase::view::ListByCourseUseCase;

#[derive(Serialize)]
pub struct CourseResponse {
    pub code: String,
    pub title: String,
    pub teacher_id: Option<String>,
    #[serde(serialize_with = "gradebook_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "gradebook_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

fn course_response(course: Course) -> CourseResponse {
    CourseResponse {
        code: course.code,
        title: course.title,
        teacher_id: course.teacher_id.map(|id| id.to_string()),
        created_at: course.created_at,
        updated_at: course.updated_at,
    }
}

// ── POST /courses ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub teacher_id: Option<Uuid>,
}

pub async fn create_course(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), GradesServiceError> {
    let usecase = CreateCourseUseCase {
        gateway: state.gateway(),
    };
    let course = usecase
        .execute(
            &actor(identity),
            CreateCourseInput {
                code: body.code,
                title: body.title,
                teacher_id: body.teacher_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(course_response(course))))
}

// ── PUT /courses/{code}/teacher ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AssignTeacherRequest {
    pub teacher_id: Option<Uuid>,
}

pub async fn assign_teacher(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<AssignTeacherRequest>,
) -> Result<StatusCode, GradesServiceError> {
    let usecase = AssignTeacherUseCase {
        gateway: state.gateway(),
    };
    usecase
        .execute(&actor(identity), &code, body.teacher_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /courses/{code} ──────────────────────────────────────────────────────

pub async fn get_course(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CourseResponse>, GradesServiceError> {
    let usecase = GetCourseUseCase {
        gateway: state.gateway(),
    };
    let course = usecase.execute(&actor(identity), &code).await?;
    Ok(Json(course_response(course)))
}

// ── GET /users/@me/courses ───────────────────────────────────────────────────

pub async fn get_my_courses(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, GradesServiceError> {
    let usecase = ListOwnedCoursesUseCase {
        gateway: state.gateway(),
    };
    let courses = usecase.execute(&actor(identity)).await?;
    Ok(Json(courses.into_iter().map(course_response).collect()))
}

// ── GET /courses/{code}/enrollments ──────────────────────────────────────────

pub async fn get_course_enrollments(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(code): Path<String>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<RecordResponse>>, GradesServiceError> {
    let (sort, page) = parse_list_query(raw_query.as_deref())?;
    let usecase = ListByCourseUseCase {
        gateway: state.gateway(),
    };
    let records = usecase
        .execute(&actor(identity), &code, sort, page)
        .await?;
    Ok(Json(records.into_iter().map(record_response).collect()))
}
