pub mod course;
pub mod enrollment;
pub mod feedback;
pub mod health;
pub mod user;

use serde::{Deserialize, Serialize};

use gradebook_auth_types::identity::IdentityHeaders;
use gradebook_domain::pagination::{PageRequest, Sort};

use crate::domain::types::Actor;
use crate::domain::visibility::{Disclosure, VisibleRecord};
use crate::error::GradesServiceError;

fn actor(identity: IdentityHeaders) -> Actor {
    Actor::new(identity.user_id, identity.user_role)
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub sort_by: Option<String>,
}

/// Parse `per-page`, `page` and `sort-by` from a raw query string.
fn parse_list_query(raw_query: Option<&str>) -> Result<(Sort, PageRequest), GradesServiceError> {
    let query: ListQuery = raw_query
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| GradesServiceError::validation(format!("malformed query: {e}")))?
        .unwrap_or_default();

    let sort = match query.sort_by.as_deref() {
        None => Sort::default(),
        Some(s) => Sort::from_kebab_case(s)
            .ok_or_else(|| GradesServiceError::validation(format!("unknown sort-by: {s}")))?,
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    Ok((sort, page))
}

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldResponse<T> {
    Visible { value: T },
    Hidden,
}

impl<T> From<Disclosure<T>> for FieldResponse<T> {
    fn from(field: Disclosure<T>) -> Self {
        match field {
            Disclosure::Visible(value) => Self::Visible { value },
            Disclosure::Hidden => Self::Hidden,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub enrollment_id: String,
    pub student_id: String,
    pub course_code: String,
    pub grade: FieldResponse<Option<u8>>,
    pub teacher_feedback: FieldResponse<Option<String>>,
    pub student_feedback: Option<String>,
    pub state: FieldResponse<&'static str>,
    pub awaiting_student_feedback: bool,
    pub enrollment_version: FieldResponse<i32>,
    pub feedback_version: Option<i32>,
    #[serde(serialize_with = "gradebook_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: FieldResponse<String>,
}

fn record_response(record: VisibleRecord) -> RecordResponse {
    RecordResponse {
        enrollment_id: record.enrollment_id.to_string(),
        student_id: record.student_id.to_string(),
        course_code: record.course_code,
        grade: record.grade.map(|g| g.map(|g| g.value())).into(),
        teacher_feedback: record.teacher_feedback.into(),
        student_feedback: record.student_feedback,
        state: record.state.map(|s| s.as_str()).into(),
        awaiting_student_feedback: record.awaiting_student_feedback,
        enrollment_version: record.enrollment_version.into(),
        feedback_version: record.feedback_version,
        created_at: record.created_at,
        updated_at: record
            .updated_at
            .map(|at| gradebook_core::serde::rfc3339_ms(&at))
            .into(),
    }
}
