use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use gradebook_domain::grade::GradeOutOfRange;

/// Grades service error variants.
///
/// Everything except `Internal` is an expected business-rule outcome.
#[derive(Debug, thiserror::Error)]
pub enum GradesServiceError {
    #[error("action not permitted for this role")]
    RoleViolation,
    #[error("actor does not own this resource")]
    OwnershipViolation,
    #[error("user has the wrong role for this operation")]
    RoleMismatch,
    #[error("student is already enrolled in this course")]
    DuplicateEnrollment,
    #[error("course already exists")]
    DuplicateCourse,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("enrollment not found")]
    EnrollmentNotFound,
    #[error("course not found")]
    CourseNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("grade not assigned")]
    GradeNotAssigned,
    #[error("feedback not found")]
    FeedbackNotFound,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("resource was modified concurrently")]
    ConcurrentModification,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl GradesServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RoleViolation => "ROLE_VIOLATION",
            Self::OwnershipViolation => "OWNERSHIP_VIOLATION",
            Self::RoleMismatch => "ROLE_MISMATCH",
            Self::DuplicateEnrollment => "DUPLICATE_ENROLLMENT",
            Self::DuplicateCourse => "DUPLICATE_COURSE",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::EnrollmentNotFound => "ENROLLMENT_NOT_FOUND",
            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::GradeNotAssigned => "GRADE_NOT_ASSIGNED",
            Self::FeedbackNotFound => "FEEDBACK_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Full cause chain of an `Internal` error, outermost context first.
    pub fn error_chain(&self) -> Option<String> {
        match self {
            Self::Internal(e) => Some(format!("{e:#}")),
            _ => None,
        }
    }
}

impl From<GradeOutOfRange> for GradesServiceError {
    fn from(err: GradeOutOfRange) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for GradesServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::RoleViolation | Self::OwnershipViolation => StatusCode::FORBIDDEN,
            Self::EnrollmentNotFound
            | Self::CourseNotFound
            | Self::UserNotFound
            | Self::FeedbackNotFound => StatusCode::NOT_FOUND,
            Self::DuplicateEnrollment
            | Self::DuplicateCourse
            | Self::UserAlreadyExists
            | Self::ConcurrentModification => StatusCode::CONFLICT,
            Self::GradeNotAssigned | Self::RoleMismatch => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected outcomes and already traced by TraceLayer.
        if let Some(chain) = self.error_chain() {
            tracing::error!(error = %chain, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
