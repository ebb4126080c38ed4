use chrono::{DateTime, Utc};
use uuid::Uuid;

use gradebook_domain::grade::Grade;
use gradebook_domain::user::UserRole;

/// Maximum length of a course code.
pub const MAX_COURSE_CODE_LEN: usize = 16;
/// Maximum length of a feedback text, in characters.
pub const MAX_FEEDBACK_LEN: usize = 4000;

/// Authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }
}

/// Identity known to the grades service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course and its (optional) owning teacher.
#[derive(Debug, Clone)]
pub struct Course {
    pub code: String,
    pub title: String,
    pub teacher_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.teacher_id == Some(user_id)
    }
}

/// One student's enrollment in one course.
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_code: String,
    pub grade: Option<Grade>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Teacher and student feedback attached to one enrollment.
#[derive(Debug, Clone)]
pub struct Feedback {
    pub enrollment_id: Uuid,
    pub teacher_feedback: Option<String>,
    /// Actor that first wrote `teacher_feedback`.
    pub teacher_author_id: Uuid,
    pub student_feedback: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feedback {
    pub fn has_teacher_feedback(&self) -> bool {
        self.teacher_feedback.is_some()
    }
}

/// Course code: 1-16 chars of ASCII alphanumerics or `-`, not starting with `-`.
pub fn validate_course_code(code: &str) -> bool {
    if code.is_empty() || code.len() > MAX_COURSE_CODE_LEN {
        return false;
    }
    if code.starts_with('-') {
        return false;
    }
    code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Feedback text must contain something other than whitespace and stay under the length cap.
pub fn validate_feedback_text(text: &str) -> bool {
    !text.trim().is_empty() && text.chars().count() <= MAX_FEEDBACK_LEN
}

pub fn validate_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && email.len() <= 254
        }
        None => false,
    }
}
