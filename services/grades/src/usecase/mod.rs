pub mod directory;
pub mod enrollment;
pub mod feedback;
pub mod grade;
pub mod view;

use crate::domain::repository::{CourseCatalog, EnrollmentStore};
use crate::domain::types::{Course, Enrollment};
use crate::error::GradesServiceError;

/// Optimistic concurrency check. `None` means last write wins.
pub(crate) fn ensure_version(expected: Option<i32>, actual: i32) -> Result<(), GradesServiceError> {
    match expected {
        Some(v) if v != actual => Err(GradesServiceError::ConcurrentModification),
        _ => Ok(()),
    }
}

pub(crate) async fn require_course<W: CourseCatalog>(
    work: &W,
    code: &str,
) -> Result<Course, GradesServiceError> {
    work.find_course(code)
        .await?
        .ok_or(GradesServiceError::CourseNotFound)
}

/// Read-only lookup for query use cases.
pub(crate) async fn read_enrollment<W: EnrollmentStore>(
    work: &W,
    student_id: uuid::Uuid,
    course_code: &str,
) -> Result<Enrollment, GradesServiceError> {
    work.find_enrollment(student_id, course_code)
        .await?
        .ok_or(GradesServiceError::EnrollmentNotFound)
}

/// Locks the enrollment row until the unit of work ends.
pub(crate) async fn require_enrollment<W: EnrollmentStore>(
    work: &W,
    student_id: uuid::Uuid,
    course_code: &str,
) -> Result<Enrollment, GradesServiceError> {
    work.find_enrollment_for_update(student_id, course_code)
        .await?
        .ok_or(GradesServiceError::EnrollmentNotFound)
}
