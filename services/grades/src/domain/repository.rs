#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use gradebook_domain::pagination::{PageRequest, Sort};

use crate::domain::types::{Course, Enrollment, Feedback, User};
use crate::error::GradesServiceError;

/// Role-by-id lookups and admin user creation.
pub trait UserDirectory {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, GradesServiceError>;

    /// Fails `UserAlreadyExists` when the id or email is taken.
    async fn create_user(&self, user: &User) -> Result<(), GradesServiceError>;
}

/// Owner-by-course lookups and course administration.
pub trait CourseCatalog {
    async fn find_course(&self, code: &str) -> Result<Option<Course>, GradesServiceError>;

    async fn find_courses(&self, codes: &[String]) -> Result<Vec<Course>, GradesServiceError>;

    /// Fails `DuplicateCourse` when the code is taken.
    async fn create_course(&self, course: &Course) -> Result<(), GradesServiceError>;

    /// Replace the owning teacher. Returns `false` if the course does not exist.
    async fn assign_teacher(
        &self,
        code: &str,
        teacher_id: Option<Uuid>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, GradesServiceError>;

    async fn list_courses_by_teacher(
        &self,
        teacher_id: Uuid,
    ) -> Result<Vec<Course>, GradesServiceError>;
}

/// The (student, course) relation and the grade it carries.
pub trait EnrollmentStore {
    /// Plain read for query paths; takes no row lock.
    async fn find_enrollment(
        &self,
        student_id: Uuid,
        course_code: &str,
    ) -> Result<Option<Enrollment>, GradesServiceError>;

    /// Find the enrollment for a pair, locking the row until the unit of work ends.
    async fn find_enrollment_for_update(
        &self,
        student_id: Uuid,
        course_code: &str,
    ) -> Result<Option<Enrollment>, GradesServiceError>;

    /// Fails `DuplicateEnrollment` when the pair already exists.
    async fn insert_enrollment(&self, enrollment: &Enrollment) -> Result<(), GradesServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete_enrollment(&self, id: Uuid) -> Result<bool, GradesServiceError>;

    /// Persist `grade`, `version` and `updated_at` of an existing enrollment.
    async fn update_grade(&self, enrollment: &Enrollment) -> Result<(), GradesServiceError>;

    async fn list_enrollments_by_course(
        &self,
        course_code: &str,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, GradesServiceError>;

    async fn list_enrollments_by_student(
        &self,
        student_id: Uuid,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, GradesServiceError>;
}

/// Teacher and student feedback, one record per enrollment.
pub trait FeedbackStore {
    async fn find_feedback(
        &self,
        enrollment_id: Uuid,
    ) -> Result<Option<Feedback>, GradesServiceError>;

    async fn find_feedbacks(
        &self,
        enrollment_ids: &[Uuid],
    ) -> Result<Vec<Feedback>, GradesServiceError>;

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), GradesServiceError>;

    /// Persist texts, `version` and `updated_at` of an existing record.
    async fn update_feedback(&self, feedback: &Feedback) -> Result<(), GradesServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete_feedback(&self, enrollment_id: Uuid) -> Result<bool, GradesServiceError>;
}

/// One transaction scoping every read and write of a single operation.
///
/// Dropping a unit of work without calling `commit` rolls it back.
pub trait UnitOfWork: UserDirectory + CourseCatalog + EnrollmentStore + FeedbackStore {
    async fn commit(self) -> Result<(), GradesServiceError>;
}

/// Opens units of work.
pub trait PersistenceGateway: Send + Sync {
    type Work: UnitOfWork;

    async fn begin(&self) -> Result<Self::Work, GradesServiceError>;
}
