use chrono::Utc;
use uuid::Uuid;

use gradebook_domain::user::UserRole;

use crate::domain::guard::{self, Action, Resource};
use crate::domain::repository::{
    EnrollmentStore, FeedbackStore, PersistenceGateway, UnitOfWork as _, UserDirectory,
};
use crate::domain::types::{Actor, Enrollment};
use crate::error::GradesServiceError;
use crate::usecase::{require_course, require_enrollment};

// ── Enroll ───────────────────────────────────────────────────────────────────

pub struct EnrollUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> EnrollUseCase<G> {
    pub async fn execute(
        &self,
        actor: &Actor,
        student_id: Uuid,
        course_code: &str,
    ) -> Result<Enrollment, GradesServiceError> {
        guard::require(actor, Action::Enroll, &Resource::Directory)?;

        let work = self.gateway.begin().await?;
        require_course(&work, course_code).await?;

        let student = work
            .find_user(student_id)
            .await?
            .ok_or(GradesServiceError::UserNotFound)?;
        if student.role != UserRole::Student {
            return Err(GradesServiceError::RoleMismatch);
        }

        if work
            .find_enrollment_for_update(student_id, course_code)
            .await?
            .is_some()
        {
            return Err(GradesServiceError::DuplicateEnrollment);
        }

        let now = Utc::now();
        let enrollment = Enrollment {
            id: Uuid::now_v7(),
            student_id,
            course_code: course_code.to_owned(),
            grade: None,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        // A concurrent insert for the same pair surfaces here as DuplicateEnrollment.
        work.insert_enrollment(&enrollment).await?;
        work.commit().await?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            %student_id,
            course_code,
            "enrollment created"
        );
        Ok(enrollment)
    }
}

// ── Unenroll ─────────────────────────────────────────────────────────────────

pub struct UnenrollUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> UnenrollUseCase<G> {
    pub async fn execute(
        &self,
        actor: &Actor,
        student_id: Uuid,
        course_code: &str,
    ) -> Result<(), GradesServiceError> {
        guard::require(actor, Action::Unenroll, &Resource::Directory)?;

        let work = self.gateway.begin().await?;
        let enrollment = require_enrollment(&work, student_id, course_code).await?;

        work.delete_feedback(enrollment.id).await?;
        if !work.delete_enrollment(enrollment.id).await? {
            return Err(GradesServiceError::EnrollmentNotFound);
        }
        work.commit().await?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            %student_id,
            course_code,
            "enrollment removed"
        );
        Ok(())
    }
}
