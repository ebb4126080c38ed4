use chrono::Utc;
use uuid::Uuid;

use gradebook_domain::grade::Grade;

use crate::domain::guard::{self, Action, Record, Resource};
use crate::domain::repository::{EnrollmentStore, PersistenceGateway, UnitOfWork as _};
use crate::domain::types::{Actor, Enrollment};
use crate::error::GradesServiceError;
use crate::usecase::{ensure_version, require_course, require_enrollment};

pub struct SetGradeInput {
    pub student_id: Uuid,
    pub course_code: String,
    pub grade: i64,
    /// Enrollment version the caller last saw.
    pub expected_version: Option<i32>,
}

pub struct SetGradeUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> SetGradeUseCase<G> {
    /// Overwrites the grade. Existing feedback is left as is.
    pub async fn execute(
        &self,
        actor: &Actor,
        input: SetGradeInput,
    ) -> Result<Enrollment, GradesServiceError> {
        let grade = Grade::new(input.grade)?;

        let work = self.gateway.begin().await?;
        let course = require_course(&work, &input.course_code).await?;
        guard::require(
            actor,
            Action::SetGrade,
            &Resource::Record(Record::unloaded(&course, input.student_id)),
        )?;

        let mut enrollment =
            require_enrollment(&work, input.student_id, &input.course_code).await?;
        ensure_version(input.expected_version, enrollment.version)?;

        let previous = enrollment.grade;
        enrollment.grade = Some(grade);
        enrollment.version += 1;
        enrollment.updated_at = Utc::now();
        work.update_grade(&enrollment).await?;
        work.commit().await?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            actor_id = %actor.id,
            grade = grade.value(),
            previous = ?previous.map(Grade::value),
            "grade set"
        );
        Ok(enrollment)
    }
}
