use std::collections::HashMap;

use uuid::Uuid;

use gradebook_domain::pagination::{PageRequest, Sort};

use crate::domain::guard::{self, Action, Record, Resource};
use crate::domain::repository::{CourseCatalog, EnrollmentStore, FeedbackStore, PersistenceGateway};
use crate::domain::types::{Actor, Course, Enrollment, Feedback};
use crate::domain::visibility::{self, VisibleRecord};
use crate::error::GradesServiceError;
use crate::usecase::{read_enrollment, require_course};

async fn feedback_by_enrollment<W: FeedbackStore>(
    work: &W,
    enrollments: &[Enrollment],
) -> Result<HashMap<Uuid, Feedback>, GradesServiceError> {
    let ids: Vec<Uuid> = enrollments.iter().map(|e| e.id).collect();
    let feedbacks = work.find_feedbacks(&ids).await?;
    Ok(feedbacks
        .into_iter()
        .map(|fb| (fb.enrollment_id, fb))
        .collect())
}

// ── ViewRecord ───────────────────────────────────────────────────────────────

pub struct ViewRecordUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> ViewRecordUseCase<G> {
    pub async fn execute(
        &self,
        actor: &Actor,
        student_id: Uuid,
        course_code: &str,
    ) -> Result<VisibleRecord, GradesServiceError> {
        let work = self.gateway.begin().await?;
        let course = require_course(&work, course_code).await?;
        guard::require(
            actor,
            Action::ReadRecord,
            &Resource::Record(Record::unloaded(&course, student_id)),
        )?;

        let enrollment = read_enrollment(&work, student_id, course_code).await?;
        let feedback = work.find_feedback(enrollment.id).await?;
        visibility::view(actor, &course, &enrollment, feedback.as_ref())
    }
}

// ── ListByCourse ─────────────────────────────────────────────────────────────

pub struct ListByCourseUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> ListByCourseUseCase<G> {
    pub async fn execute(
        &self,
        actor: &Actor,
        course_code: &str,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<VisibleRecord>, GradesServiceError> {
        let work = self.gateway.begin().await?;
        let course = require_course(&work, course_code).await?;
        guard::require(actor, Action::ReadCourse, &Resource::Course(&course))?;

        let enrollments = work
            .list_enrollments_by_course(course_code, sort, page)
            .await?;
        let feedbacks = feedback_by_enrollment(&work, &enrollments).await?;

        enrollments
            .iter()
            .map(|e| visibility::view(actor, &course, e, feedbacks.get(&e.id)))
            .collect()
    }
}

// ── ListByStudent ────────────────────────────────────────────────────────────

pub struct ListByStudentUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> ListByStudentUseCase<G> {
    pub async fn execute(
        &self,
        actor: &Actor,
        student_id: Uuid,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<VisibleRecord>, GradesServiceError> {
        guard::require(
            actor,
            Action::ListStudentRecords,
            &Resource::Student(student_id),
        )?;

        let work = self.gateway.begin().await?;
        let enrollments = work
            .list_enrollments_by_student(student_id, sort, page)
            .await?;

        let codes: Vec<String> = enrollments.iter().map(|e| e.course_code.clone()).collect();
        let courses: HashMap<String, Course> = work
            .find_courses(&codes)
            .await?
            .into_iter()
            .map(|c| (c.code.clone(), c))
            .collect();
        let feedbacks = feedback_by_enrollment(&work, &enrollments).await?;

        enrollments
            .iter()
            .map(|e| {
                let course = courses
                    .get(&e.course_code)
                    .ok_or(GradesServiceError::CourseNotFound)?;
                visibility::view(actor, course, e, feedbacks.get(&e.id))
            })
            .collect()
    }
}
