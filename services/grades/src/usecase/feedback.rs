use chrono::Utc;
use uuid::Uuid;

use crate::domain::disclosure::DisclosureState;
use crate::domain::guard::{self, Action, Record, Resource};
use crate::domain::repository::{FeedbackStore, PersistenceGateway, UnitOfWork as _};
use crate::domain::types::{Actor, Feedback, validate_feedback_text};
use crate::domain::visibility::{self, VisibleRecord};
use crate::error::GradesServiceError;
use crate::usecase::{ensure_version, require_course, require_enrollment};

pub struct FeedbackInput {
    pub student_id: Uuid,
    pub course_code: String,
    pub text: String,
    /// Feedback version the caller last saw.
    pub expected_version: Option<i32>,
}

fn validate_text(text: &str) -> Result<(), GradesServiceError> {
    if validate_feedback_text(text) {
        Ok(())
    } else {
        Err(GradesServiceError::validation(
            "feedback must be non-blank and at most 4000 characters",
        ))
    }
}

// ── GiveTeacherFeedback ──────────────────────────────────────────────────────

pub struct GiveTeacherFeedbackUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> GiveTeacherFeedbackUseCase<G> {
    /// Creates the feedback record on first write; later writes replace the
    /// teacher text in place and keep the original author.
    pub async fn execute(
        &self,
        actor: &Actor,
        input: FeedbackInput,
    ) -> Result<VisibleRecord, GradesServiceError> {
        validate_text(&input.text)?;

        let work = self.gateway.begin().await?;
        let course = require_course(&work, &input.course_code).await?;
        guard::require(
            actor,
            Action::WriteTeacherFeedback,
            &Resource::Record(Record::unloaded(&course, input.student_id)),
        )?;

        let enrollment = require_enrollment(&work, input.student_id, &input.course_code).await?;
        let existing = work.find_feedback(enrollment.id).await?;
        guard::require(
            actor,
            Action::WriteTeacherFeedback,
            &Resource::Record(Record::loaded(&course, &enrollment, existing.as_ref())),
        )?;

        let from = DisclosureState::derive(enrollment.grade, existing.as_ref());
        let to = from.on_teacher_feedback()?;

        let now = Utc::now();
        let feedback = match existing {
            Some(mut fb) => {
                ensure_version(input.expected_version, fb.version)?;
                fb.teacher_feedback = Some(input.text);
                fb.version += 1;
                fb.updated_at = now;
                work.update_feedback(&fb).await?;
                fb
            }
            None => {
                if input.expected_version.is_some() {
                    return Err(GradesServiceError::ConcurrentModification);
                }
                let fb = Feedback {
                    enrollment_id: enrollment.id,
                    teacher_feedback: Some(input.text),
                    teacher_author_id: actor.id,
                    student_feedback: None,
                    version: 0,
                    created_at: now,
                    updated_at: now,
                };
                work.insert_feedback(&fb).await?;
                fb
            }
        };
        work.commit().await?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            actor_id = %actor.id,
            from = from.as_str(),
            to = to.as_str(),
            "teacher feedback written"
        );
        visibility::view(actor, &course, &enrollment, Some(&feedback))
    }
}

// ── SubmitStudentFeedback ────────────────────────────────────────────────────

pub struct SubmitStudentFeedbackUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> SubmitStudentFeedbackUseCase<G> {
    /// Resubmitting replaces the text in place and advances `updated_at`.
    pub async fn execute(
        &self,
        actor: &Actor,
        input: FeedbackInput,
    ) -> Result<VisibleRecord, GradesServiceError> {
        validate_text(&input.text)?;

        let work = self.gateway.begin().await?;
        let course = require_course(&work, &input.course_code).await?;
        guard::require(
            actor,
            Action::WriteStudentFeedback,
            &Resource::Record(Record::unloaded(&course, input.student_id)),
        )?;

        let enrollment = require_enrollment(&work, input.student_id, &input.course_code).await?;
        let existing = work.find_feedback(enrollment.id).await?;
        guard::require(
            actor,
            Action::WriteStudentFeedback,
            &Resource::Record(Record::loaded(&course, &enrollment, existing.as_ref())),
        )?;

        let from = DisclosureState::derive(enrollment.grade, existing.as_ref());
        let to = from.on_student_feedback()?;
        let mut feedback = existing.ok_or(GradesServiceError::FeedbackNotFound)?;
        ensure_version(input.expected_version, feedback.version)?;

        feedback.student_feedback = Some(input.text);
        feedback.version += 1;
        feedback.updated_at = Utc::now();
        work.update_feedback(&feedback).await?;
        work.commit().await?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            from = from.as_str(),
            to = to.as_str(),
            "student feedback submitted"
        );
        visibility::view(actor, &course, &enrollment, Some(&feedback))
    }
}

// ── DeleteFeedback ───────────────────────────────────────────────────────────

pub struct DeleteFeedbackUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> DeleteFeedbackUseCase<G> {
    /// The grade is untouched, so the record falls back to graded-no-feedback.
    pub async fn execute(
        &self,
        actor: &Actor,
        student_id: Uuid,
        course_code: &str,
    ) -> Result<(), GradesServiceError> {
        let work = self.gateway.begin().await?;
        let course = require_course(&work, course_code).await?;
        guard::require(
            actor,
            Action::DeleteFeedback,
            &Resource::Record(Record::unloaded(&course, student_id)),
        )?;

        let enrollment = require_enrollment(&work, student_id, course_code).await?;
        let existing = work.find_feedback(enrollment.id).await?;
        guard::require(
            actor,
            Action::DeleteFeedback,
            &Resource::Record(Record::loaded(&course, &enrollment, existing.as_ref())),
        )?;

        if !work.delete_feedback(enrollment.id).await? {
            return Err(GradesServiceError::FeedbackNotFound);
        }
        work.commit().await?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            actor_id = %actor.id,
            "feedback deleted"
        );
        Ok(())
    }
}
