//! Role and ownership authorization.
//!
//! `authorize` is a pure function of the actor and the rows the caller has
//! already read inside its unit of work. Use cases call it once before the
//! enrollment row is read (role and ownership only) and again after the row
//! is locked (grade and feedback preconditions).

use uuid::Uuid;

use gradebook_domain::user::UserRole;

use crate::domain::types::{Actor, Course, Enrollment, Feedback};
use crate::error::GradesServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create users and courses, assign course teachers.
    ManageDirectory,
    ReadCourse,
    Enroll,
    Unenroll,
    ReadRecord,
    ListStudentRecords,
    SetGrade,
    WriteTeacherFeedback,
    DeleteFeedback,
    WriteStudentFeedback,
}

/// A student's record in a course, as far as it has been read.
///
/// `enrollment` is `None` until the row has been loaded; grade and feedback
/// preconditions are only evaluated once it is present.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub course: &'a Course,
    pub student_id: Uuid,
    pub enrollment: Option<&'a Enrollment>,
    pub feedback: Option<&'a Feedback>,
}

impl<'a> Record<'a> {
    pub fn unloaded(course: &'a Course, student_id: Uuid) -> Self {
        Self {
            course,
            student_id,
            enrollment: None,
            feedback: None,
        }
    }

    pub fn loaded(
        course: &'a Course,
        enrollment: &'a Enrollment,
        feedback: Option<&'a Feedback>,
    ) -> Self {
        Self {
            course,
            student_id: enrollment.student_id,
            enrollment: Some(enrollment),
            feedback,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Directory,
    Course(&'a Course),
    /// Every record belonging to one student.
    Student(Uuid),
    Record(Record<'a>),
}

impl<'a> Resource<'a> {
    fn course(&self) -> Option<&'a Course> {
        match *self {
            Self::Course(course) => Some(course),
            Self::Record(record) => Some(record.course),
            Self::Directory | Self::Student(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    RoleViolation,
    OwnershipViolation,
    GradeNotAssigned,
    FeedbackNotFound,
}

impl From<DenyReason> for GradesServiceError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::RoleViolation => Self::RoleViolation,
            DenyReason::OwnershipViolation => Self::OwnershipViolation,
            DenyReason::GradeNotAssigned => Self::GradeNotAssigned,
            DenyReason::FeedbackNotFound => Self::FeedbackNotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn into_result(self) -> Result<(), GradesServiceError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(reason.into()),
        }
    }
}

pub fn authorize(actor: &Actor, action: Action, resource: &Resource<'_>) -> Decision {
    let decision = match actor.role {
        UserRole::Admin => admin(action),
        UserRole::Teacher => teacher(actor, action, resource),
        UserRole::Student => student(actor, action, resource),
    };
    if let Decision::Deny(reason) = decision {
        tracing::debug!(
            actor_id = %actor.id,
            role = ?actor.role,
            ?action,
            ?reason,
            "authorization denied"
        );
    }
    decision
}

/// `authorize`, as a `Result` for `?`.
pub fn require(
    actor: &Actor,
    action: Action,
    resource: &Resource<'_>,
) -> Result<(), GradesServiceError> {
    authorize(actor, action, resource).into_result()
}

fn admin(action: Action) -> Decision {
    match action {
        // Student feedback is the student's own voice.
        Action::WriteStudentFeedback => Decision::Deny(DenyReason::RoleViolation),
        _ => Decision::Allow,
    }
}

fn teacher(actor: &Actor, action: Action, resource: &Resource<'_>) -> Decision {
    match action {
        Action::ManageDirectory
        | Action::Enroll
        | Action::Unenroll
        | Action::ListStudentRecords
        | Action::WriteStudentFeedback => return Decision::Deny(DenyReason::RoleViolation),
        Action::ReadCourse
        | Action::ReadRecord
        | Action::SetGrade
        | Action::WriteTeacherFeedback
        | Action::DeleteFeedback => {}
    }

    let Some(course) = resource.course() else {
        return Decision::Deny(DenyReason::RoleViolation);
    };
    if !course.is_owned_by(actor.id) {
        return Decision::Deny(DenyReason::OwnershipViolation);
    }

    let Resource::Record(record) = resource else {
        return Decision::Allow;
    };
    let Some(enrollment) = record.enrollment else {
        return Decision::Allow;
    };

    match action {
        Action::WriteTeacherFeedback => {
            if enrollment.grade.is_none() {
                return Decision::Deny(DenyReason::GradeNotAssigned);
            }
            match record.feedback {
                Some(fb) if fb.teacher_author_id != actor.id => {
                    Decision::Deny(DenyReason::OwnershipViolation)
                }
                _ => Decision::Allow,
            }
        }
        Action::DeleteFeedback => match record.feedback {
            None => Decision::Deny(DenyReason::FeedbackNotFound),
            Some(fb) if fb.teacher_author_id != actor.id => {
                Decision::Deny(DenyReason::OwnershipViolation)
            }
            Some(_) => Decision::Allow,
        },
        _ => Decision::Allow,
    }
}

fn student(actor: &Actor, action: Action, resource: &Resource<'_>) -> Decision {
    match (action, resource) {
        (Action::ListStudentRecords, Resource::Student(student_id)) if *student_id == actor.id => {
            Decision::Allow
        }
        (Action::ReadRecord, Resource::Record(record)) if record.student_id == actor.id => {
            Decision::Allow
        }
        (Action::WriteStudentFeedback, Resource::Record(record))
            if record.student_id == actor.id =>
        {
            if record.enrollment.is_none() {
                return Decision::Allow;
            }
            match record.feedback {
                Some(fb) if fb.has_teacher_feedback() => Decision::Allow,
                _ => Decision::Deny(DenyReason::FeedbackNotFound),
            }
        }
        _ => Decision::Deny(DenyReason::RoleViolation),
    }
}
