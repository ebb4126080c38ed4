//! Read-side filtering of an enrollment record by viewer.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use gradebook_domain::grade::Grade;
use gradebook_domain::user::UserRole;

use crate::domain::disclosure::DisclosureState;
use crate::domain::guard::{self, Action, Record, Resource};
use crate::domain::types::{Actor, Course, Enrollment, Feedback};
use crate::error::GradesServiceError;

/// A field the viewer may or may not be allowed to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disclosure<T> {
    Visible(T),
    Hidden,
}

impl<T> Disclosure<T> {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub fn visible(self) -> Option<T> {
        match self {
            Self::Visible(v) => Some(v),
            Self::Hidden => None,
        }
    }

    pub fn as_ref(&self) -> Disclosure<&T> {
        match self {
            Self::Visible(v) => Disclosure::Visible(v),
            Self::Hidden => Disclosure::Hidden,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Disclosure<U> {
        match self {
            Self::Visible(v) => Disclosure::Visible(f(v)),
            Self::Hidden => Disclosure::Hidden,
        }
    }

    fn when(visible: bool, value: T) -> Self {
        if visible {
            Self::Visible(value)
        } else {
            Self::Hidden
        }
    }
}

/// An enrollment record as one viewer is allowed to see it.
#[derive(Debug, Clone)]
pub struct VisibleRecord {
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    pub course_code: String,
    pub grade: Disclosure<Option<Grade>>,
    pub teacher_feedback: Disclosure<Option<String>>,
    /// Always visible: the student wrote it, staff may read it.
    pub student_feedback: Option<String>,
    pub state: Disclosure<DisclosureState>,
    pub awaiting_student_feedback: bool,
    pub enrollment_version: Disclosure<i32>,
    pub feedback_version: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Disclosure<DateTime<Utc>>,
}

/// Builds the viewer's projection of one enrollment.
///
/// Admins and the owning teacher see everything. The enrolled student sees
/// their own feedback and whether it is awaited; the grade, the teacher's
/// feedback and the disclosure state stay hidden until the record is fully
/// disclosed. Enrollment bookkeeping that would reveal a grade change is
/// hidden along with the grade.
pub fn view(
    viewer: &Actor,
    course: &Course,
    enrollment: &Enrollment,
    feedback: Option<&Feedback>,
) -> Result<VisibleRecord, GradesServiceError> {
    guard::require(
        viewer,
        Action::ReadRecord,
        &Resource::Record(Record::loaded(course, enrollment, feedback)),
    )?;

    let state = DisclosureState::derive(enrollment.grade, feedback);
    let full = viewer.role != UserRole::Student || state.is_fully_disclosed();

    Ok(VisibleRecord {
        enrollment_id: enrollment.id,
        student_id: enrollment.student_id,
        course_code: enrollment.course_code.clone(),
        grade: Disclosure::when(full, enrollment.grade),
        teacher_feedback: Disclosure::when(
            full,
            feedback.and_then(|fb| fb.teacher_feedback.clone()),
        ),
        student_feedback: feedback.and_then(|fb| fb.student_feedback.clone()),
        state: Disclosure::when(full, state),
        awaiting_student_feedback: state.awaits_student_feedback(),
        enrollment_version: Disclosure::when(full, enrollment.version),
        feedback_version: feedback.map(|fb| fb.version),
        created_at: enrollment.created_at,
        updated_at: Disclosure::when(full, enrollment.updated_at),
    })
}
