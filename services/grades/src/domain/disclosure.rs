//! Grade/feedback reveal protocol.
//!
//! The state of an enrollment is never stored; it is derived from the grade
//! and the feedback row. Transitions return the next state or the error that
//! blocks them, so every caller goes through the same rules.

use gradebook_domain::grade::Grade;

use crate::domain::types::Feedback;
use crate::error::GradesServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisclosureState {
    NoGrade,
    GradedNoFeedback,
    TeacherFeedbackGiven,
    FullyDisclosed,
}

impl DisclosureState {
    pub fn derive(grade: Option<Grade>, feedback: Option<&Feedback>) -> Self {
        if grade.is_none() {
            return Self::NoGrade;
        }
        match feedback {
            Some(fb) if fb.teacher_feedback.is_some() && fb.student_feedback.is_some() => {
                Self::FullyDisclosed
            }
            Some(fb) if fb.teacher_feedback.is_some() => Self::TeacherFeedbackGiven,
            _ => Self::GradedNoFeedback,
        }
    }

    /// State after the teacher writes feedback. Rewrites are content updates.
    pub fn on_teacher_feedback(self) -> Result<Self, GradesServiceError> {
        match self {
            Self::NoGrade => Err(GradesServiceError::GradeNotAssigned),
            Self::GradedNoFeedback => Ok(Self::TeacherFeedbackGiven),
            Self::TeacherFeedbackGiven | Self::FullyDisclosed => Ok(self),
        }
    }

    /// State after the student writes feedback. Rewrites are content updates.
    pub fn on_student_feedback(self) -> Result<Self, GradesServiceError> {
        match self {
            Self::NoGrade | Self::GradedNoFeedback => Err(GradesServiceError::FeedbackNotFound),
            Self::TeacherFeedbackGiven | Self::FullyDisclosed => Ok(Self::FullyDisclosed),
        }
    }

    pub fn is_fully_disclosed(self) -> bool {
        self == Self::FullyDisclosed
    }

    /// Teacher feedback exists and the student has not answered yet.
    pub fn awaits_student_feedback(self) -> bool {
        self == Self::TeacherFeedbackGiven
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoGrade => "no_grade",
            Self::GradedNoFeedback => "graded_no_feedback",
            Self::TeacherFeedbackGiven => "teacher_feedback_given",
            Self::FullyDisclosed => "fully_disclosed",
        }
    }
}
