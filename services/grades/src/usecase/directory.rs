use chrono::Utc;
use uuid::Uuid;

use gradebook_domain::user::UserRole;

use crate::domain::guard::{self, Action, Resource};
use crate::domain::repository::{
    CourseCatalog, PersistenceGateway, UnitOfWork as _, UserDirectory,
};
use crate::domain::types::{Actor, Course, User, validate_course_code, validate_email};
use crate::error::GradesServiceError;
use crate::usecase::require_course;

/// The referenced user must exist and be a teacher.
async fn require_teacher<W: UserDirectory>(
    work: &W,
    teacher_id: Uuid,
) -> Result<(), GradesServiceError> {
    let teacher = work
        .find_user(teacher_id)
        .await?
        .ok_or(GradesServiceError::UserNotFound)?;
    if teacher.role != UserRole::Teacher {
        return Err(GradesServiceError::RoleMismatch);
    }
    Ok(())
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

pub struct CreateUserUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> CreateUserUseCase<G> {
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateUserInput,
    ) -> Result<User, GradesServiceError> {
        guard::require(actor, Action::ManageDirectory, &Resource::Directory)?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(GradesServiceError::validation("name must not be empty"));
        }
        if !validate_email(&input.email) {
            return Err(GradesServiceError::validation("malformed email"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            email: input.email,
            role: input.role,
            created_at: now,
            updated_at: now,
        };

        let work = self.gateway.begin().await?;
        work.create_user(&user).await?;
        work.commit().await?;

        tracing::info!(user_id = %user.id, role = ?user.role, "user created");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> GetUserUseCase<G> {
    pub async fn execute(&self, actor: &Actor) -> Result<User, GradesServiceError> {
        let work = self.gateway.begin().await?;
        work.find_user(actor.id)
            .await?
            .ok_or(GradesServiceError::UserNotFound)
    }
}

// ── CreateCourse ─────────────────────────────────────────────────────────────

pub struct CreateCourseInput {
    pub code: String,
    pub title: String,
    pub teacher_id: Option<Uuid>,
}

pub struct CreateCourseUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> CreateCourseUseCase<G> {
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateCourseInput,
    ) -> Result<Course, GradesServiceError> {
        guard::require(actor, Action::ManageDirectory, &Resource::Directory)?;

        if !validate_course_code(&input.code) {
            return Err(GradesServiceError::validation("malformed course code"));
        }
        let title = input.title.trim();
        if title.is_empty() {
            return Err(GradesServiceError::validation("title must not be empty"));
        }

        let work = self.gateway.begin().await?;
        if let Some(teacher_id) = input.teacher_id {
            require_teacher(&work, teacher_id).await?;
        }

        let now = Utc::now();
        let course = Course {
            code: input.code,
            title: title.to_owned(),
            teacher_id: input.teacher_id,
            created_at: now,
            updated_at: now,
        };
        work.create_course(&course).await?;
        work.commit().await?;

        tracing::info!(course_code = %course.code, teacher_id = ?course.teacher_id, "course created");
        Ok(course)
    }
}

// ── AssignTeacher ────────────────────────────────────────────────────────────

pub struct AssignTeacherUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> AssignTeacherUseCase<G> {
    /// `None` leaves the course unassigned.
    pub async fn execute(
        &self,
        actor: &Actor,
        course_code: &str,
        teacher_id: Option<Uuid>,
    ) -> Result<(), GradesServiceError> {
        guard::require(actor, Action::ManageDirectory, &Resource::Directory)?;

        let work = self.gateway.begin().await?;
        if let Some(teacher_id) = teacher_id {
            require_teacher(&work, teacher_id).await?;
        }
        if !work
            .assign_teacher(course_code, teacher_id, Utc::now())
            .await?
        {
            return Err(GradesServiceError::CourseNotFound);
        }
        work.commit().await?;

        tracing::info!(course_code, teacher_id = ?teacher_id, "course teacher assigned");
        Ok(())
    }
}

// ── GetCourse ────────────────────────────────────────────────────────────────

pub struct GetCourseUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> GetCourseUseCase<G> {
    pub async fn execute(
        &self,
        actor: &Actor,
        course_code: &str,
    ) -> Result<Course, GradesServiceError> {
        let work = self.gateway.begin().await?;
        let course = require_course(&work, course_code).await?;
        guard::require(actor, Action::ReadCourse, &Resource::Course(&course))?;
        Ok(course)
    }
}

// ── ListOwnedCourses ─────────────────────────────────────────────────────────

pub struct ListOwnedCoursesUseCase<G: PersistenceGateway> {
    pub gateway: G,
}

impl<G: PersistenceGateway> ListOwnedCoursesUseCase<G> {
    pub async fn execute(&self, actor: &Actor) -> Result<Vec<Course>, GradesServiceError> {
        if actor.role == UserRole::Student {
            return Err(GradesServiceError::RoleViolation);
        }
        let work = self.gateway.begin().await?;
        work.list_courses_by_teacher(actor.id).await
    }
}
