use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use gradebook_domain::grade::Grade;
use gradebook_domain::pagination::{PageRequest, Sort};
use gradebook_domain::user::UserRole;
use gradebook_grades_schema::{courses, enrollments, feedbacks, users};

use crate::domain::repository::{
    CourseCatalog, EnrollmentStore, FeedbackStore, PersistenceGateway, UnitOfWork, UserDirectory,
};
use crate::domain::types::{Course, Enrollment, Feedback, User};
use crate::error::GradesServiceError;

/// Map a unique-index violation to `conflict`, anything else to `Internal`.
fn insert_error(err: DbErr, conflict: GradesServiceError, what: &'static str) -> GradesServiceError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        conflict
    } else {
        GradesServiceError::Internal(anyhow::Error::new(err).context(what))
    }
}

// ── Gateway ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbGateway {
    pub db: DatabaseConnection,
}

impl PersistenceGateway for DbGateway {
    type Work = DbWork;

    async fn begin(&self) -> Result<DbWork, GradesServiceError> {
        let txn = self.db.begin().await.context("begin transaction")?;
        Ok(DbWork { txn })
    }
}

/// A database transaction. Dropped without `commit`, it rolls back.
pub struct DbWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork for DbWork {
    async fn commit(self) -> Result<(), GradesServiceError> {
        self.txn.commit().await.context("commit transaction")?;
        Ok(())
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

impl UserDirectory for DbWork {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, GradesServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.txn)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn create_user(&self, user: &User) -> Result<(), GradesServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            role: Set(i16::from(user.role.as_u8())),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.txn)
        .await
        .map_err(|e| insert_error(e, GradesServiceError::UserAlreadyExists, "create user"))?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    let role = u8::try_from(model.role)
        .ok()
        .and_then(UserRole::from_u8)
        .ok_or_else(|| anyhow!("user {} has unknown role {}", model.id, model.role))?;
    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Courses ──────────────────────────────────────────────────────────────────

impl CourseCatalog for DbWork {
    async fn find_course(&self, code: &str) -> Result<Option<Course>, GradesServiceError> {
        let model = courses::Entity::find_by_id(code.to_owned())
            .one(&self.txn)
            .await
            .context("find course by code")?;
        Ok(model.map(course_from_model))
    }

    async fn find_courses(&self, codes: &[String]) -> Result<Vec<Course>, GradesServiceError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        let models = courses::Entity::find()
            .filter(courses::Column::Code.is_in(codes.iter().cloned()))
            .all(&self.txn)
            .await
            .context("find courses by codes")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }

    async fn create_course(&self, course: &Course) -> Result<(), GradesServiceError> {
        courses::ActiveModel {
            code: Set(course.code.clone()),
            title: Set(course.title.clone()),
            teacher_id: Set(course.teacher_id),
            created_at: Set(course.created_at),
            updated_at: Set(course.updated_at),
        }
        .insert(&self.txn)
        .await
        .map_err(|e| insert_error(e, GradesServiceError::DuplicateCourse, "create course"))?;
        Ok(())
    }

    async fn assign_teacher(
        &self,
        code: &str,
        teacher_id: Option<Uuid>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, GradesServiceError> {
        let result = courses::Entity::update_many()
            .col_expr(courses::Column::TeacherId, Expr::value(teacher_id))
            .col_expr(courses::Column::UpdatedAt, Expr::value(updated_at))
            .filter(courses::Column::Code.eq(code))
            .exec(&self.txn)
            .await
            .context("assign course teacher")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_courses_by_teacher(
        &self,
        teacher_id: Uuid,
    ) -> Result<Vec<Course>, GradesServiceError> {
        let models = courses::Entity::find()
            .filter(courses::Column::TeacherId.eq(teacher_id))
            .order_by_asc(courses::Column::Code)
            .all(&self.txn)
            .await
            .context("list courses by teacher")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }
}

fn course_from_model(model: courses::Model) -> Course {
    Course {
        code: model.code,
        title: model.title,
        teacher_id: model.teacher_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Enrollments ──────────────────────────────────────────────────────────────

fn enrollment_pair(student_id: Uuid, course_code: &str) -> sea_orm::Select<enrollments::Entity> {
    enrollments::Entity::find()
        .filter(enrollments::Column::StudentId.eq(student_id))
        .filter(enrollments::Column::CourseCode.eq(course_code))
}

impl EnrollmentStore for DbWork {
    async fn find_enrollment(
        &self,
        student_id: Uuid,
        course_code: &str,
    ) -> Result<Option<Enrollment>, GradesServiceError> {
        let model = enrollment_pair(student_id, course_code)
            .one(&self.txn)
            .await
            .context("find enrollment")?;
        Ok(model.map(enrollment_from_model).transpose()?)
    }

    async fn find_enrollment_for_update(
        &self,
        student_id: Uuid,
        course_code: &str,
    ) -> Result<Option<Enrollment>, GradesServiceError> {
        let model = enrollment_pair(student_id, course_code)
            .lock_exclusive()
            .one(&self.txn)
            .await
            .context("find enrollment for update")?;
        Ok(model.map(enrollment_from_model).transpose()?)
    }

    async fn insert_enrollment(&self, enrollment: &Enrollment) -> Result<(), GradesServiceError> {
        enrollments::ActiveModel {
            id: Set(enrollment.id),
            student_id: Set(enrollment.student_id),
            course_code: Set(enrollment.course_code.clone()),
            grade: Set(enrollment.grade.map(grade_to_column)),
            version: Set(enrollment.version),
            created_at: Set(enrollment.created_at),
            updated_at: Set(enrollment.updated_at),
        }
        .insert(&self.txn)
        .await
        .map_err(|e| {
            insert_error(
                e,
                GradesServiceError::DuplicateEnrollment,
                "insert enrollment",
            )
        })?;
        Ok(())
    }

    async fn delete_enrollment(&self, id: Uuid) -> Result<bool, GradesServiceError> {
        let result = enrollments::Entity::delete_by_id(id)
            .exec(&self.txn)
            .await
            .context("delete enrollment")?;
        Ok(result.rows_affected > 0)
    }

    async fn update_grade(&self, enrollment: &Enrollment) -> Result<(), GradesServiceError> {
        enrollments::ActiveModel {
            id: Set(enrollment.id),
            grade: Set(enrollment.grade.map(grade_to_column)),
            version: Set(enrollment.version),
            updated_at: Set(enrollment.updated_at),
            ..Default::default()
        }
        .update(&self.txn)
        .await
        .context("update enrollment grade")?;
        Ok(())
    }

    async fn list_enrollments_by_course(
        &self,
        course_code: &str,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, GradesServiceError> {
        let query = enrollments::Entity::find()
            .filter(enrollments::Column::CourseCode.eq(course_code));
        let models = order_by_created(query, sort)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.txn)
            .await
            .context("list enrollments by course")?;
        Ok(models
            .into_iter()
            .map(enrollment_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn list_enrollments_by_student(
        &self,
        student_id: Uuid,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, GradesServiceError> {
        let query =
            enrollments::Entity::find().filter(enrollments::Column::StudentId.eq(student_id));
        let models = order_by_created(query, sort)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.txn)
            .await
            .context("list enrollments by student")?;
        Ok(models
            .into_iter()
            .map(enrollment_from_model)
            .collect::<anyhow::Result<_>>()?)
    }
}

fn order_by_created(
    query: sea_orm::Select<enrollments::Entity>,
    sort: Sort,
) -> sea_orm::Select<enrollments::Entity> {
    match sort {
        Sort::Desc => query
            .order_by_desc(enrollments::Column::CreatedAt)
            .order_by_desc(enrollments::Column::Id),
        Sort::Asc => query
            .order_by_asc(enrollments::Column::CreatedAt)
            .order_by_asc(enrollments::Column::Id),
    }
}

fn grade_to_column(grade: Grade) -> i16 {
    i16::from(grade.value())
}

fn enrollment_from_model(model: enrollments::Model) -> anyhow::Result<Enrollment> {
    let grade = model
        .grade
        .map(|g| Grade::new(i64::from(g)))
        .transpose()
        .with_context(|| format!("enrollment {} has an invalid grade", model.id))?;
    Ok(Enrollment {
        id: model.id,
        student_id: model.student_id,
        course_code: model.course_code,
        grade,
        version: model.version,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Feedback ─────────────────────────────────────────────────────────────────

impl FeedbackStore for DbWork {
    async fn find_feedback(
        &self,
        enrollment_id: Uuid,
    ) -> Result<Option<Feedback>, GradesServiceError> {
        let model = feedbacks::Entity::find_by_id(enrollment_id)
            .one(&self.txn)
            .await
            .context("find feedback")?;
        Ok(model.map(feedback_from_model))
    }

    async fn find_feedbacks(
        &self,
        enrollment_ids: &[Uuid],
    ) -> Result<Vec<Feedback>, GradesServiceError> {
        if enrollment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = feedbacks::Entity::find()
            .filter(feedbacks::Column::EnrollmentId.is_in(enrollment_ids.iter().copied()))
            .all(&self.txn)
            .await
            .context("find feedbacks by enrollment ids")?;
        Ok(models.into_iter().map(feedback_from_model).collect())
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), GradesServiceError> {
        feedbacks::ActiveModel {
            enrollment_id: Set(feedback.enrollment_id),
            teacher_feedback: Set(feedback.teacher_feedback.clone()),
            teacher_author_id: Set(feedback.teacher_author_id),
            student_feedback: Set(feedback.student_feedback.clone()),
            version: Set(feedback.version),
            created_at: Set(feedback.created_at),
            updated_at: Set(feedback.updated_at),
        }
        .insert(&self.txn)
        .await
        .context("insert feedback")?;
        Ok(())
    }

    async fn update_feedback(&self, feedback: &Feedback) -> Result<(), GradesServiceError> {
        feedbacks::ActiveModel {
            enrollment_id: Set(feedback.enrollment_id),
            teacher_feedback: Set(feedback.teacher_feedback.clone()),
            student_feedback: Set(feedback.student_feedback.clone()),
            version: Set(feedback.version),
            updated_at: Set(feedback.updated_at),
            ..Default::default()
        }
        .update(&self.txn)
        .await
        .context("update feedback")?;
        Ok(())
    }

    async fn delete_feedback(&self, enrollment_id: Uuid) -> Result<bool, GradesServiceError> {
        let result = feedbacks::Entity::delete_by_id(enrollment_id)
            .exec(&self.txn)
            .await
            .context("delete feedback")?;
        Ok(result.rows_affected > 0)
    }
}

fn feedback_from_model(model: feedbacks::Model) -> Feedback {
    Feedback {
        enrollment_id: model.enrollment_id,
        teacher_feedback: model.teacher_feedback,
        teacher_author_id: model.teacher_author_id,
        student_feedback: model.student_feedback,
        version: model.version,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
