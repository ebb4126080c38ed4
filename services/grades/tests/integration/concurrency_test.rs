use chrono::Utc;
use uuid::Uuid;

use gradebook_domain::user::UserRole;
use gradebook_grades::domain::repository::{
    CourseCatalog, EnrollmentStore, PersistenceGateway, UnitOfWork as _, UserDirectory,
};
use gradebook_grades::domain::types::Enrollment;
use gradebook_grades::error::GradesServiceError;
use gradebook_grades::infra::db::DbGateway;
use gradebook_grades::usecase::enrollment::EnrollUseCase;

use crate::helpers::{school, sqlite_db, test_course, test_user};

fn new_enrollment(student_id: Uuid, course_code: &str) -> Enrollment {
    let now = Utc::now();
    Enrollment {
        id: Uuid::now_v7(),
        student_id,
        course_code: course_code.to_owned(),
        grade: None,
        version: 0,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn should_map_unique_index_violation_to_duplicate_enrollment() {
    let gateway = DbGateway {
        db: sqlite_db().await,
    };
    let student = test_user(UserRole::Student, "S1");
    let course = test_course("CS101", None);
    let work = gateway.begin().await.unwrap();
    work.create_user(&student).await.unwrap();
    work.create_course(&course).await.unwrap();
    work.insert_enrollment(&new_enrollment(student.id, "CS101"))
        .await
        .unwrap();
    work.commit().await.unwrap();

    // Skips the existence check, as a racing transaction would.
    let work = gateway.begin().await.unwrap();
    let result = work
        .insert_enrollment(&new_enrollment(student.id, "CS101"))
        .await;

    assert!(
        matches!(result, Err(GradesServiceError::DuplicateEnrollment)),
        "expected DuplicateEnrollment, got {result:?}"
    );
}

#[tokio::test]
async fn should_linearize_racing_enrollments() {
    let s = school().await;
    let uc = EnrollUseCase {
        gateway: s.gateway.clone(),
    };

    let (first, second) = tokio::join!(
        uc.execute(&s.admin, s.s1.id, "CS101"),
        uc.execute(&s.admin, s.s1.id, "CS101"),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(GradesServiceError::DuplicateEnrollment))),
        "expected one DuplicateEnrollment, got {results:?}"
    );
    assert_eq!(
        s.gateway.snapshot().await.enrollment_count(s.s1.id, "CS101"),
        1
    );
}

#[tokio::test]
async fn should_keep_one_feedback_row_under_racing_teacher_feedback() {
    let s = school().await;
    let enrollment = s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();

    let (first, second) = tokio::join!(
        s.teacher_feedback(&s.t1, &s.s1, "CS101", "Good work"),
        s.teacher_feedback(&s.admin, &s.s1, "CS101", "Well done"),
    );
    first.unwrap();
    second.unwrap();

    let tables = s.gateway.snapshot().await;
    assert_eq!(tables.feedbacks.len(), 1);
    let fb = &tables.feedbacks[&enrollment.id];
    // The second write is an in-place update of the first.
    assert_eq!(fb.version, 1);
    assert_eq!(fb.teacher_author_id, s.t1.id);
}

#[tokio::test]
async fn should_view_record_without_locking_enrollment_row() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    let locked_before = s.gateway.locked_reads();

    s.view(&s.t1, &s.s1, "CS101").await.unwrap();
    s.view(&s.s1, &s.s1, "CS101").await.unwrap();

    assert_eq!(s.gateway.locked_reads(), locked_before);
}

#[tokio::test]
async fn should_lock_enrollment_row_when_setting_grade() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    let locked_before = s.gateway.locked_reads();

    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();

    assert_eq!(s.gateway.locked_reads(), locked_before + 1);
}
