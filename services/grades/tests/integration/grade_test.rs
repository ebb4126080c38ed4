use gradebook_grades::error::GradesServiceError;
use gradebook_grades::usecase::grade::{SetGradeInput, SetGradeUseCase};

use crate::helpers::school;

#[tokio::test]
async fn should_set_grade_as_owning_teacher() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;

    let enrollment = s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();

    assert_eq!(enrollment.grade.map(|g| g.value()), Some(85));
    assert_eq!(enrollment.version, 1);
    let tables = s.gateway.snapshot().await;
    let stored = tables.enrollment(s.s1.id, "CS101").unwrap();
    assert_eq!(stored.grade.map(|g| g.value()), Some(85));
}

#[tokio::test]
async fn should_set_grade_as_admin() {
    let s = school().await;
    s.enroll(&s.s1, "MATH1").await;

    let enrollment = s.set_grade(&s.admin, &s.s1, "MATH1", 0).await.unwrap();

    assert_eq!(enrollment.grade.map(|g| g.value()), Some(0));
}

#[tokio::test]
async fn should_overwrite_existing_grade() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 60).await.unwrap();

    let enrollment = s.set_grade(&s.t1, &s.s1, "CS101", 100).await.unwrap();

    assert_eq!(enrollment.grade.map(|g| g.value()), Some(100));
    assert_eq!(enrollment.version, 2);
}

#[tokio::test]
async fn should_keep_feedback_when_regrading() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 60).await.unwrap();
    s.teacher_feedback(&s.t1, &s.s1, "CS101", "Good work")
        .await
        .unwrap();

    s.set_grade(&s.t1, &s.s1, "CS101", 75).await.unwrap();

    let tables = s.gateway.snapshot().await;
    let enrollment = tables.enrollment(s.s1.id, "CS101").unwrap();
    let feedback = tables.feedbacks.get(&enrollment.id).unwrap();
    assert_eq!(feedback.teacher_feedback.as_deref(), Some("Good work"));
}

#[tokio::test]
async fn should_reject_out_of_range_grade() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;

    for grade in [-1, 101, 150] {
        let result = s.set_grade(&s.t1, &s.s1, "CS101", grade).await;
        assert!(
            matches!(result, Err(GradesServiceError::Validation(_))),
            "expected Validation for {grade}, got {result:?}"
        );
    }
    let tables = s.gateway.snapshot().await;
    assert!(tables.enrollment(s.s1.id, "CS101").unwrap().grade.is_none());
}

#[tokio::test]
async fn should_reject_grade_from_non_owning_teacher() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();

    let result = s.set_grade(&s.t2, &s.s1, "CS101", 40).await;

    assert!(
        matches!(result, Err(GradesServiceError::OwnershipViolation)),
        "expected OwnershipViolation, got {result:?}"
    );
    let tables = s.gateway.snapshot().await;
    let stored = tables.enrollment(s.s1.id, "CS101").unwrap();
    assert_eq!(stored.grade.map(|g| g.value()), Some(85));
}

#[tokio::test]
async fn should_reject_grade_from_teacher_on_unassigned_course() {
    let s = school().await;
    s.enroll(&s.s1, "NOBODY1").await;

    let result = s.set_grade(&s.t1, &s.s1, "NOBODY1", 40).await;

    assert!(
        matches!(result, Err(GradesServiceError::OwnershipViolation)),
        "expected OwnershipViolation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_grade_from_student() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;

    let result = s.set_grade(&s.s1, &s.s1, "CS101", 100).await;

    assert!(
        matches!(result, Err(GradesServiceError::RoleViolation)),
        "expected RoleViolation, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_not_found_for_missing_enrollment() {
    let s = school().await;

    let result = s.set_grade(&s.t1, &s.s1, "CS101", 50).await;

    assert!(
        matches!(result, Err(GradesServiceError::EnrollmentNotFound)),
        "expected EnrollmentNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_not_reveal_enrollment_to_non_owner() {
    let s = school().await;

    // No enrollment exists, but the non-owner is refused before that matters.
    let result = s.set_grade(&s.t2, &s.s1, "CS101", 50).await;

    assert!(
        matches!(result, Err(GradesServiceError::OwnershipViolation)),
        "expected OwnershipViolation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_stale_version_and_keep_grade() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    let uc = SetGradeUseCase {
        gateway: s.gateway.clone(),
    };

    let result = uc
        .execute(
            &s.t1,
            SetGradeInput {
                student_id: s.s1.id,
                course_code: "CS101".into(),
                grade: 10,
                expected_version: Some(0),
            },
        )
        .await;

    assert!(
        matches!(result, Err(GradesServiceError::ConcurrentModification)),
        "expected ConcurrentModification, got {result:?}"
    );
    let tables = s.gateway.snapshot().await;
    let stored = tables.enrollment(s.s1.id, "CS101").unwrap();
    assert_eq!(stored.grade.map(|g| g.value()), Some(85));
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn should_accept_current_version() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    let uc = SetGradeUseCase {
        gateway: s.gateway.clone(),
    };

    let enrollment = uc
        .execute(
            &s.t1,
            SetGradeInput {
                student_id: s.s1.id,
                course_code: "CS101".into(),
                grade: 90,
                expected_version: Some(0),
            },
        )
        .await
        .unwrap();

    assert_eq!(enrollment.version, 1);
}
