use std::time::Duration;

use gradebook_grades::error::GradesServiceError;
use gradebook_grades::usecase::feedback::{
    DeleteFeedbackUseCase, FeedbackInput, GiveTeacherFeedbackUseCase,
};

use crate::helpers::school;

#[tokio::test]
async fn should_reject_teacher_feedback_without_grade() {
    let s = school().await;
    s.enroll(&s.s1, "CS201").await;

    let result = s.teacher_feedback(&s.t1, &s.s1, "CS201", "Good work").await;

    assert!(
        matches!(result, Err(GradesServiceError::GradeNotAssigned)),
        "expected GradeNotAssigned, got {result:?}"
    );
    assert!(s.gateway.snapshot().await.feedbacks.is_empty());
}

#[tokio::test]
async fn should_reject_admin_teacher_feedback_without_grade() {
    let s = school().await;
    s.enroll(&s.s1, "CS201").await;

    let result = s.teacher_feedback(&s.admin, &s.s1, "CS201", "Note").await;

    assert!(
        matches!(result, Err(GradesServiceError::GradeNotAssigned)),
        "expected GradeNotAssigned, got {result:?}"
    );
}

#[tokio::test]
async fn should_create_feedback_record_on_first_teacher_feedback() {
    let s = school().await;
    let enrollment = s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();

    let record = s
        .teacher_feedback(&s.t1, &s.s1, "CS101", "Good work")
        .await
        .unwrap();

    assert_eq!(
        record.teacher_feedback.visible(),
        Some(Some("Good work".to_string()))
    );
    let tables = s.gateway.snapshot().await;
    let feedback = tables.feedbacks.get(&enrollment.id).unwrap();
    assert_eq!(feedback.teacher_author_id, s.t1.id);
    assert!(feedback.student_feedback.is_none());
}

#[tokio::test]
async fn should_update_teacher_feedback_in_place() {
    let s = school().await;
    let enrollment = s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    s.teacher_feedback(&s.t1, &s.s1, "CS101", "Good work")
        .await
        .unwrap();

    s.teacher_feedback(&s.t1, &s.s1, "CS101", "Great work")
        .await
        .unwrap();

    let tables = s.gateway.snapshot().await;
    assert_eq!(tables.feedbacks.len(), 1);
    let feedback = tables.feedbacks.get(&enrollment.id).unwrap();
    assert_eq!(feedback.teacher_feedback.as_deref(), Some("Great work"));
    assert_eq!(feedback.version, 1);
}

#[tokio::test]
async fn should_keep_original_author_on_admin_edit() {
    let s = school().await;
    let enrollment = s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    s.teacher_feedback(&s.t1, &s.s1, "CS101", "Good work")
        .await
        .unwrap();

    s.teacher_feedback(&s.admin, &s.s1, "CS101", "Good work, see rubric")
        .await
        .unwrap();

    let tables = s.gateway.snapshot().await;
    let feedback = tables.feedbacks.get(&enrollment.id).unwrap();
    assert_eq!(feedback.teacher_author_id, s.t1.id);
    assert_eq!(
        feedback.teacher_feedback.as_deref(),
        Some("Good work, see rubric")
    );
}

#[tokio::test]
async fn should_reject_owner_editing_admin_authored_feedback() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    s.teacher_feedback(&s.admin, &s.s1, "CS101", "Admin note")
        .await
        .unwrap();

    let result = s.teacher_feedback(&s.t1, &s.s1, "CS101", "Mine now").await;

    assert!(
        matches!(result, Err(GradesServiceError::OwnershipViolation)),
        "expected OwnershipViolation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_teacher_feedback_from_non_owner() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();

    let result = s.teacher_feedback(&s.t2, &s.s1, "CS101", "Hi").await;

    assert!(
        matches!(result, Err(GradesServiceError::OwnershipViolation)),
        "expected OwnershipViolation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_blank_feedback() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();

    let result = s.teacher_feedback(&s.t1, &s.s1, "CS101", "   ").await;

    assert!(
        matches!(result, Err(GradesServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_student_feedback_before_teacher_feedback() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;

    let ungraded = s.student_feedback(&s.s1, &s.s1, "CS101", "Thanks").await;
    assert!(
        matches!(ungraded, Err(GradesServiceError::FeedbackNotFound)),
        "expected FeedbackNotFound, got {ungraded:?}"
    );

    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    let graded = s.student_feedback(&s.s1, &s.s1, "CS101", "Thanks").await;
    assert!(
        matches!(graded, Err(GradesServiceError::FeedbackNotFound)),
        "expected FeedbackNotFound, got {graded:?}"
    );
}

#[tokio::test]
async fn should_reject_student_feedback_for_another_student() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    s.teacher_feedback(&s.t1, &s.s1, "CS101", "Good work")
        .await
        .unwrap();

    let result = s.student_feedback(&s.s2, &s.s1, "CS101", "Hijack").await;

    assert!(
        matches!(result, Err(GradesServiceError::RoleViolation)),
        "expected RoleViolation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_student_feedback_from_staff() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    s.teacher_feedback(&s.t1, &s.s1, "CS101", "Good work")
        .await
        .unwrap();

    for actor in [s.admin, s.t1] {
        let result = s.student_feedback(&actor, &s.s1, "CS101", "Thanks").await;
        assert!(
            matches!(result, Err(GradesServiceError::RoleViolation)),
            "expected RoleViolation, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_resubmit_student_feedback_idempotently() {
    let s = school().await;
    let enrollment = s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    s.teacher_feedback(&s.t1, &s.s1, "CS101", "Good work")
        .await
        .unwrap();
    s.student_feedback(&s.s1, &s.s1, "CS101", "Thanks")
        .await
        .unwrap();
    let first = s.gateway.snapshot().await.feedbacks[&enrollment.id].clone();

    tokio::time::sleep(Duration::from_millis(2)).await;
    s.student_feedback(&s.s1, &s.s1, "CS101", "Thanks")
        .await
        .unwrap();

    let tables = s.gateway.snapshot().await;
    assert_eq!(tables.feedbacks.len(), 1);
    let second = &tables.feedbacks[&enrollment.id];
    assert_eq!(second.student_feedback.as_deref(), Some("Thanks"));
    assert_eq!(second.teacher_feedback, first.teacher_feedback);
    assert!(second.updated_at > first.updated_at);
}

#[tokio::test]
async fn should_reject_stale_feedback_version() {
    let s = school().await;
    let enrollment = s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    s.teacher_feedback(&s.t1, &s.s1, "CS101", "Good work")
        .await
        .unwrap();
    s.teacher_feedback(&s.t1, &s.s1, "CS101", "Very good work")
        .await
        .unwrap();
    let uc = GiveTeacherFeedbackUseCase {
        gateway: s.gateway.clone(),
    };

    let result = uc
        .execute(
            &s.t1,
            FeedbackInput {
                student_id: s.s1.id,
                course_code: "CS101".into(),
                text: "Overwrite".into(),
                expected_version: Some(0),
            },
        )
        .await;

    assert!(
        matches!(result, Err(GradesServiceError::ConcurrentModification)),
        "expected ConcurrentModification, got {result:?}"
    );
    let tables = s.gateway.snapshot().await;
    assert_eq!(
        tables.feedbacks[&enrollment.id].teacher_feedback.as_deref(),
        Some("Very good work")
    );
}

#[tokio::test]
async fn should_delete_feedback_and_fall_back_to_graded() {
    let s = school().await;
    let enrollment = s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    s.teacher_feedback(&s.t1, &s.s1, "CS101", "Good work")
        .await
        .unwrap();

    DeleteFeedbackUseCase {
        gateway: s.gateway.clone(),
    }
    .execute(&s.t1, s.s1.id, "CS101")
    .await
    .unwrap();

    let tables = s.gateway.snapshot().await;
    assert!(!tables.feedbacks.contains_key(&enrollment.id));
    assert_eq!(
        tables.enrollment(s.s1.id, "CS101").unwrap().grade.map(|g| g.value()),
        Some(85)
    );
    let record = s.view(&s.t1, &s.s1, "CS101").await.unwrap();
    assert_eq!(
        record.state.visible().map(|st| st.as_str()),
        Some("graded_no_feedback")
    );
}

#[tokio::test]
async fn should_return_not_found_when_deleting_absent_feedback() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    let uc = DeleteFeedbackUseCase {
        gateway: s.gateway.clone(),
    };

    for actor in [s.t1, s.admin] {
        let result = uc.execute(&actor, s.s1.id, "CS101").await;
        assert!(
            matches!(result, Err(GradesServiceError::FeedbackNotFound)),
            "expected FeedbackNotFound, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_reject_feedback_delete_by_student() {
    let s = school().await;
    s.enroll(&s.s1, "CS101").await;
    s.set_grade(&s.t1, &s.s1, "CS101", 85).await.unwrap();
    s.teacher_feedback(&s.t1, &s.s1, "CS101", "Good work")
        .await
        .unwrap();

    let result = DeleteFeedbackUseCase {
        gateway: s.gateway.clone(),
    }
    .execute(&s.s1, s.s1.id, "CS101")
    .await;

    assert!(
        matches!(result, Err(GradesServiceError::RoleViolation)),
        "expected RoleViolation, got {result:?}"
    );
    assert_eq!(s.gateway.snapshot().await.feedbacks.len(), 1);
}
